//! API Handlers
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use recon_core::{parse_acknowledgement, AckEvent, RECON_VERSION};
use recon_mdm::{build_catalog, remediate};

use crate::metrics;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct WebhookBody {
    acknowledge_event: Option<AcknowledgeEvent>,
}

#[derive(Deserialize)]
pub struct AcknowledgeEvent {
    raw_payload: Option<String>,
}

/// Inbound device-state acknowledgement.
///
/// The management server only ever learns whether its event was
/// accepted; remediation dispatch happens within the handler but its
/// outcome never shapes the response.
pub async fn webhook(State(state): State<AppState>, Json(body): Json<WebhookBody>) -> StatusCode {
    metrics::WEBHOOKS_RECEIVED.inc();

    let Some(raw_payload) = body.acknowledge_event.and_then(|e| e.raw_payload) else {
        debug!("unexpectedly formatted payload");
        return StatusCode::BAD_REQUEST;
    };

    let event = match parse_acknowledgement(&raw_payload) {
        Ok(event) => event,
        Err(e) => {
            debug!(error = %e, "undecodable acknowledgement");
            return StatusCode::BAD_REQUEST;
        }
    };

    match event {
        AckEvent::Other { udid } => {
            debug!(%udid, "response is not a ProfileList, ignoring");
        }
        AckEvent::ProfileList(snapshot) => {
            let catalog = state.catalog();
            let summary = remediate(&snapshot, &catalog, state.installer.as_ref()).await;
            metrics::COMMANDS_DISPATCHED.inc_by(summary.dispatched as u64);
            metrics::DISPATCH_FAILURES.inc_by(summary.failed.len() as u64);
        }
    }

    StatusCode::NO_CONTENT
}

/// Rebuild the Desired-State Catalog and swap it in atomically. On
/// failure the previously published catalog stays in place.
pub async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match build_catalog(state.source.as_ref()).await {
        Ok((catalog, report)) => {
            state.publish(catalog);
            info!(
                blueprints = report.blueprints,
                resolved = report.resolved,
                unresolved = report.unresolved.len(),
                "catalog refreshed"
            );
            (StatusCode::OK, Json(json!(report)))
        }
        Err(e) => {
            error!(error = %e, "catalog refresh failed, keeping previous catalog");
            (StatusCode::BAD_GATEWAY, Json(json!({ "error": e.to_string() })))
        }
    }
}

pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "version": RECON_VERSION })),
    )
}

pub async fn metrics_text() -> (StatusCode, String) {
    match metrics::encode() {
        Ok(body) => (StatusCode::OK, body),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
