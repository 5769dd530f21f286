//! Minimal prometheus registry backing the `/metrics` route.
use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

pub static WEBHOOKS_RECEIVED: Lazy<IntCounter> =
    Lazy::new(|| register_counter("recon_webhooks_received", "Webhook events received"));

pub static COMMANDS_DISPATCHED: Lazy<IntCounter> =
    Lazy::new(|| register_counter("recon_commands_dispatched", "InstallProfile commands dispatched"));

pub static DISPATCH_FAILURES: Lazy<IntCounter> =
    Lazy::new(|| register_counter("recon_dispatch_failures", "Failed remediation dispatches"));

fn register_counter(name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::new(name, help).expect("valid counter options");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("counter registration");
    counter
}

pub fn encode() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).to_string())
}
