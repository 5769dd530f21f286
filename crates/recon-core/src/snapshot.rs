//! Parsing of device acknowledgement payloads.
//!
//! A device acknowledgement arrives as base64 of a property list. Every
//! acknowledgement carries the device `UDID`; only those that also carry
//! a `ProfileList` section are reconciliation-relevant.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

use crate::error::ReconError;

/// What one device reports as currently installed.
///
/// Transient: derived per webhook call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub udid: String,
    /// profile identifier -> installed version token
    pub installed: HashMap<String, String>,
}

/// Outcome of parsing an acknowledgement.
///
/// Devices acknowledge many command kinds. A payload without a
/// `ProfileList` section is not an error; it is simply not ours to act
/// on, so the caller skips reconciliation for the event.
#[derive(Debug, Clone)]
pub enum AckEvent {
    ProfileList(DeviceSnapshot),
    Other { udid: String },
}

#[derive(Deserialize)]
struct RawAck {
    #[serde(rename = "UDID")]
    udid: String,
    #[serde(rename = "ProfileList")]
    profile_list: Option<Vec<RawInstalledProfile>>,
}

#[derive(Deserialize)]
struct RawInstalledProfile {
    #[serde(rename = "PayloadIdentifier")]
    identifier: String,
    #[serde(rename = "PayloadUUID")]
    uuid: String,
}

/// Decode a base64 plist acknowledgement into a device snapshot.
///
/// Duplicate identifiers in the profile list resolve last-write-wins.
/// That mirrors what devices actually report during a profile swap and
/// is a deliberate policy, covered by tests below.
pub fn parse_acknowledgement(raw_payload_b64: &str) -> Result<AckEvent, ReconError> {
    let raw = STANDARD
        .decode(raw_payload_b64.trim())
        .map_err(|e| ReconError::MalformedPayload(format!("base64: {e}")))?;

    let ack: RawAck = plist::from_bytes(&raw)
        .map_err(|e| ReconError::MalformedPayload(format!("plist: {e}")))?;

    match ack.profile_list {
        Some(list) => {
            let mut installed = HashMap::new();
            for profile in list {
                installed.insert(profile.identifier, profile.uuid);
            }
            Ok(AckEvent::ProfileList(DeviceSnapshot {
                udid: ack.udid,
                installed,
            }))
        }
        None => Ok(AckEvent::Other { udid: ack.udid }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_list_ack(udid: &str, profiles: &[(&str, &str)]) -> String {
        let items: String = profiles
            .iter()
            .map(|(id, uuid)| {
                format!(
                    "<dict><key>PayloadIdentifier</key><string>{id}</string>\
                     <key>PayloadUUID</key><string>{uuid}</string></dict>"
                )
            })
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>UDID</key>
    <string>{udid}</string>
    <key>Status</key>
    <string>Acknowledged</string>
    <key>ProfileList</key>
    <array>{items}</array>
</dict>
</plist>"#
        );
        STANDARD.encode(xml.as_bytes())
    }

    fn plain_ack(udid: &str) -> String {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>UDID</key>
    <string>{udid}</string>
    <key>Status</key>
    <string>Idle</string>
</dict>
</plist>"#
        );
        STANDARD.encode(xml.as_bytes())
    }

    #[test]
    fn test_parse_profile_list() {
        let b64 = profile_list_ack("DEVICE-1", &[("com.org.wifi", "V1"), ("com.org.vpn", "V2")]);
        match parse_acknowledgement(&b64).unwrap() {
            AckEvent::ProfileList(snapshot) => {
                assert_eq!(snapshot.udid, "DEVICE-1");
                assert_eq!(snapshot.installed["com.org.wifi"], "V1");
                assert_eq!(snapshot.installed["com.org.vpn"], "V2");
            }
            other => panic!("expected ProfileList, got {other:?}"),
        }
    }

    #[test]
    fn test_ack_without_profile_list_is_other() {
        let b64 = plain_ack("DEVICE-2");
        match parse_acknowledgement(&b64).unwrap() {
            AckEvent::Other { udid } => assert_eq!(udid, "DEVICE-2"),
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_identifier_last_write_wins() {
        let b64 = profile_list_ack(
            "DEVICE-3",
            &[("com.org.wifi", "OLD"), ("com.org.wifi", "NEW")],
        );
        match parse_acknowledgement(&b64).unwrap() {
            AckEvent::ProfileList(snapshot) => {
                assert_eq!(snapshot.installed.len(), 1);
                assert_eq!(snapshot.installed["com.org.wifi"], "NEW");
            }
            other => panic!("expected ProfileList, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_base64_rejected() {
        let err = parse_acknowledgement("***").unwrap_err();
        assert!(matches!(err, ReconError::MalformedPayload(_)));
    }

    #[test]
    fn test_missing_udid_rejected() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>Status</key>
    <string>Idle</string>
</dict>
</plist>"#;
        let b64 = STANDARD.encode(xml.as_bytes());
        let err = parse_acknowledgement(&b64).unwrap_err();
        assert!(matches!(err, ReconError::MalformedPayload(_)));
    }
}
