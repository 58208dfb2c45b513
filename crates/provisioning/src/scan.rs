//! QR intake payload parsing.
//!
//! The QR label printed on each toy carries a JSON object with the serial
//! number and activation key. Decoding happens in the scan UI's success
//! callback; a malformed payload must come back as an error the UI can toast
//! over, leaving the scanner open for another attempt.

use serde::{Deserialize, Serialize};

use crate::error::{ProvisionError, Result};

/// Decoded contents of a toy's QR label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    pub serial_number: String,
    pub activation_key: String,
}

/// Parse the decoded text of a QR scan.
pub fn parse_scan_payload(decoded_text: &str) -> Result<ScanPayload> {
    serde_json::from_str(decoded_text).map_err(|_| ProvisionError::MalformedScanPayload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_payload() {
        let payload =
            parse_scan_payload(r#"{"serialNumber": "SN-001", "activationKey": "abc123"}"#).unwrap();
        assert_eq!(payload.serial_number, "SN-001");
        assert_eq!(payload.activation_key, "abc123");
    }

    #[test]
    fn test_malformed_json_is_an_error_not_a_panic() {
        for input in ["", "not json", "{", r#"{"serialNumber": "SN-001"}"#, "42"] {
            let result = parse_scan_payload(input);
            assert!(
                matches!(result, Err(ProvisionError::MalformedScanPayload)),
                "input {:?} should fail cleanly",
                input
            );
        }
    }

    #[test]
    fn test_extra_fields_tolerated() {
        let payload = parse_scan_payload(
            r#"{"serialNumber": "SN-001", "activationKey": "abc123", "batch": 7}"#,
        )
        .unwrap();
        assert_eq!(payload.serial_number, "SN-001");
    }
}
