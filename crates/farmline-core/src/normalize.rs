//! Result normalizer: `CallResult` → outbound `ResultEnvelope`.
//!
//! No retries happen here.

use farmline_contracts::result::{CallResult, EnvelopeError, ResultEnvelope};

/// Wrap a dispatch outcome into the uniform envelope the outer loop forwards.
pub fn normalize(result: CallResult) -> ResultEnvelope {
    match result {
        CallResult::Ok(payload) => ResultEnvelope {
            ok: true,
            payload: Some(payload),
            error: None,
        },
        CallResult::Error { kind, message } => ResultEnvelope {
            ok: false,
            payload: None,
            error: Some(EnvelopeError { kind, message }),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use farmline_contracts::result::ErrorKind;

    use super::*;

    #[test]
    fn ok_carries_payload_only() {
        let mut payload = Map::new();
        payload.insert("found".to_string(), json!(false));

        let envelope = normalize(CallResult::Ok(payload));
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "ok": true, "payload": { "found": false } })
        );
    }

    #[test]
    fn error_carries_kind_and_message() {
        let envelope = normalize(CallResult::Error {
            kind: ErrorKind::SequenceViolation,
            message: "'find_farmer' rejected: no filler".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "ok": false,
                "error": {
                    "kind": "sequence_violation",
                    "message": "'find_farmer' rejected: no filler"
                }
            })
        );
    }
}
