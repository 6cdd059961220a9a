//! The `{success, code, data}` envelope wrapping every upstream response.

use serde_json::Value;

/// Parsed form of the top-level JSON object the upstream returns.
///
/// Exactly one of `data` or the failure indication is meaningful: `data`
/// must not be read unless `success` is true. A body that is valid JSON but
/// not envelope-shaped (missing `success`, or not an object) parses as a
/// failed envelope with no code, which the retry loop treats as a permanent
/// application failure.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub success: bool,
    /// Application-level failure code; present only on failure.
    pub code: Option<i64>,
    /// Payload; meaningful only when `success` is true.
    pub data: Option<Value>,
}

impl Envelope {
    /// Parse an envelope out of a JSON body.
    pub fn from_value(body: Value) -> Self {
        let success = body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let code = body.get("code").and_then(Value::as_i64);
        let data = if success {
            body.get("data").cloned()
        } else {
            None
        };

        Self {
            success,
            code,
            data,
        }
    }
}
