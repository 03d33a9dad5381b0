//! Response envelope normalization.
//!
//! The backend wraps payloads inconsistently: bare, `{ key: .. }`,
//! `{ data: .. }` or `{ data: { key: .. } }`. `decode` is the only place that
//! knows about this; callers always get the canonical type.

use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ClientError;

/// Keys used for payloads by the backend.
pub mod keys {
    pub const CHAMPIONSHIP: &str = "campeonato";
    pub const CHAMPIONSHIPS: &str = "campeonatos";
    pub const TEAMS: &str = "equipos";
}

/// Extract the payload stored under `key`, unwrapping any envelope.
pub fn unwrap_payload(body: Value, key: &str) -> Result<Value, ClientError> {
    let mut body = body;

    if let Some(obj) = body.as_object() {
        if obj.get("success").and_then(Value::as_bool) == Some(false)
            || obj.get("ok").and_then(Value::as_bool) == Some(false)
        {
            let message = obj
                .get("message")
                .or_else(|| obj.get("mensaje"))
                .or_else(|| obj.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("request failed")
                .to_string();
            return Err(ClientError::Rejected(message));
        }
    }

    if let Some(obj) = body.as_object_mut() {
        if let Some(payload) = obj.remove(key) {
            return Ok(payload);
        }
        if let Some(mut data) = obj.remove("data") {
            if let Some(inner) = data.as_object_mut().and_then(|d| d.remove(key)) {
                return Ok(inner);
            }
            return Ok(data);
        }
    }

    Ok(body)
}

/// Decode a backend response into `T`.
pub fn decode<T: DeserializeOwned>(body: Value, key: &str) -> Result<T, ClientError> {
    let payload = unwrap_payload(body, key)?;
    if payload.is_null() {
        return Err(ClientError::Envelope(format!("missing '{}' payload", key)));
    }
    serde_json::from_value(payload).map_err(|e| ClientError::Envelope(format!("{}: {}", key, e)))
}
