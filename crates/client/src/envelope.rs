//! Canonical decoding of backend responses.
//!
//! The backend reports failures with an `errorMessage` field, sometimes at
//! the top level and sometimes nested under `data`. Every call goes through
//! [`check_response`], so both shapes collapse into
//! [`BackendError::Rejected`] in one place.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::BackendError;

/// The display message of an error envelope, if the body is one.
pub fn error_message(body: &Value) -> Option<String> {
    [body.get("errorMessage"), body.pointer("/data/errorMessage")]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|m| !m.is_empty())
        .map(str::to_string)
}

/// Turn a raw status and body into the decoded JSON value or an error.
///
/// An empty body decodes to `null`, which mutation endpoints return.
pub fn check_response(status: u16, body: &[u8]) -> Result<Value, BackendError> {
    let success = (200..300).contains(&status);
    let value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => value,
            Err(err) if success => return Err(BackendError::Decode(err.to_string())),
            Err(_) => {
                return Err(BackendError::UnexpectedStatus {
                    status,
                    body: String::from_utf8_lossy(body).into_owned(),
                })
            }
        }
    };

    if let Some(message) = error_message(&value) {
        return Err(BackendError::Rejected(message));
    }
    if !success {
        return Err(BackendError::UnexpectedStatus {
            status,
            body: value.to_string(),
        });
    }
    Ok(value)
}

/// Deserialize the `data` member of a success body.
pub fn data<T: DeserializeOwned>(mut value: Value) -> Result<T, BackendError> {
    let data = value
        .get_mut("data")
        .map(Value::take)
        .ok_or_else(|| BackendError::Decode("response has no `data` member".into()))?;
    Ok(serde_json::from_value(data)?)
}
