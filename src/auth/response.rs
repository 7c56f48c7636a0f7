//! Normalization of authorization server responses
//!
//! Every network operation funnels its response through [`handle_response`].
//! A body that is not JSON becomes `{error: <default>, error_description: <raw>}`;
//! a status of 400 or above or an `error` field in the body becomes an [`OAuthError`].

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{OAuthError, Result, UNKNOWN_ERROR};
use crate::transport::HttpResponse;
use crate::utils::body_preview;

/// Parse the response body, raising the server's error or `default_code`
pub(crate) fn handle_response(response: &HttpResponse, default_code: &str) -> Result<Value> {
    let body = parse_body(response, default_code);

    let error = body.get("error");
    if !response.is_ok() || error.is_some() {
        let code = error
            .and_then(Value::as_str)
            .unwrap_or(default_code)
            .to_string();
        let message = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_ERROR)
            .to_string();

        tracing::warn!(status = response.status, code = %code, "OAuth request failed");
        return Err(OAuthError::Protocol { code, message });
    }

    Ok(body)
}

/// Deserialize a successful payload, reporting missing fields under `default_code`
pub(crate) fn parse_payload<T: DeserializeOwned>(
    payload: Value,
    default_code: &str,
    what: &str,
) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| OAuthError::protocol(default_code, format!("Invalid {what} response: {e}")))
}

fn parse_body(response: &HttpResponse, default_code: &str) -> Value {
    // RFC 7009 revocation responses carry no body
    if response.body.trim().is_empty() {
        return Value::Object(Map::new());
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(value) => value,
        Err(_) => {
            tracing::debug!(
                status = response.status,
                body = %body_preview(&response.body),
                "Non-JSON response body"
            );
            let mut synthesized = Map::new();
            synthesized.insert("error".to_string(), Value::String(default_code.to_string()));
            synthesized.insert(
                "error_description".to_string(),
                Value::String(response.body.clone()),
            );
            Value::Object(synthesized)
        }
    }
}
