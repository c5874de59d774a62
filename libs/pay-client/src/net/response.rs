//! Response classification.
//!
//! A raw transport response is converted into an explicit tagged result:
//! either the decoded JSON payload, or a uniform [`ErrorEnvelope`]. The
//! classifier branches on the declared content type only; HTTP status codes
//! are evaluated independently by the dispatcher.

use serde_json::Value;

use crate::error::{ErrorEnvelope, PayError};

/// Outcome of classifying a transport response body.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Classified {
    /// Decoded JSON payload that does not carry an error shape.
    Success(Value),
    /// Error-shaped, unparsable, or non-JSON body.
    Failure(ErrorEnvelope),
}

/// Classify a transport response, consuming its body.
///
/// # Errors
/// Returns a `Network` error when the body stream cannot be read.
pub(crate) async fn classify(response: reqwest::Response) -> Result<Classified, PayError> {
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let text = response
        .text()
        .await
        .map_err(|err| PayError::network(format!("failed to read response body: {err}")))?;
    Ok(classify_body(content_type, &text))
}

/// Classify a body that has already been read.
fn classify_body(content_type: Option<String>, text: &str) -> Classified {
    let is_json = content_type
        .as_deref()
        .is_some_and(|ct| ct.contains("json"));
    if is_json {
        let Ok(value) = serde_json::from_str::<Value>(text) else {
            return Classified::Failure(ErrorEnvelope {
                error: "Failed to parse JSON response".to_owned(),
                raw: None,
                content_type: None,
            });
        };
        // An object carrying an `error` key is the remote API's uniform
        // error shape, whatever the value's type; everything else is a
        // success payload.
        match value {
            Value::Object(map) => match map.get("error") {
                Some(err) => {
                    let error = match err {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    let raw = map.get("raw").and_then(Value::as_str).map(str::to_owned);
                    let content_type = map
                        .get("contentType")
                        .and_then(Value::as_str)
                        .map(str::to_owned);
                    Classified::Failure(ErrorEnvelope {
                        error,
                        raw,
                        content_type,
                    })
                }
                None => Classified::Success(Value::Object(map)),
            },
            value => Classified::Success(value),
        }
    } else {
        Classified::Failure(ErrorEnvelope {
            error: format!("Unhandled response format: {text}"),
            raw: Some(text.to_owned()),
            content_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_body_is_success() {
        let classified = classify_body(
            Some("application/json".to_owned()),
            r#"{"id": "o-1", "amount": {"value": 100}}"#,
        );
        assert_eq!(
            classified,
            Classified::Success(json!({"id": "o-1", "amount": {"value": 100}}))
        );
    }

    #[test]
    fn json_content_type_matched_by_substring() {
        let classified = classify_body(
            Some("application/hal+json; charset=utf-8".to_owned()),
            r#"{"ok": true}"#,
        );
        assert!(matches!(classified, Classified::Success(_)));
    }

    #[test]
    fn error_shaped_json_is_failure() {
        let classified = classify_body(
            Some("application/json".to_owned()),
            r#"{"error": "order not found"}"#,
        );
        assert_eq!(
            classified,
            Classified::Failure(ErrorEnvelope {
                error: "order not found".to_owned(),
                raw: None,
                content_type: None,
            })
        );
    }

    #[test]
    fn unparsable_json_is_failure() {
        let classified = classify_body(Some("application/json".to_owned()), "{not json");
        assert_eq!(
            classified,
            Classified::Failure(ErrorEnvelope {
                error: "Failed to parse JSON response".to_owned(),
                raw: None,
                content_type: None,
            })
        );
    }

    #[test]
    fn non_json_body_is_failure_with_raw_text() {
        let classified = classify_body(Some("text/plain".to_owned()), "boom");
        assert_eq!(
            classified,
            Classified::Failure(ErrorEnvelope {
                error: "Unhandled response format: boom".to_owned(),
                raw: Some("boom".to_owned()),
                content_type: Some("text/plain".to_owned()),
            })
        );
    }

    #[test]
    fn missing_content_type_is_treated_as_non_json() {
        let classified = classify_body(None, "ok");
        assert_eq!(
            classified,
            Classified::Failure(ErrorEnvelope {
                error: "Unhandled response format: ok".to_owned(),
                raw: Some("ok".to_owned()),
                content_type: None,
            })
        );
    }

    #[test]
    fn non_string_error_field_is_still_an_error_shape() {
        let classified = classify_body(Some("application/json".to_owned()), r#"{"error": 42}"#);
        assert_eq!(
            classified,
            Classified::Failure(ErrorEnvelope {
                error: "42".to_owned(),
                raw: None,
                content_type: None,
            })
        );
    }

    #[test]
    fn error_key_only_matters_on_objects() {
        let classified = classify_body(Some("application/json".to_owned()), r#"["error"]"#);
        assert_eq!(classified, Classified::Success(json!(["error"])));
    }
}
