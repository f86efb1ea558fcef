//! Wire types shared by [`HttpRemote`](super::HttpRemote) and the
//! `recipes-server` binary.
//!
//! Every response body is an [`Envelope`]. A non-empty `errors` list means
//! the operation failed, whatever the HTTP status says.

use serde::{Deserialize, Serialize};

/// Response wrapper for every endpoint except `/health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorItem>,
}

impl<T> Envelope<T> {
    pub fn data(data: T) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            data: None,
            errors: Vec::new(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            data: None,
            errors: vec![ErrorItem {
                message: message.into(),
            }],
        }
    }

    /// First error message, if the payload reports a failure.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// One error reported by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub message: String,
}

/// Body of `POST /recipes`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub done: Vec<bool>,
    #[serde(default)]
    pub image: Option<String>,
}

/// One entry of the `GET /recipes` listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: String,
    pub title: String,
    pub steps: Vec<String>,
}

/// Acknowledgement returned by `PATCH /recipes/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchAck {
    pub id: String,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_envelope_shape() {
        let envelope: Envelope<()> = Envelope::error("title must not be empty");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({"data": null, "errors": [{"message": "title must not be empty"}]})
        );
    }

    #[test]
    fn test_envelope_without_errors_key() {
        let envelope: Envelope<bool> = serde_json::from_value(json!({"data": true})).unwrap();
        assert_eq!(envelope.data, Some(true));
        assert!(envelope.first_error().is_none());
    }

    #[test]
    fn test_envelope_without_data_key() {
        let envelope: Envelope<bool> =
            serde_json::from_value(json!({"errors": [{"message": "boom"}]})).unwrap();
        assert_eq!(envelope.data, None);
        assert_eq!(envelope.first_error(), Some("boom"));
    }
}
