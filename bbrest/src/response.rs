//! Server response types and envelope decoding.
//!
//! All BlueBubbles server REST responses follow a common envelope format
//! with status, message, and optional data/metadata/error fields. The server
//! sends this envelope for non-2xx statuses too, so decoding is the same for
//! every status.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::trace;

use bbrest_core::error::{BbError, BbResult};

use crate::transport::RawResponse;

/// Standard server response envelope.
///
/// ```json
/// { "status": 200, "message": "Success!", "data": { ... } }
/// ```
///
/// `D` is the payload shape and `M` the metadata shape; both are chosen by the
/// caller, never sniffed from the JSON. `exception` and `raw_text` are filled
/// in locally and never cross the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerResponse<D = serde_json::Value, M = serde_json::Value> {
    /// HTTP-like status code from the server.
    pub status: u16,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Response payload data (type varies by endpoint).
    pub data: Option<D>,
    /// Metadata (pagination info for query endpoints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<M>,
    /// Error details (present only on error responses).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ServerError>,
    /// The non-success status the transport reported, if any.
    #[serde(skip)]
    pub exception: Option<StatusFailure>,
    /// The exact response body.
    #[serde(skip)]
    pub raw_text: String,
}

/// Server error detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerError {
    /// Error type identifier.
    #[serde(rename = "type")]
    pub error_type: Option<String>,
    /// Error message.
    pub message: Option<String>,
}

/// A non-success HTTP status that still came with a readable body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusFailure {
    /// HTTP status code of the response.
    pub status: u16,
    /// Transport error text, with the request URL stripped.
    pub message: String,
}

/// Pagination metadata from query responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMetadata {
    /// Limit applied to the database query.
    #[serde(default)]
    pub limit: u64,
    /// Offset applied to the database query.
    #[serde(default)]
    pub offset: u64,
    /// Total number of results matching the query.
    #[serde(default)]
    pub total: u64,
}

impl<D, M> ServerResponse<D, M> {
    /// Whether the call succeeded: no error object and a 2xx status.
    pub fn is_success(&self) -> bool {
        self.error.is_none() && (200..300).contains(&self.status)
    }

    /// Whether the call must be treated as failed, regardless of `data`.
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Get the error message if this is an error response.
    pub fn error_message(&self) -> Option<String> {
        if self.is_error() {
            self.error
                .as_ref()
                .and_then(|e| e.message.clone())
                .or_else(|| Some(self.message.clone()))
        } else {
            None
        }
    }

    /// Convert into the payload, turning an error envelope into [`BbError::Server`].
    pub fn into_data(self) -> BbResult<Option<D>> {
        if self.is_error() {
            let message = self.error_message().unwrap_or_default();
            return Err(BbError::Server {
                status: self.status,
                error_type: self.error.and_then(|e| e.error_type),
                message,
            });
        }
        Ok(self.data)
    }
}

/// Parse a response body into an envelope and attach the diagnostics.
///
/// Malformed JSON is returned as [`BbError::Decode`]; nothing is retried.
pub fn decode_envelope<D, M>(raw: RawResponse) -> BbResult<ServerResponse<D, M>>
where
    D: DeserializeOwned,
    M: DeserializeOwned,
{
    let RawResponse {
        status,
        text,
        failure,
    } = raw;
    trace!(status, bytes = text.len(), "decoding response envelope");

    let mut envelope: ServerResponse<D, M> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(source) => {
            return Err(BbError::Decode {
                source,
                raw_text: text,
            })
        }
    };
    envelope.exception = failure;
    envelope.raw_text = text;
    Ok(envelope)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, text: &str, failure: Option<StatusFailure>) -> RawResponse {
        RawResponse {
            status,
            text: text.to_string(),
            failure,
        }
    }

    #[test]
    fn test_server_response_success() {
        let json = r#"{"status":200,"message":"Success!","data":{"total":42}}"#;
        let resp: ServerResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_success());
        assert!(resp.error_message().is_none());
        assert!(resp.metadata.is_none());
    }

    #[test]
    fn test_server_response_error() {
        let json = r#"{"status":401,"message":"Unauthorized","error":{"type":"auth","message":"Bad password"}}"#;
        let resp: ServerResponse = serde_json::from_str(json).unwrap();
        assert!(resp.is_error());
        assert_eq!(resp.error_message().unwrap(), "Bad password");
    }

    #[test]
    fn test_error_object_wins_over_status() {
        let json = r#"{"status":200,"message":"ok","data":[1],"error":{"type":"X","message":"Y"}}"#;
        let resp: ServerResponse<Vec<i32>> = serde_json::from_str(json).unwrap();
        assert!(resp.is_error());
        match resp.into_data() {
            Err(BbError::Server {
                status,
                error_type,
                message,
            }) => {
                assert_eq!(status, 200);
                assert_eq!(error_type.as_deref(), Some("X"));
                assert_eq!(message, "Y");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_attaches_diagnostics() {
        let body = r#"{"status":400,"message":"bad","error":{"type":"X","message":"Y"}}"#;
        let failure = StatusFailure {
            status: 400,
            message: "HTTP status client error (400 Bad Request)".into(),
        };
        let envelope: ServerResponse = decode_envelope(raw(400, body, Some(failure.clone()))).unwrap();
        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.error.as_ref().unwrap().error_type.as_deref(), Some("X"));
        assert_eq!(envelope.exception, Some(failure));
        assert_eq!(envelope.raw_text, body);
        assert!(envelope.data.is_none());
    }

    #[test]
    fn test_decode_paged_metadata() {
        let body = r#"{"status":200,"message":"ok","data":[{"guid":"a"},{"guid":"b"}],"metadata":{"limit":2,"offset":10,"total":57}}"#;
        let envelope: ServerResponse<Vec<serde_json::Value>, PaginationMetadata> =
            decode_envelope(raw(200, body, None)).unwrap();
        assert_eq!(envelope.data.as_ref().map(Vec::len), Some(2));
        assert_eq!(
            envelope.metadata,
            Some(PaginationMetadata {
                limit: 2,
                offset: 10,
                total: 57
            })
        );
        assert!(envelope.exception.is_none());
    }

    #[test]
    fn test_decode_malformed_json_is_parse_failure() {
        let result: BbResult<ServerResponse> = decode_envelope(raw(502, "<html>Bad Gateway</html>", None));
        match result {
            Err(BbError::Decode { raw_text, .. }) => assert_eq!(raw_text, "<html>Bad Gateway</html>"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_wrong_payload_shape_is_parse_failure() {
        let body = r#"{"status":200,"message":"ok","data":"pong"}"#;
        let result: BbResult<ServerResponse<Vec<i32>>> = decode_envelope(raw(200, body, None));
        assert!(matches!(result, Err(BbError::Decode { .. })));
    }

    #[test]
    fn test_diagnostic_fields_never_serialized() {
        let body = r#"{"status":200,"message":"ok","data":"pong"}"#;
        let envelope: ServerResponse<String> = decode_envelope(raw(200, body, None)).unwrap();
        let value = serde_json::to_value(&envelope).unwrap();
        assert!(value.get("raw_text").is_none());
        assert!(value.get("exception").is_none());
        assert_eq!(value["data"], "pong");
    }
}
