//! Synchronous HTTP transport.
//!
//! A non-success status that still carries a body is read like any other
//! response; the status error is kept alongside it. Only a request that never
//! produces a response fails the call.

use std::sync::OnceLock;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, Url};
use tracing::{trace, warn};

use bbrest_core::constants::{APP_NAME, APP_VERSION};
use bbrest_core::error::BbResult;

use crate::body::EncodedBody;
use crate::response::StatusFailure;

/// Response body text together with the status it arrived with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub text: String,
    /// Set when the status was not a success.
    pub failure: Option<StatusFailure>,
}

/// Blocking HTTP executor shared by every call of one client.
///
/// The underlying `reqwest` client is built on first use, so an
/// [`HttpTransport`] may be created from async code and driven from a worker
/// thread.
#[derive(Debug, Default)]
pub struct HttpTransport {
    client: OnceLock<Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn client(&self) -> BbResult<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let built = Client::builder()
            .user_agent(format!("{APP_NAME}/{APP_VERSION}"))
            .build()?;
        // A concurrent first call may have won the race; either client is fine.
        Ok(self.client.get_or_init(|| built))
    }

    /// Send one request and read the whole body as text.
    ///
    /// Errors raised before a response exists are returned unmodified as
    /// [`BbError::Transport`](bbrest_core::BbError::Transport).
    pub fn execute(&self, method: Method, url: Url, body: Option<EncodedBody>) -> BbResult<RawResponse> {
        let path = url.path().to_string();
        let mut request = self.client()?.request(method.clone(), url);
        if let Some(body) = body {
            trace!(bytes = body.bytes.len(), content_type = %body.content_type, "writing request body");
            request = request
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = request.send()?;
        let status = response.status();
        let failure = response.error_for_status_ref().err().map(|e| {
            warn!("{method} {path} returned {status}");
            StatusFailure {
                status: status.as_u16(),
                message: e.without_url().to_string(),
            }
        });

        let text = response.text()?;
        Ok(RawResponse {
            status: status.as_u16(),
            text,
            failure,
        })
    }

    /// GET a raw body. A non-success status is a transport error here.
    pub fn fetch_bytes(&self, url: Url) -> BbResult<Vec<u8>> {
        let response = self.client()?.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;
        trace!(bytes = bytes.len(), "downloaded raw body");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bbrest_core::BbError;

    #[test]
    fn test_client_built_once() {
        let transport = HttpTransport::new();
        let a = transport.client().unwrap() as *const Client;
        let b = transport.client().unwrap() as *const Client;
        assert_eq!(a, b);
    }

    #[test]
    fn test_connection_refused_is_transport_error() {
        let transport = HttpTransport::new();
        let url = Url::parse("http://127.0.0.1:1/api/v1/ping?password=pw").unwrap();
        match transport.execute(Method::GET, url, None) {
            Err(BbError::Transport(e)) => assert!(e.is_connect()),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
