//! bbrest - typed client for the BlueBubbles server REST API.
//!
//! Every endpoint goes through one pipeline: path and query building, body
//! encoding (JSON, multipart or raw), a blocking HTTP transport, and decoding
//! into a [`ServerResponse`] envelope. Each call can be sent on the current
//! thread or awaited from a tokio runtime. The synchronous `send` panics when
//! called from inside a runtime; use `send_async` there.
//!
//! ```no_run
//! # fn main() -> bbrest_core::BbResult<()> {
//! let client = bbrest::ApiClient::from_url("http://localhost:1234", "password")?;
//! let pong = client.ping().send()?;
//! assert!(pong.is_success());
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod client;
pub mod endpoints;
pub mod multipart;
pub mod query;
pub mod response;
pub mod transport;

// Re-export key types
pub use body::Body;
pub use client::{ApiClient, ApiRequest, Call, Download, ResponseFuture};
pub use multipart::MultipartForm;
pub use query::QueryParams;
pub use response::{PaginationMetadata, ServerError, ServerResponse, StatusFailure};
