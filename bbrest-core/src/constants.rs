//! Wire-level constants shared by the client.

/// Client name, used for the config directory and log file names.
pub const APP_NAME: &str = "bbrest";

/// Client version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// REST API version.
pub const API_VERSION: &str = "v1";

/// Query parameter carrying the server password on every request.
pub const AUTH_QUERY_PARAM: &str = "password";

/// Content types understood by the body encoder.
pub mod content_type {
    /// Default content type for request bodies.
    pub const JSON: &str = "application/json";
    /// Content type for attachment uploads.
    pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
    /// Plain text.
    pub const TEXT_PLAIN: &str = "text/plain";
}

/// Prefix prepended to the timestamp when generating multipart boundaries.
pub const MULTIPART_BOUNDARY_PREFIX: &str = "------------------------";

/// Tunnel hosts that are always served over HTTPS.
pub const HTTPS_TUNNEL_HOSTS: &[&str] = &["ngrok.io", "trycloudflare.com", "zrok.io"];
