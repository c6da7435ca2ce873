//! Global error types for the bbrest client.
//!
//! Every failure the request pipeline can surface is unified into a single
//! `BbError` enum. Protocol-level failures (a non-2xx status that still carries
//! a JSON envelope) are *not* errors at this level; they come back as a
//! decoded envelope with its `error` field populated.

use thiserror::Error;

/// Convenience type alias for Results using BbError.
pub type BbResult<T> = Result<T, BbError>;

/// Unified error type covering all error categories in bbrest.
#[derive(Error, Debug)]
pub enum BbError {
    // -- Configuration errors --
    /// Failed to load or parse client configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value is missing.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    // -- Request building errors --
    /// A path argument could not be substituted into its template.
    #[error("invalid argument at index {index}: {reason}")]
    InvalidArgument {
        /// Position of the offending argument.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Failed to serialize a request body.
    #[error("serialization error: {0}")]
    Serialization(String),

    // -- Network errors --
    /// No response could be obtained at all. The underlying error is kept as-is.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    // -- Response errors --
    /// The response body was not a valid envelope for the expected shape.
    #[error("failed to decode response: {source}")]
    Decode {
        /// The parse failure.
        #[source]
        source: serde_json::Error,
        /// The body that failed to parse.
        raw_text: String,
    },

    /// The server answered with an error envelope and the caller asked for it
    /// to be treated as a failure.
    #[error("server error (status {status}): {message}")]
    Server {
        /// Status code from the envelope.
        status: u16,
        /// Error type identifier from the envelope, if present.
        error_type: Option<String>,
        /// Error message from the envelope.
        message: String,
    },

    // -- File/IO errors --
    /// File system or stream operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    // -- Generic --
    /// An unexpected internal error (e.g. a request worker panicked).
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<toml::de::Error> for BbError {
    fn from(e: toml::de::Error) -> Self {
        BbError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for BbError {
    fn from(e: toml::ser::Error) -> Self {
        BbError::Config(e.to_string())
    }
}

impl BbError {
    /// Whether this is the fatal "no response at all" failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, BbError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bb_error_display() {
        let err = BbError::Config("bad value".to_string());
        assert_eq!(err.to_string(), "configuration error: bad value");
    }

    #[test]
    fn test_invalid_argument_names_index() {
        let err = BbError::InvalidArgument {
            index: 2,
            reason: "argument cannot be null".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid argument at index 2: argument cannot be null"
        );
    }

    #[test]
    fn test_decode_error_keeps_raw_text() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = BbError::Decode {
            source,
            raw_text: "{not json".into(),
        };
        assert!(err.to_string().starts_with("failed to decode response"));
        assert!(!err.is_transport());
        match err {
            BbError::Decode { raw_text, .. } => assert_eq!(raw_text, "{not json"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_toml_error_maps_to_config() {
        let err: BbError = toml::from_str::<toml::Value>("= nope").unwrap_err().into();
        assert!(matches!(err, BbError::Config(_)));
    }
}
