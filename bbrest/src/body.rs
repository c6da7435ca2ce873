//! Request body encoding.
//!
//! The content kind decides the strategy: JSON bodies are serialized from
//! their serde schema, multipart bodies go through the hand-rolled writer in
//! [`crate::multipart`], and anything else is sent as raw bytes or text.

use std::fmt;

use serde::Serialize;

use bbrest_core::constants::content_type;
use bbrest_core::error::{BbError, BbResult};

use crate::multipart::{generate_boundary, MultipartForm};

/// Payload of a raw (non-JSON, non-multipart) body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawData {
    Bytes(Vec<u8>),
    Text(String),
}

/// A request body together with its declared content kind.
#[derive(Debug)]
pub enum Body<'a> {
    /// `application/json`.
    Json(serde_json::Value),
    /// `multipart/form-data`; the boundary is chosen at encode time.
    Multipart(MultipartForm<'a>),
    /// Any other content type.
    Raw {
        content_type: String,
        data: RawData,
    },
}

/// Serialized body bytes and the final `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl<'a> Body<'a> {
    /// Serialize a request DTO through its serde schema.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> BbResult<Self> {
        serde_json::to_value(value)
            .map(Body::Json)
            .map_err(|e| BbError::Serialization(format!("failed to serialize request body: {e}")))
    }

    pub fn multipart(form: MultipartForm<'a>) -> Self {
        Body::Multipart(form)
    }

    /// Raw bytes sent as the entire body.
    pub fn bytes(content_type: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Body::Raw {
            content_type: content_type.into(),
            data: RawData::Bytes(bytes.into()),
        }
    }

    /// A value's text sent as the entire body.
    pub fn text(content_type: impl Into<String>, value: impl fmt::Display) -> Self {
        Body::Raw {
            content_type: content_type.into(),
            data: RawData::Text(value.to_string()),
        }
    }

    /// The declared content kind, without any boundary parameter.
    pub fn content_kind(&self) -> &str {
        match self {
            Body::Json(_) => content_type::JSON,
            Body::Multipart(_) => content_type::MULTIPART_FORM_DATA,
            Body::Raw { content_type, .. } => content_type,
        }
    }

    /// Produce the bytes to send and the `Content-Type` header.
    pub fn encode(self) -> BbResult<EncodedBody> {
        match self {
            Body::Json(value) => {
                let bytes = serde_json::to_vec(&value).map_err(|e| {
                    BbError::Serialization(format!("failed to serialize request body: {e}"))
                })?;
                Ok(EncodedBody {
                    content_type: content_type::JSON.to_string(),
                    bytes,
                })
            }
            Body::Multipart(form) => {
                let boundary = generate_boundary();
                let mut bytes = Vec::new();
                form.write_to(&mut bytes, &boundary)?;
                Ok(EncodedBody {
                    content_type: format!(
                        "{}; boundary={boundary}",
                        content_type::MULTIPART_FORM_DATA
                    ),
                    bytes,
                })
            }
            Body::Raw { content_type, data } => {
                let bytes = match data {
                    RawData::Bytes(bytes) => bytes,
                    RawData::Text(text) => text.into_bytes(),
                };
                Ok(EncodedBody { content_type, bytes })
            }
        }
    }
}
