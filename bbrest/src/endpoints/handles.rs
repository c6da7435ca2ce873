//! Handle endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bbrest_core::error::BbResult;

use crate::body::Body;
use crate::client::{ApiClient, Call};
use crate::endpoints::{api_path, CountResponse};
use crate::query::expand_path;
use crate::response::PaginationMetadata;

/// Query parameters for listing handles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleQuery {
    #[serde(default)]
    pub with: Vec<String>,
    /// Only handles matching this address; empty matches all.
    #[serde(default)]
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for HandleQuery {
    fn default() -> Self {
        Self {
            with: Vec::new(),
            address: String::new(),
            offset: Some(0),
            limit: None,
        }
    }
}

impl ApiClient {
    /// Get total handle count.
    pub fn handle_count(&self) -> Call<'_, 'static, CountResponse> {
        self.get(api_path("/handle/count"))
    }

    /// Query handles with pagination.
    pub fn handle_query(
        &self,
        query: &HandleQuery,
    ) -> BbResult<Call<'_, 'static, Vec<Value>, PaginationMetadata>> {
        Ok(self
            .post(api_path("/handle/query"))
            .body(Body::json(query)?)
            .paged())
    }

    /// Get a single handle by address (GUID).
    pub fn handle_find(&self, address: &str) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/handle/{0}"), &[address])?;
        Ok(self.get(path))
    }
}
