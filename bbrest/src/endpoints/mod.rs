//! API endpoint modules organized by category.
//!
//! Each module adds typed methods to [`ApiClient`](crate::ApiClient) for a
//! group of related server endpoints. Every method returns a
//! [`Call`](crate::Call) (or a [`Download`](crate::Download)), so each
//! endpoint can be sent synchronously or awaited.

use serde::{Deserialize, Serialize};

use bbrest_core::constants::API_VERSION;

pub mod general;
pub mod server;
pub mod chats;
pub mod messages;
pub mod attachments;
pub mod handles;
pub mod contacts;
pub mod mac;

/// `total` payload shared by the attachment, handle and message count endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
    #[serde(default)]
    pub total: u64,
}

/// Prefix a route with `/api/<version>`.
pub(crate) fn api_path(route: &str) -> String {
    format!("/api/{API_VERSION}{route}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_path() {
        assert_eq!(api_path("/chat/{0}"), "/api/v1/chat/{0}");
    }

    #[test]
    fn test_count_response_missing_total() {
        let count: CountResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(count.total, 0);
    }
}
