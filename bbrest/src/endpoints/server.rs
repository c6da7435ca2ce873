//! Server management endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bbrest_core::error::BbResult;

use crate::body::Body;
use crate::client::{ApiClient, Call};
use crate::endpoints::api_path;

/// Server info returned by `/server/info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub os_version: Option<String>,
    pub server_version: Option<String>,
    pub private_api: Option<bool>,
    pub helper_connected: Option<bool>,
    pub proxy_service: Option<String>,
    pub detected_icloud: Option<String>,
    pub local_ipv4s: Option<Vec<String>>,
    pub local_ipv6s: Option<Vec<String>>,
}

/// Server statistics (database totals).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerTotals {
    #[serde(default)]
    pub handles: u64,
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub chats: u64,
    #[serde(default)]
    pub attachments: u64,
}

impl ServerTotals {
    /// Sum of every entity count.
    pub fn total(&self) -> u64 {
        self.handles + self.messages + self.chats + self.attachments
    }
}

/// Server media statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTotals {
    #[serde(default)]
    pub images: u64,
    #[serde(default)]
    pub videos: u64,
    #[serde(default)]
    pub locations: u64,
}

impl MediaTotals {
    pub fn total(&self) -> u64 {
        self.images + self.videos + self.locations
    }
}

/// Media statistics for one chat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMediaTotals {
    #[serde(rename = "chatGuid")]
    pub chat_guid: String,
    #[serde(rename = "groupName", default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub totals: MediaTotals,
}

/// Severity of a server alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    Info,
    Success,
    Error,
    Warn,
}

/// An alert raised by the server, returned by `/server/alert`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAlert {
    pub id: i64,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub value: String,
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

/// Body of `/server/alert/read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAlertsReadRequest {
    pub ids: Vec<i64>,
}

impl ApiClient {
    /// Get server info (version, capabilities, local IPs).
    pub fn server_info(&self) -> Call<'_, 'static, ServerInfo> {
        self.get(api_path("/server/info"))
    }

    /// Get server logs as one block of text.
    pub fn server_logs(&self) -> Call<'_, 'static, String> {
        self.get(api_path("/server/logs"))
    }

    /// Soft restart the server (restart services).
    pub fn server_restart_soft(&self) -> Call<'_, 'static, serde_json::Value> {
        self.get(api_path("/server/restart/soft"))
    }

    /// Hard restart the server (full application restart).
    pub fn server_restart_hard(&self) -> Call<'_, 'static, serde_json::Value> {
        self.get(api_path("/server/restart/hard"))
    }

    pub fn server_alerts(&self) -> Call<'_, 'static, Vec<ServerAlert>> {
        self.get(api_path("/server/alert"))
    }

    /// Mark the given alerts as read. Alerts are always addressed by ID.
    pub fn server_mark_alerts_read(
        &self,
        request: &MarkAlertsReadRequest,
    ) -> BbResult<Call<'_, 'static, serde_json::Value>> {
        Ok(self
            .post(api_path("/server/alert/read"))
            .body(Body::json(request)?))
    }

    /// Get server database totals.
    pub fn server_totals(&self) -> Call<'_, 'static, ServerTotals> {
        self.get(api_path("/server/statistics/totals"))
    }

    /// Get server media totals.
    pub fn server_media_totals(&self) -> Call<'_, 'static, MediaTotals> {
        self.get(api_path("/server/statistics/media"))
    }

    /// Get server media totals by chat.
    pub fn server_media_totals_by_chat(&self) -> Call<'_, 'static, Vec<ChatMediaTotals>> {
        self.get(api_path("/server/statistics/media/chat"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_info_deserialize() {
        let json = serde_json::json!({
            "os_version": "14.0",
            "server_version": "1.9.0",
            "private_api": true,
            "local_ipv4s": ["192.168.1.100"]
        });
        let info: ServerInfo = serde_json::from_value(json).unwrap();
        assert_eq!(info.server_version.as_deref(), Some("1.9.0"));
        assert_eq!(info.private_api, Some(true));
        assert!(info.helper_connected.is_none());
    }

    #[test]
    fn test_totals_sum() {
        let totals: ServerTotals = serde_json::from_value(serde_json::json!({
            "handles": 3, "messages": 100, "chats": 7, "attachments": 20
        }))
        .unwrap();
        assert_eq!(totals.total(), 130);

        let media: MediaTotals = serde_json::from_value(serde_json::json!({"images": 4, "videos": 1})).unwrap();
        assert_eq!(media.total(), 5);
    }

    #[test]
    fn test_alert_deserialize() {
        let alert: ServerAlert = serde_json::from_value(serde_json::json!({
            "id": 12,
            "type": "warn",
            "value": "Private API helper disconnected",
            "isRead": false,
            "created": "2024-03-01T10:00:00.000Z",
            "updated": "2024-03-01T10:05:00.000Z"
        }))
        .unwrap();
        assert_eq!(alert.alert_type, AlertType::Warn);
        assert!(!alert.is_read);
        assert!(alert.updated > alert.created);
    }

    #[test]
    fn test_media_by_chat_deserialize() {
        let entries: Vec<ChatMediaTotals> = serde_json::from_value(serde_json::json!([
            {"chatGuid": "iMessage;+;chat1", "groupName": "Family", "totals": {"images": 2, "videos": 0, "locations": 1}}
        ]))
        .unwrap();
        assert_eq!(entries[0].group_name.as_deref(), Some("Family"));
        assert_eq!(entries[0].totals.total(), 3);
    }
}
