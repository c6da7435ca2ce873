//! Chat endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use bbrest_core::error::BbResult;

use crate::body::Body;
use crate::client::{ApiClient, Call, Download};
use crate::endpoints::api_path;
use crate::endpoints::messages::{new_temp_guid, SendMethod};
use crate::query::{expand_path, QueryParams};
use crate::response::PaginationMetadata;

/// Service a new chat is created on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatService {
    #[default]
    #[serde(rename = "iMessage")]
    IMessage,
    #[serde(rename = "SMS")]
    Sms,
}

/// Query parameters for listing chats.
///
/// The default sends only an empty `with` list and leaves paging and sort
/// order to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatQuery {
    /// Include options: "participants", "lastmessage", "sms", "archived".
    #[serde(default)]
    pub with: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Sort order: "lastmessage" sorts by latest message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

/// Parameters for creating a new chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateChatParams {
    pub addresses: Vec<String>,
    /// First message of the chat.
    pub message: String,
    pub method: SendMethod,
    pub service: ChatService,
    #[serde(rename = "tempGuid")]
    pub temp_guid: String,
}

impl CreateChatParams {
    pub fn new<I, S>(addresses: I, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            message: message.into(),
            method: SendMethod::default(),
            service: ChatService::default(),
            temp_guid: new_temp_guid(),
        }
    }
}

/// Body of the participant add/remove endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantParams {
    pub address: String,
}

/// Body of the chat update endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateChatParams {
    #[serde(rename = "displayName")]
    pub display_name: String,
}

/// Filters for a chat's message list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessagesQuery {
    pub with: Vec<String>,
    /// Epoch milliseconds.
    pub before: Option<i64>,
    /// Epoch milliseconds.
    pub after: Option<i64>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort: Option<String>,
}

impl ChatMessagesQuery {
    fn to_params(&self) -> QueryParams {
        QueryParams::new()
            .list_param("with", &self.with)
            .opt_param("before", self.before)
            .opt_param("after", self.after)
            .opt_param("limit", self.limit)
            .opt_param("offset", self.offset)
            .opt_param("sort", self.sort.as_deref())
    }
}

/// Per-service breakdown of the chat count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCountBreakdown {
    #[serde(rename = "iMessage", default)]
    pub imessage: u64,
    #[serde(rename = "SMS", alias = "sms", default)]
    pub sms: u64,
}

/// Payload of `/chat/count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatCountResponse {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub breakdown: ChatCountBreakdown,
}

impl ApiClient {
    /// Create a new chat.
    pub fn chat_create(&self, params: &CreateChatParams) -> BbResult<Call<'_, 'static, Value>> {
        Ok(self.post(api_path("/chat/new")).body(Body::json(params)?))
    }

    /// Get total chat count.
    pub fn chat_count(&self) -> Call<'_, 'static, ChatCountResponse> {
        self.get(api_path("/chat/count"))
    }

    /// Query chats with pagination and includes.
    pub fn chat_query(
        &self,
        query: &ChatQuery,
    ) -> BbResult<Call<'_, 'static, Vec<Value>, PaginationMetadata>> {
        Ok(self
            .post(api_path("/chat/query"))
            .body(Body::json(query)?)
            .paged())
    }

    /// Get messages for a chat with pagination and filtering.
    pub fn chat_messages(
        &self,
        guid: &str,
        query: &ChatMessagesQuery,
    ) -> BbResult<Call<'_, 'static, Vec<Value>>> {
        let path = expand_path(&api_path("/chat/{0}/message"), &[guid])?;
        Ok(self.get(path).query(query.to_params()))
    }

    /// Mark a chat as read. Requires the Private API.
    pub fn chat_mark_read(&self, guid: &str) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/chat/{0}/read"), &[guid])?;
        Ok(self.post(path))
    }

    /// Add a participant to a group chat.
    pub fn chat_add_participant(
        &self,
        guid: &str,
        address: &str,
    ) -> BbResult<Call<'_, 'static, Value>> {
        self.participant_call("/chat/{0}/participant/add", guid, address)
    }

    /// Remove a participant from a group chat.
    pub fn chat_remove_participant(
        &self,
        guid: &str,
        address: &str,
    ) -> BbResult<Call<'_, 'static, Value>> {
        self.participant_call("/chat/{0}/participant/remove", guid, address)
    }

    fn participant_call(
        &self,
        route: &str,
        guid: &str,
        address: &str,
    ) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path(route), &[guid])?;
        let body = Body::json(&ParticipantParams {
            address: address.to_string(),
        })?;
        Ok(self.post(path).body(body))
    }

    /// Get the group chat icon as raw bytes.
    pub fn chat_icon(&self, guid: &str) -> BbResult<Download<'_>> {
        let path = expand_path(&api_path("/chat/{0}/icon"), &[guid])?;
        Ok(self.download(path, QueryParams::new()))
    }

    /// Rename a chat. Requires the Private API.
    pub fn chat_update(&self, guid: &str, display_name: &str) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/chat/{0}"), &[guid])?;
        let body = Body::json(&UpdateChatParams {
            display_name: display_name.to_string(),
        })?;
        Ok(self.put(path).body(body))
    }

    /// Get a single chat by GUID.
    pub fn chat_find(&self, guid: &str, with: &[&str]) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/chat/{0}"), &[guid])?;
        Ok(self
            .get(path)
            .query(QueryParams::new().list_param("with", with)))
    }

    /// Delete a chat.
    pub fn chat_delete(&self, guid: &str) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/chat/{0}"), &[guid])?;
        Ok(self.delete(path))
    }
}
