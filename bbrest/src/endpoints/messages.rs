//! Message endpoints.

use std::io::Read;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use bbrest_core::error::BbResult;

use crate::body::Body;
use crate::client::{ApiClient, Call};
use crate::endpoints::{api_path, CountResponse};
use crate::multipart::MultipartForm;
use crate::query::{expand_path, QueryParams};
use crate::response::PaginationMetadata;

/// Generate a client-side placeholder GUID for an outgoing message.
pub fn new_temp_guid() -> String {
    format!("temp-{}", Uuid::new_v4())
}

/// How the server delivers an outgoing message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SendMethod {
    #[default]
    #[serde(rename = "apple-script")]
    AppleScript,
    /// Requires the Private API helper on the server.
    #[serde(rename = "private-api")]
    PrivateApi,
}

/// Tapback reactions. The `Remove*` variants undo a previous reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "love")]
    Love,
    #[serde(rename = "like")]
    Like,
    #[serde(rename = "dislike")]
    Dislike,
    #[serde(rename = "laugh")]
    Laugh,
    #[serde(rename = "emphasize")]
    Emphasize,
    #[serde(rename = "question")]
    Question,
    #[serde(rename = "-love")]
    RemoveLove,
    #[serde(rename = "-like")]
    RemoveLike,
    #[serde(rename = "-dislike")]
    RemoveDislike,
    #[serde(rename = "-laugh")]
    RemoveLaugh,
    #[serde(rename = "-emphasize")]
    RemoveEmphasize,
    #[serde(rename = "-question")]
    RemoveQuestion,
}

/// Sort direction for message queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "ASC")]
    Ascending,
    #[default]
    #[serde(rename = "DESC")]
    Descending,
}

/// Parameters for sending a text message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTextParams {
    #[serde(rename = "chatGuid")]
    pub chat_guid: String,
    #[serde(rename = "tempGuid")]
    pub temp_guid: String,
    pub message: String,
    pub method: SendMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "effectId", skip_serializing_if = "Option::is_none")]
    pub effect_id: Option<String>,
    #[serde(rename = "selectedMessageGuid", skip_serializing_if = "Option::is_none")]
    pub selected_message_guid: Option<String>,
}

impl SendTextParams {
    /// A plain AppleScript send with a fresh temp GUID.
    pub fn new(chat_guid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            chat_guid: chat_guid.into(),
            temp_guid: new_temp_guid(),
            message: message.into(),
            method: SendMethod::default(),
            subject: None,
            effect_id: None,
            selected_message_guid: None,
        }
    }
}

/// Parameters for sending an attachment.
///
/// Sent as `multipart/form-data` with the fields `chatGuid`, `tempGuid`,
/// `name` and `attachment`, in that order. The attachment stream is read once
/// during the call.
pub struct SendAttachmentParams<R> {
    pub chat_guid: String,
    pub temp_guid: String,
    /// File name shown to the recipient.
    pub name: String,
    pub attachment: R,
}

impl<R> std::fmt::Debug for SendAttachmentParams<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendAttachmentParams")
            .field("chat_guid", &self.chat_guid)
            .field("temp_guid", &self.temp_guid)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl<R: Read + Send> SendAttachmentParams<R> {
    pub fn new(chat_guid: impl Into<String>, name: impl Into<String>, attachment: R) -> Self {
        Self {
            chat_guid: chat_guid.into(),
            temp_guid: new_temp_guid(),
            name: name.into(),
            attachment,
        }
    }

    fn into_form<'a>(self) -> MultipartForm<'a>
    where
        R: 'a,
    {
        MultipartForm::new()
            .text("chatGuid", self.chat_guid)
            .text("tempGuid", self.temp_guid)
            .text("name", self.name)
            .reader("attachment", self.attachment)
    }
}

/// Parameters for sending a reaction / tapback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReactionParams {
    #[serde(rename = "chatGuid")]
    pub chat_guid: String,
    #[serde(rename = "selectedMessageGuid")]
    pub selected_message_guid: String,
    pub reaction: Reaction,
}

/// Where clause for message queries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    pub statement: String,
    pub args: Value,
}

/// Message query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default)]
    pub with: Vec<String>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub where_clauses: Vec<WhereClause>,
    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<i64>,
    /// Epoch milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<i64>,
    #[serde(default)]
    pub sort: SortOrder,
}

fn date_range(after: Option<i64>, before: Option<i64>) -> QueryParams {
    QueryParams::new()
        .opt_param("before", before)
        .opt_param("after", after)
}

impl ApiClient {
    /// Send a text message.
    pub fn message_send_text(&self, params: &SendTextParams) -> BbResult<Call<'_, 'static, Value>> {
        Ok(self
            .post(api_path("/message/text"))
            .body(Body::json(params)?))
    }

    /// Upload and send an attachment.
    ///
    /// The call cannot outlive the reader. Pass an owned reader (for example
    /// a `File`) to use `send_async`.
    pub fn message_send_attachment<'b, R>(&self, params: SendAttachmentParams<R>) -> Call<'_, 'b, Value>
    where
        R: Read + Send + 'b,
    {
        self.post(api_path("/message/attachment"))
            .body(Body::multipart(params.into_form()))
    }

    /// React to a message. Requires the Private API.
    pub fn message_react(&self, params: &SendReactionParams) -> BbResult<Call<'_, 'static, Value>> {
        Ok(self
            .post(api_path("/message/react"))
            .body(Body::json(params)?))
    }

    /// Total message count, optionally limited to a date range.
    pub fn message_count(&self, after: Option<i64>, before: Option<i64>) -> Call<'_, 'static, CountResponse> {
        self.get(api_path("/message/count"))
            .query(date_range(after, before))
    }

    /// Number of messages updated since `after`.
    pub fn message_updated_count(&self, after: i64, before: Option<i64>) -> Call<'_, 'static, CountResponse> {
        self.get(api_path("/message/count/updated"))
            .query(date_range(Some(after), before))
    }

    /// Number of messages sent from the server's account.
    pub fn message_sent_count(&self) -> Call<'_, 'static, CountResponse> {
        self.get(api_path("/message/count/me"))
    }

    pub fn message_query(
        &self,
        query: &MessageQuery,
    ) -> BbResult<Call<'_, 'static, Vec<Value>, PaginationMetadata>> {
        Ok(self
            .post(api_path("/message/query"))
            .body(Body::json(query)?)
            .paged())
    }

    /// Get a single message by GUID.
    pub fn message_find(&self, guid: &str, with: &[&str]) -> BbResult<Call<'_, 'static, Value>> {
        let path = expand_path(&api_path("/message/{0}"), &[guid])?;
        Ok(self
            .get(path)
            .query(QueryParams::new().list_param("with", with)))
    }
}
