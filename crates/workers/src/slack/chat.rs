use courier_common::ActivityError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::api::{is_false, SlackApi, SlackResponse};
use crate::activity::ActivityContext;

pub const CHAT_DELETE: &str = "slack.chat.delete";
pub const CHAT_GET_PERMALINK: &str = "slack.chat.getPermalink";
pub const CHAT_POST_EPHEMERAL: &str = "slack.chat.postEphemeral";
pub const CHAT_POST_MESSAGE: &str = "slack.chat.postMessage";
pub const CHAT_UPDATE: &str = "slack.chat.update";

// https://docs.slack.dev/reference/methods/chat.delete
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatDeleteRequest {
    pub channel: String,
    pub ts: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub as_user: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatDeleteResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
}

// https://docs.slack.dev/reference/methods/chat.getPermalink
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatGetPermalinkRequest {
    pub channel: String,
    pub message_ts: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatGetPermalinkResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

// https://docs.slack.dev/reference/methods/chat.postEphemeral
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPostEphemeralRequest {
    pub channel: String,
    pub user: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub link_names: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPostEphemeralResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_ts: Option<String>,
}

// https://docs.slack.dev/reference/methods/chat.postMessage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPostMessageRequest {
    pub channel: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub link_names: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    // "mrkdwn" is left out: its default is true, which an omitted bool can't express.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reply_broadcast: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub unfurl_links: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatPostMessageResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Map<String, Value>>,
}

// https://docs.slack.dev/reference/methods/chat.update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatUpdateRequest {
    pub channel: String,
    pub ts: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markdown_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub link_names: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub reply_broadcast: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatUpdateResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Map<String, Value>>,
}

impl SlackApi {
    pub async fn chat_delete(
        &self,
        ctx: &ActivityContext,
        req: &ChatDeleteRequest,
    ) -> Result<ChatDeleteResponse, ActivityError> {
        self.post(ctx, CHAT_DELETE, req).await
    }

    pub async fn chat_get_permalink(
        &self,
        ctx: &ActivityContext,
        req: &ChatGetPermalinkRequest,
    ) -> Result<ChatGetPermalinkResponse, ActivityError> {
        self.get(ctx, CHAT_GET_PERMALINK, req).await
    }

    pub async fn chat_post_ephemeral(
        &self,
        ctx: &ActivityContext,
        req: &ChatPostEphemeralRequest,
    ) -> Result<ChatPostEphemeralResponse, ActivityError> {
        self.post(ctx, CHAT_POST_EPHEMERAL, req).await
    }

    pub async fn chat_post_message(
        &self,
        ctx: &ActivityContext,
        req: &ChatPostMessageRequest,
    ) -> Result<ChatPostMessageResponse, ActivityError> {
        self.post(ctx, CHAT_POST_MESSAGE, req).await
    }

    pub async fn chat_update(
        &self,
        ctx: &ActivityContext,
        req: &ChatUpdateRequest,
    ) -> Result<ChatUpdateResponse, ActivityError> {
        self.post(ctx, CHAT_UPDATE, req).await
    }
}
