use courier_common::ActivityError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::api::{is_false, SlackApi, SlackResponse};
use crate::activity::ActivityContext;

pub const CONVERSATIONS_INFO: &str = "slack.conversations.info";
pub const CONVERSATIONS_LIST: &str = "slack.conversations.list";

// https://docs.slack.dev/reference/methods/conversations.info
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationsInfoRequest {
    pub channel: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub include_locale: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub include_num_members: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationsInfoResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<Map<String, Value>>,
}

// https://docs.slack.dev/reference/methods/conversations.list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationsListRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub exclude_archived: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Comma-separated: public_channel, private_channel, mpim, im.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationsListResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<Map<String, Value>>,
}

impl SlackApi {
    pub async fn conversations_info(
        &self,
        ctx: &ActivityContext,
        req: &ConversationsInfoRequest,
    ) -> Result<ConversationsInfoResponse, ActivityError> {
        self.get(ctx, CONVERSATIONS_INFO, req).await
    }

    pub async fn conversations_list(
        &self,
        ctx: &ActivityContext,
        req: &ConversationsListRequest,
    ) -> Result<ConversationsListResponse, ActivityError> {
        self.get(ctx, CONVERSATIONS_LIST, req).await
    }
}
