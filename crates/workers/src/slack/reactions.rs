use courier_common::ActivityError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::api::{is_false, SlackApi, SlackResponse};
use crate::activity::ActivityContext;

pub const REACTIONS_ADD: &str = "slack.reactions.add";
pub const REACTIONS_GET: &str = "slack.reactions.get";
pub const REACTIONS_REMOVE: &str = "slack.reactions.remove";

// https://docs.slack.dev/reference/methods/reactions.add
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsAddRequest {
    pub channel: String,
    pub name: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsAddResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,
}

// https://docs.slack.dev/reference/methods/reactions.get
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsGetRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_comment: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub full: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsGetResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,

    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Map<String, Value>>,
}

// https://docs.slack.dev/reference/methods/reactions.remove
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsRemoveRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionsRemoveResponse {
    #[serde(flatten)]
    pub envelope: SlackResponse,
}

impl SlackApi {
    pub async fn reactions_add(
        &self,
        ctx: &ActivityContext,
        req: &ReactionsAddRequest,
    ) -> Result<ReactionsAddResponse, ActivityError> {
        self.post(ctx, REACTIONS_ADD, req).await
    }

    pub async fn reactions_get(
        &self,
        ctx: &ActivityContext,
        req: &ReactionsGetRequest,
    ) -> Result<ReactionsGetResponse, ActivityError> {
        self.get(ctx, REACTIONS_GET, req).await
    }

    pub async fn reactions_remove(
        &self,
        ctx: &ActivityContext,
        req: &ReactionsRemoveRequest,
    ) -> Result<ReactionsRemoveResponse, ActivityError> {
        self.post(ctx, REACTIONS_REMOVE, req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_response_renames_type() {
        let resp: ReactionsGetResponse = serde_json::from_value(json!({
            "ok": true,
            "type": "message",
            "channel": "C1",
            "message": {"reactions": [{"name": "eyes", "count": 1}]}
        }))
        .unwrap();
        assert_eq!(resp.item_type.as_deref(), Some("message"));
        assert_eq!(resp.message.unwrap()["reactions"][0]["name"], "eyes");
    }

    #[test]
    fn remove_requires_name() {
        let err = serde_json::from_value::<ReactionsRemoveRequest>(json!({"channel": "C1"}));
        assert!(err.is_err());
    }
}
