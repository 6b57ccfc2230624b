//! Shared shape of every Slack activity: resolve credentials, make exactly
//! one Web API call, translate the `ok`/`error` envelope.

use courier_common::ActivityError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::activity::ActivityContext;
use crate::broker::{Credentials, LinkClient};

pub const PROVIDER: &str = "slack";

const COMMERCIAL_BASE_URL: &str = "https://slack.com/api/";
const GOV_BASE_URL: &str = "https://slack-gov.com/api/";
const TOKEN_FIELD: &str = "bot_token";

/// Envelope fields present in every Web API response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlackResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_cursor: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Get,
    Post,
}

pub struct SlackApi {
    link: LinkClient,
    http: Client,
    base_url: Option<String>,
}

impl SlackApi {
    pub fn new(link: LinkClient) -> Self {
        Self {
            link,
            http: Client::new(),
            base_url: None,
        }
    }

    /// Pins the API base URL instead of deriving it from the link template.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        if !url.ends_with('/') {
            url.push('/');
        }
        self.base_url = Some(url);
        self
    }

    pub(crate) async fn post<Req, Resp>(
        &self,
        ctx: &ActivityContext,
        name: &'static str,
        req: &Req,
    ) -> Result<Resp, ActivityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.call(ctx, name, Verb::Post, req).await
    }

    pub(crate) async fn get<Req, Resp>(
        &self,
        ctx: &ActivityContext,
        name: &'static str,
        req: &Req,
    ) -> Result<Resp, ActivityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        self.call(ctx, name, Verb::Get, req).await
    }

    async fn call<Req, Resp>(
        &self,
        ctx: &ActivityContext,
        name: &'static str,
        verb: Verb,
        req: &Req,
    ) -> Result<Resp, ActivityError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let (template, credentials) = self.link.fetch_link_data(ctx).await?;
        let token = bot_token(&credentials)?;

        let url = format!("{}{}", self.base_url(&template), method_of(name));
        let builder = match verb {
            Verb::Get => self.http.get(&url).query(req),
            Verb::Post => self.http.post(&url).json(req),
        };
        let builder = builder.bearer_auth(token);

        let body = ctx
            .guard(async {
                let resp = builder.send().await.map_err(|e| transport_error(name, e))?;
                let resp = resp.error_for_status().map_err(|e| transport_error(name, e))?;
                resp.json::<Value>().await.map_err(|e| transport_error(name, e))
            })
            .await?;

        let body = check_ok(name, body)?;
        serde_json::from_value(body).map_err(|e| {
            tracing::error!(activity = name, error = %e, "unexpected Slack response shape");
            ActivityError::retryable("InvalidResponse", format!("{name}: undecodable response: {e}"))
        })
    }

    fn base_url(&self, template: &str) -> &str {
        match &self.base_url {
            Some(url) => url,
            None => base_url_for(template),
        }
    }
}

/// GovSlack links talk to a separate API host.
pub fn base_url_for(template: &str) -> &'static str {
    if template.contains("gov") {
        GOV_BASE_URL
    } else {
        COMMERCIAL_BASE_URL
    }
}

/// `slack.chat.postMessage` -> `chat.postMessage`
pub fn method_of(name: &str) -> &str {
    name.strip_prefix("slack.").unwrap_or(name)
}

fn bot_token(credentials: &Credentials) -> Result<&str, ActivityError> {
    match credentials.get(TOKEN_FIELD) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => {
            tracing::warn!(field = TOKEN_FIELD, "Slack link has no bot token");
            Err(ActivityError::non_retryable(
                "MissingCredential",
                format!("Slack link credentials have no {TOKEN_FIELD:?} field"),
            ))
        }
    }
}

fn transport_error(name: &str, e: reqwest::Error) -> ActivityError {
    tracing::error!(activity = name, error = %e, status = ?e.status(), "Slack API transport error");
    ActivityError::retryable("HTTPError", format!("{name}: {e}"))
}

/// `ok: false` is an explicit rejection: retrying the same request cannot help.
fn check_ok(name: &str, body: Value) -> Result<Value, ActivityError> {
    if body.get("ok").and_then(Value::as_bool).unwrap_or(false) {
        return Ok(body);
    }
    let error = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown_error")
        .to_string();
    tracing::warn!(activity = name, %error, "Slack API error");
    Err(ActivityError::non_retryable("SlackAPIError", error).with_detail(method_of(name).to_string()))
}
