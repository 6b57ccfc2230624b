use std::future::Future;
use std::sync::Arc;

use courier_common::ActivityError;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::api::SlackApi;
use super::chat::*;
use super::conversations::*;
use super::reactions::*;
use crate::activity::{ActivityContext, ActivityRegistry, RegistryError};

/// Registers every Slack activity under its stable name.
pub fn register(registry: &mut ActivityRegistry, api: Arc<SlackApi>) -> Result<(), RegistryError> {
    register_activity(registry, &api, CHAT_DELETE, |api, ctx, req: ChatDeleteRequest| async move {
        api.chat_delete(&ctx, &req).await
    })?;
    register_activity(registry, &api, CHAT_GET_PERMALINK, |api, ctx, req: ChatGetPermalinkRequest| async move {
        api.chat_get_permalink(&ctx, &req).await
    })?;
    register_activity(registry, &api, CHAT_POST_EPHEMERAL, |api, ctx, req: ChatPostEphemeralRequest| async move {
        api.chat_post_ephemeral(&ctx, &req).await
    })?;
    register_activity(registry, &api, CHAT_POST_MESSAGE, |api, ctx, req: ChatPostMessageRequest| async move {
        api.chat_post_message(&ctx, &req).await
    })?;
    register_activity(registry, &api, CHAT_UPDATE, |api, ctx, req: ChatUpdateRequest| async move {
        api.chat_update(&ctx, &req).await
    })?;

    register_activity(registry, &api, CONVERSATIONS_INFO, |api, ctx, req: ConversationsInfoRequest| async move {
        api.conversations_info(&ctx, &req).await
    })?;
    register_activity(registry, &api, CONVERSATIONS_LIST, |api, ctx, req: ConversationsListRequest| async move {
        api.conversations_list(&ctx, &req).await
    })?;

    register_activity(registry, &api, REACTIONS_ADD, |api, ctx, req: ReactionsAddRequest| async move {
        api.reactions_add(&ctx, &req).await
    })?;
    register_activity(registry, &api, REACTIONS_GET, |api, ctx, req: ReactionsGetRequest| async move {
        api.reactions_get(&ctx, &req).await
    })?;
    register_activity(registry, &api, REACTIONS_REMOVE, |api, ctx, req: ReactionsRemoveRequest| async move {
        api.reactions_remove(&ctx, &req).await
    })?;

    Ok(())
}

fn register_activity<Req, Resp, F, Fut>(
    registry: &mut ActivityRegistry,
    api: &Arc<SlackApi>,
    name: &'static str,
    f: F,
) -> Result<(), RegistryError>
where
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
    F: Fn(Arc<SlackApi>, ActivityContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, ActivityError>> + Send + 'static,
{
    let api = Arc::clone(api);
    registry.register(name, move |ctx, req| f(Arc::clone(&api), ctx, req))
}
