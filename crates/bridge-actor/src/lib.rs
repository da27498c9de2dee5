//! User Client Actor: pins one agent SDK client to one long-lived task so
//! `connect`/`query`/`disconnect` always run on the task that entered the
//! SDK's cancellation scope, no matter which task calls `Submit`/`Stop`.

mod error;
mod event;
mod handle;
mod work;
mod worker;

pub use error::{ActorError, Result};
pub use event::{ActorEvent, OnExit, StreamCallback};
pub use handle::ActorHandle;

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_agent_sdk::{
        AgentOptions, AssistantBlock, ContentBlock, MockAgentClient, Query, SdkMessage, ServerInfo,
    };
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    fn options() -> AgentOptions {
        AgentOptions {
            cwd: "/tmp".into(),
            resume_session_id: None,
            model: None,
            betas: vec![],
            permission_mode: "bypass",
            system_prompt: String::new(),
            permission_callback: None,
        }
    }

    #[tokio::test]
    async fn start_fails_propagate_synchronously() {
        let client = Box::new(MockAgentClient::new().fail_connect("boom"));
        let on_exit: OnExit = std::sync::Arc::new(|| {});
        let err = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap_err();
        assert!(matches!(err, ActorError::StartFailed(_)));
    }

    #[tokio::test]
    async fn submit_drives_on_stream_and_completes_result() {
        let client = Box::new(MockAgentClient::new().with_response(vec![
            SdkMessage::Assistant { blocks: vec![AssistantBlock::Text { text: "hi".into() }] },
            SdkMessage::Result { result: "hi".into(), session_id: "s1".into(), total_cost_usd: Some(0.02) },
        ]));
        let on_exit: OnExit = std::sync::Arc::new(|| {});
        let actor = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap();

        let events: Arc<Mutex<Vec<ActorEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let events2 = events.clone();
        let on_stream: StreamCallback = Arc::new(move |ev| events2.lock().unwrap().push(ev));

        let result = actor.submit(Query::text("hello"), on_stream).await.unwrap();
        assert_eq!(result.response_text, "hi");
        assert_eq!(result.session_id.as_deref(), Some("s1"));
        assert_eq!(events.lock().unwrap().len(), 1);

        actor.stop().await;
    }

    #[tokio::test]
    async fn on_exit_fires_after_stop() {
        let client = Box::new(MockAgentClient::new());
        let fired = Arc::new(AtomicU32::new(0));
        let fired2 = fired.clone();
        let on_exit: OnExit = std::sync::Arc::new(move || {
            fired2.fetch_add(1, Ordering::SeqCst);
        });
        let actor = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap();
        actor.stop().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn interrupt_without_inflight_query_is_noop() {
        let client = Box::new(MockAgentClient::new());
        let on_exit: OnExit = std::sync::Arc::new(|| {});
        let actor = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap();
        actor.interrupt();
        actor.stop().await;
    }

    #[tokio::test]
    async fn available_commands_are_cached_after_connect() {
        let info = ServerInfo {
            commands: vec![bridge_agent_sdk::AvailableCommand {
                name: "review".to_string(),
                description: "review code".to_string(),
                argument_hint: None,
            }],
        };
        let client = Box::new(MockAgentClient::new().with_server_info(info));
        let on_exit: OnExit = std::sync::Arc::new(|| {});
        let actor = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap();
        assert!(actor.has_command("review").await);
        assert!(!actor.has_command("deploy").await);
        actor.stop().await;
    }

    #[tokio::test]
    async fn query_with_attachment_orders_blocks_text_first() {
        let client = Box::new(MockAgentClient::new().with_response(vec![SdkMessage::Result {
            result: "ok".into(),
            session_id: "s1".into(),
            total_cost_usd: None,
        }]));
        let on_exit: OnExit = std::sync::Arc::new(|| {});
        let actor = ActorHandle::start(client, options(), Duration::from_secs(60), on_exit)
            .await
            .unwrap();
        let query = Query::with_attachments(
            Some("look".into()),
            vec![bridge_agent_sdk::Attachment {
                content_block: ContentBlock::image_base64("image/png", "aaaa"),
                filename: "a.png".into(),
                size_bytes: 4,
                media_type: "image/png".into(),
            }],
        );
        let on_stream: StreamCallback = Arc::new(|_| {});
        let result = actor.submit(query, on_stream).await.unwrap();
        assert_eq!(result.response_text, "ok");
        actor.stop().await;
    }
}
