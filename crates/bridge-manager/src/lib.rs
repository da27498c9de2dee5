//! Client Manager: owns the `user_id → Actor` map, mediates reconnect
//! policy against the Session Repository and Session Resolver, and is the
//! only thing above `bridge-actor` that chat-handling code talks to.

pub mod error;
pub mod manager;
pub mod request;

pub use error::{ManagerError, Result};
pub use manager::{ClientFactory, ClientManager};
pub use request::ConnectRequest;

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_agent_sdk::{MockAgentClient, SdkMessage};
    use bridge_history::SessionResolver;
    use bridge_options::OptionsBuilder;
    use bridge_store::SessionRepository;
    use std::sync::Arc;
    use std::time::Duration;

    async fn manager() -> (ClientManager, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let pool = sqlx::sqlite::SqlitePoolOptions::new().connect("sqlite::memory:").await.unwrap();
        let repo = SessionRepository::from_pool(pool).await.unwrap();
        let resolver = SessionResolver::new(tmp.path().join("history.jsonl"), tmp.path().to_path_buf());
        let builder = OptionsBuilder::from_agent_config_dir(tmp.path(), "preset");
        let factory: ClientFactory = Arc::new(|| Box::new(MockAgentClient::new().with_response(vec![
            SdkMessage::Result { result: "ok".into(), session_id: "s1".into(), total_cost_usd: None },
        ])));
        let mgr = ClientManager::new(factory, builder, repo, resolver, Duration::from_secs(60));
        (mgr, tmp)
    }

    #[tokio::test]
    async fn get_or_connect_creates_and_reuses_one_actor_per_user() {
        let (mgr, tmp) = manager().await;
        let req = ConnectRequest::new(1, tmp.path().to_path_buf());
        let first = mgr.get_or_connect(req.clone()).await.unwrap();
        let second = mgr.get_or_connect(req).await.unwrap();
        assert!(first.available_commands().await == second.available_commands().await);
        mgr.disconnect(1).await;
    }

    #[tokio::test]
    async fn directory_change_evicts_and_reconnects() {
        let (mgr, tmp) = manager().await;
        let req1 = ConnectRequest::new(1, tmp.path().join("a"));
        let req2 = ConnectRequest::new(1, tmp.path().join("b"));
        mgr.get_or_connect(req1).await.unwrap();
        mgr.get_or_connect(req2).await.unwrap();
        mgr.disconnect(1).await;
    }

    #[tokio::test]
    async fn disconnect_all_clears_the_map() {
        let (mgr, tmp) = manager().await;
        mgr.get_or_connect(ConnectRequest::new(1, tmp.path().to_path_buf())).await.unwrap();
        mgr.get_or_connect(ConnectRequest::new(2, tmp.path().to_path_buf())).await.unwrap();
        mgr.disconnect_all().await;
        assert!(mgr.get_available_commands(1).await.is_empty());
        assert!(mgr.get_available_commands(2).await.is_empty());
    }
}
