//! `ClientManager`: owns the `user_id → Actor` map.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bridge_actor::{ActorHandle, OnExit, StreamCallback};
use bridge_agent_sdk::{AgentClient, AvailableCommand, Query, QueryResult};
use bridge_history::SessionResolver;
use bridge_options::{OptionsBuilder, OptionsInput};
use bridge_store::SessionRepository;
use tokio::sync::RwLock;

use crate::error::{ManagerError, Result};
use crate::request::ConnectRequest;

/// Builds a fresh `AgentClient` for each new actor; boxed so the manager
/// doesn't need to be generic over the concrete SDK transport.
pub type ClientFactory = Arc<dyn Fn() -> Box<dyn AgentClient> + Send + Sync>;

struct ManagedActor {
    handle: ActorHandle,
    directory: std::path::PathBuf,
}

pub struct ClientManager {
    clients: Arc<RwLock<HashMap<i64, ManagedActor>>>,
    client_factory: ClientFactory,
    options_builder: OptionsBuilder,
    session_repo: SessionRepository,
    session_resolver: SessionResolver,
    idle_timeout: Duration,
}

impl ClientManager {
    pub fn new(
        client_factory: ClientFactory,
        options_builder: OptionsBuilder,
        session_repo: SessionRepository,
        session_resolver: SessionResolver,
        idle_timeout: Duration,
    ) -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            client_factory,
            options_builder,
            session_repo,
            session_resolver,
            idle_timeout,
        }
    }

    /// Return a running actor bound to `req.directory`, reconnecting or
    /// creating one as needed.
    pub async fn get_or_connect(&self, req: ConnectRequest) -> Result<ActorHandle> {
        if !req.force_new {
            let clients = self.clients.read().await;
            if let Some(managed) = clients.get(&req.user_id) {
                if managed.directory == req.directory {
                    let handle = managed.handle.clone();
                    drop(clients);
                    self.session_repo
                        .upsert(req.user_id, None, &req.directory.to_string_lossy(), None, None)
                        .await?;
                    return Ok(handle);
                }
            }
        }

        let stale = {
            let mut clients = self.clients.write().await;
            clients.remove(&req.user_id)
        };
        if let Some(stale) = stale {
            stale.handle.stop().await;
        }

        let (resolved_session_id, model, betas) = self.resolve_connect_values(&req).await;

        let options = self.options_builder.build(OptionsInput {
            cwd: req.directory.clone(),
            session_id: resolved_session_id.clone(),
            model: model.clone(),
            betas: betas.clone(),
            approved_directory: req.approved_directory.clone(),
        })?;

        let client = (self.client_factory)();
        let on_exit = self.self_remove_callback(req.user_id);
        let handle = ActorHandle::start(client, options, self.idle_timeout, on_exit)
            .await
            .map_err(|e| ManagerError::StartFailed { user_id: req.user_id, reason: e.to_string() })?;

        self.clients
            .write()
            .await
            .insert(req.user_id, ManagedActor { handle: handle.clone(), directory: req.directory.clone() });

        self.session_repo
            .upsert(
                req.user_id,
                resolved_session_id.as_deref(),
                &req.directory.to_string_lossy(),
                model.as_deref(),
                betas.as_deref(),
            )
            .await?;

        Ok(handle)
    }

    /// Step 3 of `GetOrConnect`: when the caller didn't pin a session id,
    /// prefer a matching Session Repository row over the Session
    /// Resolver's on-disk history scan.
    async fn resolve_connect_values(&self, req: &ConnectRequest) -> (Option<String>, Option<String>, Option<Vec<String>>) {
        if req.force_new || req.session_id.is_some() {
            return (req.session_id.clone(), req.model.clone(), req.betas.clone());
        }

        let directory = req.directory.to_string_lossy().to_string();
        if let Ok(Some(record)) = self.session_repo.get_by_user(req.user_id).await {
            if record.directory == directory {
                let model = req.model.clone().or(record.model);
                let betas = req.betas.clone().or(Some(record.betas));
                return (record.session_id, model, betas);
            }
        }

        let resolved = self.session_resolver.get_latest_session(&req.directory);
        (resolved, req.model.clone(), req.betas.clone())
    }

    fn self_remove_callback(&self, user_id: i64) -> OnExit {
        let clients = self.clients.clone();
        Arc::new(move || {
            let clients = clients.clone();
            tokio::spawn(async move {
                clients.write().await.remove(&user_id);
            });
        })
    }

    /// Disconnect the current actor (if any) and reconnect with an
    /// explicit session id.
    pub async fn switch_session(&self, mut req: ConnectRequest, session_id: String) -> Result<ActorHandle> {
        if let Some(stale) = self.clients.write().await.remove(&req.user_id) {
            stale.handle.stop().await;
        }
        req.session_id = Some(session_id);
        req.force_new = true;
        self.get_or_connect(req).await
    }

    /// Persist a session id the SDK minted or changed mid-conversation.
    pub async fn update_session_id(&self, user_id: i64, directory: &Path, new_session_id: &str) -> Result<()> {
        self.session_repo
            .upsert(user_id, Some(new_session_id), &directory.to_string_lossy(), None, None)
            .await?;
        Ok(())
    }

    pub async fn set_model(&self, user_id: i64, directory: &Path, model: &str, betas: Option<&[String]>) -> Result<()> {
        self.session_repo
            .upsert(user_id, None, &directory.to_string_lossy(), Some(model), betas)
            .await?;
        Ok(())
    }

    pub async fn interrupt(&self, user_id: i64) {
        if let Some(managed) = self.clients.read().await.get(&user_id) {
            managed.handle.interrupt();
        }
    }

    pub async fn disconnect(&self, user_id: i64) {
        if let Some(managed) = self.clients.write().await.remove(&user_id) {
            managed.handle.stop().await;
        }
    }

    pub async fn disconnect_all(&self) {
        let all: Vec<ManagedActor> = self.clients.write().await.drain().map(|(_, v)| v).collect();
        for managed in all {
            managed.handle.stop().await;
        }
    }

    pub async fn is_connected(&self, user_id: i64) -> bool {
        self.clients.read().await.contains_key(&user_id)
    }

    pub async fn get_available_commands(&self, user_id: i64) -> Vec<AvailableCommand> {
        let handle = { self.clients.read().await.get(&user_id).map(|m| m.handle.clone()) };
        match handle {
            Some(handle) => handle.available_commands().await,
            None => Vec::new(),
        }
    }

    /// Run one query against the actor for `user_id`, creating it if
    /// necessary.
    pub async fn submit(&self, req: ConnectRequest, query: Query, on_stream: StreamCallback) -> Result<QueryResult> {
        let user_id = req.user_id;
        let handle = self.get_or_connect(req).await?;
        let result = handle
            .submit(query, on_stream)
            .await
            .map_err(|e| ManagerError::StartFailed { user_id, reason: e.to_string() })?;
        Ok(result)
    }
}
