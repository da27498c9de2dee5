//! `ActorHandle`: the cheaply-cloneable public face of a running actor.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bridge_agent_sdk::{AgentClient, AgentOptions, AvailableCommand, Query, QueryResult};
use tokio::sync::{mpsc, oneshot, Mutex, Notify, RwLock};
use tokio::task::JoinHandle;

use crate::error::{ActorError, Result};
use crate::event::{OnExit, StreamCallback};
use crate::work::{Command, WorkItem};
use crate::worker::Worker;

/// How long `Stop()` waits for the worker to exit on its own before
/// aborting its task.
const STOP_GRACE: Duration = Duration::from_secs(5);

/// Command queue depth. Generous enough that a burst of `Submit` calls
/// from one chat never blocks on the channel itself; backpressure is
/// expected to come from the caller awaiting each `Submit`'s result.
const QUEUE_DEPTH: usize = 32;

#[derive(Clone)]
pub struct ActorHandle {
    cmd_tx: mpsc::Sender<Command>,
    interrupt_notify: Arc<Notify>,
    querying: Arc<AtomicBool>,
    available_commands: Arc<RwLock<Vec<AvailableCommand>>>,
    join: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ActorHandle {
    /// Spawn the worker task and connect the SDK client. Returns only
    /// after `connect()` completes (or fails).
    pub async fn start(client: Box<dyn AgentClient>, options: AgentOptions, idle_timeout: Duration, on_exit: OnExit) -> Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel(QUEUE_DEPTH);
        let (connected_tx, connected_rx) = oneshot::channel();
        let interrupt_notify = Arc::new(Notify::new());
        let querying = Arc::new(AtomicBool::new(false));
        let available_commands = Arc::new(RwLock::new(Vec::new()));

        let worker = Worker {
            client,
            options,
            cmd_rx,
            idle_timeout,
            interrupt_notify: interrupt_notify.clone(),
            querying: querying.clone(),
            available_commands: available_commands.clone(),
            on_exit,
        };
        let join = tokio::spawn(worker.run(connected_tx));

        match connected_rx.await {
            Ok(Ok(())) => Ok(Self {
                cmd_tx,
                interrupt_notify,
                querying,
                available_commands,
                join: Arc::new(Mutex::new(Some(join))),
            }),
            Ok(Err(e)) => Err(ActorError::StartFailed(e)),
            Err(_) => Err(ActorError::StartFailed("worker task exited before connecting".to_string())),
        }
    }

    /// Enqueue a query; resolves when the worker completes it (success or
    /// failure) or rejects immediately if the actor isn't running.
    pub async fn submit(&self, query: Query, on_stream: StreamCallback) -> Result<QueryResult> {
        let (respond_to, rx) = oneshot::channel();
        let item = WorkItem { query, on_stream, respond_to };
        self.cmd_tx
            .send(Command::Query(item))
            .await
            .map_err(|_| ActorError::NotRunning)?;
        rx.await.map_err(|_| ActorError::NotRunning)?
    }

    /// Forward an interrupt to the in-flight query, if any. A no-op if
    /// nothing is querying.
    pub fn interrupt(&self) {
        if self.querying.load(Ordering::SeqCst) {
            self.interrupt_notify.notify_one();
        }
    }

    /// Enqueue the stop sentinel and wait (bounded) for the worker to
    /// exit, aborting it on timeout.
    pub async fn stop(&self) {
        let _ = self.cmd_tx.send(Command::Stop).await;
        let handle = self.join.lock().await.take();
        if let Some(handle) = handle {
            let abort_handle = handle.abort_handle();
            if tokio::time::timeout(STOP_GRACE, handle).await.is_err() {
                tracing::warn!("actor worker did not exit within grace period, aborting");
                abort_handle.abort();
            }
        }
    }

    pub async fn available_commands(&self) -> Vec<AvailableCommand> {
        self.available_commands.read().await.clone()
    }

    pub async fn has_command(&self, name: &str) -> bool {
        self.available_commands.read().await.iter().any(|c| c.name == name)
    }
}
