//! The work item exchanged over the actor's command queue.

use bridge_agent_sdk::{Query, QueryResult};
use tokio::sync::oneshot;

use crate::error::ActorError;
use crate::event::StreamCallback;

pub struct WorkItem {
    pub query: Query,
    pub on_stream: StreamCallback,
    pub respond_to: oneshot::Sender<Result<QueryResult, ActorError>>,
}

/// A single enum carrying both ordinary work and the stop sentinel keeps
/// FIFO ordering: a `Stop` enqueued after N queries is processed after
/// all N, never jumping the line.
pub enum Command {
    Query(WorkItem),
    Stop,
}
