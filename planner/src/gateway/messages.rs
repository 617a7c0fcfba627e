//! Plan gateway messages
//!
//! Commands and responses for the actor pattern.

use docstore::DocPath;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::domain::{PlanPatch, StudyPlan, WeekSummary};

/// Errors from plan persistence
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Invalid document key: {0}")]
    InvalidKey(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Channel error")]
    ChannelError,
}

/// Response from gateway operations
pub type GatewayResponse<T> = Result<T, GatewayError>;

/// Commands sent to the PlanGateway actor
#[derive(Debug)]
pub enum GatewayCommand {
    Read {
        key: DocPath,
        reply: oneshot::Sender<GatewayResponse<Option<StudyPlan>>>,
    },
    WriteFull {
        key: DocPath,
        plan: Box<StudyPlan>,
        reply: oneshot::Sender<GatewayResponse<()>>,
    },
    WriteMerge {
        key: DocPath,
        patch: PlanPatch,
        reply: oneshot::Sender<GatewayResponse<()>>,
    },
    ListWeeks {
        user: String,
        reply: oneshot::Sender<GatewayResponse<Vec<WeekSummary>>>,
    },
    Shutdown,
}
