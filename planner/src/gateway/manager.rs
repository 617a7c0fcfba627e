//! PlanGateway actor
//!
//! A tokio task owns the `docstore::Store`; handles send commands over an
//! mpsc channel and wait for the reply on a oneshot.

use async_trait::async_trait;
use docstore::{DocPath, Store};
use serde_json::Value;
use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::{GatewayCommand, GatewayError, GatewayResponse, PlanStore, plans_collection};
use crate::catalog::Day;
use crate::domain::{PlanPatch, StudyPlan, WeekSummary};

/// Handle to send commands to the PlanGateway actor
#[derive(Clone)]
pub struct PlanGateway {
    tx: mpsc::Sender<GatewayCommand>,
}

impl PlanGateway {
    /// Open the store in `store_dir` and spawn the actor
    pub fn spawn(store_dir: impl AsRef<Path>) -> GatewayResponse<Self> {
        debug!(store_dir = %store_dir.as_ref().display(), "spawn: called");
        let store = Store::open(store_dir.as_ref()).map_err(|e| GatewayError::Store(e.to_string()))?;
        Ok(Self::with_store(store))
    }

    /// Spawn the actor over a throwaway in-memory store
    pub fn spawn_in_memory() -> GatewayResponse<Self> {
        debug!("spawn_in_memory: called");
        let store = Store::open_in_memory().map_err(|e| GatewayError::Store(e.to_string()))?;
        Ok(Self::with_store(store))
    }

    /// Spawn the actor over an already opened store
    pub fn with_store(store: Store) -> Self {
        let (tx, rx) = mpsc::channel(64);
        tokio::spawn(actor_loop(store, rx));
        info!("PlanGateway spawned");
        Self { tx }
    }

    /// Shutdown the PlanGateway
    pub async fn shutdown(&self) -> GatewayResponse<()> {
        debug!("shutdown: called");
        self.tx
            .send(GatewayCommand::Shutdown)
            .await
            .map_err(|_| GatewayError::ChannelError)
    }
}

#[async_trait]
impl PlanStore for PlanGateway {
    async fn read(&self, key: &DocPath) -> GatewayResponse<Option<StudyPlan>> {
        debug!(%key, "read: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(GatewayCommand::Read {
                key: key.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::ChannelError)?;
        reply_rx.await.map_err(|_| GatewayError::ChannelError)?
    }

    async fn write_full(&self, key: &DocPath, plan: &StudyPlan) -> GatewayResponse<()> {
        debug!(%key, week = plan.week, "write_full: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(GatewayCommand::WriteFull {
                key: key.clone(),
                plan: Box::new(plan.clone()),
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::ChannelError)?;
        reply_rx.await.map_err(|_| GatewayError::ChannelError)?
    }

    async fn write_merge(&self, key: &DocPath, patch: &PlanPatch) -> GatewayResponse<()> {
        debug!(%key, "write_merge: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(GatewayCommand::WriteMerge {
                key: key.clone(),
                patch: patch.clone(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::ChannelError)?;
        reply_rx.await.map_err(|_| GatewayError::ChannelError)?
    }

    async fn list_weeks(&self, user: &str) -> GatewayResponse<Vec<WeekSummary>> {
        debug!(%user, "list_weeks: called");
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.tx
            .send(GatewayCommand::ListWeeks {
                user: user.to_string(),
                reply: reply_tx,
            })
            .await
            .map_err(|_| GatewayError::ChannelError)?;
        reply_rx.await.map_err(|_| GatewayError::ChannelError)?
    }
}

/// The actor's main loop
async fn actor_loop(mut store: Store, mut rx: mpsc::Receiver<GatewayCommand>) {
    debug!("PlanGateway actor started");

    while let Some(cmd) = rx.recv().await {
        match cmd {
            GatewayCommand::Read { key, reply } => {
                debug!(%key, "actor_loop: Read command");
                let _ = reply.send(read_plan(&store, &key));
            }

            GatewayCommand::WriteFull { key, plan, reply } => {
                debug!(%key, "actor_loop: WriteFull command");
                let result = serde_json::to_value(&*plan)
                    .map_err(|e| GatewayError::Deserialization(e.to_string()))
                    .and_then(|data| store.set(&key, data).map_err(|e| GatewayError::Store(e.to_string())));
                let _ = reply.send(result);
            }

            GatewayCommand::WriteMerge { key, patch, reply } => {
                debug!(%key, "actor_loop: WriteMerge command");
                let result = patch
                    .to_fields()
                    .map_err(|e| GatewayError::Deserialization(e.to_string()))
                    .and_then(|fields| {
                        store
                            .merge(&key, fields)
                            .map(|_| ())
                            .map_err(|e| GatewayError::Store(e.to_string()))
                    });
                let _ = reply.send(result);
            }

            GatewayCommand::ListWeeks { user, reply } => {
                debug!(%user, "actor_loop: ListWeeks command");
                let _ = reply.send(list_weeks(&store, &user));
            }

            GatewayCommand::Shutdown => {
                info!("PlanGateway shutting down");
                break;
            }
        }
    }

    debug!("PlanGateway actor stopped");
}

fn read_plan(store: &Store, key: &DocPath) -> GatewayResponse<Option<StudyPlan>> {
    let Some(data) = store.get(key).map_err(|e| GatewayError::Store(e.to_string()))? else {
        return Ok(None);
    };
    serde_json::from_value(data)
        .map(Some)
        .map_err(|e| GatewayError::Deserialization(format!("{}: {}", key, e)))
}

fn list_weeks(store: &Store, user: &str) -> GatewayResponse<Vec<WeekSummary>> {
    let collection = plans_collection(user);
    let documents = store.list(&collection).map_err(|e| GatewayError::Store(e.to_string()))?;

    let mut weeks: Vec<WeekSummary> = documents
        .iter()
        .filter_map(|doc| {
            let summary = summarize(doc.path.id(), &doc.data);
            if summary.is_none() {
                warn!(path = %doc.path, "list_weeks: skipping document without a week number");
            }
            summary
        })
        .collect();
    weeks.sort_by_key(|w| w.week);
    Ok(weeks)
}

/// Summarize a stored plan without requiring every field to be present
fn summarize(id: &str, data: &Value) -> Option<WeekSummary> {
    let week = data
        .get("week")
        .and_then(Value::as_u64)
        .and_then(|w| u32::try_from(w).ok())
        .or_else(|| id.strip_prefix("plan-").and_then(|n| n.parse().ok()))?;

    let completed = data
        .get("completedDays")
        .and_then(Value::as_array)
        .map(|days| {
            Day::ALL
                .iter()
                .filter(|day| {
                    days.iter()
                        .filter_map(Value::as_str)
                        .any(|label| Day::from_label(label) == Some(**day))
                })
                .count()
        })
        .unwrap_or(0);

    let has_seminar = data.get("seminar").is_some_and(|s| !s.is_null());

    Some(WeekSummary {
        week,
        completed,
        has_seminar,
    })
}
