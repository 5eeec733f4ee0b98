/*
[INPUT]:  Actions from callers and workflows, injected LinguoApi, CancellationToken
[OUTPUT]: Single-writer event loop: reduce, broadcast to observers, route to the coordinator
[POS]:    Application root - owns the state container and the action queue
[UPDATE]: When changing dispatch order, idle detection or shutdown guarantees
*/

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow};
use linguo_adapter::LinguoApi;
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::action::Action;
use crate::store::AppState;
use crate::workflow::{ActionSender, Coordinator, TxWatchConfig};

const OBSERVER_CAPACITY: usize = 1024;
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns the state and processes actions one at a time.
///
/// Workflows never touch the state; they emit actions into the queue and
/// the runtime applies them through the reducers.
pub struct Runtime {
    state: AppState,
    coordinator: Coordinator,
    sender: ActionSender,
    action_rx: mpsc::UnboundedReceiver<Action>,
    observers: broadcast::Sender<Action>,
}

impl Runtime {
    pub fn new(api: Arc<dyn LinguoApi>, tx_config: TxWatchConfig) -> Self {
        let (tx, action_rx) = mpsc::unbounded_channel();
        let sender = ActionSender::new(tx);
        let (observers, _) = broadcast::channel(OBSERVER_CAPACITY);
        Self {
            state: AppState::default(),
            coordinator: Coordinator::new(api, sender.clone(), tx_config),
            sender,
            action_rx,
            observers,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Handle for queueing actions from other tasks.
    pub fn sender(&self) -> ActionSender {
        self.sender.clone()
    }

    /// Receive every action after it has been reduced.
    pub fn subscribe(&self) -> broadcast::Receiver<Action> {
        self.observers.subscribe()
    }

    /// Reduce `action`, notify observers, then start any workflow it triggers.
    pub async fn dispatch(&mut self, action: Action) {
        debug!(action = %action.type_name(), request_id = %action.meta().request_id, "dispatch");
        self.state = std::mem::take(&mut self.state).reduce(&action);
        // no observers is fine
        let _ = self.observers.send(action.clone());
        self.coordinator.handle(&action).await;
    }

    /// Process queued actions until the queue is empty and no workflow is running.
    pub async fn run_until_idle(&mut self) {
        let tracker = self.coordinator.tracker().clone();
        loop {
            while let Ok(action) = self.action_rx.try_recv() {
                self.dispatch(action).await;
            }

            if tracker.is_empty() {
                // a workflow may have queued its last action right before finishing
                match self.action_rx.try_recv() {
                    Ok(action) => {
                        self.dispatch(action).await;
                        continue;
                    }
                    Err(_) => break,
                }
            }

            tracker.close();
            let next = tokio::select! {
                action = self.action_rx.recv() => action,
                _ = tracker.wait() => None,
            };
            tracker.reopen();

            if let Some(action) = next {
                self.dispatch(action).await;
            }
        }
    }

    /// Process actions until `shutdown` fires, then wait for running workflows.
    pub async fn run(&mut self, shutdown: CancellationToken) -> Result<()> {
        loop {
            let next = tokio::select! {
                _ = shutdown.cancelled() => None,
                action = self.action_rx.recv() => action,
            };
            match next {
                Some(action) => self.dispatch(action).await,
                None => break,
            }
        }

        info!(in_flight = self.coordinator.in_flight(), "runtime stopping");
        self.shutdown_and_wait().await
    }

    /// Wait for in-flight workflows, bounded by a fixed deadline.
    ///
    /// Running reads are cancelled. Appeal funding transactions cannot be
    /// cancelled once submitted, so they run to a terminal state, and the
    /// actions they queue on the way out (including the dispute refetch
    /// after a chain failure) are still dispatched.
    pub async fn shutdown_and_wait(&mut self) -> Result<()> {
        let cancelled = self.coordinator.cancel_reads();
        debug!(cancelled, "cancelled in-flight reads");

        let waited = tokio::time::timeout(SHUTDOWN_TIMEOUT, self.run_until_idle()).await;
        self.coordinator.tracker().reopen();

        // reduce what was left queued when the deadline hit
        while let Ok(action) = self.action_rx.try_recv() {
            self.state = std::mem::take(&mut self.state).reduce(&action);
            let _ = self.observers.send(action);
        }

        waited.map_err(|_| anyhow!("shutdown timed out after {SHUTDOWN_TIMEOUT:?}"))
    }
}
