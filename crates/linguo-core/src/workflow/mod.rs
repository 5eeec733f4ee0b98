/*
[INPUT]:  Triggering actions from the runtime, injected LinguoApi
[OUTPUT]: Spawned workflows that report back through lifecycle actions
[POS]:    Coordination layer - routes requests to watchers and workflows
[UPDATE]: When adding async operations or changing their take policy
*/

pub mod disputes;
pub mod tasks;
pub mod transactions;
pub mod watcher;

use std::future::Future;
use std::sync::Arc;

use linguo_adapter::{Address, LinguoApi, TaskId};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::debug;

use crate::action::{Action, AsyncAction};
use crate::error::ActionError;
pub use transactions::{TxRegistrar, TxWatchConfig};
pub use watcher::{TakePolicy, Watcher};

/// Queue handle workflows use to emit actions.
#[derive(Debug, Clone)]
pub struct ActionSender {
    tx: mpsc::UnboundedSender<Action>,
}

impl ActionSender {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    pub fn put(&self, action: Action) {
        if let Err(err) = self.tx.send(action) {
            debug!(action = %err.0.type_name(), "action queue closed, dropping action");
        }
    }
}

/// Await `work` unless `token` fires first, in which case the result is a
/// cancellation error. Cancellation wins ties.
pub(crate) async fn reject_on_cancel<T, F>(token: &CancellationToken, work: F) -> Result<T, ActionError>
where
    F: Future<Output = Result<T, ActionError>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ActionError::Cancellation),
        result = work => result,
    }
}

/// Routes triggering actions to their workflows.
///
/// Fetches run latest-wins per key. Appeal funding runs leading-wins on a
/// single slot so two submissions can never be in flight together.
pub struct Coordinator {
    api: Arc<dyn LinguoApi>,
    sender: ActionSender,
    registrar: TxRegistrar,
    tracker: TaskTracker,
    fetch_tasks: Watcher<Address>,
    fetch_disputes: Watcher<TaskId>,
    fund_appeals: Watcher<()>,
}

impl Coordinator {
    pub fn new(api: Arc<dyn LinguoApi>, sender: ActionSender, tx_config: TxWatchConfig) -> Self {
        let registrar = TxRegistrar::new(api.clone(), sender.clone(), tx_config);
        Self {
            api,
            sender,
            registrar,
            tracker: TaskTracker::new(),
            fetch_tasks: Watcher::latest("tasks/fetchByAccount"),
            fetch_disputes: Watcher::latest("disputes/fetchByTaskId"),
            fund_appeals: Watcher::leading("disputes/fundAppeal"),
        }
    }

    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    pub async fn handle(&mut self, action: &Action) {
        match action {
            Action::FetchTasks(AsyncAction::Requested(request)) => {
                let (api, sender, request) = (self.api.clone(), self.sender.clone(), request.clone());
                let key = request.payload.account.clone();
                self.fetch_tasks
                    .take(key, &self.tracker, move |token| {
                        tasks::fetch_tasks(api, sender, request, token)
                    })
                    .await;
            }
            Action::FetchDisputeByTaskId(AsyncAction::Requested(request)) => {
                let (api, sender, request) = (self.api.clone(), self.sender.clone(), request.clone());
                let key = request.payload.task_id;
                self.fetch_disputes
                    .take(key, &self.tracker, move |token| {
                        disputes::fetch_by_task_id(api, sender, request, token)
                    })
                    .await;
            }
            Action::FundAppeal(AsyncAction::Requested(request)) => {
                let (api, sender, request) = (self.api.clone(), self.sender.clone(), request.clone());
                let registrar = self.registrar.clone();
                self.fund_appeals
                    .take((), &self.tracker, move |_| {
                        disputes::fund_appeal(api, registrar, sender, request)
                    })
                    .await;
            }
            _ => {}
        }
    }

    /// Cancel in-flight reads. Appeal funding keeps running.
    pub fn cancel_reads(&mut self) -> usize {
        self.fetch_tasks.cancel_all() + self.fetch_disputes.cancel_all()
    }

    /// Workflows still running.
    pub fn in_flight(&self) -> usize {
        self.fetch_tasks.in_flight() + self.fetch_disputes.in_flight() + self.fund_appeals.in_flight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reject_on_cancel_prefers_cancellation() {
        let token = CancellationToken::new();
        token.cancel();
        let result = reject_on_cancel(&token, async { Ok::<_, ActionError>(1) }).await;
        assert_eq!(result, Err(ActionError::Cancellation));
    }

    #[tokio::test]
    async fn test_reject_on_cancel_passes_result_through() {
        let token = CancellationToken::new();
        let result = reject_on_cancel(&token, async { Ok::<_, ActionError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_put_after_close_is_silent() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        ActionSender::new(tx).put(Action::fetch_dispute_by_task_id(1));
    }
}
