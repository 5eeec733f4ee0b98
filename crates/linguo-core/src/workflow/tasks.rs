/*
[INPUT]:  Task list requests keyed by account
[OUTPUT]: Lifecycle actions for the tasks slice
[POS]:    Workflow layer - task list reads
[UPDATE]: When task list loading changes
*/

use std::sync::Arc;

use linguo_adapter::LinguoApi;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{ActionSender, reject_on_cancel};
use crate::action::{Action, AsyncAction, Envelope, FetchTasks, TasksFetched};
use crate::error::ActionError;

pub(crate) async fn fetch_tasks(
    api: Arc<dyn LinguoApi>,
    sender: ActionSender,
    request: Envelope<FetchTasks>,
    token: CancellationToken,
) {
    let Envelope { payload, meta } = request;
    sender.put(Action::FetchTasks(AsyncAction::pending(payload.clone(), meta.clone())));

    let result = reject_on_cancel(&token, async {
        api.get_tasks(&payload.account).await.map_err(ActionError::from)
    })
    .await;

    let action = match result {
        Ok(data) => {
            debug!(account = %payload.account, count = data.len(), "tasks fetched");
            AsyncAction::fulfilled(
                TasksFetched {
                    account: payload.account,
                    data,
                },
                meta,
            )
        }
        Err(error) => {
            if !error.is_cancellation() {
                warn!(account = %payload.account, error = %error, "task fetch failed");
            }
            AsyncAction::rejected(payload, error, meta)
        }
    };
    sender.put(Action::FetchTasks(action));
}
