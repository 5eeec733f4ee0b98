/*
[INPUT]:  Dispute fetch and appeal funding requests
[OUTPUT]: Lifecycle actions for the disputes slice, compensating refetch on chain failure
[POS]:    Workflow layer - dispute reads and appeal funding transactions
[UPDATE]: When dispute workflows or recovery rules change
*/

use std::sync::Arc;

use linguo_adapter::{FundAppealRequest, LinguoApi, TxOptions};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{ActionSender, TxRegistrar, reject_on_cancel};
use crate::action::{
    Action, AppealFunding, AsyncAction, DisputeFetched, Envelope, FetchDispute,
};
use crate::error::ActionError;

pub(crate) async fn fetch_by_task_id(
    api: Arc<dyn LinguoApi>,
    sender: ActionSender,
    request: Envelope<FetchDispute>,
    token: CancellationToken,
) {
    let Envelope { payload, meta } = request;
    let task_id = payload.task_id;
    sender.put(Action::FetchDisputeByTaskId(AsyncAction::pending(payload, meta.clone())));

    debug!(task_id, "fetching dispute");
    let result = reject_on_cancel(&token, async {
        api.get_task_dispute(task_id).await.map_err(ActionError::from)
    })
    .await;

    let action = match result {
        Ok(data) => {
            debug!(task_id, dispute_id = data.id, status = ?data.status, "dispute fetched");
            AsyncAction::fulfilled(DisputeFetched { task_id, data }, meta)
        }
        Err(ActionError::Cancellation) => {
            debug!(task_id, "dispute fetch superseded");
            AsyncAction::rejected(payload, ActionError::Cancellation, meta)
        }
        Err(error) => {
            warn!(task_id, error = %error, "dispute fetch failed");
            AsyncAction::rejected(payload, error, meta)
        }
    };
    sender.put(Action::FetchDisputeByTaskId(action));
}

/// Submit an appeal contribution and follow its transaction to a terminal state.
///
/// Once submitted this runs to completion. A chain failure is reported and
/// followed by a dispute refetch, since the failed transaction may still
/// have moved part of the round's fees.
pub(crate) async fn fund_appeal(
    api: Arc<dyn LinguoApi>,
    registrar: TxRegistrar,
    sender: ActionSender,
    request: Envelope<AppealFunding>,
) {
    let Envelope { payload, meta } = request;
    let (tx_meta, meta) = meta.split_tx();
    let task_id = payload.task_id;
    sender.put(Action::FundAppeal(AsyncAction::pending(payload.clone(), meta.clone())));

    info!(
        task_id,
        side = %payload.side,
        deposit = %payload.deposit,
        account = %payload.account,
        "submitting appeal funding"
    );
    let submitted = api
        .fund_appeal(
            FundAppealRequest {
                task_id,
                side: payload.side,
            },
            TxOptions {
                from: payload.account.clone(),
                value: payload.deposit,
            },
        )
        .await;

    let handle = match submitted {
        Ok(response) => response.tx,
        Err(err) => {
            let error = ActionError::from(err);
            warn!(task_id, error = %error, "appeal funding submission failed");
            sender.put(Action::FundAppeal(AsyncAction::rejected(payload, error, meta)));
            return;
        }
    };

    match registrar.register(handle, tx_meta, meta.clone()).await {
        Ok(receipt) => {
            info!(task_id, hash = %receipt.hash, "appeal funding mined");
            sender.put(Action::FundAppeal(AsyncAction::fulfilled(payload, meta)));
        }
        Err(error) => {
            warn!(task_id, error = %error, "appeal funding failed on chain, resynchronizing dispute");
            sender.put(Action::FundAppeal(AsyncAction::rejected(payload, error, meta.clone())));
            // same request id, so observers can tie the refetch to the funding
            sender.put(Action::fetch_dispute_by_task_id_with_meta(task_id, meta));
        }
    }
}
