/*
[INPUT]:  Submitted transaction handles, receipt polling through LinguoApi
[OUTPUT]: Registered/mined/failed transaction actions and the terminal outcome
[POS]:    Workflow layer - transaction registration
[UPDATE]: When mining detection or timeout rules change
*/

use std::sync::Arc;
use std::time::Duration;

use linguo_adapter::{LinguoApi, TxHandle, TxHash, TxReceipt, TxStatus};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::ActionSender;
use crate::action::{Action, Meta, TransactionAction, TxMeta};
use crate::error::ActionError;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxWatchConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
    pub confirmations: u32,
}

impl Default for TxWatchConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
            confirmations: 1,
        }
    }
}

/// Watches submitted transactions until they are mined, fail, or time out.
#[derive(Clone)]
pub struct TxRegistrar {
    api: Arc<dyn LinguoApi>,
    sender: ActionSender,
    config: TxWatchConfig,
}

impl TxRegistrar {
    pub fn new(api: Arc<dyn LinguoApi>, sender: ActionSender, config: TxWatchConfig) -> Self {
        Self {
            api,
            sender,
            config,
        }
    }

    /// Register `handle` and wait for its terminal state.
    ///
    /// Emits `Registered` first and exactly one of `Mined` or `Failed`.
    pub async fn register(
        &self,
        handle: TxHandle,
        tx: Option<TxMeta>,
        meta: Meta,
    ) -> Result<TxReceipt, ActionError> {
        let hash = handle.hash;
        let required = tx
            .map(|tx| tx.confirmations)
            .unwrap_or(self.config.confirmations);
        self.sender.put(Action::Transaction(TransactionAction::Registered {
            hash: hash.clone(),
            meta: meta.clone(),
        }));
        info!(hash = %hash, confirmations = required, "transaction registered");

        let deadline = Instant::now() + self.config.timeout;
        loop {
            let mut wait = self.config.poll_interval;
            match self.api.transaction_receipt(&hash).await {
                Ok(Some(receipt)) => match receipt.status {
                    TxStatus::Mined if receipt.confirmations >= required => {
                        info!(hash = %hash, block = ?receipt.block_number, "transaction mined");
                        self.sender.put(Action::Transaction(TransactionAction::Mined {
                            receipt: receipt.clone(),
                            meta,
                        }));
                        return Ok(receipt);
                    }
                    TxStatus::Failed => {
                        let reason = receipt
                            .error
                            .unwrap_or_else(|| "transaction reverted".to_string());
                        let error = ActionError::chain(Some(hash.to_string()), reason);
                        return Err(self.fail(hash, error, meta));
                    }
                    _ => {
                        debug!(hash = %hash, confirmations = receipt.confirmations, "waiting for confirmations")
                    }
                },
                Ok(None) => debug!(hash = %hash, "transaction not yet known"),
                Err(err) if !err.is_retryable() => {
                    return Err(self.fail(hash, ActionError::from(err), meta));
                }
                Err(err) => {
                    if let Some(secs) = err.retry_delay() {
                        wait = wait.max(Duration::from_secs(secs));
                    }
                    warn!(hash = %hash, error = %err, retry_in = ?wait, "receipt query failed, retrying");
                }
            }

            let now = Instant::now();
            if now >= deadline {
                let reason = format!("not mined within {}s", self.config.timeout.as_secs());
                let error = ActionError::chain(Some(hash.to_string()), reason);
                return Err(self.fail(hash, error, meta));
            }
            tokio::time::sleep(wait.min(deadline - now)).await;
        }
    }

    fn fail(&self, hash: TxHash, error: ActionError, meta: Meta) -> ActionError {
        warn!(hash = %hash, error = %error, "transaction failed");
        self.sender.put(Action::Transaction(TransactionAction::Failed {
            hash,
            error: error.clone(),
            meta,
        }));
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use linguo_adapter::{
        Address, Dispute, FundAppealRequest, FundAppealResponse, LinguoError, Task, TaskId,
        TxOptions,
    };
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct ScriptedReceipts {
        receipts: Mutex<VecDeque<linguo_adapter::Result<Option<TxReceipt>>>>,
    }

    #[async_trait]
    impl LinguoApi for ScriptedReceipts {
        async fn get_tasks(&self, _account: &Address) -> linguo_adapter::Result<Vec<Task>> {
            Ok(Vec::new())
        }

        async fn get_task_dispute(&self, task_id: TaskId) -> linguo_adapter::Result<Dispute> {
            Err(LinguoError::NotFound(format!("dispute for task {task_id}")))
        }

        async fn fund_appeal(
            &self,
            _request: FundAppealRequest,
            _options: TxOptions,
        ) -> linguo_adapter::Result<FundAppealResponse> {
            Err(LinguoError::Config("not scripted".into()))
        }

        async fn transaction_receipt(
            &self,
            _hash: &TxHash,
        ) -> linguo_adapter::Result<Option<TxReceipt>> {
            self.receipts
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(None))
        }
    }

    fn hash() -> TxHash {
        format!("0x{}", "cd".repeat(32)).parse().unwrap()
    }

    fn receipt(status: TxStatus, confirmations: u32) -> TxReceipt {
        TxReceipt {
            hash: hash(),
            status,
            block_number: Some(10),
            confirmations,
            error: None,
        }
    }

    fn registrar(
        receipts: Vec<linguo_adapter::Result<Option<TxReceipt>>>,
    ) -> (TxRegistrar, mpsc::UnboundedReceiver<Action>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let api = Arc::new(ScriptedReceipts {
            receipts: Mutex::new(receipts.into()),
        });
        let config = TxWatchConfig {
            poll_interval: Duration::from_millis(1),
            timeout: Duration::from_millis(50),
            confirmations: 1,
        };
        (TxRegistrar::new(api, ActionSender::new(tx), config), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Action>) -> Vec<String> {
        let mut names = Vec::new();
        while let Ok(action) = rx.try_recv() {
            names.push(action.type_name());
        }
        names
    }

    #[tokio::test]
    async fn test_waits_for_required_confirmations() {
        let (registrar, mut rx) = registrar(vec![
            Ok(None),
            Ok(Some(receipt(TxStatus::Pending, 0))),
            Ok(Some(receipt(TxStatus::Mined, 1))),
            Ok(Some(receipt(TxStatus::Mined, 3))),
        ]);
        let outcome = registrar
            .register(TxHandle { hash: hash() }, Some(TxMeta { confirmations: 3 }), Meta::new())
            .await;
        assert_eq!(outcome.unwrap().confirmations, 3);
        assert_eq!(drain(&mut rx), vec!["transactions/registered", "transactions/mined"]);
    }

    #[tokio::test]
    async fn test_reverted_receipt_is_chain_error() {
        let mut reverted = receipt(TxStatus::Failed, 1);
        reverted.error = Some("out of gas".into());
        let (registrar, mut rx) = registrar(vec![Ok(Some(reverted))]);

        let error = registrar
            .register(TxHandle { hash: hash() }, None, Meta::new())
            .await
            .unwrap_err();
        assert_eq!(error, ActionError::chain(Some(hash().to_string()), "out of gas"));
        assert_eq!(drain(&mut rx), vec!["transactions/registered", "transactions/failed"]);
    }

    #[tokio::test]
    async fn test_transport_errors_are_retried() {
        let (registrar, _rx) = registrar(vec![
            Err(LinguoError::Timeout { duration: 1 }),
            Ok(Some(receipt(TxStatus::Mined, 1))),
        ]);
        let outcome = registrar
            .register(TxHandle { hash: hash() }, None, Meta::new())
            .await;
        assert!(outcome.is_ok());
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried() {
        let (registrar, mut rx) = registrar(vec![
            Err(LinguoError::RateLimit { retry_after: 1 }),
            Ok(Some(receipt(TxStatus::Mined, 1))),
        ]);
        let outcome = registrar
            .register(TxHandle { hash: hash() }, None, Meta::new())
            .await;
        assert!(outcome.is_ok());
        assert_eq!(drain(&mut rx), vec!["transactions/registered", "transactions/mined"]);
    }

    #[tokio::test]
    async fn test_permanent_api_error_fails_immediately() {
        let (registrar, mut rx) = registrar(vec![
            Err(LinguoError::Api {
                code: 400,
                message: "malformed hash".into(),
            }),
            Ok(Some(receipt(TxStatus::Mined, 1))),
        ]);
        let started = Instant::now();
        let error = registrar
            .register(TxHandle { hash: hash() }, None, Meta::new())
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ActionError::Api {
                code: Some(400),
                message: "malformed hash".into(),
            }
        );
        assert!(started.elapsed() < Duration::from_millis(50));
        assert_eq!(drain(&mut rx), vec!["transactions/registered", "transactions/failed"]);
    }

    #[tokio::test]
    async fn test_times_out_when_never_mined() {
        let (registrar, mut rx) = registrar(Vec::new());
        let error = registrar
            .register(TxHandle { hash: hash() }, None, Meta::new())
            .await
            .unwrap_err();
        assert_eq!(error.name(), "ChainError");
        assert_eq!(drain(&mut rx).last().map(String::as_str), Some("transactions/failed"));
    }
}
