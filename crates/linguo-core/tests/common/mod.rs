/*
[INPUT]:  Scripted task/dispute/transaction behaviour
[OUTPUT]: In-memory LinguoApi fake and fixtures shared by runtime tests
[POS]:    Test infrastructure - shared across core integration tests
[UPDATE]: When LinguoApi gains methods or fixtures need new fields
*/

//! Shared fixtures for linguo-core integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use linguo_adapter::{
    Address, AppealMultipliers, AppealPeriod, AppealRound, Dispute, DisputeStatus,
    FundAppealRequest, FundAppealResponse, LinguoApi, LinguoError, QualityTier, Result, Ruling,
    Task, TaskId, TaskParties, TaskStatus, TxHandle, TxHash, TxOptions, TxReceipt, TxStatus,
};
use linguo_core::{Action, TxWatchConfig};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

pub const REQUESTER: &str = "0x00000000000000000000000000000000000000a1";
pub const TRANSLATOR: &str = "0x00000000000000000000000000000000000000b2";
pub const CHALLENGER: &str = "0x00000000000000000000000000000000000000c3";

pub fn address(value: &str) -> Address {
    value.parse().expect("valid address")
}

pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_600_000_000, 0).unwrap()
}

pub fn tx_hash() -> TxHash {
    format!("0x{}", "ef".repeat(32)).parse().expect("valid hash")
}

pub fn fast_tx_config() -> TxWatchConfig {
    TxWatchConfig {
        poll_interval: Duration::from_millis(1),
        timeout: Duration::from_millis(200),
        confirmations: 1,
    }
}

pub fn task(id: TaskId, status: TaskStatus) -> Task {
    Task {
        id,
        status,
        title: format!("task {id}"),
        source_language: "en-us".to_string(),
        target_language: "pt-br".to_string(),
        expected_quality: QualityTier::Standard,
        word_count: 1_000,
        assigned_price: None,
        min_price: Decimal::from(1_000),
        max_price: Decimal::from(3_000),
        submission_timeout: 86_400,
        review_timeout: 43_200,
        last_interaction: epoch(),
        parties: TaskParties {
            requester: address(REQUESTER),
            translator: Some(address(TRANSLATOR)),
            challenger: Some(address(CHALLENGER)),
        },
        translation: (status >= TaskStatus::AwaitingReview)
            .then(|| "ipfs://translation.txt".to_string()),
        dispute_id: Some(100 + id),
        ruling: None,
    }
}

pub fn dispute(task_id: TaskId) -> Dispute {
    Dispute {
        id: 100 + task_id,
        task_id,
        status: DisputeStatus::Appealable,
        ruling: Ruling::TranslationApproved,
        appeal_period: AppealPeriod {
            start: epoch(),
            end: epoch() + chrono::Duration::days(3),
        },
        appeal_cost: Decimal::from(100),
        multipliers: AppealMultipliers {
            shared: 10_000,
            winner: 5_000,
            loser: 20_000,
            divisor: 10_000,
        },
        current_round: AppealRound::default(),
    }
}

/// Outcome the fake reports for submitted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainOutcome {
    Mined,
    Reverted,
    SubmissionRejected,
}

/// In-memory API with call counters.
pub struct FakeApi {
    pub disputes: Mutex<HashMap<TaskId, Dispute>>,
    pub tasks: Mutex<Vec<Task>>,
    pub chain: ChainOutcome,
    pub fetch_delay: Duration,
    pub dispute_failures: AtomicUsize,
    pub dispute_calls: AtomicUsize,
    pub task_calls: AtomicUsize,
    pub submissions: AtomicUsize,
}

impl FakeApi {
    pub fn new(chain: ChainOutcome) -> Self {
        Self {
            disputes: Mutex::new(HashMap::new()),
            tasks: Mutex::new(Vec::new()),
            chain,
            fetch_delay: Duration::from_millis(5),
            dispute_failures: AtomicUsize::new(0),
            dispute_calls: AtomicUsize::new(0),
            task_calls: AtomicUsize::new(0),
            submissions: AtomicUsize::new(0),
        }
    }

    pub fn with_dispute(self, dispute: Dispute) -> Self {
        self.disputes.lock().unwrap().insert(dispute.task_id, dispute);
        self
    }

    pub fn with_tasks(self, tasks: Vec<Task>) -> Self {
        *self.tasks.lock().unwrap() = tasks;
        self
    }

    /// Fail the next `count` dispute reads with a transport error.
    pub fn failing_dispute_reads(self, count: usize) -> Self {
        self.dispute_failures.store(count, Ordering::SeqCst);
        self
    }

    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    pub fn dispute_calls(&self) -> usize {
        self.dispute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LinguoApi for FakeApi {
    async fn get_tasks(&self, _account: &Address) -> Result<Vec<Task>> {
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.fetch_delay).await;
        Ok(self.tasks.lock().unwrap().clone())
    }

    async fn get_task_dispute(&self, task_id: TaskId) -> Result<Dispute> {
        self.dispute_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.fetch_delay).await;
        let failing = self
            .dispute_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failing {
            return Err(LinguoError::Timeout { duration: 30 });
        }
        self.disputes
            .lock()
            .unwrap()
            .get(&task_id)
            .cloned()
            .ok_or_else(|| LinguoError::NotFound(format!("/api/tasks/{task_id}/dispute")))
    }

    async fn fund_appeal(
        &self,
        _request: FundAppealRequest,
        _options: TxOptions,
    ) -> Result<FundAppealResponse> {
        self.submissions.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.fetch_delay).await;
        match self.chain {
            ChainOutcome::SubmissionRejected => Err(LinguoError::Api {
                code: 400,
                message: "insufficient value".to_string(),
            }),
            _ => Ok(FundAppealResponse {
                tx: TxHandle { hash: tx_hash() },
            }),
        }
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>> {
        let (status, error) = match self.chain {
            ChainOutcome::Reverted => (TxStatus::Failed, Some("execution reverted".to_string())),
            _ => (TxStatus::Mined, None),
        };
        Ok(Some(TxReceipt {
            hash: hash.clone(),
            status,
            block_number: Some(7),
            confirmations: 1,
            error,
        }))
    }
}

/// Every action broadcast so far.
pub fn drain(events: &mut broadcast::Receiver<Action>) -> Vec<Action> {
    let mut actions = Vec::new();
    while let Ok(action) = events.try_recv() {
        actions.push(action);
    }
    actions
}

pub fn type_names(actions: &[Action]) -> Vec<String> {
    actions.iter().map(Action::type_name).collect()
}
