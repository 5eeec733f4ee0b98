/*
[INPUT]:  Task/dispute reads and appeal transactions requested by the core
[OUTPUT]: Object-safe async API trait implemented by LinguoClient
[POS]:    Integration seam - injected into workflows instead of ambient context
[UPDATE]: When the core needs a new read or transaction method
*/

use async_trait::async_trait;

use crate::http::{LinguoClient, Result};
use crate::types::{
    Address, Dispute, FundAppealRequest, FundAppealResponse, Task, TaskId, TxHash, TxOptions,
    TxReceipt,
};

/// Operations the orchestration layer needs from the Linguo backend.
///
/// Every method is a suspension point for the calling workflow.
#[async_trait]
pub trait LinguoApi: Send + Sync {
    /// Tasks the account participates in.
    async fn get_tasks(&self, account: &Address) -> Result<Vec<Task>>;

    /// Dispute attached to a task.
    async fn get_task_dispute(&self, task_id: TaskId) -> Result<Dispute>;

    /// Submit a value-bearing appeal funding transaction.
    async fn fund_appeal(
        &self,
        request: FundAppealRequest,
        options: TxOptions,
    ) -> Result<FundAppealResponse>;

    /// Current receipt for a submitted transaction, `None` while unknown to the node.
    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>>;
}

#[async_trait]
impl LinguoApi for LinguoClient {
    async fn get_tasks(&self, account: &Address) -> Result<Vec<Task>> {
        LinguoClient::get_tasks(self, account).await
    }

    async fn get_task_dispute(&self, task_id: TaskId) -> Result<Dispute> {
        LinguoClient::get_task_dispute(self, task_id).await
    }

    async fn fund_appeal(
        &self,
        request: FundAppealRequest,
        options: TxOptions,
    ) -> Result<FundAppealResponse> {
        LinguoClient::fund_appeal(self, request, options).await
    }

    async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>> {
        LinguoClient::transaction_receipt(self, hash).await
    }
}
