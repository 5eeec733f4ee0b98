/*
[INPUT]:  Task identifiers, appeal side and transaction options
[OUTPUT]: Dispute records and submitted appeal transactions
[POS]:    HTTP layer - dispute read and appeal funding endpoints
[UPDATE]: When adding new dispute endpoints or changing appeal flow
*/

use crate::http::{LinguoClient, Result};
use crate::types::{
    Dispute, FundAppealBody, FundAppealRequest, FundAppealResponse, TaskId, TxOptions,
};
use reqwest::Method;

impl LinguoClient {
    /// Get the dispute attached to a task
    ///
    /// GET /api/tasks/{id}/dispute
    pub async fn get_task_dispute(&self, task_id: TaskId) -> Result<Dispute> {
        let endpoint = format!("/api/tasks/{}/dispute", task_id);
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }

    /// Submit a value-bearing transaction funding one side of the current appeal round
    ///
    /// POST /api/tasks/{id}/appeal
    pub async fn fund_appeal(
        &self,
        request: FundAppealRequest,
        options: TxOptions,
    ) -> Result<FundAppealResponse> {
        let endpoint = format!("/api/tasks/{}/appeal", request.task_id);
        let body = FundAppealBody {
            side: request.side,
            from: &options.from,
            value: options.value,
        };
        let builder = self.request(Method::POST, &endpoint)?.json(&body);
        self.send_json(builder).await
    }
}
