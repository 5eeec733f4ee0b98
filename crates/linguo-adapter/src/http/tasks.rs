/*
[INPUT]:  Account address
[OUTPUT]: Task records the account is involved in
[POS]:    HTTP layer - task read endpoints
[UPDATE]: When adding new task endpoints or changing query parameters
*/

use crate::http::{LinguoClient, Result};
use crate::types::{Address, Task};
use reqwest::Method;

impl LinguoClient {
    /// Query tasks where the account is requester, translator or challenger
    ///
    /// GET /api/tasks?account={account}
    pub async fn get_tasks(&self, account: &Address) -> Result<Vec<Task>> {
        let endpoint = format!("/api/tasks?account={}", account);
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json(builder).await
    }
}
