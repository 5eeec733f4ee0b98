/*
[INPUT]:  Transaction hashes
[OUTPUT]: Mining receipts (pending, mined, failed)
[POS]:    HTTP layer - transaction status endpoint
[UPDATE]: When changing how transaction status is reported
*/

use crate::http::{LinguoClient, Result};
use crate::types::{TxHash, TxReceipt};
use reqwest::Method;

impl LinguoClient {
    /// Query the receipt of a submitted transaction. Unknown hashes yield `None`.
    ///
    /// GET /api/transactions/{hash}
    pub async fn transaction_receipt(&self, hash: &TxHash) -> Result<Option<TxReceipt>> {
        let endpoint = format!("/api/transactions/{}", hash);
        let builder = self.request(Method::GET, &endpoint)?;
        self.send_json_optional(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{ClientConfig, LinguoClient};
    use crate::types::{TxHash, TxStatus};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_transaction_receipt_mined_and_unknown() {
        let server = MockServer::start().await;
        let mined: TxHash = format!("0x{}", "11".repeat(32)).parse().unwrap();
        let unknown: TxHash = format!("0x{}", "22".repeat(32)).parse().unwrap();

        Mock::given(method("GET"))
            .and(path(format!("/api/transactions/{}", mined)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hash": mined.as_str(),
                "status": "mined",
                "blockNumber": 100,
                "confirmations": 2
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/api/transactions/{}", unknown)))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = LinguoClient::with_config_and_base_url(ClientConfig::default(), &server.uri())
            .expect("client init");

        let receipt = client
            .transaction_receipt(&mined)
            .await
            .expect("receipt query")
            .expect("receipt present");
        assert_eq!(receipt.status, TxStatus::Mined);
        assert_eq!(receipt.block_number, Some(100));

        let missing = client.transaction_receipt(&unknown).await.expect("receipt query");
        assert!(missing.is_none());
    }
}
