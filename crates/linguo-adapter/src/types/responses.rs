/*
[INPUT]:  Linguo API response bodies
[OUTPUT]: Typed response wrappers
[POS]:    Data layer - response types
[UPDATE]: When API response schema changes
*/

use serde::{Deserialize, Serialize};

use super::models::TxHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundAppealResponse {
    pub tx: TxHandle,
}

/// Error body returned by the API on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default, alias = "error")]
    pub message: String,
}
