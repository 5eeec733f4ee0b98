/*
[INPUT]:  Caller intents (appeal funding, transaction options)
[OUTPUT]: Serializable request payloads for the Linguo API
[POS]:    Data layer - request types
[UPDATE]: When API request schema changes
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::AppealSide;
use super::models::{Address, TaskId};

/// Identifies the appeal to fund: which task and which side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundAppealRequest {
    #[serde(rename = "ID")]
    pub task_id: TaskId,
    pub side: AppealSide,
}

/// Sender and value attached to a value-bearing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOptions {
    pub from: Address,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}

/// Body sent to `POST /api/tasks/{id}/appeal`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FundAppealBody<'a> {
    pub side: AppealSide,
    pub from: &'a Address,
    #[serde(with = "rust_decimal::serde::str")]
    pub value: Decimal,
}
