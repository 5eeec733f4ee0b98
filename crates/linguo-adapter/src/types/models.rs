/*
[INPUT]:  Linguo API schema definitions and serde requirements
[OUTPUT]: Typed task, dispute and transaction records with serialization support
[POS]:    Data layer - records exchanged with the Linguo API
[UPDATE]: When API schema changes or new record fields are added
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use super::enums::{AppealSide, DisputeStatus, QualityTier, Ruling, TaskStatus, TxStatus};

pub type TaskId = u64;
pub type DisputeId = u64;

/// Ethereum account address.
///
/// Comparison and hashing ignore hex letter case, so checksummed and
/// lowercase forms of the same address are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl FromStr for Address {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| format!("address must start with 0x: {value}"))?;
        let bytes = hex::decode(digits).map_err(|err| format!("invalid address {value}: {err}"))?;
        if bytes.len() != 20 {
            return Err(format!("address must be 20 bytes, got {}: {value}", bytes.len()));
        }
        Ok(Self(value.to_string()))
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Transaction hash (32 bytes, 0x-prefixed hex).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TxHash(String);

impl TxHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value
            .strip_prefix("0x")
            .ok_or_else(|| format!("tx hash must start with 0x: {value}"))?;
        let bytes = hex::decode(digits).map_err(|err| format!("invalid tx hash {value}: {err}"))?;
        if bytes.len() != 32 {
            return Err(format!("tx hash must be 32 bytes, got {}", bytes.len()));
        }
        Ok(Self(value.to_ascii_lowercase()))
    }
}

impl TryFrom<String> for TxHash {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TxHash> for String {
    fn from(hash: TxHash) -> Self {
        hash.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskParties {
    pub requester: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenger: Option<Address>,
}

/// Translation task as served by the Linguo API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub status: TaskStatus,
    #[serde(default)]
    pub title: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub expected_quality: QualityTier,
    pub word_count: u64,
    #[serde(default, with = "rust_decimal::serde::str_option")]
    pub assigned_price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str")]
    pub min_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub max_price: Decimal,
    /// Seconds
    pub submission_timeout: u64,
    /// Seconds
    pub review_timeout: u64,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub last_interaction: DateTime<Utc>,
    pub parties: TaskParties,
    /// Delivered translation URI, absent until the translator submits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dispute_id: Option<DisputeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ruling: Option<Ruling>,
}

/// A value held once per appeal side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub translator: T,
    pub challenger: T,
}

impl<T> SidePair<T> {
    pub fn get(&self, side: AppealSide) -> &T {
        match side {
            AppealSide::Translator => &self.translator,
            AppealSide::Challenger => &self.challenger,
        }
    }

    pub fn get_mut(&mut self, side: AppealSide) -> &mut T {
        match side {
            AppealSide::Translator => &mut self.translator,
            AppealSide::Challenger => &mut self.challenger,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppealPeriod {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub end: DateTime<Utc>,
}

/// Stake multipliers published by the arbitrable contract, in units of `divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppealMultipliers {
    pub shared: u64,
    pub winner: u64,
    pub loser: u64,
    pub divisor: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppealRound {
    pub paid_fees: SidePair<Decimal>,
    pub has_paid: SidePair<bool>,
}

/// Arbitration dispute attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dispute {
    pub id: DisputeId,
    pub task_id: TaskId,
    pub status: DisputeStatus,
    #[serde(default)]
    pub ruling: Ruling,
    pub appeal_period: AppealPeriod,
    #[serde(with = "rust_decimal::serde::str")]
    pub appeal_cost: Decimal,
    pub multipliers: AppealMultipliers,
    #[serde(default)]
    pub current_round: AppealRound,
}

/// Handle to a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxHandle {
    pub hash: TxHash,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub hash: TxHash,
    pub status: TxStatus,
    #[serde(default)]
    pub block_number: Option<u64>,
    #[serde(default)]
    pub confirmations: u32,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn test_address_case_insensitive_equality() {
        let a: Address = CHECKSUMMED.parse().unwrap();
        let b: Address = CHECKSUMMED.to_lowercase().parse().unwrap();
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
    }

    #[test]
    fn test_address_rejects_bad_input() {
        assert!("5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
        assert!("0x1234".parse::<Address>().is_err());
        assert!("0xzzAeb6053F3E94C9b9A09f33669435E7Ef1BeAed".parse::<Address>().is_err());
    }

    #[test]
    fn test_task_deserialization() {
        let json = r#"{
            "id": 7,
            "status": "Created",
            "sourceLanguage": "en-us",
            "targetLanguage": "pt-br",
            "expectedQuality": "professional",
            "wordCount": 1000,
            "minPrice": "1000000000000000000",
            "maxPrice": "3000000000000000000",
            "submissionTimeout": 86400,
            "reviewTimeout": 43200,
            "lastInteraction": 1600000000,
            "parties": { "requester": "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed" }
        }"#;

        let task: Task = serde_json::from_str(json).expect("task json");
        assert_eq!(task.id, 7);
        assert_eq!(task.status, TaskStatus::Created);
        assert_eq!(task.expected_quality, QualityTier::Professional);
        assert_eq!(task.assigned_price, None);
        assert_eq!(task.min_price, Decimal::from(1_000_000_000_000_000_000u64));
        assert_eq!(task.last_interaction.timestamp(), 1_600_000_000);
        assert!(task.parties.translator.is_none());
        assert!(task.translation.is_none());
    }

    #[test]
    fn test_side_pair_access() {
        let mut pair = SidePair {
            translator: 1u32,
            challenger: 2u32,
        };
        *pair.get_mut(AppealSide::Challenger) += 5;
        assert_eq!(*pair.get(AppealSide::Challenger), 7);
        assert_eq!(*pair.get(AppealSide::Translator), 1);
    }
}
