/*
[INPUT]:  Linguo API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - task, dispute and transaction enums
[UPDATE]: When API schema changes or new enum values are added
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// On-chain task status. Declaration order matches the contract's numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    Created,
    Assigned,
    AwaitingReview,
    DisputeCreated,
    Resolved,
}

impl TaskStatus {
    pub fn as_index(self) -> u8 {
        self as u8
    }
}

/// Role of an account relative to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskParty {
    Requester,
    Translator,
    Challenger,
    Other,
}

/// The two sides that can be funded in an appeal round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppealSide {
    Translator,
    Challenger,
}

impl AppealSide {
    /// The ruling this side is arguing for.
    pub fn ruling(self) -> Ruling {
        match self {
            AppealSide::Translator => Ruling::TranslationApproved,
            AppealSide::Challenger => Ruling::TranslationRejected,
        }
    }

    pub fn party(self) -> TaskParty {
        match self {
            AppealSide::Translator => TaskParty::Translator,
            AppealSide::Challenger => TaskParty::Challenger,
        }
    }
}

impl TryFrom<TaskParty> for AppealSide {
    type Error = TaskParty;

    fn try_from(party: TaskParty) -> Result<Self, Self::Error> {
        match party {
            TaskParty::Translator => Ok(AppealSide::Translator),
            TaskParty::Challenger => Ok(AppealSide::Challenger),
            other => Err(other),
        }
    }
}

impl fmt::Display for AppealSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppealSide::Translator => f.write_str("translator"),
            AppealSide::Challenger => f.write_str("challenger"),
        }
    }
}

impl FromStr for AppealSide {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "translator" => Ok(AppealSide::Translator),
            "challenger" => Ok(AppealSide::Challenger),
            other => Err(format!("unknown appeal side: {other}")),
        }
    }
}

/// Arbitrator-reported dispute status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisputeStatus {
    Waiting,
    Appealable,
    Solved,
}

/// Current ruling of a dispute. `None` means the jurors refused to rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Ruling {
    #[default]
    None,
    TranslationApproved,
    TranslationRejected,
}

/// CEFR language proficiency levels, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl FromStr for CefrLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_uppercase().as_str() {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(format!("unknown CEFR level: {other}")),
        }
    }
}

/// Translation quality tier requested by the task requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QualityTier {
    CostEffective,
    #[default]
    Standard,
    Professional,
}

impl QualityTier {
    /// Minimum proficiency a translator needs in both languages for this tier.
    pub fn required_level(self) -> CefrLevel {
        match self {
            QualityTier::CostEffective => CefrLevel::B2,
            QualityTier::Standard => CefrLevel::C1,
            QualityTier::Professional => CefrLevel::C2,
        }
    }
}

/// Mining status of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Pending,
    Mined,
    Failed,
}
