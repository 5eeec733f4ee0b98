/*
[INPUT]:  Task records from the adapter and the current time
[OUTPUT]: Derived task state (price, deadlines, party role, view)
[POS]:    Domain layer - pure task functions, no I/O
[UPDATE]: When pricing, deadline or party rules change
*/

use chrono::{DateTime, Duration, Utc};
use linguo_adapter::{Address, Task, TaskParty, TaskStatus};
use rust_decimal::Decimal;

/// How a task is presented in listings. `Incomplete` overrides the status-derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskView {
    Open,
    InProgress,
    InReview,
    InDispute,
    Finished,
    Incomplete,
}

impl TaskView {
    pub fn label(self) -> &'static str {
        match self {
            TaskView::Open => "Open Task",
            TaskView::InProgress => "In Progress",
            TaskView::InReview => "In Review",
            TaskView::InDispute => "In Dispute",
            TaskView::Finished => "Finished",
            TaskView::Incomplete => "Incomplete",
        }
    }
}

pub fn submission_deadline(task: &Task) -> DateTime<Utc> {
    after(task.last_interaction, task.submission_timeout)
}

pub fn review_deadline(task: &Task) -> DateTime<Utc> {
    after(task.last_interaction, task.review_timeout)
}

/// Price the task currently pays.
///
/// Once assigned the price is fixed. Before that it grows linearly from
/// `min_price` at the last interaction to `max_price` at the submission
/// deadline, using truncating integer arithmetic on wei amounts.
pub fn current_price(task: &Task, now: DateTime<Utc>) -> Decimal {
    if let Some(assigned) = task.assigned_price {
        return assigned;
    }

    let (min, max) = (task.min_price, task.max_price);
    if task.submission_timeout == 0 || max <= min {
        return max.max(min);
    }

    let elapsed = (now - task.last_interaction).num_seconds();
    if elapsed <= 0 {
        return min;
    }

    let elapsed = Decimal::from((elapsed as u64).min(task.submission_timeout));
    let timeout = Decimal::from(task.submission_timeout);
    let spread = max - min;
    let increment = match spread.checked_mul(elapsed) {
        Some(scaled) => scaled / timeout,
        None => spread / timeout * elapsed,
    };

    (min + increment.trunc()).clamp(min, max)
}

/// Integer price per word. A task without words has a zero per-word price.
pub fn current_price_per_word(current_price: Decimal, word_count: u64) -> Decimal {
    if word_count == 0 {
        return Decimal::ZERO;
    }
    (current_price / Decimal::from(word_count)).trunc()
}

/// Time left to deliver the translation. Zero once past the deadline or
/// when the task is no longer waiting for a submission.
pub fn remaining_time_for_submission(task: &Task, now: DateTime<Utc>) -> Duration {
    match task.status {
        TaskStatus::Created | TaskStatus::Assigned => non_negative(submission_deadline(task) - now),
        _ => Duration::zero(),
    }
}

/// Time left to challenge a delivered translation.
pub fn remaining_time_for_review(task: &Task, now: DateTime<Utc>) -> Duration {
    match task.status {
        TaskStatus::AwaitingReview => non_negative(review_deadline(task) - now),
        _ => Duration::zero(),
    }
}

/// Still waiting for assignment or delivery.
pub fn is_pending(task: &Task) -> bool {
    matches!(task.status, TaskStatus::Created | TaskStatus::Assigned)
}

/// A pending task whose submission deadline has elapsed, or a task that was
/// resolved by reimbursing the requester without any translation delivered.
pub fn is_incomplete(task: &Task, now: DateTime<Utc>) -> bool {
    match task.status {
        TaskStatus::Created | TaskStatus::Assigned => {
            remaining_time_for_submission(task, now) == Duration::zero()
        }
        TaskStatus::Resolved => task.translation.is_none(),
        _ => false,
    }
}

/// Role of `account` in `task`. Address comparison ignores letter case.
pub fn party_of(task: &Task, account: Option<&Address>) -> TaskParty {
    let Some(account) = account else {
        return TaskParty::Other;
    };

    let parties = &task.parties;
    if parties.translator.as_ref() == Some(account) {
        TaskParty::Translator
    } else if parties.challenger.as_ref() == Some(account) {
        TaskParty::Challenger
    } else if &parties.requester == account {
        TaskParty::Requester
    } else {
        TaskParty::Other
    }
}

pub fn challenger_is_requester(task: &Task) -> bool {
    task.parties.challenger.as_ref() == Some(&task.parties.requester)
}

pub fn view(task: &Task, now: DateTime<Utc>) -> TaskView {
    if is_incomplete(task, now) {
        return TaskView::Incomplete;
    }
    match task.status {
        TaskStatus::Created => TaskView::Open,
        TaskStatus::Assigned => TaskView::InProgress,
        TaskStatus::AwaitingReview => TaskView::InReview,
        TaskStatus::DisputeCreated => TaskView::InDispute,
        TaskStatus::Resolved => TaskView::Finished,
    }
}

/// `start + secs`, saturating at the latest representable instant.
fn after(start: DateTime<Utc>, secs: u64) -> DateTime<Utc> {
    i64::try_from(secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|timeout| start.checked_add_signed(timeout))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn non_negative(value: Duration) -> Duration {
    value.max(Duration::zero())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use chrono::TimeZone;
    use linguo_adapter::{QualityTier, TaskParties};

    pub const REQUESTER: &str = "0x00000000000000000000000000000000000000a1";
    pub const TRANSLATOR: &str = "0x00000000000000000000000000000000000000b2";
    pub const CHALLENGER: &str = "0x00000000000000000000000000000000000000c3";

    pub fn epoch() -> DateTime<Utc> {
        Utc.timestamp_opt(1_600_000_000, 0).unwrap()
    }

    pub fn address(value: &str) -> Address {
        value.parse().unwrap()
    }

    pub fn task(id: u64, status: TaskStatus) -> Task {
        Task {
            id,
            status,
            title: format!("task {id}"),
            source_language: "en-us".to_string(),
            target_language: "pt-br".to_string(),
            expected_quality: QualityTier::Standard,
            word_count: 1_000,
            assigned_price: None,
            min_price: Decimal::from(1_000_000_000_000_000_000u64),
            max_price: Decimal::from(3_000_000_000_000_000_000u64),
            submission_timeout: 86_400,
            review_timeout: 43_200,
            last_interaction: epoch(),
            parties: TaskParties {
                requester: address(REQUESTER),
                translator: None,
                challenger: None,
            },
            translation: (status >= TaskStatus::AwaitingReview)
                .then(|| "ipfs://translation.txt".to_string()),
            dispute_id: None,
            ruling: None,
        }
    }
}
