/*
[INPUT]:  Actions dispatched by the runtime
[OUTPUT]: Application state (tasks, disputes, transactions) and shared entry bookkeeping
[POS]:    State layer - pure reducers, no I/O
[UPDATE]: When adding a slice or changing generic phase handling
*/

pub mod disputes;
pub mod tasks;
pub mod transactions;

use crate::action::{Action, AsyncMatcher, Phase};
use crate::error::ActionError;

pub use disputes::DisputesState;
pub use tasks::TasksState;
pub use transactions::{TransactionEntry, TransactionsState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Keyed entity entry with its load status.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub loading_state: LoadingState,
    pub data: Option<T>,
    pub error: Option<ActionError>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            loading_state: LoadingState::Idle,
            data: None,
            error: None,
        }
    }
}

impl<T> Entry<T> {
    /// Apply the phase transition shared by every async action kind.
    ///
    /// A cancelled request leaves no error behind.
    pub(crate) fn apply_phase(&mut self, phase: Phase, error: Option<&ActionError>) {
        match phase {
            Phase::Pending => {
                self.loading_state = LoadingState::Loading;
                self.error = None;
            }
            Phase::Fulfilled => {
                self.loading_state = LoadingState::Succeeded;
                self.error = None;
            }
            Phase::Rejected => match error {
                Some(err) if !err.is_cancellation() => {
                    self.loading_state = LoadingState::Failed;
                    self.error = Some(err.clone());
                }
                _ => self.loading_state = LoadingState::Idle,
            },
        }
    }
}

/// Phase of `action` if one of the matchers accepts it.
pub(crate) fn matched_phase(
    create_matcher: impl Fn(Phase) -> AsyncMatcher,
    action: &Action,
) -> Option<Phase> {
    [Phase::Pending, Phase::Fulfilled, Phase::Rejected]
        .into_iter()
        .find(|phase| create_matcher(*phase).matches(action))
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tasks: TasksState,
    pub disputes: DisputesState,
    pub transactions: TransactionsState,
}

impl AppState {
    pub fn reduce(self, action: &Action) -> Self {
        Self {
            tasks: tasks::reduce(self.tasks, action),
            disputes: disputes::reduce(self.disputes, action),
            transactions: transactions::reduce(self.transactions, action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_phase_transitions() {
        let mut entry: Entry<u8> = Entry::default();
        assert_eq!(entry.loading_state, LoadingState::Idle);

        entry.apply_phase(Phase::Pending, None);
        assert_eq!(entry.loading_state, LoadingState::Loading);

        let failure = ActionError::Network {
            message: "offline".into(),
        };
        entry.apply_phase(Phase::Rejected, Some(&failure));
        assert_eq!(entry.loading_state, LoadingState::Failed);
        assert_eq!(entry.error.as_ref(), Some(&failure));

        entry.apply_phase(Phase::Pending, None);
        assert!(entry.error.is_none());
        entry.apply_phase(Phase::Rejected, Some(&ActionError::Cancellation));
        assert_eq!(entry.loading_state, LoadingState::Idle);
        assert!(entry.error.is_none());
    }
}
