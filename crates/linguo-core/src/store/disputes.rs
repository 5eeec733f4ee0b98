/*
[INPUT]:  Dispute fetch and appeal funding actions
[OUTPUT]: Disputes keyed by task id with per-entry load state and selectors
[POS]:    State layer - disputes slice
[UPDATE]: When dispute actions or selectors change
*/

use std::collections::{BTreeSet, HashMap};

use linguo_adapter::{Dispute, DisputeId, TaskId};

use super::{Entry, LoadingState, matched_phase};
use crate::action::{Action, ActionKind, AsyncAction, match_any_async_type};
use crate::domain::dispute::register_appeal_funding;
use crate::error::ActionError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisputesState {
    pub id_to_task_id: HashMap<DisputeId, TaskId>,
    pub by_task_id: HashMap<TaskId, Entry<Dispute>>,
    pub task_ids: BTreeSet<TaskId>,
}

const DISPUTE_KINDS: &[ActionKind] = &[ActionKind::FetchDisputeByTaskId, ActionKind::FundAppeal];

pub fn reduce(mut state: DisputesState, action: &Action) -> DisputesState {
    match action {
        Action::FetchDisputeByTaskId(AsyncAction::Pending(env)) => {
            state.by_task_id.entry(env.payload.task_id).or_default();
        }
        Action::FetchDisputeByTaskId(AsyncAction::Fulfilled(env)) => {
            let task_id = env.payload.task_id;
            let dispute = env.payload.data.clone();
            state.id_to_task_id.insert(dispute.id, task_id);
            state.task_ids.insert(task_id);
            state.by_task_id.entry(task_id).or_default().data = Some(dispute);
        }
        Action::FundAppeal(AsyncAction::Fulfilled(env)) => {
            let funding = &env.payload;
            let next = state
                .by_task_id
                .get(&funding.task_id)
                .and_then(|entry| entry.data.as_ref())
                .map(|dispute| register_appeal_funding(dispute, funding.deposit, funding.side));
            if let (Some(next), Some(entry)) = (next, state.by_task_id.get_mut(&funding.task_id)) {
                entry.data = Some(next);
            }
        }
        _ => {}
    }

    if let (Some(phase), Some(task_id)) = (
        matched_phase(match_any_async_type(DISPUTE_KINDS), action),
        action.task_id(),
    ) {
        if let Some(entry) = state.by_task_id.get_mut(&task_id) {
            entry.apply_phase(phase, action.error());
        }
    }

    state
}

impl DisputesState {
    pub fn select_by_task_id(&self, task_id: TaskId) -> Option<&Dispute> {
        self.by_task_id.get(&task_id).and_then(|entry| entry.data.as_ref())
    }

    pub fn select_loading_state(&self, task_id: TaskId) -> LoadingState {
        self.by_task_id
            .get(&task_id)
            .map(|entry| entry.loading_state)
            .unwrap_or_default()
    }

    pub fn is_loading(&self, task_id: TaskId) -> bool {
        self.select_loading_state(task_id) == LoadingState::Loading
    }

    pub fn select_error(&self, task_id: TaskId) -> Option<&ActionError> {
        self.by_task_id.get(&task_id).and_then(|entry| entry.error.as_ref())
    }

    pub fn select_task_id_from_dispute_id(&self, dispute_id: DisputeId) -> Option<TaskId> {
        self.id_to_task_id.get(&dispute_id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{AppealFunding, DisputeFetched, FetchDispute, Meta};
    use crate::domain::dispute::fixtures::dispute;
    use crate::domain::task::fixtures::{TRANSLATOR, address};
    use linguo_adapter::{AppealSide, DisputeStatus, Ruling};
    use rust_decimal::Decimal;

    fn pending(task_id: TaskId) -> Action {
        Action::FetchDisputeByTaskId(AsyncAction::pending(FetchDispute { task_id }, Meta::new()))
    }

    fn fulfilled(task_id: TaskId, data: Dispute) -> Action {
        Action::FetchDisputeByTaskId(AsyncAction::fulfilled(
            DisputeFetched { task_id, data },
            Meta::new(),
        ))
    }

    fn rejected(task_id: TaskId, error: ActionError) -> Action {
        Action::FetchDisputeByTaskId(AsyncAction::rejected(
            FetchDispute { task_id },
            error,
            Meta::new(),
        ))
    }

    fn funding(task_id: TaskId, deposit: i64) -> AppealFunding {
        AppealFunding {
            task_id,
            side: AppealSide::Translator,
            deposit: Decimal::from(deposit),
            account: address(TRANSLATOR),
        }
    }

    #[test]
    fn test_fetch_lifecycle() {
        let state = reduce(DisputesState::default(), &pending(7));
        assert!(state.is_loading(7));
        assert!(state.select_by_task_id(7).is_none());

        let data = dispute(7, DisputeStatus::Appealable, Ruling::None);
        let state = reduce(state, &fulfilled(7, data.clone()));
        assert_eq!(state.select_loading_state(7), LoadingState::Succeeded);
        assert_eq!(state.select_by_task_id(7), Some(&data));
        assert_eq!(state.select_task_id_from_dispute_id(data.id), Some(7));
        assert!(state.task_ids.contains(&7));
    }

    #[test]
    fn test_unknown_task_defaults_to_idle() {
        let state = DisputesState::default();
        assert_eq!(state.select_loading_state(1), LoadingState::Idle);
        assert!(state.select_error(1).is_none());
    }

    #[test]
    fn test_rejection_stores_error_but_cancellation_does_not() {
        let error = ActionError::Api {
            code: Some(500),
            message: "boom".into(),
        };
        let state = reduce(DisputesState::default(), &pending(1));
        let state = reduce(state, &rejected(1, error.clone()));
        assert_eq!(state.select_loading_state(1), LoadingState::Failed);
        assert_eq!(state.select_error(1), Some(&error));

        let state = reduce(state, &pending(1));
        let state = reduce(state, &rejected(1, ActionError::Cancellation));
        assert_eq!(state.select_loading_state(1), LoadingState::Idle);
        assert!(state.select_error(1).is_none());
    }

    #[test]
    fn test_fund_appeal_fulfilled_updates_snapshot() {
        let data = dispute(3, DisputeStatus::Appealable, Ruling::TranslationApproved);
        let state = reduce(DisputesState::default(), &pending(3));
        let state = reduce(state, &fulfilled(3, data));

        let state = reduce(
            state,
            &Action::FundAppeal(AsyncAction::pending(funding(3, 60), Meta::new())),
        );
        assert!(state.is_loading(3));

        let state = reduce(
            state,
            &Action::FundAppeal(AsyncAction::fulfilled(funding(3, 60), Meta::new())),
        );
        let round = &state.select_by_task_id(3).unwrap().current_round;
        assert_eq!(round.paid_fees.translator, Decimal::from(60));
        assert_eq!(state.select_loading_state(3), LoadingState::Succeeded);
    }

    #[test]
    fn test_fund_appeal_without_entry_is_ignored() {
        let state = reduce(
            DisputesState::default(),
            &Action::FundAppeal(AsyncAction::fulfilled(funding(9, 60), Meta::new())),
        );
        assert!(state.by_task_id.is_empty());
    }
}
