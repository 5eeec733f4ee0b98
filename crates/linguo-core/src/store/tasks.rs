/*
[INPUT]:  Task list fetch actions
[OUTPUT]: Tasks by id and per-account task lists with load state
[POS]:    State layer - tasks slice
[UPDATE]: When task list actions or selectors change
*/

use std::collections::HashMap;

use linguo_adapter::{Address, Task, TaskId};

use super::{Entry, LoadingState, matched_phase};
use crate::action::{Action, ActionKind, AsyncAction, match_any_async_type};
use crate::error::ActionError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TasksState {
    pub by_id: HashMap<TaskId, Task>,
    pub by_account: HashMap<Address, Entry<Vec<TaskId>>>,
}

pub fn reduce(mut state: TasksState, action: &Action) -> TasksState {
    match action {
        Action::FetchTasks(AsyncAction::Pending(env)) => {
            state.by_account.entry(env.payload.account.clone()).or_default();
        }
        Action::FetchTasks(AsyncAction::Fulfilled(env)) => {
            let ids = env.payload.data.iter().map(|task| task.id).collect();
            for task in &env.payload.data {
                state.by_id.insert(task.id, task.clone());
            }
            state
                .by_account
                .entry(env.payload.account.clone())
                .or_default()
                .data = Some(ids);
        }
        _ => {}
    }

    if let (Some(phase), Some(account)) = (
        matched_phase(match_any_async_type(&[ActionKind::FetchTasks]), action),
        action.account(),
    ) {
        if let Some(entry) = state.by_account.get_mut(account) {
            entry.apply_phase(phase, action.error());
        }
    }

    state
}

impl TasksState {
    pub fn select_by_id(&self, task_id: TaskId) -> Option<&Task> {
        self.by_id.get(&task_id)
    }

    /// Tasks last fetched for `account`, in backend order.
    pub fn select_by_account(&self, account: &Address) -> Vec<&Task> {
        self.by_account
            .get(account)
            .and_then(|entry| entry.data.as_ref())
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn select_loading_state(&self, account: &Address) -> LoadingState {
        self.by_account
            .get(account)
            .map(|entry| entry.loading_state)
            .unwrap_or_default()
    }

    pub fn select_error(&self, account: &Address) -> Option<&ActionError> {
        self.by_account.get(account).and_then(|entry| entry.error.as_ref())
    }
}
