/*
[INPUT]:  Requests from callers and results from workflows
[OUTPUT]: Tagged-union actions with request/pending/fulfilled/rejected phases and phase matchers
[POS]:    Coordination layer - the only input the reducers accept
[UPDATE]: When adding async operations or transaction events
*/

use std::fmt;

use linguo_adapter::{Address, AppealSide, Dispute, Task, TaskId, TxHash, TxReceipt};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::ActionError;

/// Lifecycle phase of an async action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Pending,
    Fulfilled,
    Rejected,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Pending => f.write_str("pending"),
            Phase::Fulfilled => f.write_str("fulfilled"),
            Phase::Rejected => f.write_str("rejected"),
        }
    }
}

/// Async operation families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    FetchTasks,
    FetchDisputeByTaskId,
    FundAppeal,
}

impl ActionKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ActionKind::FetchTasks => "tasks/fetchByAccount",
            ActionKind::FetchDisputeByTaskId => "disputes/fetchByTaskId",
            ActionKind::FundAppeal => "disputes/fundAppeal",
        }
    }
}

/// Options forwarded to the transaction registration workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxMeta {
    pub confirmations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub request_id: Uuid,
    pub tx: Option<TxMeta>,
}

impl Meta {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            tx: None,
        }
    }

    pub fn with_tx(tx: TxMeta) -> Self {
        Self {
            tx: Some(tx),
            ..Self::new()
        }
    }

    /// Separate the transaction options from the rest of the metadata.
    pub fn split_tx(self) -> (Option<TxMeta>, Meta) {
        let Meta { request_id, tx } = self;
        (
            tx,
            Meta {
                request_id,
                tx: None,
            },
        )
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<P> {
    pub payload: P,
    pub meta: Meta,
}

impl<P> Envelope<P> {
    pub fn new(payload: P, meta: Meta) -> Self {
        Self { payload, meta }
    }
}

/// Rejection payload: the original request plus the error.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection<R> {
    pub request: R,
    pub error: ActionError,
}

/// A request followed by its lifecycle actions.
#[derive(Debug, Clone, PartialEq)]
pub enum AsyncAction<Req, Ok> {
    Requested(Envelope<Req>),
    Pending(Envelope<Req>),
    Fulfilled(Envelope<Ok>),
    Rejected(Envelope<Rejection<Req>>),
}

impl<Req, Ok> AsyncAction<Req, Ok> {
    /// `None` for the triggering request.
    pub fn phase(&self) -> Option<Phase> {
        match self {
            AsyncAction::Requested(_) => None,
            AsyncAction::Pending(_) => Some(Phase::Pending),
            AsyncAction::Fulfilled(_) => Some(Phase::Fulfilled),
            AsyncAction::Rejected(_) => Some(Phase::Rejected),
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            AsyncAction::Requested(env) | AsyncAction::Pending(env) => &env.meta,
            AsyncAction::Fulfilled(env) => &env.meta,
            AsyncAction::Rejected(env) => &env.meta,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            AsyncAction::Rejected(env) => Some(&env.payload.error),
            _ => None,
        }
    }

    pub fn pending(request: Req, meta: Meta) -> Self {
        AsyncAction::Pending(Envelope::new(request, meta))
    }

    pub fn fulfilled(payload: Ok, meta: Meta) -> Self {
        AsyncAction::Fulfilled(Envelope::new(payload, meta))
    }

    pub fn rejected(request: Req, error: ActionError, meta: Meta) -> Self {
        AsyncAction::Rejected(Envelope::new(Rejection { request, error }, meta))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTasks {
    pub account: Address,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TasksFetched {
    pub account: Address,
    pub data: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchDispute {
    pub task_id: TaskId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisputeFetched {
    pub task_id: TaskId,
    pub data: Dispute,
}

/// A contribution to one side of the current appeal round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppealFunding {
    pub task_id: TaskId,
    pub side: AppealSide,
    pub deposit: Decimal,
    pub account: Address,
}

/// Events emitted by the transaction registration workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionAction {
    Registered { hash: TxHash, meta: Meta },
    Mined { receipt: TxReceipt, meta: Meta },
    Failed { hash: TxHash, error: ActionError, meta: Meta },
}

impl TransactionAction {
    pub fn hash(&self) -> &TxHash {
        match self {
            TransactionAction::Registered { hash, .. } | TransactionAction::Failed { hash, .. } => {
                hash
            }
            TransactionAction::Mined { receipt, .. } => &receipt.hash,
        }
    }
}

/// Every action the store and coordinator understand.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchTasks(AsyncAction<FetchTasks, TasksFetched>),
    FetchDisputeByTaskId(AsyncAction<FetchDispute, DisputeFetched>),
    FundAppeal(AsyncAction<AppealFunding, AppealFunding>),
    Transaction(TransactionAction),
}

impl Action {
    pub fn fetch_tasks(account: Address) -> Self {
        Action::FetchTasks(AsyncAction::Requested(Envelope::new(
            FetchTasks { account },
            Meta::new(),
        )))
    }

    pub fn fetch_dispute_by_task_id(task_id: TaskId) -> Self {
        Self::fetch_dispute_by_task_id_with_meta(task_id, Meta::new())
    }

    pub fn fetch_dispute_by_task_id_with_meta(task_id: TaskId, meta: Meta) -> Self {
        Action::FetchDisputeByTaskId(AsyncAction::Requested(Envelope::new(
            FetchDispute { task_id },
            meta,
        )))
    }

    pub fn fund_appeal(funding: AppealFunding, tx: TxMeta) -> Self {
        Action::FundAppeal(AsyncAction::Requested(Envelope::new(
            funding,
            Meta::with_tx(tx),
        )))
    }

    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Action::FetchTasks(_) => Some(ActionKind::FetchTasks),
            Action::FetchDisputeByTaskId(_) => Some(ActionKind::FetchDisputeByTaskId),
            Action::FundAppeal(_) => Some(ActionKind::FundAppeal),
            Action::Transaction(_) => None,
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            Action::FetchTasks(action) => action.phase(),
            Action::FetchDisputeByTaskId(action) => action.phase(),
            Action::FundAppeal(action) => action.phase(),
            Action::Transaction(_) => None,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            Action::FetchTasks(action) => action.meta(),
            Action::FetchDisputeByTaskId(action) => action.meta(),
            Action::FundAppeal(action) => action.meta(),
            Action::Transaction(
                TransactionAction::Registered { meta, .. }
                | TransactionAction::Mined { meta, .. }
                | TransactionAction::Failed { meta, .. },
            ) => meta,
        }
    }

    pub fn error(&self) -> Option<&ActionError> {
        match self {
            Action::FetchTasks(action) => action.error(),
            Action::FetchDisputeByTaskId(action) => action.error(),
            Action::FundAppeal(action) => action.error(),
            Action::Transaction(TransactionAction::Failed { error, .. }) => Some(error),
            Action::Transaction(_) => None,
        }
    }

    /// Task key of dispute actions.
    pub fn task_id(&self) -> Option<TaskId> {
        match self {
            Action::FetchDisputeByTaskId(action) => Some(match action {
                AsyncAction::Requested(env) | AsyncAction::Pending(env) => env.payload.task_id,
                AsyncAction::Fulfilled(env) => env.payload.task_id,
                AsyncAction::Rejected(env) => env.payload.request.task_id,
            }),
            Action::FundAppeal(action) => Some(match action {
                AsyncAction::Requested(env) | AsyncAction::Pending(env) => env.payload.task_id,
                AsyncAction::Fulfilled(env) => env.payload.task_id,
                AsyncAction::Rejected(env) => env.payload.request.task_id,
            }),
            _ => None,
        }
    }

    /// Account key of task list actions.
    pub fn account(&self) -> Option<&Address> {
        match self {
            Action::FetchTasks(action) => Some(match action {
                AsyncAction::Requested(env) | AsyncAction::Pending(env) => &env.payload.account,
                AsyncAction::Fulfilled(env) => &env.payload.account,
                AsyncAction::Rejected(env) => &env.payload.request.account,
            }),
            _ => None,
        }
    }

    /// Type string used in logs, e.g. `disputes/fetchByTaskId/rejected`.
    pub fn type_name(&self) -> String {
        match (self.kind(), self.phase(), self) {
            (Some(kind), Some(phase), _) => format!("{}/{}", kind.type_name(), phase),
            (Some(kind), None, _) => kind.type_name().to_string(),
            (None, _, Action::Transaction(TransactionAction::Registered { .. })) => {
                "transactions/registered".to_string()
            }
            (None, _, Action::Transaction(TransactionAction::Mined { .. })) => {
                "transactions/mined".to_string()
            }
            (None, _, _) => "transactions/failed".to_string(),
        }
    }
}

/// Matches any action of the given kinds in one lifecycle phase.
#[derive(Debug, Clone)]
pub struct AsyncMatcher {
    kinds: Vec<ActionKind>,
    phase: Phase,
}

impl AsyncMatcher {
    pub fn matches(&self, action: &Action) -> bool {
        action.phase() == Some(self.phase)
            && action.kind().is_some_and(|kind| self.kinds.contains(&kind))
    }
}

/// Build a matcher factory over a set of kinds, parameterised by phase.
pub fn match_any_async_type(kinds: &[ActionKind]) -> impl Fn(Phase) -> AsyncMatcher + '_ {
    move |phase| AsyncMatcher {
        kinds: kinds.to_vec(),
        phase,
    }
}
