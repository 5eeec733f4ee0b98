/*
[INPUT]:  Transaction registration events
[OUTPUT]: Submitted transactions by hash with mining status
[POS]:    State layer - transactions slice
[UPDATE]: When transaction events change
*/

use std::collections::HashMap;

use linguo_adapter::{TxHash, TxStatus};

use crate::action::{Action, TransactionAction};
use crate::error::ActionError;

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEntry {
    pub status: TxStatus,
    pub block_number: Option<u64>,
    pub confirmations: u32,
    pub error: Option<ActionError>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionsState {
    pub by_hash: HashMap<TxHash, TransactionEntry>,
    /// Hashes in submission order.
    pub order: Vec<TxHash>,
}

pub fn reduce(mut state: TransactionsState, action: &Action) -> TransactionsState {
    let Action::Transaction(event) = action else {
        return state;
    };

    match event {
        TransactionAction::Registered { hash, .. } => {
            if !state.by_hash.contains_key(hash) {
                state.order.push(hash.clone());
            }
            state.by_hash.insert(
                hash.clone(),
                TransactionEntry {
                    status: TxStatus::Pending,
                    block_number: None,
                    confirmations: 0,
                    error: None,
                },
            );
        }
        TransactionAction::Mined { receipt, .. } => {
            if let Some(entry) = state.by_hash.get_mut(&receipt.hash) {
                entry.status = TxStatus::Mined;
                entry.block_number = receipt.block_number;
                entry.confirmations = receipt.confirmations;
            }
        }
        TransactionAction::Failed { hash, error, .. } => {
            if let Some(entry) = state.by_hash.get_mut(hash) {
                entry.status = TxStatus::Failed;
                entry.error = Some(error.clone());
            }
        }
    }

    state
}

impl TransactionsState {
    pub fn select_by_hash(&self, hash: &TxHash) -> Option<&TransactionEntry> {
        self.by_hash.get(hash)
    }
}
