/*
[INPUT]:  Workflow requests keyed by task id, account or a single slot
[OUTPUT]: In-flight workflow bookkeeping enforcing latest-wins or leading-wins
[POS]:    Coordination layer - request deduplication
[UPDATE]: When adding take policies or changing cancellation guarantees
*/

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TakePolicy {
    /// A new request cancels the one in flight for the same key.
    Latest,
    /// New requests are dropped while one is in flight for the same key.
    Leading,
}

#[derive(Debug)]
struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Tracks one in-flight workflow per key.
#[derive(Debug)]
pub struct Watcher<K> {
    name: &'static str,
    policy: TakePolicy,
    in_flight: HashMap<K, InFlight>,
}

impl<K> Watcher<K>
where
    K: Eq + Hash + Debug,
{
    pub fn new(name: &'static str, policy: TakePolicy) -> Self {
        Self {
            name,
            policy,
            in_flight: HashMap::new(),
        }
    }

    pub fn latest(name: &'static str) -> Self {
        Self::new(name, TakePolicy::Latest)
    }

    pub fn leading(name: &'static str) -> Self {
        Self::new(name, TakePolicy::Leading)
    }

    /// Cancel every running workflow. Leading workflows are never
    /// cancelled, so this is a no-op for them. Returns how many were signalled.
    pub fn cancel_all(&mut self) -> usize {
        if self.policy == TakePolicy::Leading {
            return 0;
        }
        self.in_flight.retain(|_, running| !running.handle.is_finished());
        for (key, running) in &self.in_flight {
            debug!(watcher = self.name, key = ?key, "cancelling on shutdown");
            running.token.cancel();
        }
        self.in_flight.len()
    }

    /// Start `workflow` for `key` unless the policy drops it.
    ///
    /// Under `Latest` the previous workflow is cancelled and joined before
    /// the new one is spawned, so its terminal action is always emitted
    /// first. Returns `false` when the request was dropped.
    pub async fn take<F, Fut>(&mut self, key: K, tracker: &TaskTracker, workflow: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.in_flight.retain(|_, running| !running.handle.is_finished());

        match self.policy {
            TakePolicy::Leading => {
                if self.in_flight.contains_key(&key) {
                    debug!(watcher = self.name, key = ?key, "request dropped, one already in flight");
                    return false;
                }
            }
            TakePolicy::Latest => {
                if let Some(previous) = self.in_flight.remove(&key) {
                    debug!(watcher = self.name, key = ?key, "cancelling superseded request");
                    previous.token.cancel();
                    if let Err(join_err) = previous.handle.await {
                        warn!(watcher = self.name, key = ?key, "superseded workflow did not exit cleanly: {join_err}");
                    }
                }
            }
        }

        let token = CancellationToken::new();
        let handle = tracker.spawn(workflow(token.clone()));
        self.in_flight.insert(key, InFlight { token, handle });
        true
    }

    /// Number of workflows still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight
            .values()
            .filter(|running| !running.handle.is_finished())
            .count()
    }
}
