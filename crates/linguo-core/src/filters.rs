/*
[INPUT]:  Filter names from callers, tasks and the current time
[OUTPUT]: TaskFilter with name parsing and listing predicate
[POS]:    Listing layer - named task filters
[UPDATE]: When adding a listing filter
*/

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use linguo_adapter::Task;
use tracing::debug;

use crate::domain::task::{TaskView, view};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TaskFilter {
    #[default]
    All,
    Open,
    InProgress,
    InReview,
    InDispute,
    Finished,
    Incomplete,
}

impl TaskFilter {
    pub const ALL: [TaskFilter; 7] = [
        TaskFilter::All,
        TaskFilter::Open,
        TaskFilter::InProgress,
        TaskFilter::InReview,
        TaskFilter::InDispute,
        TaskFilter::Finished,
        TaskFilter::Incomplete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskFilter::All => "all",
            TaskFilter::Open => "open",
            TaskFilter::InProgress => "inProgress",
            TaskFilter::InReview => "inReview",
            TaskFilter::InDispute => "inDispute",
            TaskFilter::Finished => "finished",
            TaskFilter::Incomplete => "incomplete",
        }
    }

    /// Parse `name`, falling back to `All` for unknown names.
    pub fn from_name_or_all(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            debug!(filter = name, "unknown filter, using all");
            TaskFilter::All
        })
    }

    pub fn predicate(self, task: &Task, now: DateTime<Utc>) -> bool {
        let expected = match self {
            TaskFilter::All => return true,
            TaskFilter::Open => TaskView::Open,
            TaskFilter::InProgress => TaskView::InProgress,
            TaskFilter::InReview => TaskView::InReview,
            TaskFilter::InDispute => TaskView::InDispute,
            TaskFilter::Finished => TaskView::Finished,
            TaskFilter::Incomplete => TaskView::Incomplete,
        };
        view(task, now) == expected
    }
}

impl fmt::Display for TaskFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TaskFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown task filter: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::fixtures::{epoch, task};
    use chrono::Duration;
    use linguo_adapter::TaskStatus;

    #[test]
    fn test_parse_names() {
        assert_eq!("inReview".parse(), Ok(TaskFilter::InReview));
        assert_eq!("INDISPUTE".parse(), Ok(TaskFilter::InDispute));
        assert!("popular".parse::<TaskFilter>().is_err());
        assert_eq!(TaskFilter::from_name_or_all("popular"), TaskFilter::All);
    }

    #[test]
    fn test_predicate_uses_view() {
        let open = task(1, TaskStatus::Created);
        assert!(TaskFilter::Open.predicate(&open, epoch()));
        assert!(TaskFilter::All.predicate(&open, epoch()));
        assert!(!TaskFilter::InProgress.predicate(&open, epoch()));

        let late = epoch() + Duration::days(2);
        assert!(!TaskFilter::Open.predicate(&open, late));
        assert!(TaskFilter::Incomplete.predicate(&open, late));
    }
}
