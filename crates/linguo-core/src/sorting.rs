/*
[INPUT]:  Filter name, viewer account, translator skills, current time
[OUTPUT]: Multi-step task comparators and sorted task listings
[POS]:    Listing layer - per-view ordering
[UPDATE]: When a view's ordering rules change
*/

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use linguo_adapter::{Address, Task, TaskParty};

use crate::domain::skills::{Skill, SkillsMatcher};
use crate::domain::task::{
    current_price, current_price_per_word, is_incomplete, party_of,
    remaining_time_for_review, remaining_time_for_submission,
};
use crate::filters::TaskFilter;

/// Task properties usable in property steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKey {
    Id,
    DisputeId,
    Status,
    LastInteraction,
}

impl TaskKey {
    /// Numeric sort value; a missing dispute sorts as -1.
    pub fn value(self, task: &Task) -> i128 {
        match self {
            TaskKey::Id => i128::from(task.id),
            TaskKey::DisputeId => task.dispute_id.map_or(-1, i128::from),
            TaskKey::Status => i128::from(task.status.as_index()),
            TaskKey::LastInteraction => i128::from(task.last_interaction.timestamp()),
        }
    }
}

type CompareFn = Box<dyn Fn(&Task, &Task) -> Ordering + Send + Sync>;

pub enum SortStep {
    /// Compare a property; `sign < 0` sorts descending.
    Property { key: TaskKey, sign: i8 },
    Custom(CompareFn),
}

impl SortStep {
    pub fn desc(key: TaskKey) -> Self {
        SortStep::Property { key, sign: -1 }
    }

    pub fn custom(compare: impl Fn(&Task, &Task) -> Ordering + Send + Sync + 'static) -> Self {
        SortStep::Custom(Box::new(compare))
    }

    fn apply(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortStep::Property { key, sign } => {
                let ordering = key.value(a).cmp(&key.value(b));
                match sign.cmp(&0) {
                    Ordering::Less => ordering.reverse(),
                    Ordering::Equal => Ordering::Equal,
                    Ordering::Greater => ordering,
                }
            }
            SortStep::Custom(compare) => compare(a, b),
        }
    }
}

/// Ordered list of steps; the first non-equal step decides.
pub struct TaskComparator {
    steps: Vec<SortStep>,
}

impl TaskComparator {
    pub fn new(steps: Vec<SortStep>) -> Self {
        Self { steps }
    }

    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        self.steps
            .iter()
            .map(|step| step.apply(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Stable sort.
    pub fn sort(&self, tasks: &mut [Task]) {
        tasks.sort_by(|a, b| self.compare(a, b));
    }
}

/// Viewer context a comparator is built for.
#[derive(Debug, Clone, Default)]
pub struct SortContext {
    pub account: Option<Address>,
    pub skills: Vec<Skill>,
}

/// Comparator for `filter`, evaluated against `now`.
pub fn get_comparator(filter: TaskFilter, context: &SortContext, now: DateTime<Utc>) -> TaskComparator {
    let matcher = Arc::new(SkillsMatcher::new(&context.skills));
    let account = context.account.clone();

    let skills_first = || {
        let matcher = matcher.clone();
        SortStep::custom(move |a, b| matcher.matches(b).cmp(&matcher.matches(a)))
    };
    let is_translator = {
        let account = account.clone();
        move |task: &Task| party_of(task, account.as_ref()) == TaskParty::Translator
    };

    let steps = match filter {
        TaskFilter::All => vec![
            SortStep::custom(move |a, b| is_incomplete(a, now).cmp(&is_incomplete(b, now))),
            remaining_submission_desc(now),
            SortStep::desc(TaskKey::Id),
        ],
        TaskFilter::Open => vec![
            skills_first(),
            SortStep::custom(move |a, b| price_per_word(b, now).cmp(&price_per_word(a, now))),
            SortStep::desc(TaskKey::Id),
        ],
        TaskFilter::InProgress => vec![
            skills_first(),
            remaining_submission_desc(now),
            SortStep::desc(TaskKey::Id),
        ],
        TaskFilter::InReview => vec![
            skills_first(),
            SortStep::custom(move |a, b| is_translator(a).cmp(&is_translator(b))),
            SortStep::custom(move |a, b| {
                remaining_time_for_review(b, now).cmp(&remaining_time_for_review(a, now))
            }),
            SortStep::desc(TaskKey::Id),
        ],
        TaskFilter::InDispute => {
            let is_involved = move |task: &Task| {
                matches!(
                    party_of(task, account.as_ref()),
                    TaskParty::Translator | TaskParty::Challenger
                )
            };
            vec![
                skills_first(),
                SortStep::custom(move |a, b| is_involved(b).cmp(&is_involved(a))),
                SortStep::desc(TaskKey::DisputeId),
            ]
        }
        TaskFilter::Finished => vec![SortStep::desc(TaskKey::Id)],
        TaskFilter::Incomplete => vec![
            SortStep::custom(move |a, b| is_translator(b).cmp(&is_translator(a))),
            SortStep::desc(TaskKey::Status),
            SortStep::desc(TaskKey::LastInteraction),
            SortStep::desc(TaskKey::Id),
        ],
    };

    TaskComparator::new(steps)
}

/// Like [`get_comparator`], but unknown names fall back to `all`.
pub fn get_comparator_by_name(name: &str, context: &SortContext, now: DateTime<Utc>) -> TaskComparator {
    get_comparator(TaskFilter::from_name_or_all(name), context, now)
}

/// Tasks admitted by `filter`, in the filter's order.
pub fn list_tasks<'a>(
    tasks: impl IntoIterator<Item = &'a Task>,
    filter: TaskFilter,
    context: &SortContext,
    now: DateTime<Utc>,
) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .into_iter()
        .filter(|task| filter.predicate(task, now))
        .cloned()
        .collect();
    get_comparator(filter, context, now).sort(&mut selected);
    selected
}

fn remaining_submission_desc(now: DateTime<Utc>) -> SortStep {
    SortStep::custom(move |a, b| {
        remaining_time_for_submission(b, now).cmp(&remaining_time_for_submission(a, now))
    })
}

fn price_per_word(task: &Task, now: DateTime<Utc>) -> rust_decimal::Decimal {
    current_price_per_word(current_price(task, now), task.word_count)
}
