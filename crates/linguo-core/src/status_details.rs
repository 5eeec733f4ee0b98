/*
[INPUT]:  Task, optional dispute, viewer account, current time
[OUTPUT]: Title, description lines and interaction offered to the viewer
[POS]:    Presentation-neutral narratives consumed by the CLI
[UPDATE]: When a task state gains or changes its narrative
*/

use chrono::{DateTime, Utc};
use linguo_adapter::{Address, AppealSide, Dispute, Task, TaskParty, TaskStatus};
use rust_decimal::Decimal;

use crate::appeal::{appeal_details, classify};
use crate::domain::task::{TaskView, is_pending, party_of, view};

const WEI_PER_ETH: u64 = 1_000_000_000_000_000_000;

/// Action the viewer can take from the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interaction {
    /// Fund the viewer's own appeal side.
    FundAppeal { side: AppealSide, deposit: Decimal },
    /// Contribute to either side's remaining appeal fees.
    Crowdfund {
        translator: Decimal,
        challenger: Decimal,
    },
    Reimburse { label: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDetails {
    pub title: String,
    pub description: Vec<String>,
    pub interaction: Option<Interaction>,
}

impl StatusDetails {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Vec::new(),
            interaction: None,
        }
    }

    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.description.push(line.into());
        self
    }

    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }
}

/// Wei amount rendered in ETH, e.g. `0.05 ETH`.
pub fn format_eth(wei: Decimal) -> String {
    format!("{} ETH", (wei / Decimal::from(WEI_PER_ETH)).normalize())
}

/// Narrative for `task` as seen by `account`.
pub fn task_status_details(
    task: &Task,
    dispute: Option<&Dispute>,
    account: Option<&Address>,
    now: DateTime<Utc>,
) -> StatusDetails {
    let party = party_of(task, account);
    match (view(task, now), dispute) {
        (TaskView::Incomplete, _) => incomplete_details(task, party),
        (_, Some(dispute)) if task.status >= TaskStatus::DisputeCreated => {
            appeal_details(classify(task, Some(dispute), now), task, dispute, party, now)
        }
        (view, _) => view_details(view, party),
    }
}

/// Narrative for a task that missed its submission deadline.
pub fn incomplete_details(task: &Task, party: TaskParty) -> StatusDetails {
    let title = "This translation was not completed on time";
    let assigned = task.status == TaskStatus::Assigned;
    if !is_pending(task) {
        let line = if task.parties.translator.is_some() {
            "The requester received the bounty back + the Translator Deposit."
        } else {
            "The requester was reimbursed of the bounty."
        };
        return StatusDetails::new(title).line(line);
    }

    let details = match (party, assigned) {
        (TaskParty::Translator, _) => StatusDetails::new(title)
            .line("You did not deliver the translation on time.")
            .line("Your Translator Deposit will be sent to the requester."),
        (TaskParty::Requester, true) => StatusDetails::new(title)
            .line("You will receive the Translator Deposit + the bounty back in a few moments."),
        (TaskParty::Requester, false) => StatusDetails::new(title)
            .line("You will be automatically reimbursed in a few moments."),
        (_, true) => StatusDetails::new(title).line(
            "We will send the Translator Deposit + the bounty back to the requester in a few moments.",
        ),
        (_, false) => StatusDetails::new(title)
            .line("The requester will be automatically reimbursed in a few moments."),
    };

    details
        .line("You can help speed up this process if you like.")
        .with_interaction(Interaction::Reimburse {
            label: if assigned {
                "Send Deposit"
            } else {
                "Reimburse Requester"
            },
        })
}

fn view_details(view: TaskView, party: TaskParty) -> StatusDetails {
    let line = match (view, party) {
        (TaskView::Open, TaskParty::Requester) => "Waiting for a translator to assign this task.",
        (TaskView::Open, _) => "This task is open to translators with the required skills.",
        (TaskView::InProgress, TaskParty::Translator) => {
            "You must deliver the translation before the submission deadline."
        }
        (TaskView::InProgress, _) => "A translator is working on this task.",
        (TaskView::InReview, TaskParty::Translator) => {
            "Your translation was delivered and is under review."
        }
        (TaskView::InReview, _) => {
            "The translation was delivered. It can be challenged until the review period ends."
        }
        (TaskView::InDispute, _) => "The translation was challenged.",
        (TaskView::Finished, _) => "The translation was accepted and the task is finished.",
        (TaskView::Incomplete, _) => "This translation was not completed on time.",
    };
    StatusDetails::new(view.label()).line(line)
}
