/*
[INPUT]:  Task, dispute snapshot, viewing party, current time
[OUTPUT]: Appeal state classification and per-party dispute narratives
[POS]:    Appeal workflow - decides what each party is told and may do
[UPDATE]: When payout rules or appeal narratives change
*/

use std::fmt;

use chrono::{DateTime, Utc};
use linguo_adapter::{AppealSide, Dispute, Ruling, Task, TaskParty, TaskStatus};

use crate::domain::dispute::{
    is_appealable, is_waiting, is_within_appeal_period, refused_to_rule, remaining_appeal_cost,
    remaining_time_for_appeal, total_appeal_cost,
};
use crate::domain::task::challenger_is_requester;
use crate::status_details::{Interaction, StatusDetails, format_eth};

/// Where a dispute stands from the appeal point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppealState {
    NoDispute,
    Waiting,
    Appealable,
    RefusedToRule,
    AppealPeriodOver,
    Solved,
}

/// Classify the appeal state of `task` given its dispute snapshot.
///
/// An appealable ruling seen before its appeal period opens is still
/// reported as waiting.
pub fn classify(task: &Task, dispute: Option<&Dispute>, now: DateTime<Utc>) -> AppealState {
    let Some(dispute) = dispute else {
        return AppealState::NoDispute;
    };
    if task.status < TaskStatus::DisputeCreated {
        return AppealState::NoDispute;
    }

    if is_waiting(dispute) || (is_appealable(dispute) && now < dispute.appeal_period.start) {
        AppealState::Waiting
    } else if is_appealable(dispute) {
        match (is_within_appeal_period(dispute, now), refused_to_rule(dispute)) {
            (true, true) => AppealState::RefusedToRule,
            (true, false) => AppealState::Appealable,
            (false, _) => AppealState::AppealPeriodOver,
        }
    } else {
        AppealState::Solved
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deposit {
    Requester,
    Translator,
    Challenger,
}

impl fmt::Display for Deposit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deposit::Requester => f.write_str("Requester Deposit"),
            Deposit::Translator => f.write_str("Translator Deposit"),
            Deposit::Challenger => f.write_str("Challenger Deposit"),
        }
    }
}

/// What a party gets back when the jurors refuse to rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub deposits: Vec<Deposit>,
    pub minus_arbitration_fees: bool,
}

impl fmt::Display for Payout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let deposits: Vec<String> = self.deposits.iter().map(ToString::to_string).collect();
        f.write_str(&deposits.join(" + "))?;
        if self.minus_arbitration_fees {
            f.write_str(" minus Arbitration Fees")?;
        }
        Ok(())
    }
}

impl Payout {
    /// Payout phrased for the holder of `own`, e.g.
    /// `the Requester Deposit + your Challenger Deposit - Arbitration Fees`.
    pub fn addressed_to(&self, own: Option<Deposit>) -> String {
        let deposits: Vec<String> = self
            .deposits
            .iter()
            .map(|deposit| {
                let article = if Some(*deposit) == own { "your" } else { "the" };
                format!("{article} {deposit}")
            })
            .collect();
        let mut line = deposits.join(" + ");
        if self.minus_arbitration_fees {
            line.push_str(" - Arbitration Fees");
        }
        line
    }
}

/// Refusal-to-rule payout for `party`. `Other` recovers nothing.
pub fn refusal_payout(party: TaskParty, challenger_is_requester: bool) -> Option<Payout> {
    let (deposits, minus_arbitration_fees) = match party {
        TaskParty::Translator => (vec![Deposit::Translator], true),
        TaskParty::Challenger if challenger_is_requester => {
            (vec![Deposit::Requester, Deposit::Challenger], true)
        }
        TaskParty::Challenger => (vec![Deposit::Challenger], true),
        TaskParty::Requester => (vec![Deposit::Requester], false),
        TaskParty::Other => return None,
    };
    Some(Payout {
        deposits,
        minus_arbitration_fees,
    })
}

/// Narrative and available interaction for `party` in `state`.
pub fn appeal_details(
    state: AppealState,
    task: &Task,
    dispute: &Dispute,
    party: TaskParty,
    now: DateTime<Utc>,
) -> StatusDetails {
    let challenger_is_requester = challenger_is_requester(task);
    match state {
        AppealState::NoDispute => StatusDetails::new("There is no dispute for this translation"),
        AppealState::Waiting => StatusDetails::new("Specialized jurors are evaluating the case")
            .line("The translation was challenged and is now being evaluated by specialized jurors.")
            .line("You will be notified once there is a decision."),
        AppealState::RefusedToRule => {
            let details = StatusDetails::new("The jurors refused to vote")
                .line(refusal_line(party, challenger_is_requester))
                .line(appeal_note(party));
            with_appeal_interaction(details, dispute, party)
        }
        AppealState::Appealable => {
            let details = StatusDetails::new(ruling_title(dispute.ruling))
                .line(outcome_line(dispute.ruling, party, challenger_is_requester))
                .line(appeal_note(party));
            let remaining = remaining_time_for_appeal(dispute, now);
            with_appeal_interaction(details, dispute, party).line(format!(
                "The appeal period ends in {} hours.",
                remaining.num_hours()
            ))
        }
        AppealState::AppealPeriodOver => StatusDetails::new("The appeal period is over")
            .line(outcome_line(dispute.ruling, party, challenger_is_requester))
            .line("The final decision will be enforced in a few moments."),
        AppealState::Solved => StatusDetails::new(ruling_title(dispute.ruling))
            .line(outcome_line(dispute.ruling, party, challenger_is_requester))
            .line("This decision is final."),
    }
}

fn ruling_title(ruling: Ruling) -> &'static str {
    match ruling {
        Ruling::None => "The jurors refused to vote",
        Ruling::TranslationApproved => "The jurors approved the translation",
        Ruling::TranslationRejected => "The jurors rejected the translation",
    }
}

const REFUSAL_FOR_OTHER: &str = "The requester will receive the Requester Deposit back. \
     The translator will get the Translator Deposit back - Arbitration Fees. \
     The challenger will get the Challenger Deposit - Arbitration Fees back.";

fn refusal_line(party: TaskParty, challenger_is_requester: bool) -> String {
    let Some(payout) = refusal_payout(party, challenger_is_requester) else {
        return REFUSAL_FOR_OTHER.to_string();
    };
    let (own, qualifier) = match party {
        TaskParty::Translator => (Some(Deposit::Translator), "only "),
        TaskParty::Challenger => (Some(Deposit::Challenger), ""),
        _ => (None, ""),
    };
    format!("You will receive {qualifier}{} back.", payout.addressed_to(own))
}

fn outcome_line(ruling: Ruling, party: TaskParty, challenger_is_requester: bool) -> String {
    let approved = match ruling {
        Ruling::None => return refusal_line(party, challenger_is_requester),
        Ruling::TranslationApproved => true,
        Ruling::TranslationRejected => false,
    };
    let line = match (party, approved) {
        (TaskParty::Translator, true) => {
            "You will receive the bounty + your Translator Deposit + the Challenger Deposit - Arbitration Fees."
        }
        (TaskParty::Translator, false) => "You will lose your Translator Deposit.",
        (TaskParty::Challenger, true) => "You will lose your Challenger Deposit.",
        (TaskParty::Challenger, false) if challenger_is_requester => {
            "You will receive the Requester Deposit + your Challenger Deposit + the Translator Deposit - Arbitration Fees."
        }
        (TaskParty::Challenger, false) => {
            "You will receive your Challenger Deposit + the Translator Deposit - Arbitration Fees."
        }
        (TaskParty::Requester, true) => "The bounty will be paid to the translator.",
        (TaskParty::Requester, false) => "You will receive the Requester Deposit back.",
        (TaskParty::Other, true) => {
            "The translator will receive the bounty + the Translator Deposit + the Challenger Deposit - Arbitration Fees."
        }
        (TaskParty::Other, false) => {
            "The requester will receive the Requester Deposit back. \
             The challenger will receive the Challenger Deposit + the Translator Deposit - Arbitration Fees."
        }
    };
    line.to_string()
}

fn appeal_note(party: TaskParty) -> &'static str {
    match party {
        TaskParty::Requester => {
            "Note that you can still appeal the decision, which will lead to another jurors round that may or may not revert this decision."
        }
        TaskParty::Other => {
            "Note that anyone can still appeal the decision, which will lead to another jurors round that may or may not revert this decision."
        }
        _ => {
            "Note that anyone can appeal the decision, which will lead to another jurors round that may or may not revert this decision."
        }
    }
}

/// Translator and challenger fund their own side; everyone else may crowdfund.
fn with_appeal_interaction(details: StatusDetails, dispute: &Dispute, party: TaskParty) -> StatusDetails {
    match AppealSide::try_from(party) {
        Ok(side) => {
            let deposit = total_appeal_cost(dispute, side);
            details
                .line(format!(
                    "If there is an appeal, you will be required to provide a {} deposit, which you can provide yourself or be crowdfunded. If you fail to do so, you will automatically lose the dispute.",
                    format_eth(deposit)
                ))
                .with_interaction(Interaction::FundAppeal { side, deposit })
        }
        Err(_) => details.with_interaction(Interaction::Crowdfund {
            translator: remaining_appeal_cost(dispute, AppealSide::Translator),
            challenger: remaining_appeal_cost(dispute, AppealSide::Challenger),
        }),
    }
}
