/*
[INPUT]:  Dispute records from the adapter and the current time
[OUTPUT]: Appeal period checks, appeal cost and funding updates
[POS]:    Domain layer - pure dispute functions, no I/O
[UPDATE]: When crowdfunding rules or dispute status semantics change
*/

use chrono::{DateTime, Duration, Utc};
use linguo_adapter::{AppealSide, Dispute, DisputeStatus, Ruling};
use rust_decimal::Decimal;

pub fn is_waiting(dispute: &Dispute) -> bool {
    dispute.status == DisputeStatus::Waiting
}

pub fn is_appealable(dispute: &Dispute) -> bool {
    dispute.status == DisputeStatus::Appealable
}

pub fn is_solved(dispute: &Dispute) -> bool {
    dispute.status == DisputeStatus::Solved
}

/// Jurors gave no ruling for the current round.
pub fn refused_to_rule(dispute: &Dispute) -> bool {
    dispute.ruling == Ruling::None
}

/// True iff `now` lies in `[start, end)`.
pub fn is_within_appeal_period(dispute: &Dispute, now: DateTime<Utc>) -> bool {
    let period = &dispute.appeal_period;
    period.start <= now && now < period.end
}

pub fn remaining_time_for_appeal(dispute: &Dispute, now: DateTime<Utc>) -> Duration {
    (dispute.appeal_period.end - now).max(Duration::zero())
}

/// Stake multiplier applying to `side`: shared when there is no winner,
/// winner/loser otherwise.
pub fn stake_multiplier(dispute: &Dispute, side: AppealSide) -> u64 {
    let multipliers = &dispute.multipliers;
    match dispute.ruling {
        Ruling::None => multipliers.shared,
        ruling if ruling == side.ruling() => multipliers.winner,
        _ => multipliers.loser,
    }
}

/// Appeal cost plus the side's stake, before any contribution.
pub fn full_appeal_cost(dispute: &Dispute, side: AppealSide) -> Decimal {
    let divisor = dispute.multipliers.divisor;
    if divisor == 0 {
        return dispute.appeal_cost;
    }

    let multiplier = Decimal::from(stake_multiplier(dispute, side));
    let stake = match dispute.appeal_cost.checked_mul(multiplier) {
        Some(scaled) => scaled / Decimal::from(divisor),
        None => dispute.appeal_cost / Decimal::from(divisor) * multiplier,
    };
    dispute.appeal_cost + stake.trunc()
}

/// Deposit required from `side` this round.
///
/// An under-funded side owes the full multiplied cost. Once the side is
/// marked as paid only the remainder, if any, is owed.
pub fn total_appeal_cost(dispute: &Dispute, side: AppealSide) -> Decimal {
    let full = full_appeal_cost(dispute, side);
    if *dispute.current_round.has_paid.get(side) {
        (full - *dispute.current_round.paid_fees.get(side)).max(Decimal::ZERO)
    } else {
        full
    }
}

/// Amount still missing for `side` counting crowdfunded contributions.
pub fn remaining_appeal_cost(dispute: &Dispute, side: AppealSide) -> Decimal {
    let paid = *dispute.current_round.paid_fees.get(side);
    (full_appeal_cost(dispute, side) - paid).max(Decimal::ZERO)
}

/// New dispute value with `deposit` credited to `side`. The input is untouched.
pub fn register_appeal_funding(dispute: &Dispute, deposit: Decimal, side: AppealSide) -> Dispute {
    let full = full_appeal_cost(dispute, side);
    let mut next = dispute.clone();
    let round = &mut next.current_round;

    let paid = round.paid_fees.get_mut(side);
    *paid += deposit;
    let fully_funded = *paid >= full;

    let has_paid = round.has_paid.get_mut(side);
    *has_paid = *has_paid || fully_funded;

    next
}
