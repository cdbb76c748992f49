//! Feasibility score

/// Upper bound on the overload penalty
pub const MAX_OVERLOAD_PENALTY: f64 = 0.3;

/// Penalty per unit fraction of overloaded days
pub const OVERLOAD_PENALTY_WEIGHT: f64 = 0.5;

/// Score in `0..=100` summarizing whether capacity covers demand
///
/// `round(clamp(0, 100, (min(1, capacity / demand) - penalty) * 100))`
/// where the penalty is `min(MAX_OVERLOAD_PENALTY, OVERLOAD_PENALTY_WEIGHT *
/// overloaded_days / total_days)`. Zero (or negative) demand scores 100.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn feasibility_score(capacity: f64, demand: f64, overloaded_days: u32, total_days: u32) -> u8 {
    if demand.is_nan() || demand <= 0.0 {
        return 100;
    }

    let coverage = if capacity.is_finite() && capacity > 0.0 {
        (capacity / demand).min(1.0)
    } else {
        0.0
    };

    let penalty = if total_days == 0 {
        0.0
    } else {
        let fraction = f64::from(overloaded_days.min(total_days)) / f64::from(total_days);
        (fraction * OVERLOAD_PENALTY_WEIGHT).min(MAX_OVERLOAD_PENALTY)
    };

    ((coverage - penalty) * 100.0).clamp(0.0, 100.0).round() as u8
}
