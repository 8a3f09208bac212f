use chrono::{Days, NaiveDate};

use crate::habit::Habit;

/// Hard cap on the backward scan so a streak computation always terminates
/// in bounded time regardless of how old the habit is.
pub const STREAK_LOOKBACK_DAYS: u32 = 365;

/// Count of consecutive completed days ending at `reference`, with no gap.
///
/// Walks backward one calendar day at a time and stops at the first day whose
/// flag is false or absent, or after [`STREAK_LOOKBACK_DAYS`] steps.
pub fn streak(habit: &Habit, reference: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = reference;
    while count < STREAK_LOOKBACK_DAYS {
        if !habit.is_completed(day) {
            break;
        }
        count += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    count
}

/// Completion percentage over recorded ledger entries only, in `[0, 100]`.
///
/// Days the user never touched do not count toward the denominator, so a
/// fresh habit reads 0% just like one explicitly failed every day. That is
/// the documented behavior, preserved deliberately.
pub fn completion_rate(habit: &Habit) -> u32 {
    let total = habit.completions.len();
    if total == 0 {
        return 0;
    }
    let completed = habit.completions.values().filter(|done| **done).count();
    ((completed as f64 / total as f64) * 100.0).round() as u32
}
