use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One day of the recent-history strip a UI binds habit toggles to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayCell {
    pub date: NaiveDate,
    /// Short English weekday label, e.g. "Mon".
    pub weekday: String,
    pub day_of_month: u32,
}

/// The `count` most recent calendar days, oldest first, ending at
/// `reference` inclusive. Pure function of its arguments.
pub fn recent_days(reference: NaiveDate, count: usize) -> Vec<DayCell> {
    let mut days = Vec::with_capacity(count);
    for back in (0..count as u64).rev() {
        if let Some(date) = reference.checked_sub_days(Days::new(back)) {
            days.push(DayCell {
                date,
                weekday: date.format("%a").to_string(),
                day_of_month: date.day(),
            });
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn window_has_exact_length_and_ends_at_reference() {
        let reference = day("2024-03-10");
        let window = recent_days(reference, 7);
        assert_eq!(window.len(), 7);
        assert_eq!(window.first().unwrap().date, day("2024-03-04"));
        assert_eq!(window.last().unwrap().date, reference);
    }

    #[test]
    fn window_increases_by_one_day_per_cell() {
        let window = recent_days(day("2024-03-03"), 7);
        for pair in window.windows(2) {
            assert_eq!(
                pair[1].date,
                pair[0].date.checked_add_days(Days::new(1)).unwrap()
            );
        }
        // Crosses the February boundary in a leap year.
        assert_eq!(window.first().unwrap().date, day("2024-02-26"));
    }

    #[test]
    fn cells_carry_weekday_label_and_day_number() {
        let window = recent_days(day("2024-03-04"), 1);
        assert_eq!(window[0].weekday, "Mon");
        assert_eq!(window[0].day_of_month, 4);
    }
}
