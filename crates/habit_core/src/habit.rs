use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Fixed palette a habit's display color is drawn from at creation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
    Indigo,
    Teal,
    Red,
}

impl ColorTag {
    pub const PALETTE: [ColorTag; 8] = [
        ColorTag::Blue,
        ColorTag::Green,
        ColorTag::Purple,
        ColorTag::Orange,
        ColorTag::Pink,
        ColorTag::Indigo,
        ColorTag::Teal,
        ColorTag::Red,
    ];
}

/// A tracked recurring activity with a per-calendar-day completion ledger.
///
/// Absence of a date key in `completions` means "not completed", never
/// "unknown"; a recorded `false` entry stays in the ledger so that the
/// completion rate keeps counting it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Habit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub color: ColorTag,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completions: BTreeMap<NaiveDate, bool>,
}

impl Habit {
    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completions.get(&date).copied().unwrap_or(false)
    }

    /// Flips the completion flag for `date`, treating an absent entry as
    /// `false`. Applying this twice with the same date restores the prior
    /// ledger exactly.
    pub fn toggle_completion(&mut self, date: NaiveDate) {
        let entry = self.completions.entry(date).or_insert(false);
        *entry = !*entry;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_habit() -> Habit {
        Habit {
            id: "1700000000000".to_string(),
            name: "Drink water".to_string(),
            description: String::new(),
            color: ColorTag::Teal,
            created_at: Utc::now(),
            completions: BTreeMap::new(),
        }
    }

    #[test]
    fn toggle_treats_absent_as_not_completed() {
        let mut habit = sample_habit();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(!habit.is_completed(date));

        habit.toggle_completion(date);
        assert!(habit.is_completed(date));
        assert_eq!(habit.completions.get(&date), Some(&true));
    }

    #[test]
    fn toggle_twice_restores_prior_ledger() {
        let mut habit = sample_habit();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        habit.toggle_completion(date);
        habit.toggle_completion(date);

        // The entry stays recorded as false rather than being removed.
        assert!(!habit.is_completed(date));
        assert_eq!(habit.completions.get(&date), Some(&false));

        let before = habit.completions.clone();
        habit.toggle_completion(date);
        habit.toggle_completion(date);
        assert_eq!(habit.completions, before);
    }

    #[test]
    fn ledger_serializes_dates_as_plain_calendar_days() {
        let mut habit = sample_habit();
        habit.toggle_completion(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());

        let json = serde_json::to_string(&habit).unwrap();
        assert!(json.contains("\"2024-03-01\":true"));
        assert!(json.contains("\"color\":\"teal\""));
    }
}
