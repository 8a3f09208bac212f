use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use parking_lot::RwLock;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::habit::{ColorTag, Habit};
use crate::stats;
use crate::store::{self, HabitStore, MemoryStore};

/// Headline numbers summarizing the whole registry for a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DashboardSummary {
    pub total_habits: usize,
    pub completed_today: usize,
    pub best_streak: u32,
}

/// Owns the habit collection and writes every mutation through the store.
///
/// All mutation and read paths run to completion under the registry lock;
/// there is no async machinery and no partial update to observe.
pub struct HabitService {
    store: Box<dyn HabitStore>,
    state: RwLock<RegistryState>,
}

struct RegistryState {
    habits: Vec<Habit>,
    rng: StdRng,
    last_id_millis: i64,
}

impl RegistryState {
    /// Millisecond-clock ids, bumped past the last issued value so two
    /// creations in the same millisecond never collide.
    fn next_id(&mut self) -> String {
        let mut millis = Utc::now().timestamp_millis();
        if millis <= self.last_id_millis {
            millis = self.last_id_millis + 1;
        }
        self.last_id_millis = millis;
        millis.to_string()
    }
}

pub struct HabitServiceBuilder {
    store: Option<Box<dyn HabitStore>>,
    rng_seed: Option<u64>,
}

impl HabitServiceBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            rng_seed: None,
        }
    }

    pub fn with_store(mut self, store: Box<dyn HabitStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Seeds the color-assignment source so creation is deterministic.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<HabitService> {
        let store = self
            .store
            .unwrap_or_else(|| Box::new(MemoryStore::new()) as Box<dyn HabitStore>);
        let habits = match store.load()? {
            Some(bytes) => store::decode_habits(&bytes),
            None => Vec::new(),
        };
        let rng = match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        tracing::debug!(count = habits.len(), "hydrated habit registry");
        Ok(HabitService {
            store,
            state: RwLock::new(RegistryState {
                habits,
                rng,
                last_id_millis: 0,
            }),
        })
    }
}

impl Default for HabitServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HabitService {
    pub fn builder() -> HabitServiceBuilder {
        HabitServiceBuilder::new()
    }

    /// Creates a habit and persists the collection. Returns `None` when the
    /// trimmed name is empty; nothing is created or saved in that case.
    pub fn create(&self, name: &str, description: &str) -> Option<Habit> {
        if name.trim().is_empty() {
            tracing::debug!("ignoring habit creation with empty name");
            return None;
        }

        let mut state = self.state.write();
        let id = state.next_id();
        let color = ColorTag::PALETTE[state.rng.gen_range(0..ColorTag::PALETTE.len())];
        let habit = Habit {
            id,
            name: name.to_string(),
            description: description.to_string(),
            color,
            created_at: Utc::now(),
            completions: BTreeMap::new(),
        };
        state.habits.push(habit.clone());
        tracing::debug!(id = %habit.id, name = %habit.name, "created habit");
        self.persist(&state.habits);
        Some(habit)
    }

    /// Flips the completion flag for `(habit_id, date)` and persists.
    /// An unknown id is a silent no-op returning `None`; toggling twice
    /// with the same arguments restores the prior state exactly.
    pub fn toggle(&self, habit_id: &str, date: NaiveDate) -> Option<Habit> {
        let mut state = self.state.write();
        let Some(habit) = state.habits.iter_mut().find(|habit| habit.id == habit_id) else {
            tracing::debug!(habit_id, "ignoring toggle for unknown habit");
            return None;
        };
        habit.toggle_completion(date);
        let snapshot = habit.clone();
        self.persist(&state.habits);
        Some(snapshot)
    }

    /// Insertion-ordered snapshot of every habit.
    pub fn list(&self) -> Vec<Habit> {
        self.state.read().habits.clone()
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        let state = self.state.read();
        DashboardSummary {
            total_habits: state.habits.len(),
            completed_today: state
                .habits
                .iter()
                .filter(|habit| habit.is_completed(today))
                .count(),
            best_streak: state
                .habits
                .iter()
                .map(|habit| stats::streak(habit, today))
                .max()
                .unwrap_or(0),
        }
    }

    /// Write-through after a mutation: retried once, then logged and
    /// dropped. A failing store never fails the mutation itself.
    fn persist(&self, habits: &[Habit]) {
        let bytes = match store::encode_habits(habits) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(%err, "failed to serialize habits; state not persisted");
                return;
            }
        };
        if let Err(err) = self.store.save(&bytes) {
            tracing::warn!(%err, "saving habits failed, retrying once");
            if let Err(err) = self.store.save(&bytes) {
                tracing::error!(%err, "saving habits failed after retry; latest state not persisted");
            }
        }
    }
}
