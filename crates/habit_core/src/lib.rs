pub mod calendar;
pub mod habit;
pub mod service;
pub mod stats;
pub mod store;

pub use crate::service::{DashboardSummary, HabitService, HabitServiceBuilder};
