use chrono::{DateTime, Duration, Utc};

use crate::task::Task;

/// Derived progress metrics, recomputed from the in-memory task list on every
/// render. Nothing here is persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub total: usize,
    pub completed: usize,
    /// Rounded percentage, 0 when the list is empty.
    pub completion_rate: u32,
    /// Completed tasks whose due date falls on today's calendar date.
    pub completed_today: usize,
    /// Completed tasks whose due date falls within the trailing 7 days.
    pub completed_this_week: usize,
}

impl ProgressSnapshot {
    /// Compute metrics against the given clock. Calendar-date comparison uses
    /// UTC dates so the result is independent of the host timezone.
    pub fn compute(tasks: &[Task], now: DateTime<Utc>) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|t| t.completed).count();
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        };

        let today = now.date_naive();
        let completed_today = tasks
            .iter()
            .filter(|t| t.completed && t.due_date.date_naive() == today)
            .count();

        let week_start = now - Duration::days(7);
        let completed_this_week = tasks
            .iter()
            .filter(|t| t.completed && t.due_date >= week_start)
            .count();

        Self {
            total,
            completed,
            completion_rate,
            completed_today,
            completed_this_week,
        }
    }
}
