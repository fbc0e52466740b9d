use chrono::{DateTime, Utc};

use crate::progress::ProgressSnapshot;

/// A persisted achievement row, read as unlock history for the progress view.
/// Dashboard badges are derived client-side and never written back here.
#[derive(Debug, Clone, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub unlocked: bool,
}

/// A client-derived badge shown on the progress tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementBadge {
    pub title: &'static str,
    pub description: &'static str,
    pub unlocked: bool,
}

/// Evaluate the built-in badges from derived progress metrics. This derived
/// form is the single source of truth for the dashboard display.
pub fn builtin_badges(progress: &ProgressSnapshot) -> Vec<AchievementBadge> {
    vec![
        AchievementBadge {
            title: "Early Bird",
            description: "Complete 5 tasks before 9 AM",
            unlocked: progress.completed_today >= 5,
        },
        AchievementBadge {
            title: "Productivity Master",
            description: "Complete 50 tasks in a week",
            unlocked: progress.completed_this_week >= 50,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn badges_are_locked_below_the_thresholds() {
        let progress = ProgressSnapshot {
            completed_today: 4,
            completed_this_week: 49,
            ..ProgressSnapshot::default()
        };
        let badges = builtin_badges(&progress);
        assert!(badges.iter().all(|b| !b.unlocked));
    }

    #[test]
    fn badges_unlock_at_the_thresholds() {
        let progress = ProgressSnapshot {
            completed_today: 5,
            completed_this_week: 50,
            ..ProgressSnapshot::default()
        };
        let badges = builtin_badges(&progress);
        assert!(badges.iter().all(|b| b.unlocked));
        assert_eq!(badges[0].title, "Early Bird");
        assert_eq!(badges[1].title, "Productivity Master");
    }
}
