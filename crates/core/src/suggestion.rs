use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::task::Priority;

/// An assistant suggestion. A fetch operation exists against the backend, but
/// the assistant panel itself is driven by the canned set below.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub estimated_time: Option<String>,
    pub due_date: Option<String>,
    pub user_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// The static suggestion set shown in the assistant panel.
pub fn canned_suggestions(user_id: &str) -> Vec<Suggestion> {
    let mk = |title: &str,
              description: &str,
              category: &str,
              priority: Priority,
              estimated_time: Option<&str>,
              due_date: Option<&str>| Suggestion {
        id: Uuid::new_v4().to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        priority,
        estimated_time: estimated_time.map(str::to_string),
        due_date: due_date.map(str::to_string),
        user_id: user_id.to_string(),
        created_at: None,
    };

    vec![
        mk(
            "Complete project documentation",
            "Update the README file with installation instructions",
            "work",
            Priority::High,
            Some("1 hour"),
            Some("Tomorrow"),
        ),
        mk(
            "Schedule dentist appointment",
            "Call Dr. Smith's office for a check-up",
            "personal",
            Priority::Medium,
            None,
            Some("This week"),
        ),
        mk(
            "Research new productivity tools",
            "Look for task management alternatives",
            "self-improvement",
            Priority::Low,
            Some("30 minutes"),
            None,
        ),
    ]
}

/// Canned transcripts produced by the simulated voice capture.
pub fn canned_transcripts() -> &'static [&'static str] {
    &[
        "Add task: Complete project proposal by Friday",
        "Mark task 'Send email to client' as complete",
        "What are my high priority tasks?",
        "Reschedule meeting task to tomorrow",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canned_suggestions_are_scoped_to_the_owner() {
        let suggestions = canned_suggestions("u-42");
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| s.user_id == "u-42"));
    }

    #[test]
    fn canned_suggestions_cover_each_priority() {
        let suggestions = canned_suggestions("u-1");
        for priority in [Priority::High, Priority::Medium, Priority::Low] {
            assert!(suggestions.iter().any(|s| s.priority == priority));
        }
    }
}
