//! Domain types and pure derivation logic for taskdeck.
//!
//! Everything in this crate is independent of the backend wire format and of
//! the terminal UI: task/profile/achievement/suggestion records, the task
//! grid's filter and sort, progress metrics, form validation, and the shared
//! configuration types consumed by the client and the TUI.

pub mod achievement;
pub mod config;
pub mod filter;
pub mod profile;
pub mod progress;
pub mod suggestion;
pub mod task;
pub mod validate;

pub use achievement::{Achievement, AchievementBadge, builtin_badges};
pub use config::{AppConfig, BackendSettings, GateSettings};
pub use filter::{TaskFilter, TaskSort, visible_tasks};
pub use profile::{Profile, ProfilePatch, SignupProfile};
pub use progress::ProgressSnapshot;
pub use suggestion::{Suggestion, canned_suggestions, canned_transcripts};
pub use task::{Priority, Task, TaskDraft, TaskPatch};
pub use validate::{
    ValidationError, validate_email, validate_name, validate_password, validate_title,
};
