//! Wire contract between taskdeck and the hosted backend.
//!
//! This crate is the single source of truth for the external schema: row
//! shapes use the backend's canonical lower-case column names and are the
//! only place they appear. Domain types live in `taskdeck-core`; the
//! conversions here normalize the backend's nullability quirks
//! (`description`, `completed`) on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use taskdeck_core::{
    Achievement, Priority, Profile, ProfilePatch, SignupProfile, Suggestion, Task, TaskDraft,
    TaskPatch,
};

// ─── Auth ────────────────────────────────────────────────────────────────────

/// The authenticated principal returned by the auth service. Distinct from
/// the richer `users` profile row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Body for `POST /auth/v1/signup` and the password-grant token call.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Successful response from signup / password-grant token calls.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: Identity,
}

/// Body for `POST /auth/v1/recover`.
#[derive(Debug, Clone, Serialize)]
pub struct RecoverRequest {
    pub email: String,
}

/// Error body returned by the auth surface. The fields vary by endpoint, so
/// everything is optional and `message()` picks the best human-readable text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
}

impl AuthErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.msg.as_deref())
            .or(self.message.as_deref())
            .or(self.error.as_deref())
    }
}

// ─── tasks ───────────────────────────────────────────────────────────────────

/// A row of the `tasks` collection as the backend returns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub duedate: DateTime<Utc>,
    pub priority: Priority,
    #[serde(default)]
    pub completed: Option<bool>,
    pub userid: String,
    pub createdat: DateTime<Utc>,
    pub updatedat: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            due_date: row.duedate,
            priority: row.priority,
            completed: row.completed.unwrap_or(false),
            user_id: row.userid,
            created_at: row.createdat,
            updated_at: row.updatedat,
        }
    }
}

/// Insert payload for `tasks`. The backend assigns `id`, `createdat`, and
/// `updatedat`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewTaskRow {
    pub title: String,
    pub description: String,
    pub duedate: DateTime<Utc>,
    pub priority: Priority,
    pub completed: bool,
    pub userid: String,
}

impl From<TaskDraft> for NewTaskRow {
    fn from(draft: TaskDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            duedate: draft.due_date,
            priority: draft.priority,
            completed: false,
            userid: draft.user_id,
        }
    }
}

/// Patch payload for `tasks`. Only supplied fields are serialized; `updatedat`
/// is always refreshed before the call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duedate: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    pub updatedat: DateTime<Utc>,
}

impl TaskChanges {
    pub fn from_patch(patch: TaskPatch, updated_at: DateTime<Utc>) -> Self {
        Self {
            title: patch.title,
            description: patch.description,
            duedate: patch.due_date,
            priority: patch.priority,
            completed: patch.completed,
            updatedat: updated_at,
        }
    }
}

// ─── users ───────────────────────────────────────────────────────────────────

/// A row of the `users` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileRow {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    pub joindate: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            id: row.id,
            name: row.name,
            email: row.email,
            avatar: row.avatar,
            phone: row.phone,
            location: row.location,
            bio: row.bio,
            join_date: row.joindate,
        }
    }
}

/// Insert payload for `users`, created at sign-up time alongside the identity.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewProfileRow {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub joindate: DateTime<Utc>,
}

impl NewProfileRow {
    pub fn from_signup(identity: &Identity, fields: SignupProfile, joined: DateTime<Utc>) -> Self {
        Self {
            id: identity.id.clone(),
            name: fields.name,
            email: identity.email.clone(),
            avatar: fields.avatar,
            phone: fields.phone,
            location: fields.location,
            bio: fields.bio,
            joindate: joined,
        }
    }
}

/// Patch payload for `users`. Only supplied fields are serialized.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl From<ProfilePatch> for ProfileChanges {
    fn from(patch: ProfilePatch) -> Self {
        Self {
            name: patch.name,
            email: patch.email,
            avatar: patch.avatar,
            phone: patch.phone,
            location: patch.location,
            bio: patch.bio,
        }
    }
}

// ─── achievements ────────────────────────────────────────────────────────────

/// A row of the `achievements` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AchievementRow {
    pub id: String,
    pub userid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub unlocked: Option<bool>,
}

impl From<AchievementRow> for Achievement {
    fn from(row: AchievementRow) -> Self {
        Achievement {
            id: row.id,
            user_id: row.userid,
            title: row.title,
            description: row.description.unwrap_or_default(),
            date: row.date,
            unlocked: row.unlocked.unwrap_or(false),
        }
    }
}

/// Insert payload for `achievements`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewAchievementRow {
    pub userid: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub unlocked: bool,
}

// ─── suggestions ─────────────────────────────────────────────────────────────

/// A row of the `suggestions` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SuggestionRow {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub priority: Priority,
    #[serde(default)]
    pub estimatedtime: Option<String>,
    #[serde(default)]
    pub duedate: Option<String>,
    pub userid: String,
    #[serde(default)]
    pub createdat: Option<DateTime<Utc>>,
}

impl From<SuggestionRow> for Suggestion {
    fn from(row: SuggestionRow) -> Self {
        Suggestion {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            category: row.category,
            priority: row.priority,
            estimated_time: row.estimatedtime,
            due_date: row.duedate,
            user_id: row.userid,
            created_at: row.createdat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn task_row_maps_lowercase_columns_to_domain_fields() {
        let json = r#"{
            "id": "t-1",
            "title": "Write report",
            "description": "quarterly numbers",
            "duedate": "2026-03-14T12:00:00Z",
            "priority": "high",
            "completed": true,
            "userid": "u-1",
            "createdat": "2026-03-01T12:00:00Z",
            "updatedat": "2026-03-02T12:00:00Z"
        }"#;
        let row: TaskRow = serde_json::from_str(json).unwrap();
        let task = Task::from(row);

        assert_eq!(task.due_date, ts(14));
        assert_eq!(task.user_id, "u-1");
        assert_eq!(task.priority, Priority::High);
        assert!(task.completed);
    }

    #[test]
    fn task_row_normalizes_null_description_and_completed() {
        let json = r#"{
            "id": "t-2",
            "title": "Untitled",
            "description": null,
            "duedate": "2026-03-14T12:00:00Z",
            "priority": "low",
            "completed": null,
            "userid": "u-1",
            "createdat": "2026-03-01T12:00:00Z",
            "updatedat": "2026-03-01T12:00:00Z"
        }"#;
        let task = Task::from(serde_json::from_str::<TaskRow>(json).unwrap());
        assert_eq!(task.description, "");
        assert!(!task.completed);
    }

    #[test]
    fn new_task_row_carries_no_server_assigned_fields() {
        let draft = TaskDraft {
            title: "A".to_string(),
            description: String::new(),
            due_date: ts(20),
            priority: Priority::Low,
            user_id: "u-1".to_string(),
        };
        let value = serde_json::to_value(NewTaskRow::from(draft)).unwrap();
        let obj = value.as_object().unwrap();

        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("createdat"));
        assert!(!obj.contains_key("updatedat"));
        assert_eq!(obj["completed"], serde_json::json!(false));
        assert_eq!(obj["userid"], serde_json::json!("u-1"));
    }

    #[test]
    fn task_changes_skip_unset_fields_but_always_carry_updatedat() {
        let patch = TaskPatch::completed(true);
        let changes = TaskChanges::from_patch(patch, ts(3));
        let value = serde_json::to_value(&changes).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 2);
        assert_eq!(obj["completed"], serde_json::json!(true));
        assert!(obj.contains_key("updatedat"));
    }

    #[test]
    fn profile_row_round_trips_through_signup_payload() {
        let identity = Identity {
            id: "u-9".to_string(),
            email: "ana@example.com".to_string(),
        };
        let fields = SignupProfile {
            name: "Ana".to_string(),
            location: Some("Lisbon".to_string()),
            ..SignupProfile::default()
        };
        let row = NewProfileRow::from_signup(&identity, fields, ts(1));
        let value = serde_json::to_value(&row).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["id"], serde_json::json!("u-9"));
        assert_eq!(obj["joindate"], serde_json::json!("2026-03-01T12:00:00Z"));
        // Unset optionals are omitted rather than sent as null.
        assert!(!obj.contains_key("phone"));
        assert!(!obj.contains_key("bio"));
    }

    #[test]
    fn auth_error_body_prefers_the_most_specific_message() {
        let body: AuthErrorBody = serde_json::from_str(
            r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#,
        )
        .unwrap();
        assert_eq!(body.message(), Some("Invalid login credentials"));

        let body: AuthErrorBody = serde_json::from_str(r#"{"msg": "User already registered"}"#).unwrap();
        assert_eq!(body.message(), Some("User already registered"));

        let body: AuthErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(body.message(), None);
    }

    #[test]
    fn identity_tolerates_extra_auth_service_fields() {
        let json = r#"{
            "id": "u-1",
            "aud": "authenticated",
            "email": "ana@example.com",
            "app_metadata": {"provider": "email"},
            "created_at": "2026-03-01T12:00:00Z"
        }"#;
        let identity: Identity = serde_json::from_str(json).unwrap();
        assert_eq!(identity.id, "u-1");
        assert_eq!(identity.email, "ana@example.com");
    }
}
