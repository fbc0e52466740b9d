use chrono::Utc;
use tracing::{debug, warn};

use taskdeck_api::{
    AchievementRow, NewAchievementRow, NewProfileRow, NewTaskRow, ProfileChanges, ProfileRow,
    SuggestionRow, TaskChanges, TaskRow,
};
use taskdeck_core::{Achievement, Profile, ProfilePatch, Suggestion, Task, TaskDraft, TaskPatch};

use crate::client::{BackendClient, ClientError};
use crate::retry::{RetryConfig, with_retry};

/// Typed CRUD over the four external collections, isolating callers from the
/// external schema and its nullability quirks.
///
/// Read policy is fail-soft: list operations return an empty vec and log on
/// any failure, and the single-row profile fetch collapses not-found and
/// transport errors into `None` (they differ only in logging). Writes return
/// tagged results and are retried on transport/server failures; delete
/// returns a success flag and never errors.
pub struct DataStore<'a> {
    client: &'a BackendClient,
    retry: RetryConfig,
}

impl<'a> DataStore<'a> {
    pub fn new(client: &'a BackendClient) -> Self {
        Self {
            client,
            retry: RetryConfig::default(),
        }
    }

    pub fn with_retry(client: &'a BackendClient, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    // ── Tasks ─────────────────────────────────────────────────────────────

    /// All tasks owned by `owner_id`, newest first. Fail-soft.
    pub async fn list_tasks(&self, owner_id: &str) -> Vec<Task> {
        let result = self
            .client
            .select_rows::<TaskRow>("tasks", &[("userid", owner_id)], Some("createdat"))
            .await;
        match result {
            Ok(rows) => rows.into_iter().map(Task::from).collect(),
            Err(e) => {
                warn!("listing tasks failed: {e}");
                Vec::new()
            }
        }
    }

    /// Create a task; the backend assigns id and timestamps.
    pub async fn create_task(&self, draft: TaskDraft) -> Result<Task, ClientError> {
        let row = NewTaskRow::from(draft);
        let created: TaskRow = with_retry(&self.retry, || self.client.insert_row("tasks", &row)).await?;
        Ok(Task::from(created))
    }

    /// Apply a partial update; `updatedat` is refreshed before the call.
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Result<Task, ClientError> {
        let changes = TaskChanges::from_patch(patch, Utc::now());
        let updated: Option<TaskRow> =
            with_retry(&self.retry, || self.client.update_row("tasks", id, &changes)).await?;
        updated.map(Task::from).ok_or(ClientError::NotFound)
    }

    /// Delete a task. `false` for unknown ids and for failures (logged).
    pub async fn delete_task(&self, id: &str) -> bool {
        match self.client.delete_row("tasks", id).await {
            Ok(deleted) => {
                if !deleted {
                    debug!("delete matched no task with id {id}");
                }
                deleted
            }
            Err(e) => {
                warn!("deleting task {id} failed: {e}");
                false
            }
        }
    }

    // ── Profiles ──────────────────────────────────────────────────────────

    /// Fetch the profile keyed by an identity id. `None` covers both a
    /// missing row and a transport error; callers treat it as "no usable
    /// profile" either way.
    pub async fn get_profile(&self, user_id: &str) -> Option<Profile> {
        let result = self
            .client
            .select_single::<ProfileRow>("users", &[("id", user_id)])
            .await;
        match result {
            Ok(Some(row)) => Some(Profile::from(row)),
            Ok(None) => {
                debug!("no profile row for identity {user_id}");
                None
            }
            Err(e) => {
                warn!("fetching profile {user_id} failed: {e}");
                None
            }
        }
    }

    /// Create the `users` row at sign-up time.
    pub async fn create_profile(&self, row: NewProfileRow) -> Result<Profile, ClientError> {
        let created: ProfileRow =
            with_retry(&self.retry, || self.client.insert_row("users", &row)).await?;
        Ok(Profile::from(created))
    }

    pub async fn update_profile(
        &self,
        user_id: &str,
        patch: ProfilePatch,
    ) -> Result<Profile, ClientError> {
        let changes = ProfileChanges::from(patch);
        let updated: Option<ProfileRow> = with_retry(&self.retry, || {
            self.client.update_row("users", user_id, &changes)
        })
        .await?;
        updated.map(Profile::from).ok_or(ClientError::NotFound)
    }

    // ── Achievements ──────────────────────────────────────────────────────

    /// Unlock history for the progress view, newest first. Fail-soft.
    pub async fn list_achievements(&self, owner_id: &str) -> Vec<Achievement> {
        let result = self
            .client
            .select_rows::<AchievementRow>("achievements", &[("userid", owner_id)], Some("date"))
            .await;
        match result {
            Ok(rows) => rows.into_iter().map(Achievement::from).collect(),
            Err(e) => {
                warn!("listing achievements failed: {e}");
                Vec::new()
            }
        }
    }

    pub async fn unlock_achievement(
        &self,
        row: NewAchievementRow,
    ) -> Result<Achievement, ClientError> {
        let created: AchievementRow =
            with_retry(&self.retry, || self.client.insert_row("achievements", &row)).await?;
        Ok(Achievement::from(created))
    }

    // ── Suggestions ───────────────────────────────────────────────────────

    /// Persisted suggestions for an owner, newest first. Fail-soft.
    pub async fn list_suggestions(&self, owner_id: &str) -> Vec<Suggestion> {
        let result = self
            .client
            .select_rows::<SuggestionRow>("suggestions", &[("userid", owner_id)], Some("createdat"))
            .await;
        match result {
            Ok(rows) => rows.into_iter().map(Suggestion::from).collect(),
            Err(e) => {
                warn!("listing suggestions failed: {e}");
                Vec::new()
            }
        }
    }
}
