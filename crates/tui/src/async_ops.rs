use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use tracing::warn;

use taskdeck_api::{Credentials, NewProfileRow};
use taskdeck_api_client::{
    AuthEvents, BackendClient, DataStore, StoredSession, clear_session, load_session, save_session,
};
use taskdeck_core::{
    Achievement, AppConfig, Profile, ProfilePatch, SignupProfile, Suggestion, Task, TaskDraft,
    TaskPatch,
};

/// Commands that require async I/O (network calls).
pub enum AsyncCommand {
    // ── Session lifecycle ─────────────────────────────────────────────
    BootstrapSession,
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
        profile: SignupProfile,
    },
    SignOut,
    RequestPasswordReset {
        email: String,
    },
    FetchProfile {
        seq: u64,
        user_id: String,
    },

    // ── Dashboard data ────────────────────────────────────────────────
    FetchTasks {
        user_id: String,
    },
    CreateTask {
        draft: TaskDraft,
    },
    UpdateTask {
        id: String,
        patch: TaskPatch,
    },
    DeleteTask {
        id: String,
    },
    FetchAchievements {
        user_id: String,
    },
    FetchSuggestions {
        user_id: String,
    },
    UpdateProfile {
        user_id: String,
        patch: ProfilePatch,
    },
}

/// Results returned by async commands.
pub enum CommandResult {
    // Session lifecycle. Identity changes themselves arrive separately as
    // sequence-stamped auth reports; these carry the token material.
    Bootstrap(Option<StoredSession>),
    SignedIn(Result<StoredSession, String>),
    SignedUp(Result<StoredSession, String>),
    SignedOut,
    ResetRequested(Result<String, String>),
    Profile { seq: u64, profile: Option<Profile> },

    // Dashboard data
    Tasks(Vec<Task>),
    TaskCreated(Result<Task, String>),
    TaskUpdated(Result<Task, String>),
    TaskDeleted { id: String, deleted: bool },
    Achievements(Vec<Achievement>),
    Suggestions(Vec<Suggestion>),
    ProfileUpdated(Result<Profile, String>),
}

fn make_client(
    config: &AppConfig,
    token: Option<&str>,
    events: &AuthEvents,
) -> Result<BackendClient, String> {
    if !config.backend.is_configured() {
        return Err("Backend not configured. Set Backend URL and Anon Key in Settings".to_string());
    }
    let mut client = BackendClient::new(
        &config.backend.url,
        &config.backend.anon_key,
        Duration::from_secs(15),
        events.clone(),
    )
    .map_err(|e| format!("Failed to create HTTP client: {e}"))?;
    if let Some(token) = token {
        client.set_access_token(token.to_string());
    }
    Ok(client)
}

fn stored_from_sign_in(token: &taskdeck_api::TokenResponse) -> StoredSession {
    StoredSession {
        access_token: token.access_token.clone(),
        user_id: token.user.id.clone(),
        email: token.user.email.clone(),
    }
}

fn persist(config_dir: Option<&Path>, stored: &StoredSession) {
    if let Some(dir) = config_dir {
        if let Err(e) = save_session(dir, stored) {
            warn!("could not persist session: {e}");
        }
    }
}

pub async fn execute(
    cmd: AsyncCommand,
    config: &AppConfig,
    config_dir: Option<&Path>,
    token: Option<&str>,
    events: &AuthEvents,
) -> CommandResult {
    match cmd {
        // ── Session lifecycle ─────────────────────────────────────────
        AsyncCommand::BootstrapSession => {
            let Some(stored) = config_dir.and_then(load_session) else {
                events.publish(None);
                return CommandResult::Bootstrap(None);
            };
            let client = match make_client(config, Some(&stored.access_token), events) {
                Ok(client) => client,
                Err(e) => {
                    warn!("bootstrap skipped: {e}");
                    events.publish(None);
                    return CommandResult::Bootstrap(None);
                }
            };
            match client.current_user().await {
                Ok(Some(identity)) => {
                    events.publish(Some(identity));
                    CommandResult::Bootstrap(Some(stored))
                }
                Ok(None) => {
                    // Token no longer accepted; drop the stale file.
                    if let Some(dir) = config_dir {
                        clear_session(dir);
                    }
                    events.publish(None);
                    CommandResult::Bootstrap(None)
                }
                Err(e) => {
                    warn!("session validation failed: {e}");
                    events.publish(None);
                    CommandResult::Bootstrap(None)
                }
            }
        }

        AsyncCommand::SignIn { email, password } => {
            let result = async {
                let mut client = make_client(config, None, events)?;
                let token = client
                    .sign_in(&Credentials { email, password })
                    .await
                    .map_err(|e| format!("{e}"))?;
                let stored = stored_from_sign_in(&token);
                persist(config_dir, &stored);
                Ok(stored)
            }
            .await;
            CommandResult::SignedIn(result)
        }

        AsyncCommand::SignUp {
            email,
            password,
            profile,
        } => {
            let result = async {
                let mut client = make_client(config, None, events)?;
                let token = client
                    .sign_up(&Credentials { email, password })
                    .await
                    .map_err(|e| format!("{e}"))?;
                let row = NewProfileRow::from_signup(&token.user, profile, Utc::now());
                let store = DataStore::new(&client);
                if let Err(e) = store.create_profile(row).await {
                    // The account exists; a missing profile row only degrades
                    // the header until the next profile edit.
                    warn!("profile row creation failed: {e}");
                }
                let stored = stored_from_sign_in(&token);
                persist(config_dir, &stored);
                Ok(stored)
            }
            .await;
            CommandResult::SignedUp(result)
        }

        AsyncCommand::SignOut => {
            match make_client(config, token, events) {
                Ok(mut client) => client.sign_out().await,
                // Nothing to revoke; still report the state change.
                Err(_) => {
                    events.publish(None);
                }
            }
            if let Some(dir) = config_dir {
                clear_session(dir);
            }
            CommandResult::SignedOut
        }

        AsyncCommand::RequestPasswordReset { email } => {
            let result = async {
                let client = make_client(config, None, events)?;
                client
                    .recover(&email, "taskdeck://reset")
                    .await
                    .map_err(|e| format!("{e}"))?;
                Ok(format!("Reset email sent to {email}"))
            }
            .await;
            CommandResult::ResetRequested(result)
        }

        AsyncCommand::FetchProfile { seq, user_id } => {
            let profile = match make_client(config, token, events) {
                Ok(client) => DataStore::new(&client).get_profile(&user_id).await,
                Err(e) => {
                    warn!("profile fetch skipped: {e}");
                    None
                }
            };
            CommandResult::Profile { seq, profile }
        }

        // ── Dashboard data ────────────────────────────────────────────
        AsyncCommand::FetchTasks { user_id } => {
            let tasks = match make_client(config, token, events) {
                Ok(client) => DataStore::new(&client).list_tasks(&user_id).await,
                Err(e) => {
                    warn!("task fetch skipped: {e}");
                    Vec::new()
                }
            };
            CommandResult::Tasks(tasks)
        }

        AsyncCommand::CreateTask { draft } => {
            let result = async {
                let client = make_client(config, token, events)?;
                DataStore::new(&client)
                    .create_task(draft)
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::TaskCreated(result)
        }

        AsyncCommand::UpdateTask { id, patch } => {
            let result = async {
                let client = make_client(config, token, events)?;
                DataStore::new(&client)
                    .update_task(&id, patch)
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::TaskUpdated(result)
        }

        AsyncCommand::DeleteTask { id } => {
            let deleted = match make_client(config, token, events) {
                Ok(client) => DataStore::new(&client).delete_task(&id).await,
                Err(e) => {
                    warn!("delete skipped: {e}");
                    false
                }
            };
            CommandResult::TaskDeleted { id, deleted }
        }

        AsyncCommand::FetchAchievements { user_id } => {
            let achievements = match make_client(config, token, events) {
                Ok(client) => DataStore::new(&client).list_achievements(&user_id).await,
                Err(_) => Vec::new(),
            };
            CommandResult::Achievements(achievements)
        }

        AsyncCommand::FetchSuggestions { user_id } => {
            let suggestions = match make_client(config, token, events) {
                Ok(client) => DataStore::new(&client).list_suggestions(&user_id).await,
                Err(_) => Vec::new(),
            };
            CommandResult::Suggestions(suggestions)
        }

        AsyncCommand::UpdateProfile { user_id, patch } => {
            let result = async {
                let client = make_client(config, token, events)?;
                DataStore::new(&client)
                    .update_profile(&user_id, patch)
                    .await
                    .map_err(|e| format!("{e}"))
            }
            .await;
            CommandResult::ProfileUpdated(result)
        }
    }
}
