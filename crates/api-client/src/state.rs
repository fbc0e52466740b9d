use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Persisted session state, written next to the config file so a restart can
/// resume the previous session. The access token is validated against the
/// auth service on bootstrap before being trusted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    pub access_token: String,
    pub user_id: String,
    pub email: String,
}

fn session_path(config_dir: &Path) -> PathBuf {
    config_dir.join("session.json")
}

/// Load the persisted session, if any. Unreadable or malformed files count as
/// no session.
pub fn load_session(config_dir: &Path) -> Option<StoredSession> {
    let path = session_path(config_dir);
    let content = std::fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(session) => Some(session),
        Err(e) => {
            warn!("ignoring malformed session file {}: {e}", path.display());
            None
        }
    }
}

pub fn save_session(config_dir: &Path, session: &StoredSession) -> std::io::Result<()> {
    std::fs::create_dir_all(config_dir)?;
    let content = serde_json::to_string_pretty(session).expect("session serializes");
    std::fs::write(session_path(config_dir), content)
}

/// Remove the persisted session. Missing files are fine.
pub fn clear_session(config_dir: &Path) {
    let path = session_path(config_dir);
    if let Err(e) = std::fs::remove_file(&path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("could not remove {}: {e}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StoredSession {
        StoredSession {
            access_token: "tok-123".to_string(),
            user_id: "u-1".to_string(),
            email: "ana@example.com".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        save_session(dir.path(), &sample()).unwrap();
        assert_eq!(load_session(dir.path()), Some(sample()));
    }

    #[test]
    fn load_returns_none_when_missing_or_malformed() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_session(dir.path()), None);

        std::fs::write(dir.path().join("session.json"), "{not json").unwrap();
        assert_eq!(load_session(dir.path()), None);
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        save_session(dir.path(), &sample()).unwrap();
        clear_session(dir.path());
        clear_session(dir.path());
        assert_eq!(load_session(dir.path()), None);
    }
}
