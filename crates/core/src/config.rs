use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend. Both values are required for
/// the client to function; the anon key is the backend's public API key, not
/// a user credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BackendSettings {
    pub url: String,
    pub anon_key: String,
}

impl BackendSettings {
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}

/// Route gate behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GateSettings {
    /// Maximum seconds to keep showing the loading placeholder before the
    /// gate forces a redirect to the auth screen.
    pub timeout_secs: u64,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

/// Full application configuration, persisted as TOML by the TUI.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub backend: BackendSettings,
    pub gate: GateSettings,
    /// Mounts the development-only debug panel when set.
    pub dev_panel: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_five_second_gate_timeout() {
        let config = AppConfig::default();
        assert_eq!(config.gate.timeout_secs, 5);
        assert!(!config.dev_panel);
        assert!(!config.backend.is_configured());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [backend]
            url = "https://abc.backend.dev"
            anon_key = "public-anon-key"
            "#,
        )
        .unwrap();
        assert!(config.backend.is_configured());
        assert_eq!(config.gate.timeout_secs, 5);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = AppConfig::default();
        config.backend.url = "https://abc.backend.dev".to_string();
        config.backend.anon_key = "key".to_string();
        config.gate.timeout_secs = 8;
        config.dev_panel = true;

        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
