use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub use taskdeck_core::AppConfig;

// ── File I/O ────────────────────────────────────────────────────────────

pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("taskdeck"))
}

/// Load config from `~/.config/taskdeck/taskdeck.toml`, then apply
/// environment overrides. A missing or unreadable file yields defaults.
pub fn load_config() -> AppConfig {
    let mut config = config_dir()
        .ok()
        .and_then(|dir| read_config(&dir.join("taskdeck.toml")))
        .unwrap_or_default();
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

fn read_config(path: &Path) -> Option<AppConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Save config to `~/.config/taskdeck/taskdeck.toml`.
pub fn save_config(config: &AppConfig) -> Result<()> {
    write_config(&config_dir()?, config)
}

fn write_config(dir: &Path, config: &AppConfig) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join("taskdeck.toml");
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Apply `TASKDECK_*` overrides on top of the file config. Takes a lookup
/// function so the precedence rules are testable without touching the
/// process environment.
pub fn apply_env_overrides(
    config: &mut AppConfig,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(url) = lookup("TASKDECK_BACKEND_URL") {
        config.backend.url = url;
    }
    if let Some(key) = lookup("TASKDECK_ANON_KEY") {
        config.backend.anon_key = key;
    }
    if let Some(raw) = lookup("TASKDECK_GATE_TIMEOUT_SECS") {
        if let Ok(secs) = raw.trim().parse() {
            config.gate.timeout_secs = secs;
        }
    }
    if let Some(raw) = lookup("TASKDECK_DEV_PANEL") {
        config.dev_panel = matches!(
            raw.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }
}

// ── Setting fields enum ─────────────────────────────────────────────────

/// Identifies a single editable setting in the settings view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    BackendUrl,
    AnonKey,
    GateTimeoutSecs,
    DevPanel,
}

/// A display item in the settings list. Headers are not selectable.
#[derive(Debug, Clone)]
pub enum SettingItem {
    Header(&'static str),
    Field {
        field: SettingField,
        label: &'static str,
        description: &'static str,
    },
}

impl SettingItem {
    pub fn field(&self) -> Option<SettingField> {
        match self {
            Self::Header(_) => None,
            Self::Field { field, .. } => Some(*field),
        }
    }
}

/// The ordered list of items shown in the settings view.
pub const SETTINGS_LAYOUT: &[SettingItem] = &[
    SettingItem::Header("Backend"),
    SettingItem::Field {
        field: SettingField::BackendUrl,
        label: "Backend URL",
        description: "Base URL of the hosted backend",
    },
    SettingItem::Field {
        field: SettingField::AnonKey,
        label: "Anon Key",
        description: "Public API key sent with every request",
    },
    SettingItem::Header("Routing"),
    SettingItem::Field {
        field: SettingField::GateTimeoutSecs,
        label: "Gate Timeout (secs)",
        description: "How long protected routes wait for the session to resolve",
    },
    SettingItem::Header("Developer"),
    SettingItem::Field {
        field: SettingField::DevPanel,
        label: "Debug Panel",
        description: "Show the session debug tab",
    },
];

impl SettingField {
    /// Whether this field is a boolean toggle.
    pub fn is_toggle(self) -> bool {
        matches!(self, Self::DevPanel)
    }

    /// Get the current value as a display string from the config.
    pub fn display_value(self, config: &AppConfig) -> String {
        match self {
            Self::BackendUrl => {
                if config.backend.url.is_empty() {
                    "(not set)".to_string()
                } else {
                    config.backend.url.clone()
                }
            }
            Self::AnonKey => {
                if config.backend.anon_key.is_empty() {
                    "(not set)".to_string()
                } else {
                    let prefix: String = config.backend.anon_key.chars().take(8).collect();
                    format!("{prefix}...")
                }
            }
            Self::GateTimeoutSecs => config.gate.timeout_secs.to_string(),
            Self::DevPanel => on_off(config.dev_panel),
        }
    }

    /// Get the raw (editable) value from the config.
    pub fn raw_value(self, config: &AppConfig) -> String {
        match self {
            Self::BackendUrl => config.backend.url.clone(),
            Self::AnonKey => config.backend.anon_key.clone(),
            Self::GateTimeoutSecs => config.gate.timeout_secs.to_string(),
            Self::DevPanel => String::new(),
        }
    }

    /// Toggle a boolean field in the config.
    pub fn toggle(self, config: &mut AppConfig) {
        if let Self::DevPanel = self {
            config.dev_panel = !config.dev_panel;
        }
    }

    /// Set a text/number value.
    pub fn set_value(self, config: &mut AppConfig, value: &str) {
        match self {
            Self::BackendUrl => config.backend.url = value.trim().to_string(),
            Self::AnonKey => config.backend.anon_key = value.trim().to_string(),
            Self::GateTimeoutSecs => {
                if let Ok(v) = value.trim().parse() {
                    config.gate.timeout_secs = v;
                }
            }
            Self::DevPanel => {}
        }
    }
}

fn on_off(v: bool) -> String {
    if v { "ON".to_string() } else { "OFF".to_string() }
}

/// Count of selectable (non-header) fields in SETTINGS_LAYOUT.
pub fn selectable_field_count() -> usize {
    SETTINGS_LAYOUT
        .iter()
        .filter(|item| item.field().is_some())
        .count()
}

/// Get the nth selectable field.
pub fn nth_selectable_field(n: usize) -> Option<SettingField> {
    SETTINGS_LAYOUT
        .iter()
        .filter_map(|item| item.field())
        .nth(n)
}
