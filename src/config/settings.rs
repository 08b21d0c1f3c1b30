//! Application settings structs, defaults, TOML persistence and env overrides.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Settings resolve in two layers: the optional `settings.toml` file, then
//! `CHECKER_*` environment variables on top (the env always wins).

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Instruction prompt sent to the correction model ahead of the user text.
///
/// Overridable per-install via `CHECKER_PROMPT`. The prompt pins the reply to
/// the JSON shape expected by [`crate::service::CorrectionReport`].
pub const DEFAULT_PROMPT: &str = "Correct the spelling, grammar, or phrasing issues in the following text. \
Try to match the tone of the original message. \
The response will be a JSON object that contains:\n \
 - strength: how sound the original grammar was, one of \"incomprehensible\", \"moderate\", or \"minor\" (minor meaning hardly any changes were needed)\n \
 - corrected_text: The corrected text\n \
 - summary: A brief summary of the changes made\n \
 - tone: One word describing the tone of the message (friendly, casual, professional, sarcastic, etc.)\n\
Use only JSON-safe characters in your response.";

// ---------------------------------------------------------------------------
// ServiceConfig
// ---------------------------------------------------------------------------

/// Settings for the Ollama correction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the Ollama API endpoint.
    pub base_url: String,
    /// Model identifier sent to the API (e.g. `"gemma3"`, `"llama3.2:3b"`).
    pub model: String,
    /// Instruction prompt sent ahead of the captured text.
    pub prompt: String,
    /// Maximum seconds to wait when establishing a connection. The correction
    /// call itself has no deadline — only supersession cancels it.
    pub connect_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "gemma3".into(),
            prompt: DEFAULT_PROMPT.into(),
            connect_timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Activation chord (e.g. `"ctrl+alt+a"`). Modifiers are joined with `+`;
    /// the final token is the key itself.
    pub chord: String,
}

impl HotkeyConfig {
    /// Platform-appropriate default chord: ⌃⌘A on macOS, Ctrl+Alt+A elsewhere.
    pub fn default_chord() -> String {
        if cfg!(target_os = "macos") {
            "ctrl+cmd+a".into()
        } else {
            "ctrl+alt+a".into()
        }
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            chord: Self::default_chord(),
        }
    }
}

// ---------------------------------------------------------------------------
// RunnerConfig
// ---------------------------------------------------------------------------

/// Timing knobs for the pipeline orchestrator and clipboard gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum milliseconds a new run waits for its cancelled predecessor to
    /// reach a terminal state before the stale task is aborted outright.
    pub teardown_wait_ms: u64,
    /// Milliseconds to wait after simulating the copy chord before reading
    /// the clipboard (OS event propagation).
    pub capture_settle_ms: u64,
    /// Milliseconds to wait after writing the clipboard before simulating the
    /// paste chord.
    pub apply_settle_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            teardown_wait_ms: 5_000,
            capture_settle_ms: 100,
            apply_settle_ms: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Resolution order
///
/// ```rust,no_run
/// use grammar_hotkey::config::AppConfig;
///
/// // File layer (returns Default when the file is missing), then env layer.
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env_overrides();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Correction service settings.
    pub service: ServiceConfig,
    /// Global hotkey binding.
    pub hotkey: HotkeyConfig,
    /// Orchestrator / gateway timing.
    pub runner: RunnerConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply `CHECKER_*` environment overrides on top of the loaded values.
    ///
    /// | Variable           | Field              |
    /// |--------------------|--------------------|
    /// | `CHECKER_MODEL`    | `service.model`    |
    /// | `CHECKER_PROMPT`   | `service.prompt`   |
    /// | `CHECKER_BASE_URL` | `service.base_url` |
    /// | `CHECKER_HOTKEY`   | `hotkey.chord`     |
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override-application seam: `get` looks a variable up by name.
    ///
    /// Empty values are ignored so `CHECKER_MODEL=` does not wipe the model.
    pub fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        let mut set = |name: &str, field: &mut String| {
            if let Some(value) = get(name).filter(|v| !v.is_empty()) {
                *field = value;
            }
        };
        set("CHECKER_MODEL", &mut self.service.model);
        set("CHECKER_PROMPT", &mut self.service.prompt);
        set("CHECKER_BASE_URL", &mut self.service.base_url);
        set("CHECKER_HOTKEY", &mut self.hotkey.chord);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.service.base_url, loaded.service.base_url);
        assert_eq!(original.service.model, loaded.service.model);
        assert_eq!(original.service.prompt, loaded.service.prompt);
        assert_eq!(
            original.service.connect_timeout_secs,
            loaded.service.connect_timeout_secs
        );
        assert_eq!(original.hotkey.chord, loaded.hotkey.chord);
        assert_eq!(
            original.runner.teardown_wait_ms,
            loaded.runner.teardown_wait_ms
        );
        assert_eq!(
            original.runner.capture_settle_ms,
            loaded.runner.capture_settle_ms
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.service.model, default.service.model);
        assert_eq!(config.hotkey.chord, default.hotkey.chord);
        assert_eq!(
            config.runner.teardown_wait_ms,
            default.runner.teardown_wait_ms
        );
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.service.base_url, "http://localhost:11434");
        assert_eq!(cfg.service.model, "gemma3");
        assert!(cfg.service.prompt.contains("corrected_text"));
        assert_eq!(cfg.runner.teardown_wait_ms, 5_000);
        assert_eq!(cfg.runner.capture_settle_ms, 100);

        if cfg!(target_os = "macos") {
            assert_eq!(cfg.hotkey.chord, "ctrl+cmd+a");
        } else {
            assert_eq!(cfg.hotkey.chord, "ctrl+alt+a");
        }
    }

    /// Env overrides replace file values; unset or empty variables do not.
    #[test]
    fn overrides_replace_only_set_values() {
        let mut cfg = AppConfig::default();

        cfg.apply_overrides(|name| match name {
            "CHECKER_MODEL" => Some("llama3.2:3b".into()),
            "CHECKER_HOTKEY" => Some("ctrl+shift+g".into()),
            "CHECKER_PROMPT" => Some(String::new()), // empty — ignored
            _ => None,
        });

        assert_eq!(cfg.service.model, "llama3.2:3b");
        assert_eq!(cfg.hotkey.chord, "ctrl+shift+g");
        assert_eq!(cfg.service.prompt, DEFAULT_PROMPT);
        assert_eq!(cfg.service.base_url, "http://localhost:11434");
    }

    /// Modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.service.base_url = "http://10.0.0.2:11434".into();
        cfg.service.model = "mistral".into();
        cfg.hotkey.chord = "ctrl+alt+g".into();
        cfg.runner.teardown_wait_ms = 2_500;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.service.base_url, "http://10.0.0.2:11434");
        assert_eq!(loaded.service.model, "mistral");
        assert_eq!(loaded.hotkey.chord, "ctrl+alt+g");
        assert_eq!(loaded.runner.teardown_wait_ms, 2_500);
    }
}
