//! Configuration module for grammar-hotkey.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform config directories, TOML persistence via
//! `AppConfig::load` / `AppConfig::save`, and `CHECKER_*` environment-variable
//! overrides applied on top of whatever the file provides.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, HotkeyConfig, RunnerConfig, ServiceConfig, DEFAULT_PROMPT};
