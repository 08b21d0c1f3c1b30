//! grammar-hotkey — press a key chord anywhere, get your selection corrected.
//!
//! The daemon registers a global hotkey. On activation it copies the current
//! text selection via the clipboard, sends it to a local Ollama model for
//! grammar correction, prints a colorized sentence-level diff plus a one-line
//! summary, and pastes the corrected text back over the selection.
//!
//! # Architecture
//!
//! ```text
//! rdev listener thread ──HotkeyEvent──▶ PipelineRunner (single-flight)
//!                                         │ cancel previous run, spawn new
//!                                         ▼
//!                                capture ─▶ correct ─▶ report ─▶ apply
//!                              (clipboard)  (Ollama)   (diff)  (clipboard)
//! ```
//!
//! At most one pipeline run is ever live: a new activation cancels the
//! in-flight run and supersedes it. Clipboard access is serialized so two
//! runs can never interleave their copy/paste sections. See
//! [`pipeline::PipelineRunner`] for the orchestration details.

pub mod clipboard;
pub mod config;
pub mod hotkey;
pub mod pipeline;
pub mod report;
pub mod service;
