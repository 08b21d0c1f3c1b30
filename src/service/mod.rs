//! Correction service module — the boundary to the Ollama backend.
//!
//! This module provides:
//! * [`CorrectionService`] — async trait implemented by all service backends.
//! * [`OllamaClient`] — Ollama native-API client with cooperative cancellation.
//! * [`CorrectionReport`] / [`GrammarStrength`] — the validated reply shape.
//! * [`ServiceError`] — error variants for service operations.
//!
//! Cancellation is cooperative: [`CorrectionService::correct`] takes a
//! `CancellationToken` and returns [`ServiceError::Cancelled`] as soon as the
//! token fires, abandoning the in-flight request. `Cancelled` is a normal
//! supersession outcome, not a failure.

pub mod ollama;
pub mod types;

pub use ollama::OllamaClient;
pub use types::{CorrectionReport, GrammarStrength};

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// ServiceError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the correction service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Transport-level failure — the service could not be reached at all.
    #[error("correction service unreachable: {0}")]
    Unreachable(String),

    /// The service answered, but the reply failed schema validation.
    #[error("invalid correction response: {0}")]
    InvalidResponse(String),

    /// The configured model is not available on the service. Fatal at
    /// startup, never produced per-run.
    #[error("model {0} not found on the correction service")]
    ModelMissing(String),

    /// The call was abandoned because its run was superseded. A normal
    /// terminal outcome, not a failure.
    #[error("correction call cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ServiceError::InvalidResponse(e.to_string())
        } else {
            ServiceError::Unreachable(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// CorrectionService trait
// ---------------------------------------------------------------------------

/// Async trait for grammar-correction backends.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (the orchestrator holds an `Arc<dyn CorrectionService>`).
#[async_trait]
pub trait CorrectionService: Send + Sync {
    /// Correct `text`, honoring `cancel` cooperatively.
    ///
    /// Once `cancel` fires the implementation must stop waiting promptly and
    /// return [`ServiceError::Cancelled`]; it must not leave an unobserved
    /// background call running indefinitely.
    async fn correct(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<CorrectionReport, ServiceError>;

    /// Verify the service is reachable and the configured model exists.
    ///
    /// Called once at startup, before any activation is accepted.
    async fn check_ready(&self) -> Result<(), ServiceError>;
}
