//! Error types for E2E testing

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Setup failed: {operation} - {reason}")]
    Setup { operation: String, reason: String },

    #[error("Username already seeded since last reset: {0}")]
    DuplicateUsername(String),

    #[error("{url} unreachable after {attempts} attempts")]
    AppUnreachable { url: String, attempts: usize },

    #[error("Playwright not found. Install with: npm install @playwright/test && npx playwright install")]
    PlaywrightNotFound,

    #[error("Playwright error: {0}")]
    Playwright(String),

    #[error("Assertion failed at {step}: {message}")]
    AssertionFailed {
        step: String,
        message: String,
        expected: Option<String>,
        actual: Option<String>,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Which side of the fence a failure landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Environment could not be prepared (reset, seed, app down)
    Setup,
    /// The app never reached the expected UI state
    Assertion,
    /// The harness itself broke (node missing, script crash, IO)
    Harness,
}

impl E2eError {
    pub fn setup(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        E2eError::Setup {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            E2eError::Setup { .. }
            | E2eError::DuplicateUsername(_)
            | E2eError::AppUnreachable { .. }
            | E2eError::Http(_) => FailureKind::Setup,
            E2eError::AssertionFailed { .. } => FailureKind::Assertion,
            _ => FailureKind::Harness,
        }
    }

    pub fn is_setup(&self) -> bool {
        self.kind() == FailureKind::Setup
    }
}

pub type E2eResult<T> = Result<T, E2eError>;
