//! Error taxonomy for the runtime.
//!
//! Screens turn [`FetchError`] and [`ActionError`] into state and keep running.
//! [`RuntimeError`] means the message loop itself is broken and is fatal.

use thiserror::Error;

/// A configured fetch or load-more call failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("fetch cancelled")]
    Cancelled,
    #[error("{0}")]
    Failed(String),
}

impl FetchError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<color_eyre::Report> for FetchError {
    fn from(report: color_eyre::Report) -> Self {
        Self::Failed(report.to_string())
    }
}

/// A per-item key action or drill-down command failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{action} failed: {message}")]
pub struct ActionError {
    pub action: String,
    pub message: String,
}

impl ActionError {
    pub fn new(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            message: message.into(),
        }
    }
}

/// A defect in the navigation/runtime layer.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("navigation stack is empty")]
    EmptyStack,
    #[error("event channel closed")]
    ChannelClosed,
    #[error("terminal error: {0}")]
    Terminal(String),
}
