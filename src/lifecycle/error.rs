use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinError;

/// The half of a lifespan that was running when it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Startup,
    Shutdown,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("{router} did not finish {phase} within {limit:?}")]
    Timeout {
        router: String,
        phase: Phase,
        limit: Duration,
    },

    /// The lifespan body returned an error, or returned without ever
    /// reaching its running point
    #[error("{router} failed during {phase}: {message}")]
    HookFailed {
        router: String,
        phase: Phase,
        message: String,
    },

    /// The lifespan task panicked or was cancelled
    #[error("{router} aborted during {phase}: {source}")]
    Aborted {
        router: String,
        phase: Phase,
        #[source]
        source: JoinError,
    },
}

impl LifecycleError {
    pub fn router(&self) -> &str {
        match self {
            Self::Timeout { router, .. }
            | Self::HookFailed { router, .. }
            | Self::Aborted { router, .. } => router,
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::Timeout { phase, .. }
            | Self::HookFailed { phase, .. }
            | Self::Aborted { phase, .. } => *phase,
        }
    }
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
