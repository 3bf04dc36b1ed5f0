use crate::lifecycle::LifecycleError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RouterError>;

#[derive(Debug, Error)]
pub enum RouterError {
    /// The type was handed to `inspect_router` without a router declaration
    #[error("{type_name} is not a router: declare it with #[router]")]
    NotARouter { type_name: &'static str },

    #[error("{type_name} declares {count} lifespans, at most one is allowed")]
    DuplicateLifespan { type_name: &'static str, count: usize },

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}
