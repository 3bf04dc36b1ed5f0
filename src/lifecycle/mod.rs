//! Router lifespans
//!
//! A router may declare one lifespan: an async block with setup code, a single
//! yield point and teardown code. Hosts collect the lifespans of every mounted
//! router and drive them around the serving period.
//!
//! # Phases
//!
//! ```text
//! 1. mount_router (lifespan registered)
//!    ↓
//! 2. host start: setup runs, in mount order
//!    ↓
//! [Serving...]
//!    ↓
//! 3. Shutdown Signal (SIGTERM/SIGINT)
//!    ↓
//! 4. host shutdown: teardown runs, in reverse mount order
//! ```

mod error;
mod lifespan;
mod manager;
mod shutdown;

pub use error::{LifecycleError, Phase, Result};
pub use lifespan::{Lifespan, LifespanOutcome, Running};
pub use manager::LifespanManager;
pub use shutdown::shutdown_signal;
