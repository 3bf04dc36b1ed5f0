//! Lifespan Manager
//!
//! Runs router lifespans around the host's serving period.

use super::{LifecycleError, Lifespan, Phase, Result, Running};
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A lifespan that reached its running point and waits for the stop signal
struct ActiveLifespan {
    name: String,
    stop: oneshot::Sender<()>,
    task: JoinHandle<anyhow::Result<()>>,
}

/// Manages the lifespans of every router mounted on a host
///
/// - `start` runs each registered lifespan, in registration order, up to its
///   running point.
/// - `shutdown` resumes them in **reverse order** and waits for teardown.
///
/// Each lifespan is started at most once and torn down at most once; calling
/// `shutdown` again is a no-op.
///
/// # Example
///
/// ```rust,ignore
/// let mut manager = LifespanManager::new();
/// manager.register(Lifespan::new("Cache", |running: Running| async move {
///     warm_up().await;
///     running.await;
///     flush().await;
/// }));
///
/// manager.start().await?;
/// // ... application runs ...
/// manager.shutdown().await?;
/// ```
#[derive(Default)]
pub struct LifespanManager {
    pending: Vec<Lifespan>,
    active: Vec<ActiveLifespan>,
    startup_timeout: Option<Duration>,
    shutdown_timeout: Option<Duration>,
}

impl LifespanManager {
    /// Create a new LifespanManager
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, lifespan: Lifespan) {
        tracing::debug!("Registered lifespan: {}", lifespan.name());
        self.pending.push(lifespan);
    }

    /// Bound the time each lifespan may spend in setup
    pub fn set_startup_timeout(&mut self, timeout: Option<Duration>) {
        self.startup_timeout = timeout;
    }

    /// Bound the time each lifespan may spend in teardown
    pub fn set_shutdown_timeout(&mut self, timeout: Option<Duration>) {
        self.shutdown_timeout = timeout;
    }

    /// Number of lifespans registered but not started yet
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Number of lifespans currently running
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Move the lifespans of another manager into this one
    pub(crate) fn absorb(&mut self, other: Vec<Lifespan>) {
        for lifespan in other {
            self.register(lifespan);
        }
    }

    /// Run every pending lifespan up to its running point
    ///
    /// If one fails, the lifespans started before it are torn down and the
    /// failure is returned.
    pub async fn start(&mut self) -> Result<()> {
        tracing::info!("Starting {} router lifespans...", self.pending.len());

        for lifespan in std::mem::take(&mut self.pending) {
            let (name, hook) = lifespan.into_parts();
            let (ready_tx, ready_rx) = oneshot::channel();
            let (stop_tx, stop_rx) = oneshot::channel();
            let task = tokio::spawn(hook(Running::new(ready_tx, stop_rx)));

            let ready = match self.startup_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, ready_rx).await {
                    Ok(ready) => ready,
                    Err(_) => {
                        task.abort();
                        tracing::error!("Lifespan {} did not start within {:?}", name, timeout);
                        self.unwind().await;
                        return Err(LifecycleError::Timeout {
                            router: name,
                            phase: Phase::Startup,
                            limit: timeout,
                        });
                    }
                },
                None => ready_rx.await,
            };

            if ready.is_err() {
                let err = match task.await {
                    Ok(outcome) => LifecycleError::HookFailed {
                        router: name,
                        phase: Phase::Startup,
                        message: match outcome {
                            Ok(()) => "returned before reaching its running point".to_string(),
                            Err(e) => e.to_string(),
                        },
                    },
                    Err(source) => LifecycleError::Aborted {
                        router: name,
                        phase: Phase::Startup,
                        source,
                    },
                };
                tracing::error!("Lifespan startup failed: {}", err);
                self.unwind().await;
                return Err(err);
            }

            tracing::debug!("Started: {}", name);
            self.active.push(ActiveLifespan {
                name,
                stop: stop_tx,
                task,
            });
        }

        tracing::info!("Router lifespans started ({} running)", self.active.len());
        Ok(())
    }

    /// Resume every running lifespan and wait for its teardown
    ///
    /// Lifespans are stopped in reverse order of startup. A failing teardown is
    /// logged and the others still run; the first failure is returned.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Stopping {} router lifespans...", self.active.len());

        let mut first_error = None;
        let active = std::mem::take(&mut self.active);
        for ActiveLifespan { name, stop, task } in active.into_iter().rev() {
            tracing::debug!("Stopping: {}", name);
            let _ = stop.send(());

            let joined = match self.shutdown_timeout {
                Some(timeout) => match tokio::time::timeout(timeout, task).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        tracing::error!("Lifespan {} did not stop within {:?}", name, timeout);
                        first_error.get_or_insert(LifecycleError::Timeout {
                            router: name,
                            phase: Phase::Shutdown,
                            limit: timeout,
                        });
                        continue;
                    }
                },
                None => task.await,
            };

            let err = match joined {
                Ok(Ok(())) => {
                    tracing::debug!("Stopped: {}", name);
                    continue;
                }
                Ok(Err(e)) => LifecycleError::HookFailed {
                    router: name,
                    phase: Phase::Shutdown,
                    message: e.to_string(),
                },
                Err(source) => LifecycleError::Aborted {
                    router: name,
                    phase: Phase::Shutdown,
                    source,
                },
            };
            tracing::error!("Lifespan teardown failed: {}", err);
            first_error.get_or_insert(err);
        }

        tracing::info!("Router lifespans stopped");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn unwind(&mut self) {
        if let Err(e) = self.shutdown().await {
            tracing::error!("Error while unwinding lifespans: {}", e);
        }
    }
}

impl Drop for LifespanManager {
    fn drop(&mut self) {
        if !self.active.is_empty() {
            // Dropping the stop senders still resumes the tasks.
            tracing::warn!(
                "{} lifespans still running when their host was dropped",
                self.active.len()
            );
        }
    }
}
