//! Router lifespans
//!
//! A lifespan is an async block split in two by a [`Running`] handle:
//!
//! ```rust,ignore
//! #[lifespan]
//! async fn lifespan(&self, running: Running) {
//!     self.pool.connect().await;   // setup
//!     running.await;               // host serves requests here
//!     self.pool.close().await;     // teardown
//! }
//! ```
//!
//! The host resumes the block once after it stops serving, so teardown runs
//! exactly once.

use std::fmt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use tokio::sync::oneshot;

pub(crate) type LifespanFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
type LifespanFn = Box<dyn FnOnce(Running) -> LifespanFuture + Send>;

/// The yield point of a lifespan
///
/// Awaiting it reports setup as complete and suspends until the host stops.
/// Dropping it without awaiting means setup failed.
pub struct Running {
    ready: oneshot::Sender<()>,
    stop: oneshot::Receiver<()>,
}

impl Running {
    pub(crate) fn new(ready: oneshot::Sender<()>, stop: oneshot::Receiver<()>) -> Self {
        Self { ready, stop }
    }
}

impl IntoFuture for Running {
    type Output = ();
    type IntoFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        let Running { ready, stop } = self;
        Box::pin(async move {
            let _ = ready.send(());
            // A dropped sender means the host is gone, which also ends the run.
            let _ = stop.await;
        })
    }
}

/// Values a lifespan body may return
pub trait LifespanOutcome: Send + 'static {
    fn into_result(self) -> anyhow::Result<()>;
}

impl LifespanOutcome for () {
    fn into_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> LifespanOutcome for Result<(), E>
where
    E: Into<anyhow::Error> + Send + 'static,
{
    fn into_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// A router's lifespan block, ready to be run by a host
pub struct Lifespan {
    name: String,
    hook: LifespanFn,
}

impl Lifespan {
    pub fn new<F, Fut>(name: impl Into<String>, hook: F) -> Self
    where
        F: FnOnce(Running) -> Fut + Send + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: LifespanOutcome,
    {
        Self {
            name: name.into(),
            hook: Box::new(move |running| {
                let fut = hook(running);
                Box::pin(async move { fut.await.into_result() })
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub(crate) fn into_parts(self) -> (String, LifespanFn) {
        (self.name, self.hook)
    }
}

impl fmt::Debug for Lifespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifespan").field("name", &self.name).finish()
    }
}
