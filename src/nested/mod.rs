//! Nested host
//!
//! Each mounted router becomes an [`ApiRouter`] that is included into the app
//! (or into another `ApiRouter`). Each level's prefix is joined onto the route
//! paths and its guards and interceptors are folded into every route as it is
//! included. Tags and responses merge outer to inner, `deprecated` is an OR
//! across levels and `include_in_schema` an AND. This is the only host that
//! runs router lifespans.
//!
//! ```rust,ignore
//! #[router(prefix = "/api", tags = ["test"])]
//! struct Items {
//!     msg: String,
//! }
//!
//! #[routes]
//! impl Items {
//!     #[get("/get")]
//!     async fn read(&self) -> Json<String> {
//!         Json(self.msg.clone())
//!     }
//! }
//!
//! let mut app = ApiApp::new();
//! nested::mount_router(&mut app, Arc::new(Items::new("OK".into())), MountOptions::default())?;
//! ```

mod app;
mod router;

pub use app::ApiApp;
pub use router::ApiRouter;

use crate::error::Result;
use crate::router::{inspect_router, MountOptions, Router};
use std::sync::Arc;

/// Hosts a declared router can be mounted onto
pub trait IncludeRouter<S> {
    fn include_router(&mut self, router: ApiRouter<S>, options: MountOptions);
}

impl<S> IncludeRouter<S> for ApiApp<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn include_router(&mut self, router: ApiRouter<S>, options: MountOptions) {
        ApiApp::include_router(self, router, options)
    }
}

impl<S> IncludeRouter<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn include_router(&mut self, router: ApiRouter<S>, options: MountOptions) {
        ApiRouter::include_router(self, router, options)
    }
}

/// Mount a router onto an [`ApiApp`] or an [`ApiRouter`]
///
/// The router's endpoints are added to a fresh `ApiRouter` built from its
/// router spec, its lifespan is attached, and the result is included with the
/// given options.
pub fn mount_router<H, R, S>(host: &mut H, router: Arc<R>, options: MountOptions) -> Result<()>
where
    H: IncludeRouter<S>,
    R: Router<S>,
    S: Clone + Send + Sync + 'static,
{
    let members = inspect_router(router)?;

    let mut api_router = ApiRouter::from_spec(&members.spec);
    for (endpoint, spec) in members.routes {
        api_router.add_api_route(spec, endpoint);
    }
    for (endpoint, spec) in members.websocket_routes {
        api_router.add_api_websocket_route(spec, endpoint);
    }
    if let Some(lifespan) = members.lifespan {
        api_router.register_lifespan(lifespan);
    }

    tracing::info!(
        "Mounted {} ({} operations)",
        std::any::type_name::<R>(),
        api_router.operations().len()
    );
    host.include_router(api_router, options);
    Ok(())
}
