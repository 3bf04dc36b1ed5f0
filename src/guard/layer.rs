use crate::guard::Guard;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer for Guards
///
/// Guards are checked in list order; the first rejection short-circuits.
#[derive(Clone)]
pub struct GuardLayer {
    guards: Arc<[Arc<dyn Guard>]>,
}

impl GuardLayer {
    pub fn new(guards: Vec<Arc<dyn Guard>>) -> Self {
        Self {
            guards: guards.into(),
        }
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            guards: Arc::clone(&self.guards),
        }
    }
}

#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    guards: Arc<[Arc<dyn Guard>]>,
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
where
    S: Service<Request<Body>, Response = Response, Error = Infallible> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Response, Infallible>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let guards = Arc::clone(&self.guards);
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (parts, body) = request.into_parts();
            for guard in guards.iter() {
                if let Err(e) = guard.can_activate(&parts).await {
                    tracing::warn!("{} {} rejected: {}", parts.method, parts.uri, e);
                    return Ok(e.into_response());
                }
            }
            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::{GuardError, GuardResult};
    use async_trait::async_trait;
    use axum::http::{request::Parts, StatusCode};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    struct HeaderGuard;

    #[async_trait]
    impl Guard for HeaderGuard {
        async fn can_activate(&self, parts: &Parts) -> GuardResult {
            if parts.headers.contains_key("authorization") {
                Ok(())
            } else {
                Err(GuardError::Unauthorized("missing credentials".into()))
            }
        }
    }

    struct Deny;

    #[async_trait]
    impl Guard for Deny {
        async fn can_activate(&self, _parts: &Parts) -> GuardResult {
            Err(GuardError::Forbidden("nope".into()))
        }
    }

    fn counting_service(
        hits: Arc<AtomicUsize>,
    ) -> tower::util::BoxCloneSyncService<Request<Body>, Response, Infallible> {
        tower::util::BoxCloneSyncService::new(tower::service_fn(move |_req: Request<Body>| {
            let hits = Arc::clone(&hits);
            async move {
                hits.fetch_add(1, Ordering::SeqCst);
                Ok::<_, Infallible>(StatusCode::OK.into_response())
            }
        }))
    }

    #[tokio::test]
    async fn test_allows_when_every_guard_passes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let service = GuardLayer::new(vec![Arc::new(HeaderGuard) as Arc<dyn Guard>])
            .layer(counting_service(Arc::clone(&hits)));

        let request = Request::builder()
            .header("authorization", "Bearer token")
            .body(Body::empty())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_first_rejection_short_circuits() {
        let hits = Arc::new(AtomicUsize::new(0));
        let guards: Vec<Arc<dyn Guard>> = vec![
            Arc::new(HeaderGuard) as Arc<dyn Guard>,
            Arc::new(Deny) as Arc<dyn Guard>,
        ];
        let service = GuardLayer::new(guards).layer(counting_service(Arc::clone(&hits)));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
