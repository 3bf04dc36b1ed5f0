use crate::interceptor::{Interceptor, InterceptorResult, Next};
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

/// Tower Layer for invoking a chain of interceptors
///
/// The first interceptor of the list is the outermost one.
#[derive(Clone)]
pub struct InterceptorLayer {
    interceptors: Arc<[Arc<dyn Interceptor>]>,
}

impl InterceptorLayer {
    pub fn new(interceptors: Vec<Arc<dyn Interceptor>>) -> Self {
        Self {
            interceptors: interceptors.into(),
        }
    }
}

impl<S> Layer<S> for InterceptorLayer {
    type Service = InterceptorMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        InterceptorMiddleware {
            inner,
            interceptors: Arc::clone(&self.interceptors),
        }
    }
}

#[derive(Clone)]
pub struct InterceptorMiddleware<S> {
    inner: S,
    interceptors: Arc<[Arc<dyn Interceptor>]>,
}

impl<S> Service<Request<Body>> for InterceptorMiddleware<S>
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
        let interceptors = Arc::clone(&self.interceptors);

        // Take the service that was driven to readiness and leave a fresh clone behind.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let mut chain = Next::new(move |req| {
                Box::pin(async move {
                    match inner.call(req).await {
                        Ok(response) => Ok(response),
                        Err(never) => match never {},
                    }
                })
            });

            // interceptors[0] wraps (interceptors[1] wraps ... (handler))
            for i in (0..interceptors.len()).rev() {
                let interceptors = Arc::clone(&interceptors);
                let next = chain;
                chain = Next::new(move |req| {
                    Box::pin(async move { interceptors[i].intercept(req, next).await })
                });
            }

            Ok(into_response(chain.run(request).await))
        })
    }
}

fn into_response(result: InterceptorResult) -> Response {
    match result {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Interceptor failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "statusCode": StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                    "message": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct Record {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Interceptor for Record {
        async fn intercept(&self, request: Request<Body>, next: Next) -> InterceptorResult {
            self.log.lock().unwrap().push(format!("{}:before", self.label));
            let response = next.run(request).await?;
            self.log.lock().unwrap().push(format!("{}:after", self.label));
            Ok(response)
        }
    }

    struct Failing;

    #[async_trait]
    impl Interceptor for Failing {
        async fn intercept(&self, _request: Request<Body>, _next: Next) -> InterceptorResult {
            Err("refused".into())
        }
    }

    fn handler_service(
        log: Arc<Mutex<Vec<String>>>,
    ) -> tower::util::BoxCloneSyncService<Request<Body>, Response, Infallible> {
        tower::util::BoxCloneSyncService::new(tower::service_fn(move |_req: Request<Body>| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push("handler".to_string());
                Ok::<_, Infallible>(StatusCode::OK.into_response())
            }
        }))
    }

    #[tokio::test]
    async fn test_chain_runs_outer_first() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layer = InterceptorLayer::new(vec![
            Arc::new(Record { label: "outer", log: Arc::clone(&log) }) as Arc<dyn Interceptor>,
            Arc::new(Record { label: "inner", log: Arc::clone(&log) }) as Arc<dyn Interceptor>,
        ]);
        let service = layer.layer(handler_service(Arc::clone(&log)));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["outer:before", "inner:before", "handler", "inner:after", "outer:after"]
        );
    }

    #[tokio::test]
    async fn test_error_becomes_500() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let layer = InterceptorLayer::new(vec![Arc::new(Failing) as Arc<dyn Interceptor>]);
        let service = layer.layer(handler_service(Arc::clone(&log)));

        let response = service
            .oneshot(Request::new(Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(log.lock().unwrap().is_empty());
    }
}
