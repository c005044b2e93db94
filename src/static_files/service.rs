use axum::http::{Request, Response};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::Service;

use super::negotiator::Negotiator;

/// Middleware service created by [`NegotiationLayer`](super::NegotiationLayer)
#[derive(Clone)]
pub struct NegotiationService<S> {
    inner: S,
    negotiator: Arc<Negotiator>,
}

impl<S> NegotiationService<S> {
    pub(crate) fn new(inner: S, negotiator: Arc<Negotiator>) -> Self {
        Self { inner, negotiator }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for NegotiationService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    ReqBody: Send + 'static,
    ResBody: Send + 'static,
{
    type Response = Response<ResBody>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        let negotiator = self.negotiator.clone();
        // The ready service goes into the future, the clone stays for the next call
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();
            let scope = negotiator.negotiate(&mut parts).await;
            let served_path = parts.uri.path().to_string();

            let mut response = inner.call(Request::from_parts(parts, body)).await?;
            negotiator.prepare_response(scope, &served_path, &mut response);

            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NegotiationConfig;
    use crate::fs::InMemoryFileSystem;
    use crate::negotiation::ProviderRegistry;
    use crate::static_files::{NegotiationError, NegotiationLayer, StaticFileOptions};
    use axum::http::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, VARY};
    use axum::http::{HeaderValue, StatusCode};
    use std::convert::Infallible;
    use tower::{Layer, ServiceExt, service_fn};

    /// Stands in for the file server: echoes the path it was asked for
    async fn echo_path(req: Request<()>) -> Result<Response<String>, Infallible> {
        let path = req.uri().path().to_string();
        let mut response = Response::new(path);
        response
            .headers_mut()
            .insert("content-type", HeaderValue::from_static("application/octet-stream"));
        Ok(response)
    }

    fn layer(file_system: InMemoryFileSystem) -> NegotiationLayer {
        NegotiationLayer::new(
            "unused",
            StaticFileOptions::default().with_file_system(file_system),
            ProviderRegistry::with_defaults(&NegotiationConfig::default()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_inner_service_sees_rewritten_path() {
        let layer = layer(
            InMemoryFileSystem::new()
                .with_file("/photo.png", 500 * 1024)
                .with_file("/photo.webp", 80 * 1024),
        );
        let service = layer.layer(service_fn(echo_path));

        let request = Request::builder()
            .uri("/photo.png")
            .header(ACCEPT, "image/webp,*/*")
            .body(())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), "/photo.webp");
        assert_eq!(response.headers()[VARY], "Accept");
        assert_eq!(layer.metrics().snapshot().substitutions_applied, 1);
    }

    #[tokio::test]
    async fn test_passthrough_leaves_request_untouched() {
        let layer = layer(
            InMemoryFileSystem::new()
                .with_file("/app.js", 1000)
                .with_file("/app.js.gz", 1200),
        );
        let service = layer.layer(service_fn(echo_path));

        let request = Request::builder()
            .uri("/app.js")
            .header(ACCEPT_ENCODING, "gzip, br")
            .body(())
            .unwrap();
        let response = service.oneshot(request).await.unwrap();

        assert_eq!(response.body(), "/app.js");
        assert!(!response.headers().contains_key(CONTENT_ENCODING));
        assert!(!response.headers().contains_key(VARY));
        assert_eq!(layer.metrics().snapshot().passthroughs, 1);
    }

    #[tokio::test]
    async fn test_concurrent_requests_keep_their_own_alternative() {
        let layer = layer(
            InMemoryFileSystem::new()
                .with_file("/app.js", 1000)
                .with_file("/app.js.br", 350)
                .with_file("/photo.png", 500)
                .with_file("/photo.webp", 80),
        );

        let compressed = layer.layer(service_fn(echo_path)).oneshot(
            Request::builder()
                .uri("/app.js")
                .header(ACCEPT_ENCODING, "br")
                .body(())
                .unwrap(),
        );
        let image = layer.layer(service_fn(echo_path)).oneshot(
            Request::builder()
                .uri("/photo.png")
                .header(ACCEPT, "image/webp")
                .body(())
                .unwrap(),
        );
        let plain = layer.layer(service_fn(echo_path)).oneshot(
            Request::builder().uri("/photo.png").body(()).unwrap(),
        );

        let (compressed, image, plain) = tokio::join!(compressed, image, plain);
        let (compressed, image, plain) = (compressed.unwrap(), image.unwrap(), plain.unwrap());

        assert_eq!(compressed.body(), "/app.js.br");
        assert_eq!(compressed.headers()[CONTENT_ENCODING], "br");
        assert!(!compressed.headers().contains_key(VARY));

        assert_eq!(image.body(), "/photo.webp");
        assert_eq!(image.headers()[VARY], "Accept");
        assert!(!image.headers().contains_key(CONTENT_ENCODING));

        assert_eq!(plain.body(), "/photo.png");
        assert!(!plain.headers().contains_key(CONTENT_ENCODING));
        assert!(!plain.headers().contains_key(VARY));
    }

    #[test]
    fn test_layer_requires_providers() {
        let result = NegotiationLayer::new(
            "unused",
            StaticFileOptions::default(),
            ProviderRegistry::new(),
        );
        assert!(matches!(result, Err(NegotiationError::NoProviders)));
    }
}
