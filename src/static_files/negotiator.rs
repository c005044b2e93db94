use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderMap, HeaderValue, Response, StatusCode, Uri};
use std::sync::Arc;

use super::error::NegotiationError;
use super::options::{PrepareResponseHook, StaticFileOptions};
use crate::fs::{FileInfo, FileSystem, PhysicalFileSystem};
use crate::negotiation::{
    ContentTypeRegistry, FileAlternative, NegotiationContext, ProviderRegistry,
    StaticFileResponseContext,
};
use crate::observability::NegotiationMetrics;

/// State of one request between negotiation and response preparation.
///
/// Owned by the request's future, so it is never visible to other requests.
#[derive(Debug, Default)]
pub(crate) struct RequestScope {
    selected: Option<Box<dyn FileAlternative>>,
    response_headers: HeaderMap,
}

impl RequestScope {
    fn passthrough() -> Self {
        Self::default()
    }

    pub(crate) fn is_substituted(&self) -> bool {
        self.selected.is_some()
    }
}

/// Startup-built, read-only negotiation state shared by all requests
pub(crate) struct Negotiator {
    providers: ProviderRegistry,
    file_system: Arc<dyn FileSystem>,
    content_types: Arc<ContentTypeRegistry>,
    on_prepare_response: Option<PrepareResponseHook>,
    metrics: Arc<NegotiationMetrics>,
}

impl Negotiator {
    pub(crate) fn new(
        web_root: std::path::PathBuf,
        options: StaticFileOptions,
        providers: ProviderRegistry,
    ) -> Result<Self, NegotiationError> {
        if providers.is_empty() {
            return Err(NegotiationError::NoProviders);
        }

        let file_system = options
            .file_system
            .unwrap_or_else(|| Arc::new(PhysicalFileSystem::new(web_root)));

        let mut content_types = options.content_types.unwrap_or_default();
        for provider in providers.iter() {
            provider.initialize(&mut content_types);
        }

        tracing::info!(providers = ?providers.names(), "Content negotiation initialized");

        Ok(Self {
            providers,
            file_system,
            content_types: Arc::new(content_types),
            on_prepare_response: options.on_prepare_response,
            metrics: Arc::new(NegotiationMetrics::new()),
        })
    }

    pub(crate) fn content_types(&self) -> &ContentTypeRegistry {
        &self.content_types
    }

    pub(crate) fn metrics(&self) -> &Arc<NegotiationMetrics> {
        &self.metrics
    }

    /// Pick the cheapest alternative for the request and rewrite its URI
    pub(crate) async fn negotiate(&self, parts: &mut Parts) -> RequestScope {
        self.metrics.request_negotiated();

        let scope = self.select_and_apply(parts).await;
        if scope.is_substituted() {
            self.metrics.substitution_applied();
        } else {
            self.metrics.passthrough();
        }
        scope
    }

    async fn select_and_apply(&self, parts: &mut Parts) -> RequestScope {
        let requested_path = parts.uri.path().to_string();
        if requested_path.is_empty() {
            return RequestScope::passthrough();
        }

        let original = self.file_system.file_info(&requested_path).await;
        if !original.is_file() {
            tracing::trace!(path = %requested_path, "No file to negotiate");
            return RequestScope::passthrough();
        }

        let mut ctx = NegotiationContext::new(requested_path, &parts.headers);
        let Some(selected) = self.cheapest_alternative(&ctx, &original).await else {
            return RequestScope::passthrough();
        };

        selected.apply(&mut ctx);
        let (path, response_headers) = ctx.into_parts();

        match rewrite_uri(&parts.uri, &path) {
            Some(uri) => parts.uri = uri,
            None => {
                tracing::debug!(path = %path, "Alternative path is not a valid URI, serving original");
                return RequestScope::passthrough();
            }
        }

        RequestScope {
            selected: Some(selected),
            response_headers,
        }
    }

    /// Lowest cost across providers; the first provider wins exact ties
    async fn cheapest_alternative(
        &self,
        ctx: &NegotiationContext<'_>,
        original: &FileInfo,
    ) -> Option<Box<dyn FileAlternative>> {
        let mut best: Option<Box<dyn FileAlternative>> = None;

        for provider in self.providers.iter() {
            let Some(candidate) = provider
                .alternative(ctx, self.file_system.as_ref(), original)
                .await
            else {
                continue;
            };

            tracing::trace!(
                provider = provider.name(),
                size = candidate.size(),
                cost = candidate.cost(),
                "Alternative proposed"
            );

            if best.as_ref().is_none_or(|b| candidate.cost() < b.cost()) {
                best = Some(candidate);
            }
        }

        best
    }

    /// Runs once the file server has answered the (possibly rewritten) request
    pub(crate) fn prepare_response<B>(
        &self,
        scope: RequestScope,
        served_path: &str,
        response: &mut Response<B>,
    ) {
        let RequestScope {
            selected,
            response_headers,
        } = scope;

        let status = response.status();
        let headers = response.headers_mut();
        for (name, value) in response_headers.iter() {
            headers.append(name.clone(), value.clone());
        }

        if !file_was_served(status) {
            return;
        }

        if headers.contains_key(CONTENT_TYPE) {
            if let Some(value) = self
                .content_types
                .explicit_content_type(served_path)
                .and_then(|content_type| HeaderValue::from_str(content_type).ok())
            {
                headers.insert(CONTENT_TYPE, value);
            }
        }

        let mut ctx = StaticFileResponseContext {
            served_path,
            status,
            headers,
        };

        if let Some(hook) = &self.on_prepare_response {
            hook(&mut ctx);
        }

        if let Some(selected) = &selected {
            selected.prepare(&self.content_types, &mut ctx);
        }
    }
}

/// Statuses for which the file server resolved the file it was asked for
fn file_was_served(status: StatusCode) -> bool {
    status.is_success()
        || status == StatusCode::NOT_MODIFIED
        || status == StatusCode::PRECONDITION_FAILED
        || status == StatusCode::RANGE_NOT_SATISFIABLE
}

/// Same URI with a new path, query string preserved
fn rewrite_uri(uri: &Uri, path: &str) -> Option<Uri> {
    let path_and_query = match uri.query() {
        Some(query) => format!("{path}?{query}"),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    Uri::from_parts(parts).ok()
}
