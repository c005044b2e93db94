use axum::http::{HeaderMap, StatusCode};

/// Request-side view handed to providers and to [`FileAlternative::apply`]
///
/// [`FileAlternative::apply`]: super::FileAlternative::apply
#[derive(Debug)]
pub struct NegotiationContext<'a> {
    path: String,
    request_headers: &'a HeaderMap,
    response_headers: HeaderMap,
}

impl<'a> NegotiationContext<'a> {
    pub fn new(path: impl Into<String>, request_headers: &'a HeaderMap) -> Self {
        Self {
            path: path.into(),
            request_headers,
            response_headers: HeaderMap::new(),
        }
    }

    /// Effective request path (raw, percent-encoded)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_path(&mut self, path: String) {
        self.path = path;
    }

    pub fn request_headers(&self) -> &HeaderMap {
        self.request_headers
    }

    /// Headers to add to the response once the file server has answered
    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    /// Effective path and provisional response headers
    pub fn into_parts(self) -> (String, HeaderMap) {
        (self.path, self.response_headers)
    }
}

/// Response-side view passed to prepare-response hooks after the file server
/// has resolved the served file and its content type
#[derive(Debug)]
pub struct StaticFileResponseContext<'a> {
    /// Path the file server was asked for, after any rewrite
    pub served_path: &'a str,
    pub status: StatusCode,
    pub headers: &'a mut HeaderMap,
}
