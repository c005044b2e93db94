use std::fmt;
use std::sync::Arc;

use crate::fs::FileSystem;
use crate::negotiation::{ContentTypeRegistry, StaticFileResponseContext};

/// Called for every response where the file server resolved a file, before
/// the negotiated alternative adjusts the headers
pub type PrepareResponseHook = Arc<dyn Fn(&mut StaticFileResponseContext<'_>) + Send + Sync>;

/// Options shared with the underlying file server
#[derive(Clone, Default)]
pub struct StaticFileOptions {
    /// Where files are looked up; defaults to the web root on disk
    pub file_system: Option<Arc<dyn FileSystem>>,
    /// Extension mappings; defaults to the built-in database
    pub content_types: Option<ContentTypeRegistry>,
    pub on_prepare_response: Option<PrepareResponseHook>,
}

impl StaticFileOptions {
    pub fn with_file_system(mut self, file_system: impl FileSystem + 'static) -> Self {
        self.file_system = Some(Arc::new(file_system));
        self
    }

    pub fn with_content_types(mut self, content_types: ContentTypeRegistry) -> Self {
        self.content_types = Some(content_types);
        self
    }

    pub fn on_prepare_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut StaticFileResponseContext<'_>) + Send + Sync + 'static,
    {
        self.on_prepare_response = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for StaticFileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticFileOptions")
            .field("file_system", &self.file_system.is_some())
            .field("content_types", &self.content_types)
            .field("on_prepare_response", &self.on_prepare_response.is_some())
            .finish()
    }
}
