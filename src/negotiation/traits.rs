use async_trait::async_trait;
use std::fmt;

use super::content_types::ContentTypeRegistry;
use super::types::{NegotiationContext, StaticFileResponseContext};
use crate::fs::{FileInfo, FileSystem};

/// A file that can be served in place of the requested one
pub trait FileAlternative: Send + Sync + fmt::Debug {
    /// Length of the alternative file in bytes
    fn size(&self) -> u64;

    /// Ranking value, lower wins
    fn cost(&self) -> f64;

    /// Redirect the request to the alternative file
    fn apply(&self, ctx: &mut NegotiationContext<'_>);

    /// Fix up response headers once the file server picked a content type
    fn prepare(
        &self,
        content_types: &ContentTypeRegistry,
        response: &mut StaticFileResponseContext<'_>,
    );
}

/// Proposes alternatives for one kind of negotiation
///
/// Providers hold only static configuration and are shared by all requests.
#[async_trait]
pub trait NegotiationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Register the media types the file server needs for this provider's files.
    /// Called once at startup.
    fn initialize(&self, content_types: &mut ContentTypeRegistry);

    /// Cheapest alternative to `original` for this request, if any
    async fn alternative(
        &self,
        ctx: &NegotiationContext<'_>,
        file_system: &dyn FileSystem,
        original: &FileInfo,
    ) -> Option<Box<dyn FileAlternative>>;
}
