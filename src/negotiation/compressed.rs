use async_trait::async_trait;
use axum::http::HeaderValue;
use axum::http::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};

use super::content_types::{ContentTypeRegistry, extension_of};
use super::headers::accepted_values;
use super::traits::{FileAlternative, NegotiationProvider};
use super::types::{NegotiationContext, StaticFileResponseContext};
use crate::config::NegotiationConfig;
use crate::fs::{FileInfo, FileSystem};
use crate::observability::log_file_served;

/// Content encodings served from precompressed siblings, as `(token, extension)`
pub const COMPRESSION_TYPES: &[(&str, &str)] = &[("gzip", ".gz"), ("br", ".br")];

fn ends_with_ignore_case(value: &str, suffix: &str) -> bool {
    value.len() >= suffix.len()
        && value.is_char_boundary(value.len() - suffix.len())
        && value[value.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

/// A precompressed sibling (`app.js.br`) of the requested file
#[derive(Debug, Clone)]
pub struct CompressedAlternative {
    original: FileInfo,
    alternative: FileInfo,
}

impl CompressedAlternative {
    pub fn new(original: FileInfo, alternative: FileInfo) -> Self {
        Self {
            original,
            alternative,
        }
    }
}

impl FileAlternative for CompressedAlternative {
    fn size(&self) -> u64 {
        self.alternative.length
    }

    fn cost(&self) -> f64 {
        self.size() as f64
    }

    fn apply(&self, ctx: &mut NegotiationContext<'_>) {
        let extension = extension_of(&self.alternative.name).unwrap_or_default();
        let matched_path = format!("{}{}", ctx.path(), extension);

        log_file_served(
            ctx.path(),
            &matched_path,
            self.original.length,
            self.alternative.length,
        );
        ctx.set_path(matched_path);
    }

    fn prepare(
        &self,
        content_types: &ContentTypeRegistry,
        response: &mut StaticFileResponseContext<'_>,
    ) {
        let served_name = &self.alternative.name;

        for &(encoding, extension) in COMPRESSION_TYPES {
            if !ends_with_ignore_case(served_name, extension) {
                continue;
            }

            // The file server derived the type from the compression suffix
            let original_name = &served_name[..served_name.len() - extension.len()];
            if let Some(value) = content_types
                .content_type(original_name)
                .and_then(|content_type| HeaderValue::from_str(&content_type).ok())
            {
                response.headers.insert(CONTENT_TYPE, value);
            }

            response
                .headers
                .append(CONTENT_ENCODING, HeaderValue::from_static(encoding));
        }
    }
}

/// Serves `<path>.gz` / `<path>.br` when the client accepts the encoding and
/// the compressed file is smaller than the original
#[derive(Debug, Clone)]
pub struct CompressedAlternativeProvider {
    enabled: bool,
}

impl CompressedAlternativeProvider {
    pub fn new(config: &NegotiationConfig) -> Self {
        Self {
            enabled: config.enable_precompressed_files,
        }
    }

    /// Encodings accepted by the client that have a known file extension
    fn supported_encodings(ctx: &NegotiationContext<'_>) -> Vec<(&'static str, &'static str)> {
        let accepted = accepted_values(ctx.request_headers(), &ACCEPT_ENCODING);

        COMPRESSION_TYPES
            .iter()
            .filter(|(encoding, _)| accepted.iter().any(|value| value == encoding))
            .copied()
            .collect()
    }
}

#[async_trait]
impl NegotiationProvider for CompressedAlternativeProvider {
    fn name(&self) -> &'static str {
        "compressed"
    }

    fn initialize(&self, content_types: &mut ContentTypeRegistry) {
        // Without a known type the file server would not serve .br files
        content_types.insert_if_absent(".br", "application/brotli");
    }

    async fn alternative(
        &self,
        ctx: &NegotiationContext<'_>,
        file_system: &dyn FileSystem,
        original: &FileInfo,
    ) -> Option<Box<dyn FileAlternative>> {
        if !self.enabled {
            return None;
        }

        let mut matched: Option<FileInfo> = None;
        for (encoding, extension) in Self::supported_encodings(ctx) {
            let file = file_system
                .file_info(&format!("{}{}", ctx.path(), extension))
                .await;
            let best_length = matched.as_ref().map_or(original.length, |m| m.length);

            if file.is_file() && file.length < best_length {
                tracing::trace!(encoding, length = file.length, "Smaller compressed file found");
                matched = Some(file);
            }
        }

        matched.map(|file| {
            Box::new(CompressedAlternative::new(original.clone(), file)) as Box<dyn FileAlternative>
        })
    }
}
