use async_trait::async_trait;
use axum::http::HeaderValue;
use axum::http::header::{ACCEPT, VARY};
use std::collections::HashMap;

use super::content_types::{ContentTypeRegistry, extension_of, split_extension};
use super::headers::accepted_values;
use super::traits::{FileAlternative, NegotiationProvider};
use super::types::{NegotiationContext, StaticFileResponseContext};
use crate::config::NegotiationConfig;
use crate::fs::{FileInfo, FileSystem};
use crate::observability::log_file_served;

/// Substitutable image media types and their file extensions
pub const IMAGE_FORMATS: &[(&str, &[&str])] = &[
    ("image/avif", &[".avif"]),
    ("image/webp", &[".webp"]),
    ("image/jpeg", &[".jpg", ".jpeg", ".jfif", ".pjpeg", ".pjp"]),
    ("image/png", &[".png"]),
    ("image/bmp", &[".bmp"]),
    ("image/apng", &[".apng"]),
    ("image/gif", &[".gif"]),
    ("image/x-icon", &[".ico", ".cur"]),
    ("image/tiff", &[".tif", ".tiff"]),
];

pub fn is_image_media_type(media_type: &str) -> bool {
    extensions_for(media_type).is_some()
}

fn extensions_for(media_type: &str) -> Option<&'static [&'static str]> {
    IMAGE_FORMATS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(media_type))
        .map(|&(_, extensions)| extensions)
}

fn media_type_for_extension(extension: &str) -> Option<&'static str> {
    IMAGE_FORMATS
        .iter()
        .find(|(_, extensions)| {
            extensions
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
        .map(|&(media_type, _)| media_type)
}

/// The requested image in another format (`photo.webp` for `photo.png`)
#[derive(Debug, Clone)]
pub struct ImageAlternative {
    original: FileInfo,
    alternative: FileInfo,
    cost_ratio: f64,
}

impl ImageAlternative {
    pub fn new(original: FileInfo, alternative: FileInfo, cost_ratio: f64) -> Self {
        Self {
            original,
            alternative,
            cost_ratio,
        }
    }
}

impl FileAlternative for ImageAlternative {
    fn size(&self) -> u64 {
        self.alternative.length
    }

    fn cost(&self) -> f64 {
        self.size() as f64 * self.cost_ratio
    }

    fn apply(&self, ctx: &mut NegotiationContext<'_>) {
        let path = ctx.path();
        let stem = split_extension(path).map_or(path, |(stem, _)| stem);
        let extension = extension_of(&self.alternative.name).unwrap_or_default();
        let matched_path = format!("{stem}{extension}");

        log_file_served(
            ctx.path(),
            &matched_path,
            self.original.length,
            self.alternative.length,
        );
        ctx.set_path(matched_path);

        // Caches must key on Accept once the body depends on it
        ctx.response_headers_mut()
            .append(VARY, HeaderValue::from_static("Accept"));
    }

    fn prepare(
        &self,
        _content_types: &ContentTypeRegistry,
        _response: &mut StaticFileResponseContext<'_>,
    ) {
        // The swapped extension already yields the right content type.
    }
}

/// Serves a same-name image in a format listed in `Accept` when its weighted
/// size beats the original's
#[derive(Debug, Clone)]
pub struct ImageAlternativeProvider {
    enabled: bool,
    cost_ratios: HashMap<String, f64>,
}

impl ImageAlternativeProvider {
    /// Ratios that are not finite and positive fall back to 1.0
    pub fn new(config: &NegotiationConfig) -> Self {
        let cost_ratios = config
            .image_substitution_cost_ratio
            .iter()
            .filter(|&(media_type, &ratio)| {
                let valid = ratio.is_finite() && ratio > 0.0;
                if !valid {
                    tracing::warn!(%media_type, ratio, "Ignoring invalid image cost ratio");
                }
                valid
            })
            .map(|(media_type, &ratio)| (media_type.to_ascii_lowercase(), ratio))
            .collect();

        Self {
            enabled: config.enable_image_substitution,
            cost_ratios,
        }
    }

    fn cost_ratio_for_extension(&self, extension: &str) -> f64 {
        media_type_for_extension(extension)
            .and_then(|media_type| self.cost_ratios.get(media_type))
            .copied()
            .unwrap_or(1.0)
    }
}

#[async_trait]
impl NegotiationProvider for ImageAlternativeProvider {
    fn name(&self) -> &'static str {
        "image"
    }

    fn initialize(&self, content_types: &mut ContentTypeRegistry) {
        for &(media_type, extensions) in IMAGE_FORMATS {
            for extension in extensions {
                content_types.insert_if_absent(extension, media_type);
            }
        }
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

        // Only the final segment can carry an extension to swap
        let (stem, _) = split_extension(ctx.path())?;

        let original_ratio = extension_of(&original.name)
            .map_or(1.0, |extension| self.cost_ratio_for_extension(extension));
        let baseline = ImageAlternative::new(original.clone(), original.clone(), original_ratio);

        let candidate_extensions = accepted_values(ctx.request_headers(), &ACCEPT)
            .into_iter()
            .filter_map(|media_type| extensions_for(&media_type))
            .flatten();

        let mut matched: Option<ImageAlternative> = None;
        for extension in candidate_extensions {
            let file = file_system.file_info(&format!("{stem}{extension}")).await;
            if !file.is_file() {
                continue;
            }

            let alternative = ImageAlternative::new(
                original.clone(),
                file,
                self.cost_ratio_for_extension(extension),
            );
            let best_cost = matched.as_ref().map_or(baseline.cost(), |m| m.cost());

            if best_cost > alternative.cost() {
                matched = Some(alternative);
            }
        }

        matched.map(|alternative| Box::new(alternative) as Box<dyn FileAlternative>)
    }
}
