//! Content negotiation over alternative files
//!
//! A [`NegotiationProvider`] looks at one request header and a file naming
//! convention and proposes at most one [`FileAlternative`] for the requested
//! file. The static file layer asks every registered provider and serves the
//! cheapest proposal.
//!
//! ## Key Components
//!
//! - [`CompressedAlternativeProvider`] - `.gz`/`.br` siblings, driven by `Accept-Encoding`
//! - [`ImageAlternativeProvider`] - same-name images in other formats, driven by `Accept`
//! - [`ProviderRegistry`] - ordered list of providers consulted per request
//! - [`ContentTypeRegistry`] - extension to media type mappings
//!
//! ## Example
//!
//! ```rust,ignore
//! use negotiated_static::config::NegotiationConfig;
//! use negotiated_static::negotiation::ProviderRegistry;
//!
//! let providers = ProviderRegistry::with_defaults(&NegotiationConfig::default());
//! for provider in providers.iter() {
//!     let candidate = provider.alternative(&ctx, &file_system, &original).await;
//! }
//! ```

mod compressed;
mod content_types;
mod headers;
mod image;
mod registry;
mod traits;
mod types;

pub use compressed::{COMPRESSION_TYPES, CompressedAlternative, CompressedAlternativeProvider};
pub use content_types::{ContentTypeRegistry, extension_of, split_extension};
pub use headers::accepted_values;
pub use image::{IMAGE_FORMATS, ImageAlternative, ImageAlternativeProvider, is_image_media_type};
pub use registry::ProviderRegistry;
pub use traits::{FileAlternative, NegotiationProvider};
pub use types::{NegotiationContext, StaticFileResponseContext};
