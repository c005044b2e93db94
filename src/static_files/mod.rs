//! Tower middleware that negotiates alternative files in front of a static
//! file service such as [`tower_http::services::ServeDir`].
//!
//! ```rust,ignore
//! use negotiated_static::static_files::{NegotiationLayer, StaticFileOptions};
//! use negotiated_static::negotiation::ProviderRegistry;
//! use tower::Layer;
//! use tower_http::services::ServeDir;
//!
//! let layer = NegotiationLayer::new(
//!     "wwwroot",
//!     StaticFileOptions::default(),
//!     ProviderRegistry::with_defaults(&Default::default()),
//! )?;
//! let service = layer.layer(ServeDir::new("wwwroot"));
//! ```

mod error;
mod layer;
mod negotiator;
mod options;
mod router;
mod service;

pub use error::NegotiationError;
pub use layer::NegotiationLayer;
pub use options::{PrepareResponseHook, StaticFileOptions};
pub use router::router;
pub use service::NegotiationService;
