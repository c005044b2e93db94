use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub negotiation: NegotiationConfig,
    /// Extra extension to media type mappings, keyed by extension without the dot
    /// (e.g. `webmanifest = "application/manifest+json"`)
    #[serde(default)]
    pub content_types: BTreeMap<String, String>,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Directory the static files are served from
    #[serde(default = "default_web_root")]
    pub web_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            web_root: default_web_root(),
        }
    }
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_web_root() -> PathBuf {
    PathBuf::from("wwwroot")
}

/// Content negotiation switches and weights
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NegotiationConfig {
    /// Serve `.gz`/`.br` siblings when the client accepts the encoding
    #[serde(default = "default_true")]
    pub enable_precompressed_files: bool,
    /// Serve alternative image formats when the client accepts them
    #[serde(default = "default_true")]
    pub enable_image_substitution: bool,
    /// Weight applied to the size of an image of the given media type.
    /// Media types missing here weigh 1.0.
    #[serde(default)]
    pub image_substitution_cost_ratio: HashMap<String, f64>,
}

impl Default for NegotiationConfig {
    fn default() -> Self {
        Self {
            enable_precompressed_files: true,
            enable_image_substitution: true,
            image_substitution_cost_ratio: HashMap::new(),
        }
    }
}

impl NegotiationConfig {
    pub fn with_cost_ratio(mut self, media_type: impl Into<String>, ratio: f64) -> Self {
        self.image_substitution_cost_ratio
            .insert(media_type.into().to_ascii_lowercase(), ratio);
        self
    }
}

fn default_true() -> bool {
    true
}
