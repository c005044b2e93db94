use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Mappings every registry starts with, ahead of the `mime_guess` database
const DEFAULT_MAPPINGS: &[(&str, &str)] = &[(".js", "application/javascript")];

/// Extension of a file name, including the leading dot
pub fn extension_of(name: &str) -> Option<&str> {
    let name = name.rsplit('/').next().unwrap_or(name);
    name.rfind('.').map(|dot| &name[dot..])
}

/// Splits a percent-encoded request path into its raw stem and the decoded
/// extension of its final segment (`/photo%2Epng` gives `("/photo", ".png")`).
pub fn split_extension(path: &str) -> Option<(&str, String)> {
    let segment_start = path.rfind('/').map_or(0, |slash| slash + 1);
    let segment = &path[segment_start..];

    // An encoded dot always decodes, so the last dot or `%2E` is the separator
    let dot = [".", "%2E", "%2e"]
        .into_iter()
        .filter_map(|separator| segment.rfind(separator))
        .max()?;

    let extension = percent_decode_str(&segment[dot..]).decode_utf8_lossy();
    if extension.contains('/') {
        return None;
    }

    Some((&path[..segment_start + dot], extension.into_owned()))
}

fn normalize_extension(extension: &str) -> String {
    format!(".{}", extension.trim_start_matches('.').to_ascii_lowercase())
}

/// Maps file extensions to media types.
///
/// Explicit mappings win over the built-in `mime_guess` database. The registry
/// is populated at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ContentTypeRegistry {
    mappings: HashMap<String, String>,
}

impl Default for ContentTypeRegistry {
    fn default() -> Self {
        let mappings = DEFAULT_MAPPINGS
            .iter()
            .map(|&(extension, media_type)| (extension.to_string(), media_type.to_string()))
            .collect();
        Self { mappings }
    }
}

impl ContentTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded with user mappings (`.ext` or `ext` keys)
    pub fn with_mappings<I, K, V>(mappings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut registry = Self::new();
        for (extension, media_type) in mappings {
            registry.insert(extension.as_ref(), media_type);
        }
        registry
    }

    /// Set a mapping, replacing any existing one
    pub fn insert(&mut self, extension: &str, media_type: impl Into<String>) {
        self.mappings
            .insert(normalize_extension(extension), media_type.into());
    }

    /// Add a mapping unless the extension is already known. Returns whether it was added.
    pub fn insert_if_absent(&mut self, extension: &str, media_type: impl Into<String>) -> bool {
        if self.contains(extension) {
            return false;
        }
        self.insert(extension, media_type);
        true
    }

    /// Whether the extension resolves to a media type, explicitly or through the database
    pub fn contains(&self, extension: &str) -> bool {
        let extension = normalize_extension(extension);
        self.mappings.contains_key(&extension)
            || mime_guess::from_ext(&extension[1..]).first().is_some()
    }

    /// Explicitly registered media type for the request path's extension
    pub fn explicit_content_type(&self, path: &str) -> Option<&str> {
        let (_, extension) = split_extension(path)?;
        self.mappings
            .get(&normalize_extension(&extension))
            .map(String::as_str)
    }

    /// Media type for the request path's extension
    pub fn content_type(&self, path: &str) -> Option<String> {
        if let Some(media_type) = self.explicit_content_type(path) {
            return Some(media_type.to_string());
        }

        let (_, extension) = split_extension(path)?;
        mime_guess::from_ext(extension.trim_start_matches('.'))
            .first()
            .map(|mime| mime.essence_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("/css/site.css"), Some(".css"));
        assert_eq!(extension_of("/app.js.br"), Some(".br"));
        assert_eq!(extension_of("photo.png"), Some(".png"));
        assert_eq!(extension_of("/v1.2/readme"), None);
        assert_eq!(extension_of("/noext"), None);
    }

    #[test]
    fn test_split_extension() {
        let cases = [
            ("/img/photo.png", Some(("/img/photo", ".png"))),
            ("/photo%2Epng", Some(("/photo", ".png"))),
            ("/photo%2ewebp", Some(("/photo", ".webp"))),
            ("/a.b%2Epng", Some(("/a.b", ".png"))),
            ("/my%20photo.png", Some(("/my%20photo", ".png"))),
            ("/v1.2/photo", None),
            ("/v1.2%2Fphoto", None),
            ("/noext", None),
        ];

        for (path, expected) in cases {
            let split = split_extension(path);
            let actual = split
                .as_ref()
                .map(|(stem, extension)| (*stem, extension.as_str()));
            assert_eq!(actual, expected, "{path}");
        }
    }

    #[test]
    fn test_javascript_default_mapping() {
        let registry = ContentTypeRegistry::new();
        assert_eq!(
            registry.explicit_content_type("/app.js"),
            Some("application/javascript")
        );
        assert_eq!(
            registry.content_type("/app%2Ejs").as_deref(),
            Some("application/javascript")
        );

        let registry = ContentTypeRegistry::with_mappings([("js", "text/javascript")]);
        assert_eq!(
            registry.content_type("/app.js").as_deref(),
            Some("text/javascript")
        );
    }

    #[test]
    fn test_explicit_mapping_wins() {
        let registry = ContentTypeRegistry::with_mappings([("css", "text/x-custom")]);

        assert_eq!(
            registry.content_type("/site.CSS").as_deref(),
            Some("text/x-custom")
        );
        assert_eq!(
            registry.explicit_content_type("/site.css"),
            Some("text/x-custom")
        );
        assert_eq!(registry.explicit_content_type("/page.html"), None);
        assert_eq!(
            registry.content_type("/page.html").as_deref(),
            Some("text/html")
        );
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut registry = ContentTypeRegistry::with_mappings([(".webp", "image/x-webp")]);

        assert!(!registry.insert_if_absent(".webp", "image/webp"));
        assert!(!registry.insert_if_absent(".png", "image/x-png"));
        assert!(registry.insert_if_absent(".totally-unknown", "application/x-unknown"));

        assert_eq!(
            registry.content_type("a.webp").as_deref(),
            Some("image/x-webp")
        );
        assert_eq!(registry.content_type("a.png").as_deref(), Some("image/png"));
        assert_eq!(
            registry.content_type("a.totally-unknown").as_deref(),
            Some("application/x-unknown")
        );
    }

    #[test]
    fn test_unknown_extension() {
        let registry = ContentTypeRegistry::new();
        assert!(!registry.contains(".totally-unknown"));
        assert_eq!(registry.content_type("file.totally-unknown"), None);
        assert_eq!(registry.content_type("Makefile"), None);
    }
}
