//! File metadata lookups used to resolve requested files and probe for alternatives

use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::path::PathBuf;

/// Metadata of a file as seen by the static file layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// Final path segment
    pub name: String,
    /// Length in bytes, zero for directories and missing files
    pub length: u64,
    /// Location on disk, when the file system has one
    pub physical_path: Option<PathBuf>,
    pub exists: bool,
    pub is_directory: bool,
}

impl FileInfo {
    pub fn file(name: impl Into<String>, length: u64, physical_path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            length,
            physical_path,
            exists: true,
            is_directory: false,
        }
    }

    pub fn directory(name: impl Into<String>, physical_path: Option<PathBuf>) -> Self {
        Self {
            name: name.into(),
            length: 0,
            physical_path,
            exists: true,
            is_directory: true,
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            length: 0,
            physical_path: None,
            exists: false,
            is_directory: false,
        }
    }

    /// Exists and is a regular file
    pub fn is_file(&self) -> bool {
        self.exists && !self.is_directory
    }
}

/// Resolves request paths (`/css/site.css`, percent-encoded) to file metadata.
///
/// Lookups never fail: anything that cannot be resolved is reported as
/// [`FileInfo::not_found`].
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn file_info(&self, path: &str) -> FileInfo;
}

/// Decoded, traversal-free segments of a request path
fn path_segments(path: &str) -> Option<Vec<String>> {
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    let mut segments = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            s if s.contains('\\') || s.contains('\0') => return None,
            s => segments.push(s.to_string()),
        }
    }

    Some(segments)
}

fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// File system rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct PhysicalFileSystem {
    root: PathBuf,
}

impl PhysicalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileSystem for PhysicalFileSystem {
    async fn file_info(&self, path: &str) -> FileInfo {
        let Some(segments) = path_segments(path) else {
            tracing::debug!(path, "Rejected request path");
            return FileInfo::not_found(last_segment(path));
        };

        let name = segments.last().cloned().unwrap_or_default();
        let full_path = segments
            .iter()
            .fold(self.root.clone(), |acc, segment| acc.join(segment));

        match tokio::fs::metadata(&full_path).await {
            Ok(metadata) if metadata.is_dir() => FileInfo::directory(name, Some(full_path)),
            Ok(metadata) => FileInfo::file(name, metadata.len(), Some(full_path)),
            Err(_) => FileInfo::not_found(name),
        }
    }
}

/// File system backed by a map of paths to lengths, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryFileSystem {
    files: HashMap<String, u64>,
    directories: Vec<String>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalize(path: &str) -> Option<String> {
        path_segments(path).map(|segments| format!("/{}", segments.join("/")))
    }

    pub fn with_file(mut self, path: &str, length: u64) -> Self {
        if let Some(key) = Self::normalize(path) {
            self.files.insert(key, length);
        }
        self
    }

    pub fn with_directory(mut self, path: &str) -> Self {
        if let Some(key) = Self::normalize(path) {
            self.directories.push(key);
        }
        self
    }
}

#[async_trait]
impl FileSystem for InMemoryFileSystem {
    async fn file_info(&self, path: &str) -> FileInfo {
        let Some(key) = Self::normalize(path) else {
            return FileInfo::not_found(last_segment(path));
        };
        let name = last_segment(&key).to_string();

        if let Some(&length) = self.files.get(&key) {
            return FileInfo::file(name, length, None);
        }

        let is_directory = key == "/"
            || self.directories.contains(&key)
            || self
                .files
                .keys()
                .any(|file| file.starts_with(&format!("{key}/")));
        if is_directory {
            return FileInfo::directory(name, None);
        }

        FileInfo::not_found(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_physical_file_lookup() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("css")).unwrap();
        fs::write(temp_dir.path().join("css/site.css"), "body{}").unwrap();

        let file_system = PhysicalFileSystem::new(temp_dir.path());

        let file = file_system.file_info("/css/site.css").await;
        assert!(file.is_file());
        assert_eq!(file.name, "site.css");
        assert_eq!(file.length, 6);
        assert_eq!(
            file.physical_path,
            Some(temp_dir.path().join("css").join("site.css"))
        );

        let dir = file_system.file_info("/css").await;
        assert!(dir.exists);
        assert!(dir.is_directory);

        let missing = file_system.file_info("/css/missing.css").await;
        assert!(!missing.exists);
        assert_eq!(missing.name, "missing.css");
    }

    #[tokio::test]
    async fn test_physical_percent_decoding() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("my photo.png"), [0u8; 10]).unwrap();

        let file_system = PhysicalFileSystem::new(temp_dir.path());

        let file = file_system.file_info("/my%20photo.png").await;
        assert!(file.is_file());
        assert_eq!(file.name, "my photo.png");
    }

    #[tokio::test]
    async fn test_physical_rejects_traversal() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("www");
        fs::create_dir(&root).unwrap();
        fs::write(temp_dir.path().join("secret.txt"), "secret").unwrap();

        let file_system = PhysicalFileSystem::new(&root);

        assert!(!file_system.file_info("/../secret.txt").await.exists);
        assert!(!file_system.file_info("/%2e%2e/secret.txt").await.exists);
    }

    #[tokio::test]
    async fn test_in_memory_lookup() {
        let file_system = InMemoryFileSystem::new()
            .with_file("/app.js", 1000)
            .with_file("/img/photo.png", 500)
            .with_directory("/empty");

        let file = file_system.file_info("/app.js").await;
        assert!(file.is_file());
        assert_eq!(file.length, 1000);

        assert!(file_system.file_info("/img").await.is_directory);
        assert!(file_system.file_info("/empty").await.is_directory);
        assert!(file_system.file_info("/").await.is_directory);
        assert!(!file_system.file_info("/app.css").await.exists);
    }
}
