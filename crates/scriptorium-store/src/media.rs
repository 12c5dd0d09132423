use std::io;
use std::path::{Path, PathBuf};

use scriptorium_core::slugify;
use uuid::Uuid;

/// Directory under the media root where uploaded images land.
const IMAGE_DIR: &str = "uploads/images";

/// File store rooted at a single directory.
///
/// Rows reference files by a path relative to the root, so the root can
/// move (or differ between environments) without rewriting the database.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored relative path.
    pub fn absolute(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Store `bytes` under a collision-proof name derived from
    /// `original_name`, returning the relative path to record.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<String> {
        let relative = format!("{IMAGE_DIR}/{}", unique_file_name(original_name));
        let path = self.absolute(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(relative)
    }

    /// Unlink a stored file. An already-missing file is not an error.
    pub async fn remove(&self, relative: &str) -> io::Result<()> {
        match tokio::fs::remove_file(self.absolute(relative)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(file = relative, "media file already gone");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}

/// Build a stored file name from the uploaded one: slugified stem, original
/// extension, uuid prefix so identical uploads never clash.
fn unique_file_name(original_name: &str) -> String {
    let path = Path::new(original_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(slugify)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string());
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|e| e.to_ascii_lowercase());

    let id = Uuid::new_v4().simple();
    match ext {
        Some(ext) if !ext.is_empty() => format!("{id}-{stem}.{ext}"),
        _ => format!("{id}-{stem}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_keep_extension_and_slugify_stem() {
        let name = unique_file_name("My Photo (1).JPG");
        assert!(name.ends_with("-my-photo-1.jpg"), "{name}");
    }

    #[test]
    fn file_names_survive_weird_input() {
        let name = unique_file_name("???");
        assert!(name.ends_with("-image"), "{name}");
    }

    #[test]
    fn identical_uploads_get_distinct_names() {
        assert_ne!(unique_file_name("a.png"), unique_file_name("a.png"));
    }
}
