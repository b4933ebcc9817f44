//! Media directory holding diagram files.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

/// A flat directory of media files.
///
/// The directory is created on first write; a missing directory lists as
/// empty.
#[derive(Debug, Clone)]
pub struct MediaDir {
    root: PathBuf,
}

impl MediaDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> io::Result<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid media name '{name}'"),
            ));
        }
        Ok(self.root.join(name))
    }

    /// File names starting with `<namespace>-`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read.
    pub async fn list(&self, namespace: &str) -> io::Result<Vec<String>> {
        let prefix = format!("{namespace}-");
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(&prefix) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// # Errors
    ///
    /// Returns an I/O error if the name is invalid or the write fails.
    pub async fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_of(name)?;
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote media");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an I/O error if the name is invalid or the file cannot be read.
    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path_of(name)?).await
    }

    /// Delete files by name. Missing files are ignored.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if a name is invalid or a removal fails.
    pub async fn delete(&self, names: &[String]) -> io::Result<()> {
        for name in names {
            match tokio::fs::remove_file(self.path_of(name)?).await {
                Ok(()) => debug!(name, "deleted media"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}
