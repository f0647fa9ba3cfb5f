use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes files on the local filesystem, relative to `base_path`.
///
/// An empty base resolves paths against the working directory; absolute paths
/// ignore the base.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tracing::debug!("Ensuring output directory {}", parent.display());
            fs::create_dir_all(parent)?;
        }

        let mut file = fs::File::create(&full_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        Ok(())
    }
}
