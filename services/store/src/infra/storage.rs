use std::path::PathBuf;

use anyhow::Context as _;

use crate::domain::repository::FileStore;
use crate::error::StoreError;

/// Writes uploads into a local directory served at `/uploads`.
#[derive(Clone)]
pub struct LocalFileStore {
    pub root: PathBuf,
}

impl FileStore for LocalFileStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;
        Ok(())
    }
}
