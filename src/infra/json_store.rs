use std::path::{Path, PathBuf};

use crate::domain::model::catalog::Catalog;
use crate::domain::repository::{CatalogRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum JsonStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt library file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepositoryError for JsonStoreError {
    fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

/// JSONファイルによるCatalogRepository実装。
/// 1 Library = 1 JSONファイル（Bookオブジェクトの配列）。
pub struct JsonCatalogRepository {
    path: PathBuf,
}

impl JsonCatalogRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogRepository for JsonCatalogRepository {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Catalog, Self::Error> {
        // 存在しない場合のみ空。権限エラー等はI/Oエラーとして返す。
        let content = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "library file absent, starting empty");
                return Ok(Catalog::new());
            }
            Err(e) => return Err(e.into()),
        };
        // UTF-8として不正なバイト列も破損扱い
        let catalog: Catalog =
            serde_json::from_slice(&content).map_err(|source| JsonStoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "library loaded");
        Ok(catalog)
    }

    fn save(&self, catalog: &Catalog) -> Result<(), Self::Error> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, &content)?;
        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), books = catalog.len(), "library saved");
        Ok(())
    }
}
