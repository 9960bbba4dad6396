//! Module sources
//!
//! Where module documents come from when the engine loads them by id.

use crate::error::{Result, SdkError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Read-only store of module documents
#[async_trait]
pub trait ModuleSource: Send + Sync {
    /// Raw XML of the module with this id
    async fn fetch(&self, id: &str) -> Result<String>;

    /// Ids of all modules in the source, sorted
    async fn list(&self) -> Result<Vec<String>>;
}

/// Modules stored as `<dir>/<id>.xml`
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    root: PathBuf,
}

impl FileSystemSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        // ids name files directly under the root
        if id.is_empty() || id.contains(['/', '\\']) || id.starts_with('.') {
            return Err(SdkError::ModuleNotFound(id.to_string()));
        }
        Ok(self.root.join(format!("{}.xml", id)))
    }
}

#[async_trait]
impl ModuleSource for FileSystemSource {
    async fn fetch(&self, id: &str) -> Result<String> {
        let path = self.path_for(id)?;
        tracing::debug!("Reading module '{}' from {}", id, path.display());

        match fs::read_to_string(&path).await {
            Ok(xml) => Ok(xml),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SdkError::ModuleNotFound(id.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }

        ids.sort();
        Ok(ids)
    }
}

/// Modules held in memory, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    modules: HashMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module(mut self, id: impl Into<String>, xml: impl Into<String>) -> Self {
        self.modules.insert(id.into(), xml.into());
        self
    }
}

#[async_trait]
impl ModuleSource for MemorySource {
    async fn fetch(&self, id: &str) -> Result<String> {
        self.modules
            .get(id)
            .cloned()
            .ok_or_else(|| SdkError::ModuleNotFound(id.to_string()))
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.modules.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}
