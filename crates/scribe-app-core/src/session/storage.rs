use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;

use crate::error::StoreError;

/// Persistence medium for the session snapshot: one JSON document, read
/// whole and written whole.
pub trait SessionStorage: Send + Sync + 'static {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
    fn save(&self, document: String) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Stores the snapshot in a file. Writes go to a sibling temp file that is
/// then renamed over the target, so a crash mid-write leaves the previous
/// snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStorage for JsonFileStorage {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: String) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, document).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-process storage for controller tests. `failing()` builds one whose
/// every call errors.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryStorage {
    document: Mutex<Option<String>>,
    fail: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: impl Into<String>) -> Self {
        Self { document: Mutex::new(Some(document.into())), fail: false }
    }

    pub fn failing() -> Self {
        Self { document: Mutex::new(None), fail: true }
    }

    /// Last saved document.
    pub fn document(&self) -> Option<String> {
        self.document.lock().ok().and_then(|d| d.clone())
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.fail {
            return Err(StoreError::Unavailable("memory storage disabled".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
impl SessionStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<String>, StoreError> {
        self.check()?;
        let guard = self
            .document
            .lock()
            .map_err(|_| StoreError::Unavailable("memory storage poisoned".into()))?;
        Ok(guard.clone())
    }

    async fn save(&self, document: String) -> Result<(), StoreError> {
        self.check()?;
        let mut guard = self
            .document
            .lock()
            .map_err(|_| StoreError::Unavailable("memory storage poisoned".into()))?;
        *guard = Some(document);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("sessions.json"));
        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("nested/sessions.json"));
        storage.save(r#"{"sessions":[]}"#.into()).await.unwrap();
        assert_eq!(storage.load().await.unwrap().as_deref(), Some(r#"{"sessions":[]}"#));
        assert!(!dir.path().join("nested/sessions.json.tmp").exists());
    }

    #[tokio::test]
    async fn failing_memory_storage_errors() {
        let storage = MemoryStorage::failing();
        assert!(storage.load().await.is_err());
        assert!(storage.save("{}".into()).await.is_err());
        assert!(storage.document().is_none());
    }
}
