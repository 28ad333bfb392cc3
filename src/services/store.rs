//! Document store with snapshot subscriptions.
//!
//! Each collection lives in one pretty-printed JSON array file under the data
//! directory (or in memory only). Every successful write publishes a full
//! collection snapshot to all subscribers over a `tokio::sync::watch`
//! channel; readers recompute their views from the newest snapshot.

use crate::domain::{BacklogItem, BacklogPatch, Project, ProjectPatch};
use crate::error::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

/// A document type stored in its own collection
pub trait Document: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Partial update type
    type Patch;

    /// Collection name, also the file stem on disk
    const COLLECTION: &'static str;

    fn id(&self) -> &str;

    /// Apply a partial update, leaving the document untouched on error
    fn apply(&mut self, patch: Self::Patch) -> StoreResult<()>;

    /// Check invariants before a document is first written
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

impl Document for Project {
    type Patch = ProjectPatch;
    const COLLECTION: &'static str = "projects";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: ProjectPatch) -> StoreResult<()> {
        Project::apply(self, patch).map_err(StoreError::from)
    }

    fn validate(&self) -> StoreResult<()> {
        Project::validate(self).map_err(StoreError::from)
    }
}

impl Document for BacklogItem {
    type Patch = BacklogPatch;
    const COLLECTION: &'static str = "backlog";

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, patch: BacklogPatch) -> StoreResult<()> {
        BacklogItem::apply(self, patch);
        Ok(())
    }
}

/// Storage collaborator contract
pub trait DocumentStore<T: Document>: Send + Sync {
    /// Receive the full collection now and after every change
    fn subscribe(&self) -> watch::Receiver<Vec<T>>;

    /// Current contents of the collection
    fn list(&self) -> Vec<T>;

    fn get(&self, id: &str) -> StoreResult<T>;

    fn create(&self, document: T) -> StoreResult<()>;

    /// Apply a partial update and return the stored result
    fn update(&self, id: &str, patch: T::Patch) -> StoreResult<T>;

    /// Remove a document; a non-blank justification is required
    fn delete(&self, id: &str, justification: &str) -> StoreResult<T>;
}

struct Inner<T> {
    documents: Vec<T>,
    path: Option<PathBuf>,
}

/// JSON-file backed store for one collection
pub struct JsonStore<T: Document> {
    inner: Mutex<Inner<T>>,
    sender: watch::Sender<Vec<T>>,
}

impl<T: Document> JsonStore<T> {
    /// Store that never touches disk
    pub fn in_memory() -> Self {
        Self::with_documents(Vec::new(), None)
    }

    /// Open (or start) the collection file in `data_directory`
    pub fn open(data_directory: &Path) -> StoreResult<Self> {
        let path = data_directory.join(format!("{}.json", T::COLLECTION));
        let documents = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
                    path: path.clone(),
                    source,
                })?
            }
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Opened {} with {} documents from {}",
            T::COLLECTION,
            documents.len(),
            path.display()
        );
        Ok(Self::with_documents(documents, Some(path)))
    }

    fn with_documents(documents: Vec<T>, path: Option<PathBuf>) -> Self {
        let (sender, _) = watch::channel(documents.clone());
        Self {
            inner: Mutex::new(Inner { documents, path }),
            sender,
        }
    }

    /// Shareable handle
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // A panic mid-write leaves the previous documents in place, so the
        // data behind a poisoned lock is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn not_found(id: &str) -> StoreError {
        StoreError::NotFound {
            collection: T::COLLECTION,
            id: id.to_string(),
        }
    }

    /// Persist `documents` and publish them; `inner` is only replaced on success
    fn commit(&self, inner: &mut Inner<T>, documents: Vec<T>) -> StoreResult<()> {
        if let Some(path) = &inner.path {
            write_atomically(path, &serde_json::to_string_pretty(&documents)?)?;
        }
        inner.documents = documents;
        self.sender.send_replace(inner.documents.clone());
        Ok(())
    }
}

impl<T: Document> DocumentStore<T> for JsonStore<T> {
    fn subscribe(&self) -> watch::Receiver<Vec<T>> {
        self.sender.subscribe()
    }

    fn list(&self) -> Vec<T> {
        self.lock().documents.clone()
    }

    fn get(&self, id: &str) -> StoreResult<T> {
        self.lock()
            .documents
            .iter()
            .find(|d| d.id() == id)
            .cloned()
            .ok_or_else(|| Self::not_found(id))
    }

    fn create(&self, document: T) -> StoreResult<()> {
        document.validate()?;
        let mut inner = self.lock();
        if inner.documents.iter().any(|d| d.id() == document.id()) {
            return Err(StoreError::AlreadyExists {
                collection: T::COLLECTION,
                id: document.id().to_string(),
            });
        }

        tracing::info!("Creating {} document {}", T::COLLECTION, document.id());
        let mut documents = inner.documents.clone();
        documents.push(document);
        self.commit(&mut inner, documents)
    }

    fn update(&self, id: &str, patch: T::Patch) -> StoreResult<T> {
        let mut inner = self.lock();
        let position = inner
            .documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let mut documents = inner.documents.clone();
        documents[position].apply(patch)?;
        let updated = documents[position].clone();

        tracing::debug!("Updated {} document {}", T::COLLECTION, id);
        self.commit(&mut inner, documents)?;
        Ok(updated)
    }

    fn delete(&self, id: &str, justification: &str) -> StoreResult<T> {
        if justification.trim().is_empty() {
            return Err(StoreError::MissingJustification(T::COLLECTION));
        }

        let mut inner = self.lock();
        let position = inner
            .documents
            .iter()
            .position(|d| d.id() == id)
            .ok_or_else(|| Self::not_found(id))?;

        let mut documents = inner.documents.clone();
        let removed = documents.remove(position);
        tracing::info!(
            "Deleting {} document {}: {}",
            T::COLLECTION,
            id,
            justification.trim()
        );
        self.commit(&mut inner, documents)?;
        Ok(removed)
    }
}

/// Write through a sibling temp file so readers never see a partial file
fn write_atomically(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{DESIGN, PROCUREMENT, RECEPTION};
    use crate::domain::{compute_progress, ProgressPolicy, SubStages};
    use tempfile::TempDir;

    fn project(code: &str) -> Project {
        Project::new(code, format!("Proyecto {}", code), "REM", "ana@uni.cl")
    }

    #[test]
    fn test_create_and_list() {
        let store = JsonStore::<Project>::in_memory();
        store.create(project("P-1")).unwrap();
        store.create(project("P-2")).unwrap();
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let store = JsonStore::<Project>::in_memory();
        let p = project("P-1");
        store.create(p.clone()).unwrap();
        assert!(matches!(
            store.create(p),
            Err(StoreError::AlreadyExists { .. })
        ));
    }

    #[test]
    fn test_invalid_project_rejected_on_create() {
        let store = JsonStore::<Project>::in_memory();
        let mut p = project("P-1");
        p.status = "nope".to_string();
        assert!(matches!(store.create(p), Err(StoreError::Invalid(_))));
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_update_publishes_snapshot() {
        let store = JsonStore::<Project>::in_memory();
        let p = project("P-1");
        let id = p.id.clone();
        store.create(p).unwrap();

        let mut rx = store.subscribe();
        rx.mark_unchanged();
        store.update(&id, ProjectPatch::status(DESIGN)).unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot[0].status, DESIGN);
    }

    #[test]
    fn test_failed_update_leaves_document() {
        let store = JsonStore::<Project>::in_memory();
        let p = Project::new("P-1", "Estudio", "FTE", "ana@uni.cl");
        let id = p.id.clone();
        store.create(p).unwrap();

        let mut rx = store.subscribe();
        rx.mark_unchanged();
        assert!(store.update(&id, ProjectPatch::status(PROCUREMENT)).is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.get(&id).unwrap().status, RECEPTION);
    }

    #[test]
    fn test_update_unknown_id() {
        let store = JsonStore::<Project>::in_memory();
        assert!(matches!(
            store.update("missing", ProjectPatch::status(DESIGN)),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_requires_justification() {
        let store = JsonStore::<Project>::in_memory();
        let p = project("P-1");
        let id = p.id.clone();
        store.create(p).unwrap();

        assert!(matches!(
            store.delete(&id, "   "),
            Err(StoreError::MissingJustification("projects"))
        ));
        let removed = store.delete(&id, "duplicado").unwrap();
        assert_eq!(removed.code, "P-1");
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_persisted_round_trip_keeps_progress() {
        let temp = TempDir::new().unwrap();
        let p = project("P-1");
        let id = p.id.clone();

        let before = {
            let store = JsonStore::<Project>::open(temp.path()).unwrap();
            store.create(p).unwrap();
            let updated = store.update(&id, ProjectPatch::status(PROCUREMENT)).unwrap();
            updated.progress(ProgressPolicy::Stage)
        };

        let reopened = JsonStore::<Project>::open(temp.path()).unwrap();
        let fetched = reopened.get(&id).unwrap();
        let after = compute_progress(
            &fetched.status,
            &fetched.sub_stages,
            &fetched.development_type,
        );
        assert_eq!(before, 57);
        assert_eq!(before, after);
        assert!(temp.path().join("projects.json").exists());
    }

    #[test]
    fn test_legacy_status_on_disk_accepts_edits() {
        let temp = TempDir::new().unwrap();
        let mut p = project("P-1");
        p.status = "estado_antiguo".to_string();
        let id = p.id.clone();
        fs::write(
            temp.path().join("projects.json"),
            serde_json::to_string(&vec![p]).unwrap(),
        )
        .unwrap();

        let store = JsonStore::<Project>::open(temp.path()).unwrap();
        let subs: SubStages = [("architectureDesign", true)].into_iter().collect();
        let updated = store.update(&id, ProjectPatch::sub_stages(subs)).unwrap();
        assert_eq!(updated.status, "estado_antiguo");
        assert_eq!(updated.progress(ProgressPolicy::Stage), 14);
    }

    #[test]
    fn test_corrupt_file_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("backlog.json"), "{ not json").unwrap();
        assert!(matches!(
            JsonStore::<BacklogItem>::open(temp.path()),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[tokio::test]
    async fn test_subscriber_wakes_on_change() {
        let store = JsonStore::<BacklogItem>::in_memory().shared();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        let writer = Arc::clone(&store);
        tokio::spawn(async move {
            writer
                .create(BacklogItem::new("Idea", "REM", "ana@uni.cl"))
                .unwrap();
        });

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }
}
