use crate::core::store::check_segment;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Untyped key/value record; schemas live in the code that reads them.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct DocSnapshot {
    pub id: String,
    pub data: Document,
}

pub type ChangeListener = Box<dyn FnMut(&[DocSnapshot])>;
pub type ErrorListener = Box<dyn FnMut(&Error)>;

pub trait DocumentStore {
    fn add(&self, collection: &str, doc: Document) -> Result<String>;
    fn delete(&self, collection: &str, id: &str) -> Result<()>;
    fn list(&self, collection: &str) -> Result<Vec<DocSnapshot>>;

    /// Deliver the current contents of `collection` now and again after every
    /// change, until the returned handle is dropped.
    fn subscribe(
        &self,
        collection: &str,
        on_change: ChangeListener,
        on_error: ErrorListener,
    ) -> Subscription;
}

struct Listener {
    collection: String,
    on_change: ChangeListener,
    on_error: ErrorListener,
}

/// Live listeners keyed by subscription id.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(u64, Rc<RefCell<Listener>>)>>,
}

impl ListenerRegistry {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn register(
        self: &Rc<Self>,
        collection: &str,
        on_change: ChangeListener,
        on_error: ErrorListener,
    ) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        let listener = Listener {
            collection: collection.to_string(),
            on_change,
            on_error,
        };
        self.listeners
            .borrow_mut()
            .push((id, Rc::new(RefCell::new(listener))));
        Subscription {
            registry: Rc::downgrade(self),
            id,
        }
    }

    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn for_collection(&self, collection: &str, only: Option<u64>) -> Vec<Rc<RefCell<Listener>>> {
        self.listeners
            .borrow()
            .iter()
            .filter(|(id, l)| {
                only.is_none_or(|o| o == *id)
                    && l.try_borrow().map(|l| l.collection == collection).unwrap_or(true)
            })
            .map(|(_, l)| l.clone())
            .collect()
    }

    /// Push a full snapshot to every listener of `collection`. Listeners
    /// already running (a write from inside a callback) are skipped.
    pub fn notify(&self, collection: &str, only: Option<u64>, snapshot: &Result<Vec<DocSnapshot>>) {
        for listener in self.for_collection(collection, only) {
            let Ok(mut listener) = listener.try_borrow_mut() else {
                continue;
            };
            if listener.collection != collection {
                continue;
            }
            match snapshot {
                Ok(docs) => (listener.on_change)(docs),
                Err(err) => (listener.on_error)(err),
            }
        }
    }
}

/// Handle for a live subscription; dropping it unregisters the listener.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    registry: Weak<ListenerRegistry>,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .map(|r| r.listeners.borrow().iter().any(|(id, _)| *id == self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CollectionFile {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    documents: BTreeMap<String, Document>,
}

/// One pretty-printed JSON file per collection under `dir`.
pub struct JsonDocumentStore {
    dir: PathBuf,
    cache: RefCell<HashMap<String, CollectionFile>>,
    registry: Rc<ListenerRegistry>,
}

impl JsonDocumentStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            cache: RefCell::new(HashMap::new()),
            registry: ListenerRegistry::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn listener_count(&self) -> usize {
        self.registry.len()
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn load(&self, collection: &str) -> Result<()> {
        check_segment("collection", collection)?;
        if self.cache.borrow().contains_key(collection) {
            return Ok(());
        }
        let path = self.path_for(collection);
        let file = if path.exists() {
            let text = fs::read_to_string(&path)
                .map_err(|e| Error::store(format!("Failed to read {}: {}", path.display(), e)))?;
            serde_json::from_str(&text)
                .map_err(|e| Error::store(format!("Invalid JSON in {}: {}", path.display(), e)))?
        } else {
            CollectionFile::default()
        };
        self.cache.borrow_mut().insert(collection.to_string(), file);
        Ok(())
    }

    fn persist(&self, collection: &str) -> Result<()> {
        let cache = self.cache.borrow();
        let Some(file) = cache.get(collection) else {
            return Ok(());
        };
        fs::create_dir_all(&self.dir)
            .map_err(|e| Error::store(format!("Failed to create {}: {}", self.dir.display(), e)))?;
        let path = self.path_for(collection);
        let json = serde_json::to_string_pretty(file)?;
        fs::write(&path, json)
            .map_err(|e| Error::store(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn snapshot(&self, collection: &str) -> Result<Vec<DocSnapshot>> {
        self.load(collection)?;
        let cache = self.cache.borrow();
        Ok(cache
            .get(collection)
            .map(|file| {
                file.documents
                    .iter()
                    .map(|(id, data)| DocSnapshot {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn broadcast(&self, collection: &str) {
        let snapshot = self.snapshot(collection);
        self.registry.notify(collection, None, &snapshot);
    }
}

impl DocumentStore for JsonDocumentStore {
    fn add(&self, collection: &str, doc: Document) -> Result<String> {
        self.load(collection)?;
        let id = {
            let mut cache = self.cache.borrow_mut();
            let file = cache.entry(collection.to_string()).or_default();
            file.next_id += 1;
            let id = format!("{:06}", file.next_id);
            file.documents.insert(id.clone(), doc);
            id
        };
        if let Err(err) = self.persist(collection) {
            // Keep memory in line with disk when the write fails.
            if let Some(file) = self.cache.borrow_mut().get_mut(collection) {
                file.documents.remove(&id);
            }
            return Err(err);
        }
        self.broadcast(collection);
        Ok(id)
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.load(collection)?;
        let removed = self
            .cache
            .borrow_mut()
            .get_mut(collection)
            .and_then(|file| file.documents.remove(id));
        let Some(removed) = removed else {
            return Err(Error::store(format!(
                "Document '{id}' not found in '{collection}'."
            )));
        };
        if let Err(err) = self.persist(collection) {
            if let Some(file) = self.cache.borrow_mut().get_mut(collection) {
                file.documents.insert(id.to_string(), removed);
            }
            return Err(err);
        }
        self.broadcast(collection);
        Ok(())
    }

    fn list(&self, collection: &str) -> Result<Vec<DocSnapshot>> {
        self.snapshot(collection)
    }

    fn subscribe(
        &self,
        collection: &str,
        on_change: ChangeListener,
        on_error: ErrorListener,
    ) -> Subscription {
        let subscription = self.registry.register(collection, on_change, on_error);
        let snapshot = self.snapshot(collection);
        self.registry
            .notify(collection, Some(subscription.id), &snapshot);
        subscription
    }
}
