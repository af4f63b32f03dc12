//! The document store: one serialized document in one slot.
//!
//! Every operation is read full document, change it, write full document,
//! then notify. An operation lock keeps store operations in this process from
//! interleaving; observers run after it is released, so they may call back
//! into the store.

use crate::builder::CollectionRef;
use crate::clock::{Clock, SystemClock};
use crate::notify::{ChangeNotifier, ChangeScope, Subscription};
use crate::{Collection, Document, StoreError, StoreResult};
use hrm_config_and_utils::{
    Config, CorruptDocumentPolicy, DuplicateEmailPolicy, DuplicateKeyPolicy,
};
use parking_lot::{Mutex, MutexGuard};
use slot_storage::{FileSlotStorage, MemorySlotStorage, SlotStorage, StorageKeys};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Behaviour switches, usually taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    pub duplicate_email_policy: DuplicateEmailPolicy,
    pub duplicate_key_policy: DuplicateKeyPolicy,
    pub corrupt_document_policy: CorruptDocumentPolicy,
    pub allow_passwordless_profiles: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            duplicate_email_policy: DuplicateEmailPolicy::default(),
            duplicate_key_policy: DuplicateKeyPolicy::default(),
            corrupt_document_policy: CorruptDocumentPolicy::default(),
            allow_passwordless_profiles: true,
        }
    }
}

impl StoreOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            duplicate_email_policy: config.duplicate_email_policy,
            duplicate_key_policy: config.duplicate_key_policy,
            corrupt_document_policy: config.corrupt_document_policy,
            allow_passwordless_profiles: config.allow_passwordless_profiles,
        }
    }
}

struct Inner {
    storage: Arc<dyn SlotStorage>,
    clock: Arc<dyn Clock>,
    options: StoreOptions,
    op_lock: Mutex<()>,
    notifier: ChangeNotifier,
}

/// Handle to the embedded document store. Cheap to clone.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<Inner>,
}

impl DocumentStore {
    pub fn new(storage: Arc<dyn SlotStorage>, options: StoreOptions) -> Self {
        Self::with_clock(storage, options, Arc::new(SystemClock))
    }

    pub fn with_clock(
        storage: Arc<dyn SlotStorage>,
        options: StoreOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                storage,
                clock,
                options,
                op_lock: Mutex::new(()),
                notifier: ChangeNotifier::new(),
            }),
        }
    }

    /// Store backed by one file per slot inside `dir`.
    pub fn open(dir: &Path, options: StoreOptions) -> StoreResult<Self> {
        let storage = FileSlotStorage::new(dir)?;
        debug!(dir = %dir.display(), "Opened file-backed document store");
        Ok(Self::new(Arc::new(storage), options))
    }

    /// Scratch store that lives only as long as the handle.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySlotStorage::new()), StoreOptions::default())
    }

    pub fn options(&self) -> &StoreOptions {
        &self.inner.options
    }

    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    pub(crate) fn storage(&self) -> &dyn SlotStorage {
        self.inner.storage.as_ref()
    }

    /// Query surface for one collection.
    pub fn from(&self, collection: Collection) -> CollectionRef<'_> {
        CollectionRef::new(self, collection)
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(ChangeScope) + Send + Sync + 'static,
    {
        self.inner.notifier.subscribe(listener)
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.inner.notifier
    }

    /// Current document, materializing an empty one on first access.
    pub fn load(&self) -> StoreResult<Document> {
        let _guard = self.lock();
        self.load_unlocked()
    }

    /// Replace the persisted document and notify observers.
    pub fn save(&self, document: &Document) -> StoreResult<()> {
        {
            let _guard = self.lock();
            let mut document = document.clone();
            document.ensure_known_collections();
            self.save_unlocked(&document)?;
        }
        self.notify(ChangeScope::Any);
        Ok(())
    }

    /// Run `f` against a snapshot under the operation lock.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> StoreResult<T> {
        let _guard = self.lock();
        let document = self.load_unlocked()?;
        Ok(f(&document))
    }

    /// Load, apply `f`, persist, release the lock, notify.
    ///
    /// Nothing is written and nobody is notified when `f` fails.
    pub(crate) fn mutate<T>(
        &self,
        scope: ChangeScope,
        f: impl FnOnce(&mut Document) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let result = {
            let _guard = self.lock();
            let mut document = self.load_unlocked()?;
            let result = f(&mut document)?;
            self.save_unlocked(&document)?;
            result
        };
        self.notify(scope);
        Ok(result)
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, ()> {
        self.inner.op_lock.lock()
    }

    pub(crate) fn notify(&self, scope: ChangeScope) {
        self.inner.notifier.notify(scope);
    }

    /// Caller must hold the operation lock.
    pub(crate) fn load_unlocked(&self) -> StoreResult<Document> {
        let Some(text) = self.storage().get(StorageKeys::DATABASE)? else {
            let document = Document::empty();
            self.save_unlocked(&document)?;
            debug!("Initialized empty document");
            return Ok(document);
        };

        match Document::parse(&text) {
            Ok(document) => Ok(document),
            Err(err) => match self.inner.options.corrupt_document_policy {
                CorruptDocumentPolicy::Reinitialize => {
                    warn!(
                        discarded_len = text.len(),
                        error = %err,
                        "Stored document is unreadable, reinitializing"
                    );
                    let document = Document::empty();
                    self.save_unlocked(&document)?;
                    Ok(document)
                }
                CorruptDocumentPolicy::Fail => Err(StoreError::StorageUnavailable(format!(
                    "stored document is unreadable: {}",
                    err
                ))),
            },
        }
    }

    /// Caller must hold the operation lock.
    pub(crate) fn save_unlocked(&self, document: &Document) -> StoreResult<()> {
        let text = document.to_json()?;
        self.storage().set(StorageKeys::DATABASE, &text)?;
        debug!(bytes = text.len(), records = document.record_count(), "Saved document");
        Ok(())
    }
}

impl std::fmt::Debug for DocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentStore")
            .field("options", &self.inner.options)
            .field("notifier", &self.inner.notifier)
            .finish_non_exhaustive()
    }
}
