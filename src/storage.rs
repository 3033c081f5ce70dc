// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::document::{
    self, CORRUPT_BACKUP_KEY, DOCUMENT_KEY, Document, LEGACY_TRANSACTIONS_KEY, SCHEMA_VERSION,
};
use crate::error::PersistError;

/// A synchronous string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// Loads and saves the whole [`Document`].
pub trait Persistence {
    /// `Ok(None)` when nothing usable is stored.
    fn load(&mut self) -> Result<Option<Document>, PersistError>;
    fn save(&mut self, doc: &Document) -> Result<(), PersistError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryKv {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores the document as JSON under [`DOCUMENT_KEY`], migrating older
/// shapes on load.
#[derive(Debug)]
pub struct KvPersistence<K> {
    kv: K,
}

impl<K: KeyValueStore> KvPersistence<K> {
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &K {
        &self.kv
    }

    pub fn into_inner(self) -> K {
        self.kv
    }

    fn read(&mut self, key: &str) -> Result<Option<Document>, PersistError> {
        let Some(raw) = self.kv.get(key)? else {
            return Ok(None);
        };
        match document::decode(&raw) {
            Ok((doc, from)) => {
                if from < SCHEMA_VERSION {
                    info!(key, from, to = SCHEMA_VERSION, "Migrated stored document");
                } else {
                    debug!(key, bytes = raw.len(), "Read stored document");
                }
                Ok(Some(doc))
            }
            Err(PersistError::Json(err)) => {
                warn!(key, error = %err, "Stored document is malformed; starting from defaults");
                if key == DOCUMENT_KEY {
                    self.kv.set(CORRUPT_BACKUP_KEY, &raw)?;
                }
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

impl<K: KeyValueStore> Persistence for KvPersistence<K> {
    fn load(&mut self) -> Result<Option<Document>, PersistError> {
        if self.kv.get(DOCUMENT_KEY)?.is_some() {
            return self.read(DOCUMENT_KEY);
        }
        self.read(LEGACY_TRANSACTIONS_KEY)
    }

    fn save(&mut self, doc: &Document) -> Result<(), PersistError> {
        let raw = document::encode(doc)?;
        self.kv.set(DOCUMENT_KEY, &raw)?;
        debug!(
            transactions = doc.transactions.len(),
            categories = doc.categories.len(),
            "Saved document"
        );
        Ok(())
    }
}
