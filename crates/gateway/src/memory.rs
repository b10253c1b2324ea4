//! In-process implementation of every gateway capability.
//!
//! Used when no Firebase project is configured and throughout the test
//! suites. Collections keep insertion order. Callable-function invocations and
//! uploads are recorded so tests can assert on them, and a failure switch
//! makes every operation fail with [`GatewayError::Unavailable`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use mhc_core::types::DocId;
use serde_json::Value;

use crate::error::GatewayError;
use crate::query::{CollectionQuery, Document, Fields};
use crate::store::{now_timestamp, CloudFunctions, DocumentStore, FileStorage, CREATED_AT, UPDATED_AT};

/// A recorded callable-function invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub payload: Value,
}

/// A recorded upload.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub path: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    calls: RwLock<Vec<FunctionCall>>,
    files: RwLock<Vec<StoredFile>>,
    function_results: RwLock<HashMap<String, Value>>,
    failing: AtomicBool,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Value returned by the callable function `name`. Functions without a
    /// configured result return `null`.
    pub fn set_function_result(&self, name: &str, result: Value) {
        write(&self.function_results).insert(name.to_string(), result);
    }

    /// Insert a document as-is, without timestamps. For seeding.
    pub fn seed(&self, collection: &str, id: &str, data: Fields) {
        let mut collections = write(&self.collections);
        let docs = collections.entry(collection.to_string()).or_default();
        docs.retain(|d| d.id != id);
        docs.push(Document::new(id, data));
    }

    /// Every document of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        read(&self.collections)
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    pub fn function_calls(&self) -> Vec<FunctionCall> {
        read(&self.calls).clone()
    }

    pub fn files(&self) -> Vec<StoredFile> {
        read(&self.files).clone()
    }

    fn ensure_available(&self) -> Result<(), GatewayError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(GatewayError::Unavailable("memory store switched to failing".into()))
        } else {
            Ok(())
        }
    }

    fn generate_id(&self) -> DocId {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("mem{n:06}")
    }
}

// Poisoned locks are recovered: every critical section is a single update.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn add_document(&self, collection: &str, mut data: Fields) -> Result<DocId, GatewayError> {
        self.ensure_available()?;
        let now = now_timestamp();
        data.insert(CREATED_AT.into(), now.clone());
        data.insert(UPDATED_AT.into(), now);

        let id = self.generate_id();
        write(&self.collections)
            .entry(collection.to_string())
            .or_default()
            .push(Document::new(id.clone(), data));
        Ok(id)
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        mut data: Fields,
    ) -> Result<(), GatewayError> {
        self.ensure_available()?;
        data.insert(UPDATED_AT.into(), now_timestamp());

        let mut collections = write(&self.collections);
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|d| d.id == id) {
            Some(doc) => doc.data = data,
            None => docs.push(Document::new(id, data)),
        }
        Ok(())
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError> {
        self.ensure_available()?;
        let mut collections = write(&self.collections);
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| GatewayError::NotFound {
                collection: collection.into(),
                id: id.into(),
            })?;
        doc.data.extend(data);
        doc.data.insert(UPDATED_AT.into(), now_timestamp());
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        self.ensure_available()?;
        Ok(read(&self.collections)
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, GatewayError> {
        self.ensure_available()?;
        let docs = self.documents(&query.collection);
        Ok(query.apply(docs))
    }
}

#[async_trait]
impl FileStorage for MemoryStore {
    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        self.ensure_available()?;
        write(&self.files).push(StoredFile {
            path: path.to_string(),
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(format!("memory://files/{path}"))
    }
}

#[async_trait]
impl CloudFunctions for MemoryStore {
    async fn call(&self, name: &str, payload: Value) -> Result<Value, GatewayError> {
        self.ensure_available()?;
        write(&self.calls).push(FunctionCall {
            name: name.to_string(),
            payload,
        });
        Ok(read(&self.function_results)
            .get(name)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
