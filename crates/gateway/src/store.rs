//! Capability traits of the Remote Data Gateway.
//!
//! Services hold these as trait objects, so the hosted backend, the
//! in-memory store and the read cache are interchangeable.

use std::sync::Arc;

use async_trait::async_trait;
use mhc_core::types::DocId;
use serde_json::Value;

use crate::error::GatewayError;
use crate::query::{CollectionQuery, Document, Fields};

/// Field stamped on every new document.
pub const CREATED_AT: &str = "createdAt";

/// Field stamped on every write.
pub const UPDATED_AT: &str = "updatedAt";

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create a document with a generated id. Stamps `createdAt` and
    /// `updatedAt`.
    async fn add_document(&self, collection: &str, data: Fields) -> Result<DocId, GatewayError>;

    /// Create or fully replace the document with the given id.
    async fn set_document(&self, collection: &str, id: &str, data: Fields)
        -> Result<(), GatewayError>;

    /// Merge `data` into an existing document and stamp `updatedAt`.
    /// Fails with [`GatewayError::NotFound`] when the document is missing.
    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError>;

    async fn get_document(&self, collection: &str, id: &str)
        -> Result<Option<Document>, GatewayError>;

    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, GatewayError>;
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store `bytes` at `path` and return a public download URL.
    async fn upload_file(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError>;
}

#[async_trait]
pub trait CloudFunctions: Send + Sync {
    /// Invoke a callable function and return its `result`.
    async fn call(&self, name: &str, payload: Value) -> Result<Value, GatewayError>;
}

/// Current time in the format written to timestamp fields.
pub fn now_timestamp() -> Value {
    Value::String(chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true))
}

// ---------------------------------------------------------------------------
// Shared handles
// ---------------------------------------------------------------------------

#[async_trait]
impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    async fn add_document(&self, collection: &str, data: Fields) -> Result<DocId, GatewayError> {
        (**self).add_document(collection, data).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError> {
        (**self).set_document(collection, id, data).await
    }

    async fn update_document(
        &self,
        collection: &str,
        id: &str,
        data: Fields,
    ) -> Result<(), GatewayError> {
        (**self).update_document(collection, id, data).await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, GatewayError> {
        (**self).get_document(collection, id).await
    }

    async fn query(&self, query: &CollectionQuery) -> Result<Vec<Document>, GatewayError> {
        (**self).query(query).await
    }
}
