//! Remote Data Gateway: documents, file uploads and callable functions on the
//! hosted Firebase project, with an in-memory stand-in and a read cache.

pub mod cache;
pub mod config;
pub mod error;
pub mod firestore;
pub mod memory;
pub mod query;
pub mod repositories;
pub mod store;

pub use cache::CachedStore;
pub use config::FirebaseConfig;
pub use error::GatewayError;
pub use firestore::FirestoreClient;
pub use memory::MemoryStore;
pub use query::{CollectionQuery, Direction, Document, Fields};
pub use store::{CloudFunctions, DocumentStore, FileStorage};
