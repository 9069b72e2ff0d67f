//! Storage layer
//!
//! Persists the root document as a single versioned JSON file and
//! restores it on startup. The envelope version gates migration: a
//! legacy envelope discards the stored payload and reseeds defaults.

pub mod error;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use persistence::{JsonPersistence, ENVELOPE_VERSION};
