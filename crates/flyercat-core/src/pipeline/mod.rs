//! Catalog pipeline components.
//!
//! - **discovery**: List the entries of the image folder
//! - **validate**: Cheap pre-decode checks
//! - **inspect**: Dimensions, format label, and orientation of one file
//! - **entry**: Build a catalog entry from an inspection
//! - **scheduler**: Chunked fan-out over concurrent workers
//! - **aggregate**: Fan-in of worker results and the run summary

pub mod aggregate;
pub mod discovery;
pub mod entry;
pub mod inspect;
pub mod scheduler;
pub mod validate;

// Re-exports for convenient access
pub use aggregate::{Aggregate, Aggregator, SkippedFile};
pub use discovery::{FileDiscovery, ListedEntry};
pub use entry::EntryBuilder;
pub use inspect::{format_label, ImageInspector, Inspection};
pub use scheduler::{BatchEvent, BatchScheduler, Dispatch};
pub use validate::Validator;
