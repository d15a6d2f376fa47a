//! Storage trait definitions and backends for resman.
//!
//! The traits define the abstract interface the engine needs from a
//! persistence layer. A thread-safe in-memory backend is provided for
//! embedded usage and tests.

mod memory;
mod traits;

pub use memory::{InMemoryAssignmentStore, InMemoryEngineerStore, InMemoryProjectStore};
pub use traits::{AssignmentStore, EngineerStore, ProjectStore, StorageError};
