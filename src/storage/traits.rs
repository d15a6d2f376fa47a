//! Abstract storage traits for resman.
//!
//! These traits define the contract that storage backends must implement.
//! By using traits, we enable:
//! - In-memory backends for testing and embedded use
//! - Document or relational backends for production
//!
//! The engine only ever sees these traits; it has no opinion about how
//! records are persisted or indexed.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::assignment::{Assignment, AssignmentId};
use crate::engineer::{Engineer, EngineerId};
use crate::project::{Project, ProjectId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Engineer not found.
    #[error("Engineer not found: {0}")]
    EngineerNotFound(EngineerId),

    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Assignment not found.
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(AssignmentId),

    /// The (engineer, project) pair is already assigned.
    #[error("Engineer {engineer_id} is already assigned to project {project_id}")]
    DuplicateAssignment {
        /// The engineer side of the pair.
        engineer_id: EngineerId,
        /// The project side of the pair.
        project_id: ProjectId,
    },

    /// Key already exists.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

/// Storage trait for Engineer records.
pub trait EngineerStore: Send + Sync {
    /// Insert a new engineer. Returns error if the ID already exists.
    fn insert(&self, engineer: Engineer) -> Result<(), StorageError>;

    /// Get an engineer by ID.
    fn get(&self, id: EngineerId) -> Result<Option<Engineer>, StorageError>;

    /// Update an existing engineer. Returns error if not found.
    fn update(&self, engineer: Engineer) -> Result<(), StorageError>;

    /// Overwrite the cached workload figure for an engineer.
    ///
    /// Split out from `update` so the engine can refresh the derived
    /// cache without re-writing the whole record.
    fn set_workload(&self, id: EngineerId, workload: u16) -> Result<(), StorageError>;

    /// List all engineers.
    fn list(&self) -> Result<Vec<Engineer>, StorageError>;

    /// List engineers carrying a given skill tag.
    fn find_by_skill(&self, skill: &str) -> Result<Vec<Engineer>, StorageError>;
}

/// Storage trait for Project records.
pub trait ProjectStore: Send + Sync {
    /// Insert a new project. Returns error if the ID already exists.
    fn insert(&self, project: Project) -> Result<(), StorageError>;

    /// Get a project by ID.
    fn get(&self, id: ProjectId) -> Result<Option<Project>, StorageError>;

    /// Update an existing project. Returns error if not found.
    fn update(&self, project: Project) -> Result<(), StorageError>;

    /// Delete a project by ID. Returns error if not found.
    fn delete(&self, id: ProjectId) -> Result<(), StorageError>;

    /// List all projects.
    fn list(&self) -> Result<Vec<Project>, StorageError>;
}

/// Storage trait for Assignment records.
///
/// # Uniqueness
/// Implementations must reject a second assignment for the same
/// (engineer, project) pair, on insert and on update.
pub trait AssignmentStore: Send + Sync {
    /// Insert a new assignment.
    ///
    /// # Errors
    /// - `DuplicateKey` if the ID already exists
    /// - `DuplicateAssignment` if the (engineer, project) pair is taken
    fn insert(&self, assignment: Assignment) -> Result<(), StorageError>;

    /// Get an assignment by ID.
    fn get(&self, id: AssignmentId) -> Result<Option<Assignment>, StorageError>;

    /// Update an existing assignment. Returns error if not found, or if
    /// the update would collide with another (engineer, project) pair.
    fn update(&self, assignment: Assignment) -> Result<(), StorageError>;

    /// Delete an assignment by ID. Returns error if not found.
    fn delete(&self, id: AssignmentId) -> Result<(), StorageError>;

    /// All assignments referencing an engineer, expired or not.
    fn find_by_engineer(&self, id: EngineerId) -> Result<Vec<Assignment>, StorageError>;

    /// All assignments referencing a project, expired or not.
    fn find_by_project(&self, id: ProjectId) -> Result<Vec<Assignment>, StorageError>;

    /// The filtered scan the capacity rule needs: assignments for
    /// `engineer_id` with `end_date >= now`, optionally excluding one id
    /// (the assignment under edit).
    fn find_current_for_engineer(
        &self,
        engineer_id: EngineerId,
        now: DateTime<Utc>,
        exclude: Option<AssignmentId>,
    ) -> Result<Vec<Assignment>, StorageError>;
}
