//! # resman - Capacity-Constrained Resource Allocation
//!
//! resman is the core of an engineering resource-management system:
//! engineers, projects, and the assignments linking them, guarded by a
//! single hard rule—an engineer's summed allocation across non-expired
//! assignments must never exceed their maximum capacity.
//!
//! ## Core Concepts
//!
//! - **Engineer**: a capacity-bearing identity with a `max_capacity`
//!   and a cached, derived `current_workload`
//! - **Project**: a dated delivery window with a lifecycle status
//! - **Assignment**: one engineer's allocation to one project over a
//!   date range; at most one per (engineer, project) pair
//! - **Allocation guard**: the pure capacity check in [`capacity`],
//!   driven by dates (`end_date >= now`), never by status flags
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::{Duration, Utc};
//! use resman::{
//!     Allocation, AssignmentRole, Engineer, NewAssignment, Project, ProjectStatus,
//!     ResmanEngine, Seniority,
//! };
//! use resman::storage::{
//!     EngineerStore, InMemoryAssignmentStore, InMemoryEngineerStore, InMemoryProjectStore,
//!     ProjectStore,
//! };
//!
//! let engineers = Arc::new(InMemoryEngineerStore::new());
//! let projects = Arc::new(InMemoryProjectStore::new());
//! let assignments = Arc::new(InMemoryAssignmentStore::new());
//!
//! let engineer = Engineer::new("Ada", "ada@example.com", Seniority::Senior, 100).unwrap();
//! let engineer_id = engineer.id;
//! engineers.insert(engineer).unwrap();
//!
//! let now = Utc::now();
//! let project = Project::new("Apollo", now, now + Duration::days(90))
//!     .unwrap()
//!     .with_status(ProjectStatus::Active);
//! let project_id = project.id;
//! projects.insert(project).unwrap();
//!
//! let engine = ResmanEngine::new(engineers, projects, assignments);
//! let assignment = engine
//!     .create_assignment(NewAssignment {
//!         engineer_id,
//!         project_id,
//!         allocation: Allocation::new(60).unwrap(),
//!         start_date: now,
//!         end_date: now + Duration::days(60),
//!         role: AssignmentRole::Developer,
//!     })
//!     .unwrap();
//! assert_eq!(assignment.allocation.percent(), 60);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod allocation;
pub mod assignment;
pub mod capacity;
pub mod engine;
pub mod engineer;
pub mod error;
pub mod project;
pub mod storage;

// Re-export primary types at crate root for convenience
pub use allocation::{Allocation, ALLOCATION_STEP};
pub use assignment::{Assignment, AssignmentId, AssignmentRole, AssignmentStatus};
pub use capacity::{check_capacity, workload_after_removal, CapacityCheck};
pub use engine::{AssignmentChange, CapacityReport, NewAssignment, ResmanEngine};
pub use engineer::{Engineer, EngineerId, Seniority};
pub use error::{ExecutionError, ResmanError, ResmanResult, ValidationError};
pub use project::{Project, ProjectId, ProjectStatus};
pub use storage::{
    AssignmentStore, EngineerStore, InMemoryAssignmentStore, InMemoryEngineerStore,
    InMemoryProjectStore, ProjectStore, StorageError,
};
