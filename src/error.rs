//! Error types for resman.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions—an HTTP adapter, for example,
//! maps `CapacityExceeded` to 409, the not-found family to 404, and
//! validation errors to 400—and provides clear error messages.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::assignment::AssignmentId;
use crate::engineer::EngineerId;
use crate::project::{ProjectId, ProjectStatus};

/// Validation errors that occur while constructing domain values.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Allocation {value}% is out of range [0, 100]")]
    AllocationOutOfRange {
        value: u8,
    },

    #[error("Allocation {value}% is not a multiple of 5")]
    AllocationNotFivePercentStep {
        value: u8,
    },

    #[error("Capacity {value}% is out of range [0, 100]")]
    CapacityOutOfRange {
        value: u8,
    },

    #[error("Name cannot be empty")]
    EmptyName,

    #[error("Invalid date range: start ({start}) must be before end ({end})")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error(
        "Assignment window {start}..{end} falls outside the project window {project_start}..{project_end}"
    )]
    OutsideProjectWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        project_start: DateTime<Utc>,
        project_end: DateTime<Utc>,
    },
}

/// Execution errors that occur while applying operations to the stores.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Engineer not found: {id}")]
    EngineerNotFound {
        id: EngineerId,
    },

    #[error("Project not found: {id}")]
    ProjectNotFound {
        id: ProjectId,
    },

    #[error("Assignment not found: {id}")]
    AssignmentNotFound {
        id: AssignmentId,
    },

    #[error("Engineer {id} is inactive and cannot take assignments")]
    EngineerInactive {
        id: EngineerId,
    },

    #[error("Project {id} is {status} and does not accept assignments")]
    ProjectNotAssignable {
        id: ProjectId,
        status: ProjectStatus,
    },

    #[error("Engineer is already assigned to this project")]
    DuplicateAssignment {
        engineer_id: EngineerId,
        project_id: ProjectId,
    },

    /// The proposed allocation would push the engineer over capacity.
    ///
    /// Carries the full diagnostic payload so the caller can explain
    /// exactly why the write was rejected. `available` is signed because
    /// an already over-committed engineer has negative headroom.
    #[error(
        "Assignment would exceed engineer's max capacity ({max_capacity}%). \
         Current allocation on other assignments: {other_total}%. \
         This assignment requires: {requested}%."
    )]
    CapacityExceeded {
        max_capacity: u8,
        other_total: u16,
        requested: u8,
        available: i16,
    },

    #[error("Engineer has {count} current or future assignments and cannot be deactivated")]
    EngineerHasActiveAssignments {
        count: usize,
    },

    #[error("Project has {count} current or future assignments and cannot be removed")]
    ProjectHasActiveAssignments {
        count: usize,
    },

    #[error("Storage error: {message}")]
    Storage {
        message: String,
    },
}

/// Top-level error type for resman.
///
/// This enum encompasses all possible errors that can occur
/// when using the crate.
#[derive(Debug, Error)]
pub enum ResmanError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
    },
}

impl ResmanError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a capacity rejection.
    ///
    /// Capacity rejections are user-facing: the caller surfaces the
    /// diagnostic payload and the user resubmits with a lower allocation.
    #[must_use]
    pub const fn is_capacity_exceeded(&self) -> bool {
        matches!(
            self,
            Self::Execution(ExecutionError::CapacityExceeded { .. })
        )
    }

    /// Returns true if a referenced entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Execution(
                ExecutionError::EngineerNotFound { .. }
                    | ExecutionError::ProjectNotFound { .. }
                    | ExecutionError::AssignmentNotFound { .. }
            )
        )
    }

    /// Returns true if this is a uniqueness violation on (engineer, project).
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::Execution(ExecutionError::DuplicateAssignment { .. })
        )
    }

    /// Structured detail payload for capacity rejections.
    ///
    /// HTTP adapters attach this to the response body so the UI can
    /// explain exactly why the write was rejected. `None` for every
    /// other error kind.
    #[must_use]
    pub fn capacity_detail(&self) -> Option<serde_json::Value> {
        let Self::Execution(ExecutionError::CapacityExceeded {
            max_capacity,
            other_total,
            requested,
            available,
        }) = self
        else {
            return None;
        };
        Some(serde_json::json!({
            "maxCapacity": max_capacity,
            "currentAllocation": other_total,
            "requestedAllocation": requested,
            "availableCapacity": available,
        }))
    }
}

/// Convenience result alias used throughout the crate.
pub type ResmanResult<T> = Result<T, ResmanError>;
