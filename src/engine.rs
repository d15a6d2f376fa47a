//! Execution engine for resman operations.
//!
//! The engine applies assignment lifecycle operations against pluggable
//! storage backends, running the allocation guard before every write
//! that could change an engineer's committed capacity and refreshing
//! the cached workload afterwards.
//!
//! # Concurrency
//!
//! The check-and-commit sequence is **not** serialized across callers:
//! two concurrent requests for the same engineer can each observe a sum
//! below capacity and jointly exceed it. Callers that need stronger
//! guarantees must provide per-engineer mutual exclusion or a storage
//! backend with conditional updates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::assignment::{Assignment, AssignmentId, AssignmentRole, AssignmentStatus};
use crate::capacity::{check_capacity, committed_allocation, workload_after_removal, CapacityCheck};
use crate::engineer::{Engineer, EngineerId};
use crate::error::{ExecutionError, ResmanError, ResmanResult, ValidationError};
use crate::project::{Project, ProjectId};
use crate::storage::{AssignmentStore, EngineerStore, ProjectStore, StorageError};

/// Input for creating an assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAssignment {
    /// Engineer to allocate.
    pub engineer_id: EngineerId,
    /// Project to staff.
    pub project_id: ProjectId,
    /// Share of capacity to consume.
    pub allocation: Allocation,
    /// Start of the allocation (inclusive).
    pub start_date: DateTime<Utc>,
    /// End of the allocation (inclusive).
    pub end_date: DateTime<Utc>,
    /// Role the engineer fills.
    pub role: AssignmentRole,
}

/// Partial update to an assignment. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentChange {
    /// New allocation, if changing.
    pub allocation: Option<Allocation>,
    /// New start date, if changing.
    pub start_date: Option<DateTime<Utc>>,
    /// New end date, if changing.
    pub end_date: Option<DateTime<Utc>>,
    /// New role, if changing.
    pub role: Option<AssignmentRole>,
    /// New status, if changing.
    pub status: Option<AssignmentStatus>,
}

impl AssignmentChange {
    /// A change that only adjusts the allocation.
    #[must_use]
    pub fn allocation(allocation: Allocation) -> Self {
        Self {
            allocation: Some(allocation),
            ..Self::default()
        }
    }
}

/// Point-in-time capacity summary for one engineer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityReport {
    /// The engineer the report is about.
    pub engineer: Engineer,
    /// The engineer's `max_capacity`.
    pub total_capacity: u8,
    /// Summed allocation across non-expired assignments.
    pub current_allocation: u16,
    /// `total_capacity - current_allocation`; negative when over-committed.
    pub available_capacity: i16,
    /// `current_allocation` as a percentage of `total_capacity`.
    pub utilization_rate: f32,
    /// The assignments contributing to `current_allocation`.
    pub assignments: Vec<Assignment>,
}

/// resman execution engine.
#[derive(Clone)]
pub struct ResmanEngine {
    engineers: Arc<dyn EngineerStore>,
    projects: Arc<dyn ProjectStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl ResmanEngine {
    /// Create a new engine using the given stores.
    #[must_use]
    pub fn new(
        engineers: Arc<dyn EngineerStore>,
        projects: Arc<dyn ProjectStore>,
        assignments: Arc<dyn AssignmentStore>,
    ) -> Self {
        Self {
            engineers,
            projects,
            assignments,
        }
    }

    fn storage_err(err: StorageError) -> ResmanError {
        match err {
            StorageError::DuplicateAssignment {
                engineer_id,
                project_id,
            } => ResmanError::Execution(ExecutionError::DuplicateAssignment {
                engineer_id,
                project_id,
            }),
            other => ResmanError::Execution(ExecutionError::Storage {
                message: other.to_string(),
            }),
        }
    }

    fn require_engineer(&self, id: EngineerId) -> ResmanResult<Engineer> {
        self.engineers
            .get(id)
            .map_err(Self::storage_err)?
            .ok_or(ResmanError::Execution(ExecutionError::EngineerNotFound {
                id,
            }))
    }

    fn require_project(&self, id: ProjectId) -> ResmanResult<Project> {
        self.projects
            .get(id)
            .map_err(Self::storage_err)?
            .ok_or(ResmanError::Execution(ExecutionError::ProjectNotFound {
                id,
            }))
    }

    fn require_assignment(&self, id: AssignmentId) -> ResmanResult<Assignment> {
        self.assignments
            .get(id)
            .map_err(Self::storage_err)?
            .ok_or(ResmanError::Execution(ExecutionError::AssignmentNotFound {
                id,
            }))
    }

    /// Runs the allocation guard for `engineer_id` without writing anything.
    ///
    /// `exclude` names the assignment under edit, if any, so its previous
    /// allocation is not double-counted.
    ///
    /// # Errors
    ///
    /// `EngineerNotFound` if the engineer does not exist;
    /// `CapacityExceeded` with the diagnostic payload if the proposal
    /// does not fit.
    pub fn check_capacity(
        &self,
        engineer_id: EngineerId,
        proposed: Allocation,
        exclude: Option<AssignmentId>,
    ) -> ResmanResult<CapacityCheck> {
        let engineer = self.require_engineer(engineer_id)?;
        let now = Utc::now();
        let others = self
            .assignments
            .find_current_for_engineer(engineer_id, now, exclude)
            .map_err(Self::storage_err)?;
        check_capacity(&engineer, &others, proposed, now)
            .map_err(ResmanError::Execution)
    }

    /// Creates an assignment, running every invariant the write must hold.
    ///
    /// Checks, in order: engineer exists and is active; project exists
    /// and accepts assignments (planning/active); dates are ordered and
    /// inside the project window; the (engineer, project) pair is free;
    /// the allocation fits. On success the assignment is persisted first
    /// and the cached workload written after, so a failed persist never
    /// leaves a stale cache behind.
    pub fn create_assignment(&self, new: NewAssignment) -> ResmanResult<Assignment> {
        let engineer = self.require_engineer(new.engineer_id)?;
        if !engineer.is_active {
            return Err(ResmanError::Execution(ExecutionError::EngineerInactive {
                id: engineer.id,
            }));
        }

        let project = self.require_project(new.project_id)?;
        if !project.status.accepts_assignments() {
            return Err(ResmanError::Execution(ExecutionError::ProjectNotAssignable {
                id: project.id,
                status: project.status,
            }));
        }

        let assignment = Assignment::new(
            new.engineer_id,
            new.project_id,
            new.allocation,
            new.start_date,
            new.end_date,
            new.role,
        )?;
        Self::validate_window(&project, &assignment)?;

        let now = Utc::now();
        let others = self
            .assignments
            .find_current_for_engineer(new.engineer_id, now, None)
            .map_err(Self::storage_err)?;
        let check = check_capacity(&engineer, &others, new.allocation, now)
            .map_err(ResmanError::Execution)?;

        self.assignments
            .insert(assignment.clone())
            .map_err(Self::storage_err)?;

        // A backdated assignment that is already expired never counts.
        let workload = if assignment.counts_against_capacity(now) {
            check.projected_total
        } else {
            check.other_total
        };
        self.engineers
            .set_workload(engineer.id, workload)
            .map_err(Self::storage_err)?;

        Ok(assignment)
    }

    /// Applies a partial update to an assignment, re-running the guard
    /// with the assignment itself excluded from the committed sum.
    pub fn update_assignment(
        &self,
        id: AssignmentId,
        change: AssignmentChange,
    ) -> ResmanResult<Assignment> {
        let assignment = self.require_assignment(id)?;
        let engineer = self.require_engineer(assignment.engineer_id)?;

        let mut updated = assignment.clone();
        if let Some(allocation) = change.allocation {
            updated.allocation = allocation;
        }
        if let Some(start) = change.start_date {
            updated.start_date = start;
        }
        if let Some(end) = change.end_date {
            updated.end_date = end;
        }
        if let Some(role) = change.role {
            updated.role = role;
        }
        if let Some(status) = change.status {
            updated.status = status;
        }

        if updated.start_date >= updated.end_date {
            return Err(ResmanError::Validation(ValidationError::InvalidDateRange {
                start: updated.start_date,
                end: updated.end_date,
            }));
        }
        let project = self.require_project(updated.project_id)?;
        Self::validate_window(&project, &updated)?;

        let now = Utc::now();
        let others = self
            .assignments
            .find_current_for_engineer(assignment.engineer_id, now, Some(id))
            .map_err(Self::storage_err)?;
        let check = check_capacity(&engineer, &others, updated.allocation, now)
            .map_err(ResmanError::Execution)?;

        self.assignments
            .update(updated.clone())
            .map_err(Self::storage_err)?;

        // The updated assignment may itself be expired or future-dated;
        // recompute the cache from what actually counts now.
        let workload = if updated.counts_against_capacity(now) {
            check.projected_total
        } else {
            check.other_total
        };
        self.engineers
            .set_workload(engineer.id, workload)
            .map_err(Self::storage_err)?;

        Ok(updated)
    }

    /// Deletes an assignment and decrements the engineer's cached
    /// workload by the removed allocation, clamped at zero.
    pub fn delete_assignment(&self, id: AssignmentId) -> ResmanResult<()> {
        let assignment = self.require_assignment(id)?;
        self.assignments.delete(id).map_err(Self::storage_err)?;

        // The engineer may have been removed out from under the
        // assignment; a missing cache is nothing to decrement.
        if let Some(engineer) = self
            .engineers
            .get(assignment.engineer_id)
            .map_err(Self::storage_err)?
        {
            let workload = if assignment.counts_against_capacity(Utc::now()) {
                workload_after_removal(engineer.current_workload, assignment.allocation)
            } else {
                engineer.current_workload
            };
            self.engineers
                .set_workload(engineer.id, workload)
                .map_err(Self::storage_err)?;
        }
        Ok(())
    }

    /// Recomputes the cached workload from the assignment set.
    ///
    /// The cache is a materialized view; this is the repair path when it
    /// drifts (crash between writes, expired assignments aging out).
    /// Returns the recomputed figure.
    pub fn recompute_workload(&self, engineer_id: EngineerId) -> ResmanResult<u16> {
        self.require_engineer(engineer_id)?;
        let now = Utc::now();
        let current = self
            .assignments
            .find_current_for_engineer(engineer_id, now, None)
            .map_err(Self::storage_err)?;
        let workload = committed_allocation(&current, now);
        self.engineers
            .set_workload(engineer_id, workload)
            .map_err(Self::storage_err)?;
        Ok(workload)
    }

    /// Builds a point-in-time capacity report for an engineer.
    pub fn capacity_report(&self, engineer_id: EngineerId) -> ResmanResult<CapacityReport> {
        let engineer = self.require_engineer(engineer_id)?;
        let now = Utc::now();
        let assignments = self
            .assignments
            .find_current_for_engineer(engineer_id, now, None)
            .map_err(Self::storage_err)?;

        let current_allocation = committed_allocation(&assignments, now);
        let available_capacity = i16::from(engineer.max_capacity)
            - i16::try_from(current_allocation).unwrap_or(i16::MAX);
        let utilization_rate = if engineer.max_capacity == 0 {
            0.0
        } else {
            f32::from(current_allocation) / f32::from(engineer.max_capacity) * 100.0
        };

        Ok(CapacityReport {
            total_capacity: engineer.max_capacity,
            current_allocation,
            available_capacity,
            utilization_rate,
            assignments,
            engineer,
        })
    }

    /// Soft-deletes an engineer.
    ///
    /// Refused while the engineer still has non-expired assignments;
    /// history is kept either way.
    pub fn deactivate_engineer(&self, id: EngineerId) -> ResmanResult<()> {
        let mut engineer = self.require_engineer(id)?;
        let current = self
            .assignments
            .find_current_for_engineer(id, Utc::now(), None)
            .map_err(Self::storage_err)?;
        if !current.is_empty() {
            return Err(ResmanError::Execution(
                ExecutionError::EngineerHasActiveAssignments {
                    count: current.len(),
                },
            ));
        }
        engineer.is_active = false;
        self.engineers.update(engineer).map_err(Self::storage_err)
    }

    /// Removes a project. Refused while non-expired assignments still
    /// reference it.
    pub fn remove_project(&self, id: ProjectId) -> ResmanResult<()> {
        self.require_project(id)?;
        let now = Utc::now();
        let live: Vec<_> = self
            .assignments
            .find_by_project(id)
            .map_err(Self::storage_err)?
            .into_iter()
            .filter(|a| a.counts_against_capacity(now))
            .collect();
        if !live.is_empty() {
            return Err(ResmanError::Execution(
                ExecutionError::ProjectHasActiveAssignments { count: live.len() },
            ));
        }
        self.projects.delete(id).map_err(Self::storage_err)
    }

    /// All assignments for an engineer, expired or not.
    pub fn assignments_for_engineer(&self, id: EngineerId) -> ResmanResult<Vec<Assignment>> {
        self.require_engineer(id)?;
        self.assignments
            .find_by_engineer(id)
            .map_err(Self::storage_err)
    }

    /// All assignments for a project, expired or not.
    pub fn assignments_for_project(&self, id: ProjectId) -> ResmanResult<Vec<Assignment>> {
        self.require_project(id)?;
        self.assignments
            .find_by_project(id)
            .map_err(Self::storage_err)
    }

    fn validate_window(project: &Project, assignment: &Assignment) -> ResmanResult<()> {
        if !project.contains(assignment.start_date, assignment.end_date) {
            return Err(ResmanError::Validation(
                ValidationError::OutsideProjectWindow {
                    start: assignment.start_date,
                    end: assignment.end_date,
                    project_start: project.start_date,
                    project_end: project.end_date,
                },
            ));
        }
        Ok(())
    }
}
