//! Assignment entity linking an engineer to a project.
//!
//! An assignment carries both a status enum and a date range. The
//! capacity rule deliberately reads only the date range: an assignment
//! whose `end_date` has not yet passed consumes capacity regardless of
//! what its status field says. Dates cannot silently drift out of sync
//! with themselves the way a manually maintained status can, so they
//! are the single source of truth for "is this allocation live".

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::Allocation;
use crate::engineer::EngineerId;
use crate::error::ValidationError;
use crate::project::ProjectId;

/// Globally unique, stable assignment identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentId(Uuid);

impl AssignmentId {
    /// Creates a new random assignment ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an assignment ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for AssignmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role an engineer fills on a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    /// Software developer.
    Developer,
    /// Technical lead.
    TechLead,
    /// Quality assurance engineer.
    QaEngineer,
    /// DevOps engineer.
    DevOps,
    /// Designer.
    Designer,
}

impl Default for AssignmentRole {
    fn default() -> Self {
        Self::Developer
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Developer => write!(f, "Developer"),
            Self::TechLead => write!(f, "Tech Lead"),
            Self::QaEngineer => write!(f, "QA Engineer"),
            Self::DevOps => write!(f, "DevOps"),
            Self::Designer => write!(f, "Designer"),
        }
    }
}

/// Informational lifecycle status of an assignment.
///
/// Carried for callers and dashboards only. The capacity rule never
/// reads this field—see the module docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    /// Created but not yet started.
    Assigned,
    /// Currently in progress.
    Active,
    /// Finished normally.
    Completed,
    /// Terminated early.
    Cancelled,
}

impl Default for AssignmentStatus {
    fn default() -> Self {
        Self::Assigned
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned => write!(f, "assigned"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One engineer's allocation to one project over a date range.
///
/// Uniqueness invariant: at most one assignment exists per
/// (engineer, project) pair; the storage layer enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Unique identifier.
    pub id: AssignmentId,

    /// The engineer being allocated.
    pub engineer_id: EngineerId,

    /// The project being staffed.
    pub project_id: ProjectId,

    /// Share of the engineer's capacity this assignment consumes.
    pub allocation: Allocation,

    /// Start of the allocation (inclusive).
    pub start_date: DateTime<Utc>,

    /// End of the allocation (inclusive).
    pub end_date: DateTime<Utc>,

    /// Role the engineer fills.
    pub role: AssignmentRole,

    /// Informational status; not consulted by the capacity rule.
    pub status: AssignmentStatus,

    /// When the assignment was recorded.
    pub created_at: DateTime<Utc>,
}

impl Assignment {
    /// Creates a new assignment in `assigned` status.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDateRange`] if
    /// `start_date >= end_date`.
    pub fn new(
        engineer_id: EngineerId,
        project_id: ProjectId,
        allocation: Allocation,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        role: AssignmentRole,
    ) -> Result<Self, ValidationError> {
        if start_date >= end_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id: AssignmentId::new(),
            engineer_id,
            project_id,
            allocation,
            start_date,
            end_date,
            role,
            status: AssignmentStatus::Assigned,
            created_at: Utc::now(),
        })
    }

    /// Returns true if this assignment still consumes capacity at `now`.
    ///
    /// Non-expired means `end_date >= now`. Assignments scheduled to
    /// start in the future count: an engineer booked for next quarter
    /// must not be over-booked today.
    #[must_use]
    pub fn counts_against_capacity(&self, now: DateTime<Utc>) -> bool {
        self.end_date >= now
    }

    /// Returns true if this assignment's window has fully passed at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.counts_against_capacity(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(start_offset_days: i64, end_offset_days: i64) -> Assignment {
        let now = Utc::now();
        Assignment::new(
            EngineerId::new(),
            ProjectId::new(),
            Allocation::new(50).unwrap(),
            now + Duration::days(start_offset_days),
            now + Duration::days(end_offset_days),
            AssignmentRole::Developer,
        )
        .unwrap()
    }

    #[test]
    fn rejects_inverted_dates() {
        let now = Utc::now();
        let err = Assignment::new(
            EngineerId::new(),
            ProjectId::new(),
            Allocation::new(50).unwrap(),
            now,
            now - Duration::days(1),
            AssignmentRole::Developer,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
    }

    #[test]
    fn running_assignment_counts() {
        let a = sample(-10, 10);
        assert!(a.counts_against_capacity(Utc::now()));
    }

    #[test]
    fn future_assignment_counts() {
        // Booked for next month: still consumes capacity today.
        let a = sample(30, 60);
        assert!(a.counts_against_capacity(Utc::now()));
    }

    #[test]
    fn expired_assignment_does_not_count() {
        let a = sample(-30, -1);
        assert!(a.is_expired(Utc::now()));
        assert!(!a.counts_against_capacity(Utc::now()));
    }

    #[test]
    fn status_does_not_affect_expiry() {
        let mut a = sample(-10, 10);
        a.status = AssignmentStatus::Cancelled;
        // Date range is the source of truth, not the status flag.
        assert!(a.counts_against_capacity(Utc::now()));
    }
}
