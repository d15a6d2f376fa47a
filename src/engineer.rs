//! Engineer entity and identity.
//!
//! Engineers are the capacity-bearing side of the model. Each engineer
//! carries a `max_capacity` (50 for part-time, 100 for full-time are the
//! common values) and a cached `current_workload`. The cache is a derived
//! figure: it must always equal the sum of allocations across the
//! engineer's non-expired assignments, and the assignment set—not the
//! cache—is the source of truth for reconciliation.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Globally unique, stable engineer identifier.
///
/// Once created, an `EngineerId` never changes. Assignments reference
/// engineers by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineerId(Uuid);

impl EngineerId {
    /// Creates a new random engineer ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an engineer ID from an existing UUID.
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

impl Default for EngineerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EngineerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Seniority band of an engineer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seniority {
    /// Early-career engineer
    Junior,
    /// Independent contributor
    Mid,
    /// Technical leadership band
    Senior,
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Junior => write!(f, "junior"),
            Self::Mid => write!(f, "mid"),
            Self::Senior => write!(f, "senior"),
        }
    }
}

/// An engineer who can be allocated to projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Engineer {
    /// Unique identifier.
    pub id: EngineerId,

    /// Display name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Skill tags used for staffing searches.
    pub skills: Vec<String>,

    /// Seniority band.
    pub seniority: Seniority,

    /// Total allocatable percentage (0–100).
    pub max_capacity: u8,

    /// Cached sum of allocations across non-expired assignments.
    ///
    /// Derived value only. Updated by the engine after every assignment
    /// mutation and repairable via workload reconciliation.
    pub current_workload: u16,

    /// Inactive engineers are soft-deleted: they keep their history but
    /// cannot take new assignments.
    pub is_active: bool,
}

impl Engineer {
    /// Creates a new active engineer with an empty workload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is blank, or
    /// [`ValidationError::CapacityOutOfRange`] if `max_capacity > 100`.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        seniority: Seniority,
        max_capacity: u8,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if max_capacity > 100 {
            return Err(ValidationError::CapacityOutOfRange {
                value: max_capacity,
            });
        }
        Ok(Self {
            id: EngineerId::new(),
            name,
            email: email.into(),
            skills: Vec::new(),
            seniority,
            max_capacity,
            current_workload: 0,
            is_active: true,
        })
    }

    /// Builder: add a skill tag.
    #[must_use]
    pub fn with_skill(mut self, skill: impl Into<String>) -> Self {
        self.skills.push(skill.into());
        self
    }

    /// Remaining headroom against `max_capacity`.
    ///
    /// Signed: an engineer whose cached workload has drifted above
    /// capacity reports negative availability rather than saturating.
    #[must_use]
    pub fn available_capacity(&self) -> i16 {
        let workload = i16::try_from(self.current_workload).unwrap_or(i16::MAX);
        i16::from(self.max_capacity).saturating_sub(workload)
    }

    /// Utilization as a percentage of `max_capacity`.
    ///
    /// Returns 0.0 for a zero-capacity engineer rather than dividing by zero.
    #[must_use]
    pub fn utilization(&self) -> f32 {
        if self.max_capacity == 0 {
            return 0.0;
        }
        f32::from(self.current_workload) / f32::from(self.max_capacity) * 100.0
    }

    /// Returns true if this engineer has the given skill tag.
    #[must_use]
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.iter().any(|s| s.eq_ignore_ascii_case(skill))
    }
}
