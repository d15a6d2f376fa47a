//! Project entity and status lifecycle.
//!
//! Projects own a date window and a status. Assignments may only be
//! created against projects in `planning` or `active` status, and an
//! assignment's date range must sit inside the project's window.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Globally unique, stable project identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new random project ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a project ID from an existing UUID.
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

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    /// Being scoped; staffing may begin.
    Planning,
    /// In delivery.
    Active,
    /// Paused; no new staffing.
    OnHold,
    /// Delivered.
    Completed,
    /// Abandoned.
    Cancelled,
}

impl ProjectStatus {
    /// Returns true if new assignments may reference a project in this
    /// status.
    #[must_use]
    pub const fn accepts_assignments(self) -> bool {
        matches!(self, Self::Planning | Self::Active)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Planning => write!(f, "planning"),
            Self::Active => write!(f, "active"),
            Self::OnHold => write!(f, "on-hold"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A project that engineers are allocated to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier.
    pub id: ProjectId,

    /// Display name.
    pub name: String,

    /// Optional client the project is delivered for.
    pub client: Option<String>,

    /// Optional free-form description.
    pub description: Option<String>,

    /// Skills the staffing plan calls for.
    pub required_skills: Vec<String>,

    /// Start of the project window (inclusive).
    pub start_date: DateTime<Utc>,

    /// End of the project window (inclusive).
    pub end_date: DateTime<Utc>,

    /// Current lifecycle status.
    pub status: ProjectStatus,
}

impl Project {
    /// Creates a new project in `planning` status.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyName`] if `name` is blank, or
    /// [`ValidationError::InvalidDateRange`] if `start_date >= end_date`.
    pub fn new(
        name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if start_date >= end_date {
            return Err(ValidationError::InvalidDateRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            id: ProjectId::new(),
            name,
            client: None,
            description: None,
            required_skills: Vec::new(),
            start_date,
            end_date,
            status: ProjectStatus::Planning,
        })
    }

    /// Builder: set the client.
    #[must_use]
    pub fn with_client(mut self, client: impl Into<String>) -> Self {
        self.client = Some(client.into());
        self
    }

    /// Builder: set the status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder: add a required skill.
    #[must_use]
    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.push(skill.into());
        self
    }

    /// Returns true if the given range sits inside the project window.
    #[must_use]
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start_date && end <= self.end_date
    }
}
