//! In-memory storage backend.
//!
//! This module provides thread-safe in-memory implementations of the
//! storage traits. It is intended for embedded usage, tests, and as a
//! reference implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use crate::assignment::{Assignment, AssignmentId};
use crate::engineer::{Engineer, EngineerId};
use crate::project::{Project, ProjectId};
use crate::storage::traits::{AssignmentStore, EngineerStore, ProjectStore, StorageError};

fn lock_err(context: &'static str) -> StorageError {
    StorageError::BackendError(format!("poisoned lock: {context}"))
}

/// In-memory engineer store backed by `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryEngineerStore {
    engineers: RwLock<HashMap<EngineerId, Engineer>>,
}

impl InMemoryEngineerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl EngineerStore for InMemoryEngineerStore {
    fn insert(&self, engineer: Engineer) -> Result<(), StorageError> {
        let mut engineers = self
            .engineers
            .write()
            .map_err(|_| lock_err("engineer.insert"))?;
        if engineers.contains_key(&engineer.id) {
            return Err(StorageError::DuplicateKey(engineer.id.to_string()));
        }
        engineers.insert(engineer.id, engineer);
        Ok(())
    }

    fn get(&self, id: EngineerId) -> Result<Option<Engineer>, StorageError> {
        let engineers = self.engineers.read().map_err(|_| lock_err("engineer.get"))?;
        Ok(engineers.get(&id).cloned())
    }

    fn update(&self, engineer: Engineer) -> Result<(), StorageError> {
        let mut engineers = self
            .engineers
            .write()
            .map_err(|_| lock_err("engineer.update"))?;
        if !engineers.contains_key(&engineer.id) {
            return Err(StorageError::EngineerNotFound(engineer.id));
        }
        engineers.insert(engineer.id, engineer);
        Ok(())
    }

    fn set_workload(&self, id: EngineerId, workload: u16) -> Result<(), StorageError> {
        let mut engineers = self
            .engineers
            .write()
            .map_err(|_| lock_err("engineer.set_workload"))?;
        let engineer = engineers
            .get_mut(&id)
            .ok_or(StorageError::EngineerNotFound(id))?;
        engineer.current_workload = workload;
        Ok(())
    }

    fn list(&self) -> Result<Vec<Engineer>, StorageError> {
        let engineers = self
            .engineers
            .read()
            .map_err(|_| lock_err("engineer.list"))?;
        Ok(engineers.values().cloned().collect())
    }

    fn find_by_skill(&self, skill: &str) -> Result<Vec<Engineer>, StorageError> {
        let engineers = self
            .engineers
            .read()
            .map_err(|_| lock_err("engineer.find_by_skill"))?;
        Ok(engineers
            .values()
            .filter(|e| e.has_skill(skill))
            .cloned()
            .collect())
    }
}

/// In-memory project store backed by `RwLock<HashMap>`.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<ProjectId, Project>>,
}

impl InMemoryProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for InMemoryProjectStore {
    fn insert(&self, project: Project) -> Result<(), StorageError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| lock_err("project.insert"))?;
        if projects.contains_key(&project.id) {
            return Err(StorageError::DuplicateKey(project.id.to_string()));
        }
        projects.insert(project.id, project);
        Ok(())
    }

    fn get(&self, id: ProjectId) -> Result<Option<Project>, StorageError> {
        let projects = self.projects.read().map_err(|_| lock_err("project.get"))?;
        Ok(projects.get(&id).cloned())
    }

    fn update(&self, project: Project) -> Result<(), StorageError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| lock_err("project.update"))?;
        if !projects.contains_key(&project.id) {
            return Err(StorageError::ProjectNotFound(project.id));
        }
        projects.insert(project.id, project);
        Ok(())
    }

    fn delete(&self, id: ProjectId) -> Result<(), StorageError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| lock_err("project.delete"))?;
        projects
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::ProjectNotFound(id))
    }

    fn list(&self) -> Result<Vec<Project>, StorageError> {
        let projects = self.projects.read().map_err(|_| lock_err("project.list"))?;
        Ok(projects.values().cloned().collect())
    }
}

#[derive(Debug, Default)]
struct AssignmentState {
    by_id: HashMap<AssignmentId, Assignment>,
    // Compound-index equivalent: at most one assignment per pair.
    by_pair: HashMap<(EngineerId, ProjectId), AssignmentId>,
}

/// In-memory assignment store with a (engineer, project) pair index.
#[derive(Debug, Default)]
pub struct InMemoryAssignmentStore {
    state: RwLock<AssignmentState>,
}

impl InMemoryAssignmentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssignmentStore for InMemoryAssignmentStore {
    fn insert(&self, assignment: Assignment) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("assignment.insert"))?;
        if state.by_id.contains_key(&assignment.id) {
            return Err(StorageError::DuplicateKey(assignment.id.to_string()));
        }
        let pair = (assignment.engineer_id, assignment.project_id);
        if state.by_pair.contains_key(&pair) {
            return Err(StorageError::DuplicateAssignment {
                engineer_id: assignment.engineer_id,
                project_id: assignment.project_id,
            });
        }
        state.by_pair.insert(pair, assignment.id);
        state.by_id.insert(assignment.id, assignment);
        Ok(())
    }

    fn get(&self, id: AssignmentId) -> Result<Option<Assignment>, StorageError> {
        let state = self.state.read().map_err(|_| lock_err("assignment.get"))?;
        Ok(state.by_id.get(&id).cloned())
    }

    fn update(&self, assignment: Assignment) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("assignment.update"))?;
        let prev = state
            .by_id
            .get(&assignment.id)
            .cloned()
            .ok_or(StorageError::AssignmentNotFound(assignment.id))?;

        let new_pair = (assignment.engineer_id, assignment.project_id);
        if let Some(&holder) = state.by_pair.get(&new_pair) {
            if holder != assignment.id {
                return Err(StorageError::DuplicateAssignment {
                    engineer_id: assignment.engineer_id,
                    project_id: assignment.project_id,
                });
            }
        }

        let prev_pair = (prev.engineer_id, prev.project_id);
        if prev_pair != new_pair {
            state.by_pair.remove(&prev_pair);
            state.by_pair.insert(new_pair, assignment.id);
        }
        state.by_id.insert(assignment.id, assignment);
        Ok(())
    }

    fn delete(&self, id: AssignmentId) -> Result<(), StorageError> {
        let mut state = self.state.write().map_err(|_| lock_err("assignment.delete"))?;
        let assignment = state
            .by_id
            .remove(&id)
            .ok_or(StorageError::AssignmentNotFound(id))?;
        state
            .by_pair
            .remove(&(assignment.engineer_id, assignment.project_id));
        Ok(())
    }

    fn find_by_engineer(&self, id: EngineerId) -> Result<Vec<Assignment>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("assignment.find_by_engineer"))?;
        Ok(state
            .by_id
            .values()
            .filter(|a| a.engineer_id == id)
            .cloned()
            .collect())
    }

    fn find_by_project(&self, id: ProjectId) -> Result<Vec<Assignment>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("assignment.find_by_project"))?;
        Ok(state
            .by_id
            .values()
            .filter(|a| a.project_id == id)
            .cloned()
            .collect())
    }

    fn find_current_for_engineer(
        &self,
        engineer_id: EngineerId,
        now: DateTime<Utc>,
        exclude: Option<AssignmentId>,
    ) -> Result<Vec<Assignment>, StorageError> {
        let state = self
            .state
            .read()
            .map_err(|_| lock_err("assignment.find_current_for_engineer"))?;
        Ok(state
            .by_id
            .values()
            .filter(|a| {
                a.engineer_id == engineer_id
                    && a.counts_against_capacity(now)
                    && exclude != Some(a.id)
            })
            .cloned()
            .collect())
    }
}
