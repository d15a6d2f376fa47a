use std::sync::Arc;

use chrono::{Duration, Utc};
use resman::{
    Allocation, Assignment, AssignmentRole, AssignmentStore, Engineer, EngineerId, EngineerStore,
    ExecutionError, NewAssignment, Project, ProjectId, ProjectStatus, ProjectStore, ResmanEngine,
    ResmanError, Seniority,
};
use resman::storage::{InMemoryAssignmentStore, InMemoryEngineerStore, InMemoryProjectStore};

struct Fixture {
    engine: ResmanEngine,
    engineers: Arc<InMemoryEngineerStore>,
    projects: Arc<InMemoryProjectStore>,
    assignments: Arc<InMemoryAssignmentStore>,
    engineer_id: EngineerId,
}

fn fixture(max_capacity: u8) -> Fixture {
    let engineers = Arc::new(InMemoryEngineerStore::new());
    let projects = Arc::new(InMemoryProjectStore::new());
    let assignments = Arc::new(InMemoryAssignmentStore::new());

    let engineer =
        Engineer::new("Grace Hopper", "grace@example.com", Seniority::Senior, max_capacity)
            .unwrap();
    let engineer_id = engineer.id;
    engineers.insert(engineer).unwrap();

    let engine = ResmanEngine::new(engineers.clone(), projects.clone(), assignments.clone());
    Fixture {
        engine,
        engineers,
        projects,
        assignments,
        engineer_id,
    }
}

fn add_project(fx: &Fixture) -> ProjectId {
    let now = Utc::now();
    let project = Project::new("Vega", now - Duration::days(180), now + Duration::days(180))
        .unwrap()
        .with_status(ProjectStatus::Active);
    let id = project.id;
    fx.projects.insert(project).unwrap();
    id
}

fn create(fx: &Fixture, percent: u8) -> Assignment {
    let now = Utc::now();
    fx.engine
        .create_assignment(NewAssignment {
            engineer_id: fx.engineer_id,
            project_id: add_project(fx),
            allocation: Allocation::new(percent).unwrap(),
            start_date: now - Duration::days(1),
            end_date: now + Duration::days(60),
            role: AssignmentRole::Developer,
        })
        .unwrap()
}

/// Seeds an already-expired assignment directly into the store.
fn seed_expired(fx: &Fixture, percent: u8) {
    let now = Utc::now();
    let expired = Assignment::new(
        fx.engineer_id,
        add_project(fx),
        Allocation::new(percent).unwrap(),
        now - Duration::days(60),
        now - Duration::days(2),
        AssignmentRole::QaEngineer,
    )
    .unwrap();
    fx.assignments.insert(expired).unwrap();
}

#[test]
fn recompute_repairs_a_drifted_cache() {
    let fx = fixture(100);
    create(&fx, 40);
    create(&fx, 20);

    // Simulate drift: something clobbered the cache.
    fx.engineers.set_workload(fx.engineer_id, 95).unwrap();

    let workload = fx.engine.recompute_workload(fx.engineer_id).unwrap();
    assert_eq!(workload, 60);
    assert_eq!(
        fx.engineers.get(fx.engineer_id).unwrap().unwrap().current_workload,
        60
    );
}

#[test]
fn recompute_ignores_expired_assignments() {
    let fx = fixture(100);
    create(&fx, 40);
    seed_expired(&fx, 30);

    let workload = fx.engine.recompute_workload(fx.engineer_id).unwrap();
    assert_eq!(workload, 40);
}

#[test]
fn recompute_requires_an_existing_engineer() {
    let fx = fixture(100);
    let err = fx.engine.recompute_workload(EngineerId::new()).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn capacity_report_summarizes_live_assignments() {
    let fx = fixture(100);
    create(&fx, 40);
    create(&fx, 20);
    seed_expired(&fx, 30);

    let report = fx.engine.capacity_report(fx.engineer_id).unwrap();
    assert_eq!(report.total_capacity, 100);
    assert_eq!(report.current_allocation, 60);
    assert_eq!(report.available_capacity, 40);
    assert!((report.utilization_rate - 60.0).abs() < f32::EPSILON);
    assert_eq!(report.assignments.len(), 2);
}

#[test]
fn capacity_report_handles_part_time_over_commit() {
    let fx = fixture(50);
    create(&fx, 40);

    // Drop the cap after the fact; the report must show negative headroom.
    let mut engineer = fx.engineers.get(fx.engineer_id).unwrap().unwrap();
    engineer.max_capacity = 25;
    fx.engineers.update(engineer).unwrap();

    let report = fx.engine.capacity_report(fx.engineer_id).unwrap();
    assert_eq!(report.available_capacity, -15);
    assert_eq!(report.current_allocation, 40);
}

#[test]
fn delete_of_expired_assignment_leaves_cache_alone() {
    let fx = fixture(100);
    create(&fx, 40);

    // An expired assignment no longer contributes to the cache, so
    // deleting it must not decrement anything.
    let now = Utc::now();
    let expired = Assignment::new(
        fx.engineer_id,
        add_project(&fx),
        Allocation::new(30).unwrap(),
        now - Duration::days(60),
        now - Duration::days(2),
        AssignmentRole::Developer,
    )
    .unwrap();
    let expired_id = expired.id;
    fx.assignments.insert(expired).unwrap();

    fx.engine.delete_assignment(expired_id).unwrap();
    assert_eq!(
        fx.engineers.get(fx.engineer_id).unwrap().unwrap().current_workload,
        40
    );
}

#[test]
fn project_removal_blocked_while_staffed() {
    let fx = fixture(100);
    let assignment = create(&fx, 40);

    let err = fx.engine.remove_project(assignment.project_id).unwrap_err();
    assert!(matches!(
        err,
        ResmanError::Execution(ExecutionError::ProjectHasActiveAssignments { count: 1 })
    ));

    fx.engine.delete_assignment(assignment.id).unwrap();
    fx.engine.remove_project(assignment.project_id).unwrap();
    assert!(fx.projects.get(assignment.project_id).unwrap().is_none());
}

#[test]
fn listing_assignments_includes_expired_history() {
    let fx = fixture(100);
    create(&fx, 40);
    seed_expired(&fx, 30);

    let all = fx.engine.assignments_for_engineer(fx.engineer_id).unwrap();
    assert_eq!(all.len(), 2);

    let report = fx.engine.capacity_report(fx.engineer_id).unwrap();
    assert_eq!(report.assignments.len(), 1, "report only counts live work");
}

