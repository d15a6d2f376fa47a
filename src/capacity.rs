//! The allocation guard: pure capacity arithmetic.
//!
//! This module holds the one real rule in the system. Given an engineer,
//! the engineer's other assignments, and a proposed allocation, it
//! decides whether accepting the proposal would push the summed
//! allocation past `max_capacity`.
//!
//! Only non-expired assignments (`end_date >= now`) contribute to the
//! sum. Future-dated assignments count; a status flag never does. The
//! caller is responsible for excluding the assignment under edit from
//! `others` so its previous allocation is not double-counted.
//!
//! The functions here are pure: no storage, no clock. The engine wires
//! them to the stores and to `Utc::now()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::allocation::Allocation;
use crate::assignment::Assignment;
use crate::engineer::Engineer;
use crate::error::ExecutionError;

/// Outcome of a successful capacity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityCheck {
    /// Summed allocation of the engineer's other non-expired assignments.
    pub other_total: u16,

    /// `other_total` plus the proposed allocation. On success the caller
    /// persists the write and sets the engineer's cached workload to
    /// this value.
    pub projected_total: u16,
}

/// Sums the allocations of the assignments that are non-expired at `now`.
#[must_use]
pub fn committed_allocation(assignments: &[Assignment], now: DateTime<Utc>) -> u16 {
    assignments
        .iter()
        .filter(|a| a.counts_against_capacity(now))
        .map(|a| a.allocation)
        .sum()
}

/// Checks whether `proposed` fits within the engineer's remaining capacity.
///
/// `others` must already exclude the assignment being updated, if any.
///
/// # Errors
///
/// Returns [`ExecutionError::CapacityExceeded`] with the diagnostic
/// payload (`max_capacity`, `other_total`, `requested`, `available`)
/// when `other_total + proposed` exceeds `max_capacity`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use resman::{Allocation, Engineer, Seniority};
/// use resman::capacity::check_capacity;
///
/// let engineer = Engineer::new("Ada", "ada@example.com", Seniority::Senior, 100).unwrap();
/// let check = check_capacity(&engineer, &[], Allocation::new(60).unwrap(), Utc::now()).unwrap();
/// assert_eq!(check.projected_total, 60);
/// ```
pub fn check_capacity(
    engineer: &Engineer,
    others: &[Assignment],
    proposed: Allocation,
    now: DateTime<Utc>,
) -> Result<CapacityCheck, ExecutionError> {
    let other_total = committed_allocation(others, now);
    let projected_total = other_total + u16::from(proposed.percent());

    if projected_total > u16::from(engineer.max_capacity) {
        let available =
            i16::from(engineer.max_capacity) - i16::try_from(other_total).unwrap_or(i16::MAX);
        return Err(ExecutionError::CapacityExceeded {
            max_capacity: engineer.max_capacity,
            other_total,
            requested: proposed.percent(),
            available,
        });
    }

    Ok(CapacityCheck {
        other_total,
        projected_total,
    })
}

/// Cached workload after an assignment's allocation is removed.
///
/// Clamped at zero: a negative workload would indicate a prior
/// accounting bug, never a legitimate state.
#[must_use]
pub fn workload_after_removal(current_workload: u16, removed: Allocation) -> u16 {
    current_workload.saturating_sub(u16::from(removed.percent()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::AssignmentRole;
    use crate::engineer::{EngineerId, Seniority};
    use crate::project::ProjectId;
    use chrono::Duration;

    fn engineer(max_capacity: u8) -> Engineer {
        Engineer::new("Ada", "ada@example.com", Seniority::Senior, max_capacity).unwrap()
    }

    fn assignment_for(
        engineer_id: EngineerId,
        percent: u8,
        start_offset_days: i64,
        end_offset_days: i64,
    ) -> Assignment {
        let now = Utc::now();
        Assignment::new(
            engineer_id,
            ProjectId::new(),
            Allocation::new(percent).unwrap(),
            now + Duration::days(start_offset_days),
            now + Duration::days(end_offset_days),
            AssignmentRole::Developer,
        )
        .unwrap()
    }

    fn alloc(percent: u8) -> Allocation {
        Allocation::new(percent).unwrap()
    }

    #[test]
    fn succeeds_iff_sum_within_capacity() {
        let eng = engineer(100);
        let others = vec![assignment_for(eng.id, 60, -5, 30)];
        let now = Utc::now();

        assert!(check_capacity(&eng, &others, alloc(40), now).is_ok());
        assert!(check_capacity(&eng, &others, alloc(45), now).is_err());
    }

    #[test]
    fn rejection_carries_available_headroom() {
        // spec scenario: capacity 100, existing 60, request 50 -> available 40.
        let eng = engineer(100);
        let others = vec![assignment_for(eng.id, 60, -5, 30)];

        let err = check_capacity(&eng, &others, alloc(50), Utc::now()).unwrap_err();
        let ExecutionError::CapacityExceeded {
            max_capacity,
            other_total,
            requested,
            available,
        } = err
        else {
            panic!("expected capacity rejection");
        };
        assert_eq!(max_capacity, 100);
        assert_eq!(other_total, 60);
        assert_eq!(requested, 50);
        assert_eq!(available, 40);
    }

    #[test]
    fn exact_fit_succeeds() {
        // spec scenario: capacity 100, existing 60, request 40 -> projected 100.
        let eng = engineer(100);
        let others = vec![assignment_for(eng.id, 60, -5, 30)];

        let check = check_capacity(&eng, &others, alloc(40), Utc::now()).unwrap();
        assert_eq!(check.other_total, 60);
        assert_eq!(check.projected_total, 100);
    }

    #[test]
    fn expired_assignments_never_contribute() {
        // spec scenario: one assignment of 30 ending yesterday, request 90.
        let eng = engineer(100);
        let others = vec![assignment_for(eng.id, 30, -30, -1)];

        let check = check_capacity(&eng, &others, alloc(90), Utc::now()).unwrap();
        assert_eq!(check.other_total, 0);
        assert_eq!(check.projected_total, 90);
    }

    #[test]
    fn future_assignments_do_contribute() {
        let eng = engineer(100);
        let others = vec![assignment_for(eng.id, 80, 30, 60)];

        let err = check_capacity(&eng, &others, alloc(30), Utc::now()).unwrap_err();
        assert!(matches!(err, ExecutionError::CapacityExceeded { .. }));
    }

    #[test]
    fn part_time_capacity_is_respected() {
        let eng = engineer(50);
        let others = vec![assignment_for(eng.id, 25, -5, 30)];

        assert!(check_capacity(&eng, &others, alloc(25), Utc::now()).is_ok());
        assert!(check_capacity(&eng, &others, alloc(30), Utc::now()).is_err());
    }

    #[test]
    fn over_committed_engineer_reports_negative_availability() {
        let eng = engineer(50);
        let others = vec![
            assignment_for(eng.id, 40, -5, 30),
            assignment_for(eng.id, 30, -5, 30),
        ];

        let err = check_capacity(&eng, &others, alloc(5), Utc::now()).unwrap_err();
        let ExecutionError::CapacityExceeded { available, .. } = err else {
            panic!("expected capacity rejection");
        };
        assert_eq!(available, -20);
    }

    #[test]
    fn removal_never_goes_below_zero() {
        assert_eq!(workload_after_removal(30, alloc(30)), 0);
        assert_eq!(workload_after_removal(20, alloc(30)), 0);
        assert_eq!(workload_after_removal(100, alloc(40)), 60);
    }

    #[test]
    fn committed_allocation_mixes_expired_and_live() {
        let id = EngineerId::new();
        let assignments = vec![
            assignment_for(id, 30, -30, -1), // expired
            assignment_for(id, 20, -5, 30),  // running
            assignment_for(id, 10, 10, 40),  // future
        ];
        assert_eq!(committed_allocation(&assignments, Utc::now()), 30);
    }
}
