// src/planner.rs

use crate::model::{Classification, Plan, PlanEntry, PlanTarget, PlannerState};
use git2::Oid;

/// One step of the fold: the boundary flag for a commit classified `cls`
/// given the state left by the previous commit, and the next state.
pub fn step(state: PlannerState, cls: Classification) -> (bool, PlannerState) {
    // A deletion always starts its own checkpoint, even after empty commits.
    let boundary = match (state, cls) {
        (_, Classification::Mixed) => true,
        (PlannerState::Empty, _) => false,
        (PlannerState::Add, _) => false,
        (PlannerState::Del, _) => true,
    };
    let next = match cls {
        Classification::Empty => PlannerState::Empty,
        Classification::AddOnly | Classification::Initial => PlannerState::Add,
        Classification::Mixed => PlannerState::Del,
    };
    (boundary, next)
}

/// Folds a classified, oldest-first history into a plan.
///
/// The first commit is the branch base and seeds the state; a terminal
/// sentinel is always appended as a boundary.
pub fn plan(classified: &[(Oid, Classification)]) -> Plan {
    let mut entries = Vec::with_capacity(classified.len() + 1);
    let mut rest = classified.iter();

    if let Some(&(root, _)) = rest.next() {
        entries.push(PlanEntry { target: PlanTarget::Commit(root), is_boundary: true });
    }

    let (_, mut entries) = rest.fold(
        (PlannerState::Add, entries),
        |(state, mut entries), &(id, cls)| {
            let (is_boundary, next) = step(state, cls);
            entries.push(PlanEntry { target: PlanTarget::Commit(id), is_boundary });
            (next, entries)
        },
    );

    entries.push(PlanEntry { target: PlanTarget::End, is_boundary: true });
    Plan { entries }
}
