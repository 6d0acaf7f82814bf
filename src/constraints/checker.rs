use super::{Ledger, Violation};
use crate::domain::DataService;
use crate::schedule::WeeklyEvent;

/// A flagged event: its position in the checked slice and the first rule it broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conflict {
    pub index: usize,
    pub violation: Violation,
}

/// Returns exactly the events that break a hard rule, in input order.
///
/// Rules are evaluated in the fixed order of [`Violation`]; an event is
/// reported once, under the first failing rule, and is then excluded from
/// the occupancy and daily-load bookkeeping that later events are judged against.
pub fn check(events: &[WeeklyEvent], data: &DataService) -> Vec<Conflict> {
    let mut ledger = Ledger::new();
    events
        .iter()
        .enumerate()
        .filter_map(|(index, ev)| {
            ledger
                .admit(ev, data)
                .err()
                .map(|violation| Conflict { index, violation })
        })
        .collect()
}

pub fn is_feasible(events: &[WeeklyEvent], data: &DataService) -> bool {
    let mut ledger = Ledger::new();
    events.iter().all(|ev| ledger.admit(ev, data).is_ok())
}
