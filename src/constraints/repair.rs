use super::{Ledger, Violation};
use crate::domain::{ClassroomId, DataService};
use crate::schedule::WeeklyEvent;
use crate::slots::{PAIR_COUNT, WORKING_DAYS};
use serde::Serialize;
use tracing::debug;

/// A lesson the repairer could not place anywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedLesson {
    pub event: WeeklyEvent,
    /// Rule that flagged the event before relocation was attempted.
    pub violation: Violation,
}

#[derive(Debug, Clone, Default)]
pub struct RepairOutcome {
    pub events: Vec<WeeklyEvent>,
    pub dropped: Vec<DroppedLesson>,
}

impl RepairOutcome {
    pub fn is_lossless(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Makes `events` feasible.
///
/// Events that pass the checker are kept verbatim and in order. Each flagged
/// event is moved to the first weekday × pair cell (and, for capacity
/// failures, the first classroom by ascending capacity) that is conflict-free
/// against everything kept so far; accepted moves are appended. Events with
/// no feasible cell are dropped and reported in [`RepairOutcome::dropped`].
pub fn repair(events: Vec<WeeklyEvent>, data: &DataService) -> RepairOutcome {
    let mut ledger = Ledger::new();
    let mut kept = Vec::with_capacity(events.len());
    let mut flagged = Vec::new();

    for ev in events {
        match ledger.admit(&ev, data) {
            Ok(()) => kept.push(ev),
            Err(v) => flagged.push((ev, v)),
        }
    }

    let mut dropped = Vec::new();
    for (ev, violation) in flagged {
        match relocate(&ev, violation, &ledger, data) {
            Some(moved) => {
                ledger.record(&moved);
                kept.push(moved);
            }
            None => {
                debug!(
                    "Dropping {} ({}) for group {}: {}",
                    ev.title, ev.lesson_type, ev.group_id, violation
                );
                dropped.push(DroppedLesson { event: ev, violation });
            }
        }
    }

    RepairOutcome {
        events: kept,
        dropped,
    }
}

fn relocate(
    ev: &WeeklyEvent,
    violation: Violation,
    ledger: &Ledger,
    data: &DataService,
) -> Option<WeeklyEvent> {
    let rooms: Vec<ClassroomId> = if violation == Violation::CapacityExceeded {
        data.classrooms_by_capacity().map(|c| c.id).collect()
    } else {
        vec![ev.classroom_id]
    };

    for &day in &WORKING_DAYS {
        for pair in 0..PAIR_COUNT {
            for &room in &rooms {
                let candidate = WeeklyEvent {
                    day_of_week: day,
                    pair_index: pair,
                    classroom_id: room,
                    ..ev.clone()
                };
                if ledger.violation(&candidate, data).is_none() {
                    return Some(candidate);
                }
            }
        }
    }
    None
}
