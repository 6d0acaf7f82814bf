use super::Violation;
use crate::domain::{ClassroomId, DataService, DayOfWeek, GroupId, TeacherId};
use crate::schedule::WeeklyEvent;
use crate::slots::PAIR_COUNT;
use std::collections::{HashMap, HashSet};

/// Which (entity, day, pair) cells are taken, one table per entity kind.
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    teachers: HashSet<(TeacherId, DayOfWeek, usize)>,
    groups: HashSet<(GroupId, DayOfWeek, usize)>,
    classrooms: HashSet<(ClassroomId, DayOfWeek, usize)>,
}

impl Occupancy {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a WeeklyEvent>) -> Self {
        let mut occ = Self::default();
        for ev in events {
            occ.occupy(ev);
        }
        occ
    }

    /// True when the event's teacher, group and classroom are all free at its cell.
    pub fn is_free(&self, ev: &WeeklyEvent) -> bool {
        let (day, pair) = (ev.day_of_week, ev.pair_index);
        !self.teachers.contains(&(ev.teacher_id, day, pair))
            && !self.groups.contains(&(ev.group_id, day, pair))
            && !self.classrooms.contains(&(ev.classroom_id, day, pair))
    }

    pub fn occupy(&mut self, ev: &WeeklyEvent) {
        let (day, pair) = (ev.day_of_week, ev.pair_index);
        self.teachers.insert((ev.teacher_id, day, pair));
        self.groups.insert((ev.group_id, day, pair));
        self.classrooms.insert((ev.classroom_id, day, pair));
    }
}

#[derive(Debug, Clone, Default)]
struct DailyLoad {
    teachers: HashMap<(TeacherId, DayOfWeek), usize>,
    groups: HashMap<(GroupId, DayOfWeek), usize>,
    classrooms: HashMap<(ClassroomId, DayOfWeek), usize>,
}

impl DailyLoad {
    fn teacher(&self, id: TeacherId, day: DayOfWeek) -> usize {
        self.teachers.get(&(id, day)).copied().unwrap_or(0)
    }

    fn group(&self, id: GroupId, day: DayOfWeek) -> usize {
        self.groups.get(&(id, day)).copied().unwrap_or(0)
    }

    fn classroom(&self, id: ClassroomId, day: DayOfWeek) -> usize {
        self.classrooms.get(&(id, day)).copied().unwrap_or(0)
    }

    fn add(&mut self, ev: &WeeklyEvent) {
        let day = ev.day_of_week;
        *self.teachers.entry((ev.teacher_id, day)).or_insert(0) += 1;
        *self.groups.entry((ev.group_id, day)).or_insert(0) += 1;
        *self.classrooms.entry((ev.classroom_id, day)).or_insert(0) += 1;
    }
}

/// Running bookkeeping of events accepted so far.
///
/// An event is judged only against previously admitted events; rejected
/// events leave no trace.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    occupancy: Occupancy,
    load: DailyLoad,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// First rule `ev` breaks against the admitted set, if any.
    pub fn violation(&self, ev: &WeeklyEvent, data: &DataService) -> Option<Violation> {
        let day = ev.day_of_week;

        if !ev.is_on_week_grid() {
            return Some(Violation::OutsideWeekGrid);
        }
        if data.is_required_free(ev.teacher_id, day, ev.pair_index) {
            return Some(Violation::RequiredFree);
        }
        if self.load.teacher(ev.teacher_id, day) >= PAIR_COUNT {
            return Some(Violation::TeacherDailyCap);
        }
        if self.load.group(ev.group_id, day) >= PAIR_COUNT {
            return Some(Violation::GroupDailyCap);
        }
        if self.load.classroom(ev.classroom_id, day) >= PAIR_COUNT {
            return Some(Violation::ClassroomDailyCap);
        }
        if !self.occupancy.is_free(ev) {
            return Some(Violation::SlotOccupied);
        }

        let fits = match (data.group(ev.group_id), data.classroom(ev.classroom_id)) {
            (Some(g), Some(c)) => c.capacity >= g.students_count,
            _ => false,
        };
        if !fits {
            return Some(Violation::CapacityExceeded);
        }

        if !data.is_qualified(ev.teacher_id, ev.group_id, ev.subject_id, ev.lesson_type) {
            return Some(Violation::Unqualified);
        }

        None
    }

    /// Books `ev` without checking it.
    pub fn record(&mut self, ev: &WeeklyEvent) {
        self.occupancy.occupy(ev);
        self.load.add(ev);
    }

    /// Checks `ev` and books it when it passes.
    pub fn admit(&mut self, ev: &WeeklyEvent, data: &DataService) -> Result<(), Violation> {
        match self.violation(ev, data) {
            Some(v) => Err(v),
            None => {
                self.record(ev);
                Ok(())
            }
        }
    }
}
