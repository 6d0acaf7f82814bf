use crate::constraints::Occupancy;
use crate::domain::{ClassroomId, DataService, DayOfWeek, GroupId, LessonType, SubjectId, TeacherId};
use crate::schedule::WeeklyEvent;
use crate::slots::{PAIR_COUNT, WORKING_DAYS};
use fastrand::Rng;
use tracing::debug;

/// Cells probed by the local search before a lesson is parked for the second pass.
pub const RETRY_BUDGET: usize = WORKING_DAYS.len() * PAIR_COUNT;

/// One weekly occurrence that has to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LessonRequest {
    pub teacher_id: TeacherId,
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub lesson_type: LessonType,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedSchedule {
    pub events: Vec<WeeklyEvent>,
    /// Occurrences that found no collision-free cell in either pass.
    pub unplaced: Vec<LessonRequest>,
}

/// Builds random initial schedules from the teaching assignments.
///
/// The weekly demand is computed once: every assignment contributes
/// `pairs_per_week` requests for each lesson type with positive hours.
#[derive(Debug, Clone)]
pub struct CandidateGenerator<'a> {
    data: &'a DataService,
    demand: Vec<LessonRequest>,
    kinds: Vec<LessonRequest>,
}

impl<'a> CandidateGenerator<'a> {
    pub fn new(data: &'a DataService, semester_weeks: u32) -> Self {
        let mut demand = Vec::new();
        let mut kinds = Vec::new();

        for ta in data.assignments() {
            for lesson_type in ta.lesson_types() {
                let request = LessonRequest {
                    teacher_id: ta.teacher_id,
                    group_id: ta.group_id,
                    subject_id: ta.subject_id,
                    lesson_type,
                };
                kinds.push(request);
                let per_week = ta.pairs_per_week(lesson_type, semester_weeks);
                demand.extend(std::iter::repeat(request).take(per_week as usize));
            }
        }

        Self {
            data,
            demand,
            kinds,
        }
    }

    /// Weekly occurrences a complete schedule would contain.
    pub fn demand(&self) -> &[LessonRequest] {
        &self.demand
    }

    /// Distinct (assignment, lesson type) combinations.
    pub fn kinds(&self) -> &[LessonRequest] {
        &self.kinds
    }

    pub fn generate(&self, rng: &mut Rng) -> GeneratedSchedule {
        let mut occupancy = Occupancy::default();
        let mut events = Vec::with_capacity(self.demand.len());
        let mut parked = Vec::new();

        for request in &self.demand {
            match self.place(rng, &occupancy, request) {
                Some(ev) => {
                    occupancy.occupy(&ev);
                    events.push(ev);
                }
                None => parked.push(*request),
            }
        }

        // Second pass: exhaustive scan for everything the local search gave up on.
        let mut unplaced = Vec::new();
        for request in parked {
            match self.place_exhaustive(&occupancy, &request) {
                Some(ev) => {
                    occupancy.occupy(&ev);
                    events.push(ev);
                }
                None => {
                    debug!(
                        "Unplaced {} for group {} (teacher {})",
                        request.lesson_type, request.group_id, request.teacher_id
                    );
                    unplaced.push(request);
                }
            }
        }

        GeneratedSchedule { events, unplaced }
    }

    /// Places one extra occurrence of a random lesson kind next to `events`.
    pub fn synthesize(&self, rng: &mut Rng, events: &[WeeklyEvent]) -> Option<WeeklyEvent> {
        if self.kinds.is_empty() {
            return None;
        }
        let request = self.kinds[rng.usize(..self.kinds.len())];
        let occupancy = Occupancy::from_events(events);
        self.place(rng, &occupancy, &request)
            .or_else(|| self.place_exhaustive(&occupancy, &request))
    }

    /// Random cell with the smallest fitting room, falling back to a bounded
    /// search over (day, pair, room) starting from a random offset.
    pub fn place(
        &self,
        rng: &mut Rng,
        occupancy: &Occupancy,
        request: &LessonRequest,
    ) -> Option<WeeklyEvent> {
        let rooms = self.fitting_rooms(request);
        let first_room = *rooms.first()?;

        let day = WORKING_DAYS[rng.usize(..WORKING_DAYS.len())];
        let pair = rng.usize(..PAIR_COUNT);
        let tentative = self.event(request, day, pair, first_room);
        if occupancy.is_free(&tentative) {
            return Some(tentative);
        }

        let cells = WORKING_DAYS.len() * PAIR_COUNT * rooms.len();
        let offset = rng.usize(..cells);
        (0..cells.min(RETRY_BUDGET))
            .map(|step| self.cell(request, &rooms, (offset + step) % cells))
            .find(|ev| occupancy.is_free(ev))
    }

    /// First collision-free cell in day, pair, room order.
    pub fn place_exhaustive(
        &self,
        occupancy: &Occupancy,
        request: &LessonRequest,
    ) -> Option<WeeklyEvent> {
        let rooms = self.fitting_rooms(request);
        let cells = WORKING_DAYS.len() * PAIR_COUNT * rooms.len();
        (0..cells)
            .map(|i| self.cell(request, &rooms, i))
            .find(|ev| occupancy.is_free(ev))
    }

    fn fitting_rooms(&self, request: &LessonRequest) -> Vec<ClassroomId> {
        match self.data.group(request.group_id) {
            Some(group) => self
                .data
                .rooms_fitting(group.students_count)
                .map(|c| c.id)
                .collect(),
            None => Vec::new(),
        }
    }

    // Cell `i` enumerates day-major, then pair, then room.
    fn cell(&self, request: &LessonRequest, rooms: &[ClassroomId], i: usize) -> WeeklyEvent {
        let room = rooms[i % rooms.len()];
        let slot = i / rooms.len();
        let day = WORKING_DAYS[slot / PAIR_COUNT];
        let pair = slot % PAIR_COUNT;
        self.event(request, day, pair, room)
    }

    fn event(
        &self,
        request: &LessonRequest,
        day: DayOfWeek,
        pair: usize,
        classroom_id: ClassroomId,
    ) -> WeeklyEvent {
        WeeklyEvent {
            title: self.data.lesson_title(request.subject_id),
            day_of_week: day,
            pair_index: pair,
            group_id: request.group_id,
            teacher_id: request.teacher_id,
            subject_id: request.subject_id,
            classroom_id,
            lesson_type: request.lesson_type,
        }
    }
}
