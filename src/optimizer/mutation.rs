use super::initialization::CandidateGenerator;
use crate::schedule::WeeklyEvent;
use crate::slots::{PAIR_COUNT, WORKING_DAYS};
use fastrand::Rng;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum MutationOp {
    RerollDay,
    RerollPair,
    SwapWithinGroup,
    AddLesson,
    RemoveLesson,
}

impl MutationOp {
    pub fn random(rng: &mut Rng) -> Self {
        let ops: Vec<Self> = Self::iter().collect();
        ops[rng.usize(..ops.len())]
    }
}

/// Applies one uniformly chosen operator in place. Returns the operator and
/// whether it changed anything.
pub fn mutate(
    rng: &mut Rng,
    events: &mut Vec<WeeklyEvent>,
    generator: &CandidateGenerator,
) -> (MutationOp, bool) {
    let op = MutationOp::random(rng);
    (op, apply(op, rng, events, generator))
}

pub fn apply(
    op: MutationOp,
    rng: &mut Rng,
    events: &mut Vec<WeeklyEvent>,
    generator: &CandidateGenerator,
) -> bool {
    if events.is_empty() && op != MutationOp::AddLesson {
        return false;
    }

    match op {
        MutationOp::RerollDay => {
            let i = rng.usize(..events.len());
            events[i].day_of_week = WORKING_DAYS[rng.usize(..WORKING_DAYS.len())];
            true
        }
        MutationOp::RerollPair => {
            let i = rng.usize(..events.len());
            events[i].pair_index = rng.usize(..PAIR_COUNT);
            true
        }
        MutationOp::SwapWithinGroup => {
            let i = rng.usize(..events.len());
            let group = events[i].group_id;
            let mates: Vec<usize> = (0..events.len())
                .filter(|&j| j != i && events[j].group_id == group)
                .collect();
            if mates.is_empty() {
                return false;
            }
            let j = mates[rng.usize(..mates.len())];
            let (day, pair) = (events[i].day_of_week, events[i].pair_index);
            events[i].day_of_week = events[j].day_of_week;
            events[i].pair_index = events[j].pair_index;
            events[j].day_of_week = day;
            events[j].pair_index = pair;
            true
        }
        MutationOp::AddLesson => match generator.synthesize(rng, events) {
            Some(ev) => {
                events.push(ev);
                true
            }
            None => false,
        },
        MutationOp::RemoveLesson => {
            let i = rng.usize(..events.len());
            events.remove(i);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::*;

    fn data() -> DataService {
        Snapshot {
            student_groups: vec![
                StudentGroup { id: 1, name: "A".into(), students_count: 10, course_number: 1 },
                StudentGroup { id: 2, name: "B".into(), students_count: 10, course_number: 1 },
            ],
            classrooms: vec![Classroom { id: 1, name: "R".into(), capacity: 30 }],
            teaching_assignments: vec![TeachingAssignment {
                teacher_id: 1,
                group_id: 1,
                subject_id: 1,
                speciality_code: String::new(),
                course_number: 1,
                lecture_hours: 28,
                practice_hours: 0,
                lab_hours: 0,
                seminar_hours: 0,
            }],
            ..Default::default()
        }
        .into()
    }

    fn ev(group: u64, day: DayOfWeek, pair: usize) -> WeeklyEvent {
        WeeklyEvent {
            title: "T".into(),
            day_of_week: day,
            pair_index: pair,
            group_id: group,
            teacher_id: 1,
            subject_id: 1,
            classroom_id: 1,
            lesson_type: LessonType::Lecture,
        }
    }

    #[test]
    fn test_swap_exchanges_cells_within_group() {
        let data = data();
        let gen = CandidateGenerator::new(&data, 14);
        let mut rng = Rng::with_seed(5);
        let mut events = vec![ev(1, DayOfWeek::Monday, 0), ev(1, DayOfWeek::Friday, 3)];
        assert!(apply(MutationOp::SwapWithinGroup, &mut rng, &mut events, &gen));
        assert_eq!((events[0].day_of_week, events[0].pair_index), (DayOfWeek::Friday, 3));
        assert_eq!((events[1].day_of_week, events[1].pair_index), (DayOfWeek::Monday, 0));
    }

    #[test]
    fn test_swap_needs_a_group_mate() {
        let data = data();
        let gen = CandidateGenerator::new(&data, 14);
        let mut rng = Rng::with_seed(5);
        let mut events = vec![ev(1, DayOfWeek::Monday, 0), ev(2, DayOfWeek::Friday, 3)];
        let before = events.clone();
        assert!(!apply(MutationOp::SwapWithinGroup, &mut rng, &mut events, &gen));
        assert_eq!(events, before);
    }

    #[test]
    fn test_add_and_remove() {
        let data = data();
        let gen = CandidateGenerator::new(&data, 14);
        let mut rng = Rng::with_seed(2);
        let mut events = vec![ev(1, DayOfWeek::Monday, 0)];

        assert!(apply(MutationOp::AddLesson, &mut rng, &mut events, &gen));
        assert_eq!(events.len(), 2);
        assert_ne!(
            (events[1].day_of_week, events[1].pair_index),
            (DayOfWeek::Monday, 0)
        );

        assert!(apply(MutationOp::RemoveLesson, &mut rng, &mut events, &gen));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_rerolls_stay_on_working_days() {
        let data = data();
        let gen = CandidateGenerator::new(&data, 14);
        let mut rng = Rng::with_seed(8);
        let mut events = vec![ev(1, DayOfWeek::Monday, 0)];
        for _ in 0..50 {
            apply(MutationOp::RerollDay, &mut rng, &mut events, &gen);
            apply(MutationOp::RerollPair, &mut rng, &mut events, &gen);
            assert!(events[0].day_of_week.is_working_day());
            assert!(events[0].pair_index < PAIR_COUNT);
        }
    }

    #[test]
    fn test_empty_schedule_only_grows() {
        let data = data();
        let gen = CandidateGenerator::new(&data, 14);
        let mut rng = Rng::with_seed(4);
        let mut events = Vec::new();
        assert!(!apply(MutationOp::RemoveLesson, &mut rng, &mut events, &gen));
        assert!(apply(MutationOp::AddLesson, &mut rng, &mut events, &gen));
    }
}
