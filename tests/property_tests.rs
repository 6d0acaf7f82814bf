mod common;

use classforge::constraints::{check, repair};
use classforge::domain::{DataService, DayOfWeek, LessonType, PreferenceKind};
use classforge::expand::expand;
use classforge::optimizer::CandidateGenerator;
use classforge::schedule::WeeklyEvent;
use classforge::slots::{PAIR_COUNT, WORKING_DAYS};
use common::{semester_start, Fixture};
use proptest::prelude::*;

fn universe() -> DataService {
    let mut f = Fixture::new()
        .subject(1, "Algebra")
        .subject(2, "Databases")
        .room(1, 20)
        .room(2, 40)
        .room(3, 8);
    for t in 1..=3 {
        f = f.teacher(t, 16);
    }
    for g in 1..=3 {
        f = f
            .group(g, 10 * g as u32 + 5)
            .lectures(g, g, 1, 28)
            .assignment(1, g, 2, LessonType::Lab, 28);
    }
    f.preference(2, DayOfWeek::Wednesday, 4, PreferenceKind::RequiredFree)
        .build()
}

const LESSON_TYPES: [LessonType; 4] = [
    LessonType::Lecture,
    LessonType::Practice,
    LessonType::Lab,
    LessonType::Seminar,
];

prop_compose! {
    fn arb_event()(
        teacher in 1u64..=3,
        group in 1u64..=3,
        subject in 1u64..=2,
        room in 1u64..=3,
        lt in 0usize..4,
        day in 0usize..5,
        pair in 0usize..PAIR_COUNT,
    ) -> WeeklyEvent {
        WeeklyEvent {
            title: format!("S{}", subject),
            day_of_week: WORKING_DAYS[day],
            pair_index: pair,
            group_id: group,
            teacher_id: teacher,
            subject_id: subject,
            classroom_id: room,
            lesson_type: LESSON_TYPES[lt],
        }
    }
}

proptest! {
    #[test]
    fn prop_repair_output_is_conflict_free(events in proptest::collection::vec(arb_event(), 0..40)) {
        let data = universe();
        let n = events.len();
        let out = repair(events.clone(), &data);

        prop_assert!(check(&out.events, &data).is_empty());
        prop_assert_eq!(out.events.len() + out.dropped.len(), n);

        // Events that were already clean survive untouched, in order, at the front.
        let conflicts = check(&events, &data);
        let clean: Vec<_> = events
            .iter()
            .enumerate()
            .filter(|(i, _)| !conflicts.iter().any(|c| c.index == *i))
            .map(|(_, ev)| ev.clone())
            .collect();
        prop_assert_eq!(&out.events[..clean.len()], &clean[..]);
    }

    #[test]
    fn prop_generated_and_repaired_candidate_is_feasible(seed in any::<u64>()) {
        let data = universe();
        let generator = CandidateGenerator::new(&data, 14);
        let mut rng = fastrand::Rng::with_seed(seed);
        let generated = generator.generate(&mut rng);
        let out = repair(generated.events, &data);
        prop_assert!(check(&out.events, &data).is_empty());
    }

    #[test]
    fn prop_expansion_count(
        events in proptest::collection::vec(arb_event(), 0..10),
        weeks in 1i64..20,
    ) {
        let start = semester_start();
        let end = start + chrono::Duration::days(7 * weeks - 1);
        let out = expand(&events, start, end);
        prop_assert_eq!(out.len(), 2 * events.len() * weeks as usize);
    }
}
