mod common;

use classforge::api::{generate_semester, run_schedule};
use classforge::config::{Config, FitnessWeights, GaParams};
use classforge::constraints::{check, Violation};
use classforge::domain::{DataService, DayOfWeek, LessonType, PreferenceKind};
use classforge::error::SchedulerError;
use classforge::optimizer::{GeneticEngine, SilentProgress};
use classforge::schedule::WeeklyEvent;
use classforge::slots::{PAIR_COUNT, WORKING_DAYS};
use common::{Fixture, SEMESTER};
use std::collections::HashMap;

fn config(population_size: usize, generations: usize) -> Config {
    Config {
        ga: GaParams {
            population_size,
            generations,
            ..Default::default()
        },
        weights: FitnessWeights::default(),
    }
}

fn two_assignments() -> DataService {
    Fixture::new()
        .subject(1, "Algebra")
        .subject(2, "Geometry")
        .teacher(1, 20)
        .teacher(2, 20)
        .group(1, 25)
        .group(2, 25)
        .room(1, 30)
        .lectures(1, 1, 1, 28)
        .lectures(2, 2, 2, 28)
        .build()
}

/// Several teachers sharing groups and rooms, with blocked slots.
fn busy_faculty() -> DataService {
    let mut f = Fixture::new()
        .subject(1, "Algebra")
        .subject(2, "Programming")
        .subject(3, "English")
        .room(1, 20)
        .room(2, 35)
        .room(3, 120);
    for t in 1..=3 {
        f = f.teacher(t, 12);
    }
    for g in 1..=4 {
        f = f.group(g, 15 + 5 * g as u32);
        f = f
            .assignment(1, g, 1, LessonType::Lecture, 56)
            .assignment(2, g, 2, LessonType::Lab, 28)
            .assignment(3, g, 3, LessonType::Practice, 28);
    }
    f.preference(1, DayOfWeek::Monday, 0, PreferenceKind::RequiredFree)
        .preference(1, DayOfWeek::Monday, 3, PreferenceKind::RequiredFree)
        .preference(2, DayOfWeek::Friday, 6, PreferenceKind::RequiredFree)
        .preference(3, DayOfWeek::Tuesday, 2, PreferenceKind::PreferredFree)
        .build()
}

fn assert_hard_constraints(events: &[WeeklyEvent], data: &DataService) {
    assert!(check(events, data).is_empty());

    let mut teacher_day: HashMap<_, usize> = HashMap::new();
    let mut group_day: HashMap<_, usize> = HashMap::new();
    let mut room_day: HashMap<_, usize> = HashMap::new();

    for ev in events {
        *teacher_day.entry((ev.teacher_id, ev.day_of_week)).or_default() += 1;
        *group_day.entry((ev.group_id, ev.day_of_week)).or_default() += 1;
        *room_day.entry((ev.classroom_id, ev.day_of_week)).or_default() += 1;

        assert!(WORKING_DAYS.contains(&ev.day_of_week));
        assert!(ev.pair_index < PAIR_COUNT);

        let room = data.classroom(ev.classroom_id).unwrap();
        let group = data.group(ev.group_id).unwrap();
        assert!(room.capacity >= group.students_count);

        assert!(!data.is_required_free(ev.teacher_id, ev.day_of_week, ev.pair_index));

        let qualified = data.assignments().iter().any(|ta| {
            ta.teacher_id == ev.teacher_id
                && ta.group_id == ev.group_id
                && ta.subject_id == ev.subject_id
                && ta.hours_for(ev.lesson_type) > 0
        });
        assert!(qualified, "{:?}", ev);
    }

    for counts in [&teacher_day, &group_day, &room_day] {
        assert!(counts.values().all(|&n| n <= PAIR_COUNT));
    }
}

#[test]
fn test_two_assignments_both_get_a_weekly_pair() {
    let data = two_assignments();
    for seed in [1, 42, 2024] {
        let run = run_schedule(&data, SEMESTER, &config(20, 10), Some(seed)).unwrap();
        assert_eq!(run.weeks, 14);

        let mut counts: HashMap<_, usize> = HashMap::new();
        for ev in &run.result.best.events {
            *counts.entry((ev.group_id, ev.subject_id, ev.lesson_type)).or_default() += 1;
        }
        assert!(counts[&(1, 1, LessonType::Lecture)] > 0);
        assert!(counts[&(2, 2, LessonType::Lecture)] > 0);
        assert_hard_constraints(&run.result.best.events, &data);
    }
}

#[test]
fn test_final_schedule_respects_hard_constraints() {
    let data = busy_faculty();
    let run = run_schedule(&data, SEMESTER, &config(16, 8), Some(7)).unwrap();
    assert!(!run.result.best.events.is_empty());
    assert_hard_constraints(&run.result.best.events, &data);
}

#[test]
fn test_same_seed_same_result() {
    let data = busy_faculty();
    let a = run_schedule(&data, SEMESTER, &config(10, 5), Some(99)).unwrap();
    let b = run_schedule(&data, SEMESTER, &config(10, 5), Some(99)).unwrap();
    assert_eq!(a.result.best.events, b.result.best.events);
    assert_eq!(a.result.history, b.result.history);
}

#[test]
fn test_history_covers_every_generation() {
    let data = two_assignments();
    let run = run_schedule(&data, SEMESTER, &config(6, 4), Some(3)).unwrap();
    let gens: Vec<_> = run.result.history.iter().map(|s| s.generation).collect();
    assert_eq!(gens, vec![0, 1, 2, 3, 4]);
    let last = run.result.history.last().unwrap();
    assert_eq!(last.best_fitness, run.result.best.fitness.unwrap());
    assert!(run.result.history.iter().all(|s| s.best_fitness >= s.mean_fitness));
    assert!(run.result.best_ever.is_none());
}

#[test]
fn test_best_ever_mode() {
    let data = busy_faculty();
    let mut cfg = config(8, 6);
    cfg.ga.track_best_ever = true;
    cfg.ga.mutation_rate = 1.0;

    let run = run_schedule(&data, SEMESTER, &cfg, Some(11)).unwrap();
    let best_ever = run.result.best_ever.as_ref().unwrap();
    let peak = run
        .result
        .history
        .iter()
        .map(|s| s.best_fitness)
        .fold(f64::NEG_INFINITY, f64::max);

    assert_eq!(best_ever.fitness.unwrap(), peak);
    assert!(best_ever.fitness.unwrap() >= run.result.best.fitness.unwrap());
    assert_eq!(run.winner().events, best_ever.events);
    assert_hard_constraints(&best_ever.events, &data);
}

#[test]
fn test_unplaceable_lessons_are_reported() {
    // Teacher 1 is blocked on every slot of the week.
    let mut f = Fixture::new()
        .subject(1, "Algebra")
        .teacher(1, 20)
        .group(1, 25)
        .room(1, 30)
        .lectures(1, 1, 1, 28);
    for &day in &WORKING_DAYS {
        for slot in 0..8 {
            f = f.preference(1, day, slot, PreferenceKind::RequiredFree);
        }
    }
    let data = f.build();

    let run = run_schedule(&data, SEMESTER, &config(4, 2), Some(5)).unwrap();
    assert!(run.result.best.events.is_empty());
    assert!(run.result.dropped.by_violation[&Violation::RequiredFree] >= 4);
    assert_eq!(run.shortfalls.len(), 1);
    assert_eq!(run.shortfalls[0].missing_hours(), 28);
}

#[test]
fn test_generate_semester_expands_winner() {
    let data = two_assignments();
    let (run, dated) = generate_semester(&data, SEMESTER, &config(10, 3), Some(8)).unwrap();
    assert_eq!(dated.len(), 2 * run.result.best.events.len() * 14);
}

#[test]
fn test_unknown_semester() {
    let data = two_assignments();
    let err = run_schedule(&data, 404, &config(4, 1), Some(1)).unwrap_err();
    assert!(matches!(err, SchedulerError::SemesterNotFound(404)));
}

#[test]
fn test_oversized_group_fails_before_search() {
    let data = Fixture::new()
        .teacher(1, 20)
        .group(1, 25)
        .group(2, 300)
        .group(3, 500)
        .room(1, 30)
        .lectures(1, 1, 1, 28)
        .build();
    let err = run_schedule(&data, SEMESTER, &config(4, 1), Some(1)).unwrap_err();
    match &err {
        SchedulerError::NoClassroomFits { groups } => assert_eq!(groups, &vec![2, 3]),
        other => panic!("unexpected error: {}", other),
    }
    assert!(err.to_string().contains("2, 3"));
}

#[test]
fn test_invalid_config_rejected() {
    let data = two_assignments();
    assert!(matches!(
        run_schedule(&data, SEMESTER, &config(0, 1), None),
        Err(SchedulerError::InvalidConfig(_))
    ));
    assert!(GeneticEngine::new(
        &data,
        GaParams {
            crossover_rate: 2.0,
            ..Default::default()
        },
        FitnessWeights::default(),
        14,
        None
    )
    .is_err());
}

#[test]
fn test_engine_without_seed_still_feasible() {
    let data = two_assignments();
    let mut engine = GeneticEngine::new(
        &data,
        GaParams {
            population_size: 6,
            generations: 3,
            ..Default::default()
        },
        FitnessWeights::default(),
        14,
        None,
    )
    .unwrap();
    let result = engine.run(&SilentProgress);
    assert_hard_constraints(&result.best.events, &data);
}
