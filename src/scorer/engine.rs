//! Raw soft-constraint measurements. Weighting happens in [`super::Scorer`].

use crate::domain::{DataService, DayOfWeek, GroupId, LessonType, PreferenceKind, SubjectId, TeacherId};
use crate::schedule::WeeklyEvent;
use crate::slots::{self, HOURS_PER_PAIR};
use std::collections::{BTreeMap, HashMap, HashSet};

pub type CoverageKey = (GroupId, SubjectId, LessonType);

/// Required vs. scheduled semester hours per (group, subject, lesson type).
///
/// Keys come from both sides: assignments with positive hours and any
/// scheduled event, so stray lessons count as over-coverage.
pub fn coverage_table(
    events: &[WeeklyEvent],
    data: &DataService,
    semester_weeks: u32,
) -> BTreeMap<CoverageKey, (u32, u32)> {
    let mut table: BTreeMap<CoverageKey, (u32, u32)> = BTreeMap::new();

    for ta in data.assignments() {
        for lt in ta.lesson_types() {
            let entry = table.entry((ta.group_id, ta.subject_id, lt)).or_default();
            entry.0 += ta.hours_for(lt);
        }
    }

    let per_occurrence = HOURS_PER_PAIR * semester_weeks;
    for ev in events {
        let entry = table
            .entry((ev.group_id, ev.subject_id, ev.lesson_type))
            .or_default();
        entry.1 += per_occurrence;
    }

    table
}

/// (under-coverage hours, over-coverage hours).
pub fn coverage_mismatch(events: &[WeeklyEvent], data: &DataService, semester_weeks: u32) -> (f64, f64) {
    coverage_table(events, data, semester_weeks)
        .values()
        .fold((0.0, 0.0), |(under, over), &(required, scheduled)| {
            if scheduled < required {
                (under + (required - scheduled) as f64, over)
            } else {
                (under, over + (scheduled - required) as f64)
            }
        })
}

fn gaps_by<K: std::hash::Hash + Eq>(events: &[WeeklyEvent], key: impl Fn(&WeeklyEvent) -> K) -> u32 {
    let mut days: HashMap<(K, DayOfWeek), Vec<usize>> = HashMap::new();
    for ev in events {
        days.entry((key(ev), ev.day_of_week))
            .or_default()
            .push(ev.pair_index);
    }

    let mut total = 0;
    for pairs in days.values_mut() {
        pairs.sort_unstable();
        for w in pairs.windows(2) {
            if w[1] > w[0] + 1 {
                total += (w[1] - w[0] - 1) as u32;
            }
        }
    }
    total
}

/// Idle pairs between lessons on the same day, for teachers.
pub fn teacher_gaps(events: &[WeeklyEvent]) -> u32 {
    gaps_by(events, |ev| ev.teacher_id)
}

/// Idle pairs between lessons on the same day, for groups.
pub fn group_gaps(events: &[WeeklyEvent]) -> u32 {
    gaps_by(events, |ev| ev.group_id)
}

/// Weekly hours above each teacher's limit, summed.
pub fn overload_hours(events: &[WeeklyEvent], data: &DataService) -> u32 {
    let mut weekly: HashMap<TeacherId, u32> = HashMap::new();
    for ev in events {
        *weekly.entry(ev.teacher_id).or_insert(0) += HOURS_PER_PAIR;
    }

    weekly
        .iter()
        .filter_map(|(id, &hours)| {
            data.teacher(*id)
                .map(|t| hours.saturating_sub(t.max_hours_per_week))
        })
        .sum()
}

/// (PREFERRED_FREE slots that are taught, PREFERRED_BUSY slots that are idle).
pub fn preference_misses(events: &[WeeklyEvent], data: &DataService) -> (u32, u32) {
    let busy: HashSet<(TeacherId, DayOfWeek, usize)> = events
        .iter()
        .map(|ev| (ev.teacher_id, ev.day_of_week, ev.pair_index))
        .collect();

    let mut free_hits = 0;
    let mut busy_misses = 0;
    for pref in data.preferences() {
        let Some(pair) = slots::slot_to_pair(pref.time_slot_index) else {
            continue;
        };
        let taught = busy.contains(&(pref.teacher_id, pref.day_of_week, pair));
        match pref.preference {
            PreferenceKind::PreferredFree if taught => free_hits += 1,
            PreferenceKind::PreferredBusy if !taught => busy_misses += 1,
            _ => {}
        }
    }
    (free_hits, busy_misses)
}

/// Sum of `threshold - group/capacity` over events below the threshold.
pub fn utilization_shortfall(events: &[WeeklyEvent], data: &DataService, threshold: f64) -> f64 {
    events
        .iter()
        .filter_map(|ev| {
            let group = data.group(ev.group_id)?;
            let room = data.classroom(ev.classroom_id)?;
            if room.capacity == 0 {
                return None;
            }
            let utilization = group.students_count as f64 / room.capacity as f64;
            (utilization < threshold).then(|| threshold - utilization)
        })
        .sum()
}
