//! Projects a weekly pattern onto the semester calendar.

use crate::domain::DayOfWeek;
use crate::schedule::{DatedEvent, WeeklyEvent};
use crate::slots::PAIR_SLOTS;
use chrono::NaiveDate;

/// Emits two dated occurrences (one per fine slot of the pair) for every
/// event on every matching working day in `start..=end`.
///
/// Pure: identical inputs yield identical output. Events with an
/// out-of-range pair index are skipped.
pub fn expand(events: &[WeeklyEvent], start: NaiveDate, end: NaiveDate) -> Vec<DatedEvent> {
    let mut out = Vec::new();

    for date in start.iter_days().take_while(|d| *d <= end) {
        let day = DayOfWeek::of(date);
        if !day.is_working_day() {
            continue;
        }

        for ev in events.iter().filter(|ev| ev.day_of_week == day) {
            let Some(pair) = PAIR_SLOTS.get(ev.pair_index) else {
                continue;
            };
            for slot in pair.fine_slots() {
                out.push(DatedEvent {
                    title: ev.title.clone(),
                    day_of_week: day,
                    start_time: date.and_time(slot.start_time()),
                    end_time: date.and_time(slot.end_time()),
                    group_id: ev.group_id,
                    teacher_id: ev.teacher_id,
                    subject_id: ev.subject_id,
                    classroom_id: ev.classroom_id,
                    lesson_type: ev.lesson_type,
                });
            }
        }
    }

    out
}
