use crate::domain::{ClassroomId, DayOfWeek, GroupId, LessonType, SubjectId, TeacherId};
use crate::error::SchedResult;
use crate::slots::PAIR_COUNT;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One weekly lesson occurrence: a (day, pair) cell bound to a group,
/// teacher, subject and classroom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEvent {
    pub title: String,
    pub day_of_week: DayOfWeek,
    pub pair_index: usize,
    pub group_id: GroupId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub classroom_id: ClassroomId,
    pub lesson_type: LessonType,
}

impl WeeklyEvent {
    /// Weekday and pair both fall inside the teaching week.
    pub fn is_on_week_grid(&self) -> bool {
        self.day_of_week.is_working_day() && self.pair_index < PAIR_COUNT
    }

    pub fn in_room(&self, classroom: ClassroomId) -> Self {
        Self {
            classroom_id: classroom,
            ..self.clone()
        }
    }
}

/// A candidate solution: the repeating weekly pattern plus its cached fitness.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeeklySchedule {
    pub events: Vec<WeeklyEvent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitness: Option<f64>,
}

impl WeeklySchedule {
    pub fn new(events: Vec<WeeklyEvent>) -> Self {
        Self {
            events,
            fitness: None,
        }
    }

    /// Replaces the event list and invalidates the cached fitness.
    pub fn set_events(&mut self, events: Vec<WeeklyEvent>) {
        self.events = events;
        self.fitness = None;
    }

    pub fn fitness_or_min(&self) -> f64 {
        self.fitness.unwrap_or(f64::NEG_INFINITY)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> SchedResult<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> SchedResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// A lesson occurrence pinned to a calendar date, ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatedEvent {
    pub title: String,
    pub day_of_week: DayOfWeek,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub group_id: GroupId,
    pub teacher_id: TeacherId,
    pub subject_id: SubjectId,
    pub classroom_id: ClassroomId,
    pub lesson_type: LessonType,
}
