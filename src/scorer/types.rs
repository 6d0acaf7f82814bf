use crate::domain::{GroupId, LessonType, SubjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDetails {
    // Top-line
    pub fitness: f64,

    // Weighted penalties (each subtracted from zero)
    pub coverage_penalty: f64,
    pub gap_penalty: f64,
    pub overload_penalty: f64,
    pub preference_penalty: f64,
    pub utilization_penalty: f64,

    // === RAW COUNTERS ===
    pub stat_under_hours: f64,
    pub stat_over_hours: f64,
    pub stat_teacher_gaps: u32,
    pub stat_group_gaps: u32,
    pub stat_overload_hours: u32,
    pub stat_preferred_free_hits: u32,
    pub stat_preferred_busy_misses: u32,
    pub stat_utilization_shortfall: f64,
    pub stat_events: usize,
}

/// A (group, subject, lesson type) whose scheduled semester hours fall short.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageShortfall {
    pub group_id: GroupId,
    pub subject_id: SubjectId,
    pub lesson_type: LessonType,
    pub required_hours: u32,
    pub scheduled_hours: u32,
}

impl CoverageShortfall {
    pub fn missing_hours(&self) -> u32 {
        self.required_hours.saturating_sub(self.scheduled_hours)
    }
}
