pub mod engine;
pub mod types;

pub use self::types::{CoverageShortfall, ScoreDetails};

use crate::config::FitnessWeights;
use crate::domain::DataService;
use crate::schedule::{WeeklyEvent, WeeklySchedule};

/// Weighted multi-term fitness. Higher is better; a perfect schedule scores 0.
#[derive(Debug, Clone)]
pub struct Scorer {
    pub weights: FitnessWeights,
    pub semester_weeks: u32,
}

impl Scorer {
    pub fn new(weights: FitnessWeights, semester_weeks: u32) -> Self {
        Self {
            weights,
            semester_weeks: semester_weeks.max(1),
        }
    }

    pub fn score(&self, events: &[WeeklyEvent], data: &DataService) -> f64 {
        self.score_details(events, data).fitness
    }

    /// Scores the schedule and caches the result on it.
    pub fn evaluate(&self, schedule: &mut WeeklySchedule, data: &DataService) -> f64 {
        let fitness = self.score(&schedule.events, data);
        schedule.fitness = Some(fitness);
        fitness
    }

    /// Every term with its raw counter, for reports and tests.
    pub fn score_details(&self, events: &[WeeklyEvent], data: &DataService) -> ScoreDetails {
        let w = &self.weights;

        let (under, over) = engine::coverage_mismatch(events, data, self.semester_weeks);
        let teacher_gaps = engine::teacher_gaps(events);
        let group_gaps = engine::group_gaps(events);
        let overload = engine::overload_hours(events, data);
        let (free_hits, busy_misses) = engine::preference_misses(events, data);
        let shortfall = engine::utilization_shortfall(events, data, w.utilization_threshold);

        let coverage_penalty = under * w.weight_coverage_under + over * w.weight_coverage_over;
        let gap_penalty = (teacher_gaps + group_gaps) as f64 * w.weight_gap;
        let overload_penalty = overload as f64 * w.weight_overload;
        let preference_penalty =
            free_hits as f64 * w.weight_preferred_free + busy_misses as f64 * w.weight_preferred_busy;
        let utilization_penalty = shortfall * w.weight_utilization;

        let fitness = -(coverage_penalty
            + gap_penalty
            + overload_penalty
            + preference_penalty
            + utilization_penalty);

        ScoreDetails {
            fitness,
            coverage_penalty,
            gap_penalty,
            overload_penalty,
            preference_penalty,
            utilization_penalty,
            stat_under_hours: under,
            stat_over_hours: over,
            stat_teacher_gaps: teacher_gaps,
            stat_group_gaps: group_gaps,
            stat_overload_hours: overload,
            stat_preferred_free_hits: free_hits,
            stat_preferred_busy_misses: busy_misses,
            stat_utilization_shortfall: shortfall,
            stat_events: events.len(),
        }
    }
}

/// Lists every (group, subject, lesson type) scheduled below its required hours.
pub fn coverage_report(
    events: &[WeeklyEvent],
    data: &DataService,
    semester_weeks: u32,
) -> Vec<CoverageShortfall> {
    engine::coverage_table(events, data, semester_weeks.max(1))
        .into_iter()
        .filter(|(_, (required, scheduled))| scheduled < required)
        .map(|((group_id, subject_id, lesson_type), (required, scheduled))| CoverageShortfall {
            group_id,
            subject_id,
            lesson_type,
            required_hours: required,
            scheduled_hours: scheduled,
        })
        .collect()
}
