use crate::config::Config;
use crate::constraints::{self, Conflict};
use crate::domain::{DataService, Semester, SemesterId};
use crate::error::{SchedResult, SchedulerError};
use crate::expand;
use crate::optimizer::{EvolutionResult, GeneticEngine, ProgressCallback, SilentProgress};
use crate::schedule::{DatedEvent, WeeklyEvent, WeeklySchedule};
use crate::scorer::{self, CoverageShortfall, ScoreDetails, Scorer};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of one genetic run for a semester.
#[derive(Debug, Clone)]
pub struct ScheduleRun {
    pub semester: Semester,
    pub weeks: u32,
    pub result: EvolutionResult,
    /// Under-covered (group, subject, lesson type) rows of [`ScheduleRun::winner`].
    pub shortfalls: Vec<CoverageShortfall>,
}

impl ScheduleRun {
    /// The best-ever individual when it was tracked, else the final population's best.
    pub fn winner(&self) -> &WeeklySchedule {
        self.result.best_ever.as_ref().unwrap_or(&self.result.best)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub conflicts: Vec<(usize, String)>,
    pub score: ScoreDetails,
    pub shortfalls: Vec<CoverageShortfall>,
}

impl ValidationReport {
    pub fn is_feasible(&self) -> bool {
        self.conflicts.is_empty()
    }
}

fn resolve_semester(data: &DataService, semester_id: SemesterId) -> SchedResult<&Semester> {
    data.semester(semester_id)
        .ok_or(SchedulerError::SemesterNotFound(semester_id))
}

/// Fails fast when some group is larger than every classroom.
pub fn preflight(data: &DataService) -> SchedResult<()> {
    let groups = data.oversized_groups();
    if groups.is_empty() {
        Ok(())
    } else {
        warn!("Preflight failed: {} group(s) fit no classroom", groups.len());
        Err(SchedulerError::NoClassroomFits { groups })
    }
}

/// Service: evolve a weekly schedule for `semester_id`.
pub fn run_schedule(
    data: &DataService,
    semester_id: SemesterId,
    config: &Config,
    seed: Option<u64>,
) -> SchedResult<ScheduleRun> {
    run_schedule_with_progress(data, semester_id, config, seed, &SilentProgress)
}

pub fn run_schedule_with_progress<CB: ProgressCallback>(
    data: &DataService,
    semester_id: SemesterId,
    config: &Config,
    seed: Option<u64>,
    callback: &CB,
) -> SchedResult<ScheduleRun> {
    config.ga.validate()?;
    let semester = resolve_semester(data, semester_id)?.clone();
    preflight(data)?;

    let weeks = semester.weeks();
    info!(
        "Scheduling semester {} ({} weeks, {} assignments, population {}, {} generations)",
        semester.id,
        weeks,
        data.assignments().len(),
        config.ga.population_size,
        config.ga.generations
    );

    let mut engine = GeneticEngine::new(
        data,
        config.ga.clone(),
        config.weights.clone(),
        weeks,
        seed,
    )?;
    let result = engine.run(callback);

    let mut run = ScheduleRun {
        semester,
        weeks,
        result,
        shortfalls: Vec::new(),
    };
    run.shortfalls = scorer::coverage_report(&run.winner().events, data, weeks);
    if !run.shortfalls.is_empty() {
        warn!("{} lesson type(s) are under-covered", run.shortfalls.len());
    }
    Ok(run)
}

/// Service: evolve a schedule and project the winner onto the calendar.
pub fn generate_semester(
    data: &DataService,
    semester_id: SemesterId,
    config: &Config,
    seed: Option<u64>,
) -> SchedResult<(ScheduleRun, Vec<DatedEvent>)> {
    let run = run_schedule(data, semester_id, config, seed)?;
    let dated = expand_run(&run);
    info!("Expanded into {} dated occurrences", dated.len());
    Ok((run, dated))
}

pub fn expand_run(run: &ScheduleRun) -> Vec<DatedEvent> {
    expand::expand(
        &run.winner().events,
        run.semester.start_date,
        run.semester.end_date,
    )
}

/// Service: check and score an existing weekly schedule.
pub fn validate_schedule(
    data: &DataService,
    semester_id: SemesterId,
    events: &[WeeklyEvent],
    config: &Config,
) -> SchedResult<ValidationReport> {
    let weeks = resolve_semester(data, semester_id)?.weeks();
    let scorer = Scorer::new(config.weights.clone(), weeks);

    let conflicts = constraints::check(events, data)
        .into_iter()
        .map(|Conflict { index, violation }| (index, violation.to_string()))
        .collect();

    Ok(ValidationReport {
        conflicts,
        score: scorer.score_details(events, data),
        shortfalls: scorer::coverage_report(events, data, weeks),
    })
}
