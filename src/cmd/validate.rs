use crate::reports;
use clap::Args;
use classforge::api;
use classforge::config::Config;
use classforge::domain::{DataService, SemesterId};
use classforge::error::SchedResult;
use classforge::schedule::WeeklySchedule;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Cell, Color, Table};
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub semester: SemesterId,

    /// Weekly schedule JSON, as written by `generate --weekly-out`.
    #[arg(long)]
    pub schedule: PathBuf,
}

/// Returns true when the schedule has no hard-constraint conflicts.
pub fn run(args: ValidateArgs, data: &DataService, config: &Config) -> SchedResult<bool> {
    let schedule = WeeklySchedule::load_from_file(&args.schedule)?;
    println!(
        "\n🔎 === SCHEDULE AUDIT === {} ({} events)",
        args.schedule.display(),
        schedule.events.len()
    );

    let report = api::validate_schedule(data, args.semester, &schedule.events, config)?;

    reports::print_weekly_grid(&schedule.events, data);

    if report.is_feasible() {
        println!("\n✅ No hard-constraint conflicts.");
    } else {
        let mut table = Table::new();
        table.load_preset(ASCII_FULL);
        table.set_header(vec![Cell::new("#"), Cell::new("Event"), Cell::new("Rule").fg(Color::Red)]);
        for (index, rule) in &report.conflicts {
            let ev = &schedule.events[*index];
            table.add_row(vec![
                Cell::new(index),
                Cell::new(format!(
                    "{} {} pair {} (group {})",
                    ev.title,
                    ev.day_of_week.short_name(),
                    ev.pair_index + 1,
                    ev.group_id
                )),
                Cell::new(rule),
            ]);
        }
        println!("\n❌ {} conflict(s):\n{}", report.conflicts.len(), table);
    }

    reports::print_score_report(&report.score);
    reports::print_shortfalls(&report.shortfalls, data);

    Ok(report.is_feasible())
}
