use crate::reports;
use clap::Args;
use classforge::api;
use classforge::config::Config;
use classforge::domain::{DataService, SemesterId};
use classforge::error::SchedResult;
use classforge::optimizer::{GenerationStats, ProgressCallback};
use classforge::scorer::Scorer;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: Config,

    #[arg(short, long)]
    pub semester: SemesterId,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,

    /// Write the winning weekly schedule as JSON.
    #[arg(long)]
    pub weekly_out: Option<PathBuf>,

    /// Write the dated occurrences as CSV.
    #[arg(long)]
    pub events_out: Option<PathBuf>,
}

struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_generation(&self, stats: &GenerationStats) {
        println!(
            "   Gen {:>3} | Best: {:>10.2} | Mean: {:>10.2} | Events: {}",
            stats.generation, stats.best_fitness, stats.mean_fitness, stats.events_in_best
        );
    }
}

pub fn run(args: GenerateArgs, data: &DataService, config: &Config) -> SchedResult<()> {
    println!(
        "\n🧬 Evolving semester {} (population {}, {} generations)",
        args.semester, config.ga.population_size, config.ga.generations
    );

    let run =
        api::run_schedule_with_progress(data, args.semester, config, args.seed, &ConsoleProgress)?;
    let winner = run.winner();

    reports::print_weekly_grid(&winner.events, data);
    let scorer = Scorer::new(config.weights.clone(), run.weeks);
    reports::print_score_report(&scorer.score_details(&winner.events, data));
    reports::print_run_summary(&run.result.history, &run.result.dropped);
    reports::print_shortfalls(&run.shortfalls, data);

    if let Some(path) = &args.weekly_out {
        winner.save_to_file(path)?;
        println!("💾 Weekly schedule written to {}", path.display());
    }

    if let Some(path) = &args.events_out {
        let dated = api::expand_run(&run);
        let mut wtr = csv::Writer::from_path(path)?;
        for ev in &dated {
            wtr.serialize(ev)?;
        }
        wtr.flush()?;
        println!("💾 {} dated events written to {}", dated.len(), path.display());
    }

    Ok(())
}
