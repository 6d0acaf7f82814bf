use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use classforge::config::Config;
use classforge::domain::{DataService, Snapshot};
use std::path::PathBuf;
use std::process;
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Snapshot JSON with semesters, groups, teachers, classrooms and assignments.
    #[arg(global = true, short, long, default_value = "data/snapshot.json")]
    data: PathBuf,

    /// GA parameters and fitness weights (JSON). Explicit flags override it.
    #[arg(global = true, long)]
    config: Option<PathBuf>,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Generate(cmd::generate::GenerateArgs),
    Validate(cmd::validate::ValidateArgs),
}

fn main() {
    // 1. Parse Raw Matches (to distinguish user input from defaults)
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // 2. Load Snapshot
    println!("📂 Loading snapshot: {}", cli.data.display());
    let data = match Snapshot::load_from_file(&cli.data) {
        Ok(snapshot) => DataService::from(snapshot),
        Err(e) => {
            eprintln!("❌ {}", e);
            process::exit(1);
        }
    };

    // 3. Resolve Config: JSON base, explicit CLI flags on top
    let cli_config = match &cli.command {
        Commands::Generate(args) => &args.config,
        Commands::Validate(args) => &args.config,
    };
    let sub_matches = matches.subcommand().map(|(_, m)| m).unwrap_or(&matches);

    let config = match &cli.config {
        Some(path) => {
            println!("⚖️  Loading config from: {}", path.display());
            match Config::load_from_file(path) {
                Ok(mut file_config) => {
                    file_config.merge_from_cli(cli_config, sub_matches);
                    file_config
                }
                Err(e) => {
                    eprintln!("❌ {}", e);
                    process::exit(1);
                }
            }
        }
        None => cli_config.clone(),
    };

    // 4. Execute
    let outcome = match cli.command {
        Commands::Generate(args) => cmd::generate::run(args, &data, &config).map(|_| 0),
        Commands::Validate(args) => {
            cmd::validate::run(args, &data, &config).map(|clean| if clean { 0 } else { 2 })
        }
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("\n❌ {}", e);
            process::exit(1);
        }
    }
}
