use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crossword_fetch::config::{
    default_config_path, find_config_file, load_config, save_config, Config, LogFormat,
};
use crossword_fetch::estimator::{today_utc, Estimate};
use crossword_fetch::extract::extract_traced;
use crossword_fetch::models::Direction;
use crossword_fetch::service::{PuzzleRequest, PuzzleService};
use crossword_fetch::ui::{print_attempts, print_catalog, print_status, Status};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Crossword Fetch - Find and extract Guardian crossword puzzles
#[derive(Parser, Debug)]
#[command(name = "crossword-fetch")]
#[command(version = crossword_fetch::VERSION)]
#[command(about = "Find and extract Guardian crossword puzzles", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch a puzzle and print it as JSON
    #[command(alias = "f")]
    Fetch {
        /// Puzzle type (default from config: quick)
        #[arg(long = "type", short = 't')]
        puzzle_type: Option<String>,

        /// Explicit edition number (default: estimated for today)
        #[arg(long, short)]
        number: Option<String>,

        /// Number of editions to try before giving up
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        max_attempts: Option<u32>,
    },

    /// Print the estimated edition number for a date
    #[command(alias = "e")]
    Estimate {
        /// Puzzle type (default from config: quick)
        #[arg(long = "type", short = 't')]
        puzzle_type: Option<String>,

        /// Date to estimate for, YYYY-MM-DD (default: today, UTC)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Extract puzzle JSON from a saved HTML page
    #[command(alias = "x")]
    Extract {
        /// HTML file to read
        file: PathBuf,

        /// Puzzle type the page is expected to hold
        #[arg(long = "type", short = 't', default_value = "quick")]
        puzzle_type: String,
    },

    /// List known puzzle types with today's estimates
    Types {
        /// Date to estimate for, YYYY-MM-DD (default: today, UTC)
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },

    /// Write a default configuration file
    ConfigInit {
        /// Where to write it (default: the platform config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).with_context(|| match &config_path {
        Some(path) => format!("Failed to load config from {}", path.display()),
        None => "Failed to load config from environment".to_string(),
    })?;

    init_tracing(&cli, &config);

    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    match cli.command {
        Commands::Fetch {
            puzzle_type,
            number,
            max_attempts,
        } => {
            if let Some(max_attempts) = max_attempts {
                config.search.max_attempts = max_attempts;
            }

            let service = PuzzleService::from_config(&config)?;
            let request = PuzzleRequest::new(puzzle_type.as_deref(), number.as_deref());
            let response = service.handle(&request).await;

            if cli.verbose > 0 {
                print_attempts(&response.attempts);
            }
            println!("{}", response.body_text(cli.pretty));

            if response.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }

        Commands::Estimate { puzzle_type, date } => {
            let catalog = config.catalog()?;
            let name = puzzle_type.unwrap_or_else(|| config.puzzles.default_type.clone());
            let today = date.unwrap_or_else(today_utc);

            if catalog.get(&name).is_none() && !cli.quiet {
                print_status(
                    Status::Warning,
                    &format!(
                        "Unknown puzzle type '{}', using '{}' numbering",
                        name,
                        catalog.default_type().name
                    ),
                );
            }

            println!("{}", catalog.estimate(&name, today));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Extract { file, puzzle_type } => {
            let html = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;

            match extract_traced(&html, &puzzle_type) {
                Ok(extraction) => {
                    if !cli.quiet {
                        let entries = extraction.record.entries();
                        let across = entries
                            .iter()
                            .filter(|e| e.direction() == Some(Direction::Across))
                            .count();
                        let down = entries
                            .iter()
                            .filter(|e| e.direction() == Some(Direction::Down))
                            .count();
                        print_status(
                            Status::Success,
                            &format!(
                                "{} entries ({} across, {} down) via pattern {}",
                                entries.len(),
                                across,
                                down,
                                extraction.pattern.name()
                            ),
                        );
                    }
                    println!("{}", render(&serde_json::to_value(&extraction.record)?, cli.pretty));
                    Ok(ExitCode::SUCCESS)
                }
                Err(err) => {
                    println!("{}", render(&json!({ "error": err.to_string() }), cli.pretty));
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Types { date } => {
            let catalog = config.catalog()?;
            print_catalog(&catalog, date.unwrap_or_else(today_utc));
            Ok(ExitCode::SUCCESS)
        }

        Commands::ConfigInit { path, force } => {
            let path = path
                .or_else(default_config_path)
                .context("Could not determine a config directory; pass a path")?;

            if path.exists() && !force {
                print_status(
                    Status::Error,
                    &format!("{} already exists (use --force to overwrite)", path.display()),
                );
                return Ok(ExitCode::FAILURE);
            }

            save_config(&Config::default(), &path)?;
            if !cli.quiet {
                print_status(
                    Status::Success,
                    &format!("Wrote default config to {}", path.display()),
                );
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initialize tracing: `RUST_LOG` wins, then the verbosity flags, then the config.
/// Logs go to stderr so stdout carries only JSON.
fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crossword_fetch={}", level)));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

fn render(value: &serde_json::Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|_| value.to_string())
}
