//! CLI entry point for the bikeshare explorer.
//!
//! Provides an interactive exploration session plus a one-shot `stats`
//! subcommand for scripted use.

mod shell;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use bikeshare_explorer::config::CityData;
use bikeshare_explorer::loader;
use bikeshare_explorer::output;
use bikeshare_explorer::stats::{DurationStats, StationStats, TimeStats, UserStats};

#[derive(Parser)]
#[command(name = "bikeshare_explorer")]
#[command(about = "A tool to explore US bikeshare trip data", long_about = None)]
struct Cli {
    /// Directory containing the city CSV files
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive exploration session
    Explore,
    /// Print statistics for one city and filter combination, then exit
    Stats {
        /// City to analyze (Chicago, New York, or Washington)
        #[arg(value_name = "CITY")]
        city: String,

        /// Month name or abbreviation to filter by, or "all"
        #[arg(short, long, default_value = "all")]
        month: String,

        /// Weekday name or abbreviation to filter by, or "all"
        #[arg(short = 'w', long, default_value = "all")]
        day: String,

        /// Emit the reports as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/bikeshare_explorer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikeshare_explorer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("warn".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = CityData::new(&cli.data_dir);

    match cli.command {
        Commands::Explore => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            shell::run(&config, &mut stdin.lock(), &mut stdout.lock())?;
        }
        Commands::Stats {
            city,
            month,
            day,
            json,
        } => {
            let selection = shell::selection_from_args(&city, &month, &day)?;
            let table = loader::load_and_filter(&config, &selection)?;
            info!(city = %selection.city, rows = table.len(), "Table loaded and filtered");

            let time = TimeStats::from_table(&table);
            let stations = StationStats::from_table(&table);
            let durations = DurationStats::from_table(&table);
            let users = UserStats::from_table(&table);

            if json {
                output::print_json(&time)?;
                output::print_json(&stations)?;
                output::print_json(&durations)?;
                output::print_json(&users)?;
            } else {
                println!("{}", output::render_time_stats(&time));
                println!("{}", output::render_station_stats(&stations));
                println!("{}", output::render_duration_stats(&durations));
                println!("{}", output::render_user_stats(&users));
            }
        }
    }

    Ok(())
}
