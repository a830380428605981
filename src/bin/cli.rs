//! Persimmon CLI
//!
//! Command-line interface for Persimmon:
//! - Render a dashboard view in the terminal
//! - List the chooser option sets
//! - Check a running server's status
//! - Generate a default config file

use anyhow::Context;
use clap::{Parser, Subcommand};
use persimmon::config::Config;
use persimmon::dataset::{DatasetLoader, DatasetRow};
use persimmon::selection::{Selection, SelectionOptions};
use persimmon::session::{CorrelationPanel, DashboardSession, DashboardView};
use persimmon::view::{CellContent, ComparativeRow, PairPlot};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "persimmon-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Elective surgery vs. COVID statistics per state")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render the dashboard for a selection from local data files
    Show {
        /// State code, e.g. CA
        #[arg(short, long, default_value = "AK")]
        state: String,
        /// Age group, e.g. 50-64
        #[arg(short, long, default_value = "40-49")]
        age_group: String,
        /// Elective procedure, e.g. CATARACT
        #[arg(short, long, default_value = "CYSTOSCOPY")]
        elective: String,
        /// Data directory (default: from config)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },

    /// List the states, age groups and electives on offer
    Options,

    /// Show the status of a running server
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Show {
            state,
            age_group,
            elective,
            data_dir,
        } => {
            let mut dataset_config = Config::load_default().data.to_dataset_config();
            if let Some(dir) = data_dir {
                dataset_config.data_dir = dir;
            }

            let session = DashboardSession::new(Arc::new(DatasetLoader::new(dataset_config)));
            let selection = Selection::new(state, age_group, elective);

            // A missing dataset ends the session here with a non-zero exit
            let view = session.render(&selection).await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&view)?),
                _ => print_view(&view),
            }
        }

        Commands::Options => {
            let options = SelectionOptions::standard();

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&options)?),
                _ => {
                    println!("States:     {}", options.states.join(" "));
                    println!("Age groups: {}", options.age_groups.join(", "));
                    println!("Electives:  {}", options.electives.join(", "));
                }
            }
        }

        Commands::Status => {
            let client = reqwest::Client::new();
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Persimmon v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Data directory: {}",
                        health["data_dir"].as_str().unwrap_or("unknown")
                    );

                    if let Some(states) = health["cached_states"].as_array() {
                        let states: Vec<&str> = states.iter().filter_map(|s| s.as_str()).collect();
                        if states.is_empty() {
                            println!("Cached states: none");
                        } else {
                            println!("Cached states: {}", states.join(" "));
                        }
                    }

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    anyhow::bail!("API returned error: {}", resp.status());
                }
                Err(e) => {
                    eprintln!("Cannot connect to Persimmon API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin persimmon");
                    return Err(e.into());
                }
            }
        }

        Commands::Config { output } => {
            let config = persimmon::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)
                            .with_context(|| format!("creating {:?}", parent))?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("writing {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn print_view(view: &DashboardView) {
    println!("# {}", view.title);
    println!("> {}", view.tagline);
    println!();

    print_dataset_rows(&view.preview);
    println!();
    println!("[info] {}", view.status);
    println!();

    println!("## {}", view.patient.heading);
    println!("{}", view.patient.description);
    println!();
    println!("[success] {}", view.success);
    println!();

    println!(
        "{:<12} | {:>10} | {:>10} | {:>10}",
        "week", "patients", "physicians", "claims"
    );
    println!("{}", "-".repeat(51));
    if view.line_chart.is_empty() {
        println!("No data for this age group and elective");
    }
    for (i, week) in view.line_chart.weeks.iter().enumerate() {
        print!("{:<12}", week.format("%Y-%m-%d"));
        for series in &view.line_chart.series {
            print!(" | {:>10}", format_count(series.values[i]));
        }
        println!();
    }
    println!();

    if let (Some((cmin, cmax)), Some((pmin, pmax))) = (
        view.scatter_chart.size_domain(),
        view.scatter_chart.color_domain(),
    ) {
        println!(
            "Scatter: {} points, claims {}..{} (size), physicians {}..{} (colour)",
            view.scatter_chart.points.len(),
            cmin,
            cmax,
            pmin,
            pmax
        );
        println!();
    }

    println!("### {}", view.comparison_heading);
    println!("{}", view.comparison_note);
    println!();
    print_comparative_rows(&view.comparative_preview);
    println!();

    match &view.correlation {
        CorrelationPanel::Plot { plot } => print_correlations(plot),
        CorrelationPanel::Error { message } => println!("[error] {}", message),
    }
    println!();

    println!("## {}", view.clinician.heading);
    println!("{}", view.clinician.description);
    for bullet in &view.clinician.bullets {
        println!("  - {}", bullet);
    }
}

fn format_count(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

fn print_dataset_rows(rows: &[DatasetRow]) {
    println!(
        "{:<8} {:<24} {:<12} {:>10} {:>10} {:>10}",
        "age", "elective", "week", "patients", "physicians", "claims"
    );
    println!("{}", "-".repeat(79));
    for row in rows {
        println!(
            "{:<8} {:<24} {:<12} {:>10} {:>10} {:>10}",
            row.age,
            row.elective,
            row.week.format("%Y-%m-%d"),
            format_count(row.patients),
            format_count(row.physicians),
            format_count(row.claims)
        );
    }
}

fn print_comparative_rows(rows: &[ComparativeRow]) {
    if rows.is_empty() {
        println!("No overlapping weeks");
        return;
    }

    print!("{:<12}", "week");
    for column in persimmon::view::COMPARATIVE_COLUMNS {
        print!(" {:>19}", column);
    }
    println!();

    for row in rows {
        print!("{:<12}", row.week.format("%Y-%m-%d"));
        for value in row.values() {
            print!(" {:>19}", value);
        }
        println!();
    }
}

fn print_correlations(plot: &PairPlot) {
    println!("Pearson correlation ({} weeks)", plot.observations);

    print!("{:<20}", "");
    for column in &plot.columns {
        print!(" {:>9}", abbreviate(column));
    }
    println!();

    for (row, name) in plot.columns.iter().enumerate() {
        print!("{:<20}", name);
        for col in 0..plot.columns.len() {
            let cell = plot.cell(row, col).map(|c| &c.content);
            match cell {
                Some(CellContent::Joint { correlation, .. }) => print!(" {:>9.2}", correlation),
                Some(CellContent::Density { .. }) => print!(" {:>9}", "1.00"),
                _ => print!(" {:>9}", "-"),
            }
        }
        println!();
    }
}

/// "elective_physicians" -> "e_phys"
fn abbreviate(column: &str) -> String {
    match column.split_once('_') {
        Some((side, name)) => format!(
            "{}_{}",
            &side[..1],
            &name[..name.len().min(4)]
        ),
        None => column.to_string(),
    }
}
