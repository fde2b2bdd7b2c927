use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ogmap_core::status::ALL_STATUSES;
use ogmap_fetch::{Fetcher, Source, ALL_HIGHSCORE_TYPES};
use ogmap_report::ReportSummary;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use tracing::{error, info, warn};

mod config;

use config::GenerateArgs;

#[derive(Parser, Debug)]
#[command(name = "ogmapctl", version, about = "Build a planet map report from the players, universe and highscore feeds")]
struct Cli {
    /// Output format for the run summary and listings
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output { Human, Json }

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch the feeds, filter players and write the sorted planet list
    Generate(GenerateArgs),
    /// List known player status tokens
    Statuses,
    /// List highscore types usable with --highscore-type
    HighscoreTypes,
}

fn init_tracing() {
    let env = std::env::var("OGMAP_LOG").unwrap_or_else(|_| "info".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env).unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_writer(std::io::stderr).init();
}

/// Stage counters rendered in Prometheus text format to `OGMAP_METRICS_FILE`
/// when the run ends.
struct MetricsDump {
    path: PathBuf,
    handle: PrometheusHandle,
}

impl MetricsDump {
    fn write(&self) {
        match std::fs::write(&self.path, self.handle.render()) {
            Ok(()) => info!(file = %self.path.display(), "metrics written"),
            Err(e) => warn!(error = %e, file = %self.path.display(), "failed to write metrics"),
        }
    }
}

fn init_metrics() -> Option<MetricsDump> {
    let path = PathBuf::from(std::env::var_os("OGMAP_METRICS_FILE")?);
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(MetricsDump { path, handle }),
        Err(e) => {
            warn!(error = %e, "failed to install metrics recorder");
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();
    let metrics = init_metrics();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => {
            let code = run_generate(&args, cli.output).await;
            if let Some(m) = &metrics {
                m.write();
            }
            return Ok(code);
        }
        Commands::Statuses => match cli.output {
            Output::Human => {
                for s in ALL_STATUSES {
                    println!("{:<4} {}", s.token(), s.label());
                }
            }
            Output::Json => {
                #[derive(Serialize)]
                struct Row { token: &'static str, label: &'static str }
                let rows: Vec<_> = ALL_STATUSES.iter().map(|s| Row { token: s.token(), label: s.label() }).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        },
        Commands::HighscoreTypes => match cli.output {
            Output::Human => {
                for t in ALL_HIGHSCORE_TYPES {
                    println!("{}: {}", t.code(), t.label());
                }
            }
            Output::Json => {
                #[derive(Serialize)]
                struct Row { code: u8, label: &'static str }
                let rows: Vec<_> = ALL_HIGHSCORE_TYPES.iter().map(|t| Row { code: t.code(), label: t.label() }).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// The failure is logged here and turned into the exit status, so it is not
/// printed a second time by `main`.
async fn run_generate(args: &GenerateArgs, output: Output) -> ExitCode {
    match generate(args, output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "report generation failed");
            ExitCode::FAILURE
        }
    }
}

async fn generate(args: &GenerateArgs, output: Output) -> Result<()> {
    let filter = config::filter_config(args)?;
    let sources = config::sources(args, filter.score_filter_active())?;
    info!(
        excluded = ?filter.excluded_statuses.as_slice(),
        min_score = ?filter.min_score,
        systems_only = filter.systems_only,
        "generate invoked"
    );

    // Same order as the feeds are consumed: ranking first.
    let fetcher = Fetcher::new(config::http_timeout());
    let highscore_xml = match &sources.highscore {
        Some(src) => Some(load(&fetcher, "highscore", src).await?),
        None => None,
    };
    let players_xml = load(&fetcher, "players", &sources.players).await?;
    let planets_xml = load(&fetcher, "planets", &sources.planets).await?;

    let (rows, summary) = ogmap_report::build_rows(&players_xml, &planets_xml, highscore_xml.as_deref(), &filter)?;
    write_report(&args.out, &ogmap_report::render(&rows))?;

    info!("processing completed");
    if !summary.systems_only {
        info!(players = summary.player_count, "found active players");
    }
    info!(rows = summary.row_count, file = %args.out.display(), "recorded unique rows");
    print_summary(&summary, &args.out, output)
}

async fn load(fetcher: &Fetcher, role: &str, source: &Source) -> Result<String> {
    info!(source = %source, "loading {} data", role);
    fetcher.load(source).await.with_context(|| format!("loading {} feed", role))
}

/// The report is fully rendered before the file is touched, so a failed run
/// never leaves a partial file behind.
fn write_report(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text).with_context(|| format!("writing report to {}", path.display()))
}

fn print_summary(summary: &ReportSummary, out: &Path, output: Output) -> Result<()> {
    match output {
        Output::Human => {
            println!("Processing completed:");
            if !summary.systems_only {
                println!("- Found {} active players", summary.player_count);
            }
            println!("- Recorded {} unique rows to {}", summary.row_count, out.display());
            if summary.malformed_coords > 0 {
                println!("- Skipped {} planets with malformed coordinates", summary.malformed_coords);
            }
        }
        Output::Json => {
            #[derive(Serialize)]
            struct Done<'a> { output: String, #[serde(flatten)] summary: &'a ReportSummary }
            println!("{}", serde_json::to_string_pretty(&Done { output: out.display().to_string(), summary })?);
        }
    }
    Ok(())
}
