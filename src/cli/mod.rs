//! CLI command definitions and handlers

mod init;
mod input;
mod output;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;

use teampulse::{
    analyze_network, analyze_team, build_network, compute_centrality, compute_three_es,
    detect_communities, load_config_file, load_engine_config, EngineConfig, ScoringWindow,
};

use input::TeamDataset;
use output::OutputFormat;

/// Parse a window boundary: RFC 3339 timestamp or a plain date (midnight UTC)
fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{}' is not an RFC 3339 timestamp or YYYY-MM-DD date", s))
}

/// Parse and validate window length in days (1-3650)
fn parse_days(s: &str) -> Result<i64, String> {
    let n: i64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n < 1 {
        Err("days must be at least 1".to_string())
    } else if n > 3650 {
        Err("days cannot exceed 3650".to_string())
    } else {
        Ok(n)
    }
}

/// TeamPulse - team collaboration health scoring
#[derive(Parser, Debug)]
#[command(name = "teampulse")]
#[command(
    version,
    about = "Team collaboration health: Energy, Engagement and Exploration scores plus communication network analysis",
    after_help = "\
Examples:
  teampulse init                                   Write a default teampulse.toml
  teampulse score team.json --days 14              Three E's for the last 14 days
  teampulse report team.json --start 2024-05-01 --end 2024-06-01 --format json
  teampulse communities team.json                  Sub-groups and silos"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        default_value = "warn",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub log_level: String,

    /// Engine config file (TOML or JSON). Default: teampulse.toml or
    /// .teampulserc.json next to the input file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Input file, window and output options shared by every analysis command
#[derive(Args, Debug)]
pub struct AnalysisArgs {
    /// JSON file with `members` and `communications`
    pub input: PathBuf,

    /// Window start, inclusive (RFC 3339 or YYYY-MM-DD). Default: END minus --days
    #[arg(long, value_parser = parse_timestamp)]
    pub start: Option<DateTime<Utc>>,

    /// Window end, exclusive (RFC 3339 or YYYY-MM-DD). Default: now
    #[arg(long, value_parser = parse_timestamp)]
    pub end: Option<DateTime<Utc>>,

    /// Window length when --start is not given
    #[arg(long, default_value = "30", value_parser = parse_days)]
    pub days: i64,

    /// Output format: text, json
    #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
    pub format: String,

    /// Output file path (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

impl AnalysisArgs {
    fn window(&self) -> Result<ScoringWindow> {
        let end = self.end.unwrap_or_else(Utc::now);
        let window = match self.start {
            Some(start) => ScoringWindow::new(start, end)?,
            None => ScoringWindow::last_days(end, self.days)?,
        };
        Ok(window)
    }

    fn format(&self) -> Result<OutputFormat> {
        self.format.parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a teampulse.toml with every default setting
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing teampulse.toml
        #[arg(long)]
        force: bool,
    },

    /// Energy, Engagement, Exploration and the overall score
    Score(AnalysisArgs),

    /// Density, connectivity and bottlenecks of the communication network
    Network(AnalysisArgs),

    /// Per-member centrality and connector / influencer / hub roles
    Centrality(AnalysisArgs),

    /// Sub-groups and silos
    Communities(AnalysisArgs),

    /// Everything above in one report
    Report(AnalysisArgs),
}

/// Explicit --config wins; otherwise look next to the input file
fn resolve_config(explicit: Option<&Path>, input: &Path) -> Result<EngineConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let dir = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            Ok(load_engine_config(dir))
        }
    }
}

/// Which analysis an analysis command runs
#[derive(Debug, Clone, Copy)]
enum Analysis {
    Score,
    Network,
    Centrality,
    Communities,
    Report,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let (analysis, args) = match &cli.command {
        Commands::Init { path, force } => return init::run(path, *force),
        Commands::Score(args) => (Analysis::Score, args),
        Commands::Network(args) => (Analysis::Network, args),
        Commands::Centrality(args) => (Analysis::Centrality, args),
        Commands::Communities(args) => (Analysis::Communities, args),
        Commands::Report(args) => (Analysis::Report, args),
    };

    let config = resolve_config(cli.config.as_deref(), &args.input)?;
    let dataset = TeamDataset::load(&args.input)?;
    let window = args.window()?;
    let format = args.format()?;
    debug!(
        "Running {:?} on {} members / {} communications in [{}, {})",
        analysis,
        dataset.members.len(),
        dataset.communications.len(),
        window.start,
        window.end
    );

    let members = &dataset.members;
    let comms = &dataset.communications;

    let rendered = match analysis {
        Analysis::Score => {
            let report = compute_three_es(members, comms, window, &config)
                .context("Scoring failed")?;
            output::render_three_es(&report, format)?
        }
        Analysis::Network => {
            let graph = build_network(members, comms, window, &config)?;
            let summary = analyze_network(&graph, &config).context("Network analysis failed")?;
            output::render_network(&summary, &graph, format)?
        }
        Analysis::Centrality => {
            let graph = build_network(members, comms, window, &config)?;
            let report =
                compute_centrality(&graph, &config).context("Centrality analysis failed")?;
            output::render_centrality(&report, format)?
        }
        Analysis::Communities => {
            let graph = build_network(members, comms, window, &config)?;
            let partition =
                detect_communities(&graph, &config).context("Community detection failed")?;
            output::render_communities(&partition, format)?
        }
        Analysis::Report => {
            let report =
                analyze_team(members, comms, window, &config).context("Team analysis failed")?;
            output::render_report(&report, format)?
        }
    };

    output::emit(&rendered, args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp_formats() {
        let date = parse_timestamp("2024-05-01").unwrap();
        assert_eq!(date.to_rfc3339(), "2024-05-01T00:00:00+00:00");

        let ts = parse_timestamp("2024-05-01T10:30:00+02:00").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T08:30:00+00:00");

        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_days_bounds() {
        assert_eq!(parse_days("14"), Ok(14));
        assert!(parse_days("0").is_err());
        assert!(parse_days("99999").is_err());
        assert!(parse_days("abc").is_err());
    }

    #[test]
    fn test_cli_parses_report_command() {
        let cli = Cli::try_parse_from([
            "teampulse",
            "report",
            "team.json",
            "--start",
            "2024-05-01",
            "--end",
            "2024-06-01",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Report(args) => {
                assert_eq!(args.format, "json");
                let window = args.window().unwrap();
                assert!((window.days() - 31.0).abs() < 1e-9);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_window_defaults_to_days() {
        let cli = Cli::try_parse_from([
            "teampulse", "score", "t.json", "--end", "2024-06-01", "--days", "7",
        ])
        .unwrap();
        let Commands::Score(args) = cli.command else {
            panic!("expected score");
        };
        assert!((args.window().unwrap().days() - 7.0).abs() < 1e-9);
    }
}
