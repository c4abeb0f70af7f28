use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fabdrift::{CheckEngine, ConfigDrift, ContainerlabAdapter, DriftDetector, EvidenceClient, IntentLoader, IntentValidator, RunMode, RunSummary, Snapshot};
use fabdrift::{ResultTableRow, render_lines, write_json_report, write_markdown_report};
use tabled::{Table, settings::Style};

#[derive(Parser)]
#[command(name = "fabdrift")]
#[command(about = "Intent-driven validation and drift detection for EVPN/VXLAN fabrics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Repository root holding one directory per lab
    #[arg(short, long, env = "FABDRIFT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Directory for reports when no explicit path is given
    #[arg(long, env = "FABDRIFT_ARTIFACTS", default_value = "artifacts")]
    artifacts: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the declared checks against a running lab
    Validate {
        /// Lab name (directory under the root)
        #[arg(short, long)]
        lab: String,

        /// Phase to run: intent, underlay, control-plane, dataplane or all
        #[arg(short, long, default_value = "all")]
        mode: String,

        /// JSON report path (default: <artifacts>/<lab>-validate.json)
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Markdown report path (default: <artifacts>/<lab>-validate.md)
        #[arg(long)]
        md_out: Option<PathBuf>,

        /// Console output format
        #[arg(short, long, default_value = "lines")]
        output: OutputFormat,
    },

    /// Collect an operational snapshot and save it as a baseline
    Baseline {
        /// Lab name
        #[arg(short, long)]
        lab: String,

        /// Where to write the snapshot
        #[arg(long)]
        out: PathBuf,
    },

    /// Compare the live lab against a saved baseline
    Drift {
        /// Lab name
        #[arg(short, long)]
        lab: String,

        /// Baseline snapshot to compare against
        #[arg(long)]
        baseline: PathBuf,

        /// JSON report path (default: <artifacts>/<lab>-drift.json)
        #[arg(long)]
        json_out: Option<PathBuf>,

        /// Markdown report path (default: <artifacts>/<lab>-drift.md)
        #[arg(long)]
        md_out: Option<PathBuf>,

        /// Print desired vs. running config diffs for changed nodes
        #[arg(long)]
        show_diff: bool,
    },

    /// Show a lab's inventory and declared checks
    List {
        /// Lab name
        #[arg(short, long)]
        lab: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Lines,
    Table,
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("fabdrift=debug,info")
    } else {
        EnvFilter::new("fabdrift=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{} {}", "✗ Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<u8, Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { lab, mode, json_out, md_out, output } => {
            let json_path = json_out.unwrap_or_else(|| cli.artifacts.join(format!("{}-validate.json", lab)));
            let md_path = md_out.unwrap_or_else(|| cli.artifacts.join(format!("{}-validate.md", lab)));
            cmd_validate(&cli.root, &lab, &mode, &json_path, &md_path, output).await
        }

        Commands::Baseline { lab, out } => {
            cmd_baseline(&cli.root, &lab, &out).await?;
            Ok(0)
        }

        Commands::Drift { lab, baseline, json_out, md_out, show_diff } => {
            let json_path = json_out.unwrap_or_else(|| cli.artifacts.join(format!("{}-drift.json", lab)));
            let md_path = md_out.unwrap_or_else(|| cli.artifacts.join(format!("{}-drift.md", lab)));
            cmd_drift(&cli.root, &lab, &baseline, &json_path, &md_path, show_diff).await
        }

        Commands::List { lab } => {
            cmd_list(&cli.root, &lab)?;
            Ok(0)
        }
    }
}

async fn cmd_validate(
    root: &Path,
    lab: &str,
    mode: &str,
    json_path: &Path,
    md_path: &Path,
    output: OutputFormat,
) -> Result<u8, Box<dyn std::error::Error>> {
    let mode: RunMode = mode.parse()?;
    let intent = IntentLoader::new().load_lab(root, lab)?;

    for warning in IntentValidator::validate(&intent).warnings {
        warn!("[{}] {}", warning.code, warning.message);
    }

    let adapter = ContainerlabAdapter::new(root, lab)?;
    let mut engine = CheckEngine::new(&intent, &adapter, EvidenceClient::for_telemetry(&intent.telemetry));
    info!("Validating {} (run {})", lab, engine.run_id());
    let summary = engine.run(mode).await;

    print_summary(&summary, output)?;

    let report = summary.to_report();
    write_json_report(&report, json_path)?;
    write_markdown_report(&report, &format!("{} validation", lab), md_path)?;
    eprintln!("Reports: {}, {}", json_path.display(), md_path.display());

    Ok(summary.exit_code() as u8)
}

async fn cmd_baseline(root: &Path, lab: &str, out: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let intent = IntentLoader::new().load_lab(root, lab)?;
    let adapter = ContainerlabAdapter::new(root, lab)?;
    let mut detector = DriftDetector::new(&intent, &adapter, EvidenceClient::for_telemetry(&intent.telemetry));

    let snapshot = detector.collect_snapshot().await?;
    snapshot.save(out)?;

    println!("{} Baseline saved: {} ({} nodes)", "✓".green(), out.display(), snapshot.fingerprints.len());
    Ok(())
}

async fn cmd_drift(
    root: &Path,
    lab: &str,
    baseline_path: &Path,
    json_path: &Path,
    md_path: &Path,
    show_diff: bool,
) -> Result<u8, Box<dyn std::error::Error>> {
    let baseline = Snapshot::load(baseline_path)?;
    let intent = IntentLoader::new().load_lab(root, lab)?;
    let adapter = ContainerlabAdapter::new(root, lab)?;
    let mut detector = DriftDetector::new(&intent, &adapter, EvidenceClient::for_telemetry(&intent.telemetry));

    let outcome = detector.detect(&baseline).await?;

    if baseline.intent_hash != outcome.current.intent_hash {
        println!("{} intent changed since the baseline was taken", "⚠".yellow());
    }

    for line in render_lines(&outcome.summary) {
        println!("{}", line);
    }
    for entry in &outcome.state_diffs {
        println!("  {} {}", entry.kind.as_str(), entry.path);
    }
    for drift in &outcome.config_drift {
        println!("  {}", drift.describe());
    }

    if show_diff {
        for drift in &outcome.config_drift {
            if let ConfigDrift::Changed { node, .. } = drift {
                println!();
                println!("{}", detector.render_config_diff(node).await?);
            }
        }
    }

    let report = outcome.to_report()?;
    write_json_report(&report, json_path)?;
    write_markdown_report(&report, &format!("{} drift", lab), md_path)?;
    println!("Exit code: {}", outcome.summary.exit_code());
    eprintln!("Reports: {}, {}", json_path.display(), md_path.display());

    Ok(outcome.summary.exit_code() as u8)
}

fn cmd_list(root: &Path, lab: &str) -> Result<(), Box<dyn std::error::Error>> {
    let intent = IntentLoader::new().load_lab(root, lab)?;

    println!("Lab: {}", intent.lab_name);
    println!("\nInventory ({} nodes):", intent.inventory.len());
    for (name, node) in &intent.inventory.nodes {
        let roles: Vec<&str> = node.roles.iter().map(String::as_str).collect();
        let groups: Vec<&str> = node.groups.iter().map(String::as_str).collect();
        println!("  {:<12} roles=[{}] groups=[{}]", name, roles.join(", "), groups.join(", "));
    }

    println!("\nChecks ({}):", intent.checks.len());
    for check in &intent.checks {
        let marker = if check.kind.is_supported() { "✓".green() } else { "✗".red() };
        println!("  {} {:<28} {:<14} {:<20} {}", marker, check.name, check.phase.as_str(), check.kind.as_str(), check.severity);
    }

    let lint = IntentValidator::validate(&intent);
    if lint.has_warnings() {
        println!();
        for warning in &lint.warnings {
            println!("  {} [{}] {}", "⚠".yellow(), warning.code, warning.message);
        }
    }

    Ok(())
}

fn print_summary(summary: &RunSummary, output: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&summary.to_report())?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary.to_report())?);
        }
        OutputFormat::Table => {
            let rows: Vec<ResultTableRow> = summary.results.iter().map(ResultTableRow::from).collect();
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
            print_counts(summary);
        }
        OutputFormat::Lines => {
            for line in render_lines(summary) {
                println!("{}", line);
            }
            print_counts(summary);
        }
    }
    Ok(())
}

fn print_counts(summary: &RunSummary) {
    let counts: Vec<String> = summary
        .counts_by_status()
        .iter()
        .map(|(status, n)| format!("{} {}", n, status))
        .collect();
    println!("\nSummary: {}", counts.join(", "));

    if summary.has_errors() {
        println!("{} Exit code: {}", "✗".red(), summary.exit_code());
    } else {
        println!("{} Exit code: {}", "✓".green(), summary.exit_code());
    }
}
