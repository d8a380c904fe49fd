use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use stress_test::config::HarnessConfig;
use stress_test::export;
use stress_test::metrics::analyze;
use stress_test::orchestrator::{Selection, StressOrchestrator, TestScenario};

#[derive(Parser, Debug)]
#[command(name = "stress_test")]
#[command(about = "Synthetic order load generator for the matching engine")]
struct Args {
    /// Scenario number (1-4) or `all`. Prompts when omitted.
    #[arg(short, long)]
    scenario: Option<String>,

    /// JSON harness config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory receiving the generated order files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seed for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Print each report as a single JSON line instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Analyze a previously saved order file and exit.
    #[arg(long)]
    analyze: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    stress_test::init_tracing().map_err(anyhow::Error::msg)?;

    if let Some(path) = &args.analyze {
        return analyze_file(path, args.json);
    }

    let mut config = match &args.config {
        Some(path) => HarnessConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => HarnessConfig::default(),
    };
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut orchestrator = StressOrchestrator::new(config)?;

    println!("=== Order Load Stress Test ===");
    println!("Available test scenarios:");
    for (i, scenario) in TestScenario::ALL.iter().enumerate() {
        println!("  {}. {}", i + 1, scenario);
    }

    let choice = match args.scenario {
        Some(choice) => choice,
        None => prompt("\nEnter scenario number (1-4) or 'all' to run all: ")?,
    };
    let selection = Selection::parse(&choice);
    if selection == Selection::Fallback {
        println!("Invalid choice. Running default quick test.");
    }

    let session = orchestrator.run_selection(selection)?;
    for run in &session.runs {
        println!("\n--- {} ---", run.result.scenario);
        if args.json {
            println!("{}", serde_json::to_string(&run.report)?);
        } else {
            print!("{}", run.report);
        }
    }

    let failed_writes = orchestrator.save_session(&session, selection == Selection::All);
    if failed_writes > 0 {
        tracing::warn!(failed_writes, "some order files were not written");
    }

    println!(
        "\nStress test completed! {} orders, {} errors.",
        session.total_orders(),
        orchestrator.total_errors()
    );
    Ok(())
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn analyze_file(path: &Path, json: bool) -> anyhow::Result<()> {
    let Some(orders) = export::load_orders(path) else {
        println!("No data available in {}", path.display());
        return Ok(());
    };

    // Saved files carry no timing, so throughput is not reported.
    let report = analyze(&orders, 0.0, 0);
    if json {
        println!("{}", serde_json::to_string(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
