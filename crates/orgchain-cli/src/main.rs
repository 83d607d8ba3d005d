//! Orgchain binary
//!
//! Resolves unit supervisors from a JSON employee file and writes the
//! result as JSON to stdout. Logs go to stderr.

use orgchain_hierarchy::HierarchyIndex;
use orgchain_resolve::{execute, parse_records, Error, JsonSink, ModeSelection, ResultSink, RunConfig};
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_usage() {
    eprintln!("orgchain - Resolve unit supervisors from employee records");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  orgchain <employees.json> [mode]");
    eprintln!();
    eprintln!("Modes:");
    eprintln!("  promotion   Majority vote with level promotion");
    eprintln!("  chain       Direct-manager chain walking");
    eprintln!("  both        Run both and report divergences (default)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  ORGCHAIN_MODE       Mode when none is given on the command line");
    eprintln!("  ORGCHAIN_PARALLEL   Resolve units in parallel (default: false)");
    eprintln!("  ORGCHAIN_TRACE      Include a per-unit trace (default: false)");
    eprintln!("  ORGCHAIN_EMPLOYEES  Include employee chains and unit paths (default: false)");
    eprintln!("  ORGCHAIN_BUDGET_MS  Abort if the run takes longer (default: none)");
    eprintln!("  RUST_LOG            Log filter (default: orgchain=info)");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orgchain=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(path) = args.get(1) else {
        print_usage();
        std::process::exit(2);
    };

    let mut config = RunConfig::from_env()?;
    if let Some(mode) = args.get(2) {
        let modes: ModeSelection = mode.parse().map_err(|_| Error::InvalidConfig {
            key: "mode",
            value: mode.clone(),
        })?;
        config = config.with_modes(modes);
    }

    // Records are loaded in full before resolution starts
    let bytes = tokio::fs::read(path).await.map_err(Error::from)?;
    let index = Arc::new(HierarchyIndex::new(parse_records(&bytes)?));
    info!(
        path = %path,
        employees = index.len(),
        snapshot = %index.snapshot().short(),
        "Loaded records"
    );

    let task = tokio::task::spawn_blocking({
        let index = Arc::clone(&index);
        let config = config.clone();
        move || execute(&index, &config)
    });
    let report = match config.budget {
        Some(budget) => tokio::time::timeout(budget, task)
            .await
            .map_err(|_| Error::BudgetExceeded(budget))??,
        None => task.await?,
    };

    let mut sink = JsonSink::new(std::io::stdout().lock()).pretty();
    sink.accept(&report)?;

    Ok(())
}
