use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use pacer::config;
use pacer::observer::LogObserver;
use pacer::progress::Progress;

/// Track a simulated workload; progress goes to the pacer log.
#[derive(Debug, Parser)]
#[command(name = "pacer-demo")]
#[command(about = "Simulated workload tracked with pacer", long_about = None)]
struct Args {
    /// Number of work units to simulate.
    #[arg(long, default_value = "100")]
    total: i64,

    /// Delay per unit in milliseconds.
    #[arg(long, default_value = "50", value_name = "MS")]
    step_ms: u64,

    /// Override the configured number of retained buckets.
    #[arg(long)]
    window: Option<usize>,

    /// Override the configured bucket width in seconds.
    #[arg(long, value_name = "SECS")]
    delta_secs: Option<f64>,
}

fn main() {
    // Initialize logging as early as possible.
    pacer::logging::init();

    if let Err(err) = run(Args::parse()) {
        eprintln!("pacer-demo error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut cfg = config::load_or_init()?;
    if let Some(window) = args.window {
        cfg.sma_window = window;
    }
    if let Some(delta) = args.delta_secs {
        cfg.sma_delta_secs = delta;
    }
    cfg.validate()?;

    let label = cfg
        .labels
        .get("name")
        .cloned()
        .unwrap_or_else(|| "demo".to_string());
    let mut progress = Progress::with_observer(&cfg, args.total, Box::new(LogObserver::new(label)));

    progress.begin();
    for _ in 0..args.total {
        thread::sleep(Duration::from_millis(args.step_ms));
        progress.observe(1);
    }
    progress.end();

    println!(
        "done: {} units in {:?} ({:.1} units/sec, {:.1}%)",
        progress.index(),
        progress.elapsed(),
        progress.average_rate(),
        progress.percent()
    );
    Ok(())
}
