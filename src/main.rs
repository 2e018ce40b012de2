//! SalesReport - batch sales analysis
//!
//! Loads a delimited sales file, aggregates revenue by region, product
//! and month, prints a summary and saves a four-panel chart image.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Any load, analysis, configuration or rendering error

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    init_logging(&args);

    info!("SalesReport v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_report(&args) {
        error!("Report failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .salesreport.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, aggregate and report.
fn run_report(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(args)?;
    config.merge_with_args(args);

    // Step 1: Load the transaction table
    let input = config.input_path();
    let table = loader::load_sales_data(&input, &config.load_options()?)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    // Step 2: Aggregate
    let results = analysis::analyze_sales(&table).context("Failed to analyze sales data")?;

    // Step 3: Print the summary
    let summary = match config.report.format {
        OutputFormat::Text => report::render_summary(&results, &config.report_options()),
        OutputFormat::Json => report::render_json(&results)?,
    };
    println!("{}", summary);

    // Step 4: Charts
    if config.chart.enabled {
        let chart_options = config.chart_options()?;
        let units = analysis::units_by_product(&table);
        report::render_charts(&results, &units, &chart_options)
            .with_context(|| format!("Failed to save {}", chart_options.output.display()))?;
        info!("Chart saved to {}", chart_options.output.display());

        if config.chart.show {
            report::show_image(&chart_options.output);
        }
    } else {
        debug!("Chart rendering disabled");
    }

    info!(
        "Report complete in {:.2}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", DEFAULT_CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
