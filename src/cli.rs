//! CLI definition and dispatch.

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report::HtmlReportAdapter;
use crate::domain::config_validation::{build_run_config, resolve_data_root, RunConfig};
use crate::domain::dashboard::Dashboard;
use crate::domain::error::SectorboardError;
use crate::domain::universe::validate_universe;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "sectorboard",
    about = "Return, volatility and sector statistics dashboard for per-ticker price CSVs"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compute statistics and write the HTML dashboard
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        sectors: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List tickers under the data root and whether they are usable
    Tickers {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
    /// Serve the dashboard over HTTP
    Serve {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(long)]
        sectors: Option<PathBuf>,
    },
}

pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // A second initialisation (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Report {
            config,
            data_dir,
            sectors,
            output,
        } => run_report(
            &config,
            data_dir.as_deref(),
            sectors.as_deref(),
            output.as_deref(),
        ),
        Command::Tickers { config, data_dir } => run_tickers(&config, data_dir.as_deref()),
        Command::Serve {
            config,
            data_dir,
            sectors,
        } => run_serve(&config, data_dir.as_deref(), sectors.as_deref()),
    }
}

fn report_error(err: &SectorboardError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SectorboardError> {
    tracing::info!("loading config from {}", path.display());
    FileConfigAdapter::from_file(path).map_err(|e| SectorboardError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn path_str(path: Option<&Path>) -> Option<String> {
    path.map(|p| p.display().to_string())
}

pub fn resolve_run_config(
    config_path: &Path,
    data_dir: Option<&Path>,
    sectors: Option<&Path>,
    output: Option<&Path>,
) -> Result<RunConfig, SectorboardError> {
    let adapter = load_config(config_path)?;
    build_run_config(
        &adapter,
        path_str(data_dir).as_deref(),
        path_str(sectors).as_deref(),
        path_str(output).as_deref(),
    )
}

/// Builds the dashboard, failing when no ticker survives validation.
pub fn build_dashboard(data_port: &dyn DataPort, root: &str) -> Result<Dashboard, SectorboardError> {
    let dashboard = Dashboard::build(data_port)?;
    if dashboard.is_empty() {
        return Err(SectorboardError::NoTickers {
            root: root.to_string(),
        });
    }
    Ok(dashboard)
}

pub fn print_summary(dashboard: &Dashboard) {
    let summary = &dashboard.summary;
    eprintln!("\n=== Summary ===");
    eprintln!("Tickers:          {}", summary.ticker_count);
    eprintln!("Green / Red:      {} / {}", summary.green, summary.red);
    eprintln!("Average Price:    {:.2}", summary.avg_price);
    eprintln!("Average Volume:   {:.0}", summary.avg_volume);
    if !dashboard.skipped.is_empty() {
        eprintln!("Skipped:          {}", dashboard.skipped.len());
    }

    if !summary.top_gainers.is_empty() {
        eprintln!("\n=== Top Gainers ===");
        for r in summary.top_gainers.iter().take(5) {
            eprintln!("  {:<8} {:>8.2}%", r.ticker, r.value);
        }
        eprintln!("\n=== Top Losers ===");
        for r in summary.top_losers.iter().take(5) {
            eprintln!("  {:<8} {:>8.2}%", r.ticker, r.value);
        }
    }
}

pub fn run_report_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    run_config: &RunConfig,
) -> Result<Dashboard, SectorboardError> {
    let dashboard = build_dashboard(data_port, &run_config.data_root)?;
    print_summary(&dashboard);

    let output = Path::new(&run_config.output);
    report_port.write(&dashboard, output)?;
    eprintln!("\nDashboard written to: {}", output.display());
    Ok(dashboard)
}

fn run_report(
    config_path: &Path,
    data_dir: Option<&Path>,
    sectors: Option<&Path>,
    output: Option<&Path>,
) -> ExitCode {
    let run_config = match resolve_run_config(config_path, data_dir, sectors, output) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };

    let data_port = CsvAdapter::new(&run_config.data_root, &run_config.sector_map);
    let report_port = HtmlReportAdapter::new(&run_config.title);

    match run_report_pipeline(&data_port, &report_port, &run_config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

fn run_tickers(config_path: &Path, data_dir: Option<&Path>) -> ExitCode {
    let root = match load_config(config_path)
        .and_then(|c| resolve_data_root(&c, path_str(data_dir).as_deref()))
    {
        Ok(r) => r,
        Err(e) => return report_error(&e),
    };

    // Listing never touches the sector map.
    let data_port = CsvAdapter::new(&root, PathBuf::new());
    let validation = match validate_universe(&data_port) {
        Ok(v) => v,
        Err(e) => return report_error(&e),
    };

    for series in &validation.series {
        println!("{}\t{} rows", series.ticker, series.len());
    }
    for skipped in &validation.skipped {
        println!("{}\tskipped ({})", skipped.ticker, skipped.reason);
    }
    eprintln!(
        "{} usable, {} skipped",
        validation.series.len(),
        validation.skipped.len()
    );
    ExitCode::SUCCESS
}

fn run_serve(config_path: &Path, data_dir: Option<&Path>, sectors: Option<&Path>) -> ExitCode {
    #[cfg(feature = "web")]
    {
        use crate::adapters::web::{build_router, AppState};
        use crate::domain::config_validation::validate_listen_addr;

        let adapter = match load_config(config_path) {
            Ok(a) => a,
            Err(e) => return report_error(&e),
        };
        let run_config = match build_run_config(
            &adapter,
            path_str(data_dir).as_deref(),
            path_str(sectors).as_deref(),
            None,
        ) {
            Ok(c) => c,
            Err(e) => return report_error(&e),
        };
        let addr = match validate_listen_addr(&adapter) {
            Ok(a) => a,
            Err(e) => return report_error(&e),
        };

        let data_port = CsvAdapter::new(&run_config.data_root, &run_config.sector_map);
        let dashboard = match build_dashboard(&data_port, &run_config.data_root) {
            Ok(d) => d,
            Err(e) => return report_error(&e),
        };
        print_summary(&dashboard);

        let router = build_router(AppState {
            dashboard,
            title: run_config.title,
        });

        let runtime = match tokio::runtime::Runtime::new() {
            Ok(r) => r,
            Err(e) => return report_error(&SectorboardError::Io(e)),
        };

        tracing::info!("starting web server on {}", addr);
        let served = runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, router).await
        });

        match served {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report_error(&SectorboardError::Io(e)),
        }
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = (config_path, data_dir, sectors);
        eprintln!("error: web feature is required for serve");
        ExitCode::from(1)
    }
}
