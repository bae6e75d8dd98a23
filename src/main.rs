//! aep-demo entry point: CLI wiring, logging, and dispatch to a headless run or the TUI.
//!
//! Exit codes:
//!   0 - run succeeded (or the TUI was closed normally)
//!   1 - configuration or runtime error
//!   2 - the AEP run failed

use std::fs::File;
use std::path::Path;
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow, bail};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use aep_demo::cli::Args;
use aep_demo::client::{AepBackend, HttpBackend};
use aep_demo::config::ClientConfig;
use aep_demo::io::export::export_csv;
use aep_demo::report::render_report;
use aep_demo::view::{AnalysisView, LOADING_HINT, LOADING_TEXT};

fn main() {
    let args = Args::parse_args();

    if let Err(e) = init_logging(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}

/// Installs the global subscriber once, before anything logs.
///
/// The TUI owns the terminal, so it only logs when `--log-file` is given.
fn init_logging(args: &Args) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(args.log_level()).into())
        .from_env_lossy();
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    if let Some(ref path) = args.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file \"{}\"", path.display()))?;
        builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| anyhow!(e))
    } else if args.tui {
        Ok(())
    } else {
        builder
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| anyhow!(e))
    }
}

fn load_config(args: &Args) -> Result<ClientConfig> {
    let mut config = match args.config {
        Some(ref path) => ClientConfig::from_toml_file(path)?,
        None => ClientConfig::default(),
    };
    config.merge_with_args(args);

    let errors = config.validate();
    if !errors.is_empty() {
        let joined: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!(joined.join("\n"));
    }
    Ok(config)
}

fn run(args: &Args) -> Result<i32> {
    let config = load_config(args)?;
    info!("aep-demo v{}", env!("CARGO_PKG_VERSION"));

    let backend = HttpBackend::new(&config.server).context("cannot create HTTP client")?;
    let rt = tokio::runtime::Runtime::new().context("cannot create tokio runtime")?;

    if args.tui {
        return run_tui(&config, backend, rt);
    }

    rt.block_on(run_headless(&backend, config.export.path.as_deref()))
}

#[cfg(feature = "tui")]
fn run_tui(
    config: &ClientConfig,
    backend: HttpBackend,
    rt: tokio::runtime::Runtime,
) -> Result<i32> {
    let result = aep_demo::tui::run(
        std::sync::Arc::new(backend),
        rt.handle().clone(),
        config.ui.tick_ms,
        config.export.path.clone(),
    );
    // Abandon any in-flight request instead of waiting for it.
    rt.shutdown_background();
    result.context("TUI crashed")?;
    Ok(0)
}

#[cfg(not(feature = "tui"))]
fn run_tui(
    _config: &ClientConfig,
    _backend: HttpBackend,
    _rt: tokio::runtime::Runtime,
) -> Result<i32> {
    bail!("--tui requires a build with the `tui` feature")
}

/// Performs one run, prints the report, and optionally exports the distribution.
async fn run_headless(backend: &HttpBackend, export: Option<&Path>) -> Result<i32> {
    let mut view = AnalysisView::new();
    view.begin_run();
    eprintln!("{LOADING_TEXT}\n{LOADING_HINT}");

    let outcome = backend.run_aep().await;
    view.complete(outcome);
    println!("{}", render_report(&view.model()));

    let Some(result) = view.result() else {
        return Ok(2);
    };
    if let Some(path) = export {
        export_csv(result, path)
            .with_context(|| format!("failed to export to \"{}\"", path.display()))?;
        eprintln!("Distribution written to {}", path.display());
    }
    Ok(0)
}
