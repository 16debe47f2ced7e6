//! Binary entry point.
//!
//! Wires the CLI surface to the scan engine: argument parsing, tracing
//! init, Ctrl-C cancellation, the progress display, and exit-code
//! mapping. Completion and operator cancellation both exit 0; invalid
//! input and resolution failure exit 1.

use anyhow::Context;
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::process::ExitCode;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;
use trawl::cli::Args;
use trawl::output;
use trawl::scanner::{ProgressEvent, ScanEngine, ScanOptions};
use trawl::types::PortSpec;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    anyhow::ensure!(args.timeout > 0.0, "timeout must be positive");
    let spec: PortSpec = args.ports.parse().context("invalid port specification")?;

    let options = ScanOptions {
        timeout: Duration::from_secs_f64(args.timeout),
        workers: args.workers.max(1),
        grab_banners: !args.no_banner,
    };
    let workers = options.workers;

    let mut engine = ScanEngine::new(options);
    let events = engine.progress_events();

    // Ctrl-C stops dispatch; the partial report still prints.
    let cancel = engine.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            output::print_warning("interrupt received, collecting partial results...");
            cancel.cancel();
        }
    });

    let display = tokio::spawn(drive_progress(events, workers, args.quiet));

    let result = engine.execute(&args.target, spec).await;
    drop(engine); // closes the progress channel so the display task ends
    let _ = display.await;

    let report = result?;
    output::print_report(&report, args.show_closed)?;

    if let Some(path) = &args.output {
        match output::export_json(&report, path) {
            Ok(()) => output::print_success(&format!("results saved to {}", path.display())),
            Err(e) => {
                output::print_warning(&format!("could not write {}: {}", path.display(), e))
            }
        }
    }

    Ok(())
}

/// Consume engine progress events: a progress bar plus one line per open
/// port, routed through the bar so they never interleave.
async fn drive_progress(
    mut events: UnboundedReceiver<ProgressEvent>,
    workers: usize,
    quiet: bool,
) {
    let mut bar: Option<ProgressBar> = None;

    while let Some(event) = events.recv().await {
        match event {
            ProgressEvent::Started { target, total } => {
                if quiet {
                    continue;
                }
                output::print_scan_header(
                    &target.original,
                    &target.ip.to_string(),
                    total,
                    workers.min(total),
                );
                let pb = ProgressBar::new(total as u64);
                pb.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                        .unwrap()
                        .progress_chars("=>-"),
                );
                bar = Some(pb);
            }
            ProgressEvent::PortDone { port, open } => {
                if let Some(pb) = &bar {
                    pb.inc(1);
                    if open {
                        pb.println(format!(
                            "{} port {}/tcp open",
                            style("[+]").green().bold(),
                            port
                        ));
                    }
                }
            }
            ProgressEvent::Finished => {
                if let Some(pb) = bar.take() {
                    pb.finish_and_clear();
                }
                break;
            }
        }
    }
}
