//! Scanner module - the bounded-concurrency scan engine.
//!
//! A fixed pool of worker tasks drains one shared, ordered sequence of
//! ports. Each worker claims the next unscanned port from an atomic
//! cursor, probes it, and records the outcome in a shared map; no port is
//! ever probed twice and every port gets exactly one outcome. Completion
//! order across ports is unspecified.

pub mod probe;

pub use probe::{Probe, ProbeOutcome, TcpProber};

use crate::error::ScanError;
use crate::report::ScanReport;
use crate::types::{Port, PortSpec, Target};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Default connect timeout per port.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default worker pool size.
pub const DEFAULT_WORKERS: usize = 100;

/// Where the engine is in its lifecycle.
///
/// `Failed` is terminal and only reachable from `Resolving`; a failed
/// scan records zero outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Resolving,
    Running,
    Draining,
    Complete,
    Failed,
}

/// Notifications for the progress display.
///
/// One `PortDone` tick per completed port, in completion order. Purely
/// observational: the engine never waits on the receiver, and a dropped
/// receiver is ignored.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Started { target: Target, total: usize },
    PortDone { port: Port, open: bool },
    Finished,
}

/// Tuning for one scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Connect (and banner read) timeout per port.
    pub timeout: Duration,
    /// Upper bound on concurrent workers; the engine never spawns more
    /// workers than there are ports.
    pub workers: usize,
    /// Whether open ports get a banner read.
    pub grab_banners: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            workers: DEFAULT_WORKERS,
            grab_banners: true,
        }
    }
}

/// The scan engine.
///
/// Owns the worker pool for a scan and the cancellation token observers
/// use to stop it. One engine runs one scan; the report it returns
/// outlives it.
pub struct ScanEngine {
    options: ScanOptions,
    cancel: CancellationToken,
    progress: Option<mpsc::UnboundedSender<ProgressEvent>>,
}

impl ScanEngine {
    pub fn new(options: ScanOptions) -> Self {
        Self {
            options,
            cancel: CancellationToken::new(),
            progress: None,
        }
    }

    /// Token that stops dispatch of new ports when cancelled. In-flight
    /// probes are abandoned; outcomes already recorded are kept.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Subscribe the progress display. Call at most once, before
    /// [`execute`](Self::execute).
    pub fn progress_events(&mut self) -> mpsc::UnboundedReceiver<ProgressEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.progress = Some(tx);
        rx
    }

    /// Resolve the target and scan every port in the range.
    ///
    /// Returns the final report, partial if the scan was cancelled.
    /// Resolution failure is the only error path; no ports are probed in
    /// that case.
    pub async fn execute(&self, host: &str, spec: PortSpec) -> Result<ScanReport, ScanError> {
        tracing::debug!(phase = ?ScanPhase::Resolving, host, "resolving target");
        let target = match Target::resolve(host).await {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!(phase = ?ScanPhase::Failed, host, error = %e, "resolution failed");
                return Err(e.into());
            }
        };
        tracing::info!(target = %target, "target resolved");

        let prober = Arc::new(TcpProber::new(
            target.ip,
            self.options.timeout,
            self.options.grab_banners,
        ));
        self.run(target, spec, prober).await
    }

    /// Run the worker pool against an already resolved target.
    ///
    /// `execute` is the public path; tests drive this directly with
    /// scripted probers.
    pub async fn run(
        &self,
        target: Target,
        spec: PortSpec,
        prober: Arc<dyn Probe>,
    ) -> Result<ScanReport, ScanError> {
        let ports: Arc<Vec<Port>> = Arc::new(spec.iter().collect());
        let total = ports.len();
        let started_at = Utc::now();
        let clock = Instant::now();

        self.notify(ProgressEvent::Started {
            target: target.clone(),
            total,
        });

        let worker_count = self.options.workers.max(1).min(total);
        tracing::debug!(
            phase = ?ScanPhase::Running,
            total,
            workers = worker_count,
            "dispatching ports"
        );

        // The pending-port source: one atomic cursor into the ordered
        // vector. fetch_add hands each claim to exactly one worker.
        let cursor = Arc::new(AtomicUsize::new(0));
        let outcomes: Arc<Mutex<BTreeMap<u16, ProbeOutcome>>> =
            Arc::new(Mutex::new(BTreeMap::new()));
        let completed = Arc::new(AtomicUsize::new(0));

        let mut workers = JoinSet::new();
        for worker_id in 0..worker_count {
            let ports = Arc::clone(&ports);
            let cursor = Arc::clone(&cursor);
            let outcomes = Arc::clone(&outcomes);
            let completed = Arc::clone(&completed);
            let prober = Arc::clone(&prober);
            let cancel = self.cancel.clone();
            let progress = self.progress.clone();

            workers.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let index = cursor.fetch_add(1, Ordering::Relaxed);
                    let Some(port) = ports.get(index).copied() else {
                        break;
                    };

                    let outcome = tokio::select! {
                        _ = cancel.cancelled() => break,
                        outcome = prober.probe(port) => outcome,
                    };

                    let open = outcome.is_open();
                    outcomes.lock().await.insert(port.as_u16(), outcome);
                    completed.fetch_add(1, Ordering::Relaxed);
                    if let Some(tx) = &progress {
                        let _ = tx.send(ProgressEvent::PortDone { port, open });
                    }
                }
                tracing::trace!(worker = worker_id, "worker finished");
            });
        }

        tracing::debug!(phase = ?ScanPhase::Draining, "waiting for workers");
        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "scan worker aborted");
            }
        }

        let interrupted = self.cancel.is_cancelled();
        let outcomes = {
            let mut guard = outcomes.lock().await;
            std::mem::take(&mut *guard)
        };

        self.notify(ProgressEvent::Finished);
        tracing::debug!(
            phase = ?ScanPhase::Complete,
            interrupted,
            completed = completed.load(Ordering::Relaxed),
            "scan finished"
        );

        Ok(ScanReport::assemble(
            target,
            spec,
            outcomes,
            started_at,
            clock.elapsed(),
            interrupted,
        ))
    }

    fn notify(&self, event: ProgressEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }
}
