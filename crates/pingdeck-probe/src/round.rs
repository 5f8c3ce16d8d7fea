use crate::parser::{is_total_loss, parse_reply_latency};
use crate::runner::PingRunner;
use anyhow::Result;
use pingdeck_model::{HostRecord, ProbeOutcome, ProbeTarget};
use std::sync::Arc;
use std::thread;

/// What one round learned, for pacing the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundReport {
    /// Slowest successful reply this round, if any host replied.
    pub slowest_reply_ms: Option<u64>,
}

/// Map a raw probe result onto an outcome. Nothing propagates past this
/// boundary: a runner failure is itself a classifiable result.
pub fn classify_probe(result: Result<String>) -> ProbeOutcome {
    match result {
        Ok(output) => {
            if let Some(ms) = parse_reply_latency(&output) {
                ProbeOutcome::Reply(ms)
            } else if is_total_loss(&output) {
                ProbeOutcome::Timeout
            } else {
                ProbeOutcome::Error
            }
        }
        Err(_) => ProbeOutcome::Unreachable,
    }
}

/// Execute exactly one probing round.
///
/// Fan-out: one worker thread per resolved host, all launched before any
/// join. Barrier: every worker is joined before any outcome is applied, so
/// the apply phase is single-threaded and lock-free. A panicked worker
/// becomes `Unreachable` for that host only.
pub fn run_round(records: &mut [HostRecord], runner: &Arc<dyn PingRunner>) -> RoundReport {
    let mut workers = Vec::with_capacity(records.len());
    for record in records.iter() {
        match record.target() {
            ProbeTarget::Resolved(addr) => {
                let runner = Arc::clone(runner);
                workers.push(Some(thread::spawn(move || {
                    classify_probe(runner.run(addr))
                })));
            }
            ProbeTarget::Unresolved => workers.push(None),
        }
    }

    let mut outcomes = Vec::with_capacity(workers.len());
    for worker in workers {
        let outcome = match worker {
            Some(handle) => handle.join().unwrap_or(ProbeOutcome::Unreachable),
            None => ProbeOutcome::Unreachable,
        };
        outcomes.push(outcome);
    }

    let mut slowest_reply_ms = None;
    for (record, outcome) in records.iter_mut().zip(outcomes) {
        match outcome {
            ProbeOutcome::Error | ProbeOutcome::Unreachable
                if record.target() != ProbeTarget::Unresolved =>
            {
                tracing::warn!(host = record.display_name(), outcome = ?outcome, "probe failed");
            }
            ProbeOutcome::Timeout => {
                tracing::debug!(host = record.display_name(), "probe timed out");
            }
            _ => {}
        }
        record.record_outcome(outcome);
        if let Some(ms) = outcome.latency_ms() {
            slowest_reply_ms = Some(slowest_reply_ms.map_or(ms, |s: u64| s.max(ms)));
        }
    }

    RoundReport { slowest_reply_ms }
}
