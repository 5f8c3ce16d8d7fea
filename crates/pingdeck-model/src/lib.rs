//! Shared data structures for pingdeck.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Classified outcome of one echo probe in one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Reply received, round-trip latency in whole milliseconds.
    Reply(u64),
    /// The probe ran but no reply arrived within the platform echo timeout.
    Timeout,
    /// The probe ran but failed with a send or protocol error.
    Error,
    /// The probe could not be issued or awaited at all.
    Unreachable,
}

impl ProbeOutcome {
    pub fn latency_ms(&self) -> Option<u64> {
        match self {
            ProbeOutcome::Reply(ms) => Some(*ms),
            _ => None,
        }
    }

    /// Single-character form used in the responses column.
    pub fn symbol(&self) -> char {
        match self {
            ProbeOutcome::Reply(_) => '.',
            ProbeOutcome::Timeout => 'x',
            ProbeOutcome::Error => '?',
            ProbeOutcome::Unreachable => ' ',
        }
    }
}

/// Address a host is probed at, fixed once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeTarget {
    Resolved(IpAddr),
    /// Resolution failed. The host keeps its display row and reports
    /// `Unreachable` every round instead of silently vanishing.
    Unresolved,
}

/// Fixed-capacity ring of probe outcomes, oldest evicted first.
///
/// Capacity is fixed for the lifetime of a run, so memory stays bounded no
/// matter how long the dashboard runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    slots: Vec<ProbeOutcome>,
    head: usize,
    len: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            slots: vec![ProbeOutcome::Unreachable; capacity],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append at the tail, evicting the oldest entry when full.
    pub fn push(&mut self, outcome: ProbeOutcome) {
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = outcome;
        if self.len == self.slots.len() {
            self.head = (self.head + 1) % self.slots.len();
        } else {
            self.len += 1;
        }
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = ProbeOutcome> + '_ {
        (0..self.len).map(move |i| self.slots[(self.head + i) % self.slots.len()])
    }

    pub fn newest(&self) -> Option<ProbeOutcome> {
        if self.len == 0 {
            None
        } else {
            Some(self.slots[(self.head + self.len - 1) % self.slots.len()])
        }
    }
}

/// Running totals across every round of a session, for the exit report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub replies: u64,
    pub timeouts: u64,
    pub errors: u64,
    pub unreachable: u64,
}

impl OutcomeTally {
    pub fn count(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Reply(_) => self.replies += 1,
            ProbeOutcome::Timeout => self.timeouts += 1,
            ProbeOutcome::Error => self.errors += 1,
            ProbeOutcome::Unreachable => self.unreachable += 1,
        }
    }

    pub fn rounds(&self) -> u64 {
        self.replies + self.timeouts + self.errors + self.unreachable
    }
}

/// One probed host: immutable identity plus per-round mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRecord {
    display_name: String,
    target: ProbeTarget,
    history: History,
    last_latency_ms: Option<u64>,
    tally: OutcomeTally,
}

impl HostRecord {
    pub fn new(display_name: impl Into<String>, target: ProbeTarget, history_len: usize) -> Self {
        Self {
            display_name: display_name.into(),
            target,
            history: History::new(history_len),
            last_latency_ms: None,
            tally: OutcomeTally::default(),
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn target(&self) -> ProbeTarget {
        self.target
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Latency of the most recent round, present only if it was a reply.
    pub fn last_latency_ms(&self) -> Option<u64> {
        self.last_latency_ms
    }

    pub fn tally(&self) -> OutcomeTally {
        self.tally
    }

    /// Apply one round's outcome: exactly one history entry per round.
    pub fn record_outcome(&mut self, outcome: ProbeOutcome) {
        self.history.push(outcome);
        self.last_latency_ms = outcome.latency_ms();
        self.tally.count(outcome);
    }

    pub fn summary(&self) -> HostSummary {
        HostSummary {
            name: self.display_name.clone(),
            target: match self.target {
                ProbeTarget::Resolved(addr) => Some(addr.to_string()),
                ProbeTarget::Unresolved => None,
            },
            rounds: self.tally.rounds(),
            tally: self.tally,
            last_latency_ms: self.last_latency_ms,
        }
    }
}

/// Per-host totals in the session report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSummary {
    pub name: String,
    pub target: Option<String>,
    pub rounds: u64,
    #[serde(flatten)]
    pub tally: OutcomeTally,
    pub last_latency_ms: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn replies(values: &[u64]) -> Vec<ProbeOutcome> {
        values.iter().map(|ms| ProbeOutcome::Reply(*ms)).collect()
    }

    #[test]
    fn history_grows_until_capacity() {
        let mut history = History::new(3);
        assert!(history.is_empty());

        history.push(ProbeOutcome::Reply(1));
        history.push(ProbeOutcome::Timeout);
        assert_eq!(history.len(), 2);
        assert_eq!(history.newest(), Some(ProbeOutcome::Timeout));

        let collected: Vec<ProbeOutcome> = history.iter().collect();
        assert_eq!(collected, vec![ProbeOutcome::Reply(1), ProbeOutcome::Timeout]);
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut history = History::new(5);
        for outcome in replies(&[1, 2, 3, 4, 5, 6, 7]) {
            history.push(outcome);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.capacity(), 5);
        let collected: Vec<ProbeOutcome> = history.iter().collect();
        assert_eq!(collected, replies(&[3, 4, 5, 6, 7]));
    }

    #[test]
    fn history_length_never_exceeds_capacity() {
        let mut history = History::new(4);
        for round in 0..20 {
            history.push(ProbeOutcome::Reply(round));
            assert_eq!(history.len() as u64, (round + 1).min(4));
        }
    }

    #[test]
    fn record_outcome_sets_and_clears_latency() {
        let mut record = HostRecord::new("gw", ProbeTarget::Unresolved, 8);

        record.record_outcome(ProbeOutcome::Reply(12));
        assert_eq!(record.last_latency_ms(), Some(12));

        record.record_outcome(ProbeOutcome::Timeout);
        assert_eq!(record.last_latency_ms(), None);
        assert_eq!(record.history().len(), 2);
    }

    #[test]
    fn tally_counts_every_outcome_kind() {
        let mut record = HostRecord::new("gw", ProbeTarget::Unresolved, 4);
        record.record_outcome(ProbeOutcome::Reply(5));
        record.record_outcome(ProbeOutcome::Reply(9));
        record.record_outcome(ProbeOutcome::Timeout);
        record.record_outcome(ProbeOutcome::Error);
        record.record_outcome(ProbeOutcome::Unreachable);

        let tally = record.tally();
        assert_eq!(tally.replies, 2);
        assert_eq!(tally.timeouts, 1);
        assert_eq!(tally.errors, 1);
        assert_eq!(tally.unreachable, 1);
        assert_eq!(tally.rounds(), 5);
        // The window only holds the newest four, the tally keeps all five.
        assert_eq!(record.history().len(), 4);
    }

    #[test]
    fn symbols_match_legend() {
        assert_eq!(ProbeOutcome::Reply(1).symbol(), '.');
        assert_eq!(ProbeOutcome::Timeout.symbol(), 'x');
        assert_eq!(ProbeOutcome::Error.symbol(), '?');
        assert_eq!(ProbeOutcome::Unreachable.symbol(), ' ');
    }

    #[test]
    fn summary_serializes_with_flattened_tally() {
        let mut record = HostRecord::new(
            "dns",
            ProbeTarget::Resolved("9.9.9.9".parse().unwrap()),
            4,
        );
        record.record_outcome(ProbeOutcome::Reply(23));
        record.record_outcome(ProbeOutcome::Timeout);

        let value = serde_json::to_value(record.summary()).unwrap();
        assert_eq!(value["name"], "dns");
        assert_eq!(value["target"], "9.9.9.9");
        assert_eq!(value["rounds"], 2);
        assert_eq!(value["replies"], 1);
        assert_eq!(value["timeouts"], 1);
        assert_eq!(value["last_latency_ms"], serde_json::Value::Null);
    }
}
