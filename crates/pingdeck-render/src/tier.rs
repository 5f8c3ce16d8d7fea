use crossterm::style::Color;
use pingdeck_model::ProbeOutcome;

/// Width of the latency column: just fits `999+ms`.
pub const LATENCY_COL_WIDTH: usize = 6;

/// Display tier of a round's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Reply at or under 250 ms.
    Good,
    /// Reply over 250 ms.
    Warn,
    /// Reply over 700 ms, or any failure.
    Alert,
}

impl Tier {
    pub fn color(&self) -> Color {
        match self {
            Tier::Good => Color::Green,
            Tier::Warn => Color::Yellow,
            Tier::Alert => Color::Red,
        }
    }
}

pub fn outcome_tier(outcome: ProbeOutcome) -> Tier {
    match outcome {
        ProbeOutcome::Reply(ms) if ms <= 250 => Tier::Good,
        ProbeOutcome::Reply(ms) if ms <= 700 => Tier::Warn,
        _ => Tier::Alert,
    }
}

/// Fixed-width latency cell. Replies at or over a second cap at `999+ms`;
/// a round without a reply shows dashes regardless of any older latency.
pub fn format_latency(outcome: Option<ProbeOutcome>) -> String {
    match outcome {
        Some(ProbeOutcome::Reply(ms)) if ms >= 1000 => "999+ms".to_string(),
        Some(ProbeOutcome::Reply(ms)) => format!("{ms:>4}ms"),
        _ => format!("{:>width$}", "---", width = LATENCY_COL_WIDTH),
    }
}
