//! Echo probing: platform ping runner, output parsing, round scheduling.

pub mod pacing;
pub mod parser;
pub mod resolver;
pub mod round;
pub mod runner;

pub use pacing::{next_round_delay, DEFAULT_FLOOR_MS, ROUND_CADENCE_MS};
pub use parser::{is_total_loss, parse_reply_latency};
pub use resolver::{resolve_target, Resolver, SystemResolver};
pub use round::{classify_probe, run_round, RoundReport};
pub use runner::{PingRunner, SystemPingRunner};
