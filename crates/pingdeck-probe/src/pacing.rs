use std::time::Duration;

/// Target cadence: one probing round per second.
pub const ROUND_CADENCE_MS: u64 = 1000;

/// Fallback delay when the cadence budget is already spent.
pub const DEFAULT_FLOOR_MS: u64 = 250;

/// Delay before the next round, net of the slowest successful reply.
///
/// `max(floor, cadence - slowest)` while the slowest reply stays under the
/// cadence; the floor alone when every host failed or the slowest reply ate
/// the whole budget. The result is never zero, so the loop cannot busy-spin
/// and the sleep is always a valid duration.
pub fn next_round_delay(slowest_reply_ms: Option<u64>, floor_ms: u64, cadence_ms: u64) -> Duration {
    let floor = floor_ms.max(1);
    let ms = match slowest_reply_ms {
        Some(slowest) if slowest < cadence_ms => (cadence_ms - slowest).max(floor),
        _ => floor,
    };
    Duration::from_millis(ms)
}
