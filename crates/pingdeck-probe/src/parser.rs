/// Extract the reply latency from one-echo ping output, in whole
/// milliseconds.
///
/// Looks for a `time=12.3 ms` token first, then falls back to the
/// min/avg/max summary line (`rtt ...` on Linux, `round-trip ...` on
/// macOS/BSD).
pub fn parse_reply_latency(output: &str) -> Option<u64> {
    for line in output.lines() {
        for token in line.split_whitespace() {
            if let Some(value) = token.strip_prefix("time=") {
                let value = value.strip_suffix("ms").unwrap_or(value);
                if let Ok(ms) = value.parse::<f64>() {
                    return Some(ms.round() as u64);
                }
            }
        }
    }

    for line in output.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("rtt") || trimmed.starts_with("round-trip") {
            let values = trimmed.split('=').nth(1)?;
            let min = values.trim().split('/').next()?;
            if let Ok(ms) = min.trim().parse::<f64>() {
                return Some(ms.round() as u64);
            }
        }
    }

    None
}

/// True when the statistics line reports that no reply came back.
pub fn is_total_loss(output: &str) -> bool {
    for line in output.lines() {
        if !line.contains("packet loss") {
            continue;
        }
        if line.contains("100% packet loss") || line.contains("100.0% packet loss") {
            return true;
        }
        if line.contains(" 0 received") || line.contains(" 0 packets received") {
            return true;
        }
    }
    false
}
