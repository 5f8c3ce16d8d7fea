use anyhow::{Context, Result};
use std::net::IpAddr;
use std::process::Command;

/// Issues one echo request and returns the raw tool output.
///
/// Implementations must be callable concurrently from many worker threads
/// within a single round without shared mutable state.
pub trait PingRunner: Send + Sync {
    fn run(&self, addr: IpAddr) -> Result<String>;
}

/// Runner backed by the platform `ping` binary.
#[derive(Debug, Default, Clone)]
pub struct SystemPingRunner;

impl SystemPingRunner {
    fn command(addr: IpAddr) -> Command {
        // Addresses are resolved up front, so `-n` skips reverse lookups in
        // the output. No timeout flag is passed: a short caller-set timeout
        // produced false timeouts, so the platform default echo timeout
        // applies.
        let program = if cfg!(target_os = "macos") && addr.is_ipv6() {
            "ping6"
        } else {
            "ping"
        };
        let mut cmd = Command::new(program);
        cmd.arg("-n").arg("-c").arg("1").arg(addr.to_string());
        cmd
    }
}

impl PingRunner for SystemPingRunner {
    fn run(&self, addr: IpAddr) -> Result<String> {
        let output = Self::command(addr)
            .output()
            .with_context(|| format!("failed to spawn ping for {addr}"))?;

        // A lost echo exits non-zero; that is still a classifiable result,
        // so stdout and stderr are both handed to the classifier.
        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr.trim());
        }
        Ok(text)
    }
}
