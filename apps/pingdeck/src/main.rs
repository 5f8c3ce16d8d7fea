mod engine;
mod input;
mod logging;
mod report;

use anyhow::{anyhow, Result};
use clap::Parser;
use pingdeck_model::{HostRecord, ProbeTarget};
use pingdeck_probe::{resolve_target, PingRunner, SystemPingRunner, SystemResolver, DEFAULT_FLOOR_MS};
use pingdeck_render::{CrosstermScreen, Layout, Screen};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use engine::Engine;
use input::StopSignal;

#[derive(Parser)]
#[command(
    name = "pingdeck",
    version,
    about = "Watch several hosts answer echo probes in one terminal"
)]
struct Cli {
    /// Hosts to probe (names or addresses), shown in the order given.
    #[arg(value_name = "HOST")]
    hosts: Vec<String>,

    /// Read more hosts from a file (one per line, # starts a comment).
    #[arg(long)]
    hosts_file: Option<PathBuf>,

    /// Fix the number of history cells instead of deriving it from the
    /// terminal width.
    #[arg(long)]
    count: Option<usize>,

    /// Minimum delay between rounds, in milliseconds.
    #[arg(long, default_value_t = DEFAULT_FLOOR_MS)]
    floor_ms: u64,

    /// Write a JSON session summary here on exit.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Append logs to this file. The dashboard owns the terminal, so
    /// there is no logging without it.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// More logging (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref())?;

    let hosts = gather_hosts(&cli)?;
    let started_at_utc = report::now_utc();

    // Resolve every host once, up front, and tell the operator how each
    // one fared. Failures keep their display row as perpetual unreachable.
    let resolver = SystemResolver;
    let mut targets = Vec::with_capacity(hosts.len());
    for host in &hosts {
        let target = resolve_target(&resolver, host);
        match target {
            ProbeTarget::Resolved(addr) => println!("{host} -> {addr}"),
            ProbeTarget::Unresolved => println!("{host} -> unresolved, shown as unreachable"),
        }
        targets.push(target);
    }

    let mut screen = CrosstermScreen::new();
    let layout = Layout::compute(&hosts, screen.width()?, cli.count);

    let records: Vec<HostRecord> = hosts
        .iter()
        .zip(targets)
        .map(|(host, target)| HostRecord::new(host.as_str(), target, layout.history_len))
        .collect();

    let stop = StopSignal::new();
    input::install_interrupt_handler(&stop)?;

    let runner: Arc<dyn PingRunner> = Arc::new(SystemPingRunner);
    let mut engine = Engine::new(records, runner, screen, stop, layout, cli.floor_ms);
    engine.run()?;

    if let Some(path) = &cli.report {
        let summary = report::SessionReport::new(started_at_utc, engine.rounds(), engine.records());
        report::write_report(path, &summary)?;
        println!("report written to {}", path.display());
    }

    Ok(())
}

fn gather_hosts(cli: &Cli) -> Result<Vec<String>> {
    let mut hosts = Vec::new();

    if let Some(path) = &cli.hosts_file {
        let contents = fs::read_to_string(path)
            .map_err(|err| anyhow!("failed to read hosts file {:?}: {}", path, err))?;
        hosts.extend(parse_host_lines(&contents));
    }

    hosts.extend(cli.hosts.iter().cloned());

    if hosts.is_empty() {
        return Err(anyhow!("no hosts provided (pass hosts or --hosts-file)"));
    }
    Ok(hosts)
}

fn parse_host_lines(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
