use anyhow::Result;
use pingdeck_model::HostRecord;
use pingdeck_probe::{next_round_delay, run_round, PingRunner, ROUND_CADENCE_MS};
use pingdeck_render::{header_line, host_rows, legend_lines, Layout, Screen};
use std::sync::Arc;
use std::thread;

use crate::input::StopSignal;

/// Owns the run loop: claim the terminal, probe and redraw once per round,
/// give the terminal back on the way out.
pub struct Engine<S: Screen> {
    records: Vec<HostRecord>,
    runner: Arc<dyn PingRunner>,
    screen: S,
    stop: StopSignal,
    layout: Layout,
    floor_ms: u64,
    cadence_ms: u64,
    rounds: u64,
}

impl<S: Screen> Engine<S> {
    pub fn new(
        records: Vec<HostRecord>,
        runner: Arc<dyn PingRunner>,
        screen: S,
        stop: StopSignal,
        layout: Layout,
        floor_ms: u64,
    ) -> Self {
        Self {
            records,
            runner,
            screen,
            stop,
            layout,
            floor_ms,
            cadence_ms: ROUND_CADENCE_MS,
            rounds: 0,
        }
    }

    #[cfg(test)]
    fn with_cadence_ms(mut self, cadence_ms: u64) -> Self {
        self.cadence_ms = cadence_ms;
        self
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn records(&self) -> &[HostRecord] {
        &self.records
    }

    pub fn run(&mut self) -> Result<()> {
        self.screen.setup()?;
        tracing::info!(hosts = self.records.len(), "dashboard started");

        let outcome = self.display_loop();

        // The terminal is restored even when the loop failed; a restore
        // failure only surfaces if the loop itself was clean.
        let restored = self.screen.teardown();
        tracing::info!(rounds = self.rounds, "dashboard stopped");
        outcome.and(restored)
    }

    fn display_loop(&mut self) -> Result<()> {
        self.screen.commit_static(&[header_line(&self.layout)])?;

        loop {
            // Stop is polled once per round, before the fan-out; a request
            // that lands mid-round takes effect after that round applies.
            if self.stop.requested() || self.screen.key_pressed()? {
                return Ok(());
            }

            let report = run_round(&mut self.records, &self.runner);
            self.rounds += 1;

            self.screen.commit_rows(&host_rows(&self.records, &self.layout))?;
            if self.rounds == 1 {
                self.screen.commit_footer(&legend_lines())?;
            }

            let delay = next_round_delay(report.slowest_reply_ms, self.floor_ms, self.cadence_ms);
            thread::sleep(delay);
        }
    }
}
