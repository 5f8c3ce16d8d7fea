use pingdeck_model::{HostRecord, ProbeOutcome, ProbeTarget};
use pingdeck_probe::{run_round, PingRunner};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn reply_output(ms: &str) -> String {
    format!("64 bytes from target: icmp_seq=1 ttl=60 time={ms} ms")
}

struct FakeRunner {
    outputs: HashMap<IpAddr, String>,
    delays: HashMap<IpAddr, Duration>,
    active: Arc<Mutex<(u32, u32)>>,
    calls: Arc<Mutex<HashMap<IpAddr, u32>>>,
}

impl FakeRunner {
    fn new(outputs: HashMap<IpAddr, String>) -> Self {
        Self {
            outputs,
            delays: HashMap::new(),
            active: Arc::new(Mutex::new((0, 0))),
            calls: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn with_delays(mut self, delays: HashMap<IpAddr, Duration>) -> Self {
        self.delays = delays;
        self
    }

    fn peak_concurrency(&self) -> u32 {
        self.active.lock().unwrap().1
    }

    fn calls_for(&self, addr: IpAddr) -> u32 {
        self.calls.lock().unwrap().get(&addr).copied().unwrap_or(0)
    }
}

impl PingRunner for FakeRunner {
    fn run(&self, addr: IpAddr) -> anyhow::Result<String> {
        {
            let mut active = self.active.lock().unwrap();
            active.0 += 1;
            active.1 = active.1.max(active.0);
        }
        *self.calls.lock().unwrap().entry(addr).or_insert(0) += 1;

        if let Some(delay) = self.delays.get(&addr) {
            thread::sleep(*delay);
        }

        let result = self
            .outputs
            .get(&addr)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no route to {addr}"));

        self.active.lock().unwrap().0 -= 1;
        result
    }
}

struct PanickingRunner;

impl PingRunner for PanickingRunner {
    fn run(&self, _addr: IpAddr) -> anyhow::Result<String> {
        panic!("probe worker fault");
    }
}

fn addr(last: u8) -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::new(192, 0, 2, last))
}

fn record(name: &str, target: ProbeTarget) -> HostRecord {
    HostRecord::new(name, target, 10)
}

#[test]
fn every_host_gets_exactly_one_outcome_per_round() {
    let mut outputs = HashMap::new();
    outputs.insert(addr(1), reply_output("10.0"));
    outputs.insert(addr(2), "1 packets transmitted, 0 received, 100% packet loss".to_string());
    let runner: Arc<dyn PingRunner> = Arc::new(FakeRunner::new(outputs));

    let mut records = vec![
        record("router", ProbeTarget::Resolved(addr(1))),
        record("wan", ProbeTarget::Resolved(addr(2))),
        record("bogus.invalid", ProbeTarget::Unresolved),
    ];

    for rounds in 1..=4u64 {
        run_round(&mut records, &runner);
        for host in &records {
            assert_eq!(host.history().len() as u64, rounds);
        }
    }

    assert_eq!(records[0].history().newest(), Some(ProbeOutcome::Reply(10)));
    assert_eq!(records[1].history().newest(), Some(ProbeOutcome::Timeout));
    assert_eq!(records[2].history().newest(), Some(ProbeOutcome::Unreachable));
}

#[test]
fn probes_run_concurrently_within_a_round() {
    let mut outputs = HashMap::new();
    let mut delays = HashMap::new();
    for last in 1..=3 {
        outputs.insert(addr(last), reply_output("5.0"));
        delays.insert(addr(last), Duration::from_millis(60));
    }
    let fake = Arc::new(FakeRunner::new(outputs).with_delays(delays));
    let runner: Arc<dyn PingRunner> = fake.clone();

    let mut records = vec![
        record("a", ProbeTarget::Resolved(addr(1))),
        record("b", ProbeTarget::Resolved(addr(2))),
        record("c", ProbeTarget::Resolved(addr(3))),
    ];

    run_round(&mut records, &runner);

    // All three workers overlap while sleeping; a sequential scheduler
    // would never have more than one in flight.
    assert!(fake.peak_concurrency() >= 2);
}

#[test]
fn slow_host_does_not_block_siblings_from_completing() {
    let mut outputs = HashMap::new();
    outputs.insert(addr(1), reply_output("250.0"));
    outputs.insert(addr(2), reply_output("3.0"));
    let mut delays = HashMap::new();
    delays.insert(addr(1), Duration::from_millis(80));
    let runner: Arc<dyn PingRunner> = Arc::new(FakeRunner::new(outputs).with_delays(delays));

    let mut records = vec![
        record("slow", ProbeTarget::Resolved(addr(1))),
        record("fast", ProbeTarget::Resolved(addr(2))),
    ];

    let report = run_round(&mut records, &runner);

    // Barrier: both outcomes are applied in the same round.
    assert_eq!(records[0].history().newest(), Some(ProbeOutcome::Reply(250)));
    assert_eq!(records[1].history().newest(), Some(ProbeOutcome::Reply(3)));
    assert_eq!(report.slowest_reply_ms, Some(250));
}

#[test]
fn panicked_worker_maps_to_unreachable_for_that_host_only() {
    struct MixedRunner {
        good: IpAddr,
    }
    impl PingRunner for MixedRunner {
        fn run(&self, addr: IpAddr) -> anyhow::Result<String> {
            if addr == self.good {
                Ok(reply_output("7.0"))
            } else {
                panic!("probe worker fault");
            }
        }
    }

    let runner: Arc<dyn PingRunner> = Arc::new(MixedRunner { good: addr(1) });
    let mut records = vec![
        record("ok", ProbeTarget::Resolved(addr(1))),
        record("faulty", ProbeTarget::Resolved(addr(2))),
    ];

    let report = run_round(&mut records, &runner);

    assert_eq!(records[0].history().newest(), Some(ProbeOutcome::Reply(7)));
    assert_eq!(records[1].history().newest(), Some(ProbeOutcome::Unreachable));
    assert_eq!(report.slowest_reply_ms, Some(7));
}

#[test]
fn all_workers_panicking_still_completes_the_round() {
    let runner: Arc<dyn PingRunner> = Arc::new(PanickingRunner);
    let mut records = vec![
        record("a", ProbeTarget::Resolved(addr(1))),
        record("b", ProbeTarget::Resolved(addr(2))),
    ];

    let report = run_round(&mut records, &runner);

    for host in &records {
        assert_eq!(host.history().newest(), Some(ProbeOutcome::Unreachable));
        assert_eq!(host.history().len(), 1);
    }
    assert_eq!(report.slowest_reply_ms, None);
}

#[test]
fn unresolved_hosts_never_invoke_the_runner() {
    let mut outputs = HashMap::new();
    outputs.insert(addr(1), reply_output("4.0"));
    let fake = Arc::new(FakeRunner::new(outputs));
    let runner: Arc<dyn PingRunner> = fake.clone();

    let mut records = vec![
        record("up", ProbeTarget::Resolved(addr(1))),
        record("bogus.invalid", ProbeTarget::Unresolved),
    ];

    for _ in 0..3 {
        run_round(&mut records, &runner);
    }

    assert_eq!(fake.calls_for(addr(1)), 3);
    assert_eq!(fake.calls_for(addr(2)), 0);
    let symbols: Vec<char> = records[1].history().iter().map(|o| o.symbol()).collect();
    assert_eq!(symbols, vec![' ', ' ', ' ']);
}

#[test]
fn slowest_reply_ignores_failures() {
    let mut outputs = HashMap::new();
    outputs.insert(addr(1), reply_output("40.0"));
    outputs.insert(addr(2), "ping: sendmsg: Operation not permitted".to_string());
    let runner: Arc<dyn PingRunner> = Arc::new(FakeRunner::new(outputs));

    let mut records = vec![
        record("up", ProbeTarget::Resolved(addr(1))),
        record("blocked", ProbeTarget::Resolved(addr(2))),
    ];

    let report = run_round(&mut records, &runner);

    assert_eq!(report.slowest_reply_ms, Some(40));
    assert_eq!(records[1].history().newest(), Some(ProbeOutcome::Error));
}
