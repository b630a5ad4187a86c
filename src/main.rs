use std::sync::Arc;
use std::thread;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{fmt, EnvFilter};

use scope_profiler::bench::{self, SampleCollector};
use scope_profiler::{trace_scope, TraceConfig, TraceQueue, TraceSession};

/// Elements per generated workload vector
const WORKLOAD_LEN: usize = 10_000;
/// Worker threads in the traced section
const TRACE_WORKERS: u64 = 4;

fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║   ⏱   SCOPE PROFILER DEMO                        ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    // ── 1. Benchmarks ────────────────────────────────────────────
    println!("Benchmarks (ns):");
    let mut rng = StdRng::seed_from_u64(7);
    let data: Vec<u64> = (0..WORKLOAD_LEN).map(|_| rng.gen()).collect();

    print!("  sort_unstable  ");
    let sorted = scope_profiler::benchmark!({
        let mut v = data.clone();
        v.sort_unstable();
        v
    });
    report_summary(&sorted);

    print!("  sum            ");
    let summed = scope_profiler::benchmark!(64, data.iter().copied().fold(0u64, u64::wrapping_add));
    report_summary(&summed);

    let mut budgeted = SampleCollector::with_capacity(1_000_000);
    if let Err(e) = bench::run_for(&mut budgeted, std::time::Duration::from_millis(50), || {
        data.iter().filter(|&&x| x % 3 == 0).count()
    }) {
        println!("  filter         {e}");
    }
    report_summary(&budgeted);

    // ── 2. Trace session ─────────────────────────────────────────
    println!();
    let session = TraceSession::new(TraceConfig::default());
    let queue = session.queue().clone();

    let handles: Vec<_> = (0..TRACE_WORKERS)
        .map(|id| {
            let queue = queue.clone();
            let data = data.clone();
            thread::spawn(move || worker(id, &queue, &data))
        })
        .collect();
    for h in handles {
        let _ = h.join();
    }

    match session.finish() {
        Ok(path) => println!("Trace written  → {}", path.display()),
        Err(e) => eprintln!("Trace failed   → {e}"),
    }
    println!("Open it in chrome://tracing or https://ui.perfetto.dev");
    println!();
}

fn report_summary(collector: &SampleCollector) {
    match collector.summary().and_then(|s| Ok(serde_json::to_string(&s)?)) {
        Ok(json) => println!("                 {json}"),
        Err(e) => println!("                 summary unavailable: {e}"),
    }
}

fn worker(id: u64, queue: &Arc<TraceQueue>, data: &[u64]) {
    trace_scope!(queue);
    let mut rng = StdRng::seed_from_u64(1000 + id);

    for round in 0..3 {
        trace_scope!(queue, format!("round {round}"));
        let take = rng.gen_range(WORKLOAD_LEN / 4..WORKLOAD_LEN);

        let mut v = queue.in_scope("copy", || data[..take].to_vec());
        queue.in_scope("sort", || v.sort_unstable());
        queue.in_scope("dedup", || v.dedup());
    }
}
