use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use logline_nv::{LogMessage, NvRegistry, NvTable};
use logline_scheduler::{LogScheduler, ManualRuntime, PathOptions, Pipe, SchedulerOptions};
use logline_template::LogTemplate;

use crate::commands::BenchSchedulerArgs;

struct CountingPipe {
    count: AtomicUsize,
}

impl Pipe for CountingPipe {
    fn queue(&self, _message: Arc<LogMessage>, _path_options: PathOptions) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn run(args: BenchSchedulerArgs) -> i32 {
    let registry = Arc::new(NvRegistry::new(&[], 64));
    let pipe = Arc::new(CountingPipe { count: AtomicUsize::new(0) });
    let runtime = Arc::new(ManualRuntime::new(1));
    let key = args.hash_key.then(|| LogTemplate::compile("$HOST").expect("builtin template always compiles"));
    let options = SchedulerOptions::new(args.partitions, key, 1);
    let scheduler = LogScheduler::new(options, Arc::clone(&registry), Arc::clone(&pipe), Arc::clone(&runtime));

    let start = Instant::now();
    for i in 0..args.messages {
        let host = format!("host-{}", i % 16);
        let table = NvTable::new(4, 4, 128);
        let message = Arc::new(LogMessage::new(table, host, "bench", "synthetic benchmark message", 1_700_000_000));
        scheduler.push(message, PathOptions::default());
    }
    scheduler.flush_batch(0);
    runtime.drain();
    let elapsed = start.elapsed();

    let delivered = pipe.count.load(Ordering::Relaxed);
    let rate = if elapsed.as_secs_f64() > 0.0 { delivered as f64 / elapsed.as_secs_f64() } else { f64::INFINITY };
    println!(
        "pushed {} messages across {} partitions in {:.3}ms ({:.0} msg/s), delivered {delivered}",
        args.messages,
        args.partitions,
        elapsed.as_secs_f64() * 1000.0,
        rate,
    );
    if delivered != args.messages {
        eprintln!("warning: delivered count does not match pushed count");
        return 1;
    }
    0
}
