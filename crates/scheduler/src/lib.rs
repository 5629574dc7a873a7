//! `LogScheduler`: a thread-affine, hash- or round-robin-partitioned
//! batcher that reorders pushed messages into per-partition FIFO batches
//! and hands each batch to a cooperatively-scheduled worker job, which
//! re-injects messages into a downstream [`Pipe`].

mod batch;
mod options;
mod partition;
mod pipe;
mod runtime;
mod scheduler;
mod thread_state;

pub use batch::PathOptions;
pub use options::{LOGSCHEDULER_MAX_PARTITIONS, SchedulerOptions};
pub use pipe::{NullPipe, Pipe};
pub use runtime::{InlineRuntime, ManualRuntime, RayonRuntime, WorkerRuntime};
pub use scheduler::LogScheduler;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use logline_nv::{LogMessage, NvRegistry, NvTable};
    use logline_template::LogTemplate;
    use parking_lot::Mutex;

    use super::*;

    struct RecordingPipe {
        seen: Mutex<Vec<Arc<LogMessage>>>,
    }

    impl RecordingPipe {
        fn new() -> Self {
            RecordingPipe { seen: Mutex::new(Vec::new()) }
        }

        fn hosts(&self) -> Vec<String> {
            self.seen.lock().iter().map(|m| m.host().to_string()).collect()
        }

        fn tags(&self) -> Vec<String> {
            self.seen.lock().iter().map(|m| m.program().to_string()).collect()
        }
    }

    impl Pipe for RecordingPipe {
        fn queue(&self, message: Arc<LogMessage>, _path_options: PathOptions) {
            self.seen.lock().push(message);
        }
    }

    fn message(host: &str) -> Arc<LogMessage> {
        Arc::new(LogMessage::new(NvTable::new(4, 4, 128), host, "prog", "msg", 1_700_000_000))
    }

    /// Like `message`, but stamps a unique `tag` into the program field so
    /// tests can tell apart several messages sharing the same host.
    fn tagged_message(host: &str, tag: &str) -> Arc<LogMessage> {
        Arc::new(LogMessage::new(NvTable::new(4, 4, 128), host, tag, "msg", 1_700_000_000))
    }

    /// Scenario S5 — round-robin: two partitions, a single ingest thread,
    /// four pushes. Within each partition the arrival order is preserved.
    #[test]
    fn s5_round_robin_preserves_per_partition_order() {
        let registry = Arc::new(NvRegistry::new(&[], 8));
        let pipe = Arc::new(RecordingPipe::new());
        let runtime = Arc::new(ManualRuntime::new(1));
        let options = SchedulerOptions::new(2, None, 1);
        let scheduler = LogScheduler::new(options, registry, Arc::clone(&pipe), Arc::clone(&runtime));

        for host in ["m1", "m2", "m3", "m4"] {
            scheduler.push(message(host), PathOptions::default());
        }
        scheduler.flush_batch(0);
        runtime.drain();

        let hosts = pipe.hosts();
        assert_eq!(hosts.len(), 4, "every pushed message must be re-injected exactly once");
        let pos = |h: &str| hosts.iter().position(|x| x == h).unwrap();
        assert!(pos("m1") < pos("m3"), "partition 0 (m1, m3) must preserve arrival order");
        assert!(pos("m2") < pos("m4"), "partition 1 (m2, m4) must preserve arrival order");
    }

    /// Scenario S6/S9 — hash-partitioning: pushes with the same `$HOST`
    /// land in the same partition and keep their relative order.
    #[test]
    fn s9_hash_partitioning_keeps_same_key_messages_in_order() {
        let registry = Arc::new(NvRegistry::new(&[], 8));
        let pipe = Arc::new(RecordingPipe::new());
        let runtime = Arc::new(ManualRuntime::new(1));
        let key = LogTemplate::compile("$HOST").unwrap();
        let options = SchedulerOptions::new(2, Some(key), 1);
        let scheduler = LogScheduler::new(options, registry, Arc::clone(&pipe), Arc::clone(&runtime));

        scheduler.push(tagged_message("a", "first"), PathOptions::default());
        scheduler.push(tagged_message("b", "only"), PathOptions::default());
        scheduler.push(tagged_message("a", "second"), PathOptions::default());
        scheduler.flush_batch(0);
        runtime.drain();

        let tags = pipe.tags();
        assert_eq!(tags.len(), 3, "every pushed message must be re-injected exactly once");
        let pos = |t: &str| tags.iter().position(|x| x == t).unwrap();
        assert!(pos("first") < pos("second"), "same-host messages must keep their relative push order");
    }

    /// Scenario 10 — no-loss: every pushed message reaches the pipe exactly
    /// once, across several flush/drain cycles.
    #[test]
    fn s10_no_loss_across_multiple_flush_cycles() {
        let registry = Arc::new(NvRegistry::new(&[], 8));
        let pipe = Arc::new(RecordingPipe::new());
        let runtime = Arc::new(ManualRuntime::new(1));
        let options = SchedulerOptions::new(3, None, 1);
        let scheduler = LogScheduler::new(options, registry, Arc::clone(&pipe), Arc::clone(&runtime));

        for batch in 0..3 {
            for i in 0..5 {
                scheduler.push(message(&format!("h{batch}-{i}")), PathOptions::default());
            }
            scheduler.flush_batch(0);
            runtime.drain();
        }

        assert_eq!(pipe.hosts().len(), 15);
    }

    /// Scenario 11 — degradation: `num_partitions = 0` makes `push`
    /// synchronous and the pipe sees messages immediately, with no worker
    /// job ever submitted.
    #[test]
    fn s11_zero_partitions_is_synchronous_passthrough() {
        let registry = Arc::new(NvRegistry::new(&[], 8));
        let pipe = Arc::new(RecordingPipe::new());
        let runtime = Arc::new(ManualRuntime::new(1));
        let options = SchedulerOptions::new(0, None, 1);
        let scheduler = LogScheduler::new(options, registry, Arc::clone(&pipe), Arc::clone(&runtime));

        scheduler.push(message("only"), PathOptions::default());
        assert_eq!(pipe.hosts(), vec!["only".to_string()]);
    }

    #[test]
    fn degraded_runtime_forces_passthrough_even_with_partitions() {
        let registry = Arc::new(NvRegistry::new(&[], 8));
        let pipe = Arc::new(RecordingPipe::new());
        let runtime = Arc::new(InlineRuntime::new(0, 1));
        let options = SchedulerOptions::new(4, None, 1);
        let scheduler = LogScheduler::new(options, registry, Arc::clone(&pipe), Arc::clone(&runtime));

        scheduler.push(message("only"), PathOptions::default());
        assert_eq!(pipe.hosts(), vec!["only".to_string()]);
    }

    #[test]
    fn num_partitions_above_hard_cap_is_clamped() {
        let options = SchedulerOptions::new(LOGSCHEDULER_MAX_PARTITIONS + 10, None, 1);
        assert_eq!(options.num_partitions, LOGSCHEDULER_MAX_PARTITIONS);
    }
}
