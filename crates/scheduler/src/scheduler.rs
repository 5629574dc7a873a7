use std::sync::Arc;

use logline_nv::{LogMessage, NvRegistry};
use logline_template::{EvalOptions, log_template_hash};

use crate::batch::{PathOptions, QueueNode};
use crate::options::SchedulerOptions;
use crate::partition::LogSchedulerPartition;
use crate::pipe::Pipe;
use crate::runtime::WorkerRuntime;
use crate::thread_state::LogSchedulerThreadState;

/// Distributes messages across `N` partitions by round-robin or by hashing
/// a [`logline_template::LogTemplate`], accumulates per-ingest-thread
/// micro-batches, and hands them to cooperatively-scheduled partition
/// workers that re-inject each message into a downstream [`Pipe`].
///
/// `push`/`flush_batch`/`work`/`complete` map directly onto the four
/// operations named in the component design; see each method's doc comment
/// for the invariant it upholds.
pub struct LogScheduler<P: Pipe + 'static, R: WorkerRuntime + 'static> {
    partitions: Vec<LogSchedulerPartition>,
    thread_states: Vec<LogSchedulerThreadState>,
    num_partitions: usize,
    partition_key: Option<logline_template::LogTemplate>,
    registry: Arc<NvRegistry>,
    pipe: Arc<P>,
    runtime: Arc<R>,
    degraded: bool,
}

impl<P: Pipe + 'static, R: WorkerRuntime + 'static> LogScheduler<P, R> {
    /// Creates a scheduler. `num_partitions = 0` disables parallelism
    /// outright; a runtime that cannot guarantee continuations run off the
    /// caller's stack (`supports_continuation() == false`) also forces
    /// passthrough, logged once here rather than on every `push`.
    pub fn new(options: SchedulerOptions, registry: Arc<NvRegistry>, pipe: Arc<P>, runtime: Arc<R>) -> Arc<Self> {
        let degraded = !runtime.supports_continuation();
        if degraded {
            log::warn!("worker runtime does not support submit-continuation; LogScheduler degrades to passthrough");
        }

        let mut partitions = Vec::with_capacity(options.num_partitions);
        partitions.resize_with(options.num_partitions, LogSchedulerPartition::new);

        let max_threads = options.max_threads.max(1);
        let mut thread_states = Vec::with_capacity(max_threads);
        thread_states.resize_with(max_threads, || LogSchedulerThreadState::new(options.num_partitions));

        Arc::new(LogScheduler {
            partitions,
            thread_states,
            num_partitions: options.num_partitions,
            partition_key: options.partition_key,
            registry,
            pipe,
            runtime,
            degraded,
        })
    }

    /// `push`: never suspends, never returns an error. Partitions disabled,
    /// a degraded runtime, or a caller that is not a registered worker
    /// thread, all fall back to an immediate synchronous `pipe.queue` call.
    pub fn push(self: &Arc<Self>, message: Arc<LogMessage>, path_options: PathOptions) {
        if self.num_partitions == 0 || self.degraded {
            self.pipe.queue(message, path_options);
            return;
        }

        let Some(thread_index) = self.runtime.current_thread_index() else {
            self.pipe.queue(message, path_options);
            return;
        };
        let Some(thread_state) = self.thread_states.get(thread_index) else {
            self.pipe.queue(message, path_options);
            return;
        };

        let partition_index = match &self.partition_key {
            Some(template) => {
                let hash = log_template_hash(template, &message, &self.registry, &EvalOptions::default());
                (hash as usize) % self.num_partitions
            }
            None => thread_state.next_round_robin(self.num_partitions),
        };

        thread_state.push(partition_index, QueueNode { message, path_options });
    }

    /// `flush_batch`: called by the ingest loop once at the end of an
    /// "event-loop batch" (standing in for a runtime's batch-callback hook).
    /// Splices every non-empty per-partition accumulation into its partition queue
    /// and, for any partition that was idle, submits its worker job.
    pub fn flush_batch(self: &Arc<Self>, thread_index: usize) {
        let Some(thread_state) = self.thread_states.get(thread_index) else { return };
        for (partition_index, batch) in thread_state.take_batches() {
            if self.partitions[partition_index].enqueue(batch) {
                self.submit_work(partition_index);
            }
        }
    }

    fn submit_work(self: &Arc<Self>, partition_index: usize) {
        let scheduler = Arc::clone(self);
        self.runtime.submit_continuation(Box::new(move || scheduler.work(partition_index)));
    }

    /// Partition worker entry: detaches every queued batch under the
    /// partition mutex, releases it, then re-injects every message into the
    /// downstream pipe in order. Ends by invoking `complete`.
    fn work(self: &Arc<Self>, partition_index: usize) {
        let partition = &self.partitions[partition_index];
        for batch in partition.take_batches() {
            for node in batch.into_nodes() {
                self.pipe.queue(node.message, node.path_options);
            }
        }
        if partition.complete() {
            self.submit_work(partition_index);
        }
    }
}
