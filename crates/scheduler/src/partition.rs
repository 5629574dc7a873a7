use parking_lot::Mutex;

use crate::batch::LogSchedulerBatch;

/// State mutated only while `LogSchedulerPartition::mutex` is held: the
/// queue of not-yet-drained batches and whether a worker job is currently
/// active for this partition.
#[derive(Default)]
struct PartitionState {
    batches: Vec<LogSchedulerBatch>,
    flush_running: bool,
}

/// One of the scheduler's `N` independent work queues. Producers append
/// batches to the tail under `mutex`; at most one worker job drains it at a
/// time, serialized by `flush_running`.
#[derive(Default)]
pub struct LogSchedulerPartition {
    state: Mutex<PartitionState>,
}

impl LogSchedulerPartition {
    pub fn new() -> Self {
        LogSchedulerPartition::default()
    }

    /// Appends `batch` to the queue. Returns `true` if the caller must
    /// submit the worker job (the partition was idle), `false` if a worker
    /// is already active and will pick this batch up.
    pub fn enqueue(&self, batch: LogSchedulerBatch) -> bool {
        if batch.is_empty() {
            return false;
        }
        let mut state = self.state.lock();
        state.batches.push(batch);
        if state.flush_running {
            false
        } else {
            state.flush_running = true;
            true
        }
    }

    /// Detaches every queued batch for a worker to drain, releasing the
    /// lock immediately afterward so producers can keep enqueueing.
    pub fn take_batches(&self) -> Vec<LogSchedulerBatch> {
        std::mem::take(&mut self.state.lock().batches)
    }

    /// Runs at the end of a worker's drain pass. Returns `true` if the
    /// caller must resubmit the worker job (batches arrived while draining),
    /// `false` if the partition is now idle (`flush_running` cleared).
    pub fn complete(&self) -> bool {
        let mut state = self.state.lock();
        if state.batches.is_empty() {
            state.flush_running = false;
            false
        } else {
            true
        }
    }
}
