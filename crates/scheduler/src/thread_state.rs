use parking_lot::Mutex;

use crate::batch::{LogSchedulerBatch, QueueNode};

/// Per-ingest-thread scratch space: conceptually owned by exactly one
/// ingest thread, modeled here as a `Mutex`-guarded slot addressed by worker
/// index since safe Rust has no unsynchronized thread-local array indexable
/// from outside the owning thread.
pub struct LogSchedulerThreadState {
    inner: Mutex<Inner>,
}

struct Inner {
    num_messages: usize,
    last_partition: usize,
    batch_by_partition: Vec<LogSchedulerBatch>,
}

impl LogSchedulerThreadState {
    pub fn new(num_partitions: usize) -> Self {
        let mut batch_by_partition = Vec::with_capacity(num_partitions);
        batch_by_partition.resize_with(num_partitions, LogSchedulerBatch::default);
        LogSchedulerThreadState { inner: Mutex::new(Inner { num_messages: 0, last_partition: 0, batch_by_partition }) }
    }

    /// Returns the next round-robin partition index and advances the cursor.
    pub fn next_round_robin(&self, num_partitions: usize) -> usize {
        let mut inner = self.inner.lock();
        let index = inner.last_partition % num_partitions;
        inner.last_partition = inner.last_partition.wrapping_add(1);
        index
    }

    /// Appends `node` to the partition's accumulating batch. Returns
    /// `true` if this is the first message accumulated since the last
    /// flush (the caller must register a batch callback / schedule a
    /// flush).
    pub fn push(&self, partition_index: usize, node: QueueNode) -> bool {
        let mut inner = self.inner.lock();
        let is_first = inner.num_messages == 0;
        inner.num_messages += 1;
        inner.batch_by_partition[partition_index].push(node);
        is_first
    }

    /// Detaches every per-partition batch accumulated since the last flush
    /// and resets the message counter, returning `(partition_index, batch)`
    /// pairs for every non-empty partition.
    pub fn take_batches(&self) -> Vec<(usize, LogSchedulerBatch)> {
        let mut inner = self.inner.lock();
        inner.num_messages = 0;
        let num_partitions = inner.batch_by_partition.len();
        let mut taken = Vec::new();
        for partition_index in 0..num_partitions {
            let batch = std::mem::take(&mut inner.batch_by_partition[partition_index]);
            if !batch.is_empty() {
                taken.push((partition_index, batch));
            }
        }
        taken
    }
}
