use logline_template::LogTemplate;

/// Hard ceiling on `num_partitions`; requests above this are clamped and a
/// warning is logged once, matching `LOGSCHEDULER_MAX_PARTITIONS`.
pub const LOGSCHEDULER_MAX_PARTITIONS: usize = 64;

/// Configuration accepted by [`crate::LogScheduler::new`].
pub struct SchedulerOptions {
    /// `0` disables parallelism: `push` degenerates to a synchronous
    /// passthrough into the downstream pipe. `1..=LOGSCHEDULER_MAX_PARTITIONS`
    /// selects parallel partitioning.
    pub num_partitions: usize,
    /// When set, partitioning hashes this template's evaluation against the
    /// message; when `None`, partitioning is round-robin per ingest thread.
    pub partition_key: Option<LogTemplate>,
    /// Upper bound on concurrently registered ingest threads; per-thread
    /// scratch state is preallocated for this many slots.
    pub max_threads: usize,
}

impl SchedulerOptions {
    /// Builds options, clamping `num_partitions` to
    /// [`LOGSCHEDULER_MAX_PARTITIONS`] and logging once if it had to.
    pub fn new(num_partitions: usize, partition_key: Option<LogTemplate>, max_threads: usize) -> Self {
        let clamped = if num_partitions > LOGSCHEDULER_MAX_PARTITIONS {
            log::warn!(
                "num_partitions {num_partitions} exceeds LOGSCHEDULER_MAX_PARTITIONS \
                 ({LOGSCHEDULER_MAX_PARTITIONS}); clamping"
            );
            LOGSCHEDULER_MAX_PARTITIONS
        } else {
            num_partitions
        };
        SchedulerOptions { num_partitions: clamped, partition_key, max_threads }
    }
}
