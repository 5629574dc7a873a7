/// Abstraction over the worker pool the scheduler is embedded in. A real
/// event-loop runtime pairs `submit_continuation` with a
/// `register_batch_callback` hook fired at the end of an ingest batch; this
/// crate is library-only and has no event loop of its own, so
/// `register_batch_callback` is not modeled as a trait method — ingest code
/// calls [`crate::LogScheduler::flush_batch`] directly once per ingest batch,
/// which is the behavioral equivalent.
pub trait WorkerRuntime: Send + Sync {
    /// The calling thread's registered worker index, or `None` if it is not
    /// a registered worker thread (in which case the scheduler must fall
    /// back to a synchronous passthrough).
    fn current_thread_index(&self) -> Option<usize>;

    /// Upper bound on worker thread indices this runtime will ever report.
    fn max_threads(&self) -> usize;

    /// Whether this runtime can actually guarantee a continuation runs on a
    /// worker thread rather than inline. When `false`, the scheduler
    /// degrades to passthrough and warns once at construction time.
    fn supports_continuation(&self) -> bool {
        true
    }

    /// Submits `job` to run from a worker context, per the
    /// submit-as-continuation contract.
    fn submit_continuation(&self, job: Box<dyn FnOnce() + Send>);
}

/// A [`WorkerRuntime`] backed by the global `rayon` thread pool.
/// `current_thread_index` reflects rayon's own thread-local index, so it is
/// only meaningful when called from within rayon-spawned work.
pub struct RayonRuntime {
    max_threads: usize,
}

impl RayonRuntime {
    pub fn new(max_threads: usize) -> Self {
        RayonRuntime { max_threads }
    }
}

impl WorkerRuntime for RayonRuntime {
    fn current_thread_index(&self) -> Option<usize> {
        rayon::current_thread_index()
    }

    fn max_threads(&self) -> usize {
        self.max_threads
    }

    fn submit_continuation(&self, job: Box<dyn FnOnce() + Send>) {
        rayon::spawn(job);
    }
}

/// A deterministic, single-thread [`WorkerRuntime`] for tests and
/// single-threaded embedding: reports a fixed thread index and runs
/// "continuations" inline, immediately, on the calling thread.
pub struct InlineRuntime {
    thread_index: usize,
    max_threads: usize,
}

impl InlineRuntime {
    pub fn new(thread_index: usize, max_threads: usize) -> Self {
        InlineRuntime { thread_index, max_threads }
    }
}

impl WorkerRuntime for InlineRuntime {
    fn current_thread_index(&self) -> Option<usize> {
        Some(self.thread_index)
    }

    fn max_threads(&self) -> usize {
        self.max_threads
    }

    fn supports_continuation(&self) -> bool {
        // Running "inline" does not satisfy the guarantee that a
        // continuation runs on a worker thread, not synchronously in the
        // caller's own call stack -- so this runtime reports itself as
        // unable to honor the contract, forcing degrade-to-passthrough.
        false
    }

    fn submit_continuation(&self, job: Box<dyn FnOnce() + Send>) {
        job();
    }
}

/// A deferred-execution [`WorkerRuntime`] for deterministic tests that
/// exercise real partitioning and batching: `submit_continuation` queues the
/// job instead of running it, and [`ManualRuntime::drain`] runs queued jobs
/// (including any they themselves submit) until the queue is empty,
/// simulating a worker thread picking the job up later rather than the
/// caller running it synchronously.
pub struct ManualRuntime {
    thread_index: std::sync::atomic::AtomicUsize,
    max_threads: usize,
    pending: parking_lot::Mutex<std::collections::VecDeque<Box<dyn FnOnce() + Send>>>,
}

impl ManualRuntime {
    pub fn new(max_threads: usize) -> Self {
        ManualRuntime {
            thread_index: std::sync::atomic::AtomicUsize::new(0),
            max_threads,
            pending: parking_lot::Mutex::new(std::collections::VecDeque::new()),
        }
    }

    /// Changes which worker index `current_thread_index` reports, letting a
    /// single test thread simulate pushes arriving from several ingest
    /// threads in sequence.
    pub fn set_current_thread_index(&self, index: usize) {
        self.thread_index.store(index, std::sync::atomic::Ordering::SeqCst);
    }

    /// Runs every queued continuation, including ones newly queued by a job
    /// while it runs, until none remain.
    pub fn drain(&self) {
        loop {
            let job = self.pending.lock().pop_front();
            match job {
                Some(job) => job(),
                None => break,
            }
        }
    }
}

impl WorkerRuntime for ManualRuntime {
    fn current_thread_index(&self) -> Option<usize> {
        Some(self.thread_index.load(std::sync::atomic::Ordering::SeqCst))
    }

    fn max_threads(&self) -> usize {
        self.max_threads
    }

    fn submit_continuation(&self, job: Box<dyn FnOnce() + Send>) {
        self.pending.lock().push_back(job);
    }
}
