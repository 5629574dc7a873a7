use std::sync::Arc;

use logline_nv::LogMessage;

/// Flow-control and acknowledgement flags carried alongside a message
/// through the scheduler; the scheduler never inspects them beyond copying
/// them through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathOptions {
    pub ack_needed: bool,
    pub flow_control_requested: bool,
}

/// One message plus its path options, the unit a [`LogSchedulerBatch`]
/// carries.
pub struct QueueNode {
    pub message: Arc<LogMessage>,
    pub path_options: PathOptions,
}

/// An ordered list of queue-nodes, the transfer unit between an ingest
/// thread's per-partition accumulation and a partition worker.
#[derive(Default)]
pub struct LogSchedulerBatch {
    nodes: Vec<QueueNode>,
}

impl LogSchedulerBatch {
    pub fn push(&mut self, node: QueueNode) {
        self.nodes.push(node);
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn into_nodes(self) -> Vec<QueueNode> {
        self.nodes
    }
}
