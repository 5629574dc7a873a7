use std::sync::Arc;

use logline_nv::LogMessage;

use crate::batch::PathOptions;

/// The downstream sink a [`crate::LogScheduler`] re-injects messages into.
/// Implementors take ownership of the message reference they receive.
pub trait Pipe: Send + Sync {
    fn queue(&self, message: Arc<LogMessage>, path_options: PathOptions);
}

/// A [`Pipe`] that drops every message with the `AT_PROCESSED` disposition,
/// matching the "downstream pipe null" policy from the error-handling design
/// (§7): the scheduler has no concept of a null pipe object in safe Rust, so
/// this stands in for one.
pub struct NullPipe;

impl Pipe for NullPipe {
    fn queue(&self, _message: Arc<LogMessage>, _path_options: PathOptions) {
        log::trace!("dropping message with AT_PROCESSED ack disposition: pipe is null");
    }
}
