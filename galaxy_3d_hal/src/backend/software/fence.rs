//! Timeline fence of the software queue

use std::sync::Arc;

use super::queue::{QueueShared, SoftwareQueue};
use crate::error::Result;
use crate::sync::NativeFence;

/// Fence whose signals travel through the software queue
///
/// A signal completes once the worker has run every job queued before it.
pub struct SoftwareFence {
    queue: Arc<QueueShared>,
}

impl SoftwareFence {
    pub fn new(queue: &SoftwareQueue) -> Self {
        Self { queue: queue.shared() }
    }
}

impl NativeFence for SoftwareFence {
    fn signal(&self, value: u64) -> Result<()> {
        self.queue.signal(value)
    }

    fn completed_value(&self) -> Result<u64> {
        Ok(self.queue.completed_value())
    }

    fn wait(&self, value: u64) -> Result<()> {
        self.queue.wait(value)
    }
}
