//! Software GPU queue
//!
//! One worker thread plays the GPU timeline: it runs queued jobs in
//! submission order and advances the completed counter when it reaches a
//! signal. The CPU side only enqueues; waiting blocks on a condition
//! variable until the counter catches up or the worker is gone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};

use crate::error::Result;
use crate::{hal_debug, hal_err, hal_warn};

const SOURCE: &str = "galaxy3d::hal::software";

type Job = Box<dyn FnOnce() + Send>;

enum Command {
    Run(Job),
    Signal(u64),
    /// Stop as if the device had been removed
    Lose,
    Shutdown,
}

/// Completed counter shared by the worker and the waiters
#[derive(Default)]
struct Timeline {
    completed: Mutex<u64>,
    advanced: Condvar,
    lost: AtomicBool,
}

impl Timeline {
    fn lock(&self) -> MutexGuard<'_, u64> {
        self.completed.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn advance(&self, value: u64) {
        let mut completed = self.lock();
        if value > *completed {
            *completed = value;
        }
        self.advanced.notify_all();
    }

    fn mark_lost(&self) {
        let _completed = self.lock();
        self.lost.store(true, Ordering::SeqCst);
        self.advanced.notify_all();
    }
}

/// Marks the timeline lost when the worker exits for any reason other than
/// an orderly shutdown, including a panicking job
struct LossGuard {
    timeline: Arc<Timeline>,
    orderly: bool,
}

impl Drop for LossGuard {
    fn drop(&mut self) {
        if !self.orderly {
            self.timeline.mark_lost();
        }
    }
}

/// State shared between the queue and the fences created on it
pub(crate) struct QueueShared {
    sender: Mutex<Sender<Command>>,
    timeline: Arc<Timeline>,
}

impl QueueShared {
    fn send(&self, command: Command) -> Result<()> {
        let sender = self.sender.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        sender
            .send(command)
            .map_err(|_| hal_err!(BackendError, SOURCE, "software queue is gone"))
    }

    pub(crate) fn submit(&self, job: Job) -> Result<()> {
        self.send(Command::Run(job))
    }

    pub(crate) fn signal(&self, value: u64) -> Result<()> {
        self.send(Command::Signal(value))
    }

    pub(crate) fn completed_value(&self) -> u64 {
        *self.timeline.lock()
    }

    pub(crate) fn is_lost(&self) -> bool {
        self.timeline.lost.load(Ordering::SeqCst)
    }

    /// Block until `value` completes
    ///
    /// # Errors
    ///
    /// `BackendError` when the worker stops before reaching `value`.
    pub(crate) fn wait(&self, value: u64) -> Result<()> {
        let mut completed = self.timeline.lock();
        while *completed < value {
            if self.is_lost() {
                return Err(hal_err!(
                    BackendError,
                    SOURCE,
                    "software queue stopped at {} before reaching {}",
                    *completed,
                    value
                ));
            }
            completed = self
                .timeline
                .advanced
                .wait(completed)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        Ok(())
    }
}

/// Submission queue of the software device
pub struct SoftwareQueue {
    shared: Arc<QueueShared>,
    worker: Option<JoinHandle<()>>,
}

impl SoftwareQueue {
    /// Start the worker thread
    pub fn new() -> Result<Self> {
        let (sender, receiver) = mpsc::channel();
        let timeline = Arc::new(Timeline::default());

        let worker_timeline = Arc::clone(&timeline);
        let worker = thread::Builder::new()
            .name("galaxy3d-software-queue".to_string())
            .spawn(move || run_worker(receiver, worker_timeline))
            .map_err(|e| hal_err!(BackendError, SOURCE, "failed to start software queue: {}", e))?;

        Ok(Self {
            shared: Arc::new(QueueShared { sender: Mutex::new(sender), timeline }),
            worker: Some(worker),
        })
    }

    pub(crate) fn shared(&self) -> Arc<QueueShared> {
        Arc::clone(&self.shared)
    }

    /// Queue a job behind everything submitted so far
    pub fn submit<F: FnOnce() + Send + 'static>(&self, job: F) -> Result<()> {
        self.shared.submit(Box::new(job))
    }

    pub fn completed_value(&self) -> u64 {
        self.shared.completed_value()
    }

    pub fn is_lost(&self) -> bool {
        self.shared.is_lost()
    }

    /// Stop the worker after the work queued so far, as a removed device would
    pub fn simulate_device_loss(&self) -> Result<()> {
        hal_warn!(SOURCE, "Simulating device loss");
        self.shared.send(Command::Lose)
    }
}

impl Drop for SoftwareQueue {
    fn drop(&mut self) {
        let _ = self.shared.send(Command::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                hal_warn!(SOURCE, "Software queue worker panicked");
            }
        }
    }
}

fn run_worker(receiver: Receiver<Command>, timeline: Arc<Timeline>) {
    let mut guard = LossGuard { timeline, orderly: false };
    for command in receiver {
        match command {
            Command::Run(job) => job(),
            Command::Signal(value) => guard.timeline.advance(value),
            Command::Lose => return,
            Command::Shutdown => {
                guard.orderly = true;
                hal_debug!(SOURCE, "Software queue drained at {}", *guard.timeline.lock());
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
