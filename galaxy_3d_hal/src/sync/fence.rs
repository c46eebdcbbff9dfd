//! GPU timeline fence
//!
//! A fence is a 64-bit counter advanced by the GPU timeline. The CPU
//! enqueues signals of increasing values behind submitted work and blocks
//! until a value is reached.

use std::sync::Mutex;

use crate::error::{Error, Result};
use crate::{hal_bail, hal_err, hal_trace};

const SOURCE: &str = "galaxy3d::hal::fence";

/// Native timeline primitive of a backend
///
/// Implementations report failures as `BackendError`; `GpuFence` turns
/// them into `DeviceLost`.
pub trait NativeFence: Send + Sync {
    /// Enqueue a GPU-side signal of `value` behind all submitted work
    fn signal(&self, value: u64) -> Result<()>;

    /// Highest value the GPU has reached
    fn completed_value(&self) -> Result<u64>;

    /// Block the calling thread until `value` is reached
    fn wait(&self, value: u64) -> Result<()>;
}

/// Monotonic CPU-side view of a native fence
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_hal::galaxy3d::sync::{GpuFence, NativeFence};
/// # fn demo<F: NativeFence>(fence: GpuFence<F>) -> galaxy_3d_hal::galaxy3d::Result<()> {
/// let value = fence.signal_next()?;
/// fence.wait_until(value)?;
/// assert!(fence.completed_value()? >= value);
/// # Ok(())
/// # }
/// ```
pub struct GpuFence<F: NativeFence> {
    native: F,
    /// Last value handed to the native fence
    last_signaled: Mutex<u64>,
}

impl<F: NativeFence> GpuFence<F> {
    /// Wrap a native fence whose counter starts at `initial_value`
    pub fn new(native: F, initial_value: u64) -> Self {
        Self { native, last_signaled: Mutex::new(initial_value) }
    }

    pub fn native(&self) -> &F {
        &self.native
    }

    /// Last value passed to `signal`
    pub fn last_signaled(&self) -> u64 {
        self.last_signaled.lock().map(|v| *v).unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    /// Value the next `signal_next` will use
    pub fn next_value(&self) -> u64 {
        self.last_signaled() + 1
    }

    /// Enqueue a GPU-side signal of `target`; does not block
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `target` is not greater than the last signal
    /// - `DeviceLost` if the native signal fails
    pub fn signal(&self, target: u64) -> Result<()> {
        let mut last = self.lock_last()?;
        if target <= *last {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "fence values must increase: {} after {}",
                target,
                *last
            );
        }
        self.native.signal(target).map_err(|e| lost("signal", e))?;
        *last = target;
        hal_trace!(SOURCE, "signal {}", target);
        Ok(())
    }

    /// Signal the next value and return it
    pub fn signal_next(&self) -> Result<u64> {
        let mut last = self.lock_last()?;
        let target = *last + 1;
        self.native.signal(target).map_err(|e| lost("signal", e))?;
        *last = target;
        Ok(target)
    }

    /// Highest value the GPU has reached
    pub fn completed_value(&self) -> Result<u64> {
        self.native.completed_value().map_err(|e| lost("query", e))
    }

    /// Block until `target` is reached; returns at once if it already is
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `target` was never signaled (the wait could not end)
    /// - `DeviceLost` if the native wait fails
    pub fn wait_until(&self, target: u64) -> Result<()> {
        if self.completed_value()? >= target {
            return Ok(());
        }
        let last = self.last_signaled();
        if target > last {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "waiting for {} which was never signaled (last signal {})",
                target,
                last
            );
        }
        self.native.wait(target).map_err(|e| lost("wait", e))
    }

    /// Signal the next value and wait for it: all work submitted so far is done
    /// when this returns
    pub fn sync_gpu(&self) -> Result<u64> {
        let value = self.signal_next()?;
        self.wait_until(value)?;
        Ok(value)
    }

    fn lock_last(&self) -> Result<std::sync::MutexGuard<'_, u64>> {
        self.last_signaled
            .lock()
            .map_err(|_| hal_err!(BackendError, SOURCE, "fence lock poisoned"))
    }
}

fn lost(operation: &str, cause: Error) -> Error {
    hal_err!(DeviceLost, SOURCE, "fence {} failed: {}", operation, cause)
}

#[cfg(test)]
#[path = "fence_tests.rs"]
mod tests;
