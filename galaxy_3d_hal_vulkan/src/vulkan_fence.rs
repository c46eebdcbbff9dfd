/// Timeline semaphore fence
///
/// A Vulkan 1.2 timeline semaphore is the native form of the HAL fence: a
/// 64-bit counter signaled from the queue and waited on from the host.

use std::sync::Mutex;

use ash::vk;
use galaxy_3d_hal::galaxy3d::sync::NativeFence;
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::{hal_debug, hal_err};

const SOURCE: &str = "galaxy3d::hal::vulkan";

/// `NativeFence` over a timeline semaphore
pub struct VulkanTimelineFence {
    device: ash::Device,
    semaphore: vk::Semaphore,
    /// Queue submissions must be externally synchronized
    queue: Mutex<vk::Queue>,
}

impl VulkanTimelineFence {
    /// Create the semaphore
    ///
    /// # Arguments
    ///
    /// * `device` - Device created with the `timelineSemaphore` feature
    /// * `queue` - Queue the signals are submitted to
    /// * `initial_value` - Starting counter value
    pub fn new(device: &ash::Device, queue: vk::Queue, initial_value: u64) -> Result<Self> {
        let mut type_info = vk::SemaphoreTypeCreateInfo::default()
            .semaphore_type(vk::SemaphoreType::TIMELINE)
            .initial_value(initial_value);
        let create_info = vk::SemaphoreCreateInfo::default().push_next(&mut type_info);

        let semaphore = unsafe { device.create_semaphore(&create_info, None) }
            .map_err(|e| hal_err!(BackendError, SOURCE, "Failed to create timeline semaphore: {:?}", e))?;
        hal_debug!(SOURCE, "Timeline semaphore created at value {}", initial_value);

        Ok(Self { device: device.clone(), semaphore, queue: Mutex::new(queue) })
    }

    pub fn semaphore(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl NativeFence for VulkanTimelineFence {
    fn signal(&self, value: u64) -> Result<()> {
        let semaphores = [self.semaphore];
        let values = [value];
        let mut timeline_info = vk::TimelineSemaphoreSubmitInfo::default().signal_semaphore_values(&values);
        let submit_info = vk::SubmitInfo::default()
            .signal_semaphores(&semaphores)
            .push_next(&mut timeline_info);

        let queue = self
            .queue
            .lock()
            .map_err(|_| hal_err!(BackendError, SOURCE, "Queue lock poisoned"))?;
        unsafe { self.device.queue_submit(*queue, &[submit_info], vk::Fence::null()) }
            .map_err(|e| hal_err!(BackendError, SOURCE, "Failed to signal {}: {:?}", value, e))
    }

    fn completed_value(&self) -> Result<u64> {
        unsafe { self.device.get_semaphore_counter_value(self.semaphore) }
            .map_err(|e| hal_err!(BackendError, SOURCE, "Failed to read semaphore counter: {:?}", e))
    }

    fn wait(&self, value: u64) -> Result<()> {
        let semaphores = [self.semaphore];
        let values = [value];
        let wait_info = vk::SemaphoreWaitInfo::default().semaphores(&semaphores).values(&values);

        unsafe { self.device.wait_semaphores(&wait_info, u64::MAX) }
            .map_err(|e| hal_err!(BackendError, SOURCE, "Failed to wait for {}: {:?}", value, e))
    }
}

impl Drop for VulkanTimelineFence {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore, None);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_fence_tests.rs"]
mod tests;
