/*!
# Galaxy 3D HAL - Vulkan Translation

Vulkan vocabulary for the Galaxy 3D hardware abstraction layer.

Maps normalized descriptors to Ash create infos and usage bits, neutral
flags to Vulkan flags and gpu-allocator memory locations, and provides a
timeline-semaphore fence for the HAL's CPU/GPU synchronization.
*/

mod vulkan_flags;
mod vulkan_format;
mod vulkan_fence;

pub use vulkan_flags::VulkanFlagTables;
pub use vulkan_format::{
    aspect_mask, buffer_create_info, format_to_vk, full_subresource_range, image_create_info,
    image_type_to_vk, image_view_type_to_vk, sample_count_to_vk, shader_stage_to_vk, topology_to_vk,
    LAYER_CONVENTION,
};
pub use vulkan_fence::VulkanTimelineFence;

// Re-export Ash so callers use the same Vulkan bindings
pub use ash;
