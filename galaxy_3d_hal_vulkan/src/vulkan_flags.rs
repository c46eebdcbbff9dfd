/// Vulkan flag model
///
/// Vulkan splits the neutral flags over usage bits, image creation flags,
/// memory properties and allocator memory locations.

use ash::vk;
use galaxy_3d_hal::galaxy3d::descriptor::{BindFlags, BufferDesc, CpuAccessFlags};
use galaxy_3d_hal::galaxy3d::normalize::NormalizedTextureDesc;
use galaxy_3d_hal::galaxy3d::translate::{NativeFlagTables, UsageMode};
use gpu_allocator::MemoryLocation;

/// Vulkan translation tables
///
/// Typed views of buffers are texel buffers (bind table); structured and
/// byte-address buffers are storage buffers (misc table). Indirect argument
/// buffers have a usage bit of their own. A resource is created with the
/// union of its bind and misc bits.
pub struct VulkanFlagTables;

impl NativeFlagTables for VulkanFlagTables {
    type BufferBind = vk::BufferUsageFlags;
    type TextureBind = vk::ImageUsageFlags;
    type CpuAccess = vk::MemoryPropertyFlags;
    type BufferMisc = vk::BufferUsageFlags;
    type TextureMisc = vk::ImageCreateFlags;
    type Usage = MemoryLocation;

    const API_NAME: &'static str = "Vulkan";

    fn buffer_bind_flags(flags: BindFlags) -> vk::BufferUsageFlags {
        let table = [
            (BindFlags::VERTEX_BUFFER, vk::BufferUsageFlags::VERTEX_BUFFER),
            (BindFlags::INDEX_BUFFER, vk::BufferUsageFlags::INDEX_BUFFER),
            (BindFlags::CONSTANT_BUFFER, vk::BufferUsageFlags::UNIFORM_BUFFER),
            (BindFlags::STREAM_OUTPUT_BUFFER, vk::BufferUsageFlags::TRANSFORM_FEEDBACK_BUFFER_EXT),
            (BindFlags::INDIRECT_BUFFER, vk::BufferUsageFlags::INDIRECT_BUFFER),
            (BindFlags::SAMPLE_BUFFER, vk::BufferUsageFlags::UNIFORM_TEXEL_BUFFER),
            (BindFlags::RW_STORAGE_BUFFER, vk::BufferUsageFlags::STORAGE_TEXEL_BUFFER),
        ];
        table
            .iter()
            .filter(|(neutral, _)| flags.contains(*neutral))
            .fold(vk::BufferUsageFlags::empty(), |native, (_, bit)| native | *bit)
    }

    fn texture_bind_flags(desc: &NormalizedTextureDesc) -> vk::ImageUsageFlags {
        let mut native = vk::ImageUsageFlags::empty();
        let mip_mapped = desc.is_mip_mapped();

        if desc.bind_flags.contains(BindFlags::DEPTH_STENCIL_ATTACHMENT) {
            native |= vk::ImageUsageFlags::DEPTH_STENCIL_ATTACHMENT;
        } else if desc.supports_mip_generation() || desc.bind_flags.contains(BindFlags::COLOR_ATTACHMENT) {
            native |= vk::ImageUsageFlags::COLOR_ATTACHMENT;
        }
        if mip_mapped || desc.bind_flags.contains(BindFlags::SAMPLE_BUFFER) {
            native |= vk::ImageUsageFlags::SAMPLED;
        }
        if desc.bind_flags.contains(BindFlags::RW_STORAGE_BUFFER) {
            native |= vk::ImageUsageFlags::STORAGE;
        }
        // Mip levels are generated with blits from level to level
        if desc.supports_mip_generation() {
            native |= vk::ImageUsageFlags::TRANSFER_SRC | vk::ImageUsageFlags::TRANSFER_DST;
        }
        native
    }

    fn cpu_access_flags(access: CpuAccessFlags) -> vk::MemoryPropertyFlags {
        let mut native = vk::MemoryPropertyFlags::empty();
        if access.contains(CpuAccessFlags::READ) {
            native |= vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_CACHED;
        }
        if access.contains(CpuAccessFlags::WRITE) {
            native |= vk::MemoryPropertyFlags::HOST_VISIBLE | vk::MemoryPropertyFlags::HOST_COHERENT;
        }
        native
    }

    fn buffer_misc_flags(desc: &BufferDesc) -> vk::BufferUsageFlags {
        let viewed = desc.bind_flags.intersects(BindFlags::SAMPLE_BUFFER | BindFlags::RW_STORAGE_BUFFER);
        let raw_layout = desc.storage_type.is_structured() || desc.storage_type.is_byte_address();
        if viewed && raw_layout {
            vk::BufferUsageFlags::STORAGE_BUFFER
        } else {
            vk::BufferUsageFlags::empty()
        }
    }

    fn texture_misc_flags(desc: &NormalizedTextureDesc) -> vk::ImageCreateFlags {
        if desc.texture_type.is_cube() {
            vk::ImageCreateFlags::CUBE_COMPATIBLE
        } else {
            vk::ImageCreateFlags::empty()
        }
    }

    fn usage(mode: UsageMode) -> MemoryLocation {
        match mode {
            UsageMode::GpuOnly => MemoryLocation::GpuOnly,
            UsageMode::Dynamic => MemoryLocation::CpuToGpu,
            UsageMode::ReadBack => MemoryLocation::GpuToCpu,
        }
    }
}

#[cfg(test)]
#[path = "vulkan_flags_tests.rs"]
mod tests;
