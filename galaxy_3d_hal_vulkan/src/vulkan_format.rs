/// Format, dimension and create-info conversion to Vulkan
///
/// Everything here is a pure function of a normalized descriptor, so it can
/// be checked without a GPU.

use ash::vk;
use galaxy_3d_hal::galaxy3d::descriptor::{PrimitiveTopology, ShaderStage, TextureFormat, TextureType};
use galaxy_3d_hal::galaxy3d::normalize::{LayerConvention, NormalizedBufferDesc, NormalizedTextureDesc};
use galaxy_3d_hal::galaxy3d::translate::NativeFlagTables;
use galaxy_3d_hal::galaxy3d::Result;
use galaxy_3d_hal::hal_bail;

use crate::vulkan_flags::VulkanFlagTables;

const SOURCE: &str = "galaxy3d::hal::vulkan";

/// Vulkan images count every cube face as one array layer
pub const LAYER_CONVENTION: LayerConvention = LayerConvention::CubeFacesAsLayers;

/// Convert TextureFormat to Vulkan format
pub fn format_to_vk(format: TextureFormat) -> vk::Format {
    match format {
        TextureFormat::R8_UNORM => vk::Format::R8_UNORM,
        TextureFormat::R8G8_UNORM => vk::Format::R8G8_UNORM,
        TextureFormat::R8G8B8A8_UNORM => vk::Format::R8G8B8A8_UNORM,
        TextureFormat::R8G8B8A8_SRGB => vk::Format::R8G8B8A8_SRGB,
        TextureFormat::B8G8R8A8_UNORM => vk::Format::B8G8R8A8_UNORM,
        TextureFormat::B8G8R8A8_SRGB => vk::Format::B8G8R8A8_SRGB,
        TextureFormat::R16G16B16A16_SFLOAT => vk::Format::R16G16B16A16_SFLOAT,
        TextureFormat::R32_SFLOAT => vk::Format::R32_SFLOAT,
        TextureFormat::R32_UINT => vk::Format::R32_UINT,
        TextureFormat::R32G32B32A32_SFLOAT => vk::Format::R32G32B32A32_SFLOAT,
        TextureFormat::D16_UNORM => vk::Format::D16_UNORM,
        TextureFormat::D24_UNORM_S8_UINT => vk::Format::D24_UNORM_S8_UINT,
        TextureFormat::D32_FLOAT => vk::Format::D32_SFLOAT,
    }
}

/// Aspects a view of `format` covers
pub fn aspect_mask(format: TextureFormat) -> vk::ImageAspectFlags {
    match format {
        TextureFormat::D24_UNORM_S8_UINT => vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL,
        TextureFormat::D16_UNORM | TextureFormat::D32_FLOAT => vk::ImageAspectFlags::DEPTH,
        _ => vk::ImageAspectFlags::COLOR,
    }
}

pub fn image_type_to_vk(texture_type: TextureType) -> vk::ImageType {
    match texture_type {
        TextureType::Texture1D | TextureType::Texture1DArray => vk::ImageType::TYPE_1D,
        TextureType::Texture2D
        | TextureType::Texture2DArray
        | TextureType::TextureCube
        | TextureType::TextureCubeArray => vk::ImageType::TYPE_2D,
        TextureType::Texture3D => vk::ImageType::TYPE_3D,
    }
}

pub fn image_view_type_to_vk(texture_type: TextureType) -> vk::ImageViewType {
    match texture_type {
        TextureType::Texture1D => vk::ImageViewType::TYPE_1D,
        TextureType::Texture1DArray => vk::ImageViewType::TYPE_1D_ARRAY,
        TextureType::Texture2D => vk::ImageViewType::TYPE_2D,
        TextureType::Texture2DArray => vk::ImageViewType::TYPE_2D_ARRAY,
        TextureType::Texture3D => vk::ImageViewType::TYPE_3D,
        TextureType::TextureCube => vk::ImageViewType::CUBE,
        TextureType::TextureCubeArray => vk::ImageViewType::CUBE_ARRAY,
    }
}

/// Convert ShaderStage to Vulkan shader stage flags
pub fn shader_stage_to_vk(stage: ShaderStage) -> vk::ShaderStageFlags {
    match stage {
        ShaderStage::Vertex => vk::ShaderStageFlags::VERTEX,
        ShaderStage::TessControl => vk::ShaderStageFlags::TESSELLATION_CONTROL,
        ShaderStage::TessEvaluation => vk::ShaderStageFlags::TESSELLATION_EVALUATION,
        ShaderStage::Geometry => vk::ShaderStageFlags::GEOMETRY,
        ShaderStage::Fragment => vk::ShaderStageFlags::FRAGMENT,
        ShaderStage::Compute => vk::ShaderStageFlags::COMPUTE,
    }
}

/// Topology plus the patch control point count (0 outside tessellation)
pub fn topology_to_vk(topology: PrimitiveTopology) -> (vk::PrimitiveTopology, u32) {
    match topology {
        PrimitiveTopology::PointList => (vk::PrimitiveTopology::POINT_LIST, 0),
        PrimitiveTopology::LineList => (vk::PrimitiveTopology::LINE_LIST, 0),
        PrimitiveTopology::LineStrip => (vk::PrimitiveTopology::LINE_STRIP, 0),
        PrimitiveTopology::TriangleList => (vk::PrimitiveTopology::TRIANGLE_LIST, 0),
        PrimitiveTopology::TriangleStrip => (vk::PrimitiveTopology::TRIANGLE_STRIP, 0),
        PrimitiveTopology::Patches(points) => (vk::PrimitiveTopology::PATCH_LIST, points),
    }
}

/// Sample count flag, `None` for counts Vulkan cannot express
pub fn sample_count_to_vk(count: u32) -> Option<vk::SampleCountFlags> {
    match count {
        1 => Some(vk::SampleCountFlags::TYPE_1),
        2 => Some(vk::SampleCountFlags::TYPE_2),
        4 => Some(vk::SampleCountFlags::TYPE_4),
        8 => Some(vk::SampleCountFlags::TYPE_8),
        16 => Some(vk::SampleCountFlags::TYPE_16),
        32 => Some(vk::SampleCountFlags::TYPE_32),
        64 => Some(vk::SampleCountFlags::TYPE_64),
        _ => None,
    }
}

/// Image create info for a normalized texture
///
/// Images are always uploadable, hence `TRANSFER_DST` on top of the
/// translated usage.
///
/// # Errors
///
/// `InvalidArgument` if the descriptor was normalized with cube elements as
/// layers.
pub fn image_create_info(desc: &NormalizedTextureDesc) -> Result<vk::ImageCreateInfo<'static>> {
    if desc.convention != LAYER_CONVENTION {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "texture was normalized for {:?}, Vulkan needs {:?}",
            desc.convention,
            LAYER_CONVENTION
        );
    }

    let usage = VulkanFlagTables::texture_bind_flags(desc) | vk::ImageUsageFlags::TRANSFER_DST;
    Ok(vk::ImageCreateInfo::default()
        .flags(VulkanFlagTables::texture_misc_flags(desc))
        .image_type(image_type_to_vk(desc.texture_type))
        .format(format_to_vk(desc.format))
        .extent(vk::Extent3D { width: desc.width, height: desc.height, depth: desc.depth })
        .mip_levels(desc.mip_levels)
        .array_layers(desc.array_layers)
        .samples(vk::SampleCountFlags::TYPE_1)
        .tiling(vk::ImageTiling::OPTIMAL)
        .usage(usage)
        .sharing_mode(vk::SharingMode::EXCLUSIVE)
        .initial_layout(vk::ImageLayout::UNDEFINED))
}

/// Subresource range covering every mip and layer of a texture
pub fn full_subresource_range(desc: &NormalizedTextureDesc) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask: aspect_mask(desc.format),
        base_mip_level: 0,
        level_count: desc.mip_levels,
        base_array_layer: 0,
        layer_count: desc.array_layers,
    }
}

/// Buffer create info for a normalized buffer
pub fn buffer_create_info(desc: &NormalizedBufferDesc) -> vk::BufferCreateInfo<'static> {
    let usage = VulkanFlagTables::buffer_bind_flags(desc.bind_flags)
        | VulkanFlagTables::buffer_misc_flags(&desc.to_desc())
        | vk::BufferUsageFlags::TRANSFER_DST
        | vk::BufferUsageFlags::TRANSFER_SRC;
    vk::BufferCreateInfo::default()
        .size(desc.size)
        .usage(usage)
        .sharing_mode(vk::SharingMode::EXCLUSIVE)
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
