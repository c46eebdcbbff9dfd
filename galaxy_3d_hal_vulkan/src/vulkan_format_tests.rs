//! Unit tests for Vulkan format and create-info conversion
//!
//! Tests pure conversion functions without requiring GPU.

use super::*;
use galaxy_3d_hal::galaxy3d::descriptor::{BufferDesc, MipPolicy, TextureDesc};
use galaxy_3d_hal::galaxy3d::normalize::{normalize_buffer, normalize_texture};
use galaxy_3d_hal::galaxy3d::Error;

fn texture(desc: TextureDesc) -> NormalizedTextureDesc {
    normalize_texture(&desc, LAYER_CONVENTION).unwrap()
}

// ============================================================================
// FORMATS
// ============================================================================

#[test]
fn test_color_formats() {
    assert_eq!(format_to_vk(TextureFormat::R8_UNORM), vk::Format::R8_UNORM);
    assert_eq!(format_to_vk(TextureFormat::R8G8B8A8_SRGB), vk::Format::R8G8B8A8_SRGB);
    assert_eq!(format_to_vk(TextureFormat::B8G8R8A8_UNORM), vk::Format::B8G8R8A8_UNORM);
    assert_eq!(format_to_vk(TextureFormat::R16G16B16A16_SFLOAT), vk::Format::R16G16B16A16_SFLOAT);
    assert_eq!(format_to_vk(TextureFormat::R32_UINT), vk::Format::R32_UINT);
}

#[test]
fn test_depth_formats_and_aspects() {
    assert_eq!(format_to_vk(TextureFormat::D32_FLOAT), vk::Format::D32_SFLOAT);
    assert_eq!(format_to_vk(TextureFormat::D24_UNORM_S8_UINT), vk::Format::D24_UNORM_S8_UINT);

    assert_eq!(aspect_mask(TextureFormat::D16_UNORM), vk::ImageAspectFlags::DEPTH);
    assert_eq!(
        aspect_mask(TextureFormat::D24_UNORM_S8_UINT),
        vk::ImageAspectFlags::DEPTH | vk::ImageAspectFlags::STENCIL
    );
    assert_eq!(aspect_mask(TextureFormat::R8G8B8A8_UNORM), vk::ImageAspectFlags::COLOR);
}

// ============================================================================
// DIMENSIONS
// ============================================================================

#[test]
fn test_image_and_view_types() {
    let cases = [
        (TextureType::Texture1D, vk::ImageType::TYPE_1D, vk::ImageViewType::TYPE_1D),
        (TextureType::Texture1DArray, vk::ImageType::TYPE_1D, vk::ImageViewType::TYPE_1D_ARRAY),
        (TextureType::Texture2D, vk::ImageType::TYPE_2D, vk::ImageViewType::TYPE_2D),
        (TextureType::Texture2DArray, vk::ImageType::TYPE_2D, vk::ImageViewType::TYPE_2D_ARRAY),
        (TextureType::Texture3D, vk::ImageType::TYPE_3D, vk::ImageViewType::TYPE_3D),
        (TextureType::TextureCube, vk::ImageType::TYPE_2D, vk::ImageViewType::CUBE),
        (TextureType::TextureCubeArray, vk::ImageType::TYPE_2D, vk::ImageViewType::CUBE_ARRAY),
    ];
    for (texture_type, image, view) in cases {
        assert_eq!(image_type_to_vk(texture_type), image, "{:?}", texture_type);
        assert_eq!(image_view_type_to_vk(texture_type), view, "{:?}", texture_type);
    }
}

// ============================================================================
// PIPELINE STATE
// ============================================================================

#[test]
fn test_shader_stages() {
    assert_eq!(shader_stage_to_vk(ShaderStage::TessControl), vk::ShaderStageFlags::TESSELLATION_CONTROL);
    assert_eq!(shader_stage_to_vk(ShaderStage::Geometry), vk::ShaderStageFlags::GEOMETRY);
    assert_eq!(shader_stage_to_vk(ShaderStage::Compute), vk::ShaderStageFlags::COMPUTE);
}

#[test]
fn test_patch_topology_keeps_control_points() {
    assert_eq!(topology_to_vk(PrimitiveTopology::Patches(4)), (vk::PrimitiveTopology::PATCH_LIST, 4));
    assert_eq!(topology_to_vk(PrimitiveTopology::TriangleStrip), (vk::PrimitiveTopology::TRIANGLE_STRIP, 0));
}

#[test]
fn test_sample_counts() {
    assert_eq!(sample_count_to_vk(1), Some(vk::SampleCountFlags::TYPE_1));
    assert_eq!(sample_count_to_vk(8), Some(vk::SampleCountFlags::TYPE_8));
    assert_eq!(sample_count_to_vk(3), None);
    assert_eq!(sample_count_to_vk(128), None);
}

// ============================================================================
// CREATE INFOS
// ============================================================================

#[test]
fn test_cube_array_image_counts_faces() {
    let desc = texture(TextureDesc {
        texture_type: TextureType::TextureCubeArray,
        width: 16,
        height: 16,
        array_layers: 2,
        ..Default::default()
    });

    let info = image_create_info(&desc).unwrap();

    assert_eq!(info.array_layers, 12);
    assert_eq!(info.image_type, vk::ImageType::TYPE_2D);
    assert!(info.flags.contains(vk::ImageCreateFlags::CUBE_COMPATIBLE));
    assert!(info.usage.contains(vk::ImageUsageFlags::TRANSFER_DST));
    assert_eq!(full_subresource_range(&desc).layer_count, 12);
}

#[test]
fn test_mip_chain_image() {
    let desc = texture(TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 256, 64).with_mips(MipPolicy::FullChain));

    let info = image_create_info(&desc).unwrap();

    assert_eq!(info.mip_levels, 9);
    assert_eq!(info.extent, vk::Extent3D { width: 256, height: 64, depth: 1 });
    assert_eq!(info.format, vk::Format::R8G8B8A8_UNORM);
}

#[test]
fn test_image_rejects_cube_element_convention() {
    let desc = normalize_texture(&TextureDesc::cube(TextureFormat::R8_UNORM, 8), LayerConvention::CubeAsElement).unwrap();

    assert!(matches!(image_create_info(&desc), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_buffer_create_info_merges_bind_and_misc() {
    let desc = normalize_buffer(&BufferDesc::structured(32, 16)).unwrap();

    let info = buffer_create_info(&desc);

    assert_eq!(info.size, 512);
    assert!(info.usage.contains(vk::BufferUsageFlags::STORAGE_BUFFER));
    assert!(info.usage.contains(vk::BufferUsageFlags::STORAGE_TEXEL_BUFFER));
    assert!(info.usage.contains(vk::BufferUsageFlags::UNIFORM_TEXEL_BUFFER));
}
