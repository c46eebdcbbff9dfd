//! Integration tests comparing the Vulkan and Direct3D 11 vocabularies
//!
//! The same neutral descriptors go through both flag tables; the native
//! words differ but the intent they carry must match. No GPU required.
//!
//! Run with: cargo test --test translation_integration_tests

use galaxy_3d_hal::galaxy3d::descriptor::{
    BindFlags, BufferDesc, MipPolicy, TextureDesc, TextureFormat, TextureType,
};
use galaxy_3d_hal::galaxy3d::normalize::{normalize_buffer, normalize_texture};
use galaxy_3d_hal::galaxy3d::translate::d3d11::{
    D3D11BindFlags, D3D11FlagTables, D3D11MiscFlags, D3D11Usage,
};
use galaxy_3d_hal::galaxy3d::translate::NativeFlagTables;
use galaxy_3d_hal_vulkan::ash::vk;
use galaxy_3d_hal_vulkan::{buffer_create_info, image_create_info, VulkanFlagTables, LAYER_CONVENTION};
use gpu_allocator::MemoryLocation;

// ============================================================================
// BUFFERS
// ============================================================================

#[test]
fn test_integration_readback_buffer_in_both_apis() {
    let desc = normalize_buffer(&BufferDesc::readback(256)).unwrap();

    assert_eq!(D3D11FlagTables::usage(desc.usage), D3D11Usage::Staging);
    assert_eq!(VulkanFlagTables::usage(desc.usage), MemoryLocation::GpuToCpu);
    assert!(VulkanFlagTables::cpu_access_flags(desc.cpu_access).contains(vk::MemoryPropertyFlags::HOST_VISIBLE));
}

#[test]
fn test_integration_constant_buffer_in_both_apis() {
    let desc = normalize_buffer(&BufferDesc::constant(64)).unwrap();

    assert_eq!(D3D11FlagTables::usage(desc.usage), D3D11Usage::Dynamic);
    assert_eq!(D3D11FlagTables::buffer_bind_flags(desc.bind_flags), D3D11BindFlags::CONSTANT_BUFFER);
    assert_eq!(VulkanFlagTables::usage(desc.usage), MemoryLocation::CpuToGpu);
    assert!(buffer_create_info(&desc).usage.contains(vk::BufferUsageFlags::UNIFORM_BUFFER));
}

#[test]
fn test_integration_indirect_buffer_bind_versus_misc() {
    let desc = BufferDesc { size: 64, bind_flags: BindFlags::INDIRECT_BUFFER, ..Default::default() };

    // Vulkan has a usage bit, Direct3D 11 a misc flag
    assert_eq!(VulkanFlagTables::buffer_bind_flags(desc.bind_flags), vk::BufferUsageFlags::INDIRECT_BUFFER);
    assert_eq!(D3D11FlagTables::buffer_bind_flags(desc.bind_flags), D3D11BindFlags::empty());
    assert!(D3D11FlagTables::buffer_misc_flags(&desc).contains(D3D11MiscFlags::DRAWINDIRECT_ARGS));
}

// ============================================================================
// TEXTURES
// ============================================================================

#[test]
fn test_integration_cube_array_layers_and_flags() {
    let desc = normalize_texture(
        &TextureDesc {
            texture_type: TextureType::TextureCubeArray,
            format: TextureFormat::R8G8B8A8_UNORM,
            width: 32,
            height: 32,
            array_layers: 3,
            ..Default::default()
        },
        LAYER_CONVENTION,
    )
    .unwrap();

    assert_eq!(image_create_info(&desc).unwrap().array_layers, 18);
    assert_eq!(desc.caller_layers(), 3);
    assert!(D3D11FlagTables::texture_misc_flags(&desc).contains(D3D11MiscFlags::TEXTURECUBE));
    assert_eq!(VulkanFlagTables::texture_misc_flags(&desc), vk::ImageCreateFlags::CUBE_COMPATIBLE);
}

#[test]
fn test_integration_mip_generation_needs_render_target_in_both_apis() {
    let desc = normalize_texture(
        &TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 128, 128).with_mips(MipPolicy::FullChain),
        LAYER_CONVENTION,
    )
    .unwrap();

    assert!(D3D11FlagTables::texture_bind_flags(&desc).contains(D3D11BindFlags::RENDER_TARGET));
    assert!(D3D11FlagTables::texture_misc_flags(&desc).contains(D3D11MiscFlags::GENERATE_MIPS));
    let usage = VulkanFlagTables::texture_bind_flags(&desc);
    assert!(usage.contains(vk::ImageUsageFlags::COLOR_ATTACHMENT));
    assert!(usage.contains(vk::ImageUsageFlags::TRANSFER_SRC));
    assert_eq!(image_create_info(&desc).unwrap().mip_levels, 8);
}
