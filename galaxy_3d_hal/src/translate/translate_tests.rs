use super::d3d11::*;
use super::*;
use crate::descriptor::{MipPolicy, StorageBufferType, TextureFormat, TextureType};
use crate::normalize::{normalize_texture, LayerConvention};

fn texture(desc: TextureDesc) -> NormalizedTextureDesc {
    normalize_texture(&desc, LayerConvention::CubeFacesAsLayers).unwrap()
}

// ============================================================================
// Usage modes
// ============================================================================

#[test]
fn test_read_takes_precedence_over_write() {
    let desc = BufferDesc { size: 4, cpu_access: CpuAccessFlags::READ_WRITE, ..Default::default() };
    assert_eq!(buffer_usage_mode(&desc), UsageMode::ReadBack);
    assert_eq!(D3D11FlagTables::usage(buffer_usage_mode(&desc)), D3D11Usage::Staging);
}

#[test]
fn test_write_selects_dynamic() {
    let desc = BufferDesc { size: 4, cpu_access: CpuAccessFlags::WRITE, ..Default::default() };
    assert_eq!(buffer_usage_mode(&desc), UsageMode::Dynamic);
}

#[test]
fn test_dynamic_hint_ignored_for_rw_storage() {
    let mut desc = BufferDesc {
        size: 4,
        misc_flags: MiscFlags::DYNAMIC_USAGE,
        bind_flags: BindFlags::CONSTANT_BUFFER,
        ..Default::default()
    };
    assert_eq!(buffer_usage_mode(&desc), UsageMode::Dynamic);
    desc.bind_flags |= BindFlags::RW_STORAGE_BUFFER;
    assert_eq!(buffer_usage_mode(&desc), UsageMode::GpuOnly);
}

#[test]
fn test_texture_usage_ignores_dynamic_hint() {
    let mut desc = TextureDesc::texture_2d(TextureFormat::R8_UNORM, 4, 4);
    desc.misc_flags = MiscFlags::DYNAMIC_USAGE;
    assert_eq!(texture_usage_mode(&desc), UsageMode::GpuOnly);
}

#[test]
fn test_effective_cpu_access() {
    assert_eq!(effective_cpu_access(CpuAccessFlags::empty(), UsageMode::Dynamic), CpuAccessFlags::WRITE);
    assert_eq!(effective_cpu_access(CpuAccessFlags::READ, UsageMode::ReadBack), CpuAccessFlags::READ);
    assert_eq!(effective_cpu_access(CpuAccessFlags::empty(), UsageMode::GpuOnly), CpuAccessFlags::empty());
}

// ============================================================================
// D3D11 bind flags
// ============================================================================

#[test]
fn test_buffer_bind_vertex_and_constant_only() {
    let native = D3D11FlagTables::buffer_bind_flags(BindFlags::VERTEX_BUFFER | BindFlags::CONSTANT_BUFFER);
    assert_eq!(native, D3D11BindFlags::VERTEX_BUFFER | D3D11BindFlags::CONSTANT_BUFFER);
    assert_eq!(native.bits(), 0x5);
}

#[test]
fn test_buffer_bind_one_native_bit_per_role() {
    let roles = [
        (BindFlags::VERTEX_BUFFER, D3D11BindFlags::VERTEX_BUFFER),
        (BindFlags::INDEX_BUFFER, D3D11BindFlags::INDEX_BUFFER),
        (BindFlags::CONSTANT_BUFFER, D3D11BindFlags::CONSTANT_BUFFER),
        (BindFlags::STREAM_OUTPUT_BUFFER, D3D11BindFlags::STREAM_OUTPUT),
        (BindFlags::SAMPLE_BUFFER, D3D11BindFlags::SHADER_RESOURCE),
        (BindFlags::RW_STORAGE_BUFFER, D3D11BindFlags::UNORDERED_ACCESS),
    ];
    for (neutral, native) in roles {
        assert_eq!(D3D11FlagTables::buffer_bind_flags(neutral), native);
    }
    assert_eq!(D3D11FlagTables::buffer_bind_flags(BindFlags::empty()), D3D11BindFlags::empty());
    // Attachment roles have no buffer meaning.
    assert_eq!(
        D3D11FlagTables::buffer_bind_flags(BindFlags::COLOR_ATTACHMENT),
        D3D11BindFlags::empty()
    );
}

#[test]
fn test_texture_bind_depth_excludes_render_target() {
    let desc = TextureDesc::depth_stencil(TextureFormat::D24_UNORM_S8_UINT, 64, 64)
        .with_bind_flags(BindFlags::COLOR_ATTACHMENT)
        .with_mips(MipPolicy::FullChain);
    let native = D3D11FlagTables::texture_bind_flags(&texture(desc));
    assert!(native.contains(D3D11BindFlags::DEPTH_STENCIL));
    assert!(!native.contains(D3D11BindFlags::RENDER_TARGET));
    // Mip chain still implies sampling.
    assert!(native.contains(D3D11BindFlags::SHADER_RESOURCE));
}

#[test]
fn test_texture_bind_mips_imply_render_target_and_sampling() {
    let mut desc = TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 64, 64).with_mips(MipPolicy::FullChain);
    desc.bind_flags = BindFlags::empty();
    let native = D3D11FlagTables::texture_bind_flags(&texture(desc));
    assert_eq!(native, D3D11BindFlags::RENDER_TARGET | D3D11BindFlags::SHADER_RESOURCE);
}

#[test]
fn test_texture_bind_rw_is_additive() {
    let desc = TextureDesc::texture_2d(TextureFormat::R32_SFLOAT, 8, 8)
        .with_bind_flags(BindFlags::RW_STORAGE_BUFFER | BindFlags::COLOR_ATTACHMENT);
    let native = D3D11FlagTables::texture_bind_flags(&texture(desc));
    assert_eq!(
        native,
        D3D11BindFlags::RENDER_TARGET | D3D11BindFlags::SHADER_RESOURCE | D3D11BindFlags::UNORDERED_ACCESS
    );
}

// ============================================================================
// D3D11 misc / cpu flags
// ============================================================================

#[test]
fn test_cpu_access_flags() {
    assert_eq!(
        D3D11FlagTables::cpu_access_flags(CpuAccessFlags::READ_WRITE).bits(),
        0x30000
    );
    assert_eq!(D3D11FlagTables::cpu_access_flags(CpuAccessFlags::empty()), D3D11CpuAccessFlags::empty());
}

#[test]
fn test_buffer_misc_structured_wins_for_storage() {
    let mut desc = BufferDesc::structured(8, 16);
    assert_eq!(D3D11FlagTables::buffer_misc_flags(&desc), D3D11MiscFlags::BUFFER_STRUCTURED);

    desc.storage_type = StorageBufferType::RWByteAddress;
    assert_eq!(D3D11FlagTables::buffer_misc_flags(&desc), D3D11MiscFlags::BUFFER_ALLOW_RAW_VIEWS);

    desc.storage_type = StorageBufferType::Typed;
    assert_eq!(D3D11FlagTables::buffer_misc_flags(&desc), D3D11MiscFlags::empty());
}

#[test]
fn test_buffer_misc_storage_layout_needs_storage_binding() {
    let desc = BufferDesc {
        size: 64,
        stride: 16,
        storage_type: StorageBufferType::Structured,
        bind_flags: BindFlags::VERTEX_BUFFER | BindFlags::INDIRECT_BUFFER,
        ..Default::default()
    };
    assert_eq!(D3D11FlagTables::buffer_misc_flags(&desc), D3D11MiscFlags::DRAWINDIRECT_ARGS);
}

#[test]
fn test_texture_misc_generate_mips_only_for_color() {
    let color = TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 32, 32).with_mips(MipPolicy::FullChain);
    assert_eq!(D3D11FlagTables::texture_misc_flags(&texture(color)), D3D11MiscFlags::GENERATE_MIPS);

    let depth = TextureDesc::depth_stencil(TextureFormat::D32_FLOAT, 32, 32).with_mips(MipPolicy::FullChain);
    assert_eq!(D3D11FlagTables::texture_misc_flags(&texture(depth)), D3D11MiscFlags::empty());

    let single = TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 32, 32);
    assert_eq!(D3D11FlagTables::texture_misc_flags(&texture(single)), D3D11MiscFlags::empty());
}

#[test]
fn test_sampled_depth_format_never_generates_mips() {
    let desc = TextureDesc::texture_2d(TextureFormat::D32_FLOAT, 32, 32)
        .with_mips(MipPolicy::FullChain)
        .with_bind_flags(BindFlags::SAMPLE_BUFFER);
    let normalized = texture(desc);
    assert!(normalized.is_mip_mapped());
    assert!(!normalized.bind_flags.contains(BindFlags::DEPTH_STENCIL_ATTACHMENT));

    assert_eq!(D3D11FlagTables::texture_misc_flags(&normalized), D3D11MiscFlags::empty());
    assert_eq!(D3D11FlagTables::texture_bind_flags(&normalized), D3D11BindFlags::SHADER_RESOURCE);
}

#[test]
fn test_texture_misc_cube_bit() {
    let cube = TextureDesc { texture_type: TextureType::TextureCubeArray, width: 8, height: 8, array_layers: 2, ..Default::default() };
    assert_eq!(D3D11FlagTables::texture_misc_flags(&texture(cube)), D3D11MiscFlags::TEXTURECUBE);
}

#[test]
fn test_usage_table() {
    assert_eq!(D3D11FlagTables::usage(UsageMode::GpuOnly) as u32, 0);
    assert_eq!(D3D11FlagTables::usage(UsageMode::Dynamic) as u32, 2);
    assert_eq!(D3D11FlagTables::usage(UsageMode::ReadBack) as u32, 3);
}
