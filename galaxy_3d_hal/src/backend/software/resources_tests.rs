use super::*;
use crate::descriptor::{BindFlags, BufferDesc, MipPolicy, TextureDesc};
use crate::normalize::{normalize_buffer, normalize_texture, LayerConvention};

fn texture(desc: &TextureDesc) -> SoftwareTexture {
    let normalized = normalize_texture(desc, LayerConvention::CubeFacesAsLayers).unwrap();
    SoftwareTexture::new(&normalized).unwrap()
}

// ============================================================================
// NATIVE FLAGS
// ============================================================================

#[test]
fn test_mip_mapped_texture_gets_render_target_and_generate_mips() {
    let tex = texture(&TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 64, 64).with_mips(MipPolicy::FullChain));

    assert!(tex.bind_flags().contains(D3D11BindFlags::RENDER_TARGET | D3D11BindFlags::SHADER_RESOURCE));
    assert!(tex.misc_flags().contains(D3D11MiscFlags::GENERATE_MIPS));
    assert_eq!(tex.usage(), D3D11Usage::Default);
}

#[test]
fn test_cube_texture_storage_has_six_slices() {
    let tex = texture(&TextureDesc::cube(TextureFormat::R8_UNORM, 4));

    assert!(tex.misc_flags().contains(D3D11MiscFlags::TEXTURECUBE));
    assert_eq!(tex.read_mip(0).unwrap().len(), 4 * 4 * 6);
}

#[test]
fn test_readback_buffer_is_staging() {
    let desc = normalize_buffer(&BufferDesc::readback(64)).unwrap();
    let buffer = SoftwareBuffer::new(&desc, None).unwrap();

    assert_eq!(buffer.usage(), D3D11Usage::Staging);
    assert!(buffer.cpu_access().contains(D3D11CpuAccessFlags::READ));
}

#[test]
fn test_structured_buffer_misc_flags() {
    let desc = normalize_buffer(&BufferDesc::structured(16, 8)).unwrap();
    let buffer = SoftwareBuffer::new(&desc, None).unwrap();

    assert!(buffer.misc_flags().contains(D3D11MiscFlags::BUFFER_STRUCTURED));
    assert!(buffer.bind_flags().contains(D3D11BindFlags::UNORDERED_ACCESS));
}

#[test]
fn test_buffer_initial_data_is_zero_padded() {
    let desc = normalize_buffer(&BufferDesc { size: 8, bind_flags: BindFlags::VERTEX_BUFFER, ..Default::default() }).unwrap();
    let buffer = SoftwareBuffer::new(&desc, Some(&[1, 2, 3])).unwrap();

    assert_eq!(buffer.read_range(0, 8).unwrap(), vec![1, 2, 3, 0, 0, 0, 0, 0]);
    assert!(buffer.read_range(4, 8).is_err());
}

// ============================================================================
// COPIES & FILTERING
// ============================================================================

#[test]
fn test_copy_into_box_writes_rows() {
    let grid = UVec3::new(4, 3, 1);
    let mut level = vec![0u8; 12];
    let region = TextureBox::new(UVec3::new(1, 1, 0), UVec3::new(3, 3, 1));

    copy_into_box(&mut level, grid, 1, region, &[1, 2, 3, 4]);

    assert_eq!(level, vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0]);
}

#[test]
fn test_downsample_unorm8_averages_quads() {
    let source = [0u8, 255, 100, 100, 255, 0, 100, 100];
    let mut target = [0u8; 2];

    downsample(
        FilterKind::Unorm8,
        1,
        2,
        &source,
        UVec3::new(4, 2, 1),
        &mut target,
        UVec3::new(2, 1, 1),
    );

    assert_eq!(target, [128, 100]);
}

#[test]
fn test_downsample_keeps_array_slices_apart() {
    // Two 2x2 layers: all 10 and all 50
    let source = [10u8, 10, 10, 10, 50, 50, 50, 50];
    let mut target = [0u8; 2];

    downsample(
        FilterKind::Unorm8,
        1,
        2,
        &source,
        UVec3::new(2, 2, 2),
        &mut target,
        UVec3::new(1, 1, 2),
    );

    assert_eq!(target, [10, 50]);
}

#[test]
fn test_downsample_float32() {
    let source: Vec<u8> = [1.0f32, 3.0].iter().flat_map(|v| v.to_ne_bytes()).collect();
    let mut target = [0u8; 4];

    downsample(FilterKind::Float32, 4, 1, &source, UVec3::new(2, 1, 1), &mut target, UVec3::new(1, 1, 1));

    assert_eq!(f32::from_ne_bytes(target), 2.0);
}

#[test]
fn test_filter_kind_rejects_depth_and_integer_formats() {
    assert_eq!(FilterKind::of(TextureFormat::B8G8R8A8_SRGB), Some(FilterKind::Unorm8));
    assert_eq!(FilterKind::of(TextureFormat::R32G32B32A32_SFLOAT), Some(FilterKind::Float32));
    assert_eq!(FilterKind::of(TextureFormat::R32_UINT), None);
    assert_eq!(FilterKind::of(TextureFormat::D32_FLOAT), None);
}
