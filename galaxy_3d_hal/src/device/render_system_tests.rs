use super::*;
use crate::backend::software::{SoftwareAdapter, SoftwareDevice, SoftwareSurface};
use crate::capability::{AdapterKind, Vendor};
use crate::context::{Diagnostic, MultiSamplingDesc};
use crate::descriptor::{GraphicsPipelineDesc, MipPolicy, TextureFormat};
use crate::error::Error;
use glam::UVec2;

fn render_system_at(level: FeatureLevel) -> RenderSystem<SoftwareDevice> {
    let mut hardware = SoftwareAdapter::new(AdapterKind::Hardware, Some(level));
    RenderSystem::new(&mut hardware, None, &RenderSystemConfig::default()).unwrap()
}

fn render_system() -> RenderSystem<SoftwareDevice> {
    render_system_at(FeatureLevel::Level11_0)
}

fn shader(rs: &mut RenderSystem<SoftwareDevice>, stage: ShaderStage) -> ShaderHandle {
    rs.create_shader(&ShaderDesc::new(stage, vec![0x07, 0x23, 0x02, 0x03])).unwrap()
}

// ============================================================================
// BRING-UP
// ============================================================================

#[test]
fn test_hardware_adapter_negotiates_its_highest_level() {
    let rs = render_system_at(FeatureLevel::Level10_1);

    assert_eq!(rs.feature_level(), FeatureLevel::Level10_1);
    assert_eq!(rs.caps().feature_level, FeatureLevel::Level10_1);
    assert_eq!(rs.shading_language(), FeatureLevel::Level10_1.shading_language());
    assert_eq!(rs.renderer_info().adapter_kind, AdapterKind::Hardware);
}

#[test]
fn test_falls_back_to_software_adapter() {
    let mut hardware = SoftwareAdapter::new(AdapterKind::Hardware, None);
    let mut software = SoftwareAdapter::rasterizer();

    let rs = RenderSystem::new(
        &mut hardware,
        Some(&mut software as &mut dyn Adapter<Device = SoftwareDevice>),
        &RenderSystemConfig::default(),
    )
    .unwrap();

    let info = rs.renderer_info();
    assert_eq!(info.adapter_kind, AdapterKind::Software);
    assert_eq!(info.vendor, Vendor::Microsoft);
    assert_eq!(info.feature_level, FeatureLevel::Level12_1);
    assert_eq!(hardware.attempts().len(), FeatureLevel::DESCENDING.len());
}

#[test]
fn test_fallback_disabled_fails_bring_up() {
    let mut hardware = SoftwareAdapter::new(AdapterKind::Hardware, None);
    let mut software = SoftwareAdapter::rasterizer();
    let config = RenderSystemConfig { allow_software_fallback: false, ..Default::default() };

    let result = RenderSystem::new(
        &mut hardware,
        Some(&mut software as &mut dyn Adapter<Device = SoftwareDevice>),
        &config,
    );

    assert!(matches!(result, Err(Error::DeviceCreationFailed(_))));
    assert!(software.attempts().is_empty());
}

// ============================================================================
// TEXTURES
// ============================================================================

#[test]
fn test_texture_write_read_round_trip() {
    let mut rs = render_system();
    let texture = rs.create_texture(&TextureDesc::texture_2d(TextureFormat::R8_UNORM, 2, 2)).unwrap();

    rs.write_texture(texture, 0, &TextureRegion::full_2d(2, 2), &[1, 2, 3, 4]).unwrap();

    assert_eq!(rs.read_texture(texture, 0).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_write_texture_checks_data_length() {
    let mut rs = render_system();
    let texture = rs.create_texture(&TextureDesc::texture_2d(TextureFormat::R8G8B8A8_UNORM, 2, 2)).unwrap();

    let result = rs.write_texture(texture, 0, &TextureRegion::full_2d(2, 2), &[0; 4]);

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_cube_desc_query_reports_caller_layers() {
    let mut rs = render_system();
    let texture = rs.create_texture(&TextureDesc::cube(TextureFormat::R8G8B8A8_UNORM, 16)).unwrap();

    let desc = rs.query_texture_desc(texture).unwrap();

    assert_eq!(desc.array_layers, 1);
    assert_eq!(rs.native_texture(texture).unwrap().desc().array_layers, 6);
}

#[test]
fn test_texture_over_limit_is_rejected() {
    let mut rs = render_system_at(FeatureLevel::Level9_1);

    let result = rs.create_texture(&TextureDesc::texture_2d(TextureFormat::R8_UNORM, 4096, 4));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert_eq!(rs.texture_count(), 0);
}

#[test]
fn test_generate_mips() {
    let mut rs = render_system();
    let desc = TextureDesc::texture_2d(TextureFormat::R8_UNORM, 2, 2).with_mips(MipPolicy::FullChain);
    let texture = rs.create_texture(&desc).unwrap();

    rs.write_texture(texture, 0, &TextureRegion::full_2d(2, 2), &[0, 100, 100, 200]).unwrap();
    rs.generate_mips(texture).unwrap();

    assert_eq!(rs.read_texture(texture, 1).unwrap(), vec![100]);
}

#[test]
fn test_generate_mips_rejects_single_level() {
    let mut rs = render_system();
    let texture = rs.create_texture(&TextureDesc::texture_2d(TextureFormat::R8_UNORM, 4, 4)).unwrap();

    assert!(matches!(rs.generate_mips(texture), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_released_texture_handle_is_stale() {
    let mut rs = render_system();
    let texture = rs.create_texture(&TextureDesc::texture_2d(TextureFormat::R8_UNORM, 2, 2)).unwrap();
    rs.write_texture(texture, 0, &TextureRegion::full_2d(2, 2), &[1, 2, 3, 4]).unwrap();

    rs.release_texture(texture).unwrap();

    assert_eq!(rs.texture_count(), 0);
    assert!(rs.query_texture_desc(texture).is_err());
    assert!(rs.release_texture(texture).is_err());
}

// ============================================================================
// BUFFERS
// ============================================================================

#[test]
fn test_typed_buffer_round_trip() {
    let mut rs = render_system();
    let buffer = rs.create_buffer(&BufferDesc::readback(16), None).unwrap();

    rs.write_buffer_typed(buffer, 0, &[1u32, 2, 3, 4]).unwrap();

    assert_eq!(rs.read_buffer_typed::<u32>(buffer).unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn test_buffer_initial_data_must_fit() {
    let mut rs = render_system();

    let result = rs.create_buffer(&BufferDesc::vertex(4, 4), Some(&[0; 8]));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_constant_buffer_size_limit() {
    let mut rs = render_system();
    let limit = rs.caps().max_constant_buffer_size as u64;

    assert!(rs.create_buffer(&BufferDesc::constant(limit), None).is_ok());
    assert!(matches!(
        rs.create_buffer(&BufferDesc::constant(limit + 16), None),
        Err(Error::InvalidArgument(_))
    ));
}

#[test]
fn test_write_buffer_out_of_range() {
    let mut rs = render_system();
    let buffer = rs.create_buffer(&BufferDesc::vertex(8, 4), None).unwrap();

    assert!(matches!(rs.write_buffer(buffer, 6, &[0; 4]), Err(Error::InvalidArgument(_))));
    assert!(matches!(rs.write_buffer(buffer, u64::MAX, &[0]), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_read_buffer_needs_cpu_read_access() {
    let mut rs = render_system();
    let buffer = rs.create_buffer(&BufferDesc::vertex(8, 4), None).unwrap();

    assert!(matches!(rs.read_buffer(buffer), Err(Error::InvalidArgument(_))));
}

// ============================================================================
// SHADERS & PIPELINES
// ============================================================================

#[test]
fn test_empty_shader_is_rejected() {
    let mut rs = render_system();

    let result = rs.create_shader(&ShaderDesc::new(ShaderStage::Vertex, Vec::new()));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_stage_above_feature_level_is_rejected() {
    let mut rs = render_system_at(FeatureLevel::Level10_0);

    let result = rs.create_shader(&ShaderDesc::new(ShaderStage::TessControl, vec![1]));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
    assert!(rs.create_shader(&ShaderDesc::new(ShaderStage::Geometry, vec![1])).is_ok());
}

#[test]
fn test_pipeline_with_swapped_stages_is_rejected() {
    let mut rs = render_system();
    let vertex = shader(&mut rs, ShaderStage::Vertex);
    let fragment = shader(&mut rs, ShaderStage::Fragment);

    let result = rs.create_pipeline(&PipelineDesc::Graphics(GraphicsPipelineDesc::new(fragment, vertex)));

    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn test_tessellated_pipeline() {
    let mut rs = render_system();
    let mut desc = GraphicsPipelineDesc::new(shader(&mut rs, ShaderStage::Vertex), shader(&mut rs, ShaderStage::Fragment));
    desc.tess_control_shader = Some(shader(&mut rs, ShaderStage::TessControl));

    // Control without evaluation
    desc.topology = PrimitiveTopology::Patches(3);
    assert!(rs.create_pipeline(&PipelineDesc::Graphics(desc.clone())).is_err());

    desc.tess_evaluation_shader = Some(shader(&mut rs, ShaderStage::TessEvaluation));
    desc.topology = PrimitiveTopology::TriangleList;
    assert!(rs.create_pipeline(&PipelineDesc::Graphics(desc.clone())).is_err());

    desc.topology = PrimitiveTopology::Patches(33);
    assert!(rs.create_pipeline(&PipelineDesc::Graphics(desc.clone())).is_err());

    desc.topology = PrimitiveTopology::Patches(3);
    let pipeline = rs.create_pipeline(&PipelineDesc::Graphics(desc)).unwrap();
    assert_eq!(
        rs.native_pipeline(pipeline).unwrap().stages,
        vec![
            ShaderStage::Vertex,
            ShaderStage::TessControl,
            ShaderStage::TessEvaluation,
            ShaderStage::Fragment
        ]
    );
}

#[test]
fn test_invalid_sample_count_is_rejected() {
    let mut rs = render_system();
    let mut desc = GraphicsPipelineDesc::new(shader(&mut rs, ShaderStage::Vertex), shader(&mut rs, ShaderStage::Fragment));
    desc.sample_count = 3;

    assert!(matches!(rs.create_pipeline(&PipelineDesc::Graphics(desc)), Err(Error::InvalidArgument(_))));
}

#[test]
fn test_shader_used_by_pipeline_cannot_be_released() {
    let mut rs = render_system();
    let compute = shader(&mut rs, ShaderStage::Compute);
    let pipeline = rs.create_pipeline(&PipelineDesc::Compute { shader: compute }).unwrap();

    assert!(matches!(rs.release_shader(compute), Err(Error::InvalidArgument(_))));

    rs.release_pipeline(pipeline).unwrap();
    rs.release_shader(compute).unwrap();
    assert!(rs.create_pipeline(&PipelineDesc::Compute { shader: compute }).is_err());
}

// ============================================================================
// RENDER CONTEXTS
// ============================================================================

#[test]
fn test_backend_without_platform_cannot_create_contexts() {
    let mut hardware = SoftwareAdapter::new(AdapterKind::Hardware, Some(FeatureLevel::Level11_0))
        .with_context_config(None);
    let mut rs = RenderSystem::new(&mut hardware, None, &RenderSystemConfig::default()).unwrap();

    let result = rs.create_render_context(&ContextDescriptor::default(), None, None);

    assert!(matches!(result, Err(Error::ContextCreationFailed(_))));
    assert_eq!(rs.context_count(), 0);
}

#[test]
fn test_render_context_steps_samples_down() {
    let mut rs = render_system();
    let desc = ContextDescriptor { multi_sampling: MultiSamplingDesc::new(16), ..Default::default() };

    let context = rs.create_render_context(&desc, None, None).unwrap();

    let state = rs.context_state(context).unwrap();
    assert!(state.is_active());
    assert_eq!(state.samples, 8);
    assert_eq!(state.diagnostics, vec![Diagnostic::SamplesReduced { requested: 16, granted: 8 }]);
    assert_eq!(rs.current_context(), Some(context));
    assert_eq!(rs.context_surface(context).unwrap().size(), UVec2::new(800, 600));
}

#[test]
fn test_render_context_on_caller_surface() {
    let mut rs = render_system();
    let surface = Box::new(SoftwareSurface::windowed("editor", 320, 240));

    let context = rs.create_render_context(&ContextDescriptor::default(), Some(surface), None).unwrap();

    assert_eq!(rs.context_state(context).unwrap().resolution, UVec2::new(320, 240));
}

#[test]
fn test_make_current_switches_contexts() {
    let mut rs = render_system();
    let first = rs.create_render_context(&ContextDescriptor::default(), None, None).unwrap();
    let second = rs.create_render_context(&ContextDescriptor::default(), None, None).unwrap();
    assert_eq!(rs.current_context(), Some(second));

    rs.make_current(Some(first)).unwrap();
    let native = rs.context_state(first).unwrap().native_context;
    assert_eq!(rs.current_context(), Some(first));
    assert_eq!(rs.backend().platform().unwrap().current(), native);

    rs.make_current(None).unwrap();
    assert_eq!(rs.current_context(), None);
    assert_eq!(rs.backend().platform().unwrap().current(), None);
}

#[test]
fn test_shared_context_keeps_owner_alive() {
    let mut rs = render_system();
    let owner = rs.create_render_context(&ContextDescriptor::default(), None, None).unwrap();
    let borrower = rs.create_render_context(&ContextDescriptor::default(), None, Some(owner)).unwrap();

    let borrowed = rs.context_state(borrower).unwrap();
    assert_eq!(borrowed.ownership, ContextOwnership::Shared);
    assert_eq!(borrowed.native_context, rs.context_state(owner).unwrap().native_context);

    assert!(matches!(rs.release_render_context(owner), Err(Error::InvalidArgument(_))));

    rs.release_render_context(borrower).unwrap();
    assert_eq!(rs.backend().platform().unwrap().live_contexts(), 1);
    rs.release_render_context(owner).unwrap();
    assert_eq!(rs.backend().platform().unwrap().live_contexts(), 0);
    assert_eq!(rs.context_count(), 0);
}

#[test]
fn test_dedicated_context_shares_objects_explicitly() {
    let mut rs = render_system();
    let owner = rs.create_render_context(&ContextDescriptor::default(), None, None).unwrap();
    let desc = ContextDescriptor { dedicated_hardware_context: true, ..Default::default() };

    let dedicated = rs.create_render_context(&desc, None, Some(owner)).unwrap();

    let source = rs.context_state(owner).unwrap().native_context.unwrap();
    let target = rs.context_state(dedicated).unwrap().native_context.unwrap();
    assert_ne!(source, target);
    assert_eq!(rs.backend().platform().unwrap().shared_lists(), &[(source, target)]);
}

// ============================================================================
// DEVICE LOSS
// ============================================================================

#[test]
fn test_device_loss_surfaces_as_device_lost() {
    let rs = render_system();

    rs.backend().queue().simulate_device_loss().unwrap();

    assert!(matches!(rs.sync_gpu(), Err(Error::DeviceLost(_))));
}
