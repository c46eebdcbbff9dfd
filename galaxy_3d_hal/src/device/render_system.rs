//! RenderSystem - the device-facing entry point of the HAL
//!
//! Owns one negotiated backend device, its capability table, its fence and
//! one registry per resource kind. Every resource entry remembers the fence
//! value of the last queued GPU work that touched it; releasing a resource
//! waits for that value before the native object is dropped.

use std::mem;

use bytemuck::Pod;

use super::backend::Backend;
use super::config::{RenderSystemConfig, RendererInfo};
use crate::capability::{
    Adapter, AdapterInfo, CapabilityNegotiator, CapabilityTable, FeatureLevel, ShadingLanguage,
};
use crate::context::{
    release_context, ContextDescriptor, ContextNegotiator, ContextOwnership, ContextState,
    Surface, SurfaceDesc,
};
use crate::descriptor::{
    BindFlags, BufferDesc, CpuAccessFlags, PipelineDesc, PrimitiveTopology, ShaderDesc, ShaderStage,
    TextureDesc, TextureRegion,
};
use crate::error::Result;
use crate::normalize::{
    normalize_buffer, normalize_region, normalize_texture, NormalizedBufferDesc,
    NormalizedTextureDesc,
};
use crate::registry::{
    BufferHandle, BufferKind, PipelineHandle, PipelineKind, Registry, RenderContextHandle,
    RenderContextKind, ShaderHandle, ShaderKind, TextureHandle, TextureKind,
};
use crate::sync::GpuFence;
use crate::{hal_bail, hal_err, hal_info, hal_trace, hal_warn};

const SOURCE: &str = "galaxy3d::hal::device";

/// Largest number of control points of a tessellation patch
const MAX_PATCH_CONTROL_POINTS: u32 = 32;

// ===== REGISTRY ENTRIES =====

struct TextureEntry<T> {
    native: T,
    desc: NormalizedTextureDesc,
    last_use: u64,
}

struct BufferEntry<T> {
    native: T,
    desc: NormalizedBufferDesc,
    last_use: u64,
}

struct ShaderEntry<T> {
    native: T,
    stage: ShaderStage,
}

struct PipelineEntry<T> {
    native: T,
    shaders: Vec<ShaderHandle>,
}

struct RenderContextEntry {
    state: ContextState,
    surface: Box<dyn Surface>,
}

// ===== RENDER SYSTEM =====

/// A negotiated device and the resources created on it
///
/// Creation and destruction take `&mut self`: one thread drives a render
/// system at a time. Wrap it in a `Mutex` to hand it between threads.
pub struct RenderSystem<B: Backend> {
    backend: B,
    config: RenderSystemConfig,
    adapter: AdapterInfo,
    feature_level: FeatureLevel,
    caps: CapabilityTable,
    fence: GpuFence<B::Fence>,

    textures: Registry<TextureKind, TextureEntry<B::Texture>>,
    buffers: Registry<BufferKind, BufferEntry<B::Buffer>>,
    shaders: Registry<ShaderKind, ShaderEntry<B::Shader>>,
    pipelines: Registry<PipelineKind, PipelineEntry<B::Pipeline>>,
    contexts: Registry<RenderContextKind, RenderContextEntry>,
    current_context: Option<RenderContextHandle>,
}

impl<B: Backend> RenderSystem<B> {
    /// Negotiate a device and bring the render system up
    ///
    /// # Arguments
    ///
    /// * `hardware` - Adapter probed first
    /// * `software` - Fallback adapter, used when allowed by `config`
    /// * `config` - Candidate feature levels and fallback policy
    ///
    /// # Errors
    ///
    /// `DeviceCreationFailed` when no adapter accepts any candidate level or
    /// the device fence cannot be created.
    pub fn new(
        hardware: &mut dyn Adapter<Device = B>,
        software: Option<&mut dyn Adapter<Device = B>>,
        config: &RenderSystemConfig,
    ) -> Result<Self> {
        let negotiator = CapabilityNegotiator::new(&config.feature_levels)
            .with_software_fallback(config.allow_software_fallback);
        let negotiated = negotiator.negotiate(hardware, software)?;

        let mut backend = negotiated.device;
        let native_fence = backend.create_fence().map_err(|e| {
            hal_err!(DeviceCreationFailed, SOURCE, "failed to create device fence: {}", e)
        })?;

        hal_info!(
            SOURCE,
            "'{}' running on {} ({}, feature level {})",
            config.app_name,
            negotiated.adapter.name,
            backend.api_name(),
            negotiated.feature_level
        );

        Ok(Self {
            backend,
            config: config.clone(),
            adapter: negotiated.adapter,
            feature_level: negotiated.feature_level,
            caps: negotiated.caps,
            fence: GpuFence::new(native_fence, 0),
            textures: Registry::new(),
            buffers: Registry::new(),
            shaders: Registry::new(),
            pipelines: Registry::new(),
            contexts: Registry::new(),
            current_context: None,
        })
    }

    // ===== DEVICE INFO =====

    /// Capabilities of the negotiated feature level
    pub fn caps(&self) -> &CapabilityTable {
        &self.caps
    }

    pub fn feature_level(&self) -> FeatureLevel {
        self.feature_level
    }

    /// Highest shading language of the negotiated feature level
    pub fn shading_language(&self) -> ShadingLanguage {
        self.feature_level.shading_language()
    }

    pub fn renderer_info(&self) -> RendererInfo {
        RendererInfo::new(&self.adapter, self.backend.api_name(), self.feature_level)
    }

    pub fn config(&self) -> &RenderSystemConfig {
        &self.config
    }

    /// Direct access to the backend device
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Signal the fence and wait until all queued work is done
    ///
    /// # Returns
    ///
    /// The fence value that was waited on
    pub fn sync_gpu(&self) -> Result<u64> {
        self.fence.sync_gpu()
    }

    /// Last fence value the GPU completed
    pub fn completed_fence_value(&self) -> Result<u64> {
        self.fence.completed_value()
    }

    // ===== TEXTURES =====

    /// Create a texture
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a malformed descriptor or one exceeding the
    /// device limits.
    pub fn create_texture(&mut self, desc: &TextureDesc) -> Result<TextureHandle> {
        let normalized = normalize_texture(desc, self.backend.layer_convention())?;
        self.caps.validate_texture(&normalized)?;

        let native = self.backend.create_texture(&normalized)?;
        let handle = self.textures.insert(TextureEntry { native, desc: normalized, last_use: 0 });
        if self.config.debug {
            hal_trace!(SOURCE, "Created {:?} ({:?} {}x{})", handle, desc.format, desc.width, desc.height);
        }
        Ok(handle)
    }

    /// Descriptor of a texture, layer counts in the caller's convention
    pub fn query_texture_desc(&self, handle: TextureHandle) -> Result<TextureDesc> {
        Ok(self.textures.resolve(handle)?.desc.to_desc())
    }

    /// Upload texels into a region of one mip level
    ///
    /// # Arguments
    ///
    /// * `handle` - Destination texture
    /// * `mip_level` - Destination mip level
    /// * `region` - Region of the same kind as the texture
    /// * `data` - Tightly packed texels covering the region
    pub fn write_texture(
        &mut self,
        handle: TextureHandle,
        mip_level: u32,
        region: &TextureRegion,
        data: &[u8],
    ) -> Result<()> {
        let entry = self.textures.resolve_mut(handle)?;
        let texture_box = normalize_region(&entry.desc, mip_level, region)?;

        let expected = texture_box.texel_count() * entry.desc.format.bytes_per_pixel() as u64;
        if data.len() as u64 != expected {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "texture region needs {} bytes, got {}",
                expected,
                data.len()
            );
        }

        self.backend.write_texture(&mut entry.native, mip_level, texture_box, data)?;
        entry.last_use = self.fence.signal_next()?;
        Ok(())
    }

    /// Read a whole mip level back, waiting for queued work first
    pub fn read_texture(&mut self, handle: TextureHandle, mip_level: u32) -> Result<Vec<u8>> {
        let entry = self.textures.resolve(handle)?;
        if mip_level >= entry.desc.mip_levels {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "mip level {} out of range (texture has {})",
                mip_level,
                entry.desc.mip_levels
            );
        }

        self.fence.sync_gpu()?;
        self.backend.read_texture(&entry.native, mip_level)
    }

    /// Regenerate every mip level from the base level
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for textures without mips or depth-stencil textures.
    pub fn generate_mips(&mut self, handle: TextureHandle) -> Result<()> {
        let entry = self.textures.resolve_mut(handle)?;
        if !entry.desc.supports_mip_generation() {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "{:?} does not support mip generation ({} levels, depth-stencil: {})",
                handle,
                entry.desc.mip_levels,
                entry.desc.is_depth_stencil()
            );
        }

        self.backend.generate_mips(&mut entry.native)?;
        entry.last_use = self.fence.signal_next()?;
        Ok(())
    }

    /// Release a texture once the GPU is done with it
    pub fn release_texture(&mut self, handle: TextureHandle) -> Result<()> {
        let entry = self.textures.remove(handle)?;
        self.fence.wait_until(entry.last_use)?;
        if self.config.debug {
            hal_trace!(SOURCE, "Released {:?}", handle);
        }
        Ok(())
    }

    /// Native texture, for backend-specific drawing code
    pub fn native_texture(&self, handle: TextureHandle) -> Result<&B::Texture> {
        Ok(&self.textures.resolve(handle)?.native)
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    // ===== BUFFERS =====

    /// Create a buffer
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor
    /// * `initial_data` - Optional contents, at most `desc.size` bytes
    pub fn create_buffer(&mut self, desc: &BufferDesc, initial_data: Option<&[u8]>) -> Result<BufferHandle> {
        let normalized = normalize_buffer(desc)?;
        if let Some(data) = initial_data {
            if data.len() as u64 > normalized.size {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "{} bytes of initial data exceed buffer size {}",
                    data.len(),
                    normalized.size
                );
            }
        }
        if desc.bind_flags.contains(BindFlags::CONSTANT_BUFFER)
            && normalized.size > self.caps.max_constant_buffer_size as u64
        {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "constant buffer of {} bytes exceeds the limit of {} bytes",
                normalized.size,
                self.caps.max_constant_buffer_size
            );
        }

        let native = self.backend.create_buffer(&normalized, initial_data)?;
        let handle = self.buffers.insert(BufferEntry { native, desc: normalized, last_use: 0 });
        if self.config.debug {
            hal_trace!(SOURCE, "Created {:?} ({} bytes)", handle, desc.size);
        }
        Ok(handle)
    }

    /// Write bytes at `offset`
    pub fn write_buffer(&mut self, handle: BufferHandle, offset: u64, data: &[u8]) -> Result<()> {
        let entry = self.buffers.resolve_mut(handle)?;
        let end = offset.checked_add(data.len() as u64);
        if end.map_or(true, |end| end > entry.desc.size) {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "write of {} bytes at {} exceeds buffer size {}",
                data.len(),
                offset,
                entry.desc.size
            );
        }

        self.backend.write_buffer(&mut entry.native, offset, data)?;
        entry.last_use = self.fence.signal_next()?;
        Ok(())
    }

    /// Write a slice of plain values at `offset`
    pub fn write_buffer_typed<T: Pod>(&mut self, handle: BufferHandle, offset: u64, values: &[T]) -> Result<()> {
        self.write_buffer(handle, offset, bytemuck::cast_slice(values))
    }

    /// Read the whole buffer back, waiting for queued work first
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the buffer was not created with CPU read access.
    pub fn read_buffer(&mut self, handle: BufferHandle) -> Result<Vec<u8>> {
        let entry = self.buffers.resolve(handle)?;
        if !entry.desc.cpu_access.contains(CpuAccessFlags::READ) {
            hal_bail!(InvalidArgument, SOURCE, "{:?} has no CPU read access", handle);
        }

        self.fence.sync_gpu()?;
        self.backend.read_buffer(&entry.native, 0, entry.desc.size)
    }

    /// Read the whole buffer back as plain values
    pub fn read_buffer_typed<T: Pod>(&mut self, handle: BufferHandle) -> Result<Vec<T>> {
        let bytes = self.read_buffer(handle)?;
        let size = mem::size_of::<T>();
        if size == 0 || bytes.len() % size != 0 {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "buffer of {} bytes is not a whole number of {}-byte values",
                bytes.len(),
                size
            );
        }
        Ok(bytes.chunks_exact(size).map(bytemuck::pod_read_unaligned).collect())
    }

    /// Release a buffer once the GPU is done with it
    pub fn release_buffer(&mut self, handle: BufferHandle) -> Result<()> {
        let entry = self.buffers.remove(handle)?;
        self.fence.wait_until(entry.last_use)?;
        Ok(())
    }

    /// Native buffer, for backend-specific drawing code
    pub fn native_buffer(&self, handle: BufferHandle) -> Result<&B::Buffer> {
        Ok(&self.buffers.resolve(handle)?.native)
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    // ===== SHADERS & PIPELINES =====

    /// Create a shader from a compiled binary
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for empty code or a stage the feature level lacks.
    pub fn create_shader(&mut self, desc: &ShaderDesc) -> Result<ShaderHandle> {
        if desc.code.is_empty() {
            hal_bail!(InvalidArgument, SOURCE, "{:?} shader has no code", desc.stage);
        }
        self.check_stage(desc.stage)?;

        let native = self.backend.create_shader(desc)?;
        Ok(self.shaders.insert(ShaderEntry { native, stage: desc.stage }))
    }

    /// Release a shader no live pipeline uses
    pub fn release_shader(&mut self, handle: ShaderHandle) -> Result<()> {
        self.shaders.resolve(handle)?;
        if let Some((pipeline, _)) = self.pipelines.iter().find(|(_, p)| p.shaders.contains(&handle)) {
            hal_bail!(InvalidArgument, SOURCE, "{:?} is still used by {:?}", handle, pipeline);
        }
        self.shaders.remove(handle)?;
        Ok(())
    }

    /// Create a pipeline from shader handles
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a stale shader handle, a shader bound at the
    /// wrong stage, an incomplete tessellation pair, or a topology that does
    /// not match the stages.
    pub fn create_pipeline(&mut self, desc: &PipelineDesc) -> Result<PipelineHandle> {
        let slots = self.pipeline_slots(desc)?;

        let mut stages = Vec::with_capacity(slots.len());
        for &(expected, handle) in &slots {
            let entry = self.shaders.resolve(handle)?;
            if entry.stage != expected {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "{:?} is a {:?} shader, bound as {:?}",
                    handle,
                    entry.stage,
                    expected
                );
            }
            stages.push((expected, &entry.native));
        }

        let native = self.backend.create_pipeline(desc, &stages)?;
        let shaders = slots.into_iter().map(|(_, handle)| handle).collect();
        Ok(self.pipelines.insert(PipelineEntry { native, shaders }))
    }

    /// Native pipeline, for backend-specific drawing code
    pub fn native_pipeline(&self, handle: PipelineHandle) -> Result<&B::Pipeline> {
        Ok(&self.pipelines.resolve(handle)?.native)
    }

    pub fn release_pipeline(&mut self, handle: PipelineHandle) -> Result<()> {
        self.pipelines.remove(handle)?;
        Ok(())
    }

    fn check_stage(&self, stage: ShaderStage) -> Result<()> {
        let supported = match stage {
            ShaderStage::Vertex | ShaderStage::Fragment => true,
            ShaderStage::TessControl | ShaderStage::TessEvaluation => self.caps.has_tessellation_shaders,
            ShaderStage::Geometry => self.caps.has_geometry_shaders,
            ShaderStage::Compute => self.caps.has_compute_shaders,
        };
        if !supported {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "{:?} shaders are not supported at feature level {}",
                stage,
                self.feature_level
            );
        }
        Ok(())
    }

    /// Expected stage of every shader slot of `desc`, in pipeline order
    fn pipeline_slots(&self, desc: &PipelineDesc) -> Result<Vec<(ShaderStage, ShaderHandle)>> {
        let graphics = match desc {
            PipelineDesc::Compute { shader } => return Ok(vec![(ShaderStage::Compute, *shader)]),
            PipelineDesc::Graphics(graphics) => graphics,
        };

        let tessellated = match (graphics.tess_control_shader, graphics.tess_evaluation_shader) {
            (Some(_), Some(_)) => true,
            (None, None) => false,
            _ => hal_bail!(
                InvalidArgument,
                SOURCE,
                "tessellation needs both a control and an evaluation shader"
            ),
        };
        match graphics.topology {
            PrimitiveTopology::Patches(points) if !tessellated || points == 0 || points > MAX_PATCH_CONTROL_POINTS => {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "patch topology with {} control points needs tessellation shaders and 1..={} points",
                    points,
                    MAX_PATCH_CONTROL_POINTS
                );
            }
            PrimitiveTopology::Patches(_) => {}
            other if tessellated => {
                hal_bail!(InvalidArgument, SOURCE, "tessellation needs a patch topology, got {:?}", other);
            }
            _ => {}
        }
        if graphics.sample_count == 0 || !graphics.sample_count.is_power_of_two() {
            hal_bail!(InvalidArgument, SOURCE, "invalid sample count {}", graphics.sample_count);
        }

        let mut slots = vec![(ShaderStage::Vertex, graphics.vertex_shader)];
        slots.extend(graphics.tess_control_shader.map(|h| (ShaderStage::TessControl, h)));
        slots.extend(graphics.tess_evaluation_shader.map(|h| (ShaderStage::TessEvaluation, h)));
        slots.extend(graphics.geometry_shader.map(|h| (ShaderStage::Geometry, h)));
        slots.extend(graphics.fragment_shader.map(|h| (ShaderStage::Fragment, h)));
        Ok(slots)
    }

    // ===== RENDER CONTEXTS =====

    /// Negotiate a render context on a surface
    ///
    /// # Arguments
    ///
    /// * `desc` - Requested video mode, anti-aliasing, profile and v-sync
    /// * `surface` - Surface to present to; created from the video mode when `None`
    /// * `share_with` - Earlier context whose objects the new one shares
    ///
    /// The new context becomes the current one.
    ///
    /// # Errors
    ///
    /// `ContextCreationFailed` when the backend has no platform contexts or
    /// a fatal negotiation step fails. `InvalidArgument` for a stale
    /// `share_with` handle.
    pub fn create_render_context(
        &mut self,
        desc: &ContextDescriptor,
        surface: Option<Box<dyn Surface>>,
        share_with: Option<RenderContextHandle>,
    ) -> Result<RenderContextHandle> {
        let shared = match share_with {
            Some(handle) => Some(&self.contexts.resolve(handle)?.state),
            None => None,
        };
        let api_name = self.backend.api_name();
        let api = match self.backend.context_api() {
            Some(api) => api,
            None => hal_bail!(
                ContextCreationFailed,
                SOURCE,
                "{} has no window-integrated render contexts",
                api_name
            ),
        };

        let mut surface = match surface {
            Some(surface) => surface,
            None => api.create_surface(&SurfaceDesc::from(&desc.video_mode)).map_err(|e| {
                hal_err!(ContextCreationFailed, SOURCE, "failed to create surface: {}", e)
            })?,
        };

        let state = ContextNegotiator::new(api, surface.as_mut(), desc, shared).run()?;
        for diagnostic in &state.diagnostics {
            hal_info!(SOURCE, "Render context negotiated with step-down: {}", diagnostic);
        }

        let handle = self.contexts.insert(RenderContextEntry { state, surface });
        self.current_context = Some(handle);
        Ok(handle)
    }

    /// Negotiated state of a render context
    pub fn context_state(&self, handle: RenderContextHandle) -> Result<&ContextState> {
        Ok(&self.contexts.resolve(handle)?.state)
    }

    /// Surface a render context presents to
    pub fn context_surface(&self, handle: RenderContextHandle) -> Result<&dyn Surface> {
        Ok(self.contexts.resolve(handle)?.surface.as_ref())
    }

    /// Make a render context current, or detach the current one with `None`
    pub fn make_current(&mut self, handle: Option<RenderContextHandle>) -> Result<()> {
        let target = match handle {
            Some(handle) => Some(self.contexts.resolve(handle)?),
            None => None,
        };
        let api = match self.backend.context_api() {
            Some(api) => api,
            None => hal_bail!(InvalidArgument, SOURCE, "backend has no render contexts"),
        };

        match target {
            Some(entry) => {
                let drawable = entry.surface.native_handle()?;
                api.bind_drawable(drawable)?;
                api.make_current(entry.state.native_context)?;
            }
            None => api.make_current(None)?,
        }
        self.current_context = handle;
        Ok(())
    }

    pub fn current_context(&self) -> Option<RenderContextHandle> {
        self.current_context
    }

    /// Release a render context
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when other live contexts still borrow its hardware
    /// context.
    pub fn release_render_context(&mut self, handle: RenderContextHandle) -> Result<()> {
        let entry = self.contexts.resolve(handle)?;
        if entry.state.ownership == ContextOwnership::Owned {
            let native = entry.state.native_context;
            let borrowers = self
                .contexts
                .iter()
                .filter(|(other, e)| {
                    *other != handle
                        && e.state.ownership == ContextOwnership::Shared
                        && e.state.native_context == native
                })
                .count();
            if borrowers > 0 {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "{:?} is still shared by {} render context(s)",
                    handle,
                    borrowers
                );
            }
        }

        let entry = self.contexts.remove(handle)?;
        let is_current = self.current_context == Some(handle);
        if is_current {
            self.current_context = None;
        }
        if let Some(api) = self.backend.context_api() {
            release_context(api, &entry.state, is_current);
        }
        Ok(())
    }

    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }
}

impl<B: Backend> Drop for RenderSystem<B> {
    fn drop(&mut self) {
        if let Err(e) = self.fence.sync_gpu() {
            hal_warn!(SOURCE, "GPU did not drain before shutdown: {}", e);
        }

        // Borrowing contexts first, then the owners of hardware contexts
        let mut contexts = self.contexts.drain();
        contexts.sort_by_key(|(_, entry)| entry.state.ownership == ContextOwnership::Owned);
        let current = self.current_context.take();
        if let Some(api) = self.backend.context_api() {
            for (handle, entry) in &contexts {
                release_context(api, &entry.state, current == Some(*handle));
            }
        }
    }
}

#[cfg(test)]
#[path = "render_system_tests.rs"]
mod tests;
