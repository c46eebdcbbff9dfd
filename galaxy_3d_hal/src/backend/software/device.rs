//! Software device
//!
//! Reference implementation of `Backend`: native flags come from the
//! Direct3D 11 tables, storage lives in CPU memory and every copy runs on
//! the software queue in submission order.

use super::context_api::SoftwareContextApi;
use super::fence::SoftwareFence;
use super::queue::SoftwareQueue;
use super::resources::{
    copy_into_box, downsample, lock, FilterKind, SoftwareBuffer, SoftwarePipeline, SoftwareShader,
    SoftwareTexture,
};
use crate::capability::FeatureLevel;
use crate::context::ContextApi;
use crate::descriptor::{PipelineDesc, ShaderDesc, ShaderStage};
use crate::device::Backend;
use crate::error::Result;
use crate::normalize::{LayerConvention, NormalizedBufferDesc, NormalizedTextureDesc, TextureBox};
use crate::translate::d3d11::{D3D11CpuAccessFlags, D3D11FlagTables, D3D11MiscFlags};
use crate::translate::NativeFlagTables;
use crate::{hal_bail, hal_debug};

const SOURCE: &str = "galaxy3d::hal::software";

/// Device of the software backend
pub struct SoftwareDevice {
    feature_level: FeatureLevel,
    queue: SoftwareQueue,
    context_api: Option<SoftwareContextApi>,
}

impl SoftwareDevice {
    /// # Arguments
    ///
    /// * `feature_level` - Level the device runs at
    /// * `context_api` - Emulated platform for render contexts, if any
    pub fn new(feature_level: FeatureLevel, context_api: Option<SoftwareContextApi>) -> Result<Self> {
        let queue = SoftwareQueue::new()?;
        hal_debug!(SOURCE, "Software device created at feature level {}", feature_level);
        Ok(Self { feature_level, queue, context_api })
    }

    pub fn feature_level(&self) -> FeatureLevel {
        self.feature_level
    }

    pub fn queue(&self) -> &SoftwareQueue {
        &self.queue
    }

    /// Emulated platform, for inspection
    pub fn platform(&self) -> Option<&SoftwareContextApi> {
        self.context_api.as_ref()
    }
}

impl Backend for SoftwareDevice {
    type Texture = SoftwareTexture;
    type Buffer = SoftwareBuffer;
    type Shader = SoftwareShader;
    type Pipeline = SoftwarePipeline;
    type Fence = SoftwareFence;

    fn api_name(&self) -> &'static str {
        D3D11FlagTables::API_NAME
    }

    fn layer_convention(&self) -> LayerConvention {
        LayerConvention::CubeFacesAsLayers
    }

    fn create_texture(&mut self, desc: &NormalizedTextureDesc) -> Result<SoftwareTexture> {
        SoftwareTexture::new(desc)
    }

    fn write_texture(
        &mut self,
        texture: &mut SoftwareTexture,
        mip_level: u32,
        region: TextureBox,
        data: &[u8],
    ) -> Result<()> {
        let grid = texture.desc().mip_grid(mip_level);
        let bytes_per_pixel = texture.desc().format.bytes_per_pixel();
        let storage = texture.storage();
        let data = data.to_vec();

        self.queue.submit(move || {
            let mut mips = lock(&storage);
            if let Some(level) = mips.get_mut(mip_level as usize) {
                copy_into_box(level, grid, bytes_per_pixel, region, &data);
            }
        })
    }

    fn read_texture(&mut self, texture: &SoftwareTexture, mip_level: u32) -> Result<Vec<u8>> {
        texture.read_mip(mip_level)
    }

    fn generate_mips(&mut self, texture: &mut SoftwareTexture) -> Result<()> {
        if !texture.misc_flags().contains(D3D11MiscFlags::GENERATE_MIPS) {
            hal_bail!(BackendError, SOURCE, "texture was not created for mip generation");
        }
        let desc = texture.desc().clone();
        let kind = match FilterKind::of(desc.format) {
            Some(kind) => kind,
            None => hal_bail!(BackendError, SOURCE, "cannot filter {:?} texels", desc.format),
        };
        let storage = texture.storage();

        self.queue.submit(move || {
            let mut mips = lock(&storage);
            let bytes_per_pixel = desc.format.bytes_per_pixel();
            let spatial_axes = desc.texture_type.spatial_dimensions();
            for mip in 1..mips.len() {
                let (coarser, finer) = mips.split_at_mut(mip);
                downsample(
                    kind,
                    bytes_per_pixel,
                    spatial_axes,
                    &coarser[mip - 1],
                    desc.mip_grid(mip as u32 - 1),
                    &mut finer[0],
                    desc.mip_grid(mip as u32),
                );
            }
        })
    }

    fn create_buffer(
        &mut self,
        desc: &NormalizedBufferDesc,
        initial_data: Option<&[u8]>,
    ) -> Result<SoftwareBuffer> {
        SoftwareBuffer::new(desc, initial_data)
    }

    fn write_buffer(&mut self, buffer: &mut SoftwareBuffer, offset: u64, data: &[u8]) -> Result<()> {
        let storage = buffer.storage();
        let data = data.to_vec();
        let start = offset as usize;

        self.queue.submit(move || {
            let mut bytes = lock(&storage);
            if let Some(range) = bytes.get_mut(start..start + data.len()) {
                range.copy_from_slice(&data);
            }
        })
    }

    fn read_buffer(&mut self, buffer: &SoftwareBuffer, offset: u64, len: u64) -> Result<Vec<u8>> {
        if !buffer.cpu_access().contains(D3D11CpuAccessFlags::READ) {
            hal_bail!(BackendError, SOURCE, "buffer is not a staging buffer");
        }
        buffer.read_range(offset, len)
    }

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<SoftwareShader> {
        Ok(SoftwareShader {
            stage: desc.stage,
            entry_point: desc.entry_point.clone(),
            code: desc.code.clone(),
        })
    }

    fn create_pipeline(
        &mut self,
        desc: &PipelineDesc,
        stages: &[(ShaderStage, &SoftwareShader)],
    ) -> Result<SoftwarePipeline> {
        let (topology, sample_count) = match desc {
            PipelineDesc::Graphics(graphics) => (Some(graphics.topology), graphics.sample_count),
            PipelineDesc::Compute { .. } => (None, 1),
        };
        Ok(SoftwarePipeline {
            stages: stages.iter().map(|(stage, _)| *stage).collect(),
            topology,
            sample_count,
        })
    }

    fn create_fence(&mut self) -> Result<SoftwareFence> {
        Ok(SoftwareFence::new(&self.queue))
    }

    fn context_api(&mut self) -> Option<&mut dyn ContextApi> {
        self.context_api.as_mut().map(|api| api as &mut dyn ContextApi)
    }
}

#[cfg(test)]
#[path = "device_tests.rs"]
mod tests;
