//! Backend trait - the native half of a render system
//!
//! A backend receives descriptors that are already normalized and validated
//! against the capability table, and creates native objects from them.
//! Handles, registries, fences and lifetime tracking stay in `RenderSystem`.

use crate::context::ContextApi;
use crate::descriptor::{PipelineDesc, ShaderDesc, ShaderStage};
use crate::error::Result;
use crate::normalize::{LayerConvention, NormalizedBufferDesc, NormalizedTextureDesc, TextureBox};
use crate::sync::NativeFence;

/// Native device of one graphics API
pub trait Backend: Send {
    type Texture: Send;
    type Buffer: Send;
    type Shader: Send;
    type Pipeline: Send;
    type Fence: NativeFence;

    /// Native API name (e.g. "Direct3D 11")
    fn api_name(&self) -> &'static str;

    /// How the backend counts cube layers
    fn layer_convention(&self) -> LayerConvention;

    /// Create a texture with undefined contents
    fn create_texture(&mut self, desc: &NormalizedTextureDesc) -> Result<Self::Texture>;

    /// Queue a copy of `data` into `region` of `mip_level`
    ///
    /// `data` is tightly packed and covers the region exactly.
    fn write_texture(
        &mut self,
        texture: &mut Self::Texture,
        mip_level: u32,
        region: TextureBox,
        data: &[u8],
    ) -> Result<()>;

    /// Copy a whole mip level back to the CPU
    ///
    /// The caller waits for all queued work first.
    fn read_texture(&mut self, texture: &Self::Texture, mip_level: u32) -> Result<Vec<u8>>;

    /// Queue generation of every mip level from the base level
    fn generate_mips(&mut self, texture: &mut Self::Texture) -> Result<()>;

    /// # Arguments
    ///
    /// * `desc` - Normalized descriptor
    /// * `initial_data` - Contents of the first bytes, zero-filled past its end
    fn create_buffer(
        &mut self,
        desc: &NormalizedBufferDesc,
        initial_data: Option<&[u8]>,
    ) -> Result<Self::Buffer>;

    /// Queue a write of `data` at `offset` (range already checked)
    fn write_buffer(&mut self, buffer: &mut Self::Buffer, offset: u64, data: &[u8]) -> Result<()>;

    /// Copy `len` bytes at `offset` back to the CPU
    fn read_buffer(&mut self, buffer: &Self::Buffer, offset: u64, len: u64) -> Result<Vec<u8>>;

    fn create_shader(&mut self, desc: &ShaderDesc) -> Result<Self::Shader>;

    /// # Arguments
    ///
    /// * `desc` - Pipeline descriptor, shader handles already resolved
    /// * `stages` - Resolved shaders in pipeline order
    fn create_pipeline(
        &mut self,
        desc: &PipelineDesc,
        stages: &[(ShaderStage, &Self::Shader)],
    ) -> Result<Self::Pipeline>;

    /// Fence on the backend's submission queue, starting at 0
    fn create_fence(&mut self) -> Result<Self::Fence>;

    /// Platform context calls, for window-integrated backends
    fn context_api(&mut self) -> Option<&mut dyn ContextApi>;
}
