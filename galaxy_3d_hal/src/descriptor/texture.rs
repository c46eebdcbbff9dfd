//! Texture descriptor, format and dimension kinds

use super::flags::{BindFlags, CpuAccessFlags, MiscFlags};

/// Texture pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    R8_UNORM,
    R8G8_UNORM,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    R16G16B16A16_SFLOAT,
    R32_SFLOAT,
    R32_UINT,
    R32G32B32A32_SFLOAT,
    D16_UNORM,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
}

impl TextureFormat {
    /// Size of one texel in bytes
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            TextureFormat::R8_UNORM => 1,
            TextureFormat::R8G8_UNORM | TextureFormat::D16_UNORM => 2,
            TextureFormat::R8G8B8A8_UNORM
            | TextureFormat::R8G8B8A8_SRGB
            | TextureFormat::B8G8R8A8_UNORM
            | TextureFormat::B8G8R8A8_SRGB
            | TextureFormat::R32_SFLOAT
            | TextureFormat::R32_UINT
            | TextureFormat::D24_UNORM_S8_UINT
            | TextureFormat::D32_FLOAT => 4,
            TextureFormat::R16G16B16A16_SFLOAT => 8,
            TextureFormat::R32G32B32A32_SFLOAT => 16,
        }
    }

    /// Whether the format holds depth (and possibly stencil) data
    pub fn is_depth_stencil(self) -> bool {
        matches!(
            self,
            TextureFormat::D16_UNORM | TextureFormat::D24_UNORM_S8_UINT | TextureFormat::D32_FLOAT
        )
    }

    /// Whether every channel is an 8-bit normalized integer
    ///
    /// Such formats can be filtered channel by channel on the CPU.
    pub fn is_unorm8(self) -> bool {
        matches!(
            self,
            TextureFormat::R8_UNORM
                | TextureFormat::R8G8_UNORM
                | TextureFormat::R8G8B8A8_UNORM
                | TextureFormat::R8G8B8A8_SRGB
                | TextureFormat::B8G8R8A8_UNORM
                | TextureFormat::B8G8R8A8_SRGB
        )
    }
}

/// Dimension kind of a texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    Texture1D,
    Texture2D,
    Texture3D,
    TextureCube,
    Texture1DArray,
    Texture2DArray,
    TextureCubeArray,
}

impl TextureType {
    /// Cube and cube-array kinds
    pub fn is_cube(self) -> bool {
        matches!(self, TextureType::TextureCube | TextureType::TextureCubeArray)
    }

    /// Kinds whose layer count is chosen by the caller
    pub fn is_array(self) -> bool {
        matches!(
            self,
            TextureType::Texture1DArray | TextureType::Texture2DArray | TextureType::TextureCubeArray
        )
    }

    /// Number of spatial dimensions (1, 2 or 3)
    pub fn spatial_dimensions(self) -> u32 {
        match self {
            TextureType::Texture1D | TextureType::Texture1DArray => 1,
            TextureType::Texture3D => 3,
            _ => 2,
        }
    }
}

/// How many mip levels a texture gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MipPolicy {
    /// Base level only
    Single,
    /// Complete chain down to 1x1x1
    FullChain,
    /// Explicit count, clamped to the full chain; `Levels(0)` means full chain
    Levels(u32),
}

// ===== TEXTURE DESC =====

/// Descriptor for creating a texture
///
/// `array_layers` is counted the caller's way: number of array slices for
/// 1D/2D arrays, number of cubes for cube arrays. It is ignored for the
/// non-array kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub texture_type: TextureType,
    pub format: TextureFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_layers: u32,
    pub mip_policy: MipPolicy,
    pub bind_flags: BindFlags,
    pub cpu_access: CpuAccessFlags,
    pub misc_flags: MiscFlags,
}

impl Default for TextureDesc {
    fn default() -> Self {
        Self {
            texture_type: TextureType::Texture2D,
            format: TextureFormat::R8G8B8A8_UNORM,
            width: 1,
            height: 1,
            depth: 1,
            array_layers: 1,
            mip_policy: MipPolicy::Single,
            bind_flags: BindFlags::SAMPLE_BUFFER,
            cpu_access: CpuAccessFlags::empty(),
            misc_flags: MiscFlags::empty(),
        }
    }
}

impl TextureDesc {
    /// Sampled 2D texture
    pub fn texture_2d(format: TextureFormat, width: u32, height: u32) -> Self {
        Self { format, width, height, ..Default::default() }
    }

    /// Sampled 2D texture array
    pub fn texture_2d_array(format: TextureFormat, width: u32, height: u32, layers: u32) -> Self {
        Self {
            texture_type: TextureType::Texture2DArray,
            format,
            width,
            height,
            array_layers: layers,
            ..Default::default()
        }
    }

    /// Sampled cube texture (faces are `size` x `size`)
    pub fn cube(format: TextureFormat, size: u32) -> Self {
        Self {
            texture_type: TextureType::TextureCube,
            format,
            width: size,
            height: size,
            ..Default::default()
        }
    }

    /// Depth-stencil attachment
    pub fn depth_stencil(format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            bind_flags: BindFlags::DEPTH_STENCIL_ATTACHMENT,
            ..Default::default()
        }
    }

    /// Builder: set the mip policy
    pub fn with_mips(mut self, mip_policy: MipPolicy) -> Self {
        self.mip_policy = mip_policy;
        self
    }

    /// Builder: add bind flags
    pub fn with_bind_flags(mut self, flags: BindFlags) -> Self {
        self.bind_flags |= flags;
        self
    }

    /// Builder: set CPU access
    pub fn with_cpu_access(mut self, access: CpuAccessFlags) -> Self {
        self.cpu_access = access;
        self
    }
}
