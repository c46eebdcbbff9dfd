//! Descriptor normalization
//!
//! Expands neutral descriptors into backend-ready ones: layer counts in the
//! backend's counting convention, a resolved mip chain, usage mode and
//! effective CPU access. Texture update regions are folded into one uniform
//! 3D box so backends only ever copy boxes.

use glam::UVec3;

use crate::descriptor::{
    BindFlags, BufferDesc, CpuAccessFlags, MipPolicy, MiscFlags, StorageBufferType, TextureDesc,
    TextureFormat, TextureRegion, TextureType,
};
use crate::error::Result;
use crate::hal_bail;
use crate::translate::{buffer_usage_mode, effective_cpu_access, texture_usage_mode, UsageMode};

const SOURCE: &str = "galaxy3d::hal::normalize";

/// Number of faces of a cube
pub const CUBE_FACES: u32 = 6;

/// How a backend counts the layers of cube textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerConvention {
    /// Every cube face is one array layer (cube = 6 layers)
    CubeFacesAsLayers,
    /// Cubes are a texture kind of their own (cube = 1 layer)
    CubeAsElement,
}

// ===== TEXTURE =====

/// Fully resolved texture descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedTextureDesc {
    pub texture_type: TextureType,
    pub format: TextureFormat,
    /// Base level extent; dimensions the kind does not use are 1
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// Layer count in the backend's convention
    pub array_layers: u32,
    pub convention: LayerConvention,
    pub mip_levels: u32,
    pub bind_flags: BindFlags,
    pub misc_flags: MiscFlags,
    pub usage: UsageMode,
    /// CPU access granted after usage resolution
    pub cpu_access: CpuAccessFlags,
}

impl NormalizedTextureDesc {
    /// More than one mip level
    pub fn is_mip_mapped(&self) -> bool {
        self.mip_levels > 1
    }

    /// Depth-stencil by format or by binding
    pub fn is_depth_stencil(&self) -> bool {
        self.format.is_depth_stencil()
            || self.bind_flags.contains(BindFlags::DEPTH_STENCIL_ATTACHMENT)
    }

    /// Mip generation is supported for mip-mapped color textures only
    pub fn supports_mip_generation(&self) -> bool {
        self.is_mip_mapped() && !self.is_depth_stencil()
    }

    /// Spatial extent of one mip level
    pub fn mip_extent(&self, mip_level: u32) -> UVec3 {
        let shrink = |v: u32| (v >> mip_level.min(31)).max(1);
        UVec3::new(shrink(self.width), shrink(self.height), shrink(self.depth))
    }

    /// Total 2D/1D slices, always counting cube faces individually
    pub fn layer_slices(&self) -> u32 {
        match (self.texture_type, self.convention) {
            (TextureType::TextureCube, _) => CUBE_FACES,
            (TextureType::TextureCubeArray, LayerConvention::CubeFacesAsLayers) => self.array_layers,
            (TextureType::TextureCubeArray, LayerConvention::CubeAsElement) => {
                self.array_layers * CUBE_FACES
            }
            _ => self.array_layers,
        }
    }

    /// Uniform 3D grid of one mip level, array slices folded into the first
    /// axis past the spatial dimensions
    pub fn mip_grid(&self, mip_level: u32) -> UVec3 {
        let extent = self.mip_extent(mip_level);
        match self.texture_type {
            TextureType::Texture1D => UVec3::new(extent.x, 1, 1),
            TextureType::Texture1DArray => UVec3::new(extent.x, self.layer_slices(), 1),
            TextureType::Texture2D => UVec3::new(extent.x, extent.y, 1),
            TextureType::Texture3D => extent,
            TextureType::TextureCube
            | TextureType::Texture2DArray
            | TextureType::TextureCubeArray => UVec3::new(extent.x, extent.y, self.layer_slices()),
        }
    }

    /// Bytes of one full mip level
    pub fn mip_size_in_bytes(&self, mip_level: u32) -> u64 {
        let grid = self.mip_grid(mip_level);
        grid.x as u64 * grid.y as u64 * grid.z as u64 * self.format.bytes_per_pixel() as u64
    }

    /// Layer count the way the caller counts it (cubes for cube arrays)
    pub fn caller_layers(&self) -> u32 {
        match (self.texture_type, self.convention) {
            (TextureType::TextureCubeArray, LayerConvention::CubeFacesAsLayers) => {
                self.array_layers / CUBE_FACES
            }
            (t, _) if t.is_array() => self.array_layers,
            _ => 1,
        }
    }

    /// Reverse normalization, as reported by descriptor queries
    pub fn to_desc(&self) -> TextureDesc {
        TextureDesc {
            texture_type: self.texture_type,
            format: self.format,
            width: self.width,
            height: self.height,
            depth: self.depth,
            array_layers: self.caller_layers(),
            mip_policy: MipPolicy::Levels(self.mip_levels),
            bind_flags: self.bind_flags,
            cpu_access: self.cpu_access,
            misc_flags: self.misc_flags,
        }
    }
}

/// Mip levels of a complete chain for the largest dimension
pub fn full_mip_chain(width: u32, height: u32, depth: u32) -> u32 {
    let largest = width.max(height).max(depth).max(1);
    32 - largest.leading_zeros()
}

/// Resolve a texture descriptor for a backend using `convention`
///
/// # Errors
///
/// `InvalidArgument` for a zero dimension used by the kind, a non-square
/// cube, or an array kind with zero layers.
pub fn normalize_texture(
    desc: &TextureDesc,
    convention: LayerConvention,
) -> Result<NormalizedTextureDesc> {
    let texture_type = desc.texture_type;

    let (width, height, depth) = match texture_type.spatial_dimensions() {
        1 => (desc.width, 1, 1),
        2 => (desc.width, desc.height, 1),
        _ => (desc.width, desc.height, desc.depth),
    };
    if width == 0 || height == 0 || depth == 0 {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "{:?} has a zero dimension ({}x{}x{})",
            texture_type,
            desc.width,
            desc.height,
            desc.depth
        );
    }
    if texture_type.is_cube() && width != height {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "cube faces must be square, got {}x{}",
            width,
            height
        );
    }
    if texture_type.is_array() && desc.array_layers == 0 {
        hal_bail!(InvalidArgument, SOURCE, "{:?} needs at least one layer", texture_type);
    }

    let array_layers = match (texture_type, convention) {
        (TextureType::TextureCube, LayerConvention::CubeFacesAsLayers) => CUBE_FACES,
        (TextureType::TextureCubeArray, LayerConvention::CubeFacesAsLayers) => desc
            .array_layers
            .checked_mul(CUBE_FACES)
            .ok_or_else(|| {
                crate::hal_err!(
                    InvalidArgument,
                    SOURCE,
                    "cube array layer count {} overflows",
                    desc.array_layers
                )
            })?,
        (TextureType::TextureCubeArray, LayerConvention::CubeAsElement)
        | (TextureType::Texture1DArray, _)
        | (TextureType::Texture2DArray, _) => desc.array_layers,
        _ => 1,
    };

    let full_chain = full_mip_chain(width, height, depth);
    let mip_levels = match desc.mip_policy {
        MipPolicy::Single => 1,
        MipPolicy::FullChain | MipPolicy::Levels(0) => full_chain,
        MipPolicy::Levels(n) => n.min(full_chain),
    };

    let usage = texture_usage_mode(desc);

    Ok(NormalizedTextureDesc {
        texture_type,
        format: desc.format,
        width,
        height,
        depth,
        array_layers,
        convention,
        mip_levels,
        bind_flags: desc.bind_flags,
        misc_flags: desc.misc_flags,
        usage,
        cpu_access: effective_cpu_access(desc.cpu_access, usage),
    })
}

// ===== BUFFER =====

/// Fully resolved buffer descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBufferDesc {
    pub size: u64,
    pub stride: u32,
    pub storage_type: StorageBufferType,
    pub bind_flags: BindFlags,
    pub misc_flags: MiscFlags,
    pub usage: UsageMode,
    pub cpu_access: CpuAccessFlags,
}

impl NormalizedBufferDesc {
    /// Number of `stride`-sized elements, 0 when the buffer has no stride
    pub fn element_count(&self) -> u64 {
        if self.stride == 0 {
            0
        } else {
            self.size / self.stride as u64
        }
    }

    /// Neutral descriptor with the granted CPU access
    pub fn to_desc(&self) -> BufferDesc {
        BufferDesc {
            size: self.size,
            stride: self.stride,
            storage_type: self.storage_type,
            bind_flags: self.bind_flags,
            cpu_access: self.cpu_access,
            misc_flags: self.misc_flags,
        }
    }
}

/// Resolve a buffer descriptor
///
/// # Errors
///
/// `InvalidArgument` for a zero size, or a structured buffer whose size is
/// not a whole number of strides.
pub fn normalize_buffer(desc: &BufferDesc) -> Result<NormalizedBufferDesc> {
    if desc.size == 0 {
        hal_bail!(InvalidArgument, SOURCE, "buffer size must be > 0");
    }
    if desc.storage_type.is_structured() {
        if desc.stride == 0 {
            hal_bail!(InvalidArgument, SOURCE, "structured buffer needs a stride");
        }
        if desc.size % desc.stride as u64 != 0 {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "structured buffer size {} is not a multiple of stride {}",
                desc.size,
                desc.stride
            );
        }
    }

    let usage = buffer_usage_mode(desc);
    Ok(NormalizedBufferDesc {
        size: desc.size,
        stride: desc.stride,
        storage_type: desc.storage_type,
        bind_flags: desc.bind_flags,
        misc_flags: desc.misc_flags,
        usage,
        cpu_access: effective_cpu_access(desc.cpu_access, usage),
    })
}

// ===== REGIONS =====

/// Half-open box `[min, max)` on a mip level's uniform grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureBox {
    pub min: UVec3,
    pub max: UVec3,
}

impl TextureBox {
    pub fn new(min: UVec3, max: UVec3) -> Self {
        Self { min, max }
    }

    pub fn extent(&self) -> UVec3 {
        self.max - self.min
    }

    /// Number of texels covered
    pub fn texel_count(&self) -> u64 {
        let e = self.extent();
        e.x as u64 * e.y as u64 * e.z as u64
    }

    /// Box covering a whole grid
    pub fn whole(grid: UVec3) -> Self {
        Self { min: UVec3::ZERO, max: grid }
    }
}

/// Fold `region` of mip `mip_level` into a box on the texture's uniform grid
///
/// # Errors
///
/// `InvalidArgument` when the region kind does not match the texture, the
/// mip level or cube face is out of range, the region is empty, or it
/// exceeds the mip level.
pub fn normalize_region(
    desc: &NormalizedTextureDesc,
    mip_level: u32,
    region: &TextureRegion,
) -> Result<TextureBox> {
    if region.texture_type() != desc.texture_type {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "{:?} region cannot address a {:?}",
            region.texture_type(),
            desc.texture_type
        );
    }
    if mip_level >= desc.mip_levels {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "mip level {} out of range (texture has {})",
            mip_level,
            desc.mip_levels
        );
    }

    let (offset, extent) = match *region {
        TextureRegion::Texture1D { x, width } => (UVec3::new(x, 0, 0), UVec3::new(width, 1, 1)),
        TextureRegion::Texture2D { offset, extent } => (offset.extend(0), extent.extend(1)),
        TextureRegion::Texture3D { offset, extent } => (offset, extent),
        TextureRegion::TextureCube { offset, extent, face } => {
            check_face(face)?;
            (offset.extend(face), extent.extend(1))
        }
        TextureRegion::Texture1DArray { x, width, first_layer, layers } => {
            (UVec3::new(x, first_layer, 0), UVec3::new(width, layers, 1))
        }
        TextureRegion::Texture2DArray { offset, extent, first_layer, layers } => {
            (offset.extend(first_layer), extent.extend(layers))
        }
        TextureRegion::TextureCubeArray { offset, extent, first_layer, first_face, faces } => {
            check_face(first_face)?;
            let z = first_layer
                .checked_mul(CUBE_FACES)
                .and_then(|z| z.checked_add(first_face))
                .ok_or_else(|| {
                    crate::hal_err!(InvalidArgument, SOURCE, "cube array layer {} overflows", first_layer)
                })?;
            (offset.extend(z), extent.extend(faces))
        }
    };

    if extent.cmpeq(UVec3::ZERO).any() {
        hal_bail!(InvalidArgument, SOURCE, "empty region {:?}", extent);
    }

    let grid = desc.mip_grid(mip_level);
    let max = match (
        offset.x.checked_add(extent.x),
        offset.y.checked_add(extent.y),
        offset.z.checked_add(extent.z),
    ) {
        (Some(x), Some(y), Some(z)) => UVec3::new(x, y, z),
        _ => hal_bail!(InvalidArgument, SOURCE, "region {:?}+{:?} overflows", offset, extent),
    };
    if max.cmpgt(grid).any() {
        hal_bail!(
            InvalidArgument,
            SOURCE,
            "region {:?}..{:?} exceeds mip {} grid {:?}",
            offset,
            max,
            mip_level,
            grid
        );
    }

    Ok(TextureBox::new(offset, max))
}

fn check_face(face: u32) -> Result<()> {
    if face >= CUBE_FACES {
        hal_bail!(InvalidArgument, SOURCE, "cube face {} out of range", face);
    }
    Ok(())
}

#[cfg(test)]
#[path = "normalize_tests.rs"]
mod tests;
