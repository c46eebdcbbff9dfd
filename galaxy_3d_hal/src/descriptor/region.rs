//! Texture update regions, one shape per texture kind

use glam::{UVec2, UVec3};

use super::texture::TextureType;

/// Part of a texture mip level addressed by a write
///
/// Each variant uses the coordinates natural for its kind. The
/// normalizer folds them into a uniform 3D box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureRegion {
    Texture1D {
        x: u32,
        width: u32,
    },
    Texture2D {
        offset: UVec2,
        extent: UVec2,
    },
    Texture3D {
        offset: UVec3,
        extent: UVec3,
    },
    TextureCube {
        offset: UVec2,
        extent: UVec2,
        /// Face index 0..6 (+X, -X, +Y, -Y, +Z, -Z)
        face: u32,
    },
    Texture1DArray {
        x: u32,
        width: u32,
        first_layer: u32,
        layers: u32,
    },
    Texture2DArray {
        offset: UVec2,
        extent: UVec2,
        first_layer: u32,
        layers: u32,
    },
    TextureCubeArray {
        offset: UVec2,
        extent: UVec2,
        /// Index of the first cube
        first_layer: u32,
        /// Face of the first cube to start at
        first_face: u32,
        /// Number of consecutive faces, may span several cubes
        faces: u32,
    },
}

impl TextureRegion {
    /// Texture kind this region addresses
    pub fn texture_type(&self) -> TextureType {
        match self {
            TextureRegion::Texture1D { .. } => TextureType::Texture1D,
            TextureRegion::Texture2D { .. } => TextureType::Texture2D,
            TextureRegion::Texture3D { .. } => TextureType::Texture3D,
            TextureRegion::TextureCube { .. } => TextureType::TextureCube,
            TextureRegion::Texture1DArray { .. } => TextureType::Texture1DArray,
            TextureRegion::Texture2DArray { .. } => TextureType::Texture2DArray,
            TextureRegion::TextureCubeArray { .. } => TextureType::TextureCubeArray,
        }
    }

    /// Region covering a full 2D mip level
    pub fn full_2d(width: u32, height: u32) -> Self {
        TextureRegion::Texture2D { offset: UVec2::ZERO, extent: UVec2::new(width, height) }
    }
}
