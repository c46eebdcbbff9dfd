//! Immutable device capabilities derived from the negotiated feature level

use glam::UVec3;

use super::feature_level::{FeatureLevel, ShadingLanguage};
use crate::descriptor::TextureType;
use crate::error::Result;
use crate::hal_bail;
use crate::normalize::NormalizedTextureDesc;

const SOURCE: &str = "galaxy3d::hal::capability";

/// Where the first row of a render target lives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenOrigin {
    UpperLeft,
    LowerLeft,
}

/// Depth range of normalized device coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClippingRange {
    ZeroToOne,
    MinusOneToOne,
}

/// Rendering capabilities
///
/// A pure function of the feature level: two tables built from the same
/// level are equal, and the table is never re-probed after bring-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    pub feature_level: FeatureLevel,
    pub shading_language: ShadingLanguage,
    pub screen_origin: ScreenOrigin,
    pub clipping_range: ClippingRange,

    pub has_render_targets: bool,
    pub has_3d_textures: bool,
    pub has_cube_textures: bool,
    pub has_texture_arrays: bool,
    pub has_cube_texture_arrays: bool,
    pub has_samplers: bool,
    pub has_constant_buffers: bool,
    pub has_storage_buffers: bool,
    pub has_uniforms: bool,
    pub has_geometry_shaders: bool,
    pub has_tessellation_shaders: bool,
    pub has_compute_shaders: bool,
    pub has_instancing: bool,
    pub has_offset_instancing: bool,
    pub has_viewport_arrays: bool,
    pub has_conservative_rasterization: bool,

    pub max_texture_array_layers: u32,
    pub max_color_attachments: u32,
    pub max_constant_buffer_size: u32,
    pub max_1d_texture_size: u32,
    pub max_2d_texture_size: u32,
    pub max_3d_texture_size: u32,
    pub max_cube_texture_size: u32,
    pub max_anisotropy: u32,
    pub max_compute_work_groups: UVec3,
    pub max_compute_work_group_size: UVec3,
}

const MAX_THREAD_GROUPS: u32 = 65535;

fn max_texture_dimension(level: FeatureLevel) -> u32 {
    if level >= FeatureLevel::Level11_0 {
        16384
    } else if level >= FeatureLevel::Level10_0 {
        8192
    } else if level >= FeatureLevel::Level9_3 {
        4096
    } else {
        2048
    }
}

fn max_cube_texture_dimension(level: FeatureLevel) -> u32 {
    if level >= FeatureLevel::Level9_3 {
        max_texture_dimension(level)
    } else {
        512
    }
}

fn max_render_targets(level: FeatureLevel) -> u32 {
    if level >= FeatureLevel::Level10_0 {
        8
    } else if level >= FeatureLevel::Level9_3 {
        4
    } else {
        1
    }
}

impl CapabilityTable {
    /// Build the table for `level`
    pub fn from_feature_level(level: FeatureLevel) -> Self {
        let at_least = |min: FeatureLevel| level >= min;
        Self {
            feature_level: level,
            shading_language: level.shading_language(),
            screen_origin: ScreenOrigin::UpperLeft,
            clipping_range: ClippingRange::ZeroToOne,

            has_render_targets: true,
            has_3d_textures: true,
            has_cube_textures: true,
            has_texture_arrays: at_least(FeatureLevel::Level10_0),
            has_cube_texture_arrays: at_least(FeatureLevel::Level10_1),
            has_samplers: at_least(FeatureLevel::Level9_3),
            has_constant_buffers: true,
            has_storage_buffers: true,
            has_uniforms: false,
            has_geometry_shaders: at_least(FeatureLevel::Level10_0),
            has_tessellation_shaders: at_least(FeatureLevel::Level11_0),
            has_compute_shaders: at_least(FeatureLevel::Level10_0),
            has_instancing: at_least(FeatureLevel::Level9_3),
            has_offset_instancing: at_least(FeatureLevel::Level9_3),
            has_viewport_arrays: true,
            has_conservative_rasterization: at_least(FeatureLevel::Level11_1),

            max_texture_array_layers: if at_least(FeatureLevel::Level10_0) { 2048 } else { 256 },
            max_color_attachments: max_render_targets(level),
            max_constant_buffer_size: 16384,
            max_1d_texture_size: max_texture_dimension(level),
            max_2d_texture_size: max_texture_dimension(level),
            max_3d_texture_size: if at_least(FeatureLevel::Level10_0) { 2048 } else { 256 },
            max_cube_texture_size: max_cube_texture_dimension(level),
            max_anisotropy: if at_least(FeatureLevel::Level9_2) { 16 } else { 2 },
            max_compute_work_groups: UVec3::new(
                MAX_THREAD_GROUPS,
                MAX_THREAD_GROUPS,
                if at_least(FeatureLevel::Level11_0) { MAX_THREAD_GROUPS } else { 1 },
            ),
            max_compute_work_group_size: UVec3::splat(1024),
        }
    }

    /// Check a normalized texture against the device limits
    ///
    /// # Errors
    ///
    /// `InvalidArgument` when the kind is unsupported or a size or layer
    /// count exceeds the limit.
    pub fn validate_texture(&self, desc: &NormalizedTextureDesc) -> Result<()> {
        let (limit, largest) = match desc.texture_type {
            TextureType::Texture1D | TextureType::Texture1DArray => (self.max_1d_texture_size, desc.width),
            TextureType::Texture2D | TextureType::Texture2DArray => {
                (self.max_2d_texture_size, desc.width.max(desc.height))
            }
            TextureType::Texture3D => {
                (self.max_3d_texture_size, desc.width.max(desc.height).max(desc.depth))
            }
            TextureType::TextureCube | TextureType::TextureCubeArray => {
                (self.max_cube_texture_size, desc.width)
            }
        };
        if largest > limit {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "{:?} size {} exceeds the limit {} of feature level {}",
                desc.texture_type,
                largest,
                limit,
                self.feature_level
            );
        }

        match desc.texture_type {
            TextureType::Texture1DArray | TextureType::Texture2DArray if !self.has_texture_arrays => {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "texture arrays need feature level 10_0 (device is {})",
                    self.feature_level
                );
            }
            TextureType::TextureCubeArray if !self.has_cube_texture_arrays => {
                hal_bail!(
                    InvalidArgument,
                    SOURCE,
                    "cube texture arrays need feature level 10_1 (device is {})",
                    self.feature_level
                );
            }
            _ => {}
        }

        if desc.texture_type.is_array() && desc.layer_slices() > self.max_texture_array_layers {
            hal_bail!(
                InvalidArgument,
                SOURCE,
                "{} array layers exceed the limit {}",
                desc.layer_slices(),
                self.max_texture_array_layers
            );
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "capability_table_tests.rs"]
mod tests;
