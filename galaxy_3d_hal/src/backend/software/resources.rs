//! CPU-side storage of software textures, buffers, shaders and pipelines

use std::sync::{Arc, Mutex, MutexGuard};

use glam::UVec3;

use crate::descriptor::{PrimitiveTopology, ShaderStage, TextureFormat};
use crate::error::{Error, Result};
use crate::hal_bail;
use crate::normalize::{NormalizedBufferDesc, NormalizedTextureDesc, TextureBox};
use crate::translate::d3d11::{
    D3D11BindFlags, D3D11CpuAccessFlags, D3D11FlagTables, D3D11MiscFlags, D3D11Usage,
};
use crate::translate::NativeFlagTables;

const SOURCE: &str = "galaxy3d::hal::software";

pub(crate) type Storage<T> = Arc<Mutex<T>>;

pub(crate) fn lock<T>(storage: &Mutex<T>) -> MutexGuard<'_, T> {
    storage.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn allocate(size: u64) -> Result<Vec<u8>> {
    let size = usize::try_from(size).map_err(|_| Error::OutOfMemory)?;
    let mut bytes = Vec::new();
    bytes.try_reserve_exact(size).map_err(|_| Error::OutOfMemory)?;
    bytes.resize(size, 0);
    Ok(bytes)
}

// ===== TEXTURE =====

/// Texture stored as one tightly packed byte vector per mip level
pub struct SoftwareTexture {
    desc: NormalizedTextureDesc,
    bind_flags: D3D11BindFlags,
    misc_flags: D3D11MiscFlags,
    cpu_access: D3D11CpuAccessFlags,
    usage: D3D11Usage,
    mips: Storage<Vec<Vec<u8>>>,
}

impl SoftwareTexture {
    pub(crate) fn new(desc: &NormalizedTextureDesc) -> Result<Self> {
        let mips = (0..desc.mip_levels)
            .map(|mip| allocate(desc.mip_size_in_bytes(mip)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            desc: desc.clone(),
            bind_flags: D3D11FlagTables::texture_bind_flags(desc),
            misc_flags: D3D11FlagTables::texture_misc_flags(desc),
            cpu_access: D3D11FlagTables::cpu_access_flags(desc.cpu_access),
            usage: D3D11FlagTables::usage(desc.usage),
            mips: Arc::new(Mutex::new(mips)),
        })
    }

    pub fn desc(&self) -> &NormalizedTextureDesc {
        &self.desc
    }

    pub fn bind_flags(&self) -> D3D11BindFlags {
        self.bind_flags
    }

    pub fn misc_flags(&self) -> D3D11MiscFlags {
        self.misc_flags
    }

    pub fn cpu_access(&self) -> D3D11CpuAccessFlags {
        self.cpu_access
    }

    pub fn usage(&self) -> D3D11Usage {
        self.usage
    }

    pub(crate) fn storage(&self) -> Storage<Vec<Vec<u8>>> {
        Arc::clone(&self.mips)
    }

    pub(crate) fn read_mip(&self, mip_level: u32) -> Result<Vec<u8>> {
        match lock(&self.mips).get(mip_level as usize) {
            Some(level) => Ok(level.clone()),
            None => hal_bail!(BackendError, SOURCE, "texture has no mip level {}", mip_level),
        }
    }
}

/// Copy tightly packed `data` into `region` of a level laid out as `grid`
pub(crate) fn copy_into_box(level: &mut [u8], grid: UVec3, bytes_per_pixel: u32, region: TextureBox, data: &[u8]) {
    let bpp = bytes_per_pixel as usize;
    let row = region.extent().x as usize * bpp;
    let mut src = 0;
    for z in region.min.z..region.max.z {
        for y in region.min.y..region.max.y {
            let texel = (z as usize * grid.y as usize + y as usize) * grid.x as usize + region.min.x as usize;
            let dst = texel * bpp;
            level[dst..dst + row].copy_from_slice(&data[src..src + row]);
            src += row;
        }
    }
}

/// Channel encoding the box filter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterKind {
    Unorm8,
    Float32,
}

impl FilterKind {
    pub(crate) fn of(format: TextureFormat) -> Option<Self> {
        if format.is_unorm8() {
            Some(FilterKind::Unorm8)
        } else {
            match format {
                TextureFormat::R32_SFLOAT | TextureFormat::R32G32B32A32_SFLOAT => Some(FilterKind::Float32),
                _ => None,
            }
        }
    }

    fn channel_size(self) -> usize {
        match self {
            FilterKind::Unorm8 => 1,
            FilterKind::Float32 => 4,
        }
    }

    fn read(self, bytes: &[u8]) -> f32 {
        match self {
            FilterKind::Unorm8 => bytes[0] as f32,
            FilterKind::Float32 => bytemuck::pod_read_unaligned::<f32>(bytes),
        }
    }

    fn write(self, value: f32, out: &mut [u8]) {
        match self {
            FilterKind::Unorm8 => out[0] = (value + 0.5).clamp(0.0, 255.0) as u8,
            FilterKind::Float32 => out.copy_from_slice(&value.to_ne_bytes()),
        }
    }
}

/// The two source coordinates a destination coordinate filters from
fn taps(coord: u32, source_len: u32, filtered: bool) -> [u32; 2] {
    if filtered {
        let first = (coord * 2).min(source_len - 1);
        [first, (first + 1).min(source_len - 1)]
    } else {
        [coord, coord]
    }
}

/// 2x2x2 box filter from one level to the next
///
/// Only the first `spatial_axes` grid axes shrink; the remaining ones hold
/// array slices and are copied through.
pub(crate) fn downsample(
    kind: FilterKind,
    bytes_per_pixel: u32,
    spatial_axes: u32,
    source: &[u8],
    source_grid: UVec3,
    target: &mut [u8],
    target_grid: UVec3,
) {
    let bpp = bytes_per_pixel as usize;
    let channel = kind.channel_size();
    let channels = bpp / channel;
    let index = |grid: UVec3, x: u32, y: u32, z: u32| {
        ((z as usize * grid.y as usize + y as usize) * grid.x as usize + x as usize) * bpp
    };

    for z in 0..target_grid.z {
        let zs = taps(z, source_grid.z, spatial_axes >= 3);
        for y in 0..target_grid.y {
            let ys = taps(y, source_grid.y, spatial_axes >= 2);
            for x in 0..target_grid.x {
                let xs = taps(x, source_grid.x, spatial_axes >= 1);
                let out = index(target_grid, x, y, z);
                for c in 0..channels {
                    let mut sum = 0.0;
                    for &sz in &zs {
                        for &sy in &ys {
                            for &sx in &xs {
                                let at = index(source_grid, sx, sy, sz) + c * channel;
                                sum += kind.read(&source[at..at + channel]);
                            }
                        }
                    }
                    let at = out + c * channel;
                    kind.write(sum / 8.0, &mut target[at..at + channel]);
                }
            }
        }
    }
}

// ===== BUFFER =====

/// Buffer stored as one byte vector
pub struct SoftwareBuffer {
    size: u64,
    bind_flags: D3D11BindFlags,
    misc_flags: D3D11MiscFlags,
    cpu_access: D3D11CpuAccessFlags,
    usage: D3D11Usage,
    data: Storage<Vec<u8>>,
}

impl SoftwareBuffer {
    pub(crate) fn new(desc: &NormalizedBufferDesc, initial_data: Option<&[u8]>) -> Result<Self> {
        let mut data = allocate(desc.size)?;
        if let Some(initial) = initial_data {
            data[..initial.len()].copy_from_slice(initial);
        }

        Ok(Self {
            size: desc.size,
            bind_flags: D3D11FlagTables::buffer_bind_flags(desc.bind_flags),
            misc_flags: D3D11FlagTables::buffer_misc_flags(&desc.to_desc()),
            cpu_access: D3D11FlagTables::cpu_access_flags(desc.cpu_access),
            usage: D3D11FlagTables::usage(desc.usage),
            data: Arc::new(Mutex::new(data)),
        })
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn bind_flags(&self) -> D3D11BindFlags {
        self.bind_flags
    }

    pub fn misc_flags(&self) -> D3D11MiscFlags {
        self.misc_flags
    }

    pub fn cpu_access(&self) -> D3D11CpuAccessFlags {
        self.cpu_access
    }

    pub fn usage(&self) -> D3D11Usage {
        self.usage
    }

    pub(crate) fn storage(&self) -> Storage<Vec<u8>> {
        Arc::clone(&self.data)
    }

    pub(crate) fn read_range(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let data = lock(&self.data);
        let start = offset as usize;
        match start.checked_add(len as usize).and_then(|end| data.get(start..end)) {
            Some(bytes) => Ok(bytes.to_vec()),
            None => hal_bail!(BackendError, SOURCE, "read of {} bytes at {} out of range", len, offset),
        }
    }
}

// ===== SHADER & PIPELINE =====

/// Shader binary kept as is
#[derive(Debug, Clone)]
pub struct SoftwareShader {
    pub stage: ShaderStage,
    pub entry_point: String,
    pub code: Vec<u8>,
}

/// Pipeline as the list of its stages
#[derive(Debug, Clone)]
pub struct SoftwarePipeline {
    pub stages: Vec<ShaderStage>,
    /// `None` for compute pipelines
    pub topology: Option<PrimitiveTopology>,
    pub sample_count: u32,
}

#[cfg(test)]
#[path = "resources_tests.rs"]
mod tests;
