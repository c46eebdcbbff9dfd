//! Flag translation tables
//!
//! Pure, total mappings from backend-neutral descriptor flags to the flag
//! sets of one native API. Unknown or unset neutral bits never produce
//! native bits. Each native model implements [`NativeFlagTables`].

pub mod d3d11;

use crate::descriptor::{BindFlags, BufferDesc, CpuAccessFlags, MiscFlags, TextureDesc};
use crate::normalize::NormalizedTextureDesc;

/// Where a resource lives and how the CPU reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UsageMode {
    /// Device-local, no CPU access
    GpuOnly,
    /// CPU writes, GPU reads (upload heap / mapped for write)
    Dynamic,
    /// GPU writes, CPU reads (staging / read-back heap)
    ReadBack,
}

/// Usage for a buffer
///
/// CPU read wins over CPU write. Without CPU access, the dynamic-usage hint
/// selects `Dynamic` unless the buffer is bound for read/write storage.
pub fn buffer_usage_mode(desc: &BufferDesc) -> UsageMode {
    if let Some(mode) = cpu_access_usage(desc.cpu_access) {
        return mode;
    }
    if desc.misc_flags.contains(MiscFlags::DYNAMIC_USAGE)
        && !desc.bind_flags.contains(BindFlags::RW_STORAGE_BUFFER)
    {
        return UsageMode::Dynamic;
    }
    UsageMode::GpuOnly
}

/// Usage for a texture (only CPU access matters)
pub fn texture_usage_mode(desc: &TextureDesc) -> UsageMode {
    cpu_access_usage(desc.cpu_access).unwrap_or(UsageMode::GpuOnly)
}

fn cpu_access_usage(access: CpuAccessFlags) -> Option<UsageMode> {
    if access.contains(CpuAccessFlags::READ) {
        Some(UsageMode::ReadBack)
    } else if access.contains(CpuAccessFlags::WRITE) {
        Some(UsageMode::Dynamic)
    } else {
        None
    }
}

/// CPU access actually granted once the usage mode is known
///
/// Dynamic resources are always CPU-writable, even when the write access was
/// only implied by the dynamic-usage hint.
pub fn effective_cpu_access(requested: CpuAccessFlags, usage: UsageMode) -> CpuAccessFlags {
    match usage {
        UsageMode::GpuOnly => CpuAccessFlags::empty(),
        UsageMode::Dynamic => requested | CpuAccessFlags::WRITE,
        UsageMode::ReadBack => requested,
    }
}

/// Flag mapping tables of one native graphics API
pub trait NativeFlagTables {
    type BufferBind: Copy + std::fmt::Debug;
    type TextureBind: Copy + std::fmt::Debug;
    type CpuAccess: Copy + std::fmt::Debug;
    type BufferMisc: Copy + std::fmt::Debug;
    type TextureMisc: Copy + std::fmt::Debug;
    type Usage: Copy + std::fmt::Debug;

    /// Human readable API name, used in logs
    const API_NAME: &'static str;

    /// One native bit per neutral buffer role
    fn buffer_bind_flags(flags: BindFlags) -> Self::BufferBind;

    /// Texture roles; depth-stencil excludes color, mip generation implies
    /// render-target, a mip chain implies shader sampling
    fn texture_bind_flags(desc: &NormalizedTextureDesc) -> Self::TextureBind;

    fn cpu_access_flags(access: CpuAccessFlags) -> Self::CpuAccess;

    fn buffer_misc_flags(desc: &BufferDesc) -> Self::BufferMisc;

    fn texture_misc_flags(desc: &NormalizedTextureDesc) -> Self::TextureMisc;

    fn usage(mode: UsageMode) -> Self::Usage;
}

#[cfg(test)]
#[path = "translate_tests.rs"]
mod tests;
