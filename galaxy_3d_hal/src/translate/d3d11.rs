//! Direct3D 11 flag model
//!
//! Bit values match `d3d11.h`. The software reference backend creates its
//! resources with these flags, so they also decide what the CPU may do with
//! them.

use bitflags::bitflags;

use super::{NativeFlagTables, UsageMode};
use crate::descriptor::{BindFlags, BufferDesc, CpuAccessFlags};
use crate::normalize::NormalizedTextureDesc;

bitflags! {
    /// `D3D11_BIND_FLAG`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct D3D11BindFlags: u32 {
        const VERTEX_BUFFER    = 0x1;
        const INDEX_BUFFER     = 0x2;
        const CONSTANT_BUFFER  = 0x4;
        const SHADER_RESOURCE  = 0x8;
        const STREAM_OUTPUT    = 0x10;
        const RENDER_TARGET    = 0x20;
        const DEPTH_STENCIL    = 0x40;
        const UNORDERED_ACCESS = 0x80;
    }
}

bitflags! {
    /// `D3D11_CPU_ACCESS_FLAG`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct D3D11CpuAccessFlags: u32 {
        const WRITE = 0x10000;
        const READ  = 0x20000;
    }
}

bitflags! {
    /// `D3D11_RESOURCE_MISC_FLAG` (subset)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct D3D11MiscFlags: u32 {
        const GENERATE_MIPS           = 0x1;
        const TEXTURECUBE             = 0x4;
        const DRAWINDIRECT_ARGS       = 0x10;
        const BUFFER_ALLOW_RAW_VIEWS  = 0x20;
        const BUFFER_STRUCTURED       = 0x40;
    }
}

/// `D3D11_USAGE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum D3D11Usage {
    Default = 0,
    Immutable = 1,
    Dynamic = 2,
    Staging = 3,
}

/// Direct3D 11 translation tables
///
/// D3D11 has no bind bit for indirect arguments: an indirect buffer is
/// marked with `DRAWINDIRECT_ARGS` in its misc flags instead.
pub struct D3D11FlagTables;

impl NativeFlagTables for D3D11FlagTables {
    type BufferBind = D3D11BindFlags;
    type TextureBind = D3D11BindFlags;
    type CpuAccess = D3D11CpuAccessFlags;
    type BufferMisc = D3D11MiscFlags;
    type TextureMisc = D3D11MiscFlags;
    type Usage = D3D11Usage;

    const API_NAME: &'static str = "Direct3D 11";

    fn buffer_bind_flags(flags: BindFlags) -> D3D11BindFlags {
        let mut native = D3D11BindFlags::empty();
        native.set(D3D11BindFlags::VERTEX_BUFFER, flags.contains(BindFlags::VERTEX_BUFFER));
        native.set(D3D11BindFlags::INDEX_BUFFER, flags.contains(BindFlags::INDEX_BUFFER));
        native.set(D3D11BindFlags::CONSTANT_BUFFER, flags.contains(BindFlags::CONSTANT_BUFFER));
        native.set(D3D11BindFlags::STREAM_OUTPUT, flags.contains(BindFlags::STREAM_OUTPUT_BUFFER));
        native.set(D3D11BindFlags::SHADER_RESOURCE, flags.contains(BindFlags::SAMPLE_BUFFER));
        native.set(D3D11BindFlags::UNORDERED_ACCESS, flags.contains(BindFlags::RW_STORAGE_BUFFER));
        native
    }

    fn texture_bind_flags(desc: &NormalizedTextureDesc) -> D3D11BindFlags {
        let mut native = D3D11BindFlags::empty();
        let mip_mapped = desc.is_mip_mapped();

        if desc.bind_flags.contains(BindFlags::DEPTH_STENCIL_ATTACHMENT) {
            native |= D3D11BindFlags::DEPTH_STENCIL;
        } else if desc.supports_mip_generation() || desc.bind_flags.contains(BindFlags::COLOR_ATTACHMENT) {
            native |= D3D11BindFlags::RENDER_TARGET;
        }
        if mip_mapped || desc.bind_flags.contains(BindFlags::SAMPLE_BUFFER) {
            native |= D3D11BindFlags::SHADER_RESOURCE;
        }
        if desc.bind_flags.contains(BindFlags::RW_STORAGE_BUFFER) {
            native |= D3D11BindFlags::UNORDERED_ACCESS;
        }
        native
    }

    fn cpu_access_flags(access: CpuAccessFlags) -> D3D11CpuAccessFlags {
        let mut native = D3D11CpuAccessFlags::empty();
        native.set(D3D11CpuAccessFlags::READ, access.contains(CpuAccessFlags::READ));
        native.set(D3D11CpuAccessFlags::WRITE, access.contains(CpuAccessFlags::WRITE));
        native
    }

    fn buffer_misc_flags(desc: &BufferDesc) -> D3D11MiscFlags {
        let mut native = D3D11MiscFlags::empty();
        if desc.bind_flags.contains(BindFlags::INDIRECT_BUFFER) {
            native |= D3D11MiscFlags::DRAWINDIRECT_ARGS;
        }
        if desc.bind_flags.intersects(BindFlags::SAMPLE_BUFFER | BindFlags::RW_STORAGE_BUFFER) {
            if desc.storage_type.is_structured() {
                native |= D3D11MiscFlags::BUFFER_STRUCTURED;
            } else if desc.storage_type.is_byte_address() {
                native |= D3D11MiscFlags::BUFFER_ALLOW_RAW_VIEWS;
            }
        }
        native
    }

    fn texture_misc_flags(desc: &NormalizedTextureDesc) -> D3D11MiscFlags {
        let mut native = D3D11MiscFlags::empty();
        if desc.supports_mip_generation() {
            native |= D3D11MiscFlags::GENERATE_MIPS;
        }
        if desc.texture_type.is_cube() {
            native |= D3D11MiscFlags::TEXTURECUBE;
        }
        native
    }

    fn usage(mode: UsageMode) -> D3D11Usage {
        match mode {
            UsageMode::GpuOnly => D3D11Usage::Default,
            UsageMode::Dynamic => D3D11Usage::Dynamic,
            UsageMode::ReadBack => D3D11Usage::Staging,
        }
    }
}
