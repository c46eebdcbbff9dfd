//! Buffer descriptor

use super::flags::{BindFlags, CpuAccessFlags, MiscFlags};

/// Storage layout of a buffer bound for sampling or read/write access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageBufferType {
    /// Not a storage buffer
    Undefined,
    /// Elements are read through a typed view
    Typed,
    Structured,
    ByteAddress,
    RWTyped,
    RWStructured,
    RWByteAddress,
    AppendStructured,
    ConsumeStructured,
}

impl StorageBufferType {
    /// Buffers addressed as an array of `stride`-sized structures
    pub fn is_structured(self) -> bool {
        matches!(
            self,
            StorageBufferType::Structured
                | StorageBufferType::RWStructured
                | StorageBufferType::AppendStructured
                | StorageBufferType::ConsumeStructured
        )
    }

    /// Buffers addressed with raw 32-bit word offsets
    pub fn is_byte_address(self) -> bool {
        matches!(self, StorageBufferType::ByteAddress | StorageBufferType::RWByteAddress)
    }
}

/// Descriptor for creating a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferDesc {
    /// Size in bytes
    pub size: u64,
    /// Element stride in bytes (structured buffers, vertex buffers)
    pub stride: u32,
    pub storage_type: StorageBufferType,
    pub bind_flags: BindFlags,
    pub cpu_access: CpuAccessFlags,
    pub misc_flags: MiscFlags,
}

impl Default for BufferDesc {
    fn default() -> Self {
        Self {
            size: 0,
            stride: 0,
            storage_type: StorageBufferType::Undefined,
            bind_flags: BindFlags::empty(),
            cpu_access: CpuAccessFlags::empty(),
            misc_flags: MiscFlags::empty(),
        }
    }
}

impl BufferDesc {
    /// Vertex buffer of `size` bytes with `stride`-byte vertices
    pub fn vertex(size: u64, stride: u32) -> Self {
        Self { size, stride, bind_flags: BindFlags::VERTEX_BUFFER, ..Default::default() }
    }

    /// Constant buffer updated every frame by the CPU
    pub fn constant(size: u64) -> Self {
        Self {
            size,
            bind_flags: BindFlags::CONSTANT_BUFFER,
            cpu_access: CpuAccessFlags::WRITE,
            misc_flags: MiscFlags::DYNAMIC_USAGE,
            ..Default::default()
        }
    }

    /// Read/write structured buffer
    pub fn structured(element_count: u64, stride: u32) -> Self {
        Self {
            size: element_count * stride as u64,
            stride,
            storage_type: StorageBufferType::RWStructured,
            bind_flags: BindFlags::RW_STORAGE_BUFFER | BindFlags::SAMPLE_BUFFER,
            ..Default::default()
        }
    }

    /// CPU-readable staging buffer
    pub fn readback(size: u64) -> Self {
        Self { size, cpu_access: CpuAccessFlags::READ, ..Default::default() }
    }
}
