//! Backend-neutral flag sets carried by resource descriptors

use bitflags::bitflags;

bitflags! {
    /// Pipeline roles a resource may be bound to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BindFlags: u32 {
        const VERTEX_BUFFER            = 1 << 0;
        const INDEX_BUFFER             = 1 << 1;
        const CONSTANT_BUFFER          = 1 << 2;
        const STREAM_OUTPUT_BUFFER     = 1 << 3;
        const INDIRECT_BUFFER          = 1 << 4;
        const SAMPLE_BUFFER            = 1 << 5;
        const RW_STORAGE_BUFFER        = 1 << 6;
        const COLOR_ATTACHMENT         = 1 << 7;
        const DEPTH_STENCIL_ATTACHMENT = 1 << 8;
    }
}

bitflags! {
    /// CPU access requested for a resource
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CpuAccessFlags: u32 {
        const READ  = 1 << 0;
        const WRITE = 1 << 1;
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

bitflags! {
    /// Miscellaneous creation hints
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MiscFlags: u32 {
        /// Resource is updated frequently by the CPU
        const DYNAMIC_USAGE = 1 << 0;
    }
}
