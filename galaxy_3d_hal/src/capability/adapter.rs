//! Video adapters probed during device bring-up

use crate::error::Result;

use super::feature_level::FeatureLevel;

/// Hardware GPU or software rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdapterKind {
    Hardware,
    Software,
}

/// GPU vendor, from the PCI vendor id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vendor {
    Nvidia,
    Amd,
    Intel,
    Microsoft,
    Unknown(u32),
}

impl Vendor {
    pub fn from_pci_id(id: u32) -> Self {
        match id {
            0x10DE => Vendor::Nvidia,
            0x1002 | 0x1022 => Vendor::Amd,
            0x8086 | 0x163C | 0x8087 => Vendor::Intel,
            0x1414 => Vendor::Microsoft,
            other => Vendor::Unknown(other),
        }
    }
}

/// One display mode of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DisplayMode {
    pub width: u32,
    pub height: u32,
    /// Hz, 0 when unknown
    pub refresh_rate: u32,
}

/// Monitor output attached to an adapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoOutput {
    pub display_modes: Vec<DisplayMode>,
}

impl VideoOutput {
    /// Sorted, duplicate-free list built from raw driver modes
    pub fn from_modes(mut modes: Vec<DisplayMode>) -> Self {
        modes.sort();
        modes.dedup();
        Self { display_modes: modes }
    }
}

/// Description of an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterInfo {
    pub name: String,
    pub vendor: Vendor,
    pub kind: AdapterKind,
    /// Dedicated video memory in bytes
    pub video_memory: u64,
    pub outputs: Vec<VideoOutput>,
}

/// Something that can create a device at a given feature level
pub trait Adapter {
    type Device;

    fn info(&self) -> AdapterInfo;

    /// Try to create a device at exactly `level`
    ///
    /// Failure is expected during negotiation; the negotiator moves on to
    /// the next candidate.
    fn create_device(&mut self, level: FeatureLevel) -> Result<Self::Device>;
}
