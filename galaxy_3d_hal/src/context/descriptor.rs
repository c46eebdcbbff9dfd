//! Render context descriptor

use glam::UVec2;

/// Video mode of the surface a context presents to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoModeDesc {
    pub resolution: UVec2,
    /// Color bits per pixel
    pub color_depth: u32,
    pub fullscreen: bool,
}

impl Default for VideoModeDesc {
    fn default() -> Self {
        Self { resolution: UVec2::new(800, 600), color_depth: 32, fullscreen: false }
    }
}

/// Multi-sample anti-aliasing request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiSamplingDesc {
    pub enabled: bool,
    /// Requested sample count; negotiation may lower it
    pub samples: u32,
}

impl Default for MultiSamplingDesc {
    fn default() -> Self {
        Self { enabled: false, samples: 1 }
    }
}

impl MultiSamplingDesc {
    pub fn new(samples: u32) -> Self {
        Self { enabled: samples > 1, samples }
    }
}

/// Version requested for an extended profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// Newest version known to the HAL (4.5)
    Latest,
    /// Version number as `major * 100 + minor * 10` (e.g. 330, 450)
    Number(u32),
}

impl ApiVersion {
    /// (major, minor)
    pub fn major_minor(self) -> (u32, u32) {
        match self {
            ApiVersion::Latest => (4, 5),
            ApiVersion::Number(v) => (v / 100, (v % 100) / 10),
        }
    }
}

/// Extended (versioned) profile request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileDesc {
    /// Create the context through the profile-selection extension
    pub extended: bool,
    /// Core profile (otherwise compatibility)
    pub core: bool,
    pub version: ApiVersion,
}

impl Default for ProfileDesc {
    fn default() -> Self {
        Self { extended: false, core: false, version: ApiVersion::Latest }
    }
}

/// Vertical synchronization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VsyncDesc {
    pub enabled: bool,
    /// Hz
    pub refresh_rate: u32,
    /// Swap interval used while enabled
    pub interval: u32,
}

impl Default for VsyncDesc {
    fn default() -> Self {
        Self { enabled: false, refresh_rate: 60, interval: 1 }
    }
}

impl VsyncDesc {
    /// Swap interval handed to the platform (0 when disabled)
    pub fn swap_interval(&self) -> u32 {
        if self.enabled {
            self.interval
        } else {
            0
        }
    }
}

/// Everything needed to negotiate a render context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextDescriptor {
    pub video_mode: VideoModeDesc,
    pub multi_sampling: MultiSamplingDesc,
    pub profile: ProfileDesc,
    pub vsync: VsyncDesc,
    /// Create a distinct hardware context even when a shared one could be
    /// reused; objects are then shared explicitly
    pub dedicated_hardware_context: bool,
}
