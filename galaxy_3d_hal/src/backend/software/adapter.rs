//! Software adapter
//!
//! Creates `SoftwareDevice`s up to a configurable feature level. The same
//! type stands in for a hardware adapter when negotiation is exercised
//! without a GPU.

use super::context_api::{SoftwareContextApi, SoftwareContextConfig};
use super::device::SoftwareDevice;
use crate::capability::{Adapter, AdapterInfo, AdapterKind, DisplayMode, FeatureLevel, Vendor, VideoOutput};
use crate::error::Result;
use crate::hal_warn_err;

const SOURCE: &str = "galaxy3d::hal::software";

/// PCI vendor id reported by the software rasterizer
const SOFTWARE_VENDOR_ID: u32 = 0x1414;

/// Adapter creating software devices
#[derive(Debug, Clone)]
pub struct SoftwareAdapter {
    name: String,
    kind: AdapterKind,
    max_level: Option<FeatureLevel>,
    context_config: Option<SoftwareContextConfig>,
    attempts: Vec<FeatureLevel>,
}

impl SoftwareAdapter {
    /// # Arguments
    ///
    /// * `kind` - Kind reported to the negotiator
    /// * `max_level` - Highest level accepted; `None` refuses every level
    pub fn new(kind: AdapterKind, max_level: Option<FeatureLevel>) -> Self {
        let name = match kind {
            AdapterKind::Hardware => "Galaxy3D Emulated GPU",
            AdapterKind::Software => "Galaxy3D Software Rasterizer",
        };
        Self {
            name: name.to_string(),
            kind,
            max_level,
            context_config: Some(SoftwareContextConfig::default()),
            attempts: Vec::new(),
        }
    }

    /// Software rasterizer accepting every level
    pub fn rasterizer() -> Self {
        Self::new(AdapterKind::Software, Some(FeatureLevel::Level12_1))
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Platform features of the devices' context API; `None` creates
    /// devices without window-integrated contexts
    pub fn with_context_config(mut self, config: Option<SoftwareContextConfig>) -> Self {
        self.context_config = config;
        self
    }

    /// Levels tried so far, in order
    pub fn attempts(&self) -> &[FeatureLevel] {
        &self.attempts
    }
}

impl Adapter for SoftwareAdapter {
    type Device = SoftwareDevice;

    fn info(&self) -> AdapterInfo {
        let modes = [(640, 480), (800, 600), (1024, 768), (1280, 720), (1920, 1080)]
            .iter()
            .map(|&(width, height)| DisplayMode { width, height, refresh_rate: 60 })
            .collect();
        AdapterInfo {
            name: self.name.clone(),
            vendor: match self.kind {
                AdapterKind::Software => Vendor::from_pci_id(SOFTWARE_VENDOR_ID),
                AdapterKind::Hardware => Vendor::Unknown(0),
            },
            kind: self.kind,
            video_memory: 0,
            outputs: vec![VideoOutput::from_modes(modes)],
        }
    }

    fn create_device(&mut self, level: FeatureLevel) -> Result<SoftwareDevice> {
        self.attempts.push(level);
        match self.max_level {
            Some(max) if level <= max => {
                let context_api = self.context_config.clone().map(SoftwareContextApi::new);
                SoftwareDevice::new(level, context_api)
            }
            _ => Err(hal_warn_err!(
                BackendError,
                SOURCE,
                "'{}' does not support feature level {}",
                self.name,
                level
            )),
        }
    }
}
