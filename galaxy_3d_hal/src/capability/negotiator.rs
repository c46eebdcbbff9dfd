//! Feature-level negotiation with hardware-then-software fallback

use super::adapter::{Adapter, AdapterInfo, AdapterKind};
use super::capability_table::CapabilityTable;
use super::feature_level::FeatureLevel;
use crate::error::{Error, Result};
use crate::{hal_debug, hal_err, hal_info, hal_warn};

const SOURCE: &str = "galaxy3d::hal::capability";

/// Device created by negotiation, with the level it runs at
pub struct NegotiatedDevice<D> {
    pub device: D,
    pub feature_level: FeatureLevel,
    pub adapter: AdapterInfo,
    pub caps: CapabilityTable,
}

/// Probes candidate feature levels, highest first, on a hardware adapter
/// and then on a software adapter
#[derive(Debug, Clone)]
pub struct CapabilityNegotiator {
    candidates: Vec<FeatureLevel>,
    allow_software_fallback: bool,
}

impl CapabilityNegotiator {
    /// Candidates are sorted highest first and de-duplicated
    pub fn new(candidates: &[FeatureLevel]) -> Self {
        let mut candidates = candidates.to_vec();
        candidates.sort_by(|a, b| b.cmp(a));
        candidates.dedup();
        Self { candidates, allow_software_fallback: true }
    }

    pub fn with_software_fallback(mut self, allow: bool) -> Self {
        self.allow_software_fallback = allow;
        self
    }

    pub fn candidates(&self) -> &[FeatureLevel] {
        &self.candidates
    }

    /// Create a device on the first adapter and level that accept it
    ///
    /// # Arguments
    ///
    /// * `hardware` - Adapter tried first, at every candidate level
    /// * `software` - Fallback adapter, tried only when the hardware adapter
    ///   refused every level and fallback is allowed
    ///
    /// # Errors
    ///
    /// `DeviceCreationFailed` when every level failed on every adapter.
    pub fn negotiate<D>(
        &self,
        hardware: &mut dyn Adapter<Device = D>,
        software: Option<&mut dyn Adapter<Device = D>>,
    ) -> Result<NegotiatedDevice<D>> {
        let mut last_error = match self.probe(hardware) {
            Ok(negotiated) => return Ok(negotiated),
            Err(err) => err,
        };

        match software {
            Some(software) if self.allow_software_fallback => {
                hal_warn!(
                    SOURCE,
                    "Hardware adapter '{}' refused every feature level, falling back to '{}'",
                    hardware.info().name,
                    software.info().name
                );
                match self.probe(software) {
                    Ok(negotiated) => return Ok(negotiated),
                    Err(err) => last_error = err,
                }
            }
            _ => {}
        }

        Err(hal_err!(
            DeviceCreationFailed,
            SOURCE,
            "no candidate feature level succeeded ({} tried, last error: {})",
            self.candidates.len(),
            last_error
        ))
    }

    fn probe<D>(&self, adapter: &mut dyn Adapter<Device = D>) -> Result<NegotiatedDevice<D>> {
        let info = adapter.info();
        let mut last_error = Error::DeviceCreationFailed("no candidate feature levels".to_string());

        for &level in &self.candidates {
            match adapter.create_device(level) {
                Ok(device) => {
                    hal_info!(
                        SOURCE,
                        "Created device on '{}' ({:?}) at feature level {}",
                        info.name,
                        info.kind,
                        level
                    );
                    if info.kind == AdapterKind::Software {
                        hal_warn!(SOURCE, "Rendering with a software adapter");
                    }
                    return Ok(NegotiatedDevice {
                        device,
                        feature_level: level,
                        caps: CapabilityTable::from_feature_level(level),
                        adapter: info,
                    });
                }
                Err(err) => {
                    hal_debug!(SOURCE, "'{}' refused feature level {}: {}", info.name, level, err);
                    last_error = err;
                }
            }
        }
        Err(last_error)
    }
}

impl Default for CapabilityNegotiator {
    fn default() -> Self {
        Self::new(&FeatureLevel::DESCENDING)
    }
}

#[cfg(test)]
#[path = "negotiator_tests.rs"]
mod tests;
