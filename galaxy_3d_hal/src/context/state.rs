//! Per-surface context state produced by negotiation

use std::fmt;

use glam::UVec2;

use super::context_api::{NativeContextId, PixelFormatId};
use super::descriptor::ContextDescriptor;

/// Negotiation phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NegotiationState {
    /// Choosing and applying a pixel format
    SelectingFormat,
    /// Baseline context created (or a shared one reused) and current
    StandardContextCreated,
    /// Looking for multisample formats, stepping the sample count down
    AntiAliasingProbe,
    /// Surface rebuilt with a multisample format, baseline context recreated
    Recreated,
    /// Creating a versioned context through the profile extension
    ExtendedProfileProbe,
    /// Extended context replaced the baseline one
    Upgraded,
    /// Context current, shared and configured
    Active,
}

/// Whether this context owns its hardware context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextOwnership {
    /// Created here, deleted on release
    Owned,
    /// Borrowed from the context passed for sharing, never deleted here
    Shared,
}

/// Non-fatal step-down recorded during negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    /// Fewer samples than requested
    SamplesReduced { requested: u32, granted: u32 },
    /// No sample count worked; anti-aliasing disabled
    AntiAliasingUnsupported,
    /// Multisample formats found, but no context could use them
    AntiAliasingContextFailed,
    /// Profile-selection extension missing; baseline context kept
    ExtendedProfileUnavailable,
    /// Versioned context creation failed; baseline context kept
    ExtendedProfileFailed,
    /// Platform refused the swap interval
    SwapIntervalRejected { interval: u32 },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::SamplesReduced { requested, granted } => write!(
                f,
                "reduced multi-samples for anti-aliasing from {} to {}",
                requested, granted
            ),
            Diagnostic::AntiAliasingUnsupported => {
                write!(f, "multi-sample anti-aliasing is not supported")
            }
            Diagnostic::AntiAliasingContextFailed => {
                write!(f, "failed to create multi-sample anti-aliasing context")
            }
            Diagnostic::ExtendedProfileUnavailable => write!(f, "failed to select extended profile"),
            Diagnostic::ExtendedProfileFailed => write!(f, "failed to create extended profile"),
            Diagnostic::SwapIntervalRejected { interval } => {
                write!(f, "swap interval {} rejected", interval)
            }
        }
    }
}

/// Result of context negotiation for one surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextState {
    pub phase: NegotiationState,
    pub pixel_format: Option<PixelFormatId>,
    /// Multisample formats found by the probe, best first
    pub multisample_formats: Vec<PixelFormatId>,
    pub anti_aliasing: bool,
    pub samples: u32,
    pub extended_profile: bool,
    pub ownership: ContextOwnership,
    pub native_context: Option<NativeContextId>,
    /// Swap interval finally requested from the platform
    pub swap_interval: u32,
    /// Resolution of the surface the context presents to
    pub resolution: UVec2,
    pub diagnostics: Vec<Diagnostic>,
}

impl ContextState {
    /// Initial state: everything the descriptor asks for, nothing granted yet
    pub fn requested(desc: &ContextDescriptor) -> Self {
        let anti_aliasing = desc.multi_sampling.enabled && desc.multi_sampling.samples > 0;
        Self {
            phase: NegotiationState::SelectingFormat,
            pixel_format: None,
            multisample_formats: Vec::new(),
            anti_aliasing,
            samples: if anti_aliasing { desc.multi_sampling.samples } else { 0 },
            extended_profile: desc.profile.extended,
            ownership: ContextOwnership::Owned,
            native_context: None,
            swap_interval: 0,
            resolution: desc.video_mode.resolution,
            diagnostics: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == NegotiationState::Active
    }

    pub fn owns_hardware_context(&self) -> bool {
        self.ownership == ContextOwnership::Owned
    }
}
