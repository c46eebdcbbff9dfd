//! Render context negotiation
//!
//! Runs a state machine over [`NegotiationState`]. Entering a state runs its
//! step; the outcome of the step and the current [`ContextState`] select the
//! next state through [`transition`]. Format selection, baseline context
//! creation, activation and sharing are fatal on failure. Anti-aliasing,
//! the extended profile and the swap interval degrade with a diagnostic.

use super::context_api::{ContextApi, NativeContextId, PixelFormatId};
use super::descriptor::ContextDescriptor;
use super::state::{ContextOwnership, ContextState, Diagnostic, NegotiationState};
use super::surface::Surface;
use crate::error::{Error, Result};
use crate::{hal_debug, hal_err, hal_info, hal_warn};

const SOURCE: &str = "galaxy3d::hal::context";

/// Maximum number of multisample formats kept from a probe
pub const MAX_MULTISAMPLE_FORMATS: usize = 8;

/// Outcome of the step run when entering a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    Failed,
}

/// Next negotiation state
///
/// Fatal steps never reach this function with `Failed`: their error ends
/// negotiation. `Active` is terminal.
pub fn transition(
    state: NegotiationState,
    outcome: StepOutcome,
    context: &ContextState,
) -> NegotiationState {
    use NegotiationState::*;

    let owned = context.ownership == ContextOwnership::Owned;
    let profile_or_active = if context.extended_profile && owned { ExtendedProfileProbe } else { Active };

    match (state, outcome) {
        (SelectingFormat, _) => StandardContextCreated,
        (StandardContextCreated, _) => {
            if context.anti_aliasing && owned {
                AntiAliasingProbe
            } else {
                profile_or_active
            }
        }
        (AntiAliasingProbe, StepOutcome::Succeeded) => Recreated,
        (AntiAliasingProbe, StepOutcome::Failed) => profile_or_active,
        (Recreated, _) => profile_or_active,
        (ExtendedProfileProbe, StepOutcome::Succeeded) => Upgraded,
        (ExtendedProfileProbe, StepOutcome::Failed) => Active,
        (Upgraded, _) | (Active, _) => Active,
    }
}

/// Negotiates one render context on one surface
///
/// # Example
///
/// ```no_run
/// # use galaxy_3d_hal::galaxy3d::context::*;
/// # fn demo(api: &mut dyn ContextApi, surface: &mut dyn Surface) -> galaxy_3d_hal::galaxy3d::Result<()> {
/// let mut desc = ContextDescriptor::default();
/// desc.multi_sampling = MultiSamplingDesc::new(8);
/// let state = ContextNegotiator::new(api, surface, &desc, None).run()?;
/// println!("{} samples", state.samples);
/// # Ok(())
/// # }
/// ```
pub struct ContextNegotiator<'a> {
    api: &'a mut dyn ContextApi,
    surface: &'a mut dyn Surface,
    desc: ContextDescriptor,
    shared: Option<&'a ContextState>,
    state: ContextState,
    /// Format inherited from the shared context, tried first
    inherited_format: Option<PixelFormatId>,
    /// Baseline context while it may still be replaced
    standard_context: Option<NativeContextId>,
}

impl<'a> ContextNegotiator<'a> {
    /// # Arguments
    ///
    /// * `api` - Platform context calls
    /// * `surface` - Surface to present to; may be recreated
    /// * `desc` - Requested configuration
    /// * `shared` - Previously negotiated context to share objects with
    pub fn new(
        api: &'a mut dyn ContextApi,
        surface: &'a mut dyn Surface,
        desc: &ContextDescriptor,
        shared: Option<&'a ContextState>,
    ) -> Self {
        let mut state = ContextState::requested(desc);
        state.resolution = surface.size();

        let mut inherited_format = None;
        if let Some(shared) = shared.filter(|_| state.anti_aliasing) {
            inherited_format = shared.pixel_format;
            state.multisample_formats = shared.multisample_formats.clone();
        }

        Self {
            api,
            surface,
            desc: *desc,
            shared,
            state,
            inherited_format,
            standard_context: None,
        }
    }

    /// Run negotiation to `Active`
    ///
    /// # Errors
    ///
    /// `ContextCreationFailed` when a fatal step fails. Hardware contexts
    /// created on the way are deleted before returning.
    pub fn run(mut self) -> Result<ContextState> {
        match self.drive() {
            Ok(()) => {
                hal_info!(
                    SOURCE,
                    "Render context active ({}x{}, {} samples, extended profile: {}, {:?})",
                    self.state.resolution.x,
                    self.state.resolution.y,
                    self.state.samples,
                    self.state.extended_profile,
                    self.state.ownership
                );
                Ok(self.state)
            }
            Err(err) => {
                self.discard();
                Err(err)
            }
        }
    }

    fn drive(&mut self) -> Result<()> {
        self.bind_surface()?;

        let mut phase = NegotiationState::SelectingFormat;
        loop {
            self.state.phase = phase;
            hal_debug!(SOURCE, "Entering {:?}", phase);

            let outcome = match phase {
                NegotiationState::SelectingFormat => {
                    self.select_pixel_format()?;
                    StepOutcome::Succeeded
                }
                NegotiationState::StandardContextCreated => {
                    let context = self
                        .create_baseline_context()
                        .ok_or_else(|| fatal("failed to create standard render context"))?;
                    self.standard_context = Some(context);
                    self.state.native_context = Some(context);
                    if self.state.ownership == ContextOwnership::Shared {
                        self.inherit_shared_features();
                    }
                    StepOutcome::Succeeded
                }
                NegotiationState::AntiAliasingProbe => self.probe_anti_aliasing(),
                NegotiationState::Recreated => self.recreate_with_multisampling()?,
                NegotiationState::ExtendedProfileProbe => self.probe_extended_profile(),
                NegotiationState::Upgraded => {
                    if let Some(standard) = self.standard_context.take() {
                        self.delete(standard);
                    }
                    StepOutcome::Succeeded
                }
                NegotiationState::Active => {
                    self.activate()?;
                    return Ok(());
                }
            };

            phase = transition(phase, outcome, &self.state);
        }
    }

    // ===== STEPS =====

    fn bind_surface(&mut self) -> Result<()> {
        let handle = self
            .surface
            .native_handle()
            .map_err(|e| fatal(&format!("surface has no native handle: {}", e)))?;
        self.api
            .bind_drawable(handle)
            .map_err(|e| fatal(&format!("failed to bind drawable: {}", e)))
    }

    fn select_pixel_format(&mut self) -> Result<()> {
        let want_anti_aliasing = self.state.anti_aliasing && !self.state.multisample_formats.is_empty();

        let mut candidates: Vec<PixelFormatId> = Vec::new();
        candidates.extend(self.inherited_format.take());
        if want_anti_aliasing {
            for format in self.state.multisample_formats.iter().take(MAX_MULTISAMPLE_FORMATS) {
                if !candidates.contains(format) {
                    candidates.push(*format);
                }
            }
        }

        for format in candidates {
            if self.api.set_pixel_format(format).is_ok() {
                self.state.pixel_format = Some(format);
                return Ok(());
            }
            hal_debug!(SOURCE, "Pixel format {:?} refused", format);
        }

        if want_anti_aliasing {
            self.diagnose(Diagnostic::AntiAliasingUnsupported);
            self.disable_anti_aliasing();
        }

        let standard = self
            .api
            .choose_standard_format(self.desc.video_mode.color_depth)
            .map_err(|e| fatal(&format!("failed to select pixel format: {}", e)))?;
        self.api
            .set_pixel_format(standard)
            .map_err(|e| fatal(&format!("failed to set pixel format: {}", e)))?;
        self.state.pixel_format = Some(standard);
        Ok(())
    }

    /// Reuse the shared hardware context if there is one, else create one,
    /// then make it current
    fn create_baseline_context(&mut self) -> Option<NativeContextId> {
        let reusable = self
            .shared
            .and_then(|s| s.native_context)
            .filter(|_| !self.desc.dedicated_hardware_context);
        let context = match reusable {
            Some(shared) => {
                self.state.ownership = ContextOwnership::Shared;
                shared
            }
            None => {
                self.state.ownership = ContextOwnership::Owned;
                match self.api.create_standard_context() {
                    Ok(context) => context,
                    Err(e) => {
                        hal_warn!(SOURCE, "Standard context creation failed: {}", e);
                        return None;
                    }
                }
            }
        };

        if let Err(e) = self.api.make_current(Some(context)) {
            hal_warn!(SOURCE, "Failed to activate render context: {}", e);
            if self.state.ownership == ContextOwnership::Owned {
                self.delete(context);
            }
            return None;
        }
        Some(context)
    }

    /// A borrowed hardware context keeps what was negotiated for it: the
    /// request is granted only as far as the shared context already has it
    fn inherit_shared_features(&mut self) {
        let shared = match self.shared {
            Some(shared) => shared,
            None => return,
        };
        let wanted_anti_aliasing = self.state.anti_aliasing;
        let requested_samples = self.state.samples;
        let wanted_extended = self.state.extended_profile;

        let multisampled = shared.anti_aliasing
            && self.state.pixel_format.is_some_and(|format| {
                shared.pixel_format == Some(format) || shared.multisample_formats.contains(&format)
            });
        if multisampled {
            self.state.anti_aliasing = true;
            self.state.samples = shared.samples;
            self.state.multisample_formats = shared.multisample_formats.clone();
        } else {
            self.disable_anti_aliasing();
        }
        self.state.extended_profile = shared.extended_profile;

        if wanted_anti_aliasing && !multisampled {
            self.diagnose(Diagnostic::AntiAliasingUnsupported);
        } else if wanted_anti_aliasing && shared.samples < requested_samples {
            self.diagnose(Diagnostic::SamplesReduced { requested: requested_samples, granted: shared.samples });
        }
        if wanted_extended && !shared.extended_profile {
            self.diagnose(Diagnostic::ExtendedProfileUnavailable);
        }
    }

    fn probe_anti_aliasing(&mut self) -> StepOutcome {
        if let Err(e) = self.api.load_multisample_extension() {
            hal_debug!(SOURCE, "Multisample extension unavailable: {}", e);
            self.diagnose(Diagnostic::AntiAliasingUnsupported);
            self.disable_anti_aliasing();
            return StepOutcome::Failed;
        }

        let requested = self.state.samples;
        let color_depth = self.desc.video_mode.color_depth;
        let mut samples = requested;
        let mut formats = Vec::new();
        while samples > 0 {
            match self.api.choose_multisample_formats(color_depth, samples) {
                Ok(found) if !found.is_empty() => {
                    formats = found;
                    break;
                }
                _ => samples -= 1,
            }
        }

        if formats.is_empty() {
            self.diagnose(Diagnostic::AntiAliasingUnsupported);
            self.disable_anti_aliasing();
            return StepOutcome::Failed;
        }

        formats.truncate(MAX_MULTISAMPLE_FORMATS);
        if samples < requested {
            self.diagnose(Diagnostic::SamplesReduced { requested, granted: samples });
        }
        self.state.samples = samples;
        self.state.multisample_formats = formats;

        if let Err(e) = self.api.set_multisample_enabled(true) {
            hal_warn!(SOURCE, "Failed to enable multisampling: {}", e);
        }
        StepOutcome::Succeeded
    }

    /// The drawable's format is fixed once set: rebuild the surface, pick a
    /// multisample format, and create a new baseline context on it
    fn recreate_with_multisampling(&mut self) -> Result<StepOutcome> {
        if let Some(standard) = self.standard_context.take() {
            self.delete(standard);
        }
        self.state.native_context = None;

        let surface_desc = self.surface.desc();
        self.surface
            .recreate(&surface_desc)
            .map_err(|e| fatal(&format!("failed to recreate surface: {}", e)))?;
        self.bind_surface()?;
        self.select_pixel_format()?;

        match self.create_baseline_context() {
            Some(context) => {
                self.standard_context = Some(context);
                self.state.native_context = Some(context);
                Ok(StepOutcome::Succeeded)
            }
            None => {
                self.diagnose(Diagnostic::AntiAliasingContextFailed);
                Ok(StepOutcome::Failed)
            }
        }
    }

    fn probe_extended_profile(&mut self) -> StepOutcome {
        if let Err(e) = self.api.load_profile_extension() {
            hal_debug!(SOURCE, "Profile extension unavailable: {}", e);
            self.diagnose(Diagnostic::ExtendedProfileUnavailable);
            self.state.extended_profile = false;
            return StepOutcome::Failed;
        }

        let share_with = self.shared.and_then(|s| s.native_context);
        let extended = match self.api.create_extended_context(&self.desc.profile, share_with) {
            Ok(context) => context,
            Err(e) => {
                let (major, minor) = self.desc.profile.version.major_minor();
                hal_debug!(SOURCE, "Extended profile {}.{} refused: {}", major, minor, e);
                self.diagnose(Diagnostic::ExtendedProfileFailed);
                self.state.extended_profile = false;
                return StepOutcome::Failed;
            }
        };

        if let Err(e) = self.api.make_current(Some(extended)) {
            hal_debug!(SOURCE, "Extended context cannot be made current: {}", e);
            self.delete(extended);
            self.diagnose(Diagnostic::ExtendedProfileFailed);
            self.state.extended_profile = false;
            return StepOutcome::Failed;
        }

        self.state.native_context = Some(extended);
        StepOutcome::Succeeded
    }

    fn activate(&mut self) -> Result<()> {
        let context = match (self.state.native_context, self.state.diagnostics.last()) {
            (Some(context), _) => context,
            (None, Some(cause)) => return Err(fatal(&format!("failed to create render context: {}", cause))),
            (None, None) => return Err(fatal("failed to create render context")),
        };
        self.api
            .make_current(Some(context))
            .map_err(|e| fatal(&format!("failed to activate render context: {}", e)))?;

        let needs_sharing = self.state.ownership == ContextOwnership::Owned && !self.state.extended_profile;
        let source = self
            .shared
            .filter(|s| needs_sharing && !s.extended_profile)
            .and_then(|s| s.native_context);
        if let Some(source) = source {
            self.api
                .share_lists(source, context)
                .map_err(|e| fatal(&format!("failed to share resources from render context: {}", e)))?;
        }

        let interval = self.desc.vsync.swap_interval();
        if self.api.set_swap_interval(interval).is_err() {
            self.diagnose(Diagnostic::SwapIntervalRejected { interval });
        }
        self.state.swap_interval = interval;
        self.state.resolution = self.surface.size();
        self.standard_context = None;
        Ok(())
    }

    // ===== HELPERS =====

    fn diagnose(&mut self, diagnostic: Diagnostic) {
        hal_warn!(SOURCE, "{}", diagnostic);
        self.state.diagnostics.push(diagnostic);
    }

    fn disable_anti_aliasing(&mut self) {
        self.state.anti_aliasing = false;
        self.state.samples = 0;
        self.state.multisample_formats.clear();
    }

    fn delete(&mut self, context: NativeContextId) {
        if let Err(e) = self.api.delete_context(context) {
            hal_warn!(SOURCE, "Failed to delete render context {:?}: {}", context, e);
        }
    }

    /// Drop every hardware context created by a failed negotiation
    fn discard(&mut self) {
        if self.state.ownership != ContextOwnership::Owned {
            return;
        }
        let _ = self.api.make_current(None);
        let standard = self.standard_context.take();
        let current = self.state.native_context.take();
        if let Some(context) = standard {
            self.delete(context);
        }
        if let Some(context) = current.filter(|c| Some(*c) != standard) {
            self.delete(context);
        }
    }
}

/// Detach a released render context and delete its hardware context
///
/// Shared contexts borrow their hardware context: it is detached when
/// current but never deleted here.
pub fn release_context(api: &mut dyn ContextApi, state: &ContextState, is_current: bool) {
    if is_current {
        if let Err(e) = api.make_current(None) {
            hal_warn!(SOURCE, "Failed to deactivate render context: {}", e);
        }
    }
    if state.ownership != ContextOwnership::Owned {
        return;
    }
    if let Some(context) = state.native_context {
        if let Err(e) = api.delete_context(context) {
            hal_warn!(SOURCE, "Failed to delete render context {:?}: {}", context, e);
        }
    }
}

fn fatal(message: &str) -> Error {
    hal_err!(ContextCreationFailed, SOURCE, "{}", message)
}

#[cfg(test)]
#[path = "negotiator_tests.rs"]
mod tests;
