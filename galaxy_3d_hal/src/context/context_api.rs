//! Platform context interface of window-integrated backends

use raw_window_handle::RawWindowHandle;

use super::descriptor::ProfileDesc;
use super::surface::{Surface, SurfaceDesc};
use crate::error::Result;

/// Platform pixel format index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormatId(pub u32);

/// Platform hardware context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeContextId(pub u64);

/// Low-level context calls the negotiator drives
///
/// Every call may fail; whether a failure is fatal is decided by the
/// negotiator, not by the implementation.
pub trait ContextApi: Send {
    /// Create a surface when the caller did not supply one
    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<Box<dyn Surface>>;

    /// Attach to the drawable of a (re)created surface
    fn bind_drawable(&mut self, handle: RawWindowHandle) -> Result<()>;

    /// Closest standard format for `color_depth`
    fn choose_standard_format(&mut self, color_depth: u32) -> Result<PixelFormatId>;

    /// Apply a format to the bound drawable
    fn set_pixel_format(&mut self, format: PixelFormatId) -> Result<()>;

    /// Baseline context; needed before any extension can be loaded
    fn create_standard_context(&mut self) -> Result<NativeContextId>;

    /// Load the multisample format query extension
    fn load_multisample_extension(&mut self) -> Result<()>;

    /// Formats offering exactly `samples` samples; empty when unsupported
    fn choose_multisample_formats(&mut self, color_depth: u32, samples: u32) -> Result<Vec<PixelFormatId>>;

    fn set_multisample_enabled(&mut self, enabled: bool) -> Result<()>;

    /// Load the profile-selection extension
    fn load_profile_extension(&mut self) -> Result<()>;

    /// Versioned context, sharing objects with `share_with` at creation
    fn create_extended_context(
        &mut self,
        profile: &ProfileDesc,
        share_with: Option<NativeContextId>,
    ) -> Result<NativeContextId>;

    /// Make `context` current on the bound drawable, or detach with `None`
    fn make_current(&mut self, context: Option<NativeContextId>) -> Result<()>;

    fn delete_context(&mut self, context: NativeContextId) -> Result<()>;

    /// Share objects of `source` with `target`
    fn share_lists(&mut self, source: NativeContextId, target: NativeContextId) -> Result<()>;

    fn set_swap_interval(&mut self, interval: u32) -> Result<()>;
}
