//! Software platform context API
//!
//! Emulates a windowing system with pixel formats that can be set once per
//! window, optional multisample and profile-selection extensions, and
//! explicit object sharing between contexts.

use std::sync::atomic::{AtomicU32, Ordering};

use glam::UVec2;
use raw_window_handle::{RawWindowHandle, WebWindowHandle};
use rustc_hash::FxHashMap;

use crate::context::{ContextApi, NativeContextId, PixelFormatId, ProfileDesc, Surface, SurfaceDesc};
use crate::error::Result;
use crate::hal_bail;

const SOURCE: &str = "galaxy3d::hal::software";

/// Platform refusal: expected while negotiating, logged at warn severity
macro_rules! refuse {
    ($($arg:tt)*) => {
        return Err($crate::hal_warn_err!(BackendError, SOURCE, $($arg)*))
    };
}

/// Window ids are unique per process
static NEXT_WINDOW: AtomicU32 = AtomicU32::new(1);

fn next_window_id() -> u32 {
    NEXT_WINDOW.fetch_add(1, Ordering::Relaxed)
}

// ===== SURFACE =====

/// Window of the software platform
#[derive(Debug)]
pub struct SoftwareSurface {
    desc: SurfaceDesc,
    window: u32,
}

impl SoftwareSurface {
    pub fn new(desc: SurfaceDesc) -> Self {
        Self { desc, window: next_window_id() }
    }

    /// Windowed surface of `width` x `height`
    pub fn windowed(title: &str, width: u32, height: u32) -> Self {
        Self::new(SurfaceDesc {
            title: title.to_string(),
            size: UVec2::new(width, height),
            borderless: false,
            centered: true,
        })
    }

    /// Window id, changes on every recreation
    pub fn window_id(&self) -> u32 {
        self.window
    }
}

impl Surface for SoftwareSurface {
    fn desc(&self) -> SurfaceDesc {
        self.desc.clone()
    }

    fn size(&self) -> UVec2 {
        self.desc.size
    }

    fn recreate(&mut self, desc: &SurfaceDesc) -> Result<()> {
        if desc.size.x == 0 || desc.size.y == 0 {
            hal_bail!(InvalidArgument, SOURCE, "surface size must be > 0, got {:?}", desc.size);
        }
        self.desc = desc.clone();
        self.window = next_window_id();
        Ok(())
    }

    fn native_handle(&self) -> Result<RawWindowHandle> {
        Ok(RawWindowHandle::Web(WebWindowHandle::new(self.window)))
    }
}

// ===== CONTEXT API =====

/// What the emulated platform supports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftwareContextConfig {
    /// Highest multisample count (power-of-two counts only); 0 disables
    pub max_samples: u32,
    pub multisample_extension: bool,
    pub profile_extension: bool,
    /// Highest (major, minor) an extended context can be created with
    pub max_profile_version: (u32, u32),
    /// Explicit object sharing between contexts
    pub share_lists: bool,
    /// Swap interval control
    pub swap_control: bool,
}

impl Default for SoftwareContextConfig {
    fn default() -> Self {
        Self {
            max_samples: 8,
            multisample_extension: true,
            profile_extension: true,
            max_profile_version: (4, 5),
            share_lists: true,
            swap_control: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ContextRecord {
    extended: bool,
}

/// Platform context calls of the software backend
#[derive(Debug)]
pub struct SoftwareContextApi {
    config: SoftwareContextConfig,
    next_context: u64,
    bound_window: Option<u32>,
    pixel_formats: FxHashMap<u32, PixelFormatId>,
    contexts: FxHashMap<NativeContextId, ContextRecord>,
    current: Option<NativeContextId>,
    multisample_loaded: bool,
    profile_loaded: bool,
    multisample_enabled: bool,
    swap_interval: Option<u32>,
    shared_lists: Vec<(NativeContextId, NativeContextId)>,
}

impl SoftwareContextApi {
    pub fn new(config: SoftwareContextConfig) -> Self {
        Self {
            config,
            next_context: 0,
            bound_window: None,
            pixel_formats: FxHashMap::default(),
            contexts: FxHashMap::default(),
            current: None,
            multisample_loaded: false,
            profile_loaded: false,
            multisample_enabled: false,
            swap_interval: None,
            shared_lists: Vec::new(),
        }
    }

    pub fn config(&self) -> &SoftwareContextConfig {
        &self.config
    }

    /// Number of hardware contexts alive
    pub fn live_contexts(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_extended(&self, context: NativeContextId) -> bool {
        self.contexts.get(&context).map_or(false, |record| record.extended)
    }

    pub fn current(&self) -> Option<NativeContextId> {
        self.current
    }

    /// Pixel format set on a window
    pub fn pixel_format_of(&self, window: u32) -> Option<PixelFormatId> {
        self.pixel_formats.get(&window).copied()
    }

    pub fn multisample_enabled(&self) -> bool {
        self.multisample_enabled
    }

    pub fn swap_interval(&self) -> Option<u32> {
        self.swap_interval
    }

    /// (source, target) pairs shared so far
    pub fn shared_lists(&self) -> &[(NativeContextId, NativeContextId)] {
        &self.shared_lists
    }

    fn bound_window(&self) -> Result<u32> {
        match self.bound_window {
            Some(window) => Ok(window),
            None => refuse!("no drawable bound"),
        }
    }

    fn require_context(&self, context: NativeContextId) -> Result<()> {
        if !self.contexts.contains_key(&context) {
            refuse!("{:?} does not exist", context);
        }
        Ok(())
    }

    fn new_context(&mut self, extended: bool) -> NativeContextId {
        self.next_context += 1;
        let context = NativeContextId(self.next_context);
        self.contexts.insert(context, ContextRecord { extended });
        context
    }

    /// Pixel format id of a multisample format
    pub fn multisample_format(samples: u32, variant: u32) -> PixelFormatId {
        PixelFormatId(0x1000 * (variant + 1) + samples)
    }
}

impl Default for SoftwareContextApi {
    fn default() -> Self {
        Self::new(SoftwareContextConfig::default())
    }
}

impl ContextApi for SoftwareContextApi {
    fn create_surface(&mut self, desc: &SurfaceDesc) -> Result<Box<dyn Surface>> {
        if desc.size.x == 0 || desc.size.y == 0 {
            hal_bail!(InvalidArgument, SOURCE, "surface size must be > 0, got {:?}", desc.size);
        }
        Ok(Box::new(SoftwareSurface::new(desc.clone())))
    }

    fn bind_drawable(&mut self, handle: RawWindowHandle) -> Result<()> {
        match handle {
            RawWindowHandle::Web(web) => {
                self.bound_window = Some(web.id);
                Ok(())
            }
            other => refuse!("cannot draw to {:?}", other),
        }
    }

    fn choose_standard_format(&mut self, color_depth: u32) -> Result<PixelFormatId> {
        let format = match color_depth {
            0..=16 => 16,
            17..=24 => 24,
            _ => 32,
        };
        Ok(PixelFormatId(format))
    }

    fn set_pixel_format(&mut self, format: PixelFormatId) -> Result<()> {
        let window = self.bound_window()?;
        if let Some(existing) = self.pixel_formats.get(&window) {
            refuse!(
                "window {} already has pixel format {:?}",
                window,
                existing
            );
        }
        self.pixel_formats.insert(window, format);
        Ok(())
    }

    fn create_standard_context(&mut self) -> Result<NativeContextId> {
        let window = self.bound_window()?;
        if !self.pixel_formats.contains_key(&window) {
            refuse!("window {} has no pixel format", window);
        }
        Ok(self.new_context(false))
    }

    fn load_multisample_extension(&mut self) -> Result<()> {
        if self.current.is_none() {
            refuse!("extensions load through a current context");
        }
        if !self.config.multisample_extension {
            refuse!("multisample extension not available");
        }
        self.multisample_loaded = true;
        Ok(())
    }

    fn choose_multisample_formats(&mut self, _color_depth: u32, samples: u32) -> Result<Vec<PixelFormatId>> {
        if !self.multisample_loaded {
            refuse!("multisample extension not loaded");
        }
        if samples > self.config.max_samples || !samples.is_power_of_two() {
            return Ok(Vec::new());
        }
        Ok(vec![Self::multisample_format(samples, 0), Self::multisample_format(samples, 1)])
    }

    fn set_multisample_enabled(&mut self, enabled: bool) -> Result<()> {
        self.multisample_enabled = enabled;
        Ok(())
    }

    fn load_profile_extension(&mut self) -> Result<()> {
        if self.current.is_none() {
            refuse!("extensions load through a current context");
        }
        if !self.config.profile_extension {
            refuse!("profile-selection extension not available");
        }
        self.profile_loaded = true;
        Ok(())
    }

    fn create_extended_context(
        &mut self,
        profile: &ProfileDesc,
        share_with: Option<NativeContextId>,
    ) -> Result<NativeContextId> {
        if !self.profile_loaded {
            refuse!("profile-selection extension not loaded");
        }
        let version = profile.version.major_minor();
        if version > self.config.max_profile_version {
            refuse!(
                "version {}.{} above {}.{}",
                version.0,
                version.1,
                self.config.max_profile_version.0,
                self.config.max_profile_version.1
            );
        }
        if let Some(shared) = share_with {
            self.require_context(shared)?;
        }
        Ok(self.new_context(true))
    }

    fn make_current(&mut self, context: Option<NativeContextId>) -> Result<()> {
        if let Some(context) = context {
            self.require_context(context)?;
            let window = self.bound_window()?;
            if !self.pixel_formats.contains_key(&window) {
                refuse!("window {} has no pixel format", window);
            }
        }
        self.current = context;
        Ok(())
    }

    fn delete_context(&mut self, context: NativeContextId) -> Result<()> {
        if self.contexts.remove(&context).is_none() {
            refuse!("{:?} does not exist", context);
        }
        if self.current == Some(context) {
            self.current = None;
        }
        Ok(())
    }

    fn share_lists(&mut self, source: NativeContextId, target: NativeContextId) -> Result<()> {
        self.require_context(source)?;
        self.require_context(target)?;
        if !self.config.share_lists {
            refuse!("object sharing not available");
        }
        self.shared_lists.push((source, target));
        Ok(())
    }

    fn set_swap_interval(&mut self, interval: u32) -> Result<()> {
        if !self.config.swap_control {
            refuse!("swap control not available");
        }
        self.swap_interval = Some(interval);
        Ok(())
    }
}

#[cfg(test)]
#[path = "context_api_tests.rs"]
mod tests;
