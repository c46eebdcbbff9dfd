//! Window surface collaborator

use glam::UVec2;
use raw_window_handle::RawWindowHandle;

use super::descriptor::VideoModeDesc;
use crate::error::Result;

/// Creation parameters of a surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDesc {
    pub title: String,
    pub size: UVec2,
    pub borderless: bool,
    pub centered: bool,
}

impl From<&VideoModeDesc> for SurfaceDesc {
    /// Fullscreen modes get a borderless surface, windowed ones a centered one
    fn from(mode: &VideoModeDesc) -> Self {
        Self {
            title: String::new(),
            size: mode.resolution,
            borderless: mode.fullscreen,
            centered: !mode.fullscreen,
        }
    }
}

/// A presentable window provided by the windowing layer
pub trait Surface: Send {
    /// Parameters the surface was (re)created with
    fn desc(&self) -> SurfaceDesc;

    /// Client area size
    fn size(&self) -> UVec2;

    /// Destroy and rebuild the native window
    ///
    /// Some platforms fix the pixel format of a window once set; switching to
    /// a multisampled format needs a fresh window.
    fn recreate(&mut self, desc: &SurfaceDesc) -> Result<()>;

    /// Native drawable handle
    fn native_handle(&self) -> Result<RawWindowHandle>;
}
