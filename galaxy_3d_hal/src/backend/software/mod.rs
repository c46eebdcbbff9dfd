/// Software module - CPU reference backend with a threaded GPU timeline

pub mod adapter;
pub mod queue;
pub mod fence;
pub mod resources;
pub mod context_api;
pub mod device;

pub use adapter::*;
pub use queue::SoftwareQueue;
pub use fence::*;
pub use resources::{SoftwareBuffer, SoftwarePipeline, SoftwareShader, SoftwareTexture};
pub use context_api::*;
pub use device::*;
