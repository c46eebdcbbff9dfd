/// Registry module - ownership of native objects behind opaque handles

pub mod handle;
pub mod registry;

pub use handle::*;
pub use registry::Registry;
