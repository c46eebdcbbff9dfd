/// Descriptor module - backend-neutral resource descriptions

pub mod flags;
pub mod texture;
pub mod buffer;
pub mod shader;
pub mod pipeline;
pub mod region;

pub use flags::*;
pub use texture::*;
pub use buffer::*;
pub use shader::*;
pub use pipeline::*;
pub use region::*;
