/// Device module - backend trait, configuration and the render system

pub mod backend;
pub mod config;
pub mod render_system;

pub use backend::*;
pub use config::*;
pub use render_system::*;
