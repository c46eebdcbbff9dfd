/// Context module - render context negotiation for window-integrated backends

pub mod descriptor;
pub mod surface;
pub mod context_api;
pub mod state;
pub mod negotiator;

pub use descriptor::*;
pub use surface::*;
pub use context_api::*;
pub use state::*;
pub use negotiator::*;
