/// Capability module - feature-level negotiation and device capabilities

pub mod feature_level;
pub mod capability_table;
pub mod adapter;
pub mod negotiator;

pub use feature_level::*;
pub use capability_table::*;
pub use adapter::*;
pub use negotiator::*;
