/// Sync module - CPU/GPU synchronization

pub mod fence;

pub use fence::*;
