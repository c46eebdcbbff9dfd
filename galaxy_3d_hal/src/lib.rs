/*!
# Galaxy 3D HAL

Hardware abstraction layer of the Galaxy 3D rendering engine.

Turns backend-neutral resource descriptions into the native vocabulary of a
graphics API and brings devices and render contexts up with graceful
step-down when the hardware offers less than requested.

## Architecture

- **Descriptors**: neutral texture, buffer, shader and pipeline descriptions
- **Normalizer**: resolves layer counts, mip chains, usage and update regions
- **Flag tables**: pure mappings to native bind/access/misc/usage flags
- **Registry**: generational handles, one registry per resource kind
- **Capability negotiation**: feature-level probing with software fallback
- **Context negotiation**: pixel format, anti-aliasing and profile step-down
- **GPU fence**: monotonic timeline for CPU/GPU synchronization
- **RenderSystem**: ties a negotiated `Backend` to all of the above

A software backend runs everything on the CPU with a threaded GPU timeline.
*/

// Internal modules
mod error;
mod hal;
mod log;
mod descriptor;
mod translate;
mod normalize;
mod registry;
mod capability;
mod context;
mod sync;
mod device;
mod backend;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Logging hub
    pub use crate::hal::Hal;

    // Render system entry point
    pub use crate::device::{Backend, RenderSystem, RenderSystemConfig, RendererInfo};

    // Logging sub-module (types only, macros live at the crate root)
    pub mod log {
        pub use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};
    }

    /// Neutral resource descriptors
    pub mod descriptor {
        pub use crate::descriptor::*;
    }

    /// Native flag tables
    pub mod translate {
        pub use crate::translate::*;
    }

    /// Descriptor normalization
    pub mod normalize {
        pub use crate::normalize::*;
    }

    /// Handles and registries
    pub mod registry {
        pub use crate::registry::*;
    }

    /// Feature levels, capabilities and adapters
    pub mod capability {
        pub use crate::capability::*;
    }

    /// Render context negotiation
    pub mod context {
        pub use crate::context::*;
    }

    /// CPU/GPU synchronization
    pub mod sync {
        pub use crate::sync::*;
    }

    /// Backend trait and render system
    pub mod device {
        pub use crate::device::*;
    }

    /// Backends shipped with the HAL
    pub mod backend {
        pub use crate::backend::*;
    }
}

// Re-export math library at crate root
pub use glam;
