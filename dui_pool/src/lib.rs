/*!
# DUI Pool

Fixed-capacity pool of browser-backed textures ("DUI" surfaces) for a host
3D engine.

A host creates on-screen browser overlays through a `PoolContext`. Each
surface takes one slot of a bounded pool; the slot index and its version
give the texture a name that is never reused for a different surface, so
the graphics layer cannot serve a stale cached texture. Surfaces are torn
down deterministically, either one by one or all at once when the owning
session ends.

## Architecture

- **SlotPool**: bounded slot arena with per-slot versions
- **PoolContext**: owns the pool, the native backend and the live registry
- **Dui**: one live surface bound to one slot
- **SurfaceBackend**: native collaborator trait (surfaces, textures)
- **Logger**: pluggable logging, injected into debug surfaces
*/

// Internal modules
mod error;
mod config;
mod context;
mod registry;
mod surface;
pub mod backend;
pub mod log;
pub mod pool;

#[cfg(test)]
mod mock_backend;

// Main dui namespace module
pub mod dui {
    // Error types
    pub use crate::error::{Error, Result};

    // Configuration
    pub use crate::config::{PoolConfig, DEFAULT_CAPACITY};

    // Pool context and surfaces
    pub use crate::context::PoolContext;
    pub use crate::surface::{Dui, DuiDesc};

    // Logging sub-module (types and logger slot, NOT macros)
    pub mod log {
        pub use crate::log::{
            Logger, LogEntry, LogSeverity, DefaultLogger,
            set_logger, reset_logger, current_logger,
        };
    }

    // Slot pool sub-module
    pub mod pool {
        pub use crate::pool::*;
    }

    // Native backend sub-module
    pub mod backend {
        pub use crate::backend::*;
    }
}
