/*!
# Nebula 3D Engine

Core traits and types for the Nebula 3D rendering engine.

This crate provides the platform-agnostic rendering core: a scene graph with
a component model, descriptor set management (layout cache + pool-rotation
allocator), YAML scene persistence, and the `GraphicsDevice` seam that
backend implementations (Vulkan today) plug into via trait-based dynamic
polymorphism.

## Architecture

- **GraphicsDevice**: backend seam for GPU objects (descriptors, buffers,
  command lists)
- **DescriptorLayoutCache / DescriptorAllocator**: descriptor set layout
  deduplication and pool-rotation set allocation
- **Scene / SceneObject / Component**: ordered scene graph with Transform
  and Mesh components
- **SceneSerializer**: YAML scene persistence
- **Engine**: process-wide context (graphics device registry, logging)

Backend implementations provide concrete types that implement the
`graphics_device` traits.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod camera;
pub mod graphics_device;
pub mod scene;

// Main nebula3d namespace module
pub mod nebula3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
        // Note: engine_* macros are NOT re-exported here - they are internal only
    }

    // GPU sub-module with the device seam and descriptor management
    pub mod gpu {
        pub use crate::graphics_device::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }
}

// Re-export math library at crate root
pub use glam;
