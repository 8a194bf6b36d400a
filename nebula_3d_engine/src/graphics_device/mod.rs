/// Graphics device module - the backend-agnostic GPU seam
///
/// Everything the core needs from the GPU goes through the GraphicsDevice
/// trait and the opaque resource handles defined here. The descriptor layout
/// cache and pool-rotation allocator sit on top of the seam and are backend-free.

// Module declarations
pub mod graphics_device;
pub mod descriptor;
pub mod descriptor_allocator;
pub mod descriptor_layout_cache;
pub mod buffer;
pub mod pipeline;
pub mod command_list;
pub mod frame_context;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use descriptor::*;
pub use descriptor_allocator::*;
pub use descriptor_layout_cache::*;
pub use buffer::*;
pub use pipeline::*;
pub use command_list::*;
pub use frame_context::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
