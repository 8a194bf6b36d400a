//! Camera module
//!
//! The engine does NOT store or manage cameras - the application owns one
//! and feeds its view-projection into the frame context.

mod camera;

pub use camera::Camera;
