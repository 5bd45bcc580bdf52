//! Nacre engine crate.
//!
//! Binds the Skia rendering engine to host windows: backend render-target
//! construction, the per-frame surface/canvas lifecycle, and a winit-based
//! runtime that drives it. Rasterization, text shaping and GPU command
//! submission are Skia's job; this crate only calls it correctly.

pub mod core;
pub mod device;
pub mod layer;
pub mod native;
pub mod window;

pub mod logging;

// Applications draw through Skia types (Canvas, Paint, Font, ...);
// re-exported so they stay on the exact version the engine was built with.
pub use skia_safe;
