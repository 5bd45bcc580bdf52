//! Engine context + backend render-target management.
//!
//! This module is responsible for:
//! - owning Skia's GPU context (one per layer, long-lived)
//! - binding the window's drawable area to a backend render target and a
//!   drawing surface, per backend kind
//! - caching the currently valid (target, surface, canvas) triple

mod backend;
mod context;
mod gl;
#[cfg(all(target_os = "macos", feature = "metal"))]
mod metal;
mod software;
mod surface_state;

pub use backend::Backend;
pub use context::EngineContext;
pub use gl::GlBackend;
#[cfg(all(target_os = "macos", feature = "metal"))]
pub use metal::MetalBackend;
pub use software::SoftwareBackend;
pub use surface_state::{BoundSurface, SurfaceState};
