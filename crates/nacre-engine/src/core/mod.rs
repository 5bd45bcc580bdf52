//! Application-facing contracts.
//!
//! `Renderer` is the per-layer drawing contract; `App` is what the window
//! runtime drives. Both are implemented by higher layers.

mod app;
mod ctx;
mod renderer;

pub use app::{App, AppControl};
pub use ctx::WindowCtx;
pub use renderer::Renderer;
