//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and windows, gives each window an OpenGL
//! surface via `glutin`, and wires resize/redraw/close events to the
//! per-window layer lifecycle.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
