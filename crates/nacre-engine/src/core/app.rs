use winit::event::WindowEvent;

use crate::window::RuntimeCtx;

use super::ctx::WindowCtx;
use super::renderer::Renderer;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// The runtime creates one layer per window; `create_renderer` supplies
/// the callbacks that layer will drive. Input plumbing stays with the
/// host: raw window events are forwarded as-is.
pub trait App {
    /// Called once per window, before its first frame.
    fn create_renderer(&mut self, window: &WindowCtx<'_>) -> Box<dyn Renderer>;

    /// Called for window events.
    fn on_window_event(
        &mut self,
        runtime: &mut RuntimeCtx,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
    ) -> AppControl {
        let _ = (runtime, window, event);
        AppControl::Continue
    }
}
