use winit::window::{Window, WindowId};

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Returns the drawable size as `(width, height)` in logical units.
    pub fn logical_size(&self) -> (u32, u32) {
        let phys = self.window.inner_size();
        let logical: winit::dpi::LogicalSize<f64> = phys.to_logical(self.window.scale_factor());
        (logical.width.round() as u32, logical.height.round() as u32)
    }

    /// Device pixel ratio of the window's current monitor.
    pub fn scale_factor(&self) -> f64 {
        self.window.scale_factor()
    }
}
