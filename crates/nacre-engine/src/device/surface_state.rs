use skia_safe::gpu::BackendRenderTarget;
use skia_safe::{Canvas, Surface};

/// A fully bound drawing destination.
///
/// Field order is load-bearing: Skia requires the surface released before
/// its render target, and struct fields drop in declaration order.
pub struct BoundSurface {
    surface: Surface,
    render_target: Option<BackendRenderTarget>,
}

impl BoundSurface {
    pub(crate) fn gpu(surface: Surface, render_target: BackendRenderTarget) -> Self {
        Self {
            surface,
            render_target: Some(render_target),
        }
    }

    pub(crate) fn raster(surface: Surface) -> Self {
        Self {
            surface,
            render_target: None,
        }
    }

    /// The drawing interface, valid until the next invalidate.
    pub fn canvas(&mut self) -> &Canvas {
        self.surface.canvas()
    }

    /// Surface extent in physical pixels.
    pub fn physical_size(&self) -> (i32, i32) {
        (self.surface.width(), self.surface.height())
    }
}

/// The layer's surface cache: at any instant either empty or holding
/// exactly one valid triple. A partially constructed triple is never
/// representable.
pub enum SurfaceState {
    Empty,
    Bound(BoundSurface),
}

impl SurfaceState {
    /// Releases the current triple, if any, leaving the cache empty.
    ///
    /// Release order (surface, then target) is encoded in
    /// [`BoundSurface`]'s field order.
    pub fn invalidate(&mut self) {
        *self = SurfaceState::Empty;
    }

    /// The live canvas, or `None` if nothing is bound.
    pub fn canvas(&mut self) -> Option<&Canvas> {
        match self {
            SurfaceState::Bound(bound) => Some(bound.canvas()),
            SurfaceState::Empty => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, SurfaceState::Bound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skia_safe::surfaces;

    fn raster(w: i32, h: i32) -> BoundSurface {
        BoundSurface::raster(surfaces::raster_n32_premul((w, h)).expect("raster surface"))
    }

    #[test]
    fn bound_exposes_canvas_of_surface_extent() {
        let mut state = SurfaceState::Bound(raster(320, 200));
        let size = state.canvas().expect("canvas").base_layer_size();
        assert_eq!((size.width, size.height), (320, 200));
    }

    #[test]
    fn invalidate_leaves_cache_empty() {
        let mut state = SurfaceState::Bound(raster(64, 64));
        assert!(state.is_bound());

        state.invalidate();
        assert!(!state.is_bound());
        assert!(state.canvas().is_none());
    }

    #[test]
    fn invalidate_on_empty_is_harmless() {
        let mut state = SurfaceState::Empty;
        state.invalidate();
        assert!(!state.is_bound());
    }
}
