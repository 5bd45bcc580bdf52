use anyhow::{Context as _, Result};
use skia_safe::surfaces;
use winit::dpi::PhysicalSize;

use super::context::EngineContext;
use super::surface_state::BoundSurface;

/// Offscreen raster backend.
///
/// Allocates a CPU-backed surface of the drawable's physical extent.
/// There is nothing to present; hosts that want pixels on screen read the
/// surface back themselves. Primarily for headless rendering.
pub struct SoftwareBackend;

impl SoftwareBackend {
    pub fn new() -> Self {
        Self
    }

    pub(crate) fn make_context(&self) -> Result<EngineContext> {
        Ok(EngineContext::Raster)
    }

    pub(crate) fn bind_target(
        &mut self,
        size: PhysicalSize<u32>,
        scale: f64,
    ) -> Result<BoundSurface> {
        let mut surface = surfaces::raster_n32_premul((size.width as i32, size.height as i32))
            .context("failed to allocate raster surface")?;

        surface.canvas().scale((scale as f32, scale as f32));

        Ok(BoundSurface::raster(surface))
    }
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}
