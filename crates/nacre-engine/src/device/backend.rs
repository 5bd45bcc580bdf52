use anyhow::Result;
use winit::dpi::PhysicalSize;

use super::context::EngineContext;
use super::gl::GlBackend;
#[cfg(all(target_os = "macos", feature = "metal"))]
use super::metal::MetalBackend;
use super::software::SoftwareBackend;
use super::surface_state::BoundSurface;

/// GPU backend of a layer.
///
/// A closed set: the choice is made at layer construction and never
/// changes for the layer's lifetime. Each variant knows how to create the
/// engine context and how to bind the current drawable to a render
/// target + surface.
pub enum Backend {
    /// Renders into the framebuffer currently bound for drawing.
    OpenGl(GlBackend),

    /// Renders into drawables taken from a `CAMetalLayer`.
    #[cfg(all(target_os = "macos", feature = "metal"))]
    Metal(MetalBackend),

    /// Offscreen raster surface; no GPU involved.
    Software(SoftwareBackend),
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::OpenGl(_) => "opengl",
            #[cfg(all(target_os = "macos", feature = "metal"))]
            Backend::Metal(_) => "metal",
            Backend::Software(_) => "software",
        }
    }

    pub(crate) fn make_context(&self) -> Result<EngineContext> {
        match self {
            Backend::OpenGl(gl) => gl.make_context(),
            #[cfg(all(target_os = "macos", feature = "metal"))]
            Backend::Metal(mtl) => mtl.make_context(),
            Backend::Software(sw) => sw.make_context(),
        }
    }

    /// Binds the drawable described by `size`/`scale` to a fresh render
    /// target + surface. The caller guarantees a non-zero area.
    pub(crate) fn bind_target(
        &mut self,
        context: &mut EngineContext,
        size: PhysicalSize<u32>,
        scale: f64,
        sample_count: usize,
        stencil_bits: usize,
    ) -> Result<BoundSurface> {
        debug_assert!(size.width > 0 && size.height > 0);

        match self {
            Backend::OpenGl(gl) => gl.bind_target(context, size, scale, sample_count, stencil_bits),
            #[cfg(all(target_os = "macos", feature = "metal"))]
            Backend::Metal(mtl) => mtl.bind_target(context, size, scale),
            Backend::Software(sw) => sw.bind_target(size, scale),
        }
    }
}
