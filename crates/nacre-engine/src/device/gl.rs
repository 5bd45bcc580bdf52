use std::ffi::{CStr, c_void};

use anyhow::{Context as _, Result};
use glow::HasContext as _;
use skia_safe::gpu::{self, SurfaceOrigin, backend_render_targets, direct_contexts, gl};
use skia_safe::{ColorSpace, ColorType};
use winit::dpi::PhysicalSize;

use super::context::EngineContext;
use super::surface_state::BoundSurface;

/// OpenGL framebuffer backend.
///
/// Skia renders into whatever framebuffer the windowing stack currently
/// has bound for drawing; the id is queried from the driver at bind time,
/// not cached, so host-side framebuffer changes are picked up on the next
/// rebuild.
pub struct GlBackend {
    glow: glow::Context,
    interface: gl::Interface,
}

impl GlBackend {
    /// `loader` must resolve symbols against the GL context that will be
    /// current at draw time (e.g. `glutin`'s display `get_proc_address`).
    pub fn new(mut loader: impl FnMut(&CStr) -> *const c_void) -> Result<Self> {
        crate::native::ensure_gl_loaded(&mut loader)?;

        let glow = unsafe { glow::Context::from_loader_function_cstr(|name| loader(name)) };
        let interface = gl::Interface::new_load_with_cstr(|name| loader(name))
            .context("Skia rejected the OpenGL interface")?;

        Ok(Self { glow, interface })
    }

    pub(crate) fn make_context(&self) -> Result<EngineContext> {
        let direct = direct_contexts::make_gl(self.interface.clone(), None)
            .context("failed to create Skia OpenGL context")?;
        Ok(EngineContext::Gpu(direct))
    }

    pub(crate) fn bind_target(
        &mut self,
        context: &mut EngineContext,
        size: PhysicalSize<u32>,
        scale: f64,
        sample_count: usize,
        stencil_bits: usize,
    ) -> Result<BoundSurface> {
        let EngineContext::Gpu(direct) = context else {
            anyhow::bail!("OpenGL backend handed a non-GPU engine context");
        };

        let fboid = unsafe { self.glow.get_parameter_i32(glow::DRAW_FRAMEBUFFER_BINDING) };

        let fb_info = gl::FramebufferInfo {
            fboid: fboid as u32,
            format: gl::Format::RGBA8.into(),
            ..Default::default()
        };

        let render_target = backend_render_targets::make_gl(
            (size.width as i32, size.height as i32),
            sample_count,
            stencil_bits,
            fb_info,
        );

        let mut surface = gpu::surfaces::wrap_backend_render_target(
            direct,
            &render_target,
            SurfaceOrigin::BottomLeft,
            ColorType::RGBA8888,
            ColorSpace::new_srgb(),
            None,
        )
        .context("Skia rejected the framebuffer render target")?;

        // Callers draw in logical units.
        surface.canvas().scale((scale as f32, scale as f32));

        Ok(BoundSurface::gpu(surface, render_target))
    }
}
