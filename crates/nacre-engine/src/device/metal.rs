use anyhow::{Context as _, Result};
use core_graphics_types::geometry::CGSize;
use metal::{CommandQueue, Device, MTLPixelFormat, MetalDrawable, MetalLayer};
use skia_safe::gpu::{self, SurfaceOrigin, backend_render_targets, direct_contexts, mtl};
use skia_safe::{ColorSpace, ColorType};
use winit::dpi::PhysicalSize;

use super::context::EngineContext;
use super::surface_state::BoundSurface;

/// Metal drawable backend.
///
/// The host owns the `CAMetalLayer` (attached to its view) and presents
/// the drawable after `draw_frame` returns; this backend only wraps the
/// layer's next drawable as a render target. The drawable taken at bind
/// time is held until the next rebuild.
pub struct MetalBackend {
    device: Device,
    queue: CommandQueue,
    layer: MetalLayer,
    drawable: Option<MetalDrawable>,
}

impl MetalBackend {
    pub fn new(layer: MetalLayer) -> Result<Self> {
        let device = Device::system_default().context("no Metal device available")?;
        let queue = device.new_command_queue();

        layer.set_device(&device);
        layer.set_pixel_format(MTLPixelFormat::RGBA8Unorm);
        layer.set_presents_with_transaction(false);

        Ok(Self {
            device,
            queue,
            layer,
            drawable: None,
        })
    }

    /// The drawable backing the current render target, for the host to
    /// present once the frame's command stream is flushed.
    pub fn take_drawable(&mut self) -> Option<MetalDrawable> {
        self.drawable.take()
    }

    pub(crate) fn make_context(&self) -> Result<EngineContext> {
        let backend = unsafe {
            mtl::BackendContext::new(
                self.device.as_ptr() as mtl::Handle,
                self.queue.as_ptr() as mtl::Handle,
            )
        };
        let direct = direct_contexts::make_metal(&backend, None)
            .context("failed to create Skia Metal context")?;
        Ok(EngineContext::Gpu(direct))
    }

    pub(crate) fn bind_target(
        &mut self,
        context: &mut EngineContext,
        size: PhysicalSize<u32>,
        scale: f64,
    ) -> Result<BoundSurface> {
        let EngineContext::Gpu(direct) = context else {
            anyhow::bail!("Metal backend handed a non-GPU engine context");
        };

        self.layer
            .set_drawable_size(CGSize::new(f64::from(size.width), f64::from(size.height)));

        let drawable = self
            .layer
            .next_drawable()
            .context("compositor returned no drawable")?
            .to_owned();

        let texture_info =
            unsafe { mtl::TextureInfo::new(drawable.texture().as_ptr() as mtl::Handle) };

        let render_target = backend_render_targets::make_mtl(
            (size.width as i32, size.height as i32),
            &texture_info,
        );

        let mut surface = gpu::surfaces::wrap_backend_render_target(
            direct,
            &render_target,
            SurfaceOrigin::BottomLeft,
            ColorType::RGBA8888,
            ColorSpace::new_srgb(),
            None,
        )
        .context("Skia rejected the Metal render target")?;

        surface.canvas().scale((scale as f32, scale as f32));

        self.drawable = Some(drawable);
        Ok(BoundSurface::gpu(surface, render_target))
    }
}
