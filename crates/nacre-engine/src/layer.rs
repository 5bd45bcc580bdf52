//! Per-window rendering layer.
//!
//! A [`Layer`] binds one drawable area to the engine and drives the
//! render callbacks through a two-state lifecycle: uninitialized until a
//! draw succeeds, back to uninitialized whenever the host reports a
//! geometry change. Rebuilds are lazy; they happen on the next draw, so
//! any number of resize notifications between frames cost one rebuild.

use anyhow::Result;
use skia_safe::Color;
use winit::dpi::{LogicalSize, PhysicalSize};

use crate::core::Renderer;
use crate::device::{Backend, EngineContext, SurfaceState};

/// Layer construction parameters.
#[derive(Debug, Clone)]
pub struct LayerConfig {
    /// Color the canvas is cleared to before each `on_render`.
    pub background: Color,

    /// MSAA sample count requested for framebuffer-backed targets.
    pub sample_count: usize,

    /// Stencil budget passed through to the engine.
    pub stencil_bits: usize,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            sample_count: 0,
            stencil_bits: 8,
        }
    }
}

/// Outcome of a single [`Layer::draw_frame`] call.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The render callback ran and the command stream was flushed.
    Rendered,

    /// The drawable area is zero (e.g. minimized window); nothing was
    /// built or drawn. Retried on the next frame.
    SkippedZeroArea,
}

/// One drawable area bound to the engine.
///
/// Single-threaded by construction: draws, resize notifications and
/// disposal all happen on the host's paint thread. Resources are strictly
/// per-layer; nothing is shared between instances.
pub struct Layer {
    backend: Backend,
    config: LayerConfig,

    /// Engine context; created on first draw, reused across reinits.
    context: Option<EngineContext>,

    /// Currently valid render-target/surface/canvas triple, if any.
    surfaces: SurfaceState,

    renderer: Box<dyn Renderer>,

    /// Drawable extent in physical pixels, as last reported by the host.
    size: PhysicalSize<u32>,

    /// Device pixel ratio, as last reported by the host.
    scale: f64,

    /// False until a draw completes initialization; cleared by
    /// [`Layer::request_reinit`].
    inited: bool,

    /// Whether `on_init` has run. Exactly once per layer lifetime.
    did_init: bool,
}

impl Layer {
    pub fn new(backend: Backend, renderer: Box<dyn Renderer>, config: LayerConfig) -> Self {
        Self {
            backend,
            config,
            context: None,
            surfaces: SurfaceState::Empty,
            renderer,
            size: PhysicalSize::new(0, 0),
            scale: 1.0,
            inited: false,
            did_init: false,
        }
    }

    /// Host resize notification.
    ///
    /// Records the new geometry and schedules a rebuild for the next
    /// draw; nothing is rebuilt here.
    pub fn resize(&mut self, size: PhysicalSize<u32>, scale: f64) {
        self.size = size;
        self.scale = scale;
        self.request_reinit();
    }

    /// Schedules a render-target/surface/canvas rebuild for the next
    /// draw. Calls coalesce: N requests before a draw cause one rebuild.
    pub fn request_reinit(&mut self) {
        self.inited = false;
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    fn logical_size(&self) -> (u32, u32) {
        let logical: LogicalSize<f64> = self.size.to_logical(self.scale);
        (logical.width.round() as u32, logical.height.round() as u32)
    }

    /// Renders one frame.
    ///
    /// The first call (and the first call after a reinit request) rebuilds
    /// the render target, surface and canvas before drawing. A zero-area
    /// drawable skips everything (the engine rejects zero-area surfaces)
    /// and leaves the layer uninitialized. Binding and context failures
    /// propagate; the render callback is then not invoked for that frame.
    pub fn draw_frame(&mut self) -> Result<FrameStatus> {
        if self.size.width == 0 || self.size.height == 0 {
            log::trace!("draw skipped: zero-area drawable");
            return Ok(FrameStatus::SkippedZeroArea);
        }

        if !self.inited {
            self.rebuild()?;
        }

        let (width, height) = self.logical_size();

        let Some(canvas) = self.surfaces.canvas() else {
            // rebuild() either binds a surface or errors out above.
            anyhow::bail!("no surface bound after initialization");
        };

        canvas.clear(self.config.background);
        self.renderer.on_render(canvas, width, height);

        if let Some(context) = &mut self.context {
            context.flush();
        }

        Ok(FrameStatus::Rendered)
    }

    /// Tears the layer down: dispose hook, then the cached triple, then
    /// the engine context. Consuming `self` makes "no draw after dispose"
    /// hold statically.
    pub fn dispose(mut self) {
        self.renderer.on_dispose();
        self.surfaces.invalidate();
        self.context.take();
        log::debug!("layer disposed ({} backend)", self.backend.name());
    }

    /// Full (re)initialization: context if missing, then a fresh triple,
    /// then the init/reshape notifications.
    fn rebuild(&mut self) -> Result<()> {
        let context = match &mut self.context {
            Some(context) => context,
            None => {
                let created = self.backend.make_context()?;
                log::debug!("engine context created ({} backend)", self.backend.name());
                self.context.insert(created)
            }
        };

        // The old triple goes before the new one is built; the new triple
        // becomes visible only once fully constructed.
        self.surfaces.invalidate();

        let bound = self.backend.bind_target(
            context,
            self.size,
            self.scale,
            self.config.sample_count,
            self.config.stencil_bits,
        )?;
        self.surfaces = SurfaceState::Bound(bound);

        if !self.did_init {
            self.renderer.on_init();
            self.did_init = true;
        }

        let (width, height) = self.logical_size();
        self.renderer.on_reshape(width, height);

        self.inited = true;

        log::trace!(
            "layer rebuilt: {}x{} physical @ {:.2}x",
            self.size.width,
            self.size.height,
            self.scale
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use skia_safe::Canvas;

    use super::*;
    use crate::device::SoftwareBackend;

    #[derive(Debug, PartialEq, Eq)]
    enum Hook {
        Init,
        Reshape(u32, u32),
        Render {
            width: u32,
            height: u32,
            canvas_px: (i32, i32),
        },
        Dispose,
    }

    struct Recorder {
        events: Rc<RefCell<Vec<Hook>>>,
    }

    impl Renderer for Recorder {
        fn on_init(&mut self) {
            self.events.borrow_mut().push(Hook::Init);
        }

        fn on_reshape(&mut self, width: u32, height: u32) {
            self.events.borrow_mut().push(Hook::Reshape(width, height));
        }

        fn on_render(&mut self, canvas: &Canvas, width: u32, height: u32) {
            let size = canvas.base_layer_size();
            self.events.borrow_mut().push(Hook::Render {
                width,
                height,
                canvas_px: (size.width, size.height),
            });
        }

        fn on_dispose(&mut self) {
            self.events.borrow_mut().push(Hook::Dispose);
        }
    }

    fn layer(events: &Rc<RefCell<Vec<Hook>>>) -> Layer {
        Layer::new(
            Backend::Software(SoftwareBackend::new()),
            Box::new(Recorder {
                events: events.clone(),
            }),
            LayerConfig::default(),
        )
    }

    #[test]
    fn first_draw_runs_hooks_in_order() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(800, 600), 1.0);
        assert_eq!(layer.draw_frame().unwrap(), FrameStatus::Rendered);

        assert_eq!(
            *events.borrow(),
            vec![
                Hook::Init,
                Hook::Reshape(800, 600),
                Hook::Render {
                    width: 800,
                    height: 600,
                    canvas_px: (800, 600),
                },
            ]
        );
    }

    #[test]
    fn steady_state_draws_do_not_rebuild() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(400, 300), 1.0);
        layer.draw_frame().unwrap();
        layer.draw_frame().unwrap();

        let events = events.borrow();
        let reshapes = events
            .iter()
            .filter(|e| matches!(e, Hook::Reshape(..)))
            .count();
        let renders = events
            .iter()
            .filter(|e| matches!(e, Hook::Render { .. }))
            .count();
        assert_eq!((reshapes, renders), (1, 2));
    }

    #[test]
    fn reinit_rebuilds_but_init_stays_once() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(800, 600), 1.0);
        layer.draw_frame().unwrap();

        layer.request_reinit();
        layer.draw_frame().unwrap();

        let events = events.borrow();
        let inits = events.iter().filter(|e| matches!(e, Hook::Init)).count();
        let reshapes = events
            .iter()
            .filter(|e| matches!(e, Hook::Reshape(..)))
            .count();
        assert_eq!((inits, reshapes), (1, 2));
    }

    #[test]
    fn repeated_reinit_requests_coalesce() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(640, 480), 1.0);
        layer.draw_frame().unwrap();

        layer.request_reinit();
        layer.request_reinit();
        layer.request_reinit();
        layer.draw_frame().unwrap();

        // Three requests, one rebuild: exactly one extra reshape.
        let reshapes = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Hook::Reshape(..)))
            .count();
        assert_eq!(reshapes, 2);
    }

    #[test]
    fn zero_area_drawable_never_initializes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        assert_eq!(layer.draw_frame().unwrap(), FrameStatus::SkippedZeroArea);
        assert!(events.borrow().is_empty());

        layer.resize(PhysicalSize::new(800, 0), 1.0);
        assert_eq!(layer.draw_frame().unwrap(), FrameStatus::SkippedZeroArea);
        assert!(events.borrow().is_empty());

        // First non-zero size initializes from scratch.
        layer.resize(PhysicalSize::new(640, 480), 1.0);
        assert_eq!(layer.draw_frame().unwrap(), FrameStatus::Rendered);
        assert_eq!(events.borrow()[0], Hook::Init);
    }

    #[test]
    fn canvas_always_matches_latest_resize() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(800, 600), 1.0);
        layer.draw_frame().unwrap();

        layer.resize(PhysicalSize::new(1024, 768), 1.0);
        layer.resize(PhysicalSize::new(1280, 720), 1.0);
        layer.draw_frame().unwrap();

        let events = events.borrow();
        let last_render = events
            .iter()
            .rev()
            .find(|e| matches!(e, Hook::Render { .. }))
            .unwrap();
        assert_eq!(
            *last_render,
            Hook::Render {
                width: 1280,
                height: 720,
                canvas_px: (1280, 720),
            }
        );
    }

    #[test]
    fn dpi_scale_separates_logical_from_physical() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(1600, 1200), 2.0);
        layer.draw_frame().unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                Hook::Init,
                Hook::Reshape(800, 600),
                Hook::Render {
                    width: 800,
                    height: 600,
                    canvas_px: (1600, 1200),
                },
            ]
        );
    }

    #[test]
    fn dispose_runs_hook_after_any_number_of_draws() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut layer = layer(&events);

        layer.resize(PhysicalSize::new(320, 240), 1.0);
        layer.draw_frame().unwrap();
        layer.draw_frame().unwrap();
        layer.dispose();

        assert_eq!(events.borrow().last(), Some(&Hook::Dispose));
        assert_eq!(
            events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Hook::Dispose))
                .count(),
            1
        );
    }

    #[test]
    fn dispose_without_draw_still_notifies() {
        let events = Rc::new(RefCell::new(Vec::new()));
        layer(&events).dispose();
        assert_eq!(*events.borrow(), vec![Hook::Dispose]);
    }
}
