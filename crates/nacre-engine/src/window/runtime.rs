use std::collections::HashMap;
use std::num::NonZeroU32;

use anyhow::{Context as _, Result};
use glutin::config::{Config as GlConfig, ConfigTemplateBuilder, GlConfig as _};
use glutin::context::{
    ContextAttributesBuilder, NotCurrentGlContext as _, PossiblyCurrentContext,
    PossiblyCurrentGlContext as _,
};
use glutin::display::{GetGlDisplay as _, GlDisplay as _};
use glutin::surface::{GlSurface as _, SurfaceAttributesBuilder, SwapInterval, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle as _;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{App, AppControl, WindowCtx};
use crate::device::{Backend, GlBackend};
use crate::layer::{FrameStatus, Layer, LayerConfig};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    pub layer: LayerConfig,
    pub vsync: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "nacre".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            layer: LayerConfig::default(),
            vsync: true,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    pub fn create_window(&mut self, config: RuntimeConfig) {
        self.commands.push(Command::CreateWindow(config));
    }

    pub fn close_window(&mut self, id: WindowId) {
        self.commands.push(Command::CloseWindow(id));
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }
}

enum Command {
    CreateWindow(RuntimeConfig),
    CloseWindow(WindowId),
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(initial: RuntimeConfig, app: A) -> Result<()>
    where
        A: 'static + App,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(initial, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct WindowEntry {
    // Declared before the GL objects: the layer's engine resources issue
    // driver calls on release and must go first.
    layer: Layer,
    gl_surface: glutin::surface::Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
    visible: bool,
}

impl WindowEntry {
    fn resize(&mut self, new_size: PhysicalSize<u32>) {
        // The GL surface needs the new extent too. Zero-area geometry is
        // left to the layer, which skips draws until it grows.
        if let (Some(w), Some(h)) = (
            NonZeroU32::new(new_size.width),
            NonZeroU32::new(new_size.height),
        ) {
            if let Err(err) = self.gl_context.make_current(&self.gl_surface) {
                log::warn!("could not make context current for resize: {err}");
            }
            self.gl_surface.resize(&self.gl_context, w, h);
        }

        self.layer.resize(new_size, self.window.scale_factor());
    }

    fn draw(&mut self) -> Result<()> {
        self.gl_context
            .make_current(&self.gl_surface)
            .context("failed to make OpenGL context current")?;

        if self.layer.draw_frame()? == FrameStatus::Rendered {
            // Presentation failure is transient (e.g. mid-teardown);
            // the next frame retries.
            if let Err(err) = self.gl_surface.swap_buffers(&self.gl_context) {
                log::warn!("swap_buffers failed: {err}");
            }
        }
        Ok(())
    }
}

struct HostState<A>
where
    A: App + 'static,
{
    initial: RuntimeConfig,
    app: A,

    /// GL config of the shared display; set when the first window is
    /// created and reused for every later one.
    gl_config: Option<GlConfig>,

    windows: HashMap<WindowId, WindowEntry>,
    exit_requested: bool,
    fatal: Option<anyhow::Error>,
}

impl<A> HostState<A>
where
    A: App + 'static,
{
    fn new(initial: RuntimeConfig, app: A) -> Self {
        Self {
            initial,
            app,
            gl_config: None,
            windows: HashMap::new(),
            exit_requested: false,
            fatal: None,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    fn fail(&mut self, err: anyhow::Error) {
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        self.exit_requested = true;
    }

    fn create_window_entry(
        &mut self,
        event_loop: &ActiveEventLoop,
        config: RuntimeConfig,
    ) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(config.title.clone())
            .with_inner_size(config.initial_size);

        let (window, gl_config) = match self.gl_config.clone() {
            None => {
                let template = ConfigTemplateBuilder::new()
                    .with_alpha_size(8)
                    .with_stencil_size(config.layer.stencil_bits as u8);

                let (window, gl_config) = DisplayBuilder::new()
                    .with_window_attributes(Some(attrs))
                    .build(event_loop, template, |configs| {
                        // Prefer an sRGB-capable config when offered.
                        configs
                            .reduce(|best, candidate| {
                                if candidate.srgb_capable() && !best.srgb_capable() {
                                    candidate
                                } else {
                                    best
                                }
                            })
                            .expect("no matching OpenGL configs")
                    })
                    .map_err(|err| anyhow::anyhow!("failed to create OpenGL display: {err}"))?;

                let window = window.context("display builder returned no window")?;
                self.gl_config = Some(gl_config.clone());
                (window, gl_config)
            }
            Some(gl_config) => {
                let window = glutin_winit::finalize_window(event_loop, attrs, &gl_config)
                    .context("failed to create window")?;
                (window, gl_config)
            }
        };

        let gl_display = gl_config.display();

        let raw_window_handle = window
            .window_handle()
            .context("window exposes no native handle")?
            .as_raw();

        let context_attributes = ContextAttributesBuilder::new().build(Some(raw_window_handle));
        let not_current = unsafe {
            gl_display
                .create_context(&gl_config, &context_attributes)
                .context("failed to create OpenGL context")?
        };

        let surface_attributes = window
            .build_surface_attributes(SurfaceAttributesBuilder::<WindowSurface>::new())
            .context("failed to describe the window surface")?;
        let gl_surface = unsafe {
            gl_display
                .create_window_surface(&gl_config, &surface_attributes)
                .context("failed to create OpenGL surface")?
        };

        let gl_context = not_current
            .make_current(&gl_surface)
            .context("failed to make OpenGL context current")?;

        if config.vsync {
            if let Err(err) =
                gl_surface.set_swap_interval(&gl_context, SwapInterval::Wait(NonZeroU32::MIN))
            {
                log::warn!("vsync unavailable: {err}");
            }
        }

        let backend = Backend::OpenGl(GlBackend::new(|name| gl_display.get_proc_address(name))?);

        let id = window.id();
        let renderer = self.app.create_renderer(&WindowCtx {
            id,
            window: &window,
        });

        let mut layer = Layer::new(backend, renderer, config.layer.clone());
        layer.resize(window.inner_size(), window.scale_factor());

        log::info!(
            "window created: {}x{} physical @ {:.2}x ({})",
            window.inner_size().width,
            window.inner_size().height,
            window.scale_factor(),
            config.title
        );

        self.windows.insert(
            id,
            WindowEntry {
                layer,
                gl_surface,
                gl_context,
                window,
                visible: true,
            },
        );
        Ok(id)
    }

    fn destroy_window_entry(&mut self, id: WindowId) {
        if let Some(entry) = self.windows.remove(&id) {
            // Engine teardown issues driver calls; the context must be
            // current while the layer goes down.
            if let Err(err) = entry.gl_context.make_current(&entry.gl_surface) {
                log::warn!("could not make context current for teardown: {err}");
            }
            entry.layer.dispose();
        }
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::CreateWindow(cfg) => {
                    if let Err(err) = self.create_window_entry(event_loop, cfg) {
                        log::error!("failed to create window: {err:#}");
                        self.fail(err);
                    }
                }
                Command::CloseWindow(id) => self.destroy_window_entry(id),
                Command::Exit => self.request_exit(),
            }
        }

        if self.windows.is_empty() {
            self.request_exit();
        }

        if self.exit_requested {
            let ids: Vec<WindowId> = self.windows.keys().copied().collect();
            for id in ids {
                self.destroy_window_entry(id);
            }
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for HostState<A>
where
    A: App + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !self.windows.is_empty() {
            return;
        }

        let initial = self.initial.clone();
        if let Err(err) = self.create_window_entry(event_loop, initial) {
            log::error!("failed to create initial window: {err:#}");
            self.fail(err);
            event_loop.exit();
            return;
        }

        for entry in self.windows.values() {
            entry.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw for visible windows; occluded ones idle until
        // the compositor shows them again.
        for entry in self.windows.values() {
            if entry.visible {
                entry.window.request_redraw();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        let mut runtime_ctx = RuntimeCtx::default();

        if let Some(entry) = self.windows.get(&window_id) {
            let ctx = WindowCtx {
                id: window_id,
                window: &entry.window,
            };
            if self.app.on_window_event(&mut runtime_ctx, &ctx, &event) == AppControl::Exit {
                self.request_exit();
            }
        }

        // Runtime-managed lifecycle / resize / redraw handling.
        match &event {
            WindowEvent::CloseRequested => {
                self.destroy_window_entry(window_id);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.resize(*new_size);
                    entry.window.request_redraw();
                }
            }

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    let new_size = entry.window.inner_size();
                    entry.resize(new_size);
                    entry.window.request_redraw();
                }
            }

            WindowEvent::Occluded(occluded) => {
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    entry.visible = !*occluded;
                    if entry.visible {
                        entry.window.request_redraw();
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                let mut frame_err = None;
                if let Some(entry) = self.windows.get_mut(&window_id) {
                    if let Err(err) = entry.draw() {
                        frame_err = Some(err);
                    }
                }
                if let Some(err) = frame_err {
                    log::error!("frame failed: {err:#}");
                    self.fail(err);
                }
            }

            _ => {}
        }

        self.apply_commands(event_loop, runtime_ctx);
    }
}
