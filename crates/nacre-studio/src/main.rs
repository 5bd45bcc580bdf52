//! Interactive nacre sample.
//!
//! Opens a window full of ticking watch faces; the face under the cursor
//! lights up and a caption follows the pointer. `N` opens another window,
//! `Escape` closes the focused one.

mod scene;

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;
use nacre_engine::core::{App, AppControl, Renderer, WindowCtx};
use nacre_engine::logging::{LoggingConfig, init_logging};
use nacre_engine::window::{Runtime, RuntimeConfig, RuntimeCtx};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::WindowId;

use scene::{Pointer, WatchGrid};

struct Studio {
    pointers: HashMap<WindowId, Rc<Cell<Pointer>>>,
}

impl Studio {
    fn new() -> Self {
        Self {
            pointers: HashMap::new(),
        }
    }

    fn window_config(title: String) -> RuntimeConfig {
        RuntimeConfig {
            title,
            initial_size: LogicalSize::new(800.0, 600.0),
            ..RuntimeConfig::default()
        }
    }
}

impl App for Studio {
    fn create_renderer(&mut self, window: &WindowCtx<'_>) -> Box<dyn Renderer> {
        let pointer = Rc::new(Cell::new(Pointer::default()));
        self.pointers.insert(window.id, pointer.clone());
        Box::new(WatchGrid::new(window.window.title(), pointer))
    }

    fn on_window_event(
        &mut self,
        runtime: &mut RuntimeCtx,
        window: &WindowCtx<'_>,
        event: &WindowEvent,
    ) -> AppControl {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(pointer) = self.pointers.get(&window.id) {
                    let logical = position.to_logical::<f64>(window.scale_factor());
                    pointer.set(Pointer {
                        x: logical.x as f32,
                        y: logical.y as f32,
                    });
                }
            }

            WindowEvent::CloseRequested => {
                self.pointers.remove(&window.id);
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::KeyN) => {
                        let title = format!("nacre studio {}", self.pointers.len() + 1);
                        runtime.create_window(Self::window_config(title));
                    }
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.pointers.remove(&window.id);
                        runtime.close_window(window.id);
                    }
                    _ => {}
                }
            }

            _ => {}
        }

        AppControl::Continue
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    Runtime::run(
        Studio::window_config("nacre studio".to_string()),
        Studio::new(),
    )
}
