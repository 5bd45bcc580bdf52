//! The demo scene: a grid of ticking watch faces.

use std::cell::Cell;
use std::f32::consts::PI;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use nacre_engine::core::Renderer;
use nacre_engine::skia_safe::{Canvas, Color, Font, FontMgr, FontStyle, Paint, PaintStyle, Rect};

/// Cursor position in logical units, shared with the event side.
#[derive(Debug, Default, Clone, Copy)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

const CELL: f32 = 50.0;
const FACE_INSET: f32 = 5.0;
const FACE_SIZE: f32 = 40.0;

pub struct WatchGrid {
    title: String,
    pointer: Rc<Cell<Pointer>>,
    frame: u64,
    font: Font,
    text_paint: Paint,
}

impl WatchGrid {
    pub fn new(title: String, pointer: Rc<Cell<Pointer>>) -> Self {
        let font = FontMgr::new()
            .legacy_make_typeface(None, FontStyle::default())
            .map(|typeface| Font::from_typeface(typeface, 40.0))
            .unwrap_or_else(|| {
                log::warn!("no default typeface available, using fallback font");
                Font::default()
            });

        let mut text_paint = Paint::default();
        text_paint.set_color(Color::from(0xFF9B_C730));
        text_paint.set_anti_alias(true);

        Self {
            title,
            pointer,
            frame: 0,
            font,
            text_paint,
        }
    }

    fn draw_watch(&self, canvas: &Canvas, x: f32, y: f32, hover: bool, aa: bool, millis: i64) {
        let mut face = Paint::default();
        face.set_color(if hover {
            Color::from(0xFFE4_FF01)
        } else {
            Color::WHITE
        });

        let mut stroke = Paint::default();
        stroke.set_color(Color::BLACK);
        stroke.set_style(PaintStyle::Stroke);
        stroke.set_stroke_width(1.0);
        stroke.set_anti_alias(aa);

        let rim = Rect::from_xywh(x + FACE_INSET, y + FACE_INSET, FACE_SIZE, FACE_SIZE);
        canvas.draw_oval(rim, &face);
        canvas.draw_oval(rim, &stroke);

        let cx = x + CELL / 2.0;
        let cy = y + CELL / 2.0;

        for tick in 0..12 {
            let angle = tick as f32 / 12.0 * 2.0 * PI;
            canvas.draw_line(
                (cx - 17.0 * angle.sin(), cy + 17.0 * angle.cos()),
                (cx - 20.0 * angle.sin(), cy + 20.0 * angle.cos()),
                &stroke,
            );
        }

        // Long hand revolves every 5 seconds, short hand every minute.
        let long = (millis % 5_000) as f32 / 5_000.0 * 2.0 * PI;
        canvas.draw_line(
            (cx, cy),
            (cx - 15.0 * long.sin(), cy + 15.0 * long.cos()),
            &stroke,
        );

        let short = (millis % 60_000) as f32 / 60_000.0 * 2.0 * PI;
        canvas.draw_line(
            (cx, cy),
            (cx - 10.0 * short.sin(), cy + 10.0 * short.cos()),
            &stroke,
        );
    }
}

impl Renderer for WatchGrid {
    fn on_init(&mut self) {
        log::info!("scene ready: {}", self.title);
    }

    fn on_reshape(&mut self, width: u32, height: u32) {
        log::debug!("scene reshaped to {width}x{height}");
    }

    fn on_render(&mut self, canvas: &Canvas, width: u32, height: u32) {
        let pointer = self.pointer.get();
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as i64)
            .unwrap_or(0);

        let (width, height) = (width as f32, height as f32);

        let mut y = 0.0;
        while y + CELL <= height {
            let mut x = 0.0;
            while x + CELL <= width {
                let hover = pointer.x > x
                    && pointer.x < x + CELL
                    && pointer.y > y
                    && pointer.y < y + CELL;
                let aa = x > width / 2.0;

                // Offset each face so the grid doesn't tick in lockstep.
                let offset = ((x / width) * 5_000.0) as i64 + ((y / width) * 5_000.0) as i64;

                self.draw_watch(canvas, x, y, hover, aa, millis + offset);
                x += CELL;
            }
            y += CELL;
        }

        let text = format!("{} {}", self.title, self.frame);
        self.frame += 1;
        canvas.draw_str(&text, (pointer.x, pointer.y), &self.font, &self.text_paint);
    }

    fn on_dispose(&mut self) {
        log::info!("scene disposed: {}", self.title);
    }
}
