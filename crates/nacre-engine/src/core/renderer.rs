use skia_safe::Canvas;

/// Render callbacks driven by a layer.
///
/// Hook protocol:
/// - `on_init` runs once per layer lifetime, before the first frame.
/// - `on_reshape` runs after every render-target rebuild (first frame,
///   resize, explicit reinit), in logical units.
/// - `on_render` runs once per frame. The canvas is valid only for the
///   duration of the call and is pre-scaled by the device pixel ratio,
///   so all drawing happens in logical units.
/// - `on_dispose` runs once, when the layer is torn down.
///
/// The layer guarantees `on_render` is never invoked without a fully
/// bound surface behind the canvas.
pub trait Renderer {
    fn on_init(&mut self) {}

    fn on_reshape(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    fn on_render(&mut self, canvas: &Canvas, width: u32, height: u32);

    fn on_dispose(&mut self) {}
}
