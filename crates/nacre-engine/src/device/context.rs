use skia_safe::gpu::DirectContext;

/// Handle to the rendering engine's command-issuing context.
///
/// Created lazily on first draw and reused across reinits; only layer
/// disposal releases it. Raster drawing has no context object on the
/// engine side, so the software backend carries the `Raster` variant.
pub enum EngineContext {
    Gpu(DirectContext),
    Raster,
}

impl EngineContext {
    /// Flushes the engine's command stream.
    ///
    /// Returns immediately; completion is asynchronous at the driver
    /// level. No-op for raster drawing, which has no command stream.
    pub fn flush(&mut self) {
        match self {
            EngineContext::Gpu(ctx) => {
                ctx.flush_and_submit();
            }
            EngineContext::Raster => {}
        }
    }
}
