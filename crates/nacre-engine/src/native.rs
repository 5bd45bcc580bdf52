//! Process-wide native entry-point resolution.
//!
//! The GL backend issues driver calls through dynamically resolved entry
//! points. Resolution must happen exactly once per process, before any
//! engine context exists; every constructor path that needs the driver
//! goes through [`ensure_gl_loaded`], independent of the windowing
//! toolkit in use.

use std::ffi::{CStr, c_void};
use std::sync::OnceLock;

use anyhow::{Result, anyhow};

/// Entry points the GL backend cannot function without. Probing these is
/// enough to distinguish "no GL runtime" from a working driver; the full
/// symbol table is resolved lazily by the engine.
const REQUIRED_SYMBOLS: &[&CStr] = &[
    c"glGetIntegerv",
    c"glGetString",
    c"glBindFramebuffer",
    c"glClear",
    c"glFlush",
];

static GL_SYMBOLS: OnceLock<std::result::Result<(), String>> = OnceLock::new();

/// Resolves the required OpenGL entry points once per process.
///
/// The first caller performs the probe through `loader`; later callers
/// observe the recorded outcome regardless of the loader they pass. A
/// failed probe stays failed: retrying against the same driver would
/// resolve identically.
pub fn ensure_gl_loaded(loader: &mut dyn FnMut(&CStr) -> *const c_void) -> Result<()> {
    let outcome = GL_SYMBOLS.get_or_init(|| {
        for name in REQUIRED_SYMBOLS {
            if loader(name).is_null() {
                return Err(format!("missing entry point {}", name.to_string_lossy()));
            }
        }
        log::info!(
            "OpenGL runtime available ({} entry points probed)",
            REQUIRED_SYMBOLS.len()
        );
        Ok(())
    });

    outcome
        .clone()
        .map_err(|reason| anyhow!("OpenGL runtime unavailable: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_latches_first_outcome() {
        let mut working = |_: &CStr| 1usize as *const c_void;
        assert!(ensure_gl_loaded(&mut working).is_ok());

        // A later, broken loader does not flip the recorded outcome.
        let mut broken = |_: &CStr| std::ptr::null();
        assert!(ensure_gl_loaded(&mut broken).is_ok());
    }
}
