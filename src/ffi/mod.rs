//! C FFI - Stable ABI for managed callers
//!
//! Design: unmangled `extern "C"` entry points with:
//! 1. Rendering of raw vararg records into a caller buffer
//! 2. One-time initialisation of logging and configuration
//! 3. Type code labels for caller-side diagnostics

mod render;

pub use render::{vararg_native_render, vararg_native_type_name, CSharpVarArgsNative};

use once_cell::sync::OnceCell;
use tracing::{debug, info};

use crate::config::RenderConfig;
use crate::interop::Renderer;

/// Process-wide renderer used by the C entry points
static RENDERER: OnceCell<Renderer> = OnceCell::new();

/// Renderer behind the C entry points, configured from the environment on first use
pub fn renderer() -> &'static Renderer {
    RENDERER.get_or_init(|| {
        let config = RenderConfig::from_env();
        debug!(config = ?config, "render config installed");
        Renderer::new(config)
    })
}

/// Install `config` for the C entry points
///
/// Returns false if a configuration is already in place.
pub fn install(config: RenderConfig) -> bool {
    RENDERER.set(Renderer::new(config)).is_ok()
}

/// Initialise logging and configuration (safe to call more than once)
#[no_mangle]
pub extern "C" fn vararg_native_init() {
    crate::logging::init();
    let renderer = renderer();
    info!(config = ?renderer.config(), "vararg renderer ready");
}
