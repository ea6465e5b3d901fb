// Navigation tracing for the browser console.
//
// Console bindings only exist on wasm32; native test builds print to stderr.

use std::sync::atomic::{AtomicBool, Ordering};

static NAVIGATION_TRACING: AtomicBool = AtomicBool::new(false);

pub fn set_navigation_tracing(enabled: bool) {
    NAVIGATION_TRACING.store(enabled, Ordering::Relaxed);
}

/// Routine navigation trace, silenced unless `logging.navigation` is on.
pub fn log_navigation(message: &str) {
    if !NAVIGATION_TRACING.load(Ordering::Relaxed) {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    zoon::println!("[nav] {}", message);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[nav] {}", message);
}

/// Always printed. Use for failures that change what the user sees.
pub fn log_error(message: &str) {
    #[cfg(target_arch = "wasm32")]
    zoon::eprintln!("[nav] {}", message);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("[nav] {}", message);
}
