//! Shared test utilities.

use std::sync::Once;

/// Install a tracing subscriber once for the whole suite, so storage
/// debug/warn output is visible when a test fails.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}
