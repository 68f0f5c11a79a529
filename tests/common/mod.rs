//! Shared test utilities.

use std::sync::Once;

static INIT: Once = Once::new();

/// Install a fmt tracing subscriber once per test binary so schema
/// build logs show up under `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init()
            .ok();
    });
}
