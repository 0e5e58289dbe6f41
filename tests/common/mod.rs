//! Shared helpers for the integration suite.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Silent unless `RUST_LOG` is set, e.g. `RUST_LOG=spark_view=trace`.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        if std::env::var("RUST_LOG").is_err() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}
