//! Tracing setup shared by unit and integration test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Filter directive for tests: `TEST_LOG`, then `RUST_LOG`, then `"warn"`.
pub fn test_filter() -> String {
    std::env::var("TEST_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string())
}

/// Install the test subscriber once per process.
///
/// Output goes through the test writer so the harness captures it, and
/// timestamps are dropped. Set `TEST_LOG_JSON=1` to get the JSON shape the
/// server emits in production. Losing the race to another subscriber is fine.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::new(test_filter());
        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        let json = std::env::var("TEST_LOG_JSON").is_ok_and(|v| v == "1");
        if json {
            builder.json().try_init().ok();
        } else {
            builder.try_init().ok();
        }
    });
}
