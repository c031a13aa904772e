//! Test utilities for raydor
//!
//! Helpers shared by unit and integration tests: a [`SiteFixture`] that lays
//! out a site in a temporary directory, canned manifests in
//! [`ManifestFixture`], and one-time logging setup.
//!
//! # Example
//!
//! ```rust,no_run
//! use raydor::test_utils::SiteFixture;
//!
//! let site = SiteFixture::new()
//!     .unwrap()
//!     .with_file("templates/index.html", "<h1>{{ title }}</h1>")
//!     .unwrap()
//!     .with_manifest("index.html:\n  template: templates/index.html\n  vars:\n    title: Hello\n")
//!     .unwrap();
//! let summary = site.build().unwrap();
//! assert_eq!(summary.rendered, 1);
//! ```

pub mod fixtures;

pub use fixtures::{ManifestFixture, SiteFixture};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. `level` wins over `RUST_LOG`; with
/// neither set, tests run without logging.
///
/// ```bash
/// RUST_LOG=raydor=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
