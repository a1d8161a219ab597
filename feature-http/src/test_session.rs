use crate::{error::Error, report::RunSummary, runner, FeatureContext};
use std::{path::Path, sync::Once};
use tracing_subscriber::EnvFilter;

static INSTALL_SUBSCRIBER: Once = Once::new();

/// Entry points used by tests generated with
/// [`feature_test`](crate::feature_test).
pub struct TestSession;

impl TestSession {
    /// Runs a feature file, installing a test-friendly tracing subscriber the
    /// first time it is called in the process. `new_context` is called once
    /// per scenario.
    pub fn run<P, F>(path: P, new_context: F) -> Result<RunSummary, Error>
    where
        P: AsRef<Path>,
        F: Fn() -> FeatureContext + 'static,
    {
        Self::install_subscriber();

        runner::run_feature_file(path, new_context)
    }

    /// Like [`run`](Self::run), but panics unless every step passed.
    pub fn assert_feature<P, F>(path: P, new_context: F)
    where
        P: AsRef<Path>,
        F: Fn() -> FeatureContext + 'static,
    {
        let path = path.as_ref();

        match Self::run(path, new_context) {
            Ok(summary) if summary.passed() => tracing::debug!(%summary, "feature passed"),
            Ok(summary) => panic!("{} failed: {}", path.display(), summary),
            Err(e) => panic!("could not run {}: {}", path.display(), e),
        }
    }

    fn install_subscriber() {
        INSTALL_SUBSCRIBER.call_once(|| {
            // Another subscriber may already be set by the test binary.
            let _ = tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_test_writer()
                .try_init();
        });
    }
}
