//! Test utilities for orgcost.
//!
//! Provides shared helpers, test data factories, and assertion macros
//! for use across all test modules.
//!
//! # Usage
//!
//! ```rust,ignore
//! use orgcost::test_utils::*;
//!
//! let bucket = make_test_bucket(1_730_419_200, &[(2.0, None)]);
//! let sleeper = RecordingSleeper::new();
//! let dir = TestDir::new();
//! dir.create_file("config.toml", "[api]\ntimeout_seconds = 30");
//! ```

use std::fs;
use std::future::Future;
use std::io::{self, Write as IoWrite};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::backoff::Sleeper;
use crate::core::models::{CostAmount, CostBucket, CostResult};
use crate::util::time::SECONDS_PER_DAY;

// =============================================================================
// Test Data Factories
// =============================================================================

fn make_test_result(value: f64, project_id: Option<&str>) -> CostResult {
    CostResult {
        object: "organization.costs.result".to_string(),
        amount: CostAmount {
            value,
            currency: "usd".to_string(),
        },
        line_item: None,
        project_id: project_id.map(str::to_string),
        organization_id: "org-test".to_string(),
    }
}

/// Create a one-day bucket starting at `start_time` with the given
/// `(amount, project_id)` results.
///
/// # Examples
///
/// ```rust,ignore
/// use orgcost::test_utils::make_test_bucket;
///
/// let bucket = make_test_bucket(1_730_419_200, &[(0.5, Some("proj_a")), (1.0, None)]);
/// assert_eq!(bucket.results.len(), 2);
/// ```
#[must_use]
pub fn make_test_bucket(start_time: i64, results: &[(f64, Option<&str>)]) -> CostBucket {
    CostBucket {
        object: "bucket".to_string(),
        start_time,
        end_time: start_time.saturating_add(SECONDS_PER_DAY),
        results: results
            .iter()
            .map(|(value, project)| make_test_result(*value, *project))
            .collect(),
    }
}

/// Create sample config TOML content for testing.
#[must_use]
pub fn make_test_config_toml() -> String {
    r#"[api]
base_url = "https://api.example.test"
timeout_seconds = 45

[fetch]
lookback_days = 14

[output]
format = "md"
color = false
pretty = true
"#
    .to_string()
}

// =============================================================================
// Sleep Recording
// =============================================================================

/// A [`Sleeper`] that records requested delays and returns immediately.
///
/// Clones share the same record, so a clone handed to a pipeline can be
/// inspected from the test afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All delays requested so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the record lock is poisoned.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().expect("sleeper lock poisoned").clone()
    }

    /// Sum of all delays requested so far.
    #[must_use]
    pub fn total(&self) -> Duration {
        self.delays().iter().sum()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
        std::future::ready(())
    }
}

// =============================================================================
// Temp Directory Utilities
// =============================================================================

/// A temporary directory for tests with automatic cleanup.
///
/// Creates an isolated directory that is automatically deleted when
/// the `TestDir` is dropped. Uses the `tempfile` crate internally.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// Create a new isolated temporary directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the temporary directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Create a file in the temporary directory with the given content.
    ///
    /// Creates parent directories as needed.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be created or written.
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.inner.path().join(name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        let mut file = fs::File::create(&path).expect("Failed to create test file");
        file.write_all(content.as_bytes())
            .expect("Failed to write test file");
    }

    /// Read a file from the temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_file(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.inner.path().join(name))
    }

    /// Get the full path to a file in the temporary directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Assertion Macros
// =============================================================================

/// Assert approximate floating point equality.
///
/// # Examples
///
/// ```rust,ignore
/// use orgcost::assert_float_eq;
///
/// assert_float_eq!(2.0, 2.0000000000001);
/// assert_float_eq!(0.1 + 0.2, 0.3, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_float_eq {
    ($left:expr, $right:expr) => {
        $crate::assert_float_eq!($left, $right, f64::EPSILON * 100.0)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left: f64 = $left;
        let right: f64 = $right;
        let epsilon: f64 = $epsilon;
        assert!(
            (left - right).abs() < epsilon,
            "Float equality assertion failed: {} != {} (epsilon: {})",
            left,
            right,
            epsilon
        );
    };
}

// =============================================================================
// Test Helpers
// =============================================================================

/// Check if a string contains ANSI escape sequences.
#[must_use]
pub fn has_ansi_codes(text: &str) -> bool {
    text.contains('\x1b')
}

// =============================================================================
// Tests for Test Utilities
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_factory_spans_one_day() {
        let bucket = make_test_bucket(1_730_419_200, &[(0.5, Some("proj_a")), (1.0, None)]);
        assert_eq!(bucket.end_time - bucket.start_time, SECONDS_PER_DAY);
        assert_eq!(bucket.results.len(), 2);
        assert_eq!(bucket.results[0].project_id.as_deref(), Some("proj_a"));
        assert!(bucket.results[1].project_id.is_none());
        assert_float_eq!(bucket.results[1].amount.value, 1.0);
    }

    #[tokio::test]
    async fn recording_sleeper_shares_record_across_clones() {
        let sleeper = RecordingSleeper::new();
        let clone = sleeper.clone();
        clone.sleep(Duration::from_millis(200)).await;
        clone.sleep(Duration::from_secs(2)).await;
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_millis(200), Duration::from_secs(2)]
        );
        assert_eq!(sleeper.total(), Duration::from_millis(2200));
    }

    #[test]
    fn test_dir_creates_and_cleans_up() {
        let path: PathBuf;
        {
            let dir = TestDir::new();
            path = dir.path().to_path_buf();
            dir.create_file("nested/config.toml", &make_test_config_toml());
            assert!(dir.file_path("nested/config.toml").exists());
            assert!(dir.read_file("nested/config.toml").unwrap().contains("[api]"));
        }
        assert!(!path.exists());
    }

    #[test]
    fn ansi_detection() {
        assert!(has_ansi_codes("\x1b[1mbold\x1b[0m"));
        assert!(!has_ansi_codes("plain"));
    }

    #[test]
    fn float_eq_accepts_custom_epsilon() {
        assert_float_eq!(0.1 + 0.2, 0.3, 1e-9);
    }
}
