//! Test helper functions and utilities

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Initialize test logging with environment-based configuration.
/// 
/// Uses `RUST_LOG` for the level and writes to the test output.
/// Safe to call multiple times - subsequent calls are ignored.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Isolated temporary directory for file-based tests.
/// 
/// Everything written through it is removed when the environment is dropped.
/// 
/// # Examples
/// 
/// ```ignore
/// let env = TestEnvironment::new()?;
/// let csv = env.write_file("readings.csv", SAMPLE_EXPORT)?;
/// ```
#[derive(Debug)]
pub struct TestEnvironment {
    /// Temporary directory for this test environment
    temp_dir: tempfile::TempDir,
}

impl TestEnvironment {
    /// Creates a new test environment with a temporary directory.
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    /// Returns the path to the temporary directory.
    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write `content` to `name` inside the environment and return its path.
    pub fn write_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }

    /// Path inside the environment that does not exist yet.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_writes_and_cleans_up() -> Result<()> {
        let env = TestEnvironment::new()?;
        let path = env.write_file("a.csv", "Time;CO2\n")?;
        assert_eq!(std::fs::read_to_string(&path)?, "Time;CO2\n");
        let dir = env.temp_path().to_path_buf();
        drop(env);
        assert!(!dir.exists());
        Ok(())
    }
}
