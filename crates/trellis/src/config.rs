//! Configuration management for trellis.
//!
//! Analysis settings are read from a YAML file (`trellis.yaml` by default).
//! Every key is optional; missing keys take the defaults below.
//!
//! ```yaml
//! detection:
//!   enabled: true
//!   threshold: 0.5
//!   max-tasks: 200
//! ```

use crate::error::{Error, Result};
use crate::inference::DEFAULT_DETECTION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "trellis.yaml";

/// Default upper bound on tasks for implicit detection.
///
/// Detection compares every ordered pair of tasks, so cost grows with the
/// square of the task count.
pub const DEFAULT_MAX_DETECTION_TASKS: usize = 200;

/// Top-level analysis configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AnalysisConfig {
    /// Implicit dependency detection settings
    pub detection: DetectionConfig,
}

/// Implicit dependency detection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DetectionConfig {
    /// Whether the analysis pipeline runs implicit detection
    pub enabled: bool,

    /// Minimum confidence for an inferred dependency (0.0-1.0)
    pub threshold: f64,

    /// Detection is skipped when the snapshot holds more tasks than this
    pub max_tasks: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: DEFAULT_DETECTION_THRESHOLD,
            max_tasks: DEFAULT_MAX_DETECTION_TASKS,
        }
    }
}

impl AnalysisConfig {
    /// Load and validate configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        let config: Self =
            serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `trellis.yaml` from `dir` if present, otherwise use defaults.
    pub async fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Loading configuration");
            Self::load(&path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {e}")))?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the threshold is outside 0.0-1.0 or
    /// `max-tasks` is zero.
    pub fn validate(&self) -> Result<()> {
        let detection = &self.detection;

        if !(0.0..=1.0).contains(&detection.threshold) {
            return Err(Error::Config(format!(
                "detection.threshold must be between 0.0 and 1.0, got {}",
                detection.threshold
            )));
        }

        if detection.max_tasks == 0 {
            return Err(Error::Config(
                "detection.max-tasks must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
