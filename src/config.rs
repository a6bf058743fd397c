//! A module for loading and validating run files for the cycle counting tool.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{CountResult, CountingError};
use crate::histogram::Tolerance;
use crate::method::{CountOptions, Method};
use crate::timeseries::SequenceSource;

/// Represents one run: a load sequence, an optional gate, and the counts to
/// perform on it.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub sequence: SequenceSource,
    /// Hysteresis gate applied to the raw sequence before counting.
    #[serde(default)]
    pub gate: Option<f64>,
    #[serde(default)]
    pub tolerance: Tolerance,
    /// Output file for the JSON report; stdout when absent.
    #[serde(default)]
    pub output: Option<String>,
    pub counts: Vec<CountSpec>,
}

impl Config {
    /// Validates the entire configuration.
    ///
    /// Every section is checked before anything is read or counted.
    pub fn validate(&self) -> CountResult<()> {
        self.sequence.validate()?;
        if let Some(gate) = self.gate {
            if !(gate.is_finite() && gate > 0.0) {
                return Err(CountingError::invalid(format!("gate must be greater than 0.0, got {}", gate)));
            }
        }
        self.tolerance.validate()?;
        if self.counts.is_empty() {
            return Err(CountingError::invalid("counts must not be empty"));
        }
        for spec in &self.counts {
            spec.validate()?;
        }
        Ok(())
    }
}

/// Represents a single counting request.
#[derive(Debug, Clone, Deserialize)]
pub struct CountSpec {
    pub method: Method,
    /// Return a histogram (true) or the raw event list (false).
    #[serde(default = "CountSpec::default_aggregate")]
    pub aggregate: bool,
    /// Reference level for level crossing and peak counting.
    #[serde(default)]
    pub ref_level: f64,
    /// Level set for level crossing; integer levels when absent.
    #[serde(default)]
    pub levels: Option<Vec<f64>>,
    /// Re-bin the histogram onto a grid of this size.
    #[serde(default)]
    pub bin_size: Option<f64>,
}

impl CountSpec {
    fn default_aggregate() -> bool {
        true
    }

    /// Validates the `CountSpec`.
    ///
    /// # Examples
    ///
    /// ```
    /// use fatigue_cycles::config::CountSpec;
    /// use fatigue_cycles::method::Method;
    ///
    /// let spec = CountSpec {
    ///     method: Method::Rainflow,
    ///     aggregate: true,
    ///     ref_level: 0.0,
    ///     levels: None,
    ///     bin_size: Some(0.5),
    /// };
    /// assert!(spec.validate().is_ok());
    ///
    /// let raw_with_bins = CountSpec { aggregate: false, ..spec };
    /// assert!(raw_with_bins.validate().is_err());
    /// ```
    pub fn validate(&self) -> CountResult<()> {
        if !self.ref_level.is_finite() {
            return Err(CountingError::invalid(format!("ref_level must be finite, got {}", self.ref_level)));
        }
        if let Some(levels) = &self.levels {
            if self.method != Method::LevelCrossing {
                return Err(CountingError::invalid(format!("levels only apply to level_crossing, not {}", self.method)));
            }
            if levels.is_empty() {
                return Err(CountingError::invalid("levels must not be empty"));
            }
        }
        if let Some(bin_size) = self.bin_size {
            if !self.aggregate {
                return Err(CountingError::invalid("bin_size requires aggregate: true"));
            }
            if !(bin_size.is_finite() && bin_size > 0.0) {
                return Err(CountingError::invalid(format!("bin_size must be greater than 0.0, got {}", bin_size)));
            }
        }
        Ok(())
    }

    pub fn options(&self, tolerance: Tolerance) -> CountOptions {
        CountOptions {
            ref_level: self.ref_level,
            levels: self.levels.clone(),
            tolerance,
        }
    }
}

/// Loads the configuration from a YAML file, or TOML when the extension is
/// `.toml`.
///
/// # Errors
///
/// This function will return an error if reading or parsing the configuration file fails.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: Config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("failed to parse TOML config {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse YAML config {}", path.display()))?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config_path = "tests/config.yaml";
        let config = load_config(config_path).expect("Failed to load config");
        assert!(config.validate().is_ok(), "Expected Ok(()) but got Err with {:?}", config.validate());
        assert_eq!(config.counts.len(), 3);
        assert_eq!(config.counts[0].method, Method::Rainflow);
        assert!(!config.counts[1].aggregate);
        assert_eq!(config.tolerance.digits, 6);
    }

    #[test]
    fn test_load_toml_config() {
        let config = load_config("tests/config.toml").expect("Failed to load config");
        assert!(config.validate().is_ok());
        assert_eq!(config.gate, Some(0.5));
        assert_eq!(config.tolerance, Tolerance::default());
        assert_eq!(config.counts[0].method, Method::LevelCrossing);
        assert_eq!(config.counts[0].levels.as_deref(), Some(&[-1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn test_invalid_gate() {
        let yaml = "sequence: { path: data.csv }\ngate: -1.0\ncounts:\n  - method: rainflow\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_levels_only_for_level_crossing() {
        let yaml = "sequence: { path: data.csv }\ncounts:\n  - method: peak\n    levels: [1.0]\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_counts() {
        let yaml = "sequence: { path: data.csv }\ncounts: []\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }
}
