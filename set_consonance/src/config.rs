// Run configuration for the `consonance` driver.
//
// Everything a run can be told lives in `RunConfig`, loadable from JSON.
// Every field has a default, so a config file only needs the fields it
// changes, and command-line flags are applied on top of whatever was loaded.
//
// See also: `main.rs`, which layers flags over this, `spacing.rs` for
// `SpacingOptions` and `progression.rs` for `ProgressionOptions`.

use crate::progression::{DigitSequence, ProgressionOptions};
use crate::spacing::SpacingOptions;
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{MixedRadixDigits, SetError};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] SetError),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Structural template as radix digits, e.g. `"444"` or `"0x345"`.
    pub template: String,
    pub spacing: SpacingOptions,
    /// Score spacings on the rayon pool.
    pub parallel: bool,
    /// Digit sequence file (JSON `{"rows": [...]}`). Without one the
    /// template's own enumeration order is played.
    pub sequence: Option<PathBuf>,
    pub progression: ProgressionOptions,
    /// Run the common-tone crawler over the winning spacing.
    pub crawl_common_tones: bool,
    /// Write the run report here as JSON.
    pub output: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            template: "444".to_string(),
            spacing: SpacingOptions::default(),
            parallel: false,
            sequence: None,
            progression: ProgressionOptions::default(),
            crawl_common_tones: false,
            output: None,
        }
    }
}

impl RunConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&read(path)?)
    }

    /// Parse the template string into radices.
    pub fn template(&self) -> Result<MixedRadixDigits, ConfigError> {
        Ok(MixedRadixDigits::parse_code(&self.template)?)
    }

    /// Load the configured digit sequence, or fall back to the template's
    /// enumeration order.
    pub fn sequence_for(&self, template: &MixedRadixDigits) -> Result<DigitSequence, ConfigError> {
        let sequence = match &self.sequence {
            Some(path) => DigitSequence::from_json(&read(path)?)?,
            None => DigitSequence::from_template(template),
        };
        sequence.validate(template)?;
        Ok(sequence)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.template, "444");
        assert!(!config.parallel);
        assert!(config.spacing.forced_selection.is_none());
        assert_eq!(config.template().unwrap().radices(), &[4, 4, 4]);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = RunConfig::from_json(
            r#"{
                "template": "345",
                "spacing": { "skip_duplicates": true },
                "progression": { "reversed": true, "rotation": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(config.template().unwrap().radices(), &[3, 4, 5]);
        assert!(config.spacing.skip_duplicates);
        assert!(config.progression.reversed);
        assert_eq!(config.progression.rotation, 3);
        assert_eq!(config.progression.transposition, 0);
        assert!(!config.crawl_common_tones);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = RunConfig::default();
        config.spacing.forced_selection = Some(4);
        config.output = Some(PathBuf::from("report.json"));
        let restored = RunConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_bad_inputs() {
        assert!(matches!(
            RunConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        let config = RunConfig {
            template: "4x4".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.template(), Err(ConfigError::Invalid(_))));
        let missing = RunConfig::load(Path::new("/nonexistent/consonance.json"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_sequence_falls_back_to_enumeration() {
        let config = RunConfig::default();
        let template = config.template().unwrap();
        let sequence = config.sequence_for(&template).unwrap();
        assert_eq!(sequence.state_count(), 64);
    }
}
