// The end-to-end run: validate the alias table, optimize the spacing of a
// template, play a digit sequence through the winning spacing and
// optionally crawl tone maps for common tones.
//
// Each stage is a separate function so the CLI can report between them;
// `run` chains them for library callers and tests. The resulting
// `RunReport` is what `--json` writes out.

use crate::config::{ConfigError, RunConfig};
use crate::crawl::{CommonToneCrawler, CrawlReport};
use crate::harmony::{HarmonyResolver, ResolvedChord};
use crate::progression::{DigitSequence, Progression, build_progression};
use crate::spacing::{SpacingOptimizer, SpacingResult};
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{MixedRadixDigits, PitchClassSet, SetError};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Set(#[from] SetError),
    #[error("writing {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub harmonizations_checked: usize,
    pub spacing: SpacingResult,
    /// Chord name, key and root of every winning permutation, in order.
    pub labels: Vec<ResolvedChord>,
    pub progression: Progression,
    pub crawl: Option<CrawlReport>,
}

impl RunReport {
    pub fn write_json(&self, path: &Path) -> Result<(), RunError> {
        let json = serde_json::to_string_pretty(self).map_err(ConfigError::from)?;
        std::fs::write(path, json).map_err(|source| RunError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

pub fn validate_tables() -> Result<usize, SetError> {
    HarmonyResolver::new().validate_harmonizations()
}

pub fn optimize(config: &RunConfig, template: &MixedRadixDigits) -> Result<SpacingResult, SetError> {
    let optimizer = SpacingOptimizer::new(template.clone(), config.spacing.clone())?;
    if config.parallel {
        optimizer.search_parallel()
    } else {
        optimizer.search()
    }
}

/// Name every permutation of the winning spacing.
pub fn label_winners(spacing: &SpacingResult) -> Result<Vec<ResolvedChord>, SetError> {
    let resolver = HarmonyResolver::new();
    spacing
        .permutations
        .iter()
        .map(|perm| resolver.resolve(&PitchClassSet::from_pitches(&perm.tones)?))
        .collect()
}

pub fn progression(
    config: &RunConfig,
    template: &MixedRadixDigits,
    spacing: &SpacingResult,
    sequence: &DigitSequence,
) -> Result<Progression, SetError> {
    build_progression(template, &spacing.spacing, sequence, &config.progression)
}

pub fn crawl(
    config: &RunConfig,
    template: &MixedRadixDigits,
    spacing: &SpacingResult,
    sequence: &DigitSequence,
) -> Result<CrawlReport, SetError> {
    CommonToneCrawler::new(template, &spacing.spacing, sequence, &config.progression).crawl()
}

/// All stages in order. Writes the report when `config.output` is set.
pub fn run(config: &RunConfig) -> Result<RunReport, RunError> {
    let harmonizations_checked = validate_tables()?;
    let template = config.template()?;
    let sequence = config.sequence_for(&template)?;
    let spacing = optimize(config, &template)?;
    let labels = label_winners(&spacing)?;
    let progression = progression(config, &template, &spacing, &sequence)?;
    let crawl = if config.crawl_common_tones {
        Some(crawl(config, &template, &spacing, &sequence)?)
    } else {
        None
    };
    let report = RunReport {
        harmonizations_checked,
        spacing,
        labels,
        progression,
        crawl,
    };
    if let Some(path) = &config.output {
        report.write_json(path)?;
    }
    Ok(report)
}
