// Spacing optimizer: lay a digit structure out in the octave so that as
// many of its chords as possible are consonant.
//
// A structural template such as radices [2, 2, 3, 2] describes four groups
// of tones (2, 2, 3 and 2 wide) that together occupy 9 of the 12 pitch
// classes. The remaining 3 semitones can be distributed as gaps after each
// group; each distribution is a *spacing*. For each spacing, every digit
// assignment of the template (every permutation) sounds one chord: place
// `i` plays `digit[i] + offset`, with the offset advancing by
// `radix[i] + spacing[i]` per place.
//
// Every chord is classified (prime form -> catalog index -> alias entry ->
// harmonic role) and the spacing's score counts tonic and subdominant
// chords. The best spacing has the most tonics, ties broken by the most
// subdominants, further ties by enumeration order (first seen wins). The
// first spacing that fits seeds the best result, so a run always returns
// something when any spacing fits.
//
// Optional behaviours:
// - Duplicate suppression: a spacing whose sorted list of catalog indices
//   matches an earlier spacing's is skipped (it relabels the same chords)
//   and does not consume an ordinal.
// - Forced selection: the spacing with the given ordinal among accepted
//   (non-duplicate) spacings wins outright and the scan stops there.
//
// An unclassifiable chord aborts the run with a `LookupFailure` naming the
// spacing and permutation, since it means the alias table has a gap.
//
// `search_parallel` scores all fitting spacings on the rayon pool and then
// runs the same ordered selection as `search` over the results, so both
// return identical results (including which error surfaces first).
//
// See also: `set_consonance_pcs::digits` for pack/unpack and the spaced
// layout, `harmony.rs` for classification.

use crate::alias::HarmonicRole;
use crate::harmony::HarmonyResolver;
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{CATALOG, MixedRadixDigits, OCTAVE, PitchClassSet, SetError};
use std::fmt;

/// Knobs for a spacing search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingOptions {
    /// Select the accepted spacing with this ordinal regardless of score.
    pub forced_selection: Option<u32>,
    /// Skip spacings that produce the same multiset of set classes as an
    /// earlier spacing.
    pub skip_duplicates: bool,
}

/// Tonic and subdominant chord counts for one spacing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingScore {
    pub tonic: u32,
    pub subdominant: u32,
}

impl SpacingScore {
    /// The preference rule: more tonics, then more subdominants.
    pub fn beats(&self, other: &SpacingScore) -> bool {
        self.tonic > other.tonic
            || (self.tonic == other.tonic && self.subdominant > other.subdominant)
    }

    fn tally(&mut self, role: Option<HarmonicRole>) {
        match role {
            Some(HarmonicRole::Tonic) => self.tonic += 1,
            Some(HarmonicRole::Subdominant) => self.subdominant += 1,
            _ => {}
        }
    }
}

impl fmt::Display for SpacingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T={} S={}", self.tonic, self.subdominant)
    }
}

/// One permutation of the template under a spacing, with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacedPermutation {
    /// Packed structural digits.
    pub packed: u32,
    pub digits: Vec<u8>,
    /// Sounding pitch classes, one per place.
    pub tones: Vec<u8>,
    pub catalog_index: usize,
    pub alias_index: usize,
    pub role: Option<HarmonicRole>,
}

impl SpacedPermutation {
    /// Catalog code of the chord's set class.
    pub fn code(&self) -> &'static str {
        CATALOG.code(self.catalog_index).unwrap_or("?")
    }
}

/// A spacing with every permutation classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredSpacing {
    pub spacing: MixedRadixDigits,
    pub score: SpacingScore,
    /// Sorted catalog indices of all permutations: the duplicate key.
    pub key: Vec<usize>,
    pub permutations: Vec<SpacedPermutation>,
}

/// One line of the scan trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Ordinal among accepted spacings; None for skipped duplicates.
    pub ordinal: Option<u32>,
    pub spacing: Vec<u8>,
    pub score: SpacingScore,
    /// Best score after this spacing was considered.
    pub best: SpacingScore,
}

impl ScanEntry {
    pub fn is_duplicate(&self) -> bool {
        self.ordinal.is_none()
    }
}

/// Outcome of a spacing search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpacingResult {
    pub template: Vec<u8>,
    pub spacing: Vec<u8>,
    pub score: SpacingScore,
    /// Ordinal of the winning spacing among accepted spacings.
    pub ordinal: u32,
    /// True when the winner came from `forced_selection`.
    pub forced: bool,
    /// Spacings that fit the octave and were reached by the scan.
    pub considered: u32,
    /// Spacings scored (considered minus duplicates).
    pub accepted: u32,
    pub duplicates: u32,
    /// Every permutation of the template under the winning spacing.
    pub permutations: Vec<SpacedPermutation>,
    pub scan: Vec<ScanEntry>,
}

pub struct SpacingOptimizer {
    template: MixedRadixDigits,
    spacing_template: MixedRadixDigits,
    options: SpacingOptions,
    resolver: HarmonyResolver,
}

impl SpacingOptimizer {
    /// Prepare a search. Fails when the template's groups do not fit in the
    /// octave even with no gaps.
    pub fn new(template: MixedRadixDigits, options: SpacingOptions) -> Result<Self, SetError> {
        let range_sum = template.range_sum();
        let octave = OCTAVE as u32;
        if range_sum > octave {
            return Err(SetError::ConstraintUnsatisfiable { range_sum, octave });
        }
        let gap_radix = (octave - range_sum + 1) as u8;
        let spacing_template = MixedRadixDigits::allocate(&vec![gap_radix; template.places()])?;
        Ok(SpacingOptimizer {
            template,
            spacing_template,
            options,
            resolver: HarmonyResolver::new(),
        })
    }

    pub fn template(&self) -> &MixedRadixDigits {
        &self.template
    }

    pub fn options(&self) -> &SpacingOptions {
        &self.options
    }

    /// Semitones left over for gaps between groups.
    pub fn space_available(&self) -> u32 {
        OCTAVE as u32 - self.template.range_sum()
    }

    /// One digit per place, each with radix `space_available() + 1`.
    pub fn spacing_template(&self) -> &MixedRadixDigits {
        &self.spacing_template
    }

    /// Spacings whose gaps fit the octave, in enumeration order.
    pub fn fitting_spacings(&self) -> impl Iterator<Item = MixedRadixDigits> + '_ {
        let limit = self.space_available();
        self.spacing_template
            .enumerate_all()
            .filter(move |spacing| spacing.digit_sum() <= limit)
    }

    /// Classify every permutation of the template under `spacing`.
    pub fn score_spacing(&self, spacing: &MixedRadixDigits) -> Result<ScoredSpacing, SetError> {
        let mut score = SpacingScore::default();
        let mut permutations = Vec::with_capacity(self.template.permutation_count() as usize);
        for digits in self.template.enumerate_all() {
            let tones = digits.spaced(spacing.digits())?;
            let set = PitchClassSet::from_pitches(tones.as_slice())?;
            let (catalog_index, alias_index) = self
                .resolver
                .classify(&set)
                .map_err(|e| in_context(e, spacing, &digits))?;
            let role = self
                .resolver
                .aliases()
                .get(alias_index)
                .and_then(|entry| entry.role);
            score.tally(role);
            permutations.push(SpacedPermutation {
                packed: digits.pack(),
                digits: digits.digits().to_vec(),
                tones: tones.as_slice().to_vec(),
                catalog_index,
                alias_index,
                role,
            });
        }
        let mut key: Vec<usize> = permutations.iter().map(|p| p.catalog_index).collect();
        key.sort_unstable();
        Ok(ScoredSpacing {
            spacing: spacing.clone(),
            score,
            key,
            permutations,
        })
    }

    /// Scan spacings in order and select the best.
    pub fn search(&self) -> Result<SpacingResult, SetError> {
        self.select(self.fitting_spacings().map(|spacing| self.score_spacing(&spacing)))
    }

    /// Score spacings in parallel, then select exactly as `search` does.
    pub fn search_parallel(&self) -> Result<SpacingResult, SetError> {
        let spacings: Vec<MixedRadixDigits> = self.fitting_spacings().collect();
        let scored: Vec<Result<ScoredSpacing, SetError>> = spacings
            .par_iter()
            .map(|spacing| self.score_spacing(spacing))
            .collect();
        self.select(scored.into_iter())
    }

    fn select(
        &self,
        scored: impl Iterator<Item = Result<ScoredSpacing, SetError>>,
    ) -> Result<SpacingResult, SetError> {
        let forced = self.options.forced_selection;
        let mut seen: FxHashSet<Vec<usize>> = FxHashSet::default();
        let mut best: Option<(u32, ScoredSpacing)> = None;
        let mut considered = 0u32;
        let mut accepted = 0u32;
        let mut duplicates = 0u32;
        let mut forced_hit = false;
        let mut scan = Vec::new();

        for candidate in scored {
            let candidate = candidate?;
            considered += 1;
            let spacing = candidate.spacing.digits().to_vec();
            let score = candidate.score;
            let best_score = |best: &Option<(u32, ScoredSpacing)>| {
                best.as_ref().map(|(_, b)| b.score).unwrap_or_default()
            };

            if self.options.skip_duplicates && !seen.insert(candidate.key.clone()) {
                duplicates += 1;
                log::debug!("  dup  {} {score}", candidate.spacing.format_digits());
                scan.push(ScanEntry {
                    ordinal: None,
                    spacing,
                    score,
                    best: best_score(&best),
                });
                continue;
            }

            let ordinal = accepted;
            accepted += 1;
            let hit = forced == Some(ordinal);
            let better = match &best {
                None => true,
                Some((_, b)) => score.beats(&b.score),
            };
            let label = candidate.spacing.format_digits();
            if hit || better {
                best = Some((ordinal, candidate));
            }
            let now = best_score(&best);
            log::debug!("{ordinal:>5} {label} {score} (best {now})");
            scan.push(ScanEntry {
                ordinal: Some(ordinal),
                spacing,
                score,
                best: now,
            });
            if hit {
                forced_hit = true;
                break;
            }
        }

        if let Some(index) = forced {
            if !forced_hit {
                return Err(SetError::InvalidInput(format!(
                    "forced spacing {index} requested but only {accepted} spacings were accepted"
                )));
            }
        }
        let (ordinal, winner) = best.ok_or(SetError::ConstraintUnsatisfiable {
            range_sum: self.template.range_sum(),
            octave: OCTAVE as u32,
        })?;
        log::info!(
            "template {}: spacing {} wins with {} ({} accepted, {} duplicates)",
            self.template,
            winner.spacing.format_digits(),
            winner.score,
            accepted,
            duplicates
        );
        Ok(SpacingResult {
            template: self.template.radices().to_vec(),
            spacing: winner.spacing.digits().to_vec(),
            score: winner.score,
            ordinal,
            forced: forced_hit,
            considered,
            accepted,
            duplicates,
            permutations: winner.permutations,
            scan,
        })
    }
}

fn in_context(err: SetError, spacing: &MixedRadixDigits, digits: &MixedRadixDigits) -> SetError {
    match err {
        SetError::LookupFailure { set, reason } => SetError::LookupFailure {
            set,
            reason: format!(
                "spacing {} permutation {} (#{}): {reason}",
                spacing.format_digits(),
                digits.format_digits(),
                digits.pack()
            ),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn optimizer(radices: &[u8], options: SpacingOptions) -> SpacingOptimizer {
        SpacingOptimizer::new(MixedRadixDigits::allocate(radices).unwrap(), options).unwrap()
    }

    fn search(radices: &[u8]) -> SpacingResult {
        optimizer(radices, SpacingOptions::default()).search().unwrap()
    }

    fn dedup_search(radices: &[u8]) -> SpacingResult {
        let options = SpacingOptions {
            skip_duplicates: true,
            ..Default::default()
        };
        optimizer(radices, options).search().unwrap()
    }

    #[test]
    fn test_augmented_template_has_one_spacing() {
        let result = search(&[4, 4, 4]);
        assert_eq!(result.accepted, 1);
        assert_eq!(result.spacing, vec![0, 0, 0]);
        assert_eq!(result.score, SpacingScore { tonic: 24, subdominant: 12 });
        assert_eq!(result.permutations.len(), 64);
    }

    #[test]
    fn test_full_octave_template() {
        let result = search(&[3, 4, 5]);
        assert_eq!(result.accepted, 1);
        assert_eq!(result.score, SpacingScore { tonic: 21, subdominant: 12 });
    }

    #[test]
    fn test_known_winners() {
        let cases: [(&[u8], (u32, u32), &[u8], u32, u32); 8] = [
            (&[2, 2, 3, 2], (5, 3), &[1, 0, 0, 0], 35, 10),
            (&[3, 2, 3, 2], (6, 6), &[1, 0, 0, 0], 15, 4),
            (&[2, 3, 3, 2], (7, 5), &[1, 0, 0, 0], 15, 7),
            (&[2, 2, 2, 2], (4, 0), &[1, 1, 1, 0], 70, 8),
            (&[2, 2, 2], (6, 0), &[2, 2, 0], 84, 7),
            (&[3, 3, 3], (12, 3), &[1, 1, 0], 20, 3),
            (&[4, 3, 4], (18, 9), &[1, 0, 0], 4, 2),
            (&[2, 2, 2, 2, 2], (12, 0), &[0, 1, 0, 0, 0], 21, 3),
        ];
        for (radices, (tonic, subdominant), spacing, accepted, deduped) in cases {
            let result = search(radices);
            assert_eq!(result.score, SpacingScore { tonic, subdominant }, "{radices:?}");
            assert_eq!(result.spacing, spacing, "{radices:?}");
            assert_eq!(result.accepted, accepted, "{radices:?}");

            let result = dedup_search(radices);
            assert_eq!(result.accepted, deduped, "{radices:?}");
            assert_eq!(result.spacing, spacing, "{radices:?}");
            assert_eq!(result.considered, accepted, "{radices:?}");
        }
    }

    #[test]
    fn test_only_fitting_spacings_are_scanned() {
        let opt = optimizer(&[2, 2, 3, 2], SpacingOptions::default());
        assert_eq!(opt.space_available(), 3);
        assert_eq!(opt.spacing_template().radices(), &[4, 4, 4, 4]);
        let result = opt.search().unwrap();
        for entry in &result.scan {
            let gaps: u32 = entry.spacing.iter().map(|&g| g as u32).sum();
            assert!(gaps <= 3, "{:?}", entry.spacing);
        }
        assert_eq!(result.scan.len(), 35);
    }

    #[test]
    fn test_best_score_never_regresses() {
        let result = search(&[2, 2, 3, 2]);
        for pair in result.scan.windows(2) {
            assert!(!pair[0].best.beats(&pair[1].best));
        }
        assert_eq!(result.scan.last().map(|e| e.best), Some(result.score));
    }

    #[test]
    fn test_dedup_never_scores_more() {
        for radices in [&[2u8, 2, 2][..], &[3, 3, 3], &[2, 3, 2, 3]] {
            let plain = search(radices);
            let deduped = dedup_search(radices);
            assert!(deduped.accepted <= plain.accepted);
            assert_eq!(deduped.accepted + deduped.duplicates, deduped.considered);
            assert_eq!(deduped.score, plain.score);
        }
    }

    #[test]
    fn test_forced_selection() {
        let options = SpacingOptions {
            forced_selection: Some(0),
            skip_duplicates: false,
        };
        let result = optimizer(&[2, 2, 3, 2], options).search().unwrap();
        assert!(result.forced);
        assert_eq!(result.ordinal, 0);
        assert_eq!(result.spacing, vec![0, 0, 0, 0]);
        assert_eq!(result.scan.len(), 1);

        let options = SpacingOptions {
            forced_selection: Some(34),
            skip_duplicates: false,
        };
        let result = optimizer(&[2, 2, 3, 2], options).search().unwrap();
        assert_eq!(result.ordinal, 34);
        assert_eq!(result.accepted, 35);
    }

    #[test]
    fn test_forced_selection_past_end() {
        let options = SpacingOptions {
            forced_selection: Some(35),
            skip_duplicates: false,
        };
        let err = optimizer(&[2, 2, 3, 2], options).search().unwrap_err();
        assert!(matches!(err, SetError::InvalidInput(_)), "{err}");

        let options = SpacingOptions {
            forced_selection: Some(10),
            skip_duplicates: true,
        };
        let err = optimizer(&[2, 2, 3, 2], options).search().unwrap_err();
        assert!(matches!(err, SetError::InvalidInput(_)), "{err}");
    }

    #[test]
    fn test_template_too_wide() {
        let template = MixedRadixDigits::allocate(&[5, 5, 3]).unwrap();
        assert_eq!(
            SpacingOptimizer::new(template, SpacingOptions::default()).err(),
            Some(SetError::ConstraintUnsatisfiable {
                range_sum: 13,
                octave: 12
            })
        );
    }

    #[test]
    fn test_unclassifiable_chord_aborts() {
        let err = optimizer(&[3, 1, 3], SpacingOptions::default())
            .search()
            .unwrap_err();
        match err {
            SetError::LookupFailure { set, reason } => {
                assert_eq!(set, "[2,3,4]");
                assert!(reason.contains("3-1"), "{reason}");
                assert!(reason.contains("spacing (0,0,0)"), "{reason}");
            }
            other => panic!("expected lookup failure, got {other}"),
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for radices in [&[2u8, 2, 3, 2][..], &[2, 2, 2], &[4, 3, 4]] {
            for skip_duplicates in [false, true] {
                let opt = optimizer(
                    radices,
                    SpacingOptions {
                        forced_selection: None,
                        skip_duplicates,
                    },
                );
                assert_eq!(opt.search().unwrap(), opt.search_parallel().unwrap());
            }
        }
        let opt = optimizer(&[3, 1, 3], SpacingOptions::default());
        assert_eq!(opt.search().unwrap_err(), opt.search_parallel().unwrap_err());
    }

    #[test]
    fn test_permutations_are_tagged() {
        let result = search(&[4, 4, 4]);
        let first = &result.permutations[0];
        assert_eq!(first.tones, vec![0, 4, 8]);
        assert_eq!(first.code(), "3-12");
        assert_eq!(first.role, Some(HarmonicRole::Dominant));
        let tonics = result
            .permutations
            .iter()
            .filter(|p| p.role == Some(HarmonicRole::Tonic))
            .count();
        assert_eq!(tonics, 24);
    }
}
