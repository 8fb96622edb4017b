// Common-tone crawler: which per-place digit remapping keeps the most tones
// in common between neighbouring chords?
//
// Every place's digits can be remapped by any permutation of `0..radix`
// (a tone map). The crawler walks every combination of per-place
// permutations, one recursion level per place, rebuilds the progression
// under each combination and records its total common-tone count (the sum,
// over the cycle, of scale tones each chord shares with the next).
//
// The combination count is the product of `radix!` over the places, so
// this is only practical for small templates (a {4,4,4} template has
// 24^3 = 13824 combinations).

use crate::harmony::HarmonyResolver;
use crate::progression::{DigitSequence, ProgressionOptions, build_with};
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{MixedRadixDigits, SetError};

/// Advance `items` to the next lexicographic permutation. Returns false
/// (leaving `items` sorted ascending) after the last permutation.
pub fn next_permutation(items: &mut [u8]) -> bool {
    let n = items.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && items[i - 1] >= items[i] {
        i -= 1;
    }
    if i == 0 {
        items.reverse();
        return false;
    }
    let mut j = n - 1;
    while items[j] <= items[i - 1] {
        j -= 1;
    }
    items.swap(i - 1, j);
    items[i..].reverse();
    true
}

/// All permutations of `0..n` in lexicographic order.
pub fn permutations(n: u8) -> Vec<Vec<u8>> {
    let mut current: Vec<u8> = (0..n).collect();
    let mut all = vec![current.clone()];
    while next_permutation(&mut current) {
        all.push(current.clone());
    }
    all
}

/// One visited combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlEntry {
    pub ordinal: u32,
    pub common_tones: u32,
    pub tone_map: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlReport {
    pub entries: Vec<CrawlEntry>,
    pub min_common: u32,
    pub max_common: u32,
}

impl CrawlReport {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// First combination reaching the maximum.
    pub fn best(&self) -> Option<&CrawlEntry> {
        self.entries.iter().find(|e| e.common_tones == self.max_common)
    }

    pub fn summary(&self) -> String {
        format!(
            "common perms = {}, min {}, max {}",
            self.count(),
            self.min_common,
            self.max_common
        )
    }
}

pub struct CommonToneCrawler<'a> {
    template: &'a MixedRadixDigits,
    spacing: &'a [u8],
    sequence: &'a DigitSequence,
    /// Traversal options; any tone map here is replaced per combination.
    options: ProgressionOptions,
    per_place: Vec<Vec<Vec<u8>>>,
    resolver: HarmonyResolver,
}

impl<'a> CommonToneCrawler<'a> {
    pub fn new(
        template: &'a MixedRadixDigits,
        spacing: &'a [u8],
        sequence: &'a DigitSequence,
        options: &ProgressionOptions,
    ) -> Self {
        let per_place = template.radices().iter().map(|&r| permutations(r)).collect();
        CommonToneCrawler {
            template,
            spacing,
            sequence,
            options: options.clone(),
            per_place,
            resolver: HarmonyResolver::new(),
        }
    }

    /// Number of tone-map combinations the crawl will visit.
    pub fn combination_count(&self) -> u64 {
        self.per_place
            .iter()
            .fold(1u64, |acc, perms| acc.saturating_mul(perms.len() as u64))
    }

    pub fn crawl(&self) -> Result<CrawlReport, SetError> {
        let mut report = CrawlReport {
            entries: Vec::new(),
            min_common: u32::MAX,
            max_common: 0,
        };
        let mut chosen = Vec::with_capacity(self.per_place.len());
        self.descend(0, &mut chosen, &mut report)?;
        log::info!("{}", report.summary());
        Ok(report)
    }

    fn descend(
        &self,
        depth: usize,
        chosen: &mut Vec<Vec<u8>>,
        report: &mut CrawlReport,
    ) -> Result<(), SetError> {
        for perm in &self.per_place[depth] {
            chosen.push(perm.clone());
            if depth + 1 < self.per_place.len() {
                self.descend(depth + 1, chosen, report)?;
            } else {
                self.visit(chosen, report)?;
            }
            chosen.pop();
        }
        Ok(())
    }

    fn visit(&self, tone_map: &[Vec<u8>], report: &mut CrawlReport) -> Result<(), SetError> {
        let options = ProgressionOptions {
            tone_map: Some(tone_map.to_vec()),
            ..self.options.clone()
        };
        let progression = build_with(
            &self.resolver,
            self.template,
            self.spacing,
            self.sequence,
            &options,
        )?;
        let common = progression.total_common_tones;
        let ordinal = report.entries.len() as u32;
        log::debug!("perm {ordinal}: {common} common tones, map {tone_map:?}");
        report.min_common = report.min_common.min(common);
        report.max_common = report.max_common.max(common);
        report.entries.push(CrawlEntry {
            ordinal,
            common_tones: common,
            tone_map: tone_map.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_permutation_order() {
        let mut items = vec![0, 1, 2];
        let mut seen = vec![items.clone()];
        while next_permutation(&mut items) {
            seen.push(items.clone());
        }
        assert_eq!(
            seen,
            vec![
                vec![0, 1, 2],
                vec![0, 2, 1],
                vec![1, 0, 2],
                vec![1, 2, 0],
                vec![2, 0, 1],
                vec![2, 1, 0],
            ]
        );
        assert_eq!(items, vec![0, 1, 2]);
    }

    #[test]
    fn test_permutation_counts() {
        assert_eq!(permutations(1), vec![vec![0]]);
        assert_eq!(permutations(4).len(), 24);
        assert_eq!(permutations(5).len(), 120);
    }

    #[test]
    fn test_crawl_small_template() {
        // Bands {0,1} {4,5} {8,9}: every chord is a triad of class 3-11 or
        // 3-12, so each tone map yields a resolvable progression.
        let template = MixedRadixDigits::allocate(&[2, 2, 2]).unwrap();
        let sequence = DigitSequence::from_template(&template);
        let spacing = [2, 2, 2];
        let crawler =
            CommonToneCrawler::new(&template, &spacing, &sequence, &ProgressionOptions::default());
        assert_eq!(crawler.combination_count(), 8);
        let report = crawler.crawl().unwrap();
        assert_eq!(report.count(), 8);
        assert!(report.min_common <= report.max_common);
        assert_eq!(report.entries[0].tone_map, vec![vec![0, 1]; 3]);
        assert_eq!(report.entries[1].tone_map, vec![vec![0, 1], vec![0, 1], vec![1, 0]]);
        assert_eq!(report.entries[7].tone_map, vec![vec![1, 0]; 3]);
        assert!(report.entries.iter().enumerate().all(|(i, e)| e.ordinal == i as u32));
        let best = report.best().unwrap();
        assert_eq!(best.common_tones, report.max_common);
        assert!(report.summary().starts_with("common perms = 8"));
    }

    #[test]
    fn test_crawl_matches_direct_build() {
        let template = MixedRadixDigits::allocate(&[4, 4, 4]).unwrap();
        let sequence = DigitSequence::from_template(&template);
        let spacing = [0, 0, 0];
        let options = ProgressionOptions::default();
        let crawler = CommonToneCrawler::new(&template, &spacing, &sequence, &options);
        assert_eq!(crawler.combination_count(), 24 * 24 * 24);

        // The identity map is the first combination and must agree with a
        // plain build.
        let identity = vec![vec![0, 1, 2, 3]; 3];
        let mut report = CrawlReport {
            entries: Vec::new(),
            min_common: u32::MAX,
            max_common: 0,
        };
        crawler.visit(&identity, &mut report).unwrap();
        let plain =
            crate::progression::build_progression(&template, &spacing, &sequence, &options)
                .unwrap();
        assert_eq!(report.entries[0].common_tones, plain.total_common_tones);
        assert_eq!(report.min_common, report.max_common);
    }
}
