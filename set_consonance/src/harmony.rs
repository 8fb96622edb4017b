// Harmony resolution: from a concrete pitch-class set to a named chord.
//
// Given a set such as {7, 11, 2, 5}, find which alias entry describes its
// class, which of the entry's two recipes spells it (the prime form or its
// mirror image), and the transposition that moves the recipe onto the actual
// pitches. From that we get the sounding key, the chord root and a name
// ("G7").
//
// The search tries the prime form at all 12 transpositions first, then the
// inverted prime form. Transpositions are tried in ascending order and the
// first match wins, so symmetric classes (which match in several places)
// resolve deterministically.
//
// `validate_harmonizations` checks the static alias table against the
// catalog: recipe 0 must spell the prime form exactly, and recipe 1 must
// spell the inverted prime form (up to order). The driver runs it before
// anything else, since a bad recipe would mislabel every chord downstream.

use crate::alias::{ALIASES, AliasEntry, HarmonicAliasTable, HarmonicRole, Harmonization};
use crate::scale::{Mode, ScaleType, note_name};
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{CATALOG, OCTAVE, PitchClassSet, ReferenceCatalog, SetError};

/// Which alias, recipe and transposition reproduce a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarmonyMatch {
    pub alias_index: usize,
    /// 0 = prime form recipe, 1 = inverted recipe.
    pub slot: usize,
    /// Semitones the recipe's reference set is shifted by.
    pub transposition: u8,
}

/// A fully resolved chord: the match plus the key, root and spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedChord {
    pub alias_index: usize,
    pub slot: usize,
    pub transposition: u8,
    pub catalog_index: usize,
    pub scale: ScaleType,
    pub mode: Mode,
    /// Key of the parent scale after transposition.
    pub key: u8,
    /// Sounding root: the mode root in the transposed scale.
    pub root: u8,
    pub role: Option<HarmonicRole>,
    /// Chord symbol without the root, e.g. `"-7"`.
    pub symbol: String,
}

impl ResolvedChord {
    /// Root name plus symbol, e.g. `"Gmaj7"`.
    pub fn name(&self) -> String {
        format!("{}{}", note_name(self.root), self.symbol)
    }
}

pub struct HarmonyResolver {
    catalog: &'static ReferenceCatalog,
    aliases: &'static HarmonicAliasTable,
}

impl Default for HarmonyResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl HarmonyResolver {
    pub fn new() -> Self {
        HarmonyResolver {
            catalog: &CATALOG,
            aliases: &ALIASES,
        }
    }

    pub fn aliases(&self) -> &'static HarmonicAliasTable {
        self.aliases
    }

    /// Catalog index and first alias entry of a set's class.
    pub fn classify(&self, set: &PitchClassSet) -> Result<(usize, usize), SetError> {
        let prime = set.prime_form();
        let catalog_index = self
            .catalog
            .find_id(prime.id)
            .ok_or_else(|| SetError::lookup(set, format!("prime form {} not in catalog", prime.id)))?;
        let alias_index = self.aliases.alias_index(catalog_index).ok_or_else(|| {
            SetError::lookup(
                set,
                format!("{} has no alias entry", self.code(catalog_index)),
            )
        })?;
        Ok((catalog_index, alias_index))
    }

    /// Find the alias entry, recipe slot and transposition that spell `set`.
    pub fn find_harmony(&self, set: &PitchClassSet) -> Result<HarmonyMatch, SetError> {
        self.search(set).map(|(found, _)| found)
    }

    /// Resolve a set to its key, root and chord name.
    pub fn resolve(&self, set: &PitchClassSet) -> Result<ResolvedChord, SetError> {
        let (found, catalog_index) = self.search(set)?;
        let entry = &self.aliases.entries()[found.alias_index];
        let harm = entry
            .harmonization(found.slot)
            .ok_or_else(|| SetError::lookup(set, "harmonization slot vanished"))?;
        Ok(Self::resolve_match(found, catalog_index, entry, harm))
    }

    fn search(&self, set: &PitchClassSet) -> Result<(HarmonyMatch, usize), SetError> {
        let (catalog_index, alias_index) = self.classify(set)?;
        let entry = &self.aliases.entries()[alias_index];
        let code = self.code(catalog_index);
        if entry.harmonization(0).is_none() {
            return Err(SetError::lookup(
                set,
                format!("{code} ({}) has no harmonization", entry.symbol),
            ));
        }

        let mut target = set.clone();
        target.normalize();
        target.sort();
        target.remove_duplicates();

        let prime_id = self.catalog.entries()[catalog_index].id;
        let mut reference = PitchClassSet::from_id(prime_id)?;
        for slot in 0..2 {
            if slot == 1 {
                reference.invert();
            }
            let found = (0..OCTAVE).find(|&t| target.equivalent(&reference, t as i32));
            if let Some(transposition) = found {
                if entry.harmonization(slot).is_none() {
                    return Err(SetError::lookup(
                        set,
                        format!("{code} appears inverted but has no inverted harmonization"),
                    ));
                }
                let found = HarmonyMatch {
                    alias_index,
                    slot,
                    transposition,
                };
                return Ok((found, catalog_index));
            }
        }
        Err(SetError::lookup(
            set,
            format!("no transposition of {code} matches"),
        ))
    }

    fn resolve_match(
        found: HarmonyMatch,
        catalog_index: usize,
        entry: &AliasEntry,
        harm: &Harmonization,
    ) -> ResolvedChord {
        let scale = harm.instance(found.transposition);
        ResolvedChord {
            alias_index: found.alias_index,
            slot: found.slot,
            transposition: found.transposition,
            catalog_index,
            scale: harm.scale,
            mode: harm.mode,
            key: scale.key,
            root: scale.mode_root(harm.mode),
            role: entry.role,
            symbol: harm.symbol.unwrap_or(entry.symbol).to_string(),
        }
    }

    /// Check every recipe in the alias table against the catalog. Returns
    /// the number of recipes checked, or the first failure (all failures are
    /// logged).
    pub fn validate_harmonizations(&self) -> Result<usize, SetError> {
        let mut checked = 0;
        let mut first_failure = None;
        for entry in self.aliases.entries() {
            if let Err(e) = self.validate_entry(entry, &mut checked) {
                log::warn!("harmonization check failed: {e}");
                first_failure.get_or_insert(e);
            }
        }
        match first_failure {
            Some(e) => Err(e),
            None => {
                log::info!("{checked} harmonizations validated");
                Ok(checked)
            }
        }
    }

    fn validate_entry(&self, entry: &AliasEntry, checked: &mut usize) -> Result<(), SetError> {
        let catalog_index = entry.catalog_index().ok_or_else(|| {
            SetError::lookup(entry.code, "alias code not in catalog")
        })?;
        let prime = PitchClassSet::from_id(self.catalog.entries()[catalog_index].id)?;
        if let Some(harm) = entry.harmonization(0) {
            let tones = PitchClassSet::from_pitches(&harm.chord_tones())?;
            if tones != prime {
                return Err(SetError::lookup(
                    &tones,
                    format!("{} recipe 0 does not spell prime form {prime}", entry.code),
                ));
            }
            *checked += 1;
        }
        if let Some(harm) = entry.harmonization(1) {
            let mut inverted = prime.clone();
            inverted.invert();
            let tones = PitchClassSet::from_pitches(&harm.chord_tones())?;
            if !inverted.equivalent(&tones, 0) {
                return Err(SetError::lookup(
                    &tones,
                    format!("{} recipe 1 does not spell inversion {inverted}", entry.code),
                ));
            }
            *checked += 1;
        }
        Ok(())
    }

    fn code(&self, catalog_index: usize) -> &'static str {
        self.catalog.code(catalog_index).unwrap_or("?")
    }
}
