// Harmonic alias table: what each set class means as a chord.
//
// The reference catalog (see `set_consonance_pcs::catalog`) only names set
// classes. This table attaches musical meaning to the ones that matter:
// a harmonic role (tonic, subdominant, dominant) that the spacing optimizer
// scores, a display symbol, and up to two harmonization recipes. Recipe 0
// spells the catalog's prime form; recipe 1 spells its mirror image, so a
// chiral class can be named whichever way up it appears.
//
// A recipe is (key, scale, mode, degrees): degrees are 1-based positions
// counted from the mode root, so `h(F, MAJ, MIX, &[1, 3, 5, 7])` is C7. The
// optional override symbol replaces the entry's symbol for that recipe.
//
// Some entries are scale labels (7-35 "major", ...): no role and no recipes.
// A catalog class may appear more than once (6-35 is both a chord and the
// whole-tone scale); lookups by catalog index take the first entry.
//
// See also: harmony.rs, which resolves concrete sets against these recipes.

use crate::scale::{Mode, ScaleInstance, ScaleType};
use serde::{Deserialize, Serialize};
use set_consonance_pcs::CATALOG;
use set_consonance_pcs::catalog::PRIME_FORMS;
use std::fmt;
use std::sync::LazyLock;

/// Coarse harmonic function of a chord class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HarmonicRole {
    Tonic,
    Subdominant,
    Dominant,
}

impl fmt::Display for HarmonicRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HarmonicRole::Tonic => "tonic",
            HarmonicRole::Subdominant => "subdominant",
            HarmonicRole::Dominant => "dominant",
        })
    }
}

/// One way of spelling a chord class as degrees of a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Harmonization {
    /// Key of the parent scale, before any transposition.
    pub key: u8,
    pub scale: ScaleType,
    pub mode: Mode,
    /// 1-based degrees from the mode root.
    pub tones: &'static [u8],
    /// Replaces the alias symbol when present.
    pub symbol: Option<&'static str>,
}

impl Harmonization {
    /// The parent scale shifted up by `transposition` semitones.
    pub fn instance(&self, transposition: u8) -> ScaleInstance {
        ScaleInstance::new(self.scale, (self.key + transposition) % 12)
    }

    /// Pitch classes the recipe spells in its stored key, sorted.
    pub fn chord_tones(&self) -> Vec<u8> {
        let scale = self.instance(0);
        let mut tones: Vec<u8> = self
            .tones
            .iter()
            .map(|&position| scale.mode_degree(self.mode, position))
            .collect();
        tones.sort_unstable();
        tones
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasEntry {
    /// Catalog code of the set class, e.g. `"4-27"`.
    pub code: &'static str,
    /// None for scale labels.
    pub role: Option<HarmonicRole>,
    pub symbol: &'static str,
    pub harmonizations: [Option<Harmonization>; 2],
}

impl AliasEntry {
    pub fn harmonization(&self, slot: usize) -> Option<&Harmonization> {
        self.harmonizations.get(slot).and_then(|h| h.as_ref())
    }

    pub fn is_scale_label(&self) -> bool {
        self.role.is_none()
    }

    pub fn catalog_index(&self) -> Option<usize> {
        CATALOG.find_code(self.code)
    }
}

const fn h(key: u8, scale: ScaleType, mode: Mode, tones: &'static [u8]) -> Harmonization {
    Harmonization {
        key,
        scale,
        mode,
        tones,
        symbol: None,
    }
}

const fn hs(
    key: u8,
    scale: ScaleType,
    mode: Mode,
    tones: &'static [u8],
    symbol: &'static str,
) -> Harmonization {
    Harmonization {
        key,
        scale,
        mode,
        tones,
        symbol: Some(symbol),
    }
}

const fn chord(
    code: &'static str,
    role: HarmonicRole,
    symbol: &'static str,
    first: Harmonization,
    second: Option<Harmonization>,
) -> AliasEntry {
    AliasEntry {
        code,
        role: Some(role),
        symbol,
        harmonizations: [Some(first), second],
    }
}

const fn label(code: &'static str, name: &'static str) -> AliasEntry {
    AliasEntry {
        code,
        role: None,
        symbol: name,
        harmonizations: [None, None],
    }
}

mod table {
    use super::{AliasEntry, chord, h, hs, label};
    use crate::alias::HarmonicRole::*;
    use crate::scale::{Mode, ScaleType};

    const C: u8 = 0;
    const DB: u8 = 1;
    const EB: u8 = 3;
    const E: u8 = 4;
    const F: u8 = 5;
    const GB: u8 = 6;
    const G: u8 = 7;
    const AB: u8 = 8;
    const A: u8 = 9;
    const BB: u8 = 10;

    const MAJ: ScaleType = ScaleType::Major;
    const MEL: ScaleType = ScaleType::MelodicMinor;
    const HMIN: ScaleType = ScaleType::HarmonicMinor;
    const HMAJ: ScaleType = ScaleType::HarmonicMajor;
    const ASYM: ScaleType = ScaleType::AsymmetricDiminished;
    const WHOLE: ScaleType = ScaleType::WholeTone;
    const HUNG: ScaleType = ScaleType::HungarianMajor;

    const ION: Mode = Mode::Ionian;
    const DOR: Mode = Mode::Dorian;
    const PHR: Mode = Mode::Phrygian;
    const LYD: Mode = Mode::Lydian;
    const MIX: Mode = Mode::Mixolydian;
    const AEO: Mode = Mode::Aeolian;
    const LOC: Mode = Mode::Locrian;

    pub(super) static ENTRIES: [AliasEntry; 80] = [
    chord("3-2", Subdominant, "-", h(AB, MAJ, DOR, &[2, 3, 4]), Some(h(G, MAJ, DOR, &[1, 2, 3]))),
    chord("3-3", Dominant, "7", h(DB, MEL, LOC, &[1, 2, 4]), Some(h(A, MEL, PHR, &[1, 5, 7]))),
    chord("3-4", Tonic, "", h(AB, MAJ, LYD, &[1, 3, 7]), Some(h(G, MAJ, LYD, &[1, 5, 7]))),
    chord("3-5", Dominant, "7", h(DB, MAJ, MIX, &[3, 4, 7]), Some(hs(G, MAJ, MIX, &[3, 6, 7], ""))),
    chord("3-6", Tonic, "", h(G, MAJ, LYD, &[1, 2, 3]), None),
    chord("3-7", Subdominant, "-", h(C, MAJ, DOR, &[1, 3, 7]), Some(h(F, MAJ, DOR, &[1, 3, 4]))),
    chord("3-8", Dominant, "7", h(G, MAJ, MIX, &[1, 3, 7]), Some(hs(DB, MAJ, LYD, &[1, 3, 4], ""))),
    chord("3-9", Subdominant, "sus", h(C, MAJ, MIX, &[1, 4, 5]), None),
    chord("3-10", Dominant, "dim", h(DB, MAJ, LOC, &[1, 3, 5]), None),
    chord(
        "3-11",
        Tonic,
        "min, maj",
        hs(BB, MAJ, DOR, &[1, 3, 5], "-"),
        Some(hs(C, MAJ, LYD, &[1, 3, 5], "")),
    ),
    chord("3-12", Dominant, "aug", h(A, MEL, PHR, &[1, 3, 5]), None),
    chord("4-3", Dominant, "-maj7", h(DB, MEL, ION, &[1, 2, 3, 7]), None),
    chord("4-7", Dominant, "maj7#9", h(F, HMIN, AEO, &[1, 2, 3, 7]), None),
    chord("4-8", Dominant, "maj7#4", h(DB, MAJ, LYD, &[1, 4, 5, 7]), None),
    chord("4-9", Dominant, "13#9", h(C, HUNG, ION, &[1, 2, 5, 6]), None),
    chord("4-10", Dominant, "-11", h(BB, MAJ, DOR, &[1, 2, 3, 4]), None),
    chord(
        "4-11",
        Dominant,
        "maj7#4",
        h(DB, MAJ, LYD, &[4, 5, 6, 7]),
        Some(hs(G, MAJ, LYD, &[1, 5, 6, 7], "maj7")),
    ),
    chord(
        "4-12",
        Dominant,
        "7#4",
        h(EB, MEL, LYD, &[3, 4, 5, 7]),
        Some(hs(G, MEL, MIX, &[3, 5, 6, 7], "7b13")),
    ),
    chord(
        "4-13",
        Dominant,
        "-6",
        h(DB, MAJ, DOR, &[1, 3, 6, 7]),
        Some(hs(G, MAJ, MIX, &[3, 5, 6, 7], "13")),
    ),
    chord(
        "4-14",
        Subdominant,
        "-add2",
        h(BB, MAJ, DOR, &[1, 2, 3, 5]),
        Some(hs(F, MAJ, LYD, &[1, 2, 5, 7], "maj9")),
    ),
    chord(
        "4-Z15",
        Dominant,
        "7#4",
        h(DB, MEL, LYD, &[1, 4, 5, 7]),
        Some(hs(A, MEL, LOC, &[1, 3, 4, 7], "7#9")),
    ),
    chord(
        "4-Z29",
        Dominant,
        "maj7#4",
        h(AB, MAJ, LYD, &[1, 2, 4, 7]),
        Some(hs(C, MAJ, MIX, &[2, 3, 4, 7], "9(4)")),
    ),
    chord(
        "4-16",
        Dominant,
        "13",
        h(AB, MAJ, MIX, &[2, 3, 6, 7]),
        Some(hs(C, MAJ, MIX, &[1, 3, 4, 7], "7(4)")),
    ),
    chord("4-17", Dominant, "13b9#4", h(E, HMIN, AEO, &[1, 2, 3, 5]), None),
    chord(
        "4-18",
        Dominant,
        "13b9",
        h(E, ASYM, LOC, &[2, 3, 6, 7]),
        Some(hs(C, HMIN, MIX, &[2, 3, 4, 7], "7b9(4)")),
    ),
    chord(
        "4-19",
        Dominant,
        "-maj7",
        h(DB, MEL, ION, &[1, 3, 5, 7]),
        Some(hs(A, MEL, PHR, &[1, 3, 5, 7], "maj7#5")),
    ),
    chord("4-20", Tonic, "maj7", h(AB, MAJ, LYD, &[1, 3, 5, 7]), None),
    chord("4-21", Dominant, "maj7#4", h(G, MAJ, LYD, &[1, 2, 3, 4]), None),
    chord(
        "4-22",
        Subdominant,
        "add2",
        h(G, MAJ, LYD, &[1, 2, 3, 5]),
        Some(hs(EB, MAJ, DOR, &[1, 3, 4, 5], "-add4")),
    ),
    chord("4-23", Subdominant, "sus7", h(C, MAJ, MIX, &[1, 4, 5, 7]), None),
    chord("4-24", Dominant, "+7", h(F, MEL, LOC, &[1, 4, 6, 7]), None),
    chord("4-25", Dominant, "+7", h(EB, MEL, LOC, &[1, 4, 5, 7]), None),
    chord("4-26", Tonic, "-7", h(EB, MAJ, DOR, &[1, 3, 5, 7]), None),
    chord(
        "4-27",
        Dominant,
        "-7b5",
        h(EB, MAJ, LOC, &[1, 3, 5, 7]),
        Some(hs(F, MAJ, MIX, &[1, 3, 5, 7], "7")),
    ),
    chord("4-28", Dominant, "o7", h(DB, HMIN, LOC, &[1, 3, 5, 7]), None),
    chord("5-Z12", Dominant, "-6", h(DB, MAJ, DOR, &[1, 2, 3, 6, 7]), None),
    chord(
        "5-16",
        Dominant,
        "o7",
        h(AB, HMAJ, DOR, &[2, 3, 4, 5, 6]),
        Some(hs(A, HMIN, AEO, &[1, 2, 3, 4, 5], "maj7#9")),
    ),
    chord("5-Z17", Dominant, "maj7#5", h(DB, MEL, PHR, &[1, 3, 5, 6, 7]), None),
    chord(
        "5-Z18",
        Dominant,
        "7b9",
        h(F, HMIN, MIX, &[1, 2, 3, 4, 5]),
        Some(hs(C, HMIN, LYD, &[1, 2, 3, 4, 5], "-7#11")),
    ),
    chord(
        "5-19",
        Dominant,
        "13#9",
        h(C, HUNG, PHR, &[1, 3, 4, 6, 7]),
        Some(hs(F, HUNG, DOR, &[1, 3, 4, 5, 7], "oM7")),
    ),
    chord(
        "5-20",
        Tonic,
        "maj7",
        h(DB, MAJ, LYD, &[1, 2, 4, 5, 7]),
        Some(hs(G, MAJ, LYD, &[1, 3, 4, 5, 7], "maj7")),
    ),
    chord(
        "5-21",
        Dominant,
        "-maj7",
        h(F, HMIN, ION, &[1, 3, 5, 6, 7]),
        Some(hs(C, HMAJ, ION, &[1, 3, 5, 6, 7], "maj7(b6)")),
    ),
    chord("5-22", Dominant, "-maj7", h(F, HMIN, ION, &[2, 3, 5, 6, 7]), None),
    chord(
        "5-23",
        Subdominant,
        "-7",
        h(BB, MAJ, DOR, &[1, 2, 3, 4, 5]),
        Some(hs(F, MAJ, LYD, &[1, 2, 5, 6, 7], "maj7")),
    ),
    chord(
        "5-24",
        Tonic,
        "maj7",
        h(AB, MAJ, LYD, &[1, 2, 3, 4, 7]),
        Some(hs(C, MAJ, LYD, &[1, 2, 3, 4, 5], "maj7")),
    ),
    chord(
        "5-25",
        Dominant,
        "-6",
        h(EB, MAJ, DOR, &[1, 3, 5, 6, 7]),
        Some(hs(F, MAJ, MIX, &[1, 3, 5, 6, 7], "13")),
    ),
    chord(
        "5-26",
        Dominant,
        "7b9",
        h(F, MEL, LOC, &[1, 2, 4, 6, 7]),
        Some(hs(F, MEL, PHR, &[1, 2, 3, 5, 7], "maj7#5")),
    ),
    chord(
        "5-27",
        Tonic,
        "maj7",
        h(AB, MAJ, LYD, &[1, 2, 3, 5, 7]),
        Some(hs(C, MAJ, LYD, &[2, 3, 4, 5, 7], "maj7")),
    ),
    chord(
        "5-28",
        Dominant,
        "7#4",
        h(EB, MEL, LYD, &[1, 3, 4, 5, 7]),
        Some(hs(G, MEL, LYD, &[1, 3, 4, 6, 7], "7#4")),
    ),
    chord(
        "5-29",
        Dominant,
        "7",
        h(DB, MAJ, MIX, &[1, 3, 4, 5, 7]),
        Some(hs(G, MAJ, MIX, &[2, 3, 5, 6, 7], "13")),
    ),
    chord(
        "5-30",
        Dominant,
        "7#4",
        h(DB, MEL, LYD, &[1, 2, 4, 5, 7]),
        Some(hs(A, MEL, LYD, &[2, 4, 4, 6, 7], "7#4")),
    ),
    chord(
        "5-31",
        Dominant,
        "7b9",
        h(BB, HMIN, MIX, &[2, 3, 5, 6, 7]),
        Some(hs(G, HMAJ, LOC, &[1, 3, 4, 5, 7], "o7")),
    ),
    chord(
        "5-32",
        Dominant,
        "7b9",
        h(DB, HMIN, MIX, &[2, 3, 4, 6, 7]),
        Some(hs(E, HMAJ, PHR, &[1, 3, 4, 5, 7], "#9")),
    ),
    chord("5-33", Dominant, "+7", h(A, MEL, MIX, &[1, 2, 3, 6, 7]), None),
    chord("5-34", Tonic, "maj6", h(G, MAJ, LYD, &[1, 2, 3, 4, 6]), None),
    chord("5-35", Tonic, "maj6", h(G, MAJ, LYD, &[1, 3, 5, 6, 2]), None),
    chord(
        "6-Z19",
        Dominant,
        "13b9",
        h(AB, HMAJ, MIX, &[1, 2, 3, 4, 6, 7]),
        Some(hs(A, HMIN, ION, &[1, 2, 3, 5, 6, 7], "-maj7b6")),
    ),
    chord("6-Z23", Dominant, "7#4", h(EB, MEL, LYD, &[1, 3, 4, 5, 6, 7]), None),
    chord(
        "6-Z24",
        Subdominant,
        "-maj7",
        h(DB, MEL, ION, &[1, 2, 3, 4, 5, 7]),
        Some(hs(A, MEL, PHR, &[1, 3, 4, 5, 6, 7], "maj7#5")),
    ),
    chord(
        "6-Z25",
        Tonic,
        "maj7",
        h(DB, MAJ, LYD, &[1, 2, 4, 5, 6, 7]),
        Some(h(G, MAJ, LYD, &[1, 3, 4, 5, 6, 7])),
    ),
    chord("6-Z26", Tonic, "maj7", h(AB, MAJ, LYD, &[1, 2, 3, 4, 5, 7]), None),
    chord(
        "6-27",
        Dominant,
        "7b9",
        h(C, HUNG, ION, &[1, 2, 3, 4, 5, 7]),
        Some(hs(EB, ASYM, ION, &[1, 2, 3, 4, 5, 6], "o7")),
    ),
    chord("6-Z28", Subdominant, "maj7#5", h(BB, HMIN, PHR, &[1, 2, 3, 4, 5, 7]), None),
    chord("6-Z29", Dominant, "7#9", h(G, HMAJ, PHR, &[2, 3, 4, 5, 6, 7]), None),
    chord(
        "6-30",
        Dominant,
        "13#9",
        h(GB, HUNG, LOC, &[1, 2, 3, 4, 6, 7]),
        Some(hs(C, ASYM, LOC, &[1, 2, 3, 4, 5, 7], "7b9")),
    ),
    chord(
        "6-31",
        Subdominant,
        "maj7#9",
        h(F, HMAJ, ION, &[1, 2, 3, 5, 6, 7]),
        Some(hs(C, HMIN, ION, &[1, 3, 4, 5, 6, 7], "-maj7b6")),
    ),
    chord("6-32", Tonic, "-7", h(C, MAJ, DOR, &[1, 2, 3, 4, 5, 7]), None),
    chord(
        "6-33",
        Tonic,
        "maj7",
        h(BB, MAJ, LYD, &[1, 2, 3, 4, 6, 7]),
        Some(h(BB, MAJ, LYD, &[1, 2, 3, 4, 5, 6])),
    ),
    chord(
        "6-34",
        Dominant,
        "7#9",
        h(BB, MEL, LOC, &[1, 3, 4, 5, 6, 7]),
        Some(hs(C, MEL, LYD, &[1, 2, 3, 4, 5, 7], "7#4")),
    ),
    chord("6-35", Dominant, "+7", h(C, WHOLE, ION, &[1, 2, 3, 4, 5, 6]), None),

    // Scale labels: named collections, never chords.
    label("6-35", "whole tone"),
    label("7-20", "Persian"),
    label("7-22", "double harmonic"),
    label("7-30", "Neapolitan minor"),
    label("7-31", "Hungarian major"),
    label("7-32", "harmonic minor, harmonic major"),
    label("7-33", "Neapolitan major"),
    label("7-34", "melodic minor"),
    label("7-35", "major"),
    label("8-28", "octatonic diminished"),
    ];
}

/// Read-only view over the alias entries, with a lazily built index from
/// catalog index to the first alias entry for that class.
pub struct HarmonicAliasTable {
    entries: &'static [AliasEntry],
    by_catalog: LazyLock<[Option<u8>; PRIME_FORMS]>,
}

/// The process-wide alias table.
pub static ALIASES: HarmonicAliasTable = HarmonicAliasTable {
    entries: &table::ENTRIES,
    by_catalog: LazyLock::new(index_by_catalog),
};

fn index_by_catalog() -> [Option<u8>; PRIME_FORMS] {
    let mut index = [None; PRIME_FORMS];
    for (alias_index, entry) in table::ENTRIES.iter().enumerate() {
        if let Some(ci) = entry.catalog_index() {
            if index[ci].is_none() {
                index[ci] = Some(alias_index as u8);
            }
        }
    }
    index
}

impl HarmonicAliasTable {
    pub fn entries(&self) -> &'static [AliasEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, alias_index: usize) -> Option<&'static AliasEntry> {
        self.entries.get(alias_index)
    }

    /// Alias index of the first entry for a catalog class.
    pub fn alias_index(&self, catalog_index: usize) -> Option<usize> {
        self.by_catalog
            .get(catalog_index)
            .copied()
            .flatten()
            .map(usize::from)
    }

    /// First alias entry for a catalog class, with its index.
    pub fn for_catalog_index(&self, catalog_index: usize) -> Option<(usize, &'static AliasEntry)> {
        let alias_index = self.alias_index(catalog_index)?;
        Some((alias_index, &self.entries[alias_index]))
    }

    /// Harmonic role of a catalog class; None for unaliased classes and
    /// scale labels.
    pub fn role(&self, catalog_index: usize) -> Option<HarmonicRole> {
        self.for_catalog_index(catalog_index)
            .and_then(|(_, entry)| entry.role)
    }

    /// Alias index of the first entry with this catalog code.
    pub fn find_code(&self, code: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.code.eq_ignore_ascii_case(code))
    }
}
