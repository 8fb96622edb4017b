// Scale types, modes and note names for chord harmonization.
//
// Harmonizations name a chord as "these degrees of this mode of this scale
// in this key" (e.g. degrees 1,3,5,7 of F Mixolydian = G7). This module
// provides the scale tone tables and the arithmetic that turns such a recipe
// into pitch classes.
//
// This module provides:
// - `ScaleType`: the eight parent scales with their tone tables
// - `Mode`: the seven modes, as rotations into a parent scale
// - `ScaleInstance`: a scale type in a key, with degree lookup, mode roots
//   and the pitch-class-to-degree map used by the tone map report
//
// Used by alias.rs (harmonization recipes), harmony.rs (keys and roots) and
// progression.rs (per-chord scale material).

use serde::{Deserialize, Serialize};
use set_consonance_pcs::OCTAVE;
use std::fmt;

/// Note names by pitch class, flats for the black keys.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Name of a pitch class (wrapped into the octave).
pub fn note_name(pc: u8) -> &'static str {
    NOTE_NAMES[(pc % OCTAVE) as usize]
}

/// The parent scales chords are harmonized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleType {
    Major,
    MelodicMinor,
    HarmonicMinor,
    HarmonicMajor,
    /// Heptatonic subset of the octatonic scale.
    AsymmetricDiminished,
    /// Octatonic, whole-half.
    Diminished,
    WholeTone,
    HungarianMajor,
}

impl ScaleType {
    pub const ALL: [ScaleType; 8] = [
        ScaleType::Major,
        ScaleType::MelodicMinor,
        ScaleType::HarmonicMinor,
        ScaleType::HarmonicMajor,
        ScaleType::AsymmetricDiminished,
        ScaleType::Diminished,
        ScaleType::WholeTone,
        ScaleType::HungarianMajor,
    ];

    /// Semitones above the tonic for each degree, ascending.
    pub fn tones(self) -> &'static [u8] {
        match self {
            ScaleType::Major => &[0, 2, 4, 5, 7, 9, 11],
            ScaleType::MelodicMinor => &[0, 2, 3, 5, 7, 9, 11],
            ScaleType::HarmonicMinor => &[0, 2, 3, 5, 7, 8, 11],
            ScaleType::HarmonicMajor => &[0, 2, 4, 5, 7, 8, 11],
            ScaleType::AsymmetricDiminished => &[0, 3, 5, 6, 8, 9, 11],
            ScaleType::Diminished => &[0, 2, 3, 5, 6, 8, 9, 11],
            ScaleType::WholeTone => &[0, 2, 4, 6, 8, 10],
            ScaleType::HungarianMajor => &[0, 1, 3, 4, 6, 7, 9],
        }
    }

    pub fn len(self) -> usize {
        self.tones().len()
    }

    pub fn name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::MelodicMinor => "Melodic Minor",
            ScaleType::HarmonicMinor => "Harmonic Minor",
            ScaleType::HarmonicMajor => "Harmonic Major",
            ScaleType::AsymmetricDiminished => "Asymmetric Dim",
            ScaleType::Diminished => "Diminished",
            ScaleType::WholeTone => "Whole Tone",
            ScaleType::HungarianMajor => "Hungarian Major",
        }
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The seven modes. A mode is a starting degree within a parent scale:
/// Dorian of C major starts on D.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Ionian,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Ionian,
        Mode::Dorian,
        Mode::Phrygian,
        Mode::Lydian,
        Mode::Mixolydian,
        Mode::Aeolian,
        Mode::Locrian,
    ];

    /// Zero-based degree of the parent scale the mode starts on.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Ionian => "Ionian",
            Mode::Dorian => "Dorian",
            Mode::Phrygian => "Phrygian",
            Mode::Lydian => "Lydian",
            Mode::Mixolydian => "Mixolydian",
            Mode::Aeolian => "Aeolian",
            Mode::Locrian => "Locrian",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A specific scale: a scale type plus its key (tonic pitch class).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleInstance {
    pub scale: ScaleType,
    /// Pitch class of the tonic (0 = C, 2 = D, ...).
    pub key: u8,
}

impl ScaleInstance {
    pub fn new(scale: ScaleType, key: u8) -> Self {
        ScaleInstance {
            scale,
            key: key % OCTAVE,
        }
    }

    /// Pitch class of zero-based `degree` (wraps past the top of the scale).
    pub fn tone(&self, degree: usize) -> u8 {
        let tones = self.scale.tones();
        (tones[degree % tones.len()] + self.key) % OCTAVE
    }

    /// Scale tones transposed to the key, in degree order (not sorted).
    pub fn tones(&self) -> Vec<u8> {
        (0..self.scale.len()).map(|d| self.tone(d)).collect()
    }

    /// Zero-based degree of a pitch class, or None if not in the scale.
    pub fn degree_of(&self, pc: u8) -> Option<usize> {
        let pc = pc % OCTAVE;
        (0..self.scale.len()).find(|&d| self.tone(d) == pc)
    }

    pub fn contains(&self, pc: u8) -> bool {
        self.degree_of(pc).is_some()
    }

    /// Root of `mode` in this scale, e.g. Mixolydian of F major is C.
    pub fn mode_root(&self, mode: Mode) -> u8 {
        self.tone(mode.index())
    }

    /// Pitch class of 1-based `position` counted from the root of `mode`.
    /// Position 1 is the mode root itself; 0 is treated as 1.
    pub fn mode_degree(&self, mode: Mode, position: u8) -> u8 {
        self.tone(position.saturating_sub(1) as usize + mode.index())
    }

    /// For each pitch class, its 1-based degree counted from the root of
    /// `mode`, or 0 if the pitch class is not in the scale.
    pub fn degree_map(&self, mode: Mode) -> [u8; 12] {
        let mut map = [0u8; 12];
        let len = self.scale.len();
        for k in 0..len {
            map[self.tone(mode.index() + k) as usize] = k as u8 + 1;
        }
        map
    }
}

impl fmt::Display for ScaleInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", note_name(self.key), self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_lengths() {
        assert_eq!(ScaleType::Major.len(), 7);
        assert_eq!(ScaleType::Diminished.len(), 8);
        assert_eq!(ScaleType::WholeTone.len(), 6);
        for scale in ScaleType::ALL {
            let tones = scale.tones();
            assert_eq!(tones[0], 0);
            assert!(tones.windows(2).all(|w| w[0] < w[1]), "{scale}");
        }
    }

    #[test]
    fn test_f_major_tones() {
        let f_major = ScaleInstance::new(ScaleType::Major, 5);
        assert_eq!(f_major.tones(), vec![5, 7, 9, 10, 0, 2, 4]);
        assert_eq!(f_major.degree_of(10), Some(3)); // Bb
        assert_eq!(f_major.degree_of(11), None); // B
        assert_eq!(f_major.to_string(), "F Major");
    }

    #[test]
    fn test_mode_root() {
        let f_major = ScaleInstance::new(ScaleType::Major, 5);
        assert_eq!(f_major.mode_root(Mode::Ionian), 5);
        assert_eq!(f_major.mode_root(Mode::Mixolydian), 0); // C
        assert_eq!(f_major.mode_root(Mode::Locrian), 4); // E
    }

    #[test]
    fn test_mode_degree_builds_chords() {
        // C7 = degrees 1,3,5,7 of C Mixolydian, the fifth mode of F major.
        let f_major = ScaleInstance::new(ScaleType::Major, 5);
        let chord: Vec<u8> = [1, 3, 5, 7]
            .iter()
            .map(|&p| f_major.mode_degree(Mode::Mixolydian, p))
            .collect();
        assert_eq!(chord, vec![0, 4, 7, 10]);
    }

    #[test]
    fn test_degree_map() {
        let c_major = ScaleInstance::new(ScaleType::Major, 0);
        let map = c_major.degree_map(Mode::Dorian);
        assert_eq!(map[2], 1); // D is the Dorian root
        assert_eq!(map[0], 7); // C is the 7th above D
        assert_eq!(map[1], 0); // Db not in scale
        assert_eq!(map.iter().filter(|&&d| d > 0).count(), 7);
    }

    #[test]
    fn test_note_names_wrap() {
        assert_eq!(note_name(0), "C");
        assert_eq!(note_name(10), "Bb");
        assert_eq!(note_name(13), "Db");
    }
}
