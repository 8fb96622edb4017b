// Chord progressions: a digit sequence played through a spaced template.
//
// A `DigitSequence` is one row of digit states per structural place (the
// output of an external sequence generator, e.g. a balanced Gray code, or
// simply the template's own enumeration order). Each state sounds one chord:
// place `i` plays its (optionally remapped) digit plus the cumulative offset
// of the winning spacing, optionally transposed. Every chord is resolved
// through the harmony resolver and then annotated with material relative to
// its scale and to the next chord (the progression is cyclic, so the last
// chord's "next" is the first):
//
// - scale tones, and which scale index each chord note sits on
// - scale tones the chord leaves unused
// - tones its scale shares with the next chord's scale
// - approach indices toward the next chord's root
// - the degree of every pitch class counted from the mode root
// - a free-tone mask: pitch classes outside the chord that do not clash
//   (semitone or whole-tone rub) with adjacent chord members
//
// The total common-tone count over the whole cycle is what the common-tone
// crawler (crawl.rs) optimizes.

use crate::alias::HarmonicRole;
use crate::harmony::HarmonyResolver;
use crate::scale::{Mode, ScaleInstance, ScaleType, note_name};
use serde::{Deserialize, Serialize};
use set_consonance_pcs::{MixedRadixDigits, OCTAVE, PitchClassSet, SetError};

/// Per-place rows of digit states: `rows[place][state]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigitSequence {
    pub rows: Vec<Vec<u8>>,
}

impl DigitSequence {
    /// The template's own enumeration order (place 0 varies fastest).
    pub fn from_template(template: &MixedRadixDigits) -> Self {
        let mut rows = vec![Vec::new(); template.places()];
        for digits in template.enumerate_all() {
            for (row, &d) in rows.iter_mut().zip(digits.digits()) {
                row.push(d);
            }
        }
        DigitSequence { rows }
    }

    pub fn places(&self) -> usize {
        self.rows.len()
    }

    pub fn state_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Check the sequence against a template: one row per place, rows of
    /// equal length, digits within each place's radix.
    pub fn validate(&self, template: &MixedRadixDigits) -> Result<(), SetError> {
        if self.places() != template.places() {
            return Err(SetError::InvalidInput(format!(
                "sequence has {} places, template {} has {}",
                self.places(),
                template,
                template.places()
            )));
        }
        let states = self.state_count();
        if states == 0 {
            return Err(SetError::InvalidInput("sequence has no states".into()));
        }
        for (place, row) in self.rows.iter().enumerate() {
            if row.len() != states {
                return Err(SetError::InvalidInput(format!(
                    "place {place} has {} states, expected {states}",
                    row.len()
                )));
            }
            let radix = template.radix(place).unwrap_or(0);
            if let Some(&bad) = row.iter().find(|&&d| d >= radix) {
                return Err(SetError::OutOfRange {
                    value: bad as u64,
                    limit: radix as u64,
                });
            }
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// How a digit sequence is traversed and voiced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionOptions {
    /// Walk the sequence backwards.
    pub reversed: bool,
    /// Rotate the start state: output state `v` plays input state
    /// `(v - rotation) mod states`. Applied after reversal.
    pub rotation: i32,
    /// Semitones added to every tone, wrapping in the octave.
    pub transposition: i32,
    /// Optional per-place digit remap: `tone_map[place][digit]`.
    pub tone_map: Option<Vec<Vec<u8>>>,
    /// Extra copies of each tonic chord, inserted next to it.
    pub tonic_repetitions: u32,
}

/// One chord of a progression with its derived material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordRecord {
    /// State of the digit sequence this chord came from.
    pub state: usize,
    /// Sounding pitch classes, one per place.
    pub notes: Vec<u8>,
    pub scale: ScaleType,
    pub key: u8,
    pub mode: Mode,
    pub catalog_index: usize,
    pub alias_index: usize,
    /// Harmonization slot (0 = prime form, 1 = inverted).
    pub slot: usize,
    pub role: Option<HarmonicRole>,
    pub root: u8,
    pub name: String,

    /// Scale tones in the chord's key, degree order.
    pub scale_tones: Vec<u8>,
    /// Scale index of each note.
    pub chord_tones: Vec<u8>,
    /// Scale indices the chord does not sound.
    pub unused_tones: Vec<u8>,
    /// Pitch classes this chord's scale shares with the next chord's, sorted.
    pub common_tones: Vec<u8>,
    /// Scale index of the next root, or of the tone a semitone above it.
    pub approach_up: Option<u8>,
    /// Scale index of the next root, or of the tone a semitone below it.
    pub approach_down: Option<u8>,
    /// 1-based degree from the mode root per pitch class, 0 outside the scale.
    pub degree_map: [u8; 12],
    /// Bit per pitch class that is free to add without clashing.
    pub free_tones: u16,
}

impl ChordRecord {
    pub fn scale_instance(&self) -> ScaleInstance {
        ScaleInstance::new(self.scale, self.key)
    }

    /// Twelve-column tone map row: degree for free scale tones, `*` for free
    /// tones outside the scale, `.` for chord tones and clashes.
    pub fn tone_map_row(&self) -> String {
        (0..OCTAVE as usize)
            .map(|pc| {
                if self.free_tones & (1 << pc) == 0 {
                    ".".to_string()
                } else if self.degree_map[pc] > 0 {
                    self.degree_map[pc].to_string()
                } else {
                    "*".to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn notes_display(&self) -> String {
        PitchClassSet::from_pitches(&self.notes)
            .map(|set| set.to_string())
            .unwrap_or_default()
    }
}

/// A resolved, annotated progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub template: Vec<u8>,
    pub spacing: Vec<u8>,
    pub chords: Vec<ChordRecord>,
    /// Sum of common-tone counts over the cycle.
    pub total_common_tones: u32,
}

impl Progression {
    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }
}

/// Play `sequence` through `template` laid out with `spacing`.
pub fn build_progression(
    template: &MixedRadixDigits,
    spacing: &[u8],
    sequence: &DigitSequence,
    options: &ProgressionOptions,
) -> Result<Progression, SetError> {
    build_with(&HarmonyResolver::new(), template, spacing, sequence, options)
}

pub(crate) fn build_with(
    resolver: &HarmonyResolver,
    template: &MixedRadixDigits,
    spacing: &[u8],
    sequence: &DigitSequence,
    options: &ProgressionOptions,
) -> Result<Progression, SetError> {
    check_layout(template, spacing, options)?;
    sequence.validate(template)?;

    let states = sequence.state_count();
    let mut chords = Vec::with_capacity(states);
    for v in 0..states {
        let mut state = if options.reversed { states - 1 - v } else { v };
        if options.rotation != 0 {
            state = (state as i64 - options.rotation as i64).rem_euclid(states as i64) as usize;
        }
        let notes = voice_state(template, spacing, sequence, options, state);
        let set = PitchClassSet::from_pitches(&notes)?;
        let chord = resolver.resolve(&set).map_err(|e| match e {
            SetError::LookupFailure { set, reason } => SetError::LookupFailure {
                set,
                reason: format!("chord {} (state {state}): {reason}", v + 1),
            },
            other => other,
        })?;
        let name = chord.name();
        chords.push(ChordRecord {
            state,
            notes,
            scale: chord.scale,
            key: chord.key,
            mode: chord.mode,
            catalog_index: chord.catalog_index,
            alias_index: chord.alias_index,
            slot: chord.slot,
            role: chord.role,
            root: chord.root,
            name,
            scale_tones: Vec::new(),
            chord_tones: Vec::new(),
            unused_tones: Vec::new(),
            common_tones: Vec::new(),
            approach_up: None,
            approach_down: None,
            degree_map: [0; 12],
            free_tones: 0,
        });
    }

    if options.tonic_repetitions > 0 {
        chords = repeat_tonics(chords, options.tonic_repetitions);
    }
    annotate(&mut chords)?;
    let total_common_tones = chords.iter().map(|c| c.common_tones.len() as u32).sum();
    Ok(Progression {
        template: template.radices().to_vec(),
        spacing: spacing.to_vec(),
        chords,
        total_common_tones,
    })
}

fn check_layout(
    template: &MixedRadixDigits,
    spacing: &[u8],
    options: &ProgressionOptions,
) -> Result<(), SetError> {
    if spacing.len() != template.places() {
        return Err(SetError::InvalidInput(format!(
            "spacing has {} places, template {} has {}",
            spacing.len(),
            template,
            template.places()
        )));
    }
    let span = template.range_sum() + spacing.iter().map(|&s| s as u32).sum::<u32>();
    if span > OCTAVE as u32 {
        return Err(SetError::ConstraintUnsatisfiable {
            range_sum: span,
            octave: OCTAVE as u32,
        });
    }
    if let Some(map) = &options.tone_map {
        if map.len() != template.places() {
            return Err(SetError::InvalidInput(format!(
                "tone map has {} places, template has {}",
                map.len(),
                template.places()
            )));
        }
        for (place, row) in map.iter().enumerate() {
            let radix = template.radix(place).unwrap_or(0);
            if row.len() < radix as usize || row.iter().any(|&d| d >= radix) {
                return Err(SetError::InvalidInput(format!(
                    "tone map row {place} {row:?} must map every digit below {radix}"
                )));
            }
        }
    }
    Ok(())
}

fn voice_state(
    template: &MixedRadixDigits,
    spacing: &[u8],
    sequence: &DigitSequence,
    options: &ProgressionOptions,
    state: usize,
) -> Vec<u8> {
    let mut notes = Vec::with_capacity(template.places());
    let mut offset = 0i32;
    for (place, &radix) in template.radices().iter().enumerate() {
        let mut digit = sequence.rows[place][state];
        if let Some(map) = &options.tone_map {
            digit = map[place][digit as usize];
        }
        let pc = (digit as i32 + offset + options.transposition).rem_euclid(OCTAVE as i32);
        notes.push(pc as u8);
        offset += radix as i32 + spacing[place] as i32;
    }
    notes
}

fn repeat_tonics(chords: Vec<ChordRecord>, repetitions: u32) -> Vec<ChordRecord> {
    let mut out = Vec::with_capacity(chords.len());
    for chord in chords {
        if chord.role == Some(HarmonicRole::Tonic) {
            for _ in 0..repetitions {
                out.push(chord.clone());
            }
        }
        out.push(chord);
    }
    out
}

fn annotate(chords: &mut [ChordRecord]) -> Result<(), SetError> {
    for chord in chords.iter_mut() {
        let scale = chord.scale_instance();
        chord.scale_tones = scale.tones();
        chord.chord_tones = chord
            .notes
            .iter()
            .map(|&note| {
                position(&chord.scale_tones, note).ok_or_else(|| {
                    SetError::lookup(
                        format!("{note}"),
                        format!("note not in {} for chord {}", scale, chord.name),
                    )
                })
            })
            .collect::<Result<_, _>>()?;
        chord.unused_tones = (0..chord.scale_tones.len())
            .filter(|&i| !chord.notes.contains(&chord.scale_tones[i]))
            .map(|i| i as u8)
            .collect();
        chord.degree_map = scale.degree_map(chord.mode);
        chord.free_tones = free_tone_mask(&chord.notes);
    }

    let n = chords.len();
    for i in 0..n {
        let next = &chords[(i + 1) % n];
        let next_tones = next.scale_tones.clone();
        let target = next.root;

        let chord = &mut chords[i];
        let mut common: Vec<u8> = chord
            .scale_tones
            .iter()
            .copied()
            .filter(|t| next_tones.contains(t))
            .collect();
        common.sort_unstable();
        chord.common_tones = common;

        let exact = position(&chord.scale_tones, target);
        chord.approach_up = exact.or_else(|| position(&chord.scale_tones, (target + 1) % OCTAVE));
        chord.approach_down =
            exact.or_else(|| position(&chord.scale_tones, (target + OCTAVE - 1) % OCTAVE));
    }
    Ok(())
}

fn position(tones: &[u8], pc: u8) -> Option<u8> {
    tones.iter().position(|&t| t == pc).map(|i| i as u8)
}

/// Pitch classes free to add to a chord: not a chord tone, and not rubbing
/// against a pair of adjacent chord members. For each cyclically adjacent
/// pair (lower note `n1`, upper `n2`) a semitone blocks the tones just
/// outside it, and a whole tone blocks the tone it encloses.
pub fn free_tone_mask(notes: &[u8]) -> u16 {
    let mut mask: u16 = 0xFFF;
    for &note in notes {
        mask &= !(1 << (note % OCTAVE));
    }
    let n = notes.len();
    for i in 0..n {
        let (mut n1, mut n2) = (notes[i] as i32, notes[(i + 1) % n] as i32);
        if n1 > n2 {
            std::mem::swap(&mut n1, &mut n2);
        }
        let interval = least_interval(n1, n2);
        let octave = OCTAVE as i32;
        match interval.abs() {
            1 => {
                mask &= !(1 << ((n1 + 11) % octave));
                mask &= !(1 << ((n2 + 1) % octave));
            }
            2 => {
                let adjacent = if interval < 0 { 1 } else { 11 };
                mask &= !(1 << ((n1 + adjacent) % octave));
            }
            _ => {}
        }
    }
    mask
}

/// Signed interval from `n2` to `n1`, folded to at most a tritone.
fn least_interval(n1: i32, n2: i32) -> i32 {
    let delta = n1 - n2;
    if delta.abs() > 6 {
        if delta > 0 { delta - 12 } else { delta + 12 }
    } else {
        delta
    }
}

/// One line per chord: index, notes, name, mode, key and scale.
pub fn describe(chord: &ChordRecord, ordinal: usize) -> String {
    format!(
        "{:<4} {:<14} {:<9} {:<10} {:<3} {}",
        ordinal + 1,
        chord.notes_display(),
        chord.name,
        chord.mode.name(),
        note_name(chord.key),
        chord.scale.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(radices: &[u8]) -> MixedRadixDigits {
        MixedRadixDigits::allocate(radices).unwrap()
    }

    fn augmented() -> (MixedRadixDigits, DigitSequence) {
        let t = template(&[4, 4, 4]);
        let seq = DigitSequence::from_template(&t);
        (t, seq)
    }

    #[test]
    fn test_sequence_from_template() {
        let t = template(&[2, 3]);
        let seq = DigitSequence::from_template(&t);
        assert_eq!(seq.places(), 2);
        assert_eq!(seq.state_count(), 6);
        assert_eq!(seq.rows[0], vec![0, 1, 0, 1, 0, 1]);
        assert_eq!(seq.rows[1], vec![0, 0, 1, 1, 2, 2]);
        seq.validate(&t).unwrap();
    }

    #[test]
    fn test_sequence_validation() {
        let t = template(&[2, 3]);
        let bad_digit = DigitSequence {
            rows: vec![vec![0, 2], vec![0, 1]],
        };
        assert!(bad_digit.validate(&t).is_err());
        let ragged = DigitSequence {
            rows: vec![vec![0, 1], vec![0]],
        };
        assert!(ragged.validate(&t).is_err());
        let short = DigitSequence {
            rows: vec![vec![0, 1]],
        };
        assert!(short.validate(&t).is_err());
    }

    #[test]
    fn test_sequence_json() {
        let seq = DigitSequence::from_json(r#"{"rows":[[0,1],[2,0]]}"#).unwrap();
        assert_eq!(seq.rows, vec![vec![0, 1], vec![2, 0]]);
        let back = DigitSequence::from_json(&seq.to_json().unwrap()).unwrap();
        assert_eq!(back, seq);
    }

    #[test]
    fn test_augmented_progression() {
        let (t, seq) = augmented();
        let prog = build_progression(&t, &[0, 0, 0], &seq, &ProgressionOptions::default()).unwrap();
        assert_eq!(prog.len(), 64);
        let first = &prog.chords[0];
        assert_eq!(first.notes, vec![0, 4, 8]);
        assert_eq!(first.role, Some(HarmonicRole::Dominant));
        // Second state: digit 0 of place 0 moves to 1.
        assert_eq!(prog.chords[1].notes, vec![1, 4, 8]);
        let tonics = prog
            .chords
            .iter()
            .filter(|c| c.role == Some(HarmonicRole::Tonic))
            .count();
        assert_eq!(tonics, 24);
        let total: u32 = prog.chords.iter().map(|c| c.common_tones.len() as u32).sum();
        assert_eq!(total, prog.total_common_tones);
    }

    #[test]
    fn test_chord_tones_index_scale() {
        let (t, seq) = augmented();
        let prog = build_progression(&t, &[0, 0, 0], &seq, &ProgressionOptions::default()).unwrap();
        for chord in &prog.chords {
            assert_eq!(chord.chord_tones.len(), chord.notes.len());
            for (&note, &idx) in chord.notes.iter().zip(&chord.chord_tones) {
                assert_eq!(chord.scale_tones[idx as usize], note);
            }
            for &idx in &chord.unused_tones {
                assert!(!chord.notes.contains(&chord.scale_tones[idx as usize]));
            }
            assert_eq!(
                chord.chord_tones.len() + chord.unused_tones.len(),
                chord.scale_tones.len()
            );
        }
    }

    #[test]
    fn test_reverse_and_rotate() {
        let (t, seq) = augmented();
        let plain = build_progression(&t, &[0, 0, 0], &seq, &ProgressionOptions::default()).unwrap();
        let reversed = ProgressionOptions {
            reversed: true,
            ..Default::default()
        };
        let rev = build_progression(&t, &[0, 0, 0], &seq, &reversed).unwrap();
        assert_eq!(rev.chords[0].notes, plain.chords[63].notes);
        assert_eq!(rev.chords[0].state, 63);

        let rotated = ProgressionOptions {
            rotation: 2,
            ..Default::default()
        };
        let rot = build_progression(&t, &[0, 0, 0], &seq, &rotated).unwrap();
        assert_eq!(rot.chords[0].state, 62);
        assert_eq!(rot.chords[2].notes, plain.chords[0].notes);

        let negative = ProgressionOptions {
            rotation: -1,
            ..Default::default()
        };
        let neg = build_progression(&t, &[0, 0, 0], &seq, &negative).unwrap();
        assert_eq!(neg.chords[0].state, 1);
    }

    #[test]
    fn test_transposition_wraps() {
        let (t, seq) = augmented();
        let options = ProgressionOptions {
            transposition: -1,
            ..Default::default()
        };
        let prog = build_progression(&t, &[0, 0, 0], &seq, &options).unwrap();
        assert_eq!(prog.chords[0].notes, vec![11, 3, 7]);
    }

    #[test]
    fn test_tone_map_remaps_digits() {
        let (t, seq) = augmented();
        let options = ProgressionOptions {
            tone_map: Some(vec![vec![1, 2, 3, 0], vec![0, 1, 2, 3], vec![0, 1, 2, 3]]),
            ..Default::default()
        };
        let prog = build_progression(&t, &[0, 0, 0], &seq, &options).unwrap();
        assert_eq!(prog.chords[0].notes, vec![1, 4, 8]);

        let bad = ProgressionOptions {
            tone_map: Some(vec![vec![4, 0, 1, 2], vec![0, 1, 2, 3], vec![0, 1, 2, 3]]),
            ..Default::default()
        };
        assert!(build_progression(&t, &[0, 0, 0], &seq, &bad).is_err());
    }

    #[test]
    fn test_tonic_repetitions() {
        let (t, seq) = augmented();
        let options = ProgressionOptions {
            tonic_repetitions: 2,
            ..Default::default()
        };
        let prog = build_progression(&t, &[0, 0, 0], &seq, &options).unwrap();
        assert_eq!(prog.len(), 64 + 24 * 2);
    }

    #[test]
    fn test_layout_must_fit() {
        let t = template(&[4, 4, 4]);
        let seq = DigitSequence::from_template(&t);
        let err = build_progression(&t, &[1, 0, 0], &seq, &ProgressionOptions::default());
        assert!(matches!(err, Err(SetError::ConstraintUnsatisfiable { .. })));
        let err = build_progression(&t, &[0, 0], &seq, &ProgressionOptions::default());
        assert!(matches!(err, Err(SetError::InvalidInput(_))));
    }

    #[test]
    fn test_free_tone_mask() {
        // C E G: no seconds, so only the chord tones are blocked.
        assert_eq!(free_tone_mask(&[0, 4, 7]), 0xFFF & !0b1001_0001);
        // C Db: semitone blocks B (below C) and D (above Db).
        let mask = free_tone_mask(&[0, 1]);
        assert_eq!(mask & (1 << 11), 0);
        assert_eq!(mask & (1 << 2), 0);
        assert_ne!(mask & (1 << 3), 0);
        // C D: whole tone blocks the Db between them.
        let mask = free_tone_mask(&[0, 2]);
        assert_eq!(mask & (1 << 1), 0);
        assert_ne!(mask & (1 << 11), 0);
        // B C# wraps around the octave: the tone between is C.
        let mask = free_tone_mask(&[1, 11]);
        assert_eq!(mask & 1, 0);
    }

    #[test]
    fn test_approaches_and_common_tones() {
        let (t, seq) = augmented();
        let prog = build_progression(&t, &[0, 0, 0], &seq, &ProgressionOptions::default()).unwrap();
        let n = prog.len();
        for (i, chord) in prog.chords.iter().enumerate() {
            let next = &prog.chords[(i + 1) % n];
            for pc in &chord.common_tones {
                assert!(chord.scale_tones.contains(pc));
                assert!(next.scale_tones.contains(pc));
            }
            assert!(chord.common_tones.windows(2).all(|w| w[0] < w[1]));
            if let Some(up) = chord.approach_up {
                let tone = chord.scale_tones[up as usize];
                assert!(tone == next.root || tone == (next.root + 1) % 12);
            }
            if let Some(down) = chord.approach_down {
                let tone = chord.scale_tones[down as usize];
                assert!(tone == next.root || tone == (next.root + 11) % 12);
            }
        }
    }

    #[test]
    fn test_tone_map_row_and_describe() {
        let (t, seq) = augmented();
        let prog = build_progression(&t, &[0, 0, 0], &seq, &ProgressionOptions::default()).unwrap();
        let row = prog.chords[0].tone_map_row();
        assert_eq!(row.split(' ').count(), 12);
        assert!(row.starts_with('.'));
        let line = describe(&prog.chords[0], 0);
        assert!(line.starts_with("1 "));
        assert!(line.contains("[0,4,8]"));
    }
}
