// Pitch-class sets and their canonical forms.
//
// A `PitchClassSet` is an ordered bag of pitch classes in `0..12`. It only
// becomes a *set* once normalized: reduced mod 12, sorted, transposed so the
// lowest pitch is 0, and deduplicated. From that state we derive:
//
// - the interval sequence (gaps between neighbours, plus the gap that closes
//   the octave back to the first pitch),
// - the set identifier (`SetId`): intervals packed one per nibble, first
//   interval in the least significant nibble,
// - the normal form: the cyclic rotation of the intervals whose packed
//   identifier is *largest*,
// - the prime form: the larger of the normal forms of the intervals and of
//   the reversed intervals (the mirror image).
//
// **Critical constraint:** the maximum-value rule is what the catalog's
// identifiers were produced with. Switching to the textbook "smallest"
// convention would silently break every catalog lookup.
//
// Equality is sequence equality in the current order; canonicalize both sides
// first when set equivalence is wanted, or use `equivalent`.
//
// See also: `catalog.rs` for the 223 reference identifiers these forms are
// looked up in.

use crate::bounded::BoundedSequence;
use crate::catalog::CATALOG;
use crate::error::SetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pitch classes per octave.
pub const OCTAVE: u8 = 12;

/// Largest duplicate-free set.
pub const MAX_PITCH_COUNT: usize = 12;

/// Number of interval classes (1 through 6).
pub const INTERVAL_CLASSES: usize = 6;

/// Intervals a `SetId` can hold, one per nibble of a `u64`.
pub const SET_ID_MAX_MEMBERS: usize = 16;

pub type Pitches = BoundedSequence<u8, MAX_PITCH_COUNT>;

// ---------------------------------------------------------------------------
// SetId
// ---------------------------------------------------------------------------

/// Packed interval sequence, one interval per nibble, first interval in the
/// lowest nibble. A zero nibble ends the sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SetId(pub u64);

impl SetId {
    /// Pack an interval sequence. Intervals must be in `1..=15`.
    pub fn from_intervals(intervals: &[u8]) -> Result<Self, SetError> {
        if intervals.len() > SET_ID_MAX_MEMBERS {
            return Err(SetError::CapacityExceeded {
                capacity: SET_ID_MAX_MEMBERS,
            });
        }
        let mut id = 0u64;
        for (i, &interval) in intervals.iter().enumerate() {
            if interval == 0 || interval > 0xF {
                return Err(SetError::OutOfRange {
                    value: interval as u64,
                    limit: 0x10,
                });
            }
            id |= (interval as u64) << (4 * i);
        }
        Ok(SetId(id))
    }

    /// Number of intervals encoded (nibbles before the first zero).
    pub fn interval_count(self) -> usize {
        (0..SET_ID_MAX_MEMBERS)
            .take_while(|&i| (self.0 >> (4 * i)) & 0xF != 0)
            .count()
    }

    /// The encoded intervals, lowest nibble first.
    pub fn intervals(self) -> impl Iterator<Item = u8> {
        let id = self.0;
        (0..self.interval_count()).map(move |i| ((id >> (4 * i)) & 0xF) as u8)
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Outcome of a prime-form search.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeForm {
    /// The prime-form identifier (the larger normal form).
    pub id: SetId,
    /// The normal form of the other orientation.
    pub inverse: SetId,
    /// True when the prime form came from the reversed intervals, i.e. the
    /// input is the mirror image of the catalog's representative.
    pub inverted: bool,
}

impl PrimeForm {
    /// True when the set is its own mirror image.
    pub fn is_symmetric(&self) -> bool {
        self.id == self.inverse
    }
}

/// Normal form of an interval sequence: the rotation with the largest packed
/// identifier. Empty input gives `SetId(0)`.
pub fn normal_form(intervals: &[u8]) -> SetId {
    let n = intervals.len().min(SET_ID_MAX_MEMBERS);
    let mut best = 0u64;
    for rotation in 0..n {
        let mut packed = 0u64;
        for e in 0..n {
            packed |= ((intervals[(rotation + e) % n] & 0xF) as u64) << (4 * e);
        }
        best = best.max(packed);
    }
    SetId(best)
}

// ---------------------------------------------------------------------------
// IntervalVector
// ---------------------------------------------------------------------------

/// Interval-class vector: counts of interval classes 1 through 6 over every
/// unordered pair in the set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntervalVector(pub [u8; INTERVAL_CLASSES]);

impl IntervalVector {
    /// One nibble per class, class 1 in the highest nibble.
    pub fn packed(&self) -> u32 {
        self.0
            .iter()
            .enumerate()
            .map(|(i, &count)| ((count & 0xF) as u32) << ((INTERVAL_CLASSES - 1 - i) * 4))
            .sum()
    }

    /// Sum of all buckets; `n * (n - 1) / 2` for a set of size `n`.
    pub fn total(&self) -> u32 {
        self.0.iter().map(|&c| c as u32).sum()
    }
}

impl fmt::Display for IntervalVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &count in &self.0 {
            let c = if count < 10 {
                (b'0' + count) as char
            } else {
                (b'A' + count - 10) as char
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PitchClassSet
// ---------------------------------------------------------------------------

/// An ordered collection of pitch classes; see the module header for the
/// canonicalization pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PitchClassSet {
    pitches: Pitches,
}

impl PitchClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw pitches as given (no normalization). Fails past 12 members.
    pub fn from_pitches(pitches: &[u8]) -> Result<Self, SetError> {
        Ok(Self {
            pitches: Pitches::from_slice(pitches)?,
        })
    }

    /// Rebuild the ascending pitches encoded by an identifier, starting at 0.
    pub fn from_id(id: SetId) -> Result<Self, SetError> {
        let mut set = Self::new();
        set.set_from_id(id)?;
        Ok(set)
    }

    /// Replace the contents with the pitches encoded by `id`.
    pub fn set_from_id(&mut self, id: SetId) -> Result<(), SetError> {
        self.pitches.clear();
        let mut pitch = 0u32;
        for interval in id.intervals() {
            self.pitches.push((pitch % OCTAVE as u32) as u8)?;
            pitch += interval as u32;
        }
        Ok(())
    }

    pub fn pitches(&self) -> &[u8] {
        self.pitches.as_slice()
    }

    pub fn len(&self) -> usize {
        self.pitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pitches.is_empty()
    }

    pub fn push(&mut self, pitch: u8) -> Result<(), SetError> {
        self.pitches.push(pitch)
    }

    pub fn contains(&self, pitch: u8) -> bool {
        self.pitches.contains(&pitch)
    }

    /// Index of `pitch` in the current order.
    pub fn find(&self, pitch: u8) -> Option<usize> {
        self.pitches.find(&pitch)
    }

    /// Reduce every pitch modulo the octave.
    pub fn normalize(&mut self) {
        for p in self.pitches.iter_mut() {
            *p %= OCTAVE;
        }
    }

    pub fn sort(&mut self) {
        self.pitches.sort();
    }

    /// Subtract the first pitch from every pitch (mod 12), so the set starts
    /// at 0. Call after `sort` to make the lowest pitch the reference.
    pub fn transpose_to_zero(&mut self) {
        if let Some(&first) = self.pitches.first() {
            for p in self.pitches.iter_mut() {
                *p = (*p % OCTAVE + OCTAVE - first % OCTAVE) % OCTAVE;
            }
        }
    }

    /// Shift every pitch by `semitones`, wrapping into `0..12`.
    pub fn transpose(&mut self, semitones: i32) {
        for p in self.pitches.iter_mut() {
            *p = (*p as i32 + semitones).rem_euclid(OCTAVE as i32) as u8;
        }
    }

    /// Remove adjacent duplicates; sort first to remove all of them.
    pub fn remove_duplicates(&mut self) {
        self.pitches.dedup();
    }

    /// Mirror every pitch: `p -> (12 - p) mod 12`.
    pub fn invert(&mut self) {
        for p in self.pitches.iter_mut() {
            *p = (OCTAVE - *p % OCTAVE) % OCTAVE;
        }
    }

    /// Normalize, sort, transpose to 0 and dedupe in one step.
    pub fn canonicalize(&mut self) {
        self.normalize();
        self.sort();
        self.transpose_to_zero();
        self.remove_duplicates();
    }

    /// Gaps between consecutive pitches plus the gap that closes the octave.
    /// Requires a non-empty, strictly ascending set inside one octave.
    pub fn intervals(&self) -> Result<Pitches, SetError> {
        let (first, last) = match (self.pitches.first(), self.pitches.last()) {
            (Some(&f), Some(&l)) => (f, l),
            _ => {
                return Err(SetError::PreconditionViolation(
                    "intervals of an empty set".into(),
                ));
            }
        };
        if last >= OCTAVE {
            return Err(SetError::PreconditionViolation(format!(
                "{self} has pitches outside the octave"
            )));
        }
        let mut intervals = Pitches::new();
        for pair in self.pitches.as_slice().windows(2) {
            if pair[1] <= pair[0] {
                return Err(SetError::PreconditionViolation(format!(
                    "{self} is not strictly ascending"
                )));
            }
            intervals.push(pair[1] - pair[0])?;
        }
        intervals.push(OCTAVE + first - last)?;
        Ok(intervals)
    }

    /// Identifier of the current interval sequence, without searching
    /// rotations. Use on sets already known to be in prime form.
    pub fn id(&self) -> Result<SetId, SetError> {
        SetId::from_intervals(self.intervals()?.as_slice())
    }

    /// Canonicalize in place and compute the prime form. An empty set gives
    /// identifier 0 and no inversion.
    pub fn find_prime_form(&mut self) -> PrimeForm {
        self.canonicalize();
        prime_form_of_canonical(self.pitches.as_slice())
    }

    /// Prime form of a copy; `self` is left untouched.
    pub fn prime_form(&self) -> PrimeForm {
        self.clone().find_prime_form()
    }

    /// Replace the contents with the catalog representative of this set.
    pub fn make_prime_form(&mut self) -> Result<PrimeForm, SetError> {
        let prime = self.find_prime_form();
        self.set_from_id(prime.id)?;
        Ok(prime)
    }

    /// Interval-class vector over every unordered pair. Pitches must be
    /// distinct.
    pub fn interval_vector(&self) -> Result<IntervalVector, SetError> {
        let mut vector = [0u8; INTERVAL_CLASSES];
        let p = self.pitches.as_slice();
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                let mut d = (p[j] as i32 - p[i] as i32).rem_euclid(OCTAVE as i32);
                if d == 0 {
                    return Err(SetError::PreconditionViolation(format!(
                        "{self} has duplicate pitch classes"
                    )));
                }
                if d > 6 {
                    d = OCTAVE as i32 - d;
                }
                vector[(d - 1) as usize] += 1;
            }
        }
        Ok(IntervalVector(vector))
    }

    /// 12-bit membership mask, bit `p` set for each pitch class `p`.
    pub fn mask(&self) -> u16 {
        self.mask_transposed(0)
    }

    /// Membership mask of the set shifted by `semitones`.
    pub fn mask_transposed(&self, semitones: i32) -> u16 {
        self.pitches.iter().fold(0u16, |mask, &p| {
            mask | 1 << (p as i32 + semitones).rem_euclid(OCTAVE as i32)
        })
    }

    /// True when both sets have the same size and every pitch of `other`,
    /// shifted by `semitones`, is a member of `self`.
    pub fn equivalent(&self, other: &PitchClassSet, semitones: i32) -> bool {
        self.len() == other.len()
            && other.pitches.iter().all(|&p| {
                self.contains((p as i32 + semitones).rem_euclid(OCTAVE as i32) as u8)
            })
    }

    /// Index of this set's prime form in the reference catalog.
    pub fn catalog_index(&self) -> Option<usize> {
        CATALOG.find_id(self.prime_form().id)
    }

    /// Catalog code (e.g. `"7-35"`) of this set's prime form.
    pub fn catalog_code(&self) -> Option<&'static str> {
        self.catalog_index().and_then(|i| CATALOG.code(i))
    }
}

fn prime_form_of_canonical(pitches: &[u8]) -> PrimeForm {
    let n = pitches.len();
    if n == 0 {
        return PrimeForm {
            id: SetId(0),
            inverse: SetId(0),
            inverted: false,
        };
    }
    let mut intervals = [0u8; MAX_PITCH_COUNT];
    for i in 0..n {
        let next = if i + 1 < n { pitches[i + 1] } else { OCTAVE };
        intervals[i] = next - pitches[i];
    }
    let forward = normal_form(&intervals[..n]);
    intervals[..n].reverse();
    let reversed = normal_form(&intervals[..n]);
    if reversed > forward {
        PrimeForm {
            id: reversed,
            inverse: forward,
            inverted: true,
        }
    } else {
        PrimeForm {
            id: forward,
            inverse: reversed,
            inverted: false,
        }
    }
}

impl fmt::Display for PitchClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.pitches.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{p:X}")?;
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(p: &[u8]) -> PitchClassSet {
        PitchClassSet::from_pitches(p).unwrap()
    }

    #[test]
    fn test_canonicalize_pipeline() {
        let mut s = set(&[19, 7, 14, 11, 2]);
        s.canonicalize();
        // F A C: [2,2,7,7,11] -> [0,0,5,5,9] -> [0,5,9]
        assert_eq!(s.pitches(), &[0, 5, 9]);
    }

    #[test]
    fn test_intervals_close_octave() {
        let s = set(&[0, 4, 7]);
        assert_eq!(s.intervals().unwrap().as_slice(), &[4, 3, 5]);
        assert_eq!(s.id().unwrap(), SetId(0x534));
        assert!(set(&[0, 7, 4]).intervals().is_err());
        assert!(PitchClassSet::new().intervals().is_err());
        assert_eq!(set(&[0]).intervals().unwrap().as_slice(), &[12]);
    }

    #[test]
    fn test_major_triad_prime_form() {
        let prime = set(&[0, 4, 7]).prime_form();
        assert_eq!(prime.id, SetId(0x543));
        assert_eq!(prime.inverse, SetId(0x534));
        assert!(prime.inverted);

        let minor = set(&[0, 3, 7]).prime_form();
        assert_eq!(minor.id, SetId(0x543));
        assert!(!minor.inverted);
    }

    #[test]
    fn test_diatonic_is_7_35() {
        let s = set(&[5, 7, 9, 10, 0, 2, 4]);
        let prime = s.prime_form();
        assert_eq!(prime.id, SetId(0x2221221));
        assert_eq!(s.catalog_code(), Some("7-35"));
        let p = PitchClassSet::from_id(prime.id).unwrap();
        assert_eq!(p.pitches(), &[0, 1, 3, 5, 6, 8, 10]);
    }

    #[test]
    fn test_prime_form_idempotent() {
        for pitches in [&[0u8, 4, 7][..], &[2, 5, 9, 11], &[0, 1, 6], &[1, 3, 4, 8, 10]] {
            let mut s = set(pitches);
            let first = s.make_prime_form().unwrap();
            let again = s.prime_form();
            assert_eq!(first.id, again.id);
            assert_eq!(s.id().unwrap(), first.id);
        }
    }

    #[test]
    fn test_inversion_swaps_orientation() {
        let s = set(&[0, 1, 3, 7]);
        let mut mirror = s.clone();
        mirror.invert();
        let a = s.prime_form();
        let b = mirror.prime_form();
        assert_eq!(a.id, b.id);
        assert_eq!(a.inverse, b.inverse);
        if !a.is_symmetric() {
            assert_ne!(a.inverted, b.inverted);
        }
    }

    #[test]
    fn test_empty_prime_form() {
        let prime = PitchClassSet::new().prime_form();
        assert_eq!(prime.id, SetId(0));
        assert!(!prime.inverted);
    }

    #[test]
    fn test_set_id_round_trip() {
        let id = SetId(0x4332);
        assert_eq!(id.interval_count(), 4);
        let s = PitchClassSet::from_id(id).unwrap();
        assert_eq!(s.pitches(), &[0, 2, 5, 8]);
        assert_eq!(s.id().unwrap(), id);
        assert_eq!(id.to_string(), "0x4332");
    }

    #[test]
    fn test_interval_vector() {
        let major = set(&[0, 2, 4, 5, 7, 9, 11]);
        let iv = major.interval_vector().unwrap();
        assert_eq!(iv.0, [2, 5, 4, 3, 6, 1]);
        assert_eq!(iv.to_string(), "254361");
        assert_eq!(iv.packed(), 0x254361);
        assert_eq!(iv.total(), 21);

        let aggregate = set(&(0..12).collect::<Vec<u8>>());
        let iv = aggregate.interval_vector().unwrap();
        assert_eq!(iv.to_string(), "CCCCC6");
        assert!(set(&[0, 0, 4]).interval_vector().is_err());
    }

    #[test]
    fn test_interval_vector_sum_property() {
        for mask in 1u16..4096 {
            let pitches: Vec<u8> = (0..12).filter(|&p| mask >> p & 1 == 1).collect();
            let n = pitches.len() as u32;
            let iv = set(&pitches).interval_vector().unwrap();
            assert_eq!(iv.total(), n * (n - 1) / 2);
        }
    }

    #[test]
    fn test_transpose_invert_mask() {
        let mut s = set(&[0, 4, 7]);
        s.transpose(-1);
        assert_eq!(s.pitches(), &[11, 3, 6]);
        s.transpose(13);
        assert_eq!(s.pitches(), &[0, 4, 7]);
        assert_eq!(s.mask(), 0b1001_0001);
        assert_eq!(s.mask_transposed(5), (1 << 5) | (1 << 9) | 1);
        s.invert();
        assert_eq!(s.pitches(), &[0, 8, 5]);
    }

    #[test]
    fn test_equivalent_under_transposition() {
        let c_major = set(&[0, 4, 7]);
        let g_major = set(&[7, 11, 2]);
        assert!(c_major.equivalent(&g_major, 5));
        assert!(!c_major.equivalent(&g_major, 0));
        assert!(!c_major.equivalent(&set(&[0, 4]), 0));
    }

    #[test]
    fn test_sequence_equality_is_ordered() {
        assert_ne!(set(&[0, 4, 7]), set(&[4, 0, 7]));
        assert_eq!(set(&[0, 4, 7]), set(&[0, 4, 7]));
    }

    #[test]
    fn test_display_uses_hex() {
        assert_eq!(set(&[0, 2, 4, 5, 7, 9, 11]).to_string(), "[0,2,4,5,7,9,B]");
        assert_eq!(PitchClassSet::new().to_string(), "[]");
    }
}
