// Mixed-radix digit sequences.
//
// A `MixedRadixDigits` is a short vector of digits where each place has its
// own radix (its "range"). The structural template of the spacing optimizer
// is one of these: radices `[4, 3, 2]` describe three groups of 4, 3 and 2
// states, and every assignment of digits is one permutation of the
// structure. The same type doubles as the spacing template, with every place
// sharing the radix `space_available + 1`.
//
// Packing is little-endian: place 0 is the least significant digit, so
// `packed = v[0] + v[1]*r[0] + v[2]*r[0]*r[1] + ...`. Enumerating packed
// values `0..permutation_count()` and unpacking each visits every digit
// assignment exactly once; place 0 varies fastest.
//
// Radices are fixed by `allocate`/`from_code` and never change afterwards;
// only the digits move. `unpack` is strict and rejects values outside
// `0..permutation_count()`; `unpack_wrapping` keeps the modular reduction
// (high bits dropped) for callers that rely on it.
//
// See also: `pcs.rs` for the pitch-class sets built from spaced digits,
// and `set_consonance::spacing` for the search that drives all of this.

use crate::bounded::BoundedSequence;
use crate::error::SetError;
use crate::pcs::OCTAVE;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of places in a digit sequence.
pub const MAX_PLACES: usize = 8;

/// Per-place digit or radix storage.
pub type Places = BoundedSequence<u8, MAX_PLACES>;

/// Raw tones produced by laying digits out in the octave, one per place.
pub type Tones = BoundedSequence<u8, MAX_PLACES>;

/// A digit vector with an independent radix per place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MixedRadixDigits {
    digits: Places,
    radices: Places,
    permutation_count: u32,
}

impl MixedRadixDigits {
    /// Build a template from its radices; all digits start at zero.
    pub fn allocate(radices: &[u8]) -> Result<Self, SetError> {
        if radices.is_empty() {
            return Err(SetError::InvalidInput(
                "a digit template needs at least one place".into(),
            ));
        }
        if radices.len() > MAX_PLACES {
            return Err(SetError::CapacityExceeded {
                capacity: MAX_PLACES,
            });
        }
        let mut permutation_count: u32 = 1;
        for (place, &radix) in radices.iter().enumerate() {
            if radix == 0 {
                return Err(SetError::InvalidInput(format!(
                    "place {place} has radix 0 (radices must be at least 1)"
                )));
            }
            permutation_count = permutation_count.checked_mul(radix as u32).ok_or_else(|| {
                SetError::InvalidInput(format!("permutation count of {radices:?} overflows"))
            })?;
        }
        let radices = Places::from_slice(radices)?;
        let mut digits = Places::new();
        digits.resize(radices.len(), 0)?;
        Ok(Self {
            digits,
            radices,
            permutation_count,
        })
    }

    /// Build a template from a hex set code: one radix per nibble, most
    /// significant nibble first, stopping at the first zero nibble.
    /// `0x432` gives radices `[4, 3, 2]`.
    pub fn from_code(code: u32) -> Result<Self, SetError> {
        let mut radices = Places::new();
        for shift in (0..MAX_PLACES).rev() {
            let nibble = ((code >> (shift * 4)) & 0xF) as u8;
            if nibble == 0 {
                if radices.is_empty() {
                    continue;
                }
                break;
            }
            radices.push(nibble)?;
        }
        Self::allocate(radices.as_slice())
    }

    /// Parse a hex set code such as `"444"` or `"0x2232"`.
    pub fn parse_code(text: &str) -> Result<Self, SetError> {
        let trimmed = text.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        let code = u32::from_str_radix(hex, 16)
            .map_err(|_| SetError::InvalidInput(format!("'{text}' is not a hex set code")))?;
        Self::from_code(code)
    }

    /// Inverse of `from_code`. `None` if a radix does not fit in one nibble.
    pub fn code(&self) -> Option<u32> {
        self.radices.iter().try_fold(0u32, |code, &radix| {
            (radix <= 0xF).then_some((code << 4) | radix as u32)
        })
    }

    pub fn places(&self) -> usize {
        self.radices.len()
    }

    pub fn radix(&self, place: usize) -> Option<u8> {
        self.radices.get(place).copied()
    }

    pub fn radices(&self) -> &[u8] {
        self.radices.as_slice()
    }

    pub fn digits(&self) -> &[u8] {
        self.digits.as_slice()
    }

    pub fn digit(&self, place: usize) -> Option<u8> {
        self.digits.get(place).copied()
    }

    /// Set one digit, checking it against that place's radix.
    pub fn set_digit(&mut self, place: usize, value: u8) -> Result<(), SetError> {
        let radix = self.radix(place).ok_or(SetError::OutOfRange {
            value: place as u64,
            limit: self.places() as u64,
        })?;
        if value >= radix {
            return Err(SetError::OutOfRange {
                value: value as u64,
                limit: radix as u64,
            });
        }
        self.digits[place] = value;
        Ok(())
    }

    /// Replace every digit at once; the slice must match the place count.
    pub fn set_digits(&mut self, values: &[u8]) -> Result<(), SetError> {
        if values.len() != self.places() {
            return Err(SetError::InvalidInput(format!(
                "expected {} digits, got {}",
                self.places(),
                values.len()
            )));
        }
        for (place, &value) in values.iter().enumerate() {
            self.set_digit(place, value)?;
        }
        Ok(())
    }

    /// Zero every digit.
    pub fn clear(&mut self) {
        for d in self.digits.iter_mut() {
            *d = 0;
        }
    }

    /// Product of all radices: the number of distinct digit assignments.
    pub fn permutation_count(&self) -> u32 {
        self.permutation_count
    }

    /// Positional value of the current digits (place 0 least significant).
    pub fn pack(&self) -> u32 {
        self.digits
            .iter()
            .zip(self.radices.iter())
            .rev()
            .fold(0u32, |value, (&digit, &radix)| value * radix as u32 + digit as u32)
    }

    /// Set the digits from a packed value in `0..permutation_count()`.
    pub fn unpack(&mut self, value: u32) -> Result<(), SetError> {
        if value >= self.permutation_count {
            return Err(SetError::OutOfRange {
                value: value as u64,
                limit: self.permutation_count as u64,
            });
        }
        self.unpack_wrapping(value);
        Ok(())
    }

    /// Set the digits from any value, reducing modulo each radix in turn.
    /// Bits above `permutation_count()` are silently dropped.
    pub fn unpack_wrapping(&mut self, mut value: u32) {
        for (digit, &radix) in self.digits.iter_mut().zip(self.radices.iter()) {
            let radix = radix as u32;
            *digit = (value % radix) as u8;
            value /= radix;
        }
    }

    /// Every digit assignment in packed order, as fresh copies of `self`.
    pub fn enumerate_all(&self) -> impl Iterator<Item = MixedRadixDigits> + '_ {
        (0..self.permutation_count).map(move |value| {
            let mut next = self.clone();
            next.unpack_wrapping(value);
            next
        })
    }

    /// Sum of the current digits.
    pub fn digit_sum(&self) -> u32 {
        self.digits.iter().map(|&d| d as u32).sum()
    }

    /// Sum of the radices: how many tones the structure occupies.
    pub fn range_sum(&self) -> u32 {
        self.radices.iter().map(|&r| r as u32).sum()
    }

    /// Lay the current digits out in the octave. Place `i` sounds at
    /// `digit[i] + offset`, where the offset starts at 0 and advances by
    /// `radix[i] + spacing[i]` after each place.
    pub fn spaced(&self, spacing: &[u8]) -> Result<Tones, SetError> {
        if spacing.len() != self.places() {
            return Err(SetError::InvalidInput(format!(
                "spacing has {} places, template has {}",
                spacing.len(),
                self.places()
            )));
        }
        let mut tones = Tones::new();
        let mut offset = 0u32;
        for place in 0..self.places() {
            let tone = self.digits[place] as u32 + offset;
            if tone >= OCTAVE as u32 {
                return Err(SetError::OutOfRange {
                    value: tone as u64,
                    limit: OCTAVE as u64,
                });
            }
            tones.push(tone as u8)?;
            offset += self.radices[place] as u32 + spacing[place] as u32;
        }
        Ok(tones)
    }

    /// The current digits as `(1,0,2)`, hex per place.
    pub fn format_digits(&self) -> String {
        let parts: Vec<String> = self.digits.iter().map(|d| format!("{d:X}")).collect();
        format!("({})", parts.join(","))
    }
}

/// Displays the radices as a set code, e.g. `432`.
impl fmt::Display for MixedRadixDigits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for radix in &self.radices {
            write!(f, "{radix:X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_counts_permutations() {
        let t = MixedRadixDigits::allocate(&[3, 4, 5]).unwrap();
        assert_eq!(t.places(), 3);
        assert_eq!(t.permutation_count(), 60);
        assert_eq!(t.digits(), &[0, 0, 0]);
        assert_eq!(t.range_sum(), 12);
    }

    #[test]
    fn test_allocate_rejects_bad_radices() {
        assert!(matches!(
            MixedRadixDigits::allocate(&[3, 0, 2]),
            Err(SetError::InvalidInput(_))
        ));
        assert!(matches!(
            MixedRadixDigits::allocate(&[]),
            Err(SetError::InvalidInput(_))
        ));
        assert_eq!(
            MixedRadixDigits::allocate(&[2; 9]),
            Err(SetError::CapacityExceeded { capacity: 8 })
        );
        assert!(MixedRadixDigits::allocate(&[255; 8]).is_err());
    }

    #[test]
    fn test_unpack_first_and_last() {
        let mut t = MixedRadixDigits::allocate(&[3, 4, 5]).unwrap();
        t.unpack(0).unwrap();
        assert_eq!(t.digits(), &[0, 0, 0]);
        t.unpack(59).unwrap();
        assert_eq!(t.digits(), &[2, 3, 4]);
        assert_eq!(t.pack(), 59);
    }

    #[test]
    fn test_place_zero_varies_fastest() {
        let mut t = MixedRadixDigits::allocate(&[3, 4, 5]).unwrap();
        t.unpack(1).unwrap();
        assert_eq!(t.digits(), &[1, 0, 0]);
        t.unpack(3).unwrap();
        assert_eq!(t.digits(), &[0, 1, 0]);
        t.unpack(12).unwrap();
        assert_eq!(t.digits(), &[0, 0, 1]);
    }

    #[test]
    fn test_pack_unpack_bijection() {
        let t = MixedRadixDigits::allocate(&[2, 3, 2, 4]).unwrap();
        let mut seen = vec![false; t.permutation_count() as usize];
        for (value, d) in t.enumerate_all().enumerate() {
            assert_eq!(d.pack() as usize, value);
            assert!(!seen[value]);
            seen[value] = true;
            for place in 0..d.places() {
                assert!(d.digit(place).unwrap() < d.radix(place).unwrap());
            }
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_unpack_strict_vs_wrapping() {
        let mut t = MixedRadixDigits::allocate(&[3, 4, 5]).unwrap();
        assert_eq!(
            t.unpack(60),
            Err(SetError::OutOfRange {
                value: 60,
                limit: 60
            })
        );
        // Wrapping drops the overflow: 61 behaves like 1.
        t.unpack_wrapping(61);
        assert_eq!(t.digits(), &[1, 0, 0]);
    }

    #[test]
    fn test_from_code_and_display() {
        let t = MixedRadixDigits::from_code(0x444).unwrap();
        assert_eq!(t.radices(), &[4, 4, 4]);
        assert_eq!(t.to_string(), "444");
        assert_eq!(t.code(), Some(0x444));

        let t = MixedRadixDigits::from_code(0x2232).unwrap();
        assert_eq!(t.radices(), &[2, 2, 3, 2]);

        let t = MixedRadixDigits::parse_code("0x345").unwrap();
        assert_eq!(t.radices(), &[3, 4, 5]);
        assert!(MixedRadixDigits::parse_code("xyz").is_err());
        assert!(MixedRadixDigits::from_code(0).is_err());
    }

    #[test]
    fn test_set_digit_checks_radix() {
        let mut t = MixedRadixDigits::allocate(&[2, 3]).unwrap();
        t.set_digit(1, 2).unwrap();
        assert_eq!(t.digits(), &[0, 2]);
        assert!(t.set_digit(0, 2).is_err());
        assert!(t.set_digit(5, 0).is_err());
        assert_eq!(t.format_digits(), "(0,2)");
        t.clear();
        assert_eq!(t.digit_sum(), 0);
    }

    #[test]
    fn test_spaced_offsets() {
        let mut t = MixedRadixDigits::allocate(&[2, 2, 3, 2]).unwrap();
        t.set_digits(&[1, 0, 2, 1]).unwrap();
        // Offsets: 0, 2+1, 3+2+0, 5+3+0.
        let tones = t.spaced(&[1, 0, 0, 0]).unwrap();
        assert_eq!(tones.as_slice(), &[1, 3, 7, 9]);
        assert!(t.spaced(&[1, 0]).is_err());
        assert!(t.spaced(&[4, 4, 0, 0]).is_err());
    }
}
