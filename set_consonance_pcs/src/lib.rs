// Pitch-class set theory for the set_consonance workspace.
//
// A small, dependency-light library with no knowledge of chords, scales or
// the spacing search built on top of it (that lives in `set_consonance`).
//
// Architecture:
// - bounded.rs: `BoundedSequence<T, N>`, the fixed-capacity container every
//   other type is built on (SmallVec-backed, fails fast on overflow)
// - digits.rs: `MixedRadixDigits`, per-place radices with pack/unpack,
//   permutation enumeration and spaced tone layout
// - pcs.rs: `PitchClassSet`, normal/prime form, set identifiers, interval
//   vectors, masks and set equivalence
// - catalog.rs: the static 223-entry reference catalog of prime forms
// - error.rs: `SetError`, the error type shared across the workspace
//
// Everything here is deterministic and allocation-free on the hot paths.

pub mod bounded;
pub mod catalog;
pub mod digits;
pub mod error;
pub mod pcs;

pub use bounded::BoundedSequence;
pub use catalog::{CATALOG, CatalogEntry, ReferenceCatalog};
pub use digits::{MAX_PLACES, MixedRadixDigits, Tones};
pub use error::SetError;
pub use pcs::{IntervalVector, OCTAVE, PitchClassSet, PrimeForm, SetId};
