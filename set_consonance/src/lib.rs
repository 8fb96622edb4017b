// Harmonic spacing optimizer and chord progression analysis.
//
// Built on `set_consonance_pcs` (pitch-class sets, mixed-radix digits, the
// reference catalog), this crate attaches musical meaning to set classes and
// searches for the octave layout of a digit structure that sounds the most
// consonant.
//
// Architecture:
// - scale.rs: scale types, modes, keys and degree arithmetic
// - alias.rs: the harmonic alias table (roles, symbols, harmonization
//   recipes) keyed by catalog index
// - harmony.rs: `HarmonyResolver`, concrete set -> alias, key, root, name
// - spacing.rs: `SpacingOptimizer`, the spacing search (sequential or rayon)
// - progression.rs: digit sequences played as annotated chord progressions
// - crawl.rs: exhaustive tone-map crawl maximizing common tones
// - config.rs: `RunConfig`, JSON-loadable run settings
// - pipeline.rs: the staged end-to-end run and its JSON report
//
// The `consonance` binary (main.rs) is a thin CLI over `pipeline`.
//
// **Critical constraint: determinism.** Every search breaks ties by
// enumeration order, and the parallel spacing search reduces in that same
// order, so a given config always produces the same report.

pub mod alias;
pub mod config;
pub mod crawl;
pub mod harmony;
pub mod pipeline;
pub mod progression;
pub mod scale;
pub mod spacing;
