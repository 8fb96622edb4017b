// Reference catalog of the 223 pitch-class set classes.
//
// Every equivalence class of pitch-class sets under transposition and
// inversion, from the single pitch (1-1) up to the aggregate (12-1), keyed
// by its prime-form identifier (see `pcs.rs` for how identifiers are formed).
// Codes follow Forte's numbering; complements share ordinals and Z flags
// (7-x mirrors 5-x, 8-x mirrors 4-x, and so on).
//
// The table is static, read-only data. Order matters: the catalog index is
// the key the harmonic alias table uses, so entries must never be
// reordered. Lookups are linear scans; 223 entries do not warrant a map.

use crate::pcs::SetId;

/// Total number of set classes.
pub const PRIME_FORMS: usize = 223;

/// Index of the first trichord (3-1); entries before it are monads and dyads.
pub const FORTE_FIRST: usize = 7;

/// Number of entries in Forte's list proper, 3-1 through 9-12.
pub const FORTE_CODES: usize = 208;

/// One catalog row: prime-form identifier and Forte code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: SetId,
    pub code: &'static str,
}

const fn entry(id: u64, code: &'static str) -> CatalogEntry {
    CatalogEntry { id: SetId(id), code }
}

// Comments give the prime-form pitches (hex) each identifier expands to.
static ENTRIES: [CatalogEntry; PRIME_FORMS] = [
    // Monads
    entry(0xC, "1-1"), // [0]

    // Dyads
    entry(0xB1, "2-1"), // [0,1]
    entry(0xA2, "2-2"), // [0,2]
    entry(0x93, "2-3"), // [0,3]
    entry(0x84, "2-4"), // [0,4]
    entry(0x75, "2-5"), // [0,5]
    entry(0x66, "2-6"), // [0,6]

    // Trichords
    entry(0xA11, "3-1"), // [0,1,2]
    entry(0x921, "3-2"), // [0,1,3]
    entry(0x831, "3-3"), // [0,1,4]
    entry(0x741, "3-4"), // [0,1,5]
    entry(0x651, "3-5"), // [0,1,6]
    entry(0x822, "3-6"), // [0,2,4]
    entry(0x732, "3-7"), // [0,2,5]
    entry(0x642, "3-8"), // [0,2,6]
    entry(0x552, "3-9"), // [0,2,7]
    entry(0x633, "3-10"), // [0,3,6]
    entry(0x543, "3-11"), // [0,3,7]
    entry(0x444, "3-12"), // [0,4,8]

    // Tetrachords
    entry(0x9111, "4-1"), // [0,1,2,3]
    entry(0x8211, "4-2"), // [0,1,2,4]
    entry(0x8121, "4-3"), // [0,1,3,4]
    entry(0x7311, "4-4"), // [0,1,2,5]
    entry(0x6411, "4-5"), // [0,1,2,6]
    entry(0x5511, "4-6"), // [0,1,2,7]
    entry(0x7131, "4-7"), // [0,1,4,5]
    entry(0x6141, "4-8"), // [0,1,5,6]
    entry(0x5151, "4-9"), // [0,1,6,7]
    entry(0x7212, "4-10"), // [0,2,3,5]
    entry(0x7221, "4-11"), // [0,1,3,5]
    entry(0x6312, "4-12"), // [0,2,3,6]
    entry(0x6321, "4-13"), // [0,1,3,6]
    entry(0x5412, "4-14"), // [0,2,3,7]
    entry(0x6231, "4-Z15"), // [0,1,4,6]
    entry(0x5241, "4-16"), // [0,1,5,7]
    entry(0x5313, "4-17"), // [0,3,4,7]
    entry(0x5331, "4-18"), // [0,1,4,7]
    entry(0x4431, "4-19"), // [0,1,4,8]
    entry(0x4341, "4-20"), // [0,1,5,8]
    entry(0x6222, "4-21"), // [0,2,4,6]
    entry(0x5322, "4-22"), // [0,2,4,7]
    entry(0x5232, "4-23"), // [0,2,5,7]
    entry(0x4422, "4-24"), // [0,2,4,8]
    entry(0x4242, "4-25"), // [0,2,6,8]
    entry(0x4323, "4-26"), // [0,3,5,8]
    entry(0x4332, "4-27"), // [0,2,5,8]
    entry(0x3333, "4-28"), // [0,3,6,9]
    entry(0x5421, "4-Z29"), // [0,1,3,7]

    // Pentachords
    entry(0x81111, "5-1"), // [0,1,2,3,4]
    entry(0x72111, "5-2"), // [0,1,2,3,5]
    entry(0x71211, "5-3"), // [0,1,2,4,5]
    entry(0x63111, "5-4"), // [0,1,2,3,6]
    entry(0x54111, "5-5"), // [0,1,2,3,7]
    entry(0x61311, "5-6"), // [0,1,2,5,6]
    entry(0x51411, "5-7"), // [0,1,2,6,7]
    entry(0x62112, "5-8"), // [0,2,3,4,6]
    entry(0x62211, "5-9"), // [0,1,2,4,6]
    entry(0x62121, "5-10"), // [0,1,3,4,6]
    entry(0x53112, "5-11"), // [0,2,3,4,7]
    entry(0x61221, "5-Z12"), // [0,1,3,5,6]
    entry(0x44211, "5-13"), // [0,1,2,4,8]
    entry(0x52311, "5-14"), // [0,1,2,5,7]
    entry(0x42411, "5-15"), // [0,1,2,6,8]
    entry(0x53121, "5-16"), // [0,1,3,4,7]
    entry(0x44121, "5-Z17"), // [0,1,3,4,8]
    entry(0x52131, "5-Z18"), // [0,1,4,5,7]
    entry(0x51321, "5-19"), // [0,1,3,6,7]
    entry(0x42141, "5-20"), // [0,1,5,6,8]
    entry(0x43131, "5-21"), // [0,1,4,5,8]
    entry(0x41331, "5-22"), // [0,1,4,7,8]
    entry(0x52212, "5-23"), // [0,2,3,5,7]
    entry(0x52221, "5-24"), // [0,1,3,5,7]
    entry(0x43212, "5-25"), // [0,2,3,5,8]
    entry(0x43122, "5-26"), // [0,2,4,5,8]
    entry(0x43221, "5-27"), // [0,1,3,5,8]
    entry(0x42312, "5-28"), // [0,2,3,6,8]
    entry(0x42321, "5-29"), // [0,1,3,6,8]
    entry(0x42231, "5-30"), // [0,1,4,6,8]
    entry(0x33321, "5-31"), // [0,1,3,6,9]
    entry(0x33231, "5-32"), // [0,1,4,6,9]
    entry(0x42222, "5-33"), // [0,2,4,6,8]
    entry(0x33222, "5-34"), // [0,2,4,6,9]
    entry(0x32322, "5-35"), // [0,2,4,7,9]
    entry(0x53211, "5-Z36"), // [0,1,2,4,7]
    entry(0x43113, "5-Z37"), // [0,3,4,5,8]
    entry(0x43311, "5-Z38"), // [0,1,2,5,8]

    // Hexachords
    entry(0x711111, "6-1"), // [0,1,2,3,4,5]
    entry(0x621111, "6-2"), // [0,1,2,3,4,6]
    entry(0x612111, "6-Z3"), // [0,1,2,3,5,6]
    entry(0x611211, "6-Z4"), // [0,1,2,4,5,6]
    entry(0x513111, "6-5"), // [0,1,2,3,6,7]
    entry(0x511311, "6-Z6"), // [0,1,2,5,6,7]
    entry(0x411411, "6-7"), // [0,1,2,6,7,8]
    entry(0x521112, "6-8"), // [0,2,3,4,5,7]
    entry(0x522111, "6-9"), // [0,1,2,3,5,7]
    entry(0x521121, "6-Z10"), // [0,1,3,4,5,7]
    entry(0x521211, "6-Z11"), // [0,1,2,4,5,7]
    entry(0x512211, "6-Z12"), // [0,1,2,4,6,7]
    entry(0x512121, "6-Z13"), // [0,1,3,4,6,7]
    entry(0x431121, "6-14"), // [0,1,3,4,5,8]
    entry(0x431211, "6-15"), // [0,1,2,4,5,8]
    entry(0x421131, "6-16"), // [0,1,4,5,6,8]
    entry(0x413211, "6-Z17"), // [0,1,2,4,7,8]
    entry(0x412311, "6-18"), // [0,1,2,5,7,8]
    entry(0x413121, "6-Z19"), // [0,1,3,4,7,8]
    entry(0x313131, "6-20"), // [0,1,4,5,8,9]
    entry(0x422112, "6-21"), // [0,2,3,4,6,8]
    entry(0x422211, "6-22"), // [0,1,2,4,6,8]
    entry(0x421212, "6-Z23"), // [0,2,3,5,6,8]
    entry(0x422121, "6-Z24"), // [0,1,3,4,6,8]
    entry(0x421221, "6-Z25"), // [0,1,3,5,6,8]
    entry(0x412221, "6-Z26"), // [0,1,3,5,7,8]
    entry(0x332121, "6-27"), // [0,1,3,4,6,9]
    entry(0x331221, "6-Z28"), // [0,1,3,5,6,9]
    entry(0x321312, "6-Z29"), // [0,2,3,6,7,9]
    entry(0x321321, "6-30"), // [0,1,3,6,7,9]
    entry(0x322131, "6-31"), // [0,1,4,5,7,9]
    entry(0x322122, "6-32"), // [0,2,4,5,7,9]
    entry(0x322212, "6-33"), // [0,2,3,5,7,9]
    entry(0x322221, "6-34"), // [0,1,3,5,7,9]
    entry(0x222222, "6-35"), // [0,2,4,6,8,A]
    entry(0x531111, "6-Z36"), // [0,1,2,3,4,7]
    entry(0x441111, "6-Z37"), // [0,1,2,3,4,8]
    entry(0x414111, "6-Z38"), // [0,1,2,3,7,8]
    entry(0x431112, "6-Z39"), // [0,2,3,4,5,8]
    entry(0x432111, "6-Z40"), // [0,1,2,3,5,8]
    entry(0x423111, "6-Z41"), // [0,1,2,3,6,8]
    entry(0x333111, "6-Z42"), // [0,1,2,3,6,9]
    entry(0x421311, "6-Z43"), // [0,1,2,5,6,8]
    entry(0x331311, "6-Z44"), // [0,1,2,5,6,9]
    entry(0x332112, "6-Z45"), // [0,2,3,4,6,9]
    entry(0x332211, "6-Z46"), // [0,1,2,4,6,9]
    entry(0x323211, "6-Z47"), // [0,1,2,4,7,9]
    entry(0x322311, "6-Z48"), // [0,1,2,5,7,9]
    entry(0x323121, "6-Z49"), // [0,1,3,4,7,9]
    entry(0x321231, "6-Z50"), // [0,1,4,6,7,9]

    // Septachords
    entry(0x6111111, "7-1"), // [0,1,2,3,4,5,6]
    entry(0x5211111, "7-2"), // [0,1,2,3,4,5,7]
    entry(0x4311111, "7-3"), // [0,1,2,3,4,5,8]
    entry(0x5121111, "7-4"), // [0,1,2,3,4,6,7]
    entry(0x5112111, "7-5"), // [0,1,2,3,5,6,7]
    entry(0x4131111, "7-6"), // [0,1,2,3,4,7,8]
    entry(0x4113111, "7-7"), // [0,1,2,3,6,7,8]
    entry(0x4211112, "7-8"), // [0,2,3,4,5,6,8]
    entry(0x4221111, "7-9"), // [0,1,2,3,4,6,8]
    entry(0x3321111, "7-10"), // [0,1,2,3,4,6,9]
    entry(0x4211121, "7-11"), // [0,1,3,4,5,6,8]
    entry(0x3231111, "7-Z12"), // [0,1,2,3,4,7,9]
    entry(0x4211211, "7-13"), // [0,1,2,4,5,6,8]
    entry(0x4122111, "7-14"), // [0,1,2,3,5,7,8]
    entry(0x4112211, "7-15"), // [0,1,2,4,6,7,8]
    entry(0x3312111, "7-16"), // [0,1,2,3,5,6,9]
    entry(0x3311211, "7-Z17"), // [0,1,2,4,5,6,9]
    entry(0x3211131, "7-Z18"), // [0,1,4,5,6,7,9]
    entry(0x3213111, "7-19"), // [0,1,2,3,6,7,9]
    entry(0x3211311, "7-20"), // [0,1,2,5,6,7,9]
    entry(0x3131211, "7-21"), // [0,1,2,4,5,8,9]
    entry(0x3121311, "7-22"), // [0,1,2,5,6,8,9]
    entry(0x3221112, "7-23"), // [0,2,3,4,5,7,9]
    entry(0x3222111, "7-24"), // [0,1,2,3,5,7,9]
    entry(0x3212112, "7-25"), // [0,2,3,4,6,7,9]
    entry(0x3221121, "7-26"), // [0,1,3,4,5,7,9]
    entry(0x3221211, "7-27"), // [0,1,2,4,5,7,9]
    entry(0x3211221, "7-28"), // [0,1,3,5,6,7,9]
    entry(0x3212211, "7-29"), // [0,1,2,4,6,7,9]
    entry(0x3122211, "7-30"), // [0,1,2,4,6,8,9]
    entry(0x3212121, "7-31"), // [0,1,3,4,6,7,9]
    entry(0x3122121, "7-32"), // [0,1,3,4,6,8,9]
    entry(0x2222211, "7-33"), // [0,1,2,4,6,8,A]
    entry(0x2222121, "7-34"), // [0,1,3,4,6,8,A]
    entry(0x2221221, "7-35"), // [0,1,3,5,6,8,A]
    entry(0x4212111, "7-Z36"), // [0,1,2,3,5,6,8]
    entry(0x4121121, "7-Z37"), // [0,1,3,4,5,7,8]
    entry(0x4121211, "7-Z38"), // [0,1,2,4,5,7,8]

    // Octachords
    entry(0x51111111, "8-1"), // [0,1,2,3,4,5,6,7]
    entry(0x42111111, "8-2"), // [0,1,2,3,4,5,6,8]
    entry(0x33111111, "8-3"), // [0,1,2,3,4,5,6,9]
    entry(0x41211111, "8-4"), // [0,1,2,3,4,5,7,8]
    entry(0x41121111, "8-5"), // [0,1,2,3,4,6,7,8]
    entry(0x41112111, "8-6"), // [0,1,2,3,5,6,7,8]
    entry(0x31311111, "8-7"), // [0,1,2,3,4,5,8,9]
    entry(0x31131111, "8-8"), // [0,1,2,3,4,7,8,9]
    entry(0x31113111, "8-9"), // [0,1,2,3,6,7,8,9]
    entry(0x32111112, "8-10"), // [0,2,3,4,5,6,7,9]
    entry(0x32211111, "8-11"), // [0,1,2,3,4,5,7,9]
    entry(0x32111121, "8-12"), // [0,1,3,4,5,6,7,9]
    entry(0x32121111, "8-13"), // [0,1,2,3,4,6,7,9]
    entry(0x32111211, "8-14"), // [0,1,2,4,5,6,7,9]
    entry(0x31221111, "8-Z15"), // [0,1,2,3,4,6,8,9]
    entry(0x31122111, "8-16"), // [0,1,2,3,5,7,8,9]
    entry(0x31211121, "8-17"), // [0,1,3,4,5,6,8,9]
    entry(0x31212111, "8-18"), // [0,1,2,3,5,6,8,9]
    entry(0x31211211, "8-19"), // [0,1,2,4,5,6,8,9]
    entry(0x31121211, "8-20"), // [0,1,2,4,5,7,8,9]
    entry(0x22221111, "8-21"), // [0,1,2,3,4,6,8,A]
    entry(0x22212111, "8-22"), // [0,1,2,3,5,6,8,A]
    entry(0x22122111, "8-23"), // [0,1,2,3,5,7,8,A]
    entry(0x22211211, "8-24"), // [0,1,2,4,5,6,8,A]
    entry(0x22112211, "8-25"), // [0,1,2,4,6,7,8,A]
    entry(0x22121121, "8-26"), // [0,1,3,4,5,7,8,A]
    entry(0x22121211, "8-27"), // [0,1,2,4,5,7,8,A]
    entry(0x21212121, "8-28"), // [0,1,3,4,6,7,9,A]
    entry(0x32112111, "8-Z29"), // [0,1,2,3,5,6,7,9]

    // Nonachords
    entry(0x411111111, "9-1"), // [0,1,2,3,4,5,6,7,8]
    entry(0x321111111, "9-2"), // [0,1,2,3,4,5,6,7,9]
    entry(0x312111111, "9-3"), // [0,1,2,3,4,5,6,8,9]
    entry(0x311211111, "9-4"), // [0,1,2,3,4,5,7,8,9]
    entry(0x311121111, "9-5"), // [0,1,2,3,4,6,7,8,9]
    entry(0x222111111, "9-6"), // [0,1,2,3,4,5,6,8,A]
    entry(0x221211111, "9-7"), // [0,1,2,3,4,5,7,8,A]
    entry(0x221121111, "9-8"), // [0,1,2,3,4,6,7,8,A]
    entry(0x221112111, "9-9"), // [0,1,2,3,5,6,7,8,A]
    entry(0x212121111, "9-10"), // [0,1,2,3,4,6,7,9,A]
    entry(0x212112111, "9-11"), // [0,1,2,3,5,6,7,9,A]
    entry(0x211211211, "9-12"), // [0,1,2,4,5,6,8,9,A]

    // Decachords
    entry(0x3111111111, "10-1"), // [0,1,2,3,4,5,6,7,8,9]
    entry(0x2211111111, "10-2"), // [0,1,2,3,4,5,6,7,8,A]
    entry(0x2121111111, "10-3"), // [0,1,2,3,4,5,6,7,9,A]
    entry(0x2112111111, "10-4"), // [0,1,2,3,4,5,6,8,9,A]
    entry(0x2111211111, "10-5"), // [0,1,2,3,4,5,7,8,9,A]
    entry(0x2111121111, "10-6"), // [0,1,2,3,4,6,7,8,9,A]

    // Undecachords
    entry(0x21111111111, "11-1"), // [0,1,2,3,4,5,6,7,8,9,A]

    // Aggregate
    entry(0x111111111111, "12-1"), // [0,1,2,3,4,5,6,7,8,9,A,B]
];

/// Read-only view over the static catalog table.
pub struct ReferenceCatalog {
    entries: &'static [CatalogEntry],
}

/// The process-wide catalog.
pub static CATALOG: ReferenceCatalog = ReferenceCatalog { entries: &ENTRIES };

impl ReferenceCatalog {
    pub fn entries(&self) -> &'static [CatalogEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static CatalogEntry> {
        self.entries.get(index)
    }

    /// Catalog index of a prime-form identifier.
    pub fn find_id(&self, id: SetId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Catalog index of a Forte code, ignoring ASCII case (`"4-z15"` works).
    pub fn find_code(&self, code: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.code.eq_ignore_ascii_case(code))
    }

    pub fn prime_id(&self, index: usize) -> Option<SetId> {
        self.get(index).map(|e| e.id)
    }

    pub fn code(&self, index: usize) -> Option<&'static str> {
        self.get(index).map(|e| e.code)
    }
}
