//! Bitmate - Magic numbers for sliding piece lookups
//!
//! A magic multiplier maps every blocker subset of a square's relevance mask
//! to a slot of a dense attack table: `(occupancy & mask) * magic >> (64 - bits)`.
//! The embedded constants below were found with [`MagicSearch`] and are
//! verified again whenever the attack tables are built.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::bitboard::{
    bishop_attacks_on_the_fly, bishop_relevance_mask, rook_attacks_on_the_fly,
    rook_relevance_mask, set_occupancy,
};
use crate::error::{ChessError, ChessResult};
use crate::types::Square;

/// Seed used by the magic search unless the caller picks another
pub const DEFAULT_MAGIC_SEED: u64 = 1804289383;

/// Candidates probed per square before giving up
pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000_000;

/// Candidates whose product with the mask sets fewer high-byte bits are skipped
const MIN_HIGH_BYTE_BITS: u32 = 6;

#[rustfmt::skip]
pub const ROOK_MAGICS: [u64; 64] = [
    0x26800422c0008110, 0x0040002000100040, 0x4880082000100081, 0x1880068010000800,
    0x1900100402080100, 0x0200080490010200, 0x03000c4100008a00, 0x22800a4100042a80,
    0xc814800022400086, 0x4400400020100048, 0xd200808020001000, 0x4412001008402600,
    0x1001000408001100, 0x0212000802011004, 0x404200014a001488, 0x0040800080004100,
    0x0000908000400822, 0x00b0004000402008, 0x0000848020001000, 0x0020090021001000,
    0x1004008008000480, 0x0c01010002080400, 0x0000140028110250, 0x022002000100508c,
    0x0000401080002080, 0x0140400080201080, 0x0081200100110b40, 0x0080081200402200,
    0x0000080080800400, 0x1010040080800200, 0x0024020080800100, 0xa280110200208044,
    0x0000400080800023, 0x8000400080802001, 0x0000402001001900, 0x14d0008111800800,
    0x0010040080800802, 0x0200020080800400, 0x6101000401010200, 0x0041040442000991,
    0x000060c00d808002, 0x0450002000414000, 0x0001004020050010, 0x0001100500a10008,
    0x0088040008008080, 0x0002200410080140, 0x0000010002008080, 0x0004108519520004,
    0x002e2100c8801100, 0x0082401000200140, 0x0001001420004900, 0x2c00221000390300,
    0x4981001008000500, 0x0010800400060180, 0x0040014210080400, 0x0000004c10810200,
    0x0500914024800101, 0x0000402082010012, 0x0002200010084301, 0x8000100100200409,
    0x0409000208009005, 0x8812000108041002, 0x0040100102482084, 0x0410102411008042,
];

#[rustfmt::skip]
pub const BISHOP_MAGICS: [u64; 64] = [
    0x8012101202104208, 0x0051901100408024, 0x0004090222082000, 0x1011104a00020005,
    0x00084840000c0048, 0x20c8900460122a01, 0x0006921010040002, 0x8000403808080400,
    0x2002104401082210, 0x000020010a060444, 0x0022120802082280, 0x8244490407001000,
    0x0428184840600000, 0x0800020111082608, 0x1040111088200800, 0x0100010400820808,
    0x0004102120044100, 0x0402400810094210, 0x80100008008c1010, 0x0008004092024044,
    0x456e008c020a0028, 0x0804200202012001, 0x00021106880c2210, 0x0445000028880400,
    0x0218050020204a48, 0x0802901042840800, 0x0120410028080105, 0x0cc0040000410020,
    0x0000840012802000, 0x00080041820100a0, 0x0012020104012110, 0x200109c821014830,
    0x0001045000212004, 0x0202080500204141, 0x1080104400080810, 0x8084040400080210,
    0x0c40010010010041, 0x9210900100028088, 0x1010408080160240, 0x0004012440002401,
    0x110914200400e071, 0x40020a0505406044, 0x0082082804000804, 0x2318006018000908,
    0x31006008a0800c00, 0x4001320802000110, 0x1945080800480100, 0x80010c5102020040,
    0x8000420220202000, 0x0410420084a00401, 0x4050250405540500, 0x1000200020880000,
    0x0a40801042120000, 0x0040046004210050, 0x1810a00801004024, 0x0004080084008a01,
    0x010210c610042040, 0x4240028404028200, 0x1102004282882103, 0x100a000204208801,
    0x002a094021204102, 0x8100401024108420, 0x002018610404114a, 0x0020011000810041,
];

/// The two sliding move patterns that need magic lookups
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slider {
    Bishop,
    Rook,
}

impl Slider {
    pub const ALL: [Slider; 2] = [Slider::Bishop, Slider::Rook];

    pub fn relevance_mask(self, sq: Square) -> u64 {
        match self {
            Slider::Bishop => bishop_relevance_mask(sq),
            Slider::Rook => rook_relevance_mask(sq),
        }
    }

    pub fn attacks_on_the_fly(self, sq: Square, block: u64) -> u64 {
        match self {
            Slider::Bishop => bishop_attacks_on_the_fly(sq, block),
            Slider::Rook => rook_attacks_on_the_fly(sq, block),
        }
    }

    pub fn embedded_magics(self) -> &'static [u64; 64] {
        match self {
            Slider::Bishop => &BISHOP_MAGICS,
            Slider::Rook => &ROOK_MAGICS,
        }
    }
}

impl fmt::Display for Slider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slider::Bishop => write!(f, "bishop"),
            Slider::Rook => write!(f, "rook"),
        }
    }
}

/// Hash a relevant occupancy into a table slot
#[inline]
pub fn magic_index(relevant_occupancy: u64, magic: u64, bits: u32) -> usize {
    (relevant_occupancy.wrapping_mul(magic) >> (64 - bits)) as usize
}

/// Fill `slots` with the attack set of every blocker subset of `mask`.
///
/// Returns `false` as soon as two subsets with different attack sets hash to
/// the same slot. `slots` must hold `1 << mask.count_ones()` entries.
pub(crate) fn fill_slots(
    slider: Slider,
    sq: Square,
    mask: u64,
    magic: u64,
    slots: &mut [u64],
) -> bool {
    let bits = mask.count_ones();
    slots.fill(0);

    for index in 0..(1usize << bits) {
        let occupancy = set_occupancy(index, mask);
        let attacks = slider.attacks_on_the_fly(sq, occupancy);
        let slot = &mut slots[magic_index(occupancy, magic, bits)];
        // Slider attack sets are never empty, so zero marks a free slot
        if *slot == 0 {
            *slot = attacks;
        } else if *slot != attacks {
            return false;
        }
    }

    true
}

/// Randomized search for collision-free magic multipliers.
///
/// The generator is owned by the search and seeded explicitly, so the same
/// seed always yields the same magics.
pub struct MagicSearch {
    rng: StdRng,
    max_attempts: u64,
}

impl MagicSearch {
    pub fn new(seed: u64) -> Self {
        MagicSearch {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sparse random candidate: the AND of three draws keeps about 8 bits set
    fn candidate(&mut self) -> u64 {
        self.rng.gen::<u64>() & self.rng.gen::<u64>() & self.rng.gen::<u64>()
    }

    /// Find a magic for `slider` on `sq` that hashes all blocker subsets without collision
    pub fn find_magic(&mut self, slider: Slider, sq: Square) -> ChessResult<u64> {
        let mask = slider.relevance_mask(sq);
        let mut slots = vec![0u64; 1 << mask.count_ones()];

        for attempt in 0..self.max_attempts {
            let magic = self.candidate();
            if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < MIN_HIGH_BYTE_BITS {
                continue;
            }

            if fill_slots(slider, sq, mask, magic, &mut slots) {
                debug!(%slider, square = %sq, attempt, magic, "magic found");
                return Ok(magic);
            }
        }

        Err(ChessError::MagicSearchExhausted {
            slider,
            square: sq,
            attempts: self.max_attempts,
        })
    }

    /// Find magics for every square of `slider`
    pub fn find_all(&mut self, slider: Slider) -> ChessResult<[u64; 64]> {
        let mut magics = [0u64; 64];
        for sq in Square::ALL {
            magics[sq.index()] = self.find_magic(slider, sq)?;
        }
        Ok(magics)
    }
}

impl Default for MagicSearch {
    fn default() -> Self {
        MagicSearch::new(DEFAULT_MAGIC_SEED)
    }
}

/// Format a magic table as a Rust constant declaration
pub fn format_magics(name: &str, magics: &[u64; 64]) -> String {
    let mut out = format!("pub const {name}: [u64; 64] = [\n");
    for row in magics.chunks(4) {
        out.push_str("   ");
        for magic in row {
            out.push_str(&format!(" {magic:#018x},"));
        }
        out.push('\n');
    }
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_magics_are_collision_free() {
        for slider in Slider::ALL {
            for sq in Square::ALL {
                let mask = slider.relevance_mask(sq);
                let mut slots = vec![0u64; 1 << mask.count_ones()];
                let magic = slider.embedded_magics()[sq.index()];
                assert!(fill_slots(slider, sq, mask, magic, &mut slots), "{slider} {sq}");
            }
        }
    }

    #[test]
    fn search_finds_valid_magics() {
        let mut search = MagicSearch::new(7);
        for (slider, sq) in [(Slider::Bishop, Square::D4), (Slider::Rook, Square::E4)] {
            let magic = search.find_magic(slider, sq).unwrap();
            let mask = slider.relevance_mask(sq);
            let mut slots = vec![0u64; 1 << mask.count_ones()];
            assert!(fill_slots(slider, sq, mask, magic, &mut slots));
        }
    }

    #[test]
    fn search_is_deterministic_for_a_seed() {
        let a = MagicSearch::new(42).find_magic(Slider::Bishop, Square::A1).unwrap();
        let b = MagicSearch::new(42).find_magic(Slider::Bishop, Square::A1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn exhausted_search_is_an_error() {
        let mut search = MagicSearch::new(1).with_max_attempts(0);
        let err = search.find_magic(Slider::Rook, Square::A8).unwrap_err();
        assert_eq!(
            err,
            ChessError::MagicSearchExhausted {
                slider: Slider::Rook,
                square: Square::A8,
                attempts: 0,
            }
        );
    }

    #[test]
    fn formatted_magics_list_every_square() {
        let text = format_magics("ROOK_MAGICS", &ROOK_MAGICS);
        assert!(text.starts_with("pub const ROOK_MAGICS: [u64; 64] = ["));
        assert_eq!(text.matches("0x").count(), 64);
    }
}
