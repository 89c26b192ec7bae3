//! Bitmate - Precomputed attack tables
//!
//! Leaper attacks (pawn, knight, king) are stored per square. Slider attacks
//! (bishop, rook) are stored in one dense table per slider, addressed by a
//! per-square offset plus the magic hash of the relevant occupancy.
//!
//! Tables are immutable once built. [`shared`] builds the process-wide
//! instance on first use and hands out `&'static` references to it.

use std::sync::OnceLock;

use tracing::debug;

use crate::bitboard::{king_attack_mask, knight_attack_mask, pawn_attack_mask};
use crate::error::{ChessError, ChessResult};
use crate::magic::{fill_slots, magic_index, MagicSearch, Slider};
use crate::types::{Color, Square};

/// Magic lookup data for one slider
#[derive(Clone)]
pub struct SliderTable {
    masks: [u64; 64],
    magics: [u64; 64],
    bits: [u32; 64],
    offsets: [usize; 64],
    attacks: Vec<u64>,
}

impl SliderTable {
    fn new(slider: Slider, magics: &[u64; 64]) -> ChessResult<Self> {
        let mut masks = [0u64; 64];
        let mut bits = [0u32; 64];
        let mut offsets = [0usize; 64];
        let mut total = 0usize;

        for sq in Square::ALL {
            let i = sq.index();
            masks[i] = slider.relevance_mask(sq);
            bits[i] = masks[i].count_ones();
            offsets[i] = total;
            total += 1usize << bits[i];
        }

        let mut attacks = vec![0u64; total];
        for sq in Square::ALL {
            let i = sq.index();
            let slots = &mut attacks[offsets[i]..offsets[i] + (1usize << bits[i])];
            if !fill_slots(slider, sq, masks[i], magics[i], slots) {
                return Err(ChessError::MagicCollision { slider, square: sq });
            }
        }

        debug!(%slider, entries = total, "slider table built");

        Ok(SliderTable {
            masks,
            magics: *magics,
            bits,
            offsets,
            attacks,
        })
    }

    #[inline]
    pub fn attacks(&self, sq: Square, occupancy: u64) -> u64 {
        let i = sq.index();
        let index = magic_index(occupancy & self.masks[i], self.magics[i], self.bits[i]);
        self.attacks[self.offsets[i] + index]
    }

    pub fn mask(&self, sq: Square) -> u64 {
        self.masks[sq.index()]
    }

    pub fn magics(&self) -> &[u64; 64] {
        &self.magics
    }
}

/// All attack lookups used by move generation and attack detection
#[derive(Clone)]
pub struct AttackTables {
    pawn: [[u64; 64]; 2],
    knight: [u64; 64],
    king: [u64; 64],
    bishop: SliderTable,
    rook: SliderTable,
}

impl AttackTables {
    /// Build tables from the embedded magic constants
    pub fn build() -> ChessResult<Self> {
        Self::with_magics(
            Slider::Bishop.embedded_magics(),
            Slider::Rook.embedded_magics(),
        )
    }

    /// Build tables from magics found by a fresh randomized search
    pub fn generate(search: &mut MagicSearch) -> ChessResult<Self> {
        let bishop = search.find_all(Slider::Bishop)?;
        let rook = search.find_all(Slider::Rook)?;
        Self::with_magics(&bishop, &rook)
    }

    /// Build tables from caller-supplied magics, verifying each one
    pub fn with_magics(bishop_magics: &[u64; 64], rook_magics: &[u64; 64]) -> ChessResult<Self> {
        let mut pawn = [[0u64; 64]; 2];
        let mut knight = [0u64; 64];
        let mut king = [0u64; 64];

        for sq in Square::ALL {
            let i = sq.index();
            pawn[Color::White.index()][i] = pawn_attack_mask(Color::White, sq);
            pawn[Color::Black.index()][i] = pawn_attack_mask(Color::Black, sq);
            knight[i] = knight_attack_mask(sq);
            king[i] = king_attack_mask(sq);
        }

        Ok(AttackTables {
            pawn,
            knight,
            king,
            bishop: SliderTable::new(Slider::Bishop, bishop_magics)?,
            rook: SliderTable::new(Slider::Rook, rook_magics)?,
        })
    }

    /// Squares a pawn of `color` on `sq` attacks
    #[inline]
    pub fn pawn_attacks(&self, color: Color, sq: Square) -> u64 {
        self.pawn[color.index()][sq.index()]
    }

    #[inline]
    pub fn knight_attacks(&self, sq: Square) -> u64 {
        self.knight[sq.index()]
    }

    #[inline]
    pub fn king_attacks(&self, sq: Square) -> u64 {
        self.king[sq.index()]
    }

    #[inline]
    pub fn bishop_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.bishop.attacks(sq, occupancy)
    }

    #[inline]
    pub fn rook_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.rook.attacks(sq, occupancy)
    }

    #[inline]
    pub fn queen_attacks(&self, sq: Square, occupancy: u64) -> u64 {
        self.bishop.attacks(sq, occupancy) | self.rook.attacks(sq, occupancy)
    }

    pub fn slider(&self, slider: Slider) -> &SliderTable {
        match slider {
            Slider::Bishop => &self.bishop,
            Slider::Rook => &self.rook,
        }
    }
}

static TABLES: OnceLock<AttackTables> = OnceLock::new();

/// The process-wide tables, built from the embedded magics on first call
pub fn shared() -> ChessResult<&'static AttackTables> {
    if let Some(tables) = TABLES.get() {
        return Ok(tables);
    }
    let tables = AttackTables::build()?;
    Ok(TABLES.get_or_init(|| tables))
}
