//! Contains structure and data for Zobrist hash keys
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use lazy_static::lazy_static;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A 64-bit hash key generated from a position
///
/// Two positions with the same pieces on the same squares, the same side to move, the same
/// castling rights and the same en-passant square always have the same key, in every run of the
/// program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Zobrist(u64);

impl Zobrist {
    /// Creates a new zobrist key
    pub fn new() -> Zobrist {
        Zobrist(0)
    }

    /// Toggles piece placement
    pub fn toggle_piece_placement(&mut self, c: Color, p: Piece, sq: Square) {
        self.0 ^= KEYS.piece_placement[c as usize][p as usize][sq as usize];
    }

    /// Toggles an en passant square
    pub fn toggle_ep_square(&mut self, sq: Square) {
        self.0 ^= KEYS.ep_file[sq.file() as usize];
    }

    /// Toggles a set of castling rights
    pub fn toggle_castling_rights(&mut self, rights: CastlingRights) {
        self.0 ^= KEYS.castling[rights.bits() as usize];
    }

    /// Toggles the side to move
    pub fn toggle_turn(&mut self) {
        self.0 ^= KEYS.black_move;
    }
}

impl fmt::Display for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl fmt::LowerHex for Zobrist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<Zobrist> for u64 {
    fn from(key: Zobrist) -> Self {
        key.0
    }
}

// the keys must not change between runs, so they come from a fixed seed
const SEED: u64 = 0x7a6f_6272_6973_7421;

struct Keys {
    piece_placement: [[[u64; Square::COUNT]; Piece::COUNT]; Color::COUNT],
    ep_file: [u64; File::COUNT],
    castling: [u64; 16],
    black_move: u64,
}

lazy_static! {
    static ref KEYS: Keys = Keys::generate();
}

impl Keys {
    fn generate() -> Keys {
        let mut rng = StdRng::seed_from_u64(SEED);
        let mut keys = Keys {
            piece_placement: [[[0; Square::COUNT]; Piece::COUNT]; Color::COUNT],
            ep_file: [0; File::COUNT],
            castling: [0; 16],
            black_move: 0,
        };

        for color in keys.piece_placement.iter_mut() {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }
        for key in keys.ep_file.iter_mut() {
            *key = rng.gen();
        }

        // one key per right; a set of rights is the xor of its members
        let rights: Vec<u64> = (0..4).map(|_| rng.gen()).collect();
        for (bits, key) in keys.castling.iter_mut().enumerate() {
            *key = rights.iter()
                .enumerate()
                .filter(|&(i, _)| bits & (1 << i) != 0)
                .fold(0, |acc, (_, k)| acc ^ k);
        }

        keys.black_move = rng.gen();

        keys
    }
}
