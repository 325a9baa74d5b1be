//! Square sets packed into 64-bit words, plus the precomputed attack tables that use them
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
//! # Tables
//! Every table is indexed by square and built on first use. Call [`init`](fn.init.html) to pay
//! that cost up front.
//!
//! Leapers need nothing but their origin:
//!
//! ```rust
//! use chess::Square;
//! use chess::bitboard::knight_attacks;
//!
//! let targets: Vec<Square> = knight_attacks(Square::H1).into_iter().collect();
//! assert_eq!(targets, vec![Square::F2, Square::G3]);
//! ```
//!
//! Sliders also take the occupied squares. A ray stops on the first occupied square it reaches,
//! and that square is included in the result:
//!
//! ```rust
//! use chess::Square;
//! use chess::bitboard::{Bitboard, rook_attacks};
//!
//! let occ = Bitboard::from(Square::A2) | Square::C1.into();
//! let targets: Vec<Square> = rook_attacks(Square::A1, occ).into_iter().collect();
//! assert_eq!(targets, vec![Square::B1, Square::C1, Square::A2]);
//! ```
//!
//! Pawns get separate tables for single advances, double advances from the starting rank, and
//! captures:
//!
//! ```rust
//! use chess::{Color, Square};
//! use chess::bitboard::{pawn_advances, pawn_double_advances, pawn_attacks};
//!
//! assert_eq!(pawn_advances(Color::Black, Square::A7).peek(), Some(Square::A6));
//! assert_eq!(pawn_double_advances(Color::Black, Square::A7).peek(), Some(Square::A5));
//! assert!(pawn_double_advances(Color::Black, Square::A6).is_empty());
//! assert_eq!(pawn_attacks(Color::White, Square::A2).len(), 1);
//! ```
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::iter::FromIterator;
use std::ops;
use std::fmt;
use super::*;

mod attacks;
pub use attacks::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A set of squares, one bit per square
///
/// Bit `n` stands for the square whose index is `n`, so `A1` is the lowest bit, `H1` is bit 7 and
/// `H8` is the highest bit. Iterating yields squares in index order.
///
/// The usual bit operators (`|`, `&`, `^`, `!` and their assigning forms) work as set union,
/// intersection, symmetric difference and complement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Bitboard(u64);

fn square_at(bit: u32) -> Square {
    (bit as usize).try_into().expect("INFALLIBLE")
}

impl Bitboard {
    /// The empty set
    pub fn new() -> Bitboard {
        Bitboard(0)
    }

    /// Number of squares in the set
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if no square is set
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `sq` is in the set
    pub fn contains(self, sq: Square) -> bool {
        self.0 >> sq as u64 & 1 != 0
    }

    /// Returns `true` if the two sets share at least one square
    pub fn intersects(self, other: Bitboard) -> bool {
        self.0 & other.0 != 0
    }

    /// Adds `sq` to the set
    pub fn insert(&mut self, sq: Square) {
        self.0 |= 1 << sq as u64;
    }

    /// Takes `sq` out of the set
    pub fn remove(&mut self, sq: Square) {
        self.0 &= !(1 << sq as u64);
    }

    /// Flips the membership of `sq`
    pub fn toggle(&mut self, sq: Square) {
        self.0 ^= 1 << sq as u64;
    }

    /// Lowest square in the set
    pub fn peek(self) -> Option<Square> {
        if self.is_empty() { None } else { Some(square_at(self.0.trailing_zeros())) }
    }

    /// Highest square in the set
    pub fn peek_last(self) -> Option<Square> {
        if self.is_empty() { None } else { Some(square_at(63 - self.0.leading_zeros())) }
    }

    /// Takes the lowest square out of the set and returns it
    pub fn pop(&mut self) -> Option<Square> {
        let sq = self.peek()?;
        self.0 &= self.0 - 1;
        Some(sq)
    }
}

macro_rules! set_operators {
    ($($op:ident::$f:ident, $assign_op:ident::$assign_f:ident => $sym:tt;)*) => {$(
        impl ops::$op for Bitboard {
            type Output = Bitboard;

            fn $f(self, rhs: Bitboard) -> Bitboard {
                Bitboard(self.0 $sym rhs.0)
            }
        }

        impl ops::$assign_op for Bitboard {
            fn $assign_f(&mut self, rhs: Bitboard) {
                *self = *self $sym rhs;
            }
        }
    )*};
}

set_operators! {
    BitAnd::bitand, BitAndAssign::bitand_assign => &;
    BitOr::bitor, BitOrAssign::bitor_assign => |;
    BitXor::bitxor, BitXorAssign::bitxor_assign => ^;
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard(!self.0)
    }
}

impl fmt::Display for Bitboard {
    /// Draws the set as eight rows, rank 8 first, with `1` for members and `.` for the rest
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &row in self.0.to_be_bytes().iter() {
            for file in 0..File::COUNT {
                f.write_str(if row >> file & 1 != 0 { "1" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl From<Square> for Bitboard {
    fn from(sq: Square) -> Bitboard {
        Bitboard(1 << sq as u64)
    }
}

impl From<Rank> for Bitboard {
    fn from(r: Rank) -> Bitboard {
        Bitboard(0xff << (8 * r as u64))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        IntoIter(self)
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item=Square>>(iter: I) -> Bitboard {
        let mut bb = Bitboard::new();
        bb.extend(iter);
        bb
    }
}

impl Extend<Square> for Bitboard {
    fn extend<I: IntoIterator<Item=Square>>(&mut self, iter: I) {
        iter.into_iter().for_each(|sq| self.insert(sq));
    }
}

/// Squares of a `Bitboard`, lowest first
#[derive(Debug, Copy, Clone)]
pub struct IntoIter(Bitboard);

impl Iterator for IntoIter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        self.0.pop()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.len();
        (n, Some(n))
    }
}
