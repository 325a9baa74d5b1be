//! Contains the move value type
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::mem;
use std::str::FromStr;
use lazy_static::lazy_static;
use regex::Regex;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Which piece to promote to for a promotion move
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Promotion {
    ToKnight = 1,
    ToBishop = 2,
    ToRook = 3,
    ToQueen = 4,
}

use Promotion::*;

impl Promotion {
    /// Every promotion, in the order the move generator produces them
    pub const ALL: [Promotion; 4] = [ ToBishop, ToKnight, ToRook, ToQueen ];

    fn to_char(self) -> char {
        match self {
            ToKnight => 'n',
            ToBishop => 'b',
            ToRook => 'r',
            ToQueen => 'q',
        }
    }

    fn from_char(c: char) -> Option<Promotion> {
        match c.to_ascii_lowercase() {
            'n' => Some(ToKnight),
            'b' => Some(ToBishop),
            'r' => Some(ToRook),
            'q' => Some(ToQueen),
            _ => None,
        }
    }
}

impl Default for Promotion {
    fn default() -> Self {
        ToQueen
    }
}

impl From<Promotion> for Piece {
    fn from(prom: Promotion) -> Self {
        unsafe { mem::transmute::<Promotion, Piece>(prom) }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A move described by its origin, destination and, for pawns reaching the last rank, the piece
/// promoted to.
///
/// A `Move` is not tied to any position. Whether it can be played is decided by
/// [`Position::is_legal_move`](struct.Position.html#method.is_legal_move). Castling is written as
/// the king's two-square move, and an en-passant capture as the capturing pawn's move.
///
/// Moves are written in coordinate notation:
///
/// ```
/// use chess::{Move, Promotion, Square};
///
/// let mv: Move = "e7e8q".parse().unwrap();
/// assert_eq!(mv, Move::with_promotion(Square::E7, Square::E8, Promotion::ToQueen));
/// assert_eq!(mv.to_string(), "e7e8q");
/// assert!("e7e9".parse::<Move>().is_err());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    /// The square the moving piece starts on
    pub from: Square,
    /// The square the moving piece ends on
    pub to: Square,
    /// The piece a pawn is promoted to
    pub promotion: Option<Promotion>,
}

impl Move {
    /// Creates a move without promotion
    pub fn new(from: Square, to: Square) -> Move {
        Move { from, to, promotion: None }
    }

    /// Creates a promotion move
    pub fn with_promotion(from: Square, to: Square, promotion: Promotion) -> Move {
        Move { from, to, promotion: Some(promotion) }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = self.from.to_string() + &self.to.to_string();
        if let Some(prom) = self.promotion {
            s.push(prom.to_char());
        }
        s.fmt(f)
    }
}

lazy_static! {
    static ref MOVE_REGEX: Regex =
        Regex::new(r"^([a-h][1-8])([a-h][1-8])([nbrqNBRQ])?$").expect("INFALLIBLE");
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let caps = MOVE_REGEX.captures(s.trim()).ok_or(Error::ParseError)?;
        let from = caps[1].parse()?;
        let to = caps[2].parse()?;
        let promotion = caps.get(3)
            .and_then(|m| m.as_str().chars().next())
            .and_then(Promotion::from_char);

        Ok(Move { from, to, promotion })
    }
}
