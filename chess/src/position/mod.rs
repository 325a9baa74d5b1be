//! Contains structures related to the `Position`
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::convert::TryInto;
use std::fmt;
use std::ops;
use std::str::FromStr;
use super::*;

use bitboard::*;

use Color::*;
use Piece::*;

pub mod builder;
pub mod zobrist;
mod attacks;
mod movegen;
mod legal;
mod execute;

use builder::PositionBuilder;
use zobrist::Zobrist;
pub use legal::{CheckConstraint, Pin};

/// FEN of the standard starting position
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A representation of the arrangement of pieces on the board at a given point in the game, as well
/// as castling availability and en passant legality.
///
/// Pieces are stored twice: in a mailbox indexed by square, and in one bitboard per color and
/// piece type. Every method that changes the position keeps both in agreement, along with the
/// cached king squares and the Zobrist key.
#[allow(missing_copy_implementations)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<(Color, Piece)>; Square::COUNT],
    occ_squares: Bitboard,
    occ_by_color: [Bitboard; Color::COUNT],
    occ_by_piece: [[Bitboard; Piece::COUNT]; Color::COUNT],
    kings: [Square; Color::COUNT],
    turn: Color,

    in_check: bool,
    ep_square: Option<Square>,
    castling_rights: CastlingRights,

    halfmove_clock: usize,
    fullmove_number: usize,
    zobrist: Zobrist,
}

impl Position {
    /// Returns the standard starting Position
    pub fn new() -> Position {
        const BACK_RANK: [Piece; File::COUNT] = [
            Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook,
        ];

        let mut builder = PositionBuilder::new();
        for (f, &piece) in BACK_RANK.iter().enumerate() {
            let file: File = f.try_into().expect("INFALLIBLE");
            builder
                .piece(White, piece, Square::from_coord(file, Rank::R1))
                .piece(White, Pawn, Square::from_coord(file, Rank::R2))
                .piece(Black, Pawn, Square::from_coord(file, Rank::R7))
                .piece(Black, piece, Square::from_coord(file, Rank::R8));
        }
        builder.castling_rights(CastlingRights::ALL);

        builder.validate().expect("INFALLIBLE")
    }

    /// Returns a position with an empty board
    fn empty_board() -> Position {
        Position {
            board: [None; Square::COUNT],
            occ_squares: Bitboard::new(),
            occ_by_color: [Bitboard::new(); Color::COUNT],
            occ_by_piece: [[Bitboard::new(); Piece::COUNT]; Color::COUNT],
            kings: [Square::E1, Square::E8],
            turn: White,
            in_check: false,
            ep_square: None,
            castling_rights: CastlingRights::NONE,
            halfmove_clock: 0,
            fullmove_number: 1,
            zobrist: Zobrist::new(),
        }
    }

    /// Returns the player whose turn it is
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// Returns the color and type of the piece on `sq`, if any
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.board[sq as usize]
    }

    /// Returns the set of all occupied squares
    pub fn occupied(&self) -> Bitboard {
        self.occ_squares
    }

    /// Returns the squares occupied by `color`
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.occ_by_color[color as usize]
    }

    /// Returns the squares occupied by `color`'s pieces of type `piece`
    pub fn occupied_by_piece(&self, color: Color, piece: Piece) -> Bitboard {
        self.occ_by_piece[color as usize][piece as usize]
    }

    /// Returns the location of `color`'s king
    pub fn king_location(&self, color: Color) -> Square {
        self.kings[color as usize]
    }

    /// Returns `true` if the player to move is in check
    pub fn in_check(&self) -> bool {
        self.in_check
    }

    /// Returns the square a pawn may move to when capturing en passant, if the last move was a
    /// two-square pawn advance
    pub fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the castling rights still held by both players
    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the number of plies since the last capture or pawn move, which counts toward the
    /// 50-move rule
    pub fn halfmove_clock(&self) -> usize {
        self.halfmove_clock
    }

    /// Returns the move number, which starts at 1 and increases after each of black's moves
    pub fn fullmove_number(&self) -> usize {
        self.fullmove_number
    }

    /// Returns the Zobrist key identifying this position
    pub fn zobrist(&self) -> Zobrist {
        self.zobrist
    }

    /// Returns the Zobrist key as an integer
    pub fn zobrist_key(&self) -> u64 {
        self.zobrist.into()
    }

    /// Places a piece on an empty square
    fn put_piece(&mut self, color: Color, piece: Piece, sq: Square) {
        debug_assert!(self.board[sq as usize].is_none(), "{} is already occupied", sq);

        self.board[sq as usize] = Some((color, piece));
        self.occ_squares.insert(sq);
        self.occ_by_color[color as usize].insert(sq);
        self.occ_by_piece[color as usize][piece as usize].insert(sq);
        if piece == King {
            self.kings[color as usize] = sq;
        }
        self.zobrist.toggle_piece_placement(color, piece, sq);
    }

    /// Removes the piece on `sq` and returns it
    ///
    /// # Panics
    /// Panics if `sq` is empty.
    fn remove_piece(&mut self, sq: Square) -> (Color, Piece) {
        let (color, piece) = match self.board[sq as usize].take() {
            Some(pc) => pc,
            None => panic!("no piece on {} to remove", sq),
        };

        self.occ_squares.remove(sq);
        self.occ_by_color[color as usize].remove(sq);
        self.occ_by_piece[color as usize][piece as usize].remove(sq);
        self.zobrist.toggle_piece_placement(color, piece, sq);

        (color, piece)
    }

    /// Computes the Zobrist key from scratch
    fn calc_zobrist(&self) -> Zobrist {
        let mut key = Zobrist::new();

        for color in &[White, Black] {
            for sq in self.occupied_by(*color) {
                if let Some((c, p)) = self.board[sq as usize] {
                    key.toggle_piece_placement(c, p, sq);
                }
            }
        }
        key.toggle_castling_rights(self.castling_rights);
        if let Some(ep) = self.ep_square {
            key.toggle_ep_square(ep);
        }
        if self.turn == Black {
            key.toggle_turn();
        }

        key
    }

    /// Checks that every redundant part of the position agrees with the mailbox.
    ///
    /// # Panics
    /// Panics with a description of the first inconsistency found. This indicates a bug in the
    /// crate, or an `undo_move` that did not match the last `apply_move`.
    pub fn assert_consistent(&self) {
        let mut occ = Bitboard::new();
        let mut by_color = [Bitboard::new(); Color::COUNT];
        let mut by_piece = [[Bitboard::new(); Piece::COUNT]; Color::COUNT];

        for i in 0..Square::COUNT {
            let sq: Square = i.try_into().expect("INFALLIBLE");
            if let Some((c, p)) = self.board[i] {
                occ.insert(sq);
                by_color[c as usize].insert(sq);
                by_piece[c as usize][p as usize].insert(sq);
            }
        }

        assert_eq!(occ, self.occ_squares, "occupied squares disagree with the board");
        assert_eq!(by_color, self.occ_by_color, "color bitboards disagree with the board");
        assert_eq!(by_piece, self.occ_by_piece, "piece bitboards disagree with the board");

        for &c in &[White, Black] {
            let king = self.occupied_by_piece(c, King);
            assert_eq!(king.len(), 1, "{:?} must have exactly one king", c);
            assert_eq!(king.peek(), Some(self.kings[c as usize]), "{:?} king square is stale", c);
        }

        assert_eq!(self.zobrist, self.calc_zobrist(), "zobrist key is stale");
        assert_eq!(
            self.in_check,
            self.is_attacked(self.king_location(self.turn), !self.turn),
            "cached check flag is stale"
        );
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The set of castling moves still available to each player
///
/// A right is lost for good once the king or the rook on that side moves, or the rook is
/// captured. Holding a right does not mean the castling move is currently possible.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    /// No castling rights
    pub const NONE: CastlingRights = CastlingRights(0);
    /// White may castle king side
    pub const WHITE_KING_SIDE: CastlingRights = CastlingRights(0x1);
    /// White may castle queen side
    pub const WHITE_QUEEN_SIDE: CastlingRights = CastlingRights(0x2);
    /// Black may castle king side
    pub const BLACK_KING_SIDE: CastlingRights = CastlingRights(0x4);
    /// Black may castle queen side
    pub const BLACK_QUEEN_SIDE: CastlingRights = CastlingRights(0x8);
    /// Every castling right
    pub const ALL: CastlingRights = CastlingRights(0xf);

    /// The king side right for `color`
    pub fn king_side(color: Color) -> CastlingRights {
        match color {
            White => Self::WHITE_KING_SIDE,
            Black => Self::BLACK_KING_SIDE,
        }
    }

    /// The queen side right for `color`
    pub fn queen_side(color: Color) -> CastlingRights {
        match color {
            White => Self::WHITE_QUEEN_SIDE,
            Black => Self::BLACK_QUEEN_SIDE,
        }
    }

    /// Both rights for `color`
    pub fn both_sides(color: Color) -> CastlingRights {
        Self::king_side(color) | Self::queen_side(color)
    }

    /// The rights lost when a piece moves from or to `sq`
    pub fn touched_by(sq: Square) -> CastlingRights {
        match sq {
            Square::E1 => Self::both_sides(White),
            Square::H1 => Self::WHITE_KING_SIDE,
            Square::A1 => Self::WHITE_QUEEN_SIDE,
            Square::E8 => Self::both_sides(Black),
            Square::H8 => Self::BLACK_KING_SIDE,
            Square::A8 => Self::BLACK_QUEEN_SIDE,
            _ => Self::NONE,
        }
    }

    /// Returns `true` if every right in `other` is also in `self`
    pub fn contains(self, other: CastlingRights) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if `self` and `other` have a right in common
    pub fn intersects(self, other: CastlingRights) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if there are no rights
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Adds the rights in `other`
    pub fn insert(&mut self, other: CastlingRights) {
        self.0 |= other.0;
    }

    /// Removes the rights in `other`
    pub fn remove(&mut self, other: CastlingRights) {
        self.0 &= !other.0;
    }

    /// Returns the rights as a 4-bit mask
    pub fn bits(self) -> u8 {
        self.0
    }
}

impl ops::BitOr for CastlingRights {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        CastlingRights(self.0 | rhs.0)
    }
}

impl fmt::Display for CastlingRights {
    /// Writes the rights the way they appear in FEN, eg. `KQkq` or `-`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return "-".fmt(f);
        }

        let mut s = String::new();
        for &(right, c) in &[
            (Self::WHITE_KING_SIDE, 'K'),
            (Self::WHITE_QUEEN_SIDE, 'Q'),
            (Self::BLACK_KING_SIDE, 'k'),
            (Self::BLACK_QUEEN_SIDE, 'q'),
        ] {
            if self.contains(right) {
                s.push(c);
            }
        }
        s.fmt(f)
    }
}

impl FromStr for CastlingRights {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rights = CastlingRights::NONE;

        if s == "-" {
            return Ok(rights);
        }
        if s.is_empty() {
            return Err(Error::ParseError);
        }
        for c in s.chars() {
            rights.insert(match c {
                'K' => Self::WHITE_KING_SIDE,
                'Q' => Self::WHITE_QUEEN_SIDE,
                'k' => Self::BLACK_KING_SIDE,
                'q' => Self::BLACK_QUEEN_SIDE,
                _ => return Err(Error::ParseError),
            });
        }

        Ok(rights)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Everything `Position::undo_move` needs to restore that cannot be recovered from the move itself
///
/// Returned by [`Position::apply_move`](struct.Position.html#method.apply_move) and consumed by the
/// matching `undo_move`. Snapshots must be undone in the reverse order they were created.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Undo {
    captured: Option<(Piece, Square)>,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmove_clock: usize,
    zobrist: Zobrist,
}

impl Undo {
    /// Returns the captured piece and the square it was captured on. For en passant, that square
    /// is not the move's destination.
    pub fn captured(&self) -> Option<(Piece, Square)> {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_position_matches_start_layout() {
        let pos = Position::new();

        assert_eq!(pos.turn(), White);
        assert_eq!(pos.piece_at(Square::E1), Some((White, King)));
        assert_eq!(pos.piece_at(Square::D8), Some((Black, Queen)));
        assert_eq!(pos.piece_at(Square::G2), Some((White, Pawn)));
        assert_eq!(pos.piece_at(Square::E4), None);
        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.occupied_by(Black).len(), 16);
        assert_eq!(pos.occupied_by_piece(White, Knight),
            Bitboard::from(Square::B1) | Square::G1.into());
        assert_eq!(pos.king_location(White), Square::E1);
        assert_eq!(pos.king_location(Black), Square::E8);
        assert_eq!(pos.castling_rights(), CastlingRights::ALL);
        assert_eq!(pos.ep_square(), None);
        assert_eq!(pos.halfmove_clock(), 0);
        assert_eq!(pos.fullmove_number(), 1);
        assert!(!pos.in_check());
        pos.assert_consistent();
    }

    #[test]
    fn new_position_matches_start_fen() {
        assert_eq!(Position::new(), START_FEN.parse::<Position>().unwrap());
        assert_eq!(Position::new().zobrist(), Position::new().calc_zobrist());
    }

    #[test]
    #[should_panic(expected = "zobrist key is stale")]
    fn consistency_check_catches_a_stale_key() {
        let mut pos = Position::new();
        pos.zobrist.toggle_turn();
        pos.assert_consistent();
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        assert!(rights.contains(CastlingRights::both_sides(Black)));

        rights.remove(CastlingRights::touched_by(Square::E1));
        assert!(!rights.intersects(CastlingRights::both_sides(White)));
        assert_eq!(rights.to_string(), "kq");

        rights.remove(CastlingRights::touched_by(Square::H8));
        assert_eq!(rights, CastlingRights::BLACK_QUEEN_SIDE);
        assert!(CastlingRights::touched_by(Square::E4).is_empty());

        assert_eq!(CastlingRights::NONE.to_string(), "-");
        assert_eq!("KQkq".parse::<CastlingRights>().unwrap(), CastlingRights::ALL);
        assert_eq!("Kq".parse::<CastlingRights>().unwrap().bits(), 0x9);
        assert!("KX".parse::<CastlingRights>().is_err());
        assert!("".parse::<CastlingRights>().is_err());
    }
}
