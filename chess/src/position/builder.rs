//! Contains a builder for `Position`
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::debug;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A builder for `Position`
///
/// ```
/// use chess::{PositionBuilder, Color, Piece, Square};
///
/// let pos = PositionBuilder::new()
///     .piece(Color::White, Piece::King, Square::E1)
///     .piece(Color::Black, Piece::King, Square::E8)
///     .piece(Color::White, Piece::Queen, Square::D1)
///     .validate()
///     .unwrap();
/// assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/3QK3 w - - 0 1");
/// ```
#[derive(Debug, Clone)]
pub struct PositionBuilder {
    board: [ Option<(Color, Piece)>; Square::COUNT ],
    turn: Color,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmove_clock: usize,
    fullmove_number: usize,
}

impl PositionBuilder {
    /// Creates a new, empty `PositionBuilder`
    pub fn new() -> Self {
        PositionBuilder {
            board: [ None; Square::COUNT ],
            turn: White,
            castling_rights: CastlingRights::NONE,
            ep_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Sets the piece at `square`
    pub fn piece(&mut self, color: Color, piece: Piece, square: Square) -> &mut Self {
        self.board[square as usize] = Some((color, piece));
        self
    }

    /// Clears the piece at `square`
    pub fn clear(&mut self, square: Square) -> &mut Self {
        self.board[square as usize] = None;
        self
    }

    /// Sets the turn to `color`
    pub fn turn(&mut self, color: Color) -> &mut Self {
        self.turn = color;
        self
    }

    /// Sets the castling rights of both players
    pub fn castling_rights(&mut self, rights: CastlingRights) -> &mut Self {
        self.castling_rights = rights;
        self
    }

    /// Sets or clears the en-passant square
    pub fn en_passant_square(&mut self, square: Option<Square>) -> &mut Self {
        self.ep_square = square;
        self
    }

    /// Sets the number of plies that count toward the 50-move rule. A ply is a move by one player,
    /// so two plies would be one move by each player.
    pub fn halfmove_clock(&mut self, plies: usize) -> &mut Self {
        self.halfmove_clock = plies;
        self
    }

    /// Sets the move number
    pub fn fullmove_number(&mut self, number: usize) -> &mut Self {
        self.fullmove_number = number;
        self
    }

    /// Validates legality and returns a `Position`
    pub fn validate(&self) -> Result<Position> {
        let pos = self.build();

        if let Err(error) = pos {
            debug!("rejected position: {}", error);
        }

        pos
    }

    fn build(&self) -> Result<Position> {
        use Error::*;

        let mut pos = Position::empty_board();

        for (i, piece) in self.board.iter().enumerate() {
            let sq = i.try_into().expect("INFALLIBLE");

            if let Some((color, piece)) = *piece {
                // `put_piece` also records the king squares
                pos.put_piece(color, piece, sq);
            }
        }

        pos.turn = self.turn;
        pos.castling_rights = self.castling_rights;
        pos.ep_square = self.ep_square;
        pos.halfmove_clock = self.halfmove_clock;
        pos.fullmove_number = self.fullmove_number.max(1);

        // validate position legality
        for c in &[White, Black] {
            // Step 1: verify exactly one king per side
            if pos.occupied_by_piece(*c, King).len() != 1 {
                return Err(InvalidKingCount);
            }
            // Step 2: no pawns on ranks 1 and 8
            if pos.occupied_by_piece(*c, Pawn)
                .intersects(Bitboard::from(Rank::R1) | Rank::R8.into()) {
                return Err(InvalidPawnRank);
            }
        }
        // Step 3: opponent's king is not attacked
        if pos.is_attacked(pos.king_location(!pos.turn), pos.turn) {
            return Err(KingCapturable);
        }
        // Step 4: if there is an EP square, it must be empty and the pawn that just advanced two
        // squares must be right in front of it
        if let Some(ep_square) = pos.ep_square {
            if pos.piece_at(ep_square).is_some() {
                return Err(EnPassantSquareOccupied);
            }
            let ep_rank = if pos.turn == White { Rank::R6 } else { Rank::R3 };
            let pawn_square = ep_square.offset(0, -pos.turn.forward());
            if ep_square.rank() != ep_rank
                || pawn_square.and_then(|sq| pos.piece_at(sq)) != Some((!pos.turn, Pawn)) {
                return Err(MissingEnPassantPawn);
            }
        }
        // Step 5: if castling rights exist, king and rook must be in the correct squares
        for &c in &[White, Black] {
            let r = c.back_rank();
            let rook_at = |f| pos.piece_at(Square::from_coord(f, r)) == Some((c, Rook));

            if pos.castling_rights.intersects(CastlingRights::both_sides(c))
                && pos.king_location(c) != Square::from_coord(File::E, r) {
                return Err(InvalidCastlingFlags);
            }
            if pos.castling_rights.contains(CastlingRights::queen_side(c)) && !rook_at(File::A) {
                return Err(InvalidCastlingFlags);
            }
            if pos.castling_rights.contains(CastlingRights::king_side(c)) && !rook_at(File::H) {
                return Err(InvalidCastlingFlags);
            }
        }

        pos.in_check = pos.is_attacked(pos.king_location(pos.turn), !pos.turn);
        pos.zobrist = pos.calc_zobrist();

        Ok(pos)
    }
}

impl Default for PositionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
