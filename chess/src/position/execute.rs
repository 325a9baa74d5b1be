//! Making and unmaking moves
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::debug;
use super::*;
use super::movegen::{castling_rook_squares, is_castling};

impl Position {
    /// Makes a move without checking that it is legal, and returns what is needed to undo it
    ///
    /// `mv` must be a legal move for the player to move, such as one returned by
    /// [`legal_moves`](#method.legal_moves). Anything else leaves the position in an unspecified
    /// state. Use [`play`](#method.play) when the move has not been checked.
    ///
    /// # Panics
    /// Panics if there is no piece on `mv.from`.
    pub fn apply_move(&mut self, mv: Move) -> Undo {
        let (color, piece) = match self.board[mv.from as usize] {
            Some(pc) => pc,
            None => panic!("no piece on {} to move", mv.from),
        };
        let en_passant = self.is_en_passant(piece, mv);

        let captured_sq = if en_passant {
            Square::from_coord(mv.to.file(), mv.from.rank())
        } else {
            mv.to
        };

        let mut undo = Undo {
            captured: None,
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmove_clock: self.halfmove_clock,
            zobrist: self.zobrist,
        };

        // a king or rook leaving home, or a rook captured at home, loses the matching rights
        let lost = CastlingRights::touched_by(mv.from) | CastlingRights::touched_by(mv.to);
        if self.castling_rights.intersects(lost) {
            self.zobrist.toggle_castling_rights(self.castling_rights);
            self.castling_rights.remove(lost);
            self.zobrist.toggle_castling_rights(self.castling_rights);
        }

        if self.board[captured_sq as usize].is_some() {
            let (_, captured) = self.remove_piece(captured_sq);
            undo.captured = Some((captured, captured_sq));
        }

        self.remove_piece(mv.from);
        match mv.promotion {
            Some(prom) => self.put_piece(color, prom.into(), mv.to),
            None => self.put_piece(color, piece, mv.to),
        }

        if is_castling(piece, mv) {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            self.remove_piece(rook_from);
            self.put_piece(color, Rook, rook_to);
        }

        if let Some(ep) = self.ep_square.take() {
            self.zobrist.toggle_ep_square(ep);
        }
        if piece == Pawn && (mv.to as i8 - mv.from as i8).abs() == 16 {
            let ep = mv.from.offset(0, color.forward()).expect("INFALLIBLE");
            self.ep_square = Some(ep);
            self.zobrist.toggle_ep_square(ep);
        }

        if piece == Pawn || undo.captured.is_some() {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if color == Black {
            self.fullmove_number += 1;
        }

        self.turn = !color;
        self.zobrist.toggle_turn();
        self.in_check = self.is_attacked(self.king_location(self.turn), color);

        undo
    }

    /// Reverses `apply_move`, given the same move and the `Undo` it returned
    ///
    /// Moves must be undone in the reverse order they were made.
    ///
    /// # Panics
    /// Panics if there is no piece on `mv.to`.
    pub fn undo_move(&mut self, mv: Move, undo: Undo) {
        let (color, piece) = self.remove_piece(mv.to);
        let piece = if mv.promotion.is_some() { Pawn } else { piece };
        self.put_piece(color, piece, mv.from);

        if is_castling(piece, mv) {
            let (rook_from, rook_to) = castling_rook_squares(mv.to);
            self.remove_piece(rook_to);
            self.put_piece(color, Rook, rook_from);
        }

        if let Some((captured, sq)) = undo.captured {
            self.put_piece(!color, captured, sq);
        }

        self.castling_rights = undo.castling_rights;
        self.ep_square = undo.ep_square;
        self.halfmove_clock = undo.halfmove_clock;
        if color == Black {
            self.fullmove_number -= 1;
        }
        self.turn = color;

        // restoring the snapshot overrides the toggles made by `put_piece` and `remove_piece`
        self.zobrist = undo.zobrist;
        self.in_check = self.is_attacked(self.king_location(color), !color);
    }

    /// Makes `mv` if it is legal for the player to move
    ///
    /// Returns the `Undo` for the move, or `None` without changing the position if the move is not
    /// legal.
    ///
    /// ```
    /// use chess::{Position, Move, Square};
    ///
    /// let mut pos = Position::new();
    /// assert!(pos.play(Move::new(Square::E2, Square::E5)).is_none());
    /// assert!(pos.play(Move::new(Square::E2, Square::E4)).is_some());
    /// assert_eq!(pos.ep_square(), Some(Square::E3));
    /// ```
    pub fn play(&mut self, mv: Move) -> Option<Undo> {
        if !self.is_legal_move(mv) {
            debug!("illegal move {} in {}", mv, self);
            return None;
        }

        Some(self.apply_move(mv))
    }

    /// Returns `true` if the legal move `mv` would put the opponent in check
    pub fn gives_check(&mut self, mv: Move) -> bool {
        let undo = self.apply_move(mv);
        let check = self.in_check;

        self.undo_move(mv, undo);
        check
    }
}
