//! Attack queries on a `Position`
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;

impl Position {
    /// Returns the pieces of color `by` that attack `sq`
    ///
    /// A piece attacks a square if it could capture an enemy piece there, so pinned pieces and the
    /// king still count as attackers.
    pub fn attackers(&self, sq: Square, by: Color) -> Bitboard {
        self.attackers_through(sq, by, self.occ_squares)
    }

    /// Returns `true` if any piece of color `by` attacks `sq`
    ///
    /// ```
    /// use chess::{Position, Color, Square};
    ///
    /// let pos = Position::new();
    /// assert!(pos.is_attacked(Square::F3, Color::White));
    /// assert!(!pos.is_attacked(Square::E4, Color::White));
    /// assert!(pos.is_attacked(Square::F6, Color::Black));
    /// ```
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        !self.attackers(sq, by).is_empty()
    }

    /// Returns the attackers of `sq` as if the occupied squares were `occ`. Pieces standing on
    /// squares missing from `occ` neither attack nor block.
    pub(super) fn attackers_through(&self, sq: Square, by: Color, occ: Bitboard) -> Bitboard {
        let pieces = |piece| self.occupied_by_piece(by, piece);
        let diagonal = pieces(Bishop) | pieces(Queen);
        let orthogonal = pieces(Rook) | pieces(Queen);

        let attackers = (pawn_attacks(!by, sq) & pieces(Pawn))
            | (knight_attacks(sq) & pieces(Knight))
            | (king_attacks(sq) & pieces(King))
            | (bishop_attacks(sq, occ) & diagonal)
            | (rook_attacks(sq, occ) & orthogonal);

        attackers & occ
    }

    /// Returns every square attacked by at least one piece of color `by`
    pub fn attacked_squares(&self, by: Color) -> Bitboard {
        let mut attacked = Bitboard::new();

        for sq in self.occupied_by(by) {
            attacked |= match self.board[sq as usize] {
                Some((_, Pawn)) => pawn_attacks(by, sq),
                Some((_, Knight)) => knight_attacks(sq),
                Some((_, Bishop)) => bishop_attacks(sq, self.occ_squares),
                Some((_, Rook)) => rook_attacks(sq, self.occ_squares),
                Some((_, Queen)) => queen_attacks(sq, self.occ_squares),
                Some((_, King)) => king_attacks(sq),
                None => Bitboard::new(),
            };
        }

        attacked
    }
}
