//! Pseudo-legal move generation
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
    /// Returns the pseudo-legal moves for `side`
    ///
    /// Pseudo-legal moves put a piece of the right color on a square that is empty or held by the
    /// opponent, following the piece's movement rules, but may leave the mover's king in check.
    /// Castling is the exception: it is only generated when the king is not in check and does not
    /// pass through or land on an attacked square. En-passant captures are only generated for the
    /// side to move.
    pub fn pseudo_legal_moves(&self, side: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for sq in self.occupied_by(side) {
            self.piece_moves(side, sq, &mut moves);
        }

        moves
    }

    /// Adds the pseudo-legal moves of the `color` piece on `from` to `moves`
    pub(super) fn piece_moves(&self, color: Color, from: Square, moves: &mut Vec<Move>) {
        let piece = match self.board[from as usize] {
            Some((c, piece)) if c == color => piece,
            _ => return,
        };
        let own = self.occupied_by(color);

        match piece {
            Pawn => self.pawn_moves(color, from, moves),
            Knight => push_moves(from, knight_attacks(from) & !own, moves),
            Bishop => self.slider_moves(color, from, &Direction::DIAGONAL, moves),
            Rook => self.slider_moves(color, from, &Direction::ORTHOGONAL, moves),
            Queen => {
                self.slider_moves(color, from, &Direction::ORTHOGONAL, moves);
                self.slider_moves(color, from, &Direction::DIAGONAL, moves);
            },
            King => {
                push_moves(from, king_attacks(from) & !own, moves);
                self.castling_moves(color, from, moves);
            },
        }
    }

    /// Walks each ray in `dirs`, adding empty squares, stopping before a friendly piece and
    /// stopping after capturing an enemy piece
    fn slider_moves(&self, color: Color, from: Square, dirs: &[Direction], moves: &mut Vec<Move>) {
        for &dir in dirs {
            for &to in &ray(from, dir).squares {
                match self.board[to as usize] {
                    None => moves.push(Move::new(from, to)),
                    Some((c, _)) => {
                        if c != color {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    },
                }
            }
        }
    }

    fn pawn_moves(&self, color: Color, from: Square, moves: &mut Vec<Move>) {
        let empty = !self.occ_squares;

        let mut targets = pawn_advances(color, from) & empty;
        if !targets.is_empty() {
            targets |= pawn_double_advances(color, from) & empty;
        }

        // diagonal moves need something to capture
        let mut capturable = self.occupied_by(!color);
        if color == self.turn {
            capturable.extend(self.ep_square);
        }
        targets |= pawn_attacks(color, from) & capturable;

        for to in targets {
            if to.rank() == color.promotion_rank() {
                for &prom in &Promotion::ALL {
                    moves.push(Move::with_promotion(from, to, prom));
                }
            } else {
                moves.push(Move::new(from, to));
            }
        }
    }

    fn castling_moves(&self, color: Color, from: Square, moves: &mut Vec<Move>) {
        let rank = color.back_rank();
        if from != Square::from_coord(File::E, rank) {
            return;
        }

        let sides = [
            (CastlingRights::king_side(color), File::H, File::G),
            (CastlingRights::queen_side(color), File::A, File::C),
        ];

        for &(right, rook_file, king_file) in &sides {
            let rook = Square::from_coord(rook_file, rank);
            let to = Square::from_coord(king_file, rank);

            if !self.castling_rights.contains(right)
                || self.board[rook as usize] != Some((color, Rook))
                || self.occ_squares.intersects(between(from, rook)) {
                continue;
            }

            // the king may not start on, pass through, or land on an attacked square
            let path = between(from, to) | Bitboard::from(from) | Bitboard::from(to);
            if path.into_iter().any(|sq| self.is_attacked(sq, !color)) {
                continue;
            }

            moves.push(Move::new(from, to));
        }
    }
}

fn push_moves(from: Square, targets: Bitboard, moves: &mut Vec<Move>) {
    moves.extend(targets.into_iter().map(|to| Move::new(from, to)));
}

/// Returns the rook's origin and destination for a castling move of the king to `king_to`
pub(super) fn castling_rook_squares(king_to: Square) -> (Square, Square) {
    let rank = king_to.rank();

    if king_to.file() == File::G {
        (Square::from_coord(File::H, rank), Square::from_coord(File::F, rank))
    } else {
        (Square::from_coord(File::A, rank), Square::from_coord(File::D, rank))
    }
}

/// Returns `true` if `mv` is a king move of two files, which is only possible when castling
pub(super) fn is_castling(piece: Piece, mv: Move) -> bool {
    piece == King && (mv.from.file() as i8 - mv.to.file() as i8).abs() == 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn targets(moves: &[Move], from: Square) -> Bitboard {
        moves.iter().filter(|mv| mv.from == from).map(|mv| mv.to).collect()
    }

    #[test]
    fn start_position_has_twenty_pseudo_legal_moves() {
        let p = Position::new();
        assert_eq!(p.pseudo_legal_moves(White).len(), 20);
        assert_eq!(p.pseudo_legal_moves(Black).len(), 20);
    }

    #[test]
    fn moves_never_land_on_own_pieces() {
        let p = pos("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        for &side in &[White, Black] {
            for mv in p.pseudo_legal_moves(side) {
                assert_eq!(p.piece_at(mv.from).map(|(c, _)| c), Some(side));
                assert!(!p.occupied_by(side).contains(mv.to), "{}", mv);
            }
        }
    }

    #[test]
    fn sliders_stop_at_blockers() {
        let p = pos("4k3/8/8/1p6/8/8/1R2P3/4K3 w - - 0 1");
        let moves = p.pseudo_legal_moves(White);
        let expected: Bitboard = [
            Square::B1, Square::A2, Square::C2, Square::D2,
            Square::B3, Square::B4, Square::B5,
        ].iter().cloned().collect();
        assert_eq!(targets(&moves, Square::B2), expected);
    }

    #[test]
    fn queen_moves_are_rook_and_bishop_moves() {
        let p = pos("4k3/8/8/8/3Q4/8/8/4K3 w - - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert_eq!(targets(&moves, Square::D4), queen_attacks(Square::D4, p.occupied()));
        assert_eq!(targets(&moves, Square::D4).len(), 27);
    }

    #[test]
    fn pawn_pushes_need_empty_squares() {
        let p = pos("4k3/8/8/8/8/4n3/3PP3/4K3 w - - 0 1");
        let moves = p.pseudo_legal_moves(White);
        // d2 pawn can advance one or two, or capture on e3
        let expected: Bitboard = [Square::D3, Square::D4, Square::E3].iter().cloned().collect();
        assert_eq!(targets(&moves, Square::D2), expected);
        // e2 pawn is blocked
        assert!(targets(&moves, Square::E2).is_empty());
    }

    #[test]
    fn diagonal_pawn_moves_require_a_capture() {
        // nothing on d3 or f3, and no en-passant square
        let p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert!(!moves.contains(&Move::new(Square::E2, Square::D3)));
        assert!(!moves.contains(&Move::new(Square::E2, Square::F3)));
    }

    #[test]
    fn en_passant_only_for_side_to_move() {
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(p.pseudo_legal_moves(White).contains(&Move::new(Square::E5, Square::D6)));

        // same position with black to move: no en passant for white to look at
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 b - - 0 2");
        assert!(!p.pseudo_legal_moves(White).contains(&Move::new(Square::E5, Square::D6)));
    }

    #[test]
    fn promotions_expand_to_four_moves() {
        let p = pos("3nk3/2P5/8/8/8/8/8/4K3 w - - 0 1");
        let moves = p.pseudo_legal_moves(White);
        let promotions: Vec<&Move> = moves.iter().filter(|mv| mv.from == Square::C7).collect();

        // c8 push and d8 capture, each with four promotions
        assert_eq!(promotions.len(), 8);
        for &prom in &Promotion::ALL {
            assert!(moves.contains(&Move::with_promotion(Square::C7, Square::C8, prom)));
            assert!(moves.contains(&Move::with_promotion(Square::C7, Square::D8, prom)));
        }
        assert!(!moves.contains(&Move::new(Square::C7, Square::C8)));
    }

    #[test]
    fn castling_is_generated_when_allowed() {
        let p = pos("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert!(moves.contains(&Move::new(Square::E1, Square::G1)));
        assert!(moves.contains(&Move::new(Square::E1, Square::C1)));
        let moves = p.pseudo_legal_moves(Black);
        assert!(moves.contains(&Move::new(Square::E8, Square::G8)));
        assert!(moves.contains(&Move::new(Square::E8, Square::C8)));
    }

    #[test]
    fn castling_needs_rights_and_empty_squares() {
        // no king side right, and b1 is occupied
        let p = pos("4k3/8/8/8/8/8/8/RN2K2R w Q - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert!(!moves.contains(&Move::new(Square::E1, Square::G1)));
        assert!(!moves.contains(&Move::new(Square::E1, Square::C1)));
    }

    #[test]
    fn castling_through_or_out_of_check_is_not_generated() {
        // f1 is attacked by the rook on f8
        let p = pos("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert!(!moves.contains(&Move::new(Square::E1, Square::G1)));
        assert!(moves.contains(&Move::new(Square::E1, Square::C1)));

        // b1 may be attacked, since the king does not cross it
        let p = pos("1r2k3/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(p.pseudo_legal_moves(White).contains(&Move::new(Square::E1, Square::C1)));

        // in check
        let p = pos("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        let moves = p.pseudo_legal_moves(White);
        assert!(!moves.contains(&Move::new(Square::E1, Square::G1)));
        assert!(!moves.contains(&Move::new(Square::E1, Square::C1)));
    }
}
