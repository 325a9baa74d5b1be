//! Legality filtering: check constraints, pins and the legal move queries built on them
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use super::*;
use super::movegen::is_castling;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// How many pieces give check, and what a non-king move has to do about it
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CheckConstraint {
    /// The king is not attacked
    None,
    /// The king is attacked by exactly one piece. Other pieces must capture the checker or block
    /// on one of the `between` squares, which is empty for knight, pawn and adjacent checks.
    Single {
        /// The checking piece's square
        checker: Square,
        /// The squares between the king and the checker
        between: Bitboard,
    },
    /// The king is attacked by two pieces, so only king moves can be legal
    Double,
}

impl CheckConstraint {
    /// Returns `true` if the king is attacked
    pub fn is_check(self) -> bool {
        self != CheckConstraint::None
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// A piece that cannot leave the line between its king and an enemy slider without exposing the
/// king
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Pin {
    /// The pinned piece's square
    pub pinned: Square,
    /// The square of the slider doing the pinning
    pub pinner: Square,
    /// The squares the pinned piece may still move to: those between the king and the pinner,
    /// and the pinner's own square
    pub allowed: Bitboard,
}

/// Check and pin information for one side, derived fresh for each query
struct Legality {
    side: Color,
    check: CheckConstraint,
    pins: Vec<Pin>,
}

impl Position {
    /// Returns the check constraint on `side`'s king
    pub fn check_constraint(&self, side: Color) -> CheckConstraint {
        let king = self.king_location(side);
        let checkers = self.attackers(king, !side);

        match (checkers.len(), checkers.peek()) {
            (1, Some(checker)) => CheckConstraint::Single {
                checker,
                between: between(king, checker),
            },
            (0, _) => CheckConstraint::None,
            _ => CheckConstraint::Double,
        }
    }

    /// Returns the pieces of `side` pinned to their own king
    ///
    /// Looks along each of the eight lines from the king. If the first piece found is friendly and
    /// the next is an enemy slider that moves along that line, the friendly piece is pinned.
    pub fn pins(&self, side: Color) -> Vec<Pin> {
        let king = self.king_location(side);
        let mut pins = Vec::new();

        for &dir in &Direction::ALL {
            let mut candidate = None;

            for &sq in &ray(king, dir).squares {
                match self.board[sq as usize] {
                    None => {},
                    Some((c, _)) if c == side => {
                        if candidate.is_some() {
                            break;
                        }
                        candidate = Some(sq);
                    },
                    Some((_, piece)) => {
                        let slides_here = match piece {
                            Queen => true,
                            Bishop => dir.is_diagonal(),
                            Rook => !dir.is_diagonal(),
                            _ => false,
                        };
                        if let (Some(pinned), true) = (candidate, slides_here) {
                            pins.push(Pin {
                                pinned,
                                pinner: sq,
                                allowed: between(king, sq) | Bitboard::from(sq),
                            });
                        }
                        break;
                    },
                }
            }
        }

        pins
    }

    fn legality(&self, side: Color) -> Legality {
        Legality {
            side,
            check: self.check_constraint(side),
            pins: self.pins(side),
        }
    }

    /// Decides whether a pseudo-legal move of `ctx.side` leaves its king safe
    fn is_safe(&self, ctx: &Legality, mv: Move) -> bool {
        let piece = match self.board[mv.from as usize] {
            Some((_, piece)) => piece,
            None => return false,
        };

        if piece == King {
            if is_castling(piece, mv) {
                // squares were checked when the move was generated
                return !ctx.check.is_check();
            }
            // the king must not shadow a slider attacking along its own line
            let occ = self.occ_squares ^ Bitboard::from(mv.from);
            return self.attackers_through(mv.to, !ctx.side, occ).is_empty();
        }

        if self.is_en_passant(piece, mv) {
            return self.en_passant_is_safe(ctx.side, mv);
        }

        match ctx.check {
            CheckConstraint::Double => return false,
            CheckConstraint::Single { checker, between } => {
                if !(between | Bitboard::from(checker)).contains(mv.to) {
                    return false;
                }
            },
            CheckConstraint::None => {},
        }

        match ctx.pins.iter().find(|pin| pin.pinned == mv.from) {
            Some(pin) => pin.allowed.contains(mv.to),
            None => true,
        }
    }

    /// Returns `true` if `mv` by `piece` is an en-passant capture in this position
    pub(super) fn is_en_passant(&self, piece: Piece, mv: Move) -> bool {
        piece == Pawn
            && Some(mv.to) == self.ep_square
            && mv.from.file() != mv.to.file()
            && self.board[mv.to as usize].is_none()
    }

    /// Replays the occupancy change of an en-passant capture and looks for attacks on the king.
    /// Covers discovered checks along the rank, diagonal pins, and capturing a checking pawn.
    fn en_passant_is_safe(&self, side: Color, mv: Move) -> bool {
        let captured = Square::from_coord(mv.to.file(), mv.from.rank());
        let occ = (self.occ_squares ^ Bitboard::from(mv.from) ^ Bitboard::from(captured))
            | Bitboard::from(mv.to);

        self.attackers_through(self.king_location(side), !side, occ).is_empty()
    }

    /// Returns the legal moves for `side`
    ///
    /// ```
    /// use chess::{Position, Color};
    ///
    /// let pos = Position::new();
    /// assert_eq!(pos.generate_legal_moves(Color::White).len(), 20);
    /// ```
    pub fn generate_legal_moves(&self, side: Color) -> Vec<Move> {
        let ctx = self.legality(side);
        let mut moves = self.pseudo_legal_moves(side);

        moves.retain(|&mv| self.is_safe(&ctx, mv));
        moves
    }

    /// Returns the legal moves for the player whose turn it is
    pub fn legal_moves(&self) -> Vec<Move> {
        self.generate_legal_moves(self.turn)
    }

    /// Returns the legal moves of the piece on `sq`, whichever side it belongs to
    pub fn generate_legal_moves_for(&self, sq: Square) -> Vec<Move> {
        let color = match self.board[sq as usize] {
            Some((color, _)) => color,
            None => return Vec::new(),
        };
        let ctx = self.legality(color);
        let mut moves = Vec::new();

        self.piece_moves(color, sq, &mut moves);
        moves.retain(|&mv| self.is_safe(&ctx, mv));
        moves
    }

    /// Returns `true` if the player to move can legally move the piece on `from` to `to`. For a
    /// pawn reaching the last rank, any promotion counts.
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        match self.board[from as usize] {
            Some((color, _)) if color == self.turn => {
                self.generate_legal_moves_for(from).iter().any(|mv| mv.to == to)
            },
            _ => false,
        }
    }

    /// Returns `true` if `mv` is a legal move for the player to move. Promotions must name the
    /// piece, and only promotions may.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        match self.board[mv.from as usize] {
            Some((color, _)) if color == self.turn => {
                self.generate_legal_moves_for(mv.from).contains(&mv)
            },
            _ => false,
        }
    }

    /// Returns the legal moves of the player to move that bring a piece of type `piece` to `to`.
    /// Used to resolve moves written in algebraic notation, where more than one result means the
    /// move needs disambiguating.
    pub fn legal_moves_to(&self, piece: Piece, to: Square) -> Vec<Move> {
        let mut moves = self.legal_moves();

        moves.retain(|mv| {
            mv.to == to && self.board[mv.from as usize].map(|(_, p)| p) == Some(piece)
        });
        moves
    }

    /// Returns `true` if `side` is in check and has no legal moves
    pub fn is_in_checkmate(&self, side: Color) -> bool {
        self.check_constraint(side).is_check() && self.generate_legal_moves(side).is_empty()
    }

    /// Returns `true` if `side` is not in check but has no legal moves
    pub fn is_in_stalemate(&self, side: Color) -> bool {
        !self.check_constraint(side).is_check() && self.generate_legal_moves(side).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        fen.parse().unwrap()
    }

    fn mv(s: &str) -> Move {
        s.parse().unwrap()
    }

    #[test]
    fn start_position_has_twenty_legal_moves() {
        let p = Position::new();
        assert_eq!(p.legal_moves().len(), 20);
        assert_eq!(p.generate_legal_moves(Black).len(), 20);
    }

    #[test]
    fn check_constraint_distinguishes_single_and_double_check() {
        assert_eq!(Position::new().check_constraint(White), CheckConstraint::None);

        let p = pos("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        assert_eq!(
            p.check_constraint(White),
            CheckConstraint::Single {
                checker: Square::A1,
                between: [Square::B1, Square::C1, Square::D1].iter().cloned().collect(),
            }
        );

        // knight checks cannot be blocked
        let p = pos("4k3/8/8/8/8/3n4/8/4K3 w - - 0 1");
        assert_eq!(
            p.check_constraint(White),
            CheckConstraint::Single { checker: Square::D3, between: Bitboard::new() }
        );

        let p = pos("4k3/8/8/8/1b6/3n4/8/4K3 w - - 0 1");
        assert_eq!(p.check_constraint(White), CheckConstraint::Double);
    }

    #[test]
    fn only_king_moves_in_double_check() {
        let p = pos("4k3/8/8/8/1b6/3n4/8/3QK3 w - - 0 1");
        let moves = p.legal_moves();
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.from == Square::E1));
    }

    #[test]
    fn single_check_allows_block_capture_or_king_move() {
        // the rook on a1 checks along the first rank
        let p = pos("4k3/8/8/8/8/1N2B3/8/r3K3 w - - 0 1");
        let moves = p.legal_moves();

        assert!(moves.contains(&mv("b3a1")));
        assert!(moves.contains(&mv("b3c1")));
        assert!(!moves.contains(&mv("b3d2")));
        assert!(moves.contains(&mv("e3c1")));
        assert!(!moves.contains(&mv("e3f4")));
        assert!(moves.contains(&mv("e1e2")));
        assert!(!moves.contains(&mv("e1d1")));
    }

    #[test]
    fn a_knight_check_can_only_be_answered_by_capture_or_king_move() {
        let p = pos("4k3/8/8/8/8/3n4/8/2BRK3 w - - 0 1");
        let others: Vec<Move> = p.legal_moves()
            .into_iter()
            .filter(|m| m.from != Square::E1)
            .collect();
        assert_eq!(others, vec![mv("d1d3")]);
    }

    #[test]
    fn king_cannot_retreat_along_the_checking_line() {
        let p = pos("4k3/8/8/8/8/8/8/r3K3 w - - 0 1");
        let moves = p.legal_moves();
        assert!(!moves.contains(&mv("e1f1")));
        assert!(moves.contains(&mv("e1e2")));
        assert!(moves.contains(&mv("e1f2")));
    }

    #[test]
    fn pinned_piece_moves_only_along_the_pin() {
        // the rook on e4 is pinned by the rook on e8
        let p = pos("4r1k1/8/8/8/4R3/8/8/4K3 w - - 0 1");
        let pins = p.pins(White);
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].pinned, Square::E4);
        assert_eq!(pins[0].pinner, Square::E8);

        let moves = p.generate_legal_moves_for(Square::E4);
        assert_eq!(moves.len(), 6);
        assert!(moves.contains(&mv("e4e8")));
        assert!(moves.contains(&mv("e4e2")));
        assert!(!moves.contains(&mv("e4d4")));

        // a pinned knight cannot move at all
        let p = pos("6k1/8/8/1b6/8/3N4/8/5K2 w - - 0 1");
        assert!(p.generate_legal_moves_for(Square::D3).is_empty());
    }

    #[test]
    fn two_friendly_pieces_on_a_line_are_not_pinned() {
        let p = pos("4r1k1/8/8/8/4R3/4N3/8/4K3 w - - 0 1");
        assert!(p.pins(White).is_empty());
    }

    #[test]
    fn en_passant_cannot_expose_the_king_along_the_rank() {
        let p = pos("8/8/8/K2pP2r/8/8/8/7k w - d6 0 2");
        assert!(p.pseudo_legal_moves(White).contains(&mv("e5d6")));
        assert!(!p.legal_moves().contains(&mv("e5d6")));
    }

    #[test]
    fn en_passant_can_capture_a_checking_pawn() {
        // black just played d7d5, checking the king on e4
        let p = pos("7k/8/8/3pP3/4K3/8/8/8 w - d6 0 2");
        assert!(p.in_check());
        assert!(p.legal_moves().contains(&mv("e5d6")));
    }

    #[test]
    fn diagonal_pawn_move_to_an_empty_square_is_never_legal() {
        let p = pos("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1");
        assert!(!p.is_legal(Square::E2, Square::D3));
        assert!(!p.is_legal(Square::E2, Square::F3));
        assert!(!p.is_legal_move(mv("e2f3")));

        // an en-passant square that is not on the diagonal does not help either
        let p = pos("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2");
        assert!(p.is_legal(Square::E5, Square::D6));
        assert!(!p.is_legal(Square::E5, Square::F6));
    }

    #[test]
    fn legality_queries_respect_the_side_to_move() {
        let p = Position::new();
        assert!(p.is_legal(Square::E2, Square::E4));
        assert!(!p.is_legal(Square::E7, Square::E5));
        assert!(!p.is_legal(Square::E2, Square::E5));
        assert!(!p.is_legal(Square::E4, Square::E5));
        assert_eq!(p.generate_legal_moves_for(Square::G8).len(), 2);
    }

    #[test]
    fn promotion_moves_must_name_the_piece() {
        let p = pos("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1");
        assert!(p.is_legal(Square::B7, Square::B8));
        assert!(p.is_legal_move(mv("b7b8q")));
        assert!(p.is_legal_move(mv("b7b8n")));
        assert!(!p.is_legal_move(mv("b7b8")));
        assert!(!Position::new().is_legal_move(mv("e2e4q")));
    }

    #[test]
    fn legal_moves_to_finds_ambiguous_moves() {
        let p = Position::new();
        assert_eq!(p.legal_moves_to(Piece::Knight, Square::F3), vec![mv("g1f3")]);
        assert_eq!(p.legal_moves_to(Piece::Pawn, Square::E4), vec![mv("e2e4")]);
        assert!(p.legal_moves_to(Piece::Knight, Square::E4).is_empty());

        // both rooks reach d1
        let p = pos("4k3/8/8/8/8/8/8/R4RK1 w - - 0 1");
        assert_eq!(p.legal_moves_to(Piece::Rook, Square::D1).len(), 2);
        assert_eq!(p.legal_moves_to(Piece::Rook, Square::A8).len(), 1);
    }

    #[test]
    fn checkmate_and_stalemate() {
        // back rank mate
        let p = pos("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        assert!(p.is_in_checkmate(Black));
        assert!(!p.is_in_stalemate(Black));
        assert!(!p.is_in_checkmate(White));

        let p = pos("7k/8/6Q1/8/8/8/8/4K3 b - - 0 1");
        assert!(p.is_in_stalemate(Black));
        assert!(!p.is_in_checkmate(Black));
        assert!(!p.in_check());
    }
}
