//! Provides data and functions used to compute attacks
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use lazy_static::lazy_static;
use super::*;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// One of the eight directions a sliding piece can move in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Direction {
    North = 0,
    South = 1,
    East = 2,
    West = 3,
    NorthEast = 4,
    NorthWest = 5,
    SouthEast = 6,
    SouthWest = 7,
}

use Direction::*;

impl Direction {
    /// The number of directions
    pub const COUNT: usize = 8;

    /// Directions a rook moves in
    pub const ORTHOGONAL: [Direction; 4] = [ North, South, East, West ];

    /// Directions a bishop moves in
    pub const DIAGONAL: [Direction; 4] = [ NorthEast, NorthWest, SouthEast, SouthWest ];

    /// Directions a queen or king moves in
    pub const ALL: [Direction; 8] = [
        North, South, East, West, NorthEast, NorthWest, SouthEast, SouthWest
    ];

    /// Returns the change in file and rank for one step in this direction
    pub fn delta(self) -> (i8, i8) {
        match self {
            North => (0, 1),
            South => (0, -1),
            East => (1, 0),
            West => (-1, 0),
            NorthEast => (1, 1),
            NorthWest => (-1, 1),
            SouthEast => (1, -1),
            SouthWest => (-1, -1),
        }
    }

    /// Returns `true` for the directions a bishop moves in
    pub fn is_diagonal(self) -> bool {
        match self {
            NorthEast | NorthWest | SouthEast | SouthWest => true,
            North | South | East | West => false,
        }
    }

    /// Returns `true` if walking in this direction visits squares of increasing index
    fn is_ascending(self) -> bool {
        match self {
            North | East | NorthEast | NorthWest => true,
            South | West | SouthEast | SouthWest => false,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The squares a sliding piece passes through walking from a square to the edge of the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ray {
    /// The squares in order of distance from the origin, which is not included
    pub squares: Vec<Square>,
    /// The same squares as a set
    pub mask: Bitboard,
}

struct Tables {
    knight: Vec<Bitboard>,
    king: Vec<Bitboard>,
    pawn_advances: [Vec<Bitboard>; Color::COUNT],
    pawn_double_advances: [Vec<Bitboard>; Color::COUNT],
    pawn_attacks: [Vec<Bitboard>; Color::COUNT],
    rays: Vec<[Ray; Direction::COUNT]>,
    between: Vec<Bitboard>,
}

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2), (2, 1), (2, -1), (1, -2), (-1, -2), (-2, -1), (-2, 1), (-1, 2),
];

lazy_static! {
    static ref TABLES: Tables = Tables::build();
}

impl Tables {
    fn build() -> Tables {
        let squares: Vec<Square> = (0..Square::COUNT)
            .map(|i| Square::try_from(i).expect("INFALLIBLE"))
            .collect();

        let leaper = |offsets: &[(i8, i8)]| -> Vec<Bitboard> {
            squares.iter().map(|sq| {
                offsets.iter().filter_map(|&(f, r)| sq.offset(f, r)).collect::<Bitboard>()
            }).collect()
        };

        let king_offsets: Vec<(i8, i8)> = Direction::ALL.iter().map(|d| d.delta()).collect();

        let mut pawn_advances = [Vec::new(), Vec::new()];
        let mut pawn_double_advances = [Vec::new(), Vec::new()];
        let mut pawn_attacks = [Vec::new(), Vec::new()];

        for &color in &[Color::White, Color::Black] {
            let c = color as usize;
            let fwd = color.forward();
            let start_rank = if color == Color::White { Rank::R2 } else { Rank::R7 };

            for &sq in &squares {
                let mut single = Bitboard::new();
                let mut double = Bitboard::new();
                let mut attacks = Bitboard::new();

                single.extend(sq.offset(0, fwd));
                if sq.rank() == start_rank {
                    double.extend(sq.offset(0, 2 * fwd));
                }
                // back-rank entries are only used for reverse lookups
                attacks.extend(sq.offset(-1, fwd));
                attacks.extend(sq.offset(1, fwd));

                pawn_advances[c].push(single);
                pawn_double_advances[c].push(double);
                pawn_attacks[c].push(attacks);
            }
        }

        let rays: Vec<[Ray; Direction::COUNT]> = squares.iter().map(|&sq| {
            let walk = |dir: Direction| {
                let (df, dr) = dir.delta();
                let mut squares = Vec::new();
                let mut next = sq.offset(df, dr);

                while let Some(s) = next {
                    squares.push(s);
                    next = s.offset(df, dr);
                }

                let mask: Bitboard = squares.iter().cloned().collect();
                Ray { squares, mask }
            };

            [
                walk(North), walk(South), walk(East), walk(West),
                walk(NorthEast), walk(NorthWest), walk(SouthEast), walk(SouthWest),
            ]
        }).collect();

        let mut between = vec![Bitboard::new(); Square::COUNT * Square::COUNT];
        for &a in &squares {
            for &dir in &Direction::ALL {
                let ray = &rays[a as usize][dir as usize];
                for (i, &b) in ray.squares.iter().enumerate() {
                    between[a as usize * Square::COUNT + b as usize] =
                        ray.squares[..i].iter().cloned().collect();
                }
            }
        }

        Tables {
            knight: leaper(&KNIGHT_OFFSETS),
            king: leaper(&king_offsets),
            pawn_advances,
            pawn_double_advances,
            pawn_attacks,
            rays,
            between,
        }
    }
}

/// Forces the attack tables to be built now rather than on first use
pub fn init() {
    lazy_static::initialize(&TABLES);
}

/// Computes knight-like attacks to or from `sq`
///
/// See the module-level documentation for more information about
/// [this function](index.html#direct-attacks-knights-and-kings).
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    TABLES.knight[sq as usize]
}

/// Computes king-like attacks to or from `sq`
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    TABLES.king[sq as usize]
}

/// Returns the square a `color` pawn on `sq` advances to in a single step, as a bitboard
#[inline]
pub fn pawn_advances(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_advances[color as usize][sq as usize]
}

/// Returns the square a `color` pawn on `sq` reaches with a two-square advance. Empty unless the
/// pawn is on its starting rank.
#[inline]
pub fn pawn_double_advances(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_double_advances[color as usize][sq as usize]
}

/// Returns the squares attacked by a `color` pawn on `sq`
///
/// Since pawn attacks are symmetric, `pawn_attacks(!color, sq)` is the set of squares from which
/// a `color` pawn would attack `sq`.
#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> Bitboard {
    TABLES.pawn_attacks[color as usize][sq as usize]
}

/// Returns the ray walking from `sq` toward the edge of the board in direction `dir`
#[inline]
pub fn ray(sq: Square, dir: Direction) -> &'static Ray {
    &TABLES.rays[sq as usize][dir as usize]
}

/// Returns the squares strictly between `a` and `b`, or an empty bitboard if they do not share a
/// rank, file or diagonal
#[inline]
pub fn between(a: Square, b: Square) -> Bitboard {
    TABLES.between[a as usize * Square::COUNT + b as usize]
}

/// Computes the squares attacked from `sq` in direction `dir`, up to and including the first
/// occupied square
pub fn ray_attacks(sq: Square, occ: Bitboard, dir: Direction) -> Bitboard {
    let mask = ray(sq, dir).mask;
    let blockers = mask & occ;
    let first = if dir.is_ascending() { blockers.peek() } else { blockers.peek_last() };

    match first {
        Some(blocker) => mask ^ ray(blocker, dir).mask,
        None => mask,
    }
}

/// Computes the attacks of a sliding piece moving in any of `dirs`
pub fn slider_attacks(sq: Square, occ: Bitboard, dirs: &[Direction]) -> Bitboard {
    let mut attacks = Bitboard::new();

    for &dir in dirs {
        attacks |= ray_attacks(sq, occ, dir);
    }

    attacks
}

/// Computes bishop-like attacks to or from `sq` based on the occupied squares given by `occ`
///
/// See the module-level documentation for more information about
/// [this function](index.html#sliding-attacks-bishops-rooks-and-queens).
#[inline]
pub fn bishop_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    slider_attacks(sq, occ, &Direction::DIAGONAL)
}

/// Computes rook-like attacks to or from `sq` based on the occupied squares given by `occ`
#[inline]
pub fn rook_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    slider_attacks(sq, occ, &Direction::ORTHOGONAL)
}

/// Computes queen-like attacks to or from square based on the occupied squares given by `occ`
#[inline]
pub fn queen_attacks(sq: Square, occ: Bitboard) -> Bitboard {
    rook_attacks(sq, occ) | bishop_attacks(sq, occ)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squares(list: &[Square]) -> Bitboard {
        list.iter().cloned().collect()
    }

    #[test]
    fn knight_attacks_are_clipped_to_the_board() {
        assert_eq!(knight_attacks(Square::A1), squares(&[Square::B3, Square::C2]));
        assert_eq!(knight_attacks(Square::D4).len(), 8);
        assert_eq!(knight_attacks(Square::H8), squares(&[Square::F7, Square::G6]));
    }

    #[test]
    fn king_attacks_are_clipped_to_the_board() {
        assert_eq!(king_attacks(Square::A1), squares(&[Square::A2, Square::B1, Square::B2]));
        assert_eq!(king_attacks(Square::E4).len(), 8);
        assert_eq!(king_attacks(Square::H5).len(), 5);
    }

    #[test]
    fn pawn_tables_depend_on_color() {
        assert_eq!(pawn_advances(Color::White, Square::E2), squares(&[Square::E3]));
        assert_eq!(pawn_double_advances(Color::White, Square::E2), squares(&[Square::E4]));
        assert!(pawn_double_advances(Color::White, Square::E3).is_empty());
        assert_eq!(pawn_advances(Color::Black, Square::E7), squares(&[Square::E6]));
        assert_eq!(pawn_double_advances(Color::Black, Square::E7), squares(&[Square::E5]));
        assert!(pawn_double_advances(Color::Black, Square::E2).is_empty());

        assert_eq!(pawn_attacks(Color::White, Square::E4), squares(&[Square::D5, Square::F5]));
        assert_eq!(pawn_attacks(Color::Black, Square::E4), squares(&[Square::D3, Square::F3]));
        assert_eq!(pawn_attacks(Color::White, Square::H2), squares(&[Square::G3]));
        assert!(pawn_advances(Color::White, Square::E8).is_empty());
    }

    #[test]
    fn rays_are_ordered_from_the_origin() {
        let north = ray(Square::E4, Direction::North);
        assert_eq!(north.squares, vec![Square::E5, Square::E6, Square::E7, Square::E8]);
        let south_west = ray(Square::E4, Direction::SouthWest);
        assert_eq!(south_west.squares, vec![Square::D3, Square::C2, Square::B1]);
        assert!(ray(Square::H1, Direction::East).squares.is_empty());
        assert_eq!(ray(Square::A1, Direction::NorthEast).mask.len(), 7);
    }

    #[test]
    fn sliding_attacks_stop_at_the_first_blocker() {
        let occ = squares(&[Square::E6, Square::C4, Square::E2]);
        let expected = squares(&[
            Square::E5, Square::E6,
            Square::E3, Square::E2,
            Square::D4, Square::C4,
            Square::F4, Square::G4, Square::H4,
        ]);
        assert_eq!(rook_attacks(Square::E4, occ), expected);

        let occ = squares(&[Square::G6, Square::B1]);
        let expected = squares(&[
            Square::F5, Square::G6,
            Square::D5, Square::C6, Square::B7, Square::A8,
            Square::F3, Square::G2, Square::H1,
            Square::D3, Square::C2, Square::B1,
        ]);
        assert_eq!(bishop_attacks(Square::E4, occ), expected);

        assert_eq!(
            queen_attacks(Square::E4, occ),
            rook_attacks(Square::E4, occ) | bishop_attacks(Square::E4, occ)
        );
        assert_eq!(queen_attacks(Square::D4, Bitboard::new()).len(), 27);
    }

    #[test]
    fn between_only_covers_aligned_squares() {
        assert_eq!(between(Square::A1, Square::D4), squares(&[Square::B2, Square::C3]));
        assert_eq!(between(Square::D4, Square::A1), squares(&[Square::B2, Square::C3]));
        assert_eq!(between(Square::E1, Square::E8).len(), 6);
        assert!(between(Square::E1, Square::E2).is_empty());
        assert!(between(Square::A1, Square::B3).is_empty());
    }
}
