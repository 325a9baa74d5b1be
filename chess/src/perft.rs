//! Counting the variations reachable from a position, for checking the move generator against
//! known results
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use log::{debug, trace};
use super::*;

/// Count the number of variations of the given `depth` from `pos`
///
/// `pos` is modified while counting but is restored before returning.
///
/// ```
/// use chess::{Position, perft};
///
/// let mut pos = Position::new();
/// assert_eq!(perft::count(&mut pos, 3), 8902);
/// ```
pub fn count(pos: &mut Position, depth: usize) -> u64 {
    if depth < 1 {
        return 1;
    }

    let moves = pos.legal_moves();
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut total = 0;
    for mv in moves {
        let undo = pos.apply_move(mv);
        total += count(pos, depth - 1);
        pos.undo_move(mv, undo);
    }

    total
}

/// Count the number of variations of the given `depth` following each legal move from `pos`
///
/// The counts are in the order the moves were generated and add up to `count(pos, depth)`.
pub fn divide(pos: &mut Position, depth: usize) -> Vec<(Move, u64)> {
    if depth < 1 {
        return Vec::new();
    }

    trace!("divide {} to depth {}", pos, depth);

    let mut counts = Vec::new();
    for mv in pos.legal_moves() {
        let undo = pos.apply_move(mv);
        let n = count(pos, depth - 1);
        pos.undo_move(mv, undo);

        debug!("{:7}\t{:12}", mv, n);
        counts.push((mv, n));
    }

    counts
}

impl Position {
    /// Returns the number of variations of the given `depth` from this position
    pub fn perft(&mut self, depth: usize) -> u64 {
        count(self, depth)
    }

    /// Returns the number of variations of the given `depth` following each legal move
    pub fn divide(&mut self, depth: usize) -> Vec<(Move, u64)> {
        divide(self, depth)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_zero_is_one() {
        assert_eq!(Position::new().perft(0), 1);
        assert!(Position::new().divide(0).is_empty());
    }

    #[test]
    fn start_position_shallow_counts() {
        let mut pos = Position::new();
        assert_eq!(pos.perft(1), 20);
        assert_eq!(pos.perft(2), 400);
        assert_eq!(pos.perft(3), 8902);
        assert_eq!(pos, Position::new());
    }

    #[test]
    fn divide_adds_up_to_the_total() {
        let mut pos: Position =
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1".parse().unwrap();
        let before = pos.clone();

        let counts = pos.divide(2);
        assert_eq!(counts.len(), 48);
        assert_eq!(counts.iter().map(|&(_, n)| n).sum::<u64>(), 2039);
        assert_eq!(pos, before);
    }

    #[test]
    fn checkmated_side_has_no_variations() {
        let mut pos: Position = "R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1".parse().unwrap();
        assert_eq!(pos.perft(1), 0);
        assert_eq!(pos.perft(3), 0);
    }
}
