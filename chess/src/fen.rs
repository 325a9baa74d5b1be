//! Reading and writing positions in Forsyth-Edwards Notation
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
use std::str::FromStr;
use super::*;

impl Position {
    /// Parses a position from a FEN string
    ///
    /// The half-move clock and full-move number may be left off, in which case they default to 0
    /// and 1. Anything that fails to parse gives `Error::ParseError`; a well-formed but impossible
    /// position gives the matching builder error.
    pub fn from_fen(s: &str) -> Result<Position> {
        use Error::*;

        let mut pos = PositionBuilder::new();
        let mut fields = s.split_whitespace();

        // parse the board
        let board = fields.next().ok_or(ParseError)?;
        let mut r = Rank::COUNT - 1;
        let mut f = 0;
        for c in board.chars() {
            match c {
                '1' ..= '8' => {
                    f += c.to_digit(10).expect("INFALLIBLE") as usize;
                    if f > File::COUNT {
                        return Err(ParseError);
                    }
                },
                '/' => {
                    if f == File::COUNT && r > 0 {
                        r -= 1;
                        f = 0;
                    } else {
                        return Err(ParseError);
                    }
                },
                _ => {
                    let sq = match (f.try_into(), r.try_into()) {
                        (Ok(f), Ok(r)) => Square::from_coord(f, r),
                        _ => return Err(ParseError),
                    };
                    let (color, piece) = Piece::from_char(c).ok_or(ParseError)?;

                    pos.piece(color, piece, sq);
                    f += 1;
                },
            }
        }
        if r > 0 || f != File::COUNT {
            return Err(ParseError);
        }

        // whose turn it is
        pos.turn(fields.next().ok_or(ParseError)?.parse()?);

        // castling rights
        pos.castling_rights(fields.next().ok_or(ParseError)?.parse()?);

        // en passant square
        match fields.next() {
            Some("-") => {},
            Some(ep_square) => { pos.en_passant_square(Some(ep_square.parse()?)); },
            None => return Err(ParseError),
        }

        // half-move clock and move number, if present
        if let Some(plies) = fields.next() {
            pos.halfmove_clock(plies.parse().map_err(|_| ParseError)?);
        }
        if let Some(number) = fields.next() {
            pos.fullmove_number(number.parse().map_err(|_| ParseError)?);
        }
        if fields.next().is_some() {
            return Err(ParseError);
        }

        pos.validate()
    }

    /// Converts the position to a FEN string
    pub fn to_fen(&self) -> String {
        let mut board = String::new();

        for r in (0..Rank::COUNT).rev() {
            let mut empty = 0;

            for f in 0..File::COUNT {
                let sq = Square::from_coord(
                    f.try_into().expect("INFALLIBLE"),
                    r.try_into().expect("INFALLIBLE"),
                );

                match self.piece_at(sq) {
                    Some((color, piece)) => {
                        if empty > 0 {
                            board += &empty.to_string();
                            empty = 0;
                        }
                        board.push(piece.to_char(color));
                    },
                    None => empty += 1,
                }
            }
            if empty > 0 {
                board += &empty.to_string();
            }
            if r > 0 {
                board.push('/');
            }
        }

        let ep_square = match self.ep_square() {
            Some(sq) => sq.to_string(),
            None => "-".to_string(),
        };

        format!("{} {} {} {} {} {}", board, self.turn(), self.castling_rights(), ep_square,
                                     self.halfmove_clock(), self.fullmove_number())
    }
}

impl fmt::Display for Position {
    /// Writes out the position using FEN
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_fen().fmt(f)
    }
}

impl FromStr for Position {
    type Err = Error;

    /// Parses a position from a FEN string
    fn from_str(s: &str) -> Result<Self> {
        Position::from_fen(s)
    }
}
