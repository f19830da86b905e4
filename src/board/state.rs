/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt::{self, Write},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};

use super::{Color, Piece, PieceKind, Square};
use crate::FEN_STARTPOS;

/// Code written for an empty square in piece-code layouts.
pub const EMPTY_CODE: &str = "0";

/// One of the two sides of the board a King may castle towards.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    /// Number of castling sides.
    pub const COUNT: usize = 2;

    /// Both sides, kingside first.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::Kingside, Self::Queenside]
    }

    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }
}

/// The fixed squares involved in one castling move.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Castling {
    pub side: CastleSide,
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,

    /// The square the King crosses on its way to `king_to`.
    pub king_passes: Square,

    /// Every square strictly between the King and the Rook; all must be empty to castle.
    pub between: &'static [Square],
}

impl Castling {
    /// Fetches the castling squares for `color` on `side`.
    pub fn of(color: Color, side: CastleSide) -> &'static Self {
        &CASTLING[color.index()][side.index()]
    }

    /// If a King of `color` moving `from` -> `to` is a castling move, returns its squares.
    pub fn matching(color: Color, from: Square, to: Square) -> Option<&'static Self> {
        CastleSide::all()
            .into_iter()
            .map(|side| Self::of(color, side))
            .find(|castling| castling.king_from == from && castling.king_to == to)
    }
}

#[rustfmt::skip]
static CASTLING: [[Castling; CastleSide::COUNT]; Color::COUNT] = [
    [
        Castling { side: CastleSide::Kingside,  king_from: Square::E1, king_to: Square::G1, rook_from: Square::H1, rook_to: Square::F1, king_passes: Square::F1, between: &[Square::F1, Square::G1] },
        Castling { side: CastleSide::Queenside, king_from: Square::E1, king_to: Square::C1, rook_from: Square::A1, rook_to: Square::D1, king_passes: Square::D1, between: &[Square::B1, Square::C1, Square::D1] },
    ],
    [
        Castling { side: CastleSide::Kingside,  king_from: Square::E8, king_to: Square::G8, rook_from: Square::H8, rook_to: Square::F8, king_passes: Square::F8, between: &[Square::F8, Square::G8] },
        Castling { side: CastleSide::Queenside, king_from: Square::E8, king_to: Square::C8, rook_from: Square::A8, rook_to: Square::D8, king_passes: Square::D8, between: &[Square::B8, Square::C8, Square::D8] },
    ],
];

/// The state of a chess board: 64 squares plus the moved-flags that gate castling.
///
/// This is the single source of truth for a position.
/// It is mutated only by [`Board::move_piece`] (and, transiently, by legality checks, which always restore it).
///
/// Side-to-move is not stored here; see [`crate::Session`].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    /// Row-major from Black's back rank. `None` is an empty square.
    pub(crate) squares: [Option<Piece>; Square::COUNT],

    /// Set once the King of that color has moved, including by castling.
    king_moved: [bool; Color::COUNT],

    /// Set once the Rook starting on that color's kingside/queenside corner has moved.
    rook_moved: [[bool; CastleSide::COUNT]; Color::COUNT],
}

impl Board {
    /// Creates a new, empty [`Board`] with no moved-flags set.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Board;
    /// let board = Board::new();
    /// assert_eq!(board.pieces().count(), 0);
    /// ```
    #[inline(always)]
    pub const fn new() -> Self {
        Self {
            squares: [None; Square::COUNT],
            king_moved: [false; Color::COUNT],
            rook_moved: [[false; CastleSide::COUNT]; Color::COUNT],
        }
    }

    /// Creates a [`Board`] from 64 piece codes, row-major from Black's back rank.
    ///
    /// Each code is a color+kind tag (`"wP"`, `"bKnight"`, ...) or an empty square (`"0"`, `"."`, `"--"`).
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Piece, Square, STARTPOS_CODES};
    /// let board = Board::from_codes(STARTPOS_CODES).unwrap();
    /// assert_eq!(board.piece_at(Square::E1), Some(Piece::WHITE_KING));
    /// assert_eq!(board, Board::default());
    /// ```
    pub fn from_codes<T: AsRef<str>>(codes: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut board = Self::new();
        let mut count = 0;

        for (i, code) in codes.into_iter().enumerate() {
            let code = code.as_ref().trim();
            if i >= Square::COUNT {
                bail!("Board layout must have exactly {} squares. Got more", Square::COUNT);
            }

            board.squares[i] = match code {
                EMPTY_CODE | "." | "--" => None,
                tag => Some(
                    Piece::from_tag(tag)
                        .with_context(|| format!("Invalid code at square index {i}"))?,
                ),
            };
            count += 1;
        }

        if count != Square::COUNT {
            bail!(
                "Board layout must have exactly {} squares. Got {count}",
                Square::COUNT
            );
        }

        Ok(board)
    }

    /// Creates a [`Board`] from a FEN string.
    ///
    /// Only the piece placements and castling fields are used. A missing castling right marks
    /// the corresponding Rook as moved; a color with no castling rights at all has its King
    /// marked as moved as well.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, FEN_STARTPOS};
    /// assert_eq!(Board::from_fen(FEN_STARTPOS).unwrap(), Board::default());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut board = Self::new();
        let mut split = fen.trim().split_ascii_whitespace();
        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;

        let rows = placements.split('/').collect::<Vec<_>>();
        if rows.len() != Square::SIDE as usize {
            bail!(
                "FEN placements must have {} ranks separated by '/'. Got {placements:?}",
                Square::SIDE
            );
        }

        for (row, placements) in rows.into_iter().enumerate() {
            let mut col = 0u8;
            for c in placements.chars() {
                if let Some(empty) = c.to_digit(10) {
                    col += empty as u8;
                } else {
                    let square = Square::new(row as u8, col).ok_or(anyhow!(
                        "FEN rank {placements:?} describes more than {} squares",
                        Square::SIDE
                    ))?;
                    board.squares[square.index()] = Some(Piece::from_uci(c)?);
                    col += 1;
                }
            }

            if col != Square::SIDE {
                bail!(
                    "FEN rank {placements:?} must describe exactly {} squares. Got {col}",
                    Square::SIDE
                );
            }
        }

        // Fields between placements and castling are irrelevant here
        let castling = split.nth(1).unwrap_or("KQkq");
        for color in Color::all() {
            let (short, long) = match color {
                Color::White => ('K', 'Q'),
                Color::Black => ('k', 'q'),
            };
            let can_short = castling.contains(short);
            let can_long = castling.contains(long);

            board.rook_moved[color][CastleSide::Kingside.index()] = !can_short;
            board.rook_moved[color][CastleSide::Queenside.index()] = !can_long;
            board.king_moved[color] = !can_short && !can_long;
        }

        Ok(board)
    }

    /// Generates the piece-placement field of a FEN string for this [`Board`].
    ///
    /// # Example
    /// ```
    /// # use mailbox::Board;
    /// assert_eq!(Board::default().to_fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    /// ```
    pub fn to_fen(&self) -> String {
        let mut placements = String::with_capacity(Square::COUNT + 7);

        for (row, rank) in self.squares.chunks(Square::SIDE as usize).enumerate() {
            let mut empty = 0;
            for piece in rank {
                if let Some(piece) = piece {
                    if empty > 0 {
                        _ = write!(placements, "{empty}");
                        empty = 0;
                    }
                    placements.push(piece.to_uci());
                } else {
                    empty += 1;
                }
            }
            if empty > 0 {
                _ = write!(placements, "{empty}");
            }
            if row + 1 < Square::SIDE as usize {
                placements.push('/');
            }
        }

        placements
    }

    /// Returns the 64 piece codes of this [`Board`], row-major from Black's back rank.
    pub fn to_codes(&self) -> Vec<&'static str> {
        self.squares
            .iter()
            .map(|piece| piece.map_or(EMPTY_CODE, |piece| piece.tag()))
            .collect()
    }

    /// Fetches the [`Piece`] at `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Returns `true` if there is no piece on `square`.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Places `piece` on `square`, replacing anything already there.
    ///
    /// This is a board-editing helper for setting up positions; it touches no moved-flags.
    #[inline(always)]
    pub fn place(&mut self, piece: Piece, square: Square) {
        self.squares[square.index()] = Some(piece);
    }

    /// Removes and returns the piece on `square`, if there is one.
    #[inline(always)]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square.index()].take()
    }

    /// Returns `true` if the King of `color` has moved.
    #[inline(always)]
    pub const fn king_moved(&self, color: Color) -> bool {
        self.king_moved[color.index()]
    }

    /// Returns `true` if the Rook that started on `color`'s `side` corner has moved.
    #[inline(always)]
    pub const fn rook_moved(&self, color: Color, side: CastleSide) -> bool {
        self.rook_moved[color.index()][side.index()]
    }

    /// An iterator over every occupied square and the piece on it, in index order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// An iterator over every square occupied by a piece of `color`, in index order.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.pieces()
            .filter(move |(_, piece)| piece.color() == color)
            .map(|(square, _)| square)
    }

    /// Finds the King of `color`.
    ///
    /// Test positions are free to omit Kings, so this may yield `None`.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::iter().find(|&square| self.piece_at(square) == Some(king))
    }

    /// Applies the move `from` -> `to`, with no legality checks whatsoever.
    ///
    /// Callers must validate the move first (see [`Board::legal_moves`]).
    ///
    /// On top of relocating the piece, this:
    /// * moves the paired Rook when a King castles (two columns along its home rank),
    /// * marks the King as moved whenever it moves,
    /// * marks a Rook as moved when it leaves its original corner,
    /// * promotes a Pawn reaching the far back rank to a Queen.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Piece, Square};
    /// let mut board = Board::default();
    /// board.move_piece(Square::E2, Square::E4);
    /// assert_eq!(board.piece_at(Square::E4), Some(Piece::WHITE_PAWN));
    /// assert!(board.is_empty(Square::E2));
    /// ```
    pub fn move_piece(&mut self, from: Square, to: Square) {
        let Some(piece) = self.take(from) else {
            log::warn!("Moving from empty square {from}; clearing {to}");
            self.squares[to.index()] = None;
            return;
        };

        log::trace!("{} {from} -> {to}", piece.name());
        self.squares[to.index()] = Some(piece);

        let color = piece.color();
        match piece.kind() {
            PieceKind::King => {
                self.king_moved[color] = true;

                if let Some(castling) = Castling::matching(color, from, to) {
                    let rook = self.take(castling.rook_from);
                    self.squares[castling.rook_to.index()] = rook;
                    self.rook_moved[color][castling.side.index()] = true;
                }
            }

            PieceKind::Rook => {
                for side in CastleSide::all() {
                    if Castling::of(color, side).rook_from == from {
                        self.rook_moved[color][side.index()] = true;
                    }
                }
            }

            PieceKind::Pawn if to.row() == color.promotion_rank() => {
                self.squares[to.index()] = Some(piece.promoted());
            }

            _ => {}
        }
    }
}

impl Default for Board {
    /// The standard opening position.
    fn default() -> Self {
        // Safe unwrap: the startpos FEN is a compile-time constant known to be valid
        Self::from_fen(FEN_STARTPOS).unwrap()
    }
}

impl FromStr for Board {
    type Err = anyhow::Error;

    /// Parses either a FEN string or 64 whitespace-separated piece codes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('/') {
            Self::from_fen(s)
        } else {
            Self::from_codes(s.split_ascii_whitespace())
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..Square::SIDE {
            write!(f, "{}| ", Square::SIDE - row)?;

            for col in 0..Square::SIDE {
                let square = Square::new(row, col).ok_or(fmt::Error)?;
                match self.piece_at(square) {
                    Some(piece) => write!(f, "{piece:#} ")?,
                    None => write!(f, ". ")?,
                }
            }

            writeln!(f)?;
        }
        writeln!(f, " +----------------")?;
        write!(f, "   a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        for color in Color::all() {
            writeln!(
                f,
                "{color:#}: king moved: {}, kingside rook moved: {}, queenside rook moved: {}",
                self.king_moved(color),
                self.rook_moved(color, CastleSide::Kingside),
                self.rook_moved(color, CastleSide::Queenside),
            )?;
        }
        Ok(())
    }
}
