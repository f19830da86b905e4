/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Neg},
    str::FromStr,
};

use anyhow::{bail, Result};

/// Represents the color of a player or a piece.
///
/// White traditionally moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Returns this [`Color`]'s opposite.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this [`Color`] as a `usize`, for indexing into lists.
    ///
    /// Will be `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The direction, in rows, that this color's Pawns advance.
    ///
    /// White starts at the bottom of the board (high rows) and moves toward row `0`.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    /// The row this color's pieces start on.
    #[inline(always)]
    pub const fn back_rank(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// The row this color's Pawns start on.
    #[inline(always)]
    pub const fn pawn_rank(&self) -> u8 {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }

    /// The row on which this color's Pawns promote.
    #[inline(always)]
    pub const fn promotion_rank(&self) -> u8 {
        self.opponent().back_rank()
    }

    /// Creates a [`Color`] from a `char`, with `'w'` being White and `'b'` being Black (case-insensitive).
    ///
    /// # Example
    /// ```
    /// # use mailbox::Color;
    /// assert_eq!(Color::from_uci('w').unwrap(), Color::White);
    /// assert!(Color::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color:?}"),
        }
    }

    /// Converts this [`Color`] to a char: `'w'` or `'b'`.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Neg for Color {
    type Output = Self;
    /// Negating [`Color::White`] yields [`Color::Black`] and vice versa.
    #[inline(always)]
    fn neg(self) -> Self::Output {
        self.opponent()
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;
    /// Accepts `w`/`b` as well as the full names `white`/`black`, in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "black" => Ok(Self::Black),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_uci(c),
                    _ => bail!("Invalid Color {s:?}. Expected one of w, b, white, black"),
                }
            }
        }
    }
}

impl<T> Index<Color> for [T; Color::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Color> for [T; Color::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}", self.to_uci())
        }
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Represents the kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Creates a [`PieceKind`] from its FEN character, ignoring case.
    #[inline(always)]
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to its uppercase FEN character.
    #[inline(always)]
    pub const fn char(&self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Returns `true` for the minor pieces, Knights and Bishops.
    #[inline(always)]
    pub const fn is_minor(&self) -> bool {
        matches!(self, Self::Knight | Self::Bishop)
    }
}

/// A chess piece: a [`Color`] and a [`PieceKind`].
///
/// An empty square is represented by `None` wherever an `Option<Piece>` is stored.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece {
    color: Color,
    kind: PieceKind,
}

impl Piece {
    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self { color, kind }
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline(always)]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns this piece as the [`PieceKind::Queen`] of the same color.
    ///
    /// Queen is the only promotion this engine knows about.
    #[inline(always)]
    pub const fn promoted(self) -> Self {
        Self::new(self.color, PieceKind::Queen)
    }

    /// Creates a [`Piece`] from its FEN character, with uppercase being White and lowercase being Black.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Piece;
    /// assert_eq!(Piece::from_uci('k').unwrap(), Piece::BLACK_KING);
    /// assert!(Piece::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = if piece.is_ascii_lowercase() {
            Color::Black
        } else {
            Color::White
        };
        Ok(Self::new(color, kind))
    }

    /// Converts this [`Piece`] to its FEN character.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self.color {
            Color::White => self.kind.char(),
            Color::Black => self.kind.char().to_ascii_lowercase(),
        }
    }

    /// Parses a [`Piece`] from its color+kind tag, such as `"wP"` or `"bK"`.
    ///
    /// The long tags `"wKnight"` and `"bKnight"` are also accepted.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Piece;
    /// assert_eq!(Piece::from_tag("wQ").unwrap(), Piece::WHITE_QUEEN);
    /// assert_eq!(Piece::from_tag("bKnight").unwrap(), Piece::BLACK_KNIGHT);
    /// assert!(Piece::from_tag("wX").is_err());
    /// ```
    pub fn from_tag(tag: &str) -> Result<Self> {
        let mut chars = tag.chars();
        let Some(color) = chars.next() else {
            bail!("Piece tag must not be empty");
        };
        let color = Color::from_uci(color)?;

        let kind = match chars.as_str() {
            "Knight" | "knight" => PieceKind::Knight,
            rest => {
                let mut kind = rest.chars();
                match (kind.next(), kind.next()) {
                    (Some(c), None) => PieceKind::from_uci(c)?,
                    _ => bail!("Invalid piece tag {tag:?}. Expected a color and a kind, like \"wP\""),
                }
            }
        };

        Ok(Self::new(color, kind))
    }

    /// Converts this [`Piece`] to its two-character color+kind tag.
    #[inline(always)]
    pub const fn tag(&self) -> &'static str {
        match self.color {
            Color::White => match self.kind {
                PieceKind::Pawn => "wP",
                PieceKind::Knight => "wN",
                PieceKind::Bishop => "wB",
                PieceKind::Rook => "wR",
                PieceKind::Queen => "wQ",
                PieceKind::King => "wK",
            },
            Color::Black => match self.kind {
                PieceKind::Pawn => "bP",
                PieceKind::Knight => "bN",
                PieceKind::Bishop => "bB",
                PieceKind::Rook => "bR",
                PieceKind::Queen => "bQ",
                PieceKind::King => "bK",
            },
        }
    }

    /// Fetches a human-readable name for this [`Piece`], such as `"white knight"`.
    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", self.color.name(), self.kind.name())
    }
}

impl FromStr for Piece {
    type Err = anyhow::Error;
    /// Accepts either a FEN character (`N`, `q`) or a color+kind tag (`wN`, `bQ`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_uci(c),
            _ => Self::from_tag(s),
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.to_uci())
        } else {
            write!(f, "{}", self.tag())
        }
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}
