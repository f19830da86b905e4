/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

/// Represents a single square on an `8x8` chess board.
///
/// Squares are stored row-major, starting from Black's back rank, so `square = col + row * 8`.
/// The indices of each square on the board are given as follows:
/// ```text
/// 8|  0  1  2  3  4  5  6  7
/// 7|  8  9 10 11 12 13 14 15
/// 6| 16 17 18 19 20 21 22 23
/// 5| 24 25 26 27 28 29 30 31
/// 4| 32 33 34 35 36 37 38 39
/// 3| 40 41 42 43 44 45 46 47
/// 2| 48 49 50 51 52 53 54 55
/// 1| 56 57 58 59 60 61 62 63
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(pub(crate) u8);

#[rustfmt::skip]
impl Square {
    pub const A8: Self = Self(0);  pub const B8: Self = Self(1);  pub const C8: Self = Self(2);  pub const D8: Self = Self(3);
    pub const E8: Self = Self(4);  pub const F8: Self = Self(5);  pub const G8: Self = Self(6);  pub const H8: Self = Self(7);
    pub const A7: Self = Self(8);  pub const B7: Self = Self(9);  pub const C7: Self = Self(10); pub const D7: Self = Self(11);
    pub const E7: Self = Self(12); pub const F7: Self = Self(13); pub const G7: Self = Self(14); pub const H7: Self = Self(15);
    pub const A6: Self = Self(16); pub const B6: Self = Self(17); pub const C6: Self = Self(18); pub const D6: Self = Self(19);
    pub const E6: Self = Self(20); pub const F6: Self = Self(21); pub const G6: Self = Self(22); pub const H6: Self = Self(23);
    pub const A5: Self = Self(24); pub const B5: Self = Self(25); pub const C5: Self = Self(26); pub const D5: Self = Self(27);
    pub const E5: Self = Self(28); pub const F5: Self = Self(29); pub const G5: Self = Self(30); pub const H5: Self = Self(31);
    pub const A4: Self = Self(32); pub const B4: Self = Self(33); pub const C4: Self = Self(34); pub const D4: Self = Self(35);
    pub const E4: Self = Self(36); pub const F4: Self = Self(37); pub const G4: Self = Self(38); pub const H4: Self = Self(39);
    pub const A3: Self = Self(40); pub const B3: Self = Self(41); pub const C3: Self = Self(42); pub const D3: Self = Self(43);
    pub const E3: Self = Self(44); pub const F3: Self = Self(45); pub const G3: Self = Self(46); pub const H3: Self = Self(47);
    pub const A2: Self = Self(48); pub const B2: Self = Self(49); pub const C2: Self = Self(50); pub const D2: Self = Self(51);
    pub const E2: Self = Self(52); pub const F2: Self = Self(53); pub const G2: Self = Self(54); pub const H2: Self = Self(55);
    pub const A1: Self = Self(56); pub const B1: Self = Self(57); pub const C1: Self = Self(58); pub const D1: Self = Self(59);
    pub const E1: Self = Self(60); pub const F1: Self = Self(61); pub const G1: Self = Self(62); pub const H1: Self = Self(63);
}

impl Square {
    /// Number of squares on the board.
    pub const COUNT: usize = 64;

    /// Number of rows (and columns) on the board.
    pub const SIDE: u8 = 8;

    /// Creates a new [`Square`] from a row and a column, returning `None` if either is off the board.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Square;
    /// assert_eq!(Square::new(6, 4), Some(Square::E2));
    /// assert_eq!(Square::new(8, 0), None);
    /// ```
    #[inline(always)]
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < Self::SIDE && col < Self::SIDE {
            Some(Self(row * Self::SIDE + col))
        } else {
            None
        }
    }

    /// Creates a new [`Square`] from the provided index.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Square;
    /// assert_eq!(Square::from_index(60).unwrap(), Square::E1);
    /// assert!(Square::from_index(64).is_err());
    /// ```
    #[inline(always)]
    pub fn from_index(index: usize) -> Result<Self> {
        if index < Self::COUNT {
            Ok(Self(index as u8))
        } else {
            bail!(
                "Invalid index for Square: Index must be between [0,{}). Got {index}",
                Self::COUNT
            )
        }
    }

    /// An iterator over all squares, in index order.
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Returns the index of this [`Square`] in `[0,64)`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the row of this [`Square`], where row `0` is Black's back rank.
    #[inline(always)]
    pub const fn row(&self) -> u8 {
        self.0 / Self::SIDE
    }

    /// Returns the column of this [`Square`], where column `0` is the a-file.
    #[inline(always)]
    pub const fn col(&self) -> u8 {
        self.0 % Self::SIDE
    }

    /// Returns the [`Square`] that is `rows` rows and `cols` columns away from this one,
    /// or `None` if that would leave the board.
    ///
    /// Stepping by row and column (rather than adding index offsets) means a piece on
    /// the edge of the board can never wrap around to the opposite edge.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Square;
    /// assert_eq!(Square::E2.offset(-1, 1), Some(Square::F3));
    /// assert_eq!(Square::H2.offset(-1, 1), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, rows: i8, cols: i8) -> Option<Self> {
        let row = self.row() as i8 + rows;
        let col = self.col() as i8 + cols;
        if row < 0 || col < 0 {
            return None;
        }
        Self::new(row as u8, col as u8)
    }

    /// Parses a [`Square`] from either algebraic notation (`"e2"`) or a raw index (`"52"`).
    ///
    /// # Example
    /// ```
    /// # use mailbox::Square;
    /// assert_eq!(Square::from_uci("e2").unwrap(), Square::E2);
    /// assert_eq!(Square::from_uci("52").unwrap(), Square::E2);
    /// assert!(Square::from_uci("i9").is_err());
    /// ```
    pub fn from_uci(square: &str) -> Result<Self> {
        let square = square.trim();

        if square.chars().all(|c| c.is_ascii_digit()) && !square.is_empty() {
            let index = square
                .parse::<usize>()
                .with_context(|| format!("Invalid square index {square:?}"))?;
            return Self::from_index(index);
        }

        let mut chars = square.chars();
        let (Some(file), Some(rank), None) = (chars.next(), chars.next(), chars.next()) else {
            bail!("Square must be two characters (like \"e2\") or an index. Got {square:?}");
        };

        let file = file.to_ascii_lowercase();
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?} in square {square:?}");
        }
        let rank = rank
            .to_digit(10)
            .filter(|r| (1..=8).contains(r))
            .ok_or(anyhow!("Invalid rank {rank:?} in square {square:?}"))?;

        let col = file as u8 - b'a';
        let row = Self::SIDE - rank as u8;
        Ok(Self(row * Self::SIDE + col))
    }

    /// Converts this [`Square`] to algebraic notation, such as `"e2"`.
    pub fn to_uci(self) -> String {
        format!("{self}")
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl TryFrom<usize> for Square {
    type Error = anyhow::Error;
    #[inline(always)]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Square> for usize {
    #[inline(always)]
    fn from(value: Square) -> Self {
        value.index()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col()) as char;
        let rank = Self::SIDE - self.row();
        write!(f, "{file}{rank}")
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}
