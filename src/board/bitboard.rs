/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Not};

use super::Square;

/// A [`Bitboard`] is a set of [`Square`]s, stored as the bits of a `u64`.
///
/// Bit `n` corresponds to the square with index `n`, so bit 0 is a8 and bit 63 is h1.
/// This is used for square sets such as the squares threatened by one side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Bitboard(pub(crate) u64);

impl Bitboard {
    pub const EMPTY_BOARD: Self = Self(0x0000000000000000);
    pub const FULL_BOARD: Self = Self(0xFFFFFFFFFFFFFFFF);

    /// Constructs a new [`Bitboard`] from the provided bit pattern.
    #[inline(always)]
    pub const fn new(bits: u64) -> Self {
        Self(bits)
    }

    /// Constructs a new [`Bitboard`] with only `square` set.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::H1);
    /// assert_eq!(board.inner(), 1 << 63);
    /// ```
    #[inline(always)]
    pub const fn from_square(square: Square) -> Self {
        Self(1 << square.index())
    }

    /// Returns the inner `u64` of this [`Bitboard`].
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Checks if this [`Bitboard`] is empty, meaning all bits are set to `0`.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `square` is a member of this set.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Bitboard, Square};
    /// let board = Bitboard::from_square(Square::E4);
    /// assert!(board.contains(Square::E4));
    /// assert!(!board.contains(Square::E5));
    /// ```
    #[inline(always)]
    pub const fn contains(&self, square: Square) -> bool {
        self.0 & Self::from_square(square).0 != 0
    }

    /// Adds `square` to this set.
    #[inline(always)]
    pub fn set(&mut self, square: Square) {
        self.0 |= Self::from_square(square).0
    }

    /// Removes `square` from this set.
    #[inline(always)]
    pub fn clear(&mut self, square: Square) {
        self.0 &= !Self::from_square(square).0
    }

    /// Yields the number of squares in this set.
    #[inline(always)]
    pub const fn population(&self) -> u8 {
        self.0.count_ones() as u8
    }

    /// Pops and returns the lowest-index square in this set, if there is one.
    #[inline(always)]
    pub fn pop_lsb(&mut self) -> Option<Square> {
        if self.is_empty() {
            return None;
        }
        let lsb = Square(self.0.trailing_zeros() as u8);
        self.0 &= self.0.wrapping_sub(1);
        Some(lsb)
    }

    /// Returns a [`BitboardIter`] to iterate over all of the set squares, in index order.
    #[inline(always)]
    pub const fn iter(&self) -> BitboardIter {
        BitboardIter { bitboard: *self }
    }
}

impl FromIterator<Square> for Bitboard {
    /// A [`Bitboard`] can be created from an iterator over [`Square`]s.
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        iter.into_iter().fold(Self::default(), |bb, sq| bb | sq)
    }
}

macro_rules! impl_bitwise_op {
    ($op:tt, $op_assign:tt, $func:ident, $func_assign:ident) => {
        impl<T> std::ops::$op<T> for Bitboard
        where
            Self: From<T>,
        {
            type Output = Self;
            #[inline(always)]
            fn $func(self, rhs: T) -> Self::Output {
                Self(self.0.$func(Self::from(rhs).0))
            }
        }

        impl<T> std::ops::$op_assign<T> for Bitboard
        where
            Self: From<T>,
        {
            #[inline(always)]
            fn $func_assign(&mut self, rhs: T) {
                self.0.$func_assign(Self::from(rhs).0);
            }
        }
    };
}

impl_bitwise_op!(BitAnd, BitAndAssign, bitand, bitand_assign);
impl_bitwise_op!(BitOr, BitOrAssign, bitor, bitor_assign);

impl Not for Bitboard {
    type Output = Self;
    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    #[inline(always)]
    fn from(value: Square) -> Self {
        Self::from_square(value)
    }
}

impl fmt::Display for Bitboard {
    /// Draws the set as a grid, Black's back rank at the top, with `X` marking members.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Allocate just enough capacity
        let mut board = String::with_capacity(136);

        for square in Square::iter() {
            let occupant = if self.contains(square) { 'X' } else { '.' };
            board.push(occupant);
            board.push(' ');

            if square.col() == Square::SIDE - 1 {
                board.push('\n');
            }
        }

        write!(f, "{board}")
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:0>16x}", self.0)
    }
}

/// An iterator over all set squares in a [`Bitboard`].
///
/// See [`Bitboard::iter`].
pub struct BitboardIter {
    bitboard: Bitboard,
}

impl Iterator for BitboardIter {
    type Item = Square;
    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.bitboard.pop_lsb()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let size = self.bitboard.population() as usize;
        (size, Some(size))
    }
}

impl ExactSizeIterator for BitboardIter {
    #[inline(always)]
    fn len(&self) -> usize {
        self.bitboard.population() as usize
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: self }
    }
}

impl IntoIterator for &Bitboard {
    type Item = Square;
    type IntoIter = BitboardIter;
    #[inline(always)]
    fn into_iter(self) -> Self::IntoIter {
        BitboardIter { bitboard: *self }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bitboard_to_string() {
        let board: Bitboard = [Square::A8, Square::H1, Square::E4].into_iter().collect();
        let expected = "X . . . . . . . \n\
                        . . . . . . . . \n\
                        . . . . . . . . \n\
                        . . . . . . . . \n\
                        . . . . X . . . \n\
                        . . . . . . . . \n\
                        . . . . . . . . \n\
                        . . . . . . . X \n";
        assert_eq!(board.to_string(), expected);
    }

    #[test]
    fn test_bitboard_set_and_clear() {
        let mut board = Bitboard::EMPTY_BOARD;
        board.set(Square::C3);
        board.set(Square::C3);
        board.set(Square::F6);
        assert_eq!(board.population(), 2);

        board.clear(Square::C3);
        assert!(!board.contains(Square::C3));
        assert!(board.contains(Square::F6));
        assert_eq!(!Bitboard::EMPTY_BOARD, Bitboard::FULL_BOARD);
    }

    #[test]
    fn test_bitboard_iter_is_in_index_order() {
        let board = Bitboard::from(Square::G1) | Square::B8 | Square::D5;
        let squares = board.iter().collect::<Vec<_>>();
        assert_eq!(squares, vec![Square::B8, Square::D5, Square::G1]);
        assert_eq!(board.iter().len(), 3);
    }
}
