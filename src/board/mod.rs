/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Sets of squares, stored as 64-bit masks.
mod bitboard;

/// Per-piece move and attack generation, without regard for check.
mod movegen;

/// Perft node counting over the legal move tree.
mod perft;

/// Colors, piece kinds, and pieces.
mod piece;

/// Check detection, the legal move filter, and game results.
mod rules;

/// Board squares and their notations.
mod square;

/// The board itself, its setup formats, and move execution.
mod state;

pub use bitboard::*;
pub use movegen::*;
pub use perft::*;
pub use piece::*;
pub use rules::*;
pub use square::*;
pub use state::*;
