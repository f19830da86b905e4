/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// FEN string for the starting position of chess.
pub const FEN_STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Piece codes for the starting position of chess, row-major from Black's back rank.
#[rustfmt::skip]
pub const STARTPOS_CODES: [&str; 64] = [
    "bR", "bN", "bB", "bQ", "bK", "bB", "bN", "bR",
    "bP", "bP", "bP", "bP", "bP", "bP", "bP", "bP",
    "0",  "0",  "0",  "0",  "0",  "0",  "0",  "0",
    "0",  "0",  "0",  "0",  "0",  "0",  "0",  "0",
    "0",  "0",  "0",  "0",  "0",  "0",  "0",  "0",
    "0",  "0",  "0",  "0",  "0",  "0",  "0",  "0",
    "wP", "wP", "wP", "wP", "wP", "wP", "wP", "wP",
    "wR", "wN", "wB", "wQ", "wK", "wB", "wN", "wR",
];
