/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Board, Color};

/// Perform a perft at the specified depth, counting the positions reachable by `color` moving first.
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// # Example
/// ```
/// # use mailbox::{perft, Board, Color};
/// let board = Board::default();
/// assert_eq!(perft(&board, Color::White, 2), 400);
/// ```
pub fn perft(board: &Board, color: Color, depth: usize) -> u64 {
    perft_generic::<false>(board, color, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each root move.
pub fn splitperft(board: &Board, color: Color, depth: usize) -> u64 {
    perft_generic::<true>(board, color, depth)
}

/// Generic version of `perft`. If `SPLIT` is set to `true`, root moves and their node counts are printed.
fn perft_generic<const SPLIT: bool>(board: &Board, color: Color, depth: usize) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let mut board = *board;
    let moves = board.all_legal_moves(color);

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, (from, to)| {
        let mut child = board;
        child.move_piece(from, to);
        let new_nodes = perft_generic::<false>(&child, color.opponent(), depth - 1);

        if SPLIT {
            println!("{from}{to}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_shallow() {
        let board = Board::default();
        assert_eq!(perft(&board, Color::White, 0), 1);
        assert_eq!(perft(&board, Color::White, 1), 20);
        assert_eq!(perft(&board, Color::White, 2), 400);
        assert_eq!(perft(&board, Color::White, 3), 8902);
    }

    #[test]
    fn test_splitperft_matches_perft() {
        let board = Board::default();
        assert_eq!(splitperft(&board, Color::White, 2), 400);
    }

    #[test]
    fn test_castling_is_counted() {
        // Both Kings can castle both ways; 26 moves for White
        let board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        assert_eq!(perft(&board, Color::White, 1), 26);
    }
}
