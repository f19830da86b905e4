/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use mailbox::{perft, side_to_move_of, Board};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let board = Board::from_fen(fen).unwrap();
    let color = side_to_move_of(fen).unwrap();
    let res = perft(&board, color, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
}

/// Positions and depths where no en passant capture or under-promotion can occur,
/// so counts agree with standard chess.
///
/// https://www.chessprogramming.org/Perft_Results
#[cfg(test)]
mod standard_perfts {
    use super::*;

    #[test]
    fn test_startpos_perft_1() {
        test_perft_fen_nodes(1, mailbox::FEN_STARTPOS, 20);
    }

    #[test]
    fn test_startpos_perft_2() {
        test_perft_fen_nodes(2, mailbox::FEN_STARTPOS, 400);
    }

    #[test]
    fn test_startpos_perft_3() {
        test_perft_fen_nodes(3, mailbox::FEN_STARTPOS, 8902);
    }

    #[test]
    fn test_startpos_perft_4() {
        test_perft_fen_nodes(4, mailbox::FEN_STARTPOS, 197281);
    }

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_fen_nodes(
            1,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            48,
        );
    }

    #[test]
    fn test_kiwipete_perft_2() {
        // Standard chess has 2039; one of those is an en passant capture
        test_perft_fen_nodes(
            2,
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            2038,
        );
    }

    #[test]
    fn test_position_3_perft_2() {
        test_perft_fen_nodes(2, "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 191);
    }

    #[test]
    fn test_position_4_perft_1() {
        test_perft_fen_nodes(
            1,
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            6,
        );
    }
}

/// https://www.chessprogramming.net/perfect-perft/
#[cfg(test)]
mod castling_perfts {
    use super::*;

    #[test]
    fn test_short_castling_gives_check() {
        test_perft_fen_nodes(6, "5k2/8/8/8/8/8/8/4K2R w K - 0 1", 661072);
    }

    #[test]
    fn test_long_castling_gives_check() {
        test_perft_fen_nodes(6, "3k4/8/8/8/8/8/8/R3K3 w Q - 0 1", 803711);
    }

    #[test]
    fn test_castling_rights() {
        test_perft_fen_nodes(4, "r3k2r/1b4bq/8/8/8/8/7B/R3K2R w KQkq - 0 1", 1274206);
    }

    #[test]
    fn test_castling_prevented() {
        test_perft_fen_nodes(4, "r3k2r/8/3Q4/8/8/5q2/8/R3K2R b KQkq - 0 1", 1720476);
    }
}
