/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Compares legal move generation against the `chessie` crate.
//!
//! Positions carry no castling rights or en passant square, and promotions are compared
//! by their squares only, so both generators are playing by the same rules.

use std::collections::BTreeSet;

use mailbox::{side_to_move_of, Board};

const POSITIONS: &[&str] = &[
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w - - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w - - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w - - 0 1",
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b - - 0 1",
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w - - 0 1",
    "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 b - - 0 1",
    "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w - - 0 1",
    "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 1",
    "8/P1k5/K7/8/8/8/8/8 w - - 0 1",
    "2K2r2/4P3/8/8/8/8/8/3k4 w - - 0 1",
    "8/8/1P2K3/8/2n5/1q6/8/5k2 b - - 0 1",
    "7k/8/8/8/8/1q6/8/K7 w - - 0 1",
];

/// Every legal move in `fen`, as `<from><to>` strings, according to this crate.
fn our_moves(fen: &str) -> BTreeSet<String> {
    let mut board = Board::from_fen(fen).unwrap();
    let color = side_to_move_of(fen).unwrap();

    board
        .all_legal_moves(color)
        .into_iter()
        .map(|(from, to)| format!("{from}{to}"))
        .collect()
}

/// Every legal move in `fen`, as `<from><to>` strings, according to `chessie`.
fn chessie_moves(fen: &str) -> BTreeSet<String> {
    let game = chessie::Game::from_fen(fen).unwrap();

    game.get_legal_moves()
        .into_iter()
        .map(|mv| mv.to_string()[..4].to_string())
        .collect()
}

#[test]
fn test_legal_moves_match_chessie() {
    for fen in POSITIONS {
        let ours = our_moves(fen);
        let theirs = chessie_moves(fen);

        assert_eq!(
            ours,
            theirs,
            "Move generation differs on {fen}\nmissing: {:?}\nextra: {:?}",
            theirs.difference(&ours).collect::<Vec<_>>(),
            ours.difference(&theirs).collect::<Vec<_>>(),
        );
    }
}

#[test]
fn test_stalemate_matches_chessie() {
    let fen = "7k/8/8/8/8/1q6/8/K7 w - - 0 1";
    assert!(our_moves(fen).is_empty());
    assert!(chessie::Game::from_fen(fen)
        .unwrap()
        .get_legal_moves()
        .is_empty());
}
