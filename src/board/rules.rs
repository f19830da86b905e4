/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ops::Deref};

use super::{attacks, pseudo_moves, Bitboard, Board, Castling, Color, MoveList, Piece, Square};

/// The outcome of a position from the perspective of the side about to move.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum GameStatus {
    /// The side to move has at least one legal move and the game goes on.
    Ongoing,

    /// The side to move is in check with no legal moves.
    Checkmate { winner: Color },

    /// The side to move is not in check but has no legal moves.
    Stalemate,

    /// Neither side has enough material left to deliver checkmate.
    InsufficientMaterial,

    /// The side to move has no King, so check cannot be established.
    ///
    /// Callers must not treat this as the end of the game.
    Indeterminate,
}

impl GameStatus {
    /// Returns `true` if the game is over.
    #[inline(always)]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Checkmate { .. } | Self::Stalemate | Self::InsufficientMaterial
        )
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Checkmate { winner } => write!(f, "checkmate, {winner:#} wins"),
            Self::Stalemate => write!(f, "stalemate, draw"),
            Self::InsufficientMaterial => write!(f, "draw by insufficient material"),
            Self::Indeterminate => write!(f, "indeterminate (no king on the board)"),
        }
    }
}

/// A move that has been played on a [`Board`] for the lifetime of this guard.
///
/// Only the piece relocation is performed: no castling Rook, no promotion, no moved-flags.
/// When the guard is dropped, both squares are restored to exactly what they held before,
/// on every exit path, so a what-if query can never leave the board changed.
pub(crate) struct Simulation<'a> {
    board: &'a mut Board,
    from: Square,
    to: Square,
    moved: Option<Piece>,
    captured: Option<Piece>,
}

impl<'a> Simulation<'a> {
    /// Plays `from` -> `to` on `board` until the returned guard is dropped.
    pub(crate) fn new(board: &'a mut Board, from: Square, to: Square) -> Self {
        let moved = board.squares[from.index()];
        let captured = board.squares[to.index()];

        board.squares[to.index()] = moved;
        board.squares[from.index()] = None;

        Self {
            board,
            from,
            to,
            moved,
            captured,
        }
    }
}

impl Deref for Simulation<'_> {
    type Target = Board;
    #[inline(always)]
    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl Drop for Simulation<'_> {
    fn drop(&mut self) {
        self.board.squares[self.to.index()] = self.captured;
        self.board.squares[self.from.index()] = self.moved;
    }
}

impl Board {
    /// Computes every square attacked by a piece of `color`.
    ///
    /// See [`attacks`] for what counts as an attack.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Color, Square};
    /// let board = Board::default();
    /// let threats = board.threatened_squares(Color::White);
    /// assert!(threats.contains(Square::E3));
    /// assert!(!threats.contains(Square::E4));
    /// ```
    pub fn threatened_squares(&self, color: Color) -> Bitboard {
        self.squares_of(color)
            .fold(Bitboard::EMPTY_BOARD, |threats, square| threats | attacks(self, square))
    }

    /// Returns whether the King of `color` is attacked by the opponent.
    ///
    /// Yields `None` if `color` has no King on the board, since check cannot be established.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Color};
    /// let board = Board::default();
    /// assert_eq!(board.king_in_check(Color::White), Some(false));
    ///
    /// let board = Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    /// assert_eq!(board.king_in_check(Color::Black), None);
    /// ```
    pub fn king_in_check(&self, color: Color) -> Option<bool> {
        let Some(king) = self.king_square(color) else {
            log::warn!("No {} king on the board; check is indeterminate", color.name());
            return None;
        };

        Some(self.threatened_squares(color.opponent()).contains(king))
    }

    /// Returns `true` if moving `from` -> `to` would not leave the mover's King in check.
    ///
    /// The move is played on this board for the duration of the check and then undone,
    /// so the board is identical before and after the call.
    /// If the mover has no King, there is nothing to leave in check and the move is allowed.
    ///
    /// Castling moves are additionally required to start outside of check and to not pass
    /// through an attacked square.
    pub fn leaves_king_safe(&mut self, from: Square, to: Square) -> bool {
        let Some(piece) = self.piece_at(from) else {
            return false;
        };
        let color = piece.color();

        if piece.is_king() {
            if let Some(castling) = Castling::matching(color, from, to) {
                let threats = self.threatened_squares(color.opponent());
                if threats.contains(from) || threats.contains(castling.king_passes) {
                    log::debug!("Castling {from} -> {to} rejected: path is attacked");
                    return false;
                }
            }
        }

        let simulation = Simulation::new(self, from, to);
        let safe = simulation.king_in_check(color) != Some(true);
        if !safe {
            log::debug!("{from} -> {to} rejected: leaves the {} king in check", color.name());
        }

        safe
    }

    /// Generates the legal moves of the piece on `square`: its pseudo-moves that don't leave its own King in check.
    ///
    /// Yields an empty list if `square` is empty.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Square};
    /// let mut board = Board::default();
    /// assert_eq!(board.legal_moves(Square::G1), vec![Square::F3, Square::H3]);
    /// assert!(board.legal_moves(Square::E4).is_empty());
    /// ```
    pub fn legal_moves(&mut self, square: Square) -> MoveList {
        pseudo_moves(self, square)
            .into_iter()
            .filter(|&to| self.leaves_king_safe(square, to))
            .collect()
    }

    /// Same as [`Board::legal_moves`], but on raw square indices.
    ///
    /// An index outside of `[0,64)` yields an empty list.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Board;
    /// let mut board = Board::default();
    /// assert_eq!(board.legal_moves_by_index(52), vec![44, 36]);
    /// assert!(board.legal_moves_by_index(64).is_empty());
    /// ```
    pub fn legal_moves_by_index(&mut self, index: usize) -> Vec<usize> {
        let Ok(square) = Square::from_index(index) else {
            return Vec::new();
        };

        self.legal_moves(square)
            .into_iter()
            .map(|square| square.index())
            .collect()
    }

    /// Collects every legal `(from, to)` pair available to `color`, in square order.
    pub fn all_legal_moves(&mut self, color: Color) -> Vec<(Square, Square)> {
        let squares = self.squares_of(color).collect::<Vec<_>>();
        squares
            .into_iter()
            .flat_map(|from| {
                self.legal_moves(from)
                    .into_iter()
                    .map(move |to| (from, to))
            })
            .collect()
    }

    /// Returns `true` if any piece of `color` has a legal move.
    pub fn has_legal_moves(&mut self, color: Color) -> bool {
        let squares = self.squares_of(color).collect::<Vec<_>>();
        squares
            .into_iter()
            .any(|square| !self.legal_moves(square).is_empty())
    }

    /// Returns `true` if `color` is in check and has no legal moves.
    ///
    /// Yields `None` if `color` has no King.
    pub fn is_checkmate(&mut self, color: Color) -> Option<bool> {
        if !self.king_in_check(color)? {
            return Some(false);
        }

        Some(!self.has_legal_moves(color))
    }

    /// Returns `true` if `color` is not in check but has no legal moves.
    ///
    /// Yields `None` if `color` has no King.
    pub fn is_stalemate(&mut self, color: Color) -> Option<bool> {
        if self.king_in_check(color)? {
            return Some(false);
        }

        Some(!self.has_legal_moves(color))
    }

    /// Returns `true` if there is not enough material left on the board to deliver checkmate.
    ///
    /// Only two cases are recognized:
    /// * every piece on the board is a King,
    /// * exactly two pieces remain: one King and one Knight or Bishop.
    ///
    /// # Example
    /// ```
    /// # use mailbox::Board;
    /// let kk = Board::from_fen("8/4k3/8/8/3K4/8/8/8 w - - 0 1").unwrap();
    /// assert!(kk.is_draw_by_insufficient_material());
    ///
    /// let kb = Board::from_fen("8/8/8/8/3K4/8/5B2/8 w - - 0 1").unwrap();
    /// assert!(kb.is_draw_by_insufficient_material());
    ///
    /// let kbk = Board::from_fen("8/4k3/8/8/3K4/8/5B2/8 w - - 0 1").unwrap();
    /// assert!(!kbk.is_draw_by_insufficient_material());
    ///
    /// let kqk = Board::from_fen("8/4k3/8/8/3K4/8/5Q2/8 w - - 0 1").unwrap();
    /// assert!(!kqk.is_draw_by_insufficient_material());
    /// ```
    pub fn is_draw_by_insufficient_material(&self) -> bool {
        if self.pieces().all(|(_, piece)| piece.is_king()) {
            return true;
        }

        let mut pieces = self.pieces().map(|(_, piece)| piece);
        match (pieces.next(), pieces.next(), pieces.next()) {
            (Some(a), Some(b), None) => {
                (a.is_king() && b.kind().is_minor()) || (b.is_king() && a.kind().is_minor())
            }
            _ => false,
        }
    }

    /// Determines the [`GameStatus`] for `color`, the side about to move.
    ///
    /// Checkmate takes priority over stalemate, which takes priority over insufficient material.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{Board, Color, GameStatus};
    /// let mut board = Board::default();
    /// assert_eq!(board.status(Color::White), GameStatus::Ongoing);
    /// ```
    pub fn status(&mut self, color: Color) -> GameStatus {
        let Some(in_check) = self.king_in_check(color) else {
            return GameStatus::Indeterminate;
        };

        if !self.has_legal_moves(color) {
            return if in_check {
                GameStatus::Checkmate {
                    winner: color.opponent(),
                }
            } else {
                GameStatus::Stalemate
            };
        }

        if self.is_draw_by_insufficient_material() {
            GameStatus::InsufficientMaterial
        } else {
            GameStatus::Ongoing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulation_restores_on_drop() {
        let mut board = Board::default();
        let before = board;

        {
            let simulation = Simulation::new(&mut board, Square::D1, Square::D7);
            assert_eq!(simulation.piece_at(Square::D7), Some(Piece::WHITE_QUEEN));
            assert!(simulation.is_empty(Square::D1));
        }

        assert_eq!(board, before);
    }

    #[test]
    fn test_simulation_restores_on_unwind() {
        let mut board = Board::default();
        let before = board;

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _simulation = Simulation::new(&mut board, Square::E2, Square::E4);
            panic!("evaluation failed mid-simulation");
        }));

        assert!(result.is_err());
        assert_eq!(board, before);
    }

    #[test]
    fn test_threats_stop_at_blockers() {
        let board = Board::default();
        let threats = board.threatened_squares(Color::Black);
        // Every square on rank 6, none on rank 5
        for col in 0..8 {
            assert!(threats.contains(Square::new(2, col).unwrap()));
            assert!(!threats.contains(Square::new(3, col).unwrap()));
        }
    }

    #[test]
    fn test_check_detection() {
        let board = Board::from_fen("4k3/8/8/8/8/8/8/4R1K1 w - - 0 1").unwrap();
        assert_eq!(board.king_in_check(Color::Black), Some(true));
        assert_eq!(board.king_in_check(Color::White), Some(false));
    }

    #[test]
    fn test_pinned_piece_cannot_leave_the_pin() {
        // The Knight on e2 is pinned to its King by the Rook on e8
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        assert!(board.legal_moves(Square::E2).is_empty());
    }

    #[test]
    fn test_must_answer_check() {
        // Only blocking on e2/e-file or moving the King resolves the Rook's check
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/3B4/4K3 w - - 0 1").unwrap();
        assert_eq!(board.legal_moves(Square::D2), vec![Square::E3]);

        let mut king = board.legal_moves(Square::E1);
        king.sort();
        assert_eq!(king, vec![Square::F2, Square::D1, Square::F1]);
    }

    #[test]
    fn test_king_cannot_step_into_attack() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/r7/4K3 w - - 0 1").unwrap();
        let mut king = board.legal_moves(Square::E1);
        king.sort();
        assert_eq!(king, vec![Square::D1, Square::F1]);
    }

    #[test]
    fn test_king_cannot_retreat_along_checking_ray() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        let king = board.legal_moves(Square::E1);
        assert!(!king.contains(&Square::F1));
        assert!(king.contains(&Square::E2));
    }

    #[test]
    fn test_castling_out_of_or_through_check_is_illegal() {
        // In check from the Rook on e8
        let mut board = Board::from_fen("4r1k1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let king = board.legal_moves(Square::E1);
        assert!(!king.contains(&Square::G1));
        assert!(!king.contains(&Square::C1));

        // f1 is attacked, d1 is not
        let mut board = Board::from_fen("5rk1/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        let king = board.legal_moves(Square::E1);
        assert!(!king.contains(&Square::G1));
        assert!(king.contains(&Square::C1));

        // Landing on an attacked square
        let mut board = Board::from_fen("6rk/8/8/8/8/8/8/R3K2R w KQ - 0 1").unwrap();
        assert!(!board.legal_moves(Square::E1).contains(&Square::G1));
    }

    #[test]
    fn test_legal_moves_without_own_king() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R7 w - - 0 1").unwrap();
        assert_eq!(board.legal_moves(Square::A1).len(), 14);
    }

    #[test]
    fn test_missing_king_is_indeterminate() {
        let mut board = Board::from_fen("4k3/8/8/8/8/8/8/R7 w - - 0 1").unwrap();
        assert_eq!(board.king_in_check(Color::White), None);
        assert_eq!(board.is_checkmate(Color::White), None);
        assert_eq!(board.is_stalemate(Color::White), None);
        assert_eq!(board.status(Color::White), GameStatus::Indeterminate);
        assert!(!GameStatus::Indeterminate.is_terminal());
    }

    #[test]
    fn test_insufficient_material_cases() {
        let board = Board::from_fen("8/4k3/8/8/3K4/8/8/8 w - - 0 1").unwrap();
        assert!(board.is_draw_by_insufficient_material());

        // Both Kings plus a Knight is three pieces, so play continues
        let board = Board::from_fen("8/4k3/8/8/3K4/8/2n5/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());

        // Lone Black King and Knight
        let board = Board::from_fen("8/4k3/8/8/8/8/2n5/8 w - - 0 1").unwrap();
        assert!(board.is_draw_by_insufficient_material());

        // Two pieces, but not a King and a minor piece
        let board = Board::from_fen("8/4k3/8/8/8/8/2Q5/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());

        let board = Board::from_fen("8/8/8/8/8/8/2NB4/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());

        // King and Bishop alone
        let board = Board::from_fen("8/8/8/8/3K4/8/2B5/8 w - - 0 1").unwrap();
        assert!(board.is_draw_by_insufficient_material());

        let board = Board::from_fen("8/4k3/8/8/3K4/8/2NN4/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());

        let board = Board::from_fen("8/4k3/8/8/3K4/8/2P5/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());

        let board = Board::from_fen("8/4k3/8/8/3K4/8/2R5/8 w - - 0 1").unwrap();
        assert!(!board.is_draw_by_insufficient_material());
    }

    #[test]
    fn test_status_priority() {
        // Back-rank mate
        let mut board = Board::from_fen("6k1/5ppp/8/8/8/8/8/3R2K1 w - - 0 1").unwrap();
        board.move_piece(Square::D1, Square::D8);
        assert_eq!(
            board.status(Color::Black),
            GameStatus::Checkmate {
                winner: Color::White
            }
        );

        let mut board = Board::from_fen("8/4k3/8/8/3K4/8/8/8 w - - 0 1").unwrap();
        assert_eq!(board.status(Color::White), GameStatus::InsufficientMaterial);
        assert!(board.status(Color::White).is_terminal());
    }
}
