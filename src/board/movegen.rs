/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Bitboard, Board, CastleSide, Castling, Color, Piece, PieceKind, Square};

/// A list of destination squares for a single piece, in generation order.
pub type MoveList = Vec<Square>;

/// `(row, col)` steps a Knight can take.
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// `(row, col)` steps a King can take.
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Ray directions for Rooks (and Queens).
const ORTHOGONALS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Ray directions for Bishops (and Queens).
const DIAGONALS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The ray directions a sliding piece of `kind` moves along. Empty for non-sliders.
#[inline(always)]
const fn ray_directions(kind: PieceKind) -> &'static [(i8, i8)] {
    match kind {
        PieceKind::Bishop => &DIAGONALS,
        PieceKind::Rook => &ORTHOGONALS,
        PieceKind::Queen => &[
            (-1, 0),
            (1, 0),
            (0, -1),
            (0, 1),
            (-1, -1),
            (-1, 1),
            (1, -1),
            (1, 1),
        ],
        PieceKind::Pawn | PieceKind::Knight | PieceKind::King => &[],
    }
}

/// Returns `true` if `piece` may move onto `target`: it is empty, or holds an enemy that isn't a King.
///
/// Kings are never captured; the game ends by checkmate or stalemate instead.
#[inline(always)]
fn can_land_on(board: &Board, piece: Piece, target: Square) -> bool {
    match board.piece_at(target) {
        None => true,
        Some(occupant) => is_capturable(piece, occupant),
    }
}

/// Returns `true` if `occupant` is an enemy of `piece` that isn't a King.
#[inline(always)]
fn is_capturable(piece: Piece, occupant: Piece) -> bool {
    occupant.color() != piece.color() && !occupant.is_king()
}

/// Generates the pseudo-moves of the piece on `square`: every destination its movement pattern
/// allows, without regard for whether its own King would be left in check.
///
/// Yields an empty list if `square` is empty.
///
/// # Example
/// ```
/// # use mailbox::{pseudo_moves, Board, Square};
/// let board = Board::default();
/// assert_eq!(pseudo_moves(&board, Square::B1), vec![Square::A3, Square::C3]);
/// ```
pub fn pseudo_moves(board: &Board, square: Square) -> MoveList {
    let Some(piece) = board.piece_at(square) else {
        return MoveList::new();
    };

    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, piece, square),
        PieceKind::Knight => step_moves(board, piece, square, &KNIGHT_OFFSETS),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            slider_moves(board, piece, square, ray_directions(piece.kind()))
        }
        PieceKind::King => {
            let mut moves = step_moves(board, piece, square, &KING_OFFSETS);
            moves.extend(castling_targets(board, piece.color(), square));
            moves
        }
    }
}

/// Pushes one square forward (two from the starting rank), and captures diagonally forward.
fn pawn_moves(board: &Board, piece: Piece, square: Square) -> MoveList {
    let mut moves = MoveList::with_capacity(4);
    let color = piece.color();
    let forward = color.forward();

    if let Some(one) = square.offset(forward, 0).filter(|&sq| board.is_empty(sq)) {
        moves.push(one);

        if square.row() == color.pawn_rank() {
            if let Some(two) = square.offset(2 * forward, 0).filter(|&sq| board.is_empty(sq)) {
                moves.push(two);
            }
        }
    }

    for side in [-1, 1] {
        let Some(target) = square.offset(forward, side) else {
            continue;
        };

        if board
            .piece_at(target)
            .is_some_and(|occupant| is_capturable(piece, occupant))
        {
            moves.push(target);
        }
    }

    moves
}

/// Single-step moves to fixed offsets (Knights and Kings).
fn step_moves(board: &Board, piece: Piece, square: Square, offsets: &[(i8, i8)]) -> MoveList {
    offsets
        .iter()
        .filter_map(|&(rows, cols)| square.offset(rows, cols))
        .filter(|&target| can_land_on(board, piece, target))
        .collect()
}

/// Ray-cast moves for sliding pieces. Each ray stops at the first occupied square,
/// which is included only if it can be captured.
fn slider_moves(
    board: &Board,
    piece: Piece,
    square: Square,
    directions: &[(i8, i8)],
) -> MoveList {
    let mut moves = MoveList::with_capacity(27);

    for &(rows, cols) in directions {
        let mut current = square;
        while let Some(target) = current.offset(rows, cols) {
            match board.piece_at(target) {
                None => moves.push(target),
                Some(occupant) => {
                    if is_capturable(piece, occupant) {
                        moves.push(target);
                    }
                    break;
                }
            }
            current = target;
        }
    }

    moves
}

/// Castling destinations for the King of `color` standing on `square`.
///
/// Only occupancy and moved-flags are checked here; safety of the King's path is a legality concern.
fn castling_targets(
    board: &Board,
    color: Color,
    square: Square,
) -> impl Iterator<Item = Square> + '_ {
    let rook = Piece::new(color, PieceKind::Rook);
    let eligible = !board.king_moved(color);

    CastleSide::all().into_iter().filter_map(move |side| {
        let castling = Castling::of(color, side);

        (eligible
            && square == castling.king_from
            && !board.rook_moved(color, side)
            && board.piece_at(castling.rook_from) == Some(rook)
            && castling.between.iter().all(|&sq| board.is_empty(sq)))
        .then_some(castling.king_to)
    })
}

/// Computes the squares attacked by the piece on `square`: those it could capture on.
///
/// Differences from [`pseudo_moves`]:
/// * Pawns attack their forward diagonals whether or not anything stands there, and never attack by pushing.
/// * Kings attack only their neighbours; castling is not an attack.
/// * Occupants don't matter: a ray still stops at the first occupied square, but that square counts as attacked
///   even when it holds a friendly piece or a King.
///
/// # Example
/// ```
/// # use mailbox::{attacks, Board, Square};
/// let board = Board::default();
/// let attacked = attacks(&board, Square::E2);
/// assert!(attacked.contains(Square::D3));
/// assert!(attacked.contains(Square::F3));
/// assert!(!attacked.contains(Square::E3));
/// ```
pub fn attacks(board: &Board, square: Square) -> Bitboard {
    let Some(piece) = board.piece_at(square) else {
        return Bitboard::EMPTY_BOARD;
    };

    match piece.kind() {
        PieceKind::Pawn => [-1, 1]
            .into_iter()
            .filter_map(|side| square.offset(piece.color().forward(), side))
            .collect(),

        PieceKind::Knight => offset_attacks(square, &KNIGHT_OFFSETS),

        PieceKind::King => offset_attacks(square, &KING_OFFSETS),

        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            let mut attacked = Bitboard::EMPTY_BOARD;
            for &(rows, cols) in ray_directions(piece.kind()) {
                let mut current = square;
                while let Some(target) = current.offset(rows, cols) {
                    attacked.set(target);
                    if !board.is_empty(target) {
                        break;
                    }
                    current = target;
                }
            }
            attacked
        }
    }
}

/// All on-board squares at the given offsets from `square`.
#[inline(always)]
fn offset_attacks(square: Square, offsets: &[(i8, i8)]) -> Bitboard {
    offsets
        .iter()
        .filter_map(|&(rows, cols)| square.offset(rows, cols))
        .collect()
}
