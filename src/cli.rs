/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{path::PathBuf, str::FromStr};

use clap::Parser;

use crate::{Color, Piece, Square};

/// Play a game of chess between two players at the terminal.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Start from this FEN instead of the standard opening.
    ///
    /// Only the piece placement, side to move, and castling fields are read.
    #[arg(long, conflicts_with = "layout")]
    pub fen: Option<String>,

    /// Start from a file of 64 whitespace-separated piece codes (`wP`, `bK`, `0`, ...).
    #[arg(long, value_name = "FILE")]
    pub layout: Option<PathBuf>,

    /// Black moves first.
    #[arg(long)]
    pub black: bool,
}

/// A command to be sent to the game session.
#[derive(Debug, Clone, Parser)]
#[command(multicall = true, about, rename_all = "lower")]
pub enum SessionCommand {
    /// Print the layout of the codes of every square, row-major from a8.
    Codes,

    /// Print a visual representation of the current board.
    #[command(alias = "d")]
    Display,

    /// Quit the session.
    #[command(aliases = ["quit", "q"])]
    Exit,

    /// Generate and print the piece placement of the current board as a FEN string.
    Fen,

    /// Flips the side-to-move.
    Flip,

    /// Replace the board with a FEN string or 64 piece codes.
    Load {
        #[arg(required = true)]
        setup: Vec<String>,
    },

    /// Move the piece on `from` to `to` for the side to move, if that move is legal.
    #[command(alias = "m")]
    Move { from: Square, to: Square },

    /// Shows the legal moves of the piece on a square, or of every piece of the side to move.
    Moves { square: Option<Square> },

    /// Reset the board to the standard opening, with White to move.
    New,

    /// Performs a perft on the current board at the supplied depth, printing total node count.
    Perft { depth: usize },

    /// Place a piece on the provided square.
    Place { piece: Piece, square: Square },

    /// Apply a move received from the relay (`<from>,<to>` as indices), without any legality check.
    Relay {
        #[arg(required = true)]
        payload: Vec<String>,
    },

    /// Performs a split perft on the current board at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft { depth: usize },

    /// Print the state of the game for the side to move.
    Status,

    /// Remove the piece at the provided square.
    Take { square: Square },

    /// Display every square attacked by a color (the side to move, by default).
    Threats { color: Option<Color> },
}

impl FromStr for SessionCommand {
    type Err = clap::Error;
    /// Attempt to parse a [`SessionCommand`] from a string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse_from(s.split_ascii_whitespace())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cmd = "move e2 e4".parse::<SessionCommand>().unwrap();
        assert!(matches!(
            cmd,
            SessionCommand::Move {
                from: Square::E2,
                to: Square::E4
            }
        ));

        let cmd = "m 52 36".parse::<SessionCommand>().unwrap();
        assert!(matches!(
            cmd,
            SessionCommand::Move {
                from: Square::E2,
                to: Square::E4
            }
        ));

        let cmd = "place wN d4".parse::<SessionCommand>().unwrap();
        assert!(matches!(
            cmd,
            SessionCommand::Place {
                piece: Piece::WHITE_KNIGHT,
                square: Square::D4
            }
        ));

        let cmd = "relay CONNECTED 2".parse::<SessionCommand>().unwrap();
        assert!(matches!(cmd, SessionCommand::Relay { payload } if payload.len() == 2));

        assert!(matches!("q".parse::<SessionCommand>(), Ok(SessionCommand::Exit)));
        assert!(matches!(
            "moves".parse::<SessionCommand>(),
            Ok(SessionCommand::Moves { square: None })
        ));
    }

    #[test]
    fn test_reject_bad_input() {
        assert!("move e2".parse::<SessionCommand>().is_err());
        assert!("move e9 e4".parse::<SessionCommand>().is_err());
        assert!("place wX d4".parse::<SessionCommand>().is_err());
        assert!("castle".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["mailbox", "--black", "--fen", "8/8/8/8/8/8/8/K6k"]).unwrap();
        assert!(cli.black);
        assert_eq!(cli.fen.as_deref(), Some("8/8/8/8/8/8/8/K6k"));

        assert!(Cli::try_parse_from(["mailbox", "--fen", "x", "--layout", "y"]).is_err());
    }
}
