/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fs;

use anyhow::{Context, Result};
use clap::{error::ErrorKind, Parser};
use mailbox::{side_to_move_of, Board, Cli, Color, Session};

/// Builds the opening board and side to move from the command-line flags.
fn setup(cli: &Cli) -> Result<(Board, Color)> {
    let (board, mut side) = if let Some(fen) = &cli.fen {
        (Board::from_fen(fen)?, side_to_move_of(fen)?)
    } else if let Some(path) = &cli.layout {
        let codes = fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file {}", path.display()))?;
        let board = Board::from_codes(codes.split_ascii_whitespace())
            .with_context(|| format!("Invalid layout in {}", path.display()))?;
        (board, Color::White)
    } else {
        (Board::default(), Color::White)
    };

    if cli.black {
        side = Color::Black;
    }

    Ok((board, side))
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,

        // Edge case: `--help` and `--version` are both "error" cases according to Clap
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            println!("{e}");
            return;
        }

        Err(e) => e.exit(),
    };

    let result = setup(&cli).and_then(|(board, side)| Session::new(board, side).run());

    if let Err(e) = result {
        eprintln!("{} encountered an error: {e:#}", env!("CARGO_PKG_NAME"));
        std::process::exit(1);
    }
}
