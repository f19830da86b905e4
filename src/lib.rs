/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// The board, its pieces, move generation, and the rules of the game.
mod board;

/// Command-line arguments and the commands accepted by a running session.
mod cli;

/// Messages exchanged with the two-player relay.
mod protocol;

/// The interactive game loop, including user input handling.
mod session;

/// Misc utility constants.
mod utils;

pub use board::*;
pub use cli::*;
pub use protocol::*;
pub use session::*;
pub use utils::*;
