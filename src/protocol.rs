/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr, time::Duration};

use anyhow::{anyhow, bail, Context, Result};

use crate::Square;

/// TCP port the relay server listens on for the two players.
pub const GAME_PORT: u16 = 5001;

/// UDP port the host announces itself on for discovery.
pub const BROADCAST_PORT: u16 = 5002;

/// Datagram payload a host broadcasts to advertise a game.
pub const DISCOVERY_TOKEN: &str = "CHESS_HOST";

/// How long a client listens for [`DISCOVERY_TOKEN`] before giving up.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// A message exchanged between a player and the two-player relay.
///
/// The relay forwards every payload verbatim to the other player, so the only messages are
/// the greeting it sends on connection and the moves the players send each other.
/// Any payload that fails to parse is grounds for dropping the peer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum RelayMessage {
    /// `CONNECTED <id>`: the relay assigned this connection a player number.
    Connected { player_id: u32 },

    /// `<from>,<to>`: the opponent moved the piece on `from` to `to`, as square indices.
    Move { from: Square, to: Square },
}

impl RelayMessage {
    /// Returns the move carried by this message, if any.
    pub const fn as_move(&self) -> Option<(Square, Square)> {
        match *self {
            Self::Move { from, to } => Some((from, to)),
            Self::Connected { .. } => None,
        }
    }
}

/// Parses a single square index from the relay's move payload.
fn parse_index(index: &str) -> Result<Square> {
    let index = index
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid square index {index:?} in relay move"))?;

    Square::from_index(index)
}

impl FromStr for RelayMessage {
    type Err = anyhow::Error;

    /// Parses a relay payload.
    ///
    /// # Example
    /// ```
    /// # use mailbox::{RelayMessage, Square};
    /// let msg: RelayMessage = "52,36".parse().unwrap();
    /// assert_eq!(msg, RelayMessage::Move { from: Square::E2, to: Square::E4 });
    ///
    /// let msg: RelayMessage = "CONNECTED 2".parse().unwrap();
    /// assert_eq!(msg, RelayMessage::Connected { player_id: 2 });
    ///
    /// assert!("52,64".parse::<RelayMessage>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if let Some(id) = s.strip_prefix("CONNECTED") {
            let player_id = id
                .trim()
                .parse()
                .with_context(|| format!("Invalid player id in relay greeting {s:?}"))?;

            return Ok(Self::Connected { player_id });
        }

        let (from, to) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Relay payload {s:?} is neither a greeting nor a move"))?;

        if to.contains(',') {
            bail!("Relay move {s:?} must contain exactly two square indices");
        }

        Ok(Self::Move {
            from: parse_index(from)?,
            to: parse_index(to)?,
        })
    }
}

impl fmt::Display for RelayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { player_id } => write!(f, "CONNECTED {player_id}"),
            Self::Move { from, to } => write!(f, "{},{}", from.index(), to.index()),
        }
    }
}
