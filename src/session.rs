/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    io,
    sync::mpsc::{channel, Receiver, Sender},
    thread,
};

use anyhow::{bail, Context, Result};

use crate::{
    perft, splitperft, Board, Color, GameStatus, Piece, RelayMessage, SessionCommand, Square,
};

/// A two-player game of chess, played one command at a time.
#[derive(Debug)]
pub struct Session {
    /// The current state of the chess board.
    ///
    /// This is modified whenever moves are played or new positions are loaded.
    board: Board,

    /// The color whose turn it is.
    side_to_move: Color,

    /// One half of a channel, responsible for sending commands to the session to execute.
    sender: Sender<SessionCommand>,

    /// One half of a channel, responsible for receiving commands for the session to execute.
    receiver: Receiver<SessionCommand>,
}

impl Session {
    /// Constructs a new [`Session`] on `board`, with `side_to_move` playing first.
    pub fn new(board: Board, side_to_move: Color) -> Self {
        let (sender, receiver) = channel();

        Self {
            board,
            side_to_move,
            sender,
            receiver,
        }
    }

    /// The current board.
    #[inline(always)]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The color whose turn it is.
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Sends a [`SessionCommand`] to the session to be executed.
    pub fn send_command(&self, command: SessionCommand) {
        // Safe unwrap: `send` can only fail if its corresponding receiver doesn't exist,
        //  and the receiver lives exactly as long as this session.
        self.sender.send(command).unwrap();
    }

    /// Execute the main event loop for the session.
    ///
    /// This function spawns a thread to handle input from `stdin` and waits on received commands.
    /// It returns once `exit` is received or the game reaches a terminal [`GameStatus`].
    pub fn run(&mut self) -> Result<()> {
        // Spawn a separate thread for handling user input
        let sender = self.sender.clone();
        thread::spawn(|| {
            if let Err(err) = input_handler(sender) {
                eprintln!("Input handler thread stopping after fatal error: {err}");
            }
        });

        self.display();
        println!("{:#} to move", self.side_to_move);

        // Loop on user input
        while let Ok(cmd) = self.receiver.recv() {
            if matches!(cmd, SessionCommand::Exit) {
                break;
            }

            // Keep running, even on error
            match self.execute(cmd) {
                Ok(Some(status)) if status.is_terminal() => {
                    println!("Game over: {status}");
                    break;
                }

                Ok(_) => {}

                Err(e) => eprintln!("Error: {e}"),
            }
        }

        Ok(())
    }

    /// Executes a single [`SessionCommand`].
    ///
    /// Commands that change the board report the resulting [`GameStatus`] for the new side to move.
    pub fn execute(&mut self, cmd: SessionCommand) -> Result<Option<GameStatus>> {
        match cmd {
            SessionCommand::Codes => {
                for row in self.board.to_codes().chunks(Square::SIDE as usize) {
                    println!("{}", row.join(" "));
                }
            }

            SessionCommand::Display => self.display(),

            SessionCommand::Exit => {}

            SessionCommand::Fen => println!("{}", self.board.to_fen()),

            SessionCommand::Flip => {
                self.side_to_move = self.side_to_move.opponent();
                println!("{:#} to move", self.side_to_move);
            }

            SessionCommand::Load { setup } => {
                self.load(&setup.join(" "))?;
                self.display();
                return Ok(Some(self.report_status()));
            }

            SessionCommand::Move { from, to } => {
                let status = self.play(from, to)?;
                self.display();
                return Ok(Some(self.announce(status)));
            }

            SessionCommand::Moves { square } => self.print_moves(square),

            SessionCommand::New => {
                self.board = Board::default();
                self.side_to_move = Color::White;
                self.display();
            }

            SessionCommand::Perft { depth } => {
                println!("{}", perft(&self.board, self.side_to_move, depth));
            }

            SessionCommand::Place { piece, square } => self.place(piece, square),

            SessionCommand::Relay { payload } => {
                if let Some(status) = self.relay(&payload.join(" "))? {
                    self.display();
                    return Ok(Some(self.announce(status)));
                }
            }

            SessionCommand::Splitperft { depth } => {
                let nodes = splitperft(&self.board, self.side_to_move, depth);
                println!("\n{nodes}");
            }

            SessionCommand::Status => return Ok(Some(self.report_status())),

            SessionCommand::Take { square } => match self.board.take(square) {
                Some(piece) => println!("Removed {} from {square}", piece.name()),
                None => println!("{square} is already empty"),
            },

            SessionCommand::Threats { color } => {
                let color = color.unwrap_or(self.side_to_move);
                println!("{}", self.board.threatened_squares(color));
            }
        };

        Ok(None)
    }

    /// Plays `from` -> `to` for the side to move, then hands the turn over.
    ///
    /// Fails without touching the board if there is no piece of the side to move on `from`,
    /// or if `to` is not one of its legal moves.
    /// On success, yields the [`GameStatus`] for the player who is now on move.
    pub fn play(&mut self, from: Square, to: Square) -> Result<GameStatus> {
        let Some(piece) = self.board.piece_at(from) else {
            bail!("There is no piece on {from}");
        };

        if piece.color() != self.side_to_move {
            bail!(
                "The {} on {from} cannot move: it is {:#}'s turn",
                piece.name(),
                self.side_to_move
            );
        }

        if !self.board.legal_moves(from).contains(&to) {
            bail!("Illegal move: the {} on {from} cannot move to {to}", piece.name());
        }

        self.board.move_piece(from, to);
        self.side_to_move = self.side_to_move.opponent();

        Ok(self.board.status(self.side_to_move))
    }

    /// Applies a move received from the relay, as the opponent's move.
    ///
    /// The move is trusted: it is applied without any legality check.
    /// Yields `None` for the relay's greeting, which carries no move.
    pub fn relay(&mut self, payload: &str) -> Result<Option<GameStatus>> {
        let msg = payload
            .parse::<RelayMessage>()
            .context("Dropping malformed relay payload")?;

        match msg {
            RelayMessage::Connected { player_id } => {
                println!("Connected to the relay as player {player_id}");
                Ok(None)
            }

            RelayMessage::Move { from, to } => {
                log::debug!("Relay move {from} -> {to}");
                self.board.move_piece(from, to);
                self.side_to_move = self.side_to_move.opponent();
                Ok(Some(self.board.status(self.side_to_move)))
            }
        }
    }

    /// Replaces the board with `setup`, a FEN string or 64 piece codes.
    ///
    /// A FEN's side-to-move field decides who moves next; codes always hand the move to White.
    pub fn load(&mut self, setup: &str) -> Result<()> {
        let board = setup.parse()?;
        self.side_to_move = side_to_move_of(setup)?;
        self.board = board;
        Ok(())
    }

    /// Executes the `display` command, printing the current board.
    fn display(&self) {
        println!("{}", self.board);
    }

    /// Executes the `place` command, overwriting whatever was on `square`.
    fn place(&mut self, piece: Piece, square: Square) {
        if let Some(old) = self.board.take(square) {
            println!("Replaced {} on {square}", old.name());
        }
        self.board.place(piece, square);
    }

    /// Executes the `moves` command.
    fn print_moves(&mut self, square: Option<Square>) {
        let moves = if let Some(square) = square {
            self.board
                .legal_moves(square)
                .into_iter()
                .map(|to| to.to_string())
                .collect::<Vec<_>>()
        } else {
            self.board
                .all_legal_moves(self.side_to_move)
                .into_iter()
                .map(|(from, to)| format!("{from}{to}"))
                .collect()
        };

        // If there are none, print "(none)"
        if moves.is_empty() {
            println!("(none)");
        } else {
            println!("{}", moves.join(", "));
        }
    }

    /// Computes and prints the status for the side to move.
    fn report_status(&mut self) -> GameStatus {
        let status = self.board.status(self.side_to_move);
        println!("{:#} to move: {status}", self.side_to_move);
        status
    }

    /// Prints the outcome of a move that was just played.
    fn announce(&self, status: GameStatus) -> GameStatus {
        match status {
            GameStatus::Ongoing => println!("{:#} to move", self.side_to_move),
            GameStatus::Indeterminate => {
                println!("{:#} to move (check cannot be determined)", self.side_to_move)
            }
            _ => {}
        }

        if self.board.king_in_check(self.side_to_move) == Some(true) && !status.is_terminal() {
            println!("{:#} is in check", self.side_to_move);
        }

        status
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Board::default(), Color::White)
    }
}

/// Reads the side to move from a FEN's second field. Anything without one gives White the move.
pub fn side_to_move_of(setup: &str) -> Result<Color> {
    if !setup.contains('/') {
        return Ok(Color::White);
    }

    match setup.split_ascii_whitespace().nth(1) {
        Some(field) => field
            .parse()
            .with_context(|| format!("Invalid side to move {field:?} in FEN")),
        None => Ok(Color::White),
    }
}

/// Loops endlessly to await input via `stdin`, sending all successfully-parsed commands through the supplied `sender`.
fn input_handler(sender: Sender<SessionCommand>) -> Result<()> {
    let mut buffer = String::with_capacity(256);

    loop {
        // Clear the buffer, read input, and trim the trailing newline
        buffer.clear();
        let bytes = io::stdin()
            .read_line(&mut buffer)
            .context("Failed to read line when parsing commands")?;

        // For ctrl + d
        if 0 == bytes {
            // Send the Exit command and exit this function
            sender
                .send(SessionCommand::Exit)
                .context("Failed to send 'exit' command after receiving empty input")?;

            bail!("Session received input of 0 bytes and is quitting");
        }

        // Trim any leading/trailing whitespace
        let buf = buffer.trim();

        // Ignore empty lines
        if buf.is_empty() {
            continue;
        }

        match buf.parse::<SessionCommand>() {
            Ok(cmd) => sender
                .send(cmd)
                .context("Failed to send command to session")?,

            // Usage or parse errors go straight back to the user
            Err(err) => eprintln!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_validates_and_flips_turn() {
        let mut session = Session::default();

        // Black can't move first
        assert!(session.play(Square::E7, Square::E5).is_err());
        // Empty square
        assert!(session.play(Square::E4, Square::E5).is_err());
        // Not a legal target
        assert!(session.play(Square::E2, Square::E5).is_err());
        assert_eq!(session.side_to_move(), Color::White);
        assert_eq!(*session.board(), Board::default());

        assert_eq!(session.play(Square::E2, Square::E4).unwrap(), GameStatus::Ongoing);
        assert_eq!(session.side_to_move(), Color::Black);
        assert_eq!(session.board().piece_at(Square::E4), Some(Piece::WHITE_PAWN));
    }

    #[test]
    fn test_fools_mate_ends_the_game() {
        let mut session = Session::default();
        session.play(Square::F2, Square::F3).unwrap();
        session.play(Square::E7, Square::E5).unwrap();
        session.play(Square::G2, Square::G4).unwrap();
        let status = session.play(Square::D8, Square::H4).unwrap();

        assert_eq!(
            status,
            GameStatus::Checkmate {
                winner: Color::Black
            }
        );
        assert!(status.is_terminal());
    }

    #[test]
    fn test_relay_moves_are_unchecked() {
        let mut session = Session::default();
        assert_eq!(session.relay("CONNECTED 1").unwrap(), None);

        // A Knight "teleporting" is still applied
        let status = session.relay("57,27").unwrap();
        assert_eq!(status, Some(GameStatus::Ongoing));
        assert_eq!(session.board().piece_at(Square::D5), Some(Piece::WHITE_KNIGHT));
        assert_eq!(session.side_to_move(), Color::Black);

        assert!(session.relay("57;27").is_err());
        assert!(session.relay("57,99").is_err());
    }

    #[test]
    fn test_load_reads_side_to_move() {
        let mut session = Session::default();
        session.load("4k3/8/8/8/8/8/8/4K2R b K - 0 1").unwrap();
        assert_eq!(session.side_to_move(), Color::Black);
        assert_eq!(session.board().piece_at(Square::H1), Some(Piece::WHITE_ROOK));

        assert!(session.load("not a board").is_err());
        // The failed load left the session untouched
        assert_eq!(session.side_to_move(), Color::Black);
    }

    #[test]
    fn test_execute_status_and_flip() {
        let mut session = Session::default();
        assert_eq!(
            session.execute(SessionCommand::Status).unwrap(),
            Some(GameStatus::Ongoing)
        );

        session.execute(SessionCommand::Flip).unwrap();
        assert_eq!(session.side_to_move(), Color::Black);

        session.execute(SessionCommand::New).unwrap();
        assert_eq!(session.side_to_move(), Color::White);
    }
}
