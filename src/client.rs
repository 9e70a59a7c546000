//! Client side of the line protocol.
//!
//! [`GameClient`] turns the server's lines into [`ClientEvent`]s so that a
//! terminal or graphical front end never parses the protocol itself.

use std::fmt;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use log::debug;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::time::timeout;

use crate::{
    board::Board,
    common::{ClientError, ProtocolError},
    config::BOARD_DIM,
    protocol::{decode_board, ServerMessage, DRAW, SERVER_WINS, YOU_WIN},
    transport::LineTransport,
};

/// Final verdict from the client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Verdict {
    YouWin,
    ServerWins,
    Draw,
}

impl Verdict {
    pub fn as_line(self) -> &'static str {
        match self {
            Verdict::YouWin => YOU_WIN,
            Verdict::ServerWins => SERVER_WINS,
            Verdict::Draw => DRAW,
        }
    }
}

/// Decoded server notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// Board snapshot without a header (the initial board).
    Board(Board),
    /// The server waits for our move.
    Prompt,
    /// Our last move was rejected.
    InvalidMove,
    /// Our last move was applied.
    MoveAccepted(Board),
    /// The server played its reply.
    ServerTurn(Board),
    Continue,
    GameOver(Verdict),
}

/// Running score across games. A draw credits both sides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Scoreboard {
    pub client: u32,
    pub server: u32,
}

impl Scoreboard {
    pub fn record(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::YouWin => self.client += 1,
            Verdict::ServerWins => self.server += 1,
            Verdict::Draw => {
                self.client += 1;
                self.server += 1;
            }
        }
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Client: {}   Server: {}", self.client, self.server)
    }
}

/// Protocol driver for one game, seen from the client.
pub struct GameClient<T: LineTransport> {
    transport: T,
    recv_timeout: Duration,
    board: Board,
    verdict: Option<Verdict>,
}

impl<T: LineTransport> GameClient<T> {
    /// `recv_timeout` bounds every wait for a server line.
    pub fn new(transport: T, recv_timeout: Duration) -> Self {
        Self {
            transport,
            recv_timeout,
            board: Board::new(),
            verdict: None,
        }
    }

    /// Latest board snapshot received.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Verdict, once the game is over.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    async fn recv_message(&mut self) -> Result<ServerMessage, ClientError> {
        let line = self.transport.recv_line(self.recv_timeout).await?;
        debug!("server: {:?}", line);
        Ok(ServerMessage::parse(&line)?)
    }

    /// Read a full board snapshot, given its first row if already received.
    async fn recv_board(&mut self, first: Option<String>) -> Result<Board, ClientError> {
        let mut rows = Vec::with_capacity(BOARD_DIM);
        rows.extend(first);
        while rows.len() < BOARD_DIM {
            match self.recv_message().await? {
                ServerMessage::BoardRow(row) => rows.push(row),
                other => {
                    return Err(ProtocolError::UnexpectedMessage(other.as_line().to_string()).into())
                }
            }
        }
        self.board = decode_board(&rows)?;
        Ok(self.board)
    }

    /// Wait for the next server notification.
    pub async fn next_event(&mut self) -> Result<ClientEvent, ClientError> {
        let event = match self.recv_message().await? {
            ServerMessage::BoardRow(row) => ClientEvent::Board(self.recv_board(Some(row)).await?),
            ServerMessage::Prompt => ClientEvent::Prompt,
            ServerMessage::InvalidMove => ClientEvent::InvalidMove,
            ServerMessage::MoveAccepted => ClientEvent::MoveAccepted(self.recv_board(None).await?),
            ServerMessage::ServerTurn => ClientEvent::ServerTurn(self.recv_board(None).await?),
            ServerMessage::Continue => ClientEvent::Continue,
            ServerMessage::YouWin => self.finish(Verdict::YouWin),
            ServerMessage::ServerWins => self.finish(Verdict::ServerWins),
            ServerMessage::Draw => self.finish(Verdict::Draw),
        };
        Ok(event)
    }

    fn finish(&mut self, verdict: Verdict) -> ClientEvent {
        self.verdict = Some(verdict);
        ClientEvent::GameOver(verdict)
    }

    /// Send raw move text to the server.
    pub async fn send_move(&mut self, text: &str) -> Result<(), ClientError> {
        self.transport.send_line(text.trim()).await?;
        Ok(())
    }

    /// Close the connection.
    pub async fn close(&mut self) -> Result<(), ClientError> {
        self.transport.close().await?;
        Ok(())
    }
}

/// Result of asking the local player for a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveInput {
    Line(String),
    /// The move timer ran out.
    TimedOut,
    /// Local input reached end of file.
    Closed,
}

/// Forward lines from a blocking reader over a channel.
///
/// The read runs on its own thread, so a pending read never keeps the
/// runtime alive once the caller stops listening. The channel closes at end
/// of input or on a read error.
pub fn spawn_line_reader<R>(input: R) -> io::Result<UnboundedReceiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name("line-reader".to_string())
        .spawn(move || {
            for line in input.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Wait for the next move line, giving up after `limit`.
pub async fn read_move(input: &mut UnboundedReceiver<String>, limit: Duration) -> MoveInput {
    match timeout(limit, input.recv()).await {
        Err(_) => MoveInput::TimedOut,
        Ok(None) => MoveInput::Closed,
        Ok(Some(line)) => MoveInput::Line(line.trim().to_string()),
    }
}

fn print_board<W: Write>(out: &mut W, board: &Board) -> io::Result<()> {
    writeln!(out, "{}", board)?;
    writeln!(out)
}

/// Play one game from a terminal.
///
/// Returns `Ok(None)` when the local player ran out of time or closed their
/// input; the connection is closed in that case.
pub async fn play_interactive<T, W>(
    client: &mut GameClient<T>,
    input: &mut UnboundedReceiver<String>,
    out: &mut W,
    move_timeout: Duration,
) -> Result<Option<Verdict>, ClientError>
where
    T: LineTransport,
    W: Write,
{
    loop {
        match client.next_event().await? {
            ClientEvent::Board(board) => {
                writeln!(out, "Initial board:")?;
                print_board(out, &board)?;
            }
            ClientEvent::Prompt => {
                writeln!(out, "Your move (1-9):")?;
                out.flush()?;
                match read_move(input, move_timeout).await {
                    MoveInput::Line(text) => client.send_move(&text).await?,
                    MoveInput::TimedOut => {
                        writeln!(out, "Time is up! You lost this game.")?;
                        client.close().await?;
                        return Ok(None);
                    }
                    MoveInput::Closed => {
                        writeln!(out, "Client closed manually.")?;
                        client.close().await?;
                        return Ok(None);
                    }
                }
            }
            ClientEvent::InvalidMove => writeln!(out, "Invalid move! Try again.")?,
            ClientEvent::MoveAccepted(board) => {
                writeln!(out, "Your move applied:")?;
                print_board(out, &board)?;
            }
            ClientEvent::ServerTurn(board) => {
                writeln!(out, "Server's turn")?;
                print_board(out, &board)?;
            }
            ClientEvent::Continue => {}
            ClientEvent::GameOver(verdict) => {
                writeln!(out, "{}", verdict.as_line())?;
                return Ok(Some(verdict));
            }
        }
    }
}
