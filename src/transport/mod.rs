//! Line-oriented byte-stream transports.

use std::time::Duration;

use crate::board::{Board, BoardStyle};
use crate::common::TransportError;
use crate::protocol::encode_board;

/// A bidirectional connection exchanging newline-terminated text lines.
#[async_trait::async_trait]
pub trait LineTransport: Send {
    /// Send one message. The newline is appended here and the line is
    /// written in a single call.
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError>;

    /// Wait up to `deadline` for the next complete line. Trailing whitespace
    /// is stripped.
    async fn recv_line(&mut self, deadline: Duration) -> Result<String, TransportError>;

    /// Close the connection. The peer's pending reads observe end of stream.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Send a board snapshot as three row lines.
    async fn send_board(&mut self, board: &Board, style: BoardStyle) -> Result<(), TransportError> {
        for row in encode_board(board, style) {
            self.send_line(&row).await?;
        }
        Ok(())
    }
}

/// Reject messages that would break line framing.
pub(crate) fn check_framing(line: &str) -> Result<(), TransportError> {
    if line.contains('\n') {
        return Err(TransportError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "message contains a newline",
        )));
    }
    Ok(())
}

pub mod tcp;
pub mod in_memory;
