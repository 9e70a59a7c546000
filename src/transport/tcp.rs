use std::net::SocketAddr;
use std::time::Duration;

use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::timeout;

use crate::common::TransportError;
use crate::config::{MAX_LINE_LEN, WRITE_TIMEOUT};
use crate::transport::{check_framing, LineTransport};

/// Line transport over a TCP stream.
pub struct TcpLineTransport {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    peer: Option<SocketAddr>,
    write_timeout: Duration,
    max_line_len: usize,
    closed: bool,
}

impl TcpLineTransport {
    pub fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
            peer,
            write_timeout: WRITE_TIMEOUT,
            max_line_len: MAX_LINE_LEN,
            closed: false,
        }
    }

    /// Connect to a server, giving up after `connect_timeout`.
    pub async fn connect<A: ToSocketAddrs>(
        addr: A,
        connect_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let stream = timeout(connect_timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| TransportError::Timeout(connect_timeout))??;
        Ok(Self::new(stream))
    }

    /// Override the maximum accepted line length.
    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    /// Address of the remote end, if known.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }
}

#[async_trait::async_trait]
impl LineTransport for TcpLineTransport {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        check_framing(line)?;

        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');

        timeout(self.write_timeout, self.writer.write_all(&data))
            .await
            .map_err(|_| TransportError::Timeout(self.write_timeout))??;
        Ok(())
    }

    async fn recv_line(&mut self, deadline: Duration) -> Result<String, TransportError> {
        if self.closed {
            return Err(TransportError::Closed);
        }

        let limit = self.max_line_len as u64 + 1;
        let mut buf = Vec::new();
        let read = async {
            let mut bounded = (&mut self.reader).take(limit);
            bounded.read_until(b'\n', &mut buf).await
        };
        let n = timeout(deadline, read)
            .await
            .map_err(|_| TransportError::Timeout(deadline))??;

        if n == 0 {
            debug!("peer {:?} closed the connection", self.peer);
            return Err(TransportError::PeerClosed);
        }
        if buf.last() != Some(&b'\n') && buf.len() > self.max_line_len {
            return Err(TransportError::LineTooLong(self.max_line_len));
        }

        // Invalid UTF-8 is kept as replacement characters and later rejected
        // as an ordinary invalid move.
        let line = String::from_utf8_lossy(&buf);
        Ok(line.trim_end().to_string())
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.shutdown().await.map_err(TransportError::from_io)
    }
}
