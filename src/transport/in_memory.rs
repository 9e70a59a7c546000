use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::common::TransportError;
use crate::transport::{check_framing, LineTransport};

/// Pair of connected in-process transports, used by tests and the simulator.
pub struct InMemoryTransport {
    tx: Option<mpsc::UnboundedSender<String>>,
    rx: mpsc::UnboundedReceiver<String>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx1, rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        (
            Self {
                tx: Some(tx1),
                rx: rx2,
            },
            Self {
                tx: Some(tx2),
                rx: rx1,
            },
        )
    }

    /// Returns `true` once this side has been closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_none()
    }
}

#[async_trait::async_trait]
impl LineTransport for InMemoryTransport {
    async fn send_line(&mut self, line: &str) -> Result<(), TransportError> {
        check_framing(line)?;
        let tx = self.tx.as_ref().ok_or(TransportError::Closed)?;
        tx.send(line.to_string())
            .map_err(|_| TransportError::PeerClosed)
    }

    async fn recv_line(&mut self, deadline: Duration) -> Result<String, TransportError> {
        if self.tx.is_none() {
            return Err(TransportError::Closed);
        }
        match timeout(deadline, self.rx.recv()).await {
            Ok(Some(line)) => Ok(line.trim_end().to_string()),
            Ok(None) => Err(TransportError::PeerClosed),
            Err(_) => Err(TransportError::Timeout(deadline)),
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.tx = None;
        self.rx.close();
        Ok(())
    }
}
