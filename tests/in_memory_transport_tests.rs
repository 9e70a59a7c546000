#![cfg(feature = "std")]

use std::time::Duration;

use tictactoe::{InMemoryTransport, LineTransport, TransportError};

const WAIT: Duration = Duration::from_millis(200);

#[tokio::test]
async fn lines_flow_both_ways_in_order() {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send_line("one").await.unwrap();
    a.send_line("two  ").await.unwrap();
    b.send_line("back").await.unwrap();

    assert_eq!(b.recv_line(WAIT).await.unwrap(), "one");
    assert_eq!(b.recv_line(WAIT).await.unwrap(), "two");
    assert_eq!(a.recv_line(WAIT).await.unwrap(), "back");
}

#[tokio::test]
async fn recv_times_out_when_idle() {
    let (mut a, _b) = InMemoryTransport::pair();
    assert!(matches!(
        a.recv_line(Duration::from_millis(20)).await,
        Err(TransportError::Timeout(_))
    ));
}

#[tokio::test]
async fn close_is_seen_by_the_peer() {
    let (mut a, mut b) = InMemoryTransport::pair();
    a.send_line("last").await.unwrap();
    a.close().await.unwrap();
    assert!(a.is_closed());

    // Queued lines are still delivered before end of stream.
    assert_eq!(b.recv_line(WAIT).await.unwrap(), "last");
    assert!(matches!(b.recv_line(WAIT).await, Err(TransportError::PeerClosed)));
    assert!(matches!(b.send_line("x").await, Err(TransportError::PeerClosed)));
    assert!(matches!(a.send_line("x").await, Err(TransportError::Closed)));
    assert!(matches!(a.recv_line(WAIT).await, Err(TransportError::Closed)));
}

#[tokio::test]
async fn dropped_peer_is_a_disconnect() {
    let (mut a, b) = InMemoryTransport::pair();
    drop(b);
    let err = a.recv_line(WAIT).await.unwrap_err();
    assert!(err.is_disconnect());
}
