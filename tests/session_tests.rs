#![cfg(feature = "std")]

use std::collections::VecDeque;
use std::time::Duration;

use rand::{rngs::SmallRng, SeedableRng};
use tictactoe::{
    Board, BoardStyle, GameOutcome, InMemoryTransport, LineTransport, SessionConfig,
    SessionError, SessionEvent, SessionState, Sign, Strategy, TransportError,
};
use tictactoe::session::Session;
use tokio::sync::mpsc;

/// Plays a fixed list of cells, one per turn.
struct Scripted(VecDeque<u8>);

impl Scripted {
    fn new<const N: usize>(moves: [u8; N]) -> Box<Self> {
        Box::new(Scripted(moves.into_iter().collect()))
    }
}

impl Strategy for Scripted {
    fn choose_move(&mut self, _rng: &mut SmallRng, _board: &Board) -> anyhow::Result<u8> {
        self.0.pop_front().ok_or_else(|| anyhow::anyhow!("script exhausted"))
    }
}

fn config() -> SessionConfig {
    SessionConfig {
        move_timeout: Duration::from_secs(2),
        ..SessionConfig::default()
    }
}

fn session(transport: InMemoryTransport, strategy: Box<dyn Strategy>) -> Session<InMemoryTransport> {
    Session::new(transport, strategy, SmallRng::seed_from_u64(42), config())
}

async fn queue(peer: &mut InMemoryTransport, moves: &[&str]) {
    for mv in moves {
        peer.send_line(mv).await.unwrap();
    }
}

/// Everything the server sent so far.
async fn drain(peer: &mut InMemoryTransport) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(line) = peer.recv_line(Duration::from_millis(20)).await {
        lines.push(line);
    }
    lines
}

const EMPTY_ROW: &str = "  |   |";

#[tokio::test]
async fn invalid_text_is_rejected_and_reprompted() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["abc", "5"]).await;
    let mut session = session(server, Scripted::new([1]));

    assert_eq!(session.step().await.unwrap(), SessionState::AwaitingRemoteMove);
    assert_eq!(session.invalid_moves(), 1);
    assert!(session.board().is_empty());
    assert_eq!(session.turn(), Sign::REMOTE);

    assert_eq!(session.step().await.unwrap(), SessionState::RemoteMoveApplied);
    assert_eq!(session.history(), &[(Sign::REMOTE, 5)]);

    assert_eq!(
        drain(&mut client).await,
        vec![
            EMPTY_ROW,
            EMPTY_ROW,
            EMPTY_ROW,
            "Your move (1-9):",
            "Invalid move!",
            "Your move (1-9):",
        ]
    );
}

#[tokio::test]
async fn first_exchange_matches_wire_format() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["5"]).await;
    let mut session = session(server, Scripted::new([1]));

    assert_eq!(session.step().await.unwrap(), SessionState::RemoteMoveApplied);
    assert_eq!(session.step().await.unwrap(), SessionState::AwaitingLocalMove);
    assert_eq!(session.turn(), Sign::LOCAL);
    assert_eq!(session.step().await.unwrap(), SessionState::LocalMoveApplied);
    assert_eq!(session.step().await.unwrap(), SessionState::AwaitingRemoteMove);
    assert_eq!(session.turn(), Sign::REMOTE);

    assert_eq!(
        drain(&mut client).await,
        vec![
            EMPTY_ROW,
            EMPTY_ROW,
            EMPTY_ROW,
            "Your move (1-9):",
            "MOVE_ACCEPTED",
            EMPTY_ROW,
            "  | O |",
            EMPTY_ROW,
            "Server's turn",
            "X |   |",
            "  | O |",
            EMPTY_ROW,
            "CONTINUE",
        ]
    );
}

#[tokio::test]
async fn remote_completes_diagonal() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["5", "1", "9"]).await;
    let mut session = session(server, Scripted::new([2, 3]));

    let report = session.run().await.unwrap();
    assert_eq!(report.outcome, GameOutcome::Win(Sign::REMOTE));
    assert_eq!(
        report.moves,
        vec![
            (Sign::REMOTE, 5),
            (Sign::LOCAL, 2),
            (Sign::REMOTE, 1),
            (Sign::LOCAL, 3),
            (Sign::REMOTE, 9),
        ]
    );
    assert_eq!(session.state(), SessionState::Terminal(GameOutcome::Win(Sign::REMOTE)));

    let lines = drain(&mut client).await;
    assert_eq!(lines.iter().filter(|l| *l == "Your move (1-9):").count(), 3);
    assert_eq!(lines.iter().filter(|l| *l == "CONTINUE").count(), 2);
    assert_eq!(
        &lines[lines.len() - 5..],
        &["MOVE_ACCEPTED", "O | X | X", "  | O |", "  |   | O", "You win!"]
    );
}

#[tokio::test]
async fn local_completes_top_row() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["4", "5", "9"]).await;
    let mut session = session(server, Scripted::new([1, 2, 3]));

    let report = session.run().await.unwrap();
    assert_eq!(report.outcome, GameOutcome::Win(Sign::LOCAL));
    assert_eq!(report.moves.len(), 6);

    let lines = drain(&mut client).await;
    assert_eq!(
        &lines[lines.len() - 5..],
        &["Server's turn", "X | X | X", "O | O |", "  |   | O", "Server wins!"]
    );
}

#[tokio::test]
async fn full_board_is_a_draw() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["1", "3", "4", "8", "9"]).await;
    let mut session = session(server, Scripted::new([2, 5, 7, 6]));

    let report = session.run().await.unwrap();
    assert_eq!(report.outcome, GameOutcome::Draw);
    assert!(report.board.is_full());

    let lines = drain(&mut client).await;
    assert_eq!(
        &lines[lines.len() - 5..],
        &["MOVE_ACCEPTED", "O | X | O", "O | X | X", "X | O | O", "Draw!"]
    );
}

#[tokio::test]
async fn invalid_moves_consume_no_turn() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["5", "5", "0", "abc", "1", "9"]).await;
    let mut session = session(server, Scripted::new([2, 3]));

    let report = session.run().await.unwrap();
    assert_eq!(report.outcome, GameOutcome::Win(Sign::REMOTE));
    assert_eq!(report.invalid_moves, 3);
    assert_eq!(report.moves.len(), 5);
    let lines = drain(&mut client).await;
    assert_eq!(lines.iter().filter(|l| *l == "Invalid move!").count(), 3);
}

#[tokio::test]
async fn events_follow_the_turn_order() {
    let (server, mut client) = InMemoryTransport::pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    queue(&mut client, &["x", "5", "1", "9"]).await;
    let mut session = session(server, Scripted::new([2, 3])).with_events(tx);
    session.run().await.unwrap();
    drop(session);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(
        events,
        vec![
            SessionEvent::InvalidMove { text: "x".to_string() },
            SessionEvent::MoveAccepted { sign: Sign::REMOTE, index: 5 },
            SessionEvent::TurnChanged(Sign::LOCAL),
            SessionEvent::MoveAccepted { sign: Sign::LOCAL, index: 2 },
            SessionEvent::TurnChanged(Sign::REMOTE),
            SessionEvent::MoveAccepted { sign: Sign::REMOTE, index: 1 },
            SessionEvent::TurnChanged(Sign::LOCAL),
            SessionEvent::MoveAccepted { sign: Sign::LOCAL, index: 3 },
            SessionEvent::TurnChanged(Sign::REMOTE),
            SessionEvent::MoveAccepted { sign: Sign::REMOTE, index: 9 },
            SessionEvent::GameOver(GameOutcome::Win(Sign::REMOTE)),
        ]
    );
}

#[tokio::test]
async fn numbered_style_sends_hints() {
    let (server, mut client) = InMemoryTransport::pair();
    let config = SessionConfig {
        board_style: BoardStyle::Numbered,
        ..config()
    };
    queue(&mut client, &["5"]).await;
    let mut session = Session::new(server, Scripted::new([1]), SmallRng::seed_from_u64(1), config);
    session.step().await.unwrap();

    let lines = drain(&mut client).await;
    assert_eq!(&lines[..3], &["1 | 2 | 3", "4 | 5 | 6", "7 | 8 | 9"]);
}

#[tokio::test]
async fn remote_disconnect_aborts_session() {
    let (server, mut client) = InMemoryTransport::pair();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = session(server, Scripted::new([])).with_events(tx);

    let handle = tokio::spawn(async move {
        let result = session.run().await;
        (session, result)
    });

    loop {
        let line = client.recv_line(Duration::from_secs(1)).await.unwrap();
        if line == "Your move (1-9):" {
            break;
        }
    }
    client.close().await.unwrap();

    let (mut session, result) = handle.await.unwrap();
    let err = result.unwrap_err();
    assert!(matches!(err, SessionError::Transport(TransportError::PeerClosed)));
    assert!(err.is_disconnect());
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(rx.recv().await, Some(SessionEvent::Disconnected));

    // A finished session refuses to go on.
    assert!(matches!(session.step().await, Err(SessionError::Invariant(_))));
    assert_eq!(session.state(), SessionState::Aborted);
}

#[tokio::test]
async fn silent_remote_times_out() {
    let (server, mut client) = InMemoryTransport::pair();
    let config = SessionConfig {
        move_timeout: Duration::from_millis(50),
        ..config()
    };
    let mut session = Session::new(server, Scripted::new([]), SmallRng::seed_from_u64(1), config);

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::Transport(TransportError::Timeout(_))));
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(session.pending_deadline(), None);
    assert!(session.board().is_empty());

    // Nothing follows the prompt.
    let lines = drain(&mut client).await;
    assert_eq!(lines.last().map(String::as_str), Some("Your move (1-9):"));
}

#[tokio::test]
async fn illegal_strategy_move_is_an_invariant_violation() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["5"]).await;
    let mut session = session(server, Scripted::new([5]));

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::Invariant(_)));
    assert!(!err.is_disconnect());
    assert_eq!(session.state(), SessionState::Aborted);
    assert_eq!(session.history(), &[(Sign::REMOTE, 5)]);
}

#[tokio::test]
async fn strategy_failure_aborts() {
    let (server, mut client) = InMemoryTransport::pair();
    queue(&mut client, &["5"]).await;
    let mut session = session(server, Scripted::new([]));

    let err = session.run().await.unwrap_err();
    assert!(matches!(err, SessionError::Strategy(_)));
    assert_eq!(session.state(), SessionState::Aborted);
}
