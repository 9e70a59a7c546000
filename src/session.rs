//! One game over one connection.
//!
//! The server hosts the board and the automated side (`Sign::LOCAL`); the
//! remote player (`Sign::REMOTE`) sends moves as text lines. Turns strictly
//! alternate, so at most one move is ever pending and no locking is needed.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{sleep, Instant};

use crate::{
    board::Board,
    common::{GameOutcome, SessionError, Sign},
    config::SessionConfig,
    player::Strategy,
    protocol::{verdict_line, CONTINUE, INVALID_MOVE, MOVE_ACCEPTED, PROMPT, SERVER_TURN},
    rules::{apply_index, outcome_after, parse_move},
    transport::LineTransport,
};

/// Position of a session in its per-turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Prompt sent (or about to be); waiting for the remote line.
    AwaitingRemoteMove,
    /// A remote move was applied; outcome not yet announced.
    RemoteMoveApplied,
    /// The automated side is to move.
    AwaitingLocalMove,
    /// The automated move was applied; outcome not yet announced.
    LocalMoveApplied,
    /// The game ended with a win or draw.
    Terminal(GameOutcome),
    /// The connection failed or an internal fault stopped the game.
    Aborted,
}

impl SessionState {
    /// `true` once no further steps are possible.
    pub fn is_finished(self) -> bool {
        matches!(self, SessionState::Terminal(_) | SessionState::Aborted)
    }
}

/// High-level notifications for whoever displays or tallies the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MoveAccepted { sign: Sign, index: u8 },
    InvalidMove { text: String },
    TurnChanged(Sign),
    GameOver(GameOutcome),
    Disconnected,
}

/// Summary of a finished session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SessionReport {
    pub outcome: GameOutcome,
    pub board: Board,
    /// Accepted moves in order.
    pub moves: Vec<(Sign, u8)>,
    /// Rejected remote inputs. They consume no turn.
    pub invalid_moves: usize,
}

/// Server side of a single game.
pub struct Session<T: LineTransport> {
    transport: T,
    strategy: Box<dyn Strategy>,
    rng: SmallRng,
    config: SessionConfig,
    board: Board,
    turn: Sign,
    state: SessionState,
    started: bool,
    deadline: Option<Instant>,
    history: Vec<(Sign, u8)>,
    invalid_moves: usize,
    events: Option<UnboundedSender<SessionEvent>>,
}

impl<T: LineTransport> Session<T> {
    pub fn new(
        transport: T,
        strategy: Box<dyn Strategy>,
        rng: SmallRng,
        config: SessionConfig,
    ) -> Self {
        Self {
            transport,
            strategy,
            rng,
            config,
            board: Board::new(),
            turn: Sign::REMOTE,
            state: SessionState::AwaitingRemoteMove,
            started: false,
            deadline: None,
            history: Vec::new(),
            invalid_moves: 0,
            events: None,
        }
    }

    /// Forward [`SessionEvent`]s to `events`.
    pub fn with_events(mut self, events: UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sign whose move is awaited next.
    pub fn turn(&self) -> Sign {
        self.turn
    }

    /// Accepted moves so far.
    pub fn history(&self) -> &[(Sign, u8)] {
        &self.history
    }

    pub fn invalid_moves(&self) -> usize {
        self.invalid_moves
    }

    /// Instant by which the pending remote move must arrive.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Play until a terminal outcome or a fatal error.
    pub async fn run(&mut self) -> Result<SessionReport, SessionError> {
        loop {
            if let SessionState::Terminal(outcome) = self.step().await? {
                return Ok(self.report(outcome));
            }
        }
    }

    /// Advance the state machine by one transition and return the new state.
    ///
    /// The first call sends the initial board snapshot. Any error moves the
    /// session to [`SessionState::Aborted`].
    pub async fn step(&mut self) -> Result<SessionState, SessionError> {
        if self.state.is_finished() {
            return Err(SessionError::Invariant(format!(
                "step called on finished session ({:?})",
                self.state
            )));
        }
        match self.advance().await {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(e) => {
                self.state = SessionState::Aborted;
                self.deadline = None;
                if e.is_disconnect() {
                    warn!("Client disconnected or timed out: {}", e);
                    self.emit(SessionEvent::Disconnected);
                } else {
                    warn!("Session aborted: {}", e);
                }
                Err(e)
            }
        }
    }

    /// Close the underlying connection.
    pub async fn close(&mut self) -> Result<(), SessionError> {
        self.transport.close().await.map_err(SessionError::from)
    }

    /// Give the transport back, e.g. to inspect it in tests.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn report(&self, outcome: GameOutcome) -> SessionReport {
        SessionReport {
            outcome,
            board: self.board,
            moves: self.history.clone(),
            invalid_moves: self.invalid_moves,
        }
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    async fn send_board(&mut self) -> Result<(), SessionError> {
        let style = self.config.board_style;
        self.transport.send_board(&self.board, style).await?;
        Ok(())
    }

    async fn advance(&mut self) -> Result<SessionState, SessionError> {
        if !self.started {
            self.started = true;
            self.send_board().await?;
        }
        match self.state {
            SessionState::AwaitingRemoteMove => self.await_remote_move().await,
            SessionState::RemoteMoveApplied => self.announce_remote_move().await,
            SessionState::AwaitingLocalMove => self.play_local_move().await,
            SessionState::LocalMoveApplied => self.announce_local_move().await,
            SessionState::Terminal(_) | SessionState::Aborted => Err(SessionError::Invariant(
                "session already finished".to_string(),
            )),
        }
    }

    async fn await_remote_move(&mut self) -> Result<SessionState, SessionError> {
        self.transport.send_line(PROMPT).await?;

        let timeout = self.config.move_timeout;
        self.deadline = Some(Instant::now() + timeout);
        let line = self.transport.recv_line(timeout).await?;
        self.deadline = None;

        let accepted = parse_move(&line)
            .filter(|&index| apply_index(&mut self.board, index, Sign::REMOTE));
        let Some(index) = accepted else {
            debug!("Rejected remote move {:?}", line);
            self.invalid_moves += 1;
            self.transport.send_line(INVALID_MOVE).await?;
            self.emit(SessionEvent::InvalidMove { text: line });
            return Ok(SessionState::AwaitingRemoteMove);
        };
        self.record(Sign::REMOTE, index);
        Ok(SessionState::RemoteMoveApplied)
    }

    async fn announce_remote_move(&mut self) -> Result<SessionState, SessionError> {
        let outcome = outcome_after(&self.board, Sign::REMOTE);
        self.transport.send_line(MOVE_ACCEPTED).await?;
        self.send_board().await?;

        if outcome.is_terminal() {
            return self.finish(outcome).await;
        }

        self.transport.send_line(SERVER_TURN).await?;
        self.pass_turn(Sign::LOCAL);
        Ok(SessionState::AwaitingLocalMove)
    }

    async fn play_local_move(&mut self) -> Result<SessionState, SessionError> {
        if !self.config.reply_delay.is_zero() {
            sleep(self.config.reply_delay).await;
        }

        let index = self
            .strategy
            .choose_move(&mut self.rng, &self.board)
            .map_err(SessionError::Strategy)?;
        if !apply_index(&mut self.board, index, Sign::LOCAL) {
            return Err(SessionError::Invariant(format!(
                "{} strategy chose illegal move {}",
                self.strategy.name(),
                index
            )));
        }
        self.record(Sign::LOCAL, index);
        self.send_board().await?;
        Ok(SessionState::LocalMoveApplied)
    }

    async fn announce_local_move(&mut self) -> Result<SessionState, SessionError> {
        let outcome = outcome_after(&self.board, Sign::LOCAL);
        if outcome.is_terminal() {
            return self.finish(outcome).await;
        }
        self.transport.send_line(CONTINUE).await?;
        self.pass_turn(Sign::REMOTE);
        Ok(SessionState::AwaitingRemoteMove)
    }

    async fn finish(&mut self, outcome: GameOutcome) -> Result<SessionState, SessionError> {
        let verdict = verdict_line(outcome).ok_or_else(|| {
            SessionError::Invariant(format!("no verdict for outcome {:?}", outcome))
        })?;
        self.transport.send_line(verdict).await?;
        info!("Game over: {:?}\n{}", outcome, self.board);
        self.emit(SessionEvent::GameOver(outcome));
        Ok(SessionState::Terminal(outcome))
    }

    fn record(&mut self, sign: Sign, index: u8) {
        debug!("{} played {}", sign, index);
        self.history.push((sign, index));
        self.emit(SessionEvent::MoveAccepted { sign, index });
    }

    fn pass_turn(&mut self, sign: Sign) {
        self.turn = sign;
        self.emit(SessionEvent::TurnChanged(sign));
    }
}
