//! Accepts players and runs one session per connection.

use std::future::Future;
use std::net::SocketAddr;

use log::{debug, error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;

use crate::{
    common::{GameOutcome, SessionError, Sign},
    config::ServerConfig,
    player::Strategy,
    session::{Session, SessionEvent, SessionReport},
    transport::tcp::TcpLineTransport,
};

/// Builds a fresh strategy for every session.
pub type StrategyFactory = Box<dyn Fn() -> Box<dyn Strategy> + Send + Sync>;

/// Tally of finished sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ServerStats {
    pub remote_wins: usize,
    pub local_wins: usize,
    pub draws: usize,
    /// Sessions that ended by disconnect, timeout or internal fault.
    pub aborted: usize,
}

impl ServerStats {
    pub fn record(&mut self, result: &Result<SessionReport, SessionError>) {
        match result {
            Ok(report) => match report.outcome {
                GameOutcome::Win(sign) if sign == Sign::REMOTE => self.remote_wins += 1,
                GameOutcome::Win(_) => self.local_wins += 1,
                GameOutcome::Draw => self.draws += 1,
                GameOutcome::InProgress => self.aborted += 1,
            },
            Err(_) => self.aborted += 1,
        }
    }

    /// Total sessions recorded.
    pub fn games(&self) -> usize {
        self.remote_wins + self.local_wins + self.draws + self.aborted
    }
}

/// TCP listener hosting games.
pub struct Listener {
    listener: TcpListener,
    config: ServerConfig,
    strategy_factory: StrategyFactory,
    events: Option<UnboundedSender<SessionEvent>>,
    games_started: u64,
    stats: ServerStats,
}

impl Listener {
    pub async fn bind(
        config: ServerConfig,
        strategy_factory: StrategyFactory,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind(&config.bind).await?;
        info!("Server listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            config,
            strategy_factory,
            events: None,
            games_started: 0,
            stats: ServerStats::default(),
        })
    }

    /// Forward every session's events to `events`.
    pub fn with_events(mut self, events: UnboundedSender<SessionEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn stats(&self) -> ServerStats {
        self.stats
    }

    /// Wait for the next player. Returns `Ok(None)` when the accept timeout
    /// expires first.
    pub async fn accept_one(&self) -> std::io::Result<Option<(TcpLineTransport, SocketAddr)>> {
        info!("Waiting for a player...");
        let accepted = match self.config.accept_timeout {
            Some(limit) => match timeout(limit, self.listener.accept()).await {
                Ok(result) => result?,
                Err(_) => {
                    info!("No client connected for {:?}", limit);
                    return Ok(None);
                }
            },
            None => self.listener.accept().await?,
        };
        let (stream, addr) = accepted;
        info!("Connected to {}", addr);
        Ok(Some((TcpLineTransport::new(stream), addr)))
    }

    /// Build a session around an accepted connection.
    pub fn new_session(&mut self, transport: TcpLineTransport) -> Session<TcpLineTransport> {
        let rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed.wrapping_add(self.games_started)),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        self.games_started += 1;
        let session = Session::new(
            transport,
            (self.strategy_factory)(),
            rng,
            self.config.session.clone(),
        );
        match &self.events {
            Some(events) => session.with_events(events.clone()),
            None => session,
        }
    }

    /// Serve until ctrl-c, the accept timeout or the game limit.
    pub async fn serve(&mut self) -> std::io::Result<ServerStats> {
        self.serve_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serve players one after another until `shutdown` resolves, the accept
    /// timeout expires or the configured number of games has been started.
    ///
    /// A session interrupted by `shutdown` is dropped, which closes its socket.
    pub async fn serve_until<F>(&mut self, shutdown: F) -> std::io::Result<ServerStats>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            if let Some(max) = self.config.max_games {
                if self.games_started as usize >= max {
                    break;
                }
            }

            let accepted = tokio::select! {
                accepted = self.accept_one() => accepted?,
                _ = &mut shutdown => {
                    info!("Server shut down manually.");
                    return Ok(self.stats);
                }
            };
            let Some((transport, addr)) = accepted else {
                info!("Server shutting down.");
                break;
            };

            let session = self.new_session(transport);
            let result = tokio::select! {
                result = play(session, addr) => result,
                _ = &mut shutdown => {
                    info!("Server shut down manually.");
                    return Ok(self.stats);
                }
            };
            self.stats.record(&result);
        }

        info!("Served {} games: {:?}", self.stats.games(), self.stats);
        Ok(self.stats)
    }
}

/// Run a session to completion and close its connection.
pub async fn play(
    mut session: Session<TcpLineTransport>,
    addr: SocketAddr,
) -> Result<SessionReport, SessionError> {
    let result = session.run().await;
    match &result {
        Ok(report) => info!("Game with {} finished: {:?}", addr, report.outcome),
        Err(e) => warn!("Game with {} ended early: {}", addr, e),
    }
    if let Err(e) = session.close().await {
        debug!("Closing connection to {} failed: {}", addr, e);
    }
    result
}
