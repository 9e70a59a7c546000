#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use crate::board::BoardStyle;

/// Side length of the board.
pub const BOARD_DIM: usize = 3;
/// Number of cells, also the highest valid move index.
pub const NUM_CELLS: usize = BOARD_DIM * BOARD_DIM;
/// Corner cells tried by the heuristic strategy, in priority order.
pub const CORNERS: [u8; 4] = [1, 3, 7, 9];
/// Centre cell index.
pub const CENTER: u8 = 5;

/// Probability that the heuristic strategy ignores its rules and plays a
/// random available cell.
pub const RANDOM_MOVE_PROBABILITY: f64 = 0.1;

/// Default TCP port used by both server and client.
pub const DEFAULT_PORT: u16 = 65432;
/// Maximum bytes accepted for one protocol line, newline excluded.
pub const MAX_LINE_LEN: usize = 1024;

/// How long the server waits for the remote player's move (60 seconds).
#[cfg(feature = "std")]
pub const MOVE_TIMEOUT: Duration = Duration::from_secs(60);
/// How long the listener waits for a new player before shutting down.
#[cfg(feature = "std")]
pub const ACCEPT_TIMEOUT: Duration = Duration::from_secs(60);
/// Bound on individual writes to the socket.
#[cfg(feature = "std")]
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);
/// How long a client waits for the TCP handshake.
#[cfg(feature = "std")]
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// Per-session tunables.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Deadline for each remote move.
    pub move_timeout: Duration,
    /// How empty cells are rendered in board snapshots.
    pub board_style: BoardStyle,
    /// Pause before the automated side answers.
    pub reply_delay: Duration,
}

#[cfg(feature = "std")]
impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_timeout: MOVE_TIMEOUT,
            board_style: BoardStyle::Blank,
            reply_delay: Duration::ZERO,
        }
    }
}

/// Listener settings, usually filled from the command line.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    /// Shut down when no player connects within this window. `None` waits forever.
    pub accept_timeout: Option<Duration>,
    /// Stop after this many sessions. `None` keeps serving.
    pub max_games: Option<usize>,
    /// Fixed RNG seed for reproducible games.
    pub seed: Option<u64>,
    pub session: SessionConfig,
}

#[cfg(feature = "std")]
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: format!("0.0.0.0:{}", DEFAULT_PORT),
            accept_timeout: Some(ACCEPT_TIMEOUT),
            max_games: None,
            seed: None,
            session: SessionConfig::default(),
        }
    }
}
