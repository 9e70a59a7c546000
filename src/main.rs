#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use log::debug;
#[cfg(feature = "std")]
use tictactoe::{
    client::{play_interactive, spawn_line_reader}, init_logging, BoardStyle, GameClient, HeuristicStrategy, Listener,
    ManualStrategy, Scoreboard, ServerConfig, SessionConfig, Strategy, StrategyFactory,
    TcpLineTransport, CONNECT_TIMEOUT, DEFAULT_PORT, RANDOM_MOVE_PROBABILITY,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Debug)]
#[cfg(feature = "std")]
enum StrategyType {
    /// Rule cascade with a small random component.
    Heuristic,
    /// Someone at the server terminal types the replies.
    Manual,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Host games and wait for players to connect.
    Serve {
        #[arg(long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
        bind: String,
        #[arg(long, value_enum, default_value_t = StrategyType::Heuristic)]
        strategy: StrategyType,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = RANDOM_MOVE_PROBABILITY, help = "Chance the heuristic plays a random cell")]
        randomness: f64,
        #[arg(long, default_value_t = 60, help = "Seconds to wait for each remote move")]
        move_timeout: u64,
        #[arg(long, default_value_t = 60, help = "Seconds to wait for a new player (0 = forever)")]
        accept_timeout: u64,
        #[arg(long, help = "Stop after this many games")]
        games: Option<usize>,
        #[arg(long, help = "Show cell numbers on empty cells")]
        numbered: bool,
        #[arg(long, default_value_t = 0, help = "Milliseconds to pause before the server replies")]
        reply_delay: u64,
    },
    /// Connect to a server and play from this terminal.
    Connect {
        #[arg(long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
        connect: String,
        #[arg(long, default_value_t = 60, help = "Seconds you have for each move")]
        move_timeout: u64,
        #[arg(long, default_value_t = 1, help = "Number of games to play in a row")]
        games: u32,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            strategy,
            seed,
            randomness,
            move_timeout,
            accept_timeout,
            games,
            numbered,
            reply_delay,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (games will be reproducible)", s);
            }
            let config = ServerConfig {
                bind,
                accept_timeout: (accept_timeout > 0).then(|| Duration::from_secs(accept_timeout)),
                max_games: games,
                seed,
                session: SessionConfig {
                    move_timeout: Duration::from_secs(move_timeout),
                    board_style: if numbered {
                        BoardStyle::Numbered
                    } else {
                        BoardStyle::Blank
                    },
                    reply_delay: Duration::from_millis(reply_delay),
                },
            };
            let factory: StrategyFactory = match strategy {
                StrategyType::Heuristic => Box::new(move || -> Box<dyn Strategy> {
                    Box::new(HeuristicStrategy::with_random_move_probability(randomness))
                }),
                StrategyType::Manual => {
                    Box::new(|| -> Box<dyn Strategy> { Box::new(ManualStrategy::stdin()) })
                }
            };

            let mut listener = Listener::bind(config, factory).await?;
            println!("Server started on {}. Waiting for players...", listener.local_addr()?);
            let stats = listener.serve().await?;
            println!(
                "Games: {}  Client wins: {}  Server wins: {}  Draws: {}  Aborted: {}",
                stats.games(),
                stats.remote_wins,
                stats.local_wins,
                stats.draws,
                stats.aborted
            );
        }
        Commands::Connect {
            connect,
            move_timeout,
            games,
        } => {
            // A dedicated thread reads the terminal so that a timed-out move
            // does not leave the process waiting for ENTER.
            let mut input = spawn_line_reader(std::io::BufReader::new(std::io::stdin()))?;
            let mut stdout = std::io::stdout();
            let mut score = Scoreboard::default();

            for _ in 0..games {
                let transport = match TcpLineTransport::connect(&connect, CONNECT_TIMEOUT).await {
                    Ok(t) => t,
                    Err(e) => {
                        eprintln!("Could not connect to server. Make sure the server is running. ({})", e);
                        std::process::exit(1);
                    }
                };
                println!("Connected to server");

                // The server may be waiting on a person typing its reply, so
                // allow more than one move's worth of time per line.
                let mut client = GameClient::new(transport, Duration::from_secs(move_timeout.saturating_mul(5)));
                match play_interactive(&mut client, &mut input, &mut stdout, Duration::from_secs(move_timeout)).await {
                    Ok(Some(verdict)) => {
                        score.record(verdict);
                        println!("{}", score);
                        if let Err(e) = client.close().await {
                            debug!("Closing connection to {} failed: {}", connect, e);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        eprintln!("\nServer disconnected. Game ended. ({})", e);
                        std::process::exit(1);
                    }
                }
            }
        }
    }
    Ok(())
}
