use std::time::Duration;

use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;
use tictactoe::{
    ClientEvent, GameClient, HeuristicStrategy, InMemoryTransport, RandomStrategy, Session,
    SessionConfig, Strategy,
};

/// Heuristic server against a random client, both in-process.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <server_seed> <client_seed>", args[0]);
        std::process::exit(1);
    }
    let server_seed: u64 = args[1].parse()?;
    let client_seed: u64 = args[2].parse()?;

    let (server_side, client_side) = InMemoryTransport::pair();

    let server = async move {
        let mut session = Session::new(
            server_side,
            Box::new(HeuristicStrategy::new()),
            SmallRng::seed_from_u64(server_seed),
            SessionConfig::default(),
        );
        let report = session.run().await?;
        session.close().await?;
        Ok::<_, anyhow::Error>(report)
    };

    let client = async move {
        let mut rng = SmallRng::seed_from_u64(client_seed);
        let mut player = RandomStrategy::new();
        let mut client = GameClient::new(client_side, Duration::from_secs(5));
        loop {
            match client.next_event().await? {
                ClientEvent::Prompt => {
                    let index = player.choose_move(&mut rng, client.board())?;
                    client.send_move(&index.to_string()).await?;
                }
                ClientEvent::GameOver(verdict) => return Ok::<_, anyhow::Error>(verdict),
                _ => {}
            }
        }
    };

    let (report, verdict) = tokio::try_join!(server, client)?;

    let result = json!({
        "outcome": report.outcome,
        "verdict": verdict,
        "moves": report.moves.len(),
        "board": report.board.to_string(),
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
