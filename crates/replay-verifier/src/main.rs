//! Node-budget replay verifier
//!
//! Replays a recorded PGN against the engine under test: every ply the engine
//! played in the recorded game is re-searched with the node budget taken from
//! that move's comment, and the run aborts at the first disagreement. Used to
//! check search determinism under a fixed node budget.

use std::time::Duration;

use tracing::info;

use replay_core::game::GameRecord;
use replay_verifier::config::VerifierConfig;
use replay_verifier::engine::{EngineOptions, MoveProvider, SearchLimit, UciEngine};
use replay_verifier::replay::replay_game;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Load .env file for local runs
    let _ = dotenvy::dotenv();

    let config = VerifierConfig::load()?;
    info!(
        pgn = %config.pgn_path,
        engine = %config.engine_path,
        name = %config.engine_name,
        "Verifier config loaded"
    );

    let game = GameRecord::from_path(&config.pgn_path)?;
    let tested = game.color_of(&config.engine_name)?;
    info!(
        plies = game.moves.len(),
        color = ?tested,
        "Game loaded; {} plays {:?}",
        config.engine_name,
        tested
    );

    let mut engine = UciEngine::spawn(
        &config.engine_path,
        &EngineOptions {
            threads: config.threads,
            hash_mb: config.hash_mb,
        },
    )
    .await?;

    match replay_game(&mut engine, &game, tested).await {
        Ok(summary) => {
            info!(
                plies = summary.plies,
                checked = summary.checked,
                "Replay complete, no disagreements"
            );

            // One last unchecked query past the end of the recorded game,
            // just to watch what the engine would play next.
            let finish = SearchLimit::MoveTime(Duration::from_millis(config.finish_movetime_ms));
            let reply = engine.best_move(&summary.final_fen, finish).await;
            engine.quit().await;

            println!("bestmove after the recorded game: {}", reply?);
            Ok(())
        }
        Err(e) => {
            engine.quit().await;
            Err(e.into())
        }
    }
}
