//! Replay driver: walk the recorded mainline, re-searching tested plies.

use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{Chess, Color, EnPassantMode, Move, Position};
use tracing::debug;

use replay_core::annotation::node_budget;
use replay_core::game::GameRecord;
use replay_core::policy::{is_tested_ply, offset_for};

use crate::engine::{MoveProvider, SearchLimit};
use crate::error::VerifierError;

/// Outcome of a completed replay.
#[derive(Debug, Clone)]
pub struct ReplaySummary {
    /// Total plies applied to the board.
    pub plies: usize,
    /// Tested plies checked against the engine.
    pub checked: usize,
    /// Position after the last recorded move.
    pub final_fen: String,
}

fn fen_of(board: &Chess) -> String {
    Fen::from_position(board, EnPassantMode::Legal).to_string()
}

fn parse_bestmove(board: &Chess, reply: &str) -> Result<Move, VerifierError> {
    let uci: UciMove = reply
        .parse()
        .map_err(|_| VerifierError::Engine(format!("engine returned unparseable move {reply:?}")))?;
    uci.to_move(board).map_err(|_| {
        VerifierError::Engine(format!("engine move {reply:?} is illegal in the current position"))
    })
}

/// Replay the recorded game, re-searching every ply of `tested` under its
/// recorded node budget and applying the opponent's plies verbatim.
///
/// Stops at the first disagreement; the mismatched engine move is never
/// applied to the board.
pub async fn replay_game<E: MoveProvider>(
    engine: &mut E,
    game: &GameRecord,
    tested: Color,
) -> Result<ReplaySummary, VerifierError> {
    let offset = offset_for(tested);
    let mut board = Chess::default();
    let mut checked = 0usize;

    for (ply, recorded) in game.moves.iter().enumerate() {
        if is_tested_ply(ply, offset) {
            let comment =
                recorded
                    .comment
                    .as_deref()
                    .ok_or_else(|| VerifierError::MissingAnnotation {
                        ply,
                        san: recorded.san.clone(),
                    })?;
            let nodes = node_budget(comment).map_err(|source| VerifierError::Annotation {
                ply,
                san: recorded.san.clone(),
                source,
            })?;

            let fen = fen_of(&board);
            let reply = engine.best_move(&fen, SearchLimit::Nodes(nodes)).await?;
            let engine_move = parse_bestmove(&board, &reply)?;

            debug!(ply, nodes, recorded = %recorded.san, engine = %reply, "checked ply");

            if engine_move != recorded.mv {
                return Err(VerifierError::Mismatch {
                    ply,
                    expected: recorded.san.clone(),
                    actual: reply,
                    nodes,
                });
            }

            board.play_unchecked(engine_move);
            checked += 1;
        } else {
            board.play_unchecked(recorded.mv);
        }
    }

    Ok(ReplaySummary {
        plies: game.moves.len(),
        checked,
        final_fen: fen_of(&board),
    })
}
