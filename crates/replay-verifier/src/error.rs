//! Verifier error types

use replay_core::annotation::AnnotationError;
use replay_core::game::GameError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerifierError {
    #[error("configuration error: {0}")]
    Config(&'static str),

    #[error("game load error: {0}")]
    Game(#[from] GameError),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("ply {ply} ({san}) has no annotation to take a node budget from")]
    MissingAnnotation { ply: usize, san: String },

    #[error("bad annotation at ply {ply} ({san}): {source}")]
    Annotation {
        ply: usize,
        san: String,
        #[source]
        source: AnnotationError,
    },

    #[error(
        "move mismatch at ply {ply}: recorded {expected}, engine played {actual} \
         under a budget of {nodes} nodes"
    )]
    Mismatch {
        ply: usize,
        expected: String,
        actual: String,
        nodes: u64,
    },
}
