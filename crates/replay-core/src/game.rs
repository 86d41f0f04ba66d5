//! PGN game loading — mainline moves with their comments.

use std::fs::File;
use std::io::{BufReader, Read};
use std::ops::ControlFlow;

use pgn_reader::{RawComment, RawTag, Reader, SanPlus, Skip, Visitor};
use shakmaty::{Chess, Color, Move, Position};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("failed to read PGN: {0}")]
    Io(#[from] std::io::Error),

    #[error("no game found in PGN input")]
    NoGame,

    #[error("missing required PGN tag: {0}")]
    MissingTag(&'static str),

    #[error("illegal or ambiguous SAN at ply {ply}: {san}")]
    IllegalSan { ply: usize, san: String },

    #[error("player {0:?} is neither White nor Black in this game")]
    PlayerNotInGame(String),
}

/// One mainline move as recorded in the PGN.
#[derive(Debug, Clone)]
pub struct RecordedMove {
    /// The move, already validated against the position it was played from.
    pub mv: Move,
    /// SAN text, for diagnostics.
    pub san: String,
    /// Color that played the move.
    pub color: Color,
    /// Raw comment attached to the move, if any.
    pub comment: Option<String>,
}

/// The first game of a PGN file: player identities plus the mainline.
/// Loaded once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub white: String,
    pub black: String,
    pub moves: Vec<RecordedMove>,
}

impl GameRecord {
    pub fn from_path(path: &str) -> Result<Self, GameError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(read: R) -> Result<Self, GameError> {
        let mut loader = GameLoader::default();
        let mut reader = Reader::new(read);

        if reader.read_game(&mut loader)?.is_none() {
            return Err(GameError::NoGame);
        }
        if let Some(err) = loader.error {
            return Err(err);
        }

        Ok(Self {
            white: loader.white.ok_or(GameError::MissingTag("White"))?,
            black: loader.black.ok_or(GameError::MissingTag("Black"))?,
            moves: loader.moves,
        })
    }

    /// Which color the named identity played in this game.
    pub fn color_of(&self, name: &str) -> Result<Color, GameError> {
        if self.white == name {
            Ok(Color::White)
        } else if self.black == name {
            Ok(Color::Black)
        } else {
            Err(GameError::PlayerNotInGame(name.to_string()))
        }
    }
}

/// Tags collected during header parsing.
#[derive(Default)]
struct GameTags {
    white: Option<String>,
    black: Option<String>,
}

/// State during movetext parsing.
struct LoadState {
    board: Chess,
    ply: usize,
}

/// Visitor that collects the mainline of the first game.
#[derive(Default)]
struct GameLoader {
    white: Option<String>,
    black: Option<String>,
    moves: Vec<RecordedMove>,
    error: Option<GameError>,
}

impl Visitor for GameLoader {
    type Tags = GameTags;
    type Movetext = LoadState;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), GameTags> {
        ControlFlow::Continue(GameTags::default())
    }

    fn tag(&mut self, tags: &mut GameTags, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        match name {
            b"White" => tags.white = Some(value.decode_utf8_lossy().into_owned()),
            b"Black" => tags.black = Some(value.decode_utf8_lossy().into_owned()),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameTags) -> ControlFlow<(), LoadState> {
        self.white = tags.white;
        self.black = tags.black;

        ControlFlow::Continue(LoadState {
            board: Chess::default(),
            ply: 0,
        })
    }

    fn san(&mut self, state: &mut LoadState, san_plus: SanPlus) -> ControlFlow<()> {
        match san_plus.san.to_move(&state.board) {
            Ok(mv) => {
                self.moves.push(RecordedMove {
                    mv: mv.clone(),
                    san: san_plus.to_string(),
                    color: state.board.turn(),
                    comment: None,
                });
                state.board.play_unchecked(mv);
                state.ply += 1;
                ControlFlow::Continue(())
            }
            Err(_) => {
                self.error = Some(GameError::IllegalSan {
                    ply: state.ply,
                    san: san_plus.to_string(),
                });
                ControlFlow::Break(())
            }
        }
    }

    fn comment(&mut self, _state: &mut LoadState, comment: RawComment<'_>) -> ControlFlow<()> {
        let text = String::from_utf8_lossy(comment.as_bytes()).trim().to_string();
        if text.is_empty() {
            return ControlFlow::Continue(());
        }

        // A PGN comment annotates the move before it; a comment before the
        // first move has no move to attach to and is dropped.
        if let Some(last) = self.moves.last_mut() {
            match &mut last.comment {
                Some(existing) => {
                    existing.push(' ');
                    existing.push_str(&text);
                }
                None => last.comment = Some(text),
            }
        }
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _state: &mut LoadState) -> ControlFlow<(), Skip> {
        // Mainline only
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, _state: LoadState) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[White "alpha"]
[Black "beta"]

1. e4 {info depth 12 nodes 4500,} e5 {a reply} 2. Nf3 *"#;

    #[test]
    fn loads_mainline_with_comments() {
        let game = GameRecord::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(game.white, "alpha");
        assert_eq!(game.black, "beta");
        assert_eq!(game.moves.len(), 3);

        let sans: Vec<&str> = game.moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5", "Nf3"]);

        assert_eq!(game.moves[0].color, Color::White);
        assert_eq!(game.moves[1].color, Color::Black);
        assert_eq!(game.moves[2].color, Color::White);

        assert_eq!(
            game.moves[0].comment.as_deref(),
            Some("info depth 12 nodes 4500,")
        );
        assert_eq!(game.moves[1].comment.as_deref(), Some("a reply"));
        assert_eq!(game.moves[2].comment, None);
    }

    #[test]
    fn variations_are_skipped() {
        let pgn = r#"[White "alpha"]
[Black "beta"]

1. e4 (1. d4 d5) e5 *"#;

        let game = GameRecord::from_reader(pgn.as_bytes()).unwrap();
        let sans: Vec<&str> = game.moves.iter().map(|m| m.san.as_str()).collect();
        assert_eq!(sans, vec!["e4", "e5"]);
    }

    #[test]
    fn color_of_resolves_both_sides() {
        let game = GameRecord::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(game.color_of("alpha").unwrap(), Color::White);
        assert_eq!(game.color_of("beta").unwrap(), Color::Black);
        assert!(matches!(
            game.color_of("gamma"),
            Err(GameError::PlayerNotInGame(_))
        ));
    }

    #[test]
    fn missing_identity_tags_are_fatal() {
        let err = GameRecord::from_reader("1. e4 e5 *".as_bytes()).unwrap_err();
        assert!(matches!(err, GameError::MissingTag("White")));
    }

    #[test]
    fn empty_input_is_no_game() {
        let err = GameRecord::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, GameError::NoGame));
    }

    #[test]
    fn illegal_san_names_the_ply() {
        let pgn = r#"[White "alpha"]
[Black "beta"]

1. e4 e4 *"#;

        let err = GameRecord::from_reader(pgn.as_bytes()).unwrap_err();
        match err {
            GameError::IllegalSan { ply, san } => {
                assert_eq!(ply, 1);
                assert_eq!(san, "e4");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
