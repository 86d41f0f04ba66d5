//! Verifier configuration from environment variables and CLI flags

use std::env;

use crate::error::VerifierError;

#[derive(Clone, Debug)]
pub struct VerifierConfig {
    /// Path to the PGN file holding the recorded game
    pub pgn_path: String,

    /// Path to the engine binary under test
    pub engine_path: String,

    /// Name the engine under test appears under in the PGN tags
    pub engine_name: String,

    /// UCI Threads option
    pub threads: u32,

    /// UCI Hash option in MB
    pub hash_mb: u32,

    /// Movetime for the final unchecked query, in milliseconds
    pub finish_movetime_ms: u64,
}

impl VerifierConfig {
    /// Load configuration: environment variables (with defaults), then CLI
    /// flag overrides.
    pub fn load() -> Result<Self, VerifierError> {
        let mut config = Self::from_env();
        let args: Vec<String> = env::args().skip(1).collect();
        config.apply_args(&args)?;
        Ok(config)
    }

    fn from_env() -> Self {
        let pgn_path = env::var("PGN_PATH").unwrap_or_else(|_| "game.pgn".to_string());

        let engine_path =
            env::var("ENGINE_PATH").unwrap_or_else(|_| "./imm-cee-tee-ess".to_string());

        let engine_name =
            env::var("ENGINE_NAME").unwrap_or_else(|_| "imm-cee-tee-ess-dev".to_string());

        let threads = env::var("ENGINE_THREADS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);

        let hash_mb = env::var("ENGINE_HASH_MB")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(32);

        let finish_movetime_ms = env::var("FINISH_MOVETIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1000);

        Self {
            pgn_path,
            engine_path,
            engine_name,
            threads,
            hash_mb,
            finish_movetime_ms,
        }
    }

    /// Apply `--pgn/--engine/--name/--threads/--hash` overrides.
    /// Unrecognized arguments are ignored.
    fn apply_args(&mut self, args: &[String]) -> Result<(), VerifierError> {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--pgn" => {
                    self.pgn_path = take_value(args, i, "--pgn expects a path")?;
                    i += 2;
                }
                "--engine" => {
                    self.engine_path = take_value(args, i, "--engine expects a path")?;
                    i += 2;
                }
                "--name" => {
                    self.engine_name = take_value(args, i, "--name expects a player name")?;
                    i += 2;
                }
                "--threads" => {
                    self.threads = take_value(args, i, "--threads expects an integer")?
                        .parse()
                        .map_err(|_| VerifierError::Config("--threads expects an integer"))?;
                    i += 2;
                }
                "--hash" => {
                    self.hash_mb = take_value(args, i, "--hash expects an integer (MB)")?
                        .parse()
                        .map_err(|_| VerifierError::Config("--hash expects an integer (MB)"))?;
                    i += 2;
                }
                _ => i += 1,
            }
        }
        Ok(())
    }
}

fn take_value(args: &[String], i: usize, missing: &'static str) -> Result<String, VerifierError> {
    args.get(i + 1)
        .cloned()
        .ok_or(VerifierError::Config(missing))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> VerifierConfig {
        VerifierConfig {
            pgn_path: "game.pgn".to_string(),
            engine_path: "./imm-cee-tee-ess".to_string(),
            engine_name: "imm-cee-tee-ess-dev".to_string(),
            threads: 1,
            hash_mb: 32,
            finish_movetime_ms: 1000,
        }
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cli_flags_override_defaults() {
        let mut config = base();
        config
            .apply_args(&args(&[
                "--pgn", "other.pgn", "--engine", "./engine", "--name", "dev", "--threads", "4",
                "--hash", "128",
            ]))
            .unwrap();

        assert_eq!(config.pgn_path, "other.pgn");
        assert_eq!(config.engine_path, "./engine");
        assert_eq!(config.engine_name, "dev");
        assert_eq!(config.threads, 4);
        assert_eq!(config.hash_mb, 128);
    }

    #[test]
    fn unknown_arguments_are_ignored() {
        let mut config = base();
        config.apply_args(&args(&["--verbose", "--pgn", "x.pgn"])).unwrap();
        assert_eq!(config.pgn_path, "x.pgn");
    }

    #[test]
    fn missing_flag_value_is_an_error() {
        let mut config = base();
        assert!(matches!(
            config.apply_args(&args(&["--pgn"])),
            Err(VerifierError::Config(_))
        ));
    }

    #[test]
    fn non_numeric_threads_is_an_error() {
        let mut config = base();
        assert!(matches!(
            config.apply_args(&args(&["--threads", "many"])),
            Err(VerifierError::Config(_))
        ));
    }
}
