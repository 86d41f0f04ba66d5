//! UCI engine wrapper for the engine under test (async I/O)

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::debug;

use crate::error::VerifierError;

/// Limit for a single search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    /// Stop after exactly this many nodes.
    Nodes(u64),
    /// Stop after this much wall-clock time; the engine enforces the bound.
    MoveTime(Duration),
}

/// Options applied once at startup.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// UCI `Threads`
    pub threads: u32,
    /// UCI `Hash`, in MB
    pub hash_mb: u32,
}

/// Something that can propose a best move for a position.
/// Implemented by [`UciEngine`]; tests substitute a scripted mock.
#[allow(async_fn_in_trait)]
pub trait MoveProvider {
    async fn best_move(
        &mut self,
        fen: &str,
        limit: SearchLimit,
    ) -> Result<String, VerifierError>;
}

/// Handle to the engine subprocess.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl UciEngine {
    /// Spawn the engine, run the UCI handshake, and apply the fixed options.
    pub async fn spawn(path: &str, options: &EngineOptions) -> Result<Self, VerifierError> {
        let mut process = Command::new(path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::null())
            .spawn()
            .map_err(|e| VerifierError::Engine(format!("failed to spawn engine {path:?}: {e}")))?;

        let stdin = process.stdin.take().unwrap();
        let stdout = BufReader::new(process.stdout.take().unwrap());

        let mut engine = Self {
            process,
            stdin,
            stdout,
        };

        engine.send("uci").await?;
        engine.wait_for("uciok").await?;

        engine
            .send(&format!("setoption name Threads value {}", options.threads))
            .await?;
        engine
            .send(&format!("setoption name Hash value {}", options.hash_mb))
            .await?;
        engine.send("isready").await?;
        engine.wait_for("readyok").await?;

        Ok(engine)
    }

    /// Send a command to the engine
    async fn send(&mut self, cmd: &str) -> Result<(), VerifierError> {
        debug!(cmd, "uci <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| VerifierError::Engine(format!("failed to write to engine: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| VerifierError::Engine(format!("failed to flush stdin: {e}")))?;
        Ok(())
    }

    /// Read a line from the engine; EOF means the process died on us.
    async fn read_line(&mut self, line: &mut String) -> Result<(), VerifierError> {
        line.clear();
        let n = self
            .stdout
            .read_line(line)
            .await
            .map_err(|e| VerifierError::Engine(format!("failed to read from engine: {e}")))?;
        if n == 0 {
            return Err(VerifierError::Engine(
                "engine closed its stdout before answering".to_string(),
            ));
        }
        Ok(())
    }

    /// Wait for a specific response line
    async fn wait_for(&mut self, expected: &str) -> Result<(), VerifierError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();
            debug!(line = trimmed, "uci >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Send quit and wait for the process to exit.
    pub async fn quit(&mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.wait().await;
    }
}

impl MoveProvider for UciEngine {
    /// Search the given position under the given limit and return the
    /// engine's `bestmove` token.
    async fn best_move(
        &mut self,
        fen: &str,
        limit: SearchLimit,
    ) -> Result<String, VerifierError> {
        self.send(&format!("position fen {fen}")).await?;
        match limit {
            SearchLimit::Nodes(nodes) => self.send(&format!("go nodes {nodes}")).await?,
            SearchLimit::MoveTime(time) => {
                self.send(&format!("go movetime {}", time.as_millis())).await?
            }
        }

        let mut line = String::new();
        loop {
            self.read_line(&mut line).await?;
            let trimmed = line.trim();
            debug!(line = trimmed, "uci >");

            if trimmed.starts_with("bestmove") {
                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                return match parts.get(1) {
                    Some(token) => Ok(token.to_string()),
                    None => Err(VerifierError::Engine(format!(
                        "malformed bestmove line: {trimmed:?}"
                    ))),
                };
            }
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        // Best-effort synchronous kill in drop
        let _ = self.process.start_kill();
    }
}
