//! Boundary to the out-of-process scorer.
//!
//! Each call launches the configured program, writes the scoring profile as JSON to its
//! stdin, and expects `{"schemes": [{"name", "score", "category"?}]}` on stdout. On unix
//! the child leads its own process group. The group is killed once the child exits and
//! whenever the call is abandoned (timeout or the caller dropping the future), so helpers
//! the scorer forked cannot hold its pipes open or outlive the call.

use std::io::ErrorKind;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use super::domain::{ScoredScheme, ScoringProfile};
use crate::config::ScorerConfig;

const STDERR_LOG_LIMIT: usize = 2_048;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("scorer did not respond within {0:?}")]
    Timeout(Duration),
    #[error("scorer unavailable: {0}")]
    Unavailable(String),
    #[error("scorer returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Source of ranked scheme scores for a profile.
#[async_trait]
pub trait ScorerGateway: Send + Sync {
    async fn call(
        &self,
        profile: &ScoringProfile,
        timeout: Duration,
    ) -> Result<Vec<ScoredScheme>, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct ScorerResponse {
    schemes: Vec<ScoredScheme>,
}

/// Spawn-per-call scorer process.
#[derive(Debug, Clone)]
pub struct ProcessScorer {
    program: String,
    args: Vec<String>,
}

impl ProcessScorer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_config(config: &ScorerConfig) -> Self {
        Self::new(config.program.clone(), config.args.clone())
    }

    async fn exchange(&self, payload: &[u8]) -> Result<Vec<ScoredScheme>, GatewayError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|err| {
            GatewayError::Unavailable(format!("failed to start '{}': {err}", self.program))
        })?;
        let mut group = ProcessGroup::led_by(&child);
        debug!(program = %self.program, pid = ?child.id(), "scorer process started");

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(payload).await {
                Ok(()) => {}
                // A scorer that exits without reading its input is judged by its exit status.
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {}
                Err(err) => {
                    return Err(GatewayError::Unavailable(format!(
                        "failed to send profile to scorer: {err}"
                    )))
                }
            }
        }

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();
        let (status, stdout, stderr) = tokio::join!(
            reap(&mut child, &mut group),
            drain(stdout_pipe),
            drain(stderr_pipe)
        );
        let collect_failed = |err: std::io::Error| {
            GatewayError::Unavailable(format!("failed to collect scorer output: {err}"))
        };
        let status = status.map_err(collect_failed)?;
        let stdout = stdout.map_err(collect_failed)?;
        let stderr = stderr.map_err(collect_failed)?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            let stderr = truncate(stderr.trim(), STDERR_LOG_LIMIT);
            warn!(%status, %stderr, "scorer exited unsuccessfully");
            return Err(GatewayError::InvalidResponse(format!(
                "scorer exited with {status}"
            )));
        }

        parse_response(&stdout)
    }
}

/// Waits for the scorer itself, then kills whatever it left running in its group so the
/// output pipes reach EOF.
async fn reap(
    child: &mut Child,
    group: &mut ProcessGroup,
) -> std::io::Result<std::process::ExitStatus> {
    let status = child.wait().await;
    group.terminate();
    status
}

async fn drain<R: AsyncRead + Unpin>(pipe: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    if let Some(mut pipe) = pipe {
        pipe.read_to_end(&mut buffer).await?;
    }
    Ok(buffer)
}

/// Kills the scorer's process group when terminated explicitly or dropped.
struct ProcessGroup {
    #[cfg_attr(not(unix), allow(dead_code))]
    leader: Option<u32>,
}

impl ProcessGroup {
    fn led_by(child: &Child) -> Self {
        Self { leader: child.id() }
    }

    #[cfg(unix)]
    fn terminate(&mut self) {
        let Some(leader) = self.leader.take() else {
            return;
        };
        let Ok(pgid) = libc::pid_t::try_from(leader) else {
            return;
        };
        // SAFETY: killpg only signals; ESRCH for an already-empty group is ignored.
        let result = unsafe { libc::killpg(pgid, libc::SIGKILL) };
        if result == 0 {
            debug!(pgid, "scorer process group killed");
        }
    }

    #[cfg(not(unix))]
    fn terminate(&mut self) {
        self.leader = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.terminate();
    }
}

#[async_trait]
impl ScorerGateway for ProcessScorer {
    async fn call(
        &self,
        profile: &ScoringProfile,
        timeout: Duration,
    ) -> Result<Vec<ScoredScheme>, GatewayError> {
        let payload = serde_json::to_vec(profile).map_err(|err| {
            GatewayError::Unavailable(format!("failed to encode scorer request: {err}"))
        })?;

        match tokio::time::timeout(timeout, self.exchange(&payload)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(program = %self.program, ?timeout, "scorer timed out, process killed");
                Err(GatewayError::Timeout(timeout))
            }
        }
    }
}

/// Decodes and validates the scorer's stdout.
pub(crate) fn parse_response(stdout: &[u8]) -> Result<Vec<ScoredScheme>, GatewayError> {
    if stdout.iter().all(u8::is_ascii_whitespace) {
        return Err(GatewayError::InvalidResponse(
            "scorer closed its output without a payload".to_string(),
        ));
    }

    let response: ScorerResponse = serde_json::from_slice(stdout)
        .map_err(|err| GatewayError::InvalidResponse(format!("malformed payload: {err}")))?;

    for (position, scheme) in response.schemes.iter().enumerate() {
        if scheme.name.trim().is_empty() {
            return Err(GatewayError::InvalidResponse(format!(
                "scheme at position {position} has an empty name"
            )));
        }
        if !scheme.score.is_finite() || !(0.0..=1.0).contains(&scheme.score) {
            return Err(GatewayError::InvalidResponse(format!(
                "score {} for '{}' is outside [0, 1]",
                scheme.score, scheme.name
            )));
        }
    }

    Ok(response.schemes)
}

fn truncate(text: &str, limit: usize) -> &str {
    if text.len() <= limit {
        return text;
    }
    let mut end = limit;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
