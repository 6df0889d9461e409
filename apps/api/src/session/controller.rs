//! Application State Controller: one finite state machine per session.
//!
//! ```text
//! idle --submit--> analyzing --resolve--> results --reset--> idle
//!                            --reject---> error   --reset--> idle
//! ```
//!
//! Every other (state, trigger) pair is refused with a `TransitionError` and
//! leaves the state untouched. There is no cancel: once submitted, the
//! analysis runs to completion. A second submit while analyzing is refused,
//! which makes the session a single-slot in-flight guard.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::models::analysis::AnalysisResult;
use crate::statement::analyzer::{AnalysisError, StatementAnalyzer, ANALYSIS_FAILED_MESSAGE};
use crate::statement::validation::ValidatedInput;

pub type SharedSession = Arc<Mutex<StatementSession>>;

/// The four observable states. Exactly one is active per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Analyzing,
    Results,
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionState::Idle => "idle",
            SessionState::Analyzing => "analyzing",
            SessionState::Results => "results",
            SessionState::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    Submit,
    Resolve,
    Reject,
    Reset,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trigger::Submit => "submit",
            Trigger::Resolve => "resolve",
            Trigger::Reject => "reject",
            Trigger::Reset => "reset",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot {trigger} while {state}")]
pub struct TransitionError {
    pub state: SessionState,
    pub trigger: Trigger,
}

/// Current state with its payload. The result lives only inside `Results` and
/// the message only inside `Error`, so neither can outlive its state.
#[derive(Debug, Clone)]
pub enum Phase {
    Idle,
    Analyzing { started_at: DateTime<Utc> },
    Results { result: Arc<AnalysisResult>, completed_at: DateTime<Utc> },
    Error { message: String, failed_at: DateTime<Utc> },
}

impl Phase {
    pub fn state(&self) -> SessionState {
        match self {
            Phase::Idle => SessionState::Idle,
            Phase::Analyzing { .. } => SessionState::Analyzing,
            Phase::Results { .. } => SessionState::Results,
            Phase::Error { .. } => SessionState::Error,
        }
    }

    /// When the current state was entered. Idle carries no timestamp.
    pub fn since(&self) -> Option<DateTime<Utc>> {
        match self {
            Phase::Idle => None,
            Phase::Analyzing { started_at } => Some(*started_at),
            Phase::Results { completed_at, .. } => Some(*completed_at),
            Phase::Error { failed_at, .. } => Some(*failed_at),
        }
    }
}

#[derive(Debug)]
pub struct StatementSession {
    id: Uuid,
    phase: Phase,
    touched_at: DateTime<Utc>,
}

impl StatementSession {
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            phase: Phase::Idle,
            touched_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn state(&self) -> SessionState {
        self.phase.state()
    }

    /// Last time the session was created or changed state. Drives expiry.
    pub fn touched_at(&self) -> DateTime<Utc> {
        self.touched_at
    }

    pub fn result(&self) -> Option<&Arc<AnalysisResult>> {
        match &self.phase {
            Phase::Results { result, .. } => Some(result),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    fn refuse(&self, trigger: Trigger) -> TransitionError {
        let err = TransitionError {
            state: self.state(),
            trigger,
        };
        warn!(session_id = %self.id, "Refused transition: {err}");
        err
    }

    /// idle → analyzing. Any previous error was already dropped by `reset`.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(self.refuse(Trigger::Submit));
        }
        self.touched_at = Utc::now();
        self.phase = Phase::Analyzing {
            started_at: self.touched_at,
        };
        info!(session_id = %self.id, "Analysis started");
        Ok(())
    }

    /// analyzing → results | error, depending on the analyzer outcome.
    pub fn complete(
        &mut self,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> Result<(), TransitionError> {
        let trigger = if outcome.is_ok() {
            Trigger::Resolve
        } else {
            Trigger::Reject
        };
        let Phase::Analyzing { started_at } = self.phase else {
            return Err(self.refuse(trigger));
        };
        let now = Utc::now();
        self.touched_at = now;
        let elapsed_ms = (now - started_at).num_milliseconds();

        self.phase = match outcome {
            Ok(result) => {
                info!(
                    session_id = %self.id,
                    score = result.score,
                    elapsed_ms,
                    "Analysis completed"
                );
                Phase::Results {
                    result: Arc::new(result),
                    completed_at: now,
                }
            }
            Err(e) => {
                error!(
                    session_id = %self.id,
                    kind = e.kind(),
                    elapsed_ms,
                    "Analysis failed: {e}"
                );
                Phase::Error {
                    message: ANALYSIS_FAILED_MESSAGE.to_string(),
                    failed_at: now,
                }
            }
        };
        Ok(())
    }

    /// results | error → idle, discarding the held result or message.
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Results { .. } | Phase::Error { .. } => {
                self.phase = Phase::Idle;
                self.touched_at = Utc::now();
                info!(session_id = %self.id, "Session reset");
                Ok(())
            }
            _ => Err(self.refuse(Trigger::Reset)),
        }
    }
}

/// Submits validated input: moves the session to analyzing, then runs the
/// analyzer in the background and records its outcome. The returned handle
/// completes once the session has left `analyzing`.
pub async fn start_analysis(
    session: SharedSession,
    analyzer: Arc<dyn StatementAnalyzer>,
    input: ValidatedInput,
) -> Result<JoinHandle<()>, TransitionError> {
    session.lock().await.begin()?;

    Ok(tokio::spawn(async move {
        let outcome = analyzer.analyze(&input).await;
        // Input is ephemeral; nothing of it is kept once the call returns.
        drop(input);
        if let Err(e) = session.lock().await.complete(outcome) {
            error!("Analysis outcome could not be recorded: {e}");
        }
    }))
}
