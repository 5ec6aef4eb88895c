//! Shared step sequencing for setup and teardown
//!
//! Setup and teardown run the same kind of named steps but react to
//! failure differently: setup is fail-fast (first error aborts the
//! sequence), teardown is fail-soft (every error is logged and swallowed
//! so the remaining steps still run). [`run`] carries both policies so the
//! two sequences share one mechanism and differ only in [`StepMode`].

use std::future::Future;

use tracing::{debug, error, warn};

use crate::Error;

/// How a step reacts to failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepMode {
    /// Failure aborts the sequence
    Fatal,
    /// Failure is logged and swallowed; the sequence continues
    BestEffort,
}

/// What happened to a step.
#[derive(Debug)]
pub enum StepOutcome {
    /// The step succeeded
    Completed,
    /// The step failed but the failure was recovered locally
    Recovered(Error),
}

impl StepOutcome {
    /// Whether the step's failure was recovered rather than completing
    pub fn is_recovered(&self) -> bool {
        matches!(self, StepOutcome::Recovered(_))
    }
}

/// Run one named step under the given mode.
///
/// In [`StepMode::Fatal`] an error propagates to the caller. In
/// [`StepMode::BestEffort`] it is logged and reported as
/// [`StepOutcome::Recovered`], never as `Err`.
pub async fn run<F>(mode: StepMode, name: &str, step: F) -> Result<StepOutcome, Error>
where
    F: Future<Output = Result<(), Error>>,
{
    match step.await {
        Ok(()) => {
            debug!(step = name, "step completed");
            Ok(StepOutcome::Completed)
        }
        Err(e) => match mode {
            StepMode::Fatal => {
                error!(step = name, error = %e, "step failed");
                Err(e)
            }
            StepMode::BestEffort => {
                warn!(step = name, error = %e, "step failed, continuing");
                Ok(StepOutcome::Recovered(e))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fatal_step_propagates_error() {
        let result = run(StepMode::Fatal, "boom", async {
            Err(Error::gateway("op", "failed"))
        })
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_best_effort_step_recovers_error() {
        let result = run(StepMode::BestEffort, "boom", async {
            Err(Error::gateway("op", "failed"))
        })
        .await;
        match result {
            Ok(outcome) => assert!(outcome.is_recovered()),
            Err(_) => panic!("best-effort step must not propagate"),
        }
    }

    #[tokio::test]
    async fn test_successful_step_completes_in_both_modes() {
        for mode in [StepMode::Fatal, StepMode::BestEffort] {
            let result = run(mode, "ok", async { Ok(()) }).await;
            match result {
                Ok(outcome) => assert!(!outcome.is_recovered()),
                Err(_) => panic!("successful step must not error"),
            }
        }
    }
}
