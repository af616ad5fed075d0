//! Cancellation plumbing
//!
//! Long-running steps (analysis, snapshot commits) take a
//! [`CancellationToken`] and call [`ensure_not_cancelled`] at their
//! checkpoints. Synthesis and rendering are cheap and never check.

use crate::error::{RefactorError, RefactorResult};

pub use tokio_util::sync::CancellationToken;

/// Return `Cancelled` if the token has fired.
///
/// `stage` names the checkpoint so the host can tell where the pipeline stopped.
pub fn ensure_not_cancelled(token: &CancellationToken, stage: &str) -> RefactorResult<()> {
    if token.is_cancelled() {
        tracing::debug!(stage = %stage, "Cancellation observed");
        return Err(RefactorError::cancelled(stage));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkpoint_passes_until_cancelled() {
        let token = CancellationToken::new();
        assert!(ensure_not_cancelled(&token, "mutate").is_ok());

        token.cancel();
        let err = ensure_not_cancelled(&token, "mutate").unwrap_err();
        assert_eq!(err, RefactorError::cancelled("mutate"));
    }

    #[test]
    fn test_child_token_observes_parent() {
        let parent = CancellationToken::new();
        let child = parent.child_token();
        parent.cancel();
        assert!(ensure_not_cancelled(&child, "analyze").is_err());
    }
}
