//! Execution context for entity runs.
//!
//! The original engine recorded the running world's name in process-wide
//! status state and stopped runaway entities by interrupting their threads.
//! Both concerns are explicit here: the caller hands a context into
//! [`crate::World::run_entities`], reads the status board while entities
//! run, and cancels the token to stop them cooperatively.

use dashmap::DashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Names of worlds that currently have entities running.
///
/// Reference counted per name, so several worlds with the same name (or one
/// world run twice) stay listed until the last run finishes.
#[derive(Clone, Default)]
pub struct StatusBoard {
    running: Arc<DashMap<String, usize>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self, name: &str) {
        *self.running.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn leave(&self, name: &str) {
        if let Some(mut count) = self.running.get_mut(name) {
            *count = count.saturating_sub(1);
            if *count > 0 {
                return;
            }
        }
        self.running.remove_if(name, |_, count| *count == 0);
    }

    pub fn is_running(&self, name: &str) -> bool {
        self.running.contains_key(name)
    }

    /// Names currently running, for status display
    pub fn active(&self) -> Vec<String> {
        self.running.iter().map(|e| e.key().clone()).collect()
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }
}

/// Per-run context passed into every spawned entity task
#[derive(Clone, Default)]
pub struct ExecContext {
    status: StatusBoard,
    cancel: CancellationToken,
}

impl ExecContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &StatusBoard {
        &self.status
    }

    /// Request cooperative cancellation; entities stop between instructions
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_board_refcounts() {
        let board = StatusBoard::new();
        assert!(board.is_idle());

        board.enter("Mars");
        board.enter("Mars");
        assert!(board.is_running("Mars"));

        board.leave("Mars");
        assert!(board.is_running("Mars"));

        board.leave("Mars");
        assert!(!board.is_running("Mars"));
        assert!(board.is_idle());
    }

    #[test]
    fn test_leave_unknown_name_is_noop() {
        let board = StatusBoard::new();
        board.leave("Venus");
        assert!(board.is_idle());
    }

    #[test]
    fn test_context_cancellation_visible_to_clones() {
        let ctx = ExecContext::new();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());
        ctx.cancel();
        assert!(clone.is_cancelled());
    }
}
