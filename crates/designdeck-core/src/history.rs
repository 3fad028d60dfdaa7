//! Linear undo/redo history over immutable snapshots.

use std::sync::Arc;

/// Default maximum number of retained snapshots.
pub const DEFAULT_HISTORY_DEPTH: usize = 100;

/// Linear snapshot history with a cursor.
///
/// `snapshots[cursor]` is always the current state. Committing while the
/// cursor is behind the newest snapshot discards the redo branch. Snapshots are
/// shared behind `Arc` and never mutated after commit, so `undo`/`redo` hand
/// out references without copying.
#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<Arc<T>>,
    cursor: usize,
    max_depth: usize,
}

impl<T> History<T> {
    /// Create a history whose only snapshot is `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_depth(initial, DEFAULT_HISTORY_DEPTH)
    }

    /// Create a history retaining at most `max_depth` snapshots (at least 1).
    pub fn with_depth(initial: T, max_depth: usize) -> Self {
        Self {
            snapshots: vec![Arc::new(initial)],
            cursor: 0,
            max_depth: max_depth.max(1),
        }
    }

    /// The current snapshot.
    pub fn current(&self) -> &Arc<T> {
        &self.snapshots[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Record a new state as current, pruning the redo branch.
    pub fn commit(&mut self, state: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(Arc::new(state));

        let overflow = self.snapshots.len().saturating_sub(self.max_depth);
        if overflow > 0 {
            self.snapshots.drain(..overflow);
        }
        self.cursor = self.snapshots.len() - 1;
    }

    /// Step back one snapshot; a no-op at the oldest snapshot.
    pub fn undo(&mut self) -> &Arc<T> {
        if self.can_undo() {
            self.cursor -= 1;
        } else {
            log::debug!("undo: at oldest snapshot");
        }
        self.current()
    }

    /// Step forward one snapshot; a no-op at the newest snapshot.
    pub fn redo(&mut self) -> &Arc<T> {
        if self.can_redo() {
            self.cursor += 1;
        } else {
            log::debug!("redo: at newest snapshot");
        }
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    /// Drop all snapshots and start over from `state`.
    pub fn reset(&mut self, state: T) {
        self.snapshots = vec![Arc::new(state)];
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new(0);
        for i in 1..=5 {
            history.commit(i);
        }
        for k in 0..=5 {
            for _ in 0..k {
                history.undo();
            }
            assert_eq!(**history.current(), 5 - k);
            for _ in 0..k {
                history.redo();
            }
            assert_eq!(**history.current(), 5);
        }
    }

    #[test]
    fn test_commit_after_undo_prunes_redo() {
        let mut history = History::new("s0");
        history.commit("s1");
        history.commit("s2");
        history.undo();
        assert!(history.can_redo());

        history.commit("s3");
        assert!(!history.can_redo());
        assert_eq!(**history.redo(), "s3");
        assert_eq!(history.len(), 3);
        assert_eq!(**history.undo(), "s1");
    }

    #[test]
    fn test_boundaries_are_no_ops() {
        let mut history = History::new(1);
        assert!(!history.can_undo());
        assert_eq!(**history.undo(), 1);
        assert_eq!(**history.redo(), 1);
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn test_depth_limit_drops_oldest() {
        let mut history = History::with_depth(0, 3);
        for i in 1..=5 {
            history.commit(i);
        }
        assert_eq!(history.len(), 3);
        assert_eq!(history.cursor(), 2);
        assert_eq!(**history.current(), 5);
        history.undo();
        history.undo();
        assert_eq!(**history.current(), 3);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_snapshots_are_shared() {
        let mut history = History::new(String::from("a"));
        history.commit(String::from("b"));
        let held = Arc::clone(history.current());
        history.undo();
        assert_eq!(*held, "b");
        assert!(Arc::ptr_eq(&held, history.redo()));
    }
}
