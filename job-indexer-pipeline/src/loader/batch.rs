//! Batch accumulation state.

use job_indexer_shared::IndexAction;

/// Most actions reserved up front; larger batches grow as items arrive.
const MAX_PREALLOCATED: usize = 20_000;

/// What the loader should do after an action was buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStep {
    /// Keep accumulating.
    Accumulate,
    /// Dispatch the buffer now.
    Flush,
}

/// Target batch size plus the actions buffered toward it.
#[derive(Debug)]
pub struct BatchState {
    target: usize,
    buffer: Vec<IndexAction>,
}

impl BatchState {
    pub fn new(target: usize) -> Self {
        Self {
            target,
            buffer: Vec::with_capacity(target.min(MAX_PREALLOCATED)),
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffer an action and decide whether to flush.
    ///
    /// `remaining` is the number of items the job still owes, counting the
    /// ones already buffered. Once it falls below the target, the target
    /// shrinks to it so the final batch flushes exactly on the last item.
    pub fn push(&mut self, action: IndexAction, remaining: u64) -> BatchStep {
        self.buffer.push(action);

        if self.buffer.len() >= self.target {
            return BatchStep::Flush;
        }

        if remaining > 0 && remaining < self.target as u64 {
            self.target = remaining as usize;
            if self.buffer.len() >= self.target {
                return BatchStep::Flush;
            }
        }

        BatchStep::Accumulate
    }

    /// Take the buffered actions, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<IndexAction> {
        std::mem::replace(
            &mut self.buffer,
            Vec::with_capacity(self.target.min(MAX_PREALLOCATED)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use job_indexer_shared::{IndexTarget, Record};

    fn action() -> IndexAction {
        IndexAction::index(&IndexTarget::new("idx", "product"), Record::new())
    }

    #[test]
    fn test_flush_at_target() {
        let mut state = BatchState::new(3);

        assert_eq!(state.push(action(), 100), BatchStep::Accumulate);
        assert_eq!(state.push(action(), 100), BatchStep::Accumulate);
        assert_eq!(state.push(action(), 100), BatchStep::Flush);
        assert_eq!(state.take().len(), 3);
        assert!(state.is_empty());
    }

    #[test]
    fn test_shrinks_to_remaining() {
        let mut state = BatchState::new(10);

        assert_eq!(state.push(action(), 4), BatchStep::Accumulate);
        assert_eq!(state.target(), 4);
        assert_eq!(state.push(action(), 4), BatchStep::Accumulate);
        assert_eq!(state.push(action(), 4), BatchStep::Accumulate);
        assert_eq!(state.push(action(), 4), BatchStep::Flush);
    }

    #[test]
    fn test_shrink_flushes_buffer_already_at_remaining() {
        let mut state = BatchState::new(10);
        state.push(action(), 100);
        state.push(action(), 100);

        // three items left in the job, all of them buffered
        assert_eq!(state.push(action(), 3), BatchStep::Flush);
        assert_eq!(state.target(), 3);
    }

    #[test]
    fn test_huge_target_does_not_reserve_upfront() {
        let mut state = BatchState::new(usize::MAX / 8);

        assert_eq!(state.push(action(), 0), BatchStep::Accumulate);
        assert_eq!(state.target(), usize::MAX / 8);
        assert_eq!(state.take().len(), 1);
        assert!(state.is_empty());
    }

    #[test]
    fn test_no_shrink_when_nothing_remaining() {
        let mut state = BatchState::new(5);

        assert_eq!(state.push(action(), 0), BatchStep::Accumulate);
        assert_eq!(state.target(), 5);
    }
}
