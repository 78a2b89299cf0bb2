//! Completion fan-in for animations started together.

use crate::{AnimationEndReason, AnimationResult};
use std::cell::RefCell;
use std::rc::Rc;

struct ParallelInner {
    remaining: usize,
    reason: AnimationEndReason,
    on_end: Option<Box<dyn FnOnce(AnimationEndReason)>>,
}

/// Invokes `on_end` once, after every member has reported its result.
///
/// The reported reason is the merge of all member reasons, see
/// [`AnimationEndReason::merge`].
#[derive(Clone)]
pub struct ParallelGroup {
    inner: Rc<RefCell<ParallelInner>>,
}

impl ParallelGroup {
    /// A group of `count` members. With `count == 0` `on_end` runs immediately.
    pub fn new(count: usize, on_end: impl FnOnce(AnimationEndReason) + 'static) -> Self {
        let group = Self {
            inner: Rc::new(RefCell::new(ParallelInner {
                remaining: count,
                reason: AnimationEndReason::Finished,
                on_end: Some(Box::new(on_end)),
            })),
        };
        if count == 0 {
            group.fire();
        }
        group
    }

    /// Completion callback for one member.
    pub fn member(&self) -> impl FnOnce(AnimationResult) + 'static {
        let group = self.clone();
        move |result: AnimationResult| group.complete(result.end_reason)
    }

    pub fn remaining(&self) -> usize {
        self.inner.borrow().remaining
    }

    fn complete(&self, reason: AnimationEndReason) {
        let done = {
            let mut inner = self.inner.borrow_mut();
            inner.reason = inner.reason.merge(reason);
            inner.remaining = inner.remaining.saturating_sub(1);
            inner.remaining == 0
        };
        if done {
            self.fire();
        }
    }

    fn fire(&self) {
        let (on_end, reason) = {
            let mut inner = self.inner.borrow_mut();
            (inner.on_end.take(), inner.reason)
        };
        if let Some(on_end) = on_end {
            on_end(reason);
        }
    }
}
