use crate::FrameClock;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

pub type FrameCallbackId = u64;

struct FrameCallbackEntry {
    id: FrameCallbackId,
    callback: Option<Box<dyn FnOnce(u64) + 'static>>,
}

struct RuntimeInner {
    frame_callbacks: RefCell<VecDeque<FrameCallbackEntry>>,
    next_frame_callback_id: Cell<u64>,
    needs_frame: Cell<bool>,
    last_frame_time_nanos: Cell<Option<u64>>,
}

impl RuntimeInner {
    fn new() -> Self {
        Self {
            frame_callbacks: RefCell::new(VecDeque::new()),
            next_frame_callback_id: Cell::new(1),
            needs_frame: Cell::new(false),
            last_frame_time_nanos: Cell::new(None),
        }
    }

    fn register_frame_callback(&self, callback: Box<dyn FnOnce(u64) + 'static>) -> FrameCallbackId {
        let id = self.next_frame_callback_id.get();
        self.next_frame_callback_id.set(id + 1);
        self.frame_callbacks
            .borrow_mut()
            .push_back(FrameCallbackEntry {
                id,
                callback: Some(callback),
            });
        self.needs_frame.set(true);
        id
    }

    fn cancel_frame_callback(&self, id: FrameCallbackId) {
        let mut callbacks = self.frame_callbacks.borrow_mut();
        if let Some(index) = callbacks.iter().position(|entry| entry.id == id) {
            callbacks.remove(index);
        }
        if callbacks.is_empty() {
            self.needs_frame.set(false);
        }
    }

    fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(last) = self.last_frame_time_nanos.get() {
            if frame_time_nanos < last {
                log::warn!("frame time went backwards: {frame_time_nanos} < {last}");
            }
        }
        self.last_frame_time_nanos.set(Some(frame_time_nanos));

        // Callbacks registered while draining belong to the next frame.
        let pending: Vec<Box<dyn FnOnce(u64) + 'static>> = {
            let mut callbacks = self.frame_callbacks.borrow_mut();
            callbacks
                .drain(..)
                .filter_map(|mut entry| entry.callback.take())
                .collect()
        };
        log::trace!(
            "frame {frame_time_nanos}: running {} callback(s)",
            pending.len()
        );
        for callback in pending {
            callback(frame_time_nanos);
        }
        self.needs_frame.set(self.has_frame_callbacks());
    }

    fn has_frame_callbacks(&self) -> bool {
        !self.frame_callbacks.borrow().is_empty()
    }
}

/// Owner of the event-loop state. Dropping the runtime detaches every handle.
pub struct Runtime {
    inner: Rc<RuntimeInner>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new()),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

/// Weak, cloneable access to a [`Runtime`].
///
/// All operations become no-ops once the runtime is dropped.
#[derive(Clone)]
pub struct RuntimeHandle {
    inner: Weak<RuntimeInner>,
}

impl RuntimeHandle {
    pub fn register_frame_callback(
        &self,
        callback: impl FnOnce(u64) + 'static,
    ) -> Option<FrameCallbackId> {
        self.inner
            .upgrade()
            .map(|inner| inner.register_frame_callback(Box::new(callback)))
    }

    pub fn cancel_frame_callback(&self, id: FrameCallbackId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.cancel_frame_callback(id);
        }
    }

    /// Run every callback scheduled before this call with the given frame time.
    pub fn drain_frame_callbacks(&self, frame_time_nanos: u64) {
        if let Some(inner) = self.inner.upgrade() {
            inner.drain_frame_callbacks(frame_time_nanos);
        }
    }

    pub fn has_frame_callbacks(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.has_frame_callbacks())
            .unwrap_or(false)
    }

    /// Whether the host should schedule another frame.
    pub fn needs_frame(&self) -> bool {
        self.inner
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn last_frame_time_nanos(&self) -> Option<u64> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.last_frame_time_nanos.get())
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn frame_clock(&self) -> FrameClock {
        FrameClock::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callbacks_run_once_with_frame_time() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        handle.register_frame_callback(move |time| sink.borrow_mut().push(time));
        assert!(handle.needs_frame());

        handle.drain_frame_callbacks(42);
        handle.drain_frame_callbacks(84);

        assert_eq!(seen.borrow().as_slice(), &[42]);
        assert!(!handle.needs_frame());
        assert_eq!(handle.last_frame_time_nanos(), Some(84));
    }

    #[test]
    fn callbacks_registered_during_drain_wait_for_next_frame() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        let nested_handle = handle.clone();
        handle.register_frame_callback(move |time| {
            sink.borrow_mut().push(time);
            let sink = Rc::clone(&sink);
            nested_handle.register_frame_callback(move |time| sink.borrow_mut().push(time));
        });

        handle.drain_frame_callbacks(1);
        assert_eq!(seen.borrow().as_slice(), &[1]);
        assert!(handle.has_frame_callbacks());

        handle.drain_frame_callbacks(2);
        assert_eq!(seen.borrow().as_slice(), &[1, 2]);
    }

    #[test]
    fn cancelled_callback_never_runs() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        let ran = Rc::new(Cell::new(false));

        let flag = Rc::clone(&ran);
        let id = handle
            .register_frame_callback(move |_| flag.set(true))
            .expect("runtime alive");
        handle.cancel_frame_callback(id);
        handle.drain_frame_callbacks(10);

        assert!(!ran.get());
        assert!(!handle.needs_frame());
    }

    #[test]
    fn dropped_runtime_makes_handle_inert() {
        let runtime = Runtime::new();
        let handle = runtime.handle();
        drop(runtime);

        assert!(!handle.is_alive());
        assert!(handle.register_frame_callback(|_| {}).is_none());
        handle.drain_frame_callbacks(0);
    }
}
