//! Motion handles: futures that complete when the camera comes to rest.
//!
//! Every mutator returns a [`MotionHandle`]. Handles created with
//! transitions disabled (or when nothing needs to move) are resolved on
//! return. The rest are held by the controller's [`RestTracker`] and all
//! resolve together when the controller next settles, just before the
//! `rest` event is dispatched. Issuing a new motion never cancels an
//! earlier handle; it simply stays pending until the combined motion
//! settles.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Debug, Default)]
struct HandleState {
    resolved: bool,
    wakers: Vec<Waker>,
}

/// Completion handle for a camera motion.
///
/// Await it (on the render-loop thread) or poll [`is_resolved`](Self::is_resolved)
/// each frame.
#[derive(Debug, Clone, Default)]
pub struct MotionHandle {
    state: Rc<RefCell<HandleState>>,
}

impl MotionHandle {
    /// A handle that is already complete.
    #[must_use]
    pub fn resolved() -> Self {
        let handle = Self::default();
        handle.state.borrow_mut().resolved = true;
        handle
    }

    fn pending() -> Self {
        Self::default()
    }

    /// Whether the motion has settled.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state.borrow().resolved
    }

    /// Combine handles: the result is pending while any input is pending.
    ///
    /// All pending handles of one controller resolve together, so any
    /// pending member stands in for the whole set.
    #[must_use]
    pub fn all<I>(handles: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        handles
            .into_iter()
            .find(|h| !h.is_resolved())
            .unwrap_or_else(Self::resolved)
    }

    fn resolve(&self) {
        let wakers = {
            let mut state = self.state.borrow_mut();
            state.resolved = true;
            std::mem::take(&mut state.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
    }
}

impl Future for MotionHandle {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.state.borrow_mut();
        if state.resolved {
            return Poll::Ready(());
        }
        if !state.wakers.iter().any(|w| w.will_wake(cx.waker())) {
            state.wakers.push(cx.waker().clone());
        }
        Poll::Pending
    }
}

/// Pending handles owned by one controller.
///
/// Handles issued before the next rest share one completion state, so a
/// long drag that issues a handle per sample holds a single allocation.
#[derive(Debug, Default)]
pub struct RestTracker {
    pending: Option<MotionHandle>,
    issued: usize,
}

impl RestTracker {
    /// Empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a handle. `settled` handles are returned already resolved and
    /// are not tracked.
    pub fn issue(&mut self, settled: bool) -> MotionHandle {
        if settled {
            return MotionHandle::resolved();
        }
        self.issued += 1;
        self.pending.get_or_insert_with(MotionHandle::pending).clone()
    }

    /// Resolve every pending handle. Returns how many were issued since the
    /// last rest.
    pub fn resolve_all(&mut self) -> usize {
        if let Some(handle) = self.pending.take() {
            handle.resolve();
        }
        std::mem::take(&mut self.issued)
    }

    /// Number of handles waiting for rest.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::task::Wake;

    use super::*;

    struct CountingWaker(AtomicUsize);

    impl Wake for CountingWaker {
        fn wake(self: Arc<Self>) {
            let _ = self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn settled_handle_is_ready() {
        let mut tracker = RestTracker::new();
        let handle = tracker.issue(true);
        assert!(handle.is_resolved());
        assert_eq!(tracker.pending_count(), 0);
        pollster::block_on(handle);
    }

    #[test]
    fn pending_handles_resolve_together_and_wake() {
        let mut tracker = RestTracker::new();
        let first = tracker.issue(false);
        let second = tracker.issue(false);
        assert_eq!(tracker.pending_count(), 2);

        let counter = Arc::new(CountingWaker(AtomicUsize::new(0)));
        let waker = Waker::from(Arc::clone(&counter));
        let mut cx = Context::from_waker(&waker);
        let mut fut = first.clone();
        assert!(Pin::new(&mut fut).poll(&mut cx).is_pending());
        // Re-polling with the same waker does not register it twice.
        assert!(Pin::new(&mut fut).poll(&mut cx).is_pending());

        assert_eq!(tracker.resolve_all(), 2);
        assert_eq!(counter.0.load(Ordering::SeqCst), 1);
        assert!(first.is_resolved());
        assert!(second.is_resolved());
        pollster::block_on(second);
    }

    #[test]
    fn handles_before_rest_share_state() {
        let mut tracker = RestTracker::new();
        let handles: Vec<_> = (0..1000).map(|_| tracker.issue(false)).collect();
        assert_eq!(tracker.pending_count(), 1000);
        assert!(handles.iter().all(|h| Rc::ptr_eq(&h.state, &handles[0].state)));

        assert_eq!(tracker.resolve_all(), 1000);
        assert!(handles.iter().all(MotionHandle::is_resolved));

        // After rest a fresh handle is issued.
        let next = tracker.issue(false);
        assert!(!next.is_resolved());
        assert!(!Rc::ptr_eq(&next.state, &handles[0].state));
        assert_eq!(tracker.resolve_all(), 1);
        assert_eq!(tracker.resolve_all(), 0);
    }

    #[test]
    fn all_is_pending_while_any_is() {
        let mut tracker = RestTracker::new();
        let done = tracker.issue(true);
        let waiting = tracker.issue(false);
        let combined = MotionHandle::all([done.clone(), waiting]);
        assert!(!combined.is_resolved());
        let _ = tracker.resolve_all();
        assert!(combined.is_resolved());
        assert!(MotionHandle::all([done]).is_resolved());
        assert!(MotionHandle::all(Vec::new()).is_resolved());
    }
}
