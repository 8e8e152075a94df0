// File: crates/matrix-core/src/resize.rs
// Summary: Resize observer seam (host listener registration) and trailing-edge debouncing.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Handle of one registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Host side of the resize observer: the window/page that delivers size changes.
pub trait ResizeHost {
    fn add_listener(&mut self) -> ListenerId;
    fn remove_listener(&mut self, id: ListenerId);
}

/// Host without a real window; it only records registrations.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    next: u64,
    active: Vec<ListenerId>,
}

impl ListenerRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn active(&self) -> &[ListenerId] { &self.active }

    pub fn is_registered(&self, id: ListenerId) -> bool { self.active.contains(&id) }
}

impl ResizeHost for ListenerRegistry {
    fn add_listener(&mut self) -> ListenerId {
        self.next += 1;
        let id = ListenerId(self.next);
        self.active.push(id);
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.active.retain(|a| *a != id);
    }
}

// Allow the host to stay inspectable while a chart holds it
impl<H: ResizeHost> ResizeHost for Rc<RefCell<H>> {
    fn add_listener(&mut self) -> ListenerId { self.borrow_mut().add_listener() }
    fn remove_listener(&mut self, id: ListenerId) { self.borrow_mut().remove_listener(id) }
}

/// Trailing-edge debouncer: every `trigger` restarts the wait, and `poll`
/// yields the latest value once `delay` has passed without a new trigger.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pending: None }
    }

    pub fn delay(&self) -> Duration { self.delay }

    pub fn trigger(&mut self, value: T, now: Instant) {
        self.pending = Some((now, value));
    }

    /// Fires at most once per burst.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if now.saturating_duration_since(*at) >= self.delay => {
                self.pending.take().map(|(_, v)| v)
            }
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool { self.pending.is_some() }

    pub fn cancel(&mut self) { self.pending = None; }
}
