//! Inbound message queue bridging I/O threads to the logic thread.
//!
//! Network decoding happens off-thread, but all inventory mutation is
//! owned by the logic thread. Decoders push here from any thread; the
//! logic thread drains at a fixed point in its tick.

use crossbeam::queue::SegQueue;

use super::click_session::ClickSession;
use super::hooks::SessionHooks;
use super::messages::InboundMessage;

/// A lock-free FIFO of decoded messages for one session.
#[derive(Debug, Default)]
pub struct SessionQueue {
    inner: SegQueue<InboundMessage>,
}

impl SessionQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: SegQueue::new(),
        }
    }

    /// Enqueues a message. Callable from any thread.
    pub fn push(&self, message: InboundMessage) {
        self.inner.push(message);
    }

    /// Number of queued messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drains every queued message into the session, in arrival order.
    ///
    /// Logic-thread only: this is the single point where network input
    /// turns into inventory mutation.
    pub fn drain(&self, session: &mut ClickSession, hooks: &mut impl SessionHooks) {
        while let Some(message) = self.inner.pop() {
            session.handle(message, hooks);
        }
    }
}
