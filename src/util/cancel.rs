//! One-shot broadcast cancellation.

use crossbeam_channel::{bounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// A monotonic stop signal shared by the dispatcher and every worker.
///
/// Polling goes through [`is_cancelled`](Self::is_cancelled). Blocking waits
/// put [`done`](Self::done) in a `select!`: the channel never carries a
/// message, it only disconnects once the signal is raised, which wakes every
/// waiter at the same time.
#[derive(Debug)]
pub(crate) struct CancelSignal {
    cancelled: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    done: Receiver<()>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, rx) = bounded(0);
        Self {
            cancelled: AtomicBool::new(false),
            trigger: Mutex::new(Some(tx)),
            done: rx,
        }
    }

    /// Raise the signal. Returns `true` only for the call that raised it;
    /// later calls are no-ops.
    pub fn cancel(&self) -> bool {
        if self.cancelled.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.trigger.lock().take();
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Receiver that becomes disconnected once the signal is raised.
    pub fn done(&self) -> &Receiver<()> {
        &self.done
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
