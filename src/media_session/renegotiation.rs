use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::{oneshot, Mutex};
use tokio::time::{Duration, Instant};

use crate::media_stream::MediaKind;

/// Debouncer collapses a burst of renegotiation signals into one. Every signal
/// pushes the deadline out by the window; the burst fires once the window
/// passes without a new signal.
#[derive(Debug)]
pub(crate) struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub(crate) fn new(window: Duration) -> Self {
        Debouncer {
            window,
            deadline: None,
        }
    }

    pub(crate) fn signal(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// fire consumes the pending burst if its deadline has passed.
    pub(crate) fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum DeferredStage {
    AwaitingAttach,
    AwaitingNegotiation,
    AwaitingAnswer,
}

#[derive(Debug)]
struct DeferredEnable {
    kind: MediaKind,
    stage: DeferredStage,
    done_tx: oneshot::Sender<()>,
}

/// Renegotiation holds the one-shot binding guard and the deferred enables
/// waiting for a renegotiation round to complete.
#[derive(Debug, Default)]
pub(crate) struct Renegotiation {
    bound: AtomicBool,
    deferred: Mutex<Vec<DeferredEnable>>,
}

impl Renegotiation {
    /// bind marks negotiation events as wired. Only the first call returns true.
    pub(crate) fn bind(&self) -> bool {
        self.bound
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.bound.load(Ordering::SeqCst)
    }

    /// defer registers a wait for the track of `kind` to be attached, then for
    /// a negotiation-needed signal followed by an accepted answer. The wait
    /// ignores signals until [`Renegotiation::attaching`] arms it. At most one
    /// wait per kind is in flight; `None` means one already is.
    pub(crate) async fn defer(&self, kind: MediaKind) -> Option<oneshot::Receiver<()>> {
        let mut deferred = self.deferred.lock().await;
        if deferred.iter().any(|d| d.kind == kind) {
            return None;
        }

        let (done_tx, done_rx) = oneshot::channel();
        deferred.push(DeferredEnable {
            kind,
            stage: DeferredStage::AwaitingAttach,
            done_tx,
        });
        Some(done_rx)
    }

    /// attaching arms the wait of `kind` right before its track is handed to
    /// the transport, so only signals raised from then on count.
    pub(crate) async fn attaching(&self, kind: MediaKind) {
        let mut deferred = self.deferred.lock().await;
        for d in deferred.iter_mut() {
            if d.kind == kind && d.stage == DeferredStage::AwaitingAttach {
                d.stage = DeferredStage::AwaitingNegotiation;
            }
        }
    }

    pub(crate) async fn has_deferred(&self, kind: MediaKind) -> bool {
        let deferred = self.deferred.lock().await;
        deferred.iter().any(|d| d.kind == kind)
    }

    /// negotiation_needed advances every armed wait that has not yet seen a
    /// negotiation-needed signal.
    pub(crate) async fn negotiation_needed(&self) {
        let mut deferred = self.deferred.lock().await;
        for d in deferred.iter_mut() {
            if d.stage == DeferredStage::AwaitingNegotiation {
                log::trace!("deferred {} enable now awaits an answer", d.kind);
                d.stage = DeferredStage::AwaitingAnswer;
            }
        }
    }

    /// answer_accepted releases every wait that already saw a
    /// negotiation-needed signal and returns how many were released.
    pub(crate) async fn answer_accepted(&self) -> usize {
        let mut deferred = self.deferred.lock().await;
        let (ready, waiting): (Vec<_>, Vec<_>) = deferred
            .drain(..)
            .partition(|d| d.stage == DeferredStage::AwaitingAnswer);
        *deferred = waiting;

        let released = ready.len();
        for d in ready {
            // the waiting task may be gone already
            let _ = d.done_tx.send(());
        }
        released
    }

    /// forget drops the wait of `kind`, if any.
    pub(crate) async fn forget(&self, kind: MediaKind) {
        let mut deferred = self.deferred.lock().await;
        deferred.retain(|d| d.kind != kind);
    }

    /// cancel_all drops every wait; the waiting tasks observe a closed channel.
    pub(crate) async fn cancel_all(&self) {
        let mut deferred = self.deferred.lock().await;
        deferred.clear();
    }
}
