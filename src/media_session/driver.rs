//! Media session driver (event loop)
//!
//! Consumes the single transport event channel of a session in arrival order
//! and runs the trailing-edge debounce of renegotiation signals.

use std::sync::Weak;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Duration, Instant};

use super::renegotiation::Debouncer;
use super::MediaSessionInternal;
use crate::media_stream::MediaKind;
use crate::peer_connection::ice_gathering_state::RTCIceGatheringState;
use crate::peer_connection::signaling_state::RTCSignalingState;
use crate::peer_connection::TransportEvent;

pub(crate) struct MediaSessionDriver {
    internal: Weak<MediaSessionInternal>,
    events_rx: mpsc::UnboundedReceiver<TransportEvent>,
    close_rx: watch::Receiver<bool>,
    debouncer: Debouncer,
}

impl MediaSessionDriver {
    pub(crate) fn new(
        internal: Weak<MediaSessionInternal>,
        events_rx: mpsc::UnboundedReceiver<TransportEvent>,
        close_rx: watch::Receiver<bool>,
        negotiation_debounce: Duration,
    ) -> Self {
        MediaSessionDriver {
            internal,
            events_rx,
            close_rx,
            debouncer: Debouncer::new(negotiation_debounce),
        }
    }

    /// run loops until the session ends or is dropped.
    pub(crate) async fn run(self) {
        let MediaSessionDriver {
            internal,
            mut events_rx,
            mut close_rx,
            mut debouncer,
        } = self;

        loop {
            let deadline = debouncer.deadline();
            tokio::select! {
                event = events_rx.recv() => {
                    let event = match event {
                        Some(event) => event,
                        None => break,
                    };
                    let internal = match internal.upgrade() {
                        Some(internal) => internal,
                        None => break,
                    };
                    log::trace!("transport event {event:?}");
                    handle_event(&internal, &mut debouncer, event).await;
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if debouncer.fire(Instant::now()) {
                        match internal.upgrade() {
                            Some(internal) => internal.on_negotiation_needed().await,
                            None => break,
                        }
                    }
                }
                _ = close_rx.changed() => {
                    debouncer.cancel();
                    break;
                }
            }
        }

        log::trace!("media session driver stopped");
    }
}

async fn handle_event(
    internal: &MediaSessionInternal,
    debouncer: &mut Debouncer,
    event: TransportEvent,
) {
    match event {
        TransportEvent::NegotiationNeeded => {
            if internal.renegotiation.is_bound() {
                debouncer.signal(Instant::now());
            } else {
                log::trace!("negotiation events not bound yet, dropping negotiationneeded");
            }
        }
        TransportEvent::IceCandidate(Some(candidate)) => {
            log::trace!("ice candidate {candidate}");
        }
        TransportEvent::IceCandidate(None) => {
            internal
                .ice_gathering_state_tx
                .send_replace(RTCIceGatheringState::Complete);
        }
        TransportEvent::IceGatheringStateChange(state) => {
            internal.ice_gathering_state_tx.send_replace(state);
        }
        TransportEvent::Track { track, streams } => {
            internal.on_remote_track(track, streams).await;
        }
        TransportEvent::TrackEnded { track_id } => {
            internal.on_remote_track_ended(&track_id).await;
        }
        TransportEvent::SignalingStateChange(state) => {
            log::debug!("signaling state changed to {state}");
            if state == RTCSignalingState::Closed {
                internal.update_receiving(MediaKind::Audio).await;
                internal.update_receiving(MediaKind::Video).await;
            }
        }
    }
}
