//! Offer/answer negotiation and media lifecycle of a single call leg
//!
//! A [`MediaSession`] owns one transport, created lazily by the first
//! [`MediaSession::create_offer`]. Desired audio/video state written by the
//! call layer is translated into track and stream actions; observed
//! sending/receiving flags are recomputed from live track state after every
//! operation and surfaced as [`MediaSessionEvent`]s.

#[cfg(test)]
pub(crate) mod mock;

mod driver;
pub mod flow_monitor;
mod lifecycle;
pub mod negotiation_state;
mod renegotiation;

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tokio::sync::{broadcast, mpsc, watch, Mutex, OnceCell};

use crate::api::setting_engine::SettingEngine;
use crate::error::{Error, Result};
use crate::math_rand_alpha;
use crate::media_devices::MediaDevices;
use crate::media_stream::{
    intent_from_state, normalize_intent, wants_any, MediaIntent, MediaKind, MediaStream,
    MediaStreamConstraints, TrackConstraint,
};
use crate::peer_connection::configuration::RTCConfiguration;
use crate::peer_connection::ice_gathering_state::RTCIceGatheringState;
use crate::peer_connection::offer_answer_options::RTCOfferOptions;
use crate::peer_connection::rtp_transceiver_direction::RTPTransceiverDirection;
use crate::peer_connection::sdp::session_description::RTCSessionDescription;
use crate::peer_connection::sdp::{ensure_codec, limit_bandwidth, media_direction};
use crate::peer_connection::signaling_state::RTCSignalingState;
use crate::peer_connection::{
    PeerTransport, TransportEvent, TransportEventSender, TransportFactory,
};
use driver::MediaSessionDriver;
use negotiation_state::NegotiationState;
use renegotiation::Renegotiation;

/// MediaSessionEvent is everything a session reports to the call layer.
#[derive(Debug, Clone)]
pub enum MediaSessionEvent {
    /// NegotiationNeeded asks the call layer for a new offer/answer round.
    /// Bursts of transport signals are collapsed into one event.
    NegotiationNeeded,

    /// AnswerAccepted fires once a remote answer has been applied.
    AnswerAccepted,

    /// Error carries a failure of background work that has no caller to
    /// return to, such as a deferred enable or a stream replacement.
    Error(Arc<Error>),

    SendingChanged { kind: MediaKind, sending: bool },
    ReceivingChanged { kind: MediaKind, receiving: bool },

    /// Ended fires once, when the session is torn down.
    Ended,
}

/// DesiredMedia is the user intent per kind, a flag paired with the
/// capture constraint to use when the kind has to be acquired.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct DesiredMedia {
    pub(crate) audio: bool,
    pub(crate) audio_constraint: TrackConstraint,
    pub(crate) video: bool,
    pub(crate) video_constraint: TrackConstraint,
}

impl DesiredMedia {
    pub(crate) fn new(audio: MediaIntent, video: MediaIntent) -> Self {
        let (audio, audio_constraint) = normalize_intent(audio, &TrackConstraint::Any);
        let (video, video_constraint) = normalize_intent(video, &TrackConstraint::Any);
        DesiredMedia {
            audio,
            audio_constraint,
            video,
            video_constraint,
        }
    }

    pub(crate) fn enabled(&self, kind: MediaKind) -> bool {
        match kind {
            MediaKind::Audio => self.audio,
            MediaKind::Video => self.video,
            MediaKind::Unspecified => false,
        }
    }

    pub(crate) fn constraint(&self, kind: MediaKind) -> &TrackConstraint {
        match kind {
            MediaKind::Video => &self.video_constraint,
            _ => &self.audio_constraint,
        }
    }

    /// apply folds an intent write in and reports whether the flag flipped.
    pub(crate) fn apply(&mut self, kind: MediaKind, intent: MediaIntent) -> bool {
        let (enabled, constraint) = normalize_intent(intent, self.constraint(kind));
        let changed = self.enabled(kind) != enabled;
        match kind {
            MediaKind::Audio => {
                self.audio = enabled;
                self.audio_constraint = constraint;
            }
            MediaKind::Video => {
                self.video = enabled;
                self.video_constraint = constraint;
            }
            MediaKind::Unspecified => return false,
        }
        changed
    }

    /// constraints is the capture request for every desired kind.
    pub(crate) fn constraints(&self) -> MediaStreamConstraints {
        MediaStreamConstraints {
            audio: intent_from_state(self.audio, &self.audio_constraint),
            video: intent_from_state(self.video, &self.video_constraint),
        }
    }

    /// constraints_for is the capture request for `kind` alone.
    pub(crate) fn constraints_for(&self, kind: MediaKind) -> MediaStreamConstraints {
        let mut constraints = MediaStreamConstraints::default();
        match kind {
            MediaKind::Audio => {
                constraints.audio = intent_from_state(true, &self.audio_constraint)
            }
            MediaKind::Video => {
                constraints.video = intent_from_state(true, &self.video_constraint)
            }
            MediaKind::Unspecified => {}
        }
        constraints
    }
}

/// MediaSessionParams carries everything needed to start a session.
pub(crate) struct MediaSessionParams {
    pub(crate) setting_engine: Arc<SettingEngine>,
    pub(crate) configuration: RTCConfiguration,
    pub(crate) transport_factory: Arc<dyn TransportFactory>,
    pub(crate) media_devices: Arc<dyn MediaDevices>,
    pub(crate) audio: MediaIntent,
    pub(crate) video: MediaIntent,
    pub(crate) offer_to_receive_audio: bool,
    pub(crate) offer_to_receive_video: bool,
    pub(crate) local_media_stream: Option<Arc<MediaStream>>,
}

pub(crate) struct MediaSessionInternal {
    id: String,
    pub(crate) setting_engine: Arc<SettingEngine>,
    configuration: RTCConfiguration,
    transport_factory: Arc<dyn TransportFactory>,
    pub(crate) media_devices: Arc<dyn MediaDevices>,

    /// created at most once, by the first offer
    pub(crate) transport: OnceCell<Arc<dyn PeerTransport>>,
    transport_events_tx: TransportEventSender,

    pub(crate) desired: Mutex<DesiredMedia>,
    pub(crate) local_stream: ArcSwapOption<MediaStream>,
    pub(crate) remote_stream: ArcSwapOption<MediaStream>,

    sending_audio: AtomicBool,
    sending_video: AtomicBool,
    receiving_audio: AtomicBool,
    receiving_video: AtomicBool,
    offer_to_receive_audio: AtomicBool,
    offer_to_receive_video: AtomicBool,

    ended: AtomicBool,
    negotiation_state: AtomicU8, //NegotiationState

    pub(crate) renegotiation: Renegotiation,
    pub(crate) ice_gathering_state_tx: watch::Sender<RTCIceGatheringState>,
    close_tx: watch::Sender<bool>,
    events_tx: broadcast::Sender<MediaSessionEvent>,
}

/// MediaSession negotiates and maintains the media of one call leg.
///
/// Building a session spawns its event driver, so a tokio runtime must be
/// running. All methods take `&self`; the session is meant to be driven
/// sequentially by its owner.
#[derive(Clone)]
pub struct MediaSession {
    pub(crate) internal: Arc<MediaSessionInternal>,
}

impl MediaSession {
    pub(crate) fn new(params: MediaSessionParams) -> Self {
        let (transport_events_tx, transport_events_rx) = mpsc::unbounded_channel();
        let (ice_gathering_state_tx, _) = watch::channel(RTCIceGatheringState::New);
        let (close_tx, close_rx) = watch::channel(false);
        let (events_tx, _) =
            broadcast::channel(params.setting_engine.event_channel_capacity.max(1));

        let internal = Arc::new(MediaSessionInternal {
            id: format!("MediaSession-{}", math_rand_alpha(16)),
            configuration: params.configuration,
            transport_factory: params.transport_factory,
            media_devices: params.media_devices,

            transport: OnceCell::new(),
            transport_events_tx,

            desired: Mutex::new(DesiredMedia::new(params.audio, params.video)),
            local_stream: ArcSwapOption::new(params.local_media_stream),
            remote_stream: ArcSwapOption::empty(),

            sending_audio: AtomicBool::new(false),
            sending_video: AtomicBool::new(false),
            receiving_audio: AtomicBool::new(false),
            receiving_video: AtomicBool::new(false),
            offer_to_receive_audio: AtomicBool::new(params.offer_to_receive_audio),
            offer_to_receive_video: AtomicBool::new(params.offer_to_receive_video),

            ended: AtomicBool::new(false),
            negotiation_state: AtomicU8::new(NegotiationState::Idle as u8),

            renegotiation: Renegotiation::default(),
            ice_gathering_state_tx,
            close_tx,
            events_tx,
            setting_engine: params.setting_engine,
        });

        let driver = MediaSessionDriver::new(
            Arc::downgrade(&internal),
            transport_events_rx,
            close_rx,
            internal.setting_engine.negotiation_debounce,
        );
        tokio::spawn(driver.run());

        MediaSession { internal }
    }

    /// create_offer produces the next local offer.
    ///
    /// The first call creates the transport. Local capture is acquired if
    /// audio or video is desired and no local stream exists yet, and the
    /// local stream is attached if needed. The returned text carries a
    /// `b=TIAS` line after every media line. When video is desired, the
    /// offer must list the required video codec or the call fails.
    pub async fn create_offer(&self) -> Result<String> {
        self.internal.create_offer().await
    }

    /// accept_answer applies the remote answer to the outstanding offer.
    pub async fn accept_answer(&self, sdp: &str) -> Result<()> {
        self.internal.accept_answer(sdp).await
    }

    /// end tears the session down: every local and remote track is stopped,
    /// both stream references are cleared and the transport is closed. It
    /// never fails and only the first call has an effect.
    pub async fn end(&self) {
        self.internal.end().await
    }

    /// set_audio writes the desired audio state. A constraint implies the
    /// kind is wanted and replaces the stored constraint; a plain flag keeps
    /// it. Failures of the resulting work are reported as
    /// [`MediaSessionEvent::Error`].
    pub async fn set_audio(&self, intent: impl Into<MediaIntent>) {
        self.internal.apply_intent(MediaKind::Audio, intent.into()).await
    }

    /// set_video writes the desired video state, see [`MediaSession::set_audio`].
    ///
    /// Enabling video without an existing local video track acquires a new
    /// one; `sending_video` then stays false until the renegotiation this
    /// triggers has completed with an accepted answer.
    pub async fn set_video(&self, intent: impl Into<MediaIntent>) {
        self.internal.apply_intent(MediaKind::Video, intent.into()).await
    }

    /// set_offer_to_receive_audio changes the receive intent of the next
    /// offer. Once negotiated, a change requests a renegotiation.
    pub fn set_offer_to_receive_audio(&self, offer_to_receive: bool) {
        self.internal
            .set_offer_to_receive(MediaKind::Audio, offer_to_receive)
    }

    pub fn set_offer_to_receive_video(&self, offer_to_receive: bool) {
        self.internal
            .set_offer_to_receive(MediaKind::Video, offer_to_receive)
    }

    /// set_local_media_stream replaces the local stream, e.g. after switching
    /// capture devices. Once negotiated, every previously attached stream is
    /// detached, the new one attached, and the desired state synced with
    /// what the new stream actually sends.
    pub async fn set_local_media_stream(&self, stream: Arc<MediaStream>) {
        self.internal.replace_local_stream(stream).await
    }

    /// subscribe returns a receiver for every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<MediaSessionEvent> {
        self.internal.events_tx.subscribe()
    }

    pub async fn audio(&self) -> bool {
        self.internal.desired.lock().await.audio
    }

    pub async fn video(&self) -> bool {
        self.internal.desired.lock().await.video
    }

    pub async fn audio_constraint(&self) -> TrackConstraint {
        self.internal.desired.lock().await.audio_constraint.clone()
    }

    pub async fn video_constraint(&self) -> TrackConstraint {
        self.internal.desired.lock().await.video_constraint.clone()
    }

    pub fn offer_to_receive_audio(&self) -> bool {
        self.internal.offer_to_receive_audio.load(Ordering::SeqCst)
    }

    pub fn offer_to_receive_video(&self) -> bool {
        self.internal.offer_to_receive_video.load(Ordering::SeqCst)
    }

    pub fn sending_audio(&self) -> bool {
        self.internal.sending(MediaKind::Audio)
    }

    pub fn sending_video(&self) -> bool {
        self.internal.sending(MediaKind::Video)
    }

    pub fn receiving_audio(&self) -> bool {
        self.internal.receiving(MediaKind::Audio)
    }

    pub fn receiving_video(&self) -> bool {
        self.internal.receiving(MediaKind::Video)
    }

    /// id is a random identifier that prefixes the log lines of the session.
    pub fn id(&self) -> &str {
        &self.internal.id
    }

    pub fn ended(&self) -> bool {
        self.internal.is_ended()
    }

    pub fn negotiation_state(&self) -> NegotiationState {
        self.internal.negotiation_state()
    }

    pub fn local_media_stream(&self) -> Option<Arc<MediaStream>> {
        self.internal.local_stream.load_full()
    }

    pub fn remote_media_stream(&self) -> Option<Arc<MediaStream>> {
        self.internal.remote_stream.load_full()
    }

    /// media_direction returns the negotiated direction of `kind`: the one of
    /// its first section in the local description, or inactive when there
    /// is none, the transport is closed, or the remote side holds our
    /// sendonly audio.
    pub async fn media_direction(&self, kind: MediaKind) -> Result<RTPTransceiverDirection> {
        let transport = match self.internal.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => return Ok(RTPTransceiverDirection::Inactive),
        };
        if transport.signaling_state() == RTCSignalingState::Closed {
            return Ok(RTPTransceiverDirection::Inactive);
        }

        let local = transport.local_description().await;
        let remote = transport.remote_description().await;
        media_direction(kind, local.as_ref(), remote.as_ref())
    }
}

impl MediaSessionInternal {
    pub(crate) fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    pub(crate) fn negotiation_state(&self) -> NegotiationState {
        self.negotiation_state.load(Ordering::SeqCst).into()
    }

    /// set_negotiation_state moves to `next` unless the session has ended.
    fn set_negotiation_state(&self, next: NegotiationState) {
        let result = self.negotiation_state.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |current| {
                if current == NegotiationState::Ended as u8 {
                    None
                } else {
                    Some(next as u8)
                }
            },
        );
        if let Ok(previous) = result {
            log::trace!(
                "negotiation state {} -> {}",
                NegotiationState::from(previous),
                next
            );
        }
    }

    /// check_open fails once the session ended or its transport closed. It
    /// runs after every suspension point of a negotiation step.
    pub(crate) fn check_open(&self, transport: &Arc<dyn PeerTransport>) -> Result<()> {
        if self.is_ended() {
            return Err(Error::ErrSessionEnded);
        }
        if transport.signaling_state() == RTCSignalingState::Closed {
            return Err(Error::ErrConnectionClosed);
        }
        Ok(())
    }

    pub(crate) fn emit(&self, event: MediaSessionEvent) {
        // no subscriber is not an error
        let _ = self.events_tx.send(event);
    }

    pub(crate) fn emit_error(&self, err: Error) {
        log::error!("media session error: {err}");
        self.emit(MediaSessionEvent::Error(Arc::new(err)));
    }

    fn sending_flag(&self, kind: MediaKind) -> Option<&AtomicBool> {
        match kind {
            MediaKind::Audio => Some(&self.sending_audio),
            MediaKind::Video => Some(&self.sending_video),
            MediaKind::Unspecified => None,
        }
    }

    fn receiving_flag(&self, kind: MediaKind) -> Option<&AtomicBool> {
        match kind {
            MediaKind::Audio => Some(&self.receiving_audio),
            MediaKind::Video => Some(&self.receiving_video),
            MediaKind::Unspecified => None,
        }
    }

    pub(crate) fn sending(&self, kind: MediaKind) -> bool {
        self.sending_flag(kind)
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub(crate) fn receiving(&self, kind: MediaKind) -> bool {
        self.receiving_flag(kind)
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub(crate) fn set_sending(&self, kind: MediaKind, sending: bool) {
        if let Some(flag) = self.sending_flag(kind) {
            if flag.swap(sending, Ordering::SeqCst) != sending {
                log::debug!("sending {kind}: {sending}");
                self.emit(MediaSessionEvent::SendingChanged { kind, sending });
            }
        }
    }

    pub(crate) fn set_receiving(&self, kind: MediaKind, receiving: bool) {
        if let Some(flag) = self.receiving_flag(kind) {
            if flag.swap(receiving, Ordering::SeqCst) != receiving {
                log::debug!("receiving {kind}: {receiving}");
                self.emit(MediaSessionEvent::ReceivingChanged { kind, receiving });
            }
        }
    }

    /// update_sending recomputes the sending flag of `kind` from the local
    /// tracks. While an enable of `kind` waits for renegotiation the flag is
    /// held as is.
    pub(crate) async fn update_sending(&self, kind: MediaKind) {
        if self.is_ended() || self.renegotiation.has_deferred(kind).await {
            return;
        }
        if let Some(transport) = self.transport.get() {
            let sending = flow_monitor::local_media_status(transport, kind).await;
            self.set_sending(kind, sending);
        }
    }

    pub(crate) async fn update_receiving(&self, kind: MediaKind) {
        if self.is_ended() {
            return;
        }
        if let Some(transport) = self.transport.get() {
            let receiving = flow_monitor::remote_media_status(transport, kind).await;
            self.set_receiving(kind, receiving);
        }
    }

    async fn transport(&self) -> Result<Arc<dyn PeerTransport>> {
        let transport = self
            .transport
            .get_or_try_init(|| async {
                log::debug!(
                    "[{}] creating transport with {} ice server(s)",
                    self.id,
                    self.configuration.ice_servers.len()
                );
                self.transport_factory
                    .new_transport(
                        self.configuration.clone(),
                        self.transport_events_tx.clone(),
                    )
                    .await
            })
            .await?;
        Ok(Arc::clone(transport))
    }

    async fn create_offer(&self) -> Result<String> {
        if self.is_ended() {
            return Err(Error::ErrSessionEnded);
        }

        let previous = self.negotiation_state();
        self.set_negotiation_state(NegotiationState::OfferPending);

        match self.generate_offer().await {
            Ok(sdp) => {
                self.set_negotiation_state(NegotiationState::Offered);
                Ok(sdp)
            }
            Err(err) => {
                log::warn!("[{}] failed to create offer: {err}", self.id);
                self.set_negotiation_state(previous);
                Err(err)
            }
        }
    }

    async fn generate_offer(&self) -> Result<String> {
        let transport = self.transport().await?;
        self.check_open(&transport)?;

        let desired = self.desired.lock().await.clone();
        let constraints = desired.constraints();
        if self.local_stream.load().is_none() && wants_any(&constraints) {
            let stream = self.media_devices.get_user_media(&constraints).await?;
            if let Err(err) = self.check_open(&transport) {
                stream.stop().await;
                return Err(err);
            }
            self.local_stream.store(Some(stream));
        }

        if let Some(stream) = self.local_stream.load_full() {
            let attached = transport.local_streams().await;
            if !attached.iter().any(|s| Arc::ptr_eq(s, &stream)) {
                transport.add_stream(stream).await?;
                self.check_open(&transport)?;
            }
        }

        let options = RTCOfferOptions {
            offer_to_receive_audio: self.offer_to_receive_audio.load(Ordering::SeqCst),
            offer_to_receive_video: self.offer_to_receive_video.load(Ordering::SeqCst),
            ..Default::default()
        };
        let mut offer = transport.create_offer(Some(options)).await?;
        self.check_open(&transport)?;

        let limits = self.setting_engine.bandwidth_limits();
        offer.sdp = limit_bandwidth(&offer.sdp, limits);
        if self.setting_engine.log_sdp {
            log::info!("offer {}", offer.sdp);
        }

        self.set_negotiation_state(NegotiationState::GatheringCandidates);
        self.ice_gathering_state_tx
            .send_replace(RTCIceGatheringState::New);
        transport.set_local_description(offer).await?;
        self.check_open(&transport)?;

        self.gathering_complete().await;
        self.check_open(&transport)?;

        // the transport may have moved or dropped the bandwidth lines
        let local = transport
            .local_description()
            .await
            .ok_or(Error::ErrNoLocalDescription)?;
        let sdp = limit_bandwidth(&local.sdp, limits);
        ensure_codec(
            desired.video,
            &self.setting_engine.required_video_codec,
            &sdp,
        )?;

        if self.renegotiation.bind() {
            log::debug!("negotiation events bound");
        }

        Ok(sdp)
    }

    /// gathering_complete waits for the end of candidates, bounded by the
    /// configured timeout. Running out of time is not an error.
    async fn gathering_complete(&self) {
        let mut gathering_rx = self.ice_gathering_state_tx.subscribe();
        let mut close_rx = self.close_tx.subscribe();
        let wait = async {
            loop {
                if *gathering_rx.borrow_and_update() == RTCIceGatheringState::Complete {
                    return;
                }
                tokio::select! {
                    changed = gathering_rx.changed() => {
                        if changed.is_err() {
                            return;
                        }
                    }
                    _ = close_rx.changed() => return,
                }
            }
        };

        let timeout = self.setting_engine.ice_gathering_timeout;
        if tokio::time::timeout(timeout, wait).await.is_err() {
            log::debug!("ice gathering incomplete after {timeout:?}, continuing");
        }
    }

    async fn accept_answer(&self, sdp: &str) -> Result<()> {
        if self.is_ended() {
            return Err(Error::ErrSessionEnded);
        }

        let state = self.negotiation_state();
        if state != NegotiationState::Offered {
            return Err(Error::ErrIncorrectNegotiationState(state.to_string()));
        }
        let transport = match self.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => return Err(Error::ErrIncorrectNegotiationState(state.to_string())),
        };
        self.check_open(&transport)?;

        if self.setting_engine.log_sdp {
            log::info!("answer {sdp}");
        }
        let answer = RTCSessionDescription::answer(sdp.to_owned())?;
        transport
            .set_remote_description(answer)
            .await
            .map_err(|err| match err {
                Error::ErrConnectionClosed => err,
                err => Error::ErrRemoteDescriptionRejected(err.to_string()),
            })?;
        self.check_open(&transport)?;
        self.set_negotiation_state(NegotiationState::Answered);

        for kind in [MediaKind::Audio, MediaKind::Video] {
            self.update_sending(kind).await;
            self.update_receiving(kind).await;
        }

        let released = self.renegotiation.answer_accepted().await;
        if released > 0 {
            log::debug!("answer released {released} deferred enable(s)");
        }
        self.emit(MediaSessionEvent::AnswerAccepted);
        self.set_negotiation_state(NegotiationState::Active);

        Ok(())
    }

    /// on_negotiation_needed runs once per debounced burst of signals.
    pub(crate) async fn on_negotiation_needed(&self) {
        if self.is_ended() {
            return;
        }
        log::debug!("[{}] negotiation needed", self.id);
        self.renegotiation.negotiation_needed().await;
        self.emit(MediaSessionEvent::NegotiationNeeded);
    }

    fn set_offer_to_receive(&self, kind: MediaKind, offer_to_receive: bool) {
        if self.is_ended() {
            return;
        }
        let flag = match kind {
            MediaKind::Audio => &self.offer_to_receive_audio,
            MediaKind::Video => &self.offer_to_receive_video,
            MediaKind::Unspecified => return,
        };
        if flag.swap(offer_to_receive, Ordering::SeqCst) == offer_to_receive {
            return;
        }

        // routed through the transport channel so it is debounced and ordered
        // with the signals of the transport itself
        if self.renegotiation.is_bound() {
            let _ = self
                .transport_events_tx
                .send(TransportEvent::NegotiationNeeded);
        }
    }

    async fn end(&self) {
        if self.ended.swap(true, Ordering::SeqCst) {
            return;
        }
        log::debug!("[{}] ending media session", self.id);

        self.negotiation_state
            .store(NegotiationState::Ended as u8, Ordering::SeqCst);
        self.close_tx.send_replace(true);
        self.renegotiation.cancel_all().await;

        if let Some(transport) = self.transport.get() {
            self.end_all_streams(transport).await;
            if transport.signaling_state() != RTCSignalingState::Closed {
                if let Err(err) = transport.close().await {
                    log::warn!("failed to close transport: {err}");
                }
            }
        }

        if let Some(stream) = self.local_stream.swap(None) {
            stream.stop().await;
        }
        if let Some(stream) = self.remote_stream.swap(None) {
            stream.stop().await;
        }

        for kind in [MediaKind::Audio, MediaKind::Video] {
            self.set_sending(kind, false);
            self.set_receiving(kind, false);
        }
        self.emit(MediaSessionEvent::Ended);
    }
}
