//! In-memory transport and capture devices for tests

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sdp::{MediaDescription, SessionDescription};
use tokio::sync::Notify;

use crate::error::{Error, Result};
use crate::media_devices::MediaDevices;
use crate::media_stream::{
    intent_enabled, wants_any, MediaKind, MediaStream, MediaStreamConstraints, MediaStreamTrack,
};
use crate::peer_connection::configuration::RTCConfiguration;
use crate::peer_connection::offer_answer_options::RTCOfferOptions;
use crate::peer_connection::sdp::session_description::RTCSessionDescription;
use crate::peer_connection::signaling_state::RTCSignalingState;
use crate::peer_connection::{
    PeerTransport, TransportEvent, TransportEventSender, TransportFactory,
};

const MOCK_CANDIDATE: &str = "candidate:1 1 udp 2130706431 192.0.2.1 50000 typ host";

/// MockTransport generates descriptions from its attached tracks and reports
/// the usual transport signals on the session channel.
pub(crate) struct MockTransport {
    events_tx: Mutex<Option<TransportEventSender>>,
    local_streams: Mutex<Vec<Arc<MediaStream>>>,
    remote_streams: Mutex<Vec<Arc<MediaStream>>>,
    local_description: Mutex<Option<RTCSessionDescription>>,
    remote_description: Mutex<Option<RTCSessionDescription>>,
    offer_options: Mutex<Vec<RTCOfferOptions>>,
    signaling_state: AtomicU8,

    pub(crate) include_h264: AtomicBool,
    pub(crate) complete_gathering: AtomicBool,
    pub(crate) drop_bandwidth_lines: AtomicBool,
    pub(crate) reject_remote: AtomicBool,
    pub(crate) close_calls: AtomicUsize,
    remote_track_counter: AtomicUsize,
}

impl Default for MockTransport {
    fn default() -> Self {
        MockTransport {
            events_tx: Mutex::new(None),
            local_streams: Mutex::new(vec![]),
            remote_streams: Mutex::new(vec![]),
            local_description: Mutex::new(None),
            remote_description: Mutex::new(None),
            offer_options: Mutex::new(vec![]),
            signaling_state: AtomicU8::new(RTCSignalingState::Stable as u8),
            include_h264: AtomicBool::new(true),
            complete_gathering: AtomicBool::new(true),
            drop_bandwidth_lines: AtomicBool::new(false),
            reject_remote: AtomicBool::new(false),
            close_calls: AtomicUsize::new(0),
            remote_track_counter: AtomicUsize::new(0),
        }
    }
}

impl MockTransport {
    fn send(&self, event: TransportEvent) {
        if let Some(events_tx) = &*self.events_tx.lock().unwrap() {
            let _ = events_tx.send(event);
        }
    }

    fn is_closed(&self) -> bool {
        self.signaling_state() == RTCSignalingState::Closed
    }

    fn set_signaling_state(&self, state: RTCSignalingState) {
        self.signaling_state.store(state as u8, Ordering::SeqCst);
        self.send(TransportEvent::SignalingStateChange(state));
    }

    pub(crate) fn last_offer_options(&self) -> Option<RTCOfferOptions> {
        self.offer_options.lock().unwrap().last().copied()
    }

    pub(crate) fn local_stream_count(&self) -> usize {
        self.local_streams.lock().unwrap().len()
    }

    /// push_remote_track announces a new remote track of `kind` on the
    /// shared remote stream.
    pub(crate) async fn push_remote_track(&self, kind: MediaKind) -> Arc<MediaStreamTrack> {
        let n = self.remote_track_counter.fetch_add(1, Ordering::SeqCst);
        let track = Arc::new(MediaStreamTrack::new(
            format!("remote-{kind}-{n}"),
            kind,
            format!("remote {kind}"),
        ));

        let stream = {
            let mut remote_streams = self.remote_streams.lock().unwrap();
            if remote_streams.is_empty() {
                remote_streams.push(Arc::new(MediaStream::new("remote", vec![])));
            }
            Arc::clone(&remote_streams[0])
        };
        stream.add_track(Arc::clone(&track)).await;

        self.send(TransportEvent::Track {
            track: Arc::clone(&track),
            streams: vec![stream],
        });
        track
    }

    /// end_remote_track ends a remote track the way the remote side would.
    pub(crate) fn end_remote_track(&self, track: &MediaStreamTrack) {
        track.mark_ended();
        self.send(TransportEvent::TrackEnded {
            track_id: track.id().to_owned(),
        });
    }

    /// signal_negotiation_needed fires a bare negotiation-needed signal.
    pub(crate) fn signal_negotiation_needed(&self) {
        self.send(TransportEvent::NegotiationNeeded);
    }

    async fn has_local_kind(&self, kind: MediaKind) -> bool {
        let streams = self.local_streams.lock().unwrap().clone();
        for stream in streams {
            if !stream.get_tracks_of_kind(kind).await.is_empty() {
                return true;
            }
        }
        false
    }
}

/// answer_for builds an answer accepting every section of `offer`.
pub(crate) fn answer_for(offer: &str) -> String {
    let parsed = match RTCSessionDescription::offer(offer.to_owned()).unmarshal() {
        Ok(parsed) => parsed,
        Err(err) => panic!("offer does not parse: {err}"),
    };

    let mut answer = SessionDescription::new_jsep_session_description(false);
    for md in &parsed.media_descriptions {
        let mut media = MediaDescription::new_jsep_media_description(
            md.media_name.media.clone(),
            vec![],
        );
        for attr in &md.attributes {
            if attr.key == "mid" || attr.key == "rtpmap" || attr.key == "fmtp" {
                media = media.with_value_attribute(
                    attr.key.clone(),
                    attr.value.clone().unwrap_or_default(),
                );
            }
        }
        media.media_name.formats = md.media_name.formats.clone();
        answer = answer.with_media(media.with_property_attribute("sendrecv".to_owned()));
    }
    answer.marshal()
}

#[async_trait]
impl PeerTransport for MockTransport {
    async fn create_offer(&self, options: Option<RTCOfferOptions>) -> Result<RTCSessionDescription> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        let options = options.unwrap_or_default();
        self.offer_options.lock().unwrap().push(options);

        let sending_audio = self.has_local_kind(MediaKind::Audio).await;
        let sending_video = self.has_local_kind(MediaKind::Video).await;

        let mut d = SessionDescription::new_jsep_session_description(false);
        let mut mid = 0;
        for (kind, sending, receiving) in [
            (MediaKind::Audio, sending_audio, options.offer_to_receive_audio),
            (MediaKind::Video, sending_video, options.offer_to_receive_video),
        ] {
            if !sending && !receiving {
                continue;
            }

            let mut md = MediaDescription::new_jsep_media_description(kind.to_string(), vec![])
                .with_value_attribute("mid".to_owned(), mid.to_string());
            md = match kind {
                MediaKind::Audio => md.with_codec(
                    111,
                    "opus".to_owned(),
                    48000,
                    2,
                    "minptime=10;useinbandfec=1".to_owned(),
                ),
                _ => {
                    let md = md.with_codec(96, "VP8".to_owned(), 90000, 0, String::new());
                    if self.include_h264.load(Ordering::SeqCst) {
                        md.with_codec(
                            102,
                            "H264".to_owned(),
                            90000,
                            0,
                            "level-asymmetry-allowed=1;packetization-mode=1;profile-level-id=42e01f"
                                .to_owned(),
                        )
                    } else {
                        md
                    }
                }
            };

            let direction = match (sending, receiving) {
                (true, true) => "sendrecv",
                (true, false) => "sendonly",
                _ => "recvonly",
            };
            d = d.with_media(md.with_property_attribute(direction.to_owned()));
            mid += 1;
        }

        Ok(RTCSessionDescription::offer(d.marshal()))
    }

    async fn set_local_description(&self, mut desc: RTCSessionDescription) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        desc.unmarshal()?;

        if self.drop_bandwidth_lines.load(Ordering::SeqCst) {
            desc.sdp = desc
                .sdp
                .split("\r\n")
                .filter(|line| !line.starts_with("b=TIAS:"))
                .collect::<Vec<_>>()
                .join("\r\n");
        }
        *self.local_description.lock().unwrap() = Some(desc);
        self.set_signaling_state(RTCSignalingState::HaveLocalOffer);

        if self.complete_gathering.load(Ordering::SeqCst) {
            self.send(TransportEvent::IceCandidate(Some(MOCK_CANDIDATE.to_owned())));
            self.send(TransportEvent::IceCandidate(None));
        }
        Ok(())
    }

    async fn local_description(&self) -> Option<RTCSessionDescription> {
        self.local_description.lock().unwrap().clone()
    }

    async fn set_remote_description(&self, desc: RTCSessionDescription) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        if self.reject_remote.load(Ordering::SeqCst) {
            return Err(Error::ErrTransportOperation(
                "remote description does not match the local offer".to_owned(),
            ));
        }
        desc.unmarshal()?;

        *self.remote_description.lock().unwrap() = Some(desc);
        self.set_signaling_state(RTCSignalingState::Stable);
        Ok(())
    }

    async fn remote_description(&self) -> Option<RTCSessionDescription> {
        self.remote_description.lock().unwrap().clone()
    }

    async fn add_stream(&self, stream: Arc<MediaStream>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        {
            let mut local_streams = self.local_streams.lock().unwrap();
            if !local_streams.iter().any(|s| Arc::ptr_eq(s, &stream)) {
                local_streams.push(stream);
            }
        }
        self.send(TransportEvent::NegotiationNeeded);
        Ok(())
    }

    async fn add_track(&self, _track: Arc<MediaStreamTrack>, stream: Arc<MediaStream>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        let attached = self
            .local_streams
            .lock()
            .unwrap()
            .iter()
            .any(|s| Arc::ptr_eq(s, &stream));
        if !attached {
            return Err(Error::ErrTransportOperation(
                "stream is not attached".to_owned(),
            ));
        }
        self.send(TransportEvent::NegotiationNeeded);
        Ok(())
    }

    async fn remove_stream(&self, stream: &Arc<MediaStream>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ErrConnectionClosed);
        }
        self.local_streams
            .lock()
            .unwrap()
            .retain(|s| !Arc::ptr_eq(s, stream));
        self.send(TransportEvent::NegotiationNeeded);
        Ok(())
    }

    async fn local_streams(&self) -> Vec<Arc<MediaStream>> {
        self.local_streams.lock().unwrap().clone()
    }

    async fn remote_streams(&self) -> Vec<Arc<MediaStream>> {
        self.remote_streams.lock().unwrap().clone()
    }

    fn signaling_state(&self) -> RTCSignalingState {
        self.signaling_state.load(Ordering::SeqCst).into()
    }

    async fn close(&self) -> Result<()> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_closed() {
            self.set_signaling_state(RTCSignalingState::Closed);
        }
        Ok(())
    }
}

/// MockTransportFactory hands out one shared [`MockTransport`].
#[derive(Default)]
pub(crate) struct MockTransportFactory {
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) created: AtomicUsize,
}

#[async_trait]
impl TransportFactory for MockTransportFactory {
    async fn new_transport(
        &self,
        _configuration: RTCConfiguration,
        events: TransportEventSender,
    ) -> Result<Arc<dyn PeerTransport>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        *self.transport.events_tx.lock().unwrap() = Some(events);
        Ok(Arc::clone(&self.transport) as Arc<dyn PeerTransport>)
    }
}

/// MockMediaDevices opens fake devices, one live track per requested kind.
#[derive(Default)]
pub(crate) struct MockMediaDevices {
    pub(crate) deny: AtomicBool,
    requests: Mutex<Vec<MediaStreamConstraints>>,
    counter: AtomicUsize,
    gate: Mutex<Option<Arc<Notify>>>,
}

impl MockMediaDevices {
    pub(crate) fn requests(&self) -> Vec<MediaStreamConstraints> {
        self.requests.lock().unwrap().clone()
    }

    /// hold parks every later capture until the returned handle is notified
    /// once per parked call.
    pub(crate) fn hold(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }
}

#[async_trait]
impl MediaDevices for MockMediaDevices {
    async fn get_user_media(&self, constraints: &MediaStreamConstraints) -> Result<Arc<MediaStream>> {
        self.requests.lock().unwrap().push(constraints.clone());
        let gate = self.gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.deny.load(Ordering::SeqCst) {
            return Err(Error::ErrMediaAcquisition("permission denied".to_owned()));
        }
        if !wants_any(constraints) {
            return Err(Error::ErrNoMediaRequested);
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let mut tracks = vec![];
        if intent_enabled(&constraints.audio) {
            tracks.push(Arc::new(MediaStreamTrack::new(
                format!("audio-{n}"),
                MediaKind::Audio,
                "mock microphone",
            )));
        }
        if intent_enabled(&constraints.video) {
            tracks.push(Arc::new(MediaStreamTrack::new(
                format!("video-{n}"),
                MediaKind::Video,
                "mock camera",
            )));
        }
        Ok(Arc::new(MediaStream::new(format!("local-{n}"), tracks)))
    }
}
