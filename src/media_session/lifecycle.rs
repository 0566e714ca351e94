use std::sync::Arc;

use tokio::sync::oneshot;

use super::{flow_monitor, MediaSessionInternal};
use crate::error::{Error, Result};
use crate::media_stream::{MediaIntent, MediaKind, MediaStream, MediaStreamTrack};
use crate::peer_connection::signaling_state::RTCSignalingState;
use crate::peer_connection::PeerTransport;

impl MediaSessionInternal {
    /// local_tracks returns every track of `kind` across the streams
    /// attached to the transport.
    pub(crate) async fn local_tracks(
        &self,
        transport: &Arc<dyn PeerTransport>,
        kind: MediaKind,
    ) -> Vec<Arc<MediaStreamTrack>> {
        let mut tracks = vec![];
        for stream in transport.local_streams().await {
            tracks.extend(stream.get_tracks_of_kind(kind).await);
        }
        tracks
    }

    /// apply_intent stores a desired-state write and, once a transport
    /// exists, acts on a flipped flag.
    pub(crate) async fn apply_intent(self: &Arc<Self>, kind: MediaKind, intent: MediaIntent) {
        if self.is_ended() {
            return;
        }

        let (changed, enabled) = {
            let mut desired = self.desired.lock().await;
            let changed = desired.apply(kind, intent);
            (changed, desired.enabled(kind))
        };
        if !changed {
            return;
        }

        // before the first offer the intent is only recorded
        let transport = match self.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => return,
        };

        if !enabled {
            self.stop_sending(&transport, kind).await;
            self.update_sending(kind).await;
            return;
        }

        if !self.local_tracks(&transport, kind).await.is_empty() {
            if let Err(err) = self.start_sending(&transport, kind).await {
                self.emit_error(err);
            }
            self.update_sending(kind).await;
            return;
        }

        match self.renegotiation.defer(kind).await {
            Some(done_rx) => {
                let internal = Arc::clone(self);
                tokio::spawn(async move {
                    internal.deferred_enable(transport, kind, done_rx).await;
                });
            }
            None => log::debug!("{kind} enable already waits for renegotiation"),
        }
    }

    /// deferred_enable acquires and attaches a track of `kind`, then waits
    /// for the renegotiation round the attach triggers before publishing the
    /// new sending state. The desired state is read again on resume, so the
    /// last write wins.
    async fn deferred_enable(
        self: Arc<Self>,
        transport: Arc<dyn PeerTransport>,
        kind: MediaKind,
        done_rx: oneshot::Receiver<()>,
    ) {
        let result: Result<bool> = async {
            // a track may have shown up while this task was queued
            if self.enable_tracks(&transport, kind).await {
                return Ok(false);
            }

            let stream = self.acquire(&transport, kind).await?;
            self.renegotiation.attaching(kind).await;
            self.attach(&transport, stream).await?;
            done_rx
                .await
                .map_err(|_| Error::ErrDeferredEnableCancelled)?;
            Ok(true)
        }
        .await;

        if self.is_ended() {
            return;
        }

        match result {
            Ok(true) => {}
            Ok(false) => self.renegotiation.forget(kind).await,
            Err(err) => {
                self.renegotiation.forget(kind).await;
                self.emit_error(err);
                self.update_sending(kind).await;
                return;
            }
        }

        let still_wanted = self.desired.lock().await.enabled(kind);
        if !still_wanted {
            log::debug!("{kind} was disabled while waiting for renegotiation");
            self.stop_sending(&transport, kind).await;
        }
        self.update_sending(kind).await;
    }

    /// start_sending re-enables existing tracks of `kind` in place. Without
    /// one, a stream of that kind alone is acquired and attached.
    pub(crate) async fn start_sending(
        &self,
        transport: &Arc<dyn PeerTransport>,
        kind: MediaKind,
    ) -> Result<()> {
        if self.enable_tracks(transport, kind).await {
            return Ok(());
        }
        let stream = self.acquire(transport, kind).await?;
        self.attach(transport, stream).await
    }

    /// enable_tracks enables every attached track of `kind` and reports
    /// whether there was any.
    async fn enable_tracks(&self, transport: &Arc<dyn PeerTransport>, kind: MediaKind) -> bool {
        let tracks = self.local_tracks(transport, kind).await;
        for track in &tracks {
            track.set_enabled(true);
        }
        !tracks.is_empty()
    }

    /// acquire captures a stream holding `kind` alone, with the stored
    /// constraint of that kind.
    async fn acquire(
        &self,
        transport: &Arc<dyn PeerTransport>,
        kind: MediaKind,
    ) -> Result<Arc<MediaStream>> {
        let constraints = self.desired.lock().await.constraints_for(kind);
        let stream = self.media_devices.get_user_media(&constraints).await?;
        if let Err(err) = self.check_open(transport) {
            stream.stop().await;
            return Err(err);
        }
        Ok(stream)
    }

    /// attach merges the tracks of `stream` into the attached local stream,
    /// or attaches `stream` as the local stream if there is none.
    async fn attach(&self, transport: &Arc<dyn PeerTransport>, stream: Arc<MediaStream>) -> Result<()> {
        match transport.local_streams().await.into_iter().next() {
            Some(local) => {
                for track in stream.get_tracks().await {
                    local.add_track(Arc::clone(&track)).await;
                    stream.remove_track(track.id()).await;
                    transport.add_track(track, Arc::clone(&local)).await?;
                }
            }
            None => {
                transport.add_stream(Arc::clone(&stream)).await?;
                self.local_stream.store(Some(stream));
            }
        }

        Ok(())
    }

    /// stop_sending disables the tracks of `kind` in place. They stay
    /// attached so re-enabling them needs no renegotiation.
    pub(crate) async fn stop_sending(&self, transport: &Arc<dyn PeerTransport>, kind: MediaKind) {
        for track in self.local_tracks(transport, kind).await {
            track.set_enabled(false);
        }
    }

    pub(crate) async fn replace_local_stream(&self, stream: Arc<MediaStream>) {
        if self.is_ended() {
            return;
        }
        self.local_stream.store(Some(Arc::clone(&stream)));

        let transport = match self.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => return,
        };
        if transport.signaling_state() == RTCSignalingState::Closed {
            return;
        }

        let attached = transport.local_streams().await;
        if attached.iter().any(|s| Arc::ptr_eq(s, &stream)) {
            return;
        }

        for old in &attached {
            if let Err(err) = transport.remove_stream(old).await {
                self.emit_error(err);
            }
        }
        if let Err(err) = transport.add_stream(stream).await {
            self.emit_error(err);
            return;
        }

        let sending_audio = flow_monitor::local_media_status(&transport, MediaKind::Audio).await;
        let sending_video = flow_monitor::local_media_status(&transport, MediaKind::Video).await;
        {
            let mut desired = self.desired.lock().await;
            desired.audio = sending_audio;
            desired.video = sending_video;
        }
        self.set_sending(MediaKind::Audio, sending_audio);
        self.set_sending(MediaKind::Video, sending_video);
    }

    /// end_all_streams stops every track of every local and remote stream
    /// known to the transport, closed or not.
    pub(crate) async fn end_all_streams(&self, transport: &Arc<dyn PeerTransport>) {
        for stream in transport.local_streams().await {
            stream.stop().await;
        }
        for stream in transport.remote_streams().await {
            stream.stop().await;
        }
    }

    pub(crate) async fn on_remote_track(
        &self,
        track: Arc<MediaStreamTrack>,
        streams: Vec<Arc<MediaStream>>,
    ) {
        if self.is_ended() {
            return;
        }
        log::debug!("remote {} track {} arrived", track.kind(), track.id());

        if let Some(stream) = streams.into_iter().next() {
            self.remote_stream.store(Some(stream));
        }
        self.update_receiving(MediaKind::Audio).await;
        self.update_receiving(MediaKind::Video).await;
    }

    pub(crate) async fn on_remote_track_ended(&self, track_id: &str) {
        if self.is_ended() {
            return;
        }
        let transport = match self.transport.get() {
            Some(transport) => Arc::clone(transport),
            None => return,
        };

        let mut streams = transport.remote_streams().await;
        if let Some(remote) = self.remote_stream.load_full() {
            if !streams.iter().any(|s| Arc::ptr_eq(s, &remote)) {
                streams.push(remote);
            }
        }

        let mut kind = None;
        for stream in &streams {
            if let Some(track) = stream.get_track_by_id(track_id).await {
                track.mark_ended();
                kind = Some(track.kind());
                break;
            }
        }

        match kind {
            Some(kind) => {
                log::debug!("remote {kind} track {track_id} ended");
                self.update_receiving(kind).await;
            }
            None => {
                log::debug!("unknown remote track {track_id} ended");
                self.update_receiving(MediaKind::Audio).await;
                self.update_receiving(MediaKind::Video).await;
            }
        }
    }
}
