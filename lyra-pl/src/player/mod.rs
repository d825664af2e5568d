//! Playback state machine
//!
//! Tracks the current song, playlist position, transport mode and volume,
//! and drives the injected audio backend. The player is the sole mutator
//! of playback state: HTTP handlers and the backend event pump both go
//! through one instance behind a lock, so no operation ever observes a
//! half-applied transition.
//!
//! Transport lifecycle: Idle (no current song) → Selected (song chosen,
//! audio absent or not confirmed) → Playing ⇄ Paused, with end-of-track
//! auto-advancing to the next playlist entry. Starting playback is
//! optimistic: `play_song` enters Playing as soon as the backend accepts
//! the load and a later `Failed` event reverts to Selected.

use lyra_common::api::PlayerSnapshot;
use lyra_common::db::models::Song;
use lyra_common::events::{PlayerEvent, Transport};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::backend::{AudioBackend, BackendEvent};

/// Playback state machine; owns the audio backend for its lifetime
pub struct Player {
    backend: Box<dyn AudioBackend>,
    events: broadcast::Sender<PlayerEvent>,

    current_song: Option<Song>,
    playlist: Vec<Song>,
    /// Position of the current song within the playlist; None when there
    /// is no current song or it is absent from the playlist
    current_index: Option<usize>,
    transport: Transport,
    /// Seconds into the current song
    position: f64,
    /// Length of the current song in seconds (0 when unknown)
    duration: f64,
    volume: f32,

    /// Generation counter for backend loads; events tagged with an older
    /// token belong to a superseded load and are discarded
    play_token: u64,
}

impl Player {
    pub fn new(backend: Box<dyn AudioBackend>, events: broadcast::Sender<PlayerEvent>) -> Self {
        Self {
            backend,
            events,
            current_song: None,
            playlist: Vec::new(),
            current_index: None,
            transport: Transport::Idle,
            position: 0.0,
            duration: 0.0,
            volume: 1.0,
            play_token: 0,
        }
    }

    // ========================================
    // Operations
    // ========================================

    /// Select `song` and start playing it when it has audio.
    ///
    /// The song becomes current unconditionally, even without an audio
    /// URL; in that case the player stays in Selected and logs a warning
    /// instead of erroring.
    pub fn play_song(&mut self, song: Song) {
        self.play_token += 1;
        let token = self.play_token;

        self.current_index = self.playlist.iter().position(|s| s.guid == song.guid);
        self.position = 0.0;
        self.duration = song.duration.unwrap_or(0.0);
        self.current_song = Some(song.clone());

        self.emit(PlayerEvent::TrackSelected {
            song: song.clone(),
            index: self.wire_index(),
            timestamp: chrono::Utc::now(),
        });

        if !song.has_audio() {
            warn!(
                "No audio URL for song \"{}\" by {}",
                song.title, song.artist_name
            );
            self.backend.stop();
            self.set_transport(Transport::Selected);
            return;
        }

        // Optimistic: report Playing now, revert on the Failed event
        let url = song.audio_url.as_deref().unwrap_or_default();
        self.backend.play(token, url);
        self.set_transport(Transport::Playing);
    }

    /// Playing → Paused, Paused → Playing. No-op from Idle and from
    /// Selected (nothing loaded to resume).
    pub fn toggle_play_pause(&mut self) {
        match self.transport {
            Transport::Playing => {
                self.backend.pause();
                self.set_transport(Transport::Paused);
            }
            Transport::Paused => {
                self.backend.resume();
                self.set_transport(Transport::Playing);
            }
            Transport::Idle | Transport::Selected => {}
        }
    }

    /// Advance to the next playlist entry, wrapping at the end.
    /// No-op when the playlist is empty.
    pub fn play_next(&mut self) {
        let Some(next) = self.step(1) else { return };
        let song = self.playlist[next].clone();
        self.play_song(song);
    }

    /// Step back to the previous playlist entry, wrapping at the start.
    /// No-op when the playlist is empty.
    pub fn play_previous(&mut self) {
        let Some(prev) = self.step(-1) else { return };
        let song = self.playlist[prev].clone();
        self.play_song(song);
    }

    /// Next playlist index in the given direction, modulo playlist
    /// length. With no current index (nothing current, or current not in
    /// the playlist) both directions start at the head.
    fn step(&self, direction: i64) -> Option<usize> {
        let len = self.playlist.len();
        if len == 0 {
            return None;
        }
        Some(match self.current_index {
            Some(i) => ((i as i64 + direction).rem_euclid(len as i64)) as usize,
            None => 0,
        })
    }

    /// Clamp and apply the master volume; effective in every transport
    /// state.
    pub fn set_volume(&mut self, volume: f32) {
        if !volume.is_finite() {
            return;
        }
        let clamped = volume.clamp(0.0, 1.0);
        self.volume = clamped;
        self.backend.set_volume(clamped);
        self.emit(PlayerEvent::VolumeChanged {
            volume: clamped,
            timestamp: chrono::Utc::now(),
        });
    }

    /// Seek within the loaded source. Delegated to the backend, whose
    /// bounds check silently ignores out-of-range targets. No-op when
    /// nothing is loaded.
    pub fn seek_to(&mut self, position: f64) {
        match self.transport {
            Transport::Playing | Transport::Paused => self.backend.seek(position),
            Transport::Idle | Transport::Selected => {}
        }
    }

    /// Replace the playlist. The current song survives only if its guid
    /// exists in the new list; otherwise the player resets to Idle and
    /// releases the audio source.
    pub fn set_playlist(&mut self, songs: Vec<Song>) {
        self.playlist = songs;

        let retained = match &self.current_song {
            Some(current) => {
                let pos = self.playlist.iter().position(|s| s.guid == current.guid);
                self.current_index = pos;
                pos.is_some()
            }
            None => {
                self.current_index = None;
                false
            }
        };

        if self.current_song.is_some() && !retained {
            self.current_song = None;
            self.position = 0.0;
            self.duration = 0.0;
            self.backend.stop();
            self.set_transport(Transport::Idle);
        }

        self.emit(PlayerEvent::PlaylistReplaced {
            length: self.playlist.len(),
            current_retained: retained,
            timestamp: chrono::Utc::now(),
        });
    }

    // ========================================
    // Backend events
    // ========================================

    /// Apply a backend event. Events from superseded loads are discarded.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        let token = match &event {
            BackendEvent::Started { token, .. }
            | BackendEvent::Progress { token, .. }
            | BackendEvent::Ended { token }
            | BackendEvent::Failed { token, .. } => *token,
        };
        if token != self.play_token {
            debug!("Discarding stale backend event (token {})", token);
            return;
        }

        match event {
            BackendEvent::Started { duration, .. } => {
                // Decoder duration beats catalog metadata when available
                if let Some(d) = duration {
                    self.duration = d;
                }
                if let Some(song) = &self.current_song {
                    self.emit(PlayerEvent::TrackStarted {
                        song_guid: song.guid,
                        duration,
                        timestamp: chrono::Utc::now(),
                    });
                }
            }
            BackendEvent::Progress { position, .. } => {
                self.position = position;
                self.emit(PlayerEvent::PlaybackProgress {
                    position,
                    duration: self.duration,
                    timestamp: chrono::Utc::now(),
                });
            }
            BackendEvent::Ended { .. } => {
                self.position = self.duration;
                if let Some(song) = &self.current_song {
                    self.emit(PlayerEvent::TrackEnded {
                        song_guid: song.guid,
                        timestamp: chrono::Utc::now(),
                    });
                }
                self.set_transport(Transport::Selected);
                self.play_next();
            }
            BackendEvent::Failed { message, .. } => {
                // Transient playback failure: revert, never propagate
                warn!("Playback failed: {}", message);
                if let Some(song) = &self.current_song {
                    self.emit(PlayerEvent::PlaybackFailed {
                        song_guid: song.guid,
                        message,
                        timestamp: chrono::Utc::now(),
                    });
                }
                self.set_transport(Transport::Selected);
            }
        }
    }

    // ========================================
    // State access
    // ========================================

    /// Wire representation of the playlist index (-1 when unset)
    fn wire_index(&self) -> i64 {
        self.current_index.map(|i| i as i64).unwrap_or(-1)
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current_song: self.current_song.clone(),
            transport: self.transport,
            is_playing: self.transport.is_playing(),
            current_index: self.wire_index(),
            position: self.position,
            duration: self.duration,
            volume: self.volume,
            playlist: self.playlist.clone(),
        }
    }

    fn set_transport(&mut self, new_state: Transport) {
        if self.transport == new_state {
            return;
        }
        let old_state = self.transport;
        self.transport = new_state;
        self.emit(PlayerEvent::StateChanged {
            old_state,
            new_state,
            timestamp: chrono::Utc::now(),
        });
    }

    fn emit(&self, event: PlayerEvent) {
        // No receivers is fine; SSE clients come and go
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    /// Records commands and hands out the tokens passed to play
    #[derive(Default)]
    struct MockState {
        calls: Vec<String>,
        tokens: Vec<u64>,
    }

    #[derive(Clone, Default)]
    struct MockBackend {
        state: Arc<Mutex<MockState>>,
    }

    impl MockBackend {
        fn calls(&self) -> Vec<String> {
            self.state.lock().unwrap().calls.clone()
        }

        fn last_token(&self) -> u64 {
            *self.state.lock().unwrap().tokens.last().expect("no play issued")
        }
    }

    impl AudioBackend for MockBackend {
        fn play(&mut self, token: u64, url: &str) {
            let mut s = self.state.lock().unwrap();
            s.calls.push(format!("play {url}"));
            s.tokens.push(token);
        }
        fn pause(&mut self) {
            self.state.lock().unwrap().calls.push("pause".to_string());
        }
        fn resume(&mut self) {
            self.state.lock().unwrap().calls.push("resume".to_string());
        }
        fn stop(&mut self) {
            self.state.lock().unwrap().calls.push("stop".to_string());
        }
        fn seek(&mut self, position: f64) {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(format!("seek {position}"));
        }
        fn set_volume(&mut self, volume: f32) {
            self.state
                .lock()
                .unwrap()
                .calls
                .push(format!("volume {volume}"));
        }
    }

    fn song(title: &str, audio: bool) -> Song {
        Song {
            guid: Uuid::new_v4(),
            title: title.to_string(),
            duration: Some(180.0),
            artist_guid: Uuid::new_v4(),
            artist_name: "Test Artist".to_string(),
            album_guid: Uuid::new_v4(),
            album_name: "Test Album".to_string(),
            image_url: None,
            audio_url: audio.then(|| format!("https://cdn.example.com/{title}.mp3")),
        }
    }

    fn player() -> (Player, MockBackend) {
        let backend = MockBackend::default();
        let (tx, _) = broadcast::channel(64);
        (Player::new(Box::new(backend.clone()), tx), backend)
    }

    #[test]
    fn test_play_song_with_audio_enters_playing() {
        let (mut p, backend) = player();
        let s = song("track", true);

        p.play_song(s.clone());

        let snap = p.snapshot();
        assert!(snap.is_playing);
        assert_eq!(snap.transport, Transport::Playing);
        assert_eq!(snap.current_song.unwrap().guid, s.guid);
        assert_eq!(snap.position, 0.0);
        assert_eq!(snap.duration, 180.0);
        assert!(backend.calls().iter().any(|c| c.starts_with("play ")));
    }

    #[test]
    fn test_play_song_without_audio_never_plays() {
        let (mut p, backend) = player();

        p.play_song(song("silent", false));

        let snap = p.snapshot();
        assert!(!snap.is_playing);
        assert_eq!(snap.transport, Transport::Selected);
        assert!(snap.current_song.is_some());
        assert!(!backend.calls().iter().any(|c| c.starts_with("play ")));
    }

    #[test]
    fn test_song_outside_playlist_has_wire_index_minus_one() {
        let (mut p, _) = player();
        p.set_playlist(vec![song("a", true), song("b", true)]);

        p.play_song(song("stray", true));

        assert_eq!(p.snapshot().current_index, -1);
    }

    #[test]
    fn test_next_and_previous_wrap() {
        let (mut p, _) = player();
        let list = vec![song("a", true), song("b", true), song("c", true)];
        p.set_playlist(list.clone());

        // Start at C (index 2); next wraps to A
        p.play_song(list[2].clone());
        p.play_next();
        assert_eq!(p.snapshot().current_index, 0);

        // Previous from A wraps back to C
        p.play_previous();
        assert_eq!(p.snapshot().current_index, 2);

        // Forward walk covers every index modulo the length
        for expected in [0, 1, 2, 0] {
            p.play_next();
            assert_eq!(p.snapshot().current_index, expected);
        }
    }

    #[test]
    fn test_next_with_empty_playlist_is_noop() {
        let (mut p, _) = player();
        let s = song("solo", true);
        p.play_song(s.clone());

        p.play_next();
        p.play_previous();

        let snap = p.snapshot();
        assert_eq!(snap.current_song.unwrap().guid, s.guid);
    }

    #[test]
    fn test_toggle_from_selected_without_audio_is_noop() {
        let (mut p, backend) = player();
        p.play_song(song("silent", false));

        p.toggle_play_pause();

        assert!(!p.snapshot().is_playing);
        assert!(!backend.calls().contains(&"resume".to_string()));
    }

    #[test]
    fn test_toggle_pauses_and_resumes() {
        let (mut p, backend) = player();
        p.play_song(song("track", true));

        p.toggle_play_pause();
        assert_eq!(p.snapshot().transport, Transport::Paused);
        assert!(backend.calls().contains(&"pause".to_string()));

        p.toggle_play_pause();
        assert_eq!(p.snapshot().transport, Transport::Playing);
        assert!(backend.calls().contains(&"resume".to_string()));
    }

    #[test]
    fn test_volume_is_clamped() {
        let (mut p, _) = player();

        p.set_volume(1.5);
        assert_eq!(p.snapshot().volume, 1.0);

        p.set_volume(-0.5);
        assert_eq!(p.snapshot().volume, 0.0);

        p.set_volume(0.42);
        assert_eq!(p.snapshot().volume, 0.42);

        p.set_volume(f32::NAN);
        assert_eq!(p.snapshot().volume, 0.42);
    }

    #[test]
    fn test_set_playlist_retains_current_when_present() {
        let (mut p, _) = player();
        let keep = song("keep", true);
        p.play_song(keep.clone());

        p.set_playlist(vec![song("x", true), keep.clone(), song("y", true)]);

        let snap = p.snapshot();
        assert_eq!(snap.current_song.unwrap().guid, keep.guid);
        assert_eq!(snap.current_index, 1);
        assert!(snap.is_playing);
    }

    #[test]
    fn test_set_playlist_resets_to_idle_when_current_absent() {
        let (mut p, backend) = player();
        p.play_song(song("gone", true));

        p.set_playlist(vec![song("x", true), song("y", true)]);

        let snap = p.snapshot();
        assert!(snap.current_song.is_none());
        assert_eq!(snap.current_index, -1);
        assert_eq!(snap.transport, Transport::Idle);
        assert!(!snap.is_playing);
        assert!(backend.calls().contains(&"stop".to_string()));
    }

    #[test]
    fn test_failed_load_reverts_to_selected() {
        let (mut p, backend) = player();
        let s = song("flaky", true);
        p.play_song(s.clone());
        assert!(p.snapshot().is_playing);

        p.handle_backend_event(BackendEvent::Failed {
            token: backend.last_token(),
            message: "fetch: HTTP 404".to_string(),
        });

        let snap = p.snapshot();
        assert!(!snap.is_playing);
        assert_eq!(snap.transport, Transport::Selected);
        // The song stays selected; failure is not an error to the caller
        assert_eq!(snap.current_song.unwrap().guid, s.guid);
    }

    #[test]
    fn test_stale_backend_events_are_discarded() {
        let (mut p, backend) = player();
        p.play_song(song("first", true));
        let stale = backend.last_token();

        p.play_song(song("second", true));

        p.handle_backend_event(BackendEvent::Failed {
            token: stale,
            message: "late failure from the superseded load".to_string(),
        });

        // The second load is unaffected
        assert!(p.snapshot().is_playing);
    }

    #[test]
    fn test_ended_auto_advances_with_wrap() {
        let (mut p, backend) = player();
        let list = vec![song("a", true), song("b", true), song("c", true)];
        p.set_playlist(list.clone());
        p.play_song(list[2].clone());

        p.handle_backend_event(BackendEvent::Ended {
            token: backend.last_token(),
        });

        let snap = p.snapshot();
        assert_eq!(snap.current_index, 0);
        assert_eq!(snap.current_song.unwrap().guid, list[0].guid);
        assert!(snap.is_playing);
    }

    #[test]
    fn test_ended_with_empty_playlist_stops_quietly() {
        let (mut p, backend) = player();
        p.play_song(song("solo", true));

        p.handle_backend_event(BackendEvent::Ended {
            token: backend.last_token(),
        });

        let snap = p.snapshot();
        assert!(!snap.is_playing);
        assert_eq!(snap.transport, Transport::Selected);
        assert!(snap.current_song.is_some());
    }

    #[test]
    fn test_started_event_updates_duration_from_decoder() {
        let (mut p, backend) = player();
        p.play_song(song("track", true));

        p.handle_backend_event(BackendEvent::Started {
            token: backend.last_token(),
            duration: Some(200.5),
        });

        assert_eq!(p.snapshot().duration, 200.5);
    }

    #[test]
    fn test_seek_ignored_when_nothing_loaded() {
        let (mut p, backend) = player();
        p.play_song(song("silent", false));

        p.seek_to(30.0);
        assert!(!backend.calls().iter().any(|c| c.starts_with("seek ")));

        p.play_song(song("track", true));
        p.seek_to(30.0);
        assert!(backend.calls().contains(&"seek 30".to_string()));
    }

    #[test]
    fn test_progress_updates_position() {
        let (mut p, backend) = player();
        p.play_song(song("track", true));

        p.handle_backend_event(BackendEvent::Progress {
            token: backend.last_token(),
            position: 42.5,
        });

        assert_eq!(p.snapshot().position, 42.5);
    }
}
