//! Rodio-backed audio output
//!
//! A dedicated worker thread owns the output stream (rodio handles are
//! not Send) and drains a command channel. Sources are fetched over HTTP
//! into a temp file and decoded from there; the temp file lives as long
//! as the sink that reads it.

use super::{AudioBackend, BackendEvent, EventSender};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// Give up on a source that has not become ready within this window
const READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Worker poll interval; also the progress report cadence
const TICK: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum Command {
    Play { token: u64, url: String },
    Pause,
    Resume,
    Stop,
    Seek(f64),
    SetVolume(f32),
}

/// [`AudioBackend`] implementation over a rodio worker thread
pub struct RodioBackend {
    tx: mpsc::Sender<Command>,
}

impl RodioBackend {
    /// Spawn the worker thread. A machine without an audio device still
    /// gets a functional backend; every play attempt on it fails with a
    /// `Failed` event instead of panicking.
    pub fn spawn(events: EventSender) -> Self {
        let (tx, rx) = mpsc::channel();

        thread::Builder::new()
            .name("lyra-audio".to_string())
            .spawn(move || worker_loop(rx, events))
            .expect("spawn audio worker thread");

        Self { tx }
    }

    fn send(&self, cmd: Command) {
        // Worker outlives the backend handle; a send failure means the
        // process is already tearing down
        let _ = self.tx.send(cmd);
    }
}

impl AudioBackend for RodioBackend {
    fn play(&mut self, token: u64, url: &str) {
        self.send(Command::Play {
            token,
            url: url.to_string(),
        });
    }

    fn pause(&mut self) {
        self.send(Command::Pause);
    }

    fn resume(&mut self) {
        self.send(Command::Resume);
    }

    fn stop(&mut self) {
        self.send(Command::Stop);
    }

    fn seek(&mut self, position: f64) {
        self.send(Command::Seek(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.send(Command::SetVolume(volume));
    }
}

/// Everything the worker tracks about the loaded source
struct LoadedSource {
    sink: Sink,
    token: u64,
    duration: Option<f64>,
    ended_reported: bool,
    /// Keeps the backing file alive while the sink reads it
    _temp: NamedTempFile,
}

fn worker_loop(rx: mpsc::Receiver<Command>, events: EventSender) {
    let stream = OutputStream::try_default();
    let handle = match &stream {
        Ok((_, handle)) => Some(handle.clone()),
        Err(e) => {
            warn!("No audio output device available: {}", e);
            None
        }
    };

    let http = reqwest::blocking::Client::builder()
        .timeout(READY_TIMEOUT)
        .build()
        .ok();

    let mut source: Option<LoadedSource> = None;
    let mut volume: f32 = 1.0;

    loop {
        match rx.recv_timeout(TICK) {
            Ok(Command::Play { token, url }) => {
                source = None;

                let result = match (&handle, &http) {
                    (Some(handle), Some(http)) => load_source(http, handle, &url, volume),
                    _ => Err("no audio output device".to_string()),
                };

                match result {
                    Ok((sink, duration, temp)) => {
                        info!("Playing {}", url);
                        let _ = events.send(BackendEvent::Started { token, duration });
                        source = Some(LoadedSource {
                            sink,
                            token,
                            duration,
                            ended_reported: false,
                            _temp: temp,
                        });
                    }
                    Err(message) => {
                        warn!("Audio load failed for {}: {}", url, message);
                        let _ = events.send(BackendEvent::Failed { token, message });
                    }
                }
            }
            Ok(Command::Pause) => {
                if let Some(s) = &source {
                    s.sink.pause();
                }
            }
            Ok(Command::Resume) => {
                if let Some(s) = &source {
                    s.sink.play();
                }
            }
            Ok(Command::Stop) => {
                if let Some(s) = source.take() {
                    s.sink.stop();
                }
            }
            Ok(Command::Seek(position)) => {
                if let Some(s) = &source {
                    // Bounds check against the known duration; unknown
                    // durations only reject negative targets
                    let in_range = position.is_finite()
                        && position >= 0.0
                        && s.duration.map(|d| position <= d).unwrap_or(true);
                    if in_range {
                        if let Err(e) = s.sink.try_seek(Duration::from_secs_f64(position)) {
                            warn!("Seek to {:.1}s not supported: {}", position, e);
                        }
                    }
                }
            }
            Ok(Command::SetVolume(v)) => {
                volume = v;
                if let Some(s) = &source {
                    s.sink.set_volume(v);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                if let Some(s) = &mut source {
                    if s.sink.empty() {
                        if !s.ended_reported {
                            s.ended_reported = true;
                            let _ = events.send(BackendEvent::Ended { token: s.token });
                        }
                    } else if !s.sink.is_paused() {
                        let _ = events.send(BackendEvent::Progress {
                            token: s.token,
                            position: s.sink.get_pos().as_secs_f64(),
                        });
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Fetch, decode and start a source; returns the playing sink, the
/// decoder-reported duration, and the temp file backing the sink.
fn load_source(
    http: &reqwest::blocking::Client,
    handle: &OutputStreamHandle,
    url: &str,
    volume: f32,
) -> Result<(Sink, Option<f64>, NamedTempFile), String> {
    let mut temp = NamedTempFile::new().map_err(|e| format!("temp file: {e}"))?;

    let mut response = http
        .get(url)
        .send()
        .map_err(|e| format!("fetch: {e}"))?;
    if !response.status().is_success() {
        return Err(format!("fetch: HTTP {}", response.status()));
    }

    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = response.read(&mut buf).map_err(|e| format!("fetch: {e}"))?;
        if n == 0 {
            break;
        }
        temp.write_all(&buf[..n])
            .map_err(|e| format!("temp file: {e}"))?;
    }

    let file = File::open(temp.path()).map_err(|e| format!("temp file: {e}"))?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| format!("decode: {e}"))?;
    let duration = decoder.total_duration().map(|d| d.as_secs_f64());

    let sink = Sink::try_new(handle).map_err(|e| format!("sink: {e}"))?;
    sink.set_volume(volume);
    sink.append(decoder);
    sink.play();

    Ok((sink, duration, temp))
}
