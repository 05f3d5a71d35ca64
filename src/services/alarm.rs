//! Completion alarm playback

use std::{
    fs,
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use tracing::{debug, info, warn};

/// Alarm sound shipped with the binary
pub const BUNDLED_ALARM: &[u8] = include_bytes!("../../assets/alarm.wav");

/// How often the playback thread checks whether it was silenced
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Plays the alarm sound when a countdown finishes
pub trait AlarmPlayer: Send {
    /// Start playing, repeating the sound `loop_count` times
    fn play(&mut self, loop_count: u32);

    /// Silence any playback in progress
    fn stop(&mut self);
}

/// Read the alarm asset from `path`, or use the bundled sound
pub fn read_alarm_asset(path: Option<&Path>) -> Result<Arc<[u8]>, String> {
    let bytes = match path {
        Some(path) => fs::read(path)
            .map_err(|e| format!("Failed to read alarm sound {}: {}", path.display(), e))?,
        None => BUNDLED_ALARM.to_vec(),
    };

    if bytes.is_empty() {
        return Err("Alarm sound is empty".to_string());
    }

    let asset: Arc<[u8]> = bytes.into();
    check_decodable(&asset)?;
    Ok(asset)
}

/// Whether the bytes start like a WAV or MP3 file
fn has_audio_header(bytes: &[u8]) -> bool {
    let wav = bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WAVE";
    let id3 = bytes.starts_with(b"ID3");
    let mpeg_frame = bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0;
    wav || id3 || mpeg_frame
}

/// Reject assets that could never be played, so a bad file means no alarm
/// from the start rather than a silent failure when a timer finishes.
#[cfg(feature = "sound")]
fn check_decodable(asset: &Arc<[u8]>) -> Result<(), String> {
    use std::io::Cursor;

    if !has_audio_header(asset) {
        return Err("Alarm sound is not a WAV or MP3 file".to_string());
    }
    rodio::Decoder::new(Cursor::new(Arc::clone(asset)))
        .map(|_| ())
        .map_err(|e| format!("Failed to decode alarm sound: {}", e))
}

#[cfg(not(feature = "sound"))]
fn check_decodable(asset: &Arc<[u8]>) -> Result<(), String> {
    if has_audio_header(asset) {
        Ok(())
    } else {
        Err("Alarm sound is not a WAV or MP3 file".to_string())
    }
}

/// Load an alarm player, or `None` if the sound is not available.
///
/// A machine without an alarm still finishes its countdown, it just does so
/// silently.
pub fn load_alarm(path: Option<&Path>) -> Option<Box<dyn AlarmPlayer>> {
    match read_alarm_asset(path) {
        Ok(asset) => {
            debug!("Alarm sound loaded ({} bytes)", asset.len());
            Some(Box::new(SoundAlarm::new(asset)))
        }
        Err(e) => {
            warn!("Alarm not available, timers will finish silently: {}", e);
            None
        }
    }
}

/// Alarm that plays its sound on a background thread
#[derive(Debug)]
pub struct SoundAlarm {
    asset: Arc<[u8]>,
    playing: Option<Arc<AtomicBool>>,
}

impl SoundAlarm {
    pub fn new(asset: Arc<[u8]>) -> Self {
        Self {
            asset,
            playing: None,
        }
    }

    /// Whether playback was started and not yet silenced
    pub fn is_playing(&self) -> bool {
        self.playing
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl AlarmPlayer for SoundAlarm {
    fn play(&mut self, loop_count: u32) {
        self.stop();

        let flag = Arc::new(AtomicBool::new(true));
        let asset = Arc::clone(&self.asset);
        let thread_flag = Arc::clone(&flag);

        info!("Playing alarm ({} loops)", loop_count);
        let spawned = thread::Builder::new()
            .name("alarm".to_string())
            .spawn(move || {
                playback(asset, loop_count, &thread_flag);
                thread_flag.store(false, Ordering::Relaxed);
            });

        match spawned {
            Ok(_) => self.playing = Some(flag),
            Err(e) => warn!("Failed to start alarm playback: {}", e),
        }
    }

    fn stop(&mut self) {
        if let Some(flag) = self.playing.take() {
            if flag.swap(false, Ordering::Relaxed) {
                debug!("Alarm silenced");
            }
        }
    }
}

impl Drop for SoundAlarm {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Sleep for `period`, returning early once `playing` is cleared
fn wait_while_playing(period: Duration, playing: &AtomicBool) -> bool {
    let mut waited = Duration::ZERO;
    while waited < period {
        if !playing.load(Ordering::Relaxed) {
            return false;
        }
        thread::sleep(POLL_INTERVAL);
        waited += POLL_INTERVAL;
    }
    playing.load(Ordering::Relaxed)
}

#[cfg(feature = "sound")]
fn playback(asset: Arc<[u8]>, loop_count: u32, playing: &AtomicBool) {
    use rodio::{Decoder, OutputStream, Sink};
    use std::io::Cursor;

    let Ok((_stream, stream_handle)) = OutputStream::try_default() else {
        warn!("No audio output device, alarm is silent");
        return;
    };
    let Ok(sink) = Sink::try_new(&stream_handle) else {
        warn!("Failed to open audio sink, alarm is silent");
        return;
    };

    for _ in 0..loop_count {
        match Decoder::new(Cursor::new(Arc::clone(&asset))) {
            Ok(source) => sink.append(source),
            Err(e) => {
                warn!("Failed to decode alarm sound: {}", e);
                return;
            }
        }
    }

    while !sink.empty() && wait_while_playing(POLL_INTERVAL, playing) {}
    sink.stop();
}

/// Without an audio backend the alarm rings the terminal bell once per loop
#[cfg(not(feature = "sound"))]
fn playback(_asset: Arc<[u8]>, loop_count: u32, playing: &AtomicBool) {
    use std::io::Write;

    const BELL_PERIOD: Duration = Duration::from_secs(1);

    for _ in 0..loop_count {
        if !playing.load(Ordering::Relaxed) {
            break;
        }

        let mut stdout = std::io::stdout().lock();
        if stdout.write_all(b"\x07").and_then(|_| stdout.flush()).is_err() {
            break;
        }
        drop(stdout);

        if !wait_while_playing(BELL_PERIOD, playing) {
            break;
        }
    }
}
