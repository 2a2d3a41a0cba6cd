use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::mpsc::{self, RecvTimeoutError},
    thread,
    time::Duration,
};

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::error::SoundError;

/// how often the audio thread looks for finished sounds
const PRUNE_INTERVAL: Duration = Duration::from_millis(250);

/// fire and forget sound playback
///
/// cheap to clone and safe to use from any thread, the actual playing happens on one audio thread
/// that owns the output stream and every sound still playing.
#[derive(Debug, Clone)]
pub struct SoundPlayer {
    sender: mpsc::Sender<PathBuf>,
}

impl SoundPlayer {
    /// starts the audio thread
    #[must_use]
    pub fn spawn() -> Self {
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || run_audio_thread(&receiver));
        Self { sender }
    }

    /// a player feeding an existing channel instead of an audio thread
    #[must_use]
    pub const fn from_sender(sender: mpsc::Sender<PathBuf>) -> Self {
        Self { sender }
    }

    /// plays a sound, problems are logged and otherwise ignored
    pub fn play(&self, path: &Path) {
        if let Err(e) = self.try_play(path) {
            log::error!("{e}");
        }
    }

    pub fn try_play(&self, path: &Path) -> Result<(), SoundError> {
        let path = resolve(path);
        log::info!("attempting to play: {}", path.display());
        if !path.is_file() {
            return Err(SoundError::NotFound(path));
        }
        self.sender
            .send(path)
            .map_err(|mpsc::SendError(path)| SoundError::Playback {
                path,
                reason: "audio thread is not running".to_string(),
            })
    }
}

/// relative paths are relative to the working directory
pub(crate) fn resolve(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |dir| dir.join(path))
}

fn run_audio_thread(receiver: &mpsc::Receiver<PathBuf>) {
    // the stream has to stay alive for anything to be heard
    let output = match OutputStream::try_default() {
        Ok(output) => Some(output),
        Err(e) => {
            log::error!("couldn't open audio output: {e}");
            None
        }
    };
    let mut playing: Vec<Sink> = vec![];
    loop {
        match receiver.recv_timeout(PRUNE_INTERVAL) {
            Ok(path) => match &output {
                Some((_stream, handle)) => match start_playback(handle, &path) {
                    Ok(sink) => playing.push(sink),
                    Err(e) => log::error!("{e}"),
                },
                None => log::error!(
                    "{}",
                    SoundError::Playback {
                        path,
                        reason: "no audio output device".to_string(),
                    }
                ),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        playing.retain(|sink| !sink.empty());
    }
}

fn start_playback(handle: &OutputStreamHandle, path: &Path) -> Result<Sink, SoundError> {
    let playback_error = |reason: String| SoundError::Playback {
        path: path.to_path_buf(),
        reason,
    };
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            SoundError::NotFound(path.to_path_buf())
        } else {
            playback_error(e.to_string())
        }
    })?;
    let source = Decoder::new(BufReader::new(file)).map_err(|e| playback_error(e.to_string()))?;
    let sink = Sink::try_new(handle).map_err(|e| playback_error(e.to_string()))?;
    sink.append(source);
    sink.play();
    Ok(sink)
}
