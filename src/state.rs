use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::config::SynthConfig;
use crate::keymap::PointerVoice;
use crate::notes::NoteRegistry;
use crate::waveform::WaveformBuffer;

/// Everything the audio callback and the UI both touch. Only reachable
/// through [`AppState::lock`].
#[derive(Debug)]
pub struct Shared {
    pub notes: NoteRegistry,
    pub waveform: WaveformBuffer,
}

/// Centralized state shared across the audio and UI threads.
#[derive(Debug)]
pub struct AppState {
    shared: Mutex<Shared>,
    running: AtomicBool,
    pub config: SynthConfig,
}

/// What the UI needs for one frame, copied out under the lock.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub held_keys: Vec<char>,
    pub waveform: Vec<f32>,
    pub pointer: Option<PointerVoice>,
}

impl AppState {
    pub fn new(config: SynthConfig) -> Arc<Self> {
        Arc::new(Self {
            shared: Mutex::new(Shared {
                notes: NoteRegistry::new(),
                waveform: WaveformBuffer::new(config.waveform_len),
            }),
            running: AtomicBool::new(true),
            config,
        })
    }

    /// Take the single lock. A panic on the other side must not take the
    /// audio callback down with it, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn press(&self, key: char) {
        let started = self.lock().notes.press(key);
        if started {
            debug!("Note on: key={}", key.to_ascii_lowercase());
        }
    }

    pub fn release(&self, key: char) {
        let stopped = self.lock().notes.release(key);
        if stopped {
            debug!("Note off: key={}", key.to_ascii_lowercase());
        }
    }

    pub fn release_all(&self) {
        self.lock().notes.release_all();
        debug!("All notes off");
    }

    pub fn set_pointer_voice(&self, voice: Option<PointerVoice>) {
        self.lock().notes.set_pointer_voice(voice);
    }

    pub fn snapshot(&self) -> Snapshot {
        let shared = self.lock();
        Snapshot {
            held_keys: shared.notes.held_keys(),
            waveform: shared.waveform.as_slice().to_vec(),
            pointer: shared.notes.pointer_voice(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Ask the audio task to drop its stream.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Release);
    }
}
