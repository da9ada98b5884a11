use std::collections::HashMap;

use crate::constants::{DEFAULT_AMPLITUDE, SCALE_KEYS};
use crate::keymap::{key_to_frequency, key_to_waveform, normalize_key, PointerVoice};
use crate::oscillator::Waveform;

/// A sounding oscillator. Phase is in radians and advances every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub waveform: Waveform,
    pub frequency: f32,
    pub amplitude: f32,
    pub phase: f32,
}

impl Note {
    pub fn new(waveform: Waveform, frequency: f32, amplitude: f32) -> Self {
        Self {
            waveform,
            frequency,
            amplitude,
            phase: 0.0,
        }
    }
}

/// Held keys and their notes. A key is present exactly while it is sounding.
#[derive(Debug)]
pub struct NoteRegistry {
    notes: HashMap<char, Note>,
    pointer: Option<PointerVoice>,
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteRegistry {
    pub fn new() -> Self {
        Self {
            // Every playable key fits without a rehash.
            notes: HashMap::with_capacity(SCALE_KEYS.len()),
            pointer: None,
        }
    }

    /// Start a note for `key`. Returns false for unmapped keys and for keys
    /// already sounding; a held key is never retriggered.
    pub fn press(&mut self, key: char) -> bool {
        let key = normalize_key(key);
        if self.notes.contains_key(&key) {
            return false;
        }
        let (Some(frequency), Some(waveform)) = (key_to_frequency(key), key_to_waveform(key))
        else {
            return false;
        };
        let note = match self.pointer {
            Some(voice) => Note::new(waveform, voice.frequency, voice.amplitude),
            None => Note::new(waveform, frequency, DEFAULT_AMPLITUDE),
        };
        self.notes.insert(key, note);
        true
    }

    /// Stop the note for `key`, if any.
    pub fn release(&mut self, key: char) -> bool {
        self.notes.remove(&normalize_key(key)).is_some()
    }

    pub fn release_all(&mut self) {
        self.notes.clear();
    }

    /// Override pitch and level of every note, present and future, with the
    /// pointer position. `None` returns new notes to their key's pitch; notes
    /// already sounding keep their last pointer values until released.
    pub fn set_pointer_voice(&mut self, voice: Option<PointerVoice>) {
        self.pointer = voice;
        if let Some(voice) = voice {
            for note in self.notes.values_mut() {
                note.frequency = voice.frequency;
                note.amplitude = voice.amplitude;
            }
        }
    }

    pub fn pointer_voice(&self) -> Option<PointerVoice> {
        self.pointer
    }

    pub fn get(&self, key: char) -> Option<&Note> {
        self.notes.get(&normalize_key(key))
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Held keys in display order.
    pub fn held_keys(&self) -> Vec<char> {
        let mut keys: Vec<char> = self.notes.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub(crate) fn notes_mut(&mut self) -> impl Iterator<Item = &mut Note> {
        self.notes.values_mut()
    }
}
