//! A polyphonic computer-keyboard synthesizer.
//!
//! Each letter key starts an oscillator whose pitch comes from a chromatic
//! run across the keyboard and whose shape comes from its row. The audio
//! callback mixes every held note into a stereo stream and keeps the latest
//! block around for the waveform plot. Audio and UI threads share state only
//! through the single lock in [`state::AppState`].

pub mod audio;
pub mod config;
pub mod constants;
pub mod keymap;
pub mod notes;
pub mod oscillator;
pub mod state;
pub mod ui;
pub mod waveform;
