use clap::{Parser, ValueEnum};
use tracing::Level;

use crate::constants::{
    DEFAULT_BUFFER_SIZE, DEFAULT_SAMPLE_RATE, DEFAULT_WAVEFORM_LEN, MAX_WAVEFORM_LEN,
    MIN_WAVEFORM_LEN,
};

/// How held notes get their pitch and level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PlayMode {
    /// Each key plays its own pitch at a fixed level.
    #[default]
    Keyboard,
    /// Pointer x sets pitch, pointer y sets level, for every held key.
    Pointer,
}

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "chromatic_typewriter", about = "Play the computer keyboard like a polyphonic synth")]
pub struct Cli {
    /// Output sample rate in Hz
    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Frames per audio callback
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: u32,

    /// Samples kept for the waveform plot
    #[arg(
        long,
        default_value_t = DEFAULT_WAVEFORM_LEN as u32,
        value_parser = clap::value_parser!(u32).range(MIN_WAVEFORM_LEN as i64..=MAX_WAVEFORM_LEN as i64)
    )]
    pub waveform_len: u32,

    #[arg(long, value_enum, default_value_t = PlayMode::Keyboard)]
    pub mode: PlayMode,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            sample_rate: self.sample_rate,
            buffer_size: self.buffer_size,
            waveform_len: self.waveform_len as usize,
            mode: self.mode,
        }
    }

    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    }
}

/// Settings shared by the audio and UI sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthConfig {
    pub sample_rate: u32,
    pub buffer_size: u32,
    pub waveform_len: usize,
    pub mode: PlayMode,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            buffer_size: DEFAULT_BUFFER_SIZE,
            waveform_len: DEFAULT_WAVEFORM_LEN,
            mode: PlayMode::Keyboard,
        }
    }
}
