/// Keys in pitch order; index `i` sounds `BASE_FREQUENCY * 2^(i/12)`.
pub const SCALE_KEYS: &str = "zxcvbnmasdfghjklqwertyuiop";

/// C3
pub const BASE_FREQUENCY: f32 = 130.81;

pub const SEMITONES_PER_OCTAVE: f64 = 12.0;

pub const SAWTOOTH_ROW: &str = "qwertyuiop";
pub const SQUARE_ROW: &str = "asdfghjkl";
pub const SINE_ROW: &str = "zxcvbnm";

/// Amplitude of every key-triggered note.
pub const DEFAULT_AMPLITUDE: f32 = 0.5;

// Pointer mode ranges.
pub const POINTER_MIN_FREQUENCY: f32 = 65.0;
pub const POINTER_MAX_FREQUENCY: f32 = 2000.0;
pub const POINTER_MAX_AMPLITUDE: f32 = 1.0;
pub const POINTER_MIN_AMPLITUDE: f32 = 0.0;

pub const CHANNELS: u16 = 2;
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;
pub const DEFAULT_BUFFER_SIZE: u32 = 512;
pub const DEFAULT_WAVEFORM_LEN: usize = 1024;
pub const MIN_WAVEFORM_LEN: usize = 512;
pub const MAX_WAVEFORM_LEN: usize = 1024;

pub const WINDOW_TITLE: &str = "The Chromatic Typewriter";
