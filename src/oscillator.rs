//! Naive (non band-limited) oscillator shapes and the phase accumulator.

use std::f32::consts::TAU;
use std::fmt;

/// Oscillator shape, chosen by keyboard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
}

impl Waveform {
    /// Sample the shape at `phase` radians. Always within `[-1, 1]`.
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Square => {
                if phase.sin() > 0.0 {
                    1.0
                } else {
                    -1.0
                }
            }
            // rem_euclid keeps negative phases inside [0, 1).
            Waveform::Sawtooth => (phase / TAU).rem_euclid(1.0) * 2.0 - 1.0,
        }
    }
}

/// Error for a waveform code outside the known set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownWaveform(pub i32);

impl fmt::Display for UnknownWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown waveform code {}", self.0)
    }
}

impl std::error::Error for UnknownWaveform {}

/// Legacy integer codes: 0 sine, 1 square, 2 sawtooth.
impl TryFrom<i32> for Waveform {
    type Error = UnknownWaveform;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Waveform::Sine),
            1 => Ok(Waveform::Square),
            2 => Ok(Waveform::Sawtooth),
            other => Err(UnknownWaveform(other)),
        }
    }
}

/// Radians to advance per output frame.
pub fn phase_increment(frequency: f32, sample_rate: f32) -> f32 {
    TAU * frequency / sample_rate
}

/// Advance `phase` by one frame. A single conditional wrap is enough as
/// long as the increment stays below `2π`.
pub fn advance_phase(phase: f32, increment: f32) -> f32 {
    let next = phase + increment;
    if next > TAU {
        next - TAU
    } else {
        next
    }
}
