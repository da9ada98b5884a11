//! Key and pointer mapping: which key plays which pitch and shape.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::constants::{
    BASE_FREQUENCY, POINTER_MAX_AMPLITUDE, POINTER_MAX_FREQUENCY, POINTER_MIN_AMPLITUDE,
    POINTER_MIN_FREQUENCY, SAWTOOTH_ROW, SCALE_KEYS, SEMITONES_PER_OCTAVE, SINE_ROW, SQUARE_ROW,
};
use crate::oscillator::Waveform;

static FREQUENCY_MAP: OnceLock<HashMap<char, f32>> = OnceLock::new();

/// Chromatic run over `keys`: the key at index `i` gets `base * 2^(i/12)`.
///
/// The exponent is computed in double precision and narrowed once, so the
/// octave keys land exactly on `base * 2`.
pub fn build_frequency_map(keys: &str, base: f32) -> HashMap<char, f32> {
    keys.chars()
        .enumerate()
        .map(|(i, key)| {
            let ratio = 2f64.powf(i as f64 / SEMITONES_PER_OCTAVE);
            (key, (base as f64 * ratio) as f32)
        })
        .collect()
}

/// The process-wide key to frequency table. Built on first use; `main` calls
/// this before the UI starts so no key event ever pays for construction.
pub fn frequency_map() -> &'static HashMap<char, f32> {
    FREQUENCY_MAP.get_or_init(|| build_frequency_map(SCALE_KEYS, BASE_FREQUENCY))
}

/// Lowercase ASCII form of a key, the identity used for every lookup.
pub fn normalize_key(key: char) -> char {
    key.to_ascii_lowercase()
}

pub fn key_to_frequency(key: char) -> Option<f32> {
    frequency_map().get(&normalize_key(key)).copied()
}

pub fn key_to_waveform(key: char) -> Option<Waveform> {
    let key = normalize_key(key);
    if SAWTOOTH_ROW.contains(key) {
        Some(Waveform::Sawtooth)
    } else if SQUARE_ROW.contains(key) {
        Some(Waveform::Square)
    } else if SINE_ROW.contains(key) {
        Some(Waveform::Sine)
    } else {
        None
    }
}

/// Frequency and amplitude taken from the pointer instead of the key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerVoice {
    pub frequency: f32,
    pub amplitude: f32,
}

impl PointerVoice {
    pub fn from_position(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            frequency: pointer_to_frequency(x, width),
            amplitude: pointer_to_amplitude(y, height),
        }
    }
}

/// `x` across `[0, width]` maps linearly onto `[65, 2000]` Hz.
pub fn pointer_to_frequency(x: f32, width: f32) -> f32 {
    let t = unit_position(x, width);
    POINTER_MIN_FREQUENCY + t * (POINTER_MAX_FREQUENCY - POINTER_MIN_FREQUENCY)
}

/// `y` across `[0, height]` maps onto `[1, 0]`: top of the window is loudest.
pub fn pointer_to_amplitude(y: f32, height: f32) -> f32 {
    let t = unit_position(y, height);
    POINTER_MAX_AMPLITUDE + t * (POINTER_MIN_AMPLITUDE - POINTER_MAX_AMPLITUDE)
}

fn unit_position(pos: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !pos.is_finite() {
        return 0.0;
    }
    (pos / extent).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_starts_at_base() {
        assert_eq!(key_to_frequency('z'), Some(BASE_FREQUENCY));
        let x = key_to_frequency('x').unwrap();
        let expected = (BASE_FREQUENCY as f64 * 2f64.powf(1.0 / 12.0)) as f32;
        assert_eq!(x, expected);
    }

    #[test]
    fn thirteenth_key_is_an_octave_up() {
        assert_eq!(SCALE_KEYS.chars().nth(12), Some('a'));
        let a = key_to_frequency('a').unwrap();
        assert!((a - 261.62).abs() < 1e-3, "got {a}");
    }

    #[test]
    fn every_scale_key_is_mapped_and_ascending() {
        let map = frequency_map();
        assert_eq!(map.len(), 26);
        let freqs: Vec<f32> = SCALE_KEYS.chars().map(|k| map[&k]).collect();
        assert!(freqs.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn rows_select_waveforms() {
        for k in "qwertyuiop".chars() {
            assert_eq!(key_to_waveform(k), Some(Waveform::Sawtooth), "key {k}");
        }
        for k in "asdfghjkl".chars() {
            assert_eq!(key_to_waveform(k), Some(Waveform::Square), "key {k}");
        }
        for k in "zxcvbnm".chars() {
            assert_eq!(key_to_waveform(k), Some(Waveform::Sine), "key {k}");
        }
    }

    #[test]
    fn uppercase_matches_lowercase() {
        assert_eq!(key_to_frequency('Q'), key_to_frequency('q'));
        assert_eq!(key_to_waveform('Q'), key_to_waveform('q'));
    }

    #[test]
    fn unmapped_keys() {
        for k in ['1', ' ', ';', 'é'] {
            assert_eq!(key_to_frequency(k), None);
            assert_eq!(key_to_waveform(k), None);
        }
    }

    #[test]
    fn pointer_mapping_is_linear_and_clamped() {
        assert_eq!(pointer_to_frequency(0.0, 800.0), 65.0);
        assert_eq!(pointer_to_frequency(800.0, 800.0), 2000.0);
        assert_eq!(pointer_to_frequency(400.0, 800.0), 1032.5);
        assert_eq!(pointer_to_frequency(-50.0, 800.0), 65.0);
        assert_eq!(pointer_to_frequency(5000.0, 800.0), 2000.0);

        assert_eq!(pointer_to_amplitude(0.0, 600.0), 1.0);
        assert_eq!(pointer_to_amplitude(600.0, 600.0), 0.0);
        assert_eq!(pointer_to_amplitude(300.0, 600.0), 0.5);
        assert_eq!(pointer_to_amplitude(900.0, 600.0), 0.0);
    }

    #[test]
    fn degenerate_viewport() {
        let v = PointerVoice::from_position(10.0, 10.0, 0.0, 0.0);
        assert_eq!(v.frequency, POINTER_MIN_FREQUENCY);
        assert_eq!(v.amplitude, POINTER_MAX_AMPLITUDE);
    }
}
