use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    BufferSize, SampleRate, StreamConfig,
};
use tracing::{error, info, warn};

use crate::constants::CHANNELS;
use crate::oscillator::{advance_phase, phase_increment};
use crate::state::{AppState, Shared};

/// Starts the audio output task and keeps it alive until shutdown.
pub async fn run_audio_synthesizer(state: Arc<AppState>) {
    let task = tokio::task::spawn_blocking(move || {
        let stream = match start_output_stream(&state) {
            Ok(stream) => stream,
            Err(e) => {
                error!("Audio disabled: {:#}", e);
                return;
            }
        };

        while state.is_running() {
            std::thread::sleep(Duration::from_millis(100));
        }

        drop(stream);
        info!("Audio stream stopped");
    });

    if let Err(e) = task.await {
        error!("Audio task failed: {}", e);
    }
}

/// Open the default device with the configured rate and block size, falling
/// back to the device's own rate when it refuses.
fn start_output_stream(state: &Arc<AppState>) -> anyhow::Result<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no output device found")?;
    info!(
        "Default output device found: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );

    let requested = StreamConfig {
        channels: CHANNELS,
        sample_rate: SampleRate(state.config.sample_rate),
        buffer_size: BufferSize::Fixed(state.config.buffer_size),
    };

    let stream = match build_stream(&device, &requested, Arc::clone(state)) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(
                "Output config {:?} rejected ({:#}), using device default",
                requested, e
            );
            let supported = device
                .default_output_config()
                .context("failed to get default output config")?;
            let fallback = StreamConfig {
                channels: CHANNELS,
                sample_rate: supported.sample_rate(),
                buffer_size: BufferSize::Default,
            };
            build_stream(&device, &fallback, Arc::clone(state))?
        }
    };

    info!("Starting audio stream...");
    stream.play().context("failed to play audio stream")?;
    Ok(stream)
}

fn build_stream(
    device: &cpal::Device,
    config: &StreamConfig,
    state: Arc<AppState>,
) -> anyhow::Result<cpal::Stream> {
    info!("Audio stream configuration: {:?}", config);
    let channels = config.channels as usize;
    let sample_rate = config.sample_rate.0 as f32;

    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                process_audio_data(data, &state, channels, sample_rate);
            },
            |err| {
                error!("An error occurred on the audio stream: {}", err);
            },
            None,
        )
        .context("failed to build audio stream")?;
    Ok(stream)
}

/// Output callback body: the whole block renders under one lock.
pub fn process_audio_data(data: &mut [f32], state: &AppState, channels: usize, sample_rate: f32) {
    let mut shared = state.lock();
    render_block(&mut shared, data, channels, sample_rate);
}

/// Mix every held note into interleaved `data` and republish the left
/// channel for the plot.
///
/// Each note is scaled by `amplitude / note_count`. That keeps the sum of
/// full-scale notes from clipping but makes chords quieter than single
/// notes; it is peak normalization, not loudness compensation.
pub fn render_block(shared: &mut Shared, data: &mut [f32], channels: usize, sample_rate: f32) {
    data.fill(0.0);

    let Shared { notes, waveform } = shared;
    if notes.is_empty() || channels == 0 || sample_rate.is_nan() || sample_rate <= 0.0 {
        waveform.clear();
        return;
    }

    let count = notes.len() as f32;
    for note in notes.notes_mut() {
        let increment = phase_increment(note.frequency, sample_rate);
        let gain = note.amplitude / count;

        for frame in data.chunks_mut(channels) {
            let sample = note.waveform.sample(note.phase) * gain;
            note.phase = advance_phase(note.phase, increment);
            for out in frame.iter_mut() {
                *out += sample;
            }
        }
    }

    waveform.write_from(data.chunks(channels).map(|frame| frame[0]));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SynthConfig;
    use crate::constants::DEFAULT_AMPLITUDE;
    use crate::keymap::key_to_frequency;
    use crate::oscillator::Waveform;

    const RATE: f32 = 48_000.0;

    fn state() -> Arc<AppState> {
        AppState::new(SynthConfig::default())
    }

    #[test]
    fn silence_when_nothing_held() {
        let state = state();
        {
            let mut shared = state.lock();
            shared.waveform.write_from([0.7; 16]);
        }
        let mut data = vec![1.0f32; 512 * 2];
        process_audio_data(&mut data, &state, 2, RATE);
        assert!(data.iter().all(|&s| s == 0.0));
        assert!(state.snapshot().waveform.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn single_sine_matches_oscillator() {
        let state = state();
        state.press('z');
        let mut data = vec![0.0f32; 64 * 2];
        process_audio_data(&mut data, &state, 2, RATE);

        let freq = key_to_frequency('z').unwrap();
        let inc = phase_increment(freq, RATE);
        let mut phase = 0.0;
        for frame in data.chunks(2) {
            let expected = Waveform::Sine.sample(phase) * DEFAULT_AMPLITUDE;
            phase = advance_phase(phase, inc);
            assert_eq!(frame[0], expected);
            assert_eq!(frame[1], expected);
        }
    }

    #[test]
    fn chord_is_scaled_by_note_count() {
        let state = state();
        for k in ['q', 'w', 'e', 'r'] {
            state.press(k);
        }
        let mut data = vec![0.0f32; 512 * 2];
        process_audio_data(&mut data, &state, 2, RATE);
        // Four notes at 0.5 each, scaled by 1/4, can never exceed 0.5.
        assert!(data.iter().all(|s| s.abs() <= 0.5 + 1e-6));
        assert!(data.iter().any(|&s| s != 0.0));
    }

    #[test]
    fn two_square_notes_peak_at_half() {
        let state = state();
        state.press('a');
        state.press('s');
        let mut data = vec![0.0f32; 2];
        process_audio_data(&mut data, &state, 2, RATE);
        // Both squares start at -1 and contribute -0.25 each.
        assert_eq!(data, vec![-0.5, -0.5]);
    }

    #[test]
    fn duplicate_press_does_not_reset_phase() {
        let held = state();
        held.press('z');
        let mut first = vec![0.0f32; 32 * 2];
        let mut second = vec![0.0f32; 32 * 2];
        process_audio_data(&mut first, &held, 2, RATE);
        held.press('z');
        held.press('Z');
        process_audio_data(&mut second, &held, 2, RATE);

        let reference = state();
        reference.press('z');
        let mut continuous = vec![0.0f32; 64 * 2];
        process_audio_data(&mut continuous, &reference, 2, RATE);

        let stitched: Vec<f32> = first.into_iter().chain(second).collect();
        assert_eq!(stitched, continuous);
    }

    #[test]
    fn waveform_copies_left_channel_up_to_its_length() {
        let state = AppState::new(SynthConfig {
            waveform_len: 512,
            ..SynthConfig::default()
        });
        state.press('x');
        let mut data = vec![0.0f32; 1024 * 2];
        process_audio_data(&mut data, &state, 2, RATE);
        let snap = state.snapshot();
        assert_eq!(snap.waveform.len(), 512);
        for (i, &v) in snap.waveform.iter().enumerate() {
            assert_eq!(v, data[i * 2]);
        }
    }

    #[test]
    fn released_note_stops_sounding() {
        let state = state();
        state.press('m');
        let mut data = vec![0.0f32; 16 * 2];
        process_audio_data(&mut data, &state, 2, RATE);
        state.release('m');
        process_audio_data(&mut data, &state, 2, RATE);
        assert!(data.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn zero_channels_is_silent() {
        let state = state();
        state.press('a');
        let mut data = vec![1.0f32; 8];
        process_audio_data(&mut data, &state, 0, RATE);
        assert!(data.iter().all(|&s| s == 0.0));
    }
}
