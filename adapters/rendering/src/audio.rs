//! Beep tones for audio cues, synthesised as 16-bit mono PCM.

use lane_defence_core::Cue;
use std::f32::consts::TAU;

/// Sample rate used for every cue tone.
pub const SAMPLE_RATE: u32 = 22_050;

/// Amplitude of cue tones relative to full scale.
pub const CUE_VOLUME: f32 = 0.3;

/// Pure sine tone description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Pitch in hertz.
    pub frequency_hz: f32,
    /// Length in seconds.
    pub duration_secs: f32,
}

/// Tone played for a cue.
#[must_use]
pub const fn tone_for(cue: Cue) -> Tone {
    let (frequency_hz, duration_secs) = match cue {
        Cue::Attack => (523.25, 0.1),
        Cue::EnemySpawn => (659.25, 0.1),
        Cue::EnemyDeath => (587.33, 0.1),
        Cue::GameOver => (392.00, 0.5),
    };
    Tone {
        frequency_hz,
        duration_secs,
    }
}

/// Renders the tone into signed 16-bit samples at `sample_rate`.
#[must_use]
pub fn synthesize(tone: Tone, sample_rate: u32, volume: f32) -> Vec<i16> {
    let count = (tone.duration_secs * sample_rate as f32) as usize;
    let amplitude = volume.clamp(0.0, 1.0) * f32::from(i16::MAX);
    (0..count)
        .map(|index| {
            let t = index as f32 / sample_rate as f32;
            (amplitude * (TAU * tone.frequency_hz * t).sin()) as i16
        })
        .collect()
}

/// Wraps mono 16-bit samples in a RIFF/WAVE container.
#[must_use]
pub fn encode_wav(samples: &[i16], sample_rate: u32) -> Vec<u8> {
    const CHANNELS: u16 = 1;
    const BITS_PER_SAMPLE: u16 = 16;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;
    let byte_rate = sample_rate * u32::from(block_align);
    let data_len = (samples.len() * 2) as u32;

    let mut bytes = Vec::with_capacity(44 + samples.len() * 2);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&CHANNELS.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&byte_rate.to_le_bytes());
    bytes.extend_from_slice(&block_align.to_le_bytes());
    bytes.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    for sample in samples {
        bytes.extend_from_slice(&sample.to_le_bytes());
    }
    bytes
}

/// Synthesises the WAV clip for a cue with the default rate and volume.
#[must_use]
pub fn cue_clip(cue: Cue) -> Vec<u8> {
    encode_wav(
        &synthesize(tone_for(cue), SAMPLE_RATE, CUE_VOLUME),
        SAMPLE_RATE,
    )
}
