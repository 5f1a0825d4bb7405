//! Sine lookup table and single-cycle pulse synthesis.

use std::f64::consts::PI;

/// Frequency of a "0" tone in Hz.
pub const LONG_PULSE: u32 = 1200;
/// Frequency of a "1" tone in Hz.
pub const SHORT_PULSE: u32 = 2400;

/// PCM value of silence (DC level).
pub const SILENCE_LEVEL: u8 = 128;

/// Number of entries in [SineTable], one per degree.
pub const SINE_TABLE_LEN: usize = 360;

/// A single FSK tone cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// One cycle at 1200 Hz.
    Long,
    /// One cycle at 2400 Hz.
    Short,
}

impl Tone {
    pub fn frequency(self) -> u32 {
        match self {
            Tone::Long => LONG_PULSE,
            Tone::Short => SHORT_PULSE,
        }
    }
}

/// One full sine cycle as unsigned 8-bit PCM at 1° resolution, centered at 128.
#[derive(Debug, Clone)]
pub struct SineTable {
    samples: [u8; SINE_TABLE_LEN],
}

impl SineTable {
    pub fn new() -> Self {
        let mut samples = [0u8; SINE_TABLE_LEN];
        for (i, sample) in samples.iter_mut().enumerate() {
            let angle = 2.0 * PI * i as f64 / SINE_TABLE_LEN as f64;
            *sample = (angle.sin() * 127.0 + 128.0).round() as u8;
        }
        Self { samples }
    }

    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.samples[index]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.samples
    }
}

impl Default for SineTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact (untruncated) length of one cycle of `frequency` in output samples.
#[inline]
fn pulse_len_exact(frequency: u32, baud_rate: u32, sample_rate: u32) -> f64 {
    sample_rate as f64 / (baud_rate as f64 * (frequency as f64 / 1200.0))
}

/// Number of samples in one pulse.
///
/// At 43200 Hz and 1200 baud a 1200 Hz pulse is 36 samples and a 2400 Hz
/// pulse is 18; at 2400 baud both halve.
pub fn pulse_len(frequency: u32, baud_rate: u32, sample_rate: u32) -> usize {
    pulse_len_exact(frequency, baud_rate, sample_rate) as usize
}

/// Yields the PCM samples of one sine cycle for `frequency`.
///
/// Sample `n` is `table[floor(n * 360 / length)]`, which stays below 360 since
/// `n < length`.
pub fn synthesize_pulse(
    table: &SineTable,
    frequency: u32,
    baud_rate: u32,
    sample_rate: u32,
) -> impl Iterator<Item = u8> + '_ {
    let length = pulse_len_exact(frequency, baud_rate, sample_rate);
    let step = SINE_TABLE_LEN as f64 / length;

    (0..length as usize).map(move |n| table.get((n as f64 * step) as usize))
}
