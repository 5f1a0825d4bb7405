use std::fmt::Display;
use std::io::{self, Write};

use crate::utils::sink::PcmSink;
use crate::utils::tone::{SILENCE_LEVEL, SineTable, Tone, synthesize_pulse};

/// Output sample rate in Hz.
pub const OUTPUT_FREQUENCY: u32 = 43200;

/// One second of silence in samples.
pub const SHORT_SILENCE: u32 = OUTPUT_FREQUENCY;
/// Two seconds of silence in samples.
pub const LONG_SILENCE: u32 = OUTPUT_FREQUENCY * 2;

/// Short pulses before the first block of a file at 1200 baud (8000 one-bits).
pub const SYNC_INITIAL: u32 = 16000;
/// Short pulses before each following block at 1200 baud (2000 one-bits).
pub const SYNC_BLOCK: u32 = 4000;

/// Tape transfer speed supported by the MSX BIOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaudRate {
    #[default]
    Standard,
    Fast,
}

impl BaudRate {
    pub fn bits_per_second(self) -> u32 {
        match self {
            BaudRate::Standard => 1200,
            BaudRate::Fast => 2400,
        }
    }
}

impl Display for BaudRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} baud", self.bits_per_second())
    }
}

/// Parameters of an encoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingConfig {
    pub baud_rate: BaudRate,
    /// Output sample rate in Hz.
    pub sample_rate: u32,
    /// Silence in samples before the first block of each file.
    pub silence: u32,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            baud_rate: BaudRate::Standard,
            sample_rate: OUTPUT_FREQUENCY,
            silence: LONG_SILENCE,
        }
    }
}

/// Destination of the segments a tape is made of.
///
/// The [Scanner][crate::process::scan::Scanner] only talks to this trait, so the
/// emission order can be observed without synthesizing audio.
pub trait SignalWriter {
    /// Emits `samples` samples of DC level.
    fn emit_silence(&mut self, samples: u32) -> io::Result<()>;

    /// Emits a sync run of `pulses` short pulses, given at 1200 baud.
    fn emit_sync(&mut self, pulses: u32) -> io::Result<()>;

    /// Emits one serially framed byte.
    fn emit_byte(&mut self, value: u8) -> io::Result<()>;
}

impl<S: SignalWriter + ?Sized> SignalWriter for &mut S {
    fn emit_silence(&mut self, samples: u32) -> io::Result<()> {
        (**self).emit_silence(samples)
    }

    fn emit_sync(&mut self, pulses: u32) -> io::Result<()> {
        (**self).emit_sync(pulses)
    }

    fn emit_byte(&mut self, value: u8) -> io::Result<()> {
        (**self).emit_byte(value)
    }
}

/// Number of short pulses a sync run of `pulses` (at 1200 baud) takes at `baud_rate`.
///
/// Scaling keeps the duration independent of the baud rate.
pub fn sync_pulses(pulses: u32, baud_rate: BaudRate) -> u32 {
    let scaled = pulses as u64 * baud_rate.bits_per_second() as u64;
    ((scaled + 600) / 1200) as u32
}

/// Tones of one byte: a start bit, 8 data bits LSB first and two stop bits.
///
/// A `0` bit is one [Tone::Long], a `1` bit is two [Tone::Short].
pub fn byte_tones(value: u8) -> impl Iterator<Item = Tone> {
    let bit_tones = |bit: bool| -> &'static [Tone] {
        if bit {
            &[Tone::Short, Tone::Short]
        } else {
            &[Tone::Long]
        }
    };

    std::iter::once(false)
        .chain((0..8).map(move |i| (value >> i) & 1 != 0))
        .chain([true, true])
        .flat_map(move |bit| bit_tones(bit).iter().copied())
}

/// FSK encoder writing 8-bit unsigned mono PCM through a [PcmSink].
#[derive(Debug)]
pub struct Encoder<W: Write> {
    sink: PcmSink<W>,
    table: SineTable,
    config: EncodingConfig,
    samples_written: u64,
}

impl<W: Write> Encoder<W> {
    pub fn new(writer: W, config: EncodingConfig) -> Self {
        Self::with_sink(PcmSink::new(writer), config)
    }

    pub fn with_sink(sink: PcmSink<W>, config: EncodingConfig) -> Self {
        Self {
            sink,
            table: SineTable::new(),
            config,
            samples_written: 0,
        }
    }

    pub fn config(&self) -> &EncodingConfig {
        &self.config
    }

    /// Total samples emitted so far, buffered ones included.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Emits one sine cycle of `tone`.
    pub fn emit_tone(&mut self, tone: Tone) -> io::Result<()> {
        let pulse = synthesize_pulse(
            &self.table,
            tone.frequency(),
            self.config.baud_rate.bits_per_second(),
            self.config.sample_rate,
        );
        for sample in pulse {
            self.sink.put(sample)?;
            self.samples_written += 1;
        }
        Ok(())
    }

    /// Flushes the PCM buffer and returns the inner writer.
    pub fn finish(self) -> io::Result<W> {
        self.sink.into_inner()
    }
}

impl<W: Write> SignalWriter for Encoder<W> {
    fn emit_silence(&mut self, samples: u32) -> io::Result<()> {
        self.sink.put_repeated(SILENCE_LEVEL, samples as usize)?;
        self.samples_written += samples as u64;
        Ok(())
    }

    fn emit_sync(&mut self, pulses: u32) -> io::Result<()> {
        for _ in 0..sync_pulses(pulses, self.config.baud_rate) {
            self.emit_tone(Tone::Short)?;
        }
        Ok(())
    }

    fn emit_byte(&mut self, value: u8) -> io::Result<()> {
        for tone in byte_tones(value) {
            self.emit_tone(tone)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::tone::pulse_len;

    fn config(baud_rate: BaudRate) -> EncodingConfig {
        EncodingConfig {
            baud_rate,
            ..Default::default()
        }
    }

    fn encode_byte(value: u8, baud_rate: BaudRate) -> io::Result<Vec<u8>> {
        let mut encoder = Encoder::new(Vec::new(), config(baud_rate));
        encoder.emit_byte(value)?;
        encoder.finish()
    }

    /// Splits PCM samples back into tones. A quarter into a short pulse the
    /// signal is back at the center level, while a long pulse is at its peak.
    fn split_tones(samples: &[u8], baud_rate: BaudRate) -> Vec<Tone> {
        let bps = baud_rate.bits_per_second();
        let long = pulse_len(Tone::Long.frequency(), bps, OUTPUT_FREQUENCY);
        let short = pulse_len(Tone::Short.frequency(), bps, OUTPUT_FREQUENCY);

        let mut tones = Vec::new();
        let mut pos = 0;
        while pos < samples.len() {
            if samples[pos + short / 2] > 200 {
                tones.push(Tone::Long);
                pos += long;
            } else {
                tones.push(Tone::Short);
                pos += short;
            }
        }
        assert_eq!(pos, samples.len());
        tones
    }

    /// Inverse of the framing rule: start bit 0, 8 data bits LSB first, 2 stop bits 1.
    fn decode_byte(tones: &[Tone]) -> u8 {
        let mut bits = Vec::new();
        let mut i = 0;
        while i < tones.len() {
            match tones[i] {
                Tone::Long => {
                    bits.push(false);
                    i += 1;
                }
                Tone::Short => {
                    assert_eq!(tones[i + 1], Tone::Short);
                    bits.push(true);
                    i += 2;
                }
            }
        }
        assert_eq!(bits.len(), 11);
        assert!(!bits[0], "start bit");
        assert!(bits[9] && bits[10], "stop bits");
        (0..8).fold(0u8, |acc, i| acc | ((bits[1 + i] as u8) << i))
    }

    #[test]
    fn byte_round_trip() -> io::Result<()> {
        for baud_rate in [BaudRate::Standard, BaudRate::Fast] {
            for value in 0..=255u8 {
                let samples = encode_byte(value, baud_rate)?;
                let tones = split_tones(&samples, baud_rate);
                assert_eq!(tones, byte_tones(value).collect::<Vec<_>>());
                assert_eq!(decode_byte(&tones), value);
            }
        }
        Ok(())
    }

    #[test]
    fn byte_tone_sequence() {
        use Tone::{Long as L, Short as S};
        assert_eq!(
            byte_tones(0x01).collect::<Vec<_>>(),
            vec![L, S, S, L, L, L, L, L, L, L, S, S, S, S]
        );
        assert_eq!(byte_tones(0x00).count(), 1 + 8 + 4);
        assert_eq!(byte_tones(0xFF).count(), 1 + 16 + 4);
    }

    #[test]
    fn every_byte_has_the_same_duration() -> io::Result<()> {
        // one bit is 36 samples at 1200 baud whatever its value, stop bits included
        for value in [0x00, 0x1A, 0x5A, 0xFF] {
            assert_eq!(encode_byte(value, BaudRate::Standard)?.len(), 11 * 36);
            assert_eq!(encode_byte(value, BaudRate::Fast)?.len(), 11 * 18);
        }
        Ok(())
    }

    #[test]
    fn sync_scales_with_baud_rate() -> io::Result<()> {
        assert_eq!(sync_pulses(SYNC_INITIAL, BaudRate::Standard), 16000);
        assert_eq!(sync_pulses(SYNC_INITIAL, BaudRate::Fast), 32000);
        assert_eq!(sync_pulses(0, BaudRate::Fast), 0);

        for baud_rate in [BaudRate::Standard, BaudRate::Fast] {
            let mut encoder = Encoder::new(Vec::new(), config(baud_rate));
            encoder.emit_sync(10)?;
            let samples = encoder.finish()?;

            let tones = split_tones(&samples, baud_rate);
            assert_eq!(tones.len() as u32, sync_pulses(10, baud_rate));
            assert!(tones.iter().all(|&t| t == Tone::Short));
            // same wall-clock duration at both rates
            assert_eq!(samples.len(), 10 * 18);
        }
        Ok(())
    }

    #[test]
    fn silence_is_not_baud_scaled() -> io::Result<()> {
        for baud_rate in [BaudRate::Standard, BaudRate::Fast] {
            let mut encoder = Encoder::new(Vec::new(), config(baud_rate));
            encoder.emit_silence(1000)?;
            assert_eq!(encoder.samples_written(), 1000);
            let samples = encoder.finish()?;
            assert_eq!(samples, vec![SILENCE_LEVEL; 1000]);
        }
        Ok(())
    }
}
