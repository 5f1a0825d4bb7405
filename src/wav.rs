use std::io::{self, BufWriter, Seek, SeekFrom, Write};

use castools_macros::ToBytes;

use crate::byteorder::WriteBytesLe;

/// Size of the canonical RIFF/WAVE header.
pub const WAV_HEADER_LEN: u64 = 44;

/// Canonical 44 byte RIFF/WAVE header with a PCM `fmt ` chunk.
#[derive(Debug, Clone, ToBytes)]
struct WaveHeader {
    riff_id: [u8; 4],
    riff_size: u32,
    wave_id: [u8; 4],
    fmt_id: [u8; 4],
    fmt_size: u32,
    format_tag: u16,
    channels: u16,
    sample_rate: u32,
    byte_rate: u32,
    block_align: u16,
    bits_per_sample: u16,
    data_id: [u8; 4],
    data_size: u32,
}

impl WaveHeader {
    fn new(sample_rate: u32, channels: u16, bits_per_sample: u16, data_size: u32) -> Self {
        let block_align = channels * bits_per_sample.div_ceil(8);
        Self {
            riff_id: *b"RIFF",
            riff_size: data_size.saturating_add(WAV_HEADER_LEN as u32 - 8),
            wave_id: *b"WAVE",
            fmt_id: *b"fmt ",
            fmt_size: 16,
            format_tag: 1,
            channels,
            sample_rate,
            byte_rate: sample_rate * block_align as u32,
            block_align,
            bits_per_sample,
            data_id: *b"data",
            data_size,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(WAV_HEADER_LEN as usize);
        self.write_le(&mut bytes);
        bytes
    }
}

/// RIFF/WAVE file writer for PCM audio.
///
/// The header is written with zero sizes first and patched by [WAVWriter::finish]
/// once the amount of sample data is known. Sample bytes are written through the
/// [Write] implementation.
pub struct WAVWriter<W: Write + Seek> {
    writer: BufWriter<W>,
    header_position: u64,
    data_written: u64,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

impl<W: Write + Seek> WAVWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            header_position: 0,
            data_written: 0,
            sample_rate: 43200,
            channels: 1,
            bits_per_sample: 8,
        }
    }

    /// Configure audio format parameters
    pub fn configure_audio_format(
        &mut self,
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
    ) -> io::Result<()> {
        if self.data_written > 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot change format after writing data",
            ));
        }

        self.sample_rate = sample_rate;
        self.channels = channels;
        self.bits_per_sample = bits_per_sample;
        Ok(())
    }

    /// Write the header with placeholder sizes
    pub fn write_header(&mut self) -> io::Result<()> {
        self.header_position = self.writer.stream_position()?;
        let header = WaveHeader::new(self.sample_rate, self.channels, self.bits_per_sample, 0);
        self.writer.write_all(&header.to_bytes())
    }

    /// Flush the sample data and patch the RIFF and data chunk sizes
    pub fn finish(&mut self) -> io::Result<()> {
        let data_size = u32::try_from(self.data_written)
            .ok()
            .filter(|size| size.checked_add(WAV_HEADER_LEN as u32 - 8).is_some())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("{} bytes of audio exceed the WAV size limit", self.data_written),
                )
            })?;

        self.writer.flush()?;
        let current_pos = self.writer.stream_position()?;

        let header = WaveHeader::new(
            self.sample_rate,
            self.channels,
            self.bits_per_sample,
            data_size,
        );
        self.writer.seek(SeekFrom::Start(self.header_position))?;
        self.writer.write_all(&header.to_bytes())?;

        self.writer.seek(SeekFrom::Start(current_pos))?;
        self.writer.flush()
    }

    /// Get the underlying writer
    pub fn into_inner(self) -> io::Result<W> {
        self.writer.into_inner().map_err(|e| e.into_error())
    }

    /// Get statistics about written data
    pub fn stats(&self) -> WAVStats {
        WAVStats {
            data_written: self.data_written,
            sample_rate: self.sample_rate,
            channels: self.channels,
            bits_per_sample: self.bits_per_sample,
        }
    }
}

impl<W: Write + Seek> Write for WAVWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let written = self.writer.write(buf)?;
        self.data_written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Statistics about WAV file writing
#[derive(Debug, Clone)]
pub struct WAVStats {
    pub data_written: u64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn u32_at(buffer: &[u8], pos: usize) -> u32 {
        u32::from_le_bytes([buffer[pos], buffer[pos + 1], buffer[pos + 2], buffer[pos + 3]])
    }

    #[test]
    fn test_wav_header_write() -> io::Result<()> {
        let mut writer = WAVWriter::new(Cursor::new(Vec::new()));
        writer.configure_audio_format(43200, 1, 8)?;
        writer.write_header()?;

        let buffer = writer.into_inner()?.into_inner();
        assert_eq!(buffer.len(), WAV_HEADER_LEN as usize);
        assert_eq!(&buffer[0..4], b"RIFF");
        assert_eq!(&buffer[8..16], b"WAVEfmt ");
        assert_eq!(u32_at(&buffer, 16), 16);
        assert_eq!(&buffer[20..24], &[1, 0, 1, 0]);
        assert_eq!(u32_at(&buffer, 24), 43200);
        assert_eq!(u32_at(&buffer, 28), 43200);
        assert_eq!(&buffer[32..36], &[1, 0, 8, 0]);
        assert_eq!(&buffer[36..40], b"data");
        assert_eq!(u32_at(&buffer, 40), 0);

        Ok(())
    }

    #[test]
    fn test_wav_finish_patches_sizes() -> io::Result<()> {
        let mut writer = WAVWriter::new(Cursor::new(Vec::new()));
        writer.write_header()?;
        writer.write_all(&[128; 1001])?;
        assert_eq!(writer.stats().data_written, 1001);
        writer.finish()?;

        let buffer = writer.into_inner()?.into_inner();
        assert_eq!(buffer.len(), 44 + 1001);
        assert_eq!(u32_at(&buffer, 4), 1001 + 36);
        assert_eq!(u32_at(&buffer, 40), 1001);
        assert!(buffer[44..].iter().all(|&s| s == 128));

        Ok(())
    }

    #[test]
    fn test_format_locked_after_data() -> io::Result<()> {
        let mut writer = WAVWriter::new(Cursor::new(Vec::new()));
        writer.write_header()?;
        writer.write_all(&[0])?;
        assert!(writer.configure_audio_format(48000, 2, 16).is_err());
        Ok(())
    }
}
