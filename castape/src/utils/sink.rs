use std::io::{self, Write};

/// Default capacity of the PCM buffer in bytes.
pub const PCM_BUFFER_SIZE: usize = 16 * 1024;

/// Accumulates 8-bit PCM samples and writes them out in full buffers.
///
/// The buffered tail is only written by [PcmSink::flush] (or [PcmSink::into_inner]);
/// dropping the sink discards it.
#[derive(Debug)]
pub struct PcmSink<W: Write> {
    writer: W,
    buffer: Box<[u8]>,
    position: usize,
}

impl<W: Write> PcmSink<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(PCM_BUFFER_SIZE, writer)
    }

    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn with_capacity(capacity: usize, writer: W) -> Self {
        assert!(capacity > 0, "PCM buffer capacity must be non-zero");
        Self {
            writer,
            buffer: vec![0u8; capacity].into_boxed_slice(),
            position: 0,
        }
    }

    /// Appends one sample, flushing when the buffer becomes full.
    #[inline]
    pub fn put(&mut self, sample: u8) -> io::Result<()> {
        self.buffer[self.position] = sample;
        self.position += 1;
        if self.position == self.buffer.len() {
            self.flush()?;
        }
        Ok(())
    }

    /// Appends `count` copies of `sample`.
    pub fn put_repeated(&mut self, sample: u8, count: usize) -> io::Result<()> {
        let mut remaining = count;
        while remaining > 0 {
            let chunk = remaining.min(self.buffer.len() - self.position);
            self.buffer[self.position..self.position + chunk].fill(sample);
            self.position += chunk;
            remaining -= chunk;
            if self.position == self.buffer.len() {
                self.flush()?;
            }
        }
        Ok(())
    }

    /// Writes all buffered samples to the inner writer and empties the buffer.
    pub fn flush(&mut self) -> io::Result<()> {
        if self.position > 0 {
            self.writer.write_all(&self.buffer[..self.position])?;
            self.position = 0;
        }
        self.writer.flush()
    }

    /// Number of samples waiting in the buffer.
    pub fn buffered(&self) -> usize {
        self.position
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Flushes the buffer and returns the inner writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        self.flush()?;
        Ok(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flushes_on_full_buffer() -> io::Result<()> {
        let mut sink = PcmSink::with_capacity(4, Vec::new());
        for sample in 1..=6 {
            sink.put(sample)?;
        }
        assert_eq!(sink.get_ref(), &[1, 2, 3, 4]);
        assert_eq!(sink.buffered(), 2);

        sink.put(7)?;
        sink.put(8)?;
        assert_eq!(sink.get_ref().len(), 8);
        assert_eq!(sink.buffered(), 0);

        sink.put(9)?;
        let out = sink.into_inner()?;
        assert_eq!(out, (1..=9).collect::<Vec<u8>>());
        Ok(())
    }

    #[test]
    fn repeated_spans_buffers() -> io::Result<()> {
        let mut sink = PcmSink::with_capacity(5, Vec::new());
        sink.put(1)?;
        sink.put_repeated(128, 11)?;
        assert_eq!(sink.get_ref().len(), 10);
        assert_eq!(sink.buffered(), 2);

        let out = sink.into_inner()?;
        assert_eq!(out.len(), 12);
        assert_eq!(out[0], 1);
        assert!(out[1..].iter().all(|&s| s == 128));
        Ok(())
    }

    #[test]
    fn write_errors_propagate() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk full"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = PcmSink::with_capacity(2, Broken);
        assert!(sink.put(0).is_ok());
        assert!(sink.put(0).is_err());
    }
}
