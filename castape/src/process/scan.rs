use log::Level;

use crate::log_or_err;
use crate::process::encode::{
    EncodingConfig, LONG_SILENCE, SHORT_SILENCE, SYNC_BLOCK, SYNC_INITIAL, SignalWriter,
};
use crate::structs::block::{BlockKind, EOF_MARKER, MARKER, TYPE_ID_LEN, is_marker};
use crate::utils::errors::ScanError;

/// What a single [Scanner::step] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A byte that does not start a marker was skipped.
    Skipped { offset: usize },
    /// A marker was found and the file starting there was emitted.
    File(FileSummary),
}

/// Summary of the segments emitted for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Offset of the marker the file starts at.
    pub offset: usize,
    pub kind: BlockKind,
    /// `true` if the type identifier was cut off by the end of the image.
    pub truncated: bool,
    /// Number of payload segments (blocks) emitted.
    pub segments: usize,
    /// Number of payload bytes emitted.
    pub bytes: usize,
    /// `true` if the end of file sentinel was seen in the last segment.
    pub eof: bool,
}

/// A transmitted payload segment.
#[derive(Debug, Clone, Copy)]
struct Segment {
    bytes: usize,
    eof: bool,
}

/// Walks a tape image and emits the tape signal of every file it finds.
///
/// The scanner searches for block markers byte by byte. Bytes outside any
/// block are skipped with a warning. Each marker starts a file whose emission
/// depends on the type identifier following the marker:
///
/// - **ASCII**: silence, initial sync and the header block, then a short
///   silence and block sync before each following block until one contains
///   the end of file sentinel `0x1A`.
/// - **Binary/BASIC**: silence, initial sync and the header block, then
///   exactly one more block with a short silence and block sync.
/// - **Unknown**: the long silence, initial sync and a single block.
///
/// # Example
///
/// ```rust
/// use castape::process::{EXAMPLE_DATA, encode::{EncodingConfig, Encoder}};
/// use castape::process::scan::{ScanEvent, Scanner};
///
/// let mut encoder = Encoder::new(Vec::new(), EncodingConfig::default());
/// let mut scanner = Scanner::new(EXAMPLE_DATA, &EncodingConfig::default());
///
/// while let Some(event) = scanner.step(&mut encoder)? {
///     if let ScanEvent::File(file) = event {
///         println!("{} file with {} blocks", file.kind, file.segments);
///     }
/// }
/// assert!(scanner.is_done());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Scanner<'a> {
    image: &'a [u8],
    position: usize,
    silence: u32,
    fail_level: Level,
    skipped: usize,
    files: usize,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner over `image` using the silence of `config` before each file.
    pub fn new(image: &'a [u8], config: &EncodingConfig) -> Self {
        Self {
            image,
            position: 0,
            silence: config.silence,
            fail_level: Level::Error,
            skipped: 0,
            files: 0,
        }
    }

    /// Sets the log level at which image anomalies abort the scan.
    ///
    /// Anomalies are reported at [Level::Warn]; with the default of
    /// [Level::Error] they are only logged.
    pub fn set_fail_level(&mut self, level: Level) {
        self.fail_level = level;
    }

    /// Current offset into the image.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.image.len()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    pub fn is_done(&self) -> bool {
        self.position >= self.image.len()
    }

    /// Number of bytes skipped outside blocks so far.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of files emitted so far.
    pub fn files(&self) -> usize {
        self.files
    }

    /// Scans the rest of the image.
    pub fn run<S: SignalWriter>(&mut self, out: &mut S) -> Result<(), ScanError> {
        while self.step(out)?.is_some() {}
        Ok(())
    }

    /// Handles one skipped byte or one file. Returns `None` at the end of the image.
    pub fn step<S: SignalWriter>(&mut self, out: &mut S) -> Result<Option<ScanEvent>, ScanError> {
        if self.is_done() {
            return Ok(None);
        }

        let offset = self.position;
        if !is_marker(&self.image[offset..]) {
            self.skipped += 1;
            self.position += 1;
            log_or_err!(self, Level::Warn, ScanError::UnalignedData { offset });
            return Ok(Some(ScanEvent::Skipped { offset }));
        }

        self.position += MARKER.len();

        let (kind, truncated) = match self.image.get(self.position..self.position + TYPE_ID_LEN) {
            Some(id) => (BlockKind::identify(id), false),
            None => (BlockKind::Unknown, true),
        };

        let summary = if truncated {
            log_or_err!(self, Level::Warn, ScanError::TruncatedTypeIdentifier { offset });
            self.emit_single(out, offset, self.silence)?
        } else {
            match kind {
                BlockKind::Ascii => self.emit_ascii(out, offset)?,
                BlockKind::BinaryOrBasic => self.emit_binary(out, offset)?,
                BlockKind::Unknown => {
                    log_or_err!(self, Level::Warn, ScanError::UnknownBlockType { offset });
                    self.emit_single(out, offset, LONG_SILENCE)?
                }
            }
        };

        let summary = FileSummary { truncated, ..summary };
        log::debug!(
            "{} file at {:#08x}: {} blocks, {} bytes",
            summary.kind,
            summary.offset,
            summary.segments,
            summary.bytes
        );

        self.files += 1;
        Ok(Some(ScanEvent::File(summary)))
    }

    fn emit_ascii<S: SignalWriter>(
        &mut self,
        out: &mut S,
        offset: usize,
    ) -> Result<FileSummary, ScanError> {
        out.emit_silence(self.silence)?;
        out.emit_sync(SYNC_INITIAL)?;
        let mut segment = self.transmit(out)?;

        let mut summary = FileSummary {
            offset,
            kind: BlockKind::Ascii,
            truncated: false,
            segments: 1,
            bytes: segment.bytes,
            eof: segment.eof,
        };

        while !segment.eof && is_marker(&self.image[self.position..]) {
            self.position += MARKER.len();
            out.emit_silence(SHORT_SILENCE)?;
            out.emit_sync(SYNC_BLOCK)?;
            segment = self.transmit(out)?;

            summary.segments += 1;
            summary.bytes += segment.bytes;
        }

        summary.eof = segment.eof;
        Ok(summary)
    }

    fn emit_binary<S: SignalWriter>(
        &mut self,
        out: &mut S,
        offset: usize,
    ) -> Result<FileSummary, ScanError> {
        out.emit_silence(self.silence)?;
        out.emit_sync(SYNC_INITIAL)?;
        let header = self.transmit(out)?;

        out.emit_silence(SHORT_SILENCE)?;
        out.emit_sync(SYNC_BLOCK)?;
        if is_marker(&self.image[self.position..]) {
            self.position += MARKER.len();
        }
        let data = self.transmit(out)?;

        Ok(FileSummary {
            offset,
            kind: BlockKind::BinaryOrBasic,
            truncated: false,
            segments: 2,
            bytes: header.bytes + data.bytes,
            eof: data.eof,
        })
    }

    fn emit_single<S: SignalWriter>(
        &mut self,
        out: &mut S,
        offset: usize,
        silence: u32,
    ) -> Result<FileSummary, ScanError> {
        out.emit_silence(silence)?;
        out.emit_sync(SYNC_INITIAL)?;
        let segment = self.transmit(out)?;

        Ok(FileSummary {
            offset,
            kind: BlockKind::Unknown,
            truncated: false,
            segments: 1,
            bytes: segment.bytes,
            eof: segment.eof,
        })
    }

    /// Emits bytes up to the next marker (left unconsumed) or the end of the image.
    fn transmit<S: SignalWriter>(&mut self, out: &mut S) -> Result<Segment, ScanError> {
        let start = self.position;
        let mut eof = false;

        while self.position < self.image.len() && !is_marker(&self.image[self.position..]) {
            let byte = self.image[self.position];
            out.emit_byte(byte)?;
            eof |= byte == EOF_MARKER;
            self.position += 1;
        }

        Ok(Segment {
            bytes: self.position - start,
            eof,
        })
    }
}
