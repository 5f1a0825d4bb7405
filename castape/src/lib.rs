//! MSX cassette image (`.cas`) scanner and FSK tape signal encoder.
//!
//! ## Technical Overview
//!
//! A `.cas` image is a flat byte sequence of blocks. Every block starts with an
//! 8-byte synchronization marker and, for the first block of a file, a 10-byte
//! type identifier followed by a 6-byte file name.
//!
//! ### Tape Signal
//!
//! The MSX BIOS records bits with frequency-shift keying:
//!
//! - a `0` bit is one cycle at 1200 Hz
//! - a `1` bit is two cycles at 2400 Hz
//! - every byte is framed by one start bit (`0`) and two stop bits (`1`)
//!
//! Blocks are preceded by a silence gap and a run of 2400 Hz sync pulses,
//! long for the first block of a file and short for the following ones.
//!
//! ## Quick Start
//!
//! 1. Wrap an output writer with an [`process::encode::Encoder`]
//! 2. Walk the image with a [`process::scan::Scanner`]
//! 3. Call [`process::encode::Encoder::finish`] to flush the PCM buffer
//!
//! ```rust
//! use castape::process::{EXAMPLE_DATA, encode::{EncodingConfig, Encoder}, scan::Scanner};
//!
//! let config = EncodingConfig::default();
//! let mut encoder = Encoder::new(Vec::new(), config);
//!
//! let mut scanner = Scanner::new(EXAMPLE_DATA, &config);
//! scanner.run(&mut encoder)?;
//!
//! let pcm = encoder.finish()?;
//! assert_eq!(pcm.len(), 499_500);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Processing of tape images.
///
/// 1. **Scanning** ([`process::scan`]): locates block markers and decides
///    which silence, sync and data segments to emit.
///
/// 2. **Encoding** ([`process::encode`]): turns bytes and sync runs into
///    8-bit PCM samples.
///
/// 3. **Cataloging** ([`process::catalog`]): lists the files stored in an image.
pub mod process;

/// Data structures of the `.cas` format.
///
/// - **Blocks** ([`structs::block`]): markers, type identifiers and block kinds
/// - **File headers** ([`structs::file_header`]): names and binary load addresses
pub mod structs;

/// Supporting infrastructure.
///
/// - **Tones** ([`utils::tone`]): sine table and pulse synthesis
/// - **PCM sink** ([`utils::sink`]): buffered sample output
/// - **Error handling** ([`utils::errors`]): error types
pub mod utils;
