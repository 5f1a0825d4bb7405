//! Supporting infrastructure.
//!
//! Provides the sine lookup table and pulse synthesis, the buffered PCM sink
//! and the error types used by the scanner.

pub mod errors;
pub mod sink;
pub mod tone;
