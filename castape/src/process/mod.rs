/// Directory listing of tape images.
///
/// Provides the [`Catalog`](catalog::Catalog) iterator yielding one
/// [`CatalogEntry`](catalog::CatalogEntry) per file stored in an image.
pub mod catalog;

/// FSK signal encoding.
///
/// Provides the [`SignalWriter`](encode::SignalWriter) trait and the
/// [`Encoder`](encode::Encoder) which synthesizes 8-bit PCM samples.
pub mod encode;

/// Block scanning.
///
/// Provides the [`Scanner`](scan::Scanner) which walks an image and drives a
/// [`SignalWriter`](encode::SignalWriter).
pub mod scan;

/// A binary file named `DEMO` loading three bytes at `0x9000`.
#[rustfmt::skip]
pub const EXAMPLE_DATA: &[u8] = &[
    0x1F, 0xA6, 0xDE, 0xBA, 0xCC, 0x13, 0x7D, 0x74,
    0xD0, 0xD0, 0xD0, 0xD0, 0xD0, 0xD0, 0xD0, 0xD0, 0xD0, 0xD0,
    0x44, 0x45, 0x4D, 0x4F, 0x20, 0x20,
    0x1F, 0xA6, 0xDE, 0xBA, 0xCC, 0x13, 0x7D, 0x74,
    0x00, 0x90, 0x02, 0x90, 0x00, 0x90, 0x3E, 0x01, 0xC9,
];
