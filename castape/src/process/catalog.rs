use std::fmt::Display;

use serde::Serialize;

use crate::structs::block::{EOF_MARKER, FileType, MARKER, find_marker};
use crate::structs::file_header::{BinaryAddresses, FileHeader};

/// Kind of a cataloged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "type")]
pub enum EntryKind {
    Ascii,
    Binary(BinaryAddresses),
    Basic,
    /// A block without a known type identifier.
    Custom,
}

/// One file found in a tape image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// Offset of the data following the marker of the first block.
    pub offset: usize,
    /// File name, `None` for custom blocks.
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

impl Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = self.name.as_deref().unwrap_or("------");
        match &self.kind {
            EntryKind::Ascii => write!(f, "{name:6}  ascii"),
            EntryKind::Binary(addresses) => write!(f, "{name:6}  binary  {addresses}"),
            EntryKind::Basic => write!(f, "{name:6}  basic"),
            EntryKind::Custom => write!(f, "{name:6}  custom  {:06x}", self.offset),
        }
    }
}

/// What the block after the current one is expected to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expect {
    /// A file header or a custom block.
    Header,
    /// ASCII data blocks, up to the one holding the end of file sentinel.
    AsciiData,
    /// The load addresses of a binary file.
    BinaryAddresses { offset: usize, name: String },
    /// The tokenized program of a BASIC file.
    BasicData,
}

/// Lists the files stored in a tape image.
///
/// Iterates the blocks of the image and yields an entry per file header or
/// unrecognized block. Data blocks are consumed silently, except for the first
/// data block of a binary file whose load addresses complete its entry.
///
/// ```rust
/// use castape::process::EXAMPLE_DATA;
/// use castape::process::catalog::Catalog;
///
/// let entries: Vec<String> = Catalog::new(EXAMPLE_DATA).map(|e| e.to_string()).collect();
/// assert_eq!(entries, ["DEMO    binary  9000,9002,9000"]);
/// ```
#[derive(Debug)]
pub struct Catalog<'a> {
    image: &'a [u8],
    position: usize,
    expect: Expect,
}

impl<'a> Catalog<'a> {
    pub fn new(image: &'a [u8]) -> Self {
        Self {
            image,
            position: 0,
            expect: Expect::Header,
        }
    }

    /// Returns the payload of the next block and moves past it.
    fn next_block(&mut self) -> Option<(usize, &'a [u8])> {
        let start = find_marker(self.image, self.position)? + MARKER.len();
        let end = find_marker(self.image, start).unwrap_or(self.image.len());
        self.position = end;
        Some((start, &self.image[start..end]))
    }
}

impl Iterator for Catalog<'_> {
    type Item = CatalogEntry;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (offset, payload) = self.next_block()?;

            match std::mem::replace(&mut self.expect, Expect::Header) {
                Expect::Header => {
                    let Some(header) = FileHeader::from_bytes(payload) else {
                        log::debug!("Custom block at {offset:#08x}");
                        return Some(CatalogEntry {
                            offset,
                            name: None,
                            kind: EntryKind::Custom,
                        });
                    };

                    let name = header.name_lossy();
                    match header.file_type {
                        FileType::Ascii => {
                            self.expect = Expect::AsciiData;
                            return Some(CatalogEntry {
                                offset,
                                name: Some(name),
                                kind: EntryKind::Ascii,
                            });
                        }
                        FileType::Basic => {
                            self.expect = Expect::BasicData;
                            return Some(CatalogEntry {
                                offset,
                                name: Some(name),
                                kind: EntryKind::Basic,
                            });
                        }
                        FileType::Binary => {
                            self.expect = Expect::BinaryAddresses { offset, name };
                        }
                    }
                }
                Expect::AsciiData => {
                    if !payload.contains(&EOF_MARKER) {
                        self.expect = Expect::AsciiData;
                    }
                }
                Expect::BinaryAddresses { offset, name } => match BinaryAddresses::from_bytes(payload) {
                    Some(addresses) => {
                        return Some(CatalogEntry {
                            offset,
                            name: Some(name),
                            kind: EntryKind::Binary(addresses),
                        });
                    }
                    None => log::warn!("Binary file {name} has a truncated address block"),
                },
                Expect::BasicData => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::EXAMPLE_DATA;
    use crate::structs::block::{ASCII_ID, BASIC_ID, BINARY_ID};

    fn push_block(image: &mut Vec<u8>, parts: &[&[u8]]) {
        image.extend_from_slice(&MARKER);
        for part in parts {
            image.extend_from_slice(part);
        }
    }

    fn listing(image: &[u8]) -> Vec<String> {
        Catalog::new(image).map(|entry| entry.to_string()).collect()
    }

    #[test]
    fn lists_all_file_types() {
        let mut image = Vec::new();
        push_block(&mut image, &[&ASCII_ID, b"README"]);
        push_block(&mut image, &[b"first block"]);
        push_block(&mut image, &[b"last block\x1a\x1a"]);
        push_block(&mut image, &[&BASIC_ID, b"GAME  "]);
        push_block(&mut image, &[&BINARY_ID]);
        push_block(&mut image, &[&BINARY_ID, b"LOADER"]);
        push_block(&mut image, &[&[0x00, 0xC0, 0xFF, 0xCF, 0x10, 0xC0], b"code"]);
        push_block(&mut image, &[&[0x12; 10]]);

        assert_eq!(
            listing(&image),
            [
                "README  ascii",
                "GAME    basic",
                "LOADER  binary  c000,cfff,c010",
                "------  custom  00009b",
            ]
        );
    }

    #[test]
    fn example_data() {
        let entries: Vec<CatalogEntry> = Catalog::new(EXAMPLE_DATA).collect();
        assert_eq!(
            entries,
            [CatalogEntry {
                offset: 8,
                name: Some("DEMO  ".to_string()),
                kind: EntryKind::Binary(BinaryAddresses {
                    start: 0x9000,
                    end: 0x9002,
                    exec: 0x9000,
                }),
            }]
        );
    }

    #[test]
    fn binary_without_address_block_is_dropped() {
        let mut image = Vec::new();
        push_block(&mut image, &[&BINARY_ID, b"BROKEN"]);
        assert!(listing(&image).is_empty());

        push_block(&mut image, &[&[0x00, 0x80]]);
        assert!(listing(&image).is_empty());
    }

    #[test]
    fn ignores_unaligned_leading_bytes() {
        let mut image = vec![0x00, 0x1F, 0xA6];
        push_block(&mut image, &[&ASCII_ID, b"NOTES ", b"\x1a"]);
        assert_eq!(listing(&image), ["NOTES   ascii"]);
    }
}
