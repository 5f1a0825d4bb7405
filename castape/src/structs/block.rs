use std::fmt::Display;

use serde::Serialize;

/// Block synchronization marker. Every block in a `.cas` image starts with it.
pub const MARKER: [u8; 8] = [0x1F, 0xA6, 0xDE, 0xBA, 0xCC, 0x13, 0x7D, 0x74];

/// Length of a file type identifier.
pub const TYPE_ID_LEN: usize = 10;

/// Length of a file name following the type identifier.
pub const FILE_NAME_LEN: usize = 6;

/// Type identifier of an ASCII text file.
pub const ASCII_ID: [u8; TYPE_ID_LEN] = [0xEA; TYPE_ID_LEN];

/// Type identifier of a binary (machine code) file.
pub const BINARY_ID: [u8; TYPE_ID_LEN] = [0xD0; TYPE_ID_LEN];

/// Type identifier of a tokenized BASIC program.
pub const BASIC_ID: [u8; TYPE_ID_LEN] = [0xD3; TYPE_ID_LEN];

/// End of file sentinel inside ASCII data blocks.
pub const EOF_MARKER: u8 = 0x1A;

/// Returns `true` if `data` starts with a complete [MARKER].
#[inline]
pub fn is_marker(data: &[u8]) -> bool {
    data.starts_with(&MARKER)
}

/// Returns the offset of the first [MARKER] at or after `from`.
pub fn find_marker(data: &[u8], from: usize) -> Option<usize> {
    data.get(from..)?
        .windows(MARKER.len())
        .position(|window| window == MARKER)
        .map(|offset| from + offset)
}

/// File types known to the MSX BIOS tape routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Ascii,
    Binary,
    Basic,
}

impl FileType {
    /// Recognizes a 10-byte type identifier.
    pub fn from_identifier(id: &[u8]) -> Option<Self> {
        if id.len() < TYPE_ID_LEN {
            return None;
        }

        match &id[..TYPE_ID_LEN] {
            id if id == &ASCII_ID[..] => Some(FileType::Ascii),
            id if id == &BINARY_ID[..] => Some(FileType::Binary),
            id if id == &BASIC_ID[..] => Some(FileType::Basic),
            _ => None,
        }
    }
}

impl Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileType::Ascii => write!(f, "ascii"),
            FileType::Binary => write!(f, "binary"),
            FileType::Basic => write!(f, "basic"),
        }
    }
}

/// Block classification driving the emission policy.
///
/// Binary and BASIC files are recorded the same way (a header block followed by
/// exactly one data block), so they share a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Ascii,
    BinaryOrBasic,
    Unknown,
}

impl BlockKind {
    /// Classifies a type identifier. Short or unrecognized identifiers are [BlockKind::Unknown].
    pub fn identify(id: &[u8]) -> Self {
        match FileType::from_identifier(id) {
            Some(FileType::Ascii) => BlockKind::Ascii,
            Some(FileType::Binary | FileType::Basic) => BlockKind::BinaryOrBasic,
            None => BlockKind::Unknown,
        }
    }
}

impl Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockKind::Ascii => write!(f, "ASCII"),
            BlockKind::BinaryOrBasic => write!(f, "binary/BASIC"),
            BlockKind::Unknown => write!(f, "unknown"),
        }
    }
}
