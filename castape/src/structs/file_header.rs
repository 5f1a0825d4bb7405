use std::fmt::Display;

use serde::Serialize;

use super::block::{FILE_NAME_LEN, FileType, TYPE_ID_LEN};

/// The first block of a file: a type identifier followed by a 6-character name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub file_type: FileType,
    pub name: [u8; FILE_NAME_LEN],
}

impl FileHeader {
    /// Parses a file header from the bytes right after a block marker.
    ///
    /// Returns `None` for an unrecognized identifier or when the name is truncated.
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let file_type = FileType::from_identifier(data)?;
        let name = data
            .get(TYPE_ID_LEN..TYPE_ID_LEN + FILE_NAME_LEN)?
            .try_into()
            .ok()?;

        Some(Self { file_type, name })
    }

    /// The file name with non-printable bytes replaced.
    pub fn name_lossy(&self) -> String {
        self.name
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '?'
                }
            })
            .collect()
    }
}

/// Load addresses stored at the start of the data block of a binary file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BinaryAddresses {
    pub start: u16,
    pub end: u16,
    pub exec: u16,
}

impl BinaryAddresses {
    pub const LEN: usize = 6;

    /// Reads three little-endian words. An exec address of zero means "same as start".
    pub fn from_bytes(data: &[u8]) -> Option<Self> {
        let data = data.get(..Self::LEN)?;
        let word = |i: usize| u16::from_le_bytes([data[i], data[i + 1]]);

        let start = word(0);
        let end = word(2);
        let exec = match word(4) {
            0 => start,
            exec => exec,
        };

        Some(Self { start, end, exec })
    }
}

impl Display for BinaryAddresses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04x},{:04x},{:04x}", self.start, self.end, self.exec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::block::{ASCII_ID, BINARY_ID};

    #[test]
    fn parse_file_header() {
        let mut data = BINARY_ID.to_vec();
        data.extend_from_slice(b"LOADER");
        let header = FileHeader::from_bytes(&data).unwrap();
        assert_eq!(header.file_type, FileType::Binary);
        assert_eq!(header.name_lossy(), "LOADER");

        assert!(FileHeader::from_bytes(&data[..15]).is_none());
        assert!(FileHeader::from_bytes(&[0u8; 16]).is_none());

        let mut data = ASCII_ID.to_vec();
        data.extend_from_slice(&[b'A', 0x00, b'B', b' ', b' ', 0xFF]);
        assert_eq!(FileHeader::from_bytes(&data).unwrap().name_lossy(), "A?B  ?");
    }

    #[test]
    fn exec_defaults_to_start() {
        let addrs = BinaryAddresses::from_bytes(&[0x00, 0x90, 0x02, 0x90, 0x00, 0x00]).unwrap();
        assert_eq!(addrs.exec, 0x9000);
        assert_eq!(addrs.to_string(), "9000,9002,9000");

        let addrs = BinaryAddresses::from_bytes(&[0x00, 0xC0, 0xFF, 0xCF, 0x10, 0xC0]).unwrap();
        assert_eq!(addrs.to_string(), "c000,cfff,c010");

        assert!(BinaryAddresses::from_bytes(&[0x00, 0xC0]).is_none());
    }
}
