//! Data structures of the `.cas` tape image format.

pub mod block;
pub mod file_header;
