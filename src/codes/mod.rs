//! Code lookup: fixed IRS code tables plus the file-backed NTEE codebook.

pub mod ntee;
pub mod tables;

pub use ntee::{NteeCodebook, NteeEntry};
pub use tables::{lookup, CodeTable};
