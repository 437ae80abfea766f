//! Notes system — plain-text notes stored one file per note
//!
//! Each note `<name>` lives in `<cache_dir>/<name>.txt`. The directory listing
//! is the only index; every operation goes straight to the filesystem.

pub mod error;
pub mod file_ops;
pub mod store;

pub use error::{NoteError, Result};
pub use store::{Note, NoteStore};
