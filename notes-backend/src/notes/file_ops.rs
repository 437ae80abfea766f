//! File operations for the notes cache
//!
//! Handles name validation, note path derivation, and raw reading/writing of
//! `<name>.txt` files.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Extension given to every note file
pub const NOTE_EXTENSION: &str = "txt";

/// Check that a note name can be joined onto the cache directory without
/// escaping it (no separators, no NUL, not `.` or `..`).
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// Path of the file backing `name` (e.g. "groceries" -> "<cache>/groceries.txt")
pub fn note_path(cache_dir: &Path, name: &str) -> PathBuf {
    cache_dir.join(format!("{}.{}", name, NOTE_EXTENSION))
}

/// Derive a note name from a file path by stripping its extension
pub fn note_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

/// Read a note file as text, replacing invalid UTF-8 sequences
pub fn read_note(path: &Path) -> io::Result<String> {
    let raw = fs::read(path)?;
    Ok(String::from_utf8_lossy(&raw).to_string())
}

/// Overwrite an existing note file (or create it) with `content`
pub fn write_note(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Write a brand new note file, failing with `AlreadyExists` if one is present
pub fn write_new_note(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// List every regular file directly inside the cache directory, in directory
/// enumeration order. Symlinks are followed, so a link to a file counts.
pub fn list_note_files(cache_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(cache_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}
