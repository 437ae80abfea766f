//! NoteStore — file-per-note storage in the cache directory
//!
//! Every operation checks for the backing file right before acting on it.
//! Nothing is cached in memory, so the cache directory can be edited by hand
//! while the server is running.

use super::error::{NoteError, Result};
use super::file_ops;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A note as returned by the list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub name: String,
    pub text: String,
}

/// NoteStore mapping note names to `<name>.txt` files
#[derive(Debug)]
pub struct NoteStore {
    cache_dir: PathBuf,
}

impl NoteStore {
    /// Open the store, creating the cache directory if it does not exist yet
    pub fn open(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        if !cache_dir.exists() {
            fs::create_dir_all(cache_dir)?;
            log::info!("[NOTES] Created cache directory {}", cache_dir.display());
        }

        Ok(Self {
            cache_dir: cache_dir.canonicalize()?,
        })
    }

    /// Get the absolute cache directory path
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if !file_ops::is_valid_name(name) {
            return Err(NoteError::InvalidName(name.to_string()));
        }
        Ok(file_ops::note_path(&self.cache_dir, name))
    }

    /// Read a note's text
    pub fn get(&self, name: &str) -> Result<String> {
        let path = self.path_for(name)?;
        match file_ops::read_note(&path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(NoteError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the text of an existing note
    pub fn put(&self, name: &str, text: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(NoteError::NotFound(name.to_string()));
        }

        file_ops::write_note(&path, text)?;
        log::debug!("[NOTES] Updated '{}' ({} bytes)", name, text.len());
        Ok(())
    }

    /// Delete an existing note
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("[NOTES] Deleted '{}'", name);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(NoteError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List every note in directory enumeration order
    pub fn list(&self) -> Result<Vec<Note>> {
        let files = file_ops::list_note_files(&self.cache_dir)?;

        let mut notes = Vec::with_capacity(files.len());
        for path in files {
            let Some(name) = file_ops::note_name(&path) else {
                continue;
            };
            match file_ops::read_note(&path) {
                Ok(text) => notes.push(Note { name, text }),
                // Removed between the directory scan and the read
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(notes)
    }

    /// Create a new note. Both name and text must be non-empty.
    pub fn create(&self, name: &str, text: &str) -> Result<()> {
        if name.is_empty() || text.is_empty() {
            return Err(NoteError::InvalidInput(
                "Missing required fields: note_name or note".to_string(),
            ));
        }

        let path = self.path_for(name)?;
        if path.exists() {
            return Err(NoteError::AlreadyExists(name.to_string()));
        }

        match file_ops::write_new_note(&path, text) {
            Ok(()) => {
                log::info!("[NOTES] Created '{}' ({} bytes)", name, text.len());
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                Err(NoteError::AlreadyExists(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
