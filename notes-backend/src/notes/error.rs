use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoteError {
    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("Note already exists: {0}")]
    AlreadyExists(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("Invalid note name: {0:?}")]
    InvalidName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NoteError>;
