// Copyright (C) 2020-2026 Andy Kurnia.

pub struct MyError {
    s: String,
}

impl std::fmt::Display for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.s)
    }
}

impl std::fmt::Debug for MyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (self as &dyn std::fmt::Display).fmt(f)
    }
}

impl std::error::Error for MyError {}

pub fn new(s: String) -> MyError {
    MyError { s }
}

pub type BoxAnyError = Box<dyn std::error::Error + Send + Sync>;
pub type Returns<T> = Result<T, BoxAnyError>;

#[macro_export]
macro_rules! return_error {
    ($error:expr) => {
        return Err($crate::error::new($error).into());
    };
}

/// Coarse classification of a failed dictionary load, so callers can decide
/// whether another source is worth trying.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    NotFound,
    Truncated,
    Invalid,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("dictionary not found: {0}")]
    NotFound(String),

    #[error("cannot read dictionary: {0}")]
    Io(#[from] std::io::Error),

    #[error("dictionary data is empty")]
    Empty,

    #[error("dictionary data is truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("dictionary data is corrupt: {0}")]
    Corrupt(String),

    #[error("this format cannot have {0} records")]
    TooLarge(usize),
}

impl DictionaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DictionaryError::NotFound(_) => ErrorKind::NotFound,
            DictionaryError::Empty | DictionaryError::Truncated { .. } => ErrorKind::Truncated,
            DictionaryError::Io(_) | DictionaryError::Corrupt(_) | DictionaryError::TooLarge(_) => {
                ErrorKind::Invalid
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrieError {
    #[error("{word:?} contains the reserved character U+0000")]
    ReservedCharacter { word: String },

    #[error("cannot insert {word:?} into a reduced trie")]
    AlreadyReduced { word: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("board: {0}")]
    InvalidBoard(String),

    #[error("rack: {0}")]
    InvalidRack(String),

    #[error("search worker failed: {0}")]
    WorkerFailed(String),
}
