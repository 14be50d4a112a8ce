use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures of `HeapDict` operations.
///
/// An operation that returns an error has not modified the container.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("key not found")]
    KeyNotFound,

    /// The initial entries repeat a key; `position` is the index of the
    /// second occurrence in the input.
    #[error("duplicate key at position {position}")]
    DuplicateKey { position: usize },

    #[error("heapdict is empty")]
    Empty,
}
