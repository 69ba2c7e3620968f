use thiserror::Error;

/// Error kinds returned by [`crate::Engine`] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error("out of memory")]
    OutOfMemory,
    #[error("no space: table is at maximum capacity and its probe chain is saturated")]
    NoSpace,
    #[error("key not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, Error>;
