//! CMIP Core Library
//!
//! This library provides the data structures and binary wire format of the
//! CMIP compressed mipmap container: a thin wrapper around one or more
//! ASTC-compressed texture levels stored back to back.

pub mod container;
pub mod format;
pub mod header;

pub use container::{ContainerHeader, ContainerKind, MipmapContainer, MipmapLevel, CONTAINER_MAGIC};
pub use format::{classify, is_valid_block_size, PixelFormat, TARGET_FORMAT};
pub use header::{AstcLevelHeader, ASTC_HEADER_LENGTH, ASTC_MAGIC};

/// Result type for cmip-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cmip-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid magic number in ASTC header: {found:#010x}")]
    BadMagic { found: u32 },

    #[error("Invalid block size in ASTC header: {x}x{y}x{z}")]
    BadBlockSize { x: u8, y: u8, z: u8 },

    #[error("Truncated buffer: needed {needed} bytes at offset {offset}, only {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Container declares no mipmap levels")]
    NoLevels,

    #[error("Level {level} declares {declared} bytes, less than the ASTC header")]
    LevelTooSmall { level: usize, declared: u32 },

    #[error("Level {level} is too large to be described by a container: {len} bytes")]
    LevelTooLarge { level: usize, len: usize },

    #[error("Too many levels to be described by a container: {count}")]
    TooManyLevels { count: usize },

    #[error("Level {level} has no declared size but is followed by further levels")]
    UnsizedLevel { level: usize },

    #[error("Level {level} block size {found:?} differs from the base level {expected:?}")]
    MismatchedBlockSize {
        level: usize,
        expected: (u8, u8),
        found: (u8, u8),
    },
}

/// Errors raised while decoding the container format
pub type FormatError = Error;

/// Borrows `len` bytes of `data` starting at `offset`.
///
/// Fails with [`Error::Truncated`] instead of reading past the end of the buffer.
pub fn window(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    let truncated = || Error::Truncated {
        offset,
        needed: len,
        available: data.len().saturating_sub(offset),
    };
    let end = offset.checked_add(len).ok_or_else(truncated)?;
    data.get(offset..end).ok_or_else(truncated)
}
