use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("block {0} does not exist")]
    BlockNotFound(u32),
    #[error("payload of {len} bytes exceeds the block size of {block_size} bytes")]
    Overflow { len: usize, block_size: usize },
    #[error("buffer of {len} bytes does not match the block size of {block_size} bytes")]
    BufferSize { len: usize, block_size: usize },
    #[error("name of {0} bytes exceeds the 255 byte limit")]
    NameTooLong(usize),
    #[error("empty entry name")]
    InvalidName,
    #[error("no entry named {0:?}")]
    NotFound(String),
    #[error("an entry named {0:?} already exists")]
    AlreadyExists(String),
    #[error("directory is full ({0} entries)")]
    DirectoryFull(usize),
    #[error("file of {len} bytes exceeds the maximum of {max} bytes")]
    FileTooLarge { len: usize, max: usize },
    #[error("directory {0:?} is not empty")]
    NotEmpty(String),
    #[error("invalid path {0:?}")]
    InvalidPath(String),
    #[error("block {block} is corrupt: {reason}")]
    Corrupt { block: u32, reason: &'static str },
    #[error("block size of {0} bytes is too small to hold an inode")]
    BlockTooSmall(usize),
    #[error("block size of {0} bytes does not fit the superblock's 32-bit field")]
    BlockTooLarge(usize),
    #[error("superblock block size {stored} does not match device block size {device}")]
    BlockSizeMismatch { stored: u32, device: usize },
}

pub type Result<T> = core::result::Result<T, FsError>;
