//! kvfs is a minimal file system living entirely inside a key-addressed block store.
//! Every object (superblock, directory, file) is one or more fixed-size blocks
//! identified by an integer id; all structure is a byte layout inside them.
//!
//! Layout:
//! - Superblock at a well-known id (0 by default)
//! - Root directory at a well-known id (1 by default)
//! - Every other inode and data block wherever the allocator put it
//!
//! kvfs's layers (from bottom to top):
//! 1. Block Device: fixed-size blocks by id, read/write/free/exists/allocate. | User implemented (or `RamDisk`)
//! 2. Inode: shared timestamp header, directory and file bodies.              | Fs implemented
//! 3. FileSystem: creates, finds and destroys inodes; formats the device.     | Fs implemented
//! 4. EasyFileSystem: slash-delimited path resolution from the root.          | Fs implemented
//!
//! There is no journaling and no multi-block atomicity: a failed mutating call
//! may leave its object partially updated. A device must only be used by one
//! `FileSystem` at a time.

// Heap types come from `alloc`. `std` is reached only for the wall clock
// (inode timestamps) and the lock inside `RamDisk`.
extern crate alloc;

mod config;
mod error;
mod block_dev;
mod allocator;
mod ram_disk;
mod superblock;
mod inode;
mod directory;
mod file;
mod fs;
mod path;

pub use config::*;
pub use error::FsError as Error;
pub use error::{FsError, Result};
pub use block_dev::{pad_block, BlockDevice};
pub use allocator::{BlockAllocator, FreeList, LinearScan};
pub use ram_disk::RamDisk;
pub use superblock::*;
pub use inode::{INode, INodeHeader, INodeKind};
pub use directory::{check_name, DirEntry, DirectoryINode};
pub use file::FileINode;
pub use fs::{FileSystem, FormatOptions};
pub use path::EasyFileSystem;
