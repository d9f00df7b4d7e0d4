//! Shared inode header and the tagged inode variant.
//!
//! Every inode occupies one block whose first 16 bytes are the header:
//! creation time at offset 0 and modification time at offset 8, both
//! big-endian milliseconds since the Unix epoch. An inode's id is its block id.

use alloc::vec::Vec;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::*;
use crate::error::{FsError, Result};
use crate::{BlockDevice, DirectoryINode, FileINode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct INodeHeader {
    pub creation_time_ms: u64,
    pub modification_time_ms: u64,
}

impl INodeHeader {
    /// A header with both timestamps set to now.
    pub fn now() -> Self {
        let now = now_ms();
        Self {
            creation_time_ms: now,
            modification_time_ms: now,
        }
    }

    pub fn decode(buf: &[u8]) -> Self {
        Self {
            creation_time_ms: get_u64(buf, OFFSET_CREATION_TIME),
            modification_time_ms: get_u64(buf, OFFSET_MODIFICATION_TIME),
        }
    }

    pub fn encode(&self, buf: &mut [u8]) {
        put_u64(buf, OFFSET_CREATION_TIME, self.creation_time_ms);
        put_u64(buf, OFFSET_MODIFICATION_TIME, self.modification_time_ms);
    }

    /// Bumps the modification time. Never moves it backwards.
    pub fn touch(&mut self) {
        self.modification_time_ms = self.modification_time_ms.max(now_ms());
    }
}

/// The on-disk layout doesn't record what an inode is; callers say which
/// kind they expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum INodeKind {
    File,
    Directory,
}

#[derive(Debug, Clone)]
pub enum INode {
    File(FileINode),
    Directory(DirectoryINode),
}

impl INode {
    /// Loads the inode at `id`, decoding its body as `kind`.
    pub fn load<D: BlockDevice + ?Sized>(device: &D, id: u32, kind: INodeKind) -> Result<Self> {
        Ok(match kind {
            INodeKind::File => INode::File(FileINode::load(device, id)?),
            INodeKind::Directory => INode::Directory(DirectoryINode::load(device, id)?),
        })
    }

    pub fn id(&self) -> u32 {
        match self {
            INode::File(file) => file.id(),
            INode::Directory(dir) => dir.id(),
        }
    }

    pub fn kind(&self) -> INodeKind {
        match self {
            INode::File(_) => INodeKind::File,
            INode::Directory(_) => INodeKind::Directory,
        }
    }

    pub fn header(&self) -> &INodeHeader {
        match self {
            INode::File(file) => file.header(),
            INode::Directory(dir) => dir.header(),
        }
    }

    pub fn into_file(self) -> Option<FileINode> {
        match self {
            INode::File(file) => Some(file),
            INode::Directory(_) => None,
        }
    }

    pub fn into_directory(self) -> Option<DirectoryINode> {
        match self {
            INode::Directory(dir) => Some(dir),
            INode::File(_) => None,
        }
    }
}

/// Reads an inode block, making sure it exists and can hold the fixed prefix.
pub(crate) fn read_inode_block<D: BlockDevice + ?Sized>(device: &D, id: u32) -> Result<Vec<u8>> {
    if !device.exists_block(id)? {
        return Err(FsError::BlockNotFound(id));
    }
    let buf = device.read_block_vec(id)?;
    if buf.len() < OFFSET_ENTRIES {
        return Err(FsError::BlockTooSmall(buf.len()));
    }
    Ok(buf)
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

pub(crate) fn get_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_be_bytes(bytes)
}

pub(crate) fn put_u32(buf: &mut [u8], offset: usize, value: u32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

pub(crate) fn get_u64(buf: &[u8], offset: usize) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&buf[offset..offset + 8]);
    u64::from_be_bytes(bytes)
}

pub(crate) fn put_u64(buf: &mut [u8], offset: usize, value: u64) {
    buf[offset..offset + 8].copy_from_slice(&value.to_be_bytes());
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = INodeHeader {
            creation_time_ms: 0x0102030405060708,
            modification_time_ms: 42,
        };
        let mut buf = [0u8; 16];
        header.encode(&mut buf);
        assert_eq!(&buf[0..8], &[1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(&buf[8..16], &42u64.to_be_bytes());
        assert_eq!(INodeHeader::decode(&buf), header);
    }

    #[test]
    fn test_touch() {
        let mut header = INodeHeader {
            creation_time_ms: 1,
            modification_time_ms: 1,
        };
        header.touch();
        assert!(header.modification_time_ms > 1);
        assert_eq!(header.creation_time_ms, 1);
    }
}
