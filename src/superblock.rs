use alloc::vec;

use log::debug;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{get_u32, put_u32};
use crate::BlockDevice;

/// Filesystem-wide parameters. Written once by `format`, read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperBlock {
    pub total_blocks: u32,   // Total number of blocks in the filesystem
    pub block_size: u32,     // Always the device's block size at format time
    pub total_inodes: u32,   // Total number of inodes in the filesystem
    pub root_directory_id: u32, // Block ID of the root directory inode
}

impl SuperBlock {
    fn decode(buf: &[u8]) -> Self {
        Self {
            total_blocks: get_u32(buf, 0),
            block_size: get_u32(buf, 4),
            total_inodes: get_u32(buf, 8),
            root_directory_id: get_u32(buf, 12),
        }
    }

    fn encode(&self, buf: &mut [u8]) {
        put_u32(buf, 0, self.total_blocks);
        put_u32(buf, 4, self.block_size);
        put_u32(buf, 8, self.total_inodes);
        put_u32(buf, 12, self.root_directory_id);
    }
}

pub fn read_superblock<D: BlockDevice + ?Sized>(device: &D, superblock_id: u32) -> Result<SuperBlock> {
    if !device.exists_block(superblock_id)? {
        return Err(FsError::BlockNotFound(superblock_id));
    }
    let buf = device.read_block_vec(superblock_id)?;
    if buf.len() < SUPERBLOCK_SIZE {
        return Err(FsError::Corrupt {
            block: superblock_id,
            reason: "block too small for a superblock",
        });
    }
    Ok(SuperBlock::decode(&buf))
}

/// Writes a new superblock at `superblock_id`.
/// The stored block size is taken from the device, not from the caller.
pub fn create_superblock<D: BlockDevice + ?Sized>(
    superblock_id: u32,
    device: &D,
    total_blocks: u32,
    total_inodes: u32,
    root_directory_id: u32,
) -> Result<SuperBlock> {
    let block_size = u32::try_from(device.block_size())
        .map_err(|_| FsError::BlockTooLarge(device.block_size()))?;
    let superblock = SuperBlock {
        total_blocks,
        block_size,
        total_inodes,
        root_directory_id,
    };
    let mut buf = vec![0u8; device.block_size()];
    superblock.encode(&mut buf);
    device.write_block(superblock_id, &buf)?;
    debug!("superblock written at block {}: {:?}", superblock_id, superblock);
    read_superblock(device, superblock_id)
}
