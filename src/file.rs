//! File inodes.
//!
//! The header block holds the inode header, the file size at offset 16 and the
//! ordered data block ids from offset 20, one per `block_size` chunk of content.
//! Data blocks carry raw bytes only.
//!
//! A `write` that resizes the file issues several independent block writes.
//! If one of them fails the file is left where it stopped: callers must treat
//! the inode as possibly partially updated and reload it before retrying.

use alloc::vec;
use alloc::vec::Vec;

use log::debug;

use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{get_u32, put_u32, read_inode_block, INodeHeader};
use crate::BlockDevice;

#[derive(Debug, Clone)]
pub struct FileINode {
    id: u32,
    header: INodeHeader,
    size: u32,
    data_block_ids: Vec<u32>,
}

fn blocks_for(len: usize, block_size: usize) -> usize {
    len.div_ceil(block_size)
}

impl FileINode {
    /// Most data block ids a header block of `block_size` bytes can list.
    pub fn max_blocks(block_size: usize) -> usize {
        block_size.saturating_sub(OFFSET_DATA_BLOCK_IDS) / BLOCK_ID_SIZE
    }

    /// Largest content a file can hold with `block_size` blocks.
    /// Bounded by the 32-bit size field as well as by the id list.
    pub fn max_size(block_size: usize) -> usize {
        Self::max_blocks(block_size)
            .saturating_mul(block_size)
            .min(u32::MAX as usize)
    }

    pub fn load<D: BlockDevice + ?Sized>(device: &D, id: u32) -> Result<Self> {
        let buf = read_inode_block(device, id)?;
        let size = get_u32(&buf, OFFSET_FILE_SIZE);
        let num_blocks = blocks_for(size as usize, buf.len());
        if num_blocks > Self::max_blocks(buf.len()) {
            return Err(FsError::Corrupt {
                block: id,
                reason: "file size exceeds what the header can address",
            });
        }
        let data_block_ids = (0..num_blocks)
            .map(|i| get_u32(&buf, OFFSET_DATA_BLOCK_IDS + i * BLOCK_ID_SIZE))
            .collect();
        Ok(Self {
            id,
            header: INodeHeader::decode(&buf),
            size,
            data_block_ids,
        })
    }

    /// Allocates a block for a new zero-size file and loads it back.
    pub fn create_empty_file<D: BlockDevice + ?Sized>(device: &D) -> Result<Self> {
        let id = device.next_free_block_id()?;
        let file = Self {
            id,
            header: INodeHeader::now(),
            size: 0,
            data_block_ids: Vec::new(),
        };
        // The id list area is left zeroed, it is only read up to the size.
        file.write_header(device)?;
        debug!("created empty file at block {}", id);
        Self::load(device, id)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn header(&self) -> &INodeHeader {
        &self.header
    }

    /// Content length in bytes.
    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn data_block_ids(&self) -> &[u32] {
        &self.data_block_ids
    }

    /// Reads the whole content.
    pub fn read<D: BlockDevice + ?Sized>(&self, device: &D) -> Result<Vec<u8>> {
        let block_size = device.block_size();
        let mut data = Vec::with_capacity(self.data_block_ids.len() * block_size);
        let mut block_buf = vec![0u8; block_size];
        for &block_id in &self.data_block_ids {
            device.read_block(block_id, &mut block_buf)?;
            data.extend_from_slice(&block_buf);
        }
        data.truncate(self.size as usize);
        Ok(data)
    }

    /// Replaces the content with `data`, growing or shrinking the block list to fit.
    pub fn write<D: BlockDevice + ?Sized>(&mut self, device: &D, data: &[u8]) -> Result<()> {
        let block_size = device.block_size();
        let max = Self::max_size(block_size);
        if data.len() > max {
            return Err(FsError::FileTooLarge {
                len: data.len(),
                max,
            });
        }

        let required_blocks = blocks_for(data.len(), block_size);
        debug!(
            "file {}: write {} bytes, {} -> {} blocks",
            self.id,
            data.len(),
            self.data_block_ids.len(),
            required_blocks
        );

        while self.data_block_ids.len() > required_blocks {
            if let Some(block_id) = self.data_block_ids.pop() {
                device.free_block(block_id)?;
            }
        }

        for (i, chunk) in data.chunks(block_size).enumerate() {
            match self.data_block_ids.get(i) {
                Some(&block_id) => device.write_block(block_id, chunk)?,
                None => {
                    // Written right away so the next allocation can't hand out the same id.
                    let block_id = device.next_free_block_id()?;
                    device.write_block(block_id, chunk)?;
                    self.data_block_ids.push(block_id);
                }
            }
        }

        self.size = data.len() as u32;
        self.header.touch();
        self.write_header(device)
    }

    /// Frees every data block and then the header block.
    /// The directory entry naming this file is left to the caller.
    pub fn unlink<D: BlockDevice + ?Sized>(self, device: &D) -> Result<()> {
        for &block_id in &self.data_block_ids {
            device.free_block(block_id)?;
        }
        device.free_block(self.id)?;
        debug!("file {}: unlinked", self.id);
        Ok(())
    }

    fn write_header<D: BlockDevice + ?Sized>(&self, device: &D) -> Result<()> {
        let mut buf = vec![0u8; device.block_size()];
        self.header.encode(&mut buf);
        put_u32(&mut buf, OFFSET_FILE_SIZE, self.size);
        for (i, &block_id) in self.data_block_ids.iter().enumerate() {
            put_u32(&mut buf, OFFSET_DATA_BLOCK_IDS + i * BLOCK_ID_SIZE, block_id);
        }
        device.write_block(self.id, &buf)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::allocator::FreeList;
    use crate::RamDisk;

    #[test]
    fn test_round_trip() {
        let rd = RamDisk::new(64);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        for len in [0usize, 1, 63, 64, 65, 128, 200, 5 * 64] {
            let data: Vec<u8> = (0..len).map(|i| (i * 7 + len) as u8).collect();
            file.write(&rd, &data).unwrap();
            assert_eq!(file.data_block_ids().len(), len.div_ceil(64));
            assert_eq!(file.read(&rd).unwrap(), data);
            let loaded = FileINode::load(&rd, file.id()).unwrap();
            assert_eq!(loaded.size(), len);
            assert_eq!(loaded.read(&rd).unwrap(), data);
        }
    }

    #[test]
    fn test_header_layout() {
        let rd = RamDisk::new(64);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        file.write(&rd, &[1u8; 100]).unwrap();
        let raw = rd.read_block_vec(file.id()).unwrap();
        assert_eq!(get_u32(&raw, 16), 100);
        assert_eq!(get_u32(&raw, 20), file.data_block_ids()[0]);
        assert_eq!(get_u32(&raw, 24), file.data_block_ids()[1]);
    }

    #[test]
    fn test_grow_allocates_distinct_blocks() {
        let rd = RamDisk::new(32);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        file.write(&rd, &[9u8; 32 * 3]).unwrap();
        let mut ids = file.data_block_ids().to_vec();
        ids.push(file.id());
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(rd.block_count(), 4);
    }

    #[test]
    fn test_shrink_frees_trailing_blocks() {
        let rd = RamDisk::new(64);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        file.write(&rd, &[1u8; 64 * 4]).unwrap();
        let tail = file.data_block_ids()[3];
        file.write(&rd, &[2u8; 65]).unwrap();
        assert_eq!(file.data_block_ids().len(), 2);
        assert!(!rd.exists_block(tail).unwrap());
        assert_eq!(rd.block_count(), 3);
        file.write(&rd, &[]).unwrap();
        assert!(file.data_block_ids().is_empty());
        assert_eq!(rd.block_count(), 1);
    }

    #[test]
    fn test_spans_blocks_without_overflow() {
        let rd = RamDisk::new(32);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        let data = vec![5u8; 33];
        file.write(&rd, &data).unwrap();
        assert_eq!(file.data_block_ids().len(), 2);
        assert_eq!(file.read(&rd).unwrap(), data);
    }

    #[test]
    fn test_file_too_large() {
        let rd = RamDisk::new(32);
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        // (32 - 20) / 4 = 3 ids.
        assert_eq!(FileINode::max_size(32), 96);
        assert_eq!(
            file.write(&rd, &[0u8; 97]),
            Err(FsError::FileTooLarge { len: 97, max: 96 })
        );
        assert_eq!(rd.block_count(), 1);
        file.write(&rd, &[0u8; 96]).unwrap();
    }

    #[test]
    fn test_max_size_fits_size_field() {
        // 65531 ids of 256 KiB each would overflow the u32 size.
        assert_eq!(FileINode::max_blocks(1 << 18), 65531);
        assert_eq!(FileINode::max_size(1 << 18), u32::MAX as usize);
        assert_eq!(FileINode::max_size(1024), 251 * 1024);
    }

    #[test]
    fn test_unlink_frees_everything() {
        let rd = RamDisk::with_allocator(32, FreeList::new());
        let mut file = FileINode::create_empty_file(&rd).unwrap();
        file.write(&rd, &[3u8; 50]).unwrap();
        let mut freed = file.data_block_ids().to_vec();
        freed.push(file.id());
        file.unlink(&rd).unwrap();
        assert_eq!(rd.block_count(), 0);
        let next = rd.next_free_block_id().unwrap();
        assert!(freed.contains(&next));
    }
}
