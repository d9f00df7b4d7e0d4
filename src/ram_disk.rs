//! In-memory block device.
//! Blocks live in a sparse map, so existence is tracked per id rather than
//! by a fixed disk size.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use std::sync::{Mutex, MutexGuard};

use log::trace;

use crate::allocator::{BlockAllocator, LinearScan};
use crate::block_dev::{pad_block, BlockDevice};
use crate::error::{FsError, Result};

struct Inner<A> {
    blocks: BTreeMap<u32, Vec<u8>>,
    allocator: A,
}

pub struct RamDisk<A: BlockAllocator = LinearScan> {
    inner: Mutex<Inner<A>>,
    block_size: usize,
}

impl RamDisk<LinearScan> {
    /// Creates an empty RamDisk allocating ids by linear scan.
    pub fn new(block_size: usize) -> Self {
        Self::with_allocator(block_size, LinearScan)
    }
}

impl<A: BlockAllocator> RamDisk<A> {
    pub fn with_allocator(block_size: usize, allocator: A) -> Self {
        RamDisk {
            inner: Mutex::new(Inner {
                blocks: BTreeMap::new(),
                allocator,
            }),
            block_size,
        }
    }

    /// Number of blocks currently present.
    pub fn block_count(&self) -> usize {
        self.lock().blocks.len()
    }

    /// Ids of all present blocks, ascending.
    pub fn block_ids(&self) -> Vec<u32> {
        self.lock().blocks.keys().copied().collect()
    }

    // Poisoning is ignored, the map is never left half-updated.
    fn lock(&self) -> MutexGuard<'_, Inner<A>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<A: BlockAllocator> BlockDevice for RamDisk<A> {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()> {
        if buf.len() != self.block_size {
            return Err(FsError::BufferSize {
                len: buf.len(),
                block_size: self.block_size,
            });
        }
        let inner = self.lock();
        let data = inner
            .blocks
            .get(&block_id)
            .ok_or(FsError::BlockNotFound(block_id))?;
        buf.copy_from_slice(data);
        trace!("ram disk: read block {}", block_id);
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()> {
        let data = pad_block(buf, self.block_size)?;
        self.lock().blocks.insert(block_id, data);
        trace!("ram disk: wrote block {} ({} bytes)", block_id, buf.len());
        Ok(())
    }

    fn free_block(&self, block_id: u32) -> Result<()> {
        let mut inner = self.lock();
        if inner.blocks.remove(&block_id).is_none() {
            return Err(FsError::BlockNotFound(block_id));
        }
        inner.allocator.release(block_id);
        trace!("ram disk: freed block {}", block_id);
        Ok(())
    }

    fn exists_block(&self, block_id: u32) -> Result<bool> {
        Ok(self.lock().blocks.contains_key(&block_id))
    }

    fn next_free_block_id(&self) -> Result<u32> {
        let mut inner = self.lock();
        let Inner { blocks, allocator } = &mut *inner;
        let block_id = allocator.allocate(&|id: u32| blocks.contains_key(&id));
        trace!("ram disk: next free block {}", block_id);
        Ok(block_id)
    }
}
