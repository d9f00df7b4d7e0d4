//! Block id allocation policies.
//! A policy only decides which id comes next; the device owning it calls `release`
//! whenever a block is freed.

use alloc::collections::BTreeSet;

pub trait BlockAllocator: Send {
    /// Picks an id for which `in_use` is false.
    fn allocate(&mut self, in_use: &dyn Fn(u32) -> bool) -> u32;

    /// Hands a freed id back to the policy.
    fn release(&mut self, block_id: u32);
}

/// First absent id, scanning from 0. Freed ids are reused immediately and
/// nothing is reserved between calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinearScan;

impl BlockAllocator for LinearScan {
    fn allocate(&mut self, in_use: &dyn Fn(u32) -> bool) -> u32 {
        let mut block_id = 0;
        while in_use(block_id) {
            block_id += 1;
        }
        block_id
    }

    fn release(&mut self, _block_id: u32) {}
}

/// Released ids plus a high-water counter. Every id handed out is claimed at
/// once, so consecutive allocations are unique even before anything is written.
#[derive(Debug, Default, Clone)]
pub struct FreeList {
    free: BTreeSet<u32>,
    next: u32,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn num_free(&self) -> usize {
        self.free.len()
    }
}

impl BlockAllocator for FreeList {
    fn allocate(&mut self, in_use: &dyn Fn(u32) -> bool) -> u32 {
        while let Some(block_id) = self.free.pop_first() {
            if !in_use(block_id) {
                return block_id;
            }
        }
        while in_use(self.next) {
            self.next += 1;
        }
        let block_id = self.next;
        self.next += 1;
        block_id
    }

    fn release(&mut self, block_id: u32) {
        if block_id < self.next {
            self.free.insert(block_id);
        }
    }
}
