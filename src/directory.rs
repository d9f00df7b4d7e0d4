//! Directory inodes.
//!
//! A directory is a single block: the inode header, an entry count at offset
//! 16, then fixed 268-byte entries from offset 20. Each entry holds a name
//! length byte, up to 255 bytes of UTF-8 name (zero padded) and the child's
//! inode id at relative offset 256. The whole block is re-encoded on every
//! mutation, so a directory holds at most `capacity(block_size)` entries.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use log::{debug, warn};

use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{get_u32, put_u32, read_inode_block, INodeHeader};
use crate::BlockDevice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub inode_id: u32,
}

#[derive(Debug, Clone)]
pub struct DirectoryINode {
    id: u32,
    header: INodeHeader,
    // Insertion order, names unique.
    entries: Vec<DirEntry>,
    capacity: usize,
}

/// Rejects names that can't be stored in an entry.
pub fn check_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(FsError::InvalidName);
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FsError::NameTooLong(name.len()));
    }
    Ok(())
}

impl DirectoryINode {
    /// Maximum number of entries a directory block of `block_size` bytes holds.
    pub fn capacity(block_size: usize) -> usize {
        block_size.saturating_sub(OFFSET_ENTRIES) / DIR_ENTRY_SIZE
    }

    pub fn load<D: BlockDevice + ?Sized>(device: &D, id: u32) -> Result<Self> {
        let buf = read_inode_block(device, id)?;
        let capacity = Self::capacity(buf.len());
        let num_entries = get_u32(&buf, OFFSET_NUM_ENTRIES) as usize;
        if num_entries > capacity {
            warn!(
                "directory {}: {} entries recorded, block holds {}",
                id, num_entries, capacity
            );
            return Err(FsError::Corrupt {
                block: id,
                reason: "entry count exceeds directory capacity",
            });
        }

        let mut entries = Vec::with_capacity(num_entries);
        for i in 0..num_entries {
            let offset = OFFSET_ENTRIES + i * DIR_ENTRY_SIZE;
            let name_len = buf[offset] as usize;
            let name = core::str::from_utf8(&buf[offset + 1..offset + 1 + name_len])
                .map_err(|_| FsError::Corrupt {
                    block: id,
                    reason: "entry name is not valid UTF-8",
                })?;
            let inode_id = get_u32(&buf, offset + DIR_ENTRY_CHILD_OFFSET);
            entries.push(DirEntry {
                name: String::from(name),
                inode_id,
            });
        }

        Ok(Self {
            id,
            header: INodeHeader::decode(&buf),
            entries,
            capacity,
        })
    }

    /// Writes a zero-entry directory at `id` and loads it back.
    pub fn create_empty_directory<D: BlockDevice + ?Sized>(device: &D, id: u32) -> Result<Self> {
        let mut dir = Self {
            id,
            header: INodeHeader::now(),
            entries: Vec::new(),
            capacity: Self::capacity(device.block_size()),
        };
        dir.write(device)?;
        debug!("created empty directory at block {}", id);
        Self::load(device, id)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn header(&self) -> &INodeHeader {
        &self.header
    }

    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    /// Snapshot of the entry table in stored order.
    pub fn read(&self) -> Vec<DirEntry> {
        self.entries.clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn get_entry(&self, name: &str) -> Result<u32> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.inode_id)
            .ok_or_else(|| FsError::NotFound(String::from(name)))
    }

    /// Whether `add_entry(name, ..)` would be accepted.
    pub fn check_add(&self, name: &str) -> Result<()> {
        check_name(name)?;
        if !self.contains(name) && self.entries.len() >= self.capacity {
            return Err(FsError::DirectoryFull(self.capacity));
        }
        Ok(())
    }

    /// Inserts `name`, or points an existing `name` at `inode_id`, and rewrites the block.
    pub fn add_entry<D: BlockDevice + ?Sized>(
        &mut self,
        device: &D,
        name: &str,
        inode_id: u32,
    ) -> Result<()> {
        self.check_add(name)?;
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.inode_id = inode_id,
            None => {
                self.entries.push(DirEntry {
                    name: String::from(name),
                    inode_id,
                });
            }
        }
        debug!("directory {}: add {:?} -> {}", self.id, name, inode_id);
        self.write(device)
    }

    /// Removes `name` if present and rewrites the block.
    /// Returns the id the entry pointed at, absent names are not an error.
    pub fn remove_entry<D: BlockDevice + ?Sized>(
        &mut self,
        device: &D,
        name: &str,
    ) -> Result<Option<u32>> {
        let position = self.entries.iter().position(|e| e.name == name);
        let removed = position.map(|i| self.entries.remove(i).inode_id);
        debug!("directory {}: remove {:?} -> {:?}", self.id, name, removed);
        self.write(device)?;
        Ok(removed)
    }

    fn write<D: BlockDevice + ?Sized>(&mut self, device: &D) -> Result<()> {
        self.header.touch();
        let mut buf = vec![0u8; device.block_size()];
        self.header.encode(&mut buf);
        put_u32(&mut buf, OFFSET_NUM_ENTRIES, self.entries.len() as u32);
        for (i, entry) in self.entries.iter().enumerate() {
            let offset = OFFSET_ENTRIES + i * DIR_ENTRY_SIZE;
            let name = entry.name.as_bytes();
            buf[offset] = name.len() as u8;
            buf[offset + 1..offset + 1 + name.len()].copy_from_slice(name);
            put_u32(&mut buf, offset + DIR_ENTRY_CHILD_OFFSET, entry.inode_id);
        }
        device.write_block(self.id, &buf)
    }
}
