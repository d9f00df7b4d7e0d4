use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::config::*;
use crate::error::{FsError, Result};
use crate::inode::{INode, INodeKind};
use crate::superblock::{create_superblock, read_superblock, SuperBlock};
use crate::{BlockDevice, DirectoryINode, FileINode};

/// Where `format` puts the superblock and the root directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub root_directory_id: u32,
    pub superblock_id: u32,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            root_directory_id: ROOT_DIRECTORY_ID,
            superblock_id: SUPERBLOCK_ID,
        }
    }
}

/// Binds inode operations to a device and its superblock.
///
/// The device is assumed to be owned by this handle for the duration of any
/// mutating call; nothing here arbitrates between concurrent sessions.
#[derive(Debug)]
pub struct FileSystem<D: BlockDevice> {
    device: Arc<D>,
    superblock: SuperBlock,
}

fn check_block_size(block_size: usize) -> Result<()> {
    // Inode prefix plus the superblock fields.
    if block_size < OFFSET_ENTRIES.max(SUPERBLOCK_SIZE) {
        return Err(FsError::BlockTooSmall(block_size));
    }
    if u32::try_from(block_size).is_err() {
        return Err(FsError::BlockTooLarge(block_size));
    }
    Ok(())
}

impl<D: BlockDevice> FileSystem<D> {
    /// Wipes the whole device and writes a fresh superblock and an empty root directory.
    pub fn format(device: Arc<D>, total_blocks: u32, total_inodes: u32) -> Result<Self> {
        Self::format_with(device, total_blocks, total_inodes, FormatOptions::default())
    }

    pub fn format_with(
        device: Arc<D>,
        total_blocks: u32,
        total_inodes: u32,
        options: FormatOptions,
    ) -> Result<Self> {
        check_block_size(device.block_size())?;

        // Frees every block from 0 up to the first gap.
        let mut block_id = 0;
        while device.exists_block(block_id)? {
            device.free_block(block_id)?;
            block_id += 1;
        }
        info!("format: wiped {} blocks", block_id);

        let superblock = create_superblock(
            options.superblock_id,
            &*device,
            total_blocks,
            total_inodes,
            options.root_directory_id,
        )?;
        DirectoryINode::create_empty_directory(&*device, options.root_directory_id)?;
        info!("format: {:?}", superblock);

        Ok(Self { device, superblock })
    }

    /// Opens an already formatted device.
    pub fn mount(device: Arc<D>, superblock_id: u32) -> Result<Self> {
        check_block_size(device.block_size())?;
        let superblock = read_superblock(&*device, superblock_id)?;
        if superblock.block_size as usize != device.block_size() {
            return Err(FsError::BlockSizeMismatch {
                stored: superblock.block_size,
                device: device.block_size(),
            });
        }
        debug!("mounted {:?}", superblock);
        Ok(Self { device, superblock })
    }

    /// Creates an empty file and registers it in `parent` under `name`.
    /// An existing entry of the same name is overwritten.
    pub fn create_file(&self, name: &str, parent: &mut DirectoryINode) -> Result<FileINode> {
        parent.check_add(name)?;
        let file = FileINode::create_empty_file(&*self.device)?;
        parent.add_entry(&*self.device, name, file.id())?;
        debug!("created file {:?} ({}) in {}", name, file.id(), parent.id());
        Ok(file)
    }

    pub fn get_file(&self, name: &str, parent: &DirectoryINode) -> Result<FileINode> {
        let id = parent.get_entry(name)?;
        FileINode::load(&*self.device, id)
    }

    pub fn read(&self, file: &FileINode) -> Result<Vec<u8>> {
        file.read(&*self.device)
    }

    pub fn write(&self, file: &mut FileINode, data: &[u8]) -> Result<()> {
        file.write(&*self.device, data)
    }

    /// Removes `name` from `parent` and frees the file's blocks.
    ///
    /// Every data block the header lists must exist before anything is
    /// touched. A damaged file, or a directory whose entries don't decode to
    /// existing block ids, is refused with the tree unchanged.
    pub fn unlink(&self, name: &str, parent: &mut DirectoryINode) -> Result<()> {
        let id = parent.get_entry(name)?;
        let file = FileINode::load(&*self.device, id)?;
        for &block_id in file.data_block_ids() {
            if !self.device.exists_block(block_id)? {
                warn!("unlink {:?}: file {} lists missing block {}", name, id, block_id);
                return Err(FsError::BlockNotFound(block_id));
            }
        }
        parent.remove_entry(&*self.device, name)?;
        file.unlink(&*self.device)?;
        debug!("unlinked {:?} ({}) from {}", name, id, parent.id());
        Ok(())
    }

    /// Creates an empty directory on a fresh block and registers it in `parent` under `name`.
    pub fn create_directory(&self, name: &str, parent: &mut DirectoryINode) -> Result<DirectoryINode> {
        parent.check_add(name)?;
        let id = self.device.next_free_block_id()?;
        let dir = DirectoryINode::create_empty_directory(&*self.device, id)?;
        parent.add_entry(&*self.device, name, id)?;
        debug!("created directory {:?} ({}) in {}", name, id, parent.id());
        Ok(dir)
    }

    pub fn get_directory(&self, name: &str, parent: &DirectoryINode) -> Result<DirectoryINode> {
        let id = parent.get_entry(name)?;
        DirectoryINode::load(&*self.device, id)
    }

    /// Removes an empty child directory.
    pub fn remove_directory(&self, name: &str, parent: &mut DirectoryINode) -> Result<()> {
        let dir = self.get_directory(name, parent)?;
        if !dir.is_empty() {
            return Err(FsError::NotEmpty(String::from(name)));
        }
        parent.remove_entry(&*self.device, name)?;
        self.device.free_block(dir.id())?;
        debug!("removed directory {:?} ({}) from {}", name, dir.id(), parent.id());
        Ok(())
    }

    /// Loads the child `name` of `parent`, decoded as `kind`.
    pub fn get_inode(&self, name: &str, parent: &DirectoryINode, kind: INodeKind) -> Result<INode> {
        let id = parent.get_entry(name)?;
        INode::load(&*self.device, id, kind)
    }

    pub fn root_directory(&self) -> Result<DirectoryINode> {
        DirectoryINode::load(&*self.device, self.superblock.root_directory_id)
    }

    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }
}
