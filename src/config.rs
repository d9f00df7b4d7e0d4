pub const SUPERBLOCK_ID: u32 = 0; // Block ID for the superblock
pub const ROOT_DIRECTORY_ID: u32 = 1; // Block ID for the root directory inode
pub const DEFAULT_BLOCK_SIZE: usize = 1024;

pub const INODE_HEADER_SIZE: usize = 16; // creation + modification time, u64 each
pub const OFFSET_CREATION_TIME: usize = 0;
pub const OFFSET_MODIFICATION_TIME: usize = 8;

pub const OFFSET_NUM_ENTRIES: usize = INODE_HEADER_SIZE;
pub const OFFSET_ENTRIES: usize = INODE_HEADER_SIZE + 4;
pub const MAX_NAME_LEN: usize = 255;
pub const DIR_ENTRY_SIZE: usize = 268; // length byte + name + child id, padded
pub const DIR_ENTRY_CHILD_OFFSET: usize = 1 + MAX_NAME_LEN;

pub const OFFSET_FILE_SIZE: usize = INODE_HEADER_SIZE;
pub const OFFSET_DATA_BLOCK_IDS: usize = INODE_HEADER_SIZE + 4;
pub const BLOCK_ID_SIZE: usize = 4;

pub const SUPERBLOCK_SIZE: usize = 16;

pub const DEFAULT_SEPARATOR: &str = "/";
