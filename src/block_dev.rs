use alloc::vec;
use alloc::vec::Vec;

use crate::error::{FsError, Result};

/// Storage capability every backend has to provide.
///
/// Blocks are addressed by `u32` ids and either exist or don't. Methods take
/// `&self`; backends synchronize internally.
pub trait BlockDevice: Send + Sync {
    /// Returns the size of each block in bytes.
    fn block_size(&self) -> usize;

    /// Reads a block of data from the block device.
    /// buf.len() must be equal to block_size(), otherwise `BufferSize`.
    fn read_block(&self, block_id: u32, buf: &mut [u8]) -> Result<()>;

    /// Writes a block of data to the block device.
    /// Buffers shorter than block_size() are zero-padded, longer ones fail with `Overflow`.
    fn write_block(&self, block_id: u32, buf: &[u8]) -> Result<()>;

    /// Removes a block. Fails with `BlockNotFound` if it does not exist.
    fn free_block(&self, block_id: u32) -> Result<()>;

    fn exists_block(&self, block_id: u32) -> Result<bool>;

    /// Returns an id that is not currently in use.
    ///
    /// The default scans from 0 upward for the first absent block. Nothing is
    /// reserved, so two calls without a write in between return the same id.
    fn next_free_block_id(&self) -> Result<u32> {
        let mut block_id = 0;
        while self.exists_block(block_id)? {
            block_id += 1;
        }
        Ok(block_id)
    }

    /// Reads a block into a freshly allocated buffer.
    fn read_block_vec(&self, block_id: u32) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; self.block_size()];
        self.read_block(block_id, &mut buf)?;
        Ok(buf)
    }
}

/// Copies `data` into a zeroed buffer of exactly `block_size` bytes.
pub fn pad_block(data: &[u8], block_size: usize) -> Result<Vec<u8>> {
    if data.len() > block_size {
        return Err(FsError::Overflow {
            len: data.len(),
            block_size,
        });
    }
    let mut buf = vec![0u8; block_size];
    buf[..data.len()].copy_from_slice(data);
    Ok(buf)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pad_block() {
        let buf = pad_block(b"abc", 8).unwrap();
        assert_eq!(buf, b"abc\0\0\0\0\0");
        assert_eq!(
            pad_block(&[1u8; 9], 8),
            Err(FsError::Overflow { len: 9, block_size: 8 })
        );
    }
}
