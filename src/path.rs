//! Path resolution on top of `FileSystem`.
//!
//! Paths are split on the separator and empty segments are dropped, so `/`,
//! `//` and the empty string all name the root and trailing separators are
//! ignored. Resolution always starts at the root directory.

use alloc::string::String;
use alloc::vec::Vec;

use log::debug;

use crate::config::DEFAULT_SEPARATOR;
use crate::error::{FsError, Result};
use crate::{BlockDevice, DirectoryINode, FileINode, FileSystem};

/// Path-addressed front end over a `FileSystem`.
///
/// Inodes carry no kind tag on disk, so the kind is whatever the call expects.
/// Pointing a file operation at a directory (or the reverse) decodes the block
/// as the wrong layout: `write_file` on a directory path succeeds and
/// overwrites the directory's entries with a file header. `unlink` refuses a
/// directory only while its entry bytes don't happen to name existing blocks.
/// Callers must keep track of which paths are directories.
pub struct EasyFileSystem<D: BlockDevice> {
    fs: FileSystem<D>,
    separator: String,
}

impl<D: BlockDevice> EasyFileSystem<D> {
    pub fn new(fs: FileSystem<D>) -> Self {
        Self {
            fs,
            separator: String::from(DEFAULT_SEPARATOR),
        }
    }

    pub fn with_separator(fs: FileSystem<D>, separator: &str) -> Result<Self> {
        if separator.is_empty() {
            return Err(FsError::InvalidPath(String::from(separator)));
        }
        Ok(Self {
            fs,
            separator: String::from(separator),
        })
    }

    pub fn filesystem(&self) -> &FileSystem<D> {
        &self.fs
    }

    pub fn into_inner(self) -> FileSystem<D> {
        self.fs
    }

    fn components<'a>(&self, path: &'a str) -> Vec<&'a str> {
        path.split(self.separator.as_str())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Splits `path` into its parent components and final name.
    fn split<'a>(&self, path: &'a str) -> Result<(Vec<&'a str>, &'a str)> {
        let mut components = self.components(path);
        let name = components
            .pop()
            .ok_or_else(|| FsError::InvalidPath(String::from(path)))?;
        Ok((components, name))
    }

    fn walk(&self, components: &[&str]) -> Result<DirectoryINode> {
        let mut dir = self.fs.root_directory()?;
        for name in components {
            dir = self.fs.get_directory(name, &dir)?;
        }
        Ok(dir)
    }

    fn parent_of<'a>(&self, path: &'a str) -> Result<(DirectoryINode, &'a str)> {
        let (parents, name) = self.split(path)?;
        Ok((self.walk(&parents)?, name))
    }

    pub fn get_directory(&self, path: &str) -> Result<DirectoryINode> {
        self.walk(&self.components(path))
    }

    /// Creates the directory at `path`. Missing intermediate directories are
    /// created when `create_intermediate` is set, otherwise they fail with `NotFound`.
    pub fn create_directory(&self, path: &str, create_intermediate: bool) -> Result<DirectoryINode> {
        let (parents, name) = match self.split(path) {
            Ok(split) => split,
            // The root always exists.
            Err(_) => return Err(FsError::AlreadyExists(String::from(path))),
        };

        let mut dir = self.fs.root_directory()?;
        for component in parents {
            dir = match self.fs.get_directory(component, &dir) {
                Ok(child) => child,
                Err(FsError::NotFound(_)) if create_intermediate => {
                    debug!("create_directory: creating intermediate {:?}", component);
                    self.fs.create_directory(component, &mut dir)?
                }
                Err(err) => return Err(err),
            };
        }

        if dir.contains(name) {
            return Err(FsError::AlreadyExists(String::from(path)));
        }
        self.fs.create_directory(name, &mut dir)
    }

    pub fn create_file(&self, path: &str) -> Result<FileINode> {
        let (mut dir, name) = self.parent_of(path)?;
        if dir.contains(name) {
            return Err(FsError::AlreadyExists(String::from(path)));
        }
        self.fs.create_file(name, &mut dir)
    }

    pub fn get_file(&self, path: &str) -> Result<FileINode> {
        let (dir, name) = self.parent_of(path)?;
        self.fs.get_file(name, &dir)
    }

    pub fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let file = self.get_file(path)?;
        self.fs.read(&file)
    }

    pub fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut file = self.get_file(path)?;
        self.fs.write(&mut file, data)
    }

    pub fn unlink(&self, path: &str) -> Result<()> {
        let (mut dir, name) = self.parent_of(path)?;
        self.fs.unlink(name, &mut dir)
    }

    /// Removes an empty directory. The root can't be removed.
    pub fn remove_directory(&self, path: &str) -> Result<()> {
        let (mut dir, name) = self.parent_of(path)?;
        self.fs.remove_directory(name, &mut dir)
    }

    /// Names of the entries in the directory at `path`, in stored order.
    pub fn read_directory(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.get_directory(path)?.names())
    }

    /// Whether `path` names an entry. The root always exists.
    pub fn exists(&self, path: &str) -> Result<bool> {
        let (parents, name) = match self.split(path) {
            Ok(split) => split,
            Err(_) => return Ok(true),
        };
        match self.walk(&parents) {
            Ok(dir) => Ok(dir.contains(name)),
            Err(FsError::NotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}
