//! Common utilities for tests

#![allow(unused)]

use std::sync::Arc;

use kvfs::{EasyFileSystem, FileSystem, RamDisk, DEFAULT_BLOCK_SIZE};

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

pub const BLOCK_SIZE: usize = DEFAULT_BLOCK_SIZE;

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr) => {
        println!("{}[test] {}{}", crate::common::ORANGE, $msg, crate::common::RESET)
    };
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

/// Routes the crate's `log` output to the test harness. Safe to call from every test.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A freshly formatted file system on a RamDisk.
pub fn formatted() -> FileSystem<RamDisk> {
    init_logger();
    let rd = Arc::new(RamDisk::new(BLOCK_SIZE));
    FileSystem::format(rd, 100, 100).unwrap()
}

pub fn easy() -> EasyFileSystem<RamDisk> {
    EasyFileSystem::new(formatted())
}
