mod common;

use kvfs::{BlockDevice, Error, FreeList, RamDisk};

#[test]
fn test_write_read() {
    common::init_logger();
    let rd = RamDisk::new(16);
    let data: Vec<u8> = (0..16).collect();
    rd.write_block(4, &data).unwrap();
    assert!(rd.exists_block(4).unwrap());
    let mut buf = [0u8; 16];
    rd.read_block(4, &mut buf).unwrap();
    assert_eq!(&buf[..], &data[..]);
}

#[test]
fn test_overflow() {
    let rd = RamDisk::new(16);
    let result = rd.write_block(0, &[1u8; 17]);
    assert_eq!(result, Err(Error::Overflow { len: 17, block_size: 16 }));
    log!("Expected error: {}", result.unwrap_err());
}

#[test]
fn test_free() {
    let rd = RamDisk::new(16);
    rd.write_block(0, b"x").unwrap();
    rd.free_block(0).unwrap();
    assert!(!rd.exists_block(0).unwrap());
    assert_eq!(rd.free_block(0), Err(Error::BlockNotFound(0)));
    assert_eq!(rd.read_block_vec(0), Err(Error::BlockNotFound(0)));
}

#[test]
fn test_next_free_block_id() {
    let rd = RamDisk::new(16);
    assert_eq!(rd.next_free_block_id().unwrap(), 0);
    for i in 0..5 {
        rd.write_block(i, b"x").unwrap();
    }
    assert_eq!(rd.next_free_block_id().unwrap(), 5);
    rd.free_block(2).unwrap();
    assert_eq!(rd.next_free_block_id().unwrap(), 2);
    assert_eq!(rd.block_ids(), vec![0, 1, 3, 4]);
}

#[test]
fn test_free_list_is_unique_across_threads() {
    use std::sync::Arc;
    use std::thread;

    let rd = Arc::new(RamDisk::with_allocator(16, FreeList::new()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let rd = Arc::clone(&rd);
            thread::spawn(move || {
                (0..50)
                    .map(|_| rd.next_free_block_id().unwrap())
                    .collect::<Vec<u32>>()
            })
        })
        .collect();
    let mut ids: Vec<u32> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);
}
