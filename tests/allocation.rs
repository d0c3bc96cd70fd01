mod common;

use common::*;
use simple_fs::{
    fs::inode_table::InodeTable, BlockDevice, FileDisk, FileSystem, FileSystemError, Slot,
};

#[test]
fn one_file_takes_slot_zero() {
    for len in [1, 2, 8, 31, 54, 55] {
        let (_dir, path) = formatted();
        let name = "f".repeat(len);

        let slot = FileSystem::open(&path).unwrap().create_file(&name).unwrap();
        assert_eq!(slot, Slot::new(0).unwrap());

        let img = image(&path);
        assert_eq!(free_inodes(&img), 12);
        assert_eq!(free_blocks(&img), 12);
        assert_eq!(bitmap(&img), 0b1111, "name length {}", len);
        assert_eq!(inode(&img, 0), (name, 0, 1));
    }
}

#[test]
fn two_files_scenario() {
    let (_dir, path) = formatted();
    {
        let mut fs = FileSystem::open(&path).unwrap();
        fs.create_file("a.txt").unwrap();
        fs.create_file("b.txt").unwrap();
    }

    let img = image(&path);
    assert_eq!(inode(&img, 0), ("a.txt".to_string(), 0, 1));
    assert_eq!(inode(&img, 1), ("b.txt".to_string(), 0, 2));
    assert_eq!(bitmap(&img), 0b11111);
    assert_eq!(free_inodes(&img), 11);
    assert_eq!(free_blocks(&img), 11);
}

#[test]
fn thirteen_files_fill_the_disk() {
    let (_dir, path) = formatted();
    let mut fs = FileSystem::open(&path).unwrap();
    for i in 0..13 {
        let slot = fs.create_file(&format!("file{:02}", i)).unwrap();
        assert_eq!(slot.index(), i);
    }

    let full = image(&path);
    assert_eq!(bitmap(&full), 0xFFFF);
    assert_eq!(free_inodes(&full), 0);
    assert_eq!(free_blocks(&full), 0);

    assert!(matches!(
        fs.create_file("one-too-many"),
        Err(FileSystemError::DiskFull)
    ));
    assert_eq!(image(&path), full);
}

#[test]
fn name_limits_leave_disk_untouched() {
    let (_dir, path) = formatted();
    let mut fs = FileSystem::open(&path).unwrap();

    fs.create_file(&"n".repeat(55)).unwrap();
    let before = image(&path);

    assert!(matches!(
        fs.create_file(&"n".repeat(56)),
        Err(FileSystemError::NameTooLong(56))
    ));
    assert!(matches!(fs.create_file(""), Err(FileSystemError::InvalidName)));
    assert_eq!(image(&path), before);
}

#[test]
fn names_are_unique() {
    let (_dir, path) = formatted();
    let mut fs = FileSystem::open(&path).unwrap();
    fs.create_file("a.txt").unwrap();
    let before = image(&path);

    assert!(matches!(
        fs.create_file("a.txt"),
        Err(FileSystemError::FileExists(_))
    ));
    assert_eq!(image(&path), before);
}

#[test]
fn full_table_with_free_counter_is_inconsistent() {
    let (_dir, path) = formatted();
    let disk = FileDisk::open(&path).unwrap();

    // inode 表写满，超级块仍是 13 个空闲
    let mut table = InodeTable::new();
    for i in 0..13 {
        let slot = Slot::new(i).unwrap();
        table.write_entry(slot, "x", 0, slot.data_block_ref()).unwrap();
    }
    disk.write_block(1, table.as_block()).unwrap();
    let before = image(&path);

    let mut fs = FileSystem::new(disk);
    assert!(matches!(
        fs.create_file("new"),
        Err(FileSystemError::AllocationInconsistency { free_inodes: 13 })
    ));
    assert_eq!(image(&path), before);
}

#[test]
fn interrupted_allocation_is_detected_on_open() {
    let (_dir, path) = formatted();
    {
        // 只写了 inode 表，位图和超级块还没跟上
        let disk = FileDisk::open(&path).unwrap();
        let mut table = InodeTable::load(&disk).unwrap();
        let slot = table.find_free_slot().unwrap();
        table.write_entry(slot, "phantom", 0, slot.data_block_ref()).unwrap();
        table.sync(&disk).unwrap();
    }

    assert!(matches!(
        FileSystem::open(&path),
        Err(FileSystemError::PartialAllocation {
            free_inodes: 13,
            free_blocks: 13,
            used_bits: 0,
            used_slots: 1,
        })
    ));

    let fs = FileSystem::open_unchecked(&path).unwrap();
    assert!(matches!(
        fs.check(),
        Err(FileSystemError::PartialAllocation { .. })
    ));
}

#[test]
fn check_reports_usage() {
    let (_dir, path) = formatted();
    let mut fs = FileSystem::open(&path).unwrap();
    fs.create_file("a").unwrap();
    fs.create_file("b").unwrap();

    let usage = fs.check().unwrap();
    assert_eq!(usage.used_slots, 2);
    assert_eq!(usage.super_block.free_inode_count, 11);
    assert_eq!(usage.bitmap.bits(), 0b11111);
}
