#![allow(dead_code)]

use std::path::{Path, PathBuf};

use simple_fs::disk::init::format_image;
use tempfile::TempDir;

pub const BLOCK: usize = 1024;

/// 在临时目录中格式化一个新镜像，返回其路径（句柄已释放）
pub fn formatted() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("disk").join("virtual_disk.img");
    drop(format_image(&path, |_, _| {}).expect("mkfs"));
    (dir, path)
}

pub fn image(path: &Path) -> Vec<u8> {
    std::fs::read(path).expect("read image")
}

pub fn u32_at(img: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(img[offset..offset + 4].try_into().unwrap())
}

pub fn free_blocks(img: &[u8]) -> u32 {
    u32_at(img, 16)
}

pub fn free_inodes(img: &[u8]) -> u32 {
    u32_at(img, 20)
}

pub fn bitmap(img: &[u8]) -> u16 {
    u16::from_le_bytes([img[2 * BLOCK], img[2 * BLOCK + 1]])
}

/// 第 `slot` 个 inode 项的 (文件名, 大小, 数据块号)
pub fn inode(img: &[u8], slot: usize) -> (String, u32, u32) {
    let entry = &img[BLOCK + slot * 64..BLOCK + (slot + 1) * 64];
    let end = entry[..56].iter().position(|&b| b == 0).unwrap_or(56);
    (
        String::from_utf8_lossy(&entry[..end]).into_owned(),
        u32_at(entry, 56),
        u32_at(entry, 60),
    )
}

/// 刚格式化时的完整镜像
pub fn ground_state() -> Vec<u8> {
    let mut img = vec![0u8; 16 * BLOCK];
    img[0..4].copy_from_slice(b"MYFS");
    img[4..8].copy_from_slice(&1024u32.to_le_bytes());
    img[8..12].copy_from_slice(&16u32.to_le_bytes());
    img[12..16].copy_from_slice(&13u32.to_le_bytes());
    img[16..20].copy_from_slice(&13u32.to_le_bytes());
    img[20..24].copy_from_slice(&13u32.to_le_bytes());
    img[2 * BLOCK] = 0b111;
    img
}
