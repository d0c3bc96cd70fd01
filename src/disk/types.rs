/// 每个逻辑块（Block）的大小：1KB
/// 所有读写都以整块为单位，不会跨块。
pub const BLOCK_SIZE: usize = 1024;

/// 磁盘中包含的块总数：16KB / 1KB = 16 块
pub const BLOCK_COUNT: usize = 16;

/// 虚拟磁盘总大小（单位：字节）
pub const DISK_SIZE: u64 = (BLOCK_SIZE * BLOCK_COUNT) as u64;

/// 一个逻辑块的字节数组
pub type Block = [u8; BLOCK_SIZE];

/// 返回一个全零的块
pub const fn zeroed_block() -> Block {
    [0u8; BLOCK_SIZE]
}
