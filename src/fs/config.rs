use crate::disk::{BLOCK_COUNT, BLOCK_SIZE};

pub const SUPER_BLOCK_BLOCK_ID: u32 = 0;
pub const INODE_TABLE_BLOCK_ID: u32 = 1;
pub const DATA_BLOCK_BITMAP_BLOCK_ID: u32 = 2;

// 超级块、inode 表、位图各占 1 块，之后全是数据块
pub const RESERVED_BLOCKS: u32 = 3;
pub const DATA_AREA_START_BLOCK_ID: u32 = RESERVED_BLOCKS;

// 每个 inode 64 字节，一块能放 16 个，只用前 13 个
pub const INODE_SIZE: usize = 64;
pub const TOTAL_INODES: u32 = BLOCK_COUNT as u32 - RESERVED_BLOCKS;

// 文件名字段 56 字节，最后一个字节必须是 '\0'
pub const NAME_FIELD_LEN: usize = 56;
pub const MAX_NAME_LEN: usize = NAME_FIELD_LEN - 1;

pub const MAGIC: [u8; 4] = *b"MYFS";

/// 磁盘格式的全部固定参数。
///
/// 只有 `Geometry::DEFAULT` 这一个取值，字段在 crate 外不可构造。
/// `FileSystem` 构造时捕获一份，格式化和挂载校验都以它为准。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub(crate) magic: [u8; 4],
    pub(crate) block_size: u32,
    pub(crate) total_blocks: u32,
    pub(crate) inode_count: u32,
    pub(crate) reserved_blocks: u32,
}

impl Geometry {
    pub const DEFAULT: Geometry = Geometry {
        magic: MAGIC,
        block_size: BLOCK_SIZE as u32,
        total_blocks: BLOCK_COUNT as u32,
        inode_count: TOTAL_INODES,
        reserved_blocks: RESERVED_BLOCKS,
    };

    /// 空盘时的空闲数据块数（= 空闲 inode 数）
    pub fn data_blocks(&self) -> u32 {
        self.total_blocks - self.reserved_blocks
    }

    pub fn slots(&self) -> impl Iterator<Item = Slot> {
        (0..self.inode_count).map(Slot)
    }
}

/// inode 表中的槽位号（0..13）。
///
/// 槽位、数据块、位图中的位三者一一对应，全部从这里推导：
/// 槽位 i ↔ 位 3+i ↔ 物理块 3+i ↔ 记录在 inode 中的数据块号 i+1。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slot(u32);

impl Slot {
    pub fn new(index: u32) -> Option<Self> {
        (index < TOTAL_INODES).then_some(Self(index))
    }

    pub fn index(self) -> u32 {
        self.0
    }

    pub fn bitmap_bit(self) -> u32 {
        RESERVED_BLOCKS + self.0
    }

    pub fn block_id(self) -> u32 {
        DATA_AREA_START_BLOCK_ID + self.0
    }

    /// inode 中保存的 1-based 数据块号，0 表示未设置
    pub fn data_block_ref(self) -> u32 {
        self.0 + 1
    }

    pub fn from_data_block_ref(data_block: u32) -> Option<Self> {
        data_block.checked_sub(1).and_then(Self::new)
    }
}
