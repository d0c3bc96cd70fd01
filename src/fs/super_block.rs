use serde::{Deserialize, Serialize};

use crate::{
    disk::{zeroed_block, Block},
    fs::{
        config::Geometry,
        error::{FileSystemError, Result},
    },
};

/// 超级块在块 0 中实际占用的字节数
pub const SUPER_BLOCK_LEN: usize = 24;

/// 块 0 的头部。字段顺序即磁盘顺序，全部是小端 u32（bincode 默认定长编码）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperBlock {
    pub magic: [u8; 4],
    pub block_size: u32,
    pub total_blocks: u32,
    pub inode_count: u32,
    pub free_block_count: u32,
    pub free_inode_count: u32,
}

impl SuperBlock {
    /// 刚格式化完的超级块：所有数据块、inode 都空闲
    pub fn new(geometry: &Geometry) -> Self {
        Self {
            magic: geometry.magic,
            block_size: geometry.block_size,
            total_blocks: geometry.total_blocks,
            inode_count: geometry.inode_count,
            free_block_count: geometry.data_blocks(),
            free_inode_count: geometry.inode_count,
        }
    }

    /// 写到一个全零块的开头，其余字节保持为 0
    pub fn encode(&self) -> Result<Block> {
        let bytes = bincode::serialize(self)?;
        debug_assert_eq!(bytes.len(), SUPER_BLOCK_LEN);

        let mut block = zeroed_block();
        block[..bytes.len()].copy_from_slice(&bytes);
        Ok(block)
    }

    /// 只按固定偏移读字段，不检查魔数
    pub fn decode(block: &Block) -> Result<Self> {
        Ok(bincode::deserialize(&block[..SUPER_BLOCK_LEN])?)
    }

    /// 挂载时检查魔数和几何参数
    pub fn validate(&self, geometry: &Geometry) -> Result<()> {
        if self.magic != geometry.magic {
            return Err(FileSystemError::Corrupted(format!(
                "bad magic {:02x?}, not a simple-fs disk",
                self.magic
            )));
        }
        if self.block_size != geometry.block_size
            || self.total_blocks != geometry.total_blocks
            || self.inode_count != geometry.inode_count
        {
            return Err(FileSystemError::Corrupted(format!(
                "unexpected geometry: block size {}, {} blocks, {} inodes",
                self.block_size, self.total_blocks, self.inode_count
            )));
        }
        if self.free_inode_count > geometry.inode_count
            || self.free_block_count > geometry.data_blocks()
        {
            return Err(FileSystemError::Corrupted(format!(
                "free counters out of range: {} inodes, {} blocks",
                self.free_inode_count, self.free_block_count
            )));
        }
        Ok(())
    }

    /// 分配一个 inode 及其数据块
    pub fn take_one(&mut self) {
        self.free_inode_count = self.free_inode_count.saturating_sub(1);
        self.free_block_count = self.free_block_count.saturating_sub(1);
    }

    /// 删除文件时归还
    pub fn give_back_one(&mut self) {
        self.free_inode_count += 1;
        self.free_block_count += 1;
    }
}
