use bitflags::bitflags;

use crate::{
    disk::{zeroed_block, Block, BlockDevice},
    fs::{
        config::{Slot, DATA_BLOCK_BITMAP_BLOCK_ID},
        error::Result,
    },
};

bitflags! {
    /// 块 2 前两个字节（小端）组成的 16 位位图，每一位对应一个块。
    ///
    /// 位 0..=2 是元数据块，格式化后永远为 1；位 3..=15 对应数据块。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DataBlockBitmap: u16 {
        const SUPER_BLOCK = 1 << 0;
        const INODE_TABLE = 1 << 1;
        const BITMAP = 1 << 2;
        const RESERVED = Self::SUPER_BLOCK.bits() | Self::INODE_TABLE.bits() | Self::BITMAP.bits();

        // 任意数据块位都合法
        const _ = !0;
    }
}

impl DataBlockBitmap {
    /// 格式化后的初始状态：只有保留位
    pub fn initial() -> Self {
        Self::RESERVED
    }

    fn mask(slot: Slot) -> Self {
        Self::from_bits_retain(1 << slot.bitmap_bit())
    }

    pub fn mark_block_used(self, slot: Slot) -> Self {
        self | Self::mask(slot)
    }

    pub fn mark_block_free(self, slot: Slot) -> Self {
        self & !Self::mask(slot)
    }

    pub fn is_used(self, slot: Slot) -> bool {
        self.contains(Self::mask(slot))
    }

    /// 已占用的数据块数（不算保留位）
    pub fn used_data_blocks(self) -> u32 {
        self.difference(Self::RESERVED).bits().count_ones()
    }

    pub fn decode(block: &Block) -> Self {
        Self::from_bits_retain(u16::from_le_bytes([block[0], block[1]]))
    }

    pub fn encode(self) -> Block {
        let mut block = zeroed_block();
        block[..2].copy_from_slice(&self.bits().to_le_bytes());
        block
    }

    pub fn load<D: BlockDevice + ?Sized>(disk: &D) -> Result<Self> {
        let mut block = zeroed_block();
        disk.read_block(DATA_BLOCK_BITMAP_BLOCK_ID, &mut block)?;
        Ok(Self::decode(&block))
    }

    pub fn sync<D: BlockDevice + ?Sized>(self, disk: &D) -> Result<()> {
        disk.write_block(DATA_BLOCK_BITMAP_BLOCK_ID, &self.encode())
    }
}
