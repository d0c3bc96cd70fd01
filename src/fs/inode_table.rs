use crate::{
    disk::{zeroed_block, Block, BlockDevice},
    fs::{
        config::{Slot, INODE_SIZE, INODE_TABLE_BLOCK_ID, NAME_FIELD_LEN, TOTAL_INODES},
        error::{FileSystemError, Result},
    },
    utils::{read_c_str, validate_name},
};

const SIZE_OFFSET: usize = NAME_FIELD_LEN;
const DATA_BLOCK_OFFSET: usize = SIZE_OFFSET + 4;

/// inode 表中的一项：文件名、大小、1-based 数据块号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inode {
    pub name: String,
    pub size: u32,
    pub data_block: u32,
}

/// 块 1：13 个 64 字节的目录项，末尾 3 个槽位不用。
///
/// 首字节为 0 的项视为空闲，其余字节在写入之前不作保证。
#[derive(Debug, Clone)]
pub struct InodeTable {
    block: Block,
}

impl InodeTable {
    pub fn new() -> Self {
        Self {
            block: zeroed_block(),
        }
    }

    pub fn as_block(&self) -> &Block {
        &self.block
    }

    pub fn load<D: BlockDevice + ?Sized>(disk: &D) -> Result<Self> {
        let mut block = zeroed_block();
        disk.read_block(INODE_TABLE_BLOCK_ID, &mut block)?;
        Ok(Self { block })
    }

    pub fn sync<D: BlockDevice + ?Sized>(&self, disk: &D) -> Result<()> {
        disk.write_block(INODE_TABLE_BLOCK_ID, &self.block)
    }

    fn range(slot: Slot) -> std::ops::Range<usize> {
        let start = slot.index() as usize * INODE_SIZE;
        start..start + INODE_SIZE
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        self.block[Self::range(slot).start] == 0
    }

    /// 首次适配：按槽位升序返回第一个空槽
    pub fn find_free_slot(&self) -> Result<Slot> {
        slots()
            .find(|&slot| self.is_free(slot))
            .ok_or(FileSystemError::TableFull)
    }

    /// 写入一项。文件名不合法时缓冲区保持原样。
    pub fn write_entry(
        &mut self,
        slot: Slot,
        name: &str,
        filesize: u32,
        data_block: u32,
    ) -> Result<()> {
        let name = validate_name(name)?;

        let entry = &mut self.block[Self::range(slot)];
        entry.fill(0);
        entry[..name.len()].copy_from_slice(name);
        entry[SIZE_OFFSET..DATA_BLOCK_OFFSET].copy_from_slice(&filesize.to_le_bytes());
        entry[DATA_BLOCK_OFFSET..INODE_SIZE].copy_from_slice(&data_block.to_le_bytes());
        Ok(())
    }

    pub fn entry(&self, slot: Slot) -> Option<Inode> {
        if self.is_free(slot) {
            return None;
        }
        let entry = &self.block[Self::range(slot)];
        Some(Inode {
            name: read_c_str(&entry[..NAME_FIELD_LEN]),
            size: read_u32(&entry[SIZE_OFFSET..DATA_BLOCK_OFFSET]),
            data_block: read_u32(&entry[DATA_BLOCK_OFFSET..INODE_SIZE]),
        })
    }

    pub fn set_size(&mut self, slot: Slot, size: u32) {
        let start = Self::range(slot).start + SIZE_OFFSET;
        self.block[start..start + 4].copy_from_slice(&size.to_le_bytes());
    }

    /// 整项清零，槽位重新变为空闲
    pub fn clear_entry(&mut self, slot: Slot) {
        self.block[Self::range(slot)].fill(0);
    }

    pub fn entries(&self) -> impl Iterator<Item = (Slot, Inode)> + '_ {
        slots().filter_map(|slot| self.entry(slot).map(|inode| (slot, inode)))
    }

    pub fn find(&self, name: &str) -> Option<(Slot, Inode)> {
        self.entries().find(|(_, inode)| inode.name == name)
    }

    pub fn used_slots(&self) -> u32 {
        slots().filter(|&slot| !self.is_free(slot)).count() as u32
    }
}

fn slots() -> impl Iterator<Item = Slot> {
    (0..TOTAL_INODES).filter_map(Slot::new)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
