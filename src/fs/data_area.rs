use crate::{
    disk::{zeroed_block, BlockDevice, BLOCK_SIZE},
    fs::{
        config::Slot,
        error::{FileSystemError, Result},
    },
};

/// 数据区：块 3..=15，每个文件独占一块。
pub struct DataArea;

impl DataArea {
    /// 覆盖写入槽位对应的数据块，不足一块的部分补 0
    pub fn write<D: BlockDevice + ?Sized>(disk: &D, slot: Slot, buf: &[u8]) -> Result<()> {
        if buf.len() > BLOCK_SIZE {
            return Err(FileSystemError::FileTooLarge(buf.len()));
        }
        let mut block = zeroed_block();
        block[..buf.len()].copy_from_slice(buf);
        disk.write_block(slot.block_id(), &block)
    }

    /// 读出前 `len` 字节
    pub fn read<D: BlockDevice + ?Sized>(disk: &D, slot: Slot, len: u32) -> Result<Vec<u8>> {
        let len = len as usize;
        if len > BLOCK_SIZE {
            return Err(FileSystemError::Corrupted(format!(
                "file size {} exceeds one block",
                len
            )));
        }
        let mut block = zeroed_block();
        disk.read_block(slot.block_id(), &mut block)?;
        Ok(block[..len].to_vec())
    }

    pub fn clear<D: BlockDevice + ?Sized>(disk: &D, slot: Slot) -> Result<()> {
        disk.write_block(slot.block_id(), &zeroed_block())
    }
}
