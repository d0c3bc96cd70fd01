use crate::{disk::types::Block, fs::error::Result};

/// 块设备：文件系统与存储之间唯一的接触点。
///
/// `block_id` 超出设备范围时必须返回 `OutOfRange`，且不做任何 I/O。
pub trait BlockDevice: Send + Sync {
    fn block_count(&self) -> u32;
    fn read_block(&self, block_id: u32, buf: &mut Block) -> Result<()>;
    fn write_block(&self, block_id: u32, buf: &Block) -> Result<()>;
    fn flush(&self) -> Result<()>;
}
