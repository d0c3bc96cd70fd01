use std::path::Path;

use log::{info, warn};

use crate::{
    disk::{zeroed_block, BlockDevice, FileDisk},
    fs::{
        config::{Geometry, Slot, SUPER_BLOCK_BLOCK_ID},
        data_area::DataArea,
        data_block_bitmap::DataBlockBitmap,
        error::{FileSystemError, Result},
        inode_table::InodeTable,
        super_block::SuperBlock,
    },
    utils::validate_name,
};

pub mod config;
pub mod data_area;
pub mod data_block_bitmap;
pub mod error;
pub mod inode_table;
pub mod super_block;

/// `ls` / `stat` 看到的文件信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub name: String,
    pub size: u32,
    pub slot: Slot,
    pub data_block: u32, // inode 中记录的 1-based 块号
    pub block_id: u32,   // 对应的物理块号
}

/// 一致性检查的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub super_block: SuperBlock,
    pub bitmap: DataBlockBitmap,
    pub used_slots: u32,
}

#[derive(Debug)]
pub struct FileSystem<D: BlockDevice = FileDisk> {
    disk: D,            // 底层磁盘抽象层
    geometry: Geometry, // 固定的磁盘格式参数
}

impl FileSystem<FileDisk> {
    /// 打开镜像并挂载，元数据不一致时报 `PartialAllocation`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let fs = Self::open_unchecked(path)?;
        fs.check()?;
        Ok(fs)
    }

    /// 只校验超级块，不做一致性检查
    pub fn open_unchecked(path: impl AsRef<Path>) -> Result<Self> {
        let fs = Self::new(FileDisk::open(path)?);
        fs.mount()?;
        Ok(fs)
    }
}

impl<D: BlockDevice> FileSystem<D> {
    pub fn new(disk: D) -> Self {
        Self {
            disk,
            geometry: Geometry::DEFAULT,
        }
    }

    /// 清零全部块，再写入初始超级块和位图。
    ///
    /// `progress(done, total)` 在每次块写入后调用。
    pub fn format<F: FnMut(u32, u32)>(&mut self, mut progress: F) -> Result<()> {
        let total_blocks = self.disk.block_count();
        if total_blocks != self.geometry.total_blocks {
            return Err(FileSystemError::Corrupted(format!(
                "device has {} blocks, format needs {}",
                total_blocks, self.geometry.total_blocks
            )));
        }
        let steps = total_blocks + 2;

        let zero = zeroed_block();
        for block_id in 0..total_blocks {
            self.disk.write_block(block_id, &zero)?;
            progress(block_id + 1, steps);
        }

        self.write_super_block(&SuperBlock::new(&self.geometry))?;
        progress(total_blocks + 1, steps);
        DataBlockBitmap::initial().sync(&self.disk)?;
        progress(steps, steps);

        self.disk.flush()?;
        info!(
            "formatted {} blocks, {} inodes free",
            total_blocks, self.geometry.inode_count
        );
        Ok(())
    }

    /// 读出并校验超级块
    pub fn mount(&self) -> Result<SuperBlock> {
        let sb = self.read_super_block()?;
        sb.validate(&self.geometry)?;
        Ok(sb)
    }

    /// 比较空闲计数、位图与 inode 表三者是否一致
    pub fn check(&self) -> Result<Usage> {
        let sb = self.mount()?;
        let table = InodeTable::load(&self.disk)?;
        let bitmap = DataBlockBitmap::load(&self.disk)?;

        if !bitmap.contains(DataBlockBitmap::RESERVED) {
            return Err(FileSystemError::Corrupted(format!(
                "reserved bitmap bits cleared: {:#06x}",
                bitmap.bits()
            )));
        }
        for (slot, inode) in table.entries() {
            if Slot::from_data_block_ref(inode.data_block) != Some(slot) {
                return Err(FileSystemError::Corrupted(format!(
                    "inode {} points at data block {}",
                    slot.index(),
                    inode.data_block
                )));
            }
        }

        let used_slots = table.used_slots();
        let used_bits = bitmap.used_data_blocks();
        let aligned = self
            .geometry
            .slots()
            .all(|slot| table.is_free(slot) != bitmap.is_used(slot));
        let expected_free = self.geometry.inode_count - used_slots;

        if !aligned
            || used_bits != used_slots
            || sb.free_inode_count != expected_free
            || sb.free_block_count != expected_free
        {
            warn!(
                "inconsistent metadata: free inodes {}, free blocks {}, bitmap {:#06x}, occupied {}",
                sb.free_inode_count,
                sb.free_block_count,
                bitmap.bits(),
                used_slots
            );
            return Err(FileSystemError::PartialAllocation {
                free_inodes: sb.free_inode_count,
                free_blocks: sb.free_block_count,
                used_bits,
                used_slots,
            });
        }

        Ok(Usage {
            super_block: sb,
            bitmap,
            used_slots,
        })
    }

    /// 分配一个 inode 槽位及其数据块。
    ///
    /// 三个元数据块都在内存中改好后才写回，顺序为 inode 表、位图、超级块。
    pub fn create_file(&mut self, name: &str) -> Result<Slot> {
        validate_name(name)?;

        let mut sb = self.mount()?;
        if sb.free_inode_count == 0 {
            return Err(FileSystemError::DiskFull);
        }

        let mut table = InodeTable::load(&self.disk)?;
        if table.find(name).is_some() {
            return Err(FileSystemError::FileExists(name.to_string()));
        }
        let slot = self.alloc_inode(&table, &sb)?;
        table.write_entry(slot, name, 0, slot.data_block_ref())?;

        let bitmap = self.alloc_block(slot)?;
        sb.take_one();

        table.sync(&self.disk)?;
        bitmap.sync(&self.disk)?;
        self.write_super_block(&sb)?;
        self.disk.flush()?;

        info!(
            "created {} in inode {} (block {}), {} inodes free",
            name,
            slot.index(),
            slot.block_id(),
            sb.free_inode_count
        );
        Ok(slot)
    }

    fn alloc_inode(&self, table: &InodeTable, sb: &SuperBlock) -> Result<Slot> {
        table.find_free_slot().map_err(|e| match e {
            FileSystemError::TableFull => FileSystemError::AllocationInconsistency {
                free_inodes: sb.free_inode_count,
            },
            other => other,
        })
    }

    fn alloc_block(&self, slot: Slot) -> Result<DataBlockBitmap> {
        Ok(DataBlockBitmap::load(&self.disk)?.mark_block_used(slot))
    }

    /// 删除文件：清 inode 项、清位图位、两个空闲计数各加一
    pub fn delete_file(&mut self, name: &str) -> Result<()> {
        let mut sb = self.mount()?;
        let mut table = InodeTable::load(&self.disk)?;
        let (slot, _) = table
            .find(name)
            .ok_or_else(|| FileSystemError::FileNotFound(name.to_string()))?;

        table.clear_entry(slot);
        let bitmap = DataBlockBitmap::load(&self.disk)?.mark_block_free(slot);
        sb.give_back_one();

        self.write_super_block(&sb)?;
        bitmap.sync(&self.disk)?;
        table.sync(&self.disk)?;
        DataArea::clear(&self.disk, slot)?;
        self.disk.flush()?;

        info!("deleted {} from inode {}", name, slot.index());
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<FileStat>> {
        let table = InodeTable::load(&self.disk)?;
        Ok(table
            .entries()
            .map(|(slot, inode)| to_stat(slot, inode))
            .collect())
    }

    pub fn stat(&self, name: &str) -> Result<FileStat> {
        InodeTable::load(&self.disk)?
            .find(name)
            .map(|(slot, inode)| to_stat(slot, inode))
            .ok_or_else(|| FileSystemError::FileNotFound(name.to_string()))
    }

    pub fn read_file(&self, name: &str) -> Result<Vec<u8>> {
        let stat = self.stat(name)?;
        DataArea::read(&self.disk, stat.slot, stat.size)
    }

    /// 整体替换文件内容，最多一块
    pub fn write_file(&mut self, name: &str, content: &[u8]) -> Result<()> {
        let mut table = InodeTable::load(&self.disk)?;
        let (slot, _) = table
            .find(name)
            .ok_or_else(|| FileSystemError::FileNotFound(name.to_string()))?;

        DataArea::write(&self.disk, slot, content)?;
        table.set_size(slot, content.len() as u32);
        table.sync(&self.disk)?;
        self.disk.flush()?;

        info!("wrote {} bytes to {}", content.len(), name);
        Ok(())
    }

    fn read_super_block(&self) -> Result<SuperBlock> {
        let mut block = zeroed_block();
        self.disk.read_block(SUPER_BLOCK_BLOCK_ID, &mut block)?;
        SuperBlock::decode(&block)
    }

    fn write_super_block(&self, sb: &SuperBlock) -> Result<()> {
        self.disk.write_block(SUPER_BLOCK_BLOCK_ID, &sb.encode()?)
    }
}

fn to_stat(slot: Slot, inode: inode_table::Inode) -> FileStat {
    FileStat {
        name: inode.name,
        size: inode.size,
        slot,
        data_block: inode.data_block,
        block_id: slot.block_id(),
    }
}
