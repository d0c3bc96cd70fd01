use std::{
    fs::{self, File, OpenOptions, TryLockError},
    io::{ErrorKind, Read, Seek, SeekFrom, Write},
    path::Path,
    sync::{Mutex, MutexGuard},
};

use log::debug;

use crate::{
    disk::{
        block_device::BlockDevice,
        types::{Block, BLOCK_COUNT, BLOCK_SIZE, DISK_SIZE},
    },
    fs::error::{FileSystemError, Result},
};

/// 以宿主机上的一个镜像文件作为块设备。
///
/// 打开期间持有该文件的排他锁，`FileDisk` 被 drop 时锁随文件句柄一起释放。
#[derive(Debug)]
pub struct FileDisk {
    file: Mutex<File>,
}

impl FileDisk {
    /// 新建一个 16KB 的全零镜像。镜像已存在时不做任何写入。
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = match OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(FileSystemError::ImageAlreadyExists(display(path)));
            }
            Err(e) => return Err(e.into()),
        };

        let disk = Self::locked(file, path)?;
        disk.handle()?.set_len(DISK_SIZE)?;
        debug!("created image {} ({} bytes)", path.display(), DISK_SIZE);
        Ok(disk)
    }

    /// 打开已有镜像，长度必须恰好是 16KB。
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = match OpenOptions::new().read(true).write(true).open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(FileSystemError::ImageMissing(display(path)));
            }
            Err(e) => return Err(e.into()),
        };

        let disk = Self::locked(file, path)?;
        let len = disk.handle()?.metadata()?.len();
        if len != DISK_SIZE {
            return Err(FileSystemError::Corrupted(format!(
                "image is {} bytes, expected {}",
                len, DISK_SIZE
            )));
        }
        Ok(disk)
    }

    fn locked(file: File, path: &Path) -> Result<Self> {
        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(FileSystemError::Locked(display(path)));
            }
            Err(TryLockError::Error(e)) => return Err(e.into()),
        }
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    fn handle(&self) -> Result<MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| FileSystemError::Corrupted("disk handle poisoned".to_string()))
    }

    fn check_range(&self, block_id: u32) -> Result<u64> {
        if block_id >= self.block_count() {
            return Err(FileSystemError::OutOfRange(block_id));
        }
        Ok(block_id as u64 * BLOCK_SIZE as u64)
    }
}

impl BlockDevice for FileDisk {
    fn block_count(&self) -> u32 {
        BLOCK_COUNT as u32
    }

    fn read_block(&self, block_id: u32, buf: &mut Block) -> Result<()> {
        let offset = self.check_range(block_id)?;
        let mut file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        debug!("read block {}", block_id);
        Ok(())
    }

    fn write_block(&self, block_id: u32, buf: &Block) -> Result<()> {
        let offset = self.check_range(block_id)?;
        let mut file = self.handle()?;
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        debug!("wrote block {}", block_id);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.handle()?.sync_data()?;
        Ok(())
    }
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::types::zeroed_block;

    #[test]
    fn out_of_range_block_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let disk = FileDisk::create(dir.path().join("d.img")).unwrap();
        let mut buf = zeroed_block();

        assert!(matches!(
            disk.read_block(16, &mut buf),
            Err(FileSystemError::OutOfRange(16))
        ));
        assert!(matches!(
            disk.write_block(99, &buf),
            Err(FileSystemError::OutOfRange(99))
        ));
    }

    #[test]
    fn write_touches_only_its_block() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.img");
        let disk = FileDisk::create(&path).unwrap();

        disk.write_block(5, &[0xAB; BLOCK_SIZE]).unwrap();
        drop(disk);

        let bytes = fs::read(&path).unwrap();
        assert_eq!(bytes.len() as u64, DISK_SIZE);
        let start = 5 * BLOCK_SIZE;
        assert!(bytes[..start].iter().all(|&b| b == 0));
        assert!(bytes[start..start + BLOCK_SIZE].iter().all(|&b| b == 0xAB));
        assert!(bytes[start + BLOCK_SIZE..].iter().all(|&b| b == 0));
    }

    #[test]
    fn open_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            FileDisk::open(dir.path().join("nope.img")),
            Err(FileSystemError::ImageMissing(_))
        ));
    }

    #[test]
    fn open_rejects_wrong_length() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.img");
        fs::write(&path, [0u8; 100]).unwrap();
        assert!(matches!(
            FileDisk::open(&path),
            Err(FileSystemError::Corrupted(_))
        ));
    }

    #[test]
    fn second_handle_is_locked_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("d.img");
        let first = FileDisk::create(&path).unwrap();

        assert!(matches!(
            FileDisk::open(&path),
            Err(FileSystemError::Locked(_))
        ));

        drop(first);
        assert!(FileDisk::open(&path).is_ok());
    }
}
