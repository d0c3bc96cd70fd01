use std::{fs, io::ErrorKind, path::Path};

use log::{info, warn};

use crate::{
    disk::file_disk::FileDisk,
    fs::{
        error::{FileSystemError, Result},
        FileSystem,
    },
};

pub const DEFAULT_DISK_PATH: &str = "disk/virtual_disk.img";

/// reformat 之前镜像是否存在
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reformatted {
    Replaced,
    Created,
}

/// mkfs：新建镜像并写入初始状态。镜像已存在时报 `ImageAlreadyExists`，不碰原文件。
pub fn format_image<F: FnMut(u32, u32)>(
    path: impl AsRef<Path>,
    progress: F,
) -> Result<FileSystem<FileDisk>> {
    let path = path.as_ref();
    let mut fs = FileSystem::new(FileDisk::create(path)?);
    if let Err(e) = fs.format(progress) {
        drop(fs);
        return discard_on_error(path, Err(e));
    }
    info!("new disk at {}", path.display());
    Ok(fs)
}

/// 失败时删掉写了一半的镜像，下次 mkfs 可以直接重来
fn discard_on_error<T>(path: &Path, result: Result<T>) -> Result<T> {
    if result.is_err() {
        if let Err(e) = fs::remove_file(path) {
            warn!("cannot remove half-formatted {}: {}", path.display(), e);
        }
    }
    result
}

/// refmt：删除旧镜像后重新 mkfs。镜像不存在时给出警告，按 mkfs 处理。
pub fn reformat_image<F: FnMut(u32, u32)>(
    path: impl AsRef<Path>,
    progress: F,
) -> Result<(FileSystem<FileDisk>, Reformatted)> {
    let path = path.as_ref();

    // 别的进程还开着这个镜像时不删；长度不对的旧镜像照样替换。
    // Unix 上持有锁直到 unlink 完成，其他平台打开中的文件删不掉，只能先释放。
    let held = match FileDisk::open(path) {
        Ok(disk) => Some(disk),
        Err(e @ FileSystemError::Locked(_)) => return Err(e),
        Err(_) => None,
    };
    #[cfg(not(unix))]
    drop(held);

    let removed = fs::remove_file(path);
    #[cfg(unix)]
    drop(held);

    let outcome = match removed {
        Ok(()) => Reformatted::Replaced,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(
                "no disk at {}, creating a new one instead",
                path.display()
            );
            Reformatted::Created
        }
        Err(e) => return Err(e.into()),
    };

    let fs = format_image(path, progress)?;
    Ok((fs, outcome))
}
