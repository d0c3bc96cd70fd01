//! 一个 16KB 的单文件虚拟磁盘：16 个 1KB 块，
//! 超级块、inode 表、空闲块位图各占一块，其余 13 块存文件内容。

pub mod disk;
pub mod fs;
pub mod shell;
pub mod utils;

pub use disk::{init::DEFAULT_DISK_PATH, BlockDevice, FileDisk};
pub use fs::{
    config::{Geometry, Slot},
    error::{FileSystemError, Result},
    FileStat, FileSystem, Usage,
};
