use std::fmt;

/// 文件系统错误类型
#[derive(Debug)]
pub enum FileSystemError {
    Io(std::io::Error),         // 底层 I/O 错误
    ImageAlreadyExists(String), // mkfs 时镜像已存在
    ImageMissing(String),       // 镜像不存在
    Locked(String),             // 镜像正被另一个句柄使用
    OutOfRange(u32),            // 块号超出 0..16
    NameTooLong(usize),         // 文件名超过 55 字节
    InvalidName,                // 空文件名或含 '\0'
    DiskFull,                   // 空闲 inode 计数为 0
    TableFull,                  // inode 表里找不到空槽
    AllocationInconsistency { free_inodes: u32 },
    PartialAllocation {
        free_inodes: u32,
        free_blocks: u32,
        used_bits: u32,
        used_slots: u32,
    },
    FileNotFound(String),
    FileExists(String),
    FileTooLarge(usize),
    Corrupted(String), // 超级块或镜像格式不对
}

impl From<std::io::Error> for FileSystemError {
    fn from(e: std::io::Error) -> Self {
        FileSystemError::Io(e)
    }
}

impl From<bincode::Error> for FileSystemError {
    fn from(e: bincode::Error) -> Self {
        FileSystemError::Corrupted(format!("undecodable metadata: {}", e))
    }
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "Disk I/O error: {}", e),
            Self::ImageAlreadyExists(path) => write!(
                f,
                "Disk already exists at {}. To reformat the disk use `simple-fs refmt`",
                path
            ),
            Self::ImageMissing(path) => {
                write!(f, "No disk at {}. Create one with `simple-fs mkfs`", path)
            }
            Self::Locked(path) => write!(f, "Disk {} is in use by another process", path),
            Self::OutOfRange(block) => {
                write!(f, "Block {} out of range, only blocks 0 to 15 allowed", block)
            }
            Self::NameTooLong(len) => {
                write!(f, "File name is {} bytes, at most 55 allowed", len)
            }
            Self::InvalidName => write!(f, "File name must be non-empty and contain no NUL byte"),
            Self::DiskFull => write!(f, "Disk is full"),
            Self::TableFull => write!(f, "Inode table has no free slot"),
            Self::AllocationInconsistency { free_inodes } => write!(
                f,
                "Superblock reports {} free inodes but the inode table is full",
                free_inodes
            ),
            Self::PartialAllocation {
                free_inodes,
                free_blocks,
                used_bits,
                used_slots,
            } => write!(
                f,
                "Disk metadata out of sync (free inodes {}, free blocks {}, bitmap bits {}, occupied inodes {}); an allocation was interrupted",
                free_inodes, free_blocks, used_bits, used_slots
            ),
            Self::FileNotFound(name) => write!(f, "File not found: {}", name),
            Self::FileExists(name) => write!(f, "File already exists: {}", name),
            Self::FileTooLarge(len) => {
                write!(f, "Content is {} bytes, a file holds at most 1024", len)
            }
            Self::Corrupted(desc) => write!(f, "File system corrupted: {}", desc),
        }
    }
}

impl std::error::Error for FileSystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// 文件系统统一结果类型
pub type Result<T> = std::result::Result<T, FileSystemError>;
