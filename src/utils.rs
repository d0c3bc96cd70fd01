use crate::fs::{
    config::MAX_NAME_LEN,
    error::{FileSystemError, Result},
};

/// 校验文件名：1..=55 字节，不能含 '\0'（'\0' 是磁盘上的结束符和空槽标记）
pub fn validate_name(name: &str) -> Result<&[u8]> {
    let bytes = name.as_bytes();
    if bytes.is_empty() || bytes.contains(&0) {
        return Err(FileSystemError::InvalidName);
    }
    if bytes.len() > MAX_NAME_LEN {
        return Err(FileSystemError::NameTooLong(bytes.len()));
    }
    Ok(bytes)
}

/// 读出以 '\0' 结尾的定长字段
pub fn read_c_str(field: &[u8]) -> String {
    let end = field.iter().position(|&b| b == 0).unwrap_or(field.len());
    String::from_utf8_lossy(&field[..end]).into_owned()
}

/// 把 16 位位图画成 "1110 0000 0000 0000" 这样，位 0 在最左
pub fn render_bitmap(bits: u16) -> String {
    (0..16)
        .map(|i| if bits & (1 << i) != 0 { '1' } else { '0' })
        .collect::<Vec<_>>()
        .chunks(4)
        .map(|c| c.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_bounds() {
        assert!(validate_name(&"x".repeat(55)).is_ok());
        assert!(matches!(
            validate_name(&"x".repeat(56)),
            Err(FileSystemError::NameTooLong(56))
        ));
        assert!(matches!(validate_name(""), Err(FileSystemError::InvalidName)));
        assert!(matches!(
            validate_name("a\0b"),
            Err(FileSystemError::InvalidName)
        ));
    }

    #[test]
    fn c_str_stops_at_first_nul() {
        assert_eq!(read_c_str(b"a.txt\0\0garbage"), "a.txt");
        assert_eq!(read_c_str(b"full"), "full");
    }

    #[test]
    fn bitmap_rendering() {
        assert_eq!(render_bitmap(0b0000_0000_0001_1111), "1111 1000 0000 0000");
    }
}
