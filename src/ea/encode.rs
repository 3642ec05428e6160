//! EA 记录编码
//!
//! 把有序的 [`EaEntry`] 序列编码为一段可以直接交给原生 set 调用的
//! 连续缓冲区。条目顺序被保留，成为磁盘上记录链的迭代顺序。

use byteorder::{ByteOrder, LittleEndian};

use crate::charset::Charset;
use crate::consts::{
    EA_FULL_HEADER_SIZE, EA_NAME_MAX_LEN, EA_NAME_NUL, EA_SET_MAX_LEN, EA_VALUE_MAX_LEN,
    padded_len,
};
use crate::error::{Error, ErrorKind, Result};
use crate::types::EaEntry;

/// 编码一组 EA 条目
///
/// 总大小上限（64KB）是逐条累计检查的，因此返回的 [`ErrorKind::EaTooLarge`]
/// 通过 [`Error::code`] 标出第一个越界的条目索引；只在最后检查一次的
/// 历史做法会让越界写入悄悄发生，这里是被纠正过的设计。
///
/// # 返回
///
/// 编码后的缓冲区。它的长度就是必须传给原生 set 调用的长度，
/// 并且在该调用返回之前缓冲区必须保持有效且不被移动。
pub fn encode_entries(entries: &[EaEntry], charset: Charset) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut total = 0usize;

    for (index, entry) in entries.iter().enumerate() {
        let name = charset.encode(&entry.name)?;

        if name.is_empty() {
            return Err(Error::with_code(
                ErrorKind::InvalidInput,
                "EA name is empty",
                index as i64,
            ));
        }
        if name.len() > EA_NAME_MAX_LEN {
            return Err(Error::with_code(
                ErrorKind::NameTooLong,
                "EA name is longer than 255 bytes once encoded",
                index as i64,
            ));
        }
        if entry.value.len() > EA_VALUE_MAX_LEN {
            return Err(Error::with_code(
                ErrorKind::InvalidInput,
                "EA value is longer than 65535 bytes",
                index as i64,
            ));
        }

        let unpadded = EA_FULL_HEADER_SIZE + name.len() + EA_NAME_NUL + entry.value.len();
        let padded = padded_len(unpadded);

        total += padded;
        if total > EA_SET_MAX_LEN {
            return Err(Error::with_code(
                ErrorKind::EaTooLarge,
                "total encoded EA size exceeds 64KB",
                index as i64,
            ));
        }

        let last = index + 1 == entries.len();
        let next_offset = if last { 0 } else { padded as u32 };

        let mut header = [0u8; EA_FULL_HEADER_SIZE];
        LittleEndian::write_u32(&mut header[0..4], next_offset);
        header[4] = entry.flags.bits();
        header[5] = name.len() as u8;
        LittleEndian::write_u16(&mut header[6..8], entry.value.len() as u16);

        buf.extend_from_slice(&header);
        buf.extend_from_slice(&name);
        buf.push(0); // NUL 分隔符
        buf.extend_from_slice(&entry.value);
        buf.resize(total, 0); // 补零到 4 字节对齐
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_with_padded_size(name: &str, padded: usize) -> EaEntry {
        // 反推值长度使记录补齐后恰好为 padded 字节
        let value_len = padded - EA_FULL_HEADER_SIZE - name.len() - EA_NAME_NUL;
        EaEntry::new(name, vec![0xaau8; value_len])
    }

    #[test]
    fn test_name_boundary_255_ok_256_fails() {
        let ok = EaEntry::new("N".repeat(255), vec![1]);
        assert!(encode_entries(&[ok], Charset::Latin1).is_ok());

        let too_long = EaEntry::new("N".repeat(256), vec![1]);
        let err = encode_entries(&[too_long], Charset::Latin1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NameTooLong);
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = encode_entries(&[EaEntry::new("", vec![1])], Charset::Latin1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_size_ceiling_exact_ok() {
        // 16 条补齐后各 4096 字节的记录，总计恰好 65536
        let entries: Vec<EaEntry> = (0..16)
            .map(|i| entry_with_padded_size(&format!("E{:02}", i), 4096))
            .collect();

        let buf = encode_entries(&entries, Charset::Latin1).unwrap();
        assert_eq!(buf.len(), EA_SET_MAX_LEN);
    }

    #[test]
    fn test_size_ceiling_over_fails_with_index() {
        // 前 16 条填满 65536，第 17 条（索引 16）越界
        let mut entries: Vec<EaEntry> = (0..16)
            .map(|i| entry_with_padded_size(&format!("E{:02}", i), 4096))
            .collect();
        entries.push(EaEntry::new("OVER", vec![]));

        let err = encode_entries(&entries, Charset::Latin1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EaTooLarge);
        assert_eq!(err.code(), Some(16));
    }

    #[test]
    fn test_value_too_long_rejected() {
        let entry = EaEntry::new("BIG", vec![0u8; EA_VALUE_MAX_LEN + 1]);
        let err = encode_entries(&[entry], Charset::Latin1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_buffer_length_matches_padded_sum() {
        let entries = vec![EaEntry::new("A", vec![1, 2, 3]), EaEntry::new("BB", vec![])];
        let buf = encode_entries(&entries, Charset::Latin1).unwrap();

        let expected = padded_len(EA_FULL_HEADER_SIZE + 1 + EA_NAME_NUL + 3)
            + padded_len(EA_FULL_HEADER_SIZE + 2 + EA_NAME_NUL);
        assert_eq!(buf.len(), expected);
    }

    #[test]
    fn test_empty_list_encodes_to_empty_buffer() {
        // 空列表的拒绝属于会话层的 NothingToWrite 检查，编码器本身不拒绝
        assert!(encode_entries(&[], Charset::Latin1).unwrap().is_empty());
    }
}
