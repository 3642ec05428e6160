//! EA 记录解码
//!
//! 把原生 query 调用返回的缓冲区解码回有序的 [`EaEntry`] 序列。
//! 解码绝不读出调用方提供的缓冲区边界之外；任何会越界的记录都
//! 作为 [`ErrorKind::Corrupted`] 报告，而不是静默截断。

use byteorder::{ByteOrder, LittleEndian};

use crate::charset::Charset;
use crate::consts::EA_FULL_HEADER_SIZE;
use crate::error::{Error, ErrorKind, Result};
use crate::types::{EaEntry, EaFlags};

/// 解码一条记录链
///
/// 输出保持磁盘顺序。名称转码失败不会中止对后续记录的解码：
/// 该条目的名称置为空字符串占位并记录一条警告，值绝不丢弃。
///
/// 内核的一个已文档化的怪癖会在这里原样保留：按名称过滤查询时，
/// 文件上不存在的名称仍返回一条值为空的记录而不是被省略。
/// 调用方只能靠"值长度为 0 且知道该名称被显式查询过"来区分
/// "不存在"与"存在但为空"。
pub fn decode_entries(buf: &[u8], charset: Charset) -> Result<Vec<EaEntry>> {
    let mut entries = Vec::new();

    if buf.is_empty() {
        return Ok(entries);
    }

    let mut pos = 0usize;

    loop {
        if pos + EA_FULL_HEADER_SIZE > buf.len() {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "EA record header exceeds buffer bound",
            ));
        }

        let next_offset = LittleEndian::read_u32(&buf[pos..pos + 4]) as usize;
        let flags = buf[pos + 4];
        let name_len = buf[pos + 5] as usize;
        let value_len = LittleEndian::read_u16(&buf[pos + 6..pos + 8]) as usize;

        let name_start = pos + EA_FULL_HEADER_SIZE;
        let value_start = name_start + name_len + 1; // NUL 分隔符
        let value_end = value_start + value_len;

        if value_end > buf.len() {
            return Err(Error::new(
                ErrorKind::Corrupted,
                "EA record data exceeds buffer bound",
            ));
        }

        let name = match charset.decode(&buf[name_start..name_start + name_len]) {
            Ok(name) => name,
            Err(err) => {
                log::warn!("[EA] failed to decode EA name at offset {}: {}", pos, err);
                String::new()
            }
        };

        entries.push(EaEntry {
            flags: EaFlags::from_bits_retain(flags),
            name,
            value: buf[value_start..value_end].to_vec(),
        });

        if next_offset == 0 {
            break;
        }

        pos += next_offset;
    }

    Ok(entries)
}
