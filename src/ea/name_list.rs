//! 查询名称列表构建
//!
//! 把调用方给出的 EA 名称集合编码为内核的名称过滤格式
//! （`FILE_GET_EA_INFORMATION` 链）：5 字节头 · 名称 · NUL ·
//! 补零到 4 字节对齐，`next-offset` 链接规则与完整记录相同。

use byteorder::{ByteOrder, LittleEndian};

use crate::charset::Charset;
use crate::consts::{EA_GET_HEADER_SIZE, EA_NAME_MAX_LEN, EA_NAME_NUL, padded_len};
use crate::error::{Error, ErrorKind, Result};

/// 编码名称过滤缓冲区
///
/// 空名称列表表示"查询文件上的全部 EA"，必须表示为"不提供过滤
/// 缓冲区"（返回 `None`）而不是零长度缓冲区——对内核而言两者不等价。
pub fn encode_name_list<S: AsRef<str>>(names: &[S], charset: Charset) -> Result<Option<Vec<u8>>> {
    if names.is_empty() {
        return Ok(None);
    }

    let mut buf = Vec::new();

    for (index, name) in names.iter().enumerate() {
        let encoded = charset.encode(name.as_ref())?;

        if encoded.is_empty() {
            return Err(Error::with_code(
                ErrorKind::InvalidInput,
                "EA name is empty",
                index as i64,
            ));
        }
        if encoded.len() > EA_NAME_MAX_LEN {
            return Err(Error::with_code(
                ErrorKind::NameTooLong,
                "EA name is longer than 255 bytes once encoded",
                index as i64,
            ));
        }

        let unpadded = EA_GET_HEADER_SIZE + encoded.len() + EA_NAME_NUL;
        let padded = padded_len(unpadded);

        let last = index + 1 == names.len();
        let next_offset = if last { 0 } else { padded as u32 };

        let mut header = [0u8; EA_GET_HEADER_SIZE];
        LittleEndian::write_u32(&mut header[0..4], next_offset);
        header[4] = encoded.len() as u8;

        let start = buf.len();
        buf.extend_from_slice(&header);
        buf.extend_from_slice(&encoded);
        buf.push(0); // NUL 分隔符
        buf.resize(start + padded, 0);
    }

    Ok(Some(buf))
}
