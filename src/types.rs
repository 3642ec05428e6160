//! EA 数据结构定义
//!
//! 这个模块包含：
//!
//! 1. **线格式结构** - 直接对应内核 `FILE_FULL_EA_INFORMATION` /
//!    `FILE_GET_EA_INFORMATION` 的记录头，保留 NT 风格命名（便于对照
//!    wdm.h 中的定义），使用 `#[repr(C)]` 确保布局正确
//! 2. **可移植表示** - [`EaEntry`]，编解码器和会话层使用的值对象

#![allow(non_camel_case_types)] // 允许 NT 风格命名
#![allow(non_snake_case)]

use bitflags::bitflags;

use crate::consts::FILE_NEED_EA;

//=============================================================================
// 线格式结构定义
//=============================================================================

/// 完整 EA 记录头
///
/// 对应 wdm.h 的 `FILE_FULL_EA_INFORMATION`（不含变长尾部）。
/// 头部之后依次是：名称字节、1 个 NUL、值字节、补零到 4 字节对齐。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FILE_FULL_EA_INFORMATION {
    pub NextEntryOffset: u32, // 0: 到下一条记录的字节距离，最后一条为 0
    pub Flags: u8,            // 4: FILE_NEED_EA 等
    pub EaNameLength: u8,     // 5: 名称编码后的字节数（不含 NUL）
    pub EaValueLength: u16,   // 6: 值的字节数
}

/// 名称过滤记录头
///
/// 对应 wdm.h 的 `FILE_GET_EA_INFORMATION`（不含变长尾部）。
/// 头部之后是名称字节和 1 个 NUL，再补零到 4 字节对齐；没有值。
///
/// 注意：该结构实际头部只有 5 字节，`#[repr(C)]` 下 Rust 会把
/// 大小补齐到 8，因此编解码始终使用 [`crate::consts::EA_GET_HEADER_SIZE`]
/// 而不是 `size_of`。
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct FILE_GET_EA_INFORMATION {
    pub NextEntryOffset: u32, // 0: 到下一条过滤记录的字节距离，最后一条为 0
    pub EaNameLength: u8,     // 4: 名称编码后的字节数（不含 NUL）
}

//=============================================================================
// 可移植表示
//=============================================================================

bitflags! {
    /// EA 记录 flags
    ///
    /// 对应内核的 `FILE_NEED_EA` 常量，其余位保留为零。
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct EaFlags: u8 {
        /// 文件需要由理解 EA 的使用方解释
        const NEED_EA = FILE_NEED_EA;
    }
}

/// 一个扩展属性条目
///
/// 不可变值对象，与文件或句柄没有所有权关系：写入前由调用方构造，
/// 查询后由解码器产出。
///
/// 名称大小写不敏感；内核存储时会转为大写，查询返回的是大写形式，
/// 调用方不能假设大小写在写入/查询周期中保持不变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EaEntry {
    /// 记录 flags
    pub flags: EaFlags,

    /// EA 名称（可移植文本形式；编码后 1–255 字节）
    pub name: String,

    /// EA 值（0–65535 字节；写入空值会删除同名 EA）
    pub value: Vec<u8>,
}

impl EaEntry {
    /// 创建 flags 为零的条目
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            flags: EaFlags::empty(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// 创建带 flags 的条目
    pub fn with_flags(flags: EaFlags, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            flags,
            name: name.into(),
            value: value.into(),
        }
    }

    /// 值是否为空
    ///
    /// 对于"按名称查询"的结果，空值可能表示该名称在文件上不存在
    /// （内核对被显式查询但不存在的名称仍会返回一条空值记录），
    /// 也可能表示该 EA 确实存在且值为空，两者无法仅凭结果区分。
    pub fn is_empty_value(&self) -> bool {
        self.value.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::EA_FULL_HEADER_SIZE;
    use core::mem::size_of;

    #[test]
    fn test_full_header_layout() {
        // 线格式头必须恰好 8 字节
        assert_eq!(size_of::<FILE_FULL_EA_INFORMATION>(), EA_FULL_HEADER_SIZE);
    }

    #[test]
    fn test_ea_flags() {
        let flags = EaFlags::NEED_EA;
        assert_eq!(flags.bits(), 0x80);
        assert!(EaFlags::from_bits(0x80).is_some());
        // 保留位不构成合法 flags
        assert!(EaFlags::from_bits(0x41).is_none());
    }

    #[test]
    fn test_entry_construction() {
        let entry = EaEntry::new("SAMPLE", b"abc".to_vec());
        assert_eq!(entry.flags, EaFlags::empty());
        assert!(!entry.is_empty_value());

        let removal = EaEntry::new("SAMPLE", Vec::new());
        assert!(removal.is_empty_value());
    }
}
