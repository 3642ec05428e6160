//! ntfs_ea_core: NTFS 扩展属性（EA）读写库
//!
//! 通过 NT 原生文件 API（`NtOpenFile` / `NtQueryEaFile` / `NtSetEaFile`）
//! 读写附着在文件上的命名二进制值。常规的 Win32 文件层不暴露 EA，
//! 因此路径以 `\??\` 对象命名空间形式直接提交给内核。
//!
//! 核心是两部分：
//! - **记录编解码**（[`ea`]）——在 `(flags, name, value)` 三元组列表
//!   和内核的链式记录布局之间转换，任何主机上都可用、可测试；
//! - **访问协议**（[`session`]，仅 Windows）——open → 探测大小 →
//!   query/set → close 的一次性会话，保证句柄在所有退出路径上关闭。
//!
//! # 示例
//!
//! ```rust,ignore
//! use ntfs_ea_core::{query_file_ea, write_file_ea, EaEntry};
//!
//! // 写入两条 EA（顺序保留为磁盘上的迭代顺序）
//! write_file_ea("data.bin", false, &[
//!     EaEntry::new("ALPHA", vec![0x01, 0x02]),
//!     EaEntry::new("BETA", Vec::new()), // 空值：删除同名 EA（若存在）
//! ])?;
//!
//! // 查询全部 EA
//! let names: [&str; 0] = [];
//! for ea in query_file_ea("data.bin", false, &names)? {
//!     println!("{} = {:?}", ea.name, ea.value);
//! }
//! # Ok::<(), ntfs_ea_core::Error>(())
//! ```
//!
//! # 模块结构
//!
//! - [`error`] - 错误类型定义
//! - [`consts`] - 线格式常量
//! - [`types`] - 记录头与 [`EaEntry`] 值对象
//! - [`charset`] - EA 名称与系统代码页之间的转码
//! - [`ea`] - 记录链编解码与名称过滤缓冲区构建
//! - [`session`] - 文件句柄协议状态机（仅 Windows）

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

// ===== 核心模块 =====

/// 错误处理
pub mod error;

/// 常量定义
pub mod consts;

/// 数据结构定义
pub mod types;

/// 名称转码
pub mod charset;

/// EA 记录编解码
pub mod ea;

// ===== 原生访问层（仅 Windows）=====

#[cfg(windows)]
mod sys;

/// EA 访问会话
#[cfg(windows)]
pub mod session;

// ===== 公共导出 =====

pub use charset::Charset;
pub use ea::{decode_entries, encode_entries, encode_name_list};
pub use error::{Error, ErrorKind, Result};
pub use types::{EaEntry, EaFlags};

#[cfg(windows)]
pub use session::{query_file_ea, write_ea_from_file, write_file_ea, EaSession, OpenIntent};
