//! EA 记录编解码
//!
//! 内核的 EA 线格式是在一段连续缓冲区上用 `next-offset` 链接的记录链：
//! 每条记录以自身到下一条记录的字节距离开头，最后一条记录的距离为 0。
//! 本模块直接在平坦缓冲区上做偏移运算来编码和解码这条链，
//! 不重建任何内存指针图。
//!
//! # 记录布局
//!
//! ```text
//! +0  u32  NextEntryOffset   到下一条记录的距离，最后一条为 0
//! +4  u8   Flags             FILE_NEED_EA 等
//! +5  u8   EaNameLength      名称字节数（不含 NUL）
//! +6  u16  EaValueLength     值字节数
//! +8  ...  名称字节 · NUL · 值字节 · 补零到 4 字节对齐
//! ```
//!
//! 名称过滤记录（[`name_list`]）用简化的 5 字节头，布局规则相同但没有值。

mod decode;
mod encode;
mod name_list;

pub use decode::decode_entries;
pub use encode::encode_entries;
pub use name_list::encode_name_list;
