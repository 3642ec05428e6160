//! NTFS 扩展属性常量定义
//!
//! 这个模块包含了 EA 线格式和访问协议的所有常量定义，包括：
//! - 记录布局相关常量
//! - 大小上限
//! - flags 位定义
//! - NT 路径命名空间前缀

//=============================================================================
// 记录布局
//=============================================================================

/// 完整 EA 记录头大小（4 字节 next-offset + 1 字节 flags
/// + 1 字节名称长度 + 2 字节值长度）
pub const EA_FULL_HEADER_SIZE: usize = 8;

/// 名称过滤记录头大小（4 字节 next-offset + 1 字节名称长度）
pub const EA_GET_HEADER_SIZE: usize = 5;

/// 记录对齐粒度（下一条记录必须从 4 字节对齐的偏移开始）
pub const EA_ALIGN: usize = 4;

/// 名称与值之间的 NUL 分隔符占 1 字节
pub const EA_NAME_NUL: usize = 1;

//=============================================================================
// 大小上限
//=============================================================================

/// EA 名称编码后的最大字节数
pub const EA_NAME_MAX_LEN: usize = 0xff;

/// EA 值的最大字节数
pub const EA_VALUE_MAX_LEN: usize = 0xffff;

/// 单次写入操作中所有记录编码后的总大小上限（64KB）
///
/// 超过该上限时内核会整体拒绝调用；在某些历史版本中甚至会
/// 静默截断数据，因此必须在任何原生调用之前拒绝。
pub const EA_SET_MAX_LEN: usize = 0x1_0000;

/// 大小探测失败时回退使用的查询缓冲区大小
pub const EA_SIZE_FALLBACK: u32 = 0xffff;

//=============================================================================
// flags 位定义
//=============================================================================

/// 文件需要由理解 EA 的使用方解释（FILE_NEED_EA）
pub const FILE_NEED_EA: u8 = 0x80;

//=============================================================================
// 路径
//=============================================================================

/// NT 对象命名空间前缀，绝对路径加上它之后可以直接交给原生 API，
/// 绕过 Win32 的路径解析层
pub const NT_PATH_PREFIX: &str = r"\??\";

/// 计算一条记录按 4 字节对齐补零后的长度
#[inline]
pub const fn padded_len(len: usize) -> usize {
    (len + EA_ALIGN - 1) & !(EA_ALIGN - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_len() {
        // 已对齐的长度保持不变
        assert_eq!(padded_len(0), 0);
        assert_eq!(padded_len(8), 8);
        assert_eq!(padded_len(64), 64);

        // 未对齐的长度补齐到下一个 4 的倍数
        assert_eq!(padded_len(9), 12);
        assert_eq!(padded_len(10), 12);
        assert_eq!(padded_len(11), 12);
    }
}
