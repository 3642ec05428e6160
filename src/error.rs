//! 错误类型定义
//!
//! 提供 NTFS 扩展属性操作的错误类型。

use core::fmt;

/// EA 操作错误
///
/// 除了错误类别和静态消息之外，还可以携带一个数值：
/// - 对于原生调用错误，是内核返回的 NTSTATUS（或 OS 错误码）；
/// - 对于 `EaTooLarge`，是第一个超出总大小上限的条目索引。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
    message: &'static str,
    code: Option<i64>,
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// I/O 错误（包括未被细分的原生调用失败）
    Io,
    /// 无效参数
    InvalidInput,
    /// EA 名称编码后超过 255 字节
    NameTooLong,
    /// 单次写入的 EA 总大小超过 64KB
    EaTooLarge,
    /// 写入操作的条目列表为空
    NothingToWrite,
    /// 名称在当前代码页下无法编码/解码
    Encoding,
    /// 内核返回的 EA 缓冲区损坏（解码会越过缓冲区边界）
    Corrupted,
    /// 权限错误
    PermissionDenied,
    /// 文件不存在
    NotFound,
    /// 不支持的操作
    Unsupported,
}

impl Error {
    /// 创建新错误
    pub const fn new(kind: ErrorKind, message: &'static str) -> Self {
        Self {
            kind,
            message,
            code: None,
        }
    }

    /// 创建携带数值的错误（NTSTATUS、OS 错误码或条目索引）
    pub const fn with_code(kind: ErrorKind, message: &'static str, code: i64) -> Self {
        Self {
            kind,
            message,
            code: Some(code),
        }
    }

    /// 获取错误类型
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// 获取错误消息
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// 获取附带的数值
    pub const fn code(&self) -> Option<i64> {
        self.code
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{:?}: {} ({:#x})", self.kind, self.message, code),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            _ => ErrorKind::Io,
        };

        match err.raw_os_error() {
            Some(os) => Error::with_code(kind, "OS I/O error", i64::from(os)),
            None => Error::new(kind, "I/O error"),
        }
    }
}

/// Result 类型别名
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_with_code() {
        let err = Error::with_code(ErrorKind::Io, "native call failed", 0x1f);
        assert!(err.to_string().contains("native call failed"));
        assert!(err.to_string().contains("0x1f"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
