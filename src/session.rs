//! EA 访问会话
//!
//! 围绕单个文件句柄的一次性协议状态机：`Closed → Opened → Closed`。
//! 每个会话按最小权限打开目标（查询用读 EA 权限，写入用写 EA 权限），
//! 执行一次查询或写入，然后保证句柄在所有退出路径上都被关闭。
//!
//! 关闭遵循"主错误优先"规则：触发操作和关闭同时失败时，
//! 返回触发操作的错误，关闭错误被丢弃；只有在操作成功时
//! 关闭错误才会浮出。
//!
//! 会话之间没有共享状态。多个会话并发指向同一文件时，
//! 它们的效果顺序由内核自行串行化，这里不提供额外保证。

use std::ffi::OsString;
use std::fs;
use std::os::windows::ffi::OsStrExt;
use std::path::Path;

use winapi::shared::ntdef::HANDLE;

use crate::charset::Charset;
use crate::consts::{EA_FULL_HEADER_SIZE, EA_SIZE_FALLBACK, EA_VALUE_MAX_LEN, NT_PATH_PREFIX};
use crate::ea::{decode_entries, encode_entries, encode_name_list};
use crate::error::{Error, ErrorKind, Result};
use crate::sys;
use crate::types::{EaEntry, EaFlags};

/// 打开意图，决定申请的访问权限和共享模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenIntent {
    /// 查询 EA（FILE_READ_EA，共享读）
    Query,
    /// 写入 EA（FILE_WRITE_EA，共享写）
    Set,
}

/// 一次性 EA 访问会话
///
/// 持有一个以同步 I/O 语义打开的文件句柄。查询和写入操作消耗
/// 会话本身，保证 open → 操作 → close 的序列只发生一次。
#[derive(Debug)]
pub struct EaSession {
    handle: HANDLE,
    charset: Charset,
    closed: bool,
}

impl EaSession {
    /// 打开目标文件，使用主机默认代码页
    ///
    /// 目标类型（普通文件、目录、重解析点）在打开之前确定，
    /// 因为它决定互斥的打开选项；除非 `follow_reparse` 为真，
    /// 否则不跟随符号链接。路径解析或打开失败时没有句柄存在，
    /// 不欠任何清理。
    pub fn open(path: &Path, intent: OpenIntent, follow_reparse: bool) -> Result<Self> {
        Self::open_with_charset(path, intent, follow_reparse, Charset::system())
    }

    /// 打开目标文件，显式指定名称字符集
    pub fn open_with_charset(
        path: &Path,
        intent: OpenIntent,
        follow_reparse: bool,
        charset: Charset,
    ) -> Result<Self> {
        let meta = if follow_reparse {
            fs::metadata(path)?
        } else {
            fs::symlink_metadata(path)?
        };

        // 目标类型决定互斥的打开选项
        let mut open_options = sys::FILE_SYNCHRONOUS_IO_NONALERT;
        if meta.file_type().is_symlink() {
            open_options |= sys::FILE_OPEN_REPARSE_POINT;
        } else if meta.is_dir() {
            open_options |= sys::FILE_DIRECTORY_FILE;
        } else {
            open_options |= sys::FILE_NON_DIRECTORY_FILE | sys::FILE_RANDOM_ACCESS;
        }

        // 词法绝对化（不解析符号链接），再加 NT 命名空间前缀
        let abs = std::path::absolute(path)?;
        let mut nt_path = OsString::from(NT_PATH_PREFIX);
        nt_path.push(abs.as_os_str());
        let wide: Vec<u16> = nt_path.encode_wide().chain(core::iter::once(0)).collect();

        let (desired_access, share_access) = match intent {
            OpenIntent::Query => (sys::FILE_READ_EA | sys::SYNCHRONIZE, sys::FILE_SHARE_READ),
            OpenIntent::Set => (sys::FILE_WRITE_EA | sys::SYNCHRONIZE, sys::FILE_SHARE_WRITE),
        };

        let handle = sys::nt_open_file(desired_access, &wide, share_access, open_options)?;

        Ok(Self {
            handle,
            charset,
            closed: false,
        })
    }

    /// 查询文件上的全部 EA
    pub fn query_all(self) -> Result<Vec<EaEntry>> {
        let names: [&str; 0] = [];
        self.query(&names)
    }

    /// 只查询给定名称的 EA
    ///
    /// 内核对被查询但不存在的名称仍返回一条值为空的记录，
    /// 结果中的空值条目按原样保留（见 [`EaEntry::is_empty_value`]）。
    pub fn query_names<S: AsRef<str>>(self, names: &[S]) -> Result<Vec<EaEntry>> {
        self.query(names)
    }

    /// 写入（或删除）一组 EA
    ///
    /// 空值条目删除同名 EA（若存在），不存在时为无操作——这是
    /// 内核语义，按原样保留。空条目列表在触碰内核之前被拒绝。
    pub fn set_entries(mut self, entries: &[EaEntry]) -> Result<()> {
        let primary = self.set_inner(entries);
        self.finish(primary)
    }

    fn query<S: AsRef<str>>(mut self, names: &[S]) -> Result<Vec<EaEntry>> {
        let primary = self.query_inner(names);
        self.finish(primary)
    }

    fn query_inner<S: AsRef<str>>(&mut self, names: &[S]) -> Result<Vec<EaEntry>> {
        // 大小探测失败回退到最大缓冲区而不是放弃整个查询，
        // 探测成功且为 0 时短路为空结果（区别于查询失败）
        let ea_size = match sys::nt_query_ea_size(self.handle) {
            Ok(0) => {
                log::debug!("[EA] file has no extended attributes");
                return Ok(Vec::new());
            }
            Ok(size) => size,
            Err(err) => {
                log::debug!("[EA] size probe failed ({}), using maximum buffer", err);
                EA_SIZE_FALLBACK
            }
        };

        let name_list = encode_name_list(names, self.charset)?;

        let mut buf = vec![0u8; ea_size as usize];
        let read = match sys::nt_query_ea(self.handle, &mut buf, name_list.as_deref()) {
            Ok(read) => read,
            // 回退路径上探测不可用时，无 EA 的文件在这里才暴露出来
            Err(err) if err.code() == Some(i64::from(sys::STATUS_NO_EAS_ON_FILE)) => {
                return Ok(Vec::new());
            }
            Err(err) => return Err(err),
        };

        let valid = if read == 0 || read > buf.len() {
            buf.len()
        } else {
            read
        };

        decode_entries(&buf[..valid], self.charset)
    }

    fn set_inner(&mut self, entries: &[EaEntry]) -> Result<()> {
        if entries.is_empty() {
            return Err(Error::new(ErrorKind::NothingToWrite, "no EA entries to write"));
        }

        // 编码失败在任何原生调用之前中止
        let buf = encode_entries(entries, self.charset)?;

        // buf 在调用返回前一直由本栈帧持有
        sys::nt_set_ea(self.handle, &buf)
    }

    /// 关闭句柄并返回主结果；主错误优先于关闭错误
    fn finish<T>(&mut self, primary: Result<T>) -> Result<T> {
        let close_result = self.close();
        match primary {
            Ok(value) => close_result.map(|()| value),
            Err(err) => Err(err),
        }
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        sys::nt_close(self.handle)
    }
}

impl Drop for EaSession {
    fn drop(&mut self) {
        // 兜底：正常路径都已显式关闭，这里只覆盖早退/panic
        if !self.closed {
            self.closed = true;
            let _ = sys::nt_close(self.handle);
        }
    }
}

/// 查询文件的 EA
///
/// `names` 为空时查询全部 EA。
pub fn query_file_ea<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    follow_reparse: bool,
    names: &[S],
) -> Result<Vec<EaEntry>> {
    let session = EaSession::open(path.as_ref(), OpenIntent::Query, follow_reparse)?;
    session.query_names(names)
}

/// 把一组 EA 写入文件
///
/// 写入空值条目会删除同名 EA（若存在），否则为无操作。
pub fn write_file_ea<P: AsRef<Path>>(
    path: P,
    follow_reparse: bool,
    entries: &[EaEntry],
) -> Result<()> {
    if entries.is_empty() {
        return Err(Error::new(ErrorKind::NothingToWrite, "no EA entries to write"));
    }

    let session = EaSession::open(path.as_ref(), OpenIntent::Set, follow_reparse)?;
    session.set_entries(entries)
}

/// 用源文件的内容作为值，向目标文件写入一条 EA
pub fn write_ea_from_file<P: AsRef<Path>, Q: AsRef<Path>>(
    target: P,
    follow_reparse: bool,
    source: Q,
    name: &str,
    flags: EaFlags,
) -> Result<()> {
    let value = fs::read(source)?;

    if EA_FULL_HEADER_SIZE + name.len() + value.len() > EA_VALUE_MAX_LEN {
        return Err(Error::new(
            ErrorKind::EaTooLarge,
            "combined length of EA name and value exceeds 65527 bytes",
        ));
    }

    write_file_ea(
        target,
        follow_reparse,
        &[EaEntry::with_flags(flags, name, value)],
    )
}
