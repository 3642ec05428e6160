//! ntdll 原生调用封装
//!
//! 对 `NtOpenFile` / `NtQueryEaFile` / `NtSetEaFile` /
//! `NtQueryInformationFile` / `NtClose` 的薄封装：每个调用返回
//! NTSTATUS，任何非成功状态都映射为 [`Error`] 并保留原始状态码。
//!
//! 所有调用都是同步阻塞的（句柄以 `FILE_SYNCHRONOUS_IO_NONALERT`
//! 打开），没有取消和超时。

use core::mem;
use core::ptr;

use ntapi::ntioapi::{
    FileEaInformation, NtOpenFile, NtQueryEaFile, NtQueryInformationFile, NtSetEaFile,
    FILE_EA_INFORMATION, IO_STATUS_BLOCK,
};
use ntapi::ntobapi::NtClose;
use ntapi::ntrtl::RtlInitUnicodeString;
use winapi::shared::ntdef::{
    HANDLE, NTSTATUS, NT_SUCCESS, OBJECT_ATTRIBUTES, OBJ_CASE_INSENSITIVE, UNICODE_STRING,
};
use winapi::shared::ntstatus::{
    STATUS_ACCESS_DENIED, STATUS_EA_TOO_LARGE, STATUS_OBJECT_NAME_NOT_FOUND,
    STATUS_OBJECT_PATH_NOT_FOUND,
};

use crate::error::{Error, ErrorKind, Result};

pub use ntapi::ntioapi::{
    FILE_DIRECTORY_FILE, FILE_NON_DIRECTORY_FILE, FILE_OPEN_REPARSE_POINT, FILE_RANDOM_ACCESS,
    FILE_SYNCHRONOUS_IO_NONALERT,
};
pub use winapi::shared::ntstatus::STATUS_NO_EAS_ON_FILE;
pub use winapi::um::winnt::{
    FILE_READ_EA, FILE_SHARE_READ, FILE_SHARE_WRITE, FILE_WRITE_EA, SYNCHRONIZE,
};

/// 把非成功的 NTSTATUS 映射为错误
fn map_status(status: NTSTATUS, message: &'static str) -> Error {
    let kind = match status {
        STATUS_OBJECT_NAME_NOT_FOUND | STATUS_OBJECT_PATH_NOT_FOUND => ErrorKind::NotFound,
        STATUS_ACCESS_DENIED => ErrorKind::PermissionDenied,
        STATUS_EA_TOO_LARGE => ErrorKind::EaTooLarge,
        _ => ErrorKind::Io,
    };

    Error::with_code(kind, message, i64::from(status))
}

/// 以 NT 命名空间路径打开文件
///
/// `path` 必须是带 `\??\` 前缀、以 NUL 结尾的 UTF-16 路径；
/// 在调用返回前它必须保持有效。
pub fn nt_open_file(
    desired_access: u32,
    path: &[u16],
    share_access: u32,
    open_options: u32,
) -> Result<HANDLE> {
    let mut handle: HANDLE = ptr::null_mut();
    let mut isb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };
    let mut unicode_path: UNICODE_STRING = unsafe { mem::zeroed() };

    unsafe {
        RtlInitUnicodeString(&mut unicode_path, path.as_ptr() as *mut u16);
    }

    let mut obj_attr: OBJECT_ATTRIBUTES = unsafe { mem::zeroed() };
    obj_attr.Length = mem::size_of::<OBJECT_ATTRIBUTES>() as u32;
    obj_attr.ObjectName = &mut unicode_path;
    obj_attr.Attributes = OBJ_CASE_INSENSITIVE;

    let status = unsafe {
        NtOpenFile(
            &mut handle,
            desired_access,
            &mut obj_attr,
            &mut isb,
            share_access,
            open_options,
        )
    };
    if !NT_SUCCESS(status) {
        return Err(map_status(status, "NtOpenFile failed"));
    }

    Ok(handle)
}

/// 查询文件 EA 的聚合大小（FileEaInformation 信息类）
pub fn nt_query_ea_size(handle: HANDLE) -> Result<u32> {
    let mut isb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };
    let mut info: FILE_EA_INFORMATION = unsafe { mem::zeroed() };

    let status = unsafe {
        NtQueryInformationFile(
            handle,
            &mut isb,
            (&mut info as *mut FILE_EA_INFORMATION).cast(),
            mem::size_of::<FILE_EA_INFORMATION>() as u32,
            FileEaInformation,
        )
    };
    if !NT_SUCCESS(status) {
        return Err(map_status(status, "NtQueryInformationFile failed"));
    }

    Ok(info.EaSize)
}

/// 查询文件的 EA 记录链
///
/// `name_list` 为 `Some` 时只查询列表中的名称；为 `None` 时查询全部。
/// 返回内核实际写入 `buf` 的字节数。
pub fn nt_query_ea(handle: HANDLE, buf: &mut [u8], name_list: Option<&[u8]>) -> Result<usize> {
    let mut isb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };

    let (list_ptr, list_len) = match name_list {
        Some(list) => (list.as_ptr() as *mut _, list.len() as u32),
        None => (ptr::null_mut(), 0),
    };

    let status = unsafe {
        NtQueryEaFile(
            handle,
            &mut isb,
            buf.as_mut_ptr().cast(),
            buf.len() as u32,
            0, // ReturnSingleEntry
            list_ptr,
            list_len,
            ptr::null_mut(), // EaIndex，提供名称列表时被内核忽略
            0,               // RestartScan，新句柄上的首次查询从头开始
        )
    };
    if !NT_SUCCESS(status) {
        return Err(map_status(status, "NtQueryEaFile failed"));
    }

    Ok(isb.Information)
}

/// 写入文件的 EA 记录链
///
/// `buf` 必须是完整编码的记录链；内核只在本次调用期间引用它，
/// 调用方负责保证其存储在调用返回前有效且不被移动。
pub fn nt_set_ea(handle: HANDLE, buf: &[u8]) -> Result<()> {
    let mut isb: IO_STATUS_BLOCK = unsafe { mem::zeroed() };

    let status = unsafe {
        NtSetEaFile(
            handle,
            &mut isb,
            buf.as_ptr() as *mut _,
            buf.len() as u32,
        )
    };
    if !NT_SUCCESS(status) {
        return Err(map_status(status, "NtSetEaFile failed"));
    }

    Ok(())
}

/// 关闭句柄
pub fn nt_close(handle: HANDLE) -> Result<()> {
    let status = unsafe { NtClose(handle) };
    if !NT_SUCCESS(status) {
        return Err(map_status(status, "NtClose failed"));
    }

    Ok(())
}
