//! EA 名称转码
//!
//! 内核以单字节（或遗留多字节）代码页存储 EA 名称，本模块负责在
//! 可移植文本和这种编码之间转换。
//!
//! 代码页是一个可配置的边界而不是写死的假设：[`Charset::SystemAnsi`]
//! 使用主机的活动代码页（Windows 上即 `CP_ACP`），[`Charset::Latin1`]
//! 是在没有系统代码页可用时的固定单字节字符集。
//!
//! 往返转换在遗留多字节编码下不保证逐字节恒等，但 encode→decode
//! 必须复现内核会报告的名称。编码保留大小写；内核存储时自行转为大写。

use crate::error::{Error, ErrorKind, Result};

/// 名称编码字符集
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// 固定单字节字符集（ISO-8859-1），任何主机上都可用
    Latin1,

    /// 主机的活动系统代码页
    ///
    /// 非 Windows 主机没有"活动代码页"的概念，此时退化为 Latin-1。
    #[default]
    SystemAnsi,
}

impl Charset {
    /// 主机默认的字符集
    pub fn system() -> Self {
        Charset::SystemAnsi
    }

    /// 把可移植文本编码为内核存储形式
    ///
    /// 当某个字符在目标字符集中没有表示时返回 [`ErrorKind::Encoding`]。
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Latin1 => latin1_encode(text),
            #[cfg(windows)]
            Charset::SystemAnsi => mbcs::ansi_from_utf8(text),
            #[cfg(not(windows))]
            Charset::SystemAnsi => latin1_encode(text),
        }
    }

    /// 把内核存储形式解码回可移植文本
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Latin1 => Ok(latin1_decode(bytes)),
            #[cfg(windows)]
            Charset::SystemAnsi => mbcs::ansi_to_utf8(bytes),
            #[cfg(not(windows))]
            Charset::SystemAnsi => Ok(latin1_decode(bytes)),
        }
    }
}

fn latin1_encode(text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());

    for ch in text.chars() {
        let cp = ch as u32;
        if cp > 0xff {
            return Err(Error::new(
                ErrorKind::Encoding,
                "character not representable in single-byte charset",
            ));
        }
        out.push(cp as u8);
    }

    Ok(out)
}

fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(windows)]
mod mbcs {
    //! 活动代码页转换（`CP_ACP`）
    //!
    //! 与原生 API 对名称的处理保持一致：不允许"最接近字符"替换，
    //! 无法表示的字符直接报错而不是静默损坏名称。

    use core::ptr;

    use winapi::um::stringapiset::{MultiByteToWideChar, WideCharToMultiByte};
    use winapi::um::winnls::{CP_ACP, MB_ERR_INVALID_CHARS, WC_NO_BEST_FIT_CHARS};

    use crate::error::{Error, ErrorKind, Result};

    pub fn ansi_from_utf8(text: &str) -> Result<Vec<u8>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let wide: Vec<u16> = text.encode_utf16().collect();
        let wide_len = wide.len() as i32;

        let needed = unsafe {
            WideCharToMultiByte(
                CP_ACP,
                WC_NO_BEST_FIT_CHARS,
                wide.as_ptr(),
                wide_len,
                ptr::null_mut(),
                0,
                ptr::null(),
                ptr::null_mut(),
            )
        };
        if needed <= 0 {
            return Err(Error::new(
                ErrorKind::Encoding,
                "cannot encode name in active code page",
            ));
        }

        let mut buf = vec![0u8; needed as usize];
        let mut used_default = 0i32;
        let written = unsafe {
            WideCharToMultiByte(
                CP_ACP,
                WC_NO_BEST_FIT_CHARS,
                wide.as_ptr(),
                wide_len,
                buf.as_mut_ptr().cast(),
                needed,
                ptr::null(),
                &mut used_default,
            )
        };
        if written <= 0 || used_default != 0 {
            return Err(Error::new(
                ErrorKind::Encoding,
                "character not representable in active code page",
            ));
        }

        buf.truncate(written as usize);
        Ok(buf)
    }

    pub fn ansi_to_utf8(bytes: &[u8]) -> Result<String> {
        if bytes.is_empty() {
            return Ok(String::new());
        }

        let len = bytes.len() as i32;
        let needed = unsafe {
            MultiByteToWideChar(
                CP_ACP,
                MB_ERR_INVALID_CHARS,
                bytes.as_ptr().cast(),
                len,
                ptr::null_mut(),
                0,
            )
        };
        if needed <= 0 {
            return Err(Error::new(
                ErrorKind::Encoding,
                "cannot decode name from active code page",
            ));
        }

        let mut wide = vec![0u16; needed as usize];
        let written = unsafe {
            MultiByteToWideChar(
                CP_ACP,
                MB_ERR_INVALID_CHARS,
                bytes.as_ptr().cast(),
                len,
                wide.as_mut_ptr(),
                needed,
            )
        };
        if written <= 0 {
            return Err(Error::new(
                ErrorKind::Encoding,
                "cannot decode name from active code page",
            ));
        }

        wide.truncate(written as usize);
        String::from_utf16(&wide)
            .map_err(|_| Error::new(ErrorKind::Encoding, "invalid UTF-16 from code page"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_roundtrip() {
        let charset = Charset::Latin1;
        let encoded = charset.encode("Name\u{bc}").unwrap();
        assert_eq!(encoded, [b'N', b'a', b'm', b'e', 0xbc]);
        assert_eq!(charset.decode(&encoded).unwrap(), "Name\u{bc}");
    }

    #[test]
    fn test_latin1_rejects_wide_char() {
        let err = Charset::Latin1.encode("片").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_empty_text() {
        assert!(Charset::Latin1.encode("").unwrap().is_empty());
        assert!(Charset::Latin1.decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_case_preserved_on_encode() {
        // 大写转换由内核在存储时完成，转码自身保留大小写
        let encoded = Charset::Latin1.encode("MixedCase").unwrap();
        assert_eq!(Charset::Latin1.decode(&encoded).unwrap(), "MixedCase");
    }
}
