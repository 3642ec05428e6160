//! 查询工具：从 NTFS 文件读取 EA 并转储/提取。
//!
//! 退出码：0 成功，1 用法错误，2 操作失败。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Queries EA (Extended Attributes) from a file on NTFS.
#[derive(Debug, Parser)]
#[command(name = "query_file_ea")]
struct Args {
    /// Path of the file to query EA from
    #[arg(long = "target-path")]
    target_path: Option<PathBuf>,

    /// Names of EA to query, split by comma; queries all EA when omitted
    #[arg(long = "query-name")]
    query_name: Option<String>,

    /// Dump EA to console (default when no action is given)
    #[arg(long)]
    dump: bool,

    /// Extract each EA value to a file named after the EA
    #[arg(long)]
    extract: bool,

    /// Extract the EA value to stdout (for piping)
    #[arg(long)]
    stdout: bool,

    /// Follow reparse points (symlinks) instead of operating on them
    #[arg(long = "follow-reparse")]
    follow_reparse: bool,

    /// Path of the file to query EA from (positional form)
    #[arg(value_name = "TARGET")]
    target: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            use clap::error::ErrorKind;
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    run(args)
}

#[cfg(windows)]
fn run(args: Args) -> ExitCode {
    use std::io::Write;

    let Some(target) = args.target_path.or(args.target) else {
        eprintln!("missing target path, see --help");
        return ExitCode::from(1);
    };

    let names: Vec<&str> = match args.query_name.as_deref() {
        Some(list) => list.split(',').filter(|n| !n.is_empty()).collect(),
        None => Vec::new(),
    };

    // 未选择任何动作时默认转储
    let dump = args.dump || !args.extract;

    let ea_list = match ntfs_ea_core::query_file_ea(&target, args.follow_reparse, &names) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("error querying EA: {}", err);
            return ExitCode::from(2);
        }
    };

    for ea in &ea_list {
        // 被显式查询但不存在的名称返回空值记录而不是被省略
        if ea.is_empty_value() {
            eprintln!("EA with name \"{}\" does not exist", ea.name);
            continue;
        }

        if dump {
            println!("Flags: {:#x}\nEa Name: {}\nEa Value:", ea.flags.bits(), ea.name);
            print!("{}", hex_dump(&ea.value));
        }

        if args.extract {
            if args.stdout {
                if let Err(err) = std::io::stdout().write_all(&ea.value) {
                    eprintln!("failed to write EA value to stdout: {}", err);
                    return ExitCode::from(2);
                }
            } else if let Err(err) = std::fs::write(&ea.name, &ea.value) {
                eprintln!("failed to write EA value for {} into file: {}", ea.name, err);
            } else {
                println!("extracted EA value into \"{}\"", ea.name);
            }
        }
    }

    ExitCode::SUCCESS
}

#[cfg(not(windows))]
fn run(_args: Args) -> ExitCode {
    eprintln!("query_file_ea requires a host with NT-native file semantics (Windows)");
    ExitCode::from(2)
}

/// 每行 16 字节、带偏移和 ASCII 列的十六进制转储
#[cfg(windows)]
fn hex_dump(data: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for (line, chunk) in data.chunks(16).enumerate() {
        let _ = write!(out, "{:08x}  ", line * 16);
        for i in 0..16 {
            match chunk.get(i) {
                Some(byte) => {
                    let _ = write!(out, "{} ", hex::encode([*byte]));
                }
                None => out.push_str("   "),
            }
            if i == 7 {
                out.push(' ');
            }
        }
        out.push_str(" |");
        for &byte in chunk {
            out.push(if byte.is_ascii_graphic() || byte == b' ' {
                byte as char
            } else {
                '.'
            });
        }
        out.push_str("|\n");
    }
    out
}
