//! 写入工具：用源文件（或 stdin）的内容作为值向 NTFS 文件写入 EA。
//!
//! 源内容为空或使用 --remove-ea 时，删除同名 EA（若存在）。
//! 退出码：0 成功，1 用法错误，2 操作失败。

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Writes EA (Extended Attributes) into a file on NTFS using the content
/// of a source file; an empty source removes the EA with that name.
#[derive(Debug, Parser)]
#[command(name = "write_file_ea")]
struct Args {
    /// Path of the target file to write EA into
    #[arg(long = "target-path")]
    target_path: Option<PathBuf>,

    /// Path of the source file whose bytes become the EA value
    #[arg(long = "source-path")]
    source_path: Option<PathBuf>,

    /// Name of the EA
    #[arg(long = "ea-name")]
    ea_name: Option<String>,

    /// Mark the file as needing EA-aware interpretation (FILE_NEED_EA)
    #[arg(long = "need-ea")]
    need_ea: bool,

    /// Remove the EA with the given name
    #[arg(long = "remove-ea")]
    remove_ea: bool,

    /// Use stdin as the content for the EA value
    #[arg(long)]
    stdin: bool,

    /// Follow reparse points (symlinks) instead of operating on them
    #[arg(long = "follow-reparse")]
    follow_reparse: bool,

    /// Positional form: [target path] [source path] [EA name]
    /// (with --remove-ea or --stdin: [target path] [EA name])
    #[arg(value_name = "ARGS")]
    rest: Vec<String>,
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
    use ntfs_ea_core::{EaEntry, EaFlags};
    use std::io::Read;

    // 位置参数补全未通过选项给出的值；--remove-ea/--stdin 时不需要源文件
    let mut rest = args.rest.iter();
    let target = args
        .target_path
        .or_else(|| rest.next().map(PathBuf::from));
    let source = if args.remove_ea || args.stdin {
        args.source_path
    } else {
        args.source_path.or_else(|| rest.next().map(PathBuf::from))
    };
    let ea_name = args.ea_name.or_else(|| rest.next().cloned());

    let (Some(target), Some(ea_name)) = (target, ea_name) else {
        eprintln!("missing target path or EA name, see --help");
        return ExitCode::from(1);
    };

    let mut flags = EaFlags::empty();
    if args.need_ea {
        flags |= EaFlags::NEED_EA;
    }

    if args.remove_ea {
        let removal = EaEntry::new(ea_name.clone(), Vec::new());
        return match ntfs_ea_core::write_file_ea(&target, args.follow_reparse, &[removal]) {
            Ok(()) => {
                println!("removed EA with name \"{}\" from file", ea_name);
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("failed to remove EA \"{}\" from file: {}", ea_name, err);
                ExitCode::from(2)
            }
        };
    }

    if args.stdin {
        let mut value = Vec::new();
        let limit = ntfs_ea_core::consts::EA_VALUE_MAX_LEN as u64 + 1;
        if let Err(err) = std::io::stdin().lock().take(limit).read_to_end(&mut value) {
            eprintln!("failed to read from stdin: {}", err);
            return ExitCode::from(2);
        }
        if value.len() > ntfs_ea_core::consts::EA_VALUE_MAX_LEN {
            eprintln!("stdin content exceeds the 65535-byte EA value limit");
            return ExitCode::from(2);
        }

        let entry = EaEntry::with_flags(flags, ea_name.clone(), value);
        return match ntfs_ea_core::write_file_ea(&target, args.follow_reparse, &[entry]) {
            Ok(()) => {
                println!(
                    "written EA into file \"{}\" from stdin with EA name \"{}\"",
                    target.display(),
                    ea_name
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("failed to write EA into file: {}", err);
                ExitCode::from(2)
            }
        };
    }

    let Some(source) = source else {
        eprintln!("missing source path, see --help");
        return ExitCode::from(1);
    };

    match ntfs_ea_core::write_ea_from_file(&target, args.follow_reparse, &source, &ea_name, flags)
    {
        Ok(()) => {
            println!(
                "written EA into file \"{}\" using \"{}\" with EA name \"{}\"",
                target.display(),
                source.display(),
                ea_name
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("failed to write EA into file: {}", err);
            ExitCode::from(2)
        }
    }
}

#[cfg(not(windows))]
fn run(_args: Args) -> ExitCode {
    eprintln!("write_file_ea requires a host with NT-native file semantics (Windows)");
    ExitCode::from(2)
}
