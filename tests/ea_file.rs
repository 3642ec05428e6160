//! 端到端测试：在真实 NTFS 文件上写入并查询 EA。
//!
//! 这些测试需要 NT 原生文件语义，只在 Windows 上编译运行；
//! 临时目录必须位于 NTFS 卷上（Windows 的默认临时目录满足）。

#![cfg(windows)]

use ntfs_ea_core::{query_file_ea, write_ea_from_file, write_file_ea, EaEntry, EaFlags, ErrorKind};
use std::fs;
use std::path::PathBuf;

fn temp_file(dir: &tempfile::TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"test content").expect("failed to create test file");
    path
}

const NO_NAMES: [&str; 0] = [];

#[test]
fn write_then_query_all_preserves_order_and_flags() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "roundtrip.txt");

    // 场景 A：两条条目（含空值），按写入顺序返回，flags 为 0
    let entries = vec![
        EaEntry::new("ALPHA", vec![0x01, 0x02]),
        EaEntry::new("BETA", Vec::new()),
    ];
    write_file_ea(&file, false, &entries).unwrap();

    let queried = query_file_ea(&file, false, &NO_NAMES).unwrap();

    // 空值写入删除不存在的 BETA，属于无操作，因此只有 ALPHA 留在文件上
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0].name, "ALPHA");
    assert_eq!(queried[0].value, vec![0x01, 0x02]);
    assert_eq!(queried[0].flags, EaFlags::empty());
}

#[test]
fn multiple_entries_come_back_in_write_order() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "order.txt");

    let entries = vec![
        EaEntry::new("FIRST", b"one".to_vec()),
        EaEntry::new("SECOND", b"two".to_vec()),
        EaEntry::with_flags(EaFlags::NEED_EA, "THIRD", b"three".to_vec()),
    ];
    write_file_ea(&file, false, &entries).unwrap();

    let queried = query_file_ea(&file, false, &NO_NAMES).unwrap();
    assert_eq!(queried.len(), 3);
    for (got, want) in queried.iter().zip(&entries) {
        // 内核存储时将名称转为大写；这里的名称已是大写
        assert_eq!(got.name, want.name);
        assert_eq!(got.value, want.value);
        assert_eq!(got.flags, want.flags);
    }
}

#[test]
fn overwrite_with_empty_value_removes_entry() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "remove.txt");

    // 场景 B：写入，再用空值覆盖，然后查询；绝不报错
    write_file_ea(&file, false, &[EaEntry::new("DOOMED", b"payload".to_vec())]).unwrap();
    write_file_ea(&file, false, &[EaEntry::new("DOOMED", Vec::new())]).unwrap();

    let queried = query_file_ea(&file, false, &["DOOMED"]).unwrap();
    // 删除后按名称查询得到"不存在"形式：空值记录或空结果
    assert!(queried.iter().all(|ea| ea.is_empty_value()));
}

#[test]
fn query_file_without_ea_yields_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "bare.txt");

    // 场景 C：没有 EA 的文件查询成功并返回空列表，而不是错误
    let queried = query_file_ea(&file, false, &NO_NAMES).unwrap();
    assert!(queried.is_empty());
}

#[test]
fn query_missing_name_returns_empty_value_record() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "missing.txt");

    write_file_ea(&file, false, &[EaEntry::new("PRESENT", b"here".to_vec())]).unwrap();

    // 内核对被显式查询但不存在的名称返回一条空值记录
    let queried = query_file_ea(&file, false, &["ABSENT"]).unwrap();
    assert_eq!(queried.len(), 1);
    assert!(queried[0].is_empty_value());
}

#[test]
fn query_by_name_filters_to_requested_entries() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "filter.txt");

    write_file_ea(
        &file,
        false,
        &[
            EaEntry::new("ONE", b"1".to_vec()),
            EaEntry::new("TWO", b"2".to_vec()),
        ],
    )
    .unwrap();

    let queried = query_file_ea(&file, false, &["TWO"]).unwrap();
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0].name, "TWO");
    assert_eq!(queried[0].value, b"2".to_vec());
}

#[test]
fn write_ea_from_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let target = temp_file(&dir, "target.txt");
    let source = dir.path().join("source.txt");
    fs::write(&source, b"src content").unwrap();

    write_ea_from_file(&target, false, &source, "FILEEA", EaFlags::empty()).unwrap();

    let queried = query_file_ea(&target, false, &NO_NAMES).unwrap();
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0].name, "FILEEA");
    assert_eq!(queried[0].value, b"src content".to_vec());
}

#[test]
fn empty_entry_list_is_rejected_before_any_native_call() {
    let dir = tempfile::tempdir().unwrap();
    let file = temp_file(&dir, "empty_write.txt");

    let err = write_file_ea(&file, false, &[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NothingToWrite);
}

#[test]
fn missing_target_reports_not_found_without_cleanup_owed() {
    let dir = tempfile::tempdir().unwrap();
    let gone = dir.path().join("does_not_exist.txt");

    let err = query_file_ea(&gone, false, &NO_NAMES).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn directory_target_is_supported() {
    let dir = tempfile::tempdir().unwrap();
    let subdir = dir.path().join("subdir");
    fs::create_dir(&subdir).unwrap();

    write_file_ea(&subdir, false, &[EaEntry::new("DIREA", b"dir".to_vec())]).unwrap();

    let queried = query_file_ea(&subdir, false, &NO_NAMES).unwrap();
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0].name, "DIREA");
}
