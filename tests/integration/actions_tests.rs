use dupemgr::actions::{delete_all, move_all};
use dupemgr::duplicates::{plan_disposal, plan_disposal_by, DuplicateScanner};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_scan_then_delete_keeps_one_per_group() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"hello");
    write(dir.path(), "b/x.txt", b"hello");
    write(dir.path(), "c/x.txt", b"hello");
    write(dir.path(), "a/y.txt", b"other");
    write(dir.path(), "b/y.txt", b"other");
    let unique = write(dir.path(), "c/z.txt", b"unique");

    let scanner = DuplicateScanner::with_defaults();
    let (result, _) = scanner.scan(dir.path()).unwrap();
    assert_eq!(result.len(), 2);

    let plan = plan_disposal(&result);
    assert_eq!(plan.len(), 3);

    let outcome = delete_all(&plan);
    assert_eq!(outcome.deleted.len(), 3);
    assert!(outcome.errors.is_empty());
    assert!(unique.exists());

    let (again, summary) = scanner.scan(dir.path()).unwrap();
    assert!(again.is_empty());
    assert_eq!(summary.total_files, 3);
}

#[test]
fn test_oldest_file_is_kept() {
    let dir = tempdir().unwrap();
    let young = write(dir.path(), "a/x.txt", b"hello");
    let old = write(dir.path(), "b/x.txt", b"hello");

    let (result, _) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    let times: HashMap<PathBuf, SystemTime> = [
        (young.clone(), UNIX_EPOCH + Duration::from_secs(200)),
        (old.clone(), UNIX_EPOCH + Duration::from_secs(100)),
    ]
    .into_iter()
    .collect();
    let plan = plan_disposal_by(&result, |p| times.get(p).copied());

    assert_eq!(plan, vec![young]);
}

#[test]
fn test_delete_all_missing_path_neither_deleted_nor_error() {
    let dir = tempdir().unwrap();
    let present = write(dir.path(), "present.txt", b"x");
    let missing = dir.path().join("missing.txt");

    let outcome = delete_all(&[missing.clone(), present.clone()]);

    assert_eq!(outcome.deleted, vec![present.clone()]);
    assert_eq!(outcome.skipped, vec![missing.clone()]);
    assert!(outcome.errors.is_empty());
    assert!(!present.exists());
    assert_eq!(outcome.summary(), "Deleted 1 file(s), 1 already gone");
}

#[test]
fn test_move_all_overwrites_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("dest");
    write(dir.path(), "dest/x.txt", b"old contents");
    let source = write(dir.path(), "src/x.txt", b"new");

    let outcome = move_all(&[source.clone()], &dest);

    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.moved, vec![(source.clone(), dest.join("x.txt"))]);
    assert!(!source.exists());
    assert_eq!(fs::read(dest.join("x.txt")).unwrap(), b"new");
}

#[test]
fn test_scan_then_move_collects_copies() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("data");
    write(&root, "a/x.txt", b"hello");
    write(&root, "b/x.txt", b"hello");
    write(&root, "a/y.txt", b"world");
    write(&root, "b/y.txt", b"world");
    let dest = dir.path().join("dupes/nested");

    let (result, _) = DuplicateScanner::with_defaults().scan(&root).unwrap();
    let outcome = move_all(&plan_disposal(&result), &dest);

    assert_eq!(outcome.moved.len(), 2);
    assert!(outcome.all_succeeded());
    assert!(dest.join("x.txt").is_file());
    assert!(dest.join("y.txt").is_file());

    let (after, _) = DuplicateScanner::with_defaults().scan(&root).unwrap();
    assert!(after.is_empty());
}

#[test]
fn test_move_all_reports_missing_sources() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("dest");
    let present = write(dir.path(), "a/x.txt", b"x");
    let missing = dir.path().join("gone.txt");

    let outcome = move_all(&[missing.clone(), present], &dest);

    assert_eq!(outcome.moved.len(), 1);
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].0, missing);
    assert_eq!(outcome.summary(), "Moved 1 file(s), 1 failed");
}

#[cfg(unix)]
#[test]
fn test_delete_plan_never_removes_symlink_target() {
    let dir = tempdir().unwrap();
    let real = write(dir.path(), "b/x.txt", b"precious");
    fs::create_dir_all(dir.path().join("a")).unwrap();
    let link = dir.path().join("a/x.txt");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    let (result, _) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();
    let plan = plan_disposal(&result);
    let outcome = delete_all(&plan);

    assert!(result.is_empty());
    assert!(plan.is_empty());
    assert!(outcome.deleted.is_empty());
    assert_eq!(fs::read(&real).unwrap(), b"precious");
    assert_eq!(fs::read(&link).unwrap(), b"precious");
}
