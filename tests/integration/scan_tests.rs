use dupemgr::duplicates::{
    scan_for_duplicates, CancelCheckpoints, DuplicateKey, DuplicateScanner, FinderConfig,
    FinderError,
};
use dupemgr::progress::{Phase, ProgressCallback, ProgressEvent};
use dupemgr::scanner::{Hasher, WalkerConfig};
use dupemgr::signal::CancellationToken;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn write(root: &Path, rel: &str, content: &[u8]) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

fn txt_only() -> FinderConfig {
    FinderConfig::default().with_walker_config(WalkerConfig::new([".txt"], false))
}

#[derive(Default)]
struct Messages(Mutex<Vec<String>>);

impl ProgressCallback for Messages {
    fn on_progress(&self, event: &ProgressEvent) {
        if event.phase == Phase::Hashing {
            self.0.lock().unwrap().push(event.to_string());
        }
    }
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.dirs_visited, 1);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a.txt", b"content a");
    write(dir.path(), "b.txt", b"content b");
    write(dir.path(), "sub/c.txt", b"content c");

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.hashed_files, 0);
}

#[test]
fn test_hello_world_scenario() {
    let dir = tempdir().unwrap();
    let a = write(dir.path(), "a/x.txt", b"hello");
    let b = write(dir.path(), "b/x.txt", b"hello");
    let c = write(dir.path(), "c/x.txt", b"world");

    let messages = Arc::new(Messages::default());
    let config = txt_only().with_progress_callback(messages.clone());
    let (result, _) = DuplicateScanner::new(config).scan(dir.path()).unwrap();

    let key = DuplicateKey::new(Hasher::new().hash_bytes(b"hello"), "x.txt", 5);
    assert_eq!(result.len(), 1);
    assert_eq!(result.get(&key).unwrap().paths(), vec![a, b]);
    assert!(result.iter().all(|g| !g.paths().contains(&c)));
    assert_eq!(*messages.0.lock().unwrap(), vec!["Hashed 1/1 groups"]);
}

#[test]
fn test_same_content_different_names_not_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/one.txt", b"identical");
    write(dir.path(), "b/two.txt", b"identical");

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.candidate_groups, 0);
}

#[test]
fn test_identical_files_anywhere_form_one_group() {
    let dir = tempdir().unwrap();
    let paths = vec![
        write(dir.path(), "x.bin", b"payload"),
        write(dir.path(), "deep/er/still/x.bin", b"payload"),
        write(dir.path(), "other/x.bin", b"payload"),
    ];

    let (result, _) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    let mut found = result.groups()[0].paths();
    found.sort();
    let mut expected = paths;
    expected.sort();
    assert_eq!(found, expected);
}

#[test]
fn test_large_files_differing_after_first_chunk() {
    let dir = tempdir().unwrap();
    let mut content = vec![7u8; 20_000];
    write(dir.path(), "a/big.dat", &content);
    content[19_999] = 8;
    write(dir.path(), "b/big.dat", &content);

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.candidate_groups, 1);
    assert_eq!(summary.hashed_files, 2);
}

#[test]
fn test_empty_files_are_grouped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/empty.log", b"");
    write(dir.path(), "b/empty.log", b"");

    let (result, _) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].size(), 0);
}

#[test]
fn test_cancel_before_scan_hashes_nothing() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"hello");
    write(dir.path(), "b/x.txt", b"hello");

    let token = CancellationToken::new();
    token.cancel();
    let messages = Arc::new(Messages::default());
    let config = txt_only()
        .with_cancellation(token)
        .with_progress_callback(messages.clone());

    let (result, summary) = DuplicateScanner::new(config).scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert!(summary.cancelled);
    assert_eq!(summary.dirs_visited, 0);
    assert_eq!(summary.hashed_files, 0);
    assert!(messages.0.lock().unwrap().is_empty());
}

#[test]
fn test_cancel_during_hashing_checkpoint() {
    struct CancelOnFirstGroup(CancellationToken);

    impl ProgressCallback for CancelOnFirstGroup {
        fn on_progress(&self, event: &ProgressEvent) {
            if event.phase == Phase::Hashing {
                self.0.cancel();
            }
        }
    }

    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"1");
    write(dir.path(), "b/x.txt", b"1");
    write(dir.path(), "a/y.txt", b"2");
    write(dir.path(), "b/y.txt", b"2");

    let token = CancellationToken::new();
    let run = |checkpoints| {
        token.reset();
        let config = FinderConfig::default()
            .with_cancellation(token.clone())
            .with_checkpoints(checkpoints)
            .with_progress_callback(Arc::new(CancelOnFirstGroup(token.clone())));
        DuplicateScanner::new(config).scan(dir.path()).unwrap()
    };

    let (result, summary) = run(CancelCheckpoints::Traversal);
    assert_eq!(result.len(), 2);
    assert!(!summary.cancelled);

    let (result, summary) = run(CancelCheckpoints::TraversalAndHashing);
    assert!(result.is_empty());
    assert!(summary.cancelled);
    assert_eq!(summary.hashed_files, 2);
}

#[test]
fn test_extension_filter_and_include_others() {
    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"t");
    write(dir.path(), "b/x.txt", b"t");
    write(dir.path(), "a/y.png", b"p");
    write(dir.path(), "b/y.png", b"p");

    let token = CancellationToken::new();

    let only_txt = scan_for_duplicates(dir.path(), &[".txt"], false, None, &token).unwrap();
    assert_eq!(only_txt.len(), 1);
    assert_eq!(only_txt.groups()[0].name(), "x.txt");

    let everything = scan_for_duplicates(dir.path(), &[".txt"], true, None, &token).unwrap();
    assert_eq!(everything.len(), 2);

    let unrestricted = scan_for_duplicates::<&str>(dir.path(), &[], false, None, &token).unwrap();
    assert_eq!(unrestricted.len(), 2);
}

#[test]
fn test_excluded_and_hidden_directories_skipped() {
    let dir = tempdir().unwrap();
    write(dir.path(), "keep/x.txt", b"same");
    write(dir.path(), "Lib/x.txt", b"same");
    write(dir.path(), "$RECYCLE.BIN/x.txt", b"same");
    write(dir.path(), ".git/x.txt", b"same");

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert!(result.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_root_errors() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "f.txt", b"x");
    let scanner = DuplicateScanner::with_defaults();

    assert!(matches!(
        scanner.scan(&dir.path().join("missing")),
        Err(FinderError::PathNotFound(_))
    ));
    assert!(matches!(scanner.scan(&file), Err(FinderError::NotADirectory(_))));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_excluded_not_fatal() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    write(dir.path(), "a/x.txt", b"same");
    write(dir.path(), "b/x.txt", b"same");
    let locked = write(dir.path(), "c/x.txt", b"same");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits, so there is nothing to assert there
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let (result, summary) = DuplicateScanner::with_defaults().scan(dir.path()).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result.groups()[0].len(), 2);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(summary.scan_errors.len(), 1);
}
