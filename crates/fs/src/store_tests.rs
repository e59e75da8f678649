use super::*;
use std::fs;
use tempfile::tempdir;

const TEST_ATTR: &str = "user.DOSATTRIB";

/// Helper to check if xattrs are supported on the current filesystem.
fn xattrs_supported(path: &Path) -> bool {
    let probe = OsStr::new("user.dosattrib_probe");
    match xattr::set(path, probe, b"probe") {
        Ok(()) => {
            let _ = xattr::remove(path, probe);
            true
        }
        Err(_) => false,
    }
}

#[test]
fn memory_store_round_trips_and_reports_absence() {
    let store = MemoryStore::new();
    let path = Path::new("/virtual/file");

    assert_eq!(store.get(path).expect("get"), None);

    store.set(path, &[1, 2, 3]).expect("set");
    assert_eq!(store.get(path).expect("get"), Some(vec![1, 2, 3]));

    store.set(path, &[9]).expect("overwrite");
    assert_eq!(store.value(path), Some(vec![9]));
}

#[test]
fn memory_store_denied_operations_fail_with_context() {
    let store = MemoryStore::new();
    let path = PathBuf::from("/virtual/locked");
    store.insert(path.clone(), vec![0u8; 4]);
    store.deny_writes(path.clone());

    let err = store.set(&path, &[1]).expect_err("write denied");
    assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(err.context(), "write extended attribute");
    assert_eq!(err.path(), path.as_path());
    assert_eq!(store.value(&path), Some(vec![0u8; 4]), "value must be unchanged");

    store.deny_reads(path.clone());
    let err = store.get(&path).expect_err("read denied");
    assert!(err.to_string().contains("read extended attribute"));
    assert!(err.to_string().contains("/virtual/locked"));
}

#[test]
fn xattr_store_reads_none_for_missing_attribute() {
    let dir = tempdir().expect("create temp dir");
    let file = dir.path().join("plain.txt");
    fs::write(&file, "content").expect("write file");

    if !xattrs_supported(&file) {
        eprintln!("xattrs not supported, skipping test");
        return;
    }

    let store = XattrStore::new(TEST_ATTR);
    assert_eq!(store.get(&file).expect("get"), None);
}

#[test]
fn xattr_store_write_then_read() {
    let dir = tempdir().expect("create temp dir");
    let file = dir.path().join("attr.txt");
    fs::write(&file, "content").expect("write file");

    if !xattrs_supported(&file) {
        eprintln!("xattrs not supported, skipping test");
        return;
    }

    let store = XattrStore::new(TEST_ATTR);
    assert_eq!(store.name(), OsStr::new(TEST_ATTR));

    let blob = [0u8, 0, 5, 0, 5, 0, 0, 0, 1, 0, 0, 0, 0x20, 0, 0, 0];
    store.set(&file, &blob).expect("set");
    assert_eq!(store.get(&file).expect("get"), Some(blob.to_vec()));
}

#[test]
fn xattr_store_missing_file_is_an_error() {
    if !XattrStore::platform_supported() {
        return;
    }

    let dir = tempdir().expect("create temp dir");
    let missing = dir.path().join("missing");

    let store = XattrStore::new(TEST_ATTR);
    let err = store.get(&missing).expect_err("missing file");
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert_eq!(err.path(), missing.as_path());
}
