//! Integration tests for filesystem operations over a mount tree.
//!
//! Layout used by most tests:
//!
//! ```text
//! /                 union
//! ├── live/         blob mount on D1
//! │   ├── a.txt     F1
//! │   ├── sub/      D2
//! │   └── empty/    D4
//! └── photos/       query mount on tag "photos", grouped by tag
//! ```

use std::sync::Arc;

use blobmount_model::{BlobMeta, BlobType};
use blobmount_vfs::{
    BlobFilesystem, BlobStore, ByteRange, DirectoryEntry, Entry, FileEntry, FilesystemConfig,
    MemoryBlobStore, MountOptions, VfsError,
};
use serde_json::json;
use tempfile::TempDir;

fn seeded_store() -> Arc<MemoryBlobStore> {
    let store: MemoryBlobStore = MemoryBlobStore::new();
    store.insert("D1", BlobMeta::directory("live"), Vec::new());
    store.insert(
        "F1",
        BlobMeta::file("a.txt", 11).with_parent("D1"),
        b"hello world".to_vec(),
    );
    store.insert("D2", BlobMeta::directory("sub").with_parent("D1"), Vec::new());
    store.insert(
        "F2",
        BlobMeta::file("b.txt", 2).with_parent("D2").with_tag("photos"),
        b"hi".to_vec(),
    );
    store.insert("D4", BlobMeta::directory("empty").with_parent("D1"), Vec::new());
    Arc::new(store)
}

fn mounted(store: &Arc<MemoryBlobStore>) -> BlobFilesystem {
    let config: FilesystemConfig = FilesystemConfig::from_json(
        &json!({
            "profile": "test",
            "mount_point": "/mnt/blobs",
            "mount": {
                "live": {"blob_id": "D1"},
                "photos": {"expression": {"tag": "photos"}, "group_by_tags": true}
            }
        })
        .to_string(),
    )
    .unwrap();
    let store: Arc<dyn BlobStore> = store.clone();
    BlobFilesystem::from_config(&config, store, MountOptions::default()).unwrap()
}

#[tokio::test]
async fn test_list_and_stat() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    let top: Vec<String> = fs
        .list("/")
        .await
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(top, vec!["live", "photos"]);

    let file: Entry = fs.stat("/live/a.txt").await.unwrap();
    assert!(matches!(file, Entry::File(_)));
    assert_eq!(file.size(), 11);
    assert_eq!(file.path(), "live/a.txt");

    let dir: Entry = fs.stat("live/sub/").await.unwrap();
    assert!(matches!(dir, Entry::Directory(_)));
    assert_eq!(dir.id(), "D2");

    let vdir: Entry = fs.stat("photos/Tags").await.unwrap();
    assert!(matches!(vdir, Entry::Virtual(_)));

    assert!(fs.stat("live/nope").await.unwrap_err().is_not_found());
    assert!(fs.list("nope").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_read_ranges() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    assert_eq!(fs.read("live/a.txt", ByteRange::full()).await.unwrap(), b"hello world");
    assert_eq!(
        fs.read("live/a.txt", ByteRange::inclusive(0, 4)).await.unwrap(),
        b"hello"
    );
    assert_eq!(
        fs.read("photos/Tags/photos/b.txt", ByteRange::from_offset(1)).await.unwrap(),
        b"i"
    );

    assert!(matches!(
        fs.read("live/sub", ByteRange::full()).await,
        Err(VfsError::TypeMismatch { expected: "file", .. })
    ));
    assert!(fs
        .read("live/missing.txt", ByteRange::full())
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_put_creates_then_updates() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    let created: FileEntry = fs.put("live/sub/new.txt", b"first").await.unwrap();
    let meta: BlobMeta = store.meta(created.id()).unwrap();
    assert_eq!(meta.name, "new.txt");
    assert_eq!(meta.blob_type, BlobType::File);
    assert_eq!(meta.size, 5);
    assert!(meta.parents.contains("D2"));

    let updated: FileEntry = fs.put("live/sub/new.txt", b"second!").await.unwrap();
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.size(), 7);
    assert_eq!(store.content(created.id()), Some(b"second!".to_vec()));
    assert_eq!(
        fs.read("live/sub/new.txt", ByteRange::full()).await.unwrap(),
        b"second!"
    );
}

#[tokio::test]
async fn test_put_needs_a_blob_parent() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);
    let before: usize = store.len();

    assert!(matches!(
        fs.put("top.txt", b"x").await,
        Err(VfsError::PermissionDenied { .. })
    ));
    assert!(matches!(
        fs.put("photos/Tags/x.txt", b"x").await,
        Err(VfsError::PermissionDenied { .. })
    ));
    assert!(matches!(
        fs.put("live/nope/x.txt", b"x").await,
        Err(VfsError::PermissionDenied { .. })
    ));
    assert!(matches!(
        fs.put("live/sub", b"x").await,
        Err(VfsError::TypeMismatch { expected: "file", .. })
    ));
    assert_eq!(store.len(), before);
}

#[tokio::test]
async fn test_mkdir() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    let dir: DirectoryEntry = fs.mkdir("live/sub/fresh").await.unwrap();
    let meta: BlobMeta = store.meta(dir.id()).unwrap();
    assert!(meta.is_directory());
    assert_eq!(meta.name, "fresh");
    assert!(meta.parents.contains("D2"));

    let listed: Vec<String> = fs
        .list("live/sub")
        .await
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert!(listed.contains(&"fresh".to_string()));

    assert!(matches!(
        fs.mkdir("live/sub").await,
        Err(VfsError::AlreadyExists { .. })
    ));
    assert!(matches!(
        fs.mkdir("live/a.txt").await,
        Err(VfsError::TypeMismatch { expected: "directory", .. })
    ));
    assert!(matches!(
        fs.mkdir("elsewhere").await,
        Err(VfsError::PermissionDenied { .. })
    ));
}

#[tokio::test]
async fn test_rmdir() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    assert!(matches!(
        fs.rmdir("live/sub").await,
        Err(VfsError::DirectoryNotEmpty { .. })
    ));
    assert!(store.meta("D2").is_some());

    fs.rmdir("live/empty").await.unwrap();
    assert!(store.meta("D4").is_none());

    assert!(fs.rmdir("live/ghost").await.unwrap_err().is_not_found());
    assert!(fs.rmdir("photos").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_remove() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    fs.remove("live/a.txt").await.unwrap();
    assert!(store.meta("F1").is_none());

    assert!(fs.remove("live/a.txt").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_rename_moves_between_directories() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    store.insert(
        "F9",
        BlobMeta::file("shared.txt", 1)
            .with_parent("D1")
            .with_parent("ELSEWHERE"),
        b"s".to_vec(),
    );
    let fs: BlobFilesystem = mounted(&store);

    let moved: FileEntry = fs.rename("live/shared.txt", "live/sub/renamed.txt").await.unwrap();

    assert_eq!(moved.id(), "F9");
    assert_eq!(moved.path(), "live/sub/renamed.txt");
    let meta: BlobMeta = store.meta("F9").unwrap();
    assert_eq!(meta.name, "renamed.txt");
    assert!(meta.parents.contains("D2"));
    assert!(meta.parents.contains("ELSEWHERE"));
    assert!(!meta.parents.contains("D1"));
}

#[tokio::test]
async fn test_rename_replaces_existing_destination() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    fs.rename("live/a.txt", "live/sub/b.txt").await.unwrap();

    assert!(store.meta("F2").is_none());
    assert_eq!(
        fs.read("live/sub/b.txt", ByteRange::full()).await.unwrap(),
        b"hello world"
    );
}

#[tokio::test]
async fn test_rename_preconditions() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem = mounted(&store);

    let cases: Vec<(&str, &str)> = vec![
        ("live/missing.txt", "live/x.txt"),
        ("live/sub", "live/other"),
        ("live/a.txt", "nowhere/a.txt"),
        ("photos/Tags/photos/b.txt", "live/b.txt"),
    ];
    for (src, dst) in cases {
        assert!(
            matches!(fs.rename(src, dst).await, Err(VfsError::CannotMove { .. })),
            "{} -> {}",
            src,
            dst
        );
    }
    assert_eq!(store.meta("F1").unwrap().name, "a.txt");
}

#[tokio::test]
async fn test_failed_rename_keeps_destination() {
    let store: Arc<MemoryBlobStore> = seeded_store();
    store.insert(
        "R1",
        BlobMeta::file("report.pdf", 3).with_tag("2023"),
        b"pdf".to_vec(),
    );
    let config: FilesystemConfig = FilesystemConfig::from_json(
        &json!({
            "mount_point": "/mnt/blobs",
            "mount": {
                "live": {"blob_id": "D1"},
                "archive": {"expression": {"tag": "2023"}}
            }
        })
        .to_string(),
    )
    .unwrap();
    let dyn_store: Arc<dyn BlobStore> = store.clone();
    let fs: BlobFilesystem =
        BlobFilesystem::from_config(&config, dyn_store, MountOptions::default()).unwrap();

    // The archive root is virtual, so the move has nowhere to attach the file.
    assert!(matches!(
        fs.rename("live/a.txt", "archive/report.pdf").await,
        Err(VfsError::CannotMove { .. })
    ));

    assert_eq!(store.content("R1"), Some(b"pdf".to_vec()));
    assert_eq!(store.meta("F1").unwrap().name, "a.txt");
}

#[tokio::test]
async fn test_from_config_file() {
    let dir: TempDir = TempDir::new().unwrap();
    let path: std::path::PathBuf = dir.path().join("blobmount.json");
    std::fs::write(
        &path,
        json!({
            "profile": "default",
            "mount_point": "/mnt/blobs",
            "mount": {"blob_id": "D1"}
        })
        .to_string(),
    )
    .unwrap();

    let config: FilesystemConfig = FilesystemConfig::load(&path).unwrap();
    let store: Arc<MemoryBlobStore> = seeded_store();
    let fs: BlobFilesystem =
        BlobFilesystem::from_config(&config, store, MountOptions::default()).unwrap();

    let names: Vec<String> = fs
        .list("")
        .await
        .unwrap()
        .iter()
        .map(|e| e.name().to_string())
        .collect();
    assert_eq!(names, vec!["a.txt", "sub", "empty"]);
}

#[tokio::test]
async fn test_from_config_rejects_bad_tree() {
    let config: FilesystemConfig = FilesystemConfig::from_json(
        r#"{"profile": "default", "mount_point": "/mnt", "mount": {"live": 7}}"#,
    )
    .unwrap();
    let store: Arc<MemoryBlobStore> = seeded_store();

    let result: Result<BlobFilesystem, VfsError> =
        BlobFilesystem::from_config(&config, store, MountOptions::default());
    assert!(matches!(result, Err(VfsError::Configuration { .. })));
}
