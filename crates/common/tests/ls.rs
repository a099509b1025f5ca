//! Integration tests for FileManager listing and lookups

mod common;

use ::common::manifest::EntryKind;
use ::common::prelude::*;

#[tokio::test]
async fn test_ls_keeps_insertion_order() {
    let (fm, _temp) = common::setup_test_env().await;

    fm.mkdir("zeta").await.unwrap();
    common::upload_text(&fm, "root", "alpha.txt", "a").await;
    fm.mkdir("mid").await.unwrap();

    let names: Vec<_> = fm
        .ls("/")
        .await
        .unwrap()
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(names, ["zeta", "alpha.txt", "mid"]);
}

#[tokio::test]
async fn test_ls_entry_shape() {
    let (fm, _temp) = common::setup_test_env().await;

    fm.mkdir("sub").await.unwrap();
    common::upload_text(&fm, "root", "notes.txt", "12345").await;

    let entries = fm.ls("root").await.unwrap();
    assert_eq!(entries[0].kind, EntryKind::Dir);
    assert_eq!(entries[0].size, None);
    assert_eq!(entries[1].kind, EntryKind::File);
    assert_eq!(entries[1].size, Some(5));
    assert_eq!(entries[1].thumbnail, None);

    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"name": "sub", "type": "dir"},
            {"name": "notes.txt", "type": "file", "size": 5}
        ])
    );
}

#[tokio::test]
async fn test_ls_errors() {
    let (fm, _temp) = common::setup_test_env().await;
    common::upload_text(&fm, "root", "f.txt", "x").await;

    assert!(matches!(
        fm.ls("missing").await,
        Err(FileManagerError::Manifest(ManifestError::NotFound(_)))
    ));
    assert!(matches!(
        fm.ls("f.txt").await,
        Err(FileManagerError::Manifest(ManifestError::NotADirectory(_)))
    ));
}

#[tokio::test]
async fn test_stat_file() {
    let (fm, _temp) = common::setup_test_env().await;
    fm.mkdir("docs").await.unwrap();
    let uploaded = common::upload_text(&fm, "docs", "a.md", "# hi").await;

    let stat = fm.stat("docs/./a.md").await.unwrap();
    assert_eq!(stat, uploaded);
    assert!(fm.exists("root/docs/a.md").await.unwrap());
}
