//! Integration tests for FileManager mv operations

mod common;

use ::common::prelude::*;

#[tokio::test]
async fn test_mv_file_between_dirs() {
    let (fm, _temp) = common::setup_test_env().await;
    fm.mkdir("src").await.unwrap();
    fm.mkdir("dst").await.unwrap();
    let file = common::upload_text(&fm, "src", "a.txt", "content").await;

    fm.mv("src/a.txt", "dst/a.txt").await.unwrap();

    assert!(!fm.exists("src/a.txt").await.unwrap());
    assert_eq!(fm.stat("dst/a.txt").await.unwrap(), file);
    // storage is flat, so the bytes are where they were
    assert_eq!(fm.download("dst/a.txt").await.unwrap().1, "content");
}

#[tokio::test]
async fn test_mv_directory_keeps_subtree() {
    let (fm, _temp) = common::setup_test_env().await;
    fm.mkdir("old/inner").await.unwrap();
    common::upload_text(&fm, "old/inner", "x.txt", "x").await;
    let before = fm.get("old").await.unwrap();

    fm.mv("old", "new").await.unwrap();

    assert_eq!(fm.get("new").await.unwrap(), before);
    assert!(fm.exists("new/inner/x.txt").await.unwrap());
    assert!(!fm.exists("old").await.unwrap());
}

#[tokio::test]
async fn test_mv_onto_existing_leaves_manifest_unchanged() {
    let (fm, temp) = common::setup_test_env().await;
    common::upload_text(&fm, "root", "a.txt", "a").await;
    common::upload_text(&fm, "root", "b.txt", "b").await;
    let manifest = temp.path().join("manifest.json");
    let before = std::fs::read(&manifest).unwrap();

    let result = fm.mv("a.txt", "b.txt").await;
    assert!(matches!(
        result,
        Err(FileManagerError::Manifest(ManifestError::InvalidDestination { .. }))
    ));
    assert_eq!(std::fs::read(&manifest).unwrap(), before);
}

#[tokio::test]
async fn test_mv_invalid_sources() {
    let (fm, _temp) = common::setup_test_env().await;
    fm.mkdir("a").await.unwrap();

    assert!(matches!(
        fm.mv("missing", "b").await,
        Err(FileManagerError::Manifest(ManifestError::InvalidSource(_)))
    ));
    assert!(matches!(
        fm.mv("root", "b").await,
        Err(FileManagerError::Manifest(ManifestError::InvalidSource(_)))
    ));
    assert!(matches!(
        fm.mv("a", "a/b").await,
        Err(FileManagerError::Manifest(ManifestError::InvalidDestination { .. }))
    ));
}

#[tokio::test]
async fn test_mv_cannot_shadow_root() {
    let (fm, temp) = common::setup_test_env().await;
    fm.mkdir("a").await.unwrap();
    let before = std::fs::read(temp.path().join("manifest.json")).unwrap();

    for destination in ["root/root", "/root/root/", "root"] {
        assert!(
            fm.mv("a", destination).await.is_err(),
            "moving to {destination:?} should fail"
        );
    }

    assert_eq!(
        std::fs::read(temp.path().join("manifest.json")).unwrap(),
        before
    );
    let names: Vec<_> = fm.ls("root").await.unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["a"]);
}
