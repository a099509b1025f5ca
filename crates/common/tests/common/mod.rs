//! Shared test utilities for file manager integration tests
#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use common::prelude::*;
use tempfile::TempDir;

/// Set up a file manager over a fresh data directory
pub async fn setup_test_env() -> (FileManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let manager = FileManager::open(temp_dir.path()).await.unwrap();
    (manager, temp_dir)
}

/// Set up a file manager backed by the given gateway
pub fn setup_with_gateway(gateway: Arc<dyn AssetGateway>) -> (FileManager, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let manager = FileManager::new(ManifestStore::in_dir(temp_dir.path()), gateway);
    (manager, temp_dir)
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 120, 200, 255]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

pub async fn upload_text(
    manager: &FileManager,
    dir: &str,
    name: &str,
    body: &'static str,
) -> FileNode {
    manager
        .upload(dir, Upload::new(name, body).with_content_type("text/plain"))
        .await
        .unwrap()
}

/// Gateway that stores in memory but fails every removal, counting
///  how many were attempted.
#[derive(Debug)]
pub struct FailingRemovals {
    inner: ObjectAssets,
    pub object_removals: AtomicUsize,
    pub thumbnail_removals: AtomicUsize,
}

impl FailingRemovals {
    pub fn new() -> Self {
        Self {
            inner: ObjectAssets::memory(),
            object_removals: AtomicUsize::new(0),
            thumbnail_removals: AtomicUsize::new(0),
        }
    }

    pub fn object_removals(&self) -> usize {
        self.object_removals.load(Ordering::SeqCst)
    }

    pub fn thumbnail_removals(&self) -> usize {
        self.thumbnail_removals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssetGateway for FailingRemovals {
    async fn write_object(&self, name: &str, bytes: Bytes) -> Result<(), AssetError> {
        self.inner.write_object(name, bytes).await
    }

    async fn read_object(&self, name: &str) -> Result<Bytes, AssetError> {
        self.inner.read_object(name).await
    }

    async fn remove_object(&self, name: &str) -> Result<(), AssetError> {
        self.object_removals.fetch_add(1, Ordering::SeqCst);
        Err(AssetError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("cannot remove {}", name),
        )))
    }

    async fn write_thumbnail(&self, name: &str, bytes: Bytes) -> Result<(), AssetError> {
        self.inner.write_thumbnail(name, bytes).await
    }

    async fn read_thumbnail(&self, name: &str) -> Result<Bytes, AssetError> {
        self.inner.read_thumbnail(name).await
    }

    async fn remove_thumbnail(&self, name: &str) -> Result<(), AssetError> {
        self.thumbnail_removals.fetch_add(1, Ordering::SeqCst);
        Err(AssetError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            format!("cannot remove {}", name),
        )))
    }
}

/// Manifest backend that loads normally but can be switched to fail
///  every save. Clones share the switch.
#[derive(Debug, Clone)]
pub struct FailingSaves {
    inner: ManifestStore,
    failing: Arc<AtomicBool>,
}

impl FailingSaves {
    pub fn new(dir: &Path) -> Self {
        Self {
            inner: ManifestStore::in_dir(dir),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ManifestBackend for FailingSaves {
    async fn load(&self) -> Result<Manifest, StoreError> {
        self.inner.load().await
    }

    async fn save(&self, manifest: &Manifest) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Persistence {
                path: self.inner.path().to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.inner.save(manifest).await
    }
}

/// Count regular files anywhere under `dir`.
pub fn count_files(dir: &Path) -> usize {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return 0;
    };
    entries
        .map(|entry| entry.unwrap().path())
        .map(|path| if path.is_dir() { count_files(&path) } else { 1 })
        .sum()
}
