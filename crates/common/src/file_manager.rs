use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::assets::{AssetError, AssetGateway, AssetStoreConfig, ObjectAssets};
use crate::manifest::{
    validate_name, Entry, FileNode, ImageMeta, ManifestBackend, ManifestError, ManifestStore,
    MkdirOutcome, Node, NodeRef, PathError, PathKey, StoreError, StoredObject,
};
use crate::thumbnail::{self, ThumbnailError, THUMBNAIL_EXTENSION};

/// Directory under the data dir holding physical objects.
pub const UPLOADS_DIR: &str = "uploads";

/// Owns the manifest and the asset gateway.
///
/// Every mutation holds the write lock across
///  reload -> mutate -> physical I/O -> save,
///  so concurrent writers never clobber each other.
///  Reads share the lock and reload from disk.
#[derive(Debug, Clone)]
pub struct FileManager(Arc<RwLock<Box<dyn ManifestBackend>>>, Arc<dyn AssetGateway>);

#[derive(Debug, thiserror::Error)]
pub enum FileManagerError {
    #[error("path error: {0}")]
    Path(#[from] PathError),
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("thumbnail error: {0}")]
    Thumbnail(#[from] ThumbnailError),
    #[error("not a file: {0}")]
    NotAFile(PathKey),
    #[error("a directory already exists at {0}")]
    IsADirectory(PathKey),
    #[error("no thumbnail for {0}")]
    NoThumbnail(PathKey),
}

/// An incoming file, already read into memory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            content_type: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// The declared content type, or a guess from the file name when the
    /// client sent none or a generic one.
    pub fn mime(&self) -> String {
        match self.content_type.as_deref() {
            Some(declared) if declared != mime::APPLICATION_OCTET_STREAM.essence_str() => {
                declared.to_string()
            }
            _ => mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .to_string(),
        }
    }
}

/// What a recursive remove did.
#[derive(Debug, Clone)]
pub struct RemovedSubtree {
    /// The detached subtree.
    pub node: Node,
    /// Physical removals attempted, one per object and one per thumbnail.
    pub attempted: usize,
    /// Removals that failed. The manifest no longer references them.
    pub failures: Vec<StoredObject>,
}

impl FileManager {
    pub fn new(store: impl ManifestBackend + 'static, assets: Arc<dyn AssetGateway>) -> Self {
        Self(Arc::new(RwLock::new(Box::new(store))), assets)
    }

    /// Manifest at `<dir>/manifest.json`, objects under `<dir>/uploads`.
    pub async fn open(dir: &Path) -> Result<Self, FileManagerError> {
        let config = AssetStoreConfig::Local {
            path: dir.join(UPLOADS_DIR),
        };
        let assets = ObjectAssets::new(&config).await?;
        let manager = Self::new(ManifestStore::in_dir(dir), Arc::new(assets));
        manager.check().await?;
        Ok(manager)
    }

    pub fn assets(&self) -> &Arc<dyn AssetGateway> {
        &self.1
    }

    /// Load the manifest once, creating it if missing.
    pub async fn check(&self) -> Result<(), FileManagerError> {
        let store = self.0.read().await;
        store.load().await?;
        Ok(())
    }

    pub async fn ls(&self, path: &str) -> Result<Vec<Entry>, FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.read().await;
        let manifest = store.load().await?;
        Ok(manifest.list(&key)?)
    }

    pub async fn get(&self, path: &str) -> Result<Node, FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.read().await;
        let manifest = store.load().await?;
        let node = manifest
            .resolve(&key)
            .ok_or(ManifestError::NotFound(key.clone()))?;
        Ok(node.to_node())
    }

    pub async fn exists(&self, path: &str) -> Result<bool, FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.read().await;
        Ok(store.load().await?.exists(&key))
    }

    pub async fn stat(&self, path: &str) -> Result<FileNode, FileManagerError> {
        match self.get(path).await? {
            Node::File(file) => Ok(file),
            Node::Dir(_) => Err(FileManagerError::NotAFile(PathKey::parse(path)?)),
        }
    }

    pub async fn mkdir(&self, path: &str) -> Result<MkdirOutcome, FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.write().await;
        let mut manifest = store.load().await?;

        let outcome = manifest.mkdir(&key)?;
        if outcome == MkdirOutcome::Created {
            store.save(&manifest).await?;
            tracing::info!(path = %key, "created directory");
        }
        Ok(outcome)
    }

    /// Store `upload` as `<dir>/<upload.filename>`.
    ///
    /// The object (and thumbnail, for images) is written before the
    /// manifest commits. If the commit fails the new objects are removed
    /// again. An existing file with the same name is replaced and its
    /// objects removed once the new entry is saved.
    pub async fn upload(&self, dir: &str, upload: Upload) -> Result<FileNode, FileManagerError> {
        let parent = PathKey::parse(dir)?;
        let name = validate_name(&upload.filename)?.to_string();
        let key = parent.join(&name)?;
        let mime = upload.mime();

        let store = self.0.write().await;
        let mut manifest = store.load().await?;
        match manifest.resolve(&parent) {
            Some(NodeRef::Dir(_)) => {}
            _ => return Err(ManifestError::InvalidParent(parent).into()),
        }
        if let Some(NodeRef::Dir(_)) = manifest.resolve(&key) {
            return Err(FileManagerError::IsADirectory(key));
        }

        let stem = Uuid::new_v4().simple().to_string();
        let storage_name = match Path::new(&upload.filename).extension() {
            Some(ext) => format!("{}.{}", stem, ext.to_string_lossy()),
            None => stem.clone(),
        };
        let size = upload.bytes.len() as u64;

        self.1
            .write_object(&storage_name, upload.bytes.clone())
            .await?;
        let mut file = FileNode::new(storage_name, size);

        if thumbnail::is_image(&mime) {
            let thumbnail_name = format!("{}.{}", stem, THUMBNAIL_EXTENSION);
            match self.write_thumbnail(&thumbnail_name, upload.bytes).await {
                Ok((width, height)) => {
                    file = file.with_image(ImageMeta {
                        thumbnail: Some(thumbnail_name),
                        width: Some(width),
                        height: Some(height),
                    });
                }
                Err(e) => {
                    tracing::warn!(path = %key, %mime, "skipping thumbnail: {}", e);
                }
            }
        }

        let committed = match manifest.insert_file(&parent, &name, file.clone()) {
            Ok(replaced) => store
                .save(&manifest)
                .await
                .map(|()| replaced)
                .map_err(FileManagerError::from),
            Err(e) => Err(e.into()),
        };
        let replaced = match committed {
            Ok(replaced) => replaced,
            Err(e) => {
                self.remove_objects(&Node::File(file)).await;
                return Err(e);
            }
        };
        drop(store);

        tracing::info!(path = %key, storage = file.filename(), size, "uploaded file");
        if let Some(old) = replaced {
            let (_, failures) = self.remove_objects(&old).await;
            if !failures.is_empty() {
                tracing::warn!(
                    path = %key,
                    failed = failures.len(),
                    "replaced file left orphaned objects"
                );
            }
        }
        Ok(file)
    }

    async fn write_thumbnail(
        &self,
        name: &str,
        source: Bytes,
    ) -> Result<(u32, u32), FileManagerError> {
        let thumbnail = thumbnail::generate(source).await?;
        self.1.write_thumbnail(name, thumbnail.bytes).await?;
        Ok((thumbnail.width, thumbnail.height))
    }

    /// Move a subtree. Storage is flat, so only the manifest changes.
    pub async fn mv(&self, source: &str, destination: &str) -> Result<(), FileManagerError> {
        let source = PathKey::parse(source)?;
        let destination = PathKey::parse(destination)?;

        let store = self.0.write().await;
        let mut manifest = store.load().await?;
        manifest.move_node(&source, &destination)?;
        store.save(&manifest).await?;

        tracing::info!(%source, %destination, "moved");
        Ok(())
    }

    /// Remove a subtree and every physical object under it.
    ///
    /// Physical removals run concurrently. A failed removal is logged and
    /// reported but the subtree is detached regardless.
    pub async fn rm(&self, path: &str) -> Result<RemovedSubtree, FileManagerError> {
        let key = PathKey::parse(path)?;
        if key.is_root() {
            return Err(ManifestError::RootNotRemovable.into());
        }

        let store = self.0.write().await;
        let mut manifest = store.load().await?;
        let node = manifest
            .resolve(&key)
            .ok_or(ManifestError::NotFound(key.clone()))?
            .to_node();

        let (attempted, failures) = self.remove_objects(&node).await;
        manifest.detach(&key)?;
        store.save(&manifest).await?;

        tracing::info!(path = %key, attempted, failed = failures.len(), "removed");
        Ok(RemovedSubtree {
            node,
            attempted,
            failures,
        })
    }

    async fn remove_objects(&self, node: &Node) -> (usize, Vec<StoredObject>) {
        let objects = node.stored_objects();
        let results = join_all(objects.iter().map(|object| async move {
            match object {
                StoredObject::Object(name) => self.1.remove_object(name).await,
                StoredObject::Thumbnail(name) => self.1.remove_thumbnail(name).await,
            }
        }))
        .await;

        let failures = objects
            .iter()
            .zip(results)
            .filter_map(|(object, result)| match result {
                Ok(()) => None,
                Err(e) => {
                    tracing::warn!(%object, "failed to remove: {}", e);
                    Some(object.clone())
                }
            })
            .collect();
        (objects.len(), failures)
    }

    pub async fn download(&self, path: &str) -> Result<(FileNode, Bytes), FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.read().await;
        let manifest = store.load().await?;
        let file = match manifest.resolve(&key) {
            Some(NodeRef::File(file)) => file.clone(),
            Some(NodeRef::Dir(_)) => return Err(FileManagerError::NotAFile(key)),
            None => return Err(ManifestError::NotFound(key).into()),
        };
        let bytes = self.1.read_object(file.filename()).await?;
        Ok((file, bytes))
    }

    pub async fn thumbnail(&self, path: &str) -> Result<Bytes, FileManagerError> {
        let key = PathKey::parse(path)?;
        let store = self.0.read().await;
        let manifest = store.load().await?;
        let name = match manifest.resolve(&key) {
            Some(NodeRef::File(file)) => file
                .thumbnail()
                .ok_or_else(|| FileManagerError::NoThumbnail(key.clone()))?
                .to_string(),
            Some(NodeRef::Dir(_)) => return Err(FileManagerError::NotAFile(key)),
            None => return Err(ManifestError::NotFound(key).into()),
        };
        Ok(self.1.read_thumbnail(&name).await?)
    }
}
