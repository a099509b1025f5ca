//! The manifest tree engine
//!
//! A [`Manifest`] is the single source of truth for the logical file tree.
//! Physical bytes live in a flat object store under generated storage names;
//! the manifest maps human readable paths onto them.
//!
//! - **[`PathKey`]**: normalized path into the tree (`"root"` is the root)
//! - **[`Node`]**: a directory or a file leaf
//! - **[`ManifestStore`]**: loads and atomically saves the whole tree
//! - navigation (`resolve`, `resolve_parent`, `exists`) and structural
//!   mutation (`mkdir`, `insert_file`, `move_node`, `detach`) are methods on
//!   [`Manifest`], split across the `navigator` and `mutator` modules
//!
//! # Persisted shape
//!
//! ```text
//! { "root": { "type": "dir", "nodes": {
//!     "photos": { "type": "dir", "nodes": {
//!         "cat.png": { "type": "file", "filename": "3f2a...c1.png", "size": 1024,
//!                      "thumbnail": "3f2a...c1.webp",
//!                      "image": { "width": 800, "height": 600 } } } } } } }
//! ```
//!
//! Nothing in this module touches the object store. Callers pair each
//! structural change with its physical counterpart; see
//! [`FileManager`](crate::file_manager::FileManager).

mod mutator;
mod navigator;
mod node;
mod path;
mod store;

use serde::{Deserialize, Serialize};

pub use mutator::MkdirOutcome;
pub use navigator::{Entry, EntryKind};
pub use node::{DirNode, FileNode, ImageMeta, Node, NodeRef, StoredObject};
pub use path::{validate_name, PathError, PathKey, ROOT_KEY, SEPARATOR};
pub use store::{ManifestBackend, ManifestStore, StoreError, MANIFEST_FILE_NAME};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawManifest", into = "RawManifest")]
pub struct Manifest {
    root: DirNode,
}

#[derive(Serialize, Deserialize)]
struct RawManifest {
    root: Node,
}

impl TryFrom<RawManifest> for Manifest {
    type Error = String;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        let root = match raw.root {
            Node::Dir(root) => root,
            Node::File(_) => return Err("manifest root must be a directory".to_string()),
        };
        check_names(&PathKey::root(), &root)?;
        Ok(Manifest { root })
    }
}

// Every stored name must be addressable through a PathKey.
fn check_names(at: &PathKey, dir: &DirNode) -> Result<(), String> {
    for (name, node) in dir.iter() {
        let key = at
            .join(name)
            .map_err(|e| format!("unaddressable entry under {}: {}", at, e))?;
        if let Node::Dir(child) = node {
            check_names(&key, child)?;
        }
    }
    Ok(())
}

impl From<Manifest> for RawManifest {
    fn from(manifest: Manifest) -> Self {
        RawManifest {
            root: Node::Dir(manifest.root),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("path not found: {0}")]
    NotFound(PathKey),
    #[error("not a directory: {0}")]
    NotADirectory(PathKey),
    #[error("invalid parent directory: {0}")]
    InvalidParent(PathKey),
    #[error("invalid source: {0}")]
    InvalidSource(PathKey),
    #[error("invalid destination '{path}': {reason}")]
    InvalidDestination { path: PathKey, reason: &'static str },
    #[error("the root directory cannot be removed")]
    RootNotRemovable,
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &DirNode {
        &self.root
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Serialize with four space indentation.
    pub fn to_json_pretty(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(buf)
    }
}
