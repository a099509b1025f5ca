/**
 * Physical storage for uploaded bytes and their
 *  derived thumbnails. Objects are addressed by
 *  generated storage names, never by logical path.
 */
pub mod assets;
/**
 * The single owner of the manifest. Serializes
 *  every mutation and pairs each structural change
 *  with the physical I/O it depends on.
 */
pub mod file_manager;
/**
 * The manifest tree engine: node types, path
 *  normalization, navigation, structural mutation
 *  and persistence of the whole tree.
 */
pub mod manifest;
/**
 * Image thumbnail generation for uploads
 *  detected as images.
 */
pub mod thumbnail;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::assets::{AssetError, AssetGateway, AssetStoreConfig, ObjectAssets};
    pub use crate::file_manager::{FileManager, FileManagerError, RemovedSubtree, Upload};
    pub use crate::manifest::{
        DirNode, Entry, FileNode, ImageMeta, Manifest, ManifestBackend, ManifestError,
        ManifestStore, MkdirOutcome, Node, PathError, PathKey, StoreError,
    };
    pub use crate::version::build_info;
}
