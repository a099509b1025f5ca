use serde::{Deserialize, Serialize};

use super::node::{DirNode, Node, NodeRef};
use super::path::PathKey;
use super::{Manifest, ManifestError};

/// Kind of a listed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Dir,
    File,
}

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Entry {
    fn new(name: &str, node: &Node) -> Self {
        match node {
            Node::Dir(_) => Entry {
                name: name.to_string(),
                kind: EntryKind::Dir,
                size: None,
                thumbnail: None,
            },
            Node::File(file) => Entry {
                name: name.to_string(),
                kind: EntryKind::File,
                size: Some(file.size()),
                thumbnail: file.thumbnail().map(str::to_string),
            },
        }
    }
}

// Lookups never fail loudly: walking through a file or a missing segment
//  is an ordinary miss and comes back as `None`.
impl Manifest {
    pub fn resolve(&self, key: &PathKey) -> Option<NodeRef<'_>> {
        let mut current = NodeRef::Dir(&self.root);
        for segment in key.segments() {
            let NodeRef::Dir(dir) = current else {
                return None;
            };
            current = NodeRef::from(dir.get(segment)?);
        }
        Some(current)
    }

    pub fn resolve_dir(&self, key: &PathKey) -> Option<&DirNode> {
        match self.resolve(key)? {
            NodeRef::Dir(dir) => Some(dir),
            NodeRef::File(_) => None,
        }
    }

    pub(crate) fn resolve_dir_mut(&mut self, key: &PathKey) -> Option<&mut DirNode> {
        walk_dirs_mut(&mut self.root, key.segments())
    }

    /// The directory holding `key` and `key`'s final segment. `None` for
    /// the root, or when any ancestor is missing or a file.
    pub fn resolve_parent<'k>(&self, key: &'k PathKey) -> Option<(&DirNode, &'k str)> {
        let (name, parent) = key.split_last()?;
        let mut dir = &self.root;
        for segment in parent {
            dir = dir.get(segment)?.as_dir()?;
        }
        Some((dir, name))
    }

    pub(crate) fn resolve_parent_mut<'k>(
        &mut self,
        key: &'k PathKey,
    ) -> Option<(&mut DirNode, &'k str)> {
        let (name, parent) = key.split_last()?;
        let dir = walk_dirs_mut(&mut self.root, parent)?;
        Some((dir, name))
    }

    pub fn exists(&self, key: &PathKey) -> bool {
        key.is_root() || self.resolve(key).is_some()
    }

    /// List a directory in insertion order.
    pub fn list(&self, key: &PathKey) -> Result<Vec<Entry>, ManifestError> {
        match self.resolve(key) {
            None => Err(ManifestError::NotFound(key.clone())),
            Some(NodeRef::File(_)) => Err(ManifestError::NotADirectory(key.clone())),
            Some(NodeRef::Dir(dir)) => Ok(dir
                .iter()
                .map(|(name, node)| Entry::new(name, node))
                .collect()),
        }
    }
}

fn walk_dirs_mut<'a>(root: &'a mut DirNode, segments: &[String]) -> Option<&'a mut DirNode> {
    let mut dir = root;
    for segment in segments {
        dir = match dir.get_mut(segment)? {
            Node::Dir(next) => next,
            Node::File(_) => return None,
        };
    }
    Some(dir)
}

#[cfg(test)]
mod test {
    use super::super::node::FileNode;
    use super::*;

    fn key(s: &str) -> PathKey {
        PathKey::parse(s).unwrap()
    }

    fn sample() -> Manifest {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("docs/2024")).unwrap();
        manifest
            .insert_file(&key("docs"), "readme.md", FileNode::new("r1.md", 9))
            .unwrap();
        manifest
    }

    #[test]
    fn test_resolve() {
        let manifest = sample();
        assert!(matches!(manifest.resolve(&PathKey::root()), Some(NodeRef::Dir(_))));
        assert!(matches!(manifest.resolve(&key("docs/2024")), Some(NodeRef::Dir(_))));
        assert!(matches!(
            manifest.resolve(&key("docs/readme.md")),
            Some(NodeRef::File(f)) if f.filename() == "r1.md"
        ));
        assert!(manifest.resolve(&key("docs/missing")).is_none());
    }

    #[test]
    fn test_resolve_through_file_is_miss() {
        let manifest = sample();
        assert!(manifest.resolve(&key("docs/readme.md/inner")).is_none());
        assert!(manifest.resolve_parent(&key("docs/readme.md/inner")).is_none());
        assert!(!manifest.exists(&key("docs/readme.md/inner")));
    }

    #[test]
    fn test_resolve_parent() {
        let manifest = sample();
        let target = key("docs/2024/report.pdf");
        let (dir, name) = manifest.resolve_parent(&target).unwrap();
        assert!(dir.is_empty());
        assert_eq!(name, "report.pdf");

        let top = key("docs");
        let (dir, name) = manifest.resolve_parent(&top).unwrap();
        assert_eq!(name, "docs");
        assert!(dir.contains("docs"));

        assert!(manifest.resolve_parent(&PathKey::root()).is_none());
        assert!(manifest.resolve_parent(&key("nope/file")).is_none());
    }

    #[test]
    fn test_exists() {
        let manifest = Manifest::new();
        assert!(manifest.exists(&PathKey::root()));
        assert!(!manifest.exists(&key("a")));
    }

    #[test]
    fn test_list() {
        let manifest = sample();
        let entries = manifest.list(&key("docs")).unwrap();
        assert_eq!(
            entries,
            vec![
                Entry {
                    name: "2024".into(),
                    kind: EntryKind::Dir,
                    size: None,
                    thumbnail: None,
                },
                Entry {
                    name: "readme.md".into(),
                    kind: EntryKind::File,
                    size: Some(9),
                    thumbnail: None,
                },
            ]
        );
        assert!(matches!(
            manifest.list(&key("docs/readme.md")),
            Err(ManifestError::NotADirectory(_))
        ));
        assert!(matches!(
            manifest.list(&key("ghost")),
            Err(ManifestError::NotFound(_))
        ));
    }
}
