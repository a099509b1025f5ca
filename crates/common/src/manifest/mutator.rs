use super::node::{FileNode, Node, NodeRef};
use super::path::PathKey;
use super::{Manifest, ManifestError};

/// Result of an idempotent [`Manifest::mkdir`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MkdirOutcome {
    Created,
    AlreadyExists,
}

// Structural changes only. None of these touch physical storage; every
//  check runs before the first write so a failed call leaves the tree as
//  it was.
impl Manifest {
    /// Create `key` and any missing ancestors.
    pub fn mkdir(&mut self, key: &PathKey) -> Result<MkdirOutcome, ManifestError> {
        match self.resolve(key) {
            Some(NodeRef::Dir(_)) => return Ok(MkdirOutcome::AlreadyExists),
            Some(NodeRef::File(_)) => return Err(ManifestError::NotADirectory(key.clone())),
            None => {}
        }

        // Validate the whole chain up front: every existing prefix must be
        //  a directory and every new segment a legal name.
        let mut consumed = PathKey::root();
        let mut creating = false;
        for segment in key.segments() {
            consumed = consumed.join(segment)?;
            if creating {
                continue;
            }
            match self.resolve(&consumed) {
                Some(NodeRef::Dir(_)) => {}
                Some(NodeRef::File(_)) => return Err(ManifestError::NotADirectory(consumed)),
                None => creating = true,
            }
        }

        let mut dir = &mut self.root;
        for segment in key.segments() {
            dir = match dir.entry_or_dir(segment) {
                Node::Dir(next) => next,
                Node::File(_) => return Err(ManifestError::NotADirectory(key.clone())),
            };
        }

        Ok(MkdirOutcome::Created)
    }

    /// Insert `file` as `name` inside the directory at `parent`.
    ///
    /// An existing entry with the same name is replaced and returned; the
    /// caller owns any physical cleanup for it.
    pub fn insert_file(
        &mut self,
        parent: &PathKey,
        name: &str,
        file: FileNode,
    ) -> Result<Option<Node>, ManifestError> {
        parent.join(name)?;
        let dir = self
            .resolve_dir_mut(parent)
            .ok_or_else(|| ManifestError::InvalidParent(parent.clone()))?;
        Ok(dir.insert(name.to_string(), Node::File(file)))
    }

    /// Move the subtree at `source` to `destination`, unchanged.
    ///
    /// The destination must not exist and its parent must be an existing
    /// directory. Moving a directory underneath itself is rejected.
    pub fn move_node(
        &mut self,
        source: &PathKey,
        destination: &PathKey,
    ) -> Result<(), ManifestError> {
        if source.is_root() || !self.exists(source) {
            return Err(ManifestError::InvalidSource(source.clone()));
        }

        let invalid = |reason| ManifestError::InvalidDestination {
            path: destination.clone(),
            reason,
        };
        let name_ok = match (destination.parent(), destination.file_name()) {
            (Some(parent), Some(name)) => parent.join(name).is_ok(),
            _ => false,
        };
        if !name_ok {
            return Err(invalid("destination is not a valid entry name"));
        }
        if destination == source {
            return Err(invalid("source and destination are the same"));
        }
        if destination.starts_with(source) {
            return Err(invalid("destination is inside source"));
        }
        if self.exists(destination) {
            return Err(invalid("destination already exists"));
        }
        if self.resolve_parent(destination).is_none() {
            return Err(invalid("parent of destination is not a directory"));
        }

        let node = self.detach(source)?;
        match self.resolve_parent_mut(destination) {
            Some((dir, name)) => {
                dir.insert(name.to_string(), node);
                Ok(())
            }
            None => {
                // the destination parent cannot live under the source, so
                //  this only happens if the checks above are wrong
                if let Some((dir, name)) = self.resolve_parent_mut(source) {
                    dir.insert(name.to_string(), node);
                }
                Err(invalid("parent of destination is not a directory"))
            }
        }
    }

    /// Detach the subtree at `key` from its parent in one step.
    pub fn detach(&mut self, key: &PathKey) -> Result<Node, ManifestError> {
        if key.is_root() {
            return Err(ManifestError::RootNotRemovable);
        }
        let (dir, name) = self
            .resolve_parent_mut(key)
            .ok_or_else(|| ManifestError::NotFound(key.clone()))?;
        dir.remove(name)
            .ok_or_else(|| ManifestError::NotFound(key.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::super::node::ImageMeta;
    use super::super::path::ROOT_KEY;
    use super::*;

    fn key(s: &str) -> PathKey {
        PathKey::parse(s).unwrap()
    }

    #[test]
    fn test_mkdir_nested() {
        let mut manifest = Manifest::new();
        assert_eq!(
            manifest.mkdir(&key("a/b/c")).unwrap(),
            MkdirOutcome::Created
        );

        let c = manifest.resolve_dir(&key("a/b/c")).unwrap();
        assert!(c.is_empty());
        let b = manifest.resolve_dir(&key("a/b")).unwrap();
        assert_eq!(b.len(), 1);
        assert!(b.contains("c"));
    }

    #[test]
    fn test_mkdir_idempotent() {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("a/b")).unwrap();
        let snapshot = manifest.clone();
        assert_eq!(
            manifest.mkdir(&key("/a/b/")).unwrap(),
            MkdirOutcome::AlreadyExists
        );
        assert_eq!(manifest, snapshot);
        assert_eq!(
            manifest.mkdir(&PathKey::root()).unwrap(),
            MkdirOutcome::AlreadyExists
        );
        assert_eq!(manifest.root().len(), 1);
    }

    #[test]
    fn test_mkdir_through_file() {
        let mut manifest = Manifest::new();
        manifest
            .insert_file(&PathKey::root(), "f", FileNode::new("s1", 1))
            .unwrap();
        let snapshot = manifest.clone();
        assert!(matches!(
            manifest.mkdir(&key("f")),
            Err(ManifestError::NotADirectory(_))
        ));
        assert!(matches!(
            manifest.mkdir(&key("f/g/h")),
            Err(ManifestError::NotADirectory(k)) if k == key("f")
        ));
        assert_eq!(manifest, snapshot);
    }

    #[test]
    fn test_insert_then_resolve() {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("pics")).unwrap();
        let file = FileNode::new("x1.png", 1024).with_image(ImageMeta {
            thumbnail: Some("x1.webp".into()),
            width: Some(2),
            height: Some(3),
        });
        let replaced = manifest
            .insert_file(&key("pics"), "pic.png", file.clone())
            .unwrap();
        assert!(replaced.is_none());
        assert_eq!(
            manifest.resolve(&key("pics/pic.png")),
            Some(NodeRef::File(&file))
        );
    }

    #[test]
    fn test_insert_overwrites() {
        let mut manifest = Manifest::new();
        let root = PathKey::root();
        manifest
            .insert_file(&root, "a.txt", FileNode::new("old", 1))
            .unwrap();
        let replaced = manifest
            .insert_file(&root, "a.txt", FileNode::new("new", 2))
            .unwrap();
        assert_eq!(replaced, Some(Node::File(FileNode::new("old", 1))));
        assert_eq!(manifest.root().len(), 1);
    }

    #[test]
    fn test_insert_invalid_parent() {
        let mut manifest = Manifest::new();
        manifest
            .insert_file(&PathKey::root(), "f", FileNode::new("s", 1))
            .unwrap();
        assert!(matches!(
            manifest.insert_file(&key("missing"), "x", FileNode::new("s2", 1)),
            Err(ManifestError::InvalidParent(_))
        ));
        assert!(matches!(
            manifest.insert_file(&key("f"), "x", FileNode::new("s3", 1)),
            Err(ManifestError::InvalidParent(_))
        ));
        assert!(matches!(
            manifest.insert_file(&PathKey::root(), "a/b", FileNode::new("s4", 1)),
            Err(ManifestError::Path(_))
        ));
    }

    #[test]
    fn test_move_relocates_subtree() {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("src/inner")).unwrap();
        manifest
            .insert_file(&key("src/inner"), "f.txt", FileNode::new("s1", 5))
            .unwrap();
        manifest.mkdir(&key("dst")).unwrap();
        let before = manifest.resolve(&key("src")).unwrap().to_node();

        manifest.move_node(&key("src"), &key("dst/moved")).unwrap();

        assert!(manifest.resolve(&key("src")).is_none());
        assert_eq!(manifest.resolve(&key("dst/moved")).unwrap().to_node(), before);
        assert!(manifest.exists(&key("dst/moved/inner/f.txt")));
    }

    #[test]
    fn test_move_rename_in_place() {
        let mut manifest = Manifest::new();
        let root = PathKey::root();
        manifest.insert_file(&root, "a", FileNode::new("1", 1)).unwrap();
        manifest.insert_file(&root, "b", FileNode::new("2", 1)).unwrap();
        manifest.move_node(&key("a"), &key("c")).unwrap();
        let names: Vec<_> = manifest.root().iter().map(|(n, _)| n.clone()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn test_move_failures_leave_manifest_unchanged() {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("a/b")).unwrap();
        manifest
            .insert_file(&key("a"), "f", FileNode::new("s1", 1))
            .unwrap();
        manifest.mkdir(&key("c")).unwrap();
        let bytes = manifest.to_json_pretty().unwrap();

        let cases = [
            ("root", "x"),
            ("missing", "x"),
            ("a", "a"),
            ("a", "a/b/deeper"),
            ("a", "c"),
            ("a/f", "c"),
            ("c", "nowhere/c"),
            ("c", "a/f/c"),
            ("a", "root"),
        ];
        for (src, dst) in cases {
            let result = manifest.move_node(&key(src), &key(dst));
            assert!(result.is_err(), "{src} -> {dst} should fail");
            assert_eq!(manifest.to_json_pretty().unwrap(), bytes);
        }

        assert!(matches!(
            manifest.move_node(&key("a/f"), &key("c")),
            Err(ManifestError::InvalidDestination { .. })
        ));
        assert!(matches!(
            manifest.move_node(&PathKey::root(), &key("x")),
            Err(ManifestError::InvalidSource(_))
        ));
        assert!(matches!(
            manifest.move_node(&key("a"), &PathKey::root()),
            Err(ManifestError::InvalidDestination { .. })
        ));
        // a top level "root" entry is not even addressable
        assert!(PathKey::parse("root/root").is_err());
        assert!(!manifest.root().contains(ROOT_KEY));
    }

    #[test]
    fn test_detach() {
        let mut manifest = Manifest::new();
        manifest.mkdir(&key("a/b")).unwrap();
        let node = manifest.detach(&key("a")).unwrap();
        assert!(node.is_dir());
        assert!(manifest.root().is_empty());
        assert!(matches!(
            manifest.detach(&key("a")),
            Err(ManifestError::NotFound(_))
        ));
        assert!(matches!(
            manifest.detach(&PathKey::root()),
            Err(ManifestError::RootNotRemovable)
        ));
    }
}
