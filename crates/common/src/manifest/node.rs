use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/**
 * Nodes
 * =====
 * A manifest is a strict ownership tree of nodes:
 *  - Dir nodes map local names to child nodes, in insertion order
 *  - File nodes are leaves pointing at a physical object by its
 *     storage name, which never matches the logical name
 * Every node is owned by exactly one parent directory, so a subtree
 *  can be detached and re-attached without any bookkeeping.
 */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "dir")]
    Dir(DirNode),
    #[serde(rename = "file")]
    File(FileNode),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DirNode {
    #[serde(default)]
    nodes: IndexMap<String, Node>,
}

/// Metadata kept for uploads that were recognized as images.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImageMeta {
    /// Storage name of the derived thumbnail, if one was produced.
    pub thumbnail: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFileNode", into = "RawFileNode")]
pub struct FileNode {
    filename: String,
    size: u64,
    id: Option<u64>,
    image: Option<ImageMeta>,
}

// On-disk shape of a file node. The thumbnail name sits next to the
//  filename while the dimensions live under `image`; older manifests
//  nest the thumbnail inside `image` as well, so both are accepted.
//  `thumbnail` and `image` are independent: either may be absent.
#[derive(Serialize, Deserialize)]
struct RawFileNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<u64>,
    filename: String,
    size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<RawImage>,
}

#[derive(Serialize, Deserialize)]
struct RawImage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default, skip_serializing)]
    thumbnail: Option<String>,
}

impl From<RawFileNode> for FileNode {
    fn from(raw: RawFileNode) -> Self {
        let image = match (raw.thumbnail, raw.image) {
            (None, None) => None,
            (thumbnail, Some(image)) => Some(ImageMeta {
                thumbnail: thumbnail.or(image.thumbnail),
                width: image.width,
                height: image.height,
            }),
            (thumbnail, None) => Some(ImageMeta {
                thumbnail,
                ..ImageMeta::default()
            }),
        };
        FileNode {
            filename: raw.filename,
            size: raw.size,
            id: raw.id,
            image,
        }
    }
}

impl From<FileNode> for RawFileNode {
    fn from(file: FileNode) -> Self {
        let (thumbnail, image) = match file.image {
            Some(ImageMeta {
                thumbnail,
                width,
                height,
            }) => {
                // an image object with no thumbnail is all that kept the
                //  meta alive, so it is written back even when empty
                let keep = width.is_some() || height.is_some() || thumbnail.is_none();
                let image = keep.then_some(RawImage {
                    width,
                    height,
                    thumbnail: None,
                });
                (thumbnail, image)
            }
            None => (None, None),
        };
        RawFileNode {
            id: file.id,
            filename: file.filename,
            size: file.size,
            thumbnail,
            image,
        }
    }
}

impl FileNode {
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            size,
            id: None,
            image: None,
        }
    }

    pub fn with_image(mut self, image: ImageMeta) -> Self {
        self.image = Some(image);
        self
    }

    /// Storage name of the physical object.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Numeric id some older manifests carry; kept as is.
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn image(&self) -> Option<&ImageMeta> {
        self.image.as_ref()
    }

    pub fn thumbnail(&self) -> Option<&str> {
        self.image.as_ref()?.thumbnail.as_deref()
    }
}

impl DirNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Insert or replace an entry, returning the replaced node. A
    /// replaced entry keeps its position.
    pub fn insert(&mut self, name: String, node: Node) -> Option<Node> {
        self.nodes.insert(name, node)
    }

    /// Remove an entry, keeping the order of its siblings.
    pub fn remove(&mut self, name: &str) -> Option<Node> {
        self.nodes.shift_remove(name)
    }

    pub(crate) fn entry_or_dir(&mut self, name: &str) -> &mut Node {
        self.nodes
            .entry(name.to_string())
            .or_insert_with(|| Node::Dir(DirNode::new()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Node {
    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Dir(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_dir(&self) -> Option<&DirNode> {
        match self {
            Node::Dir(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            Node::File(file) => Some(file),
            Node::Dir(_) => None,
        }
    }

    /// Every file in this subtree, depth first.
    pub fn files(&self) -> Vec<&FileNode> {
        let mut files = Vec::new();
        collect_files(self, &mut files);
        files
    }

    /// Every physical object this subtree points at, children before
    /// parents. A file's object comes before its thumbnail.
    pub fn stored_objects(&self) -> Vec<StoredObject> {
        self.files()
            .into_iter()
            .flat_map(|file| {
                let object = StoredObject::Object(file.filename.clone());
                let thumbnail = file.thumbnail().map(|t| StoredObject::Thumbnail(t.to_string()));
                std::iter::once(object).chain(thumbnail)
            })
            .collect()
    }
}

/// A physical object referenced from the manifest, by storage name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StoredObject {
    Object(String),
    Thumbnail(String),
}

impl StoredObject {
    pub fn name(&self) -> &str {
        match self {
            StoredObject::Object(name) | StoredObject::Thumbnail(name) => name,
        }
    }

    pub fn is_thumbnail(&self) -> bool {
        matches!(self, StoredObject::Thumbnail(_))
    }
}

impl std::fmt::Display for StoredObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoredObject::Object(name) => write!(f, "object {}", name),
            StoredObject::Thumbnail(name) => write!(f, "thumbnail {}", name),
        }
    }
}

fn collect_files<'a>(node: &'a Node, out: &mut Vec<&'a FileNode>) {
    match node {
        Node::File(file) => out.push(file),
        Node::Dir(dir) => {
            for child in dir.nodes.values() {
                collect_files(child, out);
            }
        }
    }
}

/// Borrowed view of a resolved node. The root is a bare [`DirNode`], so
/// lookups hand out this view rather than `&Node`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Dir(&'a DirNode),
    File(&'a FileNode),
}

impl<'a> From<&'a Node> for NodeRef<'a> {
    fn from(node: &'a Node) -> Self {
        match node {
            Node::Dir(dir) => NodeRef::Dir(dir),
            Node::File(file) => NodeRef::File(file),
        }
    }
}

impl NodeRef<'_> {
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeRef::Dir(_))
    }

    pub fn to_node(self) -> Node {
        match self {
            NodeRef::Dir(dir) => Node::Dir(dir.clone()),
            NodeRef::File(file) => Node::File(file.clone()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_file_node_wire_format() {
        let plain = Node::File(FileNode::new("V1StGXR8.txt", 12));
        let json = serde_json::to_value(&plain).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "file", "filename": "V1StGXR8.txt", "size": 12})
        );

        let image = Node::File(FileNode::new("x1.png", 1024).with_image(ImageMeta {
            thumbnail: Some("x1.webp".into()),
            width: Some(640),
            height: None,
        }));
        let json = serde_json::to_value(&image).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "file",
                "filename": "x1.png",
                "size": 1024,
                "thumbnail": "x1.webp",
                "image": {"width": 640}
            })
        );
        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_nested_thumbnail_accepted() {
        let json = serde_json::json!({
            "type": "file",
            "filename": "abc.jpg",
            "size": 3,
            "image": {"thumbnail": "abc.webp", "width": 10, "height": 20}
        });
        let node: Node = serde_json::from_value(json).unwrap();
        let file = node.as_file().unwrap();
        assert_eq!(file.thumbnail(), Some("abc.webp"));
        assert_eq!(file.image().unwrap().height, Some(20));
    }

    #[test]
    fn test_optional_fields_survive_round_trip() {
        let docs = [
            serde_json::json!({
                "type": "file",
                "filename": "x.png",
                "size": 1,
                "image": {"width": 5, "height": 6}
            }),
            serde_json::json!({"type": "file", "filename": "y.png", "size": 2, "thumbnail": "y.webp"}),
            serde_json::json!({"type": "file", "filename": "z.bin", "size": 3, "image": {}}),
            serde_json::json!({"type": "file", "id": 42, "filename": "w.txt", "size": 4}),
        ];
        for doc in docs {
            let node: Node = serde_json::from_value(doc.clone()).unwrap();
            assert_eq!(serde_json::to_value(&node).unwrap(), doc);
        }

        let node: Node = serde_json::from_value(serde_json::json!({
            "type": "file",
            "filename": "x.png",
            "size": 1,
            "image": {"width": 5, "height": 6}
        }))
        .unwrap();
        let file = node.as_file().unwrap();
        assert_eq!(file.thumbnail(), None);
        assert_eq!(file.image().unwrap().width, Some(5));
    }

    #[test]
    fn test_dir_keeps_insertion_order() {
        let mut dir = DirNode::new();
        for name in ["zeta", "alpha", "mid"] {
            dir.insert(name.to_string(), Node::Dir(DirNode::new()));
        }
        dir.remove("alpha");
        dir.insert("beta".into(), Node::File(FileNode::new("b", 1)));
        let names: Vec<_> = dir.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["zeta", "mid", "beta"]);

        let json = serde_json::to_string(&Node::Dir(dir.clone())).unwrap();
        let back: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Node::Dir(dir));
    }

    #[test]
    fn test_files_walks_subtree() {
        let mut inner = DirNode::new();
        inner.insert("a".into(), Node::File(FileNode::new("1", 1)));
        inner.insert("b".into(), Node::File(FileNode::new("2", 2)));
        let mut outer = DirNode::new();
        outer.insert("inner".into(), Node::Dir(inner));
        outer.insert("empty".into(), Node::Dir(DirNode::new()));
        outer.insert("c".into(), Node::File(FileNode::new("3", 3)));

        let names: Vec<_> = Node::Dir(outer)
            .files()
            .iter()
            .map(|f| f.filename().to_string())
            .collect();
        assert_eq!(names, ["1", "2", "3"]);
    }

    #[test]
    fn test_stored_objects() {
        let mut dir = DirNode::new();
        dir.insert(
            "pic.png".into(),
            Node::File(FileNode::new("p.png", 4).with_image(ImageMeta {
                thumbnail: Some("p.webp".into()),
                width: None,
                height: None,
            })),
        );
        dir.insert("doc.txt".into(), Node::File(FileNode::new("d.txt", 2)));

        assert_eq!(
            Node::Dir(dir).stored_objects(),
            vec![
                StoredObject::Object("p.png".into()),
                StoredObject::Thumbnail("p.webp".into()),
                StoredObject::Object("d.txt".into()),
            ]
        );
    }
}
