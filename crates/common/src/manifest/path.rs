use std::fmt;
use std::str::FromStr;

/// Reserved key addressing the manifest's root directory.
pub const ROOT_KEY: &str = "root";

/// Separator between segments of a manifest path.
pub const SEPARATOR: char = '/';

/// A normalized path into the manifest.
///
/// Keys are always relative to the manifest root and contain only
/// non-empty segments that are neither `.` nor `..`. The root itself
/// has no segments and renders as [`ROOT_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PathKey {
    segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("path escapes the manifest root: {0}")]
    EscapesRoot(String),
    #[error("invalid name: {0:?}")]
    InvalidName(String),
}

/// Check that `name` can be used as a single directory entry.
pub fn validate_name(name: &str) -> Result<&str, PathError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(SEPARATOR)
        || name.chars().any(char::is_control)
    {
        return Err(PathError::InvalidName(name.to_string()));
    }
    Ok(name)
}

impl PathKey {
    pub fn root() -> Self {
        Self::default()
    }

    /// Normalize a user supplied path.
    ///
    /// Redundant separators and `.` segments are dropped and `..` pops the
    /// previous segment. The empty string, `/` and `root` all address the
    /// root; a leading `root` segment is treated the same way. A top level
    /// entry can never be named `root`, so `root/root` is rejected, and a
    /// key's rendered form always parses back to itself. A `..` that would
    /// climb above the root is rejected.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let mut segments: Vec<String> = Vec::new();

        for part in input.split(SEPARATOR) {
            match part {
                "" | "." => continue,
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::EscapesRoot(input.to_string()));
                    }
                }
                name => {
                    if name.chars().any(char::is_control) {
                        return Err(PathError::InvalidName(name.to_string()));
                    }
                    segments.push(name.to_string());
                }
            }
        }

        if segments.first().map(String::as_str) == Some(ROOT_KEY) {
            segments.remove(0);
        }
        if segments.first().map(String::as_str) == Some(ROOT_KEY) {
            return Err(PathError::InvalidName(ROOT_KEY.to_string()));
        }

        Ok(Self { segments })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The key one level up, `None` for the root.
    pub fn parent(&self) -> Option<PathKey> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    pub(crate) fn split_last(&self) -> Option<(&str, &[String])> {
        self.segments
            .split_last()
            .map(|(name, parent)| (name.as_str(), parent))
    }

    /// Append a single validated entry name.
    pub fn join(&self, name: &str) -> Result<PathKey, PathError> {
        let name = validate_name(name)?;
        // a top level entry named like the root key could never be addressed
        if self.is_root() && name == ROOT_KEY {
            return Err(PathError::InvalidName(name.to_string()));
        }
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Ok(Self { segments })
    }

    /// Whether `self` is `other` or lies underneath it.
    pub fn starts_with(&self, other: &PathKey) -> bool {
        self.segments.starts_with(&other.segments)
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str(ROOT_KEY)
        } else {
            f.write_str(&self.segments.join("/"))
        }
    }
}

impl FromStr for PathKey {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
