//! Virtual file system data types shared across host contracts and implementations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable identifier of the root folder.
pub const ROOT_NODE_ID: &str = "root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Virtual file system node kind.
pub enum NodeKind {
    /// File entry with text content.
    File,
    /// Folder entry that can own children.
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One file or folder in the in-memory tree.
///
/// `path` is always the parent's path joined with `name`; the root is the only node whose
/// `parent_id` is `None`.
pub struct FileSystemNode {
    /// Stable node identifier.
    pub id: String,
    /// Base name of the node (`/` for the root).
    pub name: String,
    /// File or folder kind.
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Fully materialized path.
    pub path: String,
    /// Owning folder id (`None` only for the root).
    pub parent_id: Option<String>,
    /// Text content (files only).
    pub content: Option<String>,
    /// Extension derived from the name (files only).
    pub extension: Option<String>,
    /// Creation time in unix milliseconds.
    pub created_at_unix_ms: u64,
    /// Last content change in unix milliseconds.
    pub modified_at_unix_ms: u64,
}

impl FileSystemNode {
    /// Returns `true` for folder nodes.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Returns `true` for file nodes.
    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }
}

/// Derives a file extension from the last `.`-separated segment of `name`.
pub fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() && ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors returned by virtual file system mutations.
pub enum FsError {
    /// The referenced node id does not exist.
    #[error("no such node `{0}`")]
    NotFound(String),
    /// A child was requested under a file.
    #[error("parent `{0}` is not a folder")]
    ParentNotFolder(String),
    /// The materialized path is already taken.
    #[error("{0}: File exists")]
    AlreadyExists(String),
    /// The node name is empty or contains a path separator.
    #[error("invalid name `{0}`")]
    InvalidName(String),
    /// Content updates only apply to files.
    #[error("{0}: Is a directory")]
    NotAFile(String),
    /// The root folder cannot be deleted.
    #[error("cannot delete the file system root")]
    RootDelete,
}
