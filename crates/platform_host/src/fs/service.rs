//! Virtual file system service contract and the in-memory tree that backs it.

use std::collections::HashSet;

use super::path::{join_child_path, normalize_virtual_path};
use super::types::{extension_of, FileSystemNode, FsError, NodeKind, ROOT_NODE_ID};
use crate::time::unix_time_ms_now;

const SAMPLE_SCRIPT: &str = r#"// Sample Fluxo Script
console.log:("Hello from Fluxo!")

// Window manipulation example
local win = window("win-1")
win.move:(100, 100)
win.resize:(800, 600)"#;

/// Host service for virtual file system lookups and mutations.
///
/// All operations complete synchronously. Reads return owned snapshots so callers never hold a
/// borrow into the tree across a mutation.
pub trait VirtualFsService {
    /// Returns the node with `id`.
    fn get_node_by_id(&self, id: &str) -> Option<FileSystemNode>;

    /// Returns the node at `path` after normalization.
    fn get_node_by_path(&self, path: &str) -> Option<FileSystemNode>;

    /// Returns the direct children of `parent_id` in creation order.
    fn get_node_children(&self, parent_id: &str) -> Vec<FileSystemNode>;

    /// Creates a file under `parent_id` (`None` means the root).
    fn create_file(
        &mut self,
        parent_id: Option<&str>,
        name: &str,
        content: &str,
    ) -> Result<FileSystemNode, FsError>;

    /// Creates a folder under `parent_id` (`None` means the root).
    fn create_folder(
        &mut self,
        parent_id: Option<&str>,
        name: &str,
    ) -> Result<FileSystemNode, FsError>;

    /// Replaces the content of a file and bumps its modification time.
    fn update_file_content(&mut self, id: &str, content: &str) -> Result<FileSystemNode, FsError>;

    /// Deletes a node and every node whose parent chain passes through it.
    ///
    /// Returns the ids that were removed.
    fn delete_node(&mut self, id: &str) -> Result<Vec<String>, FsError>;
}

#[derive(Debug, Clone, PartialEq)]
/// In-memory virtual file system seeded with the default desktop tree.
pub struct MemoryVirtualFs {
    nodes: Vec<FileSystemNode>,
    next_node_id: u64,
}

impl Default for MemoryVirtualFs {
    fn default() -> Self {
        let now = unix_time_ms_now();
        let folder = |id: &str, name: &str, path: &str, parent: Option<&str>| FileSystemNode {
            id: id.to_string(),
            name: name.to_string(),
            kind: NodeKind::Folder,
            path: path.to_string(),
            parent_id: parent.map(str::to_string),
            content: None,
            extension: None,
            created_at_unix_ms: now,
            modified_at_unix_ms: now,
        };

        let nodes = vec![
            folder(ROOT_NODE_ID, "/", "/", None),
            folder("system", "System", "/System", Some(ROOT_NODE_ID)),
            folder("library", "Library", "/System/Library", Some("system")),
            folder("ui", "UI", "/System/Library/UI", Some("library")),
            folder(
                "components",
                "Components",
                "/System/Library/UI/Components",
                Some("ui"),
            ),
            folder("documents", "Documents", "/Documents", Some(ROOT_NODE_ID)),
            folder("scripts", "Scripts", "/Documents/Scripts", Some("documents")),
            FileSystemNode {
                id: "sample-script".to_string(),
                name: "hello.fxo".to_string(),
                kind: NodeKind::File,
                path: "/Documents/Scripts/hello.fxo".to_string(),
                parent_id: Some("scripts".to_string()),
                content: Some(SAMPLE_SCRIPT.to_string()),
                extension: Some("fxo".to_string()),
                created_at_unix_ms: now,
                modified_at_unix_ms: now,
            },
        ];

        Self {
            nodes,
            next_node_id: 1,
        }
    }
}

impl MemoryVirtualFs {
    /// Creates a tree holding only the root folder.
    pub fn empty() -> Self {
        let mut fs = Self::default();
        fs.nodes.truncate(1);
        fs
    }

    /// Returns every node in creation order.
    pub fn nodes(&self) -> &[FileSystemNode] {
        &self.nodes
    }

    fn allocate_id(&mut self) -> String {
        let id = format!("node-{}", self.next_node_id);
        self.next_node_id = self.next_node_id.saturating_add(1);
        id
    }

    fn create_node(
        &mut self,
        parent_id: Option<&str>,
        name: &str,
        kind: NodeKind,
        content: Option<&str>,
    ) -> Result<FileSystemNode, FsError> {
        let name = name.trim();
        if name.is_empty() || name.contains('/') || name == "." || name == ".." {
            return Err(FsError::InvalidName(name.to_string()));
        }

        let parent_id = parent_id.unwrap_or(ROOT_NODE_ID);
        let parent = self
            .nodes
            .iter()
            .find(|node| node.id == parent_id)
            .ok_or_else(|| FsError::NotFound(parent_id.to_string()))?;
        if !parent.is_folder() {
            return Err(FsError::ParentNotFolder(parent_id.to_string()));
        }

        let path = join_child_path(&parent.path, name);
        if self.nodes.iter().any(|node| node.path == path) {
            return Err(FsError::AlreadyExists(path));
        }

        let now = unix_time_ms_now();
        let node = FileSystemNode {
            id: self.allocate_id(),
            name: name.to_string(),
            kind,
            path,
            parent_id: Some(parent_id.to_string()),
            content: content.map(str::to_string),
            extension: match kind {
                NodeKind::File => extension_of(name),
                NodeKind::Folder => None,
            },
            created_at_unix_ms: now,
            modified_at_unix_ms: now,
        };
        tracing::debug!(path = %node.path, kind = ?node.kind, "created virtual fs node");
        self.nodes.push(node.clone());
        Ok(node)
    }
}

impl VirtualFsService for MemoryVirtualFs {
    fn get_node_by_id(&self, id: &str) -> Option<FileSystemNode> {
        self.nodes.iter().find(|node| node.id == id).cloned()
    }

    fn get_node_by_path(&self, path: &str) -> Option<FileSystemNode> {
        let normalized = normalize_virtual_path(path);
        self.nodes
            .iter()
            .find(|node| node.path == normalized)
            .cloned()
    }

    fn get_node_children(&self, parent_id: &str) -> Vec<FileSystemNode> {
        self.nodes
            .iter()
            .filter(|node| node.parent_id.as_deref() == Some(parent_id))
            .cloned()
            .collect()
    }

    fn create_file(
        &mut self,
        parent_id: Option<&str>,
        name: &str,
        content: &str,
    ) -> Result<FileSystemNode, FsError> {
        self.create_node(parent_id, name, NodeKind::File, Some(content))
    }

    fn create_folder(
        &mut self,
        parent_id: Option<&str>,
        name: &str,
    ) -> Result<FileSystemNode, FsError> {
        self.create_node(parent_id, name, NodeKind::Folder, None)
    }

    fn update_file_content(&mut self, id: &str, content: &str) -> Result<FileSystemNode, FsError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| FsError::NotFound(id.to_string()))?;
        if !node.is_file() {
            return Err(FsError::NotAFile(node.path.clone()));
        }
        node.content = Some(content.to_string());
        node.modified_at_unix_ms = unix_time_ms_now().max(node.modified_at_unix_ms);
        Ok(node.clone())
    }

    fn delete_node(&mut self, id: &str) -> Result<Vec<String>, FsError> {
        if id == ROOT_NODE_ID {
            return Err(FsError::RootDelete);
        }
        if !self.nodes.iter().any(|node| node.id == id) {
            return Err(FsError::NotFound(id.to_string()));
        }

        // Walk parent links outward from `id` until no new descendants appear.
        let mut doomed = HashSet::from([id.to_string()]);
        let mut frontier = vec![id.to_string()];
        while let Some(parent) = frontier.pop() {
            for child in self
                .nodes
                .iter()
                .filter(|node| node.parent_id.as_deref() == Some(parent.as_str()))
            {
                if doomed.insert(child.id.clone()) {
                    frontier.push(child.id.clone());
                }
            }
        }

        let removed = self
            .nodes
            .iter()
            .filter(|node| doomed.contains(&node.id))
            .map(|node| node.id.clone())
            .collect::<Vec<_>>();
        self.nodes.retain(|node| !doomed.contains(&node.id));
        tracing::debug!(id, removed = removed.len(), "deleted virtual fs subtree");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_tree_materializes_paths_from_parents() {
        let fs = MemoryVirtualFs::default();
        for node in fs.nodes() {
            let Some(parent_id) = node.parent_id.as_deref() else {
                assert_eq!(node.path, "/");
                continue;
            };
            let parent = fs.get_node_by_id(parent_id).expect("parent exists");
            assert_eq!(node.path, join_child_path(&parent.path, &node.name));
        }
    }

    #[test]
    fn lookup_by_path_normalizes_input() {
        let fs = MemoryVirtualFs::default();
        let node = fs
            .get_node_by_path("Documents/./Scripts/../Scripts/hello.fxo")
            .expect("sample script");
        assert_eq!(node.id, "sample-script");
        assert!(fs.get_node_by_path("/nonexistent").is_none());
    }

    #[test]
    fn children_are_listed_in_creation_order() {
        let mut fs = MemoryVirtualFs::empty();
        fs.create_folder(None, "b").expect("b");
        fs.create_file(None, "a.txt", "").expect("a");
        let names = fs
            .get_node_children(ROOT_NODE_ID)
            .into_iter()
            .map(|node| node.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["b".to_string(), "a.txt".to_string()]);
    }

    #[test]
    fn create_file_derives_extension_and_parent_path() {
        let mut fs = MemoryVirtualFs::default();
        let file = fs
            .create_file(Some("scripts"), "demo.fxo", "console.log:(1)")
            .expect("create");
        assert_eq!(file.path, "/Documents/Scripts/demo.fxo");
        assert_eq!(file.extension.as_deref(), Some("fxo"));
        assert_eq!(file.parent_id.as_deref(), Some("scripts"));
    }

    #[test]
    fn create_rejects_duplicates_bad_names_and_file_parents() {
        let mut fs = MemoryVirtualFs::default();
        assert_eq!(
            fs.create_folder(None, "Documents"),
            Err(FsError::AlreadyExists("/Documents".to_string()))
        );
        assert_eq!(
            fs.create_folder(None, "a/b"),
            Err(FsError::InvalidName("a/b".to_string()))
        );
        assert_eq!(
            fs.create_file(Some("sample-script"), "x", ""),
            Err(FsError::ParentNotFolder("sample-script".to_string()))
        );
        assert_eq!(
            fs.create_file(Some("missing"), "x", ""),
            Err(FsError::NotFound("missing".to_string()))
        );
    }

    #[test]
    fn delete_cascades_through_parent_chain_only() {
        let mut fs = MemoryVirtualFs::default();
        let folder = fs.create_folder(None, "X").expect("X");
        let inner = fs.create_folder(Some(folder.id.as_str()), "inner").expect("inner");
        let leaf = fs.create_file(Some(inner.id.as_str()), "leaf.txt", "").expect("leaf");
        // A sibling whose path shares the `/X` prefix must survive.
        let sibling = fs.create_folder(None, "XY").expect("XY");
        let before = fs.nodes().len();

        let mut removed = fs.delete_node(&folder.id).expect("delete");
        removed.sort();
        let mut expected = vec![folder.id.clone(), inner.id.clone(), leaf.id.clone()];
        expected.sort();
        assert_eq!(removed, expected);
        assert_eq!(fs.nodes().len(), before - 3);
        assert!(fs.get_node_by_id(&sibling.id).is_some());
        assert!(fs.get_node_by_path("/X/inner/leaf.txt").is_none());
    }

    #[test]
    fn delete_rejects_root_and_unknown_ids() {
        let mut fs = MemoryVirtualFs::default();
        assert_eq!(fs.delete_node(ROOT_NODE_ID), Err(FsError::RootDelete));
        assert_eq!(
            fs.delete_node("nope"),
            Err(FsError::NotFound("nope".to_string()))
        );
    }

    #[test]
    fn update_content_only_applies_to_files() {
        let mut fs = MemoryVirtualFs::default();
        let updated = fs
            .update_file_content("sample-script", "console.log:(\"hi\")")
            .expect("update");
        assert_eq!(updated.content.as_deref(), Some("console.log:(\"hi\")"));
        assert_eq!(
            fs.update_file_content("documents", "x"),
            Err(FsError::NotAFile("/Documents".to_string()))
        );
    }
}
