//! Path handling for the virtual file system.
//!
//! Stored paths are absolute, `/`-separated, and never end in `/` except for the root itself.
//! User-typed paths may be relative to the root and may contain `.`, `..`, backslashes, or
//! repeated separators; [`normalize_virtual_path`] maps them onto the stored form.

/// Root path.
pub const ROOT_PATH: &str = "/";

/// Resolves `path` into its component names, applying `.` and `..`.
///
/// `..` at the root stays at the root.
pub fn path_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for part in path.trim().split(['/', '\\']) {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }
    segments
}

/// Maps a user-typed path onto the stored absolute form.
pub fn normalize_virtual_path(path: &str) -> String {
    path_segments(path)
        .into_iter()
        .fold(ROOT_PATH.to_string(), |parent, name| {
            join_child_path(&parent, name)
        })
}

/// Path of a child named `name` under `parent_path`.
pub fn join_child_path(parent_path: &str, name: &str) -> String {
    if parent_path == ROOT_PATH {
        format!("{ROOT_PATH}{name}")
    } else {
        format!("{parent_path}/{name}")
    }
}
