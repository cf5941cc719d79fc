use platform_host::{FsError, VirtualFsService};
use system_shell_contract::{ShellError, ShellErrorCode};

const FOLDER_MARKER: &str = "📁";
const FILE_MARKER: &str = "📄";

pub(super) fn ls<F: VirtualFsService + ?Sized>(fs: &F, path: &str) -> String {
    let Some(node) = fs.get_node_by_path(path) else {
        return format!("ls: {path}: No such file or directory");
    };
    if node.is_file() {
        return node.name;
    }
    let children = fs.get_node_children(&node.id);
    if children.is_empty() {
        return "(empty directory)".to_string();
    }
    children
        .iter()
        .map(|child| {
            let marker = if child.is_folder() {
                FOLDER_MARKER
            } else {
                FILE_MARKER
            };
            format!("{marker} {}", child.name)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub(super) fn cat<F: VirtualFsService + ?Sized>(fs: &F, path: &str) -> String {
    let Some(node) = fs.get_node_by_path(path) else {
        return format!("cat: {path}: No such file or directory");
    };
    if node.is_folder() {
        return format!("cat: {path}: Is a directory");
    }
    match node.content {
        Some(content) if !content.is_empty() => content,
        _ => "(empty file)".to_string(),
    }
}

pub(super) fn mkdir<F: VirtualFsService + ?Sized>(
    fs: &mut F,
    name: &str,
) -> Result<String, ShellError> {
    fs.create_folder(None, name).map_err(fs_error)?;
    Ok(format!("Created folder: {name}"))
}

pub(super) fn touch<F: VirtualFsService + ?Sized>(
    fs: &mut F,
    name: &str,
) -> Result<String, ShellError> {
    fs.create_file(None, name, "").map_err(fs_error)?;
    Ok(format!("Created file: {name}"))
}

fn fs_error(err: FsError) -> ShellError {
    let code = match &err {
        FsError::NotFound(_) => ShellErrorCode::NotFound,
        FsError::AlreadyExists(_) => ShellErrorCode::Conflict,
        FsError::ParentNotFolder(_)
        | FsError::InvalidName(_)
        | FsError::NotAFile(_)
        | FsError::RootDelete => ShellErrorCode::Usage,
    };
    ShellError::new(code, err.to_string())
}
