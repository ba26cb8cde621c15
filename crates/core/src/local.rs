//! Local directory walking
//!
//! Turns a sync root into the list of files to upload, each with its object
//! key and guessed content type.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, Result};

/// Content type used when the extension is unknown
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// A regular file found under the sync root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalFile {
    /// Absolute path on disk
    pub path: PathBuf,

    /// Object key: path relative to the root, `/`-separated
    pub key: String,

    pub size_bytes: u64,

    pub content_type: String,
}

/// Guess a content type from the extension of `key`
pub fn content_type_for(key: &str) -> &'static str {
    mime_guess::from_path(key)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Expand a leading `~` and canonicalize the sync root
pub fn resolve_root(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(path)?;
    expanded.canonicalize().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::InvalidPath(format!("path does not exist: {}", path.display()))
        } else {
            Error::Io(e)
        }
    })
}

fn expand_home(path: &Path) -> Result<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = dirs::home_dir().ok_or_else(|| {
                Error::InvalidPath("cannot expand '~': no home directory".to_string())
            })?;
            Ok(home.join(components.as_path()))
        }
        _ => Ok(path.to_path_buf()),
    }
}

/// Object key for `path` relative to `root`
pub fn object_key(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        Error::InvalidPath(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str().ok_or_else(|| {
                Error::InvalidPath(format!("non UTF-8 file name: {}", path.display()))
            })?),
            other => {
                return Err(Error::InvalidPath(format!(
                    "unexpected path component {other:?} in {}",
                    path.display()
                )));
            }
        }
    }

    if parts.is_empty() {
        return Err(Error::InvalidPath(format!(
            "{} has no name relative to the root",
            path.display()
        )));
    }

    Ok(parts.join("/"))
}

/// Resolve `pathname` and collect the files a sync of it would upload
pub fn scan(pathname: &Path) -> Result<(PathBuf, Vec<LocalFile>)> {
    let root = resolve_root(pathname)?;
    let files = walk(&root)?;
    tracing::debug!(root = %root.display(), files = files.len(), "Scanned sync root");
    Ok((root, files))
}

/// Collect every regular file under `root`, recursing into directories
///
/// Symlinks are followed, except a link back into one of its own ancestor
/// directories. Entries that are neither files nor directories are skipped,
/// as are entries whose names are not UTF-8. Each directory is visited in
/// file-name order.
pub fn walk(root: &Path) -> Result<Vec<LocalFile>> {
    let metadata = std::fs::metadata(root)?;
    if !metadata.is_dir() {
        return Err(Error::InvalidPath(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let mut ancestors = HashSet::from([root.canonicalize()?]);
    let mut files = Vec::new();
    visit_dir(root, root, &mut ancestors, &mut files)?;
    Ok(files)
}

fn visit_dir(
    root: &Path,
    dir: &Path,
    ancestors: &mut HashSet<PathBuf>,
    files: &mut Vec<LocalFile>,
) -> Result<()> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.file_name().and_then(|name| name.to_str()).is_none() {
            tracing::warn!(path = %path.display(), "Skipping non UTF-8 file name");
            continue;
        }

        let metadata = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Skipping dangling symlink");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            let real = path.canonicalize()?;
            if !ancestors.insert(real.clone()) {
                tracing::warn!(
                    path = %path.display(),
                    target = %real.display(),
                    "Skipping symlink cycle"
                );
                continue;
            }
            visit_dir(root, &path, ancestors, files)?;
            ancestors.remove(&real);
        } else if metadata.is_file() {
            let key = object_key(root, &path)?;
            let content_type = content_type_for(&key).to_string();
            files.push(LocalFile {
                path,
                key,
                size_bytes: metadata.len(),
                content_type,
            });
        }
    }

    Ok(())
}
