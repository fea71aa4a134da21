/// Recursive file lookup under a root directory
///
/// Walk order is fixed so duplicate names always resolve the same way:
/// inside each directory the plain files are checked before any
/// subdirectory is entered, and siblings are visited by file name.

use crate::props::PROPS_SUFFIX;
use log::{debug, warn};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A props dump found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropsFile {
    /// Material name, the file name without `.props.txt`
    pub material: String,
    pub path: PathBuf,
}

fn files_before_dirs(a: &DirEntry, b: &DirEntry) -> Ordering {
    let a_dir = a.file_type().is_dir();
    let b_dir = b.file_type().is_dir();
    a_dir
        .cmp(&b_dir)
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Every non-directory entry under root, in walk order
/// Unreadable entries are skipped, symlinks are not followed
fn walk_files(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .sort_by(files_before_dirs)
        .into_iter()
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!("Skipping unreadable entry: {}", err);
                None
            }
        })
        .filter(|e| !e.file_type().is_dir())
}

/// Find the first file named exactly `file_name` anywhere under `root`
pub fn locate(root: &Path, file_name: &str) -> Option<PathBuf> {
    if !root.is_dir() {
        warn!("Root folder is not a directory: {:?}", root);
        return None;
    }

    let found = walk_files(root)
        .find(|entry| entry.file_name() == file_name)
        .map(DirEntry::into_path);

    match &found {
        Some(path) => debug!("Located {} at {:?}", file_name, path),
        None => debug!("{} not found under {:?}", file_name, root),
    }
    found
}

/// Find every `<Material>.props.txt` under `root`, in walk order
pub fn find_props_files(root: &Path) -> Vec<PropsFile> {
    if !root.is_dir() {
        warn!("Root folder is not a directory: {:?}", root);
        return Vec::new();
    }

    let files: Vec<PropsFile> = walk_files(root)
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?;
            let material = name.strip_suffix(PROPS_SUFFIX)?;
            if material.is_empty() {
                return None;
            }
            Some(PropsFile {
                material: material.to_string(),
                path: entry.path().to_path_buf(),
            })
        })
        .collect();

    debug!("Found {} props files under {:?}", files.len(), root);
    files
}
