//! Directory scanning and include-path lookup

use crate::{NormalizedPath, Result, io};
use walkdir::WalkDir;

/// Name filters applied while collecting files below a directory.
#[derive(Debug, Clone, Copy)]
pub struct FileFilter<'a> {
    /// Required file-name prefix (empty matches everything)
    pub prefix: &'a str,
    /// Required file-name suffix
    pub suffix: &'a str,
    /// Files or directories whose subtrees are skipped
    pub exclude: &'a [NormalizedPath],
}

impl FileFilter<'_> {
    fn matches(&self, path: &NormalizedPath, exclude: &[NormalizedPath]) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        name.starts_with(self.prefix)
            && name.ends_with(self.suffix)
            && !exclude.iter().any(|excluded| path.starts_with(excluded))
    }
}

/// Collect every file below `dir` that passes `filter`, sorted by path.
///
/// The directory and the exclusion list are canonicalized first so that
/// `dir/./sub` and `dir/sub` refer to the same files. Entries that cannot be
/// read are skipped with a warning; a missing `dir` is an error.
pub fn collect_files(dir: &NormalizedPath, filter: &FileFilter<'_>) -> Result<Vec<NormalizedPath>> {
    let root = io::canonicalize(dir)?;
    let exclude: Vec<NormalizedPath> = filter
        .exclude
        .iter()
        .map(|path| io::canonicalize(path).unwrap_or_else(|_| path.clone()))
        .collect();

    let mut files = Vec::new();
    for entry in WalkDir::new(root.to_native())
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %root, error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = NormalizedPath::new(entry.path());
        if filter.matches(&path, &exclude) {
            files.push(path);
        }
    }

    tracing::debug!(dir = %root, count = files.len(), "Collected files");
    Ok(files)
}

/// Find `relative` below the first include-path directory that contains it.
pub fn resolve_in_include_path(relative: &str, dirs: &[NormalizedPath]) -> Option<NormalizedPath> {
    dirs.iter()
        .map(|dir| dir.join(relative))
        .find(|candidate| candidate.exists())
}
