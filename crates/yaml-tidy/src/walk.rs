//! select the yaml files below a root directory
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// How a directory name is compared against the skip list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirMatch {
    #[default]
    Exact,
    Substring,
}

#[derive(derive_new::new, Debug, Clone, Default)]
pub struct FileFilter {
    /// directory names that are not descended into
    skip_dirs: Vec<String>,
    /// exact file names that are never selected
    skip_files: Vec<String>,
    dir_match: DirMatch,
}

impl FileFilter {
    /// All `.yml` and `.yaml` files below `root`, sorted by path
    ///
    /// Unreadable entries are logged and skipped.
    pub fn collect(&self, root: &Path) -> Result<Vec<PathBuf>, WalkError> {
        if !root.is_dir() {
            return Err(WalkError::NotADirectory(root.to_owned()));
        }

        let mut files = vec![];
        let walker = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    tracing::warn!(%error, "skipping unreadable entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if self.skip_files.contains(&name) {
                tracing::debug!(path=%entry.path().display(), "file skipped");
                continue;
            }

            if is_yaml(&name) {
                files.push(entry.into_path());
            }
        }

        tracing::debug!(files = files.len(), root=%root.display(), "collected files");
        Ok(files)
    }

    fn is_skipped_dir(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        let skipped = self.skip_dirs.iter().any(|skip| match self.dir_match {
            DirMatch::Exact => *skip == name,
            DirMatch::Substring => name.contains(skip.as_str()),
        });

        if skipped {
            tracing::debug!(path=%entry.path().display(), "directory skipped");
        }
        skipped
    }
}

fn is_yaml(file_name: &str) -> bool {
    file_name.ends_with(".yml") || file_name.ends_with(".yaml")
}

#[derive(thiserror::Error, Debug)]
pub enum WalkError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
}
