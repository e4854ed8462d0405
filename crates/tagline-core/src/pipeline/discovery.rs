//! Dataset discovery: subject folders under a root and the images inside them.
//!
//! Only one level is ever listed at a time. Images in nested subfolders of a
//! subject folder are not picked up.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::DatasetConfig;
use crate::error::DiscoveryError;

/// Lists subject folders and their images.
pub struct DatasetDiscovery {
    config: DatasetConfig,
}

/// A subject folder and the images found directly inside it.
#[derive(Debug, Clone)]
pub struct SubjectFolder {
    /// Directory name, used as the folder label
    pub label: String,
    /// Full path to the folder
    pub path: PathBuf,
    /// Images in the folder, sorted by path
    pub images: Vec<PathBuf>,
}

/// Everything a run will touch, computed up front.
#[derive(Debug, Default)]
pub struct DatasetPlan {
    /// Folders that could be listed, in name order
    pub folders: Vec<SubjectFolder>,
    /// Folders that could not be listed
    pub skipped: Vec<(PathBuf, DiscoveryError)>,
}

impl DatasetPlan {
    /// Total number of images across all listed folders.
    pub fn image_count(&self) -> usize {
        self.folders.iter().map(|f| f.images.len()).sum()
    }
}

impl DatasetDiscovery {
    /// Create a new discovery instance.
    pub fn new(config: DatasetConfig) -> Self {
        Self { config }
    }

    /// Plan a run: list subject folders, then the images in each.
    ///
    /// Fails only when the root itself cannot be listed. Unreadable subject
    /// folders are reported once and recorded in [`DatasetPlan::skipped`].
    pub fn plan(&self, root: &Path) -> Result<DatasetPlan, DiscoveryError> {
        self.plan_with(root, |folder| self.images_in(folder))
    }

    /// [`plan`](Self::plan) with the per-folder image listing supplied by
    /// the caller.
    pub(crate) fn plan_with<F>(
        &self,
        root: &Path,
        mut list_images: F,
    ) -> Result<DatasetPlan, DiscoveryError>
    where
        F: FnMut(&Path) -> Result<Vec<PathBuf>, DiscoveryError>,
    {
        let mut plan = DatasetPlan::default();

        for path in self.subject_folders(root)? {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match list_images(&path) {
                Ok(images) => {
                    tracing::debug!("Found {} images in {}", images.len(), label);
                    plan.folders.push(SubjectFolder {
                        label,
                        path,
                        images,
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping folder {}: {e}", label);
                    plan.skipped.push((path, e));
                }
            }
        }

        Ok(plan)
    }

    /// Immediate subdirectories of `root`, sorted by name.
    ///
    /// Regular files and other non-directory entries are skipped.
    pub fn subject_folders(&self, root: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        if !root.is_dir() {
            return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
        }

        let mut folders = Vec::new();
        for entry in list_one_level(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(unreadable(root, &e)),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {e}", root);
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                folders.push(entry.into_path());
            } else {
                tracing::debug!("Skipping non-directory: {:?}", entry.file_name());
            }
        }

        Ok(folders)
    }

    /// Supported image files directly inside `folder`, sorted by name.
    pub fn images_in(&self, folder: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut images = Vec::new();
        for entry in list_one_level(folder) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => return Err(unreadable(folder, &e)),
                Err(e) => {
                    tracing::debug!("Skipping unreadable entry in {:?}: {e}", folder);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_supported(entry.path()) {
                images.push(entry.into_path());
            }
        }

        Ok(images)
    }

    /// Check if a file has a supported extension.
    fn is_supported(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn list_one_level(dir: &Path) -> walkdir::IntoIter {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
}

fn unreadable(path: &Path, err: &walkdir::Error) -> DiscoveryError {
    DiscoveryError::Unreadable {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
