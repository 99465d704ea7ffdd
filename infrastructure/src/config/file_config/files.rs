//! managing-local-files configuration from TOML (`[files]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw settings for the file-organizing recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileFilesConfig {
    /// Folder to organize; `~/Downloads` when unset
    pub target_folder: Option<PathBuf>,
}

impl FileFilesConfig {
    /// The configured folder, else `~/Downloads`.
    ///
    /// Returns `None` only when nothing is configured and the home
    /// directory cannot be determined.
    pub fn target_folder_or_default(&self) -> Option<PathBuf> {
        self.target_folder
            .clone()
            .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
    }
}
