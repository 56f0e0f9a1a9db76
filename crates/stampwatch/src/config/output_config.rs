use std::path::PathBuf;

use directories::UserDirs;
use serde::{Deserialize, Serialize};

/// Where new logs are created.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for new logs (None = documents folder, then home).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl OutputConfig {
    /// Directory new logs are created in.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.directory {
            return Some(dir.clone());
        }
        let dirs = UserDirs::new()?;
        Some(
            dirs.document_dir()
                .unwrap_or_else(|| dirs.home_dir())
                .to_path_buf(),
        )
    }
}
