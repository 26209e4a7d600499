use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "hangr").map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("hangr");
            Some(state_dir.join("hangr.log"))
        } else {
            ProjectDirs::from("", "", "hangr")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("hangr.log"))
        }
    }
}
