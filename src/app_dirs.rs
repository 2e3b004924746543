use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("", "", "nextguest")
            .map(|pd| pd.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn state_dir() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("nextguest")
        } else {
            ProjectDirs::from("", "", "nextguest")
                .map(|pd| pd.data_local_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    pub fn prefs_path() -> PathBuf {
        Self::config_dir().join("prefs.json")
    }

    pub fn log_dir() -> PathBuf {
        Self::state_dir()
    }

    pub fn last_result_path() -> PathBuf {
        Self::state_dir().join("last_result.txt")
    }
}
