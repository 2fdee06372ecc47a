use std::path::PathBuf;

use directories::BaseDirs;
use reso_core::storage::{FileStore, KeyValueStore, MemoryStore};
use tracing::{info, warn};

use crate::config::Settings;

pub fn config_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let p = if cfg!(target_os = "windows") {
        base.home_dir().join(".reso").join("config.toml")
    } else {
        base.config_dir().join("reso").join("config.toml")
    };
    Some(p)
}

pub fn default_data_dir() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    Some(base.data_dir().join("reso"))
}

/// History storage for these settings. Without a data directory the history
/// still works for the session but is not kept.
pub fn open_store(settings: &Settings) -> Box<dyn KeyValueStore> {
    match &settings.data_dir {
        Some(dir) => {
            info!(target: "tui", "history stored in {}", dir.display());
            Box::new(FileStore::new(dir))
        }
        None => {
            warn!(target: "tui", "no data directory; history will not persist");
            Box::new(MemoryStore::new())
        }
    }
}
