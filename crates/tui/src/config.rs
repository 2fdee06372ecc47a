use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::persist;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    pub data_dir: Option<PathBuf>,
    pub clipboard: Option<bool>,
    pub log_file: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub data_dir: Option<PathBuf>,
    pub clipboard: bool,
    pub log_file: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: persist::default_data_dir(),
            clipboard: true,
            log_file: true,
        }
    }
}

impl Settings {
    /// Settings from `config.toml` and the environment. Problems with the
    /// file are returned as warnings rather than errors, since logging is not
    /// up yet when this runs.
    pub fn load() -> (Self, Vec<String>) {
        let mut warnings = Vec::new();
        let mut file_cfg = FileConfig::default();
        if let Some(path) = persist::config_path() {
            if path.exists() {
                match fs::read_to_string(&path) {
                    Ok(text) => match toml::from_str::<FileConfig>(&text) {
                        Ok(c) => file_cfg = c,
                        Err(e) => warnings.push(format!("ignoring {}: {}", path.display(), e)),
                    },
                    Err(e) => warnings.push(format!("read {}: {}", path.display(), e)),
                }
            }
        }
        let s = Self::resolve(file_cfg, |k| env::var(k).ok());
        (s, warnings)
    }

    pub fn resolve(file_cfg: FileConfig, var: impl Fn(&str) -> Option<String>) -> Self {
        let mut s = Settings::default();
        if let Some(d) = file_cfg.data_dir {
            s.data_dir = Some(d);
        }
        if let Some(c) = file_cfg.clipboard {
            s.clipboard = c;
        }
        if let Some(l) = file_cfg.log_file {
            s.log_file = l;
        }
        if let Some(d) = var("RESO_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            s.data_dir = Some(PathBuf::from(d));
        }
        if var("RESO_NO_CLIPBOARD").is_some_and(|v| !matches!(v.as_str(), "" | "0" | "false")) {
            s.clipboard = false;
        }
        s
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|d| d.join("logs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn empty_file_keeps_defaults() {
        let f: FileConfig = toml::from_str("").unwrap();
        let s = Settings::resolve(f, no_env);
        assert!(s.clipboard);
        assert!(s.log_file);
    }

    #[test]
    fn file_values_apply() {
        let f: FileConfig = toml::from_str(
            r#"
            data_dir = "/tmp/reso-data"
            clipboard = false
            log_file = false
            "#,
        )
        .unwrap();
        let s = Settings::resolve(f, no_env);
        assert_eq!(s.data_dir, Some(PathBuf::from("/tmp/reso-data")));
        assert!(!s.clipboard);
        assert!(!s.log_file);
        assert_eq!(s.log_dir(), Some(PathBuf::from("/tmp/reso-data/logs")));
    }

    #[test]
    fn env_overrides_file() {
        let f = FileConfig {
            data_dir: Some(PathBuf::from("/from/file")),
            clipboard: Some(true),
            log_file: None,
        };
        let s = Settings::resolve(f, |k| match k {
            "RESO_DATA_DIR" => Some("/from/env".into()),
            "RESO_NO_CLIPBOARD" => Some("1".into()),
            _ => None,
        });
        assert_eq!(s.data_dir, Some(PathBuf::from("/from/env")));
        assert!(!s.clipboard);
    }

    #[test]
    fn falsy_no_clipboard_is_ignored() {
        let s = Settings::resolve(FileConfig::default(), |k| {
            (k == "RESO_NO_CLIPBOARD").then(|| "0".to_string())
        });
        assert!(s.clipboard);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(toml::from_str::<FileConfig>("clipboard = maybe").is_err());
    }
}
