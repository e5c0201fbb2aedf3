use std::env;
use std::path::PathBuf;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// `BULLPEN_BIND` and `BULLPEN_DATA_DIR`; blank values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            bind_addr: non_empty_var("BULLPEN_BIND")
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            data_dir: non_empty_var("BULLPEN_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}
