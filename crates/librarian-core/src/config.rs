use std::path::{Path, PathBuf};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Base URL of the backend API, without a trailing slash.
    pub api_base: String,
    /// Directory for client-local state (conversation handle, logs).
    pub data_dir: PathBuf,
}

impl CoreConfig {
    pub fn new<S: Into<String>, P: AsRef<Path>>(api_base: S, data_dir: P) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    /// Environment takes precedence over the built-in defaults; CLI flags are
    /// applied on top by the caller.
    pub fn from_env() -> Self {
        let api_base =
            std::env::var("LIBRARIAN_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        Self::new(api_base, default_data_dir())
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, default_data_dir())
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("librarian"))
        .unwrap_or_else(|| PathBuf::from("librarian_data"))
}
