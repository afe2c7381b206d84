use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.capctl.dev/v1";

/// User profile configuration, read from `~/.config/capctl/config.yaml`.
/// Every field is optional; a missing file means an all-default profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    /// Preferred indent width for JSON/YAML output.
    #[serde(default)]
    pub indent: Option<usize>,
}

impl Profile {
    /// Load the profile, falling back to defaults when the file is absent
    /// or unreadable.
    pub fn load() -> Profile {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_default(),
            _ => Profile::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Profile> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&text)?)
    }

    fn config_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(".config/capctl/config.yaml"))
    }

    /// API base URL. `CAPCTL_API_URL` overrides the profile; the public
    /// endpoint applies last.
    pub fn api_url(&self) -> String {
        std::env::var("CAPCTL_API_URL")
            .ok()
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// API token. `CAPCTL_TOKEN` overrides the profile.
    pub fn api_token(&self) -> Option<String> {
        std::env::var("CAPCTL_TOKEN").ok().or_else(|| self.token.clone())
    }
}
