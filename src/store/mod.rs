//! Persistent client-side storage.
//!
//! The app keeps exactly two pieces of durable state: the raw session token
//! and the display theme preference. Both live as small files under the CLI
//! config directory, one file per key. Nothing here validates a token; this
//! layer is storage and nothing else.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

const TOKEN_FILE: &str = "token";
const THEME_FILE: &str = "theme";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("YAM_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("yam").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Stores the raw JWT string. `set(None)` removes the file, which is how
/// logout forgets the session.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: get_config_dir()?,
        })
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Read the stored token. Any failure (missing file, unreadable dir)
    /// reads as "no token" rather than an error.
    pub fn get(&self) -> Option<String> {
        let path = self.dir.join(TOKEN_FILE);
        match fs::read_to_string(&path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                if token.is_empty() {
                    None
                } else {
                    Some(token)
                }
            }
            Err(err) => {
                if err.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("failed to read token file {}: {}", path.display(), err);
                }
                None
            }
        }
    }

    pub fn set(&self, token: Option<&str>) -> std::io::Result<()> {
        let path = self.dir.join(TOKEN_FILE);
        match token {
            Some(token) => {
                fs::create_dir_all(&self.dir)?;
                fs::write(&path, token)
            }
            None => match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err),
            },
        }
    }
}

/// Display theme, persisted alongside the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preferences {
    dir: PathBuf,
}

impl Preferences {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: get_config_dir()?,
        })
    }

    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Missing or unparseable preference falls back to the light theme.
    pub fn theme(&self) -> Theme {
        fs::read_to_string(self.dir.join(THEME_FILE))
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.dir.join(THEME_FILE), theme.as_str())
    }
}
