//! Server configuration for `textbin`.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unlike request errors, anything wrong here is fatal: the server refuses
//! to start rather than serve with a half-valid configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

/// Default storage file name, created in the storage directory.
pub const DEFAULT_STORAGE_NAME: &str = ".textbin";

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The bind address could not be parsed.
    #[error("invalid bind address '{value}': {reason}")]
    BindAddr { value: String, reason: String },

    /// The working directory could not be determined.
    #[error("unable to get working directory: {reason}")]
    WorkingDir { reason: String },

    /// The storage file name was empty.
    #[error("storage file name must not be empty")]
    EmptyStorageName,

    /// The theme is not one of the supported values.
    #[error("unsupported theme '{value}': supported themes are auto, light, dark")]
    Theme { value: String },

    /// The log format is not one of the supported values.
    #[error("unsupported log format '{value}': supported formats are json, pretty")]
    LogFormat { value: String },
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Full path to the backing file.
    pub storage_path: PathBuf,
    /// Operator-supplied API token. `None` means generate one at startup.
    pub api_token: Option<String>,
    /// Editor colour scheme.
    pub theme: Theme,
    /// Log level filter (e.g., `info`, `debug`, `trace`).
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

/// Editor colour scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    /// Follow the browser's `prefers-color-scheme`.
    #[default]
    Auto,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(ConfigError::Theme {
                value: s.to_owned(),
            }),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable, coloured output for local use.
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            _ => Err(ConfigError::LogFormat {
                value: s.to_owned(),
            }),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT`: port to bind on, binds to `0.0.0.0`
    /// - `TEXTBIN_BIND_ADDR`: full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `TEXTBIN_STORAGE_DIR`: directory holding the document (default: working directory;
    ///   `$VAR` and `${VAR}` references are expanded)
    /// - `TEXTBIN_STORAGE_NAME`: file name of the document (default: `.textbin`)
    /// - `TEXTBIN_TOKEN`: API token (default: generated at startup)
    /// - `TEXTBIN_THEME`: `auto`, `light`, or `dark` (default: `auto`)
    /// - `TEXTBIN_LOG_LEVEL`: log filter (default: `info`)
    /// - `TEXTBIN_LOG_FORMAT`: `json` or `pretty` (default: `json`)
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for any value that cannot be used.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`ServerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        // Priority: TEXTBIN_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Some(addr) = non_empty("TEXTBIN_BIND_ADDR") {
            addr.parse::<SocketAddr>().map_err(|e| ConfigError::BindAddr {
                value: addr.clone(),
                reason: e.to_string(),
            })?
        } else if let Some(port) = non_empty("PORT") {
            let port: u16 = port.parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::BindAddr {
                    value: port.clone(),
                    reason: e.to_string(),
                }
            })?;
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            SocketAddr::from(([127, 0, 0, 1], 8080))
        };

        let storage_dir = match non_empty("TEXTBIN_STORAGE_DIR") {
            Some(dir) if dir != "$(pwd)" => PathBuf::from(expand_env(&dir, &lookup)),
            _ => std::env::current_dir().map_err(|e| ConfigError::WorkingDir {
                reason: e.to_string(),
            })?,
        };

        let storage_name = lookup("TEXTBIN_STORAGE_NAME")
            .unwrap_or_else(|| DEFAULT_STORAGE_NAME.to_owned());
        if storage_name.trim().is_empty() {
            return Err(ConfigError::EmptyStorageName);
        }

        let theme = non_empty("TEXTBIN_THEME")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let log_format = non_empty("TEXTBIN_LOG_FORMAT")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();

        let log_level = non_empty("TEXTBIN_LOG_LEVEL").unwrap_or_else(|| "info".to_owned());

        Ok(Self {
            bind_addr,
            storage_path: storage_dir.join(storage_name),
            api_token: non_empty("TEXTBIN_TOKEN"),
            theme,
            log_level,
            log_format,
        })
    }
}

/// Expand `$VAR` and `${VAR}` references. Unset variables expand to nothing.
fn expand_env<F>(input: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let mut name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next();
            let mut closed = false;
            for next in chars.by_ref() {
                if next == '}' {
                    closed = true;
                    break;
                }
                name.push(next);
            }
            if !closed {
                out.push_str("${");
                out.push_str(&name);
                continue;
            }
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    name.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if name.is_empty() {
                out.push('$');
                continue;
            }
        }

        out.push_str(&lookup(&name).unwrap_or_default());
    }

    out
}
