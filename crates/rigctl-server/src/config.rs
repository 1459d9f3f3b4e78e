//! Responder configuration

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use rigctl_sim::VirtualRadioConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Port the responder listens on unless configured otherwise
///
/// Standard rigctld uses 4532; this responder has historically used 19090.
pub const DEFAULT_PORT: u16 = 19090;

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "RIGCTL_RESPONDER_CONFIG";

/// Environment variable overriding the listening port
pub const PORT_ENV: &str = "RIGCTL_RESPONDER_PORT";

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,
    /// TCP port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Reject malformed numeric arguments with `RPRT -1` instead of
    /// reading them as zero
    #[serde(default)]
    pub strict_arguments: bool,
    /// Initial state of the simulated radio
    #[serde(default)]
    pub radio: VirtualRadioConfig,
}

fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: DEFAULT_PORT,
            strict_arguments: false,
            radio: VirtualRadioConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.port)
    }

    /// Get the XDG config directory for the responder
    /// Uses $XDG_CONFIG_HOME/rigctl-responder, falls back to ~/.config/rigctl-responder
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("rigctl-responder"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("rigctl-responder"))
    }

    /// Default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Parse a config from JSON text
    pub fn from_json(path: &Path, json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(path, &json)
    }

    /// Resolve the config for startup
    ///
    /// An explicitly named file must load. Without one, the default path is
    /// tried and anything unreadable there falls back to defaults.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(&path);
        }

        Ok(Self::default_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::load(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!("Ignoring config: {}", e);
                    None
                }
            })
            .unwrap_or_default())
    }

    /// Apply a port override such as the value of [`PORT_ENV`]
    pub fn with_port_override(mut self, value: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(value) = value {
            self.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(value.to_string()))?;
        }
        Ok(self)
    }
}
