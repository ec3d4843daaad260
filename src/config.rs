use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub announcer: AnnouncerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 2333,
        }
    }
}

/// Where sound assets come from. Roots may be http(s) URLs or local
/// directories. Catalogue paths already carry the `/sounds/...` prefix
/// and are joined onto `fixed_root`; event sound paths are bare file
/// names joined onto `custom_root`.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SoundsConfig {
    pub fixed_root: String,
    pub custom_root: String,
    /// Directory the hub serves under /sounds, if any.
    pub serve_dir: Option<String>,
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            fixed_root: ".".to_string(),
            custom_root: "./sounds/custom".to_string(),
            serve_dir: Some("./sounds".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StoreConfig {
    /// JSON fixture file loaded into the memory store at startup.
    pub fixture: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AnnouncerConfig {
    pub hub_url: String,
    pub event_id: i64,
    /// Rotating code; its sha-256 is presented on connect.
    pub socket_code: Option<String>,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            hub_url: "ws://127.0.0.1:2333/ws".to_string(),
            event_id: 1,
            socket_code: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

impl Config {
    /// Load from the first CLI argument or `./config.toml`; a missing
    /// file is not an error, defaults apply.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        match std::fs::read_to_string(path) {
            Ok(config_str) => {
                let config: Config = toml::from_str(&config_str)?;
                Ok(config)
            }
            Err(_) => {
                // runs before the subscriber is installed
                eprintln!("{} not found, using default configuration", path);
                Ok(Config::default())
            }
        }
    }
}
