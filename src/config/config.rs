use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::flags::DEFAULT_FLAG_URL_BASE;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub display: DisplayConfig,
    pub directory: DirectoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Region selected when the application starts
    pub default_region: String,

    /// Nominatim-compatible search endpoint
    pub geocoder_url: String,

    /// Set to false to never send descriptions to the geocoder
    pub geocoding_enabled: bool,

    /// User-Agent sent with every HTTP request
    pub user_agent: String,

    /// Flag images are fetched from `{flag_url_base}/{region}.png`
    pub flag_url_base: String,

    /// Timeout for geocoding and flag requests, 0 disables it
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Use Unicode glyphs in the status line
    pub use_glyphs: bool,

    /// Tab shown first: "basic" or "advanced"
    pub start_tab: String,

    /// Download and draw country flags
    pub show_flag: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Additional prefix table merged over the builtin one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_prefixes_file: Option<PathBuf>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_region: "US".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            geocoding_enabled: true,
            user_agent: "phone_tracker".to_string(),
            flag_url_base: DEFAULT_FLAG_URL_BASE.to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_glyphs: true,
            start_tab: "basic".to_string(),
            show_flag: true,
        }
    }
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.lookup.default_region = config.lookup.default_region.trim().to_uppercase();
        Ok(config)
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("phone-tracker").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# Phone Tracker Configuration File
# Location: ~/.config/phone-tracker/config.toml (Linux)
#           ~/Library/Application Support/phone-tracker/config.toml (macOS)
#           %APPDATA%\phone-tracker\config.toml (Windows)

[lookup]
# Region selected at startup (ISO 3166-1 alpha-2)
default_region = "US"

# Nominatim-compatible search endpoint used to place descriptions on the map
geocoder_url = "https://nominatim.openstreetmap.org/search"

# Set to false to keep number descriptions off the network
geocoding_enabled = true

# Nominatim's usage policy requires an identifying User-Agent
user_agent = "phone_tracker"

# Flags are fetched from {flag_url_base}/{region}.png
flag_url_base = "https://flagcdn.com/w40"

# Seconds before geocoding and flag requests give up (0 = wait forever)
request_timeout_secs = 15

[display]
# Use Unicode glyphs in the status line
use_glyphs = true

# Tab shown first: "basic" or "advanced"
start_tab = "basic"

# Download and draw the country flag after a lookup
show_flag = true

[directory]
# Extra carrier/description/timezone prefixes, same format as data/prefixes.toml
# extra_prefixes_file = "/home/me/.config/phone-tracker/prefixes.toml"
"#
        .to_string()
    }
}
