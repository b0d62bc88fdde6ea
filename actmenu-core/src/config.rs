//! Menu configuration and its loading from the standard config locations.

use crate::error::ConfigError;
use serde::Deserialize;
use smol::fs;
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

/// Prefix of the XDG directories the configuration is looked up in.
pub const CONFIG_PREFIX: &str = "actmenu";

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "menu.toml";

/// Default height of a strip row.
pub const ROW_HEIGHT: f64 = 48.0;

/// actmenu Menu Configuration Structure.
///
/// Supplied once when a controller is built; submenus inherit it.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuConfig {
    /// Height of the rows of the default action strips.
    pub row_height: f64,
    /// If surrogates show icons initially.
    pub show_icons: bool,
    /// Maximum number of entries the default primary strip accepts. [None] means unlimited.
    pub primary_strip_capacity: Option<usize>,
    /// Maximum number of entries the default secondary strip accepts. [None] means unlimited.
    pub secondary_strip_capacity: Option<usize>,
    /// If submenus regenerated by action providers show icons.
    pub provider_submenu_icons: bool,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            row_height: ROW_HEIGHT,
            show_icons: false,
            primary_strip_capacity: None,
            secondary_strip_capacity: None,
            provider_submenu_icons: true,
        }
    }
}

/// A partial configuration as found in one file. Missing keys keep the current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuSettings {
    /// See [MenuConfig::row_height].
    pub row_height: Option<f64>,
    /// See [MenuConfig::show_icons].
    pub show_icons: Option<bool>,
    /// See [MenuConfig::primary_strip_capacity].
    pub primary_strip_capacity: Option<usize>,
    /// See [MenuConfig::secondary_strip_capacity].
    pub secondary_strip_capacity: Option<usize>,
    /// See [MenuConfig::provider_submenu_icons].
    pub provider_submenu_icons: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    menu: MenuSettings,
}

impl MenuConfig {
    /// Parse a configuration from TOML, starting from the defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.merge_toml_str(content)?;
        Ok(config)
    }

    /// Merge the `[menu]` table of a TOML document into this configuration.
    pub fn merge_toml_str(&mut self, content: &str) -> Result<(), ConfigError> {
        let file: ConfigFile = toml::from_str(content)?;
        self.merge(file.menu)
    }

    /// Merge loaded settings. Only keys present in `settings` override.
    pub fn merge(&mut self, settings: MenuSettings) -> Result<(), ConfigError> {
        if let Some(row_height) = settings.row_height {
            if !row_height.is_finite() || row_height <= 0.0 {
                return Err(ConfigError::InvalidValue(
                    "row_height",
                    row_height.to_string(),
                ));
            }
            self.row_height = row_height;
        }
        if let Some(show_icons) = settings.show_icons {
            self.show_icons = show_icons;
        }
        if settings.primary_strip_capacity.is_some() {
            self.primary_strip_capacity = settings.primary_strip_capacity;
        }
        if settings.secondary_strip_capacity.is_some() {
            self.secondary_strip_capacity = settings.secondary_strip_capacity;
        }
        if let Some(icons) = settings.provider_submenu_icons {
            self.provider_submenu_icons = icons;
        }
        Ok(())
    }

    /// Load configuration from standard locations in precedence order.
    ///
    /// Order (later overrides earlier):
    /// 1. System Data: /usr/share/actmenu/menu.toml (and XDG_DATA_DIRS)
    /// 2. System Config: /etc/xdg/actmenu/menu.toml (and XDG_CONFIG_DIRS)
    /// 3. User Config: ~/.config/actmenu/menu.toml (XDG_CONFIG_HOME)
    ///
    /// Unreadable or invalid files are logged and skipped.
    pub async fn load() -> anyhow::Result<Self> {
        let xdg_dirs = BaseDirectories::with_prefix(CONFIG_PREFIX)?;
        let mut config = Self::default();

        for path in Self::candidate_paths(&xdg_dirs) {
            config.load_file(&path).await;
        }

        Ok(config)
    }

    /// Load configuration from explicit paths, in order. Each path reports its own result.
    pub async fn load_from_paths(&mut self, paths: Vec<PathBuf>) -> Vec<anyhow::Result<()>> {
        let mut results = Vec::new();

        for path in paths {
            let result = async {
                let content = fs::read_to_string(&path).await.map_err(|e| {
                    anyhow::anyhow!("Failed to read menu config {:?}: {}", path, e)
                })?;

                self.merge_toml_str(&content).map_err(|e| {
                    anyhow::anyhow!("Failed to parse menu config {:?}: {}", path, e)
                })?;
                Ok::<(), anyhow::Error>(())
            }
            .await;

            results.push(result);
        }

        results
    }

    fn candidate_paths(xdg_dirs: &BaseDirectories) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = xdg_dirs.find_data_files(CONFIG_FILE).rev().collect();
        paths.extend(xdg_dirs.find_config_files(CONFIG_FILE).rev());

        let user_config_path = xdg_dirs.get_config_home().join(CONFIG_FILE);
        if user_config_path.exists() && !paths.contains(&user_config_path) {
            paths.push(user_config_path);
        }
        paths
    }

    async fn load_file(&mut self, path: &Path) {
        log::info!("Loading menu config from: {:?}", path);
        match fs::read_to_string(path).await {
            Ok(content) => {
                if let Err(e) = self.merge_toml_str(&content) {
                    log::error!("Failed to parse menu config {:?}: {}", path, e);
                }
            },
            Err(e) => {
                log::warn!("Failed to read menu config {:?}: {}", path, e);
            },
        }
    }
}
