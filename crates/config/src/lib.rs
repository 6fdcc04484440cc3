use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "bunch.toml",
    "config/bunch.toml",
    "crates/config/bunch.toml",
    "../bunch.toml",
    "../config/bunch.toml",
    "server/bunch.toml",
    "server/config/bunch.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub media: MediaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://bunch.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Where uploaded avatars live and how their stored paths are exposed.
///
/// ```
/// use bunch_config::MediaConfig;
///
/// let media = MediaConfig::default();
/// assert_eq!(media.url_prefix, "/media/");
/// assert_eq!(media.avatar_reference("me.png"), "avatars/me.png");
/// assert_eq!(media.resolve("avatars/me.png"), "/media/avatars/me.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "MediaConfig::default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "MediaConfig::default_avatar_dir")]
    pub avatar_dir: String,
}

impl MediaConfig {
    fn default_url_prefix() -> String {
        "/media/".to_string()
    }

    fn default_avatar_dir() -> String {
        "avatars/".to_string()
    }

    /// Stored reference for an uploaded avatar. Bare file names land in
    /// `avatar_dir`; empty names and references that already carry a
    /// directory are kept.
    pub fn avatar_reference(&self, name: &str) -> String {
        if name.is_empty() || name.contains('/') {
            return name.to_string();
        }
        format!("{}/{}", self.avatar_dir.trim_end_matches('/'), name)
    }

    /// Resolve a stored file reference to the URL clients fetch it from.
    pub fn resolve(&self, reference: &str) -> String {
        format!(
            "{}/{}",
            self.url_prefix.trim_end_matches('/'),
            reference.trim_start_matches('/')
        )
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            url_prefix: Self::default_url_prefix(),
            avatar_dir: Self::default_avatar_dir(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use bunch_config::load;
///
/// std::env::remove_var("BUNCH_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("media.url_prefix", defaults.media.url_prefix.clone())?
        .set_default("media.avatar_dir", defaults.media.avatar_dir.clone())?;

    let environment_overrides = config::Environment::with_prefix("BUNCH").separator("__");

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("BUNCH_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via BUNCH_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(?config, "loaded backend configuration");
    Ok(config)
}
