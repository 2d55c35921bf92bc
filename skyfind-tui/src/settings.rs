use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use reqwest::Client;
use serde::Deserialize;
use skyfind_core::{
    DEFAULT_DEBOUNCE, DEFAULT_LOOKUP_TIMEOUT, DEFAULT_SEARCH_TIMEOUT, ProviderBundle, TripConfig,
};
use skyfind_provider_skyscrapper::{BASE_URL, DEFAULT_HOST, SkyScrapperConfig, provider};

/// Optional settings file looked up in the working directory.
const SETTINGS_FILE: &str = "skyfind";

#[derive(Deserialize, Clone)]
pub(crate) struct Settings {
    pub api: ApiSettings,
    pub search: SearchSettings,
    pub ui: UiSettings,
    #[serde(default)]
    pub trip: TripConfig,
}

#[derive(Deserialize, Clone)]
pub(crate) struct ApiSettings {
    #[serde(default)]
    pub key: Option<String>,
    pub host: String,
    pub base_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct SearchSettings {
    pub debounce_ms: u64,
    pub lookup_timeout_secs: u64,
    pub search_timeout_secs: u64,
    /// Whether a successful flight search is followed by a hotel lookup.
    pub hotels: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub(crate) struct UiSettings {
    pub dark_mode: bool,
    /// Logs go here; the terminal belongs to the UI.
    pub log_file: PathBuf,
}

impl Settings {
    pub(crate) fn skyscrapper(&self) -> Result<SkyScrapperConfig> {
        let Some(key) = self
            .api
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
        else {
            bail!("No API key configured: set SKYFIND__API__KEY or api.key in skyfind.toml");
        };
        Ok(SkyScrapperConfig {
            base_url: self.api.base_url.clone(),
            api_host: self.api.host.clone(),
            api_key: key.to_owned(),
        })
    }

    /// Provider bundle for these settings; hotel lookups are left out when disabled.
    pub(crate) fn provider(&self, client: Client) -> Result<ProviderBundle> {
        let bundle = provider(client, self.skyscrapper()?);
        Ok(if self.search.hotels {
            bundle
        } else {
            bundle.without_hotels()
        })
    }
}

impl SearchSettings {
    pub(crate) fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub(crate) fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    pub(crate) fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

/// Load `.env`, then layer defaults, `skyfind.toml` and `SKYFIND__*` variables.
pub(crate) fn read_config() -> Result<Settings> {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(err).context("Failed to read .env");
    }

    let settings = with_defaults(Config::builder())?
        .add_source(File::with_name(SETTINGS_FILE).required(false))
        .add_source(
            Environment::with_prefix("SKYFIND")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to assemble configuration")?;

    settings
        .try_deserialize::<Settings>()
        .context("Invalid configuration")
}

pub(crate) fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .set_default("api.host", DEFAULT_HOST)?
        .set_default("api.base_url", BASE_URL)?
        .set_default("search.debounce_ms", duration_millis(DEFAULT_DEBOUNCE))?
        .set_default("search.lookup_timeout_secs", DEFAULT_LOOKUP_TIMEOUT.as_secs())?
        .set_default("search.search_timeout_secs", DEFAULT_SEARCH_TIMEOUT.as_secs())?
        .set_default("search.hotels", true)?
        .set_default("ui.dark_mode", true)?
        .set_default("ui.log_file", "skyfind.log")
}

fn duration_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
