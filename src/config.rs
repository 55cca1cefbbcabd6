/*
 * Responsibility
 * - Read settings from the environment (Discord credentials, target guild, deny-list, ...)
 * - Validate them once at startup (missing or malformed -> startup fails)
 */
use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://discord.com/api";
const DEFAULT_WEB_BASE_URL: &str = "https://discord.com";
const DEFAULT_PROJECT_URL: &str = "https://github.com/cm-ayf/discord-restricted-guild-invite";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Guild ids whose members must not be admitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DenyList(HashSet<String>);

impl DenyList {
    /// Parses a comma-separated list. Whitespace is trimmed and empty entries are dropped.
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn contains(&self, guild_id: &str) -> bool {
        self.0.contains(guild_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for DenyList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub client_id: String,
    pub client_secret: SecretString,
    pub bot_token: SecretString,

    pub guild_id: String,
    pub denied_guild_ids: DenyList,

    // Fixed external origin; otherwise derived from each request
    pub public_base_url: Option<Url>,
    pub project_url: String,

    pub api_base_url: Url,
    pub web_base_url: Url,
    pub upstream_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let port: u16 = match lookup("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV"));

        let client_id = required("DISCORD_CLIENT_ID")?;
        let client_secret = SecretString::from(required("DISCORD_CLIENT_SECRET")?);
        let bot_token = SecretString::from(required("DISCORD_BOT_TOKEN")?);

        let guild_id = required("DISCORD_GUILD_ID")?.trim().to_string();
        if guild_id.is_empty() {
            return Err(ConfigError::Invalid("DISCORD_GUILD_ID"));
        }

        // Present but empty means "deny nobody".
        let denied_guild_ids = DenyList::parse(&required("DISCORD_DENIED_GUILD_IDS")?);

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_url(&s, "PUBLIC_BASE_URL"))
            .transpose()?;

        let project_url = lookup("PROJECT_URL").unwrap_or_else(|| DEFAULT_PROJECT_URL.to_string());

        let api_base_url = parse_url(
            &lookup("DISCORD_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            "DISCORD_API_BASE_URL",
        )?;
        let web_base_url = parse_url(
            &lookup("DISCORD_WEB_BASE_URL").unwrap_or_else(|| DEFAULT_WEB_BASE_URL.to_string()),
            "DISCORD_WEB_BASE_URL",
        )?;

        let upstream_timeout_seconds: u64 = match lookup("UPSTREAM_TIMEOUT_SECONDS") {
            Some(s) => s
                .parse()
                .map_err(|_| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECONDS"))?,
            None => 10,
        };

        Ok(Self {
            addr,
            app_env,
            client_id,
            client_secret,
            bot_token,
            guild_id,
            denied_guild_ids,
            public_base_url,
            project_url,
            api_base_url,
            web_base_url,
            upstream_timeout: Duration::from_secs(upstream_timeout_seconds),
        })
    }

    /// Browser-facing view of the target guild.
    pub fn guild_view_url(&self) -> String {
        format!(
            "{}/channels/{}",
            self.web_base_url.as_str().trim_end_matches('/'),
            self.guild_id
        )
    }
}

fn parse_url(raw: &str, key: &'static str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|_| ConfigError::Invalid(key))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Invalid(key));
    }
    Ok(url)
}
