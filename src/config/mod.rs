//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_MEDIA_PUBLIC_BASE: &str = "/media";

/// Command-line arguments for the Clinica binary.
#[derive(Debug, Parser)]
#[command(name = "clinica", version, about = "Clinica content backend")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "CLINICA_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath
    )]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Run the HTTP service.
    Serve(ServeArgs),
    /// Apply pending database migrations and exit.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct MigrateArgs {
    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the database connection URL.
    #[arg(long = "database-url", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the database pool size.
    #[arg(long = "database-max-connections", value_name = "COUNT")]
    pub database_max_connections: Option<u32>,

    /// Override the media storage root directory.
    #[arg(long = "media-root", value_name = "PATH", value_hint = ValueHint::DirPath)]
    pub media_root: Option<PathBuf>,

    /// Override the public URL prefix media is served under.
    #[arg(long = "media-public-base", value_name = "PREFIX")]
    pub media_public_base: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),
    #[error("invalid listen address `{0}`")]
    InvalidListenAddr(String),
    #[error("database url must not be empty")]
    MissingDatabaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub root: PathBuf,
    pub public_base: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub media: MediaSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let candidate = format!("{}:{}", self.server.host, self.server.port);
        candidate
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(candidate))
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    database: RawDatabase,
    #[serde(default)]
    media: RawMedia,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServer {
    host: String,
    port: u16,
}

impl Default for RawServer {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawDatabase {
    url: String,
    max_connections: u32,
}

impl Default for RawDatabase {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: DEFAULT_DB_MAX_CONNECTIONS,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawMedia {
    root: PathBuf,
    public_base: String,
}

impl Default for RawMedia {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_MEDIA_ROOT),
            public_base: DEFAULT_MEDIA_PUBLIC_BASE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawLogging {
    level: String,
    json: bool,
}

impl Default for RawLogging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Parse CLI arguments and resolve the layered configuration.
pub fn load_with_cli() -> Result<(CliArgs, Settings), ConfigError> {
    let cli = CliArgs::parse();
    let overrides = match &cli.command {
        Some(Command::Serve(args)) => args.overrides.clone(),
        Some(Command::Migrate(args)) => ServeOverrides {
            database_url: args.database_url.clone(),
            ..ServeOverrides::default()
        },
        None => ServeOverrides::default(),
    };
    let settings = load(cli.config_file.as_deref(), &overrides)?;
    Ok((cli, settings))
}

/// Resolve settings from the defaults file, an optional explicit file,
/// `CLINICA_`-prefixed environment variables, and CLI overrides, in that
/// order of increasing precedence.
pub fn load(
    config_file: Option<&std::path::Path>,
    overrides: &ServeOverrides,
) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path.to_path_buf()));
    }

    let raw: RawSettings = builder
        .add_source(Environment::with_prefix("CLINICA").separator("__"))
        .build()?
        .try_deserialize()?;

    resolve(raw, overrides)
}

fn resolve(raw: RawSettings, overrides: &ServeOverrides) -> Result<Settings, ConfigError> {
    let level_source = overrides.log_level.as_deref().unwrap_or(&raw.logging.level);
    let level: LevelFilter = level_source
        .parse()
        .map_err(|_| ConfigError::InvalidLogLevel(level_source.to_string()))?;

    let json = overrides.log_json.unwrap_or(raw.logging.json);

    let url = overrides
        .database_url
        .clone()
        .unwrap_or(raw.database.url);
    if url.trim().is_empty() {
        return Err(ConfigError::MissingDatabaseUrl);
    }

    Ok(Settings {
        server: ServerSettings {
            host: overrides
                .server_host
                .clone()
                .unwrap_or(raw.server.host),
            port: overrides.server_port.unwrap_or(raw.server.port),
        },
        database: DatabaseSettings {
            url,
            max_connections: overrides
                .database_max_connections
                .unwrap_or(raw.database.max_connections),
        },
        media: MediaSettings {
            root: overrides.media_root.clone().unwrap_or(raw.media.root),
            public_base: overrides
                .media_public_base
                .clone()
                .unwrap_or(raw.media.public_base),
        },
        logging: LoggingSettings {
            level,
            format: if json {
                LogFormat::Json
            } else {
                LogFormat::Compact
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_with_url() -> RawSettings {
        RawSettings {
            database: RawDatabase {
                url: "postgres://localhost/clinica".to_string(),
                ..RawDatabase::default()
            },
            ..RawSettings::default()
        }
    }

    #[test]
    fn defaults_resolve_when_url_present() {
        let settings = resolve(raw_with_url(), &ServeOverrides::default()).expect("settings");
        assert_eq!(settings.server.host, DEFAULT_HOST);
        assert_eq!(settings.server.port, DEFAULT_PORT);
        assert_eq!(settings.database.max_connections, DEFAULT_DB_MAX_CONNECTIONS);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.logging.level, LevelFilter::INFO);
        settings.listen_addr().expect("listen addr parses");
    }

    #[test]
    fn missing_database_url_is_rejected() {
        let err = resolve(RawSettings::default(), &ServeOverrides::default())
            .expect_err("rejected");
        assert!(matches!(err, ConfigError::MissingDatabaseUrl));
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let overrides = ServeOverrides {
            server_port: Some(8080),
            log_level: Some("debug".to_string()),
            log_json: Some(true),
            database_max_connections: Some(2),
            ..ServeOverrides::default()
        };
        let settings = resolve(raw_with_url(), &overrides).expect("settings");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.database.max_connections, 2);
    }

    #[test]
    fn bogus_log_level_is_rejected() {
        let overrides = ServeOverrides {
            log_level: Some("shouting".to_string()),
            ..ServeOverrides::default()
        };
        let err = resolve(raw_with_url(), &overrides).expect_err("rejected");
        assert!(matches!(err, ConfigError::InvalidLogLevel(_)));
    }
}
