use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use co2_client::DataApiConfig;
use serde::Deserialize;

/// CO2 management dashboard
#[derive(Debug, Clone, Parser)]
#[command(name = "co2-api", version, about)]
pub struct Cli {
    /// TOML file holding ASTRA_DB_API_ENDPOINT and ASTRA_DB_APPLICATION_TOKEN
    #[arg(long, env = "CO2_SECRETS", default_value = ".streamlit/secrets.toml")]
    pub secrets: PathBuf,

    /// Data API endpoint; overrides the secrets file
    #[arg(long, env = "ASTRA_DB_API_ENDPOINT", hide_env_values = true)]
    pub endpoint: Option<String>,

    /// Application token; overrides the secrets file
    #[arg(long, env = "ASTRA_DB_APPLICATION_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "CO2_KEYSPACE", default_value = co2_dashboard::catalog::KEYSPACE)]
    pub keyspace: String,

    #[arg(long, env = "CO2_LISTEN", default_value = "0.0.0.0:8501")]
    pub listen: SocketAddr,

    /// Lifetime of cached selection lists
    #[arg(long, env = "CO2_CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    #[arg(long, env = "CO2_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Serve built-in sample data instead of connecting to a database
    #[arg(long)]
    pub demo: bool,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing secret {0}")]
    MissingSecret(&'static str),

    #[error("invalid endpoint {0:?}: expected an http(s) URL")]
    InvalidEndpoint(String),

    #[error("cannot read secrets file {path}: {source}")]
    ReadSecrets {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse secrets file {path}: {source}")]
    ParseSecrets {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretsFile {
    #[serde(rename = "ASTRA_DB_API_ENDPOINT")]
    pub endpoint: Option<String>,
    #[serde(rename = "ASTRA_DB_APPLICATION_TOKEN")]
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub enum Backend {
    DataApi(DataApiConfig),
    Demo,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: SocketAddr,
    pub keyspace: String,
    pub cache_ttl: Duration,
    pub backend: Backend,
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let secrets = if cli.demo {
            SecretsFile::default()
        } else {
            load_secrets(&cli.secrets)?
        };
        Self::resolve(cli, secrets)
    }

    /// Merge command line / environment values over the secrets file and
    /// validate the result.
    pub fn resolve(cli: &Cli, secrets: SecretsFile) -> Result<Self, ConfigError> {
        let backend = if cli.demo {
            Backend::Demo
        } else {
            let endpoint = non_empty(cli.endpoint.clone().or(secrets.endpoint))
                .ok_or(ConfigError::MissingSecret("ASTRA_DB_API_ENDPOINT"))?;
            let token = non_empty(cli.token.clone().or(secrets.token))
                .ok_or(ConfigError::MissingSecret("ASTRA_DB_APPLICATION_TOKEN"))?;
            if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                return Err(ConfigError::InvalidEndpoint(endpoint));
            }
            Backend::DataApi(DataApiConfig {
                endpoint,
                token,
                keyspace: cli.keyspace.clone(),
                timeout: Duration::from_secs(cli.request_timeout_secs),
            })
        };

        Ok(Self {
            listen: cli.listen,
            keyspace: cli.keyspace.clone(),
            cache_ttl: Duration::from_secs(cli.cache_ttl_secs),
            backend,
        })
    }
}

/// A missing file is not an error on its own: the environment may carry
/// both secrets.
pub fn load_secrets(path: &Path) -> Result<SecretsFile, ConfigError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no secrets file");
            return Ok(SecretsFile::default());
        }
        Err(source) => {
            return Err(ConfigError::ReadSecrets {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&text).map_err(|source| ConfigError::ParseSecrets {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli() -> Cli {
        Cli {
            secrets: PathBuf::from("missing.toml"),
            endpoint: None,
            token: None,
            keyspace: "gestao_co2".into(),
            listen: "127.0.0.1:8501".parse().unwrap(),
            cache_ttl_secs: 300,
            request_timeout_secs: 30,
            demo: false,
            verbose: 0,
        }
    }

    fn file(endpoint: &str, token: &str) -> SecretsFile {
        SecretsFile {
            endpoint: Some(endpoint.into()),
            token: Some(token.into()),
        }
    }

    #[test]
    fn secrets_file_supplies_connection() {
        let settings = Settings::resolve(
            &cli(),
            file("https://db.apps.astra.datastax.com", "AstraCS:file"),
        )
        .unwrap();
        match settings.backend {
            Backend::DataApi(cfg) => {
                assert_eq!(cfg.endpoint, "https://db.apps.astra.datastax.com");
                assert_eq!(cfg.token, "AstraCS:file");
                assert_eq!(cfg.keyspace, "gestao_co2");
                assert_eq!(cfg.timeout, Duration::from_secs(30));
            }
            Backend::Demo => panic!("expected data api backend"),
        }
        assert_eq!(settings.cache_ttl, Duration::from_secs(300));
    }

    #[test]
    fn cli_overrides_secrets_file() {
        let mut cli = cli();
        cli.token = Some("AstraCS:env".into());
        let settings =
            Settings::resolve(&cli, file("https://db.example", "AstraCS:file")).unwrap();
        let Backend::DataApi(cfg) = settings.backend else {
            panic!("expected data api backend");
        };
        assert_eq!(cfg.token, "AstraCS:env");
    }

    #[test]
    fn missing_or_blank_token_is_fatal() {
        let err = Settings::resolve(&cli(), file("https://db.example", "  ")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingSecret("ASTRA_DB_APPLICATION_TOKEN")
        ));
        let err = Settings::resolve(&cli(), SecretsFile::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret("ASTRA_DB_API_ENDPOINT")));
    }

    #[test]
    fn endpoint_must_be_http() {
        let err = Settings::resolve(&cli(), file("db.example", "AstraCS:x")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEndpoint(_)));
    }

    #[test]
    fn demo_needs_no_secrets() {
        let mut cli = cli();
        cli.demo = true;
        let settings = Settings::load(&cli).unwrap();
        assert!(matches!(settings.backend, Backend::Demo));
    }

    #[test]
    fn secrets_file_parses_streamlit_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("secrets.toml");
        std::fs::write(
            &path,
            "ASTRA_DB_API_ENDPOINT = \"https://db.example\"\nASTRA_DB_APPLICATION_TOKEN = \"AstraCS:t\"\n",
        )
        .unwrap();
        assert_eq!(
            load_secrets(&path).unwrap(),
            file("https://db.example", "AstraCS:t")
        );
    }

    #[test]
    fn absent_secrets_file_is_empty_but_garbage_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_secrets(&dir.path().join("none.toml")).unwrap(),
            SecretsFile::default()
        );

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "ASTRA_DB_API_ENDPOINT = ").unwrap();
        assert!(matches!(
            load_secrets(&path),
            Err(ConfigError::ParseSecrets { .. })
        ));
    }
}
