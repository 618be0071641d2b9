use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::domain::SubscriberEmail;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub rate_limit: RateLimitSettings,
    pub content: ContentSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub api_token: Secret<String>,
    pub timeout_ms: u64,
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::try_from(self.sender_email.clone())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Clone, serde::Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub base_url: String,
}

#[derive(Clone, serde::Deserialize)]
pub struct RateLimitSettings {
    pub max_requests: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub window_seconds: u64,
}

impl RateLimitSettings {
    pub fn window(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.window_seconds)
    }
}

#[derive(Clone, serde::Deserialize)]
pub struct ContentSettings {
    pub posts_dir: String,
}

#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: PgSslMode,
}

impl DatabaseSettings {
    pub fn connection_string(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.database_name,
            self.require_ssl,
        ))
    }
    pub fn connection_string_without_database(&self) -> Secret<String> {
        Secret::new(format!(
            "postgres://{}:{}@{}:{}?sslmode={}",
            self.username,
            self.password.expose_secret(),
            self.host,
            self.port,
            self.require_ssl
        ))
    }
}

#[derive(Clone)]
pub enum PgSslMode {
    Require,
    Prefer,
}

impl std::fmt::Display for PgSslMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Require => write!(f, "require"),
            Self::Prefer => write!(f, "prefer"),
        }
    }
}

impl<'de> Deserialize<'de> for PgSslMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "prefered" => Ok(PgSslMode::Prefer),
            "require" => Ok(PgSslMode::Require),
            _ => Ok(PgSslMode::Prefer),
        }
    }
}

pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

pub fn current_environment() -> Environment {
    std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT.")
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .expect("Could not determine the current directory.");
    let configuration_directory = base_path.join("configuration");
    let environment = current_environment();
    let environment_filename = format!("{}.yaml", environment.as_str());
    let settings = config::Config::builder()
        .add_source(config::File::from(
            configuration_directory.join("base.yaml"),
        ))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename.as_str()),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}

impl TryFrom<String> for Environment {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "development" => Ok(Self::Development),
            "local" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "release" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment.\
                    Use 'development' or 'production'.",
                other
            )),
        }
    }
}

/// Per-section readiness report surfaced by the health endpoint.
#[derive(serde::Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct EnvironmentReport {
    pub valid: bool,
    #[serde(rename = "validationTime")]
    pub validation_time_ms: u128,
    #[serde(rename = "variablesConfigured")]
    pub variables_configured: VariablesConfigured,
}

#[derive(serde::Serialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct VariablesConfigured {
    pub database: bool,
    pub email_client: bool,
    pub application: bool,
    pub content: bool,
}

impl Settings {
    pub fn validate_environment(&self) -> EnvironmentReport {
        let started = std::time::Instant::now();
        let database = !self.database.host.is_empty()
            && !self.database.username.is_empty()
            && !self.database.database_name.is_empty();
        let email_client = !self.email_client.base_url.is_empty()
            && self.email_client.sender().is_ok()
            && !self.email_client.api_token.expose_secret().is_empty();
        let application = !self.application.host.is_empty()
            && !self.application.base_url.is_empty();
        let content = !self.content.posts_dir.is_empty();
        let variables_configured = VariablesConfigured {
            database,
            email_client,
            application,
            content,
        };
        EnvironmentReport {
            valid: database && email_client && application && content,
            validation_time_ms: started.elapsed().as_millis(),
            variables_configured,
        }
    }
}
