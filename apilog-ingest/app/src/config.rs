use std::env;
use std::fs;
use std::time::Duration;

use crate::domain::Environment;
use crate::error::IngestError;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub http_port: u16,
    /// Budget for all store calls of one request, from arrival
    pub request_timeout_ms: u64,
    /// API key of the project seeded at startup; no project when unset
    pub bootstrap_api_key: Option<String>,
    pub project_name: String,
    pub project_environment: Environment,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
            request_timeout_ms: 10_000,
            bootstrap_api_key: None,
            project_name: "default".to_string(),
            project_environment: Environment::Dev,
        }
    }
}

impl Settings {
    /// Validates the settings and returns an error if invalid.
    pub fn validate(&self) -> Result<(), IngestError> {
        validate_host(&self.host)?;
        validate_port(self.http_port)?;
        if self.request_timeout_ms == 0 {
            return Err(IngestError::Config(
                "Request timeout must be greater than 0".into(),
            ));
        }
        if self.project_name.trim().is_empty() {
            return Err(IngestError::Config("Project name cannot be empty".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Builds settings from a variable lookup, applying defaults for unset
    /// variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, IngestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(host) = lookup("HOST") {
            settings.host = host;
        }
        if let Some(port) = lookup("HTTP_PORT") {
            settings.http_port = parse("HTTP_PORT", &port)?;
        }
        if let Some(timeout) = lookup("REQUEST_TIMEOUT_MS") {
            settings.request_timeout_ms = parse("REQUEST_TIMEOUT_MS", &timeout)?;
        }
        settings.bootstrap_api_key =
            get_env_or_file("APP_API_KEY", &lookup)?.filter(|key| !key.is_empty());
        if let Some(name) = lookup("APP_PROJECT_NAME") {
            settings.project_name = name;
        }
        if let Some(environment) = lookup("APP_PROJECT_ENVIRONMENT") {
            settings.project_environment = environment.parse().map_err(|_| {
                IngestError::Config(format!(
                    "APP_PROJECT_ENVIRONMENT must be 'dev' or 'production', got '{environment}'"
                ))
            })?;
        }

        // Validate settings before returning
        settings.validate()?;

        Ok(settings)
    }
}

/// Validates that the host is not empty or whitespace-only.
fn validate_host(host: &str) -> Result<(), IngestError> {
    if host.trim().is_empty() {
        return Err(IngestError::Config("Host cannot be empty".into()));
    }
    Ok(())
}

/// Validates that the port is in valid range (1-65535).
fn validate_port(port: u16) -> Result<(), IngestError> {
    if port == 0 {
        return Err(IngestError::Config("Port cannot be 0".into()));
    }
    Ok(())
}

fn parse<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, IngestError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| IngestError::Config(format!("Invalid {name} '{raw}': {e}")))
}

/// Read a value from a variable, with support for _FILE suffix (Docker Secrets)
fn get_env_or_file<F>(name: &str, lookup: &F) -> Result<Option<String>, IngestError>
where
    F: Fn(&str) -> Option<String>,
{
    // First check for _FILE suffix (Docker Secrets support)
    let file_var = format!("{name}_FILE");
    if let Some(file_path) = lookup(&file_var) {
        return fs::read_to_string(&file_path)
            .map(|content| Some(content.trim().to_string()))
            .map_err(|e| IngestError::Config(format!("Failed to read {file_var}: {e}")));
    }

    Ok(lookup(name))
}

pub fn get_configuration() -> Result<Settings, IngestError> {
    Settings::from_lookup(|name| env::var(name).ok())
}
