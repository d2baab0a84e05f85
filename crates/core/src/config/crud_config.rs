use crate::config::{ConfigError, ConfigValidator, DatabaseUrlValidator, NamespaceValidator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Default configuration file looked up in the project root
pub const DEFAULT_CONFIG_FILE: &str = "crud.yaml";

/// Stub path value that selects the built-in stubs
pub const DEFAULT_STUB_PATH: &str = "default";

/// Scaffolding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrudConfig {
    /// Directory holding custom `.stub` files, or `default` for the built-in set
    pub stub_path: String,
    /// Blade layout the generated views extend
    pub layout: String,
    pub model: ModelConfig,
    pub controller: ControllerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub namespace: String,
    /// Columns never made fillable nor rendered in views
    pub unwanted_columns: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub namespace: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Name of the connection used when none is requested
    pub default: Option<String>,
    pub connections: BTreeMap<String, ConnectionConfig>,
}

/// A single named database connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Driver tag (`mysql`, `pgsql`, `sqlite`, `sqlsrv`, ...)
    pub driver: String,
    pub url: String,
    /// PostgreSQL schema, `public` when absent
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    1
}

impl Default for CrudConfig {
    fn default() -> Self {
        Self {
            stub_path: DEFAULT_STUB_PATH.to_string(),
            layout: "layouts.app".to_string(),
            model: ModelConfig::default(),
            controller: ControllerConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            namespace: "App\\Models".to_string(),
            unwanted_columns: [
                "id",
                "password",
                "email_verified_at",
                "remember_token",
                "created_at",
                "updated_at",
                "deleted_at",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: "App\\Http\\Controllers".to_string(),
        }
    }
}

impl ConnectionConfig {
    /// Build a connection from a URL, inferring the driver from its scheme
    pub fn from_url(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let driver = infer_driver_tag(&url).ok_or_else(|| {
            ConfigError::invalid_value(
                "DATABASE_URL",
                url.clone(),
                "mysql://, postgres://, sqlite: or sqlserver:// URL",
            )
        })?;

        Ok(Self {
            driver: driver.to_string(),
            url,
            schema: None,
            max_connections: default_max_connections(),
        })
    }
}

/// Map a database URL scheme onto the driver tag used by the schema providers
pub fn infer_driver_tag(url: &str) -> Option<&'static str> {
    let scheme = url.split(':').next()?.to_ascii_lowercase();
    match scheme.as_str() {
        "mysql" | "mariadb" => Some("mysql"),
        "postgres" | "postgresql" => Some("pgsql"),
        "sqlite" => Some("sqlite"),
        "sqlserver" | "mssql" => Some("sqlsrv"),
        _ => None,
    }
}

fn validates_as_url(driver: &str) -> bool {
    matches!(
        driver.to_ascii_lowercase().as_str(),
        "mysql" | "mariadb" | "pgsql" | "postgres" | "postgresql" | "sqlite" | "sqlite3"
    )
}

impl CrudConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the configuration file when it exists, defaults otherwise, then
    /// apply environment overrides and validate
    pub fn load(path: Option<&Path>, project_root: &Path) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let candidate = project_root.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::from_file(candidate)?
                } else {
                    tracing::debug!(
                        "No {} found, using default configuration",
                        DEFAULT_CONFIG_FILE
                    );
                    Self::default()
                }
            }
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DB_CONNECTION` and `DATABASE_URL` overrides from the given lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup("DB_CONNECTION").filter(|v| !v.is_empty()) {
            self.database.default = Some(name);
        }

        if let Some(url) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            let name = self
                .database
                .default
                .clone()
                .unwrap_or_else(|| "default".to_string());

            match self.database.connections.get_mut(&name) {
                Some(connection) => connection.url = url,
                None => {
                    let connection = ConnectionConfig::from_url(url)?;
                    self.database.connections.insert(name.clone(), connection);
                }
            }
            self.database.default = Some(name);
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        NamespaceValidator { field: "model.namespace" }.validate(self.model.namespace.as_str())?;
        NamespaceValidator { field: "controller.namespace" }
            .validate(self.controller.namespace.as_str())?;

        if self.stub_path.trim().is_empty() {
            return Err(ConfigError::missing_required(
                "stub_path",
                "Use `default` for the built-in stubs",
            ));
        }

        if self.layout.trim().is_empty() {
            return Err(ConfigError::missing_required("layout", "e.g. `layouts.app`"));
        }

        let url_validator = DatabaseUrlValidator::default();
        for (name, connection) in &self.database.connections {
            // SQL Server also accepts ADO strings and unknown drivers are never opened
            if validates_as_url(&connection.driver) {
                url_validator.validate(connection.url.as_str()).map_err(|e| {
                    ConfigError::validation_failed(format!("connection '{}': {}", name, e))
                })?;
            }
            if connection.max_connections == 0 {
                return Err(ConfigError::invalid_value(
                    format!("database.connections.{}.max_connections", name),
                    "0",
                    "at least 1",
                ));
            }
        }

        if let Some(default) = &self.database.default {
            if !self.database.connections.is_empty()
                && !self.database.connections.contains_key(default)
            {
                return Err(ConfigError::invalid_value(
                    "database.default",
                    default.clone(),
                    format!(
                        "one of: {}",
                        self.database.connections.keys().cloned().collect::<Vec<_>>().join(", ")
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Whether the built-in stubs should be used
    pub fn uses_default_stubs(&self) -> bool {
        self.stub_path == DEFAULT_STUB_PATH
    }

    /// Resolve a named connection, or the default one when no name is given
    pub fn connection(&self, name: Option<&str>) -> Result<&ConnectionConfig, ConfigError> {
        let name = match name {
            Some(name) => name.to_string(),
            None => match &self.database.default {
                Some(default) => default.clone(),
                None if self.database.connections.len() == 1 => {
                    self.database.connections.keys().next().cloned().unwrap_or_default()
                }
                None => {
                    return Err(ConfigError::missing_required(
                        "database.default",
                        "Set DB_CONNECTION, DATABASE_URL or pass --connection",
                    ))
                }
            },
        };

        self.database.connections.get(&name).ok_or_else(|| {
            ConfigError::missing_required(
                format!("database.connections.{}", name),
                "Declare the connection in crud.yaml or set DATABASE_URL",
            )
        })
    }
}
