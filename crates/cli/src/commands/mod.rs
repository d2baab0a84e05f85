pub mod generate;
pub mod relations;
pub mod service;
pub mod tables;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use crudkit_core::CrudConfig;
use crudkit_introspect::SchemaProvider;

use crate::GlobalArgs;

/// Configuration and project location shared by every command
pub struct Context {
    pub project_root: PathBuf,
    pub config: CrudConfig,
    connection: Option<String>,
}

impl Context {
    pub fn load(args: &GlobalArgs) -> anyhow::Result<Self> {
        let project_root = args.path.clone();
        if !project_root.is_dir() {
            anyhow::bail!("Project root {} is not a directory", project_root.display());
        }

        let config = CrudConfig::load(args.config.as_deref(), &project_root)
            .context("Failed to load crudkit configuration")?;

        Ok(Self {
            project_root,
            config,
            connection: args.connection.clone(),
        })
    }

    /// Open the selected connection
    pub async fn provider(&self) -> anyhow::Result<Arc<dyn SchemaProvider>> {
        let connection = self.config.connection(self.connection.as_deref())?;
        let provider = crudkit_introspect::connect(connection)
            .await
            .with_context(|| {
                format!("Failed to connect using the `{}` driver", connection.driver)
            })?;

        tracing::debug!("Connected with the `{}` driver", provider.driver());
        Ok(provider)
    }
}
