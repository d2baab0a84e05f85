//! Service classes under `app/Services`

use std::path::{Path, PathBuf};

use crudkit_core::{CoreError, CrudConfig, Naming};

use crate::replacements::Replacements;

pub const SERVICE_NAMESPACE: &str = "App\\Services";

/// Turn a folder name such as `order-items` into `OrderItems`.
///
/// The name may hold at most one dash, not at either end, and no whitespace.
pub fn service_folder(raw: &str) -> Result<String, CoreError> {
    let invalid = |reason: &str| {
        CoreError::validation(format!("Invalid service folder '{}': {}", raw, reason))
    };

    if raw.is_empty() {
        return Err(invalid("it must not be empty"));
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(invalid("it must not contain whitespace"));
    }
    if raw.starts_with('-') || raw.ends_with('-') {
        return Err(invalid("it must not start or end with a dash"));
    }
    if raw.matches('-').count() > 1 {
        return Err(invalid("only one dash is allowed"));
    }

    Ok(raw.split('-').map(Naming::studly).collect())
}

/// Where a service class goes and what it is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub model_class: String,
    /// `OrderService`, or `<Folder>Service` inside a folder
    pub class_name: String,
    pub namespace: String,
    pub path: PathBuf,
}

impl ServiceTarget {
    pub fn new(table: &str, folder: Option<&str>, project_root: &Path) -> Result<Self, CoreError> {
        let model_class = Naming::model_class(table);
        let services = project_root.join("app").join("Services");

        let target = match folder.map(service_folder).transpose()? {
            Some(folder) => Self {
                class_name: format!("{}Service", folder),
                namespace: format!("{}\\{}", SERVICE_NAMESPACE, folder),
                path: services.join(&folder).join(format!("{}Service.php", folder)),
                model_class,
            },
            None => Self {
                class_name: format!("{}Service", model_class),
                namespace: SERVICE_NAMESPACE.to_string(),
                path: services.join(format!("{}Service.php", model_class)),
                model_class,
            },
        };

        Ok(target)
    }

    pub fn replacements(&self, config: &CrudConfig) -> Replacements {
        Replacements::new()
            .with("{{serviceNamespace}}", self.namespace.as_str())
            .with("{{serviceClass}}", self.class_name.as_str())
            .with("{{modelNamespace}}", config.model.namespace.as_str())
            .with("{{modelClass}}", self.model_class.as_str())
            .with("{{modelName}}", self.model_class.as_str())
            .with("{{modelNameLowerCase}}", Naming::camel(&self.model_class))
    }
}
