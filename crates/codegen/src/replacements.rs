use crudkit_core::{CrudConfig, Naming};

/// Ordered `{{placeholder}} -> value` pairs applied to a stub.
///
/// Values are substituted in insertion order, so a value may itself contain
/// a placeholder that a later entry fills in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Replacements {
    entries: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Naming placeholders shared by every stub of a model.
    ///
    /// `model_name` is the model class (`OrderItem`); `route` overrides both
    /// route placeholders.
    pub fn for_model(model_name: &str, route: Option<&str>, config: &CrudConfig) -> Self {
        let snake = Naming::snake(model_name);
        let plural = Naming::plural(&snake);

        Self::new()
            .with("{{layout}}", config.layout.as_str())
            .with("{{modelName}}", model_name)
            .with("{{modelTable}}", model_name)
            .with("{{modelTitle}}", Naming::title(&snake))
            .with("{{modelNamespace}}", config.model.namespace.as_str())
            .with("{{controllerNamespace}}", config.controller.namespace.as_str())
            .with("{{modelNamePluralLowerCase}}", Naming::camel(&plural))
            .with("{{modelNamePluralUpperCase}}", Naming::studly(&plural))
            .with("{{modelNameLowerCase}}", Naming::camel(&snake))
            .with(
                "{{modelRoute}}",
                route.map(str::to_string).unwrap_or_else(|| Naming::kebab(&plural)),
            )
            .with(
                "{{modelRouteNotPlural}}",
                route
                    .map(str::to_string)
                    .unwrap_or_else(|| Naming::kebab(&Naming::singular(&snake))),
            )
            .with("{{modelView}}", Naming::kebab(&snake))
    }

    /// Set a placeholder. An existing key keeps its position and takes the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Merge another set on top of this one
    pub fn merged(mut self, other: Replacements) -> Self {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
