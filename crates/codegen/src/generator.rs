//! CRUD scaffolding for one table
//!
//! Every artifact is rendered in memory before anything touches the disk, so
//! a catalog or template failure leaves the project as it was.

use std::path::PathBuf;

use crudkit_core::{CoreError, CrudConfig, Naming};
use crudkit_introspect::SchemaProvider;
use serde::Serialize;

use crate::error::{CodegenError, CodegenResult};
use crate::model::ModelReplacementBuilder;
use crate::relations::{GeneratedRelationFragment, RelationshipResolver, ResolvedRelations};
use crate::replacements::Replacements;
use crate::service::ServiceTarget;
use crate::templates::{render_template, StubLoader, ViewStack, ROUTE_FILE_HEADER};
use crate::writer::{CodeWriter, WriteOutcome};

const VIEWS: [&str; 5] = ["index", "create", "edit", "form", "show"];

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Custom route name instead of the kebab-case plural of the model
    pub route: Option<String>,
    /// Also generate the API controller, resource, form request and routes
    pub api: bool,
    /// Overwrite existing controller, model and API classes
    pub force: bool,
    /// View stubs from `views/<stack>/` instead of `views/`
    pub stack: Option<ViewStack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArtifactKind {
    Controller,
    Model,
    View,
    WebRoutes,
    ApiController,
    ApiResource,
    FormRequest,
    ApiRoutes,
    Service,
}

enum WriteMode {
    /// Kept when present unless forced
    Class,
    Overwrite,
    Append,
}

impl ArtifactKind {
    fn write_mode(&self) -> WriteMode {
        match self {
            ArtifactKind::View => WriteMode::Overwrite,
            ArtifactKind::WebRoutes | ArtifactKind::ApiRoutes => WriteMode::Append,
            _ => WriteMode::Class,
        }
    }
}

/// A rendered file waiting to be written
#[derive(Debug, Clone)]
pub struct PlannedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub content: String,
}

/// Everything generated for a table, before writing
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub table: String,
    pub model_name: String,
    pub relations: ResolvedRelations,
    pub artifacts: Vec<PlannedArtifact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub table: String,
    pub model_name: String,
    pub relations: Vec<GeneratedRelationFragment>,
    pub files: Vec<GeneratedFile>,
}

pub struct CrudGenerator<'a> {
    provider: &'a dyn SchemaProvider,
    config: &'a CrudConfig,
    project_root: PathBuf,
    stubs: StubLoader,
    writer: CodeWriter,
}

impl<'a> CrudGenerator<'a> {
    pub fn new(
        provider: &'a dyn SchemaProvider,
        config: &'a CrudConfig,
        project_root: impl Into<PathBuf>,
    ) -> Self {
        let project_root = project_root.into();
        Self {
            provider,
            config,
            stubs: StubLoader::from_config(config, &project_root),
            project_root,
            writer: CodeWriter::new(),
        }
    }

    pub fn with_stubs(mut self, stubs: StubLoader) -> Self {
        self.stubs = stubs;
        self
    }

    /// Generate and write the CRUD artifacts of `table`
    pub async fn generate(
        &self,
        table: &str,
        options: &GenerateOptions,
    ) -> CodegenResult<GenerationReport> {
        let plan = self.plan(table, options).await?;
        let files = self.write(&plan.artifacts, options)?;

        Ok(GenerationReport {
            table: plan.table,
            model_name: plan.model_name,
            relations: plan.relations.fragments,
            files,
        })
    }

    /// Render every artifact of `table` without writing anything
    pub async fn plan(
        &self,
        table: &str,
        options: &GenerateOptions,
    ) -> CodegenResult<GenerationPlan> {
        let table = table.trim();
        if table.is_empty() {
            return Err(CoreError::validation("Table name must not be empty").into());
        }

        if !self.provider.has_table(table).await? {
            return Err(CodegenError::table_not_found(table));
        }

        let model_name = Naming::model_class(table);
        tracing::info!("Generating CRUD for `{}` as {}", table, model_name);

        let replacements =
            Replacements::for_model(&model_name, options.route.as_deref(), self.config);

        let columns = self.provider.list_columns(table).await?;
        let builder = ModelReplacementBuilder::new(&columns, &self.config.model.unwanted_columns);

        let namespace = self.config.model.namespace.as_str();
        let resolver = RelationshipResolver::new(self.provider, namespace);
        let relations = resolver.resolve(table, &builder.base_properties()).await?;

        let model_replacements = replacements.clone().merged(builder.build(table, &relations));

        let mut artifacts = vec![
            PlannedArtifact {
                kind: ArtifactKind::Controller,
                path: self
                    .namespace_dir(&self.config.controller.namespace)
                    .join(format!("{}Controller.php", model_name)),
                content: self.render("Controller", &replacements)?,
            },
            PlannedArtifact {
                kind: ArtifactKind::Model,
                path: self
                    .namespace_dir(&self.config.model.namespace)
                    .join(format!("{}.php", model_name)),
                content: self.render("Model", &model_replacements)?,
            },
        ];

        let columns = builder.filtered_columns();
        artifacts.extend(self.plan_views(&replacements, &columns, options.stack)?);

        artifacts.push(PlannedArtifact {
            kind: ArtifactKind::WebRoutes,
            path: self.project_root.join("routes").join("web.php"),
            content: self.render("routes", &replacements)?,
        });

        if options.api {
            let http = self.project_root.join("app").join("Http");
            artifacts.push(PlannedArtifact {
                kind: ArtifactKind::ApiController,
                path: http
                    .join("Controllers")
                    .join("Api")
                    .join(format!("{}Controller.php", model_name)),
                content: self.render("api/Controller", &replacements)?,
            });
            artifacts.push(PlannedArtifact {
                kind: ArtifactKind::ApiResource,
                path: http.join("Resources").join(format!("{}Resource.php", model_name)),
                content: self.render("api/Resource", &replacements)?,
            });
            artifacts.push(PlannedArtifact {
                kind: ArtifactKind::FormRequest,
                path: http.join("Requests").join(format!("{}Request.php", model_name)),
                content: self.render("api/Request", &model_replacements)?,
            });
            artifacts.push(PlannedArtifact {
                kind: ArtifactKind::ApiRoutes,
                path: self.project_root.join("routes").join("api.php"),
                content: self.render("api/routes", &replacements)?,
            });
        }

        Ok(GenerationPlan {
            table: table.to_string(),
            model_name,
            relations,
            artifacts,
        })
    }

    /// Render the service class of `table`, optionally inside `folder`
    pub async fn plan_service(
        &self,
        table: &str,
        folder: Option<&str>,
    ) -> CodegenResult<PlannedArtifact> {
        let table = table.trim();
        if table.is_empty() {
            return Err(CoreError::validation("Table name must not be empty").into());
        }

        if !self.provider.has_table(table).await? {
            return Err(CodegenError::table_not_found(table));
        }

        let target = ServiceTarget::new(table, folder, &self.project_root)?;
        tracing::info!("Generating {} for `{}`", target.class_name, table);

        Ok(PlannedArtifact {
            kind: ArtifactKind::Service,
            content: self.render("Service", &target.replacements(self.config))?,
            path: target.path,
        })
    }

    /// Write the service class of `table`. An existing file is never overwritten.
    pub async fn generate_service(
        &self,
        table: &str,
        folder: Option<&str>,
    ) -> CodegenResult<GeneratedFile> {
        let artifact = self.plan_service(table, folder).await?;
        if artifact.path.exists() {
            return Err(CodegenError::already_exists(&artifact.path));
        }

        let outcome = self.writer.write_if_changed(&artifact.path, &artifact.content)?;
        tracing::info!("{:?} {}", outcome, artifact.path.display());

        Ok(GeneratedFile {
            kind: artifact.kind,
            path: artifact.path,
            outcome,
        })
    }

    fn render(&self, stub: &str, replacements: &Replacements) -> CodegenResult<String> {
        let template = self.stubs.load(stub)?;
        render_template(&template, replacements)
    }

    fn plan_views(
        &self,
        replacements: &Replacements,
        columns: &[&str],
        stack: Option<ViewStack>,
    ) -> CodegenResult<Vec<PlannedArtifact>> {
        let variable = replacements.get("{{modelNameLowerCase}}").unwrap_or_default();

        let mut table_header = String::from("\n");
        let mut table_body = String::from("\n");
        let mut view_rows = String::from("\n");
        let mut form = String::from("\n");

        for column in columns {
            let title = Naming::column_title(column);
            let field = replacements
                .clone()
                .with("{{title}}", title.as_str())
                .with("{{column}}", *column);

            table_header.push_str(&format!("{}<th>{}</th>\n", "\t".repeat(10), title));
            table_body.push_str(&format!(
                "{}<td>{{{{ ${}->{} }}}}</td>\n",
                "\t".repeat(11),
                variable,
                column
            ));
            view_rows.push_str(&self.render("views/view-field", &field)?);
            form.push_str(&self.render("views/form-field", &field)?);
        }

        let view_replacements = replacements
            .clone()
            .with("{{tableHeader}}", table_header)
            .with("{{tableBody}}", table_body)
            .with("{{viewRows}}", view_rows)
            .with("{{form}}", form);

        let directory = self
            .project_root
            .join("resources")
            .join("views")
            .join(replacements.get("{{modelView}}").unwrap_or_default());

        VIEWS
            .iter()
            .map(|view| -> CodegenResult<PlannedArtifact> {
                Ok(PlannedArtifact {
                    kind: ArtifactKind::View,
                    path: directory.join(format!("{}.blade.php", view)),
                    content: self.render(&ViewStack::view_stub(stack, view), &view_replacements)?,
                })
            })
            .collect()
    }

    /// Directory of a class namespace: `App\Http\Controllers` is `app/Http/Controllers`
    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        let relative = match namespace.find("App") {
            Some(index) => &namespace[index + "App".len()..],
            None => namespace,
        };

        relative
            .split('\\')
            .filter(|segment| !segment.is_empty())
            .fold(self.project_root.join("app"), |dir, segment| dir.join(segment))
    }

    fn write(
        &self,
        artifacts: &[PlannedArtifact],
        options: &GenerateOptions,
    ) -> CodegenResult<Vec<GeneratedFile>> {
        let mut files = Vec::with_capacity(artifacts.len());

        for artifact in artifacts {
            let outcome = match artifact.kind.write_mode() {
                WriteMode::Class if artifact.path.exists() && !options.force => {
                    tracing::warn!(
                        "{} already exists, skipping (use --force to overwrite)",
                        artifact.path.display()
                    );
                    WriteOutcome::Skipped
                }
                WriteMode::Class | WriteMode::Overwrite => {
                    self.writer.write_if_changed(&artifact.path, &artifact.content)?
                }
                WriteMode::Append => {
                    self.writer.ensure_file(&artifact.path, ROUTE_FILE_HEADER)?;
                    self.writer.append_once(&artifact.path, &artifact.content)?
                }
            };

            if outcome.is_change() {
                tracing::info!("{:?} {}", outcome, artifact.path.display());
            } else {
                tracing::debug!("{:?} {}", outcome, artifact.path.display());
            }

            files.push(GeneratedFile {
                kind: artifact.kind,
                path: artifact.path.clone(),
                outcome,
            });
        }

        Ok(files)
    }
}
