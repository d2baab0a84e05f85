mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use commands::Context;
use crudkit_codegen::ViewStack;
use logging::LoggingConfig;

#[derive(Parser)]
#[command(name = "crudkit")]
#[command(version)]
#[command(about = "Laravel CRUD scaffolding with relationships read from the database")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Named connection from the configuration file
    #[arg(long, global = true)]
    pub connection: Option<String>,

    /// Configuration file (defaults to crud.yaml in the project root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Laravel project root
    #[arg(long, global = true, default_value = ".")]
    pub path: PathBuf,

    /// Debug logging, catalog queries included
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate controller, model, views and routes for a table
    Generate {
        /// Table name
        table: String,

        /// Custom route name
        #[arg(long)]
        route: Option<String>,

        /// Also generate the API controller, resource, request and routes
        #[arg(long)]
        api: bool,

        /// Overwrite existing controller, model and API classes
        #[arg(long)]
        force: bool,

        /// View stack: heron, blade-bootstrap, blade-tailwind, vue-bootstrap or vue-tailwind
        #[arg(long, value_parser = parse_stack)]
        stack: Option<ViewStack>,

        /// Print the files that would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate a service class for a table's model under app/Services
    Service {
        /// Table name
        table: String,

        /// Put the service in app/Services/<Folder> and name it <Folder>Service
        #[arg(long)]
        folder: Option<String>,

        /// Print the file that would be written without touching the disk
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the relations inferred for a table
    Relations {
        /// Table name
        table: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the base tables of the connection
    Tables {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_stack(value: &str) -> Result<ViewStack, String> {
    value.parse::<ViewStack>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = if cli.global.verbose {
        LoggingConfig::verbose()
    } else {
        LoggingConfig::default()
    };
    if let Err(e) = logging::init_logging(logging.with_json(cli.global.log_json)) {
        eprintln!("⚠️ Logging disabled: {}", e);
    }

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        for cause in e.chain().skip(1) {
            eprintln!("   caused by: {}", cause);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let context = Context::load(&cli.global)?;

    match cli.command {
        Commands::Generate {
            table,
            route,
            api,
            force,
            stack,
            dry_run,
        } => {
            let options = crudkit_codegen::GenerateOptions {
                route,
                api,
                force,
                stack,
            };
            commands::generate::run(&context, &table, &options, dry_run).await?;
        }
        Commands::Service {
            table,
            folder,
            dry_run,
        } => {
            commands::service::run(&context, &table, folder.as_deref(), dry_run).await?;
        }
        Commands::Relations { table, json } => {
            commands::relations::run(&context, &table, json).await?;
        }
        Commands::Tables { json } => {
            commands::tables::run(&context, json).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::parse_from([
            "crudkit",
            "generate",
            "orders",
            "--api",
            "--route",
            "purchases",
            "--connection",
            "reporting",
            "--stack",
            "blade-tailwind",
            "-v",
        ]);

        assert_eq!(cli.global.connection.as_deref(), Some("reporting"));
        assert!(cli.global.verbose);
        assert_eq!(cli.global.path, PathBuf::from("."));
        match cli.command {
            Commands::Generate {
                table,
                route,
                api,
                force,
                stack,
                dry_run,
            } => {
                assert_eq!(table, "orders");
                assert_eq!(route.as_deref(), Some("purchases"));
                assert!(api);
                assert!(!force);
                assert_eq!(stack, Some(ViewStack::BladeTailwind));
                assert!(!dry_run);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_relations_arguments() {
        let cli = Cli::parse_from([
            "crudkit",
            "--config",
            "custom.yaml",
            "relations",
            "customers",
            "--json",
        ]);

        assert_eq!(cli.global.config, Some(PathBuf::from("custom.yaml")));
        assert!(matches!(
            cli.command,
            Commands::Relations { ref table, json: true } if table == "customers"
        ));
    }

    #[test]
    fn test_unknown_stack_is_rejected() {
        let result = Cli::try_parse_from(["crudkit", "generate", "orders", "--stack", "bulma"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_service_arguments() {
        let cli = Cli::parse_from([
            "crudkit",
            "service",
            "orders",
            "--folder",
            "sales-desk",
            "--dry-run",
        ]);

        match cli.command {
            Commands::Service {
                table,
                folder,
                dry_run,
            } => {
                assert_eq!(table, "orders");
                assert_eq!(folder.as_deref(), Some("sales-desk"));
                assert!(dry_run);
            }
            _ => panic!("expected service"),
        }
    }
}
