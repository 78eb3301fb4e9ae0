// Social schema CLI - create the tables or print their DDL

use clap::{Parser, Subcommand};
use std::path::Path;

use social_schema::{
    config::Config, logging::init_logging, schemas::create_schema_registry, SocialDatabase,
};

#[derive(Debug, Parser)]
#[command(name = "social-schema", version, about = "Relational schema for the social app")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create any missing tables and indexes
    Init {
        /// Overrides DATABASE_URL
        #[arg(long)]
        database_url: Option<String>,
    },
    /// Print the CREATE statements without touching a database
    Ddl,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_logging(&config.logging);

    match cli.command {
        Command::Ddl => {
            let registry = create_schema_registry();
            registry
                .validate()
                .map_err(|errors| anyhow::anyhow!("invalid schema: {}", errors.join("; ")))?;
            for statement in registry.create_statements() {
                println!("{};\n", statement);
            }
        }
        Command::Init { database_url } => {
            if let Some(url) = database_url {
                config.database.url = url;
            }
            ensure_parent_dir(&config.database.url)?;

            let db = SocialDatabase::from_config(&config.database).await?;
            db.init().await?;
            db.health_check().await?;

            let tables = db.table_names().await?;
            tracing::info!(tables = ?tables, "database ready");
            db.close().await;
        }
    }

    Ok(())
}

/// SQLite creates the file but not its directory
fn ensure_parent_dir(url: &str) -> anyhow::Result<()> {
    let Some(path) = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:")) else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
