use std::process::ExitCode;

use clap::Parser;
use dotenvy::dotenv;
use sea_orm::Database;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "migrator", version, about = "Apply pending schema migrations")]
struct Cli {
    /// Database connection URL (postgres:// or sqlite:)
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Table recording applied migrations
    #[arg(long, default_value = migration::DEFAULT_MIGRATIONS_TABLE)]
    migrations_table: String,
}

async fn migrate(cli: &Cli) -> anyhow::Result<()> {
    if cli.database_url.trim().is_empty() {
        anyhow::bail!("database url is required");
    }
    if cli.migrations_table.trim().is_empty() {
        anyhow::bail!("migrations table is required");
    }
    if !migration::set_migrations_table(cli.migrations_table.trim()) {
        anyhow::bail!("migrations table already set to {}", migration::migrations_table());
    }

    let db = Database::connect(cli.database_url.as_str()).await?;
    let applied = migration::apply_pending(&db).await;
    db.close().await?;

    match applied? {
        0 => info!(table = migration::migrations_table(), "no migrations to apply"),
        n => info!(count = n, table = migration::migrations_table(), "migrations applied successfully"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();
    common::utils::logging::init_logging_default("info,sqlx=warn");

    match migrate(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "migration failed");
            ExitCode::FAILURE
        }
    }
}
