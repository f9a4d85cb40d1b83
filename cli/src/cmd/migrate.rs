use std::io::Write;

use tracing::{event, Level};

use crate::{config::Config, Error, Result};

/// Create the roster tables in the database named by `DATABASE_URL`.
pub async fn migrate(config: &Config, out: &mut dyn Write) -> Result<()> {
    let database_url = config
        .database_url
        .as_deref()
        .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;

    let pool = roster_db::connect(database_url, 1).map_err(|e| Error::Migration(e.to_string()))?;
    let conn = pool.get().await.map_err(roster_store::Error::from)?;
    conn.interact(|conn| roster_db::run_migrations(conn).map_err(|e| e.to_string()))
        .await
        .map_err(|e| Error::Migration(e.to_string()))?
        .map_err(Error::Migration)?;

    event!(Level::INFO, "Migrations complete");
    writeln!(out, "Datenbank ist aktuell")?;
    Ok(())
}
