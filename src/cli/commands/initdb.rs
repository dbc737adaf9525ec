use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, trace};

/// File path of a `sqlite://` URL, without query parameters.
fn sqlite_file(database_url: &str) -> Option<PathBuf> {
    let rest = database_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path.starts_with(":memory:") {
        return None;
    }
    Some(PathBuf::from(path))
}

fn ensure_parent_dir(file: &Path) -> Result<()> {
    if let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            debug!("Creating database directory {}", parent.display());
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }
    Ok(())
}

/// Applies every pending migration to the database at `database_url`.
pub async fn init_database(database_url: &str) -> Result<()> {
    trace!("Entering init_database function");
    info!("Initializing database");

    if let Some(file) = sqlite_file(database_url) {
        ensure_parent_dir(&file)?;
    }

    let db = match Database::connect(database_url).await {
        Ok(connection) => {
            info!("Successfully connected to database");
            connection
        }
        Err(e) => {
            error!("Failed to connect to database '{}': {}", database_url, e);
            return Err(e.into());
        }
    };

    let pending = Migrator::get_pending_migrations(&db).await?;
    info!("Running {} pending database migrations", pending.len());
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run database migrations: {}", e);
        return Err(e.into());
    }

    info!("Database initialization completed successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_file() {
        assert_eq!(
            sqlite_file("sqlite://data/rentwise.db?mode=rwc"),
            Some(PathBuf::from("data/rentwise.db"))
        );
        assert_eq!(
            sqlite_file("sqlite:///var/lib/rentwise.db"),
            Some(PathBuf::from("/var/lib/rentwise.db"))
        );
        assert_eq!(sqlite_file("sqlite::memory:"), None);
        assert_eq!(sqlite_file("postgresql://user@localhost/rentwise"), None);
    }

    #[tokio::test]
    async fn test_init_database_in_memory() {
        init_database("sqlite::memory:").await.unwrap();
    }

    #[test]
    fn test_ensure_parent_dir_creates_missing_directory() {
        let root = std::env::temp_dir().join(format!("rentwise-initdb-{}", std::process::id()));
        let file = root.join("nested").join("rentwise.db");

        ensure_parent_dir(&file).unwrap();
        assert!(root.join("nested").is_dir());

        std::fs::remove_dir_all(&root).unwrap();
    }
}
