//! Local key-value storage.
//!
//! Plays the role of a browser's local storage: string keys, string values,
//! last write wins. `Database` keeps the values in a small SQLite file under
//! the user data directory.

use anyhow::Result;
use rusqlite::{Connection, params};
use std::path::{Path, PathBuf};

/// String key-value store.
///
/// Writes are fire-and-forget: implementations log failures instead of
/// returning them.
pub trait Storage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    /// Returns whether a value was removed
    fn remove_item(&mut self, key: &str) -> bool;
}

impl<S: Storage + ?Sized> Storage for &mut S {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> bool {
        (**self).remove_item(key)
    }
}

/// Storage that lives only as long as the value
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) -> bool {
        self.items.remove(key).is_some()
    }
}

/// SQLite-backed persistent storage
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get the database file path
    pub fn db_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("com", "folio", "Folio")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;

        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("local_storage.db"))
    }

    /// Open or create the database in the user data directory
    pub fn open() -> Result<Self> {
        Self::open_at(&Self::db_path()?)
    }

    /// Open or create the database at `path`
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        let db = Self { conn };
        db.init_schema()?;

        tracing::info!("Opened local storage at {:?}", path);
        Ok(db)
    }

    /// Open a database that is discarded when dropped
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_on TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    /// Look up a stored value
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM local_storage WHERE key = ?")?;

        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store a value, replacing any previous one
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO local_storage (key, value, updated_on)
             VALUES (?, ?, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a stored value. Returns whether anything was removed.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM local_storage WHERE key = ?", params![key])?;
        Ok(removed > 0)
    }
}

impl Storage for Database {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {} from local storage: {}", key, e);
                None
            }
        }
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Err(e) = self.set(key, value) {
            tracing::warn!("Failed to write {} to local storage: {}", key, e);
        }
    }

    fn remove_item(&mut self, key: &str) -> bool {
        self.remove(key).unwrap_or_else(|e| {
            tracing::warn!("Failed to remove {} from local storage: {}", key, e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_storage_last_write_wins() {
        let mut storage = MemoryStorage::default();
        assert_eq!(storage.get_item("portfolio-theme"), None);

        storage.set_item("portfolio-theme", "dark");
        storage.set_item("portfolio-theme", "light");
        assert_eq!(storage.get_item("portfolio-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_database_set_get_remove() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get("portfolio-theme").unwrap(), None);

        db.set("portfolio-theme", "dark").unwrap();
        db.set("portfolio-theme", "light").unwrap();
        assert_eq!(db.get("portfolio-theme").unwrap().as_deref(), Some("light"));

        assert!(db.remove("portfolio-theme").unwrap());
        assert!(!db.remove("portfolio-theme").unwrap());
        assert_eq!(db.get("portfolio-theme").unwrap(), None);
    }

    #[test]
    fn test_database_persists_across_opens() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("local_storage.db");

        {
            let mut db = Database::open_at(&path).unwrap();
            db.set_item("portfolio-theme", "light");
        }

        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get_item("portfolio-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_database_remove_item() {
        let temp_dir = TempDir::new().unwrap();
        let mut db = Database::open_at(&temp_dir.path().join("local_storage.db")).unwrap();

        db.set_item("portfolio-theme", "dark");
        assert!(db.remove_item("portfolio-theme"));
        assert!(!db.remove_item("portfolio-theme"));
        assert_eq!(db.get_item("portfolio-theme"), None);
    }

    #[test]
    fn test_storage_through_mutable_reference() {
        fn write<S: Storage>(mut storage: S) {
            storage.set_item("k", "v");
        }

        let mut storage = MemoryStorage::default();
        write(&mut storage);
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
    }
}
