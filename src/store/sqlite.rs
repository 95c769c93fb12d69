use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, TransactionBehavior, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs `f` inside a write transaction. The transaction commits when `f`
    /// returns `Ok` and rolls back on drop otherwise.
    ///
    /// The connection lock is held for the whole closure, so `f` must only use
    /// the transaction it is given and never call back into the store.
    pub fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T>,
    {
        let mut conn = self.conn();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    /// Runs `f` against the connection outside of an explicit transaction.
    pub fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn();
        f(&conn)
    }
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        lower_name: row.get(1)?,
        name: row.get(2)?,
        num_stars: row.get(3)?,
        created_unix: row.get(4)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // User operations

    fn create_user(&self, name: &str) -> Result<User> {
        let conn = self.conn();
        let now = Utc::now().timestamp();
        conn.execute(
            r#"INSERT INTO "user" (lower_name, name, created_unix) VALUES (?1, ?2, ?3)"#,
            params![name.to_lowercase(), name, now],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            lower_name: name.to_lowercase(),
            name: name.to_string(),
            num_stars: 0,
            created_unix: now,
        })
    }

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            r#"SELECT id, lower_name, name, num_stars, created_unix FROM "user" WHERE id = ?1"#,
            params![id],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_by_name(&self, name: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            r#"SELECT id, lower_name, name, num_stars, created_unix
             FROM "user" WHERE lower_name = ?1"#,
            params![name.to_lowercase()],
            user_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    // Access grant operations

    fn set_access(&self, access: &Access) -> Result<()> {
        self.conn().execute(
            "INSERT INTO access (user_id, repo_id, mode)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (user_id, repo_id) DO UPDATE SET
                mode = excluded.mode",
            params![access.user_id, access.repo_id, i64::from(access.mode)],
        )?;
        Ok(())
    }

    fn get_access(&self, user_id: i64, repo_id: i64) -> Result<Option<AccessMode>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT mode FROM access WHERE user_id = ?1 AND repo_id = ?2",
            params![user_id, repo_id],
            |row| Ok(AccessMode::from(row.get::<_, i64>(0)?)),
        )
        .optional()
        .map_err(Error::from)
    }
}
