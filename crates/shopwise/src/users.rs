//! Persistence of signup and signin form submissions.
//!
//! Submissions are recorded as-is; nothing here authenticates a user.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use crate::types::{ShopError, ShopResult, SigninRecord, SignupRecord, StoredSignup};

/// Destination for user form submissions.
pub trait UserStore: Send {
    /// Record a signup and return its row id.
    fn record_signup(&mut self, record: &SignupRecord) -> ShopResult<i64>;

    /// Record a signin attempt and return its row id.
    fn record_signin(&mut self, record: &SigninRecord) -> ShopResult<i64>;

    fn signup_count(&self) -> ShopResult<usize>;

    fn signin_count(&self) -> ShopResult<usize>;

    /// Most recent signups first.
    fn recent_signups(&self, limit: usize) -> ShopResult<Vec<StoredSignup>>;
}

fn require(field: &str, value: &str) -> ShopResult<()> {
    if value.trim().is_empty() {
        return Err(ShopError::InvalidInput(format!("'{field}' must not be empty")));
    }
    Ok(())
}

/// Reject submissions with missing fields.
pub fn validate_signup(record: &SignupRecord) -> ShopResult<()> {
    require("username", &record.username)?;
    require("email", &record.email)?;
    require("password", &record.password)
}

/// Reject submissions with missing fields.
pub fn validate_signin(record: &SigninRecord) -> ShopResult<()> {
    require("username", &record.username)?;
    require("password", &record.password)
}

/// SQLite-backed store with `signup` and `signin` tables.
pub struct SqliteUserStore {
    conn: Connection,
}

impl SqliteUserStore {
    /// Open or create the database at `path`, creating parent directories and tables.
    pub fn open(path: impl AsRef<Path>) -> ShopResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        tracing::info!("Opening user store: {}", path.display());
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init()?;
        Ok(store)
    }

    pub fn open_in_memory() -> ShopResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> ShopResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS signup (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                email TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS signin (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL,
                password TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn count(&self, table: &str) -> ShopResult<usize> {
        let count: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| {
            ShopError::InvalidInput(format!("Negative row count in {table}: {count}"))
        })
    }
}

impl UserStore for SqliteUserStore {
    fn record_signup(&mut self, record: &SignupRecord) -> ShopResult<i64> {
        validate_signup(record)?;
        self.conn.execute(
            "INSERT INTO signup (username, email, password, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                record.username,
                record.email,
                record.password,
                Utc::now().to_rfc3339()
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Recorded signup {id} for '{}'", record.username);
        Ok(id)
    }

    fn record_signin(&mut self, record: &SigninRecord) -> ShopResult<i64> {
        validate_signin(record)?;
        self.conn.execute(
            "INSERT INTO signin (username, password, created_at) VALUES (?1, ?2, ?3)",
            params![record.username, record.password, Utc::now().to_rfc3339()],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::debug!("Recorded signin {id} for '{}'", record.username);
        Ok(id)
    }

    fn signup_count(&self) -> ShopResult<usize> {
        self.count("signup")
    }

    fn signin_count(&self) -> ShopResult<usize> {
        self.count("signin")
    }

    fn recent_signups(&self, limit: usize) -> ShopResult<Vec<StoredSignup>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, email, created_at FROM signup ORDER BY id DESC LIMIT ?1",
        )?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt.query_map(params![limit], |row| {
            Ok(StoredSignup {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        let signups = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(signups)
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    signups: Vec<StoredSignup>,
    signins: usize,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryUserStore {
    fn record_signup(&mut self, record: &SignupRecord) -> ShopResult<i64> {
        validate_signup(record)?;
        let id = self.signups.len() as i64 + 1;
        self.signups.push(StoredSignup {
            id,
            username: record.username.clone(),
            email: record.email.clone(),
            created_at: Utc::now().to_rfc3339(),
        });
        Ok(id)
    }

    fn record_signin(&mut self, record: &SigninRecord) -> ShopResult<i64> {
        validate_signin(record)?;
        self.signins += 1;
        Ok(self.signins as i64)
    }

    fn signup_count(&self) -> ShopResult<usize> {
        Ok(self.signups.len())
    }

    fn signin_count(&self) -> ShopResult<usize> {
        Ok(self.signins)
    }

    fn recent_signups(&self, limit: usize) -> ShopResult<Vec<StoredSignup>> {
        Ok(self.signups.iter().rev().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: &str) -> SignupRecord {
        SignupRecord {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password: "hunter2".to_string(),
        }
    }

    fn exercise(store: &mut dyn UserStore) {
        assert_eq!(store.record_signup(&signup("alice")).unwrap(), 1);
        assert_eq!(store.record_signup(&signup("bob")).unwrap(), 2);
        store
            .record_signin(&SigninRecord {
                username: "alice".into(),
                password: "hunter2".into(),
            })
            .unwrap();

        assert_eq!(store.signup_count().unwrap(), 2);
        assert_eq!(store.signin_count().unwrap(), 1);

        let recent = store.recent_signups(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].username, "bob");
        assert_eq!(recent[0].email, "bob@example.com");
    }

    #[test]
    fn test_sqlite_in_memory() {
        let mut store = SqliteUserStore::open_in_memory().unwrap();
        exercise(&mut store);
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryUserStore::new();
        exercise(&mut store);
    }

    #[test]
    fn test_empty_fields_rejected() {
        let mut store = SqliteUserStore::open_in_memory().unwrap();
        let mut bad = signup("carol");
        bad.email = "  ".into();
        assert!(matches!(
            store.record_signup(&bad),
            Err(ShopError::InvalidInput(_))
        ));
        let err = store.record_signin(&SigninRecord {
            username: String::new(),
            password: "x".into(),
        });
        assert!(err.is_err());
        assert_eq!(store.signup_count().unwrap(), 0);
    }

    #[test]
    fn test_sqlite_file_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("users.db");
        {
            let mut store = SqliteUserStore::open(&path).unwrap();
            store.record_signup(&signup("dave")).unwrap();
        }
        let store = SqliteUserStore::open(&path).unwrap();
        assert_eq!(store.signup_count().unwrap(), 1);
    }

    #[test]
    fn test_recent_signups_unbounded_limit() {
        let mut store = SqliteUserStore::open_in_memory().unwrap();
        for name in ["erin", "frank", "gina"] {
            store.record_signup(&signup(name)).unwrap();
        }
        let all = store.recent_signups(usize::MAX).unwrap();
        let names: Vec<_> = all.iter().map(|s| s.username.as_str()).collect();
        assert_eq!(names, vec!["gina", "frank", "erin"]);
        assert!(store.recent_signups(0).unwrap().is_empty());
        assert_eq!(store.signup_count().unwrap(), 3);
    }
}
