//! User Storage
//! Mission: Persist user identities with SQLite and serve credential lookups

use crate::auth::errors::StoreError;
use crate::auth::models::{normalize_email, User};
use parking_lot::Mutex;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Lookup capability the authenticator and account service depend on.
///
/// Implementations own email uniqueness: at most one user per normalized email.
pub trait CredentialStore: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError>;

    /// Insert a new user, failing with `DuplicateEmail` if the email is taken
    fn insert(&self, user: &User) -> Result<(), StoreError>;

    fn update_password_hash(&self, id: &Uuid, password_hash: &str) -> Result<(), StoreError>;
}

/// User storage with SQLite backend
pub struct UserStore {
    conn: Arc<Mutex<Connection>>,
}

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, created_at";

impl UserStore {
    /// Open (or create) the user database at the given path
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_db()?;
        Ok(store)
    }

    /// Initialize database schema
    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    /// Number of registered users
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn query_one(&self, sql: &str, key: &str) -> Result<Option<User>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;

        let raw = stmt.query_row(params![key], raw_user).optional()?;

        raw.map(RawUser::into_user).transpose()
    }
}

impl CredentialStore for UserStore {
    fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1");
        self.query_one(&sql, &normalize_email(email))
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        self.query_one(&sql, &id.to_string())
    }

    fn insert(&self, user: &User) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        let result = conn.execute(
            "INSERT INTO users (id, first_name, last_name, email, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.first_name,
                user.last_name,
                normalize_email(&user.email),
                user.password_hash,
                user.created_at,
            ],
        );

        match result {
            Ok(_) => {
                info!("✅ Stored user: {}", user.id);
                Ok(())
            }
            // Only the email index is UNIQUE; primary key and NOT NULL failures stay raw
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Err(StoreError::DuplicateEmail)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_password_hash(&self, id: &Uuid, password_hash: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock();
        conn.execute(
            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
            params![password_hash, id.to_string()],
        )?;
        Ok(())
    }
}

/// Row as read from SQLite, before the id is parsed
struct RawUser {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    created_at: String,
}

impl RawUser {
    fn into_user(self) -> Result<User, StoreError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| StoreError::CorruptRecord(format!("user id {:?}: {}", self.id, e)))?;
        Ok(User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        })
    }
}

fn raw_user(row: &Row<'_>) -> rusqlite::Result<RawUser> {
    Ok(RawUser {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        password_hash: row.get(4)?,
        created_at: row.get(5)?,
    })
}
