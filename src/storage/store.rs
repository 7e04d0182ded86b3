//! Inventory Store - SQLite-backed record storage
//!
//! One connection guarded by a mutex (`rusqlite::Connection` is not `Sync`).
//! The schema is created on open; foreign keys are enforced so category
//! deletes detach items and item deletes drop their transactions.
//!
//! Entity operations live next to this file:
//! - users: here
//! - categories: `categories.rs`
//! - items: `items.rs`
//! - transactions: `transactions.rs`
//! - stats: `stats.rs`

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::types::{NewUser, User, UserUpdate};
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    full_name TEXT NOT NULL DEFAULT '',
    role TEXT NOT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE COLLATE NOCASE,
    description TEXT NOT NULL DEFAULT '',
    icon TEXT,
    color TEXT,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS items (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    description TEXT,
    category_id TEXT REFERENCES categories(id) ON DELETE SET NULL,
    price REAL NOT NULL,
    cost_price REAL,
    quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
    min_stock_level INTEGER NOT NULL DEFAULT 5,
    sku TEXT,
    barcode TEXT UNIQUE,
    image TEXT,
    supplier TEXT,
    created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_items_category ON items(category_id);
CREATE INDEX IF NOT EXISTS idx_items_created ON items(created_at);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL REFERENCES items(id) ON DELETE CASCADE,
    kind TEXT NOT NULL CHECK (kind IN ('in', 'out')),
    quantity INTEGER NOT NULL CHECK (quantity > 0),
    notes TEXT,
    created_by TEXT REFERENCES users(id) ON DELETE SET NULL,
    date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_transactions_item ON transactions(item_id);
CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
";

const USER_COLUMNS: &str = "id, email, full_name, role, is_verified, created_at";

/// SQLite-backed store for users, categories, items and transactions
pub struct InventoryStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl InventoryStore {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StorageResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;

        tracing::debug!(path = ?path, "Inventory store opened");

        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Path of the backing file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// Check that the database answers queries
    pub fn ping(&self) -> bool {
        match self.conn() {
            Ok(conn) => conn
                .query_row("SELECT 1", [], |row| row.get::<_, i64>(0))
                .is_ok(),
            Err(_) => false,
        }
    }

    // ============================================
    // USERS
    // ============================================

    /// Provision a user; emails are unique regardless of case
    pub fn create_user(&self, new: NewUser) -> StorageResult<User> {
        let email = new.email.trim().to_lowercase();
        let conn = self.conn()?;

        if fetch_user_by_email(&conn, &email)?.is_some() {
            return Err(StorageError::Conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            email,
            full_name: new.full_name.trim().to_string(),
            role: new.role,
            is_verified: new.verified,
            created_at: Utc::now(),
        };

        conn.execute(
            "INSERT INTO users (id, email, full_name, role, is_verified, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.email,
                user.full_name,
                user.role.as_str(),
                user.is_verified,
                user.created_at,
            ],
        )?;

        tracing::info!(user_id = %user.id, email = %user.email, role = %user.role, "Created user");
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> StorageResult<Option<User>> {
        let conn = self.conn()?;
        fetch_user(&conn, id)
    }

    pub fn get_user_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        let conn = self.conn()?;
        fetch_user_by_email(&conn, email.trim())
    }

    pub fn list_users(&self) -> StorageResult<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM users ORDER BY created_at, email",
            USER_COLUMNS
        ))?;

        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Apply a partial update and return the stored result
    pub fn update_user(&self, id: Uuid, update: UserUpdate) -> StorageResult<User> {
        let conn = self.conn()?;
        let mut user =
            fetch_user(&conn, id)?.ok_or_else(|| StorageError::NotFound("User".to_string()))?;

        if let Some(name) = update.full_name {
            user.full_name = name.trim().to_string();
        }
        if let Some(role) = update.role {
            user.role = role;
        }
        if let Some(verified) = update.is_verified {
            user.is_verified = verified;
        }

        conn.execute(
            "UPDATE users SET full_name = ?1, role = ?2, is_verified = ?3 WHERE id = ?4",
            params![
                user.full_name,
                user.role.as_str(),
                user.is_verified,
                user.id.to_string()
            ],
        )?;

        Ok(user)
    }

    /// Mark the account with this email verified
    pub fn set_verified(&self, email: &str) -> StorageResult<User> {
        let user = self
            .get_user_by_email(email)?
            .ok_or_else(|| StorageError::NotFound("User".to_string()))?;

        self.update_user(
            user.id,
            UserUpdate {
                is_verified: Some(true),
                ..Default::default()
            },
        )
    }
}

fn fetch_user(conn: &Connection, id: Uuid) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE id = ?1", USER_COLUMNS),
            params![id.to_string()],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn fetch_user_by_email(conn: &Connection, email: &str) -> StorageResult<Option<User>> {
    let user = conn
        .query_row(
            &format!("SELECT {} FROM users WHERE email = ?1", USER_COLUMNS),
            params![email],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_col(row, 0)?,
        email: row.get(1)?,
        full_name: row.get(2)?,
        role: parsed_col(row, 3)?,
        is_verified: row.get(4)?,
        created_at: row.get(5)?,
    })
}

/// Read a TEXT column holding a UUID
pub(crate) fn uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Read a nullable TEXT column holding a UUID
pub(crate) fn opt_uuid_col(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        Uuid::parse_str(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

/// Read a TEXT column through `FromStr` (roles, transaction kinds)
pub(crate) fn parsed_col<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::from(e))
    })
}

/// Trim a free-text field, mapping blank input to `None`
pub(crate) fn clean_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A LIMIT or OFFSET for SQLite, which reads anything past `i64::MAX` as REAL
pub(crate) fn sql_bound(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
