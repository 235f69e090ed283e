//! # SQLite Storage Adapter
//!
//! One SQLite database backing all three repository ports.
//!
//! ## Tables
//!
//! - `handles` - credentials (sr-01), unique handle
//! - `statrep` - status reports (sr-02), store-assigned id
//! - `states`, `neighborhoods` - directory lists (sr-04)
//!
//! ## Guarantees
//!
//! - Every write runs in its own transaction; a failed write leaves no row
//! - Report reads are ordered `datetime_group DESC, id DESC`
//! - Timestamps are stored as RFC 3339 text in UTC

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use shared_types::{DatetimeGroup, Handle, RepositoryError, Timestamp};
use sr_01_credentials::{Credential, CredentialRepository, PinHash};
use sr_02_reports::{Checklist, Conditions, NewStatusReport, ReportId, ReportRepository, StatusReport};
use sr_04_directory::DirectoryRepository;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Schema version written to `PRAGMA user_version`.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const REPORT_COLUMNS: &str = "id, handle, datetime_group, state, neighborhood, location, \
     conditions, position, commercial_power, water, sanitation, grid_comms, \
     transportation, comments, created_at";

/// Failures while opening or migrating the database.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The file or its directory could not be opened.
    #[error("failed to open database {path}: {message}")]
    Open {
        /// Database path.
        path: String,
        /// Underlying error.
        message: String,
    },

    /// Schema creation failed.
    #[error("failed to bootstrap schema: {0}")]
    Schema(String),

    /// The file was written by a newer release.
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
        /// Highest version this build understands.
        supported: u32,
    },
}

/// Row counts read back from the database.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredTotals {
    /// Rows in `handles`.
    pub handles: u64,
    /// `(conditions, count)` pairs, ascending by code.
    pub reports_by_conditions: Vec<(String, u64)>,
}

/// SQLite-backed store implementing the credential, report and directory
/// repositories.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open or create a database file, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let open_err = |message: String| StorageError::Open {
            path: path.display().to_string(),
            message,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| open_err(err.to_string()))?;
        }
        let conn = Connection::open(path).map_err(|err| open_err(err.to_string()))?;
        let store = Self::bootstrap(conn)?;
        info!("[sr-runtime] Opened SQLite store at {}", path.display());
        Ok(store)
    }

    /// Private in-memory database, used by tests and dry runs.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|err| StorageError::Open {
            path: ":memory:".to_string(),
            message: err.to_string(),
        })?;
        Self::bootstrap(conn)
    }

    /// Version recorded in the database header.
    pub fn schema_version(&self) -> Result<u32, StorageError> {
        current_schema_version(&self.conn.lock())
    }

    /// Enrolled handles and stored reports per conditions code.
    pub fn stored_totals(&self) -> Result<StoredTotals, RepositoryError> {
        let conn = self.conn.lock();
        let handles: i64 = conn
            .query_row("SELECT COUNT(*) FROM handles", [], |row| row.get(0))
            .map_err(repository_error)?;

        let mut stmt = conn
            .prepare("SELECT conditions, COUNT(*) FROM statrep GROUP BY conditions ORDER BY conditions")
            .map_err(repository_error)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))
            .map_err(repository_error)?;
        let reports_by_conditions = rows
            .map(|row| row.map(|(code, count)| (code, count.max(0) as u64)))
            .collect::<Result<Vec<_>, _>>()
            .map_err(repository_error)?;

        Ok(StoredTotals {
            handles: handles.max(0) as u64,
            reports_by_conditions,
        })
    }

    fn bootstrap(conn: Connection) -> Result<Self, StorageError> {
        let found = current_schema_version(&conn)?;
        if found > CURRENT_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS handles (
                handle TEXT PRIMARY KEY NOT NULL,
                pin_hash TEXT NOT NULL,
                last_used TEXT
            );

            CREATE TABLE IF NOT EXISTS statrep (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                handle TEXT NOT NULL,
                datetime_group TEXT NOT NULL,
                state TEXT NOT NULL,
                neighborhood TEXT NOT NULL,
                location TEXT NOT NULL,
                conditions TEXT NOT NULL,
                position TEXT,
                commercial_power TEXT,
                water TEXT,
                sanitation TEXT,
                grid_comms TEXT,
                transportation TEXT,
                comments TEXT,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_statrep_handle
                ON statrep(handle, datetime_group);
            CREATE INDEX IF NOT EXISTS idx_statrep_location
                ON statrep(state, neighborhood, datetime_group);

            CREATE TABLE IF NOT EXISTS states (
                name TEXT PRIMARY KEY NOT NULL
            );

            CREATE TABLE IF NOT EXISTS neighborhoods (
                name TEXT PRIMARY KEY NOT NULL
            );
            ",
        )
        .map_err(|err| StorageError::Schema(err.to_string()))?;

        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
            .map_err(|err| StorageError::Schema(err.to_string()))?;
        debug!("[sr-runtime] Schema at version {}", CURRENT_SCHEMA_VERSION);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn load_names(&self, sql: &str) -> Result<Vec<String>, RepositoryError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).map_err(repository_error)?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(repository_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(repository_error)
    }

    fn insert_name(&self, sql: &str, name: &str) -> Result<(), RepositoryError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(repository_error)?;
        tx.execute(sql, params![name]).map_err(repository_error)?;
        tx.commit().map_err(repository_error)
    }

    fn update_handle_row(&self, sql: &str, handle: &str, value: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(repository_error)?;
        let changed = tx.execute(sql, params![value, handle]).map_err(repository_error)?;
        tx.commit().map_err(repository_error)?;
        Ok(changed > 0)
    }

    fn query_reports(
        &self,
        sql: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<StatusReport>, RepositoryError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).map_err(repository_error)?;
        let rows = stmt.query_map(args, map_report).map_err(repository_error)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(repository_error)
    }
}

#[async_trait]
impl CredentialRepository for SqliteStore {
    async fn find_credential(&self, handle: &str) -> Result<Option<Credential>, RepositoryError> {
        let row = {
            let conn = self.conn.lock();
            conn.query_row(
                "SELECT handle, pin_hash, last_used FROM handles WHERE handle = ?1",
                params![handle],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(repository_error)?
        };

        let Some((handle, pin_hash, last_used)) = row else {
            return Ok(None);
        };
        let pin_hash = PinHash::from_hex(&pin_hash).ok_or_else(|| {
            RepositoryError::Database(format!("malformed pin hash for handle {handle}"))
        })?;
        let last_used = last_used
            .map(|text| parse_timestamp(&text))
            .transpose()
            .map_err(|err| RepositoryError::Database(format!("bad last_used for {handle}: {err}")))?;

        Ok(Some(Credential {
            handle,
            pin_hash,
            last_used,
        }))
    }

    async fn insert_credential(&self, credential: Credential) -> Result<(), RepositoryError> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(repository_error)?;
        tx.execute(
            "INSERT INTO handles (handle, pin_hash, last_used) VALUES (?1, ?2, ?3)",
            params![
                credential.handle,
                credential.pin_hash.as_str(),
                credential.last_used.map(|at| at.to_rfc3339()),
            ],
        )
        .map_err(repository_error)?;
        tx.commit().map_err(repository_error)
    }

    async fn update_pin_hash(
        &self,
        handle: &str,
        pin_hash: PinHash,
    ) -> Result<bool, RepositoryError> {
        self.update_handle_row(
            "UPDATE handles SET pin_hash = ?1 WHERE handle = ?2",
            handle,
            pin_hash.as_str(),
        )
    }

    async fn update_last_used(&self, handle: &str, at: Timestamp) -> Result<bool, RepositoryError> {
        self.update_handle_row(
            "UPDATE handles SET last_used = ?1 WHERE handle = ?2",
            handle,
            &at.to_rfc3339(),
        )
    }

    async fn list_handles(&self) -> Result<Vec<Handle>, RepositoryError> {
        self.load_names("SELECT handle FROM handles ORDER BY handle ASC")
    }
}

#[async_trait]
impl ReportRepository for SqliteStore {
    async fn insert_report(
        &self,
        report: NewStatusReport,
        created_at: Timestamp,
    ) -> Result<StatusReport, RepositoryError> {
        let checklist = report.checklist.clone().unwrap_or_default();
        let id = {
            let mut conn = self.conn.lock();
            let tx = conn.transaction().map_err(repository_error)?;
            tx.execute(
                "INSERT INTO statrep (
                    handle, datetime_group, state, neighborhood, location, conditions,
                    position, commercial_power, water, sanitation, grid_comms,
                    transportation, comments, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
                params![
                    report.handle,
                    report.datetime_group.as_str(),
                    report.state,
                    report.neighborhood,
                    report.location,
                    report.conditions.code(),
                    checklist.position,
                    checklist.commercial_power,
                    checklist.water,
                    checklist.sanitation,
                    checklist.grid_comms,
                    checklist.transportation,
                    checklist.comments,
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(repository_error)?;
            let id = tx.last_insert_rowid();
            tx.commit().map_err(repository_error)?;
            id
        };

        Ok(StatusReport {
            id: ReportId(id),
            report,
            created_at,
        })
    }

    async fn last_report_for(&self, handle: &str) -> Result<Option<StatusReport>, RepositoryError> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM statrep WHERE handle = ?1 \
             ORDER BY datetime_group DESC, id DESC LIMIT 1"
        );
        let conn = self.conn.lock();
        conn.query_row(&sql, params![handle], map_report)
            .optional()
            .map_err(repository_error)
    }

    async fn reports_by_location(
        &self,
        state: &str,
        neighborhood: &str,
        limit: usize,
    ) -> Result<Vec<StatusReport>, RepositoryError> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM statrep WHERE state = ?1 AND neighborhood = ?2 \
             ORDER BY datetime_group DESC, id DESC LIMIT ?3"
        );
        self.query_reports(&sql, params![state, neighborhood, sql_limit(limit)])
    }

    async fn reports_for(&self, handle: &str) -> Result<Vec<StatusReport>, RepositoryError> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM statrep WHERE handle = ?1 \
             ORDER BY datetime_group DESC, id DESC"
        );
        self.query_reports(&sql, params![handle])
    }

    async fn recent_reports(&self, limit: usize) -> Result<Vec<StatusReport>, RepositoryError> {
        let sql = format!(
            "SELECT {REPORT_COLUMNS} FROM statrep \
             ORDER BY datetime_group DESC, id DESC LIMIT ?1"
        );
        self.query_reports(&sql, params![sql_limit(limit)])
    }
}

#[async_trait]
impl DirectoryRepository for SqliteStore {
    async fn load_handles(&self) -> Result<Vec<String>, RepositoryError> {
        self.load_names("SELECT handle FROM handles ORDER BY handle ASC")
    }

    async fn load_states(&self) -> Result<Vec<String>, RepositoryError> {
        self.load_names("SELECT name FROM states ORDER BY name ASC")
    }

    async fn load_neighborhoods(&self) -> Result<Vec<String>, RepositoryError> {
        self.load_names("SELECT name FROM neighborhoods ORDER BY name ASC")
    }

    async fn insert_state(&self, name: &str) -> Result<(), RepositoryError> {
        self.insert_name("INSERT INTO states (name) VALUES (?1)", name)
    }

    async fn insert_neighborhood(&self, name: &str) -> Result<(), RepositoryError> {
        self.insert_name("INSERT INTO neighborhoods (name) VALUES (?1)", name)
    }
}

fn current_schema_version(conn: &Connection) -> Result<u32, StorageError> {
    conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))
        .map_err(|err| StorageError::Schema(err.to_string()))
}

fn map_report(row: &Row<'_>) -> rusqlite::Result<StatusReport> {
    let conditions: String = row.get("conditions")?;
    let conditions: Conditions = conditions
        .parse()
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(err)))?;
    let created_at: String = row.get("created_at")?;
    let created_at = parse_timestamp(&created_at)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(14, Type::Text, Box::new(err)))?;

    let checklist = Checklist {
        position: row.get("position")?,
        commercial_power: row.get("commercial_power")?,
        water: row.get("water")?,
        sanitation: row.get("sanitation")?,
        grid_comms: row.get("grid_comms")?,
        transportation: row.get("transportation")?,
        comments: row.get("comments")?,
    };

    Ok(StatusReport {
        id: ReportId(row.get("id")?),
        report: NewStatusReport {
            handle: row.get("handle")?,
            datetime_group: DatetimeGroup::new(row.get::<_, String>("datetime_group")?),
            state: row.get("state")?,
            neighborhood: row.get("neighborhood")?,
            location: row.get("location")?,
            conditions,
            checklist: Some(checklist).filter(|c| !c.is_empty()),
        },
        created_at,
    })
}

fn parse_timestamp(text: &str) -> Result<Timestamp, chrono::ParseError> {
    DateTime::parse_from_rfc3339(text).map(|at| at.with_timezone(&Utc))
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

fn repository_error(err: rusqlite::Error) -> RepositoryError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
            ErrorCode::ConstraintViolation => RepositoryError::Conflict(err.to_string()),
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::CannotOpen => {
                RepositoryError::Unavailable(err.to_string())
            }
            _ => RepositoryError::Database(err.to_string()),
        },
        _ => RepositoryError::Database(err.to_string()),
    }
}
