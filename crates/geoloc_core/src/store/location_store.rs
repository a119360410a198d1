//! Location store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD primitives over the `locations` table.
//! - Assign ids and timestamps; callers never supply them.
//!
//! # Invariants
//! - Write paths validate before any SQL mutation.
//! - Every mutation commits before returning.
//! - `list()` returns insertion order (`seq ASC`).
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::clock::{Clock, SystemClock};
use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::location::{
    validate_rate, Geo, Location, LocationDraft, LocationId, LocationPatch,
    LocationValidationError,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const LOCATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    rate,
    lat,
    lng,
    address,
    zoom,
    created_at,
    updated_at
FROM locations";

const REQUIRED_COLUMNS: &[&str] = &[
    "seq",
    "id",
    "name",
    "rate",
    "lat",
    "lng",
    "address",
    "zoom",
    "created_at",
    "updated_at",
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error covering validation, lookup and storage failures.
#[derive(Debug)]
pub enum StoreError {
    Validation(LocationValidationError),
    NotFound(LocationId),
    /// Durable medium unavailable or write failure.
    Db(DbError),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "location not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted location data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} is behind required {expected_version}; open it with open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LocationValidationError> for StoreError {
    fn from(value: LocationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable id-to-location mapping. CRUD only, no query policy.
pub trait LocationStore {
    /// Persists a new record under a freshly generated id.
    ///
    /// `draft.id` is ignored; routing on it is the caller's job.
    fn create(&self, draft: &LocationDraft) -> StoreResult<Location>;
    /// Merges `patch` into an existing record and refreshes `updated_at`.
    fn update(&self, id: LocationId, patch: &LocationPatch) -> StoreResult<Location>;
    /// Deletes one record. A second call for the same id is `NotFound`.
    fn remove(&self, id: LocationId) -> StoreResult<()>;
    fn get_by_id(&self, id: LocationId) -> StoreResult<Location>;
    /// All records in insertion order.
    fn list(&self) -> StoreResult<Vec<Location>>;
    fn count(&self) -> StoreResult<usize>;
}

impl<S: LocationStore + ?Sized> LocationStore for &S {
    fn create(&self, draft: &LocationDraft) -> StoreResult<Location> {
        (**self).create(draft)
    }

    fn update(&self, id: LocationId, patch: &LocationPatch) -> StoreResult<Location> {
        (**self).update(id, patch)
    }

    fn remove(&self, id: LocationId) -> StoreResult<()> {
        (**self).remove(id)
    }

    fn get_by_id(&self, id: LocationId) -> StoreResult<Location> {
        (**self).get_by_id(id)
    }

    fn list(&self) -> StoreResult<Vec<Location>> {
        (**self).list()
    }

    fn count(&self) -> StoreResult<usize> {
        (**self).count()
    }
}

/// SQLite-backed location store.
pub struct SqliteLocationStore<'conn, C: Clock = SystemClock> {
    conn: &'conn Connection,
    clock: C,
}

impl<'conn> SqliteLocationStore<'conn> {
    /// Constructs a store on a migrated connection using the wall clock.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        Self::with_clock(conn, SystemClock)
    }
}

impl<'conn, C: Clock> SqliteLocationStore<'conn, C> {
    /// Constructs a store that stamps records with `clock`.
    ///
    /// # Errors
    /// - Rejects connections that were not opened through `open_db*` or
    ///   whose `locations` table does not match the expected shape.
    pub fn with_clock(conn: &'conn Connection, clock: C) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn, clock })
    }

    fn find(&self, conn: &Connection, id: LocationId) -> StoreResult<Option<Location>> {
        let mut stmt = conn.prepare(&format!("{LOCATION_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_location_row(row)?)),
            None => Ok(None),
        }
    }
}

impl<C: Clock> LocationStore for SqliteLocationStore<'_, C> {
    fn create(&self, draft: &LocationDraft) -> StoreResult<Location> {
        let draft = draft.clone().validated()?;
        let now = self.clock.now_ms();
        let location = Location {
            id: Uuid::new_v4(),
            name: draft.name,
            rate: draft.rate,
            geo: draft.geo,
            created_at: now,
            updated_at: now,
        };

        self.conn.execute(
            "INSERT INTO locations (
                id,
                name,
                rate,
                lat,
                lng,
                address,
                zoom,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                location.id.to_string(),
                location.name.as_str(),
                location.rate,
                location.geo.lat,
                location.geo.lng,
                location.geo.address.as_str(),
                location.geo.zoom,
                location.created_at,
                location.updated_at,
            ],
        )?;

        Ok(location)
    }

    fn update(&self, id: LocationId, patch: &LocationPatch) -> StoreResult<Location> {
        let tx = self.conn.unchecked_transaction()?;
        let existing = self.find(&tx, id)?.ok_or(StoreError::NotFound(id))?;

        let mut updated = patch.apply_to(&existing)?;
        // Strictly after creation, so `updated_at == created_at` keeps
        // meaning "never updated".
        let earliest = existing.created_at.saturating_add(1);
        if earliest <= existing.created_at {
            return Err(StoreError::InvalidData(format!(
                "created_at `{}` leaves no room for an update stamp",
                existing.created_at
            )));
        }
        updated.updated_at = self.clock.now_ms().max(earliest);
        updated.validate()?;

        tx.execute(
            "UPDATE locations
             SET
                name = ?1,
                rate = ?2,
                lat = ?3,
                lng = ?4,
                address = ?5,
                zoom = ?6,
                updated_at = ?7
             WHERE id = ?8;",
            params![
                updated.name.as_str(),
                updated.rate,
                updated.geo.lat,
                updated.geo.lng,
                updated.geo.address.as_str(),
                updated.geo.zoom,
                updated.updated_at,
                id.to_string(),
            ],
        )?;
        tx.commit()?;

        Ok(updated)
    }

    fn remove(&self, id: LocationId) -> StoreResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM locations WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    fn get_by_id(&self, id: LocationId) -> StoreResult<Location> {
        self.find(self.conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn list(&self) -> StoreResult<Vec<Location>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{LOCATION_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut locations = Vec::new();

        while let Some(row) = rows.next()? {
            locations.push(parse_location_row(row)?);
        }

        Ok(locations)
    }

    fn count(&self) -> StoreResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| StoreError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version < expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'locations';",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if table.is_none() {
        return Err(StoreError::MissingRequiredTable("locations"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('locations');")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    for &column in REQUIRED_COLUMNS {
        if !columns.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: "locations",
                column,
            });
        }
    }

    Ok(())
}

fn parse_location_row(row: &Row<'_>) -> StoreResult<Location> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{id_text}` in locations.id"))
    })?;

    let rate_value: i64 = row.get("rate")?;
    validate_rate(rate_value).map_err(invalid_row)?;
    let rate = u8::try_from(rate_value).map_err(|_| {
        StoreError::InvalidData(format!("invalid rate `{rate_value}` in locations.rate"))
    })?;

    let zoom_value: i64 = row.get("zoom")?;
    let zoom = u32::try_from(zoom_value).map_err(|_| {
        StoreError::InvalidData(format!("invalid zoom `{zoom_value}` in locations.zoom"))
    })?;

    let location = Location {
        id,
        name: row.get("name")?,
        rate,
        geo: Geo {
            lat: row.get("lat")?,
            lng: row.get("lng")?,
            address: row.get("address")?,
            zoom,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    location.validate().map_err(invalid_row)?;
    Ok(location)
}

fn invalid_row(err: LocationValidationError) -> StoreError {
    StoreError::InvalidData(err.to_string())
}
