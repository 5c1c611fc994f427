//! SQLite drone store.
//!
//! Each save writes the drone row and its medication rows inside one
//! transaction, so readers observe either the previous record or the new
//! one. The optimistic version check rides in the UPDATE's WHERE clause.

use crate::store::DroneStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dronefleet_domain::{
    Drone, DroneId, DroneModel, DroneState, FleetError, Medication, MedicationId, RegisterDrone,
    Result,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::info;

/// rusqlite-backed drone store.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create or open a store at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Opening drone store");

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| FleetError::Persistence(e.to_string()))?;
        }

        let conn = Connection::open(path).map_err(persistence)?;
        // WAL mode for durability of the compensating transition
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(persistence)?;
        conn.pragma_update(None, "synchronous", "NORMAL")
            .map_err(persistence)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory store (tests).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(persistence)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS drones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                serial_number TEXT NOT NULL UNIQUE,
                model TEXT NOT NULL,
                weight_limit INTEGER NOT NULL,
                battery_level INTEGER NOT NULL,
                state TEXT NOT NULL,
                version INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS medications (
                id INTEGER PRIMARY KEY,
                drone_id INTEGER NOT NULL REFERENCES drones(id),
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                weight INTEGER NOT NULL,
                code TEXT NOT NULL,
                image BLOB NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_medications_drone ON medications(drone_id);

            CREATE TABLE IF NOT EXISTS sequences (
                name TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            );

            INSERT OR IGNORE INTO sequences (name, value) VALUES ('medication', 0);
            "#,
        )
        .map_err(persistence)?;
        Ok(())
    }

    fn read_drone(conn: &Connection, id: DroneId) -> Result<Option<Drone>> {
        let row = conn
            .query_row(
                "SELECT id, serial_number, model, weight_limit, battery_level, state,
                        version, created_at, updated_at
                 FROM drones WHERE id = ?1",
                params![id.0],
                drone_from_row,
            )
            .optional()
            .map_err(persistence)?;

        let Some(mut drone) = row.transpose()? else {
            return Ok(None);
        };
        drone.medications = Self::read_medications(conn, id)?;
        Ok(Some(drone))
    }

    fn read_medications(conn: &Connection, id: DroneId) -> Result<Vec<Medication>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, name, weight, code, image, created_at
                 FROM medications WHERE drone_id = ?1 ORDER BY position",
            )
            .map_err(persistence)?;
        let rows = stmt
            .query_map(params![id.0], |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, u32>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Vec<u8>>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })
            .map_err(persistence)?;

        let mut medications = Vec::new();
        for row in rows {
            let (med_id, name, weight, code, image, created_at) = row.map_err(persistence)?;
            medications.push(Medication {
                id: MedicationId(med_id),
                name,
                weight,
                code,
                image,
                drone_id: Some(id),
                created_at: parse_timestamp(&created_at)?,
            });
        }
        Ok(medications)
    }

    fn list_where(conn: &Connection, filter: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<Drone>> {
        let sql = format!(
            "SELECT id, serial_number, model, weight_limit, battery_level, state,
                    version, created_at, updated_at
             FROM drones {filter} ORDER BY id"
        );
        let mut stmt = conn.prepare(&sql).map_err(persistence)?;
        let rows = stmt.query_map(args, drone_from_row).map_err(persistence)?;

        let mut drones = Vec::new();
        for row in rows {
            let mut drone = row.map_err(persistence)??;
            drone.medications = Self::read_medications(conn, drone.id)?;
            drones.push(drone);
        }
        Ok(drones)
    }
}

#[async_trait]
impl DroneStore for SqliteStore {
    async fn insert(&self, request: RegisterDrone) -> Result<Drone> {
        let conn = self.conn.lock().await;

        let exists: Option<u64> = conn
            .query_row(
                "SELECT id FROM drones WHERE serial_number = ?1",
                params![request.serial_number],
                |row| row.get(0),
            )
            .optional()
            .map_err(persistence)?;
        if exists.is_some() {
            return Err(FleetError::Validation(
                "Serial number already registered".to_string(),
            ));
        }

        let now = Utc::now();
        conn.execute(
            "INSERT INTO drones (serial_number, model, weight_limit, battery_level,
                                 state, version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)",
            params![
                request.serial_number,
                request.model.to_string(),
                request.weight_limit,
                request.battery_capacity,
                DroneState::Idle.to_string(),
                now.to_rfc3339(),
            ],
        )
        .map_err(persistence)?;
        let id = DroneId(conn.last_insert_rowid() as u64);

        Ok(Drone {
            id,
            serial_number: request.serial_number,
            model: request.model,
            weight_limit: request.weight_limit,
            battery_level: request.battery_capacity,
            state: DroneState::Idle,
            medications: Vec::new(),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: DroneId) -> Result<Option<Drone>> {
        let conn = self.conn.lock().await;
        Self::read_drone(&conn, id)
    }

    async fn save(&self, mut drone: Drone, expected_version: u64) -> Result<Drone> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(persistence)?;

        let stored_version: Option<u64> = tx
            .query_row(
                "SELECT version FROM drones WHERE id = ?1",
                params![drone.id.0],
                |row| row.get(0),
            )
            .optional()
            .map_err(persistence)?;
        let actual = stored_version.ok_or_else(|| {
            FleetError::NotFound(format!("No drone found with id: {}", drone.id))
        })?;
        if actual != expected_version {
            return Err(FleetError::Conflict {
                drone: drone.id,
                expected: expected_version,
                actual,
            });
        }

        drone.version = expected_version + 1;
        drone.updated_at = Utc::now();

        tx.execute(
            "UPDATE drones
             SET battery_level = ?2, state = ?3, version = ?4, updated_at = ?5
             WHERE id = ?1 AND version = ?6",
            params![
                drone.id.0,
                drone.battery_level,
                drone.state.to_string(),
                drone.version,
                drone.updated_at.to_rfc3339(),
                expected_version,
            ],
        )
        .map_err(persistence)?;

        tx.execute(
            "DELETE FROM medications WHERE drone_id = ?1",
            params![drone.id.0],
        )
        .map_err(persistence)?;
        for (position, medication) in drone.medications.iter().enumerate() {
            tx.execute(
                "INSERT INTO medications (id, drone_id, position, name, weight, code,
                                          image, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    medication.id.0,
                    drone.id.0,
                    position as u64,
                    medication.name,
                    medication.weight,
                    medication.code,
                    medication.image,
                    medication.created_at.to_rfc3339(),
                ],
            )
            .map_err(persistence)?;
        }

        tx.commit().map_err(persistence)?;
        Ok(drone)
    }

    async fn list_available(&self, min_battery: u8) -> Result<Vec<Drone>> {
        let conn = self.conn.lock().await;
        Self::list_where(
            &conn,
            "WHERE state = 'IDLE' AND battery_level >= ?1",
            params![min_battery],
        )
    }

    async fn list_all(&self) -> Result<Vec<Drone>> {
        let conn = self.conn.lock().await;
        Self::list_where(&conn, "", params![])
    }

    async fn allocate_medication_ids(&self, count: usize) -> Result<Vec<MedicationId>> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction().map_err(persistence)?;
        tx.execute(
            "UPDATE sequences SET value = value + ?1 WHERE name = 'medication'",
            params![count as u64],
        )
        .map_err(persistence)?;
        let end: u64 = tx
            .query_row(
                "SELECT value FROM sequences WHERE name = 'medication'",
                [],
                |row| row.get(0),
            )
            .map_err(persistence)?;
        tx.commit().map_err(persistence)?;

        let start = end - count as u64 + 1;
        Ok((start..=end).map(MedicationId).collect())
    }
}

fn persistence(err: rusqlite::Error) -> FleetError {
    FleetError::Persistence(err.to_string())
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FleetError::Persistence(format!("bad timestamp '{s}': {e}")))
}

type DroneRow = Result<Drone>;

fn drone_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DroneRow> {
    let id: u64 = row.get(0)?;
    let serial_number: String = row.get(1)?;
    let model: String = row.get(2)?;
    let weight_limit: u32 = row.get(3)?;
    let battery_level: u8 = row.get(4)?;
    let state: String = row.get(5)?;
    let version: u64 = row.get(6)?;
    let created_at: String = row.get(7)?;
    let updated_at: String = row.get(8)?;

    Ok((|| {
        Ok(Drone {
            id: DroneId(id),
            serial_number,
            model: DroneModel::parse(&model)
                .ok_or_else(|| FleetError::Persistence(format!("unknown model '{model}'")))?,
            weight_limit,
            battery_level,
            state: DroneState::parse(&state)
                .ok_or_else(|| FleetError::Persistence(format!("unknown state '{state}'")))?,
            medications: Vec::new(),
            version,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    })())
}
