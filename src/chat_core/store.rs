use anyhow::{Context, Result};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};

use super::schema::appointments;
use super::types::{Appointment, NewAppointment};

type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
type Pooled = PooledConnection<ConnectionManager<SqliteConnection>>;

const CREATE_APPOINTMENTS: &str = "CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT NOT NULL,
    owner TEXT NOT NULL,
    location TEXT NOT NULL,
    appointment_date TEXT NOT NULL,
    appointment_time TEXT NOT NULL
)";

/// Booked appointments, kept in SQLite.
///
/// Diesel is synchronous, so every query runs on tokio's blocking pool.
#[derive(Clone)]
pub struct AppointmentStore {
    pool: SqlitePool,
}

impl AppointmentStore {
    pub fn connect(database_url: &str) -> Result<AppointmentStore> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_url);
        let pool = Pool::builder()
            .build(manager)
            .with_context(|| format!("Failed to open appointment database {database_url}"))?;
        AppointmentStore::with_pool(pool)
    }

    /// A private in-memory database. A single pooled connection keeps it alive.
    #[cfg(test)]
    pub fn in_memory() -> Result<AppointmentStore> {
        let manager = ConnectionManager::<SqliteConnection>::new(":memory:");
        let pool = Pool::builder().max_size(1).build(manager)?;
        AppointmentStore::with_pool(pool)
    }

    fn with_pool(pool: SqlitePool) -> Result<AppointmentStore> {
        let mut conn = pool.get()?;
        diesel::sql_query(CREATE_APPOINTMENTS).execute(&mut conn)?;
        Ok(AppointmentStore { pool })
    }

    pub async fn book(&self, appointment: NewAppointment) -> Result<()> {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            insert_conn(&appointment, &mut conn)
        })
        .await?
    }

    /// Appointments owned by `owner`, latest date first.
    pub async fn list_for(&self, owner: &str) -> Result<Vec<Appointment>> {
        let pool = self.pool.clone();
        let owner = owner.to_string();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get()?;
            retrieve_for_conn(&owner, &mut conn)
        })
        .await?
    }

    #[cfg(test)]
    pub(crate) fn execute_raw(&self, sql: &str) -> Result<()> {
        let mut conn = self.pool.get()?;
        diesel::sql_query(sql).execute(&mut conn)?;
        Ok(())
    }
}

fn insert_conn(appointment: &NewAppointment, conn: &mut Pooled) -> Result<()> {
    diesel::insert_into(appointments::table)
        .values(appointment)
        .execute(conn)?;
    Ok(())
}

fn retrieve_for_conn(owner: &str, conn: &mut Pooled) -> Result<Vec<Appointment>> {
    let found = appointments::table
        .filter(appointments::owner.eq(owner))
        .order((
            appointments::appointment_date.desc(),
            appointments::appointment_time.desc(),
        ))
        .select(Appointment::as_select())
        .load(conn)?;
    Ok(found)
}
