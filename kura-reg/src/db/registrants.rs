//! Member and aspirant persistence
//!
//! Both record kinds share one code path; [`RecordKind`] picks the table and
//! whether the `position` column is read and written.

use chrono::{SecondsFormat, Utc};
use kura_common::db::{Position, RecordKind, Registrant, RegistrationForm};
use kura_common::{Error, Result};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

/// Current time as fixed-width RFC 3339, so text ordering is time ordering
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn columns(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Member => {
            "id, name, national_id, mobile, email, county, constituency, ward, created_at, updated_at"
        }
        RecordKind::Aspirant => {
            "id, name, national_id, mobile, email, county, constituency, ward, position, created_at, updated_at"
        }
    }
}

fn duplicate_message(kind: RecordKind) -> String {
    format!("{} with this National ID already exists", kind.label())
}

fn not_found_message(kind: RecordKind, id: &str) -> String {
    format!("{} not found: {}", kind.label(), id)
}

/// Map an insert/update failure, turning unique violations into `Duplicate`
fn map_write_error(kind: RecordKind, err: sqlx::Error) -> Error {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Error::Duplicate(duplicate_message(kind))
        }
        other => Error::Database(other),
    }
}

/// Position to store for `kind`; aspirants must have one, members never do
fn position_for(kind: RecordKind, form: &RegistrationForm) -> Result<Option<Position>> {
    match (kind, form.position) {
        (RecordKind::Aspirant, None) => {
            Err(Error::InvalidInput("Position is required".to_string()))
        }
        (RecordKind::Aspirant, Some(p)) => Ok(Some(p)),
        (RecordKind::Member, _) => Ok(None),
    }
}

fn row_to_registrant(kind: RecordKind, row: &SqliteRow) -> Result<Registrant> {
    let position = match kind {
        RecordKind::Aspirant => {
            let raw: String = row.try_get("position")?;
            let position = raw
                .parse::<Position>()
                .map_err(|e| Error::Internal(format!("Corrupt aspirant row: {}", e)))?;
            Some(position)
        }
        RecordKind::Member => None,
    };

    Ok(Registrant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        national_id: row.try_get("national_id")?,
        mobile: row.try_get("mobile")?,
        email: row.try_get("email")?,
        county: row.try_get("county")?,
        constituency: row.try_get("constituency")?,
        ward: row.try_get("ward")?,
        position,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Load a record by id
pub async fn find_by_id(pool: &SqlitePool, kind: RecordKind, id: &str) -> Result<Option<Registrant>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?", columns(kind), kind.table());
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.as_ref().map(|r| row_to_registrant(kind, r)).transpose()
}

/// Load a record by national identifier
pub async fn find_by_national_id(
    pool: &SqlitePool,
    kind: RecordKind,
    national_id: &str,
) -> Result<Option<Registrant>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE national_id = ?",
        columns(kind),
        kind.table()
    );
    let row = sqlx::query(&sql).bind(national_id).fetch_optional(pool).await?;
    row.as_ref().map(|r| row_to_registrant(kind, r)).transpose()
}

/// Insert a new record unless its national id is already registered
///
/// The pre-check gives the usual duplicate path a clear message; the UNIQUE
/// constraint still catches two concurrent registrations of the same id.
pub async fn create_unique(
    pool: &SqlitePool,
    kind: RecordKind,
    form: &RegistrationForm,
) -> Result<Registrant> {
    let position = position_for(kind, form)?;

    if find_by_national_id(pool, kind, &form.national_id).await?.is_some() {
        debug!("Rejected duplicate {} registration", kind);
        return Err(Error::Duplicate(duplicate_message(kind)));
    }

    let now = timestamp();
    let registrant = Registrant {
        id: Uuid::new_v4().to_string(),
        name: form.name.clone(),
        national_id: form.national_id.clone(),
        mobile: form.mobile.clone(),
        email: form.email.clone(),
        county: form.county.clone(),
        constituency: form.constituency.clone(),
        ward: form.ward.clone(),
        position,
        created_at: now.clone(),
        updated_at: now,
    };

    let placeholders = match kind {
        RecordKind::Member => "?, ?, ?, ?, ?, ?, ?, ?, ?, ?",
        RecordKind::Aspirant => "?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?",
    };
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        kind.table(),
        columns(kind),
        placeholders
    );

    let mut query = sqlx::query(&sql)
        .bind(&registrant.id)
        .bind(&registrant.name)
        .bind(&registrant.national_id)
        .bind(&registrant.mobile)
        .bind(&registrant.email)
        .bind(&registrant.county)
        .bind(&registrant.constituency)
        .bind(&registrant.ward);
    if let Some(position) = registrant.position {
        query = query.bind(position.as_str());
    }
    query
        .bind(&registrant.created_at)
        .bind(&registrant.updated_at)
        .execute(pool)
        .await
        .map_err(|e| map_write_error(kind, e))?;

    info!("Registered {} {}", kind, registrant.id);
    Ok(registrant)
}

/// All records of `kind`, newest first
pub async fn list_all(pool: &SqlitePool, kind: RecordKind) -> Result<Vec<Registrant>> {
    // rowid breaks ties between records created within the same microsecond
    let sql = format!(
        "SELECT {} FROM {} ORDER BY created_at DESC, rowid DESC",
        columns(kind),
        kind.table()
    );
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(|r| row_to_registrant(kind, r)).collect()
}

/// Replace the submitted fields of record `id`
///
/// `id` and `created_at` never change; `updated_at` is refreshed.
pub async fn update_by_id(
    pool: &SqlitePool,
    kind: RecordKind,
    id: &str,
    form: &RegistrationForm,
) -> Result<Registrant> {
    let position = position_for(kind, form)?;

    let position_clause = match kind {
        RecordKind::Member => "",
        RecordKind::Aspirant => ", position = ?",
    };
    let sql = format!(
        "UPDATE {} SET name = ?, national_id = ?, mobile = ?, email = ?, county = ?, \
         constituency = ?, ward = ?, updated_at = ?{} WHERE id = ?",
        kind.table(),
        position_clause
    );

    let mut query = sqlx::query(&sql)
        .bind(&form.name)
        .bind(&form.national_id)
        .bind(&form.mobile)
        .bind(&form.email)
        .bind(&form.county)
        .bind(&form.constituency)
        .bind(&form.ward)
        .bind(timestamp());
    if let Some(position) = position {
        query = query.bind(position.as_str());
    }
    let result = query
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| map_write_error(kind, e))?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(not_found_message(kind, id)));
    }

    info!("Updated {} {}", kind, id);
    find_by_id(pool, kind, id)
        .await?
        .ok_or_else(|| Error::NotFound(not_found_message(kind, id)))
}

/// Remove record `id`
pub async fn delete_by_id(pool: &SqlitePool, kind: RecordKind, id: &str) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?", kind.table());
    let result = sqlx::query(&sql).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(not_found_message(kind, id)));
    }

    info!("Deleted {} {}", kind, id);
    Ok(())
}
