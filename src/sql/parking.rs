//! Parking operations for the SQLite database.
//!
//! The available-places counter is only ever changed with a relative `SET x = x +/- 1`
//! so that two transactions touching the same parking cannot lose an update.

use sqlx::{Sqlite, Transaction};

use crate::DataStoreError;
use crate::parking::{NewParking, Parking};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Inserts a new parking.
///
/// # Returns
/// * `Ok(Parking)` - Parking created, with its generated id
/// * `Err(DataStoreError::AlreadyExists)` - A parking with this address already exists
/// * `Err(DataStoreError::Internal)` - Database error
pub async fn create(tx: &mut Transaction<'_, Sqlite>, new_parking: &NewParking) -> SqlResult<Parking> {
    let result = sqlx::query_as::<_, Parking>(
        r#"
        INSERT INTO parkings (address, opened, count_places, count_available_places)
        VALUES (?, ?, ?, ?)
        RETURNING id, address, opened, count_places, count_available_places
        "#,
    )
    .bind(&new_parking.address)
    .bind(new_parking.opened)
    .bind(new_parking.count_places)
    .bind(new_parking.count_available_places)
    .fetch_one(&mut **tx)
    .await;

    match result {
        Ok(parking) => Ok(parking),
        Err(e) => {
            tracing::error!("Database error creating parking: {}", e);
            Err(DataStoreError::from(e))
        }
    }
}

/// Fetches a parking by id, failing with `NotFound` when it does not exist.
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Parking> {
    sqlx::query_as::<_, Parking>(
        r#"
        SELECT id, address, opened, count_places, count_available_places
        FROM parkings
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

/// Lists every parking in id order.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<Parking>> {
    let parkings = sqlx::query_as::<_, Parking>(
        r#"
        SELECT id, address, opened, count_places, count_available_places
        FROM parkings
        ORDER BY id
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;
    Ok(parkings)
}

/// Takes one place and returns the parking as it is afterwards.
pub async fn take_place(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Parking> {
    adjust_available_places(tx, id, -1).await
}

/// Gives one place back and returns the parking as it is afterwards.
///
/// The counter is not clamped to `count_places` and a closed parking stays closed.
pub async fn release_place(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Parking> {
    adjust_available_places(tx, id, 1).await
}

async fn adjust_available_places(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    delta: i64,
) -> SqlResult<Parking> {
    sqlx::query_as::<_, Parking>(
        r#"
        UPDATE parkings
        SET count_available_places = count_available_places + ?
        WHERE id = ?
        RETURNING id, address, opened, count_places, count_available_places
        "#,
    )
    .bind(delta)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

/// Marks a parking as closed to further entrances.
pub async fn close(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Parking> {
    sqlx::query_as::<_, Parking>(
        r#"
        UPDATE parkings
        SET opened = FALSE
        WHERE id = ?
        RETURNING id, address, opened, count_places, count_available_places
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}
