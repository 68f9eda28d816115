//! Pairing operations for the SQLite database.
//!
//! There is at most one row per `(client_id, parking_id)`; a new visit overwrites the
//! timestamps of the previous one.

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, Transaction};

use crate::DataStoreError;
use crate::client_parking::ClientParking;

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Inserts the first visit of a client to a parking.
///
/// # Returns
/// * `Ok(ClientParking)` - Pairing created with `time_in` set and no `time_out`
/// * `Err(DataStoreError::AlreadyExists)` - The pair already has a row
/// * `Err(DataStoreError::MissingReference)` - The client or parking does not exist
pub async fn create(
    tx: &mut Transaction<'_, Sqlite>,
    client_id: i64,
    parking_id: i64,
    time_in: DateTime<Utc>,
) -> SqlResult<ClientParking> {
    let result = sqlx::query_as::<_, ClientParking>(
        r#"
        INSERT INTO client_parking (client_id, parking_id, time_in, time_out)
        VALUES (?, ?, ?, NULL)
        RETURNING id, client_id, parking_id, time_in, time_out
        "#,
    )
    .bind(client_id)
    .bind(parking_id)
    .bind(time_in)
    .fetch_one(&mut **tx)
    .await;

    match result {
        Ok(pairing) => Ok(pairing),
        Err(e) => {
            tracing::error!("Database error creating client parking: {}", e);
            Err(DataStoreError::from(e))
        }
    }
}

/// Fetches a pairing by its own id.
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<ClientParking> {
    sqlx::query_as::<_, ClientParking>(
        r#"
        SELECT id, client_id, parking_id, time_in, time_out
        FROM client_parking
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

/// Finds the pairing row of a client and a parking, if one was ever created.
pub async fn find(
    tx: &mut Transaction<'_, Sqlite>,
    client_id: i64,
    parking_id: i64,
) -> SqlResult<Option<ClientParking>> {
    let pairing = sqlx::query_as::<_, ClientParking>(
        r#"
        SELECT id, client_id, parking_id, time_in, time_out
        FROM client_parking
        WHERE client_id = ? AND parking_id = ?
        "#,
    )
    .bind(client_id)
    .bind(parking_id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(pairing)
}

/// Lists every pairing in id order.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<ClientParking>> {
    let pairings = sqlx::query_as::<_, ClientParking>(
        r#"
        SELECT id, client_id, parking_id, time_in, time_out
        FROM client_parking
        ORDER BY id
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;
    Ok(pairings)
}

/// Starts a new visit on an existing pairing row.
pub async fn check_in(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    time_in: DateTime<Utc>,
) -> SqlResult<ClientParking> {
    sqlx::query_as::<_, ClientParking>(
        r#"
        UPDATE client_parking
        SET time_in = ?, time_out = NULL
        WHERE id = ?
        RETURNING id, client_id, parking_id, time_in, time_out
        "#,
    )
    .bind(time_in)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

/// Ends the current visit on a pairing row.
pub async fn check_out(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    time_out: DateTime<Utc>,
) -> SqlResult<ClientParking> {
    sqlx::query_as::<_, ClientParking>(
        r#"
        UPDATE client_parking
        SET time_out = ?
        WHERE id = ?
        RETURNING id, client_id, parking_id, time_in, time_out
        "#,
    )
    .bind(time_out)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NewClient;
    use crate::parking::NewParking;
    use crate::sql;

    async fn seed(tx: &mut Transaction<'_, Sqlite>) -> (i64, i64) {
        let client = sql::client::create(
            tx,
            &NewClient {
                name: "name".to_string(),
                surname: "surname".to_string(),
                credit_card: Some("1231234".to_string()),
                car_number: Some("3asd123".to_string()),
            },
        )
        .await
        .unwrap();
        let parking = sql::parking::create(
            tx,
            &NewParking {
                address: "Pushkina".to_string(),
                opened: true,
                count_places: 2,
                count_available_places: 2,
            },
        )
        .await
        .unwrap();
        (client.id, parking.id)
    }

    #[tokio::test]
    async fn create_then_find() {
        let pool = sql::tests::setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        let (client_id, parking_id) = seed(&mut tx).await;
        assert!(find(&mut tx, client_id, parking_id).await.unwrap().is_none());

        let created = create(&mut tx, client_id, parking_id, Utc::now()).await.unwrap();
        tx.commit().await.unwrap();
        assert!(created.is_present());
        assert!(created.time_in.is_some());
        assert!(created.time_out.is_none());

        let mut tx = pool.begin().await.unwrap();
        let found = find(&mut tx, client_id, parking_id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(get(&mut tx, created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn pair_is_unique() {
        let pool = sql::tests::setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        let (client_id, parking_id) = seed(&mut tx).await;
        create(&mut tx, client_id, parking_id, Utc::now()).await.unwrap();
        let result = create(&mut tx, client_id, parking_id, Utc::now()).await;
        assert!(matches!(result, Err(DataStoreError::AlreadyExists)));
    }

    #[tokio::test]
    async fn foreign_keys_are_enforced() {
        let pool = sql::tests::setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        let result = create(&mut tx, 100, 200, Utc::now()).await;
        assert!(matches!(result, Err(DataStoreError::MissingReference)));
    }

    #[tokio::test]
    async fn check_out_then_check_in_reuses_row() {
        let pool = sql::tests::setup_test_db().await;

        let mut tx = pool.begin().await.unwrap();
        let (client_id, parking_id) = seed(&mut tx).await;
        let created = create(&mut tx, client_id, parking_id, Utc::now()).await.unwrap();

        let left = check_out(&mut tx, created.id, Utc::now()).await.unwrap();
        assert!(!left.is_present());
        assert!(left.time_out.is_some());

        let back = check_in(&mut tx, created.id, Utc::now()).await.unwrap();
        assert!(back.is_present());
        assert_eq!(back.id, created.id);
        tx.commit().await.unwrap();

        let mut tx = pool.begin().await.unwrap();
        assert_eq!(list(&mut tx).await.unwrap().len(), 1);
    }
}
