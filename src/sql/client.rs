//! Client operations for the SQLite database.

use sqlx::{Sqlite, Transaction};

use crate::DataStoreError;
use crate::client::{Client, NewClient};

/// Result type for database operations.
pub type SqlResult<T> = Result<T, DataStoreError>;

/// Inserts a new client and returns it with its generated id.
///
/// # Examples
/// ```no_run
/// # use parkade::{NewClient, sql};
/// # use sqlx::SqlitePool;
/// # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
/// let mut tx = pool.begin().await?;
/// let new_client = NewClient {
///     name: "Ivan".to_string(),
///     surname: "Petrov".to_string(),
///     credit_card: None,
///     car_number: Some("A123BC".to_string()),
/// };
/// let client = sql::client::create(&mut tx, &new_client).await?;
/// tx.commit().await?;
/// println!("created client {}", client.id);
/// # Ok(())
/// # }
/// ```
pub async fn create(tx: &mut Transaction<'_, Sqlite>, new_client: &NewClient) -> SqlResult<Client> {
    let result = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (name, surname, credit_card, car_number)
        VALUES (?, ?, ?, ?)
        RETURNING id, name, surname, credit_card, car_number
        "#,
    )
    .bind(&new_client.name)
    .bind(&new_client.surname)
    .bind(&new_client.credit_card)
    .bind(&new_client.car_number)
    .fetch_one(&mut **tx)
    .await;

    match result {
        Ok(client) => Ok(client),
        Err(e) => {
            tracing::error!("Database error creating client: {}", e);
            Err(DataStoreError::from(e))
        }
    }
}

/// Fetches a client by id, failing with `NotFound` when it does not exist.
pub async fn get(tx: &mut Transaction<'_, Sqlite>, id: i64) -> SqlResult<Client> {
    sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, surname, credit_card, car_number
        FROM clients
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}

/// Lists every client in id order.
pub async fn list(tx: &mut Transaction<'_, Sqlite>) -> SqlResult<Vec<Client>> {
    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, surname, credit_card, car_number
        FROM clients
        ORDER BY id
        "#,
    )
    .fetch_all(&mut **tx)
    .await?;
    Ok(clients)
}

/// Sets or replaces the credit card on file for a client.
pub async fn set_credit_card(
    tx: &mut Transaction<'_, Sqlite>,
    id: i64,
    credit_card: &str,
) -> SqlResult<Client> {
    sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
        SET credit_card = ?
        WHERE id = ?
        RETURNING id, name, surname, credit_card, car_number
        "#,
    )
    .bind(credit_card)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or(DataStoreError::NotFound)
}
