//! # Occupancy Transitions
//!
//! Entrance and exit move a client/parking pairing between two states:
//!
//! - **Absent**: no pairing row yet, or a row whose `time_out` is set
//! - **Present**: a row whose `time_out` is `NULL`
//!
//! A parking is **Open** until an entrance leaves it with fewer than one available
//! place, at which point it becomes **Closed** for good.  Exits give places back
//! without an upper bound and never reopen a closed parking.
//!
//! Both transitions work inside a caller-supplied transaction and mutate nothing until
//! every precondition holds.  If either returns an error the caller must roll the
//! transaction back instead of committing it.
//!
//! ```no_run
//! # use parkade::occupancy;
//! # use sqlx::SqlitePool;
//! # async fn example(pool: SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let mut tx = pool.begin().await?;
//! match occupancy::enter(&mut tx, 1, 1).await {
//!     Ok(pairing) => {
//!         tx.commit().await?;
//!         println!("parked since {:?}", pairing.time_in);
//!     }
//!     Err(e) => {
//!         tx.rollback().await?;
//!         eprintln!("entrance refused: {}", e);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use thiserror::Error;

use crate::client_parking::ClientParking;
use crate::errors::DataStoreError;
use crate::sql;

/// Reasons an entrance or exit is refused.
#[derive(Debug, Error)]
pub enum OccupancyError {
    /// The named client, parking or pairing does not exist.
    #[error("There is no {0} with this id")]
    NotFound(&'static str),
    /// The parking is closed.
    #[error("There are no seats")]
    NoCapacity,
    /// The client is already inside this parking.
    #[error("The client is already in the parking lot")]
    AlreadyParked,
    /// The client already left this parking.
    #[error("The client has already left the parking lot")]
    AlreadyExited,
    /// The client has no credit card to pay with.
    #[error("The client does not have a credit card")]
    NoPaymentMethod,
    /// The store failed.
    #[error("storage error: {0}")]
    Store(#[from] DataStoreError),
}

impl OccupancyError {
    /// Stable machine-readable name of the error.
    pub fn kind(&self) -> &'static str {
        match self {
            OccupancyError::NotFound(_) => "NotFound",
            OccupancyError::NoCapacity => "NoCapacity",
            OccupancyError::AlreadyParked => "AlreadyParked",
            OccupancyError::AlreadyExited => "AlreadyExited",
            OccupancyError::NoPaymentMethod => "NoPaymentMethod",
            OccupancyError::Store(_) => "StorageError",
        }
    }
}

fn lookup(what: &'static str) -> impl FnOnce(DataStoreError) -> OccupancyError {
    move |e| match e {
        DataStoreError::NotFound => OccupancyError::NotFound(what),
        e => OccupancyError::Store(e),
    }
}

/// Moves a client into a parking.
///
/// Reuses the pairing row when the client has been here before, otherwise creates it.
/// Takes one place and closes the parking when no place is left.
pub async fn enter(
    tx: &mut Transaction<'_, Sqlite>,
    client_id: i64,
    parking_id: i64,
) -> Result<ClientParking, OccupancyError> {
    let parking = sql::parking::get(tx, parking_id)
        .await
        .map_err(lookup("parking"))?;
    let client = sql::client::get(tx, client_id)
        .await
        .map_err(lookup("client"))?;

    if !parking.opened {
        return Err(OccupancyError::NoCapacity);
    }

    let now = Utc::now();
    let pairing = match sql::client_parking::find(tx, client.id, parking.id).await? {
        Some(existing) if existing.is_present() => return Err(OccupancyError::AlreadyParked),
        Some(existing) => sql::client_parking::check_in(tx, existing.id, now).await?,
        None => sql::client_parking::create(tx, client.id, parking.id, now).await?,
    };

    let parking = sql::parking::take_place(tx, parking.id).await?;
    if parking.count_available_places < 1 {
        sql::parking::close(tx, parking.id).await?;
        tracing::info!(parking_id = parking.id, "parking is full, closing");
    }

    tracing::info!(
        client_id = client.id,
        parking_id = parking.id,
        available = parking.count_available_places,
        "client entered parking"
    );
    Ok(pairing)
}

/// Moves a client out of a parking.
///
/// Requires a credit card on file.  Gives one place back without clamping it to the
/// capacity and without reopening a closed parking.
pub async fn exit(
    tx: &mut Transaction<'_, Sqlite>,
    client_id: i64,
    parking_id: i64,
) -> Result<ClientParking, OccupancyError> {
    let pairing = sql::client_parking::find(tx, client_id, parking_id)
        .await?
        .ok_or(OccupancyError::NotFound("client parking"))?;

    if !pairing.is_present() {
        return Err(OccupancyError::AlreadyExited);
    }

    let client = sql::client::get(tx, pairing.client_id)
        .await
        .map_err(lookup("client"))?;
    if !client.has_credit_card() {
        return Err(OccupancyError::NoPaymentMethod);
    }

    let parking = sql::parking::release_place(tx, pairing.parking_id).await?;
    let pairing = sql::client_parking::check_out(tx, pairing.id, Utc::now()).await?;

    tracing::info!(
        client_id = client.id,
        parking_id = parking.id,
        available = parking.count_available_places,
        "client left parking"
    );
    Ok(pairing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::NewClient;
    use crate::parking::{NewParking, Parking};
    use sqlx::SqlitePool;

    async fn seed(
        pool: &SqlitePool,
        credit_card: Option<&str>,
        places: i64,
        available: i64,
    ) -> (i64, i64) {
        let mut tx = pool.begin().await.unwrap();
        let client = sql::client::create(
            &mut tx,
            &NewClient {
                name: "name".to_string(),
                surname: "surname".to_string(),
                credit_card: credit_card.map(str::to_string),
                car_number: None,
            },
        )
        .await
        .unwrap();
        let parking = sql::parking::create(
            &mut tx,
            &NewParking {
                address: format!("Address {}", client.id),
                opened: true,
                count_places: places,
                count_available_places: available,
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        (client.id, parking.id)
    }

    async fn add_client(pool: &SqlitePool) -> i64 {
        let mut tx = pool.begin().await.unwrap();
        let client = sql::client::create(
            &mut tx,
            &NewClient {
                name: "other".to_string(),
                surname: "client".to_string(),
                credit_card: Some("1".to_string()),
                car_number: None,
            },
        )
        .await
        .unwrap();
        tx.commit().await.unwrap();
        client.id
    }

    async fn parking(pool: &SqlitePool, id: i64) -> Parking {
        let mut tx = pool.begin().await.unwrap();
        sql::parking::get(&mut tx, id).await.unwrap()
    }

    async fn enter_committed(
        pool: &SqlitePool,
        client_id: i64,
        parking_id: i64,
    ) -> Result<ClientParking, OccupancyError> {
        let mut tx = pool.begin().await.unwrap();
        let result = enter(&mut tx, client_id, parking_id).await;
        if result.is_ok() {
            tx.commit().await.unwrap();
        } else {
            tx.rollback().await.unwrap();
        }
        result
    }

    async fn exit_committed(
        pool: &SqlitePool,
        client_id: i64,
        parking_id: i64,
    ) -> Result<ClientParking, OccupancyError> {
        let mut tx = pool.begin().await.unwrap();
        let result = exit(&mut tx, client_id, parking_id).await;
        if result.is_ok() {
            tx.commit().await.unwrap();
        } else {
            tx.rollback().await.unwrap();
        }
        result
    }

    #[tokio::test]
    async fn enter_takes_one_place() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 2, 2).await;

        let pairing = enter_committed(&pool, client_id, parking_id).await.unwrap();
        assert!(pairing.is_present());
        assert!(pairing.time_in.is_some());

        let after = parking(&pool, parking_id).await;
        assert_eq!(after.count_available_places, 1);
        assert!(after.opened);
    }

    #[tokio::test]
    async fn enter_twice_is_already_parked() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 5, 5).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        let result = enter_committed(&pool, client_id, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::AlreadyParked)));
        assert_eq!(parking(&pool, parking_id).await.count_available_places, 4);
    }

    #[tokio::test]
    async fn last_place_closes_parking() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 1, 1).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        let after = parking(&pool, parking_id).await;
        assert_eq!(after.count_available_places, 0);
        assert!(!after.opened);

        let other = add_client(&pool).await;
        let result = enter_committed(&pool, other, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::NoCapacity)));
    }

    #[tokio::test]
    async fn parking_created_full_closes_on_first_entrance() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 3, 0).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        let after = parking(&pool, parking_id).await;
        assert_eq!(after.count_available_places, -1);
        assert!(!after.opened);
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 1, 1).await;

        let result = enter_committed(&pool, client_id, parking_id + 10).await;
        assert!(matches!(result, Err(OccupancyError::NotFound("parking"))));
        let result = enter_committed(&pool, client_id + 10, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::NotFound("client"))));
        let result = exit_committed(&pool, client_id, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::NotFound("client parking"))));
    }

    #[tokio::test]
    async fn exit_gives_place_back() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 2, 2).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        let pairing = exit_committed(&pool, client_id, parking_id).await.unwrap();
        assert!(pairing.time_out.is_some());
        assert_eq!(parking(&pool, parking_id).await.count_available_places, 2);

        let result = exit_committed(&pool, client_id, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::AlreadyExited)));
        assert_eq!(parking(&pool, parking_id).await.count_available_places, 2);
    }

    #[tokio::test]
    async fn exit_without_card_changes_nothing() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, None, 2, 2).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        let result = exit_committed(&pool, client_id, parking_id).await;
        assert!(matches!(result, Err(OccupancyError::NoPaymentMethod)));

        assert_eq!(parking(&pool, parking_id).await.count_available_places, 1);
        let mut tx = pool.begin().await.unwrap();
        let pairing = sql::client_parking::find(&mut tx, client_id, parking_id)
            .await
            .unwrap()
            .unwrap();
        assert!(pairing.is_present());
    }

    #[tokio::test]
    async fn reentry_reuses_pairing_row() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 3, 3).await;

        let first = enter_committed(&pool, client_id, parking_id).await.unwrap();
        exit_committed(&pool, client_id, parking_id).await.unwrap();
        let second = enter_committed(&pool, client_id, parking_id).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.is_present());
        assert_eq!(parking(&pool, parking_id).await.count_available_places, 2);
    }

    #[tokio::test]
    async fn exit_does_not_reopen() {
        let pool = sql::tests::setup_test_db().await;
        let (client_id, parking_id) = seed(&pool, Some("1"), 1, 1).await;

        enter_committed(&pool, client_id, parking_id).await.unwrap();
        exit_committed(&pool, client_id, parking_id).await.unwrap();
        let after = parking(&pool, parking_id).await;
        assert_eq!(after.count_available_places, 1);
        assert!(!after.opened);
    }
}
