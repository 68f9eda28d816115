//! # Request Validation
//!
//! Every write endpoint accepts a loosely-typed request struct whose fields are all
//! optional, and turns it into a validated construction record through one of the pure
//! functions in this module.  Validation never stops at the first problem: every field
//! is checked and all messages are reported together, keyed by field name.
//!
//! ```rust
//! use parkade::{CreateParkingRequest, SCHEMA_FIELD, validate_parking};
//!
//! let request = CreateParkingRequest {
//!     address: Some("Pushkina 10".to_string()),
//!     count_places: Some(2),
//!     count_available_places: Some(3),
//!     opened: None,
//! };
//! let errors = validate_parking(&request).unwrap_err();
//! assert!(errors.messages(SCHEMA_FIELD).is_some());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::client::{AddCardRequest, CardUpdate, CreateClientRequest, NewClient};
use crate::client_parking::{ClientParkingRequest, PairingKey};
use crate::parking::{CreateParkingRequest, NewParking};

/// Maximum number of characters in a car number.
pub const CAR_NUMBER_MAX_LEN: usize = 10;

/// Key under which errors spanning several fields are reported.
pub const SCHEMA_FIELD: &str = "_schema";

const MISSING: &str = "Missing data for required field.";
const EMPTY: &str = "Field may not be empty.";

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns true when no field has failed.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the messages recorded for one field.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Iterates over the names of the failing fields in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, messages) in &self.fields {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn required_text<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: &'a Option<String>,
) -> Option<&'a str> {
    match value.as_deref() {
        None => {
            errors.add(field, MISSING);
            None
        }
        Some(text) if text.trim().is_empty() => {
            errors.add(field, EMPTY);
            None
        }
        Some(text) => Some(text),
    }
}

fn required_integer(errors: &mut ValidationErrors, field: &str, value: Option<i64>) -> Option<i64> {
    if value.is_none() {
        errors.add(field, MISSING);
    }
    value
}

/// Validates a client creation request.
pub fn validate_client(request: &CreateClientRequest) -> Result<NewClient, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = required_text(&mut errors, "name", &request.name);
    let surname = required_text(&mut errors, "surname", &request.surname);
    if let Some(car_number) = &request.car_number {
        if car_number.chars().count() > CAR_NUMBER_MAX_LEN {
            errors.add(
                "car_number",
                format!(
                    "car_number too long, it should not be more than {} characters",
                    CAR_NUMBER_MAX_LEN
                ),
            );
        }
    }
    let (name, surname) = (name.map(str::to_string), surname.map(str::to_string));
    errors.into_result(|| NewClient {
        name: name.unwrap_or_default(),
        surname: surname.unwrap_or_default(),
        credit_card: request.credit_card.clone(),
        car_number: request.car_number.clone(),
    })
}

/// Validates a parking creation request.
///
/// The comparison between available and total places only runs once both counts have
/// passed their own checks, so a single bad count yields a single message.
pub fn validate_parking(request: &CreateParkingRequest) -> Result<NewParking, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let address = required_text(&mut errors, "address", &request.address).map(str::to_string);

    let count_places = required_integer(&mut errors, "count_places", request.count_places)
        .filter(|&places| {
            if places < 1 {
                errors.add("count_places", "count_places cannot be less than 1");
                false
            } else {
                true
            }
        });

    let count_available_places = required_integer(
        &mut errors,
        "count_available_places",
        request.count_available_places,
    )
    .filter(|&available| {
        if available < 0 {
            errors.add(
                "count_available_places",
                "count_available_places cannot be negative",
            );
            false
        } else {
            true
        }
    });

    if let (Some(places), Some(available)) = (count_places, count_available_places) {
        if available > places {
            errors.add(
                SCHEMA_FIELD,
                "count_available_places cannot be greater than count_places",
            );
        }
    }

    errors.into_result(|| NewParking {
        address: address.unwrap_or_default(),
        opened: request.opened.unwrap_or(true),
        count_places: count_places.unwrap_or_default(),
        count_available_places: count_available_places.unwrap_or_default(),
    })
}

/// Validates the body of an entrance or exit request.
pub fn validate_pairing(request: &ClientParkingRequest) -> Result<PairingKey, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let client_id = required_integer(&mut errors, "client_id", request.client_id);
    let parking_id = required_integer(&mut errors, "parking_id", request.parking_id);
    errors.into_result(|| PairingKey {
        client_id: client_id.unwrap_or_default(),
        parking_id: parking_id.unwrap_or_default(),
    })
}

/// Validates a request to attach or replace a client's credit card.
pub fn validate_add_card(request: &AddCardRequest) -> Result<CardUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let client_id = required_integer(&mut errors, "client_id", request.client_id);
    let credit_card =
        required_text(&mut errors, "credit_card", &request.credit_card).map(str::to_string);
    errors.into_result(|| CardUpdate {
        client_id: client_id.unwrap_or_default(),
        credit_card: credit_card.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_request(name: &str, surname: &str, car_number: Option<&str>) -> CreateClientRequest {
        CreateClientRequest {
            name: Some(name.to_string()),
            surname: Some(surname.to_string()),
            credit_card: None,
            car_number: car_number.map(str::to_string),
        }
    }

    fn parking_request(places: Option<i64>, available: Option<i64>) -> CreateParkingRequest {
        CreateParkingRequest {
            address: Some("Pushkina 10".to_string()),
            count_places: places,
            count_available_places: available,
            opened: None,
        }
    }

    #[test]
    fn valid_client_is_echoed() {
        let new_client = validate_client(&client_request("Ivan", "Petrov", Some("A123BC"))).unwrap();
        assert_eq!(new_client.name, "Ivan");
        assert_eq!(new_client.surname, "Petrov");
        assert_eq!(new_client.car_number.as_deref(), Some("A123BC"));
        assert_eq!(new_client.credit_card, None);
    }

    #[test]
    fn car_number_of_ten_characters_is_accepted() {
        assert!(validate_client(&client_request("a", "b", Some("0123456789"))).is_ok());
    }

    #[test]
    fn car_number_too_long() {
        let errors = validate_client(&client_request("a", "b", Some("0123456789X"))).unwrap_err();
        let messages = errors.messages("car_number").unwrap();
        assert!(messages[0].starts_with("car_number too long"));
    }

    #[test]
    fn all_client_problems_are_reported() {
        let request = CreateClientRequest {
            name: None,
            surname: Some("   ".to_string()),
            credit_card: None,
            car_number: Some("WAY-TOO-LONG-NUMBER".to_string()),
        };
        let errors = validate_client(&request).unwrap_err();
        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["car_number", "name", "surname"]);
        assert_eq!(errors.messages("name").unwrap(), &[MISSING.to_string()]);
        assert_eq!(errors.messages("surname").unwrap(), &[EMPTY.to_string()]);
    }

    #[test]
    fn valid_parking_defaults_to_opened() {
        let new_parking = validate_parking(&parking_request(Some(2), Some(2))).unwrap();
        assert!(new_parking.opened);
        assert_eq!(new_parking.count_places, 2);
        assert_eq!(new_parking.count_available_places, 2);
    }

    #[test]
    fn zero_places_fails() {
        let errors = validate_parking(&parking_request(Some(0), Some(0))).unwrap_err();
        assert!(errors.messages("count_places").is_some());
        assert!(errors.messages(SCHEMA_FIELD).is_none());
    }

    #[test]
    fn more_available_than_total_fails() {
        let errors = validate_parking(&parking_request(Some(1), Some(2))).unwrap_err();
        assert_eq!(
            errors.messages(SCHEMA_FIELD).unwrap(),
            &["count_available_places cannot be greater than count_places".to_string()]
        );
    }

    #[test]
    fn cross_field_check_skipped_when_counts_missing() {
        let errors = validate_parking(&parking_request(None, Some(5))).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["count_places"]);
    }

    #[test]
    fn negative_available_places_fails() {
        let errors = validate_parking(&parking_request(Some(3), Some(-1))).unwrap_err();
        assert!(errors.messages("count_available_places").is_some());
    }

    #[test]
    fn pairing_requires_both_ids() {
        let errors = validate_pairing(&ClientParkingRequest::default()).unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["client_id", "parking_id"]
        );

        let key = validate_pairing(&ClientParkingRequest {
            client_id: Some(3),
            parking_id: Some(7),
        })
        .unwrap();
        assert_eq!(key.client_id, 3);
        assert_eq!(key.parking_id, 7);
    }

    #[test]
    fn add_card_requires_card() {
        let errors = validate_add_card(&AddCardRequest {
            client_id: Some(1),
            credit_card: Some(String::new()),
        })
        .unwrap_err();
        assert!(errors.messages("credit_card").is_some());
    }

    #[test]
    fn display_joins_messages() {
        let mut errors = ValidationErrors::new();
        errors.add("a", "first");
        errors.add("b", "second");
        assert_eq!(errors.to_string(), "a: first; b: second");
    }
}
