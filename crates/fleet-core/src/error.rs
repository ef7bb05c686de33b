//! Error types for fleet-core

use chrono::NaiveDate;
use thiserror::Error;

use crate::{
    customer::{CustomerId, CustomerName},
    vehicle::VehicleKind,
};

/// Core error type for fleet operations
///
/// Only policy violations and malformed input are errors. A hire that finds no
/// free vehicle, or a return that matches nothing, is reported through
/// [`crate::HireOutcome`] and [`crate::ReturnOutcome`] instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Unrecognised vehicle kind at a string boundary
    #[error("Invalid vehicle kind: {0}")]
    InvalidKind(String),

    /// Malformed vehicle identifier string
    #[error("Invalid vehicle id: {0}")]
    InvalidVehicleId(String),

    /// Customer is too young for the requested kind
    #[error("Customer must be at least {required} to hire a {kind} (age {actual})")]
    AgeRestriction {
        kind: VehicleKind,
        required: u32,
        actual: u32,
    },

    /// Customer lacks the commercial licence the kind requires
    #[error("A commercial licence is required to hire a {kind}")]
    LicenseRequired { kind: VehicleKind },

    /// The customer record was not issued by this fleet's registry
    #[error("Customer {id} is not registered with this fleet")]
    UnknownCustomer { id: CustomerId },

    /// A record with the same name and birth date is already registered
    #[error("Duplicate customer record: {name} born {birth_date}")]
    DuplicateCustomer {
        name: CustomerName,
        birth_date: NaiveDate,
    },

    /// Configuration values are out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration could not be read
    #[error("IO error: {0}")]
    IoError(String),
}

/// Result type alias for fleet-core operations
pub type Result<T> = std::result::Result<T, Error>;
