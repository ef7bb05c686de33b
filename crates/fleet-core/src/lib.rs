//! Fleet-core - hire/return logic for a small car and van hire business
//!
//! This crate provides:
//! - Vehicle identifiers and the issuer that keeps them unique
//! - Vehicle entities (cars and vans) with mileage and inspection state
//! - The customer registry
//! - The fleet manager that enforces the hire rules
//! - Hire policy configuration and the fleet event journal

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod customer;
pub mod error;
pub mod events;
pub mod fleet;
pub mod vehicle;
pub mod vehicle_id;

pub use config::{load_policy, HirePolicy};
pub use customer::{CustomerId, CustomerName, CustomerRecord, CustomerRegistry};
pub use error::{Error, Result};
pub use events::{FleetEvent, FleetEventType};
pub use fleet::{FleetManager, HireOutcome, ReturnOutcome};
pub use vehicle::{Vehicle, VehicleKind, VehicleVariant};
pub use vehicle_id::{VehicleId, VehicleIdIssuer};
