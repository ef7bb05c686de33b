//! Fleet event journal entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{customer::CustomerId, vehicle_id::VehicleId};

/// Event types recorded by the fleet manager
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetEventType {
    /// Vehicle added to the fleet
    VehicleAdded,
    /// Customer registered
    CustomerRegistered,
    /// Vehicle hired by a customer
    VehicleHired,
    /// Long van hire flagged the van for inspection
    InspectionScheduled,
    /// Vehicle returned by a customer
    VehicleReturned,
    /// Return pushed mileage past the service interval
    VehicleServiced,
    /// Pending van inspection cleared on return
    InspectionCompleted,
}

impl std::fmt::Display for FleetEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::VehicleAdded => "vehicle_added",
            Self::CustomerRegistered => "customer_registered",
            Self::VehicleHired => "vehicle_hired",
            Self::InspectionScheduled => "inspection_scheduled",
            Self::VehicleReturned => "vehicle_returned",
            Self::VehicleServiced => "vehicle_serviced",
            Self::InspectionCompleted => "inspection_completed",
        };
        write!(f, "{s}")
    }
}

/// An entry in the fleet journal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetEvent {
    /// Position in the journal, starting at 1. Zero until journaled.
    pub sequence: u64,
    pub event_type: FleetEventType,
    pub timestamp: DateTime<Utc>,
    pub vehicle: Option<VehicleId>,
    pub customer: Option<CustomerId>,
    /// Human-readable message
    pub message: String,
}

impl FleetEvent {
    /// Create a new event
    #[must_use]
    pub fn new(event_type: FleetEventType, message: impl Into<String>) -> Self {
        Self {
            sequence: 0,
            event_type,
            timestamp: Utc::now(),
            vehicle: None,
            customer: None,
            message: message.into(),
        }
    }

    /// Set the vehicle for this event
    #[must_use]
    pub fn with_vehicle(mut self, vehicle: &VehicleId) -> Self {
        self.vehicle = Some(vehicle.clone());
        self
    }

    /// Set the customer for this event
    #[must_use]
    pub fn with_customer(mut self, customer: CustomerId) -> Self {
        self.customer = Some(customer);
        self
    }
}
