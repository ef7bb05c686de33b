//! Vehicle entities
//!
//! A [`Vehicle`] is one unit of the fleet. Its kind-specific data lives in a
//! closed [`VehicleVariant`]; the inspection flag only exists on vans.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{vehicle_id::VehicleId, Error, Result};

/// Kind of vehicle the fleet can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleKind {
    /// Passenger car
    Car,
    /// Commercial van
    Van,
}

impl VehicleKind {
    /// All kinds, in declaration order
    pub const ALL: [Self; 2] = [Self::Car, Self::Van];

    /// Mileage after which a vehicle of this kind is serviced
    #[must_use]
    pub const fn service_interval(self) -> u32 {
        match self {
            Self::Car => 10_000,
            Self::Van => 5_000,
        }
    }

    /// Leading character of identifiers issued for this kind
    #[must_use]
    pub const fn id_letter(self) -> char {
        match self {
            Self::Car => 'C',
            Self::Van => 'V',
        }
    }

    /// Parity of the numeric identifier suffix: even for cars, odd for vans
    #[must_use]
    pub const fn id_parity(self) -> u16 {
        match self {
            Self::Car => 0,
            Self::Van => 1,
        }
    }

    /// Kind encoded by an identifier's leading character
    pub fn from_id_letter(letter: char) -> Result<Self> {
        match letter {
            'C' => Ok(Self::Car),
            'V' => Ok(Self::Van),
            other => Err(Error::InvalidKind(format!("unknown id prefix '{other}'"))),
        }
    }
}

impl std::fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Car => write!(f, "Car"),
            Self::Van => write!(f, "Van"),
        }
    }
}

impl FromStr for VehicleKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "car" => Ok(Self::Car),
            "van" => Ok(Self::Van),
            _ => Err(Error::InvalidKind(format!("{s}. Must be one of: Car, Van"))),
        }
    }
}

/// Kind-specific vehicle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum VehicleVariant {
    Car,
    Van {
        /// Set by a long hire, cleared on the following return
        needs_inspection: bool,
    },
}

impl VehicleVariant {
    /// Fresh state for a newly added vehicle of `kind`
    #[must_use]
    pub const fn new(kind: VehicleKind) -> Self {
        match kind {
            VehicleKind::Car => Self::Car,
            VehicleKind::Van => Self::Van {
                needs_inspection: false,
            },
        }
    }

    #[must_use]
    pub const fn kind(self) -> VehicleKind {
        match self {
            Self::Car => VehicleKind::Car,
            Self::Van { .. } => VehicleKind::Van,
        }
    }
}

/// One fleet unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    id: VehicleId,
    variant: VehicleVariant,
    hired: bool,
    mileage: u32,
}

impl Vehicle {
    /// Create a vehicle that is not hired and has zero mileage
    pub(crate) const fn new(id: VehicleId, kind: VehicleKind) -> Self {
        Self {
            id,
            variant: VehicleVariant::new(kind),
            hired: false,
            mileage: 0,
        }
    }

    #[must_use]
    pub const fn id(&self) -> &VehicleId {
        &self.id
    }

    #[must_use]
    pub const fn kind(&self) -> VehicleKind {
        self.variant.kind()
    }

    #[must_use]
    pub const fn variant(&self) -> VehicleVariant {
        self.variant
    }

    #[must_use]
    pub const fn is_hired(&self) -> bool {
        self.hired
    }

    /// Mileage accumulated since the last service
    #[must_use]
    pub const fn mileage(&self) -> u32 {
        self.mileage
    }

    #[must_use]
    pub const fn service_distance_requirement(&self) -> u32 {
        self.kind().service_interval()
    }

    /// Whether a pending inspection blocks this vehicle from hire. Always false for cars.
    #[must_use]
    pub const fn requires_inspection(&self) -> bool {
        match self.variant {
            VehicleVariant::Car => false,
            VehicleVariant::Van { needs_inspection } => needs_inspection,
        }
    }

    /// Whether the vehicle is overdue for a service
    #[must_use]
    pub const fn is_service_due(&self) -> bool {
        self.mileage >= self.service_distance_requirement()
    }

    /// Whether a hire request for `kind` may take this vehicle
    #[must_use]
    pub fn is_available_for(&self, kind: VehicleKind) -> bool {
        self.kind() == kind && !self.hired && !self.requires_inspection() && !self.is_service_due()
    }

    /// Reset mileage to zero if the service interval has been reached.
    ///
    /// Returns `true` if a service was performed.
    pub fn perform_service_if_due(&mut self) -> bool {
        if self.is_service_due() {
            self.mileage = 0;
            true
        } else {
            false
        }
    }

    pub(crate) fn set_hired(&mut self, hired: bool) {
        self.hired = hired;
    }

    pub(crate) fn add_mileage(&mut self, trip: u32) {
        self.mileage = self.mileage.saturating_add(trip);
    }

    /// Set the van inspection flag. Has no effect on cars.
    pub(crate) fn set_needs_inspection(&mut self, value: bool) {
        if let VehicleVariant::Van { needs_inspection } = &mut self.variant {
            *needs_inspection = value;
        }
    }
}
