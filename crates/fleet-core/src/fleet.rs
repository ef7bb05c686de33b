//! Fleet manager: the hire/return state machine
//!
//! The manager owns every vehicle ever added, the customer registry and the
//! index of active hires. Policy violations (age, licence) are errors; running
//! out of vehicles or reaching the hire limit are ordinary outcomes.
//!
//! # Invariants
//!
//! 1. A customer appears in the active-hire index iff they hold at least one vehicle
//! 2. No customer holds more vehicles than the policy's hire limit
//! 3. A vehicle is in the index iff its hired flag is set
//! 4. A van flagged for inspection is never selected for hire
//! 5. Only records issued by this fleet's registry can hire, return or hold vehicles

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rand::{rngs::StdRng, Rng};

use crate::{
    config::HirePolicy,
    customer::{CustomerId, CustomerName, CustomerRecord, CustomerRegistry},
    events::{FleetEvent, FleetEventType},
    vehicle::{Vehicle, VehicleKind},
    vehicle_id::{VehicleId, VehicleIdIssuer},
    Error, Result,
};

/// Result of a hire request that passed the eligibility checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HireOutcome {
    /// The vehicle now belongs to the customer's active hires
    Hired(VehicleId),
    /// The customer already holds the maximum number of vehicles
    LimitReached,
    /// No vehicle of the requested kind is free
    NoneAvailable,
}

impl HireOutcome {
    #[must_use]
    pub const fn is_hired(&self) -> bool {
        matches!(self, Self::Hired(_))
    }

    /// The hired vehicle, if any
    #[must_use]
    pub const fn vehicle(&self) -> Option<&VehicleId> {
        match self {
            Self::Hired(id) => Some(id),
            Self::LimitReached | Self::NoneAvailable => None,
        }
    }
}

/// Result of a return request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnOutcome {
    /// The customer holds no vehicles; nothing changed
    NoActiveHires,
    /// The vehicle is not among the customer's hires; nothing changed
    NotHeld,
    /// The vehicle is back in the fleet
    Returned {
        /// Mileage reached the service interval and was reset
        serviced: bool,
        /// A pending van inspection was cleared
        inspection_completed: bool,
    },
}

impl ReturnOutcome {
    #[must_use]
    pub const fn is_returned(&self) -> bool {
        matches!(self, Self::Returned { .. })
    }
}

/// Owns the fleet, the customer registry and the active hires
#[derive(Debug, Clone)]
pub struct FleetManager<R = StdRng> {
    vehicles: Vec<Vehicle>,
    customers: CustomerRegistry,
    /// Customer to positions in `vehicles`, in hire order
    active_hires: HashMap<CustomerId, Vec<usize>>,
    issuer: VehicleIdIssuer<R>,
    policy: HirePolicy,
    events: Vec<FleetEvent>,
    /// Sequence number for the next journaled event; survives draining
    next_sequence: u64,
}

impl FleetManager<StdRng> {
    /// Create an empty fleet with the default hire policy
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(HirePolicy::default())
    }

    /// Create an empty fleet with the given hire policy
    #[must_use]
    pub fn with_policy(policy: HirePolicy) -> Self {
        Self::with_issuer(VehicleIdIssuer::new(), policy)
    }
}

impl Default for FleetManager<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FleetManager<R> {
    /// Create an empty fleet drawing identifiers from `issuer`
    pub fn with_issuer(issuer: VehicleIdIssuer<R>, policy: HirePolicy) -> Self {
        Self {
            vehicles: Vec::new(),
            customers: CustomerRegistry::new(),
            active_hires: HashMap::new(),
            issuer,
            policy,
            events: Vec::new(),
            next_sequence: 1,
        }
    }

    // ========================================================================
    // FLEET
    // ========================================================================

    /// Add a new vehicle of `kind`, not hired and with zero mileage
    pub fn add_vehicle(&mut self, kind: VehicleKind) -> &Vehicle {
        let id = self.issuer.issue(kind);
        tracing::debug!(vehicle = %id, %kind, "vehicle added");
        self.record(
            FleetEvent::new(FleetEventType::VehicleAdded, format!("{kind} {id} added"))
                .with_vehicle(&id),
        );

        let index = self.vehicles.len();
        self.vehicles.push(Vehicle::new(id, kind));
        &self.vehicles[index]
    }

    /// Number of vehicles of `kind` that are not hired
    #[must_use]
    pub fn available_count(&self, kind: VehicleKind) -> usize {
        self.vehicles
            .iter()
            .filter(|v| v.kind() == kind && !v.is_hired())
            .count()
    }

    /// All vehicles in the order they were added
    #[must_use]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    #[must_use]
    pub fn vehicle(&self, id: &VehicleId) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == id)
    }

    // ========================================================================
    // CUSTOMERS
    // ========================================================================

    /// Register a customer with this fleet's registry
    pub fn register_customer(
        &mut self,
        name: CustomerName,
        birth_date: NaiveDate,
        has_commercial_license: bool,
    ) -> Result<CustomerRecord> {
        let record = self
            .customers
            .register(name, birth_date, has_commercial_license)?;

        tracing::debug!(customer = %record.id(), name = %record.name(), "customer registered");
        self.record(
            FleetEvent::new(
                FleetEventType::CustomerRegistered,
                format!("customer {} registered as {}", record.name(), record.id()),
            )
            .with_customer(record.id()),
        );
        Ok(record)
    }

    #[must_use]
    pub const fn customers(&self) -> &CustomerRegistry {
        &self.customers
    }

    // ========================================================================
    // HIRE / RETURN
    // ========================================================================

    /// Hire a vehicle of `kind` for `customer`, judged against today's date.
    ///
    /// See [`Self::hire_on`].
    pub fn hire(
        &mut self,
        customer: &CustomerRecord,
        kind: VehicleKind,
        duration_days: u32,
    ) -> Result<HireOutcome> {
        self.hire_on(customer, kind, duration_days, Local::now().date_naive())
    }

    /// Hire a vehicle of `kind` for `customer`, judging age on `today`.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCustomer` if `customer` was not registered with
    /// this fleet.
    /// Returns `Error::AgeRestriction` if the customer is too young for `kind`.
    /// Returns `Error::LicenseRequired` if `kind` needs a commercial licence
    /// the customer does not hold.
    ///
    /// Reaching the hire limit or finding no free vehicle is not an error;
    /// fleet state is left untouched in both cases.
    pub fn hire_on(
        &mut self,
        customer: &CustomerRecord,
        kind: VehicleKind,
        duration_days: u32,
        today: NaiveDate,
    ) -> Result<HireOutcome> {
        if !self.customers.is_member(customer) {
            tracing::warn!(customer = %customer.id(), "hire refused: customer not registered");
            return Err(Error::UnknownCustomer { id: customer.id() });
        }
        self.check_eligibility(customer, kind, today)?;

        let held = self.active_hire_count(customer);
        if held >= self.policy.hire_limit {
            tracing::debug!(customer = %customer.id(), held, "hire refused: limit reached");
            return Ok(HireOutcome::LimitReached);
        }

        let Some(index) = self.vehicles.iter().position(|v| v.is_available_for(kind)) else {
            tracing::debug!(customer = %customer.id(), %kind, "hire refused: no vehicle available");
            return Ok(HireOutcome::NoneAvailable);
        };

        let vehicle = &mut self.vehicles[index];
        vehicle.set_hired(true);
        let id = vehicle.id().clone();

        let schedule_inspection =
            kind == VehicleKind::Van && duration_days >= self.policy.inspection_threshold_days;
        if schedule_inspection {
            vehicle.set_needs_inspection(true);
        }

        self.active_hires
            .entry(customer.id())
            .or_default()
            .push(index);

        tracing::debug!(vehicle = %id, customer = %customer.id(), duration_days, "vehicle hired");
        self.record(
            FleetEvent::new(
                FleetEventType::VehicleHired,
                format!("{id} hired by customer {} for {duration_days} days", customer.id()),
            )
            .with_vehicle(&id)
            .with_customer(customer.id()),
        );

        if schedule_inspection {
            tracing::info!(vehicle = %id, duration_days, "inspection scheduled for return");
            self.record(
                FleetEvent::new(
                    FleetEventType::InspectionScheduled,
                    format!("{id} flagged for inspection after a {duration_days}-day hire"),
                )
                .with_vehicle(&id)
                .with_customer(customer.id()),
            );
        }

        Ok(HireOutcome::Hired(id))
    }

    /// Return a hired vehicle, adding `trip_mileage` to its odometer.
    ///
    /// A customer with no hires, a record from another registry, or a vehicle
    /// the customer does not hold is logged and reported through the outcome;
    /// nothing is modified.
    pub fn return_vehicle(
        &mut self,
        vehicle_id: &VehicleId,
        customer: &CustomerRecord,
        trip_mileage: u32,
    ) -> ReturnOutcome {
        let customer_id = customer.id();

        let held = if self.customers.is_member(customer) {
            self.active_hires.get_mut(&customer_id)
        } else {
            None
        };
        let Some(held) = held else {
            tracing::warn!(
                customer = %customer_id,
                vehicle = %vehicle_id,
                "return refused: customer has no hired vehicles"
            );
            return ReturnOutcome::NoActiveHires;
        };

        let vehicles = &self.vehicles;
        let Some(position) = held.iter().position(|&i| vehicles[i].id() == vehicle_id) else {
            tracing::warn!(
                customer = %customer_id,
                vehicle = %vehicle_id,
                "return refused: vehicle not hired by customer"
            );
            return ReturnOutcome::NotHeld;
        };

        let index = held.remove(position);
        if held.is_empty() {
            self.active_hires.remove(&customer_id);
        }

        let vehicle = &mut self.vehicles[index];
        vehicle.add_mileage(trip_mileage);
        vehicle.set_hired(false);
        let serviced = vehicle.perform_service_if_due();
        let inspection_completed = vehicle.requires_inspection();
        if inspection_completed {
            vehicle.set_needs_inspection(false);
        }
        let mileage = vehicle.mileage();

        self.record(
            FleetEvent::new(
                FleetEventType::VehicleReturned,
                format!("{vehicle_id} returned by customer {customer_id}, {trip_mileage} miles"),
            )
            .with_vehicle(vehicle_id)
            .with_customer(customer_id),
        );

        if serviced {
            tracing::info!(vehicle = %vehicle_id, "vehicle serviced");
            self.record(
                FleetEvent::new(
                    FleetEventType::VehicleServiced,
                    format!("{vehicle_id} has been serviced"),
                )
                .with_vehicle(vehicle_id),
            );
        }

        if inspection_completed {
            tracing::info!(vehicle = %vehicle_id, "inspection completed");
            self.record(
                FleetEvent::new(
                    FleetEventType::InspectionCompleted,
                    format!("{vehicle_id} inspection done"),
                )
                .with_vehicle(vehicle_id),
            );
        }

        tracing::debug!(
            vehicle = %vehicle_id,
            customer = %customer_id,
            mileage,
            "vehicle returned"
        );
        ReturnOutcome::Returned {
            serviced,
            inspection_completed,
        }
    }

    /// Vehicles currently hired by `customer`, in hire order
    #[must_use]
    pub fn hires_by_customer(&self, customer: &CustomerRecord) -> Vec<&Vehicle> {
        self.held_by(customer)
            .map(|held| held.iter().map(|&i| &self.vehicles[i]).collect())
            .unwrap_or_default()
    }

    /// Number of vehicles `customer` currently holds
    #[must_use]
    pub fn active_hire_count(&self, customer: &CustomerRecord) -> usize {
        self.held_by(customer).map_or(0, <[usize]>::len)
    }

    /// Active hire positions for `customer`; `None` for records from other registries
    fn held_by(&self, customer: &CustomerRecord) -> Option<&[usize]> {
        if self.customers.is_member(customer) {
            self.active_hires.get(&customer.id()).map(Vec::as_slice)
        } else {
            None
        }
    }

    /// Number of customers holding at least one vehicle
    #[must_use]
    pub fn active_customer_count(&self) -> usize {
        self.active_hires.len()
    }

    // ========================================================================
    // POLICY / JOURNAL
    // ========================================================================

    #[must_use]
    pub const fn policy(&self) -> &HirePolicy {
        &self.policy
    }

    #[must_use]
    pub const fn issuer(&self) -> &VehicleIdIssuer<R> {
        &self.issuer
    }

    /// Journaled events not yet drained, oldest first
    #[must_use]
    pub fn events(&self) -> &[FleetEvent] {
        &self.events
    }

    /// Take every journaled event, leaving the journal empty.
    ///
    /// Sequence numbers keep counting across drains.
    pub fn drain_events(&mut self) -> Vec<FleetEvent> {
        std::mem::take(&mut self.events)
    }

    fn check_eligibility(
        &self,
        customer: &CustomerRecord,
        kind: VehicleKind,
        today: NaiveDate,
    ) -> Result<()> {
        let age = customer.age_on(today);
        let required = self.policy.min_age(kind);
        if age < required {
            return Err(Error::AgeRestriction {
                kind,
                required,
                actual: age,
            });
        }
        if HirePolicy::requires_commercial_license(kind) && !customer.has_commercial_license() {
            return Err(Error::LicenseRequired { kind });
        }
        Ok(())
    }

    /// Append `event` to the journal, assigning its sequence number
    fn record(&mut self, mut event: FleetEvent) {
        event.sequence = self.next_sequence;
        self.next_sequence += 1;
        self.events.push(event);
    }
}
