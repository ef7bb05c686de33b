//! Property-based tests for fleet hire rules using proptest.
//!
//! Properties tested:
//! 1. Availability equals the number of vehicles added when nothing is hired
//! 2. Age and licence rejections do not depend on fleet state
//! 3. The hire limit is never exceeded and a refused hire changes nothing
//! 4. Hire then return restores availability and applies the service rule
//! 5. Vehicle identifiers stay unique and encode their kind

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::HashSet;

use chrono::NaiveDate;
use fleet_core::{
    CustomerName, CustomerRecord, Error, FleetManager, HireOutcome, HirePolicy, ReturnOutcome,
    VehicleIdIssuer, VehicleKind,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// Standard proptest config for fleet properties.
fn fleet_config() -> ProptestConfig {
    ProptestConfig {
        cases: 64,
        max_shrink_iters: 256,
        ..ProptestConfig::default()
    }
}

const TODAY: (i32, u32, u32) = (2024, 6, 1);

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

fn fleet(seed: u64) -> FleetManager<StdRng> {
    FleetManager::with_issuer(
        VehicleIdIssuer::with_rng(StdRng::seed_from_u64(seed)),
        HirePolicy::default(),
    )
}

fn register(fleet: &mut FleetManager<StdRng>, age: u32, license: bool) -> CustomerRecord {
    let birth = NaiveDate::from_ymd_opt(TODAY.0 - i32::try_from(age).unwrap(), TODAY.1, TODAY.2)
        .unwrap();
    fleet
        .register_customer(CustomerName::new("Prop", "Test"), birth, license)
        .unwrap()
}

fn kind_strategy() -> impl Strategy<Value = VehicleKind> {
    prop_oneof![Just(VehicleKind::Car), Just(VehicleKind::Van)]
}

fn populate(fleet: &mut FleetManager<StdRng>, cars: usize, vans: usize) {
    for _ in 0..cars {
        fleet.add_vehicle(VehicleKind::Car);
    }
    for _ in 0..vans {
        fleet.add_vehicle(VehicleKind::Van);
    }
}

proptest! {
    #![proptest_config(fleet_config())]

    #[test]
    fn prop_available_count_matches_added(
        seed in any::<u64>(),
        cars in 0usize..40,
        vans in 0usize..40,
    ) {
        let mut fleet = fleet(seed);
        populate(&mut fleet, cars, vans);
        prop_assert_eq!(fleet.available_count(VehicleKind::Car), cars);
        prop_assert_eq!(fleet.available_count(VehicleKind::Van), vans);
    }

    #[test]
    fn prop_underage_car_hire_always_rejected(
        seed in any::<u64>(),
        age in 0u32..18,
        license in any::<bool>(),
        cars in 0usize..5,
    ) {
        let mut fleet = fleet(seed);
        populate(&mut fleet, cars, 0);
        let customer = register(&mut fleet, age, license);

        let result = fleet.hire_on(&customer, VehicleKind::Car, 1, today());
        let is_age_error =
            matches!(result, Err(Error::AgeRestriction { actual, .. }) if actual == age);
        prop_assert!(is_age_error);
        prop_assert_eq!(fleet.available_count(VehicleKind::Car), cars);
    }

    #[test]
    fn prop_van_rejections_by_age_then_license(
        seed in any::<u64>(),
        age in 0u32..90,
        license in any::<bool>(),
        vans in 0usize..5,
    ) {
        let mut fleet = fleet(seed);
        populate(&mut fleet, 0, vans);
        let customer = register(&mut fleet, age, license);

        let result = fleet.hire_on(&customer, VehicleKind::Van, 1, today());
        if age < 23 {
            prop_assert!(matches!(result, Err(Error::AgeRestriction { .. })), "unexpected result: {:?}", result);
        } else if !license {
            prop_assert!(matches!(result, Err(Error::LicenseRequired { .. })), "unexpected result: {:?}", result);
        } else {
            prop_assert_eq!(result.unwrap().is_hired(), vans > 0);
        }
    }

    #[test]
    fn prop_hire_limit_never_exceeded(
        seed in any::<u64>(),
        requests in proptest::collection::vec(kind_strategy(), 1..12),
    ) {
        let mut fleet = fleet(seed);
        populate(&mut fleet, 6, 6);
        let customer = register(&mut fleet, 40, true);

        for kind in requests {
            let held_before = fleet.active_hire_count(&customer);
            let cars_before = fleet.available_count(VehicleKind::Car);
            let vans_before = fleet.available_count(VehicleKind::Van);

            let outcome = fleet.hire_on(&customer, kind, 1, today()).unwrap();
            if held_before >= 3 {
                prop_assert_eq!(outcome, HireOutcome::LimitReached);
                prop_assert_eq!(fleet.active_hire_count(&customer), held_before);
                prop_assert_eq!(fleet.available_count(VehicleKind::Car), cars_before);
                prop_assert_eq!(fleet.available_count(VehicleKind::Van), vans_before);
            } else {
                prop_assert!(outcome.is_hired());
            }
            prop_assert!(fleet.active_hire_count(&customer) <= 3);
        }
    }

    #[test]
    fn prop_hire_return_round_trip(
        seed in any::<u64>(),
        kind in kind_strategy(),
        mileage in 0u32..25_000,
        days in 1u32..30,
    ) {
        let mut fleet = fleet(seed);
        populate(&mut fleet, 2, 2);
        let customer = register(&mut fleet, 40, true);
        let before = fleet.available_count(kind);

        let outcome = fleet.hire_on(&customer, kind, days, today()).unwrap();
        let id = outcome.vehicle().cloned().unwrap();
        prop_assert_eq!(fleet.available_count(kind), before - 1);

        let returned = fleet.return_vehicle(&id, &customer, mileage);
        prop_assert!(returned.is_returned());
        prop_assert_eq!(fleet.available_count(kind), before);
        prop_assert_eq!(fleet.active_customer_count(), 0);

        let vehicle = fleet.vehicle(&id).unwrap();
        prop_assert!(!vehicle.is_hired());
        prop_assert!(!vehicle.requires_inspection());
        let expected = if mileage < kind.service_interval() { mileage } else { 0 };
        prop_assert_eq!(vehicle.mileage(), expected);

        let inspection_expected = kind == VehicleKind::Van && days >= 10;
        prop_assert_eq!(
            returned,
            ReturnOutcome::Returned {
                serviced: mileage >= kind.service_interval(),
                inspection_completed: inspection_expected,
            }
        );
    }

    #[test]
    fn prop_issued_ids_unique_and_tagged(
        seed in any::<u64>(),
        kinds in proptest::collection::vec(kind_strategy(), 1..300),
    ) {
        let mut issuer = VehicleIdIssuer::with_rng(StdRng::seed_from_u64(seed));
        let mut seen = HashSet::new();
        for kind in kinds {
            let id = issuer.issue(kind);
            prop_assert_eq!(id.kind(), kind);
            prop_assert_eq!(u32::from(id.number() % 2), u32::from(kind.id_parity()));
            prop_assert!(seen.insert(id));
        }
    }
}
