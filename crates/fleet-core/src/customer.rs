//! Customer records and the registry that deduplicates them
//!
//! A customer's identity is their name and birth date. The licence flag is
//! carried along but never takes part in equality, so two registrations that
//! differ only in licence status are duplicates.

use std::{
    collections::HashSet,
    hash::{Hash, Hasher},
};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Sequential customer identifier, unique within one registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(u32);

impl CustomerId {
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// First and last name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerName {
    first: String,
    last: String,
}

impl CustomerName {
    #[must_use]
    pub fn new(first: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            last: last.into(),
        }
    }

    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    #[must_use]
    pub fn last(&self) -> &str {
        &self.last
    }
}

impl std::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// A registered customer. Immutable once created.
///
/// Records are only minted by [`CustomerRegistry::register`]; they serialize
/// for reporting but cannot be rebuilt from outside a registry.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    id: CustomerId,
    name: CustomerName,
    birth_date: NaiveDate,
    commercial_license: bool,
}

impl CustomerRecord {
    #[must_use]
    pub const fn id(&self) -> CustomerId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &CustomerName {
        &self.name
    }

    #[must_use]
    pub const fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    #[must_use]
    pub const fn has_commercial_license(&self) -> bool {
        self.commercial_license
    }

    /// Age in whole years on `date`
    #[must_use]
    pub fn age_on(&self, date: NaiveDate) -> u32 {
        age_in_years(self.birth_date, date)
    }
}

impl PartialEq for CustomerRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.birth_date == other.birth_date
    }
}

impl Eq for CustomerRecord {}

impl Hash for CustomerRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.birth_date.hash(state);
    }
}

/// Whole years between `birth` and `date`; zero if `date` precedes `birth`
fn age_in_years(birth: NaiveDate, date: NaiveDate) -> u32 {
    let years = date.year() - birth.year();
    let before_birthday = (date.month(), date.day()) < (birth.month(), birth.day());
    let years = if before_birthday { years - 1 } else { years };
    u32::try_from(years).unwrap_or(0)
}

/// Deduplicating set of customer records
#[derive(Debug, Clone)]
pub struct CustomerRegistry {
    records: Vec<CustomerRecord>,
    identities: HashSet<CustomerRecord>,
    next_id: u32,
}

impl Default for CustomerRegistry {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            identities: HashSet::new(),
            next_id: 1,
        }
    }
}

impl CustomerRegistry {
    /// Create an empty registry whose first identifier is 1
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a customer.
    ///
    /// An identifier is consumed by every attempt, so a rejected duplicate
    /// leaves a gap in the sequence.
    pub fn register(
        &mut self,
        name: CustomerName,
        birth_date: NaiveDate,
        has_commercial_license: bool,
    ) -> Result<CustomerRecord> {
        let record = CustomerRecord {
            id: self.allocate_id(),
            name,
            birth_date,
            commercial_license: has_commercial_license,
        };

        if self.identities.contains(&record) {
            tracing::warn!(
                name = %record.name,
                %birth_date,
                "rejected duplicate customer registration"
            );
            return Err(Error::DuplicateCustomer {
                name: record.name,
                birth_date,
            });
        }

        self.identities.insert(record.clone());
        self.records.push(record.clone());
        Ok(record)
    }

    /// Find a record by identifier
    #[must_use]
    pub fn get(&self, id: CustomerId) -> Option<&CustomerRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Whether `record` was issued by this registry: its identifier resolves to
    /// a record with the same identity and licence status
    #[must_use]
    pub fn is_member(&self, record: &CustomerRecord) -> bool {
        self.get(record.id).is_some_and(|known| {
            known == record && known.commercial_license == record.commercial_license
        })
    }

    /// Whether a record with the same name and birth date is registered
    #[must_use]
    pub fn contains(&self, record: &CustomerRecord) -> bool {
        self.identities.contains(record)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CustomerRecord> {
        self.records.iter()
    }

    fn allocate_id(&mut self) -> CustomerId {
        let id = CustomerId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}
