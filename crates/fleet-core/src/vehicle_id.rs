//! Vehicle identifiers and the issuer that keeps them unique
//!
//! An identifier looks like `CA1-102`: the kind letter (`C` or `V`), a random
//! letter, a random digit, then a three-digit number that is even for cars and
//! odd for vans.

use std::{collections::HashSet, str::FromStr};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::{vehicle::VehicleKind, Error, Result};

/// Numeric suffixes are drawn from `0..SUFFIX_RANGE` and scaled to the kind's parity
const SUFFIX_RANGE: u16 = 500;

/// Immutable vehicle identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VehicleId {
    prefix: String,
    number: u16,
}

impl VehicleId {
    /// The three-character prefix, e.g. `CA1`
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The numeric suffix, e.g. `102`
    #[must_use]
    pub const fn number(&self) -> u16 {
        self.number
    }

    /// Kind encoded in the prefix letter
    #[must_use]
    pub fn kind(&self) -> VehicleKind {
        // The prefix is validated on construction.
        if self.prefix.starts_with(VehicleKind::Van.id_letter()) {
            VehicleKind::Van
        } else {
            VehicleKind::Car
        }
    }
}

impl std::fmt::Display for VehicleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:03}", self.prefix, self.number)
    }
}

impl FromStr for VehicleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidVehicleId(format!("'{s}': {reason}"));

        let (prefix, suffix) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected <prefix>-<number>"))?;

        let chars: Vec<char> = prefix.chars().collect();
        let [kind_letter, letter, digit] = chars.as_slice() else {
            return Err(invalid("prefix must be three characters"));
        };
        let kind =
            VehicleKind::from_id_letter(*kind_letter).map_err(|e| invalid(&e.to_string()))?;
        if !letter.is_ascii_uppercase() {
            return Err(invalid("second character must be a letter A-Z"));
        }
        if !digit.is_ascii_digit() {
            return Err(invalid("third character must be a digit"));
        }

        if suffix.len() != 3 || !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("number must be three digits"));
        }
        let number: u16 = suffix.parse().map_err(|_| invalid("number must be three digits"))?;
        if number % 2 != kind.id_parity() {
            return Err(invalid("number parity does not match vehicle kind"));
        }

        Ok(Self {
            prefix: prefix.to_string(),
            number,
        })
    }
}

impl TryFrom<String> for VehicleId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<VehicleId> for String {
    fn from(id: VehicleId) -> Self {
        id.to_string()
    }
}

/// Issues vehicle identifiers, never handing out the same one twice.
///
/// Every identifier this issuer has produced is remembered; a colliding draw
/// is re-rolled until a fresh one comes up. There is no retry cap.
#[derive(Debug, Clone)]
pub struct VehicleIdIssuer<R = StdRng> {
    rng: R,
    issued: HashSet<VehicleId>,
}

impl VehicleIdIssuer<StdRng> {
    /// Create an issuer seeded from the operating system
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for VehicleIdIssuer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> VehicleIdIssuer<R> {
    /// Create an issuer drawing from the given random source
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            issued: HashSet::new(),
        }
    }

    /// Issue a fresh identifier for `kind`
    pub fn issue(&mut self, kind: VehicleKind) -> VehicleId {
        loop {
            let candidate = self.draw(kind);
            if !self.issued.contains(&candidate) {
                self.issued.insert(candidate.clone());
                return candidate;
            }
            tracing::trace!(id = %candidate, "vehicle id collision, drawing again");
        }
    }

    /// Whether `id` has been issued by this issuer
    #[must_use]
    pub fn is_issued(&self, id: &VehicleId) -> bool {
        self.issued.contains(id)
    }

    /// Number of identifiers issued so far
    #[must_use]
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    fn draw(&mut self, kind: VehicleKind) -> VehicleId {
        let letter = char::from(b'A' + self.rng.random_range(0..26u8));
        let digit = char::from(b'0' + self.rng.random_range(0..10u8));
        let number = self.rng.random_range(0..SUFFIX_RANGE) * 2 + kind.id_parity();

        VehicleId {
            prefix: format!("{}{letter}{digit}", kind.id_letter()),
            number,
        }
    }
}
