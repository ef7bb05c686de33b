//! Hire policy configuration
//!
//! # Hierarchy
//!
//! Policy values are resolved in this order (later overrides earlier):
//! 1. Built-in defaults
//! 2. A TOML policy file, if one is given
//! 3. Environment variables: `FLEET_*`
//!
//! # Example Policy
//!
//! ```toml
//! hire_limit = 3
//! min_car_age = 18
//! min_van_age = 23
//! inspection_threshold_days = 10
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{vehicle::VehicleKind, Error, Result};

const MAX_POLICY_FILE_SIZE: u64 = 65_536;

/// Rules applied by the fleet manager when hiring vehicles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HirePolicy {
    /// Maximum vehicles a customer may hold at once, across all kinds
    pub hire_limit: usize,
    pub min_car_age: u32,
    pub min_van_age: u32,
    /// Van hires lasting at least this many days schedule an inspection
    pub inspection_threshold_days: u32,
}

impl Default for HirePolicy {
    fn default() -> Self {
        Self {
            hire_limit: 3,
            min_car_age: 18,
            min_van_age: 23,
            inspection_threshold_days: 10,
        }
    }
}

impl HirePolicy {
    /// Minimum age for hiring a vehicle of `kind`
    #[must_use]
    pub const fn min_age(&self, kind: VehicleKind) -> u32 {
        match kind {
            VehicleKind::Car => self.min_car_age,
            VehicleKind::Van => self.min_van_age,
        }
    }

    /// Whether hiring `kind` requires a commercial licence
    #[must_use]
    pub const fn requires_commercial_license(kind: VehicleKind) -> bool {
        matches!(kind, VehicleKind::Van)
    }

    /// Parse a policy from TOML. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let policy: Self = toml::from_str(content)
            .map_err(|e| Error::ParseError(format!("Failed to parse hire policy: {e}")))?;
        policy.validate()?;
        Ok(policy)
    }

    /// Apply `FLEET_*` environment variable overrides
    pub fn apply_env_vars(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FLEET_HIRE_LIMIT") {
            self.hire_limit = parse_override("FLEET_HIRE_LIMIT", &value)?;
        }
        if let Some(value) = lookup("FLEET_MIN_CAR_AGE") {
            self.min_car_age = parse_override("FLEET_MIN_CAR_AGE", &value)?;
        }
        if let Some(value) = lookup("FLEET_MIN_VAN_AGE") {
            self.min_van_age = parse_override("FLEET_MIN_VAN_AGE", &value)?;
        }
        if let Some(value) = lookup("FLEET_INSPECTION_THRESHOLD_DAYS") {
            self.inspection_threshold_days =
                parse_override("FLEET_INSPECTION_THRESHOLD_DAYS", &value)?;
        }
        Ok(())
    }

    /// Validate policy values
    pub fn validate(&self) -> Result<()> {
        if self.hire_limit == 0 {
            return Err(Error::InvalidConfig(
                "hire_limit must be at least 1".to_string(),
            ));
        }
        if self.min_van_age < self.min_car_age {
            return Err(Error::InvalidConfig(format!(
                "min_van_age ({}) must not be below min_car_age ({})",
                self.min_van_age, self.min_car_age
            )));
        }
        if self.inspection_threshold_days == 0 {
            return Err(Error::InvalidConfig(
                "inspection_threshold_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::InvalidConfig(format!("Invalid {key} value '{value}': {e}")))
}

/// Load a hire policy from defaults, an optional TOML file and the environment
///
/// # Errors
///
/// Returns error if:
/// - The file cannot be read or is too large
/// - The TOML is malformed or has unknown keys
/// - An environment override is not a number
/// - The resulting values fail validation
pub fn load_policy(path: Option<&Path>) -> Result<HirePolicy> {
    let mut policy = match path {
        Some(path) => read_policy_file(path)?,
        None => HirePolicy::default(),
    };

    policy.apply_env_vars()?;
    policy.validate()?;

    tracing::debug!(?policy, "hire policy loaded");
    Ok(policy)
}

fn read_policy_file(path: &Path) -> Result<HirePolicy> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        Error::IoError(format!(
            "Failed to read policy file metadata {}: {e}",
            path.display()
        ))
    })?;

    if metadata.len() > MAX_POLICY_FILE_SIZE {
        return Err(Error::InvalidConfig(format!(
            "Policy file {} exceeds maximum size of {MAX_POLICY_FILE_SIZE} bytes",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!("Failed to read policy file {}: {e}", path.display()))
    })?;

    HirePolicy::from_toml_str(&content)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_default_policy_matches_business_rules() {
        let policy = HirePolicy::default();
        assert_eq!(policy.hire_limit, 3);
        assert_eq!(policy.min_age(VehicleKind::Car), 18);
        assert_eq!(policy.min_age(VehicleKind::Van), 23);
        assert_eq!(policy.inspection_threshold_days, 10);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_only_vans_need_commercial_license() {
        assert!(!HirePolicy::requires_commercial_license(VehicleKind::Car));
        assert!(HirePolicy::requires_commercial_license(VehicleKind::Van));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let policy = HirePolicy::from_toml_str("hire_limit = 5").unwrap();
        assert_eq!(policy.hire_limit, 5);
        assert_eq!(policy.min_car_age, 18);
        assert_eq!(policy.min_van_age, 23);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = HirePolicy::from_toml_str("hire_limt = 5");
        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            HirePolicy::from_toml_str("hire_limit = 0"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            HirePolicy::from_toml_str("min_car_age = 30\nmin_van_age = 25"),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            HirePolicy::from_toml_str("inspection_threshold_days = 0"),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_overrides_applied() {
        let vars = env(&[("FLEET_HIRE_LIMIT", "2"), ("FLEET_MIN_VAN_AGE", " 25 ")]);
        let mut policy = HirePolicy::default();
        policy.apply_overrides(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(policy.hire_limit, 2);
        assert_eq!(policy.min_van_age, 25);
        assert_eq!(policy.min_car_age, 18);
    }

    #[test]
    fn test_non_numeric_override_rejected() {
        let vars = env(&[("FLEET_MIN_CAR_AGE", "eighteen")]);
        let mut policy = HirePolicy::default();
        let result = policy.apply_overrides(|k| vars.get(k).cloned());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_load_policy_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "inspection_threshold_days = 14").unwrap();
        let policy = load_policy(Some(file.path())).unwrap();
        assert_eq!(policy.inspection_threshold_days, 14);
    }

    #[test]
    fn test_load_policy_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_policy(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(Error::IoError(_))));
    }
}
