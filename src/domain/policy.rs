use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

/// Decides whether a requested quantity can be fulfilled from current stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityPolicy {
    /// `stock >= requested`: an order may take the last unit.
    AllowExactStock,
    /// `stock > requested`: at least one unit must remain after the order.
    RequireSurplus,
}

/// Policy used unless configured otherwise. Ordering exactly the remaining stock succeeds.
pub const DEFAULT_AVAILABILITY_POLICY: AvailabilityPolicy = AvailabilityPolicy::AllowExactStock;

impl AvailabilityPolicy {
    pub fn is_satisfied(self, stock: i32, requested: i32) -> bool {
        match self {
            AvailabilityPolicy::AllowExactStock => stock >= requested,
            AvailabilityPolicy::RequireSurplus => stock > requested,
        }
    }
}

impl Default for AvailabilityPolicy {
    fn default() -> Self {
        DEFAULT_AVAILABILITY_POLICY
    }
}

impl fmt::Display for AvailabilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AvailabilityPolicy::AllowExactStock => f.write_str("allow-exact-stock"),
            AvailabilityPolicy::RequireSurplus => f.write_str("require-surplus"),
        }
    }
}

impl FromStr for AvailabilityPolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow-exact-stock" => Ok(AvailabilityPolicy::AllowExactStock),
            "require-surplus" => Ok(AvailabilityPolicy::RequireSurplus),
            other => Err(DomainError::InvalidInput(format!(
                "unknown availability policy '{other}'"
            ))),
        }
    }
}
