//! Tariff domain entity

use chrono::{DateTime, Utc};

/// Cost category a tariff prices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TariffKind {
    /// Rate per cubic meter of water consumed
    Water,
    /// Rate per square meter of apartment area
    Maintenance,
}

impl TariffKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Water => "water",
            Self::Maintenance => "maintenance",
        }
    }

    /// Parse the wire/database tag. Unknown tags are rejected, not defaulted:
    /// billing correctness depends on the kind.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "water" => Some(Self::Water),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for TariffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Price rule for one cost category
///
/// One active tariff per kind is assumed; lookups take the first match
/// (ascending id) when duplicates exist.
#[derive(Debug, Clone)]
pub struct Tariff {
    pub id: i32,
    pub kind: TariffKind,
    /// Rate per unit: per m³ of water, or per m² of area
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tariff {
    /// Cost of `units` at this tariff's rate.
    ///
    /// `units` is m³ of consumption for water tariffs and m² of floor
    /// area for maintenance tariffs.
    pub fn cost(&self, units: f64) -> f64 {
        self.price * units
    }
}

// ── Tests ──────────────────────────────────────────────────────
