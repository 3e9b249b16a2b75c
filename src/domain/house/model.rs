//! House aggregate entities

/// Residential building being billed
#[derive(Debug, Clone)]
pub struct House {
    pub id: i32,
    pub address: String,
    /// Apartments in repository order (ascending id)
    pub apartments: Vec<Apartment>,
}

impl House {
    pub fn apartment_count(&self) -> usize {
        self.apartments.len()
    }
}

/// Apartment inside a house
#[derive(Debug, Clone)]
pub struct Apartment {
    pub id: i32,
    /// Floor area in square meters
    pub area: f64,
    pub water_meters: Vec<WaterMeter>,
}

/// Water meter attached to an apartment
///
/// Readings are fetched separately per meter (see `HouseRepository`),
/// they are not embedded in the aggregate.
#[derive(Debug, Clone)]
pub struct WaterMeter {
    pub id: i32,
}

/// Cumulative meter value sampled for one billing month
#[derive(Debug, Clone, PartialEq)]
pub struct WaterReading {
    pub id: i32,
    pub water_meter_id: i32,
    /// Billing month, 1–12
    pub month: i32,
    pub year: i32,
    /// Cumulative value on the meter dial
    pub value: f64,
}

impl WaterReading {
    /// Exact period match. Month arithmetic never rolls over a year
    /// boundary, so callers asking for month 0 match nothing.
    pub fn is_for(&self, year: i32, month: i32) -> bool {
        self.year == year && self.month == month
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(year: i32, month: i32, value: f64) -> WaterReading {
        WaterReading {
            id: 1,
            water_meter_id: 1,
            month,
            year,
            value,
        }
    }

    #[test]
    fn is_for_matches_exact_period_only() {
        let r = reading(2024, 2, 150.0);
        assert!(r.is_for(2024, 2));
        assert!(!r.is_for(2024, 1));
        assert!(!r.is_for(2023, 2));
    }

    #[test]
    fn month_zero_never_matches() {
        // January's "previous month" lookup asks for month 0.
        let r = reading(2023, 12, 100.0);
        assert!(!r.is_for(2024, 0));
        assert!(!r.is_for(2023, 0));
    }
}
