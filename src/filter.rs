// Filter Layer.
//
// Zero-or-more equality predicates applied to the working tables before they
// reach the KPI/trend/aggregate functions. `None` means "All". Application
// always produces a fresh owned table; the base tables are never touched.
use crate::types::{AggRow, BookingRow};

#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    pub month: Option<String>,
    pub room_type: Option<String>,
    pub city: Option<String>,
    pub property: Option<String>,
}

impl FilterSelection {
    /// A concrete filter only matches a concrete joined value; rows whose
    /// dimension lookup missed (`None`) are excluded by that filter.
    fn keep(selected: &Option<String>, value: Option<&str>) -> bool {
        match selected {
            None => true,
            Some(want) => value == Some(want.as_str()),
        }
    }

    fn matches_booking(&self, r: &BookingRow) -> bool {
        Self::keep(&self.month, r.mmm_yy.as_deref())
            && Self::keep(&self.room_type, r.room_class.as_deref())
            && Self::keep(&self.city, r.city.as_deref())
            && Self::keep(&self.property, r.property_name.as_deref())
    }

    fn matches_agg(&self, r: &AggRow) -> bool {
        Self::keep(&self.month, r.mmm_yy.as_deref())
            && Self::keep(&self.room_type, r.room_class.as_deref())
            && Self::keep(&self.city, r.city.as_deref())
            && Self::keep(&self.property, r.property_name.as_deref())
    }

    pub fn apply_bookings(&self, rows: &[BookingRow]) -> Vec<BookingRow> {
        rows.iter()
            .filter(|r| self.matches_booking(r))
            .cloned()
            .collect()
    }

    pub fn apply_agg(&self, rows: &[AggRow]) -> Vec<AggRow> {
        rows.iter()
            .filter(|r| self.matches_agg(r))
            .cloned()
            .collect()
    }
}
