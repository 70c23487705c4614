// KPI Engine.
//
// Pure point-in-time reducers over an already-filtered working table.
// Every function returns a display-ready string and never faults: zero
// denominators and empty tables resolve to a formatted 0.
use crate::types::{AggRow, BookingRow};
use crate::util::{format_magnitude, format_percent, inclusive_day_span};

pub fn total_revenue(bookings: &[BookingRow]) -> String {
    let revenue: f64 = bookings.iter().map(|b| b.revenue_realized).sum();
    format_magnitude(revenue)
}

pub fn occupancy_percentage(agg: &[AggRow]) -> String {
    let successful: f64 = agg.iter().map(|a| a.successful_bookings).sum();
    let capacity: f64 = agg.iter().map(|a| a.capacity).sum();
    if capacity == 0.0 {
        return format_percent(0.0, 1);
    }
    format_percent(successful / capacity * 100.0, 1)
}

pub fn revpar(bookings: &[BookingRow], agg: &[AggRow]) -> String {
    let revenue: f64 = bookings.iter().map(|b| b.revenue_realized).sum();
    let capacity: f64 = agg.iter().map(|a| a.capacity).sum();
    if capacity == 0.0 {
        return format_magnitude(0.0);
    }
    format_magnitude(revenue / capacity)
}

pub fn adr(bookings: &[BookingRow]) -> String {
    let revenue: f64 = bookings.iter().map(|b| b.revenue_realized).sum();
    let count = bookings.len();
    if count == 0 {
        return format_magnitude(0.0);
    }
    format_magnitude(revenue / count as f64)
}

/// Daily Sellable Room Nights: total capacity over the inclusive day span of
/// the table's check-in dates.
pub fn dsrn(agg: &[AggRow]) -> String {
    let Some(days) = inclusive_day_span(agg.iter().filter_map(|a| a.check_in_date)) else {
        return format_magnitude(0.0);
    };
    let capacity: f64 = agg.iter().map(|a| a.capacity).sum();
    format_magnitude(capacity / days as f64)
}

pub fn total_bookings(bookings: &[BookingRow]) -> String {
    format_magnitude(bookings.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(revenue: f64) -> BookingRow {
        BookingRow {
            booking_id: "b".to_string(),
            property_id: 1,
            room_category: "RT1".to_string(),
            check_in_date: None,
            booking_platform: "makeyourtrip".to_string(),
            booking_status: "Checked Out".to_string(),
            revenue_realized: revenue,
            ratings_given: None,
            room_class: None,
            property_name: None,
            category: None,
            city: None,
            mmm_yy: None,
            week_no: None,
        }
    }

    fn agg(successful: f64, capacity: f64, day: Option<u32>) -> AggRow {
        AggRow {
            property_id: 1,
            room_category: "RT1".to_string(),
            check_in_date: day.map(|d| NaiveDate::from_ymd_opt(2022, 5, d).unwrap()),
            successful_bookings: successful,
            capacity,
            room_class: None,
            property_name: None,
            category: None,
            city: None,
            mmm_yy: None,
            week_no: None,
        }
    }

    #[test]
    fn end_to_end_scenario() {
        let bookings: Vec<BookingRow> = [1000.0, 2000.0, 3000.0]
            .iter()
            .map(|r| booking(*r))
            .collect();
        let aggs = vec![agg(2.0, 4.0, Some(1))];
        assert_eq!(total_revenue(&bookings), "6.0K");
        assert_eq!(adr(&bookings), "2.0K");
        assert_eq!(occupancy_percentage(&aggs), "50.0%");
        assert_eq!(total_bookings(&bookings), "3");
    }

    #[test]
    fn occupancy_stays_within_bounds() {
        let aggs = vec![agg(10.0, 25.0, None), agg(0.0, 30.0, None), agg(30.0, 30.0, None)];
        let successful: f64 = aggs.iter().map(|a| a.successful_bookings).sum();
        let capacity: f64 = aggs.iter().map(|a| a.capacity).sum();
        let pct = successful / capacity * 100.0;
        assert!((0.0..=100.0).contains(&pct));
        assert_eq!(occupancy_percentage(&aggs), format!("{:.1}%", pct));
    }

    #[test]
    fn zero_denominators_resolve_to_zero() {
        assert_eq!(occupancy_percentage(&[]), "0.0%");
        assert_eq!(revpar(&[booking(500.0)], &[]), "0");
        assert_eq!(adr(&[]), "0");
        assert_eq!(dsrn(&[]), "0");
        assert_eq!(total_revenue(&[]), "0");
        assert_eq!(total_bookings(&[]), "0");
    }

    #[test]
    fn dsrn_single_day_equals_capacity_sum() {
        let aggs = vec![agg(1.0, 1200.0, Some(3)), agg(2.0, 300.0, Some(3))];
        assert_eq!(dsrn(&aggs), format_magnitude(1500.0));
    }

    #[test]
    fn dsrn_divides_by_inclusive_span() {
        // May 1 .. May 5 = 5 days, 10_000 capacity
        let aggs = vec![agg(0.0, 4000.0, Some(1)), agg(0.0, 6000.0, Some(5))];
        assert_eq!(dsrn(&aggs), "2.0K");
    }

    #[test]
    fn revpar_is_revenue_over_capacity() {
        let bookings = vec![booking(4000.0), booking(4000.0)];
        let aggs = vec![agg(2.0, 4.0, None)];
        assert_eq!(revpar(&bookings, &aggs), "2.0K");
    }
}
