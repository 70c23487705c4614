// Trend Engine.
//
// Week-over-week descriptions for the KPI cards. "Current week" is always
// the highest parseable week number in the filtered rows, so re-filtering by
// property, city or month changes what "this week" means. That derivation is
// deliberate and must not be replaced by a wall-clock week.
//
// Zero/missing policy is uniform across all five comparisons: when the
// previous week's reduction is zero or absent (or the table carries no
// parseable week at all), the description is an explicit
// "No data for previous week" rather than a fabricated 0.0% change.
use crate::types::{AggRow, BookingRow};
use crate::util::{inclusive_day_span, parse_week_no};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;

const NO_PREVIOUS_WEEK: &str = "No data for previous week";

fn no_data(label: &str) -> String {
    format!("{label}: {NO_PREVIOUS_WEEK}")
}

/// Highest parseable week number in the rows; malformed labels are skipped.
fn selected_week<'a>(labels: impl Iterator<Item = Option<&'a str>>) -> Option<i32> {
    labels.filter_map(|l| l.and_then(parse_week_no)).max()
}

fn week_of(label: &Option<String>) -> Option<i32> {
    label.as_deref().and_then(parse_week_no)
}

/// Render `current` vs `previous` as an arrowed percent change.
/// Zero change lands on the down-arrow branch; the value carries its own
/// sign there, so only the up branch adds an explicit `+`.
fn describe(label: &str, current: f64, previous: f64) -> String {
    if previous == 0.0 || !previous.is_finite() {
        return no_data(label);
    }
    let change = (current / previous - 1.0) * 100.0;
    if change > 0.0 {
        format!("{label}: ▲ +{change:.1}%")
    } else {
        format!("{label}: ▼ {change:.1}%")
    }
}

pub fn revenue_trend(bookings: &[BookingRow]) -> String {
    const LABEL: &str = "Revenue vs Last Week";
    let Some(week) = selected_week(bookings.iter().map(|b| b.week_no.as_deref())) else {
        return no_data(LABEL);
    };
    let revenue_for = |w: i32| -> f64 {
        bookings
            .iter()
            .filter(|b| week_of(&b.week_no) == Some(w))
            .map(|b| b.revenue_realized)
            .sum()
    };
    describe(LABEL, revenue_for(week), revenue_for(week - 1))
}

pub fn bookings_trend(bookings: &[BookingRow]) -> String {
    const LABEL: &str = "Total Bookings vs Last Week";
    let Some(week) = selected_week(bookings.iter().map(|b| b.week_no.as_deref())) else {
        return no_data(LABEL);
    };
    let count_for =
        |w: i32| -> f64 { bookings.iter().filter(|b| week_of(&b.week_no) == Some(w)).count() as f64 };
    describe(LABEL, count_for(week), count_for(week - 1))
}

pub fn revpar_trend(bookings: &[BookingRow], agg: &[AggRow]) -> String {
    const LABEL: &str = "RevPAR vs Last Week";
    let Some(week) = selected_week(bookings.iter().map(|b| b.week_no.as_deref())) else {
        return no_data(LABEL);
    };
    let revpar_for = |w: i32| -> f64 {
        let revenue: f64 = bookings
            .iter()
            .filter(|b| week_of(&b.week_no) == Some(w))
            .map(|b| b.revenue_realized)
            .sum();
        let capacity: f64 = agg
            .iter()
            .filter(|a| week_of(&a.week_no) == Some(w))
            .map(|a| a.capacity)
            .sum();
        if capacity == 0.0 {
            0.0
        } else {
            revenue / capacity
        }
    };
    describe(LABEL, revpar_for(week), revpar_for(week - 1))
}

pub fn adr_trend(bookings: &[BookingRow]) -> String {
    const LABEL: &str = "ADR vs Last Week";
    let Some(week) = selected_week(bookings.iter().map(|b| b.week_no.as_deref())) else {
        return no_data(LABEL);
    };
    let adr_for = |w: i32| -> f64 {
        let in_week: Vec<&BookingRow> = bookings
            .iter()
            .filter(|b| week_of(&b.week_no) == Some(w))
            .collect();
        if in_week.is_empty() {
            return 0.0;
        }
        let revenue: f64 = in_week.iter().map(|b| b.revenue_realized).sum();
        revenue / in_week.len() as f64
    };
    describe(LABEL, adr_for(week), adr_for(week - 1))
}

pub fn dsrn_trend(agg: &[AggRow]) -> String {
    const LABEL: &str = "DSRN vs Last Week";
    let Some(days) = inclusive_day_span(agg.iter().filter_map(|a| a.check_in_date)) else {
        return no_data(LABEL);
    };
    let Some(week) = selected_week(agg.iter().map(|a| a.week_no.as_deref())) else {
        return no_data(LABEL);
    };
    // Per-week sellable nights: capacity over (rows in week x whole-table
    // day span), matching the dashboard's established definition.
    let dsrn_for = |w: i32| -> f64 {
        let in_week: Vec<&AggRow> = agg
            .iter()
            .filter(|a| week_of(&a.week_no) == Some(w))
            .collect();
        let denom = in_week.len() as f64 * days as f64;
        if denom == 0.0 {
            return 0.0;
        }
        let capacity: f64 = in_week.iter().map(|a| a.capacity).sum();
        capacity / denom
    };
    describe(LABEL, dsrn_for(week), dsrn_for(week - 1))
}

/// The Sunday on or after `d` (calendar weeks run Monday through Sunday).
fn week_ending_sunday(d: NaiveDate) -> NaiveDate {
    let offset = (7 - d.weekday().num_days_from_sunday()) % 7;
    d + Duration::days(i64::from(offset))
}

/// Average occupancy across calendar weeks ending Sunday.
///
/// This is a mean of per-week ratios, not a ratio of sums: each week's
/// `successful / capacity` counts equally regardless of its size.
pub fn occupancy_average(agg: &[AggRow]) -> String {
    let mut weeks: HashMap<NaiveDate, (f64, f64)> = HashMap::new();
    for row in agg {
        let Some(date) = row.check_in_date else {
            continue;
        };
        let e = weeks.entry(week_ending_sunday(date)).or_insert((0.0, 0.0));
        e.0 += row.successful_bookings;
        e.1 += row.capacity;
    }
    let ratios: Vec<f64> = weeks
        .values()
        .filter(|(_, capacity)| *capacity > 0.0)
        .map(|(successful, capacity)| successful / capacity * 100.0)
        .collect();
    if ratios.is_empty() {
        return "Average Occupancy: 0.0%".to_string();
    }
    let avg = ratios.iter().sum::<f64>() / ratios.len() as f64;
    format!("Average Occupancy: {avg:.1}%")
}
