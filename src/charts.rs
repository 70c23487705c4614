// Aggregate-Table Builder.
//
// Groups a filtered working table by one dimension, reduces each group, and
// returns typed rows ready for chart binding and CSV export. Group-level
// zero denominators substitute 0.
use crate::types::{
    AggRow, BookingRow, CategoryAdrRow, CategoryRevenueRow, CityBookingsRow, PlatformBookingsRow,
    PlatformRealizationRow, PropertyInsightRow, RoomClassOccupancyRow, WeeklyOccupancyRow,
};
use crate::util::{format_magnitude, format_percent, inclusive_day_span, parse_week_no};
use std::cmp::Ordering;
use std::collections::HashMap;

const UNKNOWN: &str = "Unknown";

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// ADR labels on the platform/category charts use a shorter K rule than the
/// KPI cards: one decimal with a K suffix from 1000 up, plain one decimal
/// below.
fn format_adr(x: f64) -> String {
    if x >= 1000.0 {
        format!("{:.1}K", x / 1000.0)
    } else {
        format!("{:.1}", x)
    }
}

/// Revenue share by hotel category (feeds the donut chart).
pub fn revenue_by_category(bookings: &[BookingRow]) -> Vec<CategoryRevenueRow> {
    let mut map: HashMap<String, f64> = HashMap::new();
    for b in bookings {
        let key = b.category.clone().unwrap_or_else(|| UNKNOWN.to_string());
        *map.entry(key).or_insert(0.0) += b.revenue_realized;
    }
    let total: f64 = map.values().sum();
    let mut rows: Vec<CategoryRevenueRow> = map
        .into_iter()
        .map(|(category, revenue)| {
            let share = if total == 0.0 {
                0.0
            } else {
                revenue / total * 100.0
            };
            CategoryRevenueRow {
                category,
                revenue: format_magnitude(revenue),
                share_pct: round2(share),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}

/// ADR and realization % per booking platform (combo chart).
/// Realization % = 1 - (cancelled + no-show) / total bookings.
pub fn realization_adr_by_platform(bookings: &[BookingRow]) -> Vec<PlatformRealizationRow> {
    #[derive(Default)]
    struct Acc {
        revenue: f64,
        bookings: usize,
        lost: usize,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for b in bookings {
        let e = map.entry(b.booking_platform.clone()).or_default();
        e.revenue += b.revenue_realized;
        e.bookings += 1;
        if b.booking_status == "Cancelled" || b.booking_status == "No Show" {
            e.lost += 1;
        }
    }
    let mut rows: Vec<PlatformRealizationRow> = map
        .into_iter()
        .map(|(platform, acc)| {
            // acc.bookings >= 1 by construction
            let adr = acc.revenue / acc.bookings as f64;
            let realization = (1.0 - acc.lost as f64 / acc.bookings as f64) * 100.0;
            PlatformRealizationRow {
                platform,
                adr: format_adr(adr),
                realization_pct: format_percent(realization, 1),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.platform.cmp(&b.platform));
    rows
}

/// Occupancy ratio per week label, ordered by week number (trend line).
pub fn occupancy_by_week(agg: &[AggRow]) -> Vec<WeeklyOccupancyRow> {
    let mut map: HashMap<i32, (f64, f64)> = HashMap::new();
    for a in agg {
        let Some(week) = a.week_no.as_deref().and_then(parse_week_no) else {
            continue;
        };
        let e = map.entry(week).or_insert((0.0, 0.0));
        e.0 += a.successful_bookings;
        e.1 += a.capacity;
    }
    let mut weeks: Vec<i32> = map.keys().copied().collect();
    weeks.sort_unstable();
    weeks
        .into_iter()
        .map(|week| {
            let (successful, capacity) = map[&week];
            let occupancy = if capacity == 0.0 {
                0.0
            } else {
                successful / capacity
            };
            WeeklyOccupancyRow {
                week_no: format!("W {week}"),
                occupancy: round2(occupancy),
            }
        })
        .collect()
}

/// Booking count and share % per platform, most-used platform first.
pub fn bookings_by_platform(bookings: &[BookingRow]) -> Vec<PlatformBookingsRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for b in bookings {
        *counts.entry(b.booking_platform.clone()).or_insert(0) += 1;
    }
    let total = bookings.len();
    let mut rows: Vec<PlatformBookingsRow> = counts
        .into_iter()
        .map(|(platform, n)| {
            let share = if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            };
            PlatformBookingsRow {
                platform,
                bookings: n,
                share_pct: round2(share),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.bookings.cmp(&a.bookings).then_with(|| a.platform.cmp(&b.platform)));
    rows
}

/// ADR per hotel category (second donut, distinct from the platform ADR).
pub fn adr_by_category(bookings: &[BookingRow]) -> Vec<CategoryAdrRow> {
    let mut map: HashMap<String, (f64, usize)> = HashMap::new();
    for b in bookings {
        let key = b.category.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let e = map.entry(key).or_insert((0.0, 0));
        e.0 += b.revenue_realized;
        e.1 += 1;
    }
    let mut rows: Vec<CategoryAdrRow> = map
        .into_iter()
        .map(|(category, (revenue, n))| {
            let adr = if n == 0 { 0.0 } else { revenue / n as f64 };
            CategoryAdrRow {
                category,
                adr: round2(adr),
                adr_display: format_adr(adr),
            }
        })
        .collect();
    rows.sort_by(|a, b| a.category.cmp(&b.category));
    rows
}

/// Occupancy % per room class, highest first (funnel chart).
pub fn occupancy_by_room_class(agg: &[AggRow]) -> Vec<RoomClassOccupancyRow> {
    let mut map: HashMap<String, (f64, f64)> = HashMap::new();
    for a in agg {
        let key = a.room_class.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let e = map.entry(key).or_insert((0.0, 0.0));
        e.0 += a.successful_bookings;
        e.1 += a.capacity;
    }
    let mut scored: Vec<(f64, String)> = map
        .into_iter()
        .map(|(room_class, (successful, capacity))| {
            let pct = if capacity == 0.0 {
                0.0
            } else {
                successful / capacity * 100.0
            };
            (pct, room_class)
        })
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
    scored
        .into_iter()
        .map(|(pct, room_class)| RoomClassOccupancyRow {
            room_class,
            occupancy_pct: format_percent(pct, 1),
        })
        .collect()
}

/// Booking count and share % per city, busiest city first (horizontal bar).
pub fn bookings_by_city(bookings: &[BookingRow]) -> Vec<CityBookingsRow> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for b in bookings {
        let key = b.city.clone().unwrap_or_else(|| UNKNOWN.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }
    let total = bookings.len();
    let mut rows: Vec<CityBookingsRow> = counts
        .into_iter()
        .map(|(city, n)| {
            let share = if total == 0 {
                0.0
            } else {
                n as f64 / total as f64 * 100.0
            };
            CityBookingsRow {
                city,
                bookings: n,
                share_pct: format_percent(share, 1),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.bookings.cmp(&a.bookings).then_with(|| a.city.cmp(&b.city)));
    rows
}

/// The "Insights By Property" table: the full KPI battery per property.
/// Each ratio is computed per property; day-span denominators come from the
/// whole filtered detail table, as on the dashboard.
pub fn property_insights(bookings: &[BookingRow], agg: &[AggRow]) -> Vec<PropertyInsightRow> {
    #[derive(Default)]
    struct Acc {
        revenue: f64,
        bookings: usize,
        cancelled: usize,
        no_show: usize,
        checked_out: usize,
        rating_sum: f64,
        rating_count: usize,
    }
    let mut map: HashMap<String, Acc> = HashMap::new();
    for b in bookings {
        let key = b.property_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
        let e = map.entry(key).or_default();
        e.revenue += b.revenue_realized;
        e.bookings += 1;
        match b.booking_status.as_str() {
            "Cancelled" => e.cancelled += 1,
            "No Show" => e.no_show += 1,
            "Checked Out" => e.checked_out += 1,
            _ => {}
        }
        if let Some(r) = b.ratings_given {
            e.rating_sum += r;
            e.rating_count += 1;
        }
    }

    let mut capacities: HashMap<String, f64> = HashMap::new();
    for a in agg {
        let key = a.property_name.clone().unwrap_or_else(|| UNKNOWN.to_string());
        *capacities.entry(key).or_insert(0.0) += a.capacity;
    }

    let day_span = inclusive_day_span(bookings.iter().filter_map(|b| b.check_in_date));

    let ratio = |num: f64, den: f64| if den == 0.0 { 0.0 } else { num / den };
    let per_day = |num: f64| match day_span {
        Some(days) => num / days as f64,
        None => 0.0,
    };

    let mut names: Vec<String> = map.keys().cloned().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let acc = &map[&name];
            let capacity = capacities.get(&name).copied().unwrap_or(0.0);
            let n = acc.bookings as f64;
            let rating = ratio(acc.rating_sum, acc.rating_count as f64);
            PropertyInsightRow {
                revenue: format_magnitude(acc.revenue),
                bookings: format_magnitude(n),
                capacity: format_magnitude(capacity),
                occupancy_pct: format_percent(ratio(n, capacity) * 100.0, 1),
                cancellation_pct: format_percent(ratio(acc.cancelled as f64, n) * 100.0, 1),
                realization_pct: format_percent(
                    (1.0 - ratio((acc.cancelled + acc.no_show) as f64, n)) * 100.0,
                    1,
                ),
                adr: format_magnitude(ratio(acc.revenue, n)),
                revpar: format_magnitude(ratio(acc.revenue, capacity)),
                dsrn: format_magnitude(per_day(capacity)),
                dbrn: format_magnitude(per_day(n)),
                durn: format_magnitude(per_day(acc.checked_out as f64)),
                average_rating: format!("{rating:.1}"),
                property_name: name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking(
        platform: &str,
        status: &str,
        revenue: f64,
        category: Option<&str>,
        city: Option<&str>,
        property: Option<&str>,
    ) -> BookingRow {
        BookingRow {
            booking_id: "b".to_string(),
            property_id: 1,
            room_category: "RT1".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2022, 5, 1),
            booking_platform: platform.to_string(),
            booking_status: status.to_string(),
            revenue_realized: revenue,
            ratings_given: Some(4.0),
            room_class: Some("Standard".to_string()),
            property_name: property.map(str::to_string),
            category: category.map(str::to_string),
            city: city.map(str::to_string),
            mmm_yy: Some("May 22".to_string()),
            week_no: Some("W 19".to_string()),
        }
    }

    fn agg(successful: f64, capacity: f64, room_class: &str, week: &str) -> AggRow {
        AggRow {
            property_id: 1,
            room_category: "RT1".to_string(),
            check_in_date: NaiveDate::from_ymd_opt(2022, 5, 1),
            successful_bookings: successful,
            capacity,
            room_class: Some(room_class.to_string()),
            property_name: Some("Atliq Grands".to_string()),
            category: Some("Luxury".to_string()),
            city: Some("Delhi".to_string()),
            mmm_yy: Some("May 22".to_string()),
            week_no: Some(week.to_string()),
        }
    }

    #[test]
    fn platform_shares_sum_to_one_hundred() {
        let rows = vec![
            booking("makeyourtrip", "Checked Out", 100.0, None, None, None),
            booking("makeyourtrip", "Checked Out", 100.0, None, None, None),
            booking("logtrip", "Checked Out", 100.0, None, None, None),
            booking("direct online", "Checked Out", 100.0, None, None, None),
            booking("tripster", "Checked Out", 100.0, None, None, None),
            booking("journey", "Checked Out", 100.0, None, None, None),
            booking("others", "Checked Out", 100.0, None, None, None),
        ];
        let table = bookings_by_platform(&rows);
        let total: f64 = table.iter().map(|r| r.share_pct).sum();
        assert!((total - 100.0).abs() < 0.1, "shares summed to {total}");
        // most-used platform first
        assert_eq!(table[0].platform, "makeyourtrip");
        assert_eq!(table[0].bookings, 2);
    }

    #[test]
    fn revenue_share_by_category() {
        let rows = vec![
            booking("x", "Checked Out", 3000.0, Some("Luxury"), None, None),
            booking("x", "Checked Out", 1000.0, Some("Business"), None, None),
        ];
        let table = revenue_by_category(&rows);
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].category, "Business");
        assert_eq!(table[0].share_pct, 25.0);
        assert_eq!(table[1].category, "Luxury");
        assert_eq!(table[1].revenue, "3.0K");
        assert_eq!(table[1].share_pct, 75.0);
    }

    #[test]
    fn realization_counts_cancellations_and_no_shows() {
        let rows = vec![
            booking("logtrip", "Checked Out", 2000.0, None, None, None),
            booking("logtrip", "Cancelled", 1000.0, None, None, None),
            booking("logtrip", "No Show", 1000.0, None, None, None),
            booking("logtrip", "Checked Out", 2000.0, None, None, None),
        ];
        let table = realization_adr_by_platform(&rows);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].adr, "1.5K");
        assert_eq!(table[0].realization_pct, "50.0%");
    }

    #[test]
    fn adr_display_rule_below_one_thousand() {
        let rows = vec![booking("journey", "Checked Out", 750.5, Some("Business"), None, None)];
        let table = adr_by_category(&rows);
        assert_eq!(table[0].adr_display, "750.5");
    }

    #[test]
    fn weekly_occupancy_is_week_ordered() {
        let rows = vec![
            agg(5.0, 10.0, "Standard", "W 20"),
            agg(8.0, 10.0, "Standard", "W 19"),
            agg(2.0, 10.0, "Standard", "W 21"),
        ];
        let table = occupancy_by_week(&rows);
        let weeks: Vec<&str> = table.iter().map(|r| r.week_no.as_str()).collect();
        assert_eq!(weeks, vec!["W 19", "W 20", "W 21"]);
        assert_eq!(table[0].occupancy, 0.8);
    }

    #[test]
    fn room_class_occupancy_sorted_descending() {
        let rows = vec![
            agg(2.0, 10.0, "Standard", "W 19"),
            agg(9.0, 10.0, "Presidential", "W 19"),
            agg(5.0, 10.0, "Elite", "W 19"),
        ];
        let table = occupancy_by_room_class(&rows);
        let classes: Vec<&str> = table.iter().map(|r| r.room_class.as_str()).collect();
        assert_eq!(classes, vec!["Presidential", "Elite", "Standard"]);
        assert_eq!(table[0].occupancy_pct, "90.0%");
    }

    #[test]
    fn city_bookings_sorted_by_count() {
        let rows = vec![
            booking("x", "Checked Out", 1.0, None, Some("Delhi"), None),
            booking("x", "Checked Out", 1.0, None, Some("Mumbai"), None),
            booking("x", "Checked Out", 1.0, None, Some("Mumbai"), None),
            booking("x", "Checked Out", 1.0, None, None, None),
        ];
        let table = bookings_by_city(&rows);
        assert_eq!(table[0].city, "Mumbai");
        assert_eq!(table[0].bookings, 2);
        assert_eq!(table[0].share_pct, "50.0%");
        // unmatched city joins surface as a group of their own
        assert!(table.iter().any(|r| r.city == "Unknown"));
    }

    #[test]
    fn property_insights_full_battery() {
        let rows = vec![
            booking("x", "Checked Out", 2000.0, None, None, Some("Atliq Grands")),
            booking("x", "Cancelled", 0.0, None, None, Some("Atliq Grands")),
            booking("x", "Checked Out", 1000.0, None, None, Some("Atliq Seasons")),
        ];
        let aggs = vec![agg(2.0, 4.0, "Standard", "W 19")];
        let table = property_insights(&rows, &aggs);
        assert_eq!(table.len(), 2);
        let grands = &table[0];
        assert_eq!(grands.property_name, "Atliq Grands");
        assert_eq!(grands.revenue, "2.0K");
        assert_eq!(grands.bookings, "2");
        assert_eq!(grands.capacity, "4");
        assert_eq!(grands.occupancy_pct, "50.0%");
        assert_eq!(grands.cancellation_pct, "50.0%");
        assert_eq!(grands.realization_pct, "50.0%");
        assert_eq!(grands.adr, "1.0K");
        // one-day span: DSRN equals capacity, DBRN equals bookings
        assert_eq!(grands.dsrn, "4");
        assert_eq!(grands.dbrn, "2");
        assert_eq!(grands.durn, "1");
        assert_eq!(grands.average_rating, "4.0");
        let seasons = &table[1];
        assert_eq!(seasons.property_name, "Atliq Seasons");
        // no aggregate rows for this property: capacity ratios collapse to 0
        assert_eq!(seasons.revpar, "0");
        assert_eq!(seasons.occupancy_pct, "0.0%");
    }

    #[test]
    fn empty_tables_produce_empty_charts() {
        assert!(revenue_by_category(&[]).is_empty());
        assert!(realization_adr_by_platform(&[]).is_empty());
        assert!(occupancy_by_week(&[]).is_empty());
        assert!(bookings_by_platform(&[]).is_empty());
        assert!(adr_by_category(&[]).is_empty());
        assert!(occupancy_by_room_class(&[]).is_empty());
        assert!(bookings_by_city(&[]).is_empty());
        assert!(property_insights(&[], &[]).is_empty());
    }
}
