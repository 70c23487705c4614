// Data Join Layer.
//
// Builds the two denormalized working tables by left-joining the fact rows
// against hash-indexed dimensions. The join is left-preserving: every fact
// row yields exactly one working row, and a missed lookup leaves the joined
// columns as `None`.
use crate::types::{AggRow, AggregatedBooking, Booking, BookingRow, DateDim, Hotel, Room};
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct DimensionIndex {
    rooms: HashMap<String, String>,
    hotels: HashMap<i32, Hotel>,
    dates: HashMap<NaiveDate, DateDim>,
}

impl DimensionIndex {
    pub fn build(rooms: &[Room], hotels: &[Hotel], dates: &[DateDim]) -> Self {
        DimensionIndex {
            rooms: rooms
                .iter()
                .map(|r| (r.room_id.clone(), r.room_class.clone()))
                .collect(),
            hotels: hotels
                .iter()
                .map(|h| (h.property_id, h.clone()))
                .collect(),
            dates: dates.iter().map(|d| (d.date, d.clone())).collect(),
        }
    }
}

pub fn join_bookings(bookings: &[Booking], dims: &DimensionIndex) -> Vec<BookingRow> {
    bookings
        .iter()
        .map(|b| {
            let hotel = dims.hotels.get(&b.property_id);
            let date = b.check_in_date.and_then(|d| dims.dates.get(&d));
            BookingRow {
                booking_id: b.booking_id.clone(),
                property_id: b.property_id,
                room_category: b.room_category.clone(),
                check_in_date: b.check_in_date,
                booking_platform: b.booking_platform.clone(),
                booking_status: b.booking_status.clone(),
                revenue_realized: b.revenue_realized,
                ratings_given: b.ratings_given,
                room_class: dims.rooms.get(&b.room_category).cloned(),
                property_name: hotel.map(|h| h.property_name.clone()),
                category: hotel.map(|h| h.category.clone()),
                city: hotel.map(|h| h.city.clone()),
                mmm_yy: date.map(|d| d.mmm_yy.clone()),
                week_no: date.map(|d| d.week_no.clone()),
            }
        })
        .collect()
}

pub fn join_agg_bookings(agg: &[AggregatedBooking], dims: &DimensionIndex) -> Vec<AggRow> {
    agg.iter()
        .map(|a| {
            let hotel = dims.hotels.get(&a.property_id);
            let date = a.check_in_date.and_then(|d| dims.dates.get(&d));
            AggRow {
                property_id: a.property_id,
                room_category: a.room_category.clone(),
                check_in_date: a.check_in_date,
                successful_bookings: a.successful_bookings,
                capacity: a.capacity,
                room_class: dims.rooms.get(&a.room_category).cloned(),
                property_name: hotel.map(|h| h.property_name.clone()),
                category: hotel.map(|h| h.category.clone()),
                city: hotel.map(|h| h.city.clone()),
                mmm_yy: date.map(|d| d.mmm_yy.clone()),
                // The fact's own label wins; the date dimension fills gaps.
                week_no: a
                    .week_no
                    .clone()
                    .or_else(|| date.map(|d| d.week_no.clone())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, day).unwrap()
    }

    fn fixture_dims() -> DimensionIndex {
        let rooms = vec![Room {
            room_id: "RT1".to_string(),
            room_class: "Standard".to_string(),
        }];
        let hotels = vec![Hotel {
            property_id: 16558,
            property_name: "Atliq Grands".to_string(),
            category: "Luxury".to_string(),
            city: "Delhi".to_string(),
        }];
        let dates = vec![DateDim {
            date: date(1),
            mmm_yy: "May 22".to_string(),
            week_no: "W 19".to_string(),
        }];
        DimensionIndex::build(&rooms, &hotels, &dates)
    }

    fn booking(id: &str, property: i32, room: &str, check_in: Option<NaiveDate>) -> Booking {
        Booking {
            booking_id: id.to_string(),
            property_id: property,
            room_category: room.to_string(),
            check_in_date: check_in,
            booking_platform: "direct online".to_string(),
            booking_status: "Checked Out".to_string(),
            revenue_realized: 9100.0,
            ratings_given: Some(4.0),
        }
    }

    #[test]
    fn join_is_left_preserving() {
        let dims = fixture_dims();
        let bookings = vec![
            booking("b1", 16558, "RT1", Some(date(1))),
            booking("b2", 99999, "RT9", None),
            booking("b3", 16558, "RT1", Some(date(2))),
        ];
        let rows = join_bookings(&bookings, &dims);
        assert_eq!(rows.len(), bookings.len());
    }

    #[test]
    fn matched_dimensions_fill_columns() {
        let dims = fixture_dims();
        let rows = join_bookings(&[booking("b1", 16558, "RT1", Some(date(1)))], &dims);
        let r = &rows[0];
        assert_eq!(r.room_class.as_deref(), Some("Standard"));
        assert_eq!(r.property_name.as_deref(), Some("Atliq Grands"));
        assert_eq!(r.category.as_deref(), Some("Luxury"));
        assert_eq!(r.city.as_deref(), Some("Delhi"));
        assert_eq!(r.mmm_yy.as_deref(), Some("May 22"));
        assert_eq!(r.week_no.as_deref(), Some("W 19"));
    }

    #[test]
    fn missed_lookups_propagate_none() {
        let dims = fixture_dims();
        let rows = join_bookings(&[booking("b2", 99999, "RT9", Some(date(2)))], &dims);
        let r = &rows[0];
        assert_eq!(r.room_class, None);
        assert_eq!(r.property_name, None);
        assert_eq!(r.city, None);
        // date(2) is not in the dimension, so the calendar columns miss too
        assert_eq!(r.week_no, None);
        assert_eq!(r.mmm_yy, None);
    }

    #[test]
    fn agg_week_label_prefers_fact_value() {
        let dims = fixture_dims();
        let make = |week: Option<&str>, check_in: Option<NaiveDate>| AggregatedBooking {
            property_id: 16558,
            room_category: "RT1".to_string(),
            check_in_date: check_in,
            week_no: week.map(|w| w.to_string()),
            successful_bookings: 20.0,
            capacity: 30.0,
        };
        let rows = join_agg_bookings(
            &[
                make(Some("W 20"), Some(date(1))),
                make(None, Some(date(1))),
                make(None, None),
            ],
            &dims,
        );
        assert_eq!(rows[0].week_no.as_deref(), Some("W 20"));
        assert_eq!(rows[1].week_no.as_deref(), Some("W 19"));
        assert_eq!(rows[2].week_no, None);
    }
}
