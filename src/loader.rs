use crate::error::ReportError;
use crate::types::{
    AggregatedBooking, Booking, Dataset, DateDim, Hotel, RawAggregatedBooking, RawBooking,
    RawDateDim, RawHotel, RawRoom, Room,
};
use crate::util::{parse_check_in_date, parse_dim_date, parse_f64_safe, parse_i32_safe};
use csv::ReaderBuilder;
use std::path::Path;

/// Per-file load diagnostics, printed by the CLI after option [1].
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub file: String,
    pub rows_read: usize,
    pub rows_kept: usize,
    pub parse_errors: usize,
}

fn clean_label(s: Option<String>, fallback: &str) -> String {
    match s {
        Some(v) => {
            let v = v.trim().to_string();
            if v.is_empty() {
                fallback.to_string()
            } else {
                v
            }
        }
        None => fallback.to_string(),
    }
}

/// Shared skeleton for the five per-file loaders: deserialize each record,
/// hand it to `clean`, count what was kept versus dropped.
fn load_file<Raw, T, F>(path: &Path, clean: F) -> Result<(Vec<T>, LoadReport), ReportError>
where
    Raw: for<'de> serde::Deserialize<'de>,
    F: Fn(Raw) -> Option<T>,
{
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    let mut rows_read = 0usize;
    let mut parse_errors = 0usize;
    let mut out: Vec<T> = Vec::new();
    for result in rdr.deserialize::<Raw>() {
        rows_read += 1;
        let raw = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };
        match clean(raw) {
            Some(t) => out.push(t),
            None => parse_errors += 1,
        }
    }
    let report = LoadReport {
        file: path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string()),
        rows_read,
        rows_kept: out.len(),
        parse_errors,
    };
    Ok((out, report))
}

fn clean_booking(raw: RawBooking) -> Option<Booking> {
    let booking_id = raw.booking_id?.trim().to_string();
    if booking_id.is_empty() {
        return None;
    }
    let property_id = parse_i32_safe(raw.property_id.as_deref())?;
    let revenue_realized = match parse_f64_safe(raw.revenue_realized.as_deref()) {
        Some(v) if v >= 0.0 => v,
        _ => return None,
    };
    // A bad check-in date is not fatal: the row survives and simply misses
    // the date-dimension join downstream.
    let check_in_date = raw.check_in_date.as_deref().and_then(parse_check_in_date);
    Some(Booking {
        booking_id,
        property_id,
        room_category: clean_label(raw.room_category, "Unknown"),
        check_in_date,
        booking_platform: clean_label(raw.booking_platform, "others"),
        booking_status: clean_label(raw.booking_status, "Unknown"),
        revenue_realized,
        ratings_given: parse_f64_safe(raw.ratings_given.as_deref()),
    })
}

fn clean_agg_booking(raw: RawAggregatedBooking) -> Option<AggregatedBooking> {
    let property_id = parse_i32_safe(raw.property_id.as_deref())?;
    let successful_bookings = match parse_f64_safe(raw.successful_bookings.as_deref()) {
        Some(v) if v >= 0.0 => v,
        _ => return None,
    };
    let capacity = match parse_f64_safe(raw.capacity.as_deref()) {
        Some(v) if v >= 0.0 => v,
        _ => return None,
    };
    let week_no = raw
        .week_no
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty());
    Some(AggregatedBooking {
        property_id,
        room_category: clean_label(raw.room_category, "Unknown"),
        check_in_date: raw.check_in_date.as_deref().and_then(parse_check_in_date),
        week_no,
        successful_bookings,
        capacity,
    })
}

fn clean_room(raw: RawRoom) -> Option<Room> {
    let room_id = raw.room_id?.trim().to_string();
    if room_id.is_empty() {
        return None;
    }
    Some(Room {
        room_id,
        room_class: clean_label(raw.room_class, "Unknown"),
    })
}

fn clean_hotel(raw: RawHotel) -> Option<Hotel> {
    let property_id = parse_i32_safe(raw.property_id.as_deref())?;
    Some(Hotel {
        property_id,
        property_name: clean_label(raw.property_name, "Unknown"),
        category: clean_label(raw.category, "Unknown"),
        city: clean_label(raw.city, "Unknown"),
    })
}

fn clean_date_dim(raw: RawDateDim) -> Option<DateDim> {
    let date = raw.date.as_deref().and_then(parse_dim_date)?;
    Some(DateDim {
        date,
        mmm_yy: clean_label(raw.mmm_yy, ""),
        week_no: clean_label(raw.week_no, ""),
    })
}

/// Load the five input tables from `dir`. Any file that cannot be opened is
/// fatal; individual bad rows are skipped and counted in the reports.
pub fn load_dataset(dir: &str) -> Result<(Dataset, Vec<LoadReport>), ReportError> {
    let dir = Path::new(dir);
    let (bookings, r1) = load_file(&dir.join("fact_bookings.csv"), clean_booking)?;
    let (agg_bookings, r2) = load_file(&dir.join("fact_aggregated_bookings.csv"), clean_agg_booking)?;
    let (rooms, r3) = load_file(&dir.join("dim_rooms.csv"), clean_room)?;
    let (hotels, r4) = load_file(&dir.join("dim_hotels.csv"), clean_hotel)?;
    let (dates, r5) = load_file(&dir.join("dim_date.csv"), clean_date_dim)?;
    Ok((
        Dataset {
            bookings,
            agg_bookings,
            rooms,
            hotels,
            dates,
        },
        vec![r1, r2, r3, r4, r5],
    ))
}
