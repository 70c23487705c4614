use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

// ---------------------------------------------------------------------------
// Raw CSV rows: every field optional, cleaned into typed entities by the
// loader. Extra columns in the files are ignored.
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RawBooking {
    #[serde(rename = "booking_id")]
    pub booking_id: Option<String>,
    #[serde(rename = "property_id")]
    pub property_id: Option<String>,
    #[serde(rename = "room_category")]
    pub room_category: Option<String>,
    #[serde(rename = "check_in_date")]
    pub check_in_date: Option<String>,
    #[serde(rename = "booking_platform")]
    pub booking_platform: Option<String>,
    #[serde(rename = "booking_status")]
    pub booking_status: Option<String>,
    #[serde(rename = "revenue_realized")]
    pub revenue_realized: Option<String>,
    #[serde(rename = "ratings_given")]
    pub ratings_given: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawAggregatedBooking {
    #[serde(rename = "property_id")]
    pub property_id: Option<String>,
    #[serde(rename = "room_category")]
    pub room_category: Option<String>,
    #[serde(rename = "check_in_date")]
    pub check_in_date: Option<String>,
    #[serde(rename = "week_no", default)]
    pub week_no: Option<String>,
    #[serde(rename = "successful_bookings")]
    pub successful_bookings: Option<String>,
    #[serde(rename = "capacity")]
    pub capacity: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawRoom {
    #[serde(rename = "room_id")]
    pub room_id: Option<String>,
    #[serde(rename = "room_class")]
    pub room_class: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawHotel {
    #[serde(rename = "property_id")]
    pub property_id: Option<String>,
    #[serde(rename = "property_name")]
    pub property_name: Option<String>,
    #[serde(rename = "category")]
    pub category: Option<String>,
    #[serde(rename = "city")]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawDateDim {
    #[serde(rename = "date")]
    pub date: Option<String>,
    #[serde(rename = "mmm_yy")]
    pub mmm_yy: Option<String>,
    #[serde(rename = "week_no")]
    pub week_no: Option<String>,
}

// ---------------------------------------------------------------------------
// Clean entities. Immutable once loaded; the core only derives new tables.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Booking {
    pub booking_id: String,
    pub property_id: i32,
    pub room_category: String,
    /// `None` when the source string did not parse; such rows simply miss
    /// the date-dimension join.
    pub check_in_date: Option<NaiveDate>,
    pub booking_platform: String,
    pub booking_status: String,
    pub revenue_realized: f64,
    pub ratings_given: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct AggregatedBooking {
    pub property_id: i32,
    pub room_category: String,
    pub check_in_date: Option<NaiveDate>,
    /// Week label as exported ("W 32"); absent in some exports, in which
    /// case the date-dimension join supplies it.
    pub week_no: Option<String>,
    pub successful_bookings: f64,
    pub capacity: f64,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: String,
    pub room_class: String,
}

#[derive(Debug, Clone)]
pub struct Hotel {
    pub property_id: i32,
    pub property_name: String,
    pub category: String,
    pub city: String,
}

#[derive(Debug, Clone)]
pub struct DateDim {
    pub date: NaiveDate,
    pub mmm_yy: String,
    pub week_no: String,
}

/// The five cleaned input tables, loaded once per refresh.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub bookings: Vec<Booking>,
    pub agg_bookings: Vec<AggregatedBooking>,
    pub rooms: Vec<Room>,
    pub hotels: Vec<Hotel>,
    pub dates: Vec<DateDim>,
}

// ---------------------------------------------------------------------------
// Working rows: the denormalized tables every KPI/trend/aggregate function
// operates on. Dimension misses propagate as `None`.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BookingRow {
    pub booking_id: String,
    pub property_id: i32,
    pub room_category: String,
    pub check_in_date: Option<NaiveDate>,
    pub booking_platform: String,
    pub booking_status: String,
    pub revenue_realized: f64,
    pub ratings_given: Option<f64>,
    pub room_class: Option<String>,
    pub property_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub mmm_yy: Option<String>,
    pub week_no: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AggRow {
    pub property_id: i32,
    pub room_category: String,
    pub check_in_date: Option<NaiveDate>,
    pub successful_bookings: f64,
    pub capacity: f64,
    pub room_class: Option<String>,
    pub property_name: Option<String>,
    pub category: Option<String>,
    pub city: Option<String>,
    pub mmm_yy: Option<String>,
    pub week_no: Option<String>,
}

// ---------------------------------------------------------------------------
// Output table rows, one struct per chart/table, ready for preview and
// CSV export.
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryRevenueRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[serde(rename = "Share %")]
    #[tabled(rename = "Share %")]
    pub share_pct: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PlatformRealizationRow {
    #[serde(rename = "Platform")]
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "ADR")]
    #[tabled(rename = "ADR")]
    pub adr: String,
    #[serde(rename = "Realization %")]
    #[tabled(rename = "Realization %")]
    pub realization_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct WeeklyOccupancyRow {
    #[serde(rename = "Week")]
    #[tabled(rename = "Week")]
    pub week_no: String,
    #[serde(rename = "Occupancy")]
    #[tabled(rename = "Occupancy")]
    pub occupancy: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PlatformBookingsRow {
    #[serde(rename = "Platform")]
    #[tabled(rename = "Platform")]
    pub platform: String,
    #[serde(rename = "Bookings")]
    #[tabled(rename = "Bookings")]
    pub bookings: usize,
    #[serde(rename = "Share %")]
    #[tabled(rename = "Share %")]
    pub share_pct: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CategoryAdrRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "ADR")]
    #[tabled(rename = "ADR")]
    pub adr: f64,
    #[serde(rename = "ADR Display")]
    #[tabled(rename = "ADR Display")]
    pub adr_display: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RoomClassOccupancyRow {
    #[serde(rename = "Room Class")]
    #[tabled(rename = "Room Class")]
    pub room_class: String,
    #[serde(rename = "Occupancy %")]
    #[tabled(rename = "Occupancy %")]
    pub occupancy_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CityBookingsRow {
    #[serde(rename = "City")]
    #[tabled(rename = "City")]
    pub city: String,
    #[serde(rename = "Bookings")]
    #[tabled(rename = "Bookings")]
    pub bookings: usize,
    #[serde(rename = "Share %")]
    #[tabled(rename = "Share %")]
    pub share_pct: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PropertyInsightRow {
    #[serde(rename = "Property Name")]
    #[tabled(rename = "Property Name")]
    pub property_name: String,
    #[serde(rename = "Revenue")]
    #[tabled(rename = "Revenue")]
    pub revenue: String,
    #[serde(rename = "Bookings")]
    #[tabled(rename = "Bookings")]
    pub bookings: String,
    #[serde(rename = "Capacity")]
    #[tabled(rename = "Capacity")]
    pub capacity: String,
    #[serde(rename = "Occupancy %")]
    #[tabled(rename = "Occupancy %")]
    pub occupancy_pct: String,
    #[serde(rename = "Cancellation %")]
    #[tabled(rename = "Cancellation %")]
    pub cancellation_pct: String,
    #[serde(rename = "Realization %")]
    #[tabled(rename = "Realization %")]
    pub realization_pct: String,
    #[serde(rename = "ADR")]
    #[tabled(rename = "ADR")]
    pub adr: String,
    #[serde(rename = "RevPAR")]
    #[tabled(rename = "RevPAR")]
    pub revpar: String,
    #[serde(rename = "DSRN")]
    #[tabled(rename = "DSRN")]
    pub dsrn: String,
    #[serde(rename = "DBRN")]
    #[tabled(rename = "DBRN")]
    pub dbrn: String,
    #[serde(rename = "DURN")]
    #[tabled(rename = "DURN")]
    pub durn: String,
    #[serde(rename = "Average Rating")]
    #[tabled(rename = "Average Rating")]
    pub average_rating: String,
}

/// Everything the KPI cards need, serialized to `dashboard_summary.json`.
#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub total_revenue: String,
    pub revenue_trend: String,
    pub occupancy: String,
    pub occupancy_trend: String,
    pub revpar: String,
    pub revpar_trend: String,
    pub total_bookings: String,
    pub bookings_trend: String,
    pub adr: String,
    pub adr_trend: String,
    pub dsrn: String,
    pub dsrn_trend: String,
}
