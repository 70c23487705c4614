// Entry point and high-level CLI flow.
//
// - Option [1] loads and cleans the five hotel CSVs, joins them into the two
//   working tables, and prints per-file diagnostics.
// - Option [2] prompts for the dashboard filters, computes every KPI card,
//   trend description and chart table over the filtered snapshot, prints
//   previews and exports them.
// - After a dashboard run, the user can go back to the menu or exit.
mod charts;
mod error;
mod filter;
mod join;
mod kpi;
mod loader;
mod output;
mod trend;
mod types;
mod util;

use filter::FilterSelection;
use join::DimensionIndex;
use once_cell::sync::Lazy;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::sync::Mutex;
use types::{AggRow, BookingRow, DashboardSummary};

// In-memory app state so we load and join the CSVs once but can run the
// dashboard repeatedly in a single session. A reload replaces the working
// tables wholesale; nothing is ever mutated in place.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { tables: None }));

struct AppState {
    tables: Option<WorkingTables>,
}

/// The joined base tables plus the distinct values offered by the filter
/// prompts.
#[derive(Clone)]
struct WorkingTables {
    bookings: Vec<BookingRow>,
    agg: Vec<AggRow>,
    months: Vec<String>,
    room_classes: Vec<String>,
    cities: Vec<String>,
    properties: Vec<String>,
}

fn distinct(values: impl Iterator<Item = Option<String>>) -> Vec<String> {
    let set: BTreeSet<String> = values.flatten().collect();
    set.into_iter().collect()
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Prompt for one filter. An empty line means "All".
fn read_filter(name: &str, options: &[String]) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    println!("{} [{}]", name, options.join(", "));
    print!("Select {} (blank = All): ", name);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    let choice = buf.trim().to_string();
    if choice.is_empty() {
        None
    } else {
        Some(choice)
    }
}

/// Ask the user whether to go back to the menu after a dashboard run.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Menu (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Handle option [1]: load the five CSVs and build the working tables.
fn handle_load() {
    let dir = "datasets";
    match loader::load_dataset(dir) {
        Ok((dataset, reports)) => {
            for r in &reports {
                println!(
                    "{}: {} rows read, {} kept, {} skipped",
                    r.file,
                    util::format_int(r.rows_read as i64),
                    util::format_int(r.rows_kept as i64),
                    util::format_int(r.parse_errors as i64)
                );
            }
            let dims = DimensionIndex::build(&dataset.rooms, &dataset.hotels, &dataset.dates);
            let bookings = join::join_bookings(&dataset.bookings, &dims);
            let agg = join::join_agg_bookings(&dataset.agg_bookings, &dims);
            let tables = WorkingTables {
                months: distinct(bookings.iter().map(|b| b.mmm_yy.clone())),
                room_classes: distinct(bookings.iter().map(|b| b.room_class.clone())),
                cities: distinct(bookings.iter().map(|b| b.city.clone())),
                properties: distinct(bookings.iter().map(|b| b.property_name.clone())),
                bookings,
                agg,
            };
            println!(
                "Working tables ready: {} bookings, {} aggregated rows.\n",
                util::format_int(tables.bookings.len() as i64),
                util::format_int(tables.agg.len() as i64)
            );
            let mut state = APP_STATE.lock().unwrap();
            state.tables = Some(tables);
        }
        Err(e) => {
            eprintln!("Failed to load datasets: {}\n", e);
        }
    }
}

/// Handle option [2]: filter, compute, preview, export.
fn handle_dashboard() {
    let tables = {
        let state = APP_STATE.lock().unwrap();
        state.tables.clone()
    };
    let Some(tables) = tables else {
        println!("Error: No data loaded. Please load the datasets first (option 1).\n");
        return;
    };

    let selection = FilterSelection {
        month: read_filter("Month", &tables.months),
        room_type: read_filter("Room Type", &tables.room_classes),
        city: read_filter("City", &tables.cities),
        property: read_filter("Hotel", &tables.properties),
    };
    let bookings = selection.apply_bookings(&tables.bookings);
    let agg = selection.apply_agg(&tables.agg);
    println!(
        "\nFiltered snapshot: {} bookings, {} aggregated rows.\n",
        util::format_int(bookings.len() as i64),
        util::format_int(agg.len() as i64)
    );

    let summary = DashboardSummary {
        total_revenue: kpi::total_revenue(&bookings),
        revenue_trend: trend::revenue_trend(&bookings),
        occupancy: kpi::occupancy_percentage(&agg),
        occupancy_trend: trend::occupancy_average(&agg),
        revpar: kpi::revpar(&bookings, &agg),
        revpar_trend: trend::revpar_trend(&bookings, &agg),
        total_bookings: kpi::total_bookings(&bookings),
        bookings_trend: trend::bookings_trend(&bookings),
        adr: kpi::adr(&bookings),
        adr_trend: trend::adr_trend(&bookings),
        dsrn: kpi::dsrn(&agg),
        dsrn_trend: trend::dsrn_trend(&agg),
    };

    println!("Total Revenue: {}", summary.total_revenue);
    println!("  {}", summary.revenue_trend);
    println!("Occupancy %: {}", summary.occupancy);
    println!("  {}", summary.occupancy_trend);
    println!("RevPAR: {}", summary.revpar);
    println!("  {}", summary.revpar_trend);
    println!("Total Bookings: {}", summary.total_bookings);
    println!("  {}", summary.bookings_trend);
    println!("ADR: {}", summary.adr);
    println!("  {}", summary.adr_trend);
    println!("DSRN: {}", summary.dsrn);
    println!("  {}\n", summary.dsrn_trend);

    let insights = charts::property_insights(&bookings, &agg);
    println!("Insights By Property");
    output::preview_table_rows(&insights, 10);
    export_csv("insights_by_property.csv", &insights);

    let revenue_cat = charts::revenue_by_category(&bookings);
    println!("% Revenue by Category");
    output::preview_table_rows(&revenue_cat, 5);
    export_csv("revenue_by_category.csv", &revenue_cat);

    let realization = charts::realization_adr_by_platform(&bookings);
    println!("Realization % & ADR by Platform");
    output::preview_table_rows(&realization, 10);
    export_csv("realization_adr_by_platform.csv", &realization);

    let weekly = charts::occupancy_by_week(&agg);
    println!("Occupancy % by Week Number");
    output::preview_table_rows(&weekly, 10);
    export_csv("occupancy_by_week.csv", &weekly);

    let platforms = charts::bookings_by_platform(&bookings);
    println!("% Bookings by Platform");
    output::preview_table_rows(&platforms, 10);
    export_csv("bookings_by_platform.csv", &platforms);

    let adr_cat = charts::adr_by_category(&bookings);
    println!("ADR by Category");
    output::preview_table_rows(&adr_cat, 5);
    export_csv("adr_by_category.csv", &adr_cat);

    let room_class = charts::occupancy_by_room_class(&agg);
    println!("Occupancy % by Room Class");
    output::preview_table_rows(&room_class, 10);
    export_csv("occupancy_by_room_class.csv", &room_class);

    let cities = charts::bookings_by_city(&bookings);
    println!("% Bookings by City");
    output::preview_table_rows(&cities, 10);
    export_csv("bookings_by_city.csv", &cities);

    if let Err(e) = output::write_json("dashboard_summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!("KPI summary exported to dashboard_summary.json\n");
}

fn export_csv<T: serde::Serialize>(path: &str, rows: &[T]) {
    if let Err(e) = output::write_csv(path, rows) {
        eprintln!("Write error: {}", e);
    } else {
        println!("(Full table exported to {})\n", path);
    }
}

fn main() {
    loop {
        println!("Hotel Performance Dashboard");
        println!("[1] Load the datasets");
        println!("[2] Run the dashboard\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_dashboard();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
