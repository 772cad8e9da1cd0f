use tree_census_stats::table::loader::read_csv;
use tree_census_stats::table::projection::project_tree_columns;
use tree_census_stats::table::Table;

const CITIES: [&str; 6] = ["Brooklyn", "Bronx", "Staten Island", "Astoria", "Flushing", "New York"];
const STATUSES: [&str; 3] = ["Alive", "Dead", "Stump"];

/// Census-shaped CSV text with `rows` rows.
///
/// Values come from a fixed linear congruential sequence so every run sees the
/// same data.
pub fn census_csv(rows: usize) -> String {
    let mut state: u64 = 0x5eed;
    let mut next = move || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (state >> 33) as usize
    };

    let mut text = String::from("tree_id,zipcode,zip_city,tree_dbh,status\n");
    for id in 0..rows {
        let zipcode = 10001 + next() % 180;
        let city = CITIES[next() % CITIES.len()];
        let dbh = next() % 60;
        let status = STATUSES[next() % STATUSES.len()];
        text.push_str(&format!("{},{},{},{},{}\n", id, zipcode, city, dbh, status));
    }

    text
}

/// Projected working table with `rows` rows.
pub fn census_table(rows: usize) -> Table {
    let raw = read_csv(census_csv(rows).as_bytes()).unwrap();
    project_tree_columns(&raw).unwrap()
}
