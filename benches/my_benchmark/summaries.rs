use criterion::{black_box, Criterion};
use tree_census_stats::analysis::{crosstab, summarize, SummaryKind};
use tree_census_stats::common::{STATUS, ZIPCODE};
use tree_census_stats::table::loader::read_csv;
use tree_census_stats::table::projection::project_tree_columns;

use crate::assets;

const ROW_COUNTS: [usize; 3] = [10_000, 100_000, 500_000];

pub fn bench_load(c: &mut Criterion) {
    for &rows in &ROW_COUNTS {
        let text = assets::census_csv(rows);
        c.bench_function(&format!("load_and_project_{}", rows), |b| {
            b.iter(|| {
                let raw = read_csv(black_box(text.as_bytes())).unwrap();
                project_tree_columns(&raw).unwrap()
            })
        });
    }
}

pub fn bench_summaries(c: &mut Criterion) {
    for &rows in &ROW_COUNTS {
        let table = assets::census_table(rows);
        for kind in SummaryKind::ALL {
            let id = format!("summarize_{}_{}", kind.group_key(), rows);
            c.bench_function(&id, |b| b.iter(|| summarize(black_box(&table), kind).unwrap()));
        }
    }
}

pub fn bench_crosstab(c: &mut Criterion) {
    for &rows in &ROW_COUNTS {
        let table = assets::census_table(rows);
        c.bench_function(&format!("crosstab_zipcode_status_{}", rows), |b| {
            b.iter(|| crosstab(black_box(&table), ZIPCODE, STATUS).unwrap())
        });
    }
}
