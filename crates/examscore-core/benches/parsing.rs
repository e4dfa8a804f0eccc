use std::path::Path;

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examscore_core::model::standard_lessons;
use examscore_core::sheet::parse_exam_sheet_str;
use examscore_core::statistics::PeriodCatalog;

const DATASET: &str = include_str!("../data/period_statistics.json");

fn sheet_source() -> String {
    let mut sheet = String::from("[exam]\nname = \"Bench\"\ndate = \"2025-03-09\"\n");
    for lesson in standard_lessons() {
        sheet.push_str(&format!(
            "\n[[lessons]]\nname = \"{}\"\ntier = \"{}\"\ncorrect = 6\nincorrect = 2\n",
            lesson.name, lesson.tier
        ));
    }
    sheet
}

fn bench_catalog(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog");

    group.bench_function("parse_bundled", |b| {
        b.iter(|| PeriodCatalog::parse_str(black_box(DATASET)))
    });

    group.finish();
}

fn bench_sheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("exam_sheet");
    let source = sheet_source();
    let path = Path::new("bench.toml");
    let now = Utc::now();

    group.bench_function("standard_layout", |b| {
        b.iter(|| parse_exam_sheet_str(black_box(&source), path, 100, now))
    });

    group.finish();
}

criterion_group!(benches, bench_catalog, bench_sheet);
criterion_main!(benches);
