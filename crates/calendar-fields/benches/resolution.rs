use std::hint::black_box;

use calendar_fields::iso_fields::{WEEK_BASED_YEAR, WEEK_OF_WEEK_BASED_YEAR};
use calendar_fields::{
    resolve_date, ChronoField, Field, FieldValues, ResolverStyle, TemporalAccessor, WeekFields,
};
use chrono::{NaiveDate, Weekday};
use criterion::{criterion_group, criterion_main, Criterion};

fn dates() -> Vec<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    first.iter_days().take(3_653).collect()
}

fn bench_field_access(c: &mut Criterion) {
    let dates = dates();
    let us = WeekFields::sunday_start();
    let mut group = c.benchmark_group("field_access");

    group.bench_function("iso_week_of_week_based_year", |b| {
        b.iter(|| {
            for d in &dates {
                black_box(d.get_long(&WEEK_OF_WEEK_BASED_YEAR).unwrap());
            }
        })
    });

    group.bench_function("localized_week_of_week_based_year", |b| {
        b.iter(|| {
            for d in &dates {
                black_box(d.get_long(&us.week_of_week_based_year()).unwrap());
            }
        })
    });

    group.bench_function("week_fields_lookup", |b| {
        b.iter(|| black_box(WeekFields::of(black_box(Weekday::Sat), black_box(2)).unwrap()))
    });

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let dates = dates();
    let us = WeekFields::sunday_start();
    let iso_maps: Vec<FieldValues> = dates
        .iter()
        .map(|d| {
            [
                (Field::from(WEEK_BASED_YEAR), d.get_long(&WEEK_BASED_YEAR).unwrap()),
                (WEEK_OF_WEEK_BASED_YEAR.into(), d.get_long(&WEEK_OF_WEEK_BASED_YEAR).unwrap()),
                (ChronoField::DayOfWeek.into(), d.get_long(&ChronoField::DayOfWeek).unwrap()),
            ]
            .into_iter()
            .collect()
        })
        .collect();
    let localized_maps: Vec<FieldValues> = dates
        .iter()
        .map(|d| {
            [
                (Field::from(ChronoField::Year), d.get_long(&ChronoField::Year).unwrap()),
                (us.week_of_year().into(), d.get_long(&us.week_of_year()).unwrap()),
                (us.day_of_week().into(), d.get_long(&us.day_of_week()).unwrap()),
            ]
            .into_iter()
            .collect()
        })
        .collect();

    let mut group = c.benchmark_group("resolution");
    for (name, maps) in [("iso_week_date", &iso_maps), ("localized_week_of_year", &localized_maps)] {
        group.bench_function(name, |b| {
            b.iter(|| {
                for map in maps {
                    let mut map = map.clone();
                    black_box(resolve_date(&mut map, ResolverStyle::Smart).unwrap());
                }
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_field_access, bench_resolution);
criterion_main!(benches);
