use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rds_data_middleware::decode::build_result_set;
use rds_data_middleware::params::WireParams;
use rds_data_middleware::types::{ParamValue, Params};
use rds_data_middleware::wire::{ColumnMetadata, ExecuteStatementResponse, Field};

const COLUMNS: [(&str, &str); 6] = [
    ("id", "BIGINT"),
    ("name", "VARCHAR"),
    ("score", "DECIMAL"),
    ("active", "BIT"),
    ("created", "DATETIME"),
    ("payload", "VARBINARY"),
];

// Deterministic response so runs are comparable
fn generate_response(num_rows: usize) -> ExecuteStatementResponse {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let records = (0..num_rows)
        .map(|i| {
            vec![
                Field::LongValue(i64::try_from(i).unwrap_or(i64::MAX)),
                Field::StringValue(format!("text-{}", rng.random_range(1..1000))),
                Field::StringValue(format!("{}.{:02}", rng.random_range(0..500), rng.random_range(0..100))),
                if rng.random_range(0..10) == 0 {
                    Field::IsNull(true)
                } else {
                    Field::BooleanValue(rng.random_range(0..2) == 1)
                },
                Field::StringValue(format!(
                    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                    rng.random_range(2020..=2025),
                    rng.random_range(1..=12),
                    rng.random_range(1..=28),
                    rng.random_range(0..=23),
                    rng.random_range(0..=59),
                    rng.random_range(0..=59)
                )),
                Field::BlobValue((0..16).map(|_| rng.random_range(0..=255u8)).collect()),
            ]
        })
        .collect();

    ExecuteStatementResponse {
        column_metadata: Some(
            COLUMNS
                .iter()
                .map(|(name, type_name)| ColumnMetadata {
                    label: Some((*name).to_owned()),
                    table_name: Some("bench".to_owned()),
                    type_name: Some((*type_name).to_owned()),
                    ..ColumnMetadata::default()
                })
                .collect(),
        ),
        records: Some(records),
        number_of_records_updated: Some(0),
        generated_fields: None,
    }
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for rows in [10usize, 1_000, 10_000] {
        let response = generate_response(rows);
        group.throughput(Throughput::Elements(rows as u64));

        group.bench_with_input(BenchmarkId::new("build_result_set", rows), &response, |b, r| {
            b.iter(|| black_box(build_result_set(r.clone()).unwrap()));
        });

        let decoded = build_result_set(response.clone()).unwrap();
        group.bench_with_input(BenchmarkId::new("read_all_getters", rows), &decoded, |b, rs| {
            b.iter(|| {
                let mut acc = 0i64;
                for row in &rs.data {
                    acc += row.get("id").and_then(|v| v.number()).unwrap_or(0);
                    acc += row.get("created").and_then(|v| v.number()).unwrap_or(0) % 7;
                    acc += row.get("active").and_then(|v| v.number()).unwrap_or(0);
                    black_box(row.get("name").and_then(|v| v.string()));
                    black_box(row.get("payload").and_then(|v| v.string()));
                    black_box(row.get("score").and_then(|v| v.double()));
                }
                black_box(acc)
            });
        });
    }
    group.finish();
}

fn benchmark_encode(c: &mut Criterion) {
    let params: Params = (0..32)
        .map(|i| {
            let value = if i % 2 == 0 {
                ParamValue::Int(i)
            } else {
                ParamValue::Text(format!("v{i}"))
            };
            (format!("p{i}"), value)
        })
        .collect();
    c.bench_function("encode_32_params", |b| {
        b.iter(|| black_box(WireParams::convert(Some(&params)).unwrap()));
    });
}

criterion_group!(benches, benchmark_decode, benchmark_encode);
criterion_main!(benches);
