use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use one_brc::parse::parse_fixed;
use one_brc::scan::scan;
use one_brc::table::PartitionTable;

const N_STATIONS: usize = 400;
const N_LINES: usize = 100_000;

fn station_names() -> Vec<String> {
    let mut seed: u64 = 7;
    (0..N_STATIONS)
        .map(|i| {
            seed = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            let len = 4 + (seed >> 59) as usize;
            let stem: String = (0..len)
                .map(|j| (b'a' + ((seed >> (j % 48)) % 26) as u8) as char)
                .collect();
            format!("{stem}{i}")
        })
        .collect()
}

fn measurements() -> Vec<u8> {
    let names = station_names();
    let mut out = Vec::new();
    for i in 0..N_LINES {
        let v = (i * 7919) % 1999;
        out.extend_from_slice(
            format!("{};{}.{}\n", names[i % names.len()], v / 10, v % 10).as_bytes(),
        );
    }
    out
}

fn table_accumulate_benchmark(c: &mut Criterion) {
    let names = station_names();
    c.bench_function("table_accumulate_400_keys", |b| {
        b.iter_batched(
            PartitionTable::new,
            |mut tbl| {
                for (i, name) in names.iter().enumerate() {
                    tbl.accumulate(black_box(name.as_bytes()), i as i64).unwrap();
                }
                tbl
            },
            BatchSize::LargeInput,
        );
    });
}

fn parse_benchmark(c: &mut Criterion) {
    c.bench_function("parse_fixed", |b| {
        b.iter(|| {
            parse_fixed(black_box(b"-12.3"))
                + parse_fixed(black_box(b"4.5"))
                + parse_fixed(black_box(b"99.9"))
        })
    });
}

fn scan_benchmark(c: &mut Criterion) {
    let data = measurements();
    c.bench_function("scan_100k_lines", |b| {
        b.iter_batched(
            PartitionTable::new,
            |mut tbl| {
                let lines = scan(&data, data.len(), &mut tbl, true).unwrap();
                assert_eq!(lines, N_LINES as u64);
                tbl
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    table_accumulate_benchmark,
    parse_benchmark,
    scan_benchmark
);
criterion_main!(benches);
