/// Decode throughput and latency benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cdc_ingest::MessageDecoder;

fn json_payload(id: u64) -> Vec<u8> {
    format!(
        r#"{{"value": {{"record_id": {id}, "transnbr": {}, "seqnbr": 1, "creat_usrnbr": 42,
            "creat_time": 1700000000000, "updat_time": 1700000005000, "name": "trade-{id}",
            "description": "booking", "data": "QUJDREVGRw==", "version": 3}}}}"#,
        id * 10
    )
    .into_bytes()
}

fn avro_payload(id: u64) -> Vec<u8> {
    format!(
        r#"Struct{{"record_id": {{"int": {id}}}, "transnbr": {{"int": {}}}, "seqnbr": {{"int": 1}},
            "creat_usrnbr": {{"int": 42}}, "creat_time": 1700000000000, "name": {{"string": "trade-{id}"}},
            "description": {{"string": "booking"}}, "version": {{"int": 3}}"#,
        id * 10
    )
    .into_bytes()
}

fn bench_decode_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_throughput");
    let decoder = MessageDecoder::new();

    for count in [100u64, 1000, 10000].iter() {
        let payloads: Vec<Vec<u8>> = (0..*count).map(json_payload).collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.iter(|| {
                payloads
                    .iter()
                    .filter(|p| decoder.decode(black_box(p)).record_id().is_some())
                    .count()
            });
        });
    }
    group.finish();
}

fn bench_decode_formats(c: &mut Criterion) {
    let mut group = c.benchmark_group("payload_formats");
    let decoder = MessageDecoder::new();

    let json = json_payload(7);
    let avro = avro_payload(7);
    let garbage: Vec<u8> = (0..512u32).map(|i| (i * 31 % 251) as u8).collect();

    group.bench_function("json_envelope", |b| b.iter(|| decoder.decode(black_box(&json))));
    group.bench_function("avro_dump", |b| b.iter(|| decoder.decode(black_box(&avro))));
    group.bench_function("error_record", |b| b.iter(|| decoder.decode(black_box(&garbage))));

    group.finish();
}

criterion_group!(benches, bench_decode_throughput, bench_decode_formats);
criterion_main!(benches);
