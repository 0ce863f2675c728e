/// Synthetic connector traffic generator
///
/// Produces a mix of deliveries the HTTP sink connector emits (JSON with and
/// without envelopes, Avro console dumps, truncated bodies, noise), pushes
/// them through the webhook service from several threads and prints the
/// resulting window statistics.
///
/// Usage: payload_generator [message_count] [threads] [config.toml]

use cdc_ingest::logging::init_logging;
use cdc_ingest::{ServiceConfig, SnapshotOrder, WebhookService};
use rand::Rng;
use std::env;
use std::fs;
use std::thread;

fn json_record<R: Rng>(rng: &mut R, id: u64) -> String {
    format!(
        r#"{{"record_id": {}, "transnbr": {}, "seqnbr": {}, "creat_usrnbr": {}, "creat_time": {}, "name": "trans-{}", "oper": {}}}"#,
        id,
        rng.gen_range(1000u64..5000),
        rng.gen_range(1u32..50),
        rng.gen_range(1u32..8),
        1_700_000_000_000u64 + id * 1000,
        id,
        rng.gen_range(0u8..3),
    )
}

fn generate<R: Rng>(rng: &mut R, id: u64) -> String {
    match rng.gen_range(0u8..6) {
        0 => json_record(rng, id),
        1 => format!(r#"{{"value": {}}}"#, json_record(rng, id)),
        2 => format!(r#"{{"payload": {}}}"#, json_record(rng, id)),
        3 => format!(
            r#"Struct{{"record_id": {{"int": {}}}, "creat_usrnbr": {{"int": {}}}, "name": {{"string": "avro-{}"}}, "creat_time": {}}}"#,
            id,
            rng.gen_range(1u32..8),
            id,
            1_700_000_000u64 + id,
        ),
        4 => {
            let full = format!(r#"{{"value": {}}}"#, json_record(rng, id));
            let cut = rng.gen_range(1..full.len());
            full[..cut].to_string()
        }
        _ => (0..rng.gen_range(0..64))
            .map(|_| rng.gen_range(b'!'..=b'~') as char)
            .filter(|c| *c != '"')
            .collect(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let message_count: u64 = args.get(1).and_then(|a| a.parse().ok()).unwrap_or(1000);
    let threads: u64 = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(4).max(1);
    let config = match args.get(3) {
        Some(path) => ServiceConfig::from_toml_str(&fs::read_to_string(path)?)?,
        None => ServiceConfig::default(),
    };

    init_logging(config.log_format);
    let service = WebhookService::new(config);

    println!("Generating {} deliveries on {} threads", message_count, threads);

    thread::scope(|s| {
        for t in 0..threads {
            let service = &service;
            s.spawn(move || {
                let mut rng = rand::thread_rng();
                let mut rejected = 0u64;
                for id in (t..message_count).step_by(threads as usize) {
                    let body = generate(&mut rng, id + 1);
                    if service.ingest(body.as_bytes()).is_err() {
                        rejected += 1;
                    }
                }
                if rejected > 0 {
                    println!("Thread {} had {} rejected deliveries", t, rejected);
                }
            });
        }
    });

    println!("{}", service.stats().stats);
    println!("\nNewest records:");
    for record in service.store().snapshot(SnapshotOrder::NewestFirst) {
        let fields: Vec<String> = record
            .display_fields(50)
            .into_iter()
            .map(|(label, value)| format!("{}={}", label, value))
            .collect();
        println!("  {}", fields.join(", "));
    }

    Ok(())
}
