//! Load Testing Tool
//!
//! Hammers an in-process pending store with concurrent webhook submissions,
//! a share of them re-deliveries, then drains it and checks the counts.
//!
//! Run with: cargo run --bin load_test --release -- --events 10000 --tasks 8

use std::sync::Arc;
use std::time::Instant;

use donation_relay::PendingStore;
use serde_json::{json, Map};

fn arg_value(args: &[String], flag: &str, default: u64) -> u64 {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let event_count = arg_value(&args, "--events", 10_000);
    let task_count = arg_value(&args, "--tasks", 8).max(1);
    let duplicate_every = arg_value(&args, "--duplicate-every", 10).max(2);

    println!(
        "Load Test - Submitting {} events from {} tasks (every {}th is a re-delivery)",
        event_count, task_count, duplicate_every
    );

    let store = Arc::new(PendingStore::new());
    let start = Instant::now();

    let handles: Vec<_> = (0..task_count)
        .map(|task| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let mut inserted = 0u64;
                let mut discarded = 0u64;

                for i in (task..event_count).step_by(task_count as usize) {
                    // Re-deliveries reuse the id of the previous event
                    let id = if i > 0 && i % duplicate_every == 0 { i - 1 } else { i };
                    let mut payload = Map::new();
                    payload.insert("id".into(), json!(format!("load-{}", id)));
                    payload.insert("donator_name".into(), json!(format!("Donor {}", i)));
                    payload.insert("amount".into(), json!((i % 100 + 1) * 1000));
                    payload.insert("message".into(), json!("load test"));

                    if store.submit(&payload).inserted {
                        inserted += 1;
                    } else {
                        discarded += 1;
                    }
                }

                (inserted, discarded)
            })
        })
        .collect();

    let mut inserted = 0u64;
    let mut discarded = 0u64;
    for handle in handles {
        let (task_inserted, task_discarded) = handle.await?;
        inserted += task_inserted;
        discarded += task_discarded;
    }

    let drained = store.drain_all();
    let elapsed = start.elapsed();
    let rate = event_count as f64 / elapsed.as_secs_f64();

    println!("\n=== Load Test Results ===");
    println!("Total events: {}", event_count);
    println!("Inserted: {}", inserted);
    println!("Duplicates discarded: {}", discarded);
    println!("Drained: {}", drained.len());
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Rate: {:.0} events/sec", rate);

    if drained.len() as u64 != inserted {
        anyhow::bail!(
            "drained {} donations but {} were inserted",
            drained.len(),
            inserted
        );
    }

    Ok(())
}
