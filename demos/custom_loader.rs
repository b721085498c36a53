//! Custom loader example for dataset-registry.
//!
//! Demonstrates:
//! - Declaring a namespace with `define_datasets!`
//! - Backing it with a loader that is not a CSV directory
//! - Failed loads being retried on the next access
//! - Observing registry events with a trace callback
//!
//! Run with: `cargo run --example custom_loader`

use dataset_registry::{define_datasets, DatasetError, DatasetNamespace, Table, TableLoader};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

define_datasets! {
    /// Reference tables for a small workshop.
    mod workshop {
        data_dir: "workshop-data",
        datasets: {
            tools => "tools",
            shifts => "shifts",
        }
    }
}

/// Serves tables from memory; `shifts` is unavailable until `ready` is set.
struct InMemoryLoader {
    ready: Arc<AtomicBool>,
}

impl TableLoader for InMemoryLoader {
    fn load_table(&self, source_id: &str) -> Result<Table, DatasetError> {
        match source_id {
            "tools" => Ok(vec![
                vec!["tool".to_string(), "count".to_string()],
                vec!["wrench".to_string(), "4".to_string()],
            ]),
            "shifts" if self.ready.load(Ordering::SeqCst) => Ok(vec![
                vec!["shift".to_string()],
                vec!["early".to_string()],
                vec!["late".to_string()],
            ]),
            _ => Err(DatasetError::SourceUnavailable {
                source_id: source_id.to_string(),
                path: source_id.into(),
                cause: std::io::Error::new(std::io::ErrorKind::NotFound, "not published yet"),
            }),
        }
    }
}

fn main() {
    env_logger::init();

    println!("=== dataset-registry: Custom Loader ===\n");

    let ready = Arc::new(AtomicBool::new(false));
    let ns = workshop::Datasets::with_loader(InMemoryLoader {
        ready: ready.clone(),
    });

    ns.registry()
        .set_trace_callback(|event| println!("   [registry-trace] {}", event));

    println!("1. Reading tools twice...");
    let _ = ns.tools();
    let _ = ns.tools();

    println!("\n2. Reading shifts before it is published...");
    if let Err(e) = ns.shifts() {
        println!("   Error (expected): {}", e);
    }

    println!("\n3. Publishing shifts and reading again...");
    ready.store(true, Ordering::SeqCst);
    match ns.shifts() {
        Ok(shifts) => println!("   {} rows", shifts.len()),
        Err(e) => println!("   Error: {}", e),
    }

    println!("\n=== Example Complete ===");
    println!("Loaded datasets: {:?}", ns.registry().loaded_names());
}
