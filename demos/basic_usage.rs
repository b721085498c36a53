//! Basic usage example for dataset-registry.
//!
//! Demonstrates:
//! - Reading the bundled `datapkg` datasets through free functions
//! - Loading happening once, on first reference
//! - Checking load state with `is_loaded()`
//! - Handling unknown dataset names
//!
//! Run with: `RUST_LOG=info cargo run --example basic_usage`

use dataset_registry::{datapkg, DatasetNamespace};

fn main() {
    env_logger::init();

    println!("=== dataset-registry: Basic Usage ===\n");

    // -------------------------------------------------------------------------
    // 1. Declared datasets are known before anything is loaded
    // -------------------------------------------------------------------------
    println!("1. Declared datasets...");

    for spec in datapkg::DATASETS {
        println!("   {} <- {}/{}", spec.name, datapkg::DATA_DIR, spec.source);
    }
    println!("   loaded so far: {:?}", datapkg::shared().registry().loaded_names());

    // -------------------------------------------------------------------------
    // 2. First reference loads the file
    // -------------------------------------------------------------------------
    println!("\n2. Reading machines...");

    match datapkg::machines() {
        Ok(machines) => {
            for row in machines.iter() {
                println!("   {}", row.join(" | "));
            }
        }
        Err(e) => println!("   Error: {}", e),
    }

    // -------------------------------------------------------------------------
    // 3. Second reference is served from the cache
    // -------------------------------------------------------------------------
    println!("\n3. Reading machines again (no load)...");

    if let Ok(machines) = datapkg::machines() {
        println!("   {} rows, cached", machines.len());
    }
    println!("   is_loaded(\"machines\") = {}", datapkg::shared().is_loaded("machines"));
    println!("   is_loaded(\"persons\")  = {}", datapkg::shared().is_loaded("persons"));

    // -------------------------------------------------------------------------
    // 4. Lookup by name
    // -------------------------------------------------------------------------
    println!("\n4. Reading persons by name...");

    match datapkg::attr("persons") {
        Ok(persons) => println!("   {} rows, header {:?}", persons.len(), persons[0]),
        Err(e) => println!("   Error: {}", e),
    }

    // -------------------------------------------------------------------------
    // 5. Unknown names fail like a missing attribute
    // -------------------------------------------------------------------------
    println!("\n5. Reading vehicles...");

    match datapkg::attr("vehicles") {
        Ok(_) => println!("   unexpected success"),
        Err(e) => println!("   Error (expected): {}", e),
    }

    println!("\n=== Example Complete ===");
    println!(
        "Loaded datasets: {:?}",
        datapkg::shared().registry().loaded_names()
    );
}
