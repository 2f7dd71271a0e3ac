//! Example: Saving and loading pipeline files
//!
//! Demonstrates:
//!   1. Saving a draft pipeline as JSON
//!   2. Loading it back through a FilterRegistry (arguments are resolved against each schema)
//!   3. What a load failure looks like for an unknown filter
//!   4. Cancelling a run through the ExecutionContext
//!
//! Run with: cargo run --example pipeline_file

use filterflow_core::args;
use filterflow_core::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .try_init()
        .ok();

    let temp_dir = tempfile::tempdir()?;
    let file = temp_dir.path().join("pipelines").join("counts.json");

    let counts = DataPath::parse("Counts")?;
    let mut pipeline = Pipeline::new("counts");
    pipeline.push(
        CreateDataArray,
        args! {
            "numeric_type" => NumericType::UInt16,
            "tuple_dimensions" => vec![6usize],
            "initialization_value" => "7",
            "output_path" => counts.clone(),
        },
    );
    pipeline.push(
        ArrayScalarArithmetic,
        args! { "array_path" => counts.clone(), "operation" => "max", "scalar" => "10" },
    );
    pipeline.push(DeleteData, args! { "removed_path" => counts.clone() });
    pipeline.set_enabled(2, false)?;

    // ─── Save ───
    pipeline.save(&file).await?;
    println!("{}", tokio::fs::read_to_string(&file).await?);

    // ─── Load and run ───
    let registry = FilterRegistry::with_builtins()?;
    let loaded = Pipeline::load(&file, &registry).await?.compile()?;
    let mut store = DataStore::new();
    let result = loaded.run(&mut store, &ExecutionContext::default()).await;
    println!("{}", result);
    println!("Counts: {:?}", store.array(&counts)?.as_slice::<u16>());

    // ─── Unknown filter ───
    let mut document = loaded.to_document()?;
    document.filters[0].uuid = uuid::Uuid::nil();
    match Pipeline::from_document(&document, &registry) {
        Ok(_) => println!("Unexpectedly loaded"),
        Err(e) => println!("Load failed: {:#}", e),
    }

    // ─── Cancellation ───
    let context = ExecutionContext::default();
    context.cancel();
    let result = loaded.run(&mut DataStore::new(), &context).await;
    println!("Cancelled: {}, stopped at {:?}", result.cancelled, result.failed_at);

    Ok(())
}
